//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use clap::{Args, Parser, ValueEnum};
use std::path::PathBuf;

use crate::framing::FrameLayout;

/// 一款基于 LSB (最低有效位) 隐写术的命令行工具，把文本以带魔数和终止块的帧写入图像的 RGB 通道。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于 LSB (最低有效位) 隐写术的命令行工具，把文本以带魔数和终止块的帧写入图像的 RGB 通道。输出总是 PNG。"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令：encode (隐藏)、decode (恢复) 和 capacity (查询容量)。
#[derive(Parser, Debug)]
pub enum Commands {
    /// 把文本文件的内容隐藏到图像中，输出 PNG。
    Encode(EncodeArgs),

    /// 从经过隐写的图像中恢复隐藏的文本。
    Decode(DecodeArgs),

    /// 显示图像最多可以隐藏的字符数。
    Capacity(CapacityArgs),
}

/// 终止块检测方式。
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutArg {
    /// 遇到第一个零字节即停止，与旧版图像兼容。
    Legacy,
    /// 必须读到完整的 8 字节终止块，允许文本中出现 NUL。
    Strict,
}

impl From<LayoutArg> for FrameLayout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Legacy => FrameLayout::legacy(),
            LayoutArg::Strict => FrameLayout::strict(),
        }
    }
}

/// 所有子命令共享的配置参数。
#[derive(Args, Debug, Clone, Default)]
pub struct CodecOptions {
    /// TOML 配置文件路径。
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 终止块检测方式，优先于配置文件。
    #[arg(short, long, value_enum)]
    pub layout: Option<LayoutArg>,
}

/// 'encode' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct EncodeArgs {
    /// 用于隐写的输入图像文件路径 (PNG, JPEG, BMP)。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 要隐藏的文本内容的文件路径。
    #[arg(short, long)]
    pub text: PathBuf,

    /// 输出图像路径，默认为输入图像旁的 `encoded_<名称>.png`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 输出文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,

    #[command(flatten)]
    pub codec: CodecOptions,
}

/// 'decode' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct DecodeArgs {
    /// 已隐藏文本数据的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 恢复文本的保存路径，默认为图像旁的 `recovered_<名称>.txt`。
    #[arg(short, long)]
    pub text: Option<PathBuf>,

    /// 输出文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,

    #[command(flatten)]
    pub codec: CodecOptions,
}

/// 'capacity' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct CapacityArgs {
    /// 要查询的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    #[command(flatten)]
    pub codec: CodecOptions,
}
