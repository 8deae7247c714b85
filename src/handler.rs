//! # 命令处理逻辑模块
//!
//! 包含处理 `encode`、`decode` 和 `capacity` 子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、调用编解码函数以及向用户报告结果。

use crate::cli::{CapacityArgs, CodecOptions, DecodeArgs, EncodeArgs};
use crate::codec::{Decoded, EncodedImage, decode, encode, max_storable_chars};
use crate::config::Settings;
use anyhow::{Context, Result};
use colored::Colorize;
use log::debug;
use std::fs;
use std::path::Path;

/// 读取配置文件 (如果有)，再用命令行的 `--layout` 覆盖帧格式。
fn load_settings(options: &CodecOptions) -> Result<Settings> {
    let settings = match &options.config {
        Some(path) => Settings::from_file(path).with_context(|| {
            format!(
                "Unable to load config file: {}",
                path.to_string_lossy().red().bold()
            )
        })?,
        None => Settings::default(),
    };

    Ok(match options.layout {
        Some(layout) => settings.with_layout(layout.into()),
        None => settings,
    })
}

/// 默认的恢复文本文件名，例如 `encoded_photo.png` → `recovered_encoded_photo.txt`。
fn recovered_name(image: &Path) -> String {
    let stem = image
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    format!("recovered_{stem}.txt")
}

/// 除非指定了 `--force`，否则拒绝覆盖已存在的文件。
fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

fn read_image(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| {
        format!(
            "Unable to read image file: {}",
            path.to_string_lossy().red().bold()
        )
    })
}

/// 处理 'Encode' 命令的执行逻辑。
///
/// 负责读取图像和文本文件、检查容量、调用编码函数隐藏文本，
/// 最后把 PNG 结果写入目标文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径的 `EncodeArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 目标文件已存在且没有指定 `--force`。
/// * 无法读取输入的图像、文本或配置文件。
/// * 图像未通过校验、无法解码，或者文本超过了容量。
/// * 无法写入到目标图像文件。
pub fn handle_encode(args: EncodeArgs) -> Result<()> {
    let dest = args.dest.clone().unwrap_or_else(|| {
        let original = args.image.file_name().map(|name| name.to_string_lossy());
        args.image.with_file_name(EncodedImage::attachment_name(original.as_deref()))
    });
    ensure_writable(&dest, args.force)?;

    let settings = load_settings(&args.codec)?;
    let picture = read_image(&args.image)?;

    let text = fs::read_to_string(&args.text).with_context(|| {
        format!(
            "Unable to read text file: {}",
            args.text.to_string_lossy().red().bold()
        )
    })?;
    debug!("read {} bytes of text from {}", text.len(), args.text.display());

    let encoded = encode(&picture, &text, &settings).with_context(|| {
        format!(
            "Failed to hide the text in {}.",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    fs::write(&dest, &encoded.bytes).with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The text has been successfully hidden and saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Decode' 命令的执行逻辑。
///
/// 负责读取经过隐写的图像文件、调用解码函数恢复文本，
/// 最后将恢复的文本内容写入目标文本文件。图像中没有隐藏文本时
/// 只打印提示，不写任何文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径的 `DecodeArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 目标文件已存在且没有指定 `--force`。
/// * 无法读取输入的图像或配置文件。
/// * 图像未通过校验或无法解码。
/// * 无法写入到目标文本文件。
pub fn handle_decode(args: DecodeArgs) -> Result<()> {
    let dest = args
        .text
        .clone()
        .unwrap_or_else(|| args.image.with_file_name(recovered_name(&args.image)));
    ensure_writable(&dest, args.force)?;

    let settings = load_settings(&args.codec)?;
    let picture = read_image(&args.image)?;

    let text = match decode(&picture, &settings).with_context(|| {
        format!(
            "Failed to recover text from '{}'.",
            args.image.to_string_lossy().red().bold()
        )
    })? {
        Decoded::Text(text) => text,
        Decoded::NotFound => {
            println!(
                "{}: {}",
                args.image.to_string_lossy().bold(),
                Decoded::NotFound.to_string().yellow()
            );
            return Ok(());
        }
    };

    fs::write(&dest, text).with_context(|| {
        format!(
            "Unable to write to target text file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The text has been successfully recovered and saved: {}",
        dest.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 处理 'Capacity' 命令的执行逻辑，打印图像最多可隐藏的字符数。
pub fn handle_capacity(args: CapacityArgs) -> Result<()> {
    let settings = load_settings(&args.codec)?;
    let picture = read_image(&args.image)?;

    let chars = max_storable_chars(&picture, &settings).with_context(|| {
        format!(
            "Failed to compute the capacity of {}.",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "{} can hold up to {} characters (UTF-8 bytes).",
        args.image.to_string_lossy().bold(),
        chars.to_string().green().bold()
    );
    Ok(())
}
