//! # lsb_frame 库
//!
//! 本库把文本以带魔数和终止块的帧格式写入图像 RGB 通道的最低有效位，
//! 并能从图像中恢复出来。`codec` 提供对外的编码/解码操作，
//! `cli` 与 `handler` 是命令行前端。

// 声明库包含的所有模块。

pub mod capacity;
pub mod cli;
pub mod codec;
pub mod config;
pub mod constants;
pub mod error;
pub mod framing;
pub mod handler;
pub mod steganography;
pub mod validate;

pub use codec::{Decoded, EncodedImage, decode, encode, max_storable_chars};
pub use config::Settings;
pub use error::{ConfigError, StegError, ValidationError};
pub use framing::{BitStream, FrameLayout, NotFound};
