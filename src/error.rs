//! # 错误类型模块
//!
//! 库层面的错误使用 `thiserror` 定义，每个错误都带有固定不变的提示文本，
//! 调用方可以直接把它展示给用户。命令行层再用 `anyhow` 附加上下文。

use thiserror::Error;

/// 输入校验阶段的错误，在任何图像解码之前产生。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// 上传的图像超过了大小上限。
    #[error("Image size is greater than {limit_mb} MB")]
    TooLarge { size: u64, limit_mb: u64 },

    /// 嗅探到的 MIME 类型不在允许列表中。
    #[error("Image must be one of: [{}]", .allowed.join(", "))]
    UnsupportedType {
        detected: Option<&'static str>,
        allowed: Vec<String>,
    },
}

/// 配置文件或帧格式参数无效。
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unable to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Detection window must be between 1 and the terminator length ({terminator_len}), got {detection_window}")]
    InvalidLayout {
        terminator_len: usize,
        detection_window: usize,
    },
}

/// 编码/解码过程中的错误。
///
/// 注意“图像中没有隐藏文本”不是错误，见 [`crate::codec::Decoded::NotFound`]。
#[derive(Error, Debug)]
pub enum StegError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// 图像字节无法解析为像素网格。
    #[error("Invalid image")]
    InvalidImage(#[source] image::ImageError),

    /// 文本长度超过了图像的容量，任何像素都没有被修改。
    #[error("Text length is greater than max storable chars")]
    Capacity { len: usize, capacity: usize },

    /// 结果图像无法序列化为 PNG。
    #[error("Failed to encode the output image")]
    Encode(#[source] image::ImageError),
}
