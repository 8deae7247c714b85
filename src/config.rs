//! # 配置模块
//!
//! [`Settings`] 汇总上传策略和帧格式。可以直接使用默认值，
//! 也可以从 TOML 文件加载，缺省的键使用默认值：
//!
//! ```toml
//! [upload]
//! max_bytes = 10485760
//! allowed_mime_types = ["image/png", "image/jpeg", "image/bmp"]
//!
//! [frame]
//! terminator_len = 8
//! detection_window = 1
//! ```

use crate::error::ConfigError;
use crate::framing::FrameLayout;
use crate::validate::UploadPolicy;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// 编码/解码所需的全部不可变配置。
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub upload: UploadPolicy,
    #[serde(rename = "frame")]
    pub layout: FrameLayout,
}

impl Settings {
    /// 从 TOML 文件加载配置并检查帧格式参数。
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let settings: Self = toml::from_str(content)?;
        settings.layout.check()?;
        Ok(settings)
    }

    /// 替换帧格式，返回新的配置。
    pub fn with_layout(self, layout: FrameLayout) -> Self {
        Self { layout, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MAX_UPLOAD_BYTES;

    #[test]
    fn empty_file_yields_defaults() {
        assert_eq!(Settings::from_toml("").unwrap(), Settings::default());
    }

    #[test]
    fn partial_sections_fall_back_to_defaults() {
        let settings = Settings::from_toml(
            r#"
            [upload]
            allowed_mime_types = ["image/png"]

            [frame]
            detection_window = 8
            "#,
        )
        .unwrap();

        assert_eq!(settings.upload.max_bytes, MAX_UPLOAD_BYTES);
        assert_eq!(settings.upload.allowed_mime_types.len(), 1);
        assert_eq!(settings.layout, FrameLayout::strict());
    }

    #[test]
    fn invalid_layout_is_rejected() {
        let err = Settings::from_toml("[frame]\ndetection_window = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLayout { .. }));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Settings::from_toml("[frame]\nwindow = 2\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Settings::from_file("/nonexistent/lsb_frame.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
