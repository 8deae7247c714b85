//! # 输入校验模块
//!
//! 在任何图像解码之前检查上传数据的大小和类型。
//! 类型通过文件头的魔数嗅探，不信任文件名或声明的 MIME。

use crate::constants::{BYTES_PER_MB, DEFAULT_MIME_TYPES, MAX_UPLOAD_BYTES};
use crate::error::ValidationError;
use serde::Deserialize;
use std::collections::BTreeSet;

/// 上传策略：大小上限与允许的 MIME 类型。
///
/// 构造一次之后只以引用方式传递，运行期间不会被修改。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UploadPolicy {
    pub max_bytes: u64,
    pub allowed_mime_types: BTreeSet<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_bytes: MAX_UPLOAD_BYTES,
            allowed_mime_types: DEFAULT_MIME_TYPES.iter().map(|m| m.to_string()).collect(),
        }
    }
}

impl UploadPolicy {
    /// 校验上传的图像字节，成功时返回嗅探到的 MIME 类型。
    ///
    /// # Errors
    ///
    /// * 数据超过 `max_bytes` 时返回 [`ValidationError::TooLarge`]。
    /// * 无法识别格式或格式不在允许列表中时返回 [`ValidationError::UnsupportedType`]。
    pub fn validate(&self, bytes: &[u8]) -> Result<&'static str, ValidationError> {
        let size = bytes.len() as u64;
        if size > self.max_bytes {
            return Err(ValidationError::TooLarge {
                size,
                limit_mb: self.max_bytes.div_ceil(BYTES_PER_MB),
            });
        }

        let detected = image::guess_format(bytes)
            .ok()
            .map(|format| format.to_mime_type());

        match detected {
            Some(mime) if self.allowed_mime_types.contains(mime) => Ok(mime),
            _ => Err(ValidationError::UnsupportedType {
                detected,
                allowed: self.allowed_mime_types.iter().cloned().collect(),
            }),
        }
    }
}
