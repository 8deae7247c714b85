//! # 编解码模块
//!
//! 对外提供两个操作：
//!
//! * [`encode`]：校验 → 计算容量 → 生成帧 → 嵌入像素 → 输出 PNG。
//! * [`decode`]：校验 → 提取比特 (遇到终止块提前结束) → 解析帧。
//!
//! 两者都是输入的纯函数，不保留任何状态，可以并行调用。

use crate::capacity::Capacity;
use crate::config::Settings;
use crate::constants::OUTPUT_MIME_TYPE;
use crate::error::StegError;
use crate::steganography::{embed, extract_with};
use image::{ImageFormat, RgbImage};
use log::debug;
use std::fmt;
use std::io::Cursor;
use std::path::Path;

/// 编码结果：嵌入了文本的 PNG 字节。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
}

impl EncodedImage {
    /// 下载时建议使用的文件名，例如 `photo.jpg` → `encoded_photo.png`。
    pub fn attachment_name(original: Option<&str>) -> String {
        original
            .and_then(|name| Path::new(name).file_stem())
            .map(|stem| format!("encoded_{}.png", stem.to_string_lossy()))
            .unwrap_or_else(|| "encoded.png".to_string())
    }
}

/// 解码结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// 恢复出的文本，可能为空字符串。
    Text(String),
    /// 图像中没有可识别的隐写内容。
    NotFound,
}

impl fmt::Display for Decoded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::NotFound => write!(f, "{}", crate::framing::NotFound),
        }
    }
}

/// 校验并解码上传的图像，丢弃 Alpha 通道。
fn load_rgb(image_bytes: &[u8], settings: &Settings) -> Result<RgbImage, StegError> {
    let mime = settings.upload.validate(image_bytes)?;
    let image = image::load_from_memory(image_bytes).map_err(StegError::InvalidImage)?;
    debug!(
        "loaded {} image {}x{}",
        mime,
        image.width(),
        image.height()
    );
    Ok(image.to_rgb8())
}

/// 计算图像最多可以存放的字符数。
pub fn max_storable_chars(image_bytes: &[u8], settings: &Settings) -> Result<usize, StegError> {
    let image = load_rgb(image_bytes, settings)?;
    let (width, height) = image.dimensions();
    Ok(Capacity::of(width, height, &settings.layout).chars())
}

/// 把文本嵌入图像，返回新的 PNG 字节。
///
/// # Errors
///
/// * 图像未通过校验 ([`StegError::Validation`])。
/// * 图像无法解码 ([`StegError::InvalidImage`])。
/// * 文本的 UTF-8 字节数超过容量 ([`StegError::Capacity`])，此时不会修改任何像素。
/// * PNG 输出失败 ([`StegError::Encode`])。
pub fn encode(image_bytes: &[u8], text: &str, settings: &Settings) -> Result<EncodedImage, StegError> {
    let source = load_rgb(image_bytes, settings)?;
    let (width, height) = source.dimensions();

    let capacity = Capacity::of(width, height, &settings.layout);
    let len = text.len();
    if !capacity.admits(len) {
        return Err(StegError::Capacity {
            len,
            capacity: capacity.chars(),
        });
    }
    debug!("embedding {} of {} storable bytes", len, capacity.chars());

    let bits = settings.layout.frame(text);
    let output = embed(&source, &bits);

    let mut bytes = Vec::new();
    output
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(StegError::Encode)?;

    Ok(EncodedImage {
        bytes,
        mime_type: OUTPUT_MIME_TYPE,
    })
}

/// 从图像中恢复隐藏的文本。
///
/// 没有找到魔数时返回 [`Decoded::NotFound`]，而不是错误。
pub fn decode(image_bytes: &[u8], settings: &Settings) -> Result<Decoded, StegError> {
    let image = load_rgb(image_bytes, settings)?;
    let bits = extract_with(&image, &settings.layout);

    Ok(match settings.layout.unframe(&bits) {
        Ok(text) => Decoded::Text(text),
        Err(_) => Decoded::NotFound,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framing::FrameLayout;
    use image::{Rgb, Rgba, RgbaImage};

    fn png_of(image: &RgbImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn noisy(width: u32, height: u32) -> Vec<u8> {
        png_of(&RgbImage::from_fn(width, height, |x, y| {
            let v = x.wrapping_mul(2_654_435_761).wrapping_add(y.wrapping_mul(40_503));
            Rgb([(v >> 3) as u8, (v >> 11) as u8, (v >> 19) as u8 | 1])
        }))
    }

    #[test]
    fn hello_round_trip() {
        let settings = Settings::default();
        let image = noisy(100, 100);
        let text = "Hello, this is a test message!";

        assert_eq!(max_storable_chars(&image, &settings).unwrap(), 3738);
        let encoded = encode(&image, text, &settings).unwrap();
        assert_eq!(encoded.mime_type, "image/png");
        assert_eq!(
            decode(&encoded.bytes, &settings).unwrap(),
            Decoded::Text(text.to_string())
        );
    }

    #[test]
    fn one_over_capacity_is_rejected() {
        let settings = Settings::default();
        let text = "x".repeat(3739);
        let err = encode(&noisy(100, 100), &text, &settings).unwrap_err();
        assert!(matches!(err, StegError::Capacity { len: 3739, capacity: 3738 }));
        assert!(
            err.to_string()
                .contains("Text length is greater than max storable chars")
        );
    }

    #[test]
    fn exactly_capacity_round_trips() {
        let settings = Settings::default();
        let text = "y".repeat(3738);
        let encoded = encode(&noisy(100, 100), &text, &settings).unwrap();
        assert_eq!(decode(&encoded.bytes, &settings).unwrap(), Decoded::Text(text));
    }

    #[test]
    fn capacity_counts_utf8_bytes() {
        let settings = Settings::default();
        // 10x10 -> 25 字节；9 个汉字 = 27 字节
        let text = "隐".repeat(9);
        assert!(matches!(
            encode(&noisy(10, 10), &text, &settings),
            Err(StegError::Capacity { len: 27, .. })
        ));
    }

    #[test]
    fn plain_image_has_no_hidden_text() {
        let settings = Settings::default();
        assert_eq!(decode(&noisy(40, 40), &settings).unwrap(), Decoded::NotFound);
        assert_eq!(Decoded::NotFound.to_string(), "no hidden text found");
    }

    #[test]
    fn empty_text_is_a_real_message() {
        let settings = Settings::default();
        let encoded = encode(&noisy(20, 20), "", &settings).unwrap();
        assert_eq!(
            decode(&encoded.bytes, &settings).unwrap(),
            Decoded::Text(String::new())
        );
    }

    #[test]
    fn corrupt_bytes_are_invalid_image() {
        let settings = Settings::default();
        let mut bytes = noisy(20, 20);
        bytes.truncate(40);
        let err = decode(&bytes, &settings).unwrap_err();
        assert!(matches!(err, StegError::InvalidImage(_)));
        assert_eq!(err.to_string(), "Invalid image");
    }

    #[test]
    fn alpha_is_dropped() {
        let settings = Settings::default();
        let rgba = RgbaImage::from_pixel(30, 30, Rgba([200, 100, 50, 7]));
        let mut bytes = Vec::new();
        rgba.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();

        let encoded = encode(&bytes, "alpha", &settings).unwrap();
        let output = image::load_from_memory(&encoded.bytes).unwrap();
        assert!(!output.color().has_alpha());
        assert_eq!(
            decode(&encoded.bytes, &settings).unwrap(),
            Decoded::Text("alpha".to_string())
        );
    }

    #[test]
    fn encode_is_deterministic() {
        let settings = Settings::default();
        let image = noisy(32, 32);
        let first = encode(&image, "same", &settings).unwrap();
        let second = encode(&image, "same", &settings).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            decode(&first.bytes, &settings).unwrap(),
            decode(&first.bytes, &settings).unwrap()
        );
    }

    #[test]
    fn layouts_disagree_on_nul_bytes() {
        let legacy = Settings::default();
        let strict = Settings::default().with_layout(FrameLayout::strict());
        let image = noisy(40, 40);

        let encoded = encode(&image, "nul\0inside", &legacy).unwrap();
        assert_eq!(
            decode(&encoded.bytes, &legacy).unwrap(),
            Decoded::Text("nul".to_string())
        );

        let encoded = encode(&image, "nul\0inside", &strict).unwrap();
        assert_eq!(
            decode(&encoded.bytes, &strict).unwrap(),
            Decoded::Text("nul\0inside".to_string())
        );
    }

    #[test]
    fn attachment_name_follows_the_upload() {
        assert_eq!(
            EncodedImage::attachment_name(Some("normal.jpg")),
            "encoded_normal.png"
        );
        assert_eq!(EncodedImage::attachment_name(None), "encoded.png");
    }
}
