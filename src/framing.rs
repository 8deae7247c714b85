//! # 帧格式模块
//!
//! 定义嵌入到像素中的比特流格式：
//!
//! ```text
//! [4 字节魔数 "STEG"][文本的 UTF-8 字节][8 字节全零终止块]
//! ```
//!
//! 每个字节按最高位在前 (MSB first) 展开为比特。

use crate::constants::{MAGIC, TERMINATOR_LEN};
use crate::error::ConfigError;
use log::debug;
use serde::Deserialize;
use std::fmt;

/// 紧凑存储的比特序列，按字节打包，字节内最高位在前。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitStream {
    bytes: Vec<u8>,
    len: usize,
}

impl BitStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预留 `bits` 个比特的空间。
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bits.div_ceil(8)),
            len: 0,
        }
    }

    /// 追加一个比特，只使用 `bit` 的最低位。
    pub fn push(&mut self, bit: u8) {
        let offset = self.len % 8;
        if offset == 0 {
            self.bytes.push(0);
        }
        if let Some(last) = self.bytes.last_mut() {
            *last |= (bit & 1) << (7 - offset);
        }
        self.len += 1;
    }

    /// 把字节按最高位在前追加到序列末尾。
    pub fn extend_from_bytes(&mut self, bytes: &[u8]) {
        if self.len % 8 == 0 {
            self.bytes.extend_from_slice(bytes);
            self.len += bytes.len() * 8;
            return;
        }

        for &byte in bytes {
            for shift in (0..8).rev() {
                self.push(byte >> shift);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 按顺序返回每个比特 (0 或 1)。
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0..self.len).map(move |i| (self.bytes[i / 8] >> (7 - i % 8)) & 1)
    }

    /// 已经凑满 8 位的字节。末尾不完整的字节会被忽略。
    pub fn complete_bytes(&self) -> &[u8] {
        &self.bytes[..self.len / 8]
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.complete_bytes().to_vec()
    }

    /// 最后 `n` 个完整字节是否全部为零。
    pub fn ends_with_zero_bytes(&self, n: usize) -> bool {
        let bytes = self.complete_bytes();
        n > 0 && bytes.len() >= n && bytes[bytes.len() - n..].iter().all(|&b| b == 0)
    }
}

/// 解码结果：图像中没有可识别的隐写内容。
///
/// 这不是错误，而是一种合法的解码结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotFound;

impl fmt::Display for NotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("no hidden text found")
    }
}

/// 终止块的写入长度与提取时的检测窗口。
///
/// 嵌入时总是写入 `terminator_len` 个零字节；提取时一旦最近的
/// `detection_window` 个完整字节全为零就停止扫描。
///
/// * [`FrameLayout::legacy`]：窗口为 1 字节，与旧版工具生成的图像逐字节兼容，
///   但文本中的 NUL 字节会导致提前截断。
/// * [`FrameLayout::strict`]：窗口等于终止块长度，单独的 NUL 字节可以保留。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrameLayout {
    pub terminator_len: usize,
    pub detection_window: usize,
}

impl Default for FrameLayout {
    fn default() -> Self {
        Self::legacy()
    }
}

impl FrameLayout {
    pub const fn legacy() -> Self {
        Self {
            terminator_len: TERMINATOR_LEN,
            detection_window: 1,
        }
    }

    pub const fn strict() -> Self {
        Self {
            terminator_len: TERMINATOR_LEN,
            detection_window: TERMINATOR_LEN,
        }
    }

    /// 魔数与终止块占用的字节数。
    pub const fn overhead_bytes(&self) -> usize {
        MAGIC.len() + self.terminator_len
    }

    /// 检查参数组合是否可用：窗口不能为零，也不能比终止块更长，
    /// 否则提取器永远看不到完整的终止块。
    pub fn check(self) -> Result<Self, ConfigError> {
        if self.detection_window == 0 || self.detection_window > self.terminator_len {
            return Err(ConfigError::InvalidLayout {
                terminator_len: self.terminator_len,
                detection_window: self.detection_window,
            });
        }
        Ok(self)
    }

    /// 比特流是否刚好以终止窗口结尾。
    pub fn is_terminated(&self, bits: &BitStream) -> bool {
        bits.ends_with_zero_bytes(self.detection_window)
    }

    /// 把文本序列化为完整的帧比特流。
    ///
    /// 不做截断，调用方必须事先检查容量。
    pub fn frame(&self, payload: &str) -> BitStream {
        let payload = payload.as_bytes();
        let frame_len = self.overhead_bytes() + payload.len();

        let mut bits = BitStream::with_capacity(frame_len * 8);
        bits.extend_from_bytes(&MAGIC);
        bits.extend_from_bytes(payload);
        bits.extend_from_bytes(&vec![0u8; self.terminator_len]);

        debug!(
            "framed {} payload bytes into {} bits",
            payload.len(),
            bits.len()
        );
        bits
    }

    /// 从提取到的比特流中还原文本。
    ///
    /// 文本在魔数之后、第一个全零检测窗口之前结束；没有终止窗口时
    /// (扫描到图像末尾) 返回魔数之后的全部字节。找不到魔数时返回 [`NotFound`]。
    /// 文本不是合法 UTF-8 时按 Latin-1 逐字节解码。
    pub fn unframe(&self, bits: &BitStream) -> Result<String, NotFound> {
        let body = bits
            .complete_bytes()
            .strip_prefix(MAGIC.as_slice())
            .ok_or(NotFound)?;

        let end = body
            .windows(self.detection_window.max(1))
            .position(|window| window.iter().all(|&b| b == 0))
            .unwrap_or(body.len());

        let text = body[..end].to_vec();
        Ok(String::from_utf8(text)
            .unwrap_or_else(|e| e.into_bytes().into_iter().map(char::from).collect()))
    }
}

/// 使用默认帧格式序列化文本。
pub fn frame(payload: &str) -> BitStream {
    FrameLayout::default().frame(payload)
}

/// 使用默认帧格式还原文本。
pub fn unframe(bits: &BitStream) -> Result<String, NotFound> {
    FrameLayout::default().unframe(bits)
}
