//! # 容量计算模块
//!
//! 每个像素的 R、G、B 通道各提供 1 个可嵌入比特，扣除帧开销
//! (魔数 + 终止块) 之后就是可以存放的最大字符数 (按 UTF-8 字节计)。

use crate::constants::CHANNELS_PER_PIXEL;
use crate::framing::FrameLayout;

/// 某个尺寸的图像在给定帧格式下的嵌入容量。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capacity {
    /// 可用的通道比特总数。
    pub slot_bits: u64,
    /// 帧开销 (字节)。
    pub overhead_bytes: usize,
}

impl Capacity {
    pub fn of(width: u32, height: u32, layout: &FrameLayout) -> Self {
        Self {
            slot_bits: u64::from(width)
                .saturating_mul(u64::from(height))
                .saturating_mul(CHANNELS_PER_PIXEL),
            overhead_bytes: layout.overhead_bytes(),
        }
    }

    /// 能容纳的完整字节数，即 `floor(slot_bits / 8)`。
    pub fn slot_bytes(&self) -> u64 {
        self.slot_bits / 8
    }

    /// 最多可存放的字符数。图像连空帧都放不下时为 0。
    pub fn chars(&self) -> usize {
        let chars = self.slot_bytes().saturating_sub(self.overhead_bytes as u64);
        usize::try_from(chars).unwrap_or(usize::MAX)
    }

    /// 长度为 `len` 字节的文本能否嵌入。
    ///
    /// 除了 `len <= chars()`，还要求整个帧都能放进像素中，
    /// 这样容量为 0 的小图也会拒绝空文本。
    pub fn admits(&self, len: usize) -> bool {
        let frame_bytes = (len as u64).saturating_add(self.overhead_bytes as u64);
        len <= self.chars() && frame_bytes <= self.slot_bytes()
    }
}

/// 默认帧格式下的最大可存放字符数：`floor(width * height * 3 / 8) - 12`。
pub fn capacity_chars(width: u32, height: u32) -> usize {
    Capacity::of(width, height, &FrameLayout::default()).chars()
}
