//! # 像素读写模块
//!
//! 按固定顺序遍历像素：逐行 (y 递增)，行内逐列 (x 递增)，
//! 像素内按 R、G、B 通道。`RgbImage` 的底层缓冲区正好就是这个顺序，
//! 所以嵌入和提取都直接在通道字节切片上进行。

use crate::framing::{BitStream, FrameLayout};
use image::RgbImage;
use log::{debug, warn};

/// 把比特依次写入通道字节的最低位，返回实际写入的比特数。
///
/// 比特用完后剩余的通道保持不变；通道用完后剩余的比特被丢弃。
pub fn write_lsbs(pix: &mut [u8], bits: &BitStream) -> usize {
    let mut written = 0;
    for (channel, bit) in pix.iter_mut().zip(bits.iter()) {
        *channel = (*channel & 0xFE) | bit;
        written += 1;
    }
    written
}

/// 把比特流嵌入到源图像的副本中，源图像本身不会被修改。
///
/// 在比特流耗尽之后的所有通道都原样复制。调用方应当先检查容量；
/// 如果比特流比可用通道更长，多出的比特会被丢弃。
pub fn embed(source: &RgbImage, bits: &BitStream) -> RgbImage {
    let mut output = source.clone();
    let written = write_lsbs(&mut output, bits);

    if written < bits.len() {
        warn!(
            "bitstream exceeds image capacity: dropped {} of {} bits",
            bits.len() - written,
            bits.len()
        );
    } else {
        debug!("embedded {} bits into {} channels", written, output.as_raw().len());
    }

    output
}

/// 使用默认帧格式提取比特流。
pub fn extract(image: &RgbImage) -> BitStream {
    extract_with(image, &FrameLayout::default())
}

/// 按嵌入时的顺序读取每个通道的最低位。
///
/// 每凑满一个字节就检查终止窗口，一旦命中立即停止扫描，
/// 因此短文本无需遍历整张图像。
pub fn extract_with(image: &RgbImage, layout: &FrameLayout) -> BitStream {
    let mut bits = BitStream::new();

    for &channel in image.as_raw() {
        bits.push(channel & 1);
        if bits.len() % 8 == 0 && layout.is_terminated(&bits) {
            debug!("terminator found after {} bits", bits.len());
            return bits;
        }
    }

    debug!("scanned all {} channels without a terminator", bits.len());
    bits
}
