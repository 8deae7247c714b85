/// 帧头部的魔数标记 (ASCII "STEG")。
/// 解码时只有以它开头的字节序列才会被视为隐写内容。
pub const MAGIC: [u8; 4] = *b"STEG";

/// 帧尾部全零终止块的默认长度 (字节)。
pub const TERMINATOR_LEN: usize = 8;

/// 每个像素可嵌入的位数：R、G、B 三个通道各 1 位，Alpha 不参与。
pub const CHANNELS_PER_PIXEL: u64 = 3;

/// 默认帧格式的固定开销：4 字节魔数 + 8 字节终止块。
pub const FRAME_OVERHEAD: usize = MAGIC.len() + TERMINATOR_LEN;

/// 上传图像的默认大小上限 (10 MB)。
pub const MAX_UPLOAD_BYTES: u64 = 10 * BYTES_PER_MB;

/// 用于在错误信息中把字节数换算为 MB。
pub const BYTES_PER_MB: u64 = 1024 * 1024;

/// 默认允许的图像 MIME 类型。
pub const DEFAULT_MIME_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/bmp"];

/// 编码输出的 MIME 类型。LSB 只能在无损格式中保存，所以输出总是 PNG。
pub const OUTPUT_MIME_TYPE: &str = "image/png";
