//! # DIB → BMP 重建模块
//!
//! ## 设计思路
//!
//! 剪贴板上的位图（CF_DIB / CF_DIBV5）只有信息头与像素数据，
//! 缺少文件级 BITMAPFILEHEADER，无法直接作为 `.bmp` 文件落盘。
//! 本模块负责唯一一段与宿主/平台无关的核心逻辑：
//! 根据信息头推算像素数据偏移，合成 14 字节文件头并前置拼接。
//!
//! ## 实现思路
//!
//! - 所有多字节整数均按小端读取/写入（BMP 格式规定）。
//! - `DibHeader` 是信息头前缀的只读视图，调色板/掩码/偏移的推导
//!   独立成方法，便于单独测试。
//! - 纯函数：不做任何 I/O，不持有输入缓冲，校验失败时拒绝输出。
//! - 已知简化：压缩方式为 BITFIELDS 时，仅 40 字节旧式信息头才额外
//!   追加 12 字节掩码；≥ 52 字节的扩展头被视为已自包含掩码字段。

/// BITMAPFILEHEADER 固定字节数。
pub const FILE_HEADER_SIZE: u32 = 14;

/// 旧式 BITMAPINFOHEADER 的最小字节数，也是输入缓冲的长度下限。
pub const MIN_INFO_HEADER_SIZE: u32 = 40;

/// 压缩方式：RGB 位掩码（BI_BITFIELDS）。
pub const COMPRESSION_BITFIELDS: u32 = 3;

/// 压缩方式：含 Alpha 的位掩码（BI_ALPHABITFIELDS）。
pub const COMPRESSION_ALPHA_BITFIELDS: u32 = 6;

/// BMP 文件签名。
const BMP_SIGNATURE: [u8; 2] = *b"BM";

/// DIB 重建错误类型。
///
/// 唯一的失败模式是输入校验失败：缓冲区过短，或信息头声明与
/// 实际长度不符。重建过程本身没有其他失败路径。
#[derive(Debug, thiserror::Error)]
pub enum DibError {
    /// 输入缓冲无效（为空、过短或头部声明非法）
    #[error("无效的 DIB 数据：{0}")]
    InvalidInput(String),
}

/// 从缓冲区指定偏移读取小端 u16。
fn read_u16_le(buf: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([buf[offset], buf[offset + 1]])
}

/// 从缓冲区指定偏移读取小端 u32。
fn read_u32_le(buf: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        buf[offset],
        buf[offset + 1],
        buf[offset + 2],
        buf[offset + 3],
    ])
}

// ============================================================================
// DibHeader — 信息头只读视图
// ============================================================================

/// BITMAPINFOHEADER 前缀的只读视图。
///
/// 仅提取重建文件头所需的四个字段，缓冲区内容不会被修改。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DibHeader {
    /// 信息头声明的自身字节数（40 = 旧式最小头，更大为扩展头）。
    pub header_size: u32,
    /// 色深（每像素位数）。
    pub bit_count: u16,
    /// 压缩方式编码（0=无压缩，3=位掩码，6=含 Alpha 位掩码，…）。
    pub compression: u32,
    /// 调色板实际使用的颜色数（0 表示按色深取默认值）。
    pub colors_used: u32,
}

impl DibHeader {
    /// 解析缓冲区开头的信息头字段。
    ///
    /// # 返回
    /// - `Ok(DibHeader)` — 头部声明自洽
    /// - `Err(DibError::InvalidInput)` — 缓冲过短或声明非法
    pub fn parse(dib: &[u8]) -> Result<Self, DibError> {
        if dib.len() < MIN_INFO_HEADER_SIZE as usize {
            return Err(DibError::InvalidInput(format!(
                "缓冲区无效或过小：{} 字节（至少需要 {} 字节）",
                dib.len(),
                MIN_INFO_HEADER_SIZE
            )));
        }

        let header_size = read_u32_le(dib, 0);
        if header_size < MIN_INFO_HEADER_SIZE || (dib.len() as u64) < header_size as u64 {
            return Err(DibError::InvalidInput(format!(
                "信息头声明非法：声明 {} 字节，缓冲实际 {} 字节",
                header_size,
                dib.len()
            )));
        }

        Ok(Self {
            header_size,
            bit_count: read_u16_le(dib, 14),
            compression: read_u32_le(dib, 16),
            colors_used: read_u32_le(dib, 32),
        })
    }

    /// 紧随信息头的调色板字节数。
    ///
    /// 色深 ≤ 8 时每个颜色占 4 字节（RGBQUAD）；`colors_used` 为 0
    /// 时取默认条目数 `2^bit_count`。色深 > 8 无调色板。
    ///
    /// `colors_used` 是不可信输入，按 u64 计算避免乘法回绕；
    /// 声明超出文件格式可表达范围的由重建侧统一拒绝。
    pub fn palette_size(&self) -> u64 {
        if self.bit_count > 8 {
            return 0;
        }
        let entries = if self.colors_used != 0 {
            self.colors_used as u64
        } else {
            1u64 << self.bit_count
        };
        entries * 4
    }

    /// 信息头之后额外附带的位掩码字节数。
    ///
    /// 仅旧式 40 字节头在 BITFIELDS 压缩下会在头后追加 3 个 u32 掩码；
    /// 扩展头（≥ 52 字节）的掩码已计入 `header_size`。
    pub fn mask_size(&self) -> u32 {
        let bitfields = self.compression == COMPRESSION_BITFIELDS
            || self.compression == COMPRESSION_ALPHA_BITFIELDS;
        if bitfields && self.header_size == MIN_INFO_HEADER_SIZE {
            12
        } else {
            0
        }
    }

    /// 像素数据相对文件起始的偏移。
    ///
    /// 不变量：`14（文件头）+ 信息头 + 掩码 + 调色板`。
    /// u64 下四项之和不可能溢出；能否写入 u32 偏移字段由重建侧校验。
    pub fn pixel_data_offset(&self) -> u64 {
        FILE_HEADER_SIZE as u64
            + self.header_size as u64
            + self.mask_size() as u64
            + self.palette_size()
    }
}

// ============================================================================
// 文件重建
// ============================================================================

/// 将剪贴板 DIB 缓冲包装为完整的 BMP 文件字节序列。
///
/// 输出为 `14 字节文件头 + 原始输入`，输入字节不做任何修改或重排。
/// 文件头中的总大小恒为 `14 + 输入长度`，像素偏移按
/// [`DibHeader::pixel_data_offset`] 推算。
///
/// # 返回
/// - `Ok(Vec<u8>)` — 可被任何标准 BMP 读取器打开的文件内容
/// - `Err(DibError::InvalidInput)` — 输入校验失败，不产生输出
pub fn wrap_dib_as_bmp(dib: &[u8]) -> Result<Vec<u8>, DibError> {
    let header = DibHeader::parse(dib)?;

    // 偏移与总大小都是文件头里的 u32 字段：声明放不进去的输入直接拒绝
    let off_bits = u32::try_from(header.pixel_data_offset()).map_err(|_| {
        DibError::InvalidInput(format!(
            "调色板声明过大，像素偏移 {} 超出文件格式可表达范围",
            header.pixel_data_offset()
        ))
    })?;
    let file_size = u32::try_from(FILE_HEADER_SIZE as u64 + dib.len() as u64).map_err(|_| {
        DibError::InvalidInput(format!("输入过大：{} 字节", dib.len()))
    })?;

    let mut bmp = Vec::with_capacity(FILE_HEADER_SIZE as usize + dib.len());
    bmp.extend_from_slice(&BMP_SIGNATURE);
    bmp.extend_from_slice(&file_size.to_le_bytes());
    bmp.extend_from_slice(&0u16.to_le_bytes());
    bmp.extend_from_slice(&0u16.to_le_bytes());
    bmp.extend_from_slice(&off_bits.to_le_bytes());
    bmp.extend_from_slice(dib);

    Ok(bmp)
}
