//! # 剪贴板读取模块
//!
//! ## 设计思路
//!
//! 将与操作系统剪贴板交互的逻辑独立出来，便于隔离平台不稳定因素。
//! 对外只暴露能力接口 [`ClipboardSource`]（查询格式可用性 + 按格式读取），
//! 重建逻辑（`dib` 模块）不依赖本接口，保持纯函数。
//!
//! ## 实现思路
//!
//! - Windows 走原生 Win32 调用：Open→Get→GlobalLock→拷贝→Close，
//!   打开剪贴板的窗口尽量短，Close 始终尽力执行。
//! - 非 Windows 平台回退到 arboard：arboard 只提供解码后的 RGBA，
//!   由 [`rgba_to_dib`] 统一合成 40 字节信息头的 DIB，
//!   使后续链路在所有平台上走同一条路径。
//! - 捕获时的格式偏好固定为 CF_DIBV5 优先、CF_DIB 兜底；
//!   两种变体的信息头前缀布局一致，重建侧只把格式当作日志信息。

use crate::error::AppError;

// ============================================================================
// 格式标签
// ============================================================================

/// 剪贴板位图格式标签。
///
/// 对应 Windows 剪贴板的两种遗留 DIB 变体；在其他平台上仅作为
/// 读取偏好与日志标识使用。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DibFormat {
    /// CF_DIB（格式号 8）：BITMAPINFOHEADER 起始的基础变体。
    Dib,
    /// CF_DIBV5（格式号 17）：带色彩管理扩展头的变体。
    DibV5,
}

impl DibFormat {
    /// 捕获时的尝试顺序：优先带色彩管理的 V5 变体。
    pub const PREFERRED_ORDER: [DibFormat; 2] = [DibFormat::DibV5, DibFormat::Dib];

    /// 稳定的格式名，用于日志与报告输出。
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dib => "CF_DIB",
            Self::DibV5 => "CF_DIBV5",
        }
    }
}

// ============================================================================
// 能力接口
// ============================================================================

/// 剪贴板读取能力接口。
///
/// 按平台各自实现；测试中可用内存数据直接替身。
pub trait ClipboardSource {
    /// 查询指定格式当前是否可用。
    fn is_format_available(&self, format: DibFormat) -> bool;

    /// 按格式读取原始 DIB 字节。
    ///
    /// # 返回
    /// - `Ok(Some(bytes))` — 读到数据
    /// - `Ok(None)` — 剪贴板中没有该格式的内容（非错误）
    /// - `Err(_)` — 平台调用失败
    fn read(&self, format: DibFormat) -> Result<Option<Vec<u8>>, AppError>;
}

/// 按固定偏好顺序读取首个可用的位图格式。
pub fn read_preferred(
    source: &impl ClipboardSource,
) -> Result<Option<(DibFormat, Vec<u8>)>, AppError> {
    for format in DibFormat::PREFERRED_ORDER {
        if !source.is_format_available(format) {
            continue;
        }
        if let Some(bytes) = source.read(format)? {
            log::debug!(
                "📋 读取剪贴板位图 - format={} bytes={}",
                format.as_str(),
                bytes.len()
            );
            return Ok(Some((format, bytes)));
        }
    }
    Ok(None)
}

/// 系统剪贴板实现（按编译目标选择平台后端）。
pub struct SystemClipboard;

impl ClipboardSource for SystemClipboard {
    fn is_format_available(&self, format: DibFormat) -> bool {
        platform::dib_format_available(format)
    }

    fn read(&self, format: DibFormat) -> Result<Option<Vec<u8>>, AppError> {
        platform::read_dib_bytes(format)
    }
}

// ============================================================================
// RGBA → DIB 合成（非 Windows 回退链路使用）
// ============================================================================

/// 将解码后的 RGBA 像素合成为 40 字节信息头的 DIB 缓冲。
///
/// 生成 32bpp、无压缩（BI_RGB）、自底向上 BGRA 行序的标准布局，
/// 行翻转与通道交换在一次遍历中完成。
///
/// # 返回
/// - `Ok(Vec<u8>)` — 可直接交给 `dib::wrap_dib_as_bmp` 的缓冲
/// - `Err(_)` — 像素长度与宽高不一致，或尺寸超出格式可表达范围
pub fn rgba_to_dib(width: usize, height: usize, rgba: &[u8]) -> Result<Vec<u8>, AppError> {
    let pixel_bytes = width
        .checked_mul(height)
        .and_then(|pixels| pixels.checked_mul(4))
        .ok_or_else(|| AppError::Clipboard("图片尺寸导致内存溢出风险".to_string()))?;

    if rgba.len() != pixel_bytes {
        return Err(AppError::Clipboard(format!(
            "像素长度不匹配: 期望 {} 实际 {}",
            pixel_bytes,
            rgba.len()
        )));
    }

    let width_i32 = i32::try_from(width)
        .map_err(|_| AppError::Clipboard(format!("图片宽度超出范围: {}", width)))?;
    let height_i32 = i32::try_from(height)
        .map_err(|_| AppError::Clipboard(format!("图片高度超出范围: {}", height)))?;

    // ── BITMAPINFOHEADER（40 字节，正 height = bottom-up）──
    let mut dib = Vec::with_capacity(40 + pixel_bytes);
    dib.extend_from_slice(&40u32.to_le_bytes());
    dib.extend_from_slice(&width_i32.to_le_bytes());
    dib.extend_from_slice(&height_i32.to_le_bytes());
    dib.extend_from_slice(&1u16.to_le_bytes()); // planes
    dib.extend_from_slice(&32u16.to_le_bytes()); // bit count
    dib.extend_from_slice(&0u32.to_le_bytes()); // BI_RGB
    dib.extend_from_slice(&(pixel_bytes as u32).to_le_bytes());
    dib.extend_from_slice(&0i32.to_le_bytes()); // x pixels per meter
    dib.extend_from_slice(&0i32.to_le_bytes()); // y pixels per meter
    dib.extend_from_slice(&0u32.to_le_bytes()); // colors used
    dib.extend_from_slice(&0u32.to_le_bytes()); // colors important

    // ── RGBA → BGRA + 垂直翻转，一次遍历完成两项转换 ──
    let row_bytes = width * 4;
    let mut pixels = vec![0u8; pixel_bytes];
    for y in 0..height {
        let src_row = y * row_bytes;
        let dst_row = (height - 1 - y) * row_bytes;
        for x in 0..width {
            let si = src_row + x * 4;
            let di = dst_row + x * 4;
            pixels[di] = rgba[si + 2];
            pixels[di + 1] = rgba[si + 1];
            pixels[di + 2] = rgba[si];
            pixels[di + 3] = rgba[si + 3];
        }
    }
    dib.extend_from_slice(&pixels);

    Ok(dib)
}

// ============================================================================
// Windows 原生实现
// ============================================================================

#[cfg(target_os = "windows")]
mod platform {
    use super::DibFormat;
    use crate::error::AppError;

    use windows::Win32::Foundation::HGLOBAL;
    use windows::Win32::System::DataExchange::{
        CloseClipboard, GetClipboardData, IsClipboardFormatAvailable, OpenClipboard,
    };
    use windows::Win32::System::Memory::{GlobalLock, GlobalSize, GlobalUnlock};
    use windows::Win32::System::Ole::{CF_DIB, CF_DIBV5};

    fn clipboard_format_id(format: DibFormat) -> u32 {
        match format {
            DibFormat::Dib => CF_DIB.0 as u32,
            DibFormat::DibV5 => CF_DIBV5.0 as u32,
        }
    }

    pub(super) fn dib_format_available(format: DibFormat) -> bool {
        unsafe { IsClipboardFormatAvailable(clipboard_format_id(format)).is_ok() }
    }

    /// 读取指定格式的全局内存内容并拷贝为独立缓冲。
    ///
    /// 持有剪贴板期间只做句柄获取与内存拷贝，Close 始终尽力执行。
    pub(super) fn read_dib_bytes(format: DibFormat) -> Result<Option<Vec<u8>>, AppError> {
        unsafe {
            if OpenClipboard(None).is_err() {
                return Err(AppError::Clipboard("打开剪贴板失败".to_string()));
            }

            let result = (|| -> Result<Option<Vec<u8>>, AppError> {
                let handle = match GetClipboardData(clipboard_format_id(format)) {
                    Ok(h) => h,
                    Err(_) => return Ok(None),
                };

                let hglobal = HGLOBAL(handle.0);
                let size = GlobalSize(hglobal);
                if size == 0 {
                    return Ok(None);
                }

                let ptr = GlobalLock(hglobal) as *const u8;
                if ptr.is_null() {
                    return Err(AppError::Clipboard("GlobalLock 返回空指针".to_string()));
                }

                let bytes = std::slice::from_raw_parts(ptr, size).to_vec();
                let _ = GlobalUnlock(hglobal);
                Ok(Some(bytes))
            })();

            let _ = CloseClipboard();
            result
        }
    }
}

// ============================================================================
// 非 Windows 回退方案 — 沿用 arboard
// ============================================================================

#[cfg(not(target_os = "windows"))]
mod platform {
    use super::{rgba_to_dib, DibFormat};
    use crate::error::AppError;

    pub(super) fn dib_format_available(_format: DibFormat) -> bool {
        // arboard 不区分 DIB 变体，两个标签都映射到同一桥接读取
        arboard::Clipboard::new()
            .and_then(|mut clipboard| clipboard.get_image().map(|_| ()))
            .is_ok()
    }

    pub(super) fn read_dib_bytes(_format: DibFormat) -> Result<Option<Vec<u8>>, AppError> {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|e| AppError::Clipboard(format!("无法访问剪贴板：{}", e)))?;

        let image = match clipboard.get_image() {
            Ok(image) => image,
            Err(arboard::Error::ContentNotAvailable) => return Ok(None),
            Err(e) => return Err(AppError::Clipboard(format!("读取剪贴板图片失败：{}", e))),
        };

        rgba_to_dib(image.width, image.height, &image.bytes).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::{rgba_to_dib, DibFormat};
    use crate::dib::DibHeader;

    #[test]
    fn preferred_order_tries_v5_first() {
        assert_eq!(
            DibFormat::PREFERRED_ORDER,
            [DibFormat::DibV5, DibFormat::Dib]
        );
        assert_eq!(DibFormat::DibV5.as_str(), "CF_DIBV5");
        assert_eq!(DibFormat::Dib.as_str(), "CF_DIB");
    }

    #[test]
    fn synthesized_dib_carries_minimal_32bpp_header() {
        let rgba = vec![0u8; 2 * 2 * 4];
        let dib = rgba_to_dib(2, 2, &rgba).expect("synthesis should succeed");

        assert_eq!(dib.len(), 40 + 16);
        let header = DibHeader::parse(&dib).expect("header should parse");
        assert_eq!(header.header_size, 40);
        assert_eq!(header.bit_count, 32);
        assert_eq!(header.compression, 0);
        assert_eq!(header.pixel_data_offset(), 54);
    }

    #[test]
    fn synthesized_dib_flips_rows_and_swaps_channels() {
        // 2x2：上行红色不透明，下行蓝色半透明
        #[rustfmt::skip]
        let rgba = vec![
            255, 0, 0, 255,  255, 0, 0, 255,
            0, 0, 255, 128,  0, 0, 255, 128,
        ];
        let dib = rgba_to_dib(2, 2, &rgba).expect("synthesis should succeed");
        let pixels = &dib[40..];

        // bottom-up：文件中的首行是图像的最后一行（蓝色），BGRA 排布
        assert_eq!(&pixels[0..4], &[255, 0, 0, 128]);
        assert_eq!(&pixels[8..12], &[0, 0, 255, 255]);
    }

    #[test]
    fn synthesized_dib_rejects_mismatched_pixel_length() {
        let rgba = vec![0u8; 7];
        assert!(rgba_to_dib(2, 2, &rgba).is_err());
    }
}
