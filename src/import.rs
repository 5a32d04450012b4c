//! # 导入编排模块
//!
//! ## 设计思路
//!
//! 编排一次用户动作的完整链路，严格顺序执行、无并发：
//! 1. 按偏好顺序读取剪贴板位图（CF_DIBV5 → CF_DIB）
//! 2. 重建为标准 BMP 文件字节
//! 3. 探测像素尺寸（保证文件可被标准读取器打开）
//! 4. 写入唯一时间戳路径
//! 5. （可选）按放置模式交给宿主创建场景对象
//!
//! ## 实现思路
//!
//! - “剪贴板没有图片”是正常结果（`Ok(None)` + 告警日志），不是错误；
//!   重建拒绝与宿主失败才以类型化错误上抛。
//! - 探测放在写盘之前：任何失败都不会留下半成品文件。
//! - 记录 read/convert/probe/save 阶段耗时，便于性能诊断。

use std::time::Instant;

use image::{GenericImageView, ImageFormat};
use serde::Serialize;

use crate::clipboard::{self, ClipboardSource};
use crate::dib;
use crate::error::AppError;
use crate::host::{BillboardSpec, LoadedImage, PlacementMode, PlaneSpec, SceneHost};
use crate::storage::StorageConfig;

/// 一次捕获动作的结果报告。
#[derive(Debug, Clone, Serialize)]
pub struct CaptureReport {
    /// 落盘后的 BMP 文件路径。
    pub path: std::path::PathBuf,
    /// 实际读取到的剪贴板格式名。
    pub format: &'static str,
    /// 图像宽度（像素）。
    pub width: u32,
    /// 图像高度（像素）。
    pub height: u32,
    /// 文件总字节数（恒为 14 + DIB 长度）。
    pub file_size: u64,
}

/// 解码重建后的 BMP 字节以探测像素尺寸。
///
/// 同时充当一道校验：探测不通过的文件不会被写盘。
fn probe_bmp_dimensions(bmp: &[u8]) -> Result<(u32, u32), AppError> {
    let decoded = image::load_from_memory_with_format(bmp, ImageFormat::Bmp)
        .map_err(|e| AppError::Probe(format!("重建后的 BMP 无法解码：{}", e)))?;
    Ok(decoded.dimensions())
}

/// 将剪贴板中的位图捕获为磁盘上的 BMP 文件。
///
/// # 返回
/// - `Ok(Some(report))` — 已落盘并完成探测
/// - `Ok(None)` — 剪贴板中没有可导入的位图（已记录告警）
/// - `Err(_)` — 读取/重建/探测/写盘任一环节失败，磁盘无残留
pub fn capture_to_file(
    source: &impl ClipboardSource,
    storage: &StorageConfig,
) -> Result<Option<CaptureReport>, AppError> {
    let total_started = Instant::now();

    let read_started = Instant::now();
    let Some((format, dib_bytes)) = clipboard::read_preferred(source)? else {
        log::warn!("⚠️ 剪贴板中没有可导入的位图");
        return Ok(None);
    };
    let read_ms = read_started.elapsed().as_millis();

    let convert_started = Instant::now();
    let bmp = dib::wrap_dib_as_bmp(&dib_bytes)?;
    let convert_ms = convert_started.elapsed().as_millis();

    let probe_started = Instant::now();
    let (width, height) = probe_bmp_dimensions(&bmp)?;
    let probe_ms = probe_started.elapsed().as_millis();

    let save_started = Instant::now();
    let path = storage.save_bmp(&bmp)?;
    let save_ms = save_started.elapsed().as_millis();

    log::info!(
        "✅ 剪贴板图片已捕获 - 来源: {} 尺寸: {}x{} 路径: {} \
         (read {}ms / convert {}ms / probe {}ms / save {}ms / total {}ms)",
        format.as_str(),
        width,
        height,
        path.display(),
        read_ms,
        convert_ms,
        probe_ms,
        save_ms,
        total_started.elapsed().as_millis()
    );

    Ok(Some(CaptureReport {
        path,
        format: format.as_str(),
        width,
        height,
        file_size: bmp.len() as u64,
    }))
}

/// 捕获剪贴板位图并按指定模式放入宿主场景。
///
/// 捕获半程与 [`capture_to_file`] 一致；宿主创建失败时文件保留在
/// 磁盘上（与存储策略一致，从不回收），错误类型化上抛由调用方告警。
pub fn import_from_clipboard(
    source: &impl ClipboardSource,
    storage: &StorageConfig,
    host: &mut dyn SceneHost,
    mode: PlacementMode,
) -> Result<Option<CaptureReport>, AppError> {
    let Some(report) = capture_to_file(source, storage)? else {
        return Ok(None);
    };

    let image = LoadedImage {
        path: report.path.clone(),
        width: report.width,
        height: report.height,
    };

    match mode {
        PlacementMode::Reference => host.create_billboard(&image, &BillboardSpec::default())?,
        PlacementMode::Mesh => host.create_textured_plane(&image, &PlaneSpec::for_image(&image))?,
    }

    log::info!(
        "🧩 已按 {} 模式放入场景 - {}",
        mode.as_str(),
        image.path.display()
    );
    Ok(Some(report))
}
