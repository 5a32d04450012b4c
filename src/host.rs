//! # 宿主场景能力模块
//!
//! ## 设计思路
//!
//! 宿主 3D 编辑器的对象/材质 API 不在本库范围内，这里只定义
//! 能力接口 [`SceneHost`] 与其消费的放置数据模型：
//! 由嵌入方（宿主插件层）实现具体的对象创建，本库负责把
//! “怎样放置”的决策算好并以纯数据交付。
//!
//! ## 实现思路
//!
//! - `PlacementMode` 提供稳定的字符串互转，便于外部配置与展示。
//! - `BillboardSpec` / `PlaneSpec` 把原本散落在宿主调用里的参数
//!   （前置显示、宽高比缩放、材质透明混合）收敛为字段。
//! - 宽高比计算对退化尺寸（0 像素边）做 ≥ 1 夹取，避免除零。

use std::path::PathBuf;

use serde::Serialize;

use crate::error::AppError;

// ============================================================================
// 数据模型
// ============================================================================

/// 已落盘并完成探测的图片。
#[derive(Debug, Clone, Serialize)]
pub struct LoadedImage {
    /// 持久化后的 BMP 文件路径。
    pub path: PathBuf,
    /// 图像宽度（像素）。
    pub width: u32,
    /// 图像高度（像素）。
    pub height: u32,
}

/// 放置模式（面向用户语义）。
///
/// - `Reference`：创建公告板参照物（图片空对象）
/// - `Mesh`：创建带贴图材质的平面网格
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementMode {
    Reference,
    Mesh,
}

impl PlacementMode {
    /// 从外部字符串解析放置模式。
    pub fn from_str(mode: &str) -> Result<Self, AppError> {
        match mode.trim().to_lowercase().as_str() {
            "reference" => Ok(Self::Reference),
            "mesh" => Ok(Self::Mesh),
            other => Err(AppError::InvalidMode(format!(
                "{}（可选：reference / mesh）",
                other
            ))),
        }
    }

    /// 将模式输出为稳定字符串，供日志展示与持久化。
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reference => "reference",
            Self::Mesh => "mesh",
        }
    }
}

/// 公告板参照物的放置参数。
#[derive(Debug, Clone, Copy)]
pub struct BillboardSpec {
    /// 始终显示在场景几何体前方。
    pub show_in_front: bool,
    /// 图片按前置深度排序（不被自身网格遮挡）。
    pub front_depth: bool,
}

impl Default for BillboardSpec {
    fn default() -> Self {
        Self {
            show_in_front: true,
            front_depth: true,
        }
    }
}

/// 贴图材质参数。
#[derive(Debug, Clone, Copy)]
pub struct MaterialSpec {
    /// 按 Alpha 通道做透明混合。
    pub blend_alpha: bool,
    /// 是否投射阴影。
    pub cast_shadows: bool,
    /// 将图片 Alpha 通道接入材质透明度。
    pub use_image_alpha: bool,
}

impl Default for MaterialSpec {
    fn default() -> Self {
        Self {
            blend_alpha: true,
            cast_shadows: false,
            use_image_alpha: true,
        }
    }
}

/// 贴图平面的放置参数。
#[derive(Debug, Clone, Copy)]
pub struct PlaneSpec {
    /// X 方向缩放系数（匹配图片宽高比，Y 保持 1.0）。
    pub aspect_scale_x: f32,
    /// 平面材质参数。
    pub material: MaterialSpec,
}

impl PlaneSpec {
    /// 根据图片尺寸计算平面参数。
    ///
    /// 宽高各自夹取到 ≥ 1 像素再求比值，退化尺寸不会产生除零。
    pub fn for_image(image: &LoadedImage) -> Self {
        let width = image.width.max(1);
        let height = image.height.max(1);
        Self {
            aspect_scale_x: width as f32 / height as f32,
            material: MaterialSpec::default(),
        }
    }
}

// ============================================================================
// 能力接口
// ============================================================================

/// 宿主场景放置能力接口。
///
/// 由宿主编辑器的插件层实现；每个调用要么完整创建对象，
/// 要么返回错误且不在场景中留下半成品。
pub trait SceneHost {
    /// 以公告板参照物形式放入场景。
    fn create_billboard(
        &mut self,
        image: &LoadedImage,
        spec: &BillboardSpec,
    ) -> Result<(), AppError>;

    /// 以带贴图材质的平面网格形式放入场景。
    fn create_textured_plane(
        &mut self,
        image: &LoadedImage,
        spec: &PlaneSpec,
    ) -> Result<(), AppError>;
}

#[cfg(test)]
mod tests {
    use super::{BillboardSpec, LoadedImage, MaterialSpec, PlacementMode, PlaneSpec};
    use std::path::PathBuf;

    fn image(width: u32, height: u32) -> LoadedImage {
        LoadedImage {
            path: PathBuf::from("clipboard_20260101_120000_000.bmp"),
            width,
            height,
        }
    }

    #[test]
    fn placement_mode_round_trips_through_strings() {
        let reference = PlacementMode::from_str("Reference").expect("parse should succeed");
        assert_eq!(reference, PlacementMode::Reference);
        assert_eq!(reference.as_str(), "reference");

        let mesh = PlacementMode::from_str(" mesh ").expect("parse should succeed");
        assert_eq!(mesh.as_str(), "mesh");
    }

    #[test]
    fn unknown_placement_mode_is_rejected() {
        assert!(PlacementMode::from_str("hologram").is_err());
    }

    #[test]
    fn plane_spec_matches_image_aspect_ratio() {
        let spec = PlaneSpec::for_image(&image(1920, 1080));
        assert!((spec.aspect_scale_x - 1920.0 / 1080.0).abs() < f32::EPSILON);
    }

    #[test]
    fn plane_spec_clamps_degenerate_dimensions() {
        let spec = PlaneSpec::for_image(&image(0, 0));
        assert_eq!(spec.aspect_scale_x, 1.0);

        let tall = PlaneSpec::for_image(&image(100, 0));
        assert_eq!(tall.aspect_scale_x, 100.0);
    }

    #[test]
    fn default_specs_front_display_and_alpha_blend() {
        let billboard = BillboardSpec::default();
        assert!(billboard.show_in_front);
        assert!(billboard.front_depth);

        let material = MaterialSpec::default();
        assert!(material.blend_alpha);
        assert!(material.use_image_alpha);
        assert!(!material.cast_shadows);
    }
}
