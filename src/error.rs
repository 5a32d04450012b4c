//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义全局统一的 `AppError` 枚举，替代各模块中分散的
//! `.map_err(|e| e.to_string())`、`format!(...)`、`expect()` 等不一致模式。
//!
//! 核心重建逻辑保留独立的 [`DibError`](crate::dib::DibError)，
//! 在编排层通过 `From` 上转为 `AppError`，调用方无需手动 map。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `DibError` 与 `std::io::Error` 提供 `From` 转换。
//! - 实现 `Serialize` 将错误序列化为字符串，供 CLI 的 JSON 输出使用。

use serde::Serialize;

use crate::dib::DibError;

/// 应用级统一错误类型
///
/// 库的所有对外操作均返回此类型，确保调用方收到一致的错误格式。
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 剪贴板读取操作失败
    #[error("剪贴板操作失败: {0}")]
    Clipboard(String),

    /// DIB → BMP 重建被拒绝（输入校验失败）
    #[error("{0}")]
    Dib(#[from] DibError),

    /// 文件系统 I/O 错误
    #[error("文件系统错误: {0}")]
    Io(#[from] std::io::Error),

    /// 存储目录不可用
    #[error("存储目录不可用: {0}")]
    Storage(String),

    /// 已保存的 BMP 无法被解码探测
    #[error("图片探测失败: {0}")]
    Probe(String),

    /// 宿主场景对象/材质创建失败
    #[error("宿主场景操作失败: {0}")]
    Host(String),

    /// 放置模式解析失败
    #[error("无效的放置模式: {0}")]
    InvalidMode(String),
}

/// 将错误序列化为人类可读的字符串。
impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
