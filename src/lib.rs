//! # 剪贴板图片导入工具 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │              宿主 3D 编辑器（嵌入方，库外）               │
//! │                                                          │
//! │   菜单/操作入口 ──► SceneHost 能力实现（对象·材质创建）   │
//! └───────┬──────────────────────────────────────────────────┘
//!         ↕ 能力接口（Result<T, AppError>）
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↕             本库 (Rust)                          │
//! │                                                          │
//! │  ┌─ error ────── AppError (统一错误类型)                 │
//! │  │                                                       │
//! │  ├─ clipboard ── ClipboardSource 能力接口                │
//! │  │   ├─ win32        原生 CF_DIB / CF_DIBV5 读取         │
//! │  │   └─ fallback     arboard RGBA → DIB 合成桥接          │
//! │  │                                                       │
//! │  ├─ dib ──────── DIB → BMP 重建（纯函数核心）            │
//! │  ├─ storage ──── 时间戳唯一路径 + 落盘 (显式配置)        │
//! │  ├─ host ─────── 放置数据模型 + SceneHost 接口           │
//! │  └─ import ───── 顺序编排 + 阶段耗时日志                 │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError`，所有对外操作的返回类型 |
//! | [`clipboard`] | 剪贴板能力接口、格式偏好、平台后端（Win32 / arboard） |
//! | [`dib`] | 剪贴板 DIB 缓冲 → 标准 BMP 文件字节的纯函数重建 |
//! | [`storage`] | 存储目录配置、时间戳唯一路径、文件写入与占用统计 |
//! | [`host`] | 宿主场景能力接口与放置参数（公告板 / 贴图平面） |
//! | [`import`] | 捕获与导入的顺序编排：读取 → 重建 → 探测 → 落盘 → 放置 |
//!
//! 附带的 `clipboard-import` 可执行文件只覆盖捕获半程
//! （剪贴板 → BMP 文件）；场景放置由嵌入方实现 [`host::SceneHost`] 接入。

pub mod clipboard;
pub mod dib;
pub mod error;
pub mod host;
pub mod import;
pub mod storage;

pub use error::AppError;
