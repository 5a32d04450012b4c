//! 图片存储目录管理模块
//!
//! # 设计思路
//!
//! 统一管理重建后 BMP 文件的持久化存储路径。目录是显式传入的配置值
//! （[`StorageConfig`]），不引入进程级单例；支持用户自定义目录，
//! 未设置时回落到系统临时目录下的专用子目录。
//!
//! # 实现思路
//!
//! - 目录不存在时自动 `create_dir_all`，避免上层判断。
//! - 文件名带毫秒级时间戳（`clipboard_YYYYmmdd_HHMMSS_mmm.bmp`），
//!   同一目录内不会互相覆盖；历史文件从不自动清理，由用户自行删除。
//! - 所有可能失败的操作均返回 `Result`，不使用 `expect()` / `unwrap()`。

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;

use crate::error::AppError;

/// 默认存储子目录名（位于系统临时目录下）。
const DEFAULT_FOLDER_NAME: &str = "clipboard_import";

/// 存储目录配置。
///
/// 显式传入需要写文件的组件，替代模块级全局路径。
#[derive(Debug, Clone)]
pub struct StorageConfig {
    root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: std::env::temp_dir().join(DEFAULT_FOLDER_NAME),
        }
    }
}

impl StorageConfig {
    /// 根据可选的自定义目录构建配置。
    ///
    /// # 参数
    /// * `custom_dir` - 用户自定义目录；`None` 或空路径时使用默认目录
    pub fn new(custom_dir: Option<PathBuf>) -> Self {
        match custom_dir {
            Some(dir) if !dir.as_os_str().is_empty() => Self { root: dir },
            _ => Self::default(),
        }
    }

    /// 存储根目录路径。
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 确保存储目录存在，必要时自动创建。
    pub fn ensure_dir(&self) -> Result<(), AppError> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(|e| {
                AppError::Storage(format!(
                    "创建存储目录 '{}' 失败: {}",
                    self.root.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// 生成一个唯一的带时间戳 BMP 文件路径。
    ///
    /// 同一毫秒内多次保存时追加序号，保证已有文件从不被覆盖。
    pub fn unique_bmp_path(&self) -> Result<PathBuf, AppError> {
        self.ensure_dir()?;
        let timestamp = Local::now().format("%Y%m%d_%H%M%S_%3f").to_string();
        let mut path = self.root.join(format!("clipboard_{}.bmp", timestamp));
        let mut seq = 1u32;
        while path.exists() {
            path = self.root.join(format!("clipboard_{}_{}.bmp", timestamp, seq));
            seq += 1;
        }
        Ok(path)
    }

    /// 将完整的 BMP 字节写入一个新的唯一路径。
    ///
    /// # 返回
    /// - `Ok(path)` — 已落盘的文件路径
    /// - `Err(_)` — 目录不可用或写入失败（不会留下部分写入的文件路径）
    pub fn save_bmp(&self, bmp: &[u8]) -> Result<PathBuf, AppError> {
        let path = self.unique_bmp_path()?;
        fs::write(&path, bmp)?;
        log::debug!("💾 已写入 BMP 文件 - {} ({} 字节)", path.display(), bmp.len());
        Ok(path)
    }
}

/// 存储目录信息
#[derive(Debug, Clone, Serialize)]
pub struct StorageInfo {
    pub path: String,
    pub total_size: u64,
    pub file_count: u64,
}

/// 获取存储目录信息（路径 + 占用大小 + 文件数）
pub fn storage_info(config: &StorageConfig) -> Result<StorageInfo, AppError> {
    let dir = config.root();
    let mut total_size: u64 = 0;
    let mut file_count: u64 = 0;

    if dir.exists() {
        if let Ok(entries) = fs::read_dir(dir) {
            for entry in entries.flatten() {
                if let Ok(metadata) = entry.metadata() {
                    if metadata.is_file() {
                        total_size += metadata.len();
                        file_count += 1;
                    }
                }
            }
        }
    }

    Ok(StorageInfo {
        path: dir.to_string_lossy().to_string(),
        total_size,
        file_count,
    })
}
