//! # 剪贴板图片导入工具 — 命令行入口
//!
//! 本文件仅负责参数解析、日志初始化与结果输出。
//! 业务逻辑分布在各子模块中，详见 `lib.rs` 架构文档。

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use clipboard_import::clipboard::SystemClipboard;
use clipboard_import::storage::{self, StorageConfig};
use clipboard_import::{import, AppError};

/// 把当前剪贴板中的位图保存为标准 BMP 文件。
#[derive(Debug, Parser)]
#[command(name = "clipboard-import", version, about)]
struct Cli {
    /// 自定义保存目录（默认：系统临时目录下的 clipboard_import 子目录）
    #[arg(long, value_name = "PATH")]
    dir: Option<PathBuf>,

    /// 以 JSON 形式输出捕获报告
    #[arg(long)]
    json: bool,

    /// 仅输出存储目录占用信息（路径 / 总大小 / 文件数）后退出
    #[arg(long)]
    info: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let storage_config = StorageConfig::new(cli.dir);

    if cli.info {
        return report_storage_info(&storage_config, cli.json);
    }

    match import::capture_to_file(&SystemClipboard, &storage_config) {
        Ok(Some(report)) => {
            if cli.json {
                match serde_json::to_string_pretty(&report) {
                    Ok(payload) => println!("{}", payload),
                    Err(err) => {
                        log::error!("❌ 报告序列化失败: {err}");
                        return ExitCode::FAILURE;
                    }
                }
            } else {
                println!("{}", report.path.display());
            }
            ExitCode::SUCCESS
        }
        // 剪贴板没有图片：告警已由编排层输出，按无操作成功退出
        Ok(None) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("❌ 导入失败: {err}");
            if cli.json {
                print_json_error(&err);
            }
            ExitCode::FAILURE
        }
    }
}

fn report_storage_info(config: &StorageConfig, json: bool) -> ExitCode {
    match storage::storage_info(config) {
        Ok(info) => {
            if json {
                match serde_json::to_string_pretty(&info) {
                    Ok(payload) => println!("{}", payload),
                    Err(err) => {
                        log::error!("❌ 报告序列化失败: {err}");
                        return ExitCode::FAILURE;
                    }
                }
            } else {
                println!(
                    "{}  ({} 个文件, {} 字节)",
                    info.path, info.file_count, info.total_size
                );
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("❌ 读取存储目录信息失败: {err}");
            ExitCode::FAILURE
        }
    }
}

fn print_json_error(err: &AppError) {
    if let Ok(payload) = serde_json::to_string(&serde_json::json!({ "error": err })) {
        println!("{}", payload);
    }
}
