//! 日志工具模块
//!
//! 日志只写 stderr，stdout 留给 JSON 响应

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::models::ReportKind;
use crate::orchestrator::{Response, Resultado};

/// 初始化 tracing 订阅器
///
/// `RUST_LOG` 优先；未设置时默认 info，`verbose` 为 true 时为 debug
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// 记录运行开始信息
pub fn log_run_start(kind: ReportKind, config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 报表抓取启动 - {}", kind.name());
    info!("🌐 门户: {}", config.portal_base_url);
    info!("🖥️ 浏览器模式: {:?}", config.browser_mode);
    info!(
        "开始时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
}

/// 记录运行结束信息
pub fn log_run_complete(response: &Response) {
    info!("\n{}", "─".repeat(60));
    match &response.resultado {
        Resultado::Extracted(result) => {
            info!("✅ 完成: {} 条执行日志", result.log.len());
            if let Some(last) = result.log.last() {
                info!("最后一步: {}", truncate_text(last, 80));
            }
        }
        Resultado::Rejected { logs } => {
            info!("⚠️ 门户拒绝了过滤条件: {} 条执行日志", logs.len());
        }
        Resultado::Fatal(message) => {
            info!("❌ 致命错误: {}", truncate_text(message, 120));
        }
    }
    info!(
        "完成时间: {} (status {})",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        response.status
    );
    info!("{}", "─".repeat(60));
}

/// 截断长文本用于日志显示
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_counts_characters_not_bytes() {
        assert_eq!(truncate_text("Relatório", 5), "Relat...");
        assert_eq!(truncate_text("Turmas", 10), "Turmas");
    }
}
