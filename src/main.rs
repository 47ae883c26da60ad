use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use sigaa_report_scraper::error::AppError;
use sigaa_report_scraper::models::{ParamMap, ReportKind};
use sigaa_report_scraper::orchestrator::{run_report, ReportRequest, Response, Resultado};
use sigaa_report_scraper::services::CsvWriter;
use sigaa_report_scraper::utils::logging;
use sigaa_report_scraper::Config;

/// 参数中携带会话 Cookie 的键
const SESSION_PARAM: &str = "userData";

/// SIGAA 报表抓取
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// 报表类型
    #[arg(value_enum)]
    report: ReportKind,

    /// 过滤参数（JSON 对象）
    params: Option<String>,

    /// 从文件读取过滤参数（.toml 或 .json）
    #[arg(long, conflicts_with = "params")]
    params_file: Option<PathBuf>,

    /// 会话 Cookie 值（缺省时读取参数中的 userData）
    #[arg(long)]
    session_cookie: Option<String>,

    /// 额外把班级记录写入 CSV
    #[arg(long)]
    csv: Option<PathBuf>,
}

fn load_params(cli: &Cli) -> Result<ParamMap, AppError> {
    match (&cli.params, &cli.params_file) {
        (Some(inline), _) => ParamMap::from_json(inline),
        (None, Some(path)) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| AppError::file(path.display().to_string(), e))?;
            let is_toml = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
            if is_toml {
                ParamMap::from_toml(&text)
            } else {
                ParamMap::from_json(&text)
            }
        }
        (None, None) => Ok(ParamMap::new()),
    }
}

fn build_request(cli: &Cli) -> Result<ReportRequest, AppError> {
    let params = load_params(cli)?;
    let session_token = cli
        .session_cookie
        .clone()
        .filter(|token| !token.trim().is_empty())
        .unwrap_or_else(|| params.get(SESSION_PARAM).to_string());
    if session_token.is_empty() {
        return Err(AppError::Params(format!(
            "缺少会话 Cookie（--session-cookie 或参数 {}）",
            SESSION_PARAM
        )));
    }
    Ok(ReportRequest {
        kind: cli.report,
        params,
        session_token,
    })
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // 加载配置
    let config = Config::from_env()?;

    // 初始化日志
    logging::init(config.verbose_logging);

    let response = match build_request(&cli) {
        Ok(request) => run_report(config, request).await,
        Err(e) => {
            warn!("⚠️ 请求无效: {}", e);
            Response::from(e)
        }
    };

    if let (Some(path), Resultado::Extracted(result)) = (&cli.csv, &response.resultado) {
        CsvWriter::with_path(path.display().to_string()).write(result.records())?;
        info!("💾 CSV 已写入: {}", path.display());
    }

    let json = serde_json::to_string_pretty(&response).context("序列化响应失败")?;
    println!("{}", json);

    Ok(if response.status == 200 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
