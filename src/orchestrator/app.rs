//! 应用编排 - 编排层
//!
//! ## 职责
//!
//! 1. **资源管理**：启动或连接浏览器，唯一持有 Browser
//! 2. **会话准备**：写入会话 Cookie，导航到报表表单
//! 3. **流程调度**：委托 `ReportFlow` 执行过滤和抽取
//! 4. **统一出口**：任何退出路径都关闭浏览器资源，并把结果包装成响应
//!
//! 致命错误只在这里被捕获一次，转换为 status 500。

use chromiumoxide::Browser;
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::browser;
use crate::config::{BrowserMode, Config};
use crate::error::{AppError, AppResult};
use crate::infrastructure::{BrowserSession, CdpSession, JsExecutor, SessionCookie};
use crate::models::{ExecutionLog, ExtractionResult, ParamMap, ReportKind};
use crate::utils::logging::{log_run_complete, log_run_start};
use crate::workflow::{FlowOutput, PortalNavigator, ReportFlow};

/// 一次报表请求
#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub kind: ReportKind,
    pub params: ParamMap,
    /// 会话 Cookie 的值
    pub session_token: String,
}

/// 响应中的结果部分
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Resultado {
    Extracted(ExtractionResult),
    Rejected { logs: ExecutionLog },
    Fatal(String),
}

/// 最外层响应
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response {
    pub resultado: Resultado,
    pub status: u16,
}

impl Response {
    pub fn from_result(result: AppResult<FlowOutput>) -> Self {
        match result {
            Ok(FlowOutput::Extracted(extracted)) => Self {
                resultado: Resultado::Extracted(extracted),
                status: 200,
            },
            Ok(FlowOutput::Rejected { log, .. }) => Self {
                resultado: Resultado::Rejected { logs: log },
                status: 200,
            },
            Err(e) => Self {
                resultado: Resultado::Fatal(e.to_string()),
                status: 500,
            },
        }
    }
}

/// 在给定会话上执行：写入 Cookie → 导航 → 过滤和抽取
pub async fn execute_on<S: BrowserSession + ?Sized>(
    session: &S,
    config: &Config,
    request: &ReportRequest,
) -> AppResult<FlowOutput> {
    let mut log = ExecutionLog::new();

    session
        .add_cookie(&SessionCookie {
            name: config.session_cookie_name.clone(),
            value: request.session_token.clone(),
            domain: config.session_cookie_domain.clone(),
            path: "/".to_string(),
        })
        .await?;
    log.push("Abriu o navegador.");

    PortalNavigator::new(session)
        .open_report(&config.main_menu_url(), request.kind, &mut log)
        .await?;
    check_session_cookie(session, config, &request.session_token).await;

    Ok(ReportFlow::new(config)
        .run(session, request.kind, &request.params, log)
        .await)
}

/// 门户替换了 Cookie 通常意味着会话已失效，只做提示
async fn check_session_cookie<S: BrowserSession + ?Sized>(session: &S, config: &Config, token: &str) {
    match session.cookies().await {
        Ok(cookies) => {
            let current = cookies
                .iter()
                .find(|c| c.name == config.session_cookie_name)
                .map(|c| c.value.as_str());
            if current != Some(token) {
                warn!("⚠️ 会话 Cookie 已变化，登录状态可能已失效");
            }
        }
        Err(e) => debug!("读取 Cookie 失败: {}", e),
    }
}

/// 应用主结构
pub struct App {
    config: Config,
    browser: Browser,
    session: CdpSession,
}

impl App {
    /// 初始化应用（获取浏览器和页面）
    pub async fn initialize(config: Config) -> AppResult<Self> {
        let (browser, page) = match config.browser_mode {
            BrowserMode::Headless => {
                browser::launch_headless_browser(config.chrome_executable.as_deref()).await?
            }
            BrowserMode::Connect => browser::connect_to_browser(config.browser_debug_port).await?,
        };
        let session = CdpSession::new(JsExecutor::new(page), config.navigation_timeout);
        Ok(Self {
            config,
            browser,
            session,
        })
    }

    /// 执行一次报表请求
    pub async fn run(&self, request: &ReportRequest) -> AppResult<FlowOutput> {
        execute_on(&self.session, &self.config, request).await
    }

    /// 释放浏览器资源
    ///
    /// 无头模式关闭整个浏览器；连接模式只关闭本次打开的页面
    pub async fn shutdown(self) {
        let Self {
            config,
            mut browser,
            session,
        } = self;
        match config.browser_mode {
            BrowserMode::Headless => {
                if let Err(e) = browser.close().await {
                    warn!("关闭浏览器失败: {}", e);
                }
                if let Err(e) = browser.wait().await {
                    debug!("等待浏览器进程退出失败: {}", e);
                }
            }
            BrowserMode::Connect => {
                if let Err(e) = session.into_executor().into_page().close().await {
                    warn!("关闭页面失败: {}", e);
                }
            }
        }
        debug!("浏览器资源已释放");
    }
}

/// 完整的一次运行：初始化 → 执行 → 释放，所有错误都转换为响应
pub async fn run_report(config: Config, request: ReportRequest) -> Response {
    log_run_start(request.kind, &config);

    let result = match App::initialize(config).await {
        Ok(app) => {
            let result = app.run(&request).await;
            app.shutdown().await;
            result
        }
        Err(e) => Err(e),
    };

    if let Err(e) = &result {
        error!("❌ 运行失败: {}", e);
    }
    let response = Response::from_result(result);
    log_run_complete(&response);
    response
}

impl From<AppError> for Response {
    fn from(err: AppError) -> Self {
        Response::from_result(Err(err))
    }
}
