use std::time::Duration;

use crate::error::{AppError, AppResult};

/// 浏览器获取方式
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BrowserMode {
    /// 启动新的无头浏览器
    Headless,
    /// 连接到已开启调试端口的浏览器
    Connect,
}

impl std::str::FromStr for BrowserMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "headless" => Ok(BrowserMode::Headless),
            "connect" => Ok(BrowserMode::Connect),
            _ => Err(AppError::Config {
                var_name: "BROWSER_MODE".to_string(),
                value: s.to_string(),
                expected_type: "headless | connect".to_string(),
            }),
        }
    }
}

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 门户地址
    pub portal_base_url: String,
    /// 会话 Cookie 名
    pub session_cookie_name: String,
    /// 会话 Cookie 所属域名
    pub session_cookie_domain: String,
    /// 浏览器获取方式
    pub browser_mode: BrowserMode,
    /// 浏览器调试端口（connect 模式）
    pub browser_debug_port: u16,
    /// 浏览器可执行文件（headless 模式，缺省时自动查找）
    pub chrome_executable: Option<String>,
    /// 等待错误面板出现的时间
    pub error_panel_timeout: Duration,
    /// 页面跳转的最长等待时间
    pub navigation_timeout: Duration,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            portal_base_url: "https://www.sigaa.ufs.br".to_string(),
            session_cookie_name: "JSESSIONID".to_string(),
            session_cookie_domain: "www.sigaa.ufs.br".to_string(),
            browser_mode: BrowserMode::Headless,
            browser_debug_port: 9222,
            chrome_executable: None,
            error_panel_timeout: Duration::from_millis(1000),
            navigation_timeout: Duration::from_millis(15000),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从环境变量读取配置，未设置的项使用默认值
    pub fn from_env() -> AppResult<Self> {
        let default = Self::default();
        Ok(Self {
            portal_base_url: env_string("PORTAL_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(default.portal_base_url),
            session_cookie_name: env_string("SESSION_COOKIE_NAME")
                .unwrap_or(default.session_cookie_name),
            session_cookie_domain: env_string("SESSION_COOKIE_DOMAIN")
                .unwrap_or(default.session_cookie_domain),
            browser_mode: env_string("BROWSER_MODE")
                .map(|v| v.parse())
                .transpose()?
                .unwrap_or(default.browser_mode),
            browser_debug_port: env_parsed("BROWSER_DEBUG_PORT", "u16")?
                .unwrap_or(default.browser_debug_port),
            chrome_executable: env_string("CHROME_EXECUTABLE").or(default.chrome_executable),
            error_panel_timeout: env_parsed("ERROR_PANEL_TIMEOUT_MS", "u64")?
                .map(Duration::from_millis)
                .unwrap_or(default.error_panel_timeout),
            navigation_timeout: env_parsed("NAVIGATION_TIMEOUT_MS", "u64")?
                .map(Duration::from_millis)
                .unwrap_or(default.navigation_timeout),
            verbose_logging: env_parsed("VERBOSE_LOGGING", "bool")?
                .unwrap_or(default.verbose_logging),
        })
    }

    /// 门户主菜单地址
    pub fn main_menu_url(&self) -> String {
        format!("{}/sigaa/verMenuPrincipal.do", self.portal_base_url)
    }
}

fn env_string(var_name: &str) -> Option<String> {
    std::env::var(var_name).ok().filter(|v| !v.trim().is_empty())
}

fn env_parsed<T: std::str::FromStr>(var_name: &str, expected_type: &str) -> AppResult<Option<T>> {
    env_string(var_name)
        .map(|value| {
            value.trim().parse().map_err(|_| AppError::Config {
                var_name: var_name.to_string(),
                value: value.clone(),
                expected_type: expected_type.to_string(),
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_sigaa() {
        let config = Config::default();
        assert_eq!(config.main_menu_url(), "https://www.sigaa.ufs.br/sigaa/verMenuPrincipal.do");
        assert_eq!(config.error_panel_timeout, Duration::from_secs(1));
        assert_eq!(config.browser_mode, BrowserMode::Headless);
    }

    #[test]
    fn browser_mode_parses_case_insensitively() {
        assert_eq!("Connect".parse::<BrowserMode>().unwrap(), BrowserMode::Connect);
        assert!("remote".parse::<BrowserMode>().is_err());
    }
}
