use thiserror::Error;

use crate::infrastructure::Locator;

/// 浏览器会话能力错误
///
/// 由 `BrowserSession` 的各项操作返回，调用方决定是否致命
#[derive(Debug, Error)]
pub enum SessionError {
    /// 定位器没有匹配到任何元素
    #[error("元素不存在: {locator}")]
    ElementNotFound { locator: Locator },

    /// 执行脚本失败
    #[error("执行脚本失败: {0}")]
    Script(String),

    /// 导航失败
    #[error("导航到 {url} 失败: {reason}")]
    Navigation { url: String, reason: String },

    /// Cookie 操作失败
    #[error("Cookie 操作失败: {0}")]
    Cookie(String),

    /// 脚本返回值无法解析
    #[error("脚本返回值解析失败: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<chromiumoxide::error::CdpError> for SessionError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        SessionError::Script(err.to_string())
    }
}

/// 单个字段/复选框的应用失败
///
/// 非致命：记录到执行日志后继续处理下一个字段
#[derive(Debug, Error)]
#[error("{filter} / {locator}: {source}")]
pub struct FieldError {
    /// 所属过滤器的逻辑名
    pub filter: String,
    /// 出错的控件
    pub locator: Locator,
    #[source]
    pub source: SessionError,
}

impl FieldError {
    pub fn new(filter: impl Into<String>, locator: Locator, source: SessionError) -> Self {
        Self {
            filter: filter.into(),
            locator,
            source,
        }
    }
}

/// 应用程序错误类型（致命错误，在最外层转换为 status 500）
#[derive(Debug, Error)]
pub enum AppError {
    /// 连接浏览器失败
    #[error("无法连接到浏览器 (端口: {port}): {source}")]
    BrowserConnection {
        port: u16,
        #[source]
        source: chromiumoxide::error::CdpError,
    },

    /// 启动浏览器失败
    #[error("启动浏览器失败: {0}")]
    BrowserLaunch(String),

    /// 门户导航失败
    #[error("门户导航失败 ({step}): {source}")]
    Navigation {
        step: String,
        #[source]
        source: SessionError,
    },

    /// 浏览器会话错误
    #[error(transparent)]
    Session(#[from] SessionError),

    /// 参数错误
    #[error("参数错误: {0}")]
    Params(String),

    /// 配置错误
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    Config {
        var_name: String,
        value: String,
        expected_type: String,
    },

    /// 文件操作错误
    #[error("文件操作失败 ({path}): {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV 写入失败
    #[error("CSV 写入失败: {0}")]
    Csv(#[from] csv::Error),
}

impl AppError {
    /// 创建导航错误
    pub fn navigation(step: impl Into<String>, source: SessionError) -> Self {
        AppError::Navigation {
            step: step.into(),
            source,
        }
    }

    /// 创建文件错误
    pub fn file(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File {
            path: path.into(),
            source,
        }
    }
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

/// 会话操作结果类型
pub type SessionResult<T> = Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn field_error_exposes_session_cause() {
        let err = FieldError::new(
            "departamento",
            Locator::id("form:unidade"),
            SessionError::ElementNotFound {
                locator: Locator::id("form:unidade"),
            },
        );
        assert!(err.to_string().starts_with("departamento / [id=\"form:unidade\"]"));
        assert!(err.source().is_some());
    }

    #[test]
    fn navigation_error_names_step() {
        let err = AppError::navigation("Portal Coord. Graduação", SessionError::Script("boom".into()));
        assert!(err.to_string().contains("Portal Coord. Graduação"));
    }
}
