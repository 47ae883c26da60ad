//! 浏览器会话能力 - 基础设施层
//!
//! 核心流程只依赖这个 trait，不直接接触 chromiumoxide。

use std::time::Duration;

use async_trait::async_trait;

use crate::error::SessionResult;
use crate::infrastructure::Locator;

/// 下拉框选项的匹配方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelMatch {
    /// 可见文字完全相等（区分大小写）
    Exact,
    /// 可见文字包含给定值
    Contains,
}

impl LabelMatch {
    pub fn matches(self, label: &str, wanted: &str) -> bool {
        match self {
            LabelMatch::Exact => label == wanted,
            LabelMatch::Contains => label.contains(wanted),
        }
    }
}

/// 会话 Cookie
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
}

/// 浏览器会话
///
/// 职责：
/// - 读取和修改当前文档
/// - 不负责会话的打开和关闭（由编排层负责）
/// - 所有等待都有上限，超时视为"不存在"
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// 导航到指定 URL
    async fn navigate(&self, url: &str) -> SessionResult<()>;

    /// 匹配元素数量
    async fn count(&self, locator: &Locator) -> SessionResult<usize>;

    /// 复选框是否已勾选
    async fn is_checked(&self, locator: &Locator) -> SessionResult<bool>;

    /// 勾选复选框
    async fn check(&self, locator: &Locator) -> SessionResult<()>;

    /// 填写文本框
    async fn fill(&self, locator: &Locator, value: &str) -> SessionResult<()>;

    /// 按可见文字选择下拉框选项，返回是否找到匹配的选项
    async fn select_by_label(
        &self,
        locator: &Locator,
        label: &str,
        mode: LabelMatch,
    ) -> SessionResult<bool>;

    /// 点击第一个匹配元素
    async fn click(&self, locator: &Locator) -> SessionResult<()>;

    /// 鼠标悬停在第一个匹配元素上
    async fn hover(&self, locator: &Locator) -> SessionResult<()>;

    /// 所有匹配元素的可见文字（文档顺序）
    async fn inner_texts(&self, locator: &Locator) -> SessionResult<Vec<String>>;

    /// 第一个匹配元素的 innerHTML
    async fn inner_html(&self, locator: &Locator) -> SessionResult<Option<String>>;

    /// 等待元素可见，超时返回 false
    async fn wait_until_visible(&self, locator: &Locator, timeout: Duration)
        -> SessionResult<bool>;

    /// 写入 Cookie
    async fn add_cookie(&self, cookie: &SessionCookie) -> SessionResult<()>;

    /// 读取当前所有 Cookie
    async fn cookies(&self) -> SessionResult<Vec<SessionCookie>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_is_case_sensitive() {
        assert!(LabelMatch::Exact.matches("PRESENCIAL", "PRESENCIAL"));
        assert!(!LabelMatch::Exact.matches("Presencial", "PRESENCIAL"));
        assert!(!LabelMatch::Exact.matches("PRESENCIAL ", "PRESENCIAL"));
    }

    #[test]
    fn contains_match_accepts_code_prefix() {
        assert!(LabelMatch::Contains.matches("COMP0393 - ARQUITETURA DE COMPUTADORES", "COMP0393"));
    }
}
