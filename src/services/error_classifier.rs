//! 错误分类器 - 业务能力层
//!
//! 提交后检查错误面板，把页面状态归结为 `Outcome`

use std::time::Duration;

use tracing::debug;

use crate::error::SessionResult;
use crate::infrastructure::{BrowserSession, Locator};
use crate::models::Outcome;

/// 错误或警告列表（任一可见即视为面板出现）
pub static PANEL: Locator = Locator::css("div[id='painel-erros'] ul.erros, div[id='painel-erros'] ul.warning");
pub static ERROR_LIST: Locator = Locator::css("div[id='painel-erros'] ul.erros");
pub static WARNING_LIST: Locator = Locator::css("div[id='painel-erros'] ul.warning");
pub static ERROR_ITEMS: Locator = Locator::css("div[id='painel-erros'] ul.erros li");
pub static WARNING_ITEMS: Locator = Locator::css("div[id='painel-erros'] ul.warning li");

/// 多条消息之间的分隔符
const MESSAGE_SEPARATOR: &str = ". ";

/// 判断提交结果
///
/// 无法读取页面（超时、面板缺失、脚本错误）一律视为成功
pub async fn classify<S: BrowserSession + ?Sized>(session: &S, wait: Duration) -> Outcome {
    match probe(session, wait).await {
        Ok(Some(message)) => Outcome::Failure(message),
        Ok(None) => Outcome::Success,
        Err(e) => {
            debug!("读取错误面板失败，按无错误处理: {}", e);
            Outcome::Success
        }
    }
}

async fn probe<S: BrowserSession + ?Sized>(session: &S, wait: Duration) -> SessionResult<Option<String>> {
    if !session.wait_until_visible(&PANEL, wait).await? {
        return Ok(None);
    }

    // 优先读取错误列表，没有时退回到警告列表
    let items = if session.count(&ERROR_LIST).await? > 0 {
        &ERROR_ITEMS
    } else if session.count(&WARNING_LIST).await? > 0 {
        &WARNING_ITEMS
    } else {
        return Ok(None);
    };

    let messages = session.inner_texts(items).await?;
    if messages.is_empty() {
        return Ok(None);
    }
    Ok(Some(messages.join(MESSAGE_SEPARATOR)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::MemorySession;

    const WAIT: Duration = Duration::from_millis(1000);

    #[tokio::test]
    async fn error_items_are_joined_in_order() {
        let session = MemorySession::new()
            .with_visible(&PANEL)
            .with_texts(&ERROR_LIST, &["lista"])
            .with_texts(&ERROR_ITEMS, &["X", "Y"]);
        assert_eq!(classify(&session, WAIT).await, Outcome::Failure("X. Y".into()));
    }

    #[tokio::test]
    async fn warnings_are_used_when_no_error_list() {
        let session = MemorySession::new()
            .with_visible(&PANEL)
            .with_texts(&WARNING_LIST, &["lista"])
            .with_texts(&WARNING_ITEMS, &["Nenhuma turma encontrada"]);
        assert_eq!(
            classify(&session, WAIT).await,
            Outcome::Failure("Nenhuma turma encontrada".into())
        );
    }

    #[tokio::test]
    async fn errors_take_precedence_over_warnings() {
        let session = MemorySession::new()
            .with_visible(&PANEL)
            .with_texts(&ERROR_LIST, &["lista"])
            .with_texts(&ERROR_ITEMS, &["Erro"])
            .with_texts(&WARNING_LIST, &["lista"])
            .with_texts(&WARNING_ITEMS, &["Aviso"]);
        assert_eq!(classify(&session, WAIT).await, Outcome::Failure("Erro".into()));
    }

    #[tokio::test]
    async fn absent_panel_is_success() {
        let session = MemorySession::new();
        assert_eq!(classify(&session, WAIT).await, Outcome::Success);
    }

    #[tokio::test]
    async fn empty_list_is_success() {
        let session = MemorySession::new()
            .with_visible(&PANEL)
            .with_texts(&ERROR_LIST, &["lista"]);
        assert_eq!(classify(&session, WAIT).await, Outcome::Success);
    }

    #[tokio::test]
    async fn unreadable_page_is_optimistic_success() {
        let session = MemorySession::new().with_broken(&PANEL);
        assert_eq!(classify(&session, WAIT).await, Outcome::Success);
    }
}
