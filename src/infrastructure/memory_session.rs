//! 内存会话
//!
//! 按定位器脚本化的文档状态，用于离线运行和测试。
//! 所有元素以 `Locator` 的显示字符串为键。

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{SessionError, SessionResult};
use crate::infrastructure::session::{BrowserSession, LabelMatch, SessionCookie};
use crate::infrastructure::Locator;

/// 会话中发生的一次交互
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    Navigate(String),
    Check(String),
    Fill(String, String),
    Select(String, String),
    Click(String),
    Hover(String),
}

#[derive(Debug, Default)]
struct Document {
    checkboxes: HashMap<String, bool>,
    fields: HashMap<String, String>,
    selects: HashMap<String, (Vec<String>, Option<String>)>,
    clickable: HashSet<String>,
    texts: HashMap<String, Vec<String>>,
    html: HashMap<String, String>,
    visible: HashSet<String>,
    broken: HashSet<String>,
    cookies: Vec<SessionCookie>,
    history: Vec<Interaction>,
}

/// 内存中的浏览器会话
#[derive(Debug, Default)]
pub struct MemorySession {
    doc: Mutex<Document>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    fn doc(&self) -> MutexGuard<'_, Document> {
        // 测试线程 panic 后锁会中毒，这里仍然继续读取状态
        self.doc.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// 添加复选框
    pub fn with_checkbox(self, locator: &Locator, checked: bool) -> Self {
        self.doc().checkboxes.insert(locator.to_string(), checked);
        self
    }

    /// 添加文本框
    pub fn with_field(self, locator: &Locator) -> Self {
        self.doc().fields.insert(locator.to_string(), String::new());
        self
    }

    /// 添加下拉框
    pub fn with_select(self, locator: &Locator, options: &[&str]) -> Self {
        let options = options.iter().map(|o| o.to_string()).collect();
        self.doc().selects.insert(locator.to_string(), (options, None));
        self
    }

    /// 添加可点击元素（按钮、链接、菜单项）
    pub fn with_clickable(self, locator: &Locator) -> Self {
        self.doc().clickable.insert(locator.to_string());
        self
    }

    /// 设置定位器匹配到的元素文字（每个元素一项）
    pub fn with_texts(self, locator: &Locator, texts: &[&str]) -> Self {
        let texts = texts.iter().map(|t| t.to_string()).collect();
        self.doc().texts.insert(locator.to_string(), texts);
        self
    }

    /// 设置元素的 innerHTML
    pub fn with_html(self, locator: &Locator, html: impl Into<String>) -> Self {
        self.doc().html.insert(locator.to_string(), html.into());
        self
    }

    /// 标记元素可见
    pub fn with_visible(self, locator: &Locator) -> Self {
        self.doc().visible.insert(locator.to_string());
        self
    }

    /// 让针对该定位器的所有操作失败
    pub fn with_broken(self, locator: &Locator) -> Self {
        self.doc().broken.insert(locator.to_string());
        self
    }

    /// 替换某个定位器的 innerHTML（模拟提交后页面变化）
    pub fn set_html(&self, locator: &Locator, html: impl Into<String>) {
        self.doc().html.insert(locator.to_string(), html.into());
    }

    pub fn is_checked_now(&self, locator: &Locator) -> Option<bool> {
        self.doc().checkboxes.get(&locator.to_string()).copied()
    }

    pub fn field_value(&self, locator: &Locator) -> Option<String> {
        self.doc().fields.get(&locator.to_string()).cloned()
    }

    pub fn selected_label(&self, locator: &Locator) -> Option<String> {
        self.doc()
            .selects
            .get(&locator.to_string())
            .and_then(|(_, selected)| selected.clone())
    }

    /// 全部交互记录（按发生顺序）
    pub fn history(&self) -> Vec<Interaction> {
        self.doc().history.clone()
    }

    /// 某个元素被点击的次数
    pub fn click_count(&self, locator: &Locator) -> usize {
        let key = locator.to_string();
        self.doc()
            .history
            .iter()
            .filter(|i| matches!(i, Interaction::Click(k) if *k == key))
            .count()
    }

    fn guard(doc: &Document, key: &str) -> SessionResult<()> {
        if doc.broken.contains(key) {
            return Err(SessionError::Script(format!("{} 操作失败", key)));
        }
        Ok(())
    }

    fn missing(locator: &Locator) -> SessionError {
        SessionError::ElementNotFound {
            locator: locator.clone(),
        }
    }
}

#[async_trait]
impl BrowserSession for MemorySession {
    async fn navigate(&self, url: &str) -> SessionResult<()> {
        let mut doc = self.doc();
        Self::guard(&doc, url)?;
        doc.history.push(Interaction::Navigate(url.to_string()));
        Ok(())
    }

    async fn count(&self, locator: &Locator) -> SessionResult<usize> {
        let doc = self.doc();
        let key = locator.to_string();
        Self::guard(&doc, &key)?;
        let present = doc.checkboxes.contains_key(&key)
            || doc.fields.contains_key(&key)
            || doc.selects.contains_key(&key)
            || doc.clickable.contains(&key)
            || doc.html.contains_key(&key);
        Ok(match doc.texts.get(&key) {
            Some(texts) => texts.len(),
            None => usize::from(present),
        })
    }

    async fn is_checked(&self, locator: &Locator) -> SessionResult<bool> {
        let doc = self.doc();
        let key = locator.to_string();
        Self::guard(&doc, &key)?;
        doc.checkboxes
            .get(&key)
            .copied()
            .ok_or_else(|| Self::missing(locator))
    }

    async fn check(&self, locator: &Locator) -> SessionResult<()> {
        let mut doc = self.doc();
        let key = locator.to_string();
        Self::guard(&doc, &key)?;
        let state = doc
            .checkboxes
            .get_mut(&key)
            .ok_or_else(|| Self::missing(locator))?;
        *state = true;
        doc.history.push(Interaction::Check(key));
        Ok(())
    }

    async fn fill(&self, locator: &Locator, value: &str) -> SessionResult<()> {
        let mut doc = self.doc();
        let key = locator.to_string();
        Self::guard(&doc, &key)?;
        let field = doc
            .fields
            .get_mut(&key)
            .ok_or_else(|| Self::missing(locator))?;
        *field = value.to_string();
        doc.history.push(Interaction::Fill(key, value.to_string()));
        Ok(())
    }

    async fn select_by_label(
        &self,
        locator: &Locator,
        label: &str,
        mode: LabelMatch,
    ) -> SessionResult<bool> {
        let mut doc = self.doc();
        let key = locator.to_string();
        Self::guard(&doc, &key)?;
        let (options, selected) = doc
            .selects
            .get_mut(&key)
            .ok_or_else(|| Self::missing(locator))?;
        let Some(option) = options.iter().find(|o| mode.matches(o, label)).cloned() else {
            return Ok(false);
        };
        *selected = Some(option.clone());
        doc.history.push(Interaction::Select(key, option));
        Ok(true)
    }

    async fn click(&self, locator: &Locator) -> SessionResult<()> {
        let mut doc = self.doc();
        let key = locator.to_string();
        Self::guard(&doc, &key)?;
        if !doc.clickable.contains(&key) {
            return Err(Self::missing(locator));
        }
        doc.history.push(Interaction::Click(key));
        Ok(())
    }

    async fn hover(&self, locator: &Locator) -> SessionResult<()> {
        let mut doc = self.doc();
        let key = locator.to_string();
        Self::guard(&doc, &key)?;
        if !doc.clickable.contains(&key) {
            return Err(Self::missing(locator));
        }
        doc.history.push(Interaction::Hover(key));
        Ok(())
    }

    async fn inner_texts(&self, locator: &Locator) -> SessionResult<Vec<String>> {
        let doc = self.doc();
        let key = locator.to_string();
        Self::guard(&doc, &key)?;
        Ok(doc.texts.get(&key).cloned().unwrap_or_default())
    }

    async fn inner_html(&self, locator: &Locator) -> SessionResult<Option<String>> {
        let doc = self.doc();
        let key = locator.to_string();
        Self::guard(&doc, &key)?;
        Ok(doc.html.get(&key).cloned())
    }

    async fn wait_until_visible(
        &self,
        locator: &Locator,
        _timeout: Duration,
    ) -> SessionResult<bool> {
        let doc = self.doc();
        let key = locator.to_string();
        Self::guard(&doc, &key)?;
        Ok(doc.visible.contains(&key))
    }

    async fn add_cookie(&self, cookie: &SessionCookie) -> SessionResult<()> {
        let mut doc = self.doc();
        doc.cookies.retain(|c| c.name != cookie.name);
        doc.cookies.push(cookie.clone());
        Ok(())
    }

    async fn cookies(&self) -> SessionResult<Vec<SessionCookie>> {
        Ok(self.doc().cookies.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unchecked_box_becomes_checked() {
        let cb = Locator::id("form:checkHorario");
        let session = MemorySession::new().with_checkbox(&cb, false);
        session.check(&cb).await.unwrap();
        assert_eq!(session.is_checked_now(&cb), Some(true));
    }

    #[tokio::test]
    async fn unknown_option_is_reported_as_unmatched() {
        let sel = Locator::id("form:modalidade");
        let session = MemorySession::new().with_select(&sel, &["PRESENCIAL", "A DISTÂNCIA"]);
        let matched = session
            .select_by_label(&sel, "presencial", LabelMatch::Exact)
            .await
            .unwrap();
        assert!(!matched);
        assert_eq!(session.selected_label(&sel), None);
    }

    #[tokio::test]
    async fn broken_locator_fails_every_operation() {
        let field = Locator::id("form:horario");
        let session = MemorySession::new().with_field(&field).with_broken(&field);
        assert!(session.fill(&field, "24M12").await.is_err());
        assert!(session.count(&field).await.is_err());
    }
}
