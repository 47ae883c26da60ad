//! 元素定位器
//!
//! 门户的菜单、按钮和报表表格往往只能通过标题文字识别，
//! 所以定位器在 CSS 选择器之外还支持"包含文字"和"内部选择器"两级收窄。

use std::borrow::Cow;
use std::fmt;

/// 元素定位器
///
/// 解析规则：
/// 1. `css` 匹配所有候选元素
/// 2. 若设置了 `has_text`，只保留渲染文字包含该短语的**最内层**元素
/// 3. 若设置了 `inner`，在每个候选元素内部再执行一次 `querySelector`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator {
    css: Cow<'static, str>,
    has_text: Option<Cow<'static, str>>,
    inner: Option<Cow<'static, str>>,
}

impl Locator {
    /// 完整构造（可用于 static 表）
    pub const fn new(
        css: &'static str,
        has_text: Option<&'static str>,
        inner: Option<&'static str>,
    ) -> Self {
        Self {
            css: Cow::Borrowed(css),
            has_text: match has_text {
                Some(text) => Some(Cow::Borrowed(text)),
                None => None,
            },
            inner: match inner {
                Some(inner) => Some(Cow::Borrowed(inner)),
                None => None,
            },
        }
    }

    /// 仅 CSS 选择器
    pub const fn css(css: &'static str) -> Self {
        Self::new(css, None, None)
    }

    /// CSS 选择器 + 文字过滤
    pub const fn with_text(css: &'static str, text: &'static str) -> Self {
        Self::new(css, Some(text), None)
    }

    /// 按 id 定位（JSF 生成的 id 含冒号，不能直接写成 `#form:x`）
    pub fn id(id: impl Into<String>) -> Self {
        Self {
            css: Cow::Owned(format!("[id=\"{}\"]", id.into())),
            has_text: None,
            inner: None,
        }
    }

    /// 运行时构造的 CSS 定位器
    pub fn owned(css: impl Into<String>) -> Self {
        Self {
            css: Cow::Owned(css.into()),
            has_text: None,
            inner: None,
        }
    }

    pub fn css_selector(&self) -> &str {
        &self.css
    }

    pub fn text_filter(&self) -> Option<&str> {
        self.has_text.as_deref()
    }

    pub fn inner_selector(&self) -> Option<&str> {
        self.inner.as_deref()
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.css)?;
        if let Some(text) = &self.has_text {
            write!(f, ":has-text(\"{}\")", text)?;
        }
        if let Some(inner) = &self.inner {
            write!(f, " >> {}", inner)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_every_stage() {
        let loc = Locator::new("tr", Some("Componente Curricular"), Some("select"));
        assert_eq!(
            loc.to_string(),
            "tr:has-text(\"Componente Curricular\") >> select"
        );
    }

    #[test]
    fn id_locator_quotes_jsf_ids() {
        assert_eq!(Locator::id("form:inputAno").to_string(), "[id=\"form:inputAno\"]");
    }

    #[test]
    fn static_and_owned_locators_compare_equal() {
        assert_eq!(Locator::css("ul.erros"), Locator::owned("ul.erros"));
    }
}
