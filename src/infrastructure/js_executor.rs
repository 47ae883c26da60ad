//! JS 执行器 - 基础设施层
//!
//! 持有唯一的 page 资源，只暴露"执行 JS"的能力

use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use crate::error::SessionResult;
use crate::infrastructure::Locator;

/// 在页面中解析 [`Locator`] 的 JS 函数
///
/// 文字过滤只保留最内层的匹配元素，避免外层布局表格一起命中
const LOCATE_FN: &str = r#"
const __locate = (css, text, inner) => {
    let nodes = Array.from(document.querySelectorAll(css));
    if (text !== null) {
        nodes = nodes.filter(n => (n.innerText || n.textContent || '').includes(text));
        nodes = nodes.filter(n => !nodes.some(o => o !== n && n.contains(o)));
    }
    if (inner !== null) {
        nodes = nodes.map(n => n.querySelector(inner)).filter(n => n !== null);
    }
    return nodes;
};
"#;

/// JS 执行器
///
/// 职责：
/// - 持有唯一的 Page 资源
/// - 暴露 eval() 能力
/// - 不认识过滤器和报表
pub struct JsExecutor {
    page: Page,
}

impl JsExecutor {
    /// 创建新的 JS 执行器
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 获取 page 的引用（用于导航、Cookie 等非脚本操作）
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// 交出 page（用于关闭页面）
    pub fn into_page(self) -> Page {
        self.page
    }

    /// 执行 JS 代码并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> SessionResult<JsonValue> {
        let result = self.page.evaluate(js_code.into()).await?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> SessionResult<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }

    /// 针对定位器执行脚本
    ///
    /// `body` 中可以使用 `els`（匹配到的元素数组）和 `arg`（额外参数）
    pub async fn eval_on<T: DeserializeOwned>(
        &self,
        locator: &Locator,
        arg: &JsonValue,
        body: &str,
    ) -> SessionResult<T> {
        let script = Self::script_for(locator, arg, body)?;
        self.eval_as(script).await
    }

    fn script_for(locator: &Locator, arg: &JsonValue, body: &str) -> SessionResult<String> {
        let css = serde_json::to_string(locator.css_selector())?;
        let text = serde_json::to_string(&locator.text_filter())?;
        let inner = serde_json::to_string(&locator.inner_selector())?;
        let arg = serde_json::to_string(arg)?;
        Ok(format!(
            "(() => {{ {LOCATE_FN} const els = __locate({css}, {text}, {inner}); const arg = {arg}; {body} }})()"
        ))
    }
}
