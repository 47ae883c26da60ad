//! Chrome 会话实现
//!
//! 通过 `JsExecutor` 在真实页面上执行脚本，实现 `BrowserSession`

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::network::CookieParam;
use serde_json::{json, Value as JsonValue};
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, warn};

use crate::error::{SessionError, SessionResult};
use crate::infrastructure::session::{BrowserSession, LabelMatch, SessionCookie};
use crate::infrastructure::{JsExecutor, Locator};

/// 可见性轮询间隔
const VISIBILITY_POLL: Duration = Duration::from_millis(100);

/// 点击后等待页面开始跳转的时间
const CLICK_SETTLE: Duration = Duration::from_millis(250);

/// 基于 chromiumoxide 的浏览器会话
pub struct CdpSession {
    executor: JsExecutor,
    navigation_timeout: Duration,
}

impl CdpSession {
    pub fn new(executor: JsExecutor, navigation_timeout: Duration) -> Self {
        Self {
            executor,
            navigation_timeout,
        }
    }

    pub fn into_executor(self) -> JsExecutor {
        self.executor
    }

    /// 执行脚本；脚本返回 `null` 表示元素不存在
    async fn eval_required<T: serde::de::DeserializeOwned>(
        &self,
        locator: &Locator,
        arg: JsonValue,
        body: &str,
    ) -> SessionResult<T> {
        let value: Option<T> = self.executor.eval_on(locator, &arg, body).await?;
        value.ok_or_else(|| SessionError::ElementNotFound {
            locator: locator.clone(),
        })
    }

    /// 等待由点击触发的页面跳转（没有跳转时超时返回）
    async fn settle_navigation(&self) {
        sleep(CLICK_SETTLE).await;
        match timeout(self.navigation_timeout, self.executor.page().wait_for_navigation()).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => debug!("等待页面跳转时出错: {}", e),
            Err(_) => debug!("点击后 {:?} 内没有页面跳转", self.navigation_timeout),
        }
    }
}

#[async_trait]
impl BrowserSession for CdpSession {
    async fn navigate(&self, url: &str) -> SessionResult<()> {
        debug!("导航到: {}", url);
        let page = self.executor.page();
        match timeout(self.navigation_timeout, page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(SessionError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            }),
            Err(_) => Err(SessionError::Navigation {
                url: url.to_string(),
                reason: format!("超时 ({:?})", self.navigation_timeout),
            }),
        }
    }

    async fn count(&self, locator: &Locator) -> SessionResult<usize> {
        self.executor
            .eval_on(locator, &JsonValue::Null, "return els.length;")
            .await
    }

    async fn is_checked(&self, locator: &Locator) -> SessionResult<bool> {
        self.eval_required(
            locator,
            JsonValue::Null,
            "return els.length === 0 ? null : !!els[0].checked;",
        )
        .await
    }

    async fn check(&self, locator: &Locator) -> SessionResult<()> {
        // click 会触发页面上的 onclick 联动（启用依赖字段）
        let done: bool = self
            .eval_required(
                locator,
                JsonValue::Null,
                "if (els.length === 0) return null; if (!els[0].checked) els[0].click(); return true;",
            )
            .await?;
        debug!("勾选 {} -> {}", locator, done);
        Ok(())
    }

    async fn fill(&self, locator: &Locator, value: &str) -> SessionResult<()> {
        let _: bool = self
            .eval_required(
                locator,
                json!(value),
                r#"if (els.length === 0) return null;
                const el = els[0];
                el.focus();
                el.value = arg;
                el.dispatchEvent(new Event('input', { bubbles: true }));
                el.dispatchEvent(new Event('change', { bubbles: true }));
                return true;"#,
            )
            .await?;
        Ok(())
    }

    async fn select_by_label(
        &self,
        locator: &Locator,
        label: &str,
        mode: LabelMatch,
    ) -> SessionResult<bool> {
        let exact = mode == LabelMatch::Exact;
        self.eval_required(
            locator,
            json!({ "label": label, "exact": exact }),
            r#"if (els.length === 0) return null;
            const select = els[0];
            const option = Array.from(select.options).find(o => {
                const text = (o.text || '').trim();
                return arg.exact ? text === arg.label : text.includes(arg.label);
            });
            if (!option) return false;
            select.value = option.value;
            select.dispatchEvent(new Event('change', { bubbles: true }));
            return true;"#,
        )
        .await
    }

    async fn click(&self, locator: &Locator) -> SessionResult<()> {
        let _: bool = self
            .eval_required(
                locator,
                JsonValue::Null,
                "if (els.length === 0) return null; els[0].click(); return true;",
            )
            .await?;
        self.settle_navigation().await;
        Ok(())
    }

    async fn hover(&self, locator: &Locator) -> SessionResult<()> {
        let _: bool = self
            .eval_required(
                locator,
                JsonValue::Null,
                r#"if (els.length === 0) return null;
                for (const type of ['mouseover', 'mouseenter', 'mousemove']) {
                    els[0].dispatchEvent(new MouseEvent(type, { bubbles: true, view: window }));
                }
                return true;"#,
            )
            .await?;
        Ok(())
    }

    async fn inner_texts(&self, locator: &Locator) -> SessionResult<Vec<String>> {
        self.executor
            .eval_on(
                locator,
                &JsonValue::Null,
                "return els.map(e => (e.innerText || e.textContent || '').trim());",
            )
            .await
    }

    async fn inner_html(&self, locator: &Locator) -> SessionResult<Option<String>> {
        self.executor
            .eval_on(
                locator,
                &JsonValue::Null,
                "return els.length === 0 ? null : els[0].innerHTML;",
            )
            .await
    }

    async fn wait_until_visible(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> SessionResult<bool> {
        let deadline = Instant::now() + timeout;
        loop {
            let visible: bool = self
                .executor
                .eval_on(
                    locator,
                    &JsonValue::Null,
                    "return els.some(e => e.getClientRects().length > 0 && getComputedStyle(e).visibility !== 'hidden');",
                )
                .await?;
            if visible {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            sleep(VISIBILITY_POLL).await;
        }
    }

    async fn add_cookie(&self, cookie: &SessionCookie) -> SessionResult<()> {
        let param = CookieParam::builder()
            .name(cookie.name.clone())
            .value(cookie.value.clone())
            .domain(cookie.domain.clone())
            .path(cookie.path.clone())
            .build()
            .map_err(SessionError::Cookie)?;
        self.executor.page().set_cookie(param).await.map_err(|e| {
            warn!("写入 Cookie {} 失败: {}", cookie.name, e);
            SessionError::Cookie(e.to_string())
        })?;
        Ok(())
    }

    async fn cookies(&self) -> SessionResult<Vec<SessionCookie>> {
        let cookies = self.executor.page().get_cookies().await?;
        Ok(cookies
            .into_iter()
            .map(|c| SessionCookie {
                name: c.name,
                value: c.value,
                domain: c.domain,
                path: c.path,
            })
            .collect())
    }
}
