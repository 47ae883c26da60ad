//! 基础设施层
//!
//! 唯一持有浏览器页面的层，向上只暴露 `BrowserSession` 能力

pub mod cdp_session;
pub mod js_executor;
pub mod locator;
pub mod memory_session;
pub mod session;

pub use cdp_session::CdpSession;
pub use js_executor::JsExecutor;
pub use locator::Locator;
pub use memory_session::{Interaction, MemorySession};
pub use session::{BrowserSession, LabelMatch, SessionCookie};
