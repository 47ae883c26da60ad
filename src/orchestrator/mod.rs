//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责一次报表请求的资源管理和流程调度。
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::run_report (一次请求 → Response)
//!     ↓
//! workflow::PortalNavigator (主菜单 → 报表表单)
//! workflow::ReportFlow (过滤 → 错误分类 → 抽取)
//!     ↓
//! services (能力层：filter / classify / walk / normalize)
//!     ↓
//! infrastructure (基础设施：BrowserSession)
//! ```
//!
//! ## 设计原则
//!
//! 1. **资源隔离**：只有编排层持有 Browser
//! 2. **统一出口**：致命错误在这里转换为 status 500
//! 3. **向下依赖**：编排层 → workflow → services → infrastructure

pub mod app;

pub use app::{execute_on, run_report, App, ReportRequest, Response, Resultado};
