//! # SIGAA Report Scraper
//!
//! 在 SIGAA 学术门户上填写报表表单、提交并抽取结果的自动化工具
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露能力
//! - `BrowserSession` - 浏览器能力抽象（定位、勾选、填写、点击、读取）
//! - `CdpSession` - 基于 chromiumoxide 的实现，`JsExecutor` 是唯一的 page owner
//! - `MemorySession` - 脚本化的内存实现，用于测试
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，互不依赖
//! - `resolve_filters` / `FilterEngine` - 解析并应用过滤器
//! - `classify` - 读取门户错误面板
//! - `walk` / `parse_instructors` / `normalize_rows` - 表格抽取
//! - `CsvWriter` - 写 CSV 能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一次报表"的完整处理流程
//! - `PortalNavigator` - 主菜单 → 报表表单
//! - `ReportFlow` - 过滤 → 错误分类 → 抽取
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/` - 管理浏览器生命周期，把结果包装成响应
//!
//! ## 模块结构

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{BrowserSession, CdpSession, MemorySession};
pub use models::{ExecutionLog, ExtractionResult, ParamMap, ReportKind};
pub use orchestrator::{run_report, App, ReportRequest, Response};
pub use workflow::{FlowOutput, ReportFlow};
