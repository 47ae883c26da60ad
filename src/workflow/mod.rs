pub mod navigation;
pub mod report_flow;

pub use navigation::{NavStep, PortalNavigator};
pub use report_flow::{FlowOutput, ReportFlow};
