use serde::Serialize;
use tracing::debug;

/// 提交结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// 页面没有显示错误或警告
    Success,
    /// 门户拒绝了过滤条件（消息按文档顺序以 ". " 连接）
    Failure(String),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }
}

/// 执行日志
///
/// 一次运行内只追加不修改，运行结束后随结果一起返回给调用方
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExecutionLog(Vec<String>);

impl ExecutionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一条日志
    pub fn push(&mut self, entry: impl Into<String>) {
        let entry = entry.into();
        debug!("📝 {}", entry);
        self.0.push(entry);
    }

    pub fn entries(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// 是否有某条日志包含给定片段
    pub fn contains(&self, fragment: &str) -> bool {
        self.0.iter().any(|e| e.contains(fragment))
    }
}
