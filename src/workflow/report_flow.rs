//! 报表处理流程 - 流程层
//!
//! 流程顺序：
//! 1. 解析过滤器 → 应用并提交
//! 2. 错误分类（门户拒绝时到此为止）
//! 3. 遍历表格 → 解析教师 → 归一化记录（或只统计行数）

use std::time::Duration;

use tracing::{info, warn};

use crate::config::Config;
use crate::infrastructure::{BrowserSession, Locator};
use crate::models::{
    ColumnMapping, ExecutionLog, Extraction, ExtractionResult, Outcome, ParamMap, ReportData,
    ReportKind,
};
use crate::services::{classify, count_body_rows, normalize_rows, resolve_filters, walk, FilterEngine};

/// 流程结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutput {
    /// 门户接受了过滤条件，并完成抽取
    Extracted(ExtractionResult),
    /// 门户拒绝了过滤条件
    Rejected { log: ExecutionLog, message: String },
}

impl FlowOutput {
    pub fn log(&self) -> &ExecutionLog {
        match self {
            FlowOutput::Extracted(result) => &result.log,
            FlowOutput::Rejected { log, .. } => log,
        }
    }
}

/// 报表处理流程
///
/// - 不持有会话，只依赖 `BrowserSession` 能力
/// - 不负责导航和会话生命周期
pub struct ReportFlow {
    error_panel_timeout: Duration,
}

impl ReportFlow {
    pub fn new(config: &Config) -> Self {
        Self {
            error_panel_timeout: config.error_panel_timeout,
        }
    }

    pub fn with_timeout(error_panel_timeout: Duration) -> Self {
        Self {
            error_panel_timeout,
        }
    }

    /// 在已经打开的报表表单上执行完整流程
    pub async fn run<S: BrowserSession + ?Sized>(
        &self,
        session: &S,
        kind: ReportKind,
        params: &ParamMap,
        mut log: ExecutionLog,
    ) -> FlowOutput {
        let form = kind.form();
        let specs = resolve_filters(form, params);
        info!("🔍 {}：{} 个过滤器待应用", kind.name(), specs.len());

        FilterEngine::new(session).apply(form, &specs, &mut log).await;

        match classify(session, self.error_panel_timeout).await {
            Outcome::Failure(message) => {
                warn!("⚠️ 门户拒绝了过滤条件: {}", message);
                log.push(format!("Erro ao aplicar filtros: {}", message));
                FlowOutput::Rejected { log, message }
            }
            Outcome::Success => {
                log.push("Nenhum erro encontrado ao aplicar os filtros.");
                let data = match kind.extraction() {
                    Extraction::Records { table, mapping } => {
                        ReportData::Records(self.extract_records(session, &table, &mapping, &mut log).await)
                    }
                    Extraction::Count { table, caption } => {
                        ReportData::Count(self.count_rows(session, &table, caption, &mut log).await)
                    }
                };
                FlowOutput::Extracted(ExtractionResult { log, data })
            }
        }
    }

    async fn extract_records<S: BrowserSession + ?Sized>(
        &self,
        session: &S,
        table: &Locator,
        mapping: &ColumnMapping,
        log: &mut ExecutionLog,
    ) -> Vec<crate::models::CourseSection> {
        let html = match session.inner_html(table).await {
            Ok(Some(html)) => html,
            Ok(None) => {
                log.push("Tabela de turmas não encontrada.");
                return Vec::new();
            }
            Err(e) => {
                log.push(format!("Ocorreu um erro ao extrair os dados: {}", e));
                return Vec::new();
            }
        };

        let walk = walk(&html);
        if walk.skipped > 0 {
            log.push(format!(
                "{} linha(s) ignorada(s) por estarem incompletas.",
                walk.skipped
            ));
        }
        let records = normalize_rows(&walk.rows, mapping);
        info!(
            "✓ 抽取完成: {} 个分节, {} 条记录, 跳过 {} 行",
            walk.headers,
            records.len(),
            walk.skipped
        );
        log.push(format!(
            "Dados das turmas extraídos com sucesso ({} turmas).",
            records.len()
        ));
        records
    }

    async fn count_rows<S: BrowserSession + ?Sized>(
        &self,
        session: &S,
        table: &Locator,
        caption: &str,
        log: &mut ExecutionLog,
    ) -> usize {
        let count = match session.inner_html(table).await {
            Ok(Some(html)) => count_body_rows(&html),
            Ok(None) => {
                log.push(format!("Tabela '{}' não encontrada.", caption));
                0
            }
            Err(e) => {
                log.push(format!("Ocorreu um erro ao extrair os dados: {}", e));
                return 0;
            }
        };
        info!("✓ 统计完成: {} 名学生", count);
        log.push("Quantidade de alunos aptos extraída com sucesso.");
        count
    }
}
