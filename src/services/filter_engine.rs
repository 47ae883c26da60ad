//! 过滤器应用引擎 - 业务能力层
//!
//! 按顺序勾选复选框、填写依赖字段，最后提交表单。
//! 单个字段失败只记录日志，不中断后续处理；
//! 组合是否被门户接受由错误分类器在提交后统一判断。

use tracing::{debug, info, warn};

use crate::error::{FieldError, SessionError};
use crate::infrastructure::{BrowserSession, Locator};
use crate::models::{ExecutionLog, FieldKind, FieldSpec, FilterSpec, ReportForm};

/// 一次应用过程的汇总
#[derive(Debug, Default)]
pub struct ApplyReport {
    /// 处理过的过滤器数量
    pub filters: usize,
    /// 失败的字段（已写入执行日志）
    pub failures: Vec<FieldError>,
    /// 提交按钮是否点击成功
    pub submitted: bool,
}

/// 过滤器应用引擎
///
/// 不持有会话，只借用
pub struct FilterEngine<'a, S: BrowserSession + ?Sized> {
    session: &'a S,
}

impl<'a, S: BrowserSession + ?Sized> FilterEngine<'a, S> {
    pub fn new(session: &'a S) -> Self {
        Self { session }
    }

    /// 应用过滤器并提交表单
    ///
    /// 从不返回错误：所有失败都记录在执行日志和 `ApplyReport` 中
    pub async fn apply(
        &self,
        form: &ReportForm,
        specs: &[FilterSpec],
        log: &mut ExecutionLog,
    ) -> ApplyReport {
        let mut report = ApplyReport::default();

        for spec in specs {
            debug!("应用过滤器: {}", spec.name);
            report.filters += 1;

            if let Some(checkbox) = &spec.checkbox {
                if let Err(e) = self.activate(checkbox, &spec.name, log).await {
                    Self::record(FieldError::new(&spec.name, checkbox.clone(), e), log, &mut report);
                }
            }

            for field in spec.fields.iter().filter(|f| !f.value.is_empty()) {
                if let Err(e) = self.fill_field(&spec.name, field, log).await {
                    Self::record(
                        FieldError::new(&spec.name, field.target.clone(), e),
                        log,
                        &mut report,
                    );
                }
            }
        }

        for fixed in form.fixed_checkboxes {
            if let Err(e) = self.activate(&fixed.target, fixed.label, log).await {
                Self::record(FieldError::new(fixed.label, fixed.target.clone(), e), log, &mut report);
            }
        }

        report.submitted = self.submit(form, log).await;

        info!(
            "✓ 已应用 {} 个过滤器，失败字段 {} 个",
            report.filters,
            report.failures.len()
        );
        report
    }

    /// 勾选复选框（已勾选时不再点击，避免取消勾选）
    async fn activate(
        &self,
        checkbox: &Locator,
        name: &str,
        log: &mut ExecutionLog,
    ) -> Result<(), SessionError> {
        if self.session.is_checked(checkbox).await? {
            log.push(format!("Checkbox '{}' já estava marcado.", name));
            return Ok(());
        }
        self.session.check(checkbox).await?;
        log.push(format!("Checkbox '{}' marcado.", name));
        Ok(())
    }

    async fn fill_field(
        &self,
        filter: &str,
        field: &FieldSpec,
        log: &mut ExecutionLog,
    ) -> Result<(), SessionError> {
        match field.kind {
            FieldKind::Text => {
                self.session.fill(&field.target, &field.value).await?;
                log.push(format!(
                    "Campo '{}' preenchido com valor '{}'.",
                    field.target, field.value
                ));
            }
            FieldKind::Select(mode) => {
                let matched = self
                    .session
                    .select_by_label(&field.target, &field.value, mode)
                    .await?;
                if matched {
                    log.push(format!(
                        "Filtro '{}' selecionado com valor '{}'.",
                        filter, field.value
                    ));
                } else {
                    // 没有匹配的选项时保持原样，由错误分类器暴露问题
                    debug!("下拉框 {} 中没有选项 '{}'", field.target, field.value);
                }
            }
        }
        Ok(())
    }

    async fn submit(&self, form: &ReportForm, log: &mut ExecutionLog) -> bool {
        match self.session.click(&form.submit).await {
            Ok(()) => {
                log.push(format!("Botão '{}' clicado.", form.submit_label));
                true
            }
            Err(e) => {
                warn!("点击提交按钮失败: {}", e);
                log.push(format!(
                    "Erro ao clicar no botão '{}': {}",
                    form.submit_label, e
                ));
                false
            }
        }
    }

    fn record(error: FieldError, log: &mut ExecutionLog, report: &mut ApplyReport) {
        warn!("字段应用失败: {}", error);
        log.push(format!(
            "Erro ao aplicar filtro '{}': {}",
            error.filter, error.source
        ));
        report.failures.push(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::{Interaction, MemorySession};
    use crate::models::forms::{ALUNOS_APTOS_FORM, TURMAS_FORM};
    use crate::models::ParamMap;
    use crate::services::field_resolver::resolve_filters;
    use tokio_test::block_on;

    fn loc(id: &str) -> Locator {
        Locator::id(id)
    }

    fn turmas_page() -> MemorySession {
        MemorySession::new()
            .with_checkbox(&loc("form:checkModalidadeCurso"), false)
            .with_select(&loc("form:modalidadeCurso"), &["PRESENCIAL", "A DISTÂNCIA"])
            .with_checkbox(&loc("form:checkHorario"), true)
            .with_field(&loc("form:horario"))
            .with_checkbox(&loc("form:checkDocente"), false)
            .with_field(&loc("form:nomeDocente"))
            .with_clickable(&TURMAS_FORM.submit)
    }

    fn params(pairs: &[(&str, &str)]) -> ParamMap {
        pairs.iter().copied().collect()
    }

    #[test]
    fn applies_filters_and_submits_once() {
        let session = turmas_page();
        let specs = resolve_filters(
            &TURMAS_FORM,
            &params(&[("modalidadeCurso", "PRESENCIAL"), ("horario", "24M12")]),
        );
        let mut log = ExecutionLog::new();
        let report = block_on(FilterEngine::new(&session).apply(&TURMAS_FORM, &specs, &mut log));

        assert!(report.submitted);
        assert!(report.failures.is_empty());
        assert_eq!(session.is_checked_now(&loc("form:checkModalidadeCurso")), Some(true));
        assert_eq!(session.selected_label(&loc("form:modalidadeCurso")).as_deref(), Some("PRESENCIAL"));
        assert_eq!(session.field_value(&loc("form:horario")).as_deref(), Some("24M12"));
        assert_eq!(session.click_count(&TURMAS_FORM.submit), 1);
        assert!(log.contains("Checkbox 'modalidadeCurso' marcado."));
        assert!(log.contains("Checkbox 'horario' já estava marcado."));
        assert_eq!(log.last(), Some("Botão 'Buscar' clicado."));
    }

    #[test]
    fn already_checked_box_is_never_clicked() {
        let session = turmas_page();
        let specs = resolve_filters(&TURMAS_FORM, &params(&[("horario", "35T34")]));
        let mut log = ExecutionLog::new();
        block_on(FilterEngine::new(&session).apply(&TURMAS_FORM, &specs, &mut log));
        assert!(!session
            .history()
            .iter()
            .any(|i| matches!(i, Interaction::Check(_))));
        assert_eq!(session.is_checked_now(&loc("form:checkHorario")), Some(true));
    }

    #[test]
    fn missing_control_is_logged_and_processing_continues() {
        // departamento 的控件在页面上不存在
        let session = turmas_page();
        let specs = resolve_filters(
            &TURMAS_FORM,
            &params(&[("departamento", "DCOMP"), ("nomeDocente", "ANA")]),
        );
        let mut log = ExecutionLog::new();
        let report = block_on(FilterEngine::new(&session).apply(&TURMAS_FORM, &specs, &mut log));

        assert_eq!(report.failures.len(), 2);
        assert!(report.failures.iter().all(|f| f.filter == "departamento"));
        assert_eq!(session.field_value(&loc("form:nomeDocente")).as_deref(), Some("ANA"));
        assert!(report.submitted);
        assert!(log.contains("Erro ao aplicar filtro 'departamento'"));
    }

    #[test]
    fn unmatched_option_is_silent() {
        let session = turmas_page();
        let specs = resolve_filters(&TURMAS_FORM, &params(&[("modalidadeCurso", "presencial")]));
        let mut log = ExecutionLog::new();
        let report = block_on(FilterEngine::new(&session).apply(&TURMAS_FORM, &specs, &mut log));
        assert!(report.failures.is_empty());
        assert_eq!(session.selected_label(&loc("form:modalidadeCurso")), None);
        assert!(!log.contains("selecionado"));
    }

    #[test]
    fn submit_failure_is_logged_not_raised() {
        let session = MemorySession::new();
        let mut log = ExecutionLog::new();
        let report = block_on(FilterEngine::new(&session).apply(&TURMAS_FORM, &[], &mut log));
        assert!(!report.submitted);
        assert!(log.contains("Erro ao clicar no botão 'Buscar'"));
    }

    #[test]
    fn fixed_checkbox_is_ticked_after_filters() {
        let fixed = &ALUNOS_APTOS_FORM.fixed_checkboxes[0].target;
        let component = &ALUNOS_APTOS_FORM.filters[0].fields[0].target;
        let session = MemorySession::new()
            .with_select(component, &["COMP0393 - ARQUITETURA DE COMPUTADORES"])
            .with_field(&Locator::css(r#"input[id="form:inputAno"]"#))
            .with_field(&Locator::css(r#"input[id="form:inputPeriodo"]"#))
            .with_checkbox(fixed, false)
            .with_clickable(&ALUNOS_APTOS_FORM.submit);
        let specs = resolve_filters(
            &ALUNOS_APTOS_FORM,
            &params(&[("componenteCurricular", "COMP0393"), ("anoPeriodoIngresso", "2022.2")]),
        );
        let mut log = ExecutionLog::new();
        let report =
            block_on(FilterEngine::new(&session).apply(&ALUNOS_APTOS_FORM, &specs, &mut log));

        assert!(report.failures.is_empty());
        assert_eq!(session.is_checked_now(fixed), Some(true));
        assert_eq!(
            session.selected_label(component).as_deref(),
            Some("COMP0393 - ARQUITETURA DE COMPUTADORES")
        );
        assert_eq!(
            session.field_value(&Locator::css(r#"input[id="form:inputPeriodo"]"#)).as_deref(),
            Some("2")
        );
        assert_eq!(log.last(), Some("Botão 'Gerar Relatório' clicado."));
    }
}
