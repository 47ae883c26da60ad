//! 集成测试公共夹具：脚本化的 SIGAA 页面

#![allow(dead_code)]

use sigaa_report_scraper::infrastructure::{Locator, MemorySession};
use sigaa_report_scraper::models::{FieldKind, ParamMap, ReportForm, ReportKind};
use sigaa_report_scraper::services::error_classifier::{ERROR_ITEMS, ERROR_LIST, PANEL};
use sigaa_report_scraper::workflow::navigation::{menu_steps, NavStep};
use sigaa_report_scraper::Config;

/// 所有下拉框共用的选项
pub const OPTIONS: &[&str] = &[
    "-- SELECIONE --",
    "PRESENCIAL",
    "A DISTÂNCIA",
    "CAMPUS SÃO CRISTÓVÃO",
    "DEPARTAMENTO DE COMPUTAÇÃO",
    "CIÊNCIA DA COMPUTAÇÃO",
    "COMP0393 - ARQUITETURA DE COMPUTADORES - 60h",
];

pub const TURMAS_HTML: &str = r#"
<thead>
  <tr><th>Ano-Período</th><th>Turma</th><th>Docente</th><th>Situação</th><th>Modalidade</th>
      <th>Status</th><th>Horário</th><th>Local</th><th>Alunos</th></tr>
</thead>
<tbody>
  <tr class="destaque"><td colspan="17">COMP0393 - ARQUITETURA DE COMPUTADORES</td></tr>
  <tr>
    <td>2024.2</td><td>Turma 01</td><td>MARIA SILVA (60h)</td><td>ABERTA</td>
    <td>PRESENCIAL</td><td>ATIVA</td><td>35T12</td><td>Sala 10</td><td>40</td>
  </tr>
  <tr><td>linha quebrada</td><td>2</td></tr>
  <tr class="destaque"><td colspan="17">COMP0408 - BANCO DE DADOS - TURMA ESPECIAL</td></tr>
  <tr>
    <td>2024.2</td><td>Turma 02</td><td>JOAO SOUZA (30h), ANA LIMA (30h)</td><td>ABERTA</td>
    <td>PRESENCIAL</td><td>ATIVA</td><td>24M12</td><td>Lab 3</td><td>25</td>
  </tr>
  <tr>
    <td>2024.2</td><td>Turma 03</td><td>A DEFINIR</td><td>ABERTA</td>
    <td>A DISTÂNCIA</td><td>ATIVA</td><td>6N12</td><td>Online</td><td>0</td>
  </tr>
</tbody>
"#;

pub const MATRIZ_HTML: &str = r#"
<caption>Matriz Curricular</caption>
<thead><tr><th>Matrícula</th><th>Nome</th></tr></thead>
<tbody>
  <tr><td>202100001</td><td>ALUNO UM</td></tr>
  <tr><td>202100002</td><td>ALUNO DOIS</td></tr>
  <tr><td>202100003</td><td>ALUNO TRES</td></tr>
</tbody>
"#;

pub fn config() -> Config {
    Config {
        error_panel_timeout: std::time::Duration::from_millis(10),
        ..Config::default()
    }
}

pub fn params(pairs: &[(&str, &str)]) -> ParamMap {
    pairs.iter().copied().collect()
}

pub fn coord_portal() -> Locator {
    Locator::with_text("a, span", "Portal Coord. Graduação")
}

/// 表单页面：所有复选框未勾选，字段为空
pub fn form_session(form: &ReportForm) -> MemorySession {
    let mut session = MemorySession::new().with_clickable(&form.submit);
    for filter in form.filters {
        if let Some(checkbox) = &filter.checkbox {
            session = session.with_checkbox(checkbox, false);
        }
        for field in filter.fields {
            session = match field.kind {
                FieldKind::Text => session.with_field(&field.target),
                FieldKind::Select(_) => session.with_select(&field.target, OPTIONS),
            };
        }
    }
    for fixed in form.fixed_checkboxes {
        session = session.with_checkbox(&fixed.target, false);
    }
    session
}

/// 从主菜单到报表表单的完整页面
pub fn portal_session(kind: ReportKind) -> MemorySession {
    let mut session = form_session(kind.form()).with_clickable(&coord_portal());
    for step in menu_steps(kind) {
        if let NavStep::Hover { target, .. } | NavStep::Click { target, .. } = step {
            session = session.with_clickable(&target);
        }
    }
    session
}

/// 提交后显示错误面板
pub fn with_errors(session: MemorySession, messages: &[&str]) -> MemorySession {
    session
        .with_visible(&PANEL)
        .with_texts(&ERROR_LIST, &["erros"])
        .with_texts(&ERROR_ITEMS, messages)
}
