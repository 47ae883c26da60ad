//! 门户导航 - 流程层
//!
//! 从主菜单走到报表表单。导航失败属于致命错误，直接向上返回。

use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::infrastructure::{BrowserSession, Locator};
use crate::models::{ExecutionLog, ReportKind};

/// 导航步骤
#[derive(Debug, Clone)]
pub enum NavStep {
    /// 打开地址
    Open { url: String, log: &'static str },
    /// 点击（元素必须存在）
    Click { target: Locator, log: &'static str },
    /// 元素存在时才点击
    ClickIfPresent { target: Locator, log: &'static str },
    /// 目标不可见时先点击 `via` 展开
    ClickVia {
        target: Locator,
        via: Locator,
        direct_log: &'static str,
        via_log: &'static str,
    },
    /// 鼠标悬停（展开菜单）
    Hover { target: Locator, log: &'static str },
}

impl NavStep {
    fn describe(&self) -> String {
        match self {
            NavStep::Open { url, .. } => url.clone(),
            NavStep::Click { target, .. }
            | NavStep::ClickIfPresent { target, .. }
            | NavStep::ClickVia { target, .. }
            | NavStep::Hover { target, .. } => target.to_string(),
        }
    }
}

const fn main_item(text: &'static str) -> Locator {
    Locator::with_text("td.ThemeOfficeMainItem", text)
}

const fn menu_item(text: &'static str) -> Locator {
    Locator::with_text("td.ThemeOfficeMenuItemText", text)
}

/// 进入协调员门户之前的公共步骤
pub fn portal_steps(main_menu_url: &str) -> Vec<NavStep> {
    vec![
        NavStep::Open {
            url: main_menu_url.to_string(),
            log: "Acessou a página de Menu Principal do SIGAA.",
        },
        NavStep::ClickIfPresent {
            target: Locator::with_text("button, a, span", "Ciente"),
            log: "Aceitou os cookies.",
        },
        NavStep::ClickIfPresent {
            target: Locator::with_text("a", "Chefia/Diretoria"),
            log: "Entrou na página de vínculos e clicou em 'Chefia/Diretoria'.",
        },
        NavStep::ClickIfPresent {
            target: Locator::with_text("a, button, input, span", "Entrar no Portal Docente"),
            log: "Entrou na página de aviso de férias de docentes e clicou em 'Entrar no Portal Docente'.",
        },
        NavStep::ClickVia {
            target: Locator::with_text("a, span", "Portal Coord. Graduação"),
            via: Locator::with_text("a, span", "Módulos"),
            direct_log: "Clicou em 'Portal Coord. Graduação'.",
            via_log: "Clicou em Módulos e depois em 'Portal Coord. Graduação'.",
        },
    ]
}

/// 报表菜单路径
pub fn menu_steps(kind: ReportKind) -> Vec<NavStep> {
    match kind {
        ReportKind::Turmas | ReportKind::TurmasDetalhadas => vec![
            NavStep::Hover {
                target: main_item("Turmas"),
                log: "Passou o mouse sobre 'Turmas'.",
            },
            NavStep::Click {
                target: menu_item("Consultar Turmas"),
                log: "Clicou em 'Consultar Turmas'.",
            },
        ],
        ReportKind::AlunosAptos => vec![
            NavStep::Hover {
                target: main_item("Relatórios"),
                log: "Passou o mouse sobre 'Relatórios'.",
            },
            NavStep::Hover {
                target: main_item("Discentes"),
                log: "Passou o mouse sobre 'Discentes'.",
            },
            NavStep::Click {
                target: menu_item("Alunos Aptos a Cursar Determinado Componente Curricular"),
                log: "Clicou em 'Alunos Aptos a Cursar Determinado Componente Curricular'.",
            },
        ],
    }
}

/// 门户导航器
pub struct PortalNavigator<'a, S: BrowserSession + ?Sized> {
    session: &'a S,
}

impl<'a, S: BrowserSession + ?Sized> PortalNavigator<'a, S> {
    pub fn new(session: &'a S) -> Self {
        Self { session }
    }

    /// 从主菜单走到报表表单
    pub async fn open_report(
        &self,
        main_menu_url: &str,
        kind: ReportKind,
        log: &mut ExecutionLog,
    ) -> AppResult<()> {
        info!("🧭 正在打开报表: {}", kind.name());
        let steps = portal_steps(main_menu_url)
            .into_iter()
            .chain(menu_steps(kind));
        for step in steps {
            self.run_step(&step, log)
                .await
                .map_err(|e| AppError::navigation(step.describe(), e))?;
        }
        Ok(())
    }

    /// 执行单个步骤
    pub async fn run_step(
        &self,
        step: &NavStep,
        log: &mut ExecutionLog,
    ) -> Result<(), crate::error::SessionError> {
        debug!("导航步骤: {}", step.describe());
        match step {
            NavStep::Open { url, log: entry } => {
                self.session.navigate(url).await?;
                log.push(*entry);
            }
            NavStep::Click { target, log: entry } => {
                self.session.click(target).await?;
                log.push(*entry);
            }
            NavStep::ClickIfPresent { target, log: entry } => {
                if self.session.count(target).await? > 0 {
                    self.session.click(target).await?;
                    log.push(*entry);
                }
            }
            NavStep::ClickVia {
                target,
                via,
                direct_log,
                via_log,
            } => {
                if self.session.count(target).await? == 0 {
                    self.session.click(via).await?;
                    self.session.click(target).await?;
                    log.push(*via_log);
                } else {
                    self.session.click(target).await?;
                    log.push(*direct_log);
                }
            }
            NavStep::Hover { target, log: entry } => {
                self.session.hover(target).await?;
                log.push(*entry);
            }
        }
        Ok(())
    }
}
