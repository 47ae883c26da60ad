//! 静态表单描述
//!
//! 每种报表对应一张过滤器表、一组固定复选框、一个提交按钮和一种抽取方式。
//! 过滤器按声明顺序与页面交互，与调用方传入参数的顺序无关。

use crate::infrastructure::{LabelMatch, Locator};
use crate::models::filter::{FieldDef, FieldKind, FilterDef, ValueSource};

/// 报表表格的固定列宽（标题行跨越全部列）
pub const REPORT_COLUMNS: usize = 17;

/// 数据行至少需要的单元格数
pub const MIN_DATA_CELLS: usize = 9;

/// 始终需要勾选的复选框
#[derive(Debug, Clone)]
pub struct FixedCheckbox {
    /// 日志中显示的名称
    pub label: &'static str,
    pub target: Locator,
}

/// 报表表单
#[derive(Debug, Clone)]
pub struct ReportForm {
    pub filters: &'static [FilterDef],
    pub fixed_checkboxes: &'static [FixedCheckbox],
    pub submit: Locator,
    /// 提交按钮上的文字（用于日志）
    pub submit_label: &'static str,
}

/// 数据行的列映射（下标从 0 开始）
///
/// 可选列只在详细报表中读取
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping {
    pub term: usize,
    pub section_code: usize,
    pub instructors: usize,
    pub schedule: usize,
    pub enrolled: usize,
    pub situation: Option<usize>,
    pub modality: Option<usize>,
    pub status: Option<usize>,
    pub location: Option<usize>,
}

impl ColumnMapping {
    pub const BASIC: ColumnMapping = ColumnMapping {
        term: 0,
        section_code: 1,
        instructors: 2,
        schedule: 6,
        enrolled: 8,
        situation: None,
        modality: None,
        status: None,
        location: None,
    };

    pub const DETAILED: ColumnMapping = ColumnMapping {
        situation: Some(3),
        modality: Some(4),
        status: Some(5),
        location: Some(7),
        ..ColumnMapping::BASIC
    };
}

/// 抽取方式
#[derive(Debug, Clone)]
pub enum Extraction {
    /// 逐行生成记录
    Records { table: Locator, mapping: ColumnMapping },
    /// 只统计表体行数
    Count { table: Locator, caption: &'static str },
}

const fn select(id: &'static str, param: &'static str) -> FieldDef {
    FieldDef {
        target: Locator::css(id),
        kind: FieldKind::Select(LabelMatch::Exact),
        source: ValueSource::Param(param),
    }
}

const fn text(id: &'static str, param: &'static str) -> FieldDef {
    FieldDef {
        target: Locator::css(id),
        kind: FieldKind::Text,
        source: ValueSource::Param(param),
    }
}

/// 复选框 + 依赖字段（用结构体字面量，保证字段切片在 static 中得到 'static 生命周期）
macro_rules! filter {
    ($name:literal, $checkbox:literal, [$($field:expr),+ $(,)?] $(,)?) => {
        FilterDef {
            name: $name,
            checkbox: Some(Locator::css($checkbox)),
            fields: &[$($field),+],
        }
    };
}

// ========== 查询班级（Consultar Turmas） ==========

static TURMAS_FILTERS: &[FilterDef] = &[
    filter!(
        "modalidadeCurso",
        r#"[id="form:checkModalidadeCurso"]"#,
        [select(r#"[id="form:modalidadeCurso"]"#, "modalidadeCurso")],
    ),
    filter!(
        "modalidadeTurma",
        r#"[id="form:checkModalidadeTurma"]"#,
        [select(r#"[id="form:modalidadeTurma"]"#, "modalidadeTurma")],
    ),
    filter!(
        "centroOuCampus",
        r#"[id="form:checkCentro"]"#,
        [select(r#"[id="form:centro"]"#, "centroOuCampus")],
    ),
    filter!(
        "departamento",
        r#"[id="form:checkUnidade"]"#,
        [select(r#"[id="form:unidade"]"#, "departamento")],
    ),
    filter!(
        "cursoReservado",
        r#"[id="form:checkCurso"]"#,
        [select(r#"[id="form:curso"]"#, "cursoReservado")],
    ),
    filter!(
        "horario",
        r#"[id="form:checkHorario"]"#,
        [text(r#"[id="form:horario"]"#, "horario")],
    ),
    filter!(
        "codigoComponente",
        r#"[id="form:checkCodigo"]"#,
        [text(r#"[id="form:codigoComponente"]"#, "codigoComponente")],
    ),
    filter!(
        "nomeComponente",
        r#"[id="form:checkDisciplina"]"#,
        [text(r#"[id="form:nomeDisciplina"]"#, "nomeComponente")],
    ),
    filter!(
        "nomeDocente",
        r#"[id="form:checkDocente"]"#,
        [text(r#"[id="form:nomeDocente"]"#, "nomeDocente")],
    ),
    filter!(
        "codigoTurma",
        r#"[id="form:checkCodigoTurma"]"#,
        [text(r#"[id="form:codigoTurma"]"#, "codigoTurma")],
    ),
];

pub static TURMAS_FORM: ReportForm = ReportForm {
    filters: TURMAS_FILTERS,
    fixed_checkboxes: &[],
    submit: Locator::css("input[value='Buscar']"),
    submit_label: "Buscar",
};

/// 班级列表表格
pub const TURMAS_TABLE: Locator = Locator::css("table.listagem");

// ========== 可修读学生（Alunos Aptos） ==========

static ALUNOS_APTOS_FILTERS: &[FilterDef] = &[
    FilterDef {
        name: "componenteCurricular",
        checkbox: None,
        fields: &[FieldDef {
            target: Locator::new("tr", Some("Componente Curricular"), Some("td:nth-of-type(2) select")),
            kind: FieldKind::Select(LabelMatch::Contains),
            source: ValueSource::Param("componenteCurricular"),
        }],
    },
    FilterDef {
        name: "anoPeriodoIngresso",
        checkbox: None,
        fields: &[
            FieldDef {
                target: Locator::css(r#"input[id="form:inputAno"]"#),
                kind: FieldKind::Text,
                source: ValueSource::Split {
                    param: "anoPeriodoIngresso",
                    separator: '.',
                    index: 0,
                },
            },
            FieldDef {
                target: Locator::css(r#"input[id="form:inputPeriodo"]"#),
                kind: FieldKind::Text,
                source: ValueSource::Split {
                    param: "anoPeriodoIngresso",
                    separator: '.',
                    index: 1,
                },
            },
        ],
    },
];

pub static ALUNOS_APTOS_FORM: ReportForm = ReportForm {
    filters: ALUNOS_APTOS_FILTERS,
    fixed_checkboxes: &[FixedCheckbox {
        label: "Listar Apenas Alunos Habilitados a Cursar o Componente",
        target: Locator::new(
            "tr",
            Some("Listar Apenas Alunos Habilitados a Cursar o Componente"),
            Some("td:first-child input[type='checkbox']"),
        ),
    }],
    submit: Locator::css("input[value='Gerar Relatório']"),
    submit_label: "Gerar Relatório",
};

/// 可修读学生报表的标题
pub const MATRIZ_CAPTION: &str = "Matriz Curricular";

/// 可修读学生表格
pub const ALUNOS_APTOS_TABLE: Locator = Locator::with_text("table", MATRIZ_CAPTION);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turmas_filters_follow_declared_order() {
        let names: Vec<_> = TURMAS_FORM.filters.iter().map(|f| f.name).collect();
        assert_eq!(
            names,
            [
                "modalidadeCurso",
                "modalidadeTurma",
                "centroOuCampus",
                "departamento",
                "cursoReservado",
                "horario",
                "codigoComponente",
                "nomeComponente",
                "nomeDocente",
                "codigoTurma"
            ]
        );
    }

    #[test]
    fn detailed_mapping_reads_reserved_columns() {
        assert_eq!(ColumnMapping::DETAILED.schedule, 6);
        assert_eq!(ColumnMapping::DETAILED.location, Some(7));
        assert_eq!(ColumnMapping::BASIC.status, None);
    }

    #[test]
    fn alunos_aptos_form_uses_fixed_checkbox() {
        assert_eq!(ALUNOS_APTOS_FORM.fixed_checkboxes.len(), 1);
        assert!(ALUNOS_APTOS_FORM.filters.iter().all(|f| f.checkbox.is_none()));
    }
}
