//! 报表数据模型

use serde::Serialize;

use crate::models::forms::{
    ColumnMapping, Extraction, ReportForm, ALUNOS_APTOS_FORM, ALUNOS_APTOS_TABLE, MATRIZ_CAPTION,
    TURMAS_FORM, TURMAS_TABLE,
};
use crate::models::outcome::ExecutionLog;

/// 报表种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum ReportKind {
    /// 查询班级
    Turmas,
    /// 查询班级（额外读取状态、授课方式和地点列）
    TurmasDetalhadas,
    /// 可修读某门课程的学生数量
    AlunosAptos,
}

impl ReportKind {
    /// 对应的表单
    pub fn form(self) -> &'static ReportForm {
        match self {
            ReportKind::Turmas | ReportKind::TurmasDetalhadas => &TURMAS_FORM,
            ReportKind::AlunosAptos => &ALUNOS_APTOS_FORM,
        }
    }

    /// 对应的抽取方式
    pub fn extraction(self) -> Extraction {
        match self {
            ReportKind::Turmas => Extraction::Records {
                table: TURMAS_TABLE,
                mapping: ColumnMapping::BASIC,
            },
            ReportKind::TurmasDetalhadas => Extraction::Records {
                table: TURMAS_TABLE,
                mapping: ColumnMapping::DETAILED,
            },
            ReportKind::AlunosAptos => Extraction::Count {
                table: ALUNOS_APTOS_TABLE,
                caption: MATRIZ_CAPTION,
            },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ReportKind::Turmas => "Consultar Turmas",
            ReportKind::TurmasDetalhadas => "Consultar Turmas (detalhado)",
            ReportKind::AlunosAptos => "Alunos Aptos a Cursar Determinado Componente Curricular",
        }
    }
}

/// 报表分节（由标题行建立，作用到下一个标题行之前的所有数据行）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportSection {
    pub code: String,
    pub title: String,
}

/// 授课教师
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instructor {
    /// 预留给下游身份匹配，本流程始终不设置
    pub id: Option<String>,
    pub name: String,
}

impl Instructor {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }
}

/// 班级记录（输出的最终记录）
///
/// 可选字段只在详细报表中填充
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSection {
    pub section_code: String,
    pub course_code: String,
    pub course_title: String,
    pub term: String,
    pub instructors: Vec<Instructor>,
    pub workload: Option<String>,
    pub schedule: String,
    pub enrolled_count: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub situation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// 抽取到的数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ReportData {
    #[serde(rename = "turmas")]
    Records(Vec<CourseSection>),
    #[serde(rename = "alunosAptos")]
    Count(usize),
}

/// 抽取结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionResult {
    #[serde(rename = "logs")]
    pub log: ExecutionLog,
    #[serde(flatten)]
    pub data: ReportData,
}

impl ExtractionResult {
    pub fn records(&self) -> &[CourseSection] {
        match &self.data {
            ReportData::Records(records) => records,
            ReportData::Count(_) => &[],
        }
    }
}
