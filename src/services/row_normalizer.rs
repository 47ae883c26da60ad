//! 行归一化 - 业务能力层
//!
//! 分节 + 数据行 + 教师解析结果 => `CourseSection`

use crate::models::{ColumnMapping, CourseSection};
use crate::services::instructor_parser::parse_instructors;
use crate::services::table_walker::WalkedRow;

/// 把一行数据转换为班级记录
///
/// 不做额外校验：缺失的单元格按空字符串处理
pub fn normalize_row(row: &WalkedRow, mapping: &ColumnMapping) -> CourseSection {
    let cell = |index: usize| row.cells.get(index).map(String::as_str).unwrap_or("");
    let optional = |index: Option<usize>| index.map(|i| cell(i).to_string());

    let parsed = parse_instructors(cell(mapping.instructors));

    CourseSection {
        section_code: section_code(cell(mapping.section_code)),
        course_code: row.section.code.clone(),
        course_title: row.section.title.clone(),
        term: cell(mapping.term).to_string(),
        instructors: parsed.instructors,
        workload: parsed.workload,
        schedule: cell(mapping.schedule).to_string(),
        enrolled_count: cell(mapping.enrolled).to_string(),
        situation: optional(mapping.situation),
        modality: optional(mapping.modality),
        status: optional(mapping.status),
        location: optional(mapping.location),
    }
}

/// 批量归一化
pub fn normalize_rows(rows: &[WalkedRow], mapping: &ColumnMapping) -> Vec<CourseSection> {
    rows.iter().map(|row| normalize_row(row, mapping)).collect()
}

/// 单元格形如 `Turma 01`，取第一个空格后的片段；没有空格时保留原文
fn section_code(text: &str) -> String {
    let text = text.trim();
    match text.split_once(' ') {
        Some((_, rest)) => rest.split(' ').next().unwrap_or("").to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReportSection;

    fn row(cells: &[&str]) -> WalkedRow {
        WalkedRow {
            section: ReportSection {
                code: "COMP0393".into(),
                title: "ARQUITETURA DE COMPUTADORES".into(),
            },
            cells: cells.iter().map(|c| c.to_string()).collect(),
        }
    }

    const CELLS: [&str; 9] = [
        "2024.1",
        "Turma 01",
        "MARIA SILVA (60h), JOAO SOUZA (30h)",
        "ABERTA",
        "PRESENCIAL",
        "REGULAR",
        "24M12",
        "Sala 10",
        "35",
    ];

    #[test]
    fn basic_mapping_fills_core_fields() {
        let record = normalize_row(&row(&CELLS), &ColumnMapping::BASIC);
        assert_eq!(record.section_code, "01");
        assert_eq!(record.course_code, "COMP0393");
        assert_eq!(record.course_title, "ARQUITETURA DE COMPUTADORES");
        assert_eq!(record.term, "2024.1");
        assert_eq!(record.instructors.len(), 2);
        assert_eq!(record.workload.as_deref(), Some("60h"));
        assert_eq!(record.schedule, "24M12");
        assert_eq!(record.enrolled_count, "35");
        assert_eq!(record.location, None);
        assert_eq!(record.status, None);
    }

    #[test]
    fn detailed_mapping_fills_optional_fields() {
        let record = normalize_row(&row(&CELLS), &ColumnMapping::DETAILED);
        assert_eq!(record.situation.as_deref(), Some("ABERTA"));
        assert_eq!(record.modality.as_deref(), Some("PRESENCIAL"));
        assert_eq!(record.status.as_deref(), Some("REGULAR"));
        assert_eq!(record.location.as_deref(), Some("Sala 10"));
    }

    #[test]
    fn empty_cells_still_emit_a_record() {
        let record = normalize_row(&row(&[""; 9]), &ColumnMapping::BASIC);
        assert_eq!(record.section_code, "");
        assert!(record.instructors.is_empty());
        assert_eq!(record.course_code, "COMP0393");
    }

    #[test]
    fn section_code_without_space_is_kept() {
        assert_eq!(section_code("T01"), "T01");
        assert_eq!(section_code("Turma 02 (Reserva)"), "02");
    }
}
