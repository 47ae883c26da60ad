//! CSV 写入服务
//!
//! 只负责把班级记录按固定列顺序写出，不关心流程

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::CourseSection;

/// 固定列顺序
pub const COLUMNS: [&str; 10] = [
    "Disciplina",
    "Semestre",
    "Turma",
    "Docente",
    "Situação",
    "Modalidade",
    "Status",
    "Código e Horário",
    "Local",
    "Alunos",
];

/// CSV 写入服务
pub struct CsvWriter {
    path: String,
}

impl CsvWriter {
    pub fn with_path(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// 覆盖写入全部记录
    pub fn write(&self, records: &[CourseSection]) -> AppResult<()> {
        debug!("写入 CSV: {} ({} 条记录)", self.path, records.len());
        let file = File::create(Path::new(&self.path)).map_err(|e| AppError::file(&self.path, e))?;
        write_records(file, records)
    }
}

/// 写入到任意输出
pub fn write_records<W: Write>(out: W, records: &[CourseSection]) -> AppResult<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(COLUMNS)?;
    for record in records {
        writer.write_record(row(record))?;
    }
    writer.flush().map_err(|e| AppError::file("csv", e))?;
    Ok(())
}

fn row(record: &CourseSection) -> [String; 10] {
    [
        discipline(record),
        record.term.clone(),
        record.section_code.clone(),
        instructors(record),
        record.situation.clone().unwrap_or_default(),
        record.modality.clone().unwrap_or_default(),
        record.status.clone().unwrap_or_default(),
        record.schedule.clone(),
        record.location.clone().unwrap_or_default(),
        record.enrolled_count.clone(),
    ]
}

fn discipline(record: &CourseSection) -> String {
    if record.course_title.is_empty() {
        record.course_code.clone()
    } else {
        format!("{} - {}", record.course_code, record.course_title)
    }
}

/// 教师名用 ", " 连接，课时附在第一个名字后
fn instructors(record: &CourseSection) -> String {
    record
        .instructors
        .iter()
        .enumerate()
        .map(|(i, instructor)| match (&record.workload, i) {
            (Some(workload), 0) => format!("{} ({})", instructor.name, workload),
            _ => instructor.name.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}
