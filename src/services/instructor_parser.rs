//! 教师单元格解析 - 业务能力层
//!
//! 单元格格式不统一，例如：
//! `MARIA SILVA (60h), JOAO SOUZA (30h) e ANA LIMA (30h)`、`A DEFINIR`

use crate::models::Instructor;

/// 待定教师的标记
pub const TBD_MARKER: &str = "A DEFINIR";

/// 最后一个名字前的连接词
const AND_SEPARATOR: &str = " e ";

/// 解析结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedInstructors {
    pub instructors: Vec<Instructor>,
    /// 第一个括号里的课时
    pub workload: Option<String>,
}

/// 解析教师单元格
pub fn parse_instructors(raw: &str) -> ParsedInstructors {
    let mut segments: Vec<&str> = raw.split(',').collect();
    if segments
        .last()
        .is_some_and(|last| last.contains(AND_SEPARATOR))
    {
        segments = segments
            .into_iter()
            .flat_map(|s| s.split(AND_SEPARATOR))
            .collect();
    }

    let mut parsed = ParsedInstructors::default();
    for segment in segments.into_iter().map(str::trim) {
        if segment.contains('(') && segment.contains(')') {
            let (name, workload) = split_parenthetical(segment);
            if parsed.workload.is_none() {
                parsed.workload = workload;
            }
            if !name.is_empty() {
                parsed.instructors.push(Instructor::named(name));
            }
        } else if segment.contains(TBD_MARKER) {
            parsed.instructors.push(Instructor::named(TBD_MARKER));
        } else if segment.chars().any(char::is_alphanumeric) {
            parsed.instructors.push(Instructor::named(segment));
        }
        // 其余是多余的标点或空段，直接忽略
    }
    parsed
}

/// 拆出括号前的名字和第一个 `(` 与其配对 `)` 之间的内容
fn split_parenthetical(segment: &str) -> (&str, Option<String>) {
    let Some(open) = segment.find('(') else {
        return (segment, None);
    };
    let name = segment[..open].trim();
    let rest = &segment[open + 1..];
    let workload = matching_close(rest)
        .map(|close| rest[..close].trim())
        .filter(|w| !w.is_empty())
        .map(str::to_string);
    (name, workload)
}

/// 在已打开一层括号的文本中找到配对的 `)`
fn matching_close(text: &str) -> Option<usize> {
    let mut depth = 1usize;
    for (index, ch) in text.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(index);
                }
            }
            _ => {}
        }
    }
    None
}
