//! 报表表格遍历 - 业务能力层
//!
//! 表体由两类行交替组成：
//! - 标题行：一个横跨全部列的单元格，文字为 `代码 - 名称`
//! - 数据行：至少 9 个单元格，归属于最近的标题行
//!
//! 当前分节作为折叠状态在遍历中传递，不使用共享可变状态。

use scraper::{ElementRef, Html, Node};

use crate::models::forms::{MIN_DATA_CELLS, REPORT_COLUMNS};
use crate::models::ReportSection;

/// 标题行中代码与名称的分隔符
const HEADER_SEPARATOR: &str = " - ";

/// 单行的分类结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKind {
    Header(ReportSection),
    Data(Vec<String>),
    /// 单元格不足的行
    Short(usize),
}

/// 归属到分节的数据行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkedRow {
    pub section: ReportSection,
    pub cells: Vec<String>,
}

/// 遍历结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Walk {
    pub rows: Vec<WalkedRow>,
    pub headers: usize,
    pub skipped: usize,
}

/// 遍历表格，按文档顺序返回数据行
///
/// `table_html` 是表格元素的 innerHTML
pub fn walk(table_html: &str) -> Walk {
    let (_, walk) = classify_rows(table_html).into_iter().fold(
        (ReportSection::default(), Walk::default()),
        |(section, mut walk), row| match row {
            RowKind::Header(next) => {
                walk.headers += 1;
                (next, walk)
            }
            RowKind::Data(cells) => {
                walk.rows.push(WalkedRow {
                    section: section.clone(),
                    cells,
                });
                (section, walk)
            }
            RowKind::Short(_) => {
                walk.skipped += 1;
                (section, walk)
            }
        },
    );
    walk
}

/// 表体行数（可修读学生报表只需要这个数）
pub fn count_body_rows(table_html: &str) -> usize {
    let document = parse_table(table_html);
    body_rows(&document).count()
}

/// 对表体的每一行分类
pub fn classify_rows(table_html: &str) -> Vec<RowKind> {
    let document = parse_table(table_html);
    body_rows(&document).map(classify_row).collect()
}

fn classify_row(row: ElementRef<'_>) -> RowKind {
    let cells: Vec<ElementRef<'_>> = child_elements(row)
        .filter(|c| matches!(c.value().name(), "td" | "th"))
        .collect();

    if let [only] = cells.as_slice() {
        if spans_full_width(*only) {
            return RowKind::Header(parse_header(&cell_text(*only)));
        }
    }
    if cells.len() < MIN_DATA_CELLS {
        return RowKind::Short(cells.len());
    }
    RowKind::Data(cells.into_iter().map(cell_text).collect())
}

fn spans_full_width(cell: ElementRef<'_>) -> bool {
    cell.value()
        .attr("colspan")
        .and_then(|span| span.trim().parse::<usize>().ok())
        == Some(REPORT_COLUMNS)
}

/// 解析标题行文字；只使用前两段，名称中再出现的分隔符不再处理
pub fn parse_header(text: &str) -> ReportSection {
    let mut parts = text.split(HEADER_SEPARATOR);
    ReportSection {
        code: parts.next().unwrap_or("").trim().to_string(),
        title: parts.next().unwrap_or("").trim().to_string(),
    }
}

/// innerHTML 需要包在 table 里，否则 tr/td 会被 HTML 解析器丢弃
fn parse_table(table_html: &str) -> Html {
    Html::parse_fragment(&format!("<table>{}</table>", table_html))
}

/// 外层表格 tbody 中的直接子行（嵌套表格的行不算）
fn body_rows(document: &Html) -> impl Iterator<Item = ElementRef<'_>> {
    let root = document.root_element();
    let table = child_elements(root).find(|e| e.value().name() == "table");
    table
        .into_iter()
        .flat_map(child_elements)
        .filter(|e| e.value().name() == "tbody")
        .flat_map(child_elements)
        .filter(|e| e.value().name() == "tr")
}

fn child_elements(element: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    element.children().filter_map(ElementRef::wrap)
}

/// 会在渲染文字中断开的元素
const BREAKING_ELEMENTS: &[&str] = &[
    "br", "p", "div", "li", "ul", "ol", "table", "tr", "td", "th", "h1", "h2", "h3", "h4", "h5",
    "h6",
];

/// 单元格文字：行内标记不拆开单词，换行和块级元素之间按空白处理
fn cell_text(cell: ElementRef<'_>) -> String {
    let mut raw = String::new();
    push_text(cell, &mut raw);
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn push_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(inner) => {
                let Some(inner_ref) = ElementRef::wrap(child) else {
                    continue;
                };
                let breaking = BREAKING_ELEMENTS.contains(&inner.name());
                if breaking {
                    out.push(' ');
                }
                push_text(inner_ref, out);
                if breaking {
                    out.push(' ');
                }
            }
            _ => {}
        }
    }
}
