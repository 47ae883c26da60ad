pub mod filter;
pub mod forms;
pub mod outcome;
pub mod report;

pub use filter::{FieldDef, FieldKind, FieldSpec, FilterDef, FilterSpec, ParamMap, ValueSource};
pub use forms::{ColumnMapping, Extraction, FixedCheckbox, ReportForm};
pub use outcome::{ExecutionLog, Outcome};
pub use report::{CourseSection, ExtractionResult, Instructor, ReportData, ReportKind, ReportSection};
