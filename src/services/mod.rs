pub mod csv_writer;
pub mod error_classifier;
pub mod field_resolver;
pub mod filter_engine;
pub mod instructor_parser;
pub mod row_normalizer;
pub mod table_walker;

pub use csv_writer::CsvWriter;
pub use error_classifier::classify;
pub use field_resolver::resolve_filters;
pub use filter_engine::{ApplyReport, FilterEngine};
pub use instructor_parser::{parse_instructors, ParsedInstructors};
pub use row_normalizer::{normalize_row, normalize_rows};
pub use table_walker::{count_body_rows, walk, Walk, WalkedRow};
