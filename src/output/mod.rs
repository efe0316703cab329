pub mod formatter;

pub use formatter::{TitleRecord, csv_header, format_record};
