pub mod builder;
pub mod formatter;

pub use builder::finalize_report;
pub use formatter::format_report_markdown;
