pub mod chapter_ops;
pub mod time_format;
