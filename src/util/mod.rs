// Utility Module
// File operations for keys and results

pub mod file_ops;

pub use file_ops::{export_keys, import_keys, import_record, save_result, FileError, FileResult, KeyRecord};
