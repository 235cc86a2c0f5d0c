//! `bitgrab_io_fs` v1:
//! Rust-side directory snapshot-and-restore kernel.
//!
//! A [`DirectoryRecord`] reads every file below a root into memory in one
//! deterministic walk and can later recreate that tree under another root.
//!
//! Modules:
//! - `dir`     : tree walk, capture and replication
//! - `file`    : single-file record
//! - `spec`    : enums/options/errors
//! - `report`  : read-time report model
//! - `version` : build/version summary
//! - `util`    : shared helper functions

pub mod dir;
pub mod file;
pub mod report;
pub mod spec;
mod util;
pub mod version;

pub use dir::DirectoryRecord;
pub use file::FileRecord;
pub use report::{ReportRead, ReportReadBuilder};
pub use spec::{
    EnumReadPatternMode, EnumReadPatternScope, EnumRecordErrorKind, RecordError, SpecReadOptions,
};
pub use version::{show_config, version_summary};
