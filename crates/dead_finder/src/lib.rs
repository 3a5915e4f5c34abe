//! Multi-language dead-file detection.
//!
//! Given a project root, the scanner discovers source files in ~18
//! languages, extracts imports and exports per file, classifies entry
//! points from manifests, conventions and framework heuristics, walks
//! the import graph from those entries, and reports every code file the
//! walk never reaches.
//!
//! ```no_run
//! use dead_finder::{scan, CancelToken, NoProgress, ScanConfig};
//! use logger::StdioLogger;
//!
//! let logger = StdioLogger::new();
//! let result = scan(
//!     "path/to/project",
//!     &ScanConfig::default(),
//!     &logger,
//!     NoProgress,
//!     &CancelToken::new(),
//! )?;
//! println!("{result}");
//! # Ok::<(), dead_finder::ScanError>(())
//! ```

pub mod cfg;
mod entrypoints;
mod framework;
mod graph;
mod patterns;
mod progress;
mod report;
mod scanner;
mod walk;

pub use cfg::{ConfigError, ScanConfig, ScanJSONConfig};
pub use entrypoints::EntryPoint;
pub use progress::{
    CancelToken, NoProgress, ProgressEvent, ProgressHandler, ScanError, ScanPhase,
};
pub use report::{DeadExport, DeadFile, ScanResult, ScanSummary};
pub use scanner::scan;
pub use walk::DEFAULT_SKIPPED_DIRS;
