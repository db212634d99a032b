//! apiforge CLI library

#![allow(clippy::missing_errors_doc)]

pub mod options;
pub mod prompt;
pub mod sink;

pub use options::{BuildFormat, ConflictArg, KindArg};
pub use prompt::{render_diff, TerminalInteraction, TerminalOracle};
pub use sink::FileSystemSink;
