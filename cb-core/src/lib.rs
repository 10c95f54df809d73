pub mod error;
pub mod file_system;
pub mod paths;
pub mod tracing_init;

pub use error::{CbError, Result};
pub use file_system::{FileSystem, LocalFileSystem};
pub use paths::ContentBlockPaths;
