pub mod cache;
pub mod config;
pub mod discover;
pub mod error;
pub mod http_client;
pub mod output;
pub mod probe;
pub mod scanner;
pub mod target;
pub mod utils;

pub use crate::cache::ResumeCache;
pub use crate::config::ScanOptions;
pub use crate::error::{ScanError, TransportError};
pub use crate::probe::ProbeResult;
pub use crate::scanner::{scan, Scanner};
pub use crate::target::ScanTarget;
