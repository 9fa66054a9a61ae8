pub mod cleanup;
pub mod deletion;
pub mod error;
pub mod filter;
pub mod lock;
pub mod tag_check;

#[cfg(test)]
mod testing;

pub use cleanup::{CleanupOptions, CleanupOrchestrator, CleanupResult, LibraryTarget};
pub use deletion::{plan_series, DeletionExecutor, DeletionReport};
pub use error::CleanupError;
pub use filter::{filter_recent, InvalidWindow, RecencyWindow};
pub use lock::RunLock;
pub use tag_check::{check_temporary, is_marked_temporary, TagCheck};
