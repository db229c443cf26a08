pub mod acquire;
pub mod client;
pub mod progress;
#[cfg(test)]
pub(crate) mod testing;

pub use acquire::{Acquirer, DownloadAcquirer};
pub use client::{DownloadEntry, Downloader};
pub use progress::{DownloadProgressFn, OperationProgressFn, ProgressOptions};
