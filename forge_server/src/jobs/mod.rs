pub mod filesystem;
pub mod traits;

pub use filesystem::FileSystemJobStore;
pub use traits::{BoxedAsyncRead, DynJobStore, JobStore};

use crate::config::StorageConfig;
use anyhow::Result;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JobStoreError {
    #[error("job not found")]
    JobNotFound,

    #[error("no evidence uploaded")]
    NoEvidence,

    #[error("job contains multiple evidence files")]
    MultipleEvidence,

    #[error("invalid evidence filename: {0}")]
    InvalidFilename(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Reject filenames that could escape a job directory. Evidence is stored
/// under the client-supplied name, so separators and dot components must
/// never reach the filesystem layer.
pub fn sanitize_filename(filename: &str) -> Result<(), JobStoreError> {
    if filename.is_empty()
        || filename == "."
        || filename == ".."
        || filename.contains('/')
        || filename.contains('\\')
        || filename.contains('\0')
    {
        return Err(JobStoreError::InvalidFilename(filename.to_string()));
    }
    Ok(())
}

pub async fn create_job_store(config: &StorageConfig) -> Result<DynJobStore> {
    let store = FileSystemJobStore::new(config.job_root.clone());
    store.init().await?;
    Ok(Arc::new(store))
}
