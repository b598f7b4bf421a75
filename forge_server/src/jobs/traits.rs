use async_trait::async_trait;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;
use tokio::io::AsyncRead;

use super::JobStoreError;

pub type BoxedAsyncRead<'a> = Pin<Box<dyn AsyncRead + Send + 'a>>;

#[async_trait]
pub trait JobStore: Send + Sync {
    /// Allocate a fresh job and its backing directory. Returns the job id.
    async fn create_job(&self) -> Result<String, JobStoreError>;

    /// Stream evidence bytes into a job directory under `filename`.
    async fn store_evidence<'a>(
        &self,
        job_id: &str,
        filename: &str,
        reader: BoxedAsyncRead<'a>,
    ) -> Result<(), JobStoreError>;

    /// Resolve the single evidence file of a job.
    ///
    /// An unknown job is `JobNotFound`; a job with zero files is
    /// `NoEvidence`; a job with more than one file is `MultipleEvidence`
    /// rather than picking one by listing order.
    async fn evidence_file(&self, job_id: &str) -> Result<PathBuf, JobStoreError>;
}

pub type DynJobStore = Arc<dyn JobStore>;
