use super::traits::{BoxedAsyncRead, JobStore};
use super::{sanitize_filename, JobStoreError};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use uuid::Uuid;

pub struct FileSystemJobStore {
    root_dir: PathBuf,
}

impl FileSystemJobStore {
    pub fn new(root_dir: PathBuf) -> Self {
        Self { root_dir }
    }

    pub async fn init(&self) -> Result<(), JobStoreError> {
        fs::create_dir_all(&self.root_dir).await?;
        Ok(())
    }

    fn job_path(&self, job_id: &str) -> PathBuf {
        self.root_dir.join(job_id)
    }
}

#[async_trait]
impl JobStore for FileSystemJobStore {
    async fn create_job(&self) -> Result<String, JobStoreError> {
        let job_id = Uuid::new_v4().to_string();
        fs::create_dir_all(self.job_path(&job_id)).await?;

        tracing::debug!("Created job directory: {}", job_id);
        Ok(job_id)
    }

    async fn store_evidence<'a>(
        &self,
        job_id: &str,
        filename: &str,
        mut reader: BoxedAsyncRead<'a>,
    ) -> Result<(), JobStoreError> {
        sanitize_filename(filename)?;

        let job_path = self.job_path(job_id);
        if !job_path.is_dir() {
            return Err(JobStoreError::JobNotFound);
        }

        let path = job_path.join(filename);
        let temp_path = job_path.join(format!("{filename}.tmp"));

        let mut file = fs::File::create(&temp_path).await?;
        let mut buffer = vec![0u8; 64 * 1024];
        let mut total_written = 0u64;

        loop {
            let n = reader.read(&mut buffer).await?;
            if n == 0 {
                break;
            }
            file.write_all(&buffer[..n]).await?;
            total_written += n as u64;
        }

        file.sync_all().await?;
        drop(file);

        fs::rename(&temp_path, &path).await?;

        tracing::debug!(
            "Stored {} bytes of evidence as {}/{}",
            total_written,
            job_id,
            filename
        );
        Ok(())
    }

    async fn evidence_file(&self, job_id: &str) -> Result<PathBuf, JobStoreError> {
        // Job ids are generated UUIDs; anything else never names a job and
        // must not be joined onto the storage root.
        if Uuid::parse_str(job_id).is_err() {
            return Err(JobStoreError::JobNotFound);
        }

        let job_path = self.job_path(job_id);
        let mut entries = match fs::read_dir(&job_path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(JobStoreError::JobNotFound);
            }
            Err(e) => return Err(e.into()),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                files.push(entry.path());
            }
        }
        files.sort();

        if files.is_empty() {
            return Err(JobStoreError::NoEvidence);
        }
        if files.len() > 1 {
            return Err(JobStoreError::MultipleEvidence);
        }
        Ok(files.remove(0))
    }
}
