// File service for uploads

use async_trait::async_trait;
use petgallery_core::{FileStore, FileUpload, ServiceResult, UploadError};
use std::sync::Arc;

/// Message returned for every failed upload; the cause is only logged
pub const FILE_NOT_UPLOADED: &str = "File not uploaded.";

pub struct FileService {
    store: Arc<dyn FileStore>,
}

impl FileService {
    pub fn new(store: Arc<dyn FileStore>) -> Self {
        Self { store }
    }

    /// Upload a file and return its URL as the payload
    pub async fn upload_file(&self, file: FileUpload) -> ServiceResult<String> {
        let file_name = file.file_name.clone();
        match self.store.upload(file).await {
            Ok(url) => ServiceResult::with_payload(url),
            Err(e) => Self::failed(&file_name, &e),
        }
    }

    /// Result for an upload that failed before reaching the store
    pub fn failed(file_name: &str, error: &UploadError) -> ServiceResult<String> {
        tracing::error!(file_name, "Failed to upload file: {}", error);
        ServiceResult::invalid([FILE_NOT_UPLOADED])
    }
}

/// FileStore used when object storage is not configured
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredFileStore;

#[async_trait]
impl FileStore for UnconfiguredFileStore {
    async fn upload(&self, _file: FileUpload) -> Result<String, UploadError> {
        Err(UploadError::NotConfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petgallery_core::{InMemoryFileStore, ResultType};

    #[tokio::test]
    async fn test_upload_success_returns_url() {
        let store = InMemoryFileStore::new();
        let service = FileService::new(Arc::new(store.clone()));

        let result = service
            .upload_file(FileUpload::new("dog.jpg", Some("image/jpeg".into()), vec![7]))
            .await;

        assert!(result.is_success());
        assert_eq!(result.payload().map(String::as_str), Some("memory://dog.jpg"));
        assert!(store.get("dog.jpg").await.is_some());
    }

    #[tokio::test]
    async fn test_upload_failure_is_a_single_message() {
        let service = FileService::new(Arc::new(UnconfiguredFileStore));

        let result = service
            .upload_file(FileUpload::new("dog.jpg", None, vec![7]))
            .await;

        assert_eq!(result.result_type(), ResultType::Invalid);
        assert_eq!(result.messages(), [FILE_NOT_UPLOADED]);
        assert_eq!(result.payload(), None);
    }
}
