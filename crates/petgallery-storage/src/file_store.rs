// Object storage implementation of FileStore
//
// Uploads are decoded as images first. Images wider than MAX_IMAGE_WIDTH are
// scaled down (aspect ratio kept) and re-encoded in the format named by the
// file extension; smaller images are stored as-is.
//
// The object key is the file name, verbatim. Names object_store would
// percent-encode into a different key are rejected.

use async_trait::async_trait;
use image::{imageops::FilterType, ImageFormat};
use object_store::{
    aws::AmazonS3Builder, path::Path, Attribute, Attributes, ObjectStore, PutOptions, PutPayload,
};
use petgallery_core::{FileStore, FileUpload, UploadError, MAX_IMAGE_WIDTH};
use std::io::Cursor;
use std::sync::Arc;
use url::Url;

/// S3 bucket settings
#[derive(Debug, Clone)]
pub struct S3Config {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket_name: String,
    pub region: String,
}

impl S3Config {
    /// Virtual-hosted style URL of the bucket root
    pub fn public_base_url(&self) -> Result<Url, UploadError> {
        let base = format!(
            "https://{}.s3.{}.amazonaws.com/",
            self.bucket_name, self.region
        );
        Url::parse(&base).map_err(|e| UploadError::object_store(e.to_string()))
    }
}

/// FileStore backed by any object_store implementation
#[derive(Debug, Clone)]
pub struct ObjectFileStore {
    store: Arc<dyn ObjectStore>,
    public_base_url: Url,
}

impl ObjectFileStore {
    pub fn new(store: Arc<dyn ObjectStore>, public_base_url: Url) -> Self {
        Self {
            store,
            public_base_url,
        }
    }

    /// Build a store writing to an S3 bucket
    pub fn s3(config: &S3Config) -> Result<Self, UploadError> {
        let s3 = AmazonS3Builder::new()
            .with_region(&config.region)
            .with_bucket_name(&config.bucket_name)
            .with_access_key_id(&config.access_key_id)
            .with_secret_access_key(&config.secret_access_key)
            .build()
            .map_err(|e| UploadError::object_store(e.to_string()))?;

        Ok(Self::new(Arc::new(s3), config.public_base_url()?))
    }

    fn object_path(file_name: &str) -> Result<Path, UploadError> {
        let trimmed = file_name.trim();
        if trimmed.is_empty() || trimmed.contains('/') || trimmed.contains('\\') {
            return Err(UploadError::InvalidFileName(file_name.to_string()));
        }

        let path = Path::from(trimmed);
        if path.as_ref() != trimmed {
            return Err(UploadError::InvalidFileName(file_name.to_string()));
        }
        Ok(path)
    }

    /// Public URL of an object, with the key as a single path segment
    fn object_url(&self, key: &str) -> Result<Url, UploadError> {
        let mut url = self.public_base_url.clone();
        url.path_segments_mut()
            .map_err(|_| UploadError::object_store("public base URL cannot hold a path"))?
            .pop_if_empty()
            .push(key);
        Ok(url)
    }
}

#[async_trait]
impl FileStore for ObjectFileStore {
    async fn upload(&self, file: FileUpload) -> Result<String, UploadError> {
        let path = Self::object_path(&file.file_name)?;
        let content_type = file.content_type.clone();

        let bytes = tokio::task::spawn_blocking(move || prepare_image(&file))
            .await
            .map_err(|e| UploadError::image(e.to_string()))??;

        let mut attributes = Attributes::new();
        if let Some(content_type) = content_type {
            attributes.insert(Attribute::ContentType, content_type.into());
        }
        let options = PutOptions {
            attributes,
            ..Default::default()
        };

        self.store
            .put_opts(&path, PutPayload::from(bytes), options)
            .await
            .map_err(|e| UploadError::object_store(e.to_string()))?;

        let url = self.object_url(path.as_ref())?;

        tracing::info!(key = %path, url = %url, "Uploaded file");

        Ok(url.to_string())
    }
}

/// Decode the upload and scale it down if it is wider than MAX_IMAGE_WIDTH
pub fn prepare_image(file: &FileUpload) -> Result<Vec<u8>, UploadError> {
    let image =
        image::load_from_memory(&file.bytes).map_err(|e| UploadError::image(e.to_string()))?;

    if image.width() <= MAX_IMAGE_WIDTH {
        return Ok(file.bytes.clone());
    }

    let format = ImageFormat::from_path(&file.file_name)
        .or_else(|_| image::guess_format(&file.bytes))
        .map_err(|e| UploadError::image(e.to_string()))?;

    let height = (u64::from(image.height()) * u64::from(MAX_IMAGE_WIDTH)
        / u64::from(image.width()))
    .max(1) as u32;
    let resized = image.resize_exact(MAX_IMAGE_WIDTH, height, FilterType::Lanczos3);

    tracing::debug!(
        file_name = %file.file_name,
        from_width = image.width(),
        to_width = resized.width(),
        "Resized image"
    );

    let mut out = Cursor::new(Vec::new());
    resized
        .write_to(&mut out, format)
        .map_err(|e| UploadError::image(e.to_string()))?;

    Ok(out.into_inner())
}
