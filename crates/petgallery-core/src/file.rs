// File upload types

/// Images wider than this are scaled down before upload
pub const MAX_IMAGE_WIDTH: u32 = 1200;

/// A file received from a client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    /// Original file name; used as the object key
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(file_name: impl Into<String>, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type,
            bytes,
        }
    }

    /// Lowercased extension of the file name, if any
    pub fn extension(&self) -> Option<String> {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
    }
}
