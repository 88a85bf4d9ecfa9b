use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelocateError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("Failed to load document: {0}")]
    FileLoad(String),
    #[error("Invalid region: {0}")]
    InvalidRegion(String),
    #[error("Malformed document: {0}")]
    MalformedDocument(String),
    #[error("Page {page} is out of range (document has {page_count} pages)")]
    PageIndexOutOfRange { page: usize, page_count: usize },
    #[error("Processing failed: {0}")]
    Processing(String),
}

pub type Result<T> = std::result::Result<T, RelocateError>;

/// A finished document ready to be written out
#[derive(Debug, Clone, PartialEq)]
pub struct RelocatedDocument {
    /// Name of the input this was produced from
    pub source_name: String,
    /// Suggested output file name (`<stem>-moved_address.pdf`)
    pub output_name: String,
    /// Serialized PDF
    pub bytes: Vec<u8>,
}
