use std::path::PathBuf;
use std::time::Duration;

// Re-export types from library crates
pub use pdf_relocate::{PointMm, RectMm, RelocateOptions, RenderInfo};

/// Commands sent from UI to worker
#[derive(Debug)]
pub enum PdfCommand {
    /// Read and open one or more PDFs; each reports its own result
    LoadDocuments {
        paths: Vec<PathBuf>,
    },
    /// Render a page to fit `target_width_px`
    RenderPreview {
        doc_id: DocumentId,
        page_index: usize,
        target_width_px: u32,
    },
    RemoveDocument {
        doc_id: DocumentId,
    },
    /// Relocate the region in one document and write it to `output_path`
    Process {
        doc_id: DocumentId,
        options: RelocateOptions,
        output_path: PathBuf,
    },
    /// Relocate the region in several documents, one at a time
    ProcessBatch {
        doc_ids: Vec<DocumentId>,
        options: RelocateOptions,
        /// Write next to each input when `None`
        output_dir: Option<PathBuf>,
        delay: Duration,
    },
}

/// Updates sent from worker to UI
#[derive(Debug, Clone)]
pub enum PdfUpdate {
    Progress {
        operation: String,
        current: usize,
        total: usize,
    },
    DocumentLoaded {
        doc_id: DocumentId,
        path: PathBuf,
        page_count: usize,
    },
    /// A single file failed to open; other files in the same request are unaffected
    DocumentLoadFailed {
        path: PathBuf,
        message: String,
    },
    PreviewRendered {
        doc_id: DocumentId,
        page_index: usize,
        width: usize,
        height: usize,
        rgba_data: Vec<u8>,
        render_info: RenderInfo,
    },
    DocumentRemoved {
        doc_id: DocumentId,
    },
    ProcessComplete {
        doc_id: DocumentId,
        path: PathBuf,
    },
    BatchComplete {
        written: Vec<PathBuf>,
        /// Name of the file that stopped the batch, and why
        failure: Option<(String, String)>,
    },
    Error {
        message: String,
    },
}

/// Handle to a loaded document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(pub u64);
