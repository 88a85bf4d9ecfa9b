//! Sequential batch processing
//!
//! Documents are processed one at a time in list order. The first failure
//! stops the batch; results produced before it are kept.

use super::io::{load_pdf_bytes, output_file_name};
use super::relocate;
use crate::options::RelocateOptions;
use crate::render::PageRasterizer;
use crate::types::*;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// One document queued for processing
#[derive(Debug, Clone)]
pub struct BatchInput {
    pub name: String,
    source: InputSource,
}

#[derive(Debug, Clone)]
enum InputSource {
    Bytes(Vec<u8>),
    /// Read only when the document's turn comes
    File(PathBuf),
}

impl BatchInput {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            source: InputSource::Bytes(bytes),
        }
    }

    /// Queue a file on disk; a read error fails this document, not the ones before it
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: path.to_string_lossy().into_owned(),
            source: InputSource::File(path),
        }
    }
}

impl InputSource {
    async fn read(self) -> Result<Vec<u8>> {
        match self {
            InputSource::Bytes(bytes) => Ok(bytes),
            InputSource::File(path) => load_pdf_bytes(path).await,
        }
    }
}

/// The document that stopped a batch
#[derive(Debug)]
pub struct BatchFailure {
    /// Position in the input list (0-indexed)
    pub index: usize,
    pub name: String,
    pub error: RelocateError,
}

/// Outcome of a batch run
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Finished documents, in input order
    pub completed: Vec<RelocatedDocument>,
    /// Set when the batch stopped early
    pub failure: Option<BatchFailure>,
    /// Documents never attempted because of the failure
    pub skipped: usize,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

/// Relocate the same region in every input, one after another
///
/// `on_complete(index, total, document)` is called as soon as each document
/// is finished, before the next one starts. `delay` is slept between
/// documents (not after the last one).
pub async fn relocate_batch<F>(
    inputs: Vec<BatchInput>,
    options: &RelocateOptions,
    rasterizer: Arc<dyn PageRasterizer>,
    delay: Duration,
    mut on_complete: F,
) -> BatchReport
where
    F: FnMut(usize, usize, &RelocatedDocument),
{
    let total = inputs.len();
    let mut report = BatchReport::default();

    for (index, input) in inputs.into_iter().enumerate() {
        if index > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let BatchInput { name, source } = input;
        log::info!("Processing {} ({}/{})", name, index + 1, total);
        let result = match source.read().await {
            Ok(bytes) => relocate(bytes, options, rasterizer.clone()).await,
            Err(error) => Err(error),
        };
        match result {
            Ok(bytes) => {
                let document = RelocatedDocument {
                    output_name: output_file_name(&name),
                    source_name: name,
                    bytes,
                };
                on_complete(index, total, &document);
                report.completed.push(document);
            }
            Err(error) => {
                log::error!("Failed to process {}: {}", name, error);
                report.skipped = total - index - 1;
                report.failure = Some(BatchFailure {
                    index,
                    name,
                    error,
                });
                break;
            }
        }
    }

    report
}
