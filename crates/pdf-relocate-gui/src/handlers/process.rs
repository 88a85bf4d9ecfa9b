use pdf_async_runtime::{DocumentId, PdfUpdate, RelocateOptions};
use pdf_relocate::{
    BatchInput, PageRasterizer, output_path_for, relocate, relocate_batch, save_pdf_bytes,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::documents::DocumentStore;

pub async fn handle_process(
    doc_id: DocumentId,
    options: RelocateOptions,
    output_path: PathBuf,
    store: &DocumentStore,
    rasterizer: &Arc<dyn PageRasterizer>,
    update_tx: &mpsc::UnboundedSender<PdfUpdate>,
) {
    let Some(document) = store.get(&doc_id) else {
        let _ = update_tx.send(PdfUpdate::Error {
            message: format!("Document not found: {:?}", doc_id),
        });
        return;
    };
    let name = document.display_name();

    let _ = update_tx.send(PdfUpdate::Progress {
        operation: format!("Processing {}", name),
        current: 0,
        total: 1,
    });

    let result = match relocate(document.bytes.to_vec(), &options, rasterizer.clone()).await {
        Ok(bytes) => save_pdf_bytes(&bytes, &output_path).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => {
            log::info!("Saved {}", output_path.display());
            let _ = update_tx.send(PdfUpdate::ProcessComplete {
                doc_id,
                path: output_path,
            });
        }
        Err(e) => {
            log::error!("Failed to process {}: {}", name, e);
            let _ = update_tx.send(PdfUpdate::Error {
                message: format!("{}: {}", name, e),
            });
        }
    }
}

/// Process documents in order, stopping at the first failure
///
/// Outputs finished before the failure are still written.
pub async fn handle_batch(
    doc_ids: Vec<DocumentId>,
    options: RelocateOptions,
    output_dir: Option<PathBuf>,
    delay: Duration,
    store: &DocumentStore,
    rasterizer: &Arc<dyn PageRasterizer>,
    update_tx: &mpsc::UnboundedSender<PdfUpdate>,
) {
    let inputs: Vec<BatchInput> = doc_ids
        .iter()
        .filter_map(|doc_id| match store.get(doc_id) {
            Some(document) => Some(BatchInput::new(
                document.path.to_string_lossy(),
                document.bytes.to_vec(),
            )),
            None => {
                log::warn!("Skipping unknown document {:?}", doc_id);
                None
            }
        })
        .collect();
    let total = inputs.len();

    let _ = update_tx.send(PdfUpdate::Progress {
        operation: format!("Processing {} documents", total),
        current: 0,
        total,
    });

    let progress_tx = update_tx.clone();
    let report = relocate_batch(
        inputs,
        &options,
        rasterizer.clone(),
        delay,
        move |index, total, document| {
            let _ = progress_tx.send(PdfUpdate::Progress {
                operation: format!("Processed {}", document.output_name),
                current: index + 1,
                total,
            });
        },
    )
    .await;

    let mut written = Vec::with_capacity(report.completed.len());
    for document in &report.completed {
        let path = output_path_for(Path::new(&document.source_name), output_dir.as_deref());
        match save_pdf_bytes(&document.bytes, &path).await {
            Ok(()) => {
                log::info!("Saved {}", path.display());
                written.push(path);
            }
            Err(e) => {
                let _ = update_tx.send(PdfUpdate::Error {
                    message: format!("Failed to write {}: {}", path.display(), e),
                });
                return;
            }
        }
    }

    let failure = report.failure.map(|failure| {
        let name = Path::new(&failure.name)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or(failure.name);
        (name, failure.error.to_string())
    });

    let _ = update_tx.send(PdfUpdate::BatchComplete { written, failure });
}
