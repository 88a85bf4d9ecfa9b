use pdf_async_runtime::{DocumentId, PdfUpdate};
use pdf_relocate::{PageRasterizer, load_pdf_bytes};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::documents::{DocumentStore, OpenDocument};

/// Read and open each file; a failure only affects that file
pub async fn handle_load(
    paths: Vec<PathBuf>,
    store: &mut DocumentStore,
    rasterizer: &Arc<dyn PageRasterizer>,
    update_tx: &mpsc::UnboundedSender<PdfUpdate>,
) {
    let total = paths.len();

    for (index, path) in paths.into_iter().enumerate() {
        let _ = update_tx.send(PdfUpdate::Progress {
            operation: format!("Loading {}", path.display()),
            current: index,
            total,
        });

        match open_document(&path, rasterizer.clone()).await {
            Ok((bytes, page_count)) => {
                let doc_id = store.insert(OpenDocument {
                    path: path.clone(),
                    bytes,
                    page_count,
                });
                log::info!("Loaded {} ({} pages)", path.display(), page_count);
                let _ = update_tx.send(PdfUpdate::DocumentLoaded {
                    doc_id,
                    path,
                    page_count,
                });
            }
            Err(e) => {
                log::warn!("Failed to load {}: {}", path.display(), e);
                let _ = update_tx.send(PdfUpdate::DocumentLoadFailed {
                    path,
                    message: e.to_string(),
                });
            }
        }
    }

    let _ = update_tx.send(PdfUpdate::Progress {
        operation: "Loading complete".to_string(),
        current: total,
        total,
    });
}

async fn open_document(
    path: &Path,
    rasterizer: Arc<dyn PageRasterizer>,
) -> pdf_relocate::Result<(Arc<Vec<u8>>, usize)> {
    let bytes = Arc::new(load_pdf_bytes(path).await?);
    let count_bytes = bytes.clone();
    let page_count =
        tokio::task::spawn_blocking(move || rasterizer.page_count(&count_bytes)).await??;
    Ok((bytes, page_count))
}

pub async fn handle_remove(
    doc_id: DocumentId,
    store: &mut DocumentStore,
    update_tx: &mpsc::UnboundedSender<PdfUpdate>,
) {
    if let Some(document) = store.remove(doc_id) {
        log::info!("Removed {}", document.display_name());
    }
    let _ = update_tx.send(PdfUpdate::DocumentRemoved { doc_id });
}
