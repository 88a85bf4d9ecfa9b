use pdf_async_runtime::{DocumentId, PdfUpdate, RenderInfo};
use pdf_relocate::PageRasterizer;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::documents::{CachedPreview, DocumentStore};

/// Render a page scaled to `target_width_px`, from cache when possible
pub async fn handle_render(
    doc_id: DocumentId,
    page_index: usize,
    target_width_px: u32,
    store: &mut DocumentStore,
    rasterizer: &Arc<dyn PageRasterizer>,
    update_tx: &mpsc::UnboundedSender<PdfUpdate>,
) {
    let cache_key = (doc_id, page_index, target_width_px);

    if let Some(cached) = store.get_from_cache(&cache_key) {
        send_preview(doc_id, page_index, cached.clone(), update_tx);
        return;
    }

    let Some(bytes) = store.get(&doc_id).map(|d| d.bytes.clone()) else {
        let _ = update_tx.send(PdfUpdate::Error {
            message: format!("Document not found: {:?}", doc_id),
        });
        return;
    };

    let rasterizer = rasterizer.clone();
    let rendered = tokio::task::spawn_blocking(move || {
        let (width_pt, height_pt) = rasterizer.page_size(&bytes, page_index)?;
        let render_info = RenderInfo::fit_width(target_width_px as f64, width_pt, height_pt);
        let page = rasterizer.render_page(&bytes, page_index, render_info.scale)?;
        Ok::<_, pdf_relocate::RelocateError>((page, render_info))
    })
    .await;

    match rendered {
        Ok(Ok((page, render_info))) => {
            let preview = CachedPreview {
                width: page.image.width() as usize,
                height: page.image.height() as usize,
                rgba_data: page.image.into_raw(),
                render_info,
            };
            store.add_to_cache(cache_key, preview.clone());
            send_preview(doc_id, page_index, preview, update_tx);
        }
        Ok(Err(e)) => {
            let _ = update_tx.send(PdfUpdate::Error {
                message: format!("Failed to render page: {}", e),
            });
        }
        Err(e) => {
            let _ = update_tx.send(PdfUpdate::Error {
                message: format!("Task join error: {}", e),
            });
        }
    }
}

fn send_preview(
    doc_id: DocumentId,
    page_index: usize,
    preview: CachedPreview,
    update_tx: &mpsc::UnboundedSender<PdfUpdate>,
) {
    let _ = update_tx.send(PdfUpdate::PreviewRendered {
        doc_id,
        page_index,
        width: preview.width,
        height: preview.height,
        rgba_data: preview.rgba_data,
        render_info: preview.render_info,
    });
}
