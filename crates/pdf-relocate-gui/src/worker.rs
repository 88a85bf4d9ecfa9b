use pdf_async_runtime::{PdfCommand, PdfUpdate};
use pdf_relocate::PageRasterizer;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::documents::DocumentStore;
use crate::handlers;

/// Async worker task that processes PDF commands and sends updates
pub async fn worker_task(
    mut command_rx: mpsc::UnboundedReceiver<PdfCommand>,
    update_tx: mpsc::UnboundedSender<PdfUpdate>,
    rasterizer: Arc<dyn PageRasterizer>,
) {
    let mut store = DocumentStore::new();

    while let Some(cmd) = command_rx.recv().await {
        process_command(cmd, &mut store, &rasterizer, &mut command_rx, &update_tx).await;
    }
}

async fn process_command(
    cmd: PdfCommand,
    store: &mut DocumentStore,
    rasterizer: &Arc<dyn PageRasterizer>,
    command_rx: &mut mpsc::UnboundedReceiver<PdfCommand>,
    update_tx: &mpsc::UnboundedSender<PdfUpdate>,
) {
    match cmd {
        PdfCommand::LoadDocuments { paths } => {
            handlers::documents::handle_load(paths, store, rasterizer, update_tx).await;
        }
        PdfCommand::RemoveDocument { doc_id } => {
            handlers::documents::handle_remove(doc_id, store, update_tx).await;
        }
        PdfCommand::RenderPreview {
            mut doc_id,
            mut page_index,
            mut target_width_px,
        } => {
            // Deduplicate render commands - keep the most recent one
            while let Ok(next_cmd) = command_rx.try_recv() {
                if let PdfCommand::RenderPreview {
                    doc_id: new_doc_id,
                    page_index: new_page_index,
                    target_width_px: new_width,
                } = next_cmd
                {
                    log::debug!("Discarding queued preview render, using newer request");
                    doc_id = new_doc_id;
                    page_index = new_page_index;
                    target_width_px = new_width;
                } else {
                    // Non-render command found, process it before rendering
                    Box::pin(process_command(
                        next_cmd, store, rasterizer, command_rx, update_tx,
                    ))
                    .await;
                }
            }

            handlers::preview::handle_render(
                doc_id,
                page_index,
                target_width_px,
                store,
                rasterizer,
                update_tx,
            )
            .await;
        }
        PdfCommand::Process {
            doc_id,
            options,
            output_path,
        } => {
            handlers::process::handle_process(
                doc_id,
                options,
                output_path,
                store,
                rasterizer,
                update_tx,
            )
            .await;
        }
        PdfCommand::ProcessBatch {
            doc_ids,
            options,
            output_dir,
            delay,
        } => {
            handlers::process::handle_batch(
                doc_ids, options, output_dir, delay, store, rasterizer, update_tx,
            )
            .await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use pdf_async_runtime::DocumentId;
    use pdf_relocate::{RelocateError, RenderedPage};
    use std::path::PathBuf;
    use tempfile::TempDir;

    const PAGE_WIDTH_PT: f64 = 600.0;
    const PAGE_HEIGHT_PT: f64 = 800.0;

    /// Two blank pages for anything that starts like a PDF
    struct BlankRasterizer;

    impl BlankRasterizer {
        fn check(bytes: &[u8]) -> pdf_relocate::Result<()> {
            if bytes.starts_with(b"%PDF") {
                Ok(())
            } else {
                Err(RelocateError::MalformedDocument("not a PDF".to_string()))
            }
        }
    }

    impl PageRasterizer for BlankRasterizer {
        fn page_count(&self, pdf_bytes: &[u8]) -> pdf_relocate::Result<usize> {
            Self::check(pdf_bytes)?;
            Ok(2)
        }

        fn render_page(
            &self,
            pdf_bytes: &[u8],
            _page_index: usize,
            scale: f64,
        ) -> pdf_relocate::Result<RenderedPage> {
            Self::check(pdf_bytes)?;
            let width = (PAGE_WIDTH_PT * scale).round() as u32;
            let height = (PAGE_HEIGHT_PT * scale).round() as u32;
            Ok(RenderedPage {
                image: RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255])),
                width_pt: PAGE_WIDTH_PT,
                height_pt: PAGE_HEIGHT_PT,
            })
        }

        fn page_size(&self, pdf_bytes: &[u8], _page_index: usize) -> pdf_relocate::Result<(f64, f64)> {
            Self::check(pdf_bytes)?;
            Ok((PAGE_WIDTH_PT, PAGE_HEIGHT_PT))
        }
    }

    /// Queue `commands`, close the channel and collect every update
    async fn run(commands: Vec<PdfCommand>) -> Vec<PdfUpdate> {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (update_tx, mut update_rx) = mpsc::unbounded_channel();
        for cmd in commands {
            command_tx.send(cmd).unwrap();
        }
        drop(command_tx);

        worker_task(command_rx, update_tx, Arc::new(BlankRasterizer)).await;

        let mut updates = Vec::new();
        while let Ok(update) = update_rx.try_recv() {
            updates.push(update);
        }
        updates
    }

    fn write_file(dir: &TempDir, name: &str, contents: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn test_load_reports_each_file() {
        let dir = TempDir::new().unwrap();
        let good = write_file(&dir, "good.pdf", b"%PDF-1.7 fake");
        let bad = write_file(&dir, "bad.pdf", b"garbage");
        let missing = dir.path().join("missing.pdf");

        let updates = run(vec![PdfCommand::LoadDocuments {
            paths: vec![bad.clone(), good.clone(), missing.clone()],
        }])
        .await;

        let loaded: Vec<_> = updates
            .iter()
            .filter_map(|u| match u {
                PdfUpdate::DocumentLoaded {
                    path, page_count, ..
                } => Some((path.clone(), *page_count)),
                _ => None,
            })
            .collect();
        let failed: Vec<_> = updates
            .iter()
            .filter_map(|u| match u {
                PdfUpdate::DocumentLoadFailed { path, .. } => Some(path.clone()),
                _ => None,
            })
            .collect();

        assert_eq!(loaded, vec![(good, 2)]);
        assert_eq!(failed, vec![bad, missing]);
    }

    #[tokio::test]
    async fn test_queued_previews_are_coalesced() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "doc.pdf", b"%PDF-1.7 fake");
        let doc_id = DocumentId(0);

        let updates = run(vec![
            PdfCommand::LoadDocuments { paths: vec![path] },
            PdfCommand::RenderPreview {
                doc_id,
                page_index: 0,
                target_width_px: 100,
            },
            PdfCommand::RenderPreview {
                doc_id,
                page_index: 0,
                target_width_px: 200,
            },
            PdfCommand::RenderPreview {
                doc_id,
                page_index: 1,
                target_width_px: 300,
            },
        ])
        .await;

        let rendered: Vec<_> = updates
            .iter()
            .filter_map(|u| match u {
                PdfUpdate::PreviewRendered {
                    page_index,
                    width,
                    height,
                    rgba_data,
                    render_info,
                    ..
                } => Some((*page_index, *width, *height, rgba_data.len(), *render_info)),
                _ => None,
            })
            .collect();

        assert_eq!(rendered.len(), 1);
        let (page_index, width, height, len, render_info) = rendered[0];
        assert_eq!(page_index, 1);
        assert_eq!((width, height), (300, 400));
        assert_eq!(len, 300 * 400 * 4);
        assert!((render_info.scale - 0.5).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_unknown_document_reports_error() {
        let updates = run(vec![PdfCommand::RenderPreview {
            doc_id: DocumentId(42),
            page_index: 0,
            target_width_px: 100,
        }])
        .await;

        assert!(matches!(updates.as_slice(), [PdfUpdate::Error { .. }]));
    }

    #[tokio::test]
    async fn test_remove_acknowledges() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "doc.pdf", b"%PDF-1.7 fake");

        let updates = run(vec![
            PdfCommand::LoadDocuments { paths: vec![path] },
            PdfCommand::RemoveDocument {
                doc_id: DocumentId(0),
            },
        ])
        .await;

        assert!(
            updates
                .iter()
                .any(|u| matches!(u, PdfUpdate::DocumentRemoved { doc_id } if doc_id.0 == 0))
        );
    }
}
