use eframe::egui;
use pdf_async_runtime::{PdfCommand, PdfUpdate};
use pdf_relocate::{CoordinateStore, PdfiumRasterizer};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::logger::AppLogger;
use crate::state::{AppState, LoadedDocument};
use crate::views::{self, PagePreview, page_view::PreviewRequest};

#[derive(Clone)]
struct ProgressState {
    operation: String,
    current: usize,
    total: usize,
}

pub struct RelocateApp {
    state: AppState,
    status: String,

    // Async infrastructure
    command_tx: mpsc::UnboundedSender<PdfCommand>,
    update_rx: mpsc::UnboundedReceiver<PdfUpdate>,

    // Progress tracking
    progress: Option<ProgressState>,

    // Preview
    preview: Option<PagePreview>,
    requested_preview: Option<PreviewRequest>,

    logger: AppLogger,
    show_log: bool,

    _tokio_handle: tokio::runtime::Handle,
}

impl RelocateApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        tokio_handle: tokio::runtime::Handle,
        logger: AppLogger,
    ) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        // Spawn worker task
        tokio_handle.spawn(crate::worker::worker_task(
            command_rx,
            update_tx,
            Arc::new(PdfiumRasterizer::new()),
        ));

        let store = match CoordinateStore::open_default() {
            Ok(store) => Some(store),
            Err(e) => {
                log::warn!("Saved coordinates unavailable: {}", e);
                None
            }
        };

        Self {
            state: AppState::new(store),
            status: String::new(),
            command_tx,
            update_rx,
            progress: None,
            preview: None,
            requested_preview: None,
            logger,
            show_log: true,
            _tokio_handle: tokio_handle,
        }
    }

    fn handle_update(&mut self, ctx: &egui::Context, update: PdfUpdate) {
        match update {
            PdfUpdate::Progress {
                operation,
                current,
                total,
            } => {
                self.progress = (current < total).then(|| ProgressState {
                    operation: operation.clone(),
                    current,
                    total,
                });
                self.status = operation;
            }
            PdfUpdate::DocumentLoaded {
                doc_id,
                path,
                page_count,
            } => {
                self.state.add_document(LoadedDocument {
                    id: doc_id,
                    path,
                    page_count,
                });
            }
            PdfUpdate::DocumentLoadFailed { path, message } => {
                self.status = format!("Could not open {}", path.display());
                self.state.add_load_failure(path, message);
            }
            PdfUpdate::PreviewRendered {
                doc_id,
                page_index,
                width,
                height,
                rgba_data,
                render_info,
            } => {
                let color_image =
                    egui::ColorImage::from_rgba_unmultiplied([width, height], &rgba_data);

                match &mut self.preview {
                    Some(preview) => {
                        preview.texture.set(color_image, egui::TextureOptions::default());
                        preview.doc_id = doc_id;
                        preview.page_index = page_index;
                        preview.render_info = render_info;
                    }
                    None => {
                        self.preview = Some(PagePreview {
                            doc_id,
                            page_index,
                            texture: ctx.load_texture(
                                "pdf_page",
                                color_image,
                                egui::TextureOptions::default(),
                            ),
                            render_info,
                        });
                    }
                }
            }
            PdfUpdate::DocumentRemoved { doc_id } => {
                if self.preview.as_ref().is_some_and(|p| p.doc_id == doc_id) {
                    self.preview = None;
                }
            }
            PdfUpdate::ProcessComplete { path, .. } => {
                self.state.busy = false;
                self.progress = None;
                self.status = format!("Saved → {}", path.display());
            }
            PdfUpdate::BatchComplete { written, failure } => {
                self.state.busy = false;
                self.progress = None;
                self.status = match failure {
                    Some((name, message)) => format!(
                        "Stopped at {}: {} ({} file(s) saved before it)",
                        name,
                        message,
                        written.len()
                    ),
                    None => format!("Processed {} file(s)", written.len()),
                };
            }
            PdfUpdate::Error { message } => {
                self.state.busy = false;
                self.progress = None;
                self.status = format!("Error: {message}");
            }
        }
        ctx.request_repaint();
    }
}

impl eframe::App for RelocateApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Handle drag-and-drop for PDF files
        let dropped: Vec<_> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|file| file.path.clone())
                .filter(|path| {
                    path.extension()
                        .and_then(|s| s.to_str())
                        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
                })
                .collect()
        });
        if !dropped.is_empty() {
            self.status = format!("Loading {} file(s)...", dropped.len());
            let _ = self
                .command_tx
                .send(PdfCommand::LoadDocuments { paths: dropped });
        }

        // Process all pending updates from worker
        while let Ok(update) = self.update_rx.try_recv() {
            self.handle_update(ctx, update);
        }

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            if let Some(ref progress) = self.progress {
                ui.add(
                    egui::ProgressBar::new(progress.current as f32 / progress.total.max(1) as f32)
                        .text(progress.operation.as_str()),
                );
                ctx.request_repaint(); // Keep updating during operations
            }

            ui.horizontal(|ui| {
                ui.toggle_value(&mut self.show_log, "Log");
                ui.separator();
                ui.label(&self.status);
            });

            if self.show_log {
                ui.separator();
                views::log_panel::show(ui, &self.logger);
            }
        });

        egui::SidePanel::left("controls")
            .min_width(280.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.heading("Address Relocation");
                    ui.separator();

                    views::documents::show(ui, &mut self.state, &self.command_tx);
                    ui.add_space(10.0);
                    ui.separator();
                    ui.add_space(10.0);

                    views::coordinates::show(ui, &mut self.state);
                    ui.add_space(10.0);
                    ui.separator();
                    ui.add_space(10.0);

                    views::actions::show(ui, &mut self.state, &self.command_tx, &mut self.status);
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            views::page_view::show(
                ui,
                &mut self.state,
                self.preview.as_ref(),
                &mut self.requested_preview,
                &self.command_tx,
            );
        });
    }
}
