use eframe::egui;
use pdf_async_runtime::PdfCommand;
use tokio::sync::mpsc;

use crate::state::AppState;

pub fn show(
    ui: &mut egui::Ui,
    state: &mut AppState,
    command_tx: &mpsc::UnboundedSender<PdfCommand>,
) {
    egui::CollapsingHeader::new("📄 Documents")
        .default_open(true)
        .show(ui, |ui| {
            if ui.button("➕ Open PDF Files").clicked() {
                if let Some(paths) = rfd::FileDialog::new()
                    .add_filter("PDF", &["pdf"])
                    .pick_files()
                {
                    let _ = command_tx.send(PdfCommand::LoadDocuments { paths });
                }
            }
            ui.label(egui::RichText::new("or drop files onto the window").weak());

            ui.add_space(5.0);

            let mut selected = None;
            let mut removed = None;
            for document in &state.documents {
                ui.horizontal(|ui| {
                    if ui.small_button("✖").on_hover_text("Remove").clicked() {
                        removed = Some(document.id);
                    }
                    let label = format!("{} ({} p.)", document.name(), document.page_count);
                    if ui
                        .selectable_label(state.selected == Some(document.id), label)
                        .clicked()
                    {
                        selected = Some(document.id);
                    }
                });
            }

            if let Some(doc_id) = selected {
                state.select(doc_id);
            }
            if let Some(doc_id) = removed {
                state.remove_document(doc_id);
                let _ = command_tx.send(PdfCommand::RemoveDocument { doc_id });
            }

            let error_color = ui.visuals().error_fg_color;
            let mut dismissed = None;
            for (index, failure) in state.load_failures.iter().enumerate() {
                ui.horizontal(|ui| {
                    if ui.small_button("✖").on_hover_text("Dismiss").clicked() {
                        dismissed = Some(index);
                    }
                    let name = failure
                        .path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| failure.path.display().to_string());
                    ui.colored_label(error_color, format!("⚠ {}", name))
                        .on_hover_text(failure.message.as_str());
                });
            }
            if let Some(index) = dismissed {
                state.load_failures.remove(index);
            }

            if state.documents.is_empty() && state.load_failures.is_empty() {
                ui.label("No documents loaded");
            }
        });
}
