use eframe::egui;
use pdf_async_runtime::PdfCommand;
use pdf_relocate::{constants::DEFAULT_BATCH_DELAY, output_file_name, output_path_for};
use tokio::sync::mpsc;

use crate::state::AppState;

pub fn show(
    ui: &mut egui::Ui,
    state: &mut AppState,
    command_tx: &mpsc::UnboundedSender<PdfCommand>,
    status: &mut String,
) {
    ui.vertical(|ui| {
        ui.checkbox(&mut state.save_next_to_input, "Save next to input files");

        ui.add_space(5.0);

        let ready = state.options().is_some() && !state.busy;

        if ui
            .add_enabled(
                ready && state.selected.is_some(),
                egui::Button::new("▶ Process Current"),
            )
            .clicked()
        {
            process_current(state, command_tx, status);
        }

        if ui
            .add_enabled(
                ready && !state.documents.is_empty(),
                egui::Button::new("⏩ Process All"),
            )
            .clicked()
        {
            process_all(state, command_tx, status);
        }

        ui.add_space(10.0);

        if ui.button("↺ Reset Coordinates").clicked() {
            state.reset_coordinates();
            *status = "Coordinates reset".to_string();
        }
    });
}

fn process_current(
    state: &mut AppState,
    command_tx: &mpsc::UnboundedSender<PdfCommand>,
    status: &mut String,
) {
    let (Some(options), Some(document)) = (state.options(), state.selected_document()) else {
        return;
    };

    let output_path = if state.save_next_to_input {
        Some(output_path_for(&document.path, None))
    } else {
        let mut dialog = rfd::FileDialog::new()
            .add_filter("PDF", &["pdf"])
            .set_file_name(output_file_name(&document.name()));
        if let Some(dir) = document.path.parent() {
            dialog = dialog.set_directory(dir);
        }
        dialog.save_file()
    };

    let Some(output_path) = output_path else {
        return;
    };

    *status = format!("Processing {}...", document.name());
    let _ = command_tx.send(PdfCommand::Process {
        doc_id: document.id,
        options,
        output_path,
    });
    state.busy = true;
}

fn process_all(
    state: &mut AppState,
    command_tx: &mpsc::UnboundedSender<PdfCommand>,
    status: &mut String,
) {
    let Some(options) = state.options() else {
        return;
    };

    let output_dir = if state.save_next_to_input {
        None
    } else {
        match rfd::FileDialog::new().pick_folder() {
            Some(dir) => Some(dir),
            None => return,
        }
    };

    let doc_ids = state.documents.iter().map(|d| d.id).collect::<Vec<_>>();
    *status = format!("Processing {} documents...", doc_ids.len());
    let _ = command_tx.send(PdfCommand::ProcessBatch {
        doc_ids,
        options,
        output_dir,
        delay: DEFAULT_BATCH_DELAY,
    });
    state.busy = true;
}
