use eframe::egui;

use crate::state::{AppState, EditMode};
use crate::ui_components::{DragValueBuilder, point_editor, rect_editor};

pub fn show(ui: &mut egui::Ui, state: &mut AppState) {
    egui::CollapsingHeader::new("✏ Edit Mode")
        .default_open(true)
        .show(ui, |ui| {
            let mut mode = state.mode;
            ui.selectable_value(&mut mode, EditMode::Idle, "Move / resize");
            ui.selectable_value(&mut mode, EditMode::DrawSource, "Draw source");
            ui.selectable_value(&mut mode, EditMode::DrawCover, "Draw cover");
            ui.selectable_value(&mut mode, EditMode::PlaceDestination, "Place destination");
            state.set_mode(mode);

            if let Some(page_count) = state.selected_document().map(|d| d.page_count) {
                ui.add_space(5.0);
                ui.horizontal(|ui| {
                    ui.label("Page:");
                    let mut page_number = state.page_number;
                    if DragValueBuilder::new(&mut page_number)
                        .range(1..=page_count.max(1))
                        .suffix(format!(" / {}", page_count))
                        .show(ui)
                    {
                        state.set_page_number(page_number);
                    }
                });
            }
        });

    ui.add_space(10.0);

    egui::CollapsingHeader::new("▭ Source")
        .default_open(true)
        .show(ui, |ui| match state.source() {
            Some(mut rect) => {
                if rect_editor(ui, &mut rect) && rect.has_area() {
                    state.set_source(Some(rect));
                }
            }
            None => {
                ui.label("Not set: choose \"Draw source\" and drag on the page");
            }
        });

    ui.add_space(5.0);

    egui::CollapsingHeader::new("⌖ Destination")
        .default_open(true)
        .show(ui, |ui| match state.destination() {
            Some(mut point) => {
                if point_editor(ui, &mut point) {
                    state.set_destination(Some(point));
                }
            }
            None => {
                ui.label("Not set: choose \"Place destination\" and click the page");
            }
        });

    ui.add_space(5.0);

    egui::CollapsingHeader::new("▨ Cover (optional)")
        .default_open(true)
        .show(ui, |ui| match state.cover() {
            Some(mut rect) => {
                if rect_editor(ui, &mut rect) && rect.has_area() {
                    state.set_cover(Some(rect));
                }
                if ui.button("Remove cover").clicked() {
                    state.set_cover(None);
                }
            }
            None => {
                ui.label("Not set: choose \"Draw cover\" to blank out another area");
            }
        });
}
