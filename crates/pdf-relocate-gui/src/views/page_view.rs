use eframe::egui;
use pdf_async_runtime::{DocumentId, PdfCommand, RenderInfo};
use pdf_relocate::{CoordinateRole, PointMm, RectMm, ResizeHandle, gesture::hit_handle};
use tokio::sync::mpsc;

use crate::state::{AppState, EditMode};

/// Side of a resize handle square, in screen points
const HANDLE_SIZE: f32 = 8.0;

const SOURCE_COLOR: egui::Color32 = egui::Color32::from_rgb(30, 100, 220);
const COVER_COLOR: egui::Color32 = egui::Color32::from_rgb(230, 130, 20);
const DESTINATION_COLOR: egui::Color32 = egui::Color32::from_rgb(30, 160, 60);

/// The page currently shown, with the scale it was rendered at
pub struct PagePreview {
    pub doc_id: DocumentId,
    pub page_index: usize,
    pub texture: egui::TextureHandle,
    pub render_info: RenderInfo,
}

/// Last preview asked of the worker: (document, page index, width)
pub type PreviewRequest = (DocumentId, usize, u32);

pub fn show(
    ui: &mut egui::Ui,
    state: &mut AppState,
    preview: Option<&PagePreview>,
    requested: &mut Option<PreviewRequest>,
    command_tx: &mpsc::UnboundedSender<PdfCommand>,
) {
    let Some(doc_id) = state.selected else {
        ui.centered_and_justified(|ui| {
            ui.vertical_centered(|ui| {
                ui.heading("No Document");
                ui.label("Drop PDF files here or open them from the sidebar");
            });
        });
        return;
    };
    let page_index = state.page_number.saturating_sub(1);

    // Fit the panel width; a resize asks for a fresh render
    let target_width = ui.available_width().floor().max(100.0) as u32;
    let wanted = (doc_id, page_index, target_width);
    if *requested != Some(wanted) {
        let _ = command_tx.send(PdfCommand::RenderPreview {
            doc_id,
            page_index,
            target_width_px: target_width,
        });
        *requested = Some(wanted);
    }

    let Some(preview) =
        preview.filter(|p| p.doc_id == doc_id && p.page_index == page_index)
    else {
        ui.centered_and_justified(|ui| {
            ui.spinner();
        });
        return;
    };

    egui::ScrollArea::vertical()
        .drag_to_scroll(false)
        .show(ui, |ui| {
            show_page(ui, state, preview);
        });
}

fn show_page(ui: &mut egui::Ui, state: &mut AppState, preview: &PagePreview) {
    let info = preview.render_info;
    let (width_px, height_px) = info.page_size_px();
    let (response, painter) = ui.allocate_painter(
        egui::vec2(width_px as f32, height_px as f32),
        egui::Sense::click_and_drag(),
    );
    let page = PageSpace {
        origin: response.rect.min,
        info,
    };

    painter.image(
        preview.texture.id(),
        response.rect,
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        egui::Color32::WHITE,
    );

    handle_pointer(ui, &response, state, &page);
    draw_overlays(&painter, state, &page);
}

/// Maps between screen positions and mm on the displayed page
struct PageSpace {
    origin: egui::Pos2,
    info: RenderInfo,
}

impl PageSpace {
    fn to_mm(&self, pos: egui::Pos2) -> PointMm {
        let p = self.info.point_to_mm(
            (pos.x - self.origin.x) as f64,
            (pos.y - self.origin.y) as f64,
        );
        self.info.clamp_to_page(p)
    }

    fn to_screen(&self, p: PointMm) -> egui::Pos2 {
        self.origin
            + egui::vec2(
                self.info.mm_to_px(p.x) as f32,
                self.info.mm_to_px(p.y) as f32,
            )
    }

    fn rect_to_screen(&self, rect: &RectMm) -> egui::Rect {
        egui::Rect::from_min_max(
            self.to_screen(rect.origin()),
            self.to_screen(PointMm::new(rect.right(), rect.bottom())),
        )
    }

    /// Handle grab distance in mm
    fn tolerance(&self) -> f64 {
        self.info.px_to_mm(HANDLE_SIZE as f64)
    }
}

fn handle_pointer(
    ui: &egui::Ui,
    response: &egui::Response,
    state: &mut AppState,
    page: &PageSpace,
) {
    if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
        state.cancel_gesture();
        state.set_mode(EditMode::Idle);
        return;
    }

    let tolerance = page.tolerance();

    if response.drag_started() {
        // Start from where the button went down, not where the drag was detected
        let origin = ui
            .input(|i| i.pointer.press_origin())
            .or(response.interact_pointer_pos());
        if let Some(pos) = origin {
            state.pointer_down(page.to_mm(pos), tolerance);
        }
    } else if response.clicked() && state.mode == EditMode::PlaceDestination {
        if let Some(pos) = response.interact_pointer_pos() {
            state.pointer_down(page.to_mm(pos), tolerance);
        }
    }

    if response.dragged() {
        if let Some(pos) = response.interact_pointer_pos() {
            state.pointer_move(page.to_mm(pos));
        }
    }

    if response.drag_stopped() {
        match ui.ctx().pointer_latest_pos() {
            Some(pos) => state.pointer_up(page.to_mm(pos)),
            None => state.cancel_gesture(),
        }
    }

    if let Some(pos) = response.hover_pos() {
        if let Some(icon) = hover_cursor(state, page.to_mm(pos), tolerance) {
            ui.ctx().set_cursor_icon(icon);
        }
    }
}

fn hover_cursor(state: &AppState, p: PointMm, tolerance: f64) -> Option<egui::CursorIcon> {
    match state.mode {
        EditMode::DrawSource | EditMode::DrawCover | EditMode::PlaceDestination => {
            return Some(egui::CursorIcon::Crosshair);
        }
        EditMode::Idle => {}
    }

    let role = state.hit_target(p, tolerance)?;
    let rect = state.display_rect(role)?;
    let icon = match hit_handle(&rect, p, tolerance) {
        Some(ResizeHandle::North | ResizeHandle::South) => egui::CursorIcon::ResizeVertical,
        Some(ResizeHandle::East | ResizeHandle::West) => egui::CursorIcon::ResizeHorizontal,
        Some(ResizeHandle::NorthWest | ResizeHandle::SouthEast) => egui::CursorIcon::ResizeNwSe,
        Some(ResizeHandle::NorthEast | ResizeHandle::SouthWest) => egui::CursorIcon::ResizeNeSw,
        None if state.is_dragging() => egui::CursorIcon::Grabbing,
        None => egui::CursorIcon::Grab,
    };
    Some(icon)
}

fn draw_overlays(painter: &egui::Painter, state: &AppState, page: &PageSpace) {
    let source = state.display_rect(CoordinateRole::Source);

    if let Some(cover) = state.display_rect(CoordinateRole::Cover) {
        draw_region(painter, page, &cover, COVER_COLOR, "Cover", true);
    }
    if let Some(source) = &source {
        draw_region(painter, page, source, SOURCE_COLOR, "Source", true);
    }

    if let Some(destination) = state.destination() {
        match &source {
            // The pasted image keeps the source size
            Some(source) => {
                let rect = source.moved_to(destination);
                draw_region(painter, page, &rect, DESTINATION_COLOR, "Destination", false);
            }
            None => {
                let center = page.to_screen(destination);
                let stroke = egui::Stroke::new(2.0, DESTINATION_COLOR);
                painter.line_segment([center - egui::vec2(6.0, 0.0), center + egui::vec2(6.0, 0.0)], stroke);
                painter.line_segment([center - egui::vec2(0.0, 6.0), center + egui::vec2(0.0, 6.0)], stroke);
            }
        }
    }
}

fn draw_region(
    painter: &egui::Painter,
    page: &PageSpace,
    rect: &RectMm,
    color: egui::Color32,
    label: &str,
    with_handles: bool,
) {
    let screen = page.rect_to_screen(rect);
    painter.rect_filled(screen, 0.0, color.gamma_multiply(0.15));
    painter.rect_stroke(
        screen,
        0.0,
        egui::Stroke::new(2.0, color),
        egui::StrokeKind::Inside,
    );
    painter.text(
        screen.left_top() - egui::vec2(0.0, 2.0),
        egui::Align2::LEFT_BOTTOM,
        label,
        egui::FontId::proportional(12.0),
        color,
    );

    if with_handles {
        for handle in ResizeHandle::ALL {
            let center = page.to_screen(handle.anchor(rect));
            let square = egui::Rect::from_center_size(center, egui::vec2(HANDLE_SIZE, HANDLE_SIZE));
            painter.rect_filled(square, 0.0, egui::Color32::WHITE);
            painter.rect_stroke(
                square,
                0.0,
                egui::Stroke::new(1.0, color),
                egui::StrokeKind::Inside,
            );
        }
    }
}
