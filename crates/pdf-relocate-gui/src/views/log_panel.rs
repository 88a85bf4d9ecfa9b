use eframe::egui;
use log::Level;

use crate::logger::AppLogger;

pub fn show(ui: &mut egui::Ui, logger: &AppLogger) {
    ui.horizontal(|ui| {
        ui.label("Log");
        if ui.small_button("Clear").clicked() {
            logger.clear();
        }
    });

    egui::ScrollArea::vertical()
        .max_height(150.0)
        .stick_to_bottom(true)
        .auto_shrink([false, true])
        .show(ui, |ui| {
            for entry in logger.entries() {
                let color = match entry.level {
                    Level::Error => ui.visuals().error_fg_color,
                    Level::Warn => ui.visuals().warn_fg_color,
                    _ => ui.visuals().text_color(),
                };
                ui.colored_label(
                    color,
                    format!(
                        "{} [{}] {}",
                        entry.timestamp.format("%H:%M:%S"),
                        entry.level,
                        entry.message
                    ),
                );
            }
        });
}
