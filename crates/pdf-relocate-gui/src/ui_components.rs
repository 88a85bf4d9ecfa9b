use eframe::egui;
use pdf_relocate::{PointMm, RectMm, round_display};

/// Builder for creating drag values with automatic formatting
pub struct DragValueBuilder<'a, T> {
    value: &'a mut T,
    range: Option<std::ops::RangeInclusive<T>>,
    suffix: Option<String>,
    speed: Option<f32>,
    decimals: Option<usize>,
}

impl<'a, T> DragValueBuilder<'a, T>
where
    T: egui::emath::Numeric,
{
    pub fn new(value: &'a mut T) -> Self {
        Self {
            value,
            range: None,
            suffix: None,
            speed: None,
            decimals: None,
        }
    }

    pub fn range(mut self, range: std::ops::RangeInclusive<T>) -> Self {
        self.range = Some(range);
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn speed(mut self, speed: f32) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn decimals(mut self, decimals: usize) -> Self {
        self.decimals = Some(decimals);
        self
    }

    pub fn show(self, ui: &mut egui::Ui) -> bool {
        let mut drag = egui::DragValue::new(self.value);

        if let Some(range) = self.range {
            drag = drag.range(range);
        }

        if let Some(suffix) = self.suffix {
            drag = drag.suffix(suffix);
        }

        if let Some(speed) = self.speed {
            drag = drag.speed(speed);
        }

        if let Some(decimals) = self.decimals {
            drag = drag.fixed_decimals(decimals);
        }

        ui.add(drag).changed()
    }
}

/// Labeled millimeter input shown and stored with one decimal place
pub fn mm_drag(ui: &mut egui::Ui, label: &str, value: &mut f64, min: f64) -> bool {
    ui.horizontal(|ui| {
        ui.label(label);
        let changed = DragValueBuilder::new(value)
            .range(min..=f64::MAX)
            .suffix(" mm")
            .speed(0.1)
            .decimals(1)
            .show(ui);
        if changed {
            *value = round_display(*value);
        }
        changed
    })
    .inner
}

/// x / y / width / height inputs for a rectangle
pub fn rect_editor(ui: &mut egui::Ui, rect: &mut RectMm) -> bool {
    let mut changed = false;
    changed |= mm_drag(ui, "X:", &mut rect.x, 0.0);
    changed |= mm_drag(ui, "Y:", &mut rect.y, 0.0);
    changed |= mm_drag(ui, "Width:", &mut rect.width, 0.1);
    changed |= mm_drag(ui, "Height:", &mut rect.height, 0.1);
    changed
}

/// x / y inputs for a point
pub fn point_editor(ui: &mut egui::Ui, point: &mut PointMm) -> bool {
    let mut changed = false;
    changed |= mm_drag(ui, "X:", &mut point.x, 0.0);
    changed |= mm_drag(ui, "Y:", &mut point.y, 0.0);
    changed
}
