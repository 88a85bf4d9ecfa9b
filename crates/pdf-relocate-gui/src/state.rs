//! Application state: loaded documents, the edited coordinates and the
//! pointer gesture in progress
//!
//! Everything here is plain data so it can be exercised without a UI.

use pdf_async_runtime::DocumentId;
use pdf_relocate::{
    CoordinateRole, CoordinateStore, Gesture, GestureOutcome, PointMm, RectMm, RelocateOptions,
    constants::DEFAULT_PAGE_NUMBER, gesture::hit_handle,
};
use std::path::PathBuf;

/// What a pointer press on the page does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    /// Move or resize existing rectangles
    #[default]
    Idle,
    DrawSource,
    DrawCover,
    PlaceDestination,
}

#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub id: DocumentId,
    pub path: PathBuf,
    pub page_count: usize,
}

impl LoadedDocument {
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

#[derive(Debug, Clone)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub message: String,
}

pub struct AppState {
    pub documents: Vec<LoadedDocument>,
    pub load_failures: Vec<LoadFailure>,
    pub selected: Option<DocumentId>,
    /// Page shown and edited (1-indexed)
    pub page_number: usize,
    pub mode: EditMode,
    pub save_next_to_input: bool,
    /// Set while a process or batch command is in flight
    pub busy: bool,
    source: Option<RectMm>,
    destination: Option<PointMm>,
    cover: Option<RectMm>,
    gesture: Gesture,
    /// Rectangle the current gesture edits, with its live value
    editing: Option<(CoordinateRole, Option<RectMm>)>,
    store: Option<CoordinateStore>,
}

impl AppState {
    /// Start from the values saved in `store`, if any
    pub fn new(store: Option<CoordinateStore>) -> Self {
        let (source, destination, cover) = match &store {
            Some(store) => (store.source(), store.destination(), store.cover()),
            None => (None, None, None),
        };
        Self {
            documents: Vec::new(),
            load_failures: Vec::new(),
            selected: None,
            page_number: DEFAULT_PAGE_NUMBER,
            mode: EditMode::Idle,
            save_next_to_input: true,
            busy: false,
            source,
            destination,
            cover,
            gesture: Gesture::Idle,
            editing: None,
            store,
        }
    }

    // ---------------------------------------------------------------
    // Documents
    // ---------------------------------------------------------------

    /// Add a loaded document, selecting it if nothing is selected
    pub fn add_document(&mut self, document: LoadedDocument) {
        self.load_failures.retain(|f| f.path != document.path);
        if self.selected.is_none() {
            self.selected = Some(document.id);
            self.page_number = DEFAULT_PAGE_NUMBER;
        }
        self.documents.push(document);
    }

    pub fn add_load_failure(&mut self, path: PathBuf, message: String) {
        self.load_failures.retain(|f| f.path != path);
        self.load_failures.push(LoadFailure { path, message });
    }

    pub fn select(&mut self, doc_id: DocumentId) {
        if self.selected != Some(doc_id) && self.documents.iter().any(|d| d.id == doc_id) {
            self.selected = Some(doc_id);
            self.clamp_page();
            self.cancel_gesture();
        }
    }

    /// Forget a document; the selection moves to its neighbour
    pub fn remove_document(&mut self, doc_id: DocumentId) {
        let Some(index) = self.documents.iter().position(|d| d.id == doc_id) else {
            return;
        };
        self.documents.remove(index);

        if self.selected == Some(doc_id) {
            self.selected = self
                .documents
                .get(index)
                .or_else(|| self.documents.last())
                .map(|d| d.id);
            self.clamp_page();
            self.cancel_gesture();
        }
    }

    pub fn selected_document(&self) -> Option<&LoadedDocument> {
        let id = self.selected?;
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn set_page_number(&mut self, page_number: usize) {
        self.page_number = page_number;
        self.clamp_page();
    }

    fn clamp_page(&mut self) {
        let page_count = self.selected_document().map(|d| d.page_count).unwrap_or(1);
        self.page_number = self.page_number.clamp(1, page_count.max(1));
    }

    // ---------------------------------------------------------------
    // Coordinates
    // ---------------------------------------------------------------

    pub fn source(&self) -> Option<RectMm> {
        self.source
    }

    pub fn destination(&self) -> Option<PointMm> {
        self.destination
    }

    pub fn cover(&self) -> Option<RectMm> {
        self.cover
    }

    pub fn set_source(&mut self, rect: Option<RectMm>) {
        self.source = rect.map(|r| r.rounded());
        self.persist(CoordinateRole::Source);
    }

    pub fn set_destination(&mut self, point: Option<PointMm>) {
        self.destination = point.map(PointMm::rounded);
        self.persist(CoordinateRole::Destination);
    }

    pub fn set_cover(&mut self, rect: Option<RectMm>) {
        self.cover = rect.map(|r| r.rounded());
        self.persist(CoordinateRole::Cover);
    }

    fn persist(&mut self, role: CoordinateRole) {
        let Some(store) = &mut self.store else {
            return;
        };
        let result = match role {
            CoordinateRole::Source => store.set_source(self.source),
            CoordinateRole::Destination => store.set_destination(self.destination),
            CoordinateRole::Cover => store.set_cover(self.cover),
        };
        if let Err(e) = result {
            log::warn!("Failed to save coordinates: {}", e);
        }
    }

    /// Clear every coordinate, here and in the store
    pub fn reset_coordinates(&mut self) {
        self.cancel_gesture();
        self.mode = EditMode::Idle;
        self.source = None;
        self.destination = None;
        self.cover = None;
        if let Some(store) = &mut self.store {
            if let Err(e) = store.reset() {
                log::warn!("Failed to reset saved coordinates: {}", e);
            }
        }
        log::info!("Coordinates reset");
    }

    /// Options for processing, once source and destination are set
    pub fn options(&self) -> Option<RelocateOptions> {
        let mut options = RelocateOptions::new(self.source?, self.destination?);
        options.cover = self.cover;
        options.page_number = self.page_number;
        Some(options)
    }

    /// Rectangle to draw for `role`, including an in-progress gesture
    pub fn display_rect(&self, role: CoordinateRole) -> Option<RectMm> {
        if let Some((editing_role, live)) = self.editing {
            if editing_role == role {
                return live.or(self.stored_rect(role));
            }
        }
        self.stored_rect(role)
    }

    fn stored_rect(&self, role: CoordinateRole) -> Option<RectMm> {
        match role {
            CoordinateRole::Source => self.source,
            CoordinateRole::Cover => self.cover,
            CoordinateRole::Destination => None,
        }
    }

    // ---------------------------------------------------------------
    // Gestures
    // ---------------------------------------------------------------

    pub fn set_mode(&mut self, mode: EditMode) {
        if self.mode != mode {
            self.cancel_gesture();
            self.mode = mode;
        }
    }

    pub fn is_dragging(&self) -> bool {
        !self.gesture.is_idle()
    }

    pub fn cancel_gesture(&mut self) {
        self.gesture.cancel();
        self.editing = None;
    }

    /// Rectangle a press at `p` would grab in idle mode, source first
    pub fn hit_target(&self, p: PointMm, tolerance: f64) -> Option<CoordinateRole> {
        [CoordinateRole::Source, CoordinateRole::Cover]
            .into_iter()
            .find(|role| {
                self.stored_rect(*role)
                    .is_some_and(|r| hit_handle(&r, p, tolerance).is_some() || r.contains(p))
            })
    }

    pub fn pointer_down(&mut self, p: PointMm, tolerance: f64) {
        let (role, allow_draw) = match self.mode {
            EditMode::PlaceDestination => {
                self.set_destination(Some(p));
                self.mode = EditMode::Idle;
                return;
            }
            EditMode::DrawSource => (CoordinateRole::Source, true),
            EditMode::DrawCover => (CoordinateRole::Cover, true),
            EditMode::Idle => match self.hit_target(p, tolerance) {
                Some(role) => (role, false),
                None => return,
            },
        };

        let existing = self.stored_rect(role);
        self.gesture
            .pointer_down(p, existing.as_ref(), allow_draw, tolerance);
        self.editing = (!self.gesture.is_idle()).then_some((role, None));
    }

    pub fn pointer_move(&mut self, p: PointMm) {
        if let GestureOutcome::Preview(rect) = self.gesture.pointer_move(p) {
            if let Some((_, live)) = &mut self.editing {
                *live = Some(rect);
            }
        }
    }

    pub fn pointer_up(&mut self, p: PointMm) {
        let outcome = self.gesture.pointer_up(p);
        let Some((role, _)) = self.editing.take() else {
            return;
        };

        if let GestureOutcome::Commit(rect) = outcome {
            match role {
                CoordinateRole::Source => self.set_source(Some(rect)),
                CoordinateRole::Cover => self.set_cover(Some(rect)),
                CoordinateRole::Destination => {}
            }
            if matches!(self.mode, EditMode::DrawSource | EditMode::DrawCover) {
                self.mode = EditMode::Idle;
            }
        }
    }
}
