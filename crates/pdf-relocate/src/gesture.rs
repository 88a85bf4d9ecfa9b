//! Pointer gesture state machine for editing rectangles on the preview
//!
//! All positions are in mm-space. The machine is driven by three events:
//! pointer down, pointer move and pointer up. Which gesture starts on
//! pointer down depends on where the pointer is relative to the existing
//! rectangle (a handle, the body, or empty page) and on the edit mode.

use crate::geometry::{PointMm, RectMm};

/// Smallest width/height a rectangle can be resized or drawn to
pub const MIN_RECT_SIZE_MM: f64 = 1.0;

/// One of the eight resize handles around a rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::North,
        ResizeHandle::NorthEast,
        ResizeHandle::East,
        ResizeHandle::SouthEast,
        ResizeHandle::South,
        ResizeHandle::SouthWest,
        ResizeHandle::West,
        ResizeHandle::NorthWest,
    ];

    /// Which edges this handle moves: (left, top, right, bottom)
    fn edges(self) -> (bool, bool, bool, bool) {
        match self {
            ResizeHandle::North => (false, true, false, false),
            ResizeHandle::NorthEast => (false, true, true, false),
            ResizeHandle::East => (false, false, true, false),
            ResizeHandle::SouthEast => (false, false, true, true),
            ResizeHandle::South => (false, false, false, true),
            ResizeHandle::SouthWest => (true, false, false, true),
            ResizeHandle::West => (true, false, false, false),
            ResizeHandle::NorthWest => (true, true, false, false),
        }
    }

    /// Handle position on a rectangle
    pub fn anchor(self, rect: &RectMm) -> PointMm {
        let cx = rect.x + rect.width / 2.0;
        let cy = rect.y + rect.height / 2.0;
        match self {
            ResizeHandle::North => PointMm::new(cx, rect.y),
            ResizeHandle::NorthEast => PointMm::new(rect.right(), rect.y),
            ResizeHandle::East => PointMm::new(rect.right(), cy),
            ResizeHandle::SouthEast => PointMm::new(rect.right(), rect.bottom()),
            ResizeHandle::South => PointMm::new(cx, rect.bottom()),
            ResizeHandle::SouthWest => PointMm::new(rect.x, rect.bottom()),
            ResizeHandle::West => PointMm::new(rect.x, cy),
            ResizeHandle::NorthWest => PointMm::new(rect.x, rect.y),
        }
    }

    /// Apply a pointer delta to `start`
    ///
    /// Edges are clamped so the rectangle never inverts or shrinks below
    /// [`MIN_RECT_SIZE_MM`]; the opposite edges stay fixed.
    pub fn resize(self, start: &RectMm, dx: f64, dy: f64) -> RectMm {
        let (moves_left, moves_top, moves_right, moves_bottom) = self.edges();
        let mut left = start.x;
        let mut top = start.y;
        let mut right = start.right();
        let mut bottom = start.bottom();

        if moves_left {
            left = (left + dx).min(right - MIN_RECT_SIZE_MM);
        }
        if moves_right {
            right = (right + dx).max(left + MIN_RECT_SIZE_MM);
        }
        if moves_top {
            top = (top + dy).min(bottom - MIN_RECT_SIZE_MM);
        }
        if moves_bottom {
            bottom = (bottom + dy).max(top + MIN_RECT_SIZE_MM);
        }

        RectMm::new(left, top, right - left, bottom - top)
    }
}

/// Handle under `p`, if any, within `tolerance` mm of its anchor
pub fn hit_handle(rect: &RectMm, p: PointMm, tolerance: f64) -> Option<ResizeHandle> {
    ResizeHandle::ALL.into_iter().find(|handle| {
        let a = handle.anchor(rect);
        (a.x - p.x).abs() <= tolerance && (a.y - p.y).abs() <= tolerance
    })
}

/// Current pointer gesture
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    /// Drawing a new rectangle from `anchor` to the pointer
    Drawing { anchor: PointMm, current: PointMm },
    /// Moving the whole rectangle; `start` is the rectangle at pointer down
    DraggingMove { start: RectMm, grab: PointMm },
    /// Dragging one handle; `start` is the rectangle at pointer down
    DraggingResize {
        handle: ResizeHandle,
        start: RectMm,
        grab: PointMm,
    },
}

/// What a pointer event did to the edited rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureOutcome {
    /// Nothing changed
    None,
    /// The rectangle changed but the gesture continues
    Preview(RectMm),
    /// The gesture finished with this rectangle
    Commit(RectMm),
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }

    /// Start a gesture
    ///
    /// With an existing rectangle, a handle hit starts a resize and a body
    /// hit starts a move. Otherwise a new rectangle is drawn when
    /// `allow_draw` is set.
    pub fn pointer_down(
        &mut self,
        p: PointMm,
        existing: Option<&RectMm>,
        allow_draw: bool,
        handle_tolerance: f64,
    ) {
        *self = match existing {
            Some(rect) => match hit_handle(rect, p, handle_tolerance) {
                Some(handle) => Gesture::DraggingResize {
                    handle,
                    start: *rect,
                    grab: p,
                },
                None if rect.contains(p) => Gesture::DraggingMove {
                    start: *rect,
                    grab: p,
                },
                None if allow_draw => Gesture::Drawing {
                    anchor: p,
                    current: p,
                },
                None => Gesture::Idle,
            },
            None if allow_draw => Gesture::Drawing {
                anchor: p,
                current: p,
            },
            None => Gesture::Idle,
        };
    }

    /// Update the gesture with a new pointer position
    pub fn pointer_move(&mut self, p: PointMm) -> GestureOutcome {
        match self {
            Gesture::Idle => GestureOutcome::None,
            Gesture::Drawing { anchor, current } => {
                *current = p;
                GestureOutcome::Preview(RectMm::from_corners(*anchor, p))
            }
            Gesture::DraggingMove { start, grab } => GestureOutcome::Preview(start.moved_to(
                PointMm::new(start.x + p.x - grab.x, start.y + p.y - grab.y),
            )),
            Gesture::DraggingResize {
                handle,
                start,
                grab,
            } => GestureOutcome::Preview(handle.resize(start, p.x - grab.x, p.y - grab.y)),
        }
    }

    /// Finish the gesture and return to idle
    ///
    /// A drawn rectangle smaller than [`MIN_RECT_SIZE_MM`] in either
    /// direction is discarded.
    pub fn pointer_up(&mut self, p: PointMm) -> GestureOutcome {
        let outcome = match self.pointer_move(p) {
            GestureOutcome::Preview(rect) => {
                let too_small =
                    rect.width < MIN_RECT_SIZE_MM || rect.height < MIN_RECT_SIZE_MM;
                if matches!(self, Gesture::Drawing { .. }) && too_small {
                    GestureOutcome::None
                } else {
                    GestureOutcome::Commit(rect)
                }
            }
            other => other,
        };
        *self = Gesture::Idle;
        outcome
    }

    /// Abandon the gesture without changing anything
    pub fn cancel(&mut self) {
        *self = Gesture::Idle;
    }
}
