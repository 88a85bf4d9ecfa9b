pub mod constants;
pub mod gesture;
pub mod relocate;
pub mod render;
pub mod writer;
mod geometry;
mod options;
#[cfg(feature = "serde")]
mod store;
mod types;

pub use geometry::*;
pub use gesture::{Gesture, GestureOutcome, ResizeHandle};
pub use options::*;
pub use relocate::{
    BatchFailure, BatchInput, BatchReport, load_pdf_bytes, output_file_name, output_path_for,
    relocate, relocate_batch, relocate_sync, save_pdf_bytes,
};
pub use render::{PageRasterizer, RenderedPage};
#[cfg(feature = "pdfium")]
pub use render::PdfiumRasterizer;
#[cfg(feature = "serde")]
pub use store::{CoordinateRole, CoordinateStore, StoredCoordinates};
pub use types::*;
pub use writer::EditableDocument;
