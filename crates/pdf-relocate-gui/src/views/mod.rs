pub mod actions;
pub mod coordinates;
pub mod documents;
pub mod log_panel;
pub mod page_view;

pub use page_view::PagePreview;
