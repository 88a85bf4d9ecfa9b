pub mod documents;
pub mod preview;
pub mod process;
