//! Document I/O and output naming

use crate::constants::OUTPUT_SUFFIX;
use crate::types::*;
use std::path::{Path, PathBuf};

/// Read a PDF file into memory
pub async fn load_pdf_bytes(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    tokio::fs::read(path)
        .await
        .map_err(|e| RelocateError::FileLoad(format!("{}: {}", path.display(), e)))
}

/// Write PDF bytes to disk
pub async fn save_pdf_bytes(bytes: &[u8], path: impl AsRef<Path>) -> Result<()> {
    tokio::fs::write(path, bytes).await?;
    Ok(())
}

/// `<stem>-moved_address.pdf` for an input name
pub fn output_file_name(input_name: &str) -> String {
    let path = Path::new(input_name);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("document");
    format!("{}{}.pdf", stem, OUTPUT_SUFFIX)
}

/// Output path for `input`, placed in `output_dir` or next to the input
pub fn output_path_for(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let name = output_file_name(&input.to_string_lossy());
    match output_dir {
        Some(dir) => dir.join(name),
        None => input.with_file_name(name),
    }
}
