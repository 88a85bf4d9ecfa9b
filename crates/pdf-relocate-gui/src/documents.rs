use pdf_async_runtime::{DocumentId, RenderInfo};
use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::Arc;

/// A document held by the worker
pub struct OpenDocument {
    pub path: PathBuf,
    pub bytes: Arc<Vec<u8>>,
    pub page_count: usize,
}

impl OpenDocument {
    /// File name for messages
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Rendered preview kept for quick re-display
#[derive(Clone)]
pub struct CachedPreview {
    pub rgba_data: Vec<u8>,
    pub width: usize,
    pub height: usize,
    pub render_info: RenderInfo,
}

/// (document, page index, target width in px)
pub type PreviewKey = (DocumentId, usize, u32);

/// Maximum number of previews to cache
const MAX_CACHED_PREVIEWS: usize = 16;

/// Worker-side registry of loaded documents and recent previews
#[derive(Default)]
pub struct DocumentStore {
    documents: HashMap<DocumentId, OpenDocument>,
    preview_cache: HashMap<PreviewKey, CachedPreview>,
    cache_order: VecDeque<PreviewKey>,
    next_doc_id: u64,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, document: OpenDocument) -> DocumentId {
        let doc_id = DocumentId(self.next_doc_id);
        self.next_doc_id += 1;
        self.documents.insert(doc_id, document);
        doc_id
    }

    pub fn get(&self, doc_id: &DocumentId) -> Option<&OpenDocument> {
        self.documents.get(doc_id)
    }

    pub fn remove(&mut self, doc_id: DocumentId) -> Option<OpenDocument> {
        self.cache_order.retain(|(id, _, _)| *id != doc_id);
        self.preview_cache.retain(|(id, _, _), _| *id != doc_id);
        self.documents.remove(&doc_id)
    }

    pub fn add_to_cache(&mut self, key: PreviewKey, preview: CachedPreview) {
        // Remove if already exists (update LRU)
        if self.preview_cache.contains_key(&key) {
            self.cache_order.retain(|k| k != &key);
        }

        while self.cache_order.len() >= MAX_CACHED_PREVIEWS {
            if let Some(old_key) = self.cache_order.pop_front() {
                self.preview_cache.remove(&old_key);
            }
        }

        self.preview_cache.insert(key, preview);
        self.cache_order.push_back(key);
    }

    pub fn get_from_cache(&mut self, key: &PreviewKey) -> Option<&CachedPreview> {
        if self.preview_cache.contains_key(key) {
            self.cache_order.retain(|k| k != key);
            self.cache_order.push_back(*key);
            self.preview_cache.get(key)
        } else {
            None
        }
    }
}
