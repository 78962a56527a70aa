//! Thumbnail collaborator seam.
//!
//! pngcard never decodes images itself. A front end supplies a
//! [`ThumbnailProvider`] and wraps it in a [`ThumbnailCache`], which memoizes
//! rendered thumbnails by `(path, size)` behind an `RwLock` so grid views can
//! ask repeatedly from any thread.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

/// Renders a thumbnail for an image file.
pub trait ThumbnailProvider: Send + Sync {
    /// Encoded thumbnail bytes no larger than `size` pixels on either side,
    /// or `None` if the file cannot be rendered.
    fn render(&self, path: &Path, size: u32) -> Option<Vec<u8>>;
}

type ThumbnailMap = HashMap<(PathBuf, u32), Arc<[u8]>>;

/// Memoizing wrapper around a [`ThumbnailProvider`].
///
/// Only successful renders are cached; a failed render is retried on the next
/// request because the file may have been fixed in between.
#[derive(Debug)]
pub struct ThumbnailCache<P> {
    provider: P,
    entries: RwLock<ThumbnailMap>,
}

impl<P: ThumbnailProvider> ThumbnailCache<P> {
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            entries: RwLock::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn get(&self, path: &Path, size: u32) -> Option<Arc<[u8]>> {
        let key = (path.to_path_buf(), size);
        if let Some(hit) = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Some(Arc::clone(hit));
        }

        let rendered: Arc<[u8]> = self.provider.render(path, size)?.into();
        debug!("Cached {}px thumbnail for {}", size, path.display());
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, Arc::clone(&rendered));
        Some(rendered)
    }

    /// Drop every cached size for one file.
    pub fn invalidate(&self, path: &Path) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(cached, _), _| cached != path);
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
