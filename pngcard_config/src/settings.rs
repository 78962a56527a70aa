//! Viewer preferences that outlive a run.

use crate::schema::ViewerConfig;

pub const DEFAULT_THUMBNAIL_SIZE: u32 = 150;
pub const MIN_THUMBNAIL_SIZE: u32 = 50;
pub const MAX_THUMBNAIL_SIZE: u32 = 500;

/// Typed accessors over [`ViewerConfig`]. Sizes are clamped on both read and
/// write, so a hand-edited file cannot produce an out-of-range thumbnail.
#[derive(Debug)]
pub struct Settings<'a> {
    viewer: &'a mut ViewerConfig,
}

impl<'a> Settings<'a> {
    #[must_use]
    pub const fn new(viewer: &'a mut ViewerConfig) -> Self {
        Self { viewer }
    }

    #[must_use]
    pub fn thumbnail_size(&self) -> u32 {
        self.viewer
            .thumbnail_size
            .clamp(MIN_THUMBNAIL_SIZE, MAX_THUMBNAIL_SIZE)
    }

    pub fn set_thumbnail_size(&mut self, size: u32) {
        self.viewer.thumbnail_size = size.clamp(MIN_THUMBNAIL_SIZE, MAX_THUMBNAIL_SIZE);
    }

    #[must_use]
    pub fn last_folder(&self) -> Option<&str> {
        self.viewer.last_folder.as_deref()
    }

    pub fn set_last_folder(&mut self, folder: impl Into<String>) {
        self.viewer.last_folder = Some(folder.into());
    }
}
