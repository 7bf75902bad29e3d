//! Gallery - ordered, append-only history of generated images

use std::sync::Arc;

use chrono::{DateTime, Local};
use image::DynamicImage;

/// One generated image with the prompt that produced it.
/// Immutable once appended; the bitmap is shared with `last_image` via `Arc`.
#[derive(Debug, Clone)]
pub struct GalleryEntry {
    pub prompt: String,
    pub image: Arc<DynamicImage>,
    pub created_at: DateTime<Local>,
}

impl GalleryEntry {
    pub(crate) fn new(prompt: String, image: Arc<DynamicImage>) -> Self {
        Self {
            prompt,
            image,
            created_at: Local::now(),
        }
    }

    /// Wall-clock caption timestamp, e.g. `14:03:27`.
    pub fn time_label(&self) -> String {
        self.created_at.format("%H:%M:%S").to_string()
    }
}

/// Ordered session history. Grows without bound for the session lifetime;
/// entries are never removed or reordered.
#[derive(Debug, Default)]
pub struct Gallery {
    entries: Vec<GalleryEntry>,
}

impl Gallery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&GalleryEntry> {
        self.entries.get(index)
    }

    /// Most recently appended entry.
    pub fn last(&self) -> Option<&GalleryEntry> {
        self.entries.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GalleryEntry> {
        self.entries.iter()
    }

    pub(crate) fn push(&mut self, entry: GalleryEntry) {
        self.entries.push(entry);
    }
}

impl<'a> IntoIterator for &'a Gallery {
    type Item = &'a GalleryEntry;
    type IntoIter = std::slice::Iter<'a, GalleryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_preserved() {
        let mut gallery = Gallery::new();
        let image = Arc::new(DynamicImage::new_rgb8(1, 1));
        gallery.push(GalleryEntry::new("first".to_string(), image.clone()));
        gallery.push(GalleryEntry::new("second".to_string(), image));

        assert_eq!(gallery.len(), 2);
        assert_eq!(gallery.get(0).unwrap().prompt, "first");
        assert_eq!(gallery.get(1).unwrap().prompt, "second");
        assert_eq!(gallery.last().unwrap().prompt, "second");
    }
}
