//! ImageSession - the four user-facing gallery operations

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use image::imageops::FilterType;
use image::DynamicImage;
use reqwest::Client;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::SessionError;
use crate::service::{call_generation_endpoint, GenerationParams};

use super::export;
use super::gallery::{Gallery, GalleryEntry};

/// Upscale target resolution (width, height).
pub const UPSCALE_TARGET: (u32, u32) = (2048, 2048);

/// Default number of variation calls.
pub const DEFAULT_VARIATION_COUNT: usize = 2;

/// One user's generation session: the append-only gallery plus a shared
/// handle to the most recent bitmap. Created empty at session start and
/// discarded at session end; nothing is persisted.
pub struct ImageSession {
    config: Arc<Config>,
    client: Client,
    gallery: Gallery,
    last_image: Option<Arc<DynamicImage>>,
}

impl ImageSession {
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            config,
            client,
            gallery: Gallery::new(),
            last_image: None,
        })
    }

    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    /// Bitmap of the most recently appended entry, if any. Shared, not owned:
    /// this always points into the newest gallery entry.
    pub fn last_image(&self) -> Option<&Arc<DynamicImage>> {
        self.last_image.as_ref()
    }

    /// Whether variations/upscale are available.
    pub fn has_image(&self) -> bool {
        self.last_image.is_some()
    }

    /// Generate one image from a prompt via the remote synthesis API.
    ///
    /// On success the image is appended to the gallery and becomes the new
    /// `last_image`. On failure the session state is untouched.
    pub async fn generate(
        &mut self,
        prompt: &str,
        params: GenerationParams,
    ) -> Result<Arc<DynamicImage>, SessionError> {
        let image = call_generation_endpoint(&self.client, &self.config, prompt, params).await?;
        Ok(self.append(prompt.to_string(), image))
    }

    /// Generate `count` independent variations of a prompt.
    ///
    /// Requires a prior successful generation; returns an empty list
    /// otherwise. Calls run sequentially and a failed call does not abort the
    /// remaining ones; each successful image is appended as
    /// `"{prompt} (var)"`.
    pub async fn variations(
        &mut self,
        prompt: &str,
        count: usize,
    ) -> Vec<Result<Arc<DynamicImage>, SessionError>> {
        if !self.has_image() {
            warn!("Variations requested with no source image; skipping");
            return Vec::new();
        }

        let tagged_prompt = format!("{} (var)", prompt);
        let mut results = Vec::with_capacity(count);

        for i in 0..count {
            info!("Generating variation {}/{}", i + 1, count);
            match call_generation_endpoint(
                &self.client,
                &self.config,
                prompt,
                GenerationParams::default(),
            )
            .await
            {
                Ok(image) => results.push(Ok(self.append(tagged_prompt.clone(), image))),
                Err(e) => {
                    warn!("Variation {}/{} failed: {}", i + 1, count, e);
                    results.push(Err(e));
                }
            }
        }

        results
    }

    /// Upscale the current image to `target` with a local bicubic resize.
    ///
    /// Not a remote call and consumes no generation budget. Requires a prior
    /// successful generation; returns `None` otherwise. The upscaled bitmap
    /// is appended as `"{prompt} (upscaled)"` and becomes the new
    /// `last_image`.
    pub fn upscale(&mut self, target: (u32, u32)) -> Option<Arc<DynamicImage>> {
        let source = self.last_image.as_ref()?;
        let prompt = self
            .gallery
            .last()
            .map(|entry| entry.prompt.clone())
            .unwrap_or_default();

        info!(
            "Upscaling {}x{} -> {}x{}",
            source.width(),
            source.height(),
            target.0,
            target.1
        );

        let upscaled = source.resize_exact(target.0, target.1, FilterType::CatmullRom);
        Some(self.append(format!("{} (upscaled)", prompt), upscaled))
    }

    /// Encode every gallery entry as PNG and pack them into one in-memory
    /// ZIP archive, named `mindpalette_{1..N}.png` in gallery order.
    pub fn export_all(&self) -> Result<Vec<u8>> {
        export::zip_gallery(&self.gallery)
    }

    /// PNG bytes for the gallery entry at `index` (0-based).
    /// Fails with [`SessionError::NoSourceImage`] when no entry exists there.
    pub fn export_one(&self, index: usize) -> Result<Vec<u8>> {
        let entry = self.gallery.get(index).ok_or(SessionError::NoSourceImage)?;
        export::encode_png(&entry.image)
    }

    fn append(&mut self, prompt: String, image: DynamicImage) -> Arc<DynamicImage> {
        let image = Arc::new(image);
        self.gallery.push(GalleryEntry::new(prompt, image.clone()));
        self.last_image = Some(image.clone());
        image
    }
}
