//! Image session - gallery state, generation actions, and export

pub mod export;
pub mod gallery;
pub mod image_session;

pub use gallery::{Gallery, GalleryEntry};
pub use image_session::{ImageSession, UPSCALE_TARGET};
