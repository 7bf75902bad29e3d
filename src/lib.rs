//! mindpalette library - text-to-image gallery sessions over the Stability
//! API, with local prompt enhancement

pub mod config;
pub mod enhancer;
pub mod error;
pub mod service;
pub mod session;
pub mod style;

// Re-export commonly used types
pub use config::{Config, ConfigOptions};
pub use enhancer::{CompletionServer, PromptEnhancer, TextGenerator};
pub use error::{EnhanceError, SessionError};
pub use service::GenerationParams;
pub use session::{Gallery, GalleryEntry, ImageSession, UPSCALE_TARGET};
pub use style::ArtStyle;
