//! Remote synthesis API clients

pub mod stability;

pub use stability::{call_generation_endpoint, GenerationParams};
