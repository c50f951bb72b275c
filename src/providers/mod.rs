pub mod gemini;
mod gemini_types;
pub mod traits;

pub use gemini::GeminiModel;
pub use traits::VisionModel;
