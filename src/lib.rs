// Library exports for reuse by the binary and tests
pub mod cli;
pub mod config_file;
pub mod error;
pub mod image_processing;
pub mod json_output;
pub mod utils;

// Re-export commonly used types
pub use cli::Args;
pub use error::{PaintError, PaintResult};
pub use image_processing::{
    PaintConfig, PaintingEngine, PaintingResult, Stage, StageTiming,
};
pub use json_output::JsonMessage;
