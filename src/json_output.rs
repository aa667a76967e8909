//! JSON output for scripted use
//!
//! When --json-progress is enabled, stage timings and the final result are
//! emitted as JSON lines to stdout, suppressing all other output.

use serde::{Deserialize, Serialize};

use crate::image_processing::{PaintingResult, Stage, StageTiming};

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum JsonMessage {
    /// A pipeline stage finished
    Stage { stage: String, duration_ms: f64 },
    /// Painting completed
    Summary {
        input_path: String,
        output_path: String,
        width: u32,
        height: u32,
        buckets: usize,
        pixels: usize,
        duration_secs: f64,
    },
    /// The run failed
    Error { error: String },
}

impl JsonMessage {
    /// Emit JSON message to stdout
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            println!("{}", json);
        }
    }

    pub fn stage(timing: &StageTiming) -> Self {
        Self::Stage {
            stage: timing.stage.label().to_string(),
            duration_ms: timing.duration.as_micros() as f64 / 1000.0,
        }
    }

    pub fn summary(result: &PaintingResult) -> Self {
        let (width, height) = result.canvas_dimensions;
        Self::Summary {
            input_path: result.input_path.display().to_string(),
            output_path: result.output_path.display().to_string(),
            width,
            height,
            buckets: result.bucket_count,
            pixels: result.pixel_count,
            duration_secs: result
                .timing(Stage::Overall)
                .map(|d| d.as_secs_f64())
                .unwrap_or_default(),
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self::Error {
            error: error.into(),
        }
    }
}
