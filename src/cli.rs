use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::error::{PaintError, PaintResult};
use crate::image_processing::sort::SortOrder;
use crate::image_processing::PaintConfig;

/// Flags that are also accepted with a single leading dash
const LEGACY_FLAGS: [&str; 3] = ["in", "out", "normal"];

#[derive(Parser, Debug)]
#[command(
    name = "bucketpaint",
    version,
    about = "Repaint an image as one poly-line per exact color",
    long_about = "
Bucket Paint

Every pixel of the input image is grouped with the other pixels of exactly the
same color. The color buckets are ordered by their packed RGB value and each one
is stroked as a single poly-line through its pixels, in scan order, on a canvas
eight times the size of the input. The result is written as PNG.

Example Usage:
  # Default (reverse) color order
  bucketpaint -in photo.jpg -out painted.png

  # Ascending color order, which can give better results on some images
  bucketpaint -in sprite.gif -out painted.png -normal

  # Read paths from a config file and print a timing report
  bucketpaint --config paint.json --report"
)]
pub struct Args {
    /// GIF, PNG or JPEG to read from
    #[arg(short = 'i', long = "in", value_name = "FILE")]
    pub input_path: Option<PathBuf>,

    /// PNG to write to
    #[arg(short = 'o', long = "out", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Normal (ascending) colour sort, might give better results
    #[arg(short = 'n', long = "normal")]
    pub normal: bool,

    /// JSON configuration file; command-line values take precedence
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Enable verbose output with detailed progress information
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Display a table with stage timings and the largest color buckets
    #[arg(long = "report")]
    pub report: bool,

    /// Emit progress and results as JSON lines instead of styled text
    #[arg(long = "json-progress")]
    pub json_progress: bool,
}

impl Args {
    /// Parse the process arguments, accepting `-in`, `-out` and `-normal`
    pub fn parse_with_legacy_flags() -> Self {
        Self::parse_from(normalize_legacy_flags(std::env::args_os()))
    }

    pub fn sort_order(&self) -> SortOrder {
        SortOrder::from_normal_flag(self.normal)
    }

    /// Build the run configuration, failing if either path is missing
    pub fn to_paint_config(&self) -> PaintResult<PaintConfig> {
        let input_path = self
            .input_path
            .clone()
            .ok_or(PaintError::InputMissing("input"))?;
        let output_path = self
            .output_path
            .clone()
            .ok_or(PaintError::InputMissing("output"))?;

        Ok(PaintConfig {
            input_path,
            output_path,
            sort_order: self.sort_order(),
            // stdout carries nothing but JSON lines in that mode
            verbose: self.verbose && !self.json_progress,
        })
    }
}

/// Rewrite single-dash long flags (`-in`, `-out=x`, `-normal`) to their
/// double-dash form. Everything after a bare `--` is left alone.
pub fn normalize_legacy_flags<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut passthrough = false;
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if passthrough {
                return arg;
            }
            if arg.to_str() == Some("--") {
                passthrough = true;
                return arg;
            }
            let rewritten = match arg.to_str().and_then(|text| text.strip_prefix('-')) {
                Some(rest) if !rest.starts_with('-') && is_legacy_flag(rest) => {
                    Some(format!("--{}", rest))
                }
                _ => None,
            };
            rewritten.map(OsString::from).unwrap_or(arg)
        })
        .collect()
}

fn is_legacy_flag(flag: &str) -> bool {
    let name = flag.split_once('=').map_or(flag, |(name, _)| name);
    LEGACY_FLAGS.contains(&name)
}


// Default implementation for tests
#[cfg(test)]
impl Default for Args {
    fn default() -> Self {
        Self {
            input_path: None,
            output_path: None,
            normal: false,
            config_file: None,
            verbose: false,
            report: false,
            json_progress: false,
        }
    }
}
