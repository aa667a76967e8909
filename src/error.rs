use std::path::PathBuf;

/// Errors that terminate a painting run.
///
/// None of these are recoverable: the binary reports the error and exits
/// with a non-zero status, and no partial output is written.
#[derive(Debug, thiserror::Error)]
pub enum PaintError {
    /// A required path was given neither on the command line nor in a config file.
    #[error("missing required {0} path")]
    InputMissing(&'static str),

    /// The input path could not be stat'ed or opened.
    #[error("input file not found: {}", .path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input extension does not map to a known codec.
    #[error("can not determine image format: {}", .path.display())]
    UnsupportedFormat { path: PathBuf },

    /// The codec rejected the input bytes.
    #[error("unable to decode {}: {source}", .path.display())]
    DecodeError {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Encoding or writing the output PNG failed.
    #[error("unable to save {}: {source}", .path.display())]
    WriteError {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The render canvas could not be allocated.
    #[error("unable to allocate a {width}x{height} canvas")]
    CanvasError { width: u32, height: u32 },
}

pub type PaintResult<T> = std::result::Result<T, PaintError>;
