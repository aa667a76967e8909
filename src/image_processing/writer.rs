use image::{ImageError, ImageFormat, RgbaImage};
use std::ffi::OsString;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use crate::error::{PaintError, PaintResult};

/// Encode `canvas` as PNG at `path`, replacing any existing file.
///
/// The image is encoded in memory and written to a sibling file that is
/// renamed over `path`, so a failed save leaves the old file untouched.
pub fn save_png(canvas: &RgbaImage, path: &Path) -> PaintResult<()> {
    let write_error = |source: ImageError| PaintError::WriteError {
        path: path.to_path_buf(),
        source,
    };

    let mut bytes = Vec::new();
    canvas
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(write_error)?;

    let staging = staging_path(path);
    let result = fs::write(&staging, &bytes).and_then(|_| fs::rename(&staging, path));
    if result.is_err() {
        fs::remove_file(&staging).ok();
    }
    result.map_err(|err| write_error(ImageError::IoError(err)))
}

/// Hidden file next to `path` that receives the encoded bytes first
fn staging_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(path.file_name().unwrap_or_else(|| path.as_os_str()));
    name.push(".partial");
    path.with_file_name(name)
}
