use image::{DynamicImage, ImageBuffer, ImageFormat, Rgba, RgbaImage};
use std::fs::File;
use std::io::{BufRead, BufReader, Seek};
use std::path::{Path, PathBuf};

use crate::error::{PaintError, PaintResult};
use crate::utils::get_file_extension;

/// Input codecs, chosen by file extension only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormatKind {
    Png,
    Gif,
    Jpeg,
}

impl ImageFormatKind {
    /// Resolve the codec from the lowercase extension of `path`
    pub fn from_path(path: &Path) -> PaintResult<Self> {
        match get_file_extension(path).as_deref() {
            Some("png") => Ok(Self::Png),
            Some("gif") => Ok(Self::Gif),
            Some("jpg") | Some("jpeg") => Ok(Self::Jpeg),
            _ => Err(PaintError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    fn image_format(self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Gif => ImageFormat::Gif,
            Self::Jpeg => ImageFormat::Jpeg,
        }
    }
}

/// 16-bit straight RGBA image
pub type Rgba16Image = ImageBuffer<Rgba<u16>, Vec<u16>>;

/// Straight RGBA samples at the precision the codec delivered
#[derive(Debug, Clone)]
pub enum SourcePixels {
    Rgba8(RgbaImage),
    /// 16-bit PNGs keep their full precision until canonicalization
    Rgba16(Rgba16Image),
}

/// A decoded source image
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub pixels: SourcePixels,
}

impl DecodedImage {
    pub fn new(pixels: RgbaImage) -> Self {
        Self {
            pixels: SourcePixels::Rgba8(pixels),
        }
    }

    pub fn from_rgba16(pixels: Rgba16Image) -> Self {
        Self {
            pixels: SourcePixels::Rgba16(pixels),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        match &self.pixels {
            SourcePixels::Rgba8(img) => img.dimensions(),
            SourcePixels::Rgba16(img) => img.dimensions(),
        }
    }
}

/// An opened input file whose codec has already been resolved.
///
/// Decoding consumes the source, so the file handle is closed as soon as
/// decoding finishes, whether it succeeded or not.
#[derive(Debug)]
pub struct ImageSource {
    path: PathBuf,
    format: ImageFormatKind,
    file: File,
}

impl ImageSource {
    /// Stat the input, resolve its codec and open it
    pub fn open(path: &Path) -> PaintResult<Self> {
        std::fs::metadata(path).map_err(|source| PaintError::FileNotFound {
            path: path.to_path_buf(),
            source,
        })?;

        let format = ImageFormatKind::from_path(path)?;

        let file = File::open(path).map_err(|source| PaintError::FileNotFound {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            format,
            file,
        })
    }

    pub fn format(&self) -> ImageFormatKind {
        self.format
    }

    pub fn decode(self) -> PaintResult<DecodedImage> {
        let Self { path, format, file } = self;
        decode_reader(BufReader::new(file), format).map_err(|err| match err {
            PaintError::DecodeError { source, .. } => PaintError::DecodeError { path, source },
            other => other,
        })
    }
}

/// Decode an image from any seekable reader with the given codec
pub fn decode_reader<R: BufRead + Seek>(
    reader: R,
    format: ImageFormatKind,
) -> PaintResult<DecodedImage> {
    let img = image::load(reader, format.image_format()).map_err(|source| {
        PaintError::DecodeError {
            path: PathBuf::new(),
            source,
        }
    })?;

    Ok(match &img {
        DynamicImage::ImageLuma16(_)
        | DynamicImage::ImageLumaA16(_)
        | DynamicImage::ImageRgb16(_)
        | DynamicImage::ImageRgba16(_) => DecodedImage::from_rgba16(img.to_rgba16()),
        _ => DecodedImage::new(img.to_rgba8()),
    })
}
