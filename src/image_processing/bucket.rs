use image::Rgba;
use std::collections::HashMap;
use std::fmt;

use super::loader::{DecodedImage, SourcePixels};
use super::sort::{sort_keys, SortOrder};

/// A pixel coordinate in the source image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pixel {
    pub x: u32,
    pub y: u32,
}

impl Pixel {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Packed 24-bit RGB value used to group and order buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColorKey(u32);

impl ColorKey {
    pub const fn new(rgb: u32) -> Self {
        Self(rgb & 0x00ff_ffff)
    }

    /// Key of a canonical color; alpha does not take part
    pub fn from_color(color: Rgba<u8>) -> Self {
        let [r, g, b, _] = color.0;
        Self(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ColorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:06X}", self.0)
    }
}

/// Convert a straight RGBA pixel to its canonical alpha-premultiplied form.
///
/// Channels are widened to 16 bits first, so an opaque pixel is returned
/// unchanged.
pub fn canonical_color(pixel: Rgba<u8>) -> Rgba<u8> {
    let [r, g, b, a] = pixel.0;
    let widen = |c: u8| c as u16 * 0x101;
    canonical_color16(Rgba([widen(r), widen(g), widen(b), widen(a)]))
}

/// Premultiply a straight 16-bit pixel at full precision, then keep the
/// high byte of every channel.
pub fn canonical_color16(pixel: Rgba<u16>) -> Rgba<u8> {
    let [r, g, b, a] = pixel.0;
    let a16 = a as u32;
    let premultiply = |c: u16| ((c as u32 * a16 / 0xffff) >> 8) as u8;

    Rgba([premultiply(r), premultiply(g), premultiply(b), (a >> 8) as u8])
}

/// Pixels sharing one exact color key
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    key: ColorKey,
    color: Rgba<u8>,
    pixels: Vec<Pixel>,
}

impl Bucket {
    fn new(key: ColorKey, color: Rgba<u8>) -> Self {
        Self {
            key,
            color,
            pixels: Vec::new(),
        }
    }

    pub fn key(&self) -> ColorKey {
        self.key
    }

    /// Canonical color of the first pixel seen with this key
    pub fn color(&self) -> Rgba<u8> {
        self.color
    }

    /// Pixels in raster-scan order
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

/// Buckets indexed by color key, iterated in first-seen order
#[derive(Debug, Clone, Default)]
pub struct ColorBuckets {
    buckets: Vec<Bucket>,
    index: HashMap<ColorKey, usize>,
}

impl ColorBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `pixel` to the bucket of `color`, creating the bucket if needed
    pub fn push(&mut self, pixel: Pixel, color: Rgba<u8>) {
        let key = ColorKey::from_color(color);
        let slot = match self.index.get(&key) {
            Some(&slot) => slot,
            None => {
                let slot = self.buckets.len();
                self.buckets.push(Bucket::new(key, color));
                self.index.insert(key, slot);
                slot
            }
        };
        self.buckets[slot].pixels.push(pixel);
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn get(&self, key: ColorKey) -> Option<&Bucket> {
        self.index.get(&key).map(|&slot| &self.buckets[slot])
    }

    /// Distinct keys in first-seen order
    pub fn keys(&self) -> Vec<ColorKey> {
        self.buckets.iter().map(Bucket::key).collect()
    }

    /// Distinct keys ordered for drawing
    pub fn sorted_keys(&self, order: SortOrder) -> Vec<ColorKey> {
        let mut keys = self.keys();
        sort_keys(&mut keys, order);
        keys
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bucket> {
        self.buckets.iter()
    }

    pub fn pixel_count(&self) -> usize {
        self.buckets.iter().map(Bucket::len).sum()
    }
}

/// Group every pixel of `image` by its exact canonical color, in raster order
pub fn bucketize(image: &DecodedImage) -> ColorBuckets {
    let mut buckets = ColorBuckets::new();
    match &image.pixels {
        SourcePixels::Rgba8(img) => {
            for (x, y, pixel) in img.enumerate_pixels() {
                buckets.push(Pixel::new(x, y), canonical_color(*pixel));
            }
        }
        SourcePixels::Rgba16(img) => {
            for (x, y, pixel) in img.enumerate_pixels() {
                buckets.push(Pixel::new(x, y), canonical_color16(*pixel));
            }
        }
    }
    buckets
}
