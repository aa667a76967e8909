use image::{Rgba, RgbaImage};
use tiny_skia::{
    LineCap, LineJoin, Paint, PathBuilder, Pixmap, PremultipliedColorU8, Stroke, Transform,
};

use super::bucket::{Bucket, ColorBuckets, ColorKey};
use crate::error::{PaintError, PaintResult};

/// Every source coordinate is multiplied by this when drawn; it is also the stroke width
pub const SCALE: u32 = 8;

/// One bucket turned into drawing instructions
#[derive(Debug, Clone, PartialEq)]
pub struct StrokePath {
    pub key: ColorKey,
    /// Canonical (premultiplied) bucket color
    pub color: Rgba<u8>,
    pub width: f32,
    pub points: Vec<(f32, f32)>,
}

/// Build the poly-line for a bucket.
///
/// The first point is shifted left by `scale / 2` source pixels before
/// scaling. A single-pixel bucket becomes a short horizontal tick ending
/// on the pixel; larger buckets continue through every remaining pixel in
/// raster order, however far apart they are.
pub fn build_stroke(bucket: &Bucket, scale: u32) -> StrokePath {
    let s = scale as i64;
    let half = s / 2;
    let scaled = |v: i64| (v * s) as f32;

    let mut points = Vec::with_capacity(bucket.len().max(2));
    let pixels = bucket.pixels();
    if let Some(first) = pixels.first() {
        points.push((scaled(first.x as i64 - half), scaled(first.y as i64)));
        if pixels.len() == 1 {
            points.push((scaled(first.x as i64), scaled(first.y as i64)));
        } else {
            for p in &pixels[1..] {
                points.push((scaled(p.x as i64), scaled(p.y as i64)));
            }
        }
    }

    StrokePath {
        key: bucket.key(),
        color: bucket.color(),
        width: scale as f32,
        points,
    }
}

/// Something poly-lines can be stroked onto
pub trait Surface {
    fn stroke_polyline(&mut self, stroke: &StrokePath);

    /// Finish drawing and hand back straight-alpha pixels
    fn into_image(self) -> RgbaImage
    where
        Self: Sized;
}

/// Anti-aliased surface backed by a tiny-skia pixmap, transparent at start
pub struct SkiaSurface {
    pixmap: Pixmap,
}

impl SkiaSurface {
    pub fn new(width: u32, height: u32) -> PaintResult<Self> {
        let pixmap = Pixmap::new(width, height).ok_or(PaintError::CanvasError { width, height })?;
        Ok(Self { pixmap })
    }
}

impl Surface for SkiaSurface {
    fn stroke_polyline(&mut self, stroke: &StrokePath) {
        let Some((first, rest)) = stroke.points.split_first() else {
            return;
        };

        let mut pb = PathBuilder::new();
        pb.move_to(first.0, first.1);
        for &(x, y) in rest {
            pb.line_to(x, y);
        }
        let Some(path) = pb.finish() else {
            return;
        };

        // Bucket colors are premultiplied; tiny-skia paints with straight alpha.
        let [r, g, b, a] = stroke.color.0;
        let straight = PremultipliedColorU8::from_rgba(r, g, b, a)
            .map(|c| c.demultiply())
            .unwrap_or_else(|| tiny_skia::ColorU8::from_rgba(r, g, b, a));

        let mut paint = Paint::default();
        paint.set_color_rgba8(
            straight.red(),
            straight.green(),
            straight.blue(),
            straight.alpha(),
        );
        paint.anti_alias = true;

        let line = Stroke {
            width: stroke.width,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };

        self.pixmap
            .stroke_path(&path, &paint, &line, Transform::identity(), None);
    }

    fn into_image(self) -> RgbaImage {
        let (width, height) = (self.pixmap.width(), self.pixmap.height());
        let mut img = RgbaImage::new(width, height);
        for (dst, src) in img.pixels_mut().zip(self.pixmap.pixels()) {
            let c = src.demultiply();
            *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
        }
        img
    }
}

/// Stroke the buckets named by `keys`, in that order, onto `surface`.
///
/// `on_bucket` receives the number of buckets drawn so far.
pub fn render<S, F>(buckets: &ColorBuckets, keys: &[ColorKey], surface: &mut S, mut on_bucket: F)
where
    S: Surface,
    F: FnMut(usize),
{
    for (i, key) in keys.iter().enumerate() {
        if let Some(bucket) = buckets.get(*key) {
            surface.stroke_polyline(&build_stroke(bucket, SCALE));
        }
        on_bucket(i + 1);
    }
}

/// Canvas size for a source image of `width` x `height`
pub fn canvas_dimensions(width: u32, height: u32) -> PaintResult<(u32, u32)> {
    match (width.checked_mul(SCALE), height.checked_mul(SCALE)) {
        (Some(w), Some(h)) => Ok((w, h)),
        _ => Err(PaintError::CanvasError { width, height }),
    }
}

/// Render every bucket onto a fresh canvas `SCALE` times the source size
pub fn paint<F>(
    buckets: &ColorBuckets,
    keys: &[ColorKey],
    width: u32,
    height: u32,
    on_bucket: F,
) -> PaintResult<RgbaImage>
where
    F: FnMut(usize),
{
    let (canvas_width, canvas_height) = canvas_dimensions(width, height)?;
    if canvas_width == 0 || canvas_height == 0 {
        return Ok(RgbaImage::new(canvas_width, canvas_height));
    }

    let mut surface = SkiaSurface::new(canvas_width, canvas_height)?;
    render(buckets, keys, &mut surface, on_bucket);
    Ok(surface.into_image())
}
