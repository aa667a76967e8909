pub mod bucket;
pub mod loader;
pub mod render;
pub mod report;
pub mod sort;
pub mod writer;

use indicatif::ProgressBar;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::error::PaintResult;
use crate::utils::verbose_println;
use bucket::{bucketize, Bucket, ColorBuckets, ColorKey};
use loader::ImageSource;
use sort::SortOrder;

/// Number of buckets listed in the report
const REPORT_TOP_BUCKETS: usize = 10;

/// Settings for one painting run, built once from the command line
#[derive(Debug, Clone)]
pub struct PaintConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub sort_order: SortOrder,
    pub verbose: bool,
}

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Decode,
    Bucketing,
    Sorting,
    ReverseSorting,
    Drawing,
    Saving,
    Overall,
}

impl Stage {
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Load => "Load",
            Stage::Decode => "Decode",
            Stage::Bucketing => "Bucketing",
            Stage::Sorting => "Sorting",
            Stage::ReverseSorting => "Reverse sorting",
            Stage::Drawing => "Drawing",
            Stage::Saving => "Saving",
            Stage::Overall => "Overall",
        }
    }

    fn for_sort(order: SortOrder) -> Self {
        match order {
            SortOrder::Normal => Stage::Sorting,
            SortOrder::Reverse => Stage::ReverseSorting,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageTiming {
    pub stage: Stage,
    pub duration: Duration,
}

/// Summary of one bucket, kept for reporting after the pixels are gone
#[derive(Debug, Clone, PartialEq)]
pub struct BucketSummary {
    pub key: ColorKey,
    pub alpha: u8,
    pub pixels: usize,
}

impl From<&Bucket> for BucketSummary {
    fn from(bucket: &Bucket) -> Self {
        Self {
            key: bucket.key(),
            alpha: bucket.color()[3],
            pixels: bucket.len(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PaintingResult {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub source_dimensions: (u32, u32),
    pub canvas_dimensions: (u32, u32),
    pub sort_order: SortOrder,
    pub bucket_count: usize,
    pub pixel_count: usize,
    pub single_pixel_buckets: usize,
    /// Largest buckets, biggest first
    pub top_buckets: Vec<BucketSummary>,
    pub timings: Vec<StageTiming>,
}

impl PaintingResult {
    pub fn timing(&self, stage: Stage) -> Option<Duration> {
        self.timings
            .iter()
            .find(|t| t.stage == stage)
            .map(|t| t.duration)
    }
}

pub struct PaintingEngine {
    config: PaintConfig,
}

impl PaintingEngine {
    pub fn new(config: PaintConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PaintConfig {
        &self.config
    }

    /// Run load, decode, bucketing, sorting, drawing and saving in order.
    ///
    /// `on_stage` is called as soon as each stage finishes, so timings are
    /// reported even when a later stage fails. `progress` is advanced once
    /// per bucket while drawing.
    pub fn run<F>(&self, progress: &ProgressBar, mut on_stage: F) -> PaintResult<PaintingResult>
    where
        F: FnMut(&StageTiming),
    {
        let config = &self.config;
        let start = Instant::now();
        let mut timings = Vec::new();
        let mut finish = |stage: Stage, since: Instant| {
            let timing = StageTiming {
                stage,
                duration: since.elapsed(),
            };
            on_stage(&timing);
            timings.push(timing);
        };

        let dt = Instant::now();
        let source = ImageSource::open(&config.input_path)?;
        finish(Stage::Load, dt);

        let dt = Instant::now();
        let image = source.decode()?;
        finish(Stage::Decode, dt);

        let (width, height) = image.dimensions();
        verbose_println(
            config.verbose,
            &format!("Decoded {}x{} image", width, height),
        );

        let dt = Instant::now();
        let buckets = bucketize(&image);
        finish(Stage::Bucketing, dt);
        drop(image);

        verbose_println(
            config.verbose,
            &format!(
                "{} distinct colors across {} pixels",
                buckets.len(),
                buckets.pixel_count()
            ),
        );

        let dt = Instant::now();
        let keys = buckets.sorted_keys(config.sort_order);
        finish(Stage::for_sort(config.sort_order), dt);

        let dt = Instant::now();
        progress.set_length(keys.len() as u64);
        let canvas = render::paint(&buckets, &keys, width, height, |drawn| {
            progress.set_position(drawn as u64)
        })?;
        progress.finish_and_clear();
        finish(Stage::Drawing, dt);

        let dt = Instant::now();
        writer::save_png(&canvas, &config.output_path)?;
        finish(Stage::Saving, dt);

        finish(Stage::Overall, start);

        Ok(PaintingResult {
            input_path: config.input_path.clone(),
            output_path: config.output_path.clone(),
            source_dimensions: (width, height),
            canvas_dimensions: canvas.dimensions(),
            sort_order: config.sort_order,
            bucket_count: buckets.len(),
            pixel_count: buckets.pixel_count(),
            single_pixel_buckets: buckets.iter().filter(|b| b.len() == 1).count(),
            top_buckets: top_buckets(&buckets, REPORT_TOP_BUCKETS),
            timings,
        })
    }
}

/// The `limit` largest buckets, biggest first; ties keep first-seen order
pub fn top_buckets(buckets: &ColorBuckets, limit: usize) -> Vec<BucketSummary> {
    let mut all: Vec<&Bucket> = buckets.iter().collect();
    all.sort_by(|a, b| b.len().cmp(&a.len()));
    all.into_iter().take(limit).map(BucketSummary::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PaintError;
    use image::{Rgba, RgbaImage};

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("bucketpaint_engine_{}_{}", std::process::id(), name))
    }

    fn engine(input: PathBuf, output: PathBuf, sort_order: SortOrder) -> PaintingEngine {
        PaintingEngine::new(PaintConfig {
            input_path: input,
            output_path: output,
            sort_order,
            verbose: false,
        })
    }

    #[test]
    fn test_full_run_scales_output() {
        let input = temp_path("full_in.png");
        let output = temp_path("full_out.png");
        let mut img = RgbaImage::from_pixel(3, 2, Rgba([20, 40, 60, 255]));
        img.put_pixel(2, 1, Rgba([255, 0, 0, 255]));
        img.save(&input).unwrap();

        let mut stages = Vec::new();
        let result = engine(input.clone(), output.clone(), SortOrder::Reverse)
            .run(&ProgressBar::hidden(), |t| stages.push(t.stage))
            .unwrap();

        assert_eq!(
            stages,
            vec![
                Stage::Load,
                Stage::Decode,
                Stage::Bucketing,
                Stage::ReverseSorting,
                Stage::Drawing,
                Stage::Saving,
                Stage::Overall,
            ]
        );
        assert_eq!(result.source_dimensions, (3, 2));
        assert_eq!(result.canvas_dimensions, (24, 16));
        assert_eq!(result.bucket_count, 2);
        assert_eq!(result.pixel_count, 6);
        assert_eq!(result.single_pixel_buckets, 1);
        assert_eq!(result.top_buckets[0].key, ColorKey::new(0x14283c));
        assert!(result.timing(Stage::Overall).is_some());

        let written = image::open(&output).unwrap();
        assert_eq!((written.width(), written.height()), (24, 16));

        std::fs::remove_file(&input).ok();
        std::fs::remove_file(&output).ok();
    }

    #[test]
    fn test_normal_order_uses_sorting_stage() {
        let input = temp_path("normal_in.gif");
        let output = temp_path("normal_out.png");
        RgbaImage::from_pixel(1, 1, Rgba([0, 0, 255, 255]))
            .save(&input)
            .unwrap();

        let mut stages = Vec::new();
        engine(input.clone(), output.clone(), SortOrder::Normal)
            .run(&ProgressBar::hidden(), |t| stages.push(t.stage))
            .unwrap();
        assert!(stages.contains(&Stage::Sorting));
        assert!(!stages.contains(&Stage::ReverseSorting));

        std::fs::remove_file(&input).ok();
        std::fs::remove_file(&output).ok();
    }

    #[test]
    fn test_decode_failure_writes_nothing() {
        let input = temp_path("bad_in.png");
        let output = temp_path("bad_out.png");
        std::fs::write(&input, b"garbage").unwrap();
        std::fs::remove_file(&output).ok();

        let mut stages = Vec::new();
        let err = engine(input.clone(), output.clone(), SortOrder::Reverse)
            .run(&ProgressBar::hidden(), |t| stages.push(t.stage))
            .unwrap_err();

        assert!(matches!(err, PaintError::DecodeError { .. }));
        assert_eq!(stages, vec![Stage::Load]);
        assert!(!output.exists());

        std::fs::remove_file(&input).ok();
    }

    #[test]
    fn test_top_buckets_order() {
        let mut buckets = ColorBuckets::new();
        for x in 0..3 {
            buckets.push(bucket::Pixel::new(x, 0), Rgba([1, 1, 1, 255]));
        }
        buckets.push(bucket::Pixel::new(0, 1), Rgba([2, 2, 2, 255]));
        for x in 1..4 {
            buckets.push(bucket::Pixel::new(x, 1), Rgba([3, 3, 3, 255]));
        }

        let top = top_buckets(&buckets, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].key, ColorKey::new(0x010101));
        assert_eq!(top[1].key, ColorKey::new(0x030303));
        assert_eq!(top[1].pixels, 3);
    }
}
