//! Stage timing and bucket statistics table for `--report`

use prettytable::{format, Cell, Row, Table};

use super::PaintingResult;
use crate::utils::format_duration;

/// Build the stage timing table
pub fn timing_table(result: &PaintingResult) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.add_row(Row::new(vec![Cell::new("Stage"), Cell::new("Duration")]));

    for timing in &result.timings {
        table.add_row(Row::new(vec![
            Cell::new(timing.stage.label()),
            Cell::new(&format_duration(timing.duration)),
        ]));
    }
    table
}

/// Build the table of the largest buckets
pub fn bucket_table(result: &PaintingResult) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.add_row(Row::new(vec![
        Cell::new("#"),
        Cell::new("Color"),
        Cell::new("Alpha"),
        Cell::new("Pixels"),
        Cell::new("Share"),
    ]));

    for (i, bucket) in result.top_buckets.iter().enumerate() {
        table.add_row(Row::new(vec![
            Cell::new(&(i + 1).to_string()),
            Cell::new(&bucket.key.to_string()),
            Cell::new(&bucket.alpha.to_string()),
            Cell::new(&bucket.pixels.to_string()),
            Cell::new(&share(bucket.pixels, result.pixel_count)),
        ]));
    }
    table
}

fn share(part: usize, total: usize) -> String {
    if total == 0 {
        "-".to_string()
    } else {
        format!("{:.1}%", part as f64 * 100.0 / total as f64)
    }
}

/// Print the complete report
pub fn print_report(result: &PaintingResult) {
    let (w, h) = result.source_dimensions;
    let (cw, ch) = result.canvas_dimensions;

    println!();
    println!("REPORT");
    println!("  Input:   {} ({}x{})", result.input_path.display(), w, h);
    println!("  Output:  {} ({}x{})", result.output_path.display(), cw, ch);
    println!("  Order:   {:?}", result.sort_order);
    println!(
        "  Buckets: {} ({} single-pixel) over {} pixels",
        result.bucket_count, result.single_pixel_buckets, result.pixel_count
    );
    println!();

    timing_table(result).printstd();
    println!();

    if !result.top_buckets.is_empty() {
        println!("LARGEST BUCKETS ({} shown)", result.top_buckets.len());
        bucket_table(result).printstd();
        println!();
    }
}
