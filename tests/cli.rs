//! Integration tests: run the `bucketpaint` binary end to end.

use image::{Rgba, RgbaImage};
use std::path::PathBuf;
use std::process::Command;

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_bucketpaint"))
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("bucketpaint_cli_{}_{}", std::process::id(), name))
}

#[test]
fn missing_out_exits_without_reading_input() {
    // The input does not exist; a missing -out must be reported first.
    let input = temp_path("never_created.png");
    let output = bin().args(["-in", input.to_str().unwrap()]).output().unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing required output path"), "{stderr}");
    assert!(!stderr.contains("not found"), "{stderr}");
}

#[test]
fn nonexistent_input_fails() {
    let input = temp_path("absent.png");
    let out = temp_path("absent_out.png");
    let output = bin()
        .args(["-in", input.to_str().unwrap(), "-out", out.to_str().unwrap()])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(!out.exists());
}

#[test]
fn bmp_input_is_rejected() {
    let input = temp_path("input.bmp");
    let out = temp_path("bmp_out.png");
    RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 255]))
        .save_with_format(&input, image::ImageFormat::Png)
        .unwrap();

    let output = bin()
        .args(["-in", input.to_str().unwrap(), "-out", out.to_str().unwrap()])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("can not determine image format"), "{stderr}");
    assert!(!out.exists());

    std::fs::remove_file(&input).ok();
}

#[test]
fn paints_scaled_png() {
    let input = temp_path("paint_in.png");
    let out = temp_path("paint_out.png");
    let mut img = RgbaImage::new(2, 1);
    img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
    img.put_pixel(1, 0, Rgba([0, 0, 255, 255]));
    img.save(&input).unwrap();

    let output = bin()
        .args([
            "-in",
            input.to_str().unwrap(),
            "-out",
            out.to_str().unwrap(),
            "-normal",
        ])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    for label in ["Load", "Decode", "Bucketing", "Sorting", "Drawing", "Saving", "Overall"] {
        assert!(stdout.contains(label), "missing {label} in {stdout}");
    }
    assert!(stdout.contains("Done painting"));

    let painted = image::open(&out).unwrap().to_rgba8();
    assert_eq!(painted.dimensions(), (16, 8));
    // red has the larger key, so in ascending order it is drawn last
    assert_eq!(painted.get_pixel(1, 1), &Rgba([255, 0, 0, 255]));

    std::fs::remove_file(&input).ok();
    std::fs::remove_file(&out).ok();
}

#[test]
fn json_progress_emits_summary() {
    let input = temp_path("json_in.png");
    let out = temp_path("json_out.png");
    RgbaImage::from_pixel(3, 3, Rgba([9, 9, 9, 255]))
        .save(&input)
        .unwrap();

    let output = bin()
        .args([
            "--in",
            input.to_str().unwrap(),
            "--out",
            out.to_str().unwrap(),
            "--json-progress",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let last = stdout.lines().last().unwrap();
    let summary: serde_json::Value = serde_json::from_str(last).unwrap();
    assert_eq!(summary["type"], "summary");
    assert_eq!(summary["width"], 24);
    assert_eq!(summary["buckets"], 1);

    std::fs::remove_file(&input).ok();
    std::fs::remove_file(&out).ok();
}

#[test]
fn json_progress_stays_json_when_verbose() {
    let input = temp_path("json_verbose_in.png");
    let out = temp_path("json_verbose_out.png");
    let mut img = RgbaImage::from_pixel(2, 2, Rgba([9, 9, 9, 255]));
    img.put_pixel(1, 1, Rgba([200, 0, 0, 255]));
    img.save(&input).unwrap();

    let output = bin()
        .args([
            "--in",
            input.to_str().unwrap(),
            "--out",
            out.to_str().unwrap(),
            "--json-progress",
            "-v",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut types = Vec::new();
    for line in stdout.lines() {
        let message: serde_json::Value = serde_json::from_str(line)
            .unwrap_or_else(|err| panic!("non-JSON stdout line {line:?}: {err}"));
        types.push(message["type"].as_str().unwrap().to_string());
    }
    assert_eq!(types.last().map(String::as_str), Some("summary"));
    assert!(types.iter().any(|t| t == "stage"));

    std::fs::remove_file(&input).ok();
    std::fs::remove_file(&out).ok();
}
