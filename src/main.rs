use anyhow::{Context, Result};
use clap::CommandFactory;
use console::style;
use indicatif::ProgressBar;

use bucketpaint::cli::Args;
use bucketpaint::image_processing::report::print_report;
use bucketpaint::image_processing::PaintingEngine;
use bucketpaint::utils::{
    create_progress_bar, error_println, format_duration, get_file_extension, verbose_println,
    warn_println,
};
use bucketpaint::{JsonMessage, PaintError};

fn run(mut args: Args) -> Result<()> {
    args.load_and_merge_config()?;

    let config = match args.to_paint_config() {
        Ok(config) => config,
        Err(err @ PaintError::InputMissing(_)) => {
            Args::command().write_help(&mut std::io::stderr())?;
            eprintln!();
            return Err(err.into());
        }
        Err(err) => return Err(err.into()),
    };
    let json = args.json_progress;

    if !json {
        println!("{}", style("Bucket Paint").bold().blue());
        println!();

        if config.verbose {
            println!("{}", style("Configuration:").bold());
            println!("  Input: {}", config.input_path.display());
            println!("  Output: {}", config.output_path.display());
            println!("  Sort order: {:?}", config.sort_order);
            println!();
        }

        if get_file_extension(&config.output_path).as_deref() != Some("png") {
            warn_println(&format!(
                "{} does not end in .png; the output is PNG-encoded regardless",
                config.output_path.display()
            ));
        }
    }

    let progress = if json {
        ProgressBar::hidden()
    } else {
        let pb = create_progress_bar(0)?;
        pb.set_message("Drawing buckets");
        pb
    };

    let engine = PaintingEngine::new(config);
    let result = engine
        .run(&progress, |timing| {
            if json {
                JsonMessage::stage(timing).emit();
            } else {
                println!(
                    "{} {}",
                    style(timing.stage.label()).bold(),
                    format_duration(timing.duration)
                );
            }
        })
        .with_context(|| format!("Failed to paint {}", engine.config().input_path.display()))?;

    if json {
        JsonMessage::summary(&result).emit();
        return Ok(());
    }

    verbose_println(
        engine.config().verbose,
        &format!(
            "{} buckets, {} drawn as single-pixel ticks",
            result.bucket_count, result.single_pixel_buckets
        ),
    );

    println!(
        "{}",
        style(format!("Done painting {}", result.output_path.display()))
            .green()
            .bold()
    );

    if args.report {
        print_report(&result);
    }

    Ok(())
}

fn main() {
    let args = Args::parse_with_legacy_flags();
    let json = args.json_progress;

    if let Err(err) = run(args) {
        if json {
            JsonMessage::error(format!("{:#}", err)).emit();
        } else {
            error_println(&format!("{:#}", err));
        }
        std::process::exit(1);
    }
}
