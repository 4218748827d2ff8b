//! Replays a recorded keypoint stream and reports counted repetitions.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use rep_counter::{cli::Args, config::EXAMPLE_CONFIG, replay::replay, RepEngine};
use std::fs::File;
use std::io::{self, BufReader};

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logger
    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    if args.example_config {
        print!("{EXAMPLE_CONFIG}");
        return Ok(());
    }

    let config = args.build_config().context("Failed to load configuration")?;
    let mut engine = RepEngine::new(config).context("Invalid configuration")?;

    let report = if args.input == "-" {
        info!("Reading frames from stdin");
        replay(&mut engine, io::stdin().lock())?
    } else {
        info!("Reading frames from: {}", args.input);
        let file = File::open(&args.input).with_context(|| format!("Cannot open {}", args.input))?;
        replay(&mut engine, BufReader::new(file))?
    };

    if report.skipped > 0 {
        log::warn!("{} malformed lines skipped", report.skipped);
    }

    if args.summary_json {
        println!("{}", report.summary.to_json()?);
    } else {
        let summary = &report.summary;
        println!("Exercise:      {}", engine.kind());
        println!("Frames:        {}", report.frames);
        println!("Total reps:    {}", summary.total_count);
        println!("Average score: {:.1}", summary.average_score);
        if let Some(best) = &summary.best {
            println!("Best score:    {} (frame {})", best.score.overall, best.frame.frame_index);
        }
        if let Some(worst) = &summary.worst {
            println!("Worst score:   {} (frame {})", worst.score.overall, worst.frame.frame_index);
        }
        for set in &summary.sets {
            println!("  Set {}: {} reps, average {:.1}", set.set_number, set.count, set.average_score);
        }
    }

    Ok(())
}
