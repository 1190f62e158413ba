// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use std::env;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Context, Result};

use harmonygen::{
    ArrangementStyle, Arranger, CompositionConfig, Harmony, Optimizer, Scale, REST,
};

fn print_usage() {
    println!("HARMONYGEN - Harmony-Search Music Composer");
    println!();
    println!("Usage: harmonygen [OPTIONS] [CONFIG.yaml]");
    println!();
    println!("Options:");
    println!("  --seed <N>        RNG seed (default: derived from the clock)");
    println!("  --iterations <N>  Override max_iter from the configuration");
    println!("  --style <NAME>    Override style: classical, jazz, rock, pop");
    println!("  --help            Show this help message");
    println!();
    println!("Without a configuration file, composes 4 measures in C major.");
}

struct CliArgs {
    config_path: Option<String>,
    seed: Option<u64>,
    iterations: Option<usize>,
    style: Option<String>,
}

fn parse_args(args: &[String]) -> Result<Option<CliArgs>> {
    let mut parsed = CliArgs {
        config_path: None,
        seed: None,
        iterations: None,
        style: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => return Ok(None),
            "--seed" => {
                let value = args
                    .get(i + 1)
                    .ok_or_else(|| anyhow!("--seed requires a number"))?;
                parsed.seed = Some(
                    value
                        .parse()
                        .map_err(|_| anyhow!("Invalid seed: {}", value))?,
                );
                i += 2;
            }
            "--iterations" => {
                let value = args
                    .get(i + 1)
                    .ok_or_else(|| anyhow!("--iterations requires a number"))?;
                parsed.iterations = Some(
                    value
                        .parse()
                        .map_err(|_| anyhow!("Invalid iteration count: {}", value))?,
                );
                i += 2;
            }
            "--style" => {
                let value = args
                    .get(i + 1)
                    .ok_or_else(|| anyhow!("--style requires a name"))?;
                parsed.style = Some(value.clone());
                i += 2;
            }
            other if other.starts_with("--") => {
                return Err(anyhow!("Unknown option: {}", other));
            }
            path => {
                parsed.config_path = Some(path.to_string());
                i += 1;
            }
        }
    }

    Ok(Some(parsed))
}

/// Melody in note names, upper octave marked with an apostrophe
fn format_melody(scale: &Scale, harmony: &Harmony) -> String {
    harmony
        .melody
        .iter()
        .map(|&p| {
            if p == REST {
                "-".to_string()
            } else if p >= 7 {
                format!("{}'", scale.note_at(p as usize))
            } else {
                scale.note_at(p as usize).to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let Some(cli) = parse_args(&args)? else {
        print_usage();
        return Ok(());
    };

    let mut config = match &cli.config_path {
        Some(path) => CompositionConfig::load(path)?,
        None => CompositionConfig::default(),
    };
    if let Some(iterations) = cli.iterations {
        config.max_iter = iterations;
    }
    if let Some(style) = cli.style {
        config.style = style;
    }

    let style = ArrangementStyle::parse(&config.style)
        .ok_or_else(|| anyhow!("Unknown arrangement style: {}", config.style))?;

    let seed = match cli.seed {
        Some(seed) => seed,
        None => SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .context("System clock is before the Unix epoch")?
            .as_nanos() as u64,
    };

    let mut optimizer = Optimizer::new(config.clone(), seed)?;
    println!(
        "Composing {} measures in {} ({} iterations, seed {})...",
        config.measures,
        optimizer.scale(),
        config.max_iter,
        seed
    );

    let best = optimizer.optimize()?;
    let scale = optimizer.scale().clone();

    println!();
    println!("Fitness: {:.2}", best.fitness);
    let progression: Vec<&str> = best.chords.iter().map(|&d| scale.roman(d)).collect();
    println!("Progression: {}", progression.join(" - "));
    println!("Melody:      {}", format_melody(&scale, &best));

    let arranger = Arranger::new(
        scale,
        style,
        config.tempo,
        config.beats_per_measure,
        config.notes_per_beat,
    );
    let score = arranger.arrange(&best);

    println!();
    println!(
        "Arrangement ({}, {} BPM, {} ticks):",
        style.name(),
        score.tempo,
        score.length_ticks()
    );
    for track in &score.tracks {
        println!(
            "  {:<8} program {:>3}  channel {}  {} events",
            track.name,
            track.program,
            track.channel,
            track.events.len()
        );
    }

    Ok(())
}
