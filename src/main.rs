// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use std::env;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use tracing::{info, Level};

use chordbook::driver::{print_destinations, LogDriver, MidiDriver, MidirOutput, SoundDriver};
use chordbook::{
    notes_of, parse_chord_name, steps_of, tokenize, transpose_progression, EngineConfig,
    PlaybackOutcome, Player,
};

fn print_usage() {
    println!("chordbook - Chord chart tool");
    println!();
    println!("Usage: chordbook [--verbose] <COMMAND>");
    println!();
    println!("Commands:");
    println!("  transpose <N> <CHART>   Transpose a chart by N semitones");
    println!("  tokenize <CHART>        Show tokens and resolved steps");
    println!("  notes <CHORD>           Show the notes of a chord");
    println!("  play [OPTIONS] <CHART>  Play a chart");
    println!("  --list-midi             List available MIDI destinations (outputs)");
    println!("  --help                  Show this help message");
    println!();
    println!("Play options:");
    println!("  --port <N>              Send to MIDI destination N (default: log only)");
    println!("  --tempo <BPM>           Tempo, 20-240 (default from config, 60)");
    println!("  --beats <X>             Beat length multiplier (default 1)");
    println!("  --count-in              Four clicks before the first chord");
    println!("  --config <FILE>         Engine config, YAML or TOML");
    println!();
    println!("A chart is one or more arguments, e.g. \"C . G - (Am F) ()\"");
}

/// Options for the play command
struct PlayArgs {
    port: Option<usize>,
    tempo: Option<f64>,
    beats: f64,
    count_in: bool,
    config: Option<String>,
    chart: String,
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: Option<&String>) -> Result<T> {
    let value = value.ok_or_else(|| anyhow!("{} requires a value", flag))?;
    value
        .parse()
        .map_err(|_| anyhow!("Invalid value for {}: {}", flag, value))
}

fn parse_play_args(args: &[String]) -> Result<PlayArgs> {
    let mut play = PlayArgs {
        port: None,
        tempo: None,
        beats: 1.0,
        count_in: false,
        config: None,
        chart: String::new(),
    };
    let mut chart = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--port" => play.port = Some(parse_number(arg, iter.next())?),
            "--tempo" => play.tempo = Some(parse_number(arg, iter.next())?),
            "--beats" => play.beats = parse_number(arg, iter.next())?,
            "--count-in" => play.count_in = true,
            "--config" => {
                let path = iter.next().ok_or_else(|| anyhow!("--config requires a file"))?;
                play.config = Some(path.clone());
            }
            _ => chart.push(arg.as_str()),
        }
    }

    play.chart = chart.join(" ");
    Ok(play)
}

fn transpose(args: &[String]) -> Result<()> {
    let (semitones, chart) = args
        .split_first()
        .ok_or_else(|| anyhow!("transpose requires a semitone count"))?;
    let semitones: i32 = semitones
        .parse()
        .map_err(|_| anyhow!("Invalid semitone count: {}", semitones))?;

    println!("{}", transpose_progression(&chart.join(" "), semitones));
    Ok(())
}

fn show_tokens(args: &[String]) {
    let chart = args.join(" ");
    let tokens: Vec<String> = tokenize(&chart).iter().map(ToString::to_string).collect();
    let steps: Vec<String> = steps_of(&chart).iter().map(ToString::to_string).collect();

    println!("Tokens: {}", tokens.join(" "));
    println!("Steps:  {}", steps.join(" "));
}

fn show_notes(args: &[String]) -> Result<()> {
    let name = args.first().ok_or_else(|| anyhow!("notes requires a chord name"))?;
    let chord = parse_chord_name(name)?;

    let names: Vec<String> = notes_of(&chord)
        .into_iter()
        .map(|pc| chordbook::NoteName::preferred(pc).to_string())
        .collect();
    let midi: Vec<String> = chord.midi_notes(4).iter().map(u8::to_string).collect();

    println!("{} ({:?})", chord, chord.quality());
    println!("Notes: {}", names.join(" "));
    println!("MIDI:  {}", midi.join(" "));
    Ok(())
}

async fn play(args: &[String]) -> Result<()> {
    let play = parse_play_args(args)?;
    if play.chart.trim().is_empty() {
        return Err(anyhow!("play requires a chart"));
    }

    let config = match &play.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let tempo = play.tempo.unwrap_or(config.tempo);

    let driver: Arc<dyn SoundDriver> = match play.port {
        Some(port) => {
            println!("Connecting to MIDI destination {}...", port);
            let output = MidirOutput::new(port)?;
            println!("Connected to {}", output.port_name());
            Arc::new(MidiDriver::new(output))
        }
        None => Arc::new(LogDriver),
    };
    driver.start();

    let player = Arc::new(Player::new(Arc::clone(&driver), config));
    let handle = player.spawn_progression(play.chart.clone(), tempo, play.beats, play.count_in);

    let outcome = tokio::select! {
        result = handle => result.context("Playback task failed")?,
        _ = tokio::signal::ctrl_c() => {
            info!("interrupted");
            player.stop_playback();
            PlaybackOutcome::Cancelled
        }
    };

    driver.stop();
    println!("Playback {:?}", outcome);
    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut args: Vec<String> = env::args().skip(1).collect();

    let verbose = args.iter().any(|a| a == "--verbose" || a == "-v");
    args.retain(|a| a != "--verbose" && a != "-v");
    init_logging(verbose);

    let Some((command, rest)) = args.split_first() else {
        println!("chordbook - Chord chart tool");
        println!("Run with --help for usage information");
        return Ok(());
    };

    match command.as_str() {
        "transpose" => transpose(rest)?,
        "tokenize" => show_tokens(rest),
        "notes" => show_notes(rest)?,
        "play" => play(rest).await?,
        "--list-midi" => print_destinations(),
        "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            std::process::exit(1);
        }
    }

    Ok(())
}
