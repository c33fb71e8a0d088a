// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use std::env;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use stepgrid::config::{ComposerFile, InstrumentCatalog, InstrumentKind};
use stepgrid::music::{chord_voicing, Chord, ChordType, PitchClass};
use stepgrid::playback::{LogEngine, PlayOptions, Transport};
use stepgrid::sequencer::{Composition, STEPS};
use stepgrid::ui::{App, Editor};

fn print_usage() {
    println!("stepgrid - 16-step composer");
    println!();
    println!("Usage: stepgrid [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --list-instruments [FILE]   List the instrument catalog (built-in or from FILE)");
    println!("  --chord <ROOT> <TYPE> [OCT] Print a chord voicing (octave defaults to 4)");
    println!("  --demo [BPM]                Compile and play the demo pattern");
    println!("  --edit [FILE]               Open the terminal editor");
    println!("  --help                      Show this help message");
    println!();
    println!("Set RUST_LOG=debug to see scheduled hits.");
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Built-in configuration, or the one at `path`
fn load_config(path: Option<&String>) -> Result<ComposerFile> {
    match path {
        Some(path) => ComposerFile::load(path),
        None => Ok(ComposerFile::default()),
    }
}

fn list_instruments(config: &ComposerFile) -> Result<()> {
    let catalog = config.catalog()?;
    println!("Instruments:");
    for (i, inst) in catalog.iter().enumerate() {
        let detail = match inst.kind {
            InstrumentKind::Rhythm => {
                let rows: Vec<String> = inst
                    .drum_rows()
                    .iter()
                    .map(|r| format!("{}={}", r.label, r.note))
                    .collect();
                rows.join(" ")
            }
            InstrumentKind::Melody => {
                format!("octaves {}-{}", inst.octaves[0], inst.octaves[1])
            }
            InstrumentKind::Chord => format!("voice {}", inst.voice()),
        };
        println!("  {:>2}  {:<12} {:<18} {}", i + 1, inst.id, inst.label, detail);
    }
    Ok(())
}

fn print_chord(root: &str, chord_type: &str, octave: i8) -> Result<()> {
    let notes = chord_voicing(root, chord_type, octave)?;
    let names: Vec<String> = notes.iter().map(|p| p.to_string()).collect();
    println!("{}", names.join(" "));
    Ok(())
}

/// Kick on every beat plus a C major chord zone triggered on steps 1 and 9
fn demo_composition(catalog: &InstrumentCatalog) -> Result<Composition> {
    let mut comp = Composition::new();

    let drums = comp.create_track(catalog, "drums")?;
    for step in (0..STEPS).step_by(4) {
        comp.toggle_step(drums, "Kick", step);
    }

    let chords = comp.create_track(catalog, "chord")?;
    if let Some(zones) = comp.track_mut(chords).and_then(|t| t.as_chord_mut()) {
        zones.apply_chord(0, Chord::new(PitchClass::C, ChordType::Major, 4));
        zones.split_zone(0, 8);
        zones.toggle_sound_step(0);
        zones.toggle_sound_step(8);
    }

    Ok(comp)
}

fn run_demo(bpm: Option<f64>) -> Result<()> {
    let config = ComposerFile::default();
    let catalog = config.catalog()?;
    let comp = demo_composition(&catalog)?;
    let score = comp.compile();

    let yaml = serde_yaml::to_string(&score).context("Failed to serialize score")?;
    print!("{yaml}");

    let mut options = PlayOptions::from_config(&config.playback);
    if let Some(bpm) = bpm {
        options.set_bpm(bpm);
    }

    let mut transport = Transport::new(LogEngine::new());
    transport.play(&score, &options)?;
    let hits = transport.engine().scheduled().len();
    transport.stop();

    println!("# {} hits at {:.1} BPM", hits, options.bpm());
    Ok(())
}

fn run_editor(path: Option<&String>) -> Result<()> {
    let config = load_config(path)?;
    let catalog = config.catalog()?;
    let mut comp = Composition::new();
    let mut editor = Editor::new(PlayOptions::from_config(&config.playback));
    let mut transport = Transport::new(LogEngine::new());

    let mut app = App::new().context("Failed to initialize terminal")?;
    app.run(&mut editor, &mut comp, &catalog, &mut transport)
}

fn main() -> Result<()> {
    init_logging();
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("stepgrid - 16-step composer");
        println!("Run with --help for usage information");
        return Ok(());
    }

    match args[1].as_str() {
        "--list-instruments" => {
            let config = load_config(args.get(2))?;
            list_instruments(&config)?;
        }
        "--chord" => {
            if args.len() < 4 {
                eprintln!("Error: --chord requires a root and a chord type");
                eprintln!("Example: stepgrid --chord A min7 3");
                std::process::exit(1);
            }
            let octave: i8 = match args.get(4) {
                Some(s) => s
                    .parse()
                    .map_err(|_| anyhow::anyhow!("Invalid octave: {}", s))?,
                None => 4,
            };
            print_chord(&args[2], &args[3], octave)?;
        }
        "--demo" => {
            let bpm = match args.get(2) {
                Some(s) => Some(
                    s.parse::<f64>()
                        .map_err(|_| anyhow::anyhow!("Invalid BPM: {}", s))?,
                ),
                None => None,
            };
            run_demo(bpm)?;
        }
        "--edit" => {
            run_editor(args.get(2))?;
        }
        "--help" | "-h" => {
            print_usage();
        }
        _ => {
            eprintln!("Unknown option: {}", args[1]);
            print_usage();
            std::process::exit(1);
        }
    }

    Ok(())
}
