use std::fs;
use std::path::PathBuf;
use std::process;

use beatgen::{
    export_musicxml, generate, layout, layout_beat, BeatError, BeatRequest, DifficultyRegistry,
    DifficultyTag, Measure,
};
use clap::{Parser, Subcommand, ValueEnum};
use rand::SeedableRng;
use rand_pcg::Pcg64;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "beatgen")]
#[command(about = "Generate drum rhythm exercises and lay them out for notation")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate an exercise
    Generate {
        /// Beats per measure
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=16))]
        beats: u32,

        /// Number of measures
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=32))]
        measures: u32,

        /// beginner, intermediate, advanced or expert
        #[arg(long)]
        difficulty: DifficultyTag,

        /// Seed for repeatable output
        #[arg(long)]
        seed: Option<u64>,

        /// Difficulty table (YAML) replacing the built-in one
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,

        /// Write to FILE instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Lay out a measure given as a JSON array of notes
    Layout {
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Musicxml,
    Layout,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Generate {
            beats,
            measures,
            difficulty,
            seed,
            config,
            format,
            output,
        } => {
            let request = BeatRequest {
                beats,
                measures,
                difficulty,
            };
            match run_generate(&request, seed, config, format) {
                Ok(text) => write_output(&text, output),
                Err(e) => fail(&format!("Generation error: {}", e)),
            }
        }
        Command::Layout { input } => {
            let source = match fs::read_to_string(&input) {
                Ok(content) => content,
                Err(e) => fail(&format!("Error reading file '{}': {}", input.display(), e)),
            };
            match run_layout(&source) {
                Ok(text) => write_output(&text, None),
                Err(e) => fail(&format!("Layout error: {}", e)),
            }
        }
    }
}

fn fail(message: &str) -> ! {
    eprintln!("{}", message);
    process::exit(1);
}

fn run_generate(
    request: &BeatRequest,
    seed: Option<u64>,
    config: Option<PathBuf>,
    format: Format,
) -> Result<String, BeatError> {
    let registry = match config {
        Some(path) => DifficultyRegistry::load(path)?,
        None => DifficultyRegistry::builtin()?,
    };

    let beat = match seed {
        Some(seed) => generate(request, &registry, &mut Pcg64::seed_from_u64(seed))?,
        None => generate(request, &registry, &mut rand::rng())?,
    };

    Ok(match format {
        Format::Json => to_json(&beat),
        Format::Musicxml => export_musicxml(&beat),
        Format::Layout => to_json(&layout_beat(&beat)),
    })
}

/// Parse and validate a measure, then print its display units.
fn run_layout(source: &str) -> Result<String, serde_json::Error> {
    let measure: Measure = serde_json::from_str(source)?;
    Ok(to_json(&layout(&measure)))
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    // plain data with string keys; serialization cannot fail
    serde_json::to_string_pretty(value).unwrap_or_default()
}

fn write_output(text: &str, output: Option<PathBuf>) {
    match output {
        Some(path) => {
            if let Err(e) = fs::write(&path, text) {
                fail(&format!("Error writing file '{}': {}", path.display(), e));
            }
            tracing::info!(path = %path.display(), "wrote output");
        }
        None => println!("{}", text),
    }
}
