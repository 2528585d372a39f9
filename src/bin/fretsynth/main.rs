//! fretsynth - strum a chord, pick an arpeggio or pluck one note
//!
//! Run with: cargo run -- chord x32010
//!           cargo run -- --tone nylon arpeggio "5:3:R 4:2:3 3:0:5 2:1:R"
//!           cargo run -- --out strum.wav --strum down-up chord 022100

use std::{
    path::{Path, PathBuf},
    thread,
    time::{Duration as WallDuration, Instant},
};

use clap::{ArgAction, Parser, Subcommand};
use color_eyre::eyre::{eyre, Result, WrapErr};
use simple_logger::SimpleLogger;

use fretsynth::{
    io::{AudioSink, CpalSink, FileStore, OfflineSink},
    sequencing::{ArpeggioPattern, ArpeggioScheduler, ChordShape, Duration, StrumDirection},
    Engine, EngineConfig, Playback, DEFAULT_SAMPLE_RATE,
};

#[derive(Parser)]
#[command(name = "fretsynth")]
#[command(about = "Plucked-string guitar synthesizer", long_about = None)]
struct Cli {
    /// TOML engine configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Tone preset (acoustic, electric, nylon, bright, muted)
    #[arg(long, global = true)]
    tone: Option<String>,

    /// Strum preset (standard, fast, slow, natural, down-up)
    #[arg(long, global = true)]
    strum: Option<String>,

    /// Distortion amount, 0 - 100
    #[arg(long, global = true)]
    distortion: Option<f32>,

    /// Capo fret, 0 - 7
    #[arg(long, global = true)]
    capo: Option<i32>,

    /// Open string tuning (standard, drop-d, dadgad, open-g)
    #[arg(long, global = true)]
    tuning: Option<String>,

    /// Tuning offset in semitones, -6 - 6 (remembered between runs)
    #[arg(long, global = true, allow_hyphen_values = true)]
    offset: Option<i32>,

    /// Master volume, 0.0 - 1.0
    #[arg(long, global = true)]
    volume: Option<f32>,

    /// Seed for reproducible output
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Bounce to a WAV file instead of playing
    #[arg(short, long, global = true)]
    out: Option<PathBuf>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Strum a chord, e.g. x32010 or "x,10,12,12,12,10"
    Chord {
        shape: ChordShape,

        /// Strum from the high string down
        #[arg(long)]
        up: bool,
    },
    /// Pick an arpeggio, e.g. "5:3:R 4:2:3 3:0:5~"
    Arpeggio {
        pattern: ArpeggioPattern,

        #[arg(long)]
        bpm: Option<f32>,

        /// Step length (quarter, eighth, sixteenth, triplet, dotted-eighth)
        #[arg(long, default_value = "eighth")]
        subdivision: String,
    },
    /// Pluck a single note
    Note { string: usize, fret: u8 },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    SimpleLogger::new()
        .with_level(level)
        .init()
        .wrap_err("failed to install logger")?;

    let config = load_config(&cli)?;

    match &cli.out {
        Some(path) => bounce(&cli, config, path),
        None => play_live(&cli, config),
    }
}

fn load_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .wrap_err_with(|| format!("failed to read {}", path.display()))?;
            EngineConfig::from_toml_str(&text)?
        }
        None => EngineConfig::default(),
    };

    if let Some(tuning) = &cli.tuning {
        config.open_tuning = tuning.clone();
    }
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    Ok(config)
}

/// Attach persistence and apply the command line overrides.
fn configure<S: AudioSink>(mut engine: Engine<S>, cli: &Cli) -> Engine<S> {
    if let Some(store) = FileStore::default_location() {
        engine = engine.with_settings(Box::new(store));
    }

    if let Some(tone) = &cli.tone {
        let applied = engine.set_guitar_tone(tone);
        if applied != tone.as_str() {
            log::warn!("unknown tone '{}', keeping {}", tone, applied);
        }
    }
    if let Some(strum) = &cli.strum {
        let applied = engine.set_strum_style(strum);
        if applied != strum.as_str() {
            log::warn!("unknown strum '{}', keeping {}", strum, applied);
        }
    }
    if let Some(amount) = cli.distortion {
        engine.set_distortion(amount);
    }
    if let Some(capo) = cli.capo {
        engine.set_capo_fret(capo);
    }
    if let Some(offset) = cli.offset {
        engine.set_tuning_offset(offset);
    }
    if let Some(volume) = cli.volume {
        engine.set_volume(volume);
    }
    engine
}

fn trigger<S: AudioSink>(engine: &mut Engine<S>, command: &Command) -> Result<Playback> {
    let playback = match command {
        Command::Chord { shape, up } => {
            let direction = if *up {
                StrumDirection::Up
            } else {
                StrumDirection::Down
            };
            engine.play_chord(shape, direction)
        }
        Command::Arpeggio {
            pattern,
            bpm,
            subdivision,
        } => {
            let step = Duration::by_name(subdivision)
                .ok_or_else(|| eyre!("unknown subdivision '{}'", subdivision))?;
            let scheduler =
                ArpeggioScheduler::new(bpm.unwrap_or(engine.tempo())).with_subdivision(step);
            engine.play_arpeggio_with(pattern, scheduler)
        }
        Command::Note { string, fret } => engine.play_single_note(*string, *fret),
    };

    playback.ok_or_else(|| eyre!("nothing was played"))
}

/// Clock time at which the last note has fully rung out.
fn ring_out(playback: &Playback) -> f64 {
    playback
        .notes
        .iter()
        .map(|note| note.start_time + note.duration.unwrap_or(0.0) as f64)
        .fold(playback.ends_at, f64::max)
}

fn bounce(cli: &Cli, config: EngineConfig, path: &Path) -> Result<()> {
    let sink = OfflineSink::new(DEFAULT_SAMPLE_RATE);
    let mut engine = configure(Engine::new(sink, config)?, cli);
    engine.initialize()?;

    let playback = trigger(&mut engine, &cli.command)?;
    let samples = engine.sink_mut().render_seconds(ring_out(&playback));

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: DEFAULT_SAMPLE_RATE as u32,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .wrap_err_with(|| format!("failed to create {}", path.display()))?;
    for sample in &samples {
        writer.write_sample(*sample)?;
    }
    writer.finalize()?;

    println!(
        "Wrote {} notes, {:.2} s to {}",
        playback.notes.len(),
        samples.len() as f64 / DEFAULT_SAMPLE_RATE as f64,
        path.display()
    );
    engine.dispose();
    Ok(())
}

fn play_live(cli: &Cli, config: EngineConfig) -> Result<()> {
    let sink = CpalSink::new()?;
    let mut engine = configure(Engine::new(sink, config)?, cli);
    engine.initialize()?;

    let playback = trigger(&mut engine, &cli.command)?;
    let until = ring_out(&playback);
    println!("Playing {} notes...", playback.notes.len());

    // The device clock should get there first; the wall clock is a backstop
    let deadline = Instant::now() + WallDuration::from_secs_f64(until + 2.0);
    while engine.sink().current_time() < until && Instant::now() < deadline {
        engine.poll();
        thread::sleep(WallDuration::from_millis(50));
    }

    engine.dispose();
    Ok(())
}
