//! ugen CLI: offline renderer and perf tool for the demo patches.
//!
//! - `render`: run a patch through the engine for N seconds, log a level meter
//!   every second and the realtime factor at the end
//! - `ports`: print the port table of one node kind, or of all of them
//!
//! Log verbosity follows `RUST_LOG` when set, `--log` otherwise.

use std::hint::black_box;
use std::time::Instant;

use anyhow::{bail, ensure, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use ugen_engine::patches::Patch;
use ugen_engine::{kinds, ports_of, Clock, Engine, Role, Sample, SAMPLE_RATE};

#[derive(Parser)]
#[command(name = "ugen")]
#[command(about = "Render and inspect unit generator patches")]
#[command(version)]
struct Cli {
    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a patch offline and report levels and speed
    Render {
        /// Patch to render
        #[arg(short, long, value_enum, default_value_t = PatchArg::Sequence)]
        patch: PatchArg,

        /// Seconds of audio to render
        #[arg(short, long, default_value_t = 10.0)]
        seconds: f64,

        /// Clock rate of the patch in Hz
        #[arg(short, long, default_value_t = 4.0)]
        rate: f32,
    },

    /// List node kinds and their ports
    Ports {
        /// Only show this kind (e.g. "env", "step")
        kind: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum PatchArg {
    Sequence,
    Drone,
}

impl From<PatchArg> for Patch {
    fn from(p: PatchArg) -> Self {
        match p {
            PatchArg::Sequence => Patch::Sequence,
            PatchArg::Drone => Patch::Drone,
        }
    }
}

fn init_tracing(fallback: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) => EnvFilter::try_new(fallback)
            .with_context(|| format!("invalid log filter: {fallback}"))?,
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
    Ok(())
}

/// Peak and RMS of one meter window.
fn levels(window: &[Sample]) -> (Sample, Sample) {
    let mut peak: Sample = 0.0;
    let mut sum = 0.0f64;
    for &s in window {
        peak = peak.max(s.abs());
        sum += f64::from(s) * f64::from(s);
    }
    let rms = if window.is_empty() { 0.0 } else { (sum / window.len() as f64).sqrt() as Sample };
    (peak, rms)
}

fn render(patch: Patch, seconds: f64, rate: f32) -> Result<()> {
    ensure!(seconds.is_finite() && seconds > 0.0, "--seconds must be positive, got {seconds}");
    ensure!(rate.is_finite() && rate > 0.0, "--rate must be positive, got {rate}");

    let total = (seconds * SAMPLE_RATE as f64).round() as usize;
    let clock = Clock::new();
    let root = patch.build(&clock, rate);
    let mut engine = Engine::new(clock, root);

    // One second per meter window; the last one may be short.
    let mut window = vec![0.0 as Sample; SAMPLE_RATE];
    let mut done = 0usize;
    let mut second = 0usize;
    let mut peak_all: Sample = 0.0;
    let mut busy = std::time::Duration::ZERO;

    info!(patch = patch.name(), seconds, rate, "rendering");
    while done < total {
        let n = (total - done).min(SAMPLE_RATE);
        let t0 = Instant::now();
        engine.fill(&mut window[..n]);
        busy += t0.elapsed();
        black_box(&window);

        let (peak, rms) = levels(&window[..n]);
        peak_all = peak_all.max(peak);
        info!(second, "meter peak {peak:.3} rms {rms:.3}");

        done += n;
        second += 1;
    }

    let secs = busy.as_secs_f64();
    let factor = if secs > 0.0 { seconds / secs } else { f64::INFINITY };
    debug!(ticks = engine.ticks(), time = engine.time(), "engine stopped");
    info!(
        "done in {:.2} ms, {factor:.1}x realtime, peak {peak_all:.3}",
        secs * 1000.0
    );
    Ok(())
}

fn role_name(role: Role) -> &'static str {
    match role {
        Role::Audio => "audio",
        Role::Signal => "signal",
        Role::Trigger => "trigger",
    }
}

fn print_ports(kind: &str) -> Result<()> {
    let Some(ports) = ports_of(kind) else {
        bail!("unknown node kind {kind:?} (known: {})", kinds().collect::<Vec<_>>().join(", "));
    };
    println!("{kind}");
    if ports.is_empty() {
        println!("  (no inputs)");
    }
    for port in ports {
        if port.count > 1 {
            println!("  {:<6} {} x{}", port.name, role_name(port.role), port.count);
        } else {
            println!("  {:<6} {}", port.name, role_name(port.role));
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log)?;

    match cli.command {
        Commands::Render { patch, seconds, rate } => render(patch.into(), seconds, rate),
        Commands::Ports { kind: Some(kind) } => print_ports(&kind),
        Commands::Ports { kind: None } => {
            for kind in kinds() {
                print_ports(kind)?;
            }
            Ok(())
        }
    }
}
