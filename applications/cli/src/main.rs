//! Outport - play a test tone through an audio client handle

use clap::{Parser, Subcommand};
use outport_core::ClientHandle;
use outport_cli::{AppConfig, SineTone};
use outport_cpal::{device, list_available_backends, AudioBackend, CpalClientFactory};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "outport")]
#[command(about = "Audio output client driven through a lifecycle handle", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a sine tone
    Play {
        /// Tone frequency in Hz
        #[arg(short, long)]
        frequency: Option<f32>,
        /// Tone amplitude (0.0 - 1.0)
        #[arg(short, long)]
        amplitude: Option<f32>,
        /// Duration in seconds
        #[arg(short, long)]
        seconds: Option<f32>,
        /// Output device name
        #[arg(short, long)]
        device: Option<String>,
        /// Audio backend (e.g. "default", "jack")
        #[arg(short, long)]
        backend: Option<String>,
    },
    /// List available audio backends
    Backends,
    /// List output devices
    Devices {
        /// Backend to list devices for
        #[arg(short, long, default_value = "default")]
        backend: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "outport=info,outport_cli=info,outport_core=info,outport_cpal=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            frequency,
            amplitude,
            seconds,
            device,
            backend,
        } => {
            let mut config = AppConfig::load(cli.config.as_deref())?;
            if let Some(frequency) = frequency {
                config.tone.frequency = frequency;
            }
            if let Some(amplitude) = amplitude {
                config.tone.amplitude = amplitude;
            }
            if let Some(seconds) = seconds {
                config.tone.seconds = seconds;
            }
            if let Some(device) = device {
                config.client.device_name = Some(device);
            }
            if let Some(backend) = backend {
                config.client = config.client.with_backend(backend.parse()?);
            }
            config.validate()?;
            play(&config)?;
        }
        Commands::Backends => list_backends(),
        Commands::Devices { backend } => list_devices(&backend)?,
    }

    Ok(())
}

fn play(config: &AppConfig) -> anyhow::Result<()> {
    let mut handle = ClientHandle::new(CpalClientFactory::new(config.client.clone()));

    handle.start()?;
    let info = handle.activate()?;

    let mut tone = SineTone::new(config.tone.frequency, config.tone.amplitude, info.sample_rate);
    let total_frames = (config.tone.seconds * info.sample_rate as f32).ceil() as usize;
    let chunks = total_frames.div_ceil(info.chunk_frames);

    tracing::info!(
        "Playing {} Hz for {:.1}s ({} chunks of {} frames, {:?} each)",
        config.tone.frequency,
        config.tone.seconds,
        chunks,
        info.chunk_frames,
        info.chunk_duration(),
    );

    for _ in 0..chunks {
        tone.fill(handle.current_output_buffer()?);
        handle.send_and_get_output_buffer()?;
    }

    // Let the queued buffers play out before tearing the stream down
    if let Some(client) = handle.client_mut() {
        client.drain()?;
        let underruns = client.underruns();
        if underruns > 0 {
            tracing::warn!("{} underruns during playback", underruns);
        }
    }

    handle.stop()?;
    Ok(())
}

fn list_backends() {
    for backend in list_available_backends() {
        let default_device = device::get_default_device(backend)
            .map(|info| info.name)
            .unwrap_or_else(|_| "none".to_string());
        println!(
            "{:<10} {} ({} output devices, default: {})",
            backend.name(),
            backend.description(),
            backend.output_device_count(),
            default_device
        );
    }
}

fn list_devices(backend: &str) -> anyhow::Result<()> {
    let backend: AudioBackend = backend.parse()?;

    for info in device::list_devices(backend)? {
        println!(
            "{} {:<40} {} Hz, {} ch",
            if info.is_default { "*" } else { " " },
            info.name,
            info.sample_rate,
            info.channels
        );
    }

    Ok(())
}
