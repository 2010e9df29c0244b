use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::info;

use vidctl::platform::{
    FullscreenVariant, SimulatedFullscreen, SimulatedPictureInPicture, SimulatedPlatform,
};
use vidctl::{ControlsConfig, Event, EventSource, Synchronizer};

/// Drive the control overlay against a simulated media source and print the
/// resulting widget state as JSON.
#[derive(Parser, Debug)]
#[command(name = "vidctl", version, about)]
struct Args {
    /// Length of the simulated media, in seconds
    #[arg(long, default_value_t = 120.0)]
    duration: f64,

    /// Seconds already buffered when the session starts
    #[arg(long)]
    buffered: Option<f64>,

    /// Comma-separated keys to press, e.g. "k,ArrowRight,m"
    #[arg(long, value_delimiter = ',')]
    keys: Vec<String>,

    /// JSON file with overlay configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulate a platform without picture-in-picture
    #[arg(long)]
    no_pip: bool,

    /// Simulate a platform without any fullscreen entry point
    #[arg(long)]
    no_fullscreen: bool,

    /// Make picture-in-picture requests fail
    #[arg(long)]
    reject_pip: bool,
}

fn pump(platform: &SimulatedPlatform, sync: &mut Synchronizer) {
    for ev in platform.media.take_events() {
        sync.handle_media_event(ev);
    }
}

/// Translate the `" "` key, which is awkward on a command line
fn key_name(raw: &str) -> &str {
    match raw {
        "space" | "Space" => " ",
        other => other,
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            ControlsConfig::from_json_str(&text)?
        }
        None => ControlsConfig::default(),
    };

    let mut platform = SimulatedPlatform::new();
    if args.no_pip {
        platform = platform.with_pip(SimulatedPictureInPicture::unsupported());
    }
    if args.no_fullscreen {
        platform = platform.with_fullscreen(SimulatedFullscreen::unsupported());
    } else {
        platform = platform.with_fullscreen(SimulatedFullscreen::new(vec![FullscreenVariant::Webkit]));
    }
    platform.pip.reject_requests(args.reject_pip);

    let mut sync = vidctl::new_synchronizer(&platform, config)?;
    platform.media.load(args.duration);
    if let Some(end) = args.buffered {
        platform.media.buffer_until(end);
    }
    pump(&platform, &mut sync);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("building runtime")?;

    for raw in &args.keys {
        let key = key_name(raw);
        info!("key {:?}", key);
        if let Some(task) = sync.dispatch(EventSource::Document, &Event::KeyDown(key.to_string())) {
            let _ = rt.block_on(task.run());
        }
        pump(&platform, &mut sync);
    }

    println!("{}", serde_json::to_string_pretty(sync.controls())?);
    Ok(())
}
