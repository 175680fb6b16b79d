//! msgframe binary - start the listener and drive a demo render loop.
//!
//! This binary is intentionally small: it parses CLI arguments, wires the
//! shared message cell between the listener and the renderer, and then
//! renders at a fixed cadence the way an embedding host would. Helper
//! modules in the library contain the listener, the shared cell and the
//! renderer.

use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use log::{debug, info};

use msgframe::config::{DEFAULT_MESSAGE, DEFAULT_PORT};
use msgframe::render::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use msgframe::{ListenerConfig, MessageListener, Renderer, SharedMessage};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Port to listen on for inbound messages
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Message shown before anything has been received
    #[arg(long, default_value = DEFAULT_MESSAGE)]
    message: String,

    /// Frame width in pixels
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: u32,

    /// Frame height in pixels
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    height: u32,

    /// Frames rendered per second by the demo loop
    #[arg(long, default_value_t = 1)]
    fps: u32,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = ListenerConfig::new(cli.port, cli.message).map_err(anyhow::Error::msg)?;
    let message = SharedMessage::new(config.initial_message.clone());

    MessageListener::start(&config, message.clone())
        .with_context(|| format!("failed to start listener on port {}", config.port))?;

    let renderer = Renderer::new(message);
    let interval = Duration::from_secs(1) / cli.fps.max(1);
    info!(
        "rendering {}x{} frames every {:?}",
        cli.width, cli.height, interval
    );
    loop {
        let frame = renderer.render(Some(cli.width), Some(cli.height));
        debug!(
            "rendered frame, shape {:?}, {} lit channels",
            frame.shape(),
            frame.data().iter().filter(|&&v| v > 0.0).count()
        );
        thread::sleep(interval);
    }
}
