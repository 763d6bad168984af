use anyhow::{Context, Result};
use clap::Args;
use fitts_timing::{HighPrecisionTimer, TickPacer};
use std::net::UdpSocket;
use tracing::info;

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Address the harness listens on.
    #[arg(long, default_value = "127.0.0.1:12346")]
    pub to: String,
    #[arg(long)]
    pub class: u8,
    #[arg(long, default_value_t = 1.0)]
    pub intensity: f32,
    /// Datagrams to send.
    #[arg(long, default_value_t = 1)]
    pub count: u32,
    /// Send rate in Hz.
    #[arg(long, default_value_t = 60)]
    pub rate: u32,
}

pub fn payload(class: u8, intensity: f32) -> String {
    format!("{class} {intensity}")
}

pub fn send(args: &SendArgs) -> Result<()> {
    let socket = UdpSocket::bind("0.0.0.0:0").context("failed to open sending socket")?;
    let message = payload(args.class, args.intensity);
    let clock = HighPrecisionTimer::new();
    let mut pacer = TickPacer::new(args.rate);

    for sent in 0..args.count {
        socket
            .send_to(message.as_bytes(), &args.to)
            .with_context(|| format!("failed to send to {}", args.to))?;
        if sent + 1 < args.count {
            pacer.wait(&clock);
        }
    }
    info!(count = args.count, to = %args.to, %message, "commands sent");
    Ok(())
}
