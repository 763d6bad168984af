use crate::sink::{JsonLinesSink, TracingSink};
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use fitts_session::{ControlLoop, SessionConfig, SessionReport, UdpCommandSource, Variant};
use fitts_timing::HighPrecisionTimer;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VariantArg {
    Ring,
    Linear,
}

impl From<VariantArg> for Variant {
    fn from(value: VariantArg) -> Self {
        match value {
            VariantArg::Ring => Variant::Ring,
            VariantArg::Linear => Variant::Linear,
        }
    }
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// TOML file layered over the variant's preset.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Preset to start from when no config file names one.
    #[arg(long, value_enum)]
    pub variant: Option<VariantArg>,
    /// Local address for the command socket.
    #[arg(long)]
    pub bind: Option<String>,
    #[arg(long)]
    pub seed: Option<u64>,
    #[arg(long)]
    pub trials: Option<u32>,
    #[arg(long)]
    pub tick_rate: Option<u32>,
    /// Dwell threshold in seconds.
    #[arg(long)]
    pub dwell: Option<f64>,
    /// Stream snapshots and the final report as JSON on stdout.
    #[arg(long)]
    pub json: bool,
}

impl RunArgs {
    pub fn resolve_config(&self) -> Result<SessionConfig> {
        let mut config = match (&self.config, self.variant) {
            (Some(path), _) => SessionConfig::load(path)
                .with_context(|| format!("failed to load {}", path.display()))?,
            (None, variant) => SessionConfig::preset(variant.map(Into::into).unwrap_or_default()),
        };

        if let Some(variant) = self.variant {
            let variant = Variant::from(variant);
            if self.config.is_some() && variant != config.variant {
                anyhow::bail!(
                    "--variant {:?} conflicts with variant {:?} in the config file",
                    variant,
                    config.variant
                );
            }
        }
        if let Some(bind) = &self.bind {
            config.bind_addr = bind.clone();
        }
        if let Some(seed) = self.seed {
            config.linear.seed = seed;
        }
        if let Some(trials) = self.trials {
            config.trials = trials;
        }
        if let Some(rate) = self.tick_rate {
            config.tick_rate_hz = rate;
        }
        if let Some(dwell) = self.dwell {
            config.dwell_secs = dwell;
        }

        config.validate().context("invalid session configuration")?;
        Ok(config)
    }
}

pub struct App {
    config: SessionConfig,
    json: bool,
}

impl App {
    pub fn new(args: &RunArgs) -> Result<Self> {
        Ok(Self {
            config: args.resolve_config()?,
            json: args.json,
        })
    }

    pub fn run(self) -> Result<SessionReport> {
        let quit = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&quit);
        ctrlc::set_handler(move || {
            info!("quit signal received");
            flag.store(true, Ordering::SeqCst);
        })
        .context("failed to install quit handler")?;

        info!(
            variant = ?self.config.variant,
            bind = %self.config.bind_addr,
            trials = self.config.trials,
            "starting session"
        );
        let source = UdpCommandSource::bind(&self.config.bind_addr)?;
        let clock = HighPrecisionTimer::new();
        let json = self.json.then(|| JsonLinesSink::new(std::io::stdout()));

        let report = match self.config.variant {
            Variant::Ring => ControlLoop::ring(&self.config, source, clock)?
                .run(&quit, (TracingSink::default(), json)),
            Variant::Linear => ControlLoop::linear(&self.config, source, clock)?
                .run(&quit, (TracingSink::default(), json)),
        };

        for acquisition in &report.acquisitions {
            info!(
                ordinal = acquisition.ordinal,
                target = ?acquisition.target_index,
                movement_ms = acquisition.movement_time_ns as f64 / 1e6,
                "acquisition"
            );
        }
        info!(
            ticks = report.ticks,
            mean_tick_ms = report.tick_stats.average_tick_ns / 1e6,
            jitter_ms = report.tick_stats.jitter_ns / 1e6,
            absent = report.counters.absent,
            malformed = report.counters.malformed,
            "timing and input"
        );
        if self.json {
            println!("{}", report.to_json_pretty()?);
        }
        Ok(report)
    }
}
