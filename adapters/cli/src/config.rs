//! Command-line and file configuration for the client.

use std::{
    fs,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use rts_client_core::{Hand, CARRY_THRESHOLD};
use rts_client_system_harvest::Config as EngineConfig;
use serde::Deserialize;

/// Port used when none is supplied.
pub const DEFAULT_PORT: u16 = 9090;

/// Command-line arguments accepted by the client.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Reference client for the tile-grid RTS server",
    long_about = None
)]
pub struct Args {
    /// Port the game server connects to
    #[arg(value_name = "PORT")]
    pub port: Option<u16>,

    /// Port the game server connects to, as a flag
    #[arg(long = "port", value_name = "PORT", conflicts_with = "port")]
    pub port_flag: Option<u16>,

    /// Address to listen on
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// Seed for the navigation random source (entropy when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Optional TOML configuration file; flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Stop after serving this many sessions
    #[arg(long)]
    pub max_sessions: Option<usize>,

    /// Carried amount at which workers return to base
    #[arg(long)]
    pub carry_threshold: Option<u32>,

    /// Hand kept against obstacles while wall-following
    #[arg(long, value_enum)]
    pub wall_hand: Option<HandArg>,

    /// Base stock at which a worker is ordered (0 disables production)
    #[arg(long)]
    pub worker_cost: Option<u32>,

    /// Drop units not reported for this many ticks (0 keeps them forever)
    #[arg(long)]
    pub stale_unit_ticks: Option<u64>,
}

impl Args {
    /// Listening port from either spelling, or [`DEFAULT_PORT`].
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port.or(self.port_flag).unwrap_or(DEFAULT_PORT)
    }
}

/// Command-line spelling of [`Hand`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum HandArg {
    /// Keep the obstacle on the left.
    Left,
    /// Keep the obstacle on the right.
    Right,
}

impl From<HandArg> for Hand {
    fn from(value: HandArg) -> Self {
        match value {
            HandArg::Left => Hand::Left,
            HandArg::Right => Hand::Right,
        }
    }
}

/// Contents of the optional TOML configuration file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Decision engine settings.
    pub engine: EngineSection,
    /// World mirror settings.
    pub world: WorldSection,
}

/// `[engine]` table of the configuration file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineSection {
    /// Carried amount at which workers return to base.
    pub carry_threshold: Option<u32>,
    /// Hand used on entering wall-following.
    pub wall_hand: Option<Hand>,
    /// Base stock at which a worker is ordered.
    pub worker_cost: Option<u32>,
    /// Seed for the navigation random source.
    pub seed: Option<u64>,
}

/// `[world]` table of the configuration file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldSection {
    /// Ticks a unit may go unreported before it is dropped.
    pub stale_unit_ticks: Option<u64>,
}

impl FileConfig {
    /// Parses a configuration file body.
    pub fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse client configuration toml")
    }

    /// Reads and parses the configuration file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid configuration at {}", path.display()))
    }
}

/// Fully resolved client settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Address the listener binds to.
    pub bind: SocketAddr,
    /// Seed for every session's random source.
    pub seed: Option<u64>,
    /// Number of sessions to serve before exiting.
    pub max_sessions: Option<usize>,
    /// Decision engine settings.
    pub engine: EngineConfig,
    /// Ticks a unit may go unreported before it is dropped.
    pub stale_unit_ticks: Option<u64>,
}

impl ClientConfig {
    /// Resolves arguments against the configuration file they name, if any.
    pub fn from_args(args: &Args) -> Result<Self> {
        let file = match &args.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Ok(Self::merge(args, &file))
    }

    /// Combines flags and file values; flags win.
    #[must_use]
    pub fn merge(args: &Args, file: &FileConfig) -> Self {
        let carry_threshold = args
            .carry_threshold
            .or(file.engine.carry_threshold)
            .unwrap_or(CARRY_THRESHOLD);
        let wall_hand = args
            .wall_hand
            .map(Hand::from)
            .or(file.engine.wall_hand)
            .unwrap_or_default();
        let worker_cost = args.worker_cost.or(file.engine.worker_cost).unwrap_or(0);
        let stale_unit_ticks = args
            .stale_unit_ticks
            .or(file.world.stale_unit_ticks)
            .filter(|ticks| *ticks > 0);

        Self {
            bind: SocketAddr::new(args.host, args.port()),
            seed: args.seed.or(file.engine.seed),
            max_sessions: args.max_sessions,
            engine: EngineConfig::new(carry_threshold, wall_hand).with_worker_cost(worker_cost),
            stale_unit_ticks,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT),
            seed: None,
            max_sessions: None,
            engine: EngineConfig::default(),
            stale_unit_ticks: None,
        }
    }
}
