//! Command-line interface

use crate::session::{READY_TIMEOUT, SessionOptions};
use blockpilot_protocol::{Direction, Heading};
use blockpilot_transport::BridgeConfig;
use clap::Parser;

/// Interactive driver for a block-world agent bridge process
#[derive(Debug, Parser)]
#[command(name = "blockpilot", version, about)]
pub struct Cli {
    /// Game server host
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Game server port
    #[arg(long, default_value_t = 25565)]
    pub port: u16,

    /// Agent username
    #[arg(long, default_value = "Bot")]
    pub username: String,

    /// Password, if the server requires one
    #[arg(long)]
    pub password: Option<String>,

    /// Auth provider, e.g. microsoft
    #[arg(long)]
    pub auth: Option<String>,

    /// Protocol version override (autodetected when omitted)
    #[arg(long = "mc-version")]
    pub mc_version: Option<String>,

    /// Direction for the scripted initial move
    #[arg(long, default_value = "north", value_parser = parse_direction)]
    pub direction: Direction,

    /// Absolute yaw in degrees for the initial move (overrides --direction;
    /// 0=east, 90=south, 180=west, 270=north)
    #[arg(long = "yaw-deg")]
    pub yaw_deg: Option<f64>,

    /// Default move distance in blocks
    #[arg(long, default_value_t = 10)]
    pub blocks: u32,

    /// Scripted initial chat message
    #[arg(long, default_value = "hello, I am a bot")]
    pub message: String,

    /// Run the bridge in local simulation mode (no real server needed)
    #[arg(long)]
    pub mock: bool,

    /// Skip the scripted initial move/say and go straight to the REPL
    #[arg(long = "no-script")]
    pub no_script: bool,

    /// Path to the bridge script
    #[arg(long = "bridge-script", default_value = "bot.js")]
    pub bridge_script: String,

    /// Bridge runtime executable
    #[arg(long, default_value = "node")]
    pub node: String,
}

fn parse_direction(raw: &str) -> Result<Direction, String> {
    raw.parse::<Direction>().map_err(|err| err.to_string())
}

impl Cli {
    /// Build the session options this invocation describes
    pub fn session_options(&self) -> SessionOptions {
        let bridge = BridgeConfig {
            program: self.node.clone(),
            script: self.bridge_script.clone(),
            host: self.host.clone(),
            port: self.port,
            username: self.username.clone(),
            password: self.password.clone(),
            auth: self.auth.clone(),
            version: self.mc_version.clone(),
            mock: self.mock,
        };

        let heading = match self.yaw_deg {
            Some(yaw_deg) => Heading::Yaw { yaw_deg },
            None => Heading::Direction {
                direction: self.direction,
            },
        };

        SessionOptions {
            bridge,
            heading,
            blocks: self.blocks,
            message: self.message.clone(),
            script: !self.no_script,
            ready_timeout: READY_TIMEOUT,
        }
    }
}
