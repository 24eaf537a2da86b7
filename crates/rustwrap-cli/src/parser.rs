//! Command-line interface definition.

use clap::Parser;
use rustwrap_core::rcon::DEFAULT_RCON_HOST;

/// Supervise a Rust dedicated server and bridge its console to RCON.
///
/// Every option can also be set through the environment, including a
/// `.env` file in the working directory.
#[derive(Debug, Parser)]
#[command(name = "rustwrap")]
#[command(version, about)]
pub struct Cli {
    /// RCON host
    #[arg(long = "rcon-ip", env = "RCON_IP", default_value = DEFAULT_RCON_HOST)]
    pub rcon_ip: String,

    /// RCON WebSocket port
    #[arg(long = "rcon-port", env = "RCON_PORT")]
    pub rcon_port: Option<String>,

    /// RCON password
    #[arg(long = "rcon-pass", env = "RCON_PASS", hide_env_values = true)]
    pub rcon_pass: Option<String>,

    /// Seconds the game gets to exit after SIGTERM before it is killed
    #[arg(
        long = "shutdown-grace",
        env = "WRAPPER_SHUTDOWN_GRACE",
        value_name = "SECS",
        default_value_t = 30
    )]
    pub shutdown_grace: u64,

    /// Startup command; remaining arguments are joined with single spaces
    #[arg(
        value_name = "COMMAND",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<String>,
}
