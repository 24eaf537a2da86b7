//! Turns parsed arguments into a runnable wrapper configuration.

use std::time::Duration;

use rustwrap_core::{RconConfig, StartupCommand};
use rustwrap_runtime::WrapperConfig;

use crate::error::CliError;
use crate::parser::Cli;

/// Validate `cli` and build the wrapper configuration.
///
/// Fails only when no startup command was given; incomplete RCON settings
/// are left for the reconnect loop to report.
pub fn wrapper_config(cli: &Cli) -> Result<WrapperConfig, CliError> {
    let command = StartupCommand::from_args(&cli.command)?;
    let rcon = RconConfig::new(
        cli.rcon_ip.clone(),
        cli.rcon_port.clone(),
        cli.rcon_pass.clone(),
    );

    let mut config = WrapperConfig::new(command, rcon);
    config.shutdown_grace = Duration::from_secs(cli.shutdown_grace);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn joins_command_and_builds_uri() {
        let cli = Cli::parse_from([
            "rustwrap",
            "--rcon-ip",
            "10.0.0.2",
            "--rcon-port",
            "28016",
            "--rcon-pass",
            "pw",
            "--shutdown-grace",
            "5",
            "./RustDedicated",
            "-batchmode",
        ]);
        let config = wrapper_config(&cli).unwrap();
        assert_eq!(config.command.as_str(), "./RustDedicated -batchmode");
        assert_eq!(config.rcon.uri(), "ws://10.0.0.2:28016/pw");
        assert_eq!(config.shutdown_grace, Duration::from_secs(5));
    }

    #[test]
    fn blank_command_is_a_config_error() {
        let cli = Cli::parse_from(["rustwrap", "  "]);
        let err = wrapper_config(&cli).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
        assert_eq!(err.to_string(), "Please specify a startup command.");
    }
}
