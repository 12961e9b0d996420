//! Server Configuration
//!
//! LayerKV is configured from command-line flags only:
//!
//! ```text
//! -h, --host <HOST>    Host to bind to (default: 127.0.0.1)
//! -p, --port <PORT>    Port to listen on (default: 6789)
//! -v, --version        Print version information
//!     --help           Print the help message
//! ```
//!
//! Log verbosity follows the `RUST_LOG` environment variable.

use crate::{DEFAULT_HOST, DEFAULT_PORT};
use thiserror::Error;

/// Errors produced while reading command-line flags.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} requires a value")]
    MissingValue(String),

    #[error("invalid port number: {0}")]
    InvalidPort(String),

    #[error("unknown argument: {0}")]
    UnknownArgument(String),
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// What the binary should do after reading its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliAction {
    Serve(ServerConfig),
    PrintHelp,
    PrintVersion,
}

impl ServerConfig {
    /// Parses command-line arguments (without the program name).
    pub fn from_args<I, S>(args: I) -> Result<CliAction, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut config = ServerConfig::default();
        let mut args = args.into_iter().map(Into::into);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--host" | "-h" => {
                    config.host = args
                        .next()
                        .ok_or_else(|| ConfigError::MissingValue(arg.clone()))?;
                }
                "--port" | "-p" => {
                    let value = args
                        .next()
                        .ok_or_else(|| ConfigError::MissingValue(arg.clone()))?;
                    config.port = value
                        .parse()
                        .map_err(|_| ConfigError::InvalidPort(value))?;
                }
                "--help" => return Ok(CliAction::PrintHelp),
                "--version" | "-v" => return Ok(CliAction::PrintVersion),
                _ => return Err(ConfigError::UnknownArgument(arg.clone())),
            }
        }

        Ok(CliAction::Serve(config))
    }

    /// Returns the bind address as a string
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
