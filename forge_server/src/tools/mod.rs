pub mod runner;

pub use runner::{run, ToolOutput};

use crate::config::ToolsConfig;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{tool} exceeded {seconds}s timeout")]
    Timeout { tool: &'static str, seconds: u64 },

    #[error("{binary} not installed in runtime environment")]
    BinaryMissing { binary: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A single external forensic tool invocation: the binary, its fixed
/// leading arguments, and the bounded wait. The evidence path is appended
/// as the final argument.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub name: &'static str,
    pub binary: String,
    pub args: Vec<String>,
    pub timeout: Duration,
}

impl ToolSpec {
    /// Sleuth Kit recursive file listing: `fls -r <image>`.
    pub fn tsk_fls(config: &ToolsConfig) -> Self {
        Self {
            name: "tsk_fls",
            binary: config.fls.binary.clone(),
            args: vec!["-r".to_string()],
            timeout: Duration::from_secs(config.fls.timeout_seconds),
        }
    }

    /// Volatility process listing: `vol.py pslist -f <memory image>`.
    pub fn volatility_pslist(config: &ToolsConfig) -> Self {
        Self {
            name: "volatility_pslist",
            binary: config.volatility.binary.clone(),
            args: vec!["pslist".to_string(), "-f".to_string()],
            timeout: Duration::from_secs(config.volatility.timeout_seconds),
        }
    }
}
