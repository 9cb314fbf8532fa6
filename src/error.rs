use thiserror::Error;

use crate::config::ConfigError;

/// Failures raised while bringing the game up. The simulation itself never
/// fails once constructed.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration")]
    Config(#[from] ConfigError),
    #[error("terminal I/O failed")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
