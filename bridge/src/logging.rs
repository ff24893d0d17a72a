use crate::abi::{guard, Status};
use crate::error::BridgeError;
use tracing::Level;
use tracing_subscriber::EnvFilter;

fn level(level: u32) -> Result<Level, BridgeError> {
    match level {
        0 => Ok(Level::ERROR),
        1 => Ok(Level::WARN),
        2 => Ok(Level::INFO),
        3 => Ok(Level::DEBUG),
        4 => Ok(Level::TRACE),
        _ => Err(BridgeError::InvalidArgument(format!("log level={level} not in [0, 4]"))),
    }
}

/// Installs a formatting subscriber writing to stderr. `level` goes from 0
/// (errors only) to 4 (trace); `RUST_LOG` takes precedence when set.
/// Calling it again, or after the host installed its own subscriber, is a no-op.
#[unsafe(no_mangle)]
pub extern "C" fn lattice_init_logging(level: u32) -> Status {
    guard("lattice_init_logging", || {
        let level: Level = self::level(level)?;
        let filter: EnvFilter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .try_init();
        Ok(())
    })
}
