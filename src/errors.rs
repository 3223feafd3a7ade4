use std::io;

/// All error types that can occur when running the bridge emulation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A network socket operation failed.
    #[error("socket {action} error: {err:?}")]
    Socket { action: String, err: io::Error },

    /// The device registry has reached its configured capacity.
    #[error("device registry full (capacity {capacity})")]
    RegistryFull { capacity: usize },

    /// The supplied hardware address could not be parsed.
    #[error("invalid hardware address: {0}")]
    InvalidHardwareAddress(String),

    /// No usable IPv4 interface was found during address autodetection.
    #[error("no non-loopback IPv4 interface found")]
    NoIpv4Interface,
}

impl Error {
    /// Create a new socket error
    pub fn socket(action: &str, err: io::Error) -> Self {
        Error::Socket {
            action: action.to_string(),
            err,
        }
    }
}

/// Hacky implementation of PartialEq for testing
#[cfg(test)]
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}
