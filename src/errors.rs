use std::{error, fmt, io, string};

/// An error from picar-check itself: bad configuration, bad filters, nothing
/// to run. Hardware failures are [ProbeError]s and never escape their probe.
pub struct PicarError(pub String);

impl fmt::Debug for PicarError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for PicarError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl error::Error for PicarError {}

impl From<string::FromUtf8Error> for PicarError {
    fn from(err: string::FromUtf8Error) -> Self {
        PicarError(err.to_string())
    }
}

impl From<io::Error> for PicarError {
    fn from(err: io::Error) -> Self {
        PicarError(err.to_string())
    }
}

impl From<regex::Error> for PicarError {
    fn from(err: regex::Error) -> Self {
        PicarError(err.to_string())
    }
}

/// Why a probe failed.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeError {
    /// The driver for the subsystem is not there at all: a missing device
    /// node, a tool that is not installed, no Robot HAT on the bus.
    Unavailable(String),
    /// The driver is there but the hardware call failed.
    Fault(String),
}

impl ProbeError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, ProbeError::Unavailable(_))
    }

    /// The message without the classification.
    pub fn detail(&self) -> &str {
        match self {
            ProbeError::Unavailable(msg) | ProbeError::Fault(msg) => msg,
        }
    }
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.detail())
    }
}

impl error::Error for ProbeError {}

impl From<io::Error> for ProbeError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
                ProbeError::Unavailable(err.to_string())
            }
            _ => ProbeError::Fault(err.to_string()),
        }
    }
}

impl From<rppal::i2c::Error> for ProbeError {
    fn from(err: rppal::i2c::Error) -> Self {
        use rppal::i2c::Error as E;
        match err {
            E::Io(io) => ProbeError::from(io),
            E::UnknownModel => ProbeError::Unavailable(
                "not running on a supported Raspberry Pi".to_string(),
            ),
            other => ProbeError::Fault(other.to_string()),
        }
    }
}

impl From<rppal::gpio::Error> for ProbeError {
    fn from(err: rppal::gpio::Error) -> Self {
        use rppal::gpio::Error as E;
        match err {
            E::Io(io) => ProbeError::from(io),
            E::UnknownModel => ProbeError::Unavailable(
                "not running on a supported Raspberry Pi".to_string(),
            ),
            E::PermissionDenied(path) => ProbeError::Unavailable(format!(
                "permission denied: {}",
                path
            )),
            other => ProbeError::Fault(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_files_are_unavailable() {
        let err = io::Error::new(io::ErrorKind::NotFound, "no /dev/i2c-1");
        assert!(ProbeError::from(err).is_unavailable());
    }

    #[test]
    fn other_io_errors_are_faults() {
        let err = io::Error::new(io::ErrorKind::TimedOut, "nack");
        let err = ProbeError::from(err);
        assert!(!err.is_unavailable());
        assert_eq!(err.detail(), "nack");
    }
}
