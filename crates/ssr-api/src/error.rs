use std::fmt::Display;
use std::io;

#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("io error: {message}")]
    Io { message: String },
    #[error("xml error: {message}")]
    Xml { message: String },

    #[error("disconnected")]
    Disconnected,
    #[error("aborted")]
    Aborted,
    #[error("frame payload contains a NUL byte")]
    InvalidFrame,
    #[error("invalid server address: {address}")]
    InvalidAddress { address: String },
}

impl Error {
    #[cold]
    pub fn new_io<E: Display>(error: E) -> Error {
        Error::Io {
            message: error.to_string(),
        }
    }

    #[cold]
    pub fn new_xml<E: Display>(error: E) -> Error {
        Error::Xml {
            message: error.to_string(),
        }
    }

    pub fn is_disconnected(&self) -> bool {
        matches!(self, Error::Disconnected)
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, Error::Aborted)
    }
}

impl From<io::Error> for Error {
    #[cold]
    fn from(error: io::Error) -> Error {
        match error.kind() {
            io::ErrorKind::UnexpectedEof
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::NotConnected => Error::Disconnected,
            io::ErrorKind::ConnectionAborted => Error::Aborted,
            _ => Error::new_io(error),
        }
    }
}

impl From<quick_xml::Error> for Error {
    #[cold]
    fn from(error: quick_xml::Error) -> Error {
        Error::new_xml(error)
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_are_classified() {
        let reset = io::Error::from(io::ErrorKind::ConnectionReset);
        assert!(Error::from(reset).is_disconnected());

        let aborted = io::Error::from(io::ErrorKind::ConnectionAborted);
        assert!(Error::from(aborted).is_aborted());

        let other = io::Error::new(io::ErrorKind::Other, "boom");
        assert_eq!(
            Error::from(other),
            Error::Io {
                message: "boom".into()
            }
        );
    }
}
