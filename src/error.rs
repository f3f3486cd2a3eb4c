use std::fmt;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    /// Record body extends past the end of the capture.
    Truncated { kind: u8, wanted: usize, have: usize },
    /// Tag byte not in the ITCH 5.0 message set.
    UnknownKind(u8),
    /// Field inside an otherwise well-framed record is malformed.
    Corrupt(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "io error: {err}"),
            Error::Truncated { kind, wanted, have } => write!(
                f,
                "truncated record: kind 0x{kind:02x} wants {wanted} bytes, {have} left"
            ),
            Error::UnknownKind(tag) => write!(f, "unknown message kind 0x{tag:02x}"),
            Error::Corrupt(msg) => write!(f, "corrupt data: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::Io(value)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
