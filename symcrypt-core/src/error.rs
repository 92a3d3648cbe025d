//! The error type shared by every part of `symcrypt-core`.
//!
//! Configuration problems (key, IV and nonce lengths, unsupported combinations) are reported by
//! `CipherConfig::builder().build()`, before any byte is transformed. Everything else is reported
//! by the call that first detects it.

use std::io;

use crate::primitives::{Algorithm, Mode, Padding};

#[derive(Debug)]
pub enum Error {
    /// The key length is not in the algorithm's key table (`len` is 0 when no key was given)
    KeySize { algorithm: Algorithm, len: usize },
    /// The IV is missing (`actual` is `None`) or is not exactly one block long
    Iv {
        expected: usize,
        actual: Option<usize>,
    },
    /// The nonce is missing (`actual` is `None`) or has the wrong length
    Nonce {
        expected: usize,
        actual: Option<usize>,
    },
    /// The input cannot be split into whole blocks
    UnalignedInput { len: usize, block_size: usize },
    /// The padding bytes found after decryption are malformed
    Padding(Padding),
    /// Padding was requested for a block size outside 1..=255
    BlockSize(usize),
    /// The AEAD tag did not match, no plaintext is released
    Authentication,
    /// A stream was written to, or closed, after it had already been closed
    StreamClosed,
    /// The mode cannot be used with this algorithm (e.g. GCM over a 64-bit block)
    UnsupportedMode { algorithm: Algorithm, mode: Mode },
    /// The padding cannot be used with this algorithm (PKCS5 is only defined for 64-bit blocks)
    UnsupportedPadding {
        algorithm: Algorithm,
        padding: Padding,
    },
    /// The caller-supplied reader or writer failed
    Io(io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::KeySize { algorithm, len: 0 } => write!(f, "No key provided for {algorithm}"),
            Error::KeySize { algorithm, len } => {
                write!(f, "A {len} byte key is not valid for {algorithm}")
            }
            Error::Iv {
                expected,
                actual: None,
            } => write!(f, "An IV of {expected} bytes is required"),
            Error::Iv {
                expected,
                actual: Some(actual),
            } => write!(f, "The IV must be {expected} bytes, got {actual}"),
            Error::Nonce {
                expected,
                actual: None,
            } => write!(f, "A nonce of {expected} bytes is required"),
            Error::Nonce {
                expected,
                actual: Some(actual),
            } => write!(f, "The nonce must be {expected} bytes, got {actual}"),
            Error::UnalignedInput { len, block_size } => write!(
                f,
                "{len} bytes cannot be split into {block_size} byte blocks"
            ),
            Error::Padding(padding) => write!(f, "Invalid {padding} padding"),
            Error::BlockSize(block_size) => {
                write!(f, "Cannot pad to {block_size} byte blocks")
            }
            Error::Authentication => f.write_str(
                "Unable to authenticate the data. This means either: you're using the wrong key or nonce, or the data/AAD has been tampered with.",
            ),
            Error::StreamClosed => f.write_str("The stream has already been closed"),
            Error::UnsupportedMode { algorithm, mode } => {
                write!(f, "{mode} mode cannot be used with {algorithm}")
            }
            Error::UnsupportedPadding { algorithm, padding } => {
                write!(f, "{padding} padding cannot be used with {algorithm}")
            }
            Error::Io(err) => write!(f, "I/O error: {err}"),
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

// engine errors travel through `std::io` inside the sink/source adapters,
// so they are unwrapped again here instead of being nested in `Error::Io`
impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        if !err.get_ref().map_or(false, |inner| inner.is::<Error>()) {
            return Error::Io(err);
        }

        let kind = err.kind();
        match err.into_inner().map(|inner| inner.downcast::<Error>()) {
            Some(Ok(engine)) => *engine,
            Some(Err(other)) => Error::Io(io::Error::new(kind, other)),
            None => Error::Io(io::Error::from(kind)),
        }
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        let kind = match err {
            Error::Io(inner) => return inner,
            Error::Padding(_) | Error::Authentication | Error::UnalignedInput { .. } => {
                io::ErrorKind::InvalidData
            }
            Error::StreamClosed => io::ErrorKind::BrokenPipe,
            _ => io::ErrorKind::InvalidInput,
        };
        io::Error::new(kind, err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = Error::KeySize {
            algorithm: Algorithm::Aes,
            len: 7,
        };
        assert_eq!(err.to_string(), "A 7 byte key is not valid for AES");

        let err = Error::Iv {
            expected: 16,
            actual: None,
        };
        assert_eq!(err.to_string(), "An IV of 16 bytes is required");

        let err = Error::Padding(Padding::Pkcs7);
        assert_eq!(err.to_string(), "Invalid PKCS7 padding");
    }

    #[test]
    fn survives_a_trip_through_io() {
        let io_err: io::Error = Error::Authentication.into();
        assert_eq!(io_err.kind(), io::ErrorKind::InvalidData);

        match Error::from(io_err) {
            Error::Authentication => {}
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn transport_errors_are_wrapped() {
        let io_err = io::Error::new(io::ErrorKind::UnexpectedEof, "pipe went away");
        match Error::from(io_err) {
            Error::Io(inner) => assert_eq!(inner.kind(), io::ErrorKind::UnexpectedEof),
            other => panic!("unexpected error: {other}"),
        }

        let back: io::Error = Error::Io(io::Error::from(io::ErrorKind::WriteZero)).into();
        assert_eq!(back.kind(), io::ErrorKind::WriteZero);
    }
}
