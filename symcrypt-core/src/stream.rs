//! This module contains the streaming codec
//!
//! `StreamEncryptor` and `StreamDecryptor` are the low-level objects: feed them data with `update()`
//! and close them with `finalize()`. They hold at most one block between calls (AEAD decryption
//! excepted, which cannot release anything before the tag has been checked).
//!
//! `EncryptWriter` and `DecryptReader` wrap those objects behind `std::io::Write` and
//! `std::io::Read`, and `encrypt_stream()` / `decrypt_stream()` are convenience functions for piping
//! a reader into a writer.
//!
//! The output is byte-identical to `Codec`, no matter how the input is split.
//!
//! # Examples
//!
//! ```rust
//! # use std::io::{Cursor, Write};
//! # use symcrypt_core::config::CipherConfig;
//! # use symcrypt_core::primitives::{Algorithm, Mode};
//! # use symcrypt_core::stream::{decrypt_stream, EncryptWriter};
//! let config = CipherConfig::builder(Algorithm::Aes)
//!     .key(&[0x11; 32])
//!     .nonce(&[0x22; 12])
//!     .mode(Mode::Gcm)
//!     .build()
//!     .unwrap();
//!
//! let mut writer = EncryptWriter::new(&config, Vec::new()).unwrap();
//! writer.write_all(b"hello ").unwrap();
//! writer.write_all(b"world").unwrap();
//! let ciphertext = writer.finish().unwrap();
//! assert_eq!(ciphertext.len(), 11 + 16);
//!
//! let mut plaintext = Vec::new();
//! decrypt_stream(&config, &mut Cursor::new(ciphertext), &mut plaintext).unwrap();
//! assert_eq!(plaintext, b"hello world");
//! ```

use std::io::{self, Read, Write};

use zeroize::Zeroizing;

use crate::config::CipherConfig;
use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::primitives::STREAM_CHUNK_SIZE;

/// This is used for encrypting a message that arrives in pieces
///
/// Once `finalize()` has been called (successfully or not), the stream is closed and every further
/// call returns `Error::StreamClosed`. Dropping an open stream emits nothing.
pub struct StreamEncryptor {
    engine: Option<Engine>,
    pending: Zeroizing<Vec<u8>>,
    seen: usize,
}

impl StreamEncryptor {
    /// This creates a fresh stream for one message
    ///
    /// Every stream starts from the config's IV/nonce, so never encrypt two messages with one config.
    pub fn initialize(config: &CipherConfig) -> Result<Self> {
        Ok(StreamEncryptor {
            engine: Some(Engine::new(config)?),
            pending: Zeroizing::new(Vec::with_capacity(config.block_size())),
            seen: 0,
        })
    }

    /// Encrypts the next piece of the message
    ///
    /// It returns every byte of ciphertext that is ready, which may be nothing
    pub fn update(&mut self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let engine = self.engine.as_mut().ok_or(Error::StreamClosed)?;
        self.seen += plaintext.len();
        Ok(engine.encrypt_update(&mut self.pending, plaintext))
    }

    /// Pads and encrypts whatever is left, and appends the tag for AEAD
    pub fn finalize(&mut self) -> Result<Vec<u8>> {
        let engine = self.engine.take().ok_or(Error::StreamClosed)?;
        let ciphertext = engine.encrypt_finish(&self.pending, self.seen);
        self.pending.clear();
        ciphertext
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.engine.is_none()
    }
}

/// This is used for decrypting a message that arrives in pieces
///
/// For padded modes the final block is always held back until `finalize()`, because it may contain
/// padding. For AEAD nothing is returned before `finalize()` has verified the tag.
pub struct StreamDecryptor {
    engine: Option<Engine>,
    pending: Zeroizing<Vec<u8>>,
    seen: usize,
}

impl StreamDecryptor {
    pub fn initialize(config: &CipherConfig) -> Result<Self> {
        Ok(StreamDecryptor {
            engine: Some(Engine::new(config)?),
            pending: Zeroizing::new(Vec::with_capacity(config.block_size())),
            seen: 0,
        })
    }

    /// Decrypts the next piece of the message
    pub fn update(&mut self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        let engine = self.engine.as_mut().ok_or(Error::StreamClosed)?;
        self.seen += ciphertext.len();
        Ok(engine.decrypt_update(&mut self.pending, ciphertext))
    }

    /// Decrypts and unpads the final block, or verifies the tag and releases the whole plaintext
    pub fn finalize(&mut self) -> Result<Vec<u8>> {
        let engine = self.engine.take().ok_or(Error::StreamClosed)?;
        let plaintext = engine.decrypt_finish(&self.pending, self.seen);
        self.pending.clear();
        plaintext
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.engine.is_none()
    }
}

/// A `Write` sink that encrypts everything written to it into `inner`
///
/// `close()` (or `finish()`) must be called once all of the plaintext has been written, otherwise
/// the final block (or the tag) is never emitted.
pub struct EncryptWriter<W: Write> {
    inner: W,
    stream: StreamEncryptor,
}

impl<W: Write> EncryptWriter<W> {
    pub fn new(config: &CipherConfig, inner: W) -> Result<Self> {
        Ok(EncryptWriter {
            inner,
            stream: StreamEncryptor::initialize(config)?,
        })
    }

    /// Emits the final block (or the tag) and flushes the inner writer
    ///
    /// A second call returns `Error::StreamClosed`
    pub fn close(&mut self) -> Result<()> {
        let ciphertext = self.stream.finalize()?;
        self.inner.write_all(&ciphertext)?;
        self.inner.flush()?;
        Ok(())
    }

    /// Closes the stream and hands back the inner writer
    pub fn finish(mut self) -> Result<W> {
        self.close()?;
        Ok(self.inner)
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }
}

impl<W: Write> Write for EncryptWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let ciphertext = self.stream.update(buf)?;
        self.inner.write_all(&ciphertext)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// A `Read` source that decrypts everything read from `inner`
///
/// The stream is finalized when `inner` runs dry, so padding and tag errors surface from the last
/// `read()` call, as an `io::Error` wrapping the `symcrypt_core::error::Error`. Every later call
/// fails the same way.
pub struct DecryptReader<R: Read> {
    inner: R,
    stream: StreamDecryptor,
    chunk: Zeroizing<Vec<u8>>,
    output: Zeroizing<Vec<u8>>,
    position: usize,
    exhausted: bool,
    failure: Option<(io::ErrorKind, String)>,
}

impl<R: Read> DecryptReader<R> {
    pub fn new(config: &CipherConfig, inner: R) -> Result<Self> {
        Ok(DecryptReader {
            inner,
            stream: StreamDecryptor::initialize(config)?,
            chunk: Zeroizing::new(vec![0u8; STREAM_CHUNK_SIZE]),
            output: Zeroizing::new(Vec::new()),
            position: 0,
            exhausted: false,
            failure: None,
        })
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for DecryptReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            if self.position < self.output.len() {
                let available = &self.output[self.position..];
                let count = available.len().min(buf.len());
                buf[..count].copy_from_slice(&available[..count]);
                self.position += count;
                return Ok(count);
            }

            if let Some((kind, message)) = &self.failure {
                return Err(io::Error::new(*kind, message.clone()));
            }
            if self.exhausted {
                return Ok(0);
            }

            let read_count = match self.inner.read(&mut self.chunk) {
                Ok(count) => count,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            };

            let plaintext = if read_count == 0 {
                self.exhausted = true;
                self.stream.finalize()
            } else {
                self.stream.update(&self.chunk[..read_count])
            };
            let plaintext = match plaintext {
                Ok(plaintext) => plaintext,
                Err(err) => {
                    let err = io::Error::from(err);
                    self.failure = Some((err.kind(), err.to_string()));
                    return Err(err);
                }
            };

            self.output = Zeroizing::new(plaintext);
            self.position = 0;
        }
    }
}

/// This is a convenience function for reading from a reader, encrypting, and writing to the writer.
///
/// The reader is consumed in `STREAM_CHUNK_SIZE` chunks until it returns 0, and the writer is flushed
/// once the final block (or the tag) has been written.
///
/// # Examples
///
/// ```rust,ignore
/// let mut input_file = File::open("input").unwrap();
/// let mut output_file = File::create("input.enc").unwrap();
///
/// encrypt_stream(&config, &mut input_file, &mut output_file).unwrap();
/// ```
///
pub fn encrypt_stream(
    config: &CipherConfig,
    reader: &mut impl Read,
    writer: &mut impl Write,
) -> Result<()> {
    let mut stream = StreamEncryptor::initialize(config)?;
    let mut read_buffer = Zeroizing::new(vec![0u8; STREAM_CHUNK_SIZE]);

    loop {
        let read_count = match reader.read(&mut read_buffer) {
            Ok(0) => break,
            Ok(count) => count,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        };

        let encrypted_data = stream.update(&read_buffer[..read_count])?;
        writer.write_all(&encrypted_data)?;
    }

    writer.write_all(&stream.finalize()?)?;
    writer.flush()?;

    Ok(())
}

/// This is a convenience function for reading from a reader, decrypting, and writing to the writer.
///
/// For AEAD, nothing is written unless the tag is valid. For padded modes, everything but the final
/// block may already have been written when a padding error is returned.
pub fn decrypt_stream(
    config: &CipherConfig,
    reader: &mut impl Read,
    writer: &mut impl Write,
) -> Result<()> {
    let mut stream = StreamDecryptor::initialize(config)?;
    let mut read_buffer = Zeroizing::new(vec![0u8; STREAM_CHUNK_SIZE]);

    loop {
        let read_count = match reader.read(&mut read_buffer) {
            Ok(0) => break,
            Ok(count) => count,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        };

        let decrypted_data = Zeroizing::new(stream.update(&read_buffer[..read_count])?);
        writer.write_all(&decrypted_data)?;
    }

    let decrypted_data = Zeroizing::new(stream.finalize()?);
    writer.write_all(&decrypted_data)?;
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{Algorithm, Mode, Padding};
    use std::io::Cursor;

    const KEY: &[u8; 16] = b"1234567890123456";

    fn cbc() -> CipherConfig {
        CipherConfig::builder(Algorithm::Aes)
            .key(KEY)
            .iv(KEY)
            .build()
            .unwrap()
    }

    #[test]
    fn double_finalize() {
        let mut stream = StreamEncryptor::initialize(&cbc()).unwrap();
        assert_eq!(stream.finalize().unwrap().len(), 16);
        assert!(stream.is_closed());

        match stream.finalize() {
            Err(Error::StreamClosed) => {}
            _ => unreachable!(),
        }
        match stream.update(b"late") {
            Err(Error::StreamClosed) => {}
            _ => unreachable!(),
        }
    }

    #[test]
    fn encryptor_holds_at_most_one_block() {
        let mut stream = StreamEncryptor::initialize(&cbc()).unwrap();
        assert!(stream.update(b"0123456789").unwrap().is_empty());
        assert_eq!(stream.update(b"0123456789").unwrap().len(), 16);
        // 4 pending + 40 new leaves 12 behind
        assert_eq!(stream.update(&[0u8; 40]).unwrap().len(), 32);
        assert_eq!(stream.finalize().unwrap().len(), 16);
    }

    #[test]
    fn decryptor_holds_back_the_final_block() {
        let ciphertext = crate::codec::Codec::new(cbc()).encrypt(&[7u8; 32]).unwrap();
        assert_eq!(ciphertext.len(), 48);

        let mut stream = StreamDecryptor::initialize(&cbc()).unwrap();
        assert!(stream.update(&ciphertext[..16]).unwrap().is_empty());
        // the third block is pure padding
        assert_eq!(stream.update(&ciphertext[16..]).unwrap(), vec![7u8; 32]);
        assert!(stream.finalize().unwrap().is_empty());
    }

    #[test]
    fn writer_close_twice() {
        let mut writer = EncryptWriter::new(&cbc(), Vec::new()).unwrap();
        writer.write_all(b"hello world").unwrap();
        writer.close().unwrap();
        assert_eq!(writer.get_ref().len(), 16);

        match writer.close() {
            Err(Error::StreamClosed) => {}
            _ => unreachable!(),
        }

        let err = writer.write(b"more").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn reader_in_tiny_reads() {
        let config = CipherConfig::builder(Algorithm::Des)
            .key(b"8bytekey")
            .iv(b"8byte iv")
            .padding(Padding::AnsiX923)
            .build()
            .unwrap();
        let plaintext = b"the quick brown fox jumps over the lazy dog".to_vec();
        let ciphertext = crate::codec::Codec::new(config.clone())
            .encrypt(&plaintext)
            .unwrap();

        let mut reader = DecryptReader::new(&config, Cursor::new(ciphertext)).unwrap();
        let mut decrypted = Vec::new();
        let mut buf = [0u8; 3];
        loop {
            let count = reader.read(&mut buf).unwrap();
            if count == 0 {
                break;
            }
            decrypted.extend_from_slice(&buf[..count]);
        }

        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn reader_surfaces_authentication_errors() {
        let config = CipherConfig::builder(Algorithm::Aes)
            .key(KEY)
            .nonce(&[0u8; 12])
            .mode(Mode::Gcm)
            .build()
            .unwrap();
        let mut ciphertext = crate::codec::Codec::new(config.clone())
            .encrypt(b"hello world")
            .unwrap();
        ciphertext[0] ^= 0x01;

        let mut reader = DecryptReader::new(&config, Cursor::new(ciphertext)).unwrap();
        let mut plaintext = Vec::new();
        let err = reader.read_to_end(&mut plaintext).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(plaintext.is_empty());

        match Error::from(err) {
            Error::Authentication => {}
            _ => unreachable!(),
        }

        // the failure sticks, rather than turning into a closed stream
        let mut buffer = [0u8; 16];
        let err = reader.read(&mut buffer).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert_eq!(err.to_string(), Error::Authentication.to_string());
    }

    #[test]
    fn reader_repeats_padding_errors() {
        let mut ciphertext = crate::codec::Codec::new(cbc()).encrypt(&[7u8; 32]).unwrap();
        // turns the final count byte from 0x10 into 0xef
        ciphertext[31] ^= 0xff;
        let mut reader = DecryptReader::new(&cbc(), Cursor::new(ciphertext)).unwrap();
        let mut buffer = [0u8; 64];
        assert_eq!(reader.read(&mut buffer).unwrap(), 32);

        for _ in 0..3 {
            let err = reader.read(&mut buffer).unwrap_err();
            assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        }
    }
}
