//! This module contains the cipher configuration and its builder
//!
//! A `CipherConfig` can only be obtained through `ConfigBuilder::build()`, which validates the whole
//! combination once: key length, IV and nonce lengths, and whether the mode and padding make sense
//! for the algorithm. Every codec built from a config can therefore assume it is sound.
//!
//! # Examples
//!
//! ```rust
//! # use symcrypt_core::config::CipherConfig;
//! # use symcrypt_core::primitives::{Algorithm, Mode, Padding};
//! let config = CipherConfig::builder(Algorithm::Aes)
//!     .key(b"1234567890123456")
//!     .iv(b"1234567890123456")
//!     .mode(Mode::Cbc)
//!     .padding(Padding::Pkcs7)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.block_size(), 16);
//! ```

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::primitives::{get_nonce_len, Algorithm, Kind, Mode, Padding};
use crate::protected::Protected;
use crate::transform::{block_transform, BlockTransform};

/// A validated, immutable cipher configuration
///
/// It is cheap to clone, and can be shared between threads. The block transform (and with it the
/// key schedule) is created once, when the config is built.
#[derive(Clone)]
pub struct CipherConfig {
    algorithm: Algorithm,
    mode: Mode,
    padding: Padding,
    key: Protected<Vec<u8>>,
    iv: Option<Protected<Vec<u8>>>,
    nonce: Option<Protected<Vec<u8>>>,
    aad: Vec<u8>,
    transform: Option<Arc<dyn BlockTransform>>,
}

impl CipherConfig {
    /// Starts a new configuration for `algorithm`
    ///
    /// The mode defaults to CBC and the padding to PKCS7. Everything else must be supplied.
    #[must_use]
    pub fn builder(algorithm: Algorithm) -> ConfigBuilder {
        ConfigBuilder {
            algorithm,
            mode: Mode::Cbc,
            padding: Padding::Pkcs7,
            key: None,
            iv: None,
            nonce: None,
            aad: Vec::new(),
        }
    }

    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn padding(&self) -> Padding {
        self.padding
    }

    #[must_use]
    pub fn key(&self) -> &Protected<Vec<u8>> {
        &self.key
    }

    #[must_use]
    pub fn iv(&self) -> Option<&[u8]> {
        self.iv.as_ref().map(|iv| iv.expose().as_slice())
    }

    #[must_use]
    pub fn nonce(&self) -> Option<&[u8]> {
        self.nonce.as_ref().map(|nonce| nonce.expose().as_slice())
    }

    #[must_use]
    pub fn aad(&self) -> &[u8] {
        &self.aad
    }

    /// The block size the data is processed in
    #[must_use]
    pub fn block_size(&self) -> usize {
        self.algorithm.block_size()
    }

    /// Whether the output carries a 16 byte tag
    #[must_use]
    pub fn is_aead(&self) -> bool {
        match self.algorithm.kind() {
            Kind::Block => self.mode.is_aead(),
            Kind::Stream => false,
            Kind::Aead => true,
        }
    }

    /// Whether the padding engine is consulted at all
    #[must_use]
    pub fn is_padded(&self) -> bool {
        self.algorithm.kind() == Kind::Block && self.mode.uses_padding()
    }

    pub(crate) fn transform(&self) -> Result<Arc<dyn BlockTransform>> {
        self.transform.clone().ok_or(Error::UnsupportedMode {
            algorithm: self.algorithm,
            mode: self.mode,
        })
    }
}

impl std::fmt::Debug for CipherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CipherConfig")
            .field("algorithm", &self.algorithm)
            .field("mode", &self.mode)
            .field("padding", &self.padding)
            .field("key", &self.key)
            .field("iv", &self.iv)
            .field("nonce", &self.nonce)
            .field("aad_len", &self.aad.len())
            .finish()
    }
}

pub struct ConfigBuilder {
    algorithm: Algorithm,
    mode: Mode,
    padding: Padding,
    key: Option<Protected<Vec<u8>>>,
    iv: Option<Protected<Vec<u8>>>,
    nonce: Option<Protected<Vec<u8>>>,
    aad: Vec<u8>,
}

impl ConfigBuilder {
    #[must_use]
    pub fn key(mut self, key: &[u8]) -> Self {
        self.key = Some(Protected::from_slice(key));
        self
    }

    /// The IV is used by CBC, CTR (as the initial counter), CFB and OFB, and ignored otherwise
    #[must_use]
    pub fn iv(mut self, iv: &[u8]) -> Self {
        self.iv = Some(Protected::from_slice(iv));
        self
    }

    /// The nonce is used by GCM, ChaCha20-Poly1305 and Salsa20
    #[must_use]
    pub fn nonce(mut self, nonce: &[u8]) -> Self {
        self.nonce = Some(Protected::from_slice(nonce));
        self
    }

    /// Additional authenticated data, only meaningful for AEAD modes
    #[must_use]
    pub fn aad(mut self, aad: &[u8]) -> Self {
        self.aad = aad.to_vec();
        self
    }

    #[must_use]
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    /// Validates the combination and creates the config
    ///
    /// The checks run in this order: key, mode, IV, padding, nonce. The first failure is returned.
    pub fn build(self) -> Result<CipherConfig> {
        let algorithm = self.algorithm;

        let key = self.key.ok_or(Error::KeySize { algorithm, len: 0 })?;
        if !algorithm.is_valid_key_len(key.len()) {
            return Err(Error::KeySize {
                algorithm,
                len: key.len(),
            });
        }

        let kind = algorithm.kind();
        let block_size = algorithm.block_size();

        if kind == Kind::Block {
            if self.mode.is_aead() && block_size != 16 {
                return Err(Error::UnsupportedMode {
                    algorithm,
                    mode: self.mode,
                });
            }

            if self.mode.needs_iv() {
                match &self.iv {
                    Some(iv) if iv.len() == block_size => (),
                    iv => {
                        return Err(Error::Iv {
                            expected: block_size,
                            actual: iv.as_ref().map(Protected::len),
                        })
                    }
                }
            }

            if self.mode.uses_padding() && self.padding == Padding::Pkcs5 && block_size != 8 {
                return Err(Error::UnsupportedPadding {
                    algorithm,
                    padding: self.padding,
                });
            }
        }

        if let Some(expected) = get_nonce_len(&algorithm, &self.mode) {
            match &self.nonce {
                Some(nonce) if nonce.len() == expected => (),
                nonce => {
                    return Err(Error::Nonce {
                        expected,
                        actual: nonce.as_ref().map(Protected::len),
                    })
                }
            }
        }

        let transform = match kind {
            Kind::Block => Some(Arc::from(block_transform(algorithm, key.expose())?)),
            Kind::Stream | Kind::Aead => None,
        };

        // values a mode never reads are dropped, so they cannot leak into the output
        let iv = match kind {
            Kind::Block if self.mode.needs_iv() => self.iv,
            _ => None,
        };
        let nonce = match get_nonce_len(&algorithm, &self.mode) {
            Some(_) => self.nonce,
            None => None,
        };
        let aad = match (kind, self.mode) {
            (Kind::Aead, _) | (Kind::Block, Mode::Gcm) => self.aad,
            _ => Vec::new(),
        };

        Ok(CipherConfig {
            algorithm,
            mode: self.mode,
            padding: self.padding,
            key,
            iv,
            nonce,
            aad,
            transform,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &[u8; 16] = b"1234567890123456";

    #[test]
    fn defaults() {
        let config = CipherConfig::builder(Algorithm::Aes)
            .key(KEY)
            .iv(KEY)
            .build()
            .unwrap();
        assert_eq!(config.mode(), Mode::Cbc);
        assert_eq!(config.padding(), Padding::Pkcs7);
        assert!(config.is_padded());
        assert!(!config.is_aead());
    }

    #[test]
    fn missing_key() {
        match CipherConfig::builder(Algorithm::Aes).iv(KEY).build() {
            Err(Error::KeySize { len: 0, .. }) => {}
            _ => unreachable!(),
        }
    }

    #[test]
    fn wrong_key_length() {
        match CipherConfig::builder(Algorithm::Aes)
            .key(b"short")
            .iv(KEY)
            .build()
        {
            Err(Error::KeySize { len: 5, .. }) => {}
            _ => unreachable!(),
        }
    }

    #[test]
    fn iv_rules() {
        match CipherConfig::builder(Algorithm::Aes).key(KEY).build() {
            Err(Error::Iv {
                expected: 16,
                actual: None,
            }) => {}
            _ => unreachable!(),
        }

        match CipherConfig::builder(Algorithm::Des)
            .key(b"8bytekey")
            .iv(KEY)
            .mode(Mode::Ofb)
            .build()
        {
            Err(Error::Iv {
                expected: 8,
                actual: Some(16),
            }) => {}
            _ => unreachable!(),
        }

        // ECB ignores the IV entirely
        let config = CipherConfig::builder(Algorithm::Aes)
            .key(KEY)
            .iv(b"nonsense")
            .mode(Mode::Ecb)
            .build()
            .unwrap();
        assert!(config.iv().is_none());
    }

    #[test]
    fn gcm_rules() {
        match CipherConfig::builder(Algorithm::Des)
            .key(b"8bytekey")
            .nonce(&[0u8; 12])
            .mode(Mode::Gcm)
            .build()
        {
            Err(Error::UnsupportedMode {
                algorithm: Algorithm::Des,
                mode: Mode::Gcm,
            }) => {}
            _ => unreachable!(),
        }

        match CipherConfig::builder(Algorithm::Aes)
            .key(KEY)
            .nonce(&[0u8; 16])
            .mode(Mode::Gcm)
            .build()
        {
            Err(Error::Nonce {
                expected: 12,
                actual: Some(16),
            }) => {}
            _ => unreachable!(),
        }

        let config = CipherConfig::builder(Algorithm::Sm4)
            .key(KEY)
            .nonce(&[0u8; 12])
            .aad(b"header")
            .mode(Mode::Gcm)
            .build()
            .unwrap();
        assert!(config.is_aead());
        assert!(!config.is_padded());
        assert_eq!(config.aad(), b"header");
    }

    #[test]
    fn pkcs5_needs_a_64_bit_block() {
        match CipherConfig::builder(Algorithm::Aes)
            .key(KEY)
            .iv(KEY)
            .padding(Padding::Pkcs5)
            .build()
        {
            Err(Error::UnsupportedPadding {
                padding: Padding::Pkcs5,
                ..
            }) => {}
            _ => unreachable!(),
        }

        assert!(CipherConfig::builder(Algorithm::Blowfish)
            .key(KEY)
            .iv(b"8 bytes!")
            .padding(Padding::Pkcs5)
            .build()
            .is_ok());

        // CTR never pads, so the padding is not checked
        assert!(CipherConfig::builder(Algorithm::Aes)
            .key(KEY)
            .iv(KEY)
            .mode(Mode::Ctr)
            .padding(Padding::Pkcs5)
            .build()
            .is_ok());
    }

    #[test]
    fn stream_and_aead_nonces() {
        match CipherConfig::builder(Algorithm::Salsa20).key(&[0u8; 32]).build() {
            Err(Error::Nonce {
                expected: 8,
                actual: None,
            }) => {}
            _ => unreachable!(),
        }

        match CipherConfig::builder(Algorithm::ChaCha20Poly1305)
            .key(&[0u8; 32])
            .nonce(&[0u8; 8])
            .build()
        {
            Err(Error::Nonce {
                expected: 12,
                actual: Some(8),
            }) => {}
            _ => unreachable!(),
        }

        // RC4 has no nonce, and ignores the mode and the padding
        let config = CipherConfig::builder(Algorithm::Rc4)
            .key(b"Key")
            .mode(Mode::Gcm)
            .padding(Padding::None)
            .build()
            .unwrap();
        assert!(!config.is_aead());
        assert!(!config.is_padded());
    }

    #[test]
    fn debug_never_shows_the_key() {
        let config = CipherConfig::builder(Algorithm::Aes)
            .key(KEY)
            .iv(KEY)
            .build()
            .unwrap();
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("1234567890123456"));
    }
}
