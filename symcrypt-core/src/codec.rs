//! This module contains the standard (buffered) codec
//!
//! `Codec` encrypts and decrypts complete in-memory messages. Its output is byte-identical to the
//! streaming codec, so a message encrypted with one can always be decrypted with the other.
//!
//! # Examples
//!
//! ```rust
//! # use symcrypt_core::codec::Codec;
//! # use symcrypt_core::config::CipherConfig;
//! # use symcrypt_core::primitives::Algorithm;
//! let config = CipherConfig::builder(Algorithm::Aes)
//!     .key(b"1234567890123456")
//!     .iv(b"1234567890123456")
//!     .build()
//!     .unwrap();
//! let codec = Codec::new(config);
//!
//! let ciphertext = codec.encrypt(b"hello world").unwrap();
//! assert_eq!(ciphertext.len(), 16);
//! assert_eq!(codec.decrypt(&ciphertext).unwrap(), b"hello world");
//! ```

use crate::config::CipherConfig;
use crate::engine::Engine;
use crate::error::Result;

pub struct Codec {
    config: CipherConfig,
}

impl Codec {
    #[must_use]
    pub fn new(config: CipherConfig) -> Self {
        Codec { config }
    }

    #[must_use]
    pub fn config(&self) -> &CipherConfig {
        &self.config
    }

    /// Encrypts a complete message
    ///
    /// For AEAD the output is `ciphertext || tag`. With `Padding::None` unaligned input is rejected
    /// with `Error::UnalignedInput` before anything is encrypted.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        Engine::new(&self.config)?.encrypt_all(plaintext)
    }

    /// Decrypts a complete message
    ///
    /// Empty ciphertext decrypts to empty plaintext for the padded modes. For AEAD the tag is verified
    /// first, and `Error::Authentication` is returned without any plaintext on a mismatch.
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        Engine::new(&self.config)?.decrypt_all(ciphertext)
    }
}
