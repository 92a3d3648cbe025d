//! ## What is it?
//!
//! Symcrypt-Core is a symmetric encryption engine. It drives AES, DES/3DES, Blowfish, Twofish, SM4, TEA, RC4,
//! Salsa20 and ChaCha20-Poly1305 through one configuration model, one set of block modes (CBC, ECB, CTR, CFB, OFB
//! and GCM), one padding engine, and one streaming pipeline.
//!
//! A message can be encrypted in one go with `codec::Codec`, or piece by piece with the objects in `stream`. Both
//! produce exactly the same bytes.
//!
//! ## Security
//!
//! Many of the algorithms, modes and paddings supported here are legacy, and exist so old data can still be read.
//! DES, TEA, RC4 and ECB should not be used for anything new, and only GCM and ChaCha20-Poly1305 authenticate the data.
//! None of the padding schemes resist padding oracle attacks.
//!
//! The block ciphers, Salsa20 and ChaCha20, and the GHASH/Poly1305 universal hashes are provided by the
//! [RustCrypto Team](https://github.com/RustCrypto).
//!
//! ## Example
//!
//! ```rust
//! # use symcrypt_core::codec::Codec;
//! # use symcrypt_core::config::CipherConfig;
//! # use symcrypt_core::primitives::{gen_nonce, Algorithm, Mode};
//! let nonce = gen_nonce(&Algorithm::ChaCha20Poly1305, &Mode::Gcm);
//! let config = CipherConfig::builder(Algorithm::ChaCha20Poly1305)
//!     .key(&[0x42; 32])
//!     .nonce(&nonce)
//!     .aad(b"some header")
//!     .build()
//!     .unwrap();
//!
//! let codec = Codec::new(config);
//! let ciphertext = codec.encrypt(b"hello world").unwrap();
//! assert_eq!(codec.decrypt(&ciphertext).unwrap(), b"hello world");
//! ```
#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub const CORE_VERSION: &str = env!("CARGO_PKG_VERSION");

mod aead;
pub mod codec;
pub mod config;
mod engine;
pub mod error;
mod modes;
pub mod padding;
pub mod primitives;
pub mod protected;
pub mod stream;
pub mod transform;
pub use zeroize::Zeroize;
