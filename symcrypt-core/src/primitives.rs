//! This module contains all of the identities `symcrypt-core` works with: algorithms, modes and paddings
//!
//! It also contains the key size tables, and helpers for generating keys, IVs and nonces.
use crate::protected::Protected;
use rand::{prelude::ThreadRng, RngCore};

/// This is the size of the chunks read by the convenience stream functions
///
/// NOTE: this only affects how much is read at once, the output is identical for any chunk size
pub const STREAM_CHUNK_SIZE: usize = 65_536; // 64*1024 bytes

/// The length of every authentication tag produced by GCM and ChaCha20-Poly1305
pub const TAG_LEN: usize = 16;

/// The nonce length accepted by GCM and ChaCha20-Poly1305
pub const AEAD_NONCE_LEN: usize = 12;

/// The nonce length accepted by Salsa20
pub const SALSA20_NONCE_LEN: usize = 8;

pub const ALGORITHMS_LEN: usize = 10;
pub const MODES_LEN: usize = 6;
pub const PADDINGS_LEN: usize = 9;

/// This is an `enum` containing all ciphers supported by `symcrypt-core`
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Aes,
    Des,
    TripleDes,
    Blowfish,
    Twofish,
    Sm4,
    Tea,
    Rc4,
    Salsa20,
    ChaCha20Poly1305,
}

/// This is an array containing all ciphers supported by `symcrypt-core`.
///
/// It can be used by an end-user application to show a list of ciphers that they may use
pub static ALGORITHMS: [Algorithm; ALGORITHMS_LEN] = [
    Algorithm::Aes,
    Algorithm::Des,
    Algorithm::TripleDes,
    Algorithm::Blowfish,
    Algorithm::Twofish,
    Algorithm::Sm4,
    Algorithm::Tea,
    Algorithm::Rc4,
    Algorithm::Salsa20,
    Algorithm::ChaCha20Poly1305,
];

/// How an algorithm consumes data
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Kind {
    /// A fixed-size block transform, driven by one of the block modes
    Block,
    /// A byte-oriented keystream with no block structure (RC4, Salsa20)
    Stream,
    /// A self-contained AEAD construction (ChaCha20-Poly1305)
    Aead,
}

impl Algorithm {
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Algorithm::Aes
            | Algorithm::Des
            | Algorithm::TripleDes
            | Algorithm::Blowfish
            | Algorithm::Twofish
            | Algorithm::Sm4
            | Algorithm::Tea => Kind::Block,
            Algorithm::Rc4 | Algorithm::Salsa20 => Kind::Stream,
            Algorithm::ChaCha20Poly1305 => Kind::Aead,
        }
    }

    /// The native block size of the transform, in bytes
    ///
    /// Stream ciphers and ChaCha20-Poly1305 work on single bytes, so they report 1
    #[must_use]
    pub fn block_size(&self) -> usize {
        match self {
            Algorithm::Aes | Algorithm::Twofish | Algorithm::Sm4 => 16,
            Algorithm::Des | Algorithm::TripleDes | Algorithm::Blowfish | Algorithm::Tea => 8,
            Algorithm::Rc4 | Algorithm::Salsa20 | Algorithm::ChaCha20Poly1305 => 1,
        }
    }

    /// This checks a key length against the algorithm's key table
    #[must_use]
    pub fn is_valid_key_len(&self, len: usize) -> bool {
        match self {
            Algorithm::Aes | Algorithm::Twofish => matches!(len, 16 | 24 | 32),
            Algorithm::Des => len == 8,
            Algorithm::TripleDes => matches!(len, 16 | 24),
            Algorithm::Blowfish => (4..=56).contains(&len),
            Algorithm::Sm4 | Algorithm::Tea => len == 16,
            Algorithm::Rc4 => (1..=256).contains(&len),
            Algorithm::Salsa20 | Algorithm::ChaCha20Poly1305 => len == 32,
        }
    }

    /// The key length used by `gen_key()`
    #[must_use]
    pub fn default_key_len(&self) -> usize {
        match self {
            Algorithm::Aes
            | Algorithm::Twofish
            | Algorithm::Salsa20
            | Algorithm::ChaCha20Poly1305 => 32,
            Algorithm::Des => 8,
            Algorithm::TripleDes => 24,
            Algorithm::Blowfish | Algorithm::Sm4 | Algorithm::Tea | Algorithm::Rc4 => 16,
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Algorithm::Aes => write!(f, "AES"),
            Algorithm::Des => write!(f, "DES"),
            Algorithm::TripleDes => write!(f, "3DES"),
            Algorithm::Blowfish => write!(f, "Blowfish"),
            Algorithm::Twofish => write!(f, "Twofish"),
            Algorithm::Sm4 => write!(f, "SM4"),
            Algorithm::Tea => write!(f, "TEA"),
            Algorithm::Rc4 => write!(f, "RC4"),
            Algorithm::Salsa20 => write!(f, "Salsa20"),
            Algorithm::ChaCha20Poly1305 => write!(f, "ChaCha20-Poly1305"),
        }
    }
}

/// This defines the block modes a block transform can be driven with
///
/// ECB is kept for compatibility only: identical plaintext blocks produce identical ciphertext blocks.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    Cbc,
    Ecb,
    Ctr,
    Cfb,
    Ofb,
    Gcm,
}

pub static MODES: [Mode; MODES_LEN] = [
    Mode::Cbc,
    Mode::Ecb,
    Mode::Ctr,
    Mode::Cfb,
    Mode::Ofb,
    Mode::Gcm,
];

impl Mode {
    /// Only the whole-block modes consult the padding engine
    ///
    /// CTR, CFB and OFB are XOR-based and accept any length, GCM authenticates instead
    #[must_use]
    pub fn uses_padding(&self) -> bool {
        matches!(self, Mode::Cbc | Mode::Ecb)
    }

    #[must_use]
    pub fn needs_iv(&self) -> bool {
        matches!(self, Mode::Cbc | Mode::Ctr | Mode::Cfb | Mode::Ofb)
    }

    #[must_use]
    pub fn is_aead(&self) -> bool {
        matches!(self, Mode::Gcm)
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Mode::Cbc => write!(f, "CBC"),
            Mode::Ecb => write!(f, "ECB"),
            Mode::Ctr => write!(f, "CTR"),
            Mode::Cfb => write!(f, "CFB"),
            Mode::Ofb => write!(f, "OFB"),
            Mode::Gcm => write!(f, "GCM"),
        }
    }
}

/// This defines every padding scheme understood by the padding engine
///
/// `Iso97971`, `Iso78164` and `Bit` produce the same bytes for byte-oriented ciphers,
/// but they are kept as separate identities so configurations round-trip unchanged.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Padding {
    None,
    Zero,
    Pkcs5,
    Pkcs7,
    AnsiX923,
    Iso97971,
    Iso10126,
    Iso78164,
    Bit,
}

pub static PADDINGS: [Padding; PADDINGS_LEN] = [
    Padding::None,
    Padding::Zero,
    Padding::Pkcs5,
    Padding::Pkcs7,
    Padding::AnsiX923,
    Padding::Iso97971,
    Padding::Iso10126,
    Padding::Iso78164,
    Padding::Bit,
];

impl std::fmt::Display for Padding {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Padding::None => write!(f, "None"),
            Padding::Zero => write!(f, "Zero"),
            Padding::Pkcs5 => write!(f, "PKCS5"),
            Padding::Pkcs7 => write!(f, "PKCS7"),
            Padding::AnsiX923 => write!(f, "AnsiX923"),
            Padding::Iso97971 => write!(f, "ISO97971"),
            Padding::Iso10126 => write!(f, "ISO10126"),
            Padding::Iso78164 => write!(f, "ISO78164"),
            Padding::Bit => write!(f, "Bit"),
        }
    }
}

/// This fills a buffer of the requested length with random bytes from `ThreadRng`
pub(crate) fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    ThreadRng::default().fill_bytes(&mut bytes);
    bytes
}

/// Generates a new protected key, of the algorithm's default length
///
/// # Examples
///
/// ```rust
/// # use symcrypt_core::primitives::*;
/// let key = gen_key(&Algorithm::Aes);
/// assert_eq!(key.expose().len(), 32);
/// ```
///
#[must_use]
pub fn gen_key(algorithm: &Algorithm) -> Protected<Vec<u8>> {
    Protected::new(random_bytes(algorithm.default_key_len()))
}

/// This can be used to generate an IV for CBC, CTR, CFB and OFB
///
/// The IV is always exactly one block long.
///
/// # Examples
///
/// ```rust
/// # use symcrypt_core::primitives::*;
/// let iv = gen_iv(&Algorithm::Des);
/// assert_eq!(iv.len(), 8);
/// ```
///
#[must_use]
pub fn gen_iv(algorithm: &Algorithm) -> Vec<u8> {
    random_bytes(algorithm.block_size())
}

/// This function calculates the length of the nonce, depending on the data provided
///
/// It returns `None` if the combination does not take a nonce at all
#[must_use]
pub fn get_nonce_len(algorithm: &Algorithm, mode: &Mode) -> Option<usize> {
    match algorithm.kind() {
        Kind::Block if mode.is_aead() => Some(AEAD_NONCE_LEN),
        Kind::Block => None,
        Kind::Stream if algorithm == &Algorithm::Salsa20 => Some(SALSA20_NONCE_LEN),
        Kind::Stream => None,
        Kind::Aead => Some(AEAD_NONCE_LEN),
    }
}

/// This can be used to generate a nonce for encryption
///
/// It requires both the algorithm and the mode, so it can correctly determine the nonce length.
/// An empty nonce is returned if the combination does not take one.
///
/// # Examples
///
/// ```rust
/// # use symcrypt_core::primitives::*;
/// let nonce = gen_nonce(&Algorithm::Aes, &Mode::Gcm);
/// assert_eq!(nonce.len(), 12);
/// ```
///
#[must_use]
pub fn gen_nonce(algorithm: &Algorithm, mode: &Mode) -> Vec<u8> {
    random_bytes(get_nonce_len(algorithm, mode).unwrap_or(0))
}
