#![allow(dead_code)]

use std::io::{self, Read};

use symcrypt_core::config::CipherConfig;
use symcrypt_core::error::Result;
use symcrypt_core::primitives::{
    get_nonce_len, Algorithm, Kind, Mode, Padding, ALGORITHMS, MODES, PADDINGS,
};

pub const KEY: &[u8; 16] = b"1234567890123456";
pub const AAD: &[u8] = b"associated data";

// lengths around every block boundary, for both 8 and 16 byte blocks
pub const LENGTHS: [usize; 12] = [0, 1, 7, 8, 9, 15, 16, 17, 31, 32, 33, 1000];

pub fn key_for(algorithm: Algorithm) -> Vec<u8> {
    (0..algorithm.default_key_len())
        .map(|i| (i as u8).wrapping_mul(31) ^ 0x5a)
        .collect()
}

pub fn config(algorithm: Algorithm, mode: Mode, padding: Padding) -> Result<CipherConfig> {
    CipherConfig::builder(algorithm)
        .key(&key_for(algorithm))
        .iv(&vec![0x24; algorithm.block_size()])
        .nonce(&vec![0x42; get_nonce_len(&algorithm, &mode).unwrap_or(0)])
        .aad(AAD)
        .mode(mode)
        .padding(padding)
        .build()
}

// every combination that builds
// stream ciphers and ChaCha20-Poly1305 ignore the mode and padding, so they're only listed once
pub fn all_configs() -> Vec<CipherConfig> {
    let mut configs = Vec::new();

    for algorithm in ALGORITHMS {
        if algorithm.kind() != Kind::Block {
            configs.push(config(algorithm, Mode::Cbc, Padding::None).unwrap());
            continue;
        }

        for mode in MODES {
            for padding in PADDINGS {
                if let Ok(config) = config(algorithm, mode, padding) {
                    configs.push(config);
                }
            }
        }
    }

    configs
}

// never ends in a zero byte, so Zero padding always round-trips
pub fn plaintext(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8 + 1).collect()
}

// whether `len` bytes can be encrypted at all with this config
pub fn accepts(config: &CipherConfig, len: usize) -> bool {
    !(config.is_padded() && config.padding() == Padding::None && len % config.block_size() != 0)
}

pub fn label(config: &CipherConfig) -> String {
    format!(
        "{}-{} ({})",
        config.algorithm(),
        config.mode(),
        config.padding()
    )
}

// a reader that never hands out more than `max` bytes per call
pub struct Trickle<R: Read> {
    inner: R,
    max: usize,
}

impl<R: Read> Trickle<R> {
    pub fn new(inner: R, max: usize) -> Self {
        Self { inner, max }
    }
}

impl<R: Read> Read for Trickle<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let len = buf.len().min(self.max);
        self.inner.read(&mut buf[..len])
    }
}
