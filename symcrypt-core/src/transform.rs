//! This module contains the two capabilities the modes are built on
//!
//! A `BlockTransform` encrypts and decrypts one native block in place. The block modes only ever
//! see this trait, never a concrete algorithm.
//!
//! A `KeystreamTransform` XORs a keystream into a buffer, for RC4 and Salsa20.
//!
//! AES, DES/3DES, Blowfish, Twofish, SM4 and Salsa20 are provided by the RustCrypto crates.
//! TEA and RC4 are small adapters kept here.

use cipher::{generic_array::GenericArray, BlockDecrypt, BlockEncrypt, KeyInit};
use salsa20::cipher::{KeyIvInit, StreamCipher};
use zeroize::Zeroize;

use crate::error::{Error, Result};
use crate::primitives::{Algorithm, Mode, SALSA20_NONCE_LEN};

pub trait BlockTransform: Send + Sync {
    /// The native block size, in bytes
    fn block_size(&self) -> usize;

    /// Encrypts exactly one block in place
    ///
    /// `block` must be `block_size()` bytes long
    fn encrypt_block(&self, block: &mut [u8]);

    /// Decrypts exactly one block in place
    ///
    /// `block` must be `block_size()` bytes long
    fn decrypt_block(&self, block: &mut [u8]);
}

pub trait KeystreamTransform: Send {
    /// XORs the next `data.len()` bytes of keystream into `data`
    fn apply_keystream(&mut self, data: &mut [u8]);
}

struct RustCrypto<C>(C);

impl<C> BlockTransform for RustCrypto<C>
where
    C: BlockEncrypt + BlockDecrypt + Send + Sync,
{
    fn block_size(&self) -> usize {
        C::block_size()
    }

    fn encrypt_block(&self, block: &mut [u8]) {
        BlockEncrypt::encrypt_block(&self.0, GenericArray::from_mut_slice(block));
    }

    fn decrypt_block(&self, block: &mut [u8]) {
        BlockDecrypt::decrypt_block(&self.0, GenericArray::from_mut_slice(block));
    }
}

fn rustcrypto<C>(algorithm: Algorithm, key: &[u8]) -> Result<Box<dyn BlockTransform>>
where
    C: KeyInit + BlockEncrypt + BlockDecrypt + Send + Sync + 'static,
{
    let cipher = C::new_from_slice(key).map_err(|_| Error::KeySize {
        algorithm,
        len: key.len(),
    })?;
    Ok(Box::new(RustCrypto(cipher)))
}

/// This creates the block transform for a block algorithm
///
/// It returns `Error::KeySize` if the key does not fit the algorithm,
/// and `Error::UnsupportedMode` if the algorithm is not a block cipher at all.
pub fn block_transform(algorithm: Algorithm, key: &[u8]) -> Result<Box<dyn BlockTransform>> {
    if !algorithm.is_valid_key_len(key.len()) {
        return Err(Error::KeySize {
            algorithm,
            len: key.len(),
        });
    }

    match algorithm {
        Algorithm::Aes => match key.len() {
            16 => rustcrypto::<aes::Aes128>(algorithm, key),
            24 => rustcrypto::<aes::Aes192>(algorithm, key),
            _ => rustcrypto::<aes::Aes256>(algorithm, key),
        },
        Algorithm::Des => rustcrypto::<des::Des>(algorithm, key),
        Algorithm::TripleDes => match key.len() {
            16 => rustcrypto::<des::TdesEde2>(algorithm, key),
            _ => rustcrypto::<des::TdesEde3>(algorithm, key),
        },
        Algorithm::Blowfish => rustcrypto::<blowfish::Blowfish>(algorithm, key),
        Algorithm::Twofish => rustcrypto::<twofish::Twofish>(algorithm, key),
        Algorithm::Sm4 => rustcrypto::<sm4::Sm4>(algorithm, key),
        Algorithm::Tea => Ok(Box::new(Tea::new(key))),
        Algorithm::Rc4 | Algorithm::Salsa20 | Algorithm::ChaCha20Poly1305 => {
            Err(Error::UnsupportedMode {
                algorithm,
                mode: Mode::Ecb,
            })
        }
    }
}

/// This creates a fresh keystream for RC4 or Salsa20
///
/// Every call starts the keystream from the beginning, so it must be called once per message.
pub fn keystream_transform(
    algorithm: Algorithm,
    key: &[u8],
    nonce: &[u8],
) -> Result<Box<dyn KeystreamTransform>> {
    if !algorithm.is_valid_key_len(key.len()) {
        return Err(Error::KeySize {
            algorithm,
            len: key.len(),
        });
    }

    match algorithm {
        Algorithm::Rc4 => Ok(Box::new(Rc4::new(key))),
        Algorithm::Salsa20 => {
            let cipher = salsa20::Salsa20::new_from_slices(key, nonce).map_err(|_| {
                Error::Nonce {
                    expected: SALSA20_NONCE_LEN,
                    actual: Some(nonce.len()),
                }
            })?;
            Ok(Box::new(Salsa20(cipher)))
        }
        _ => Err(Error::UnsupportedMode {
            algorithm,
            mode: Mode::Ctr,
        }),
    }
}

struct Salsa20(salsa20::Salsa20);

impl KeystreamTransform for Salsa20 {
    fn apply_keystream(&mut self, data: &mut [u8]) {
        self.0.apply_keystream(data);
    }
}

const TEA_DELTA: u32 = 0x9e37_79b9;
const TEA_ROUNDS: u32 = 32;

/// The Tiny Encryption Algorithm: 64-bit blocks, 128-bit key, 32 cycles, big-endian words
struct Tea {
    key: [u32; 4],
}

impl Tea {
    fn new(key: &[u8]) -> Self {
        let mut words = [0u32; 4];
        for (word, chunk) in words.iter_mut().zip(key.chunks_exact(4)) {
            *word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Tea { key: words }
    }

    fn load(block: &[u8]) -> (u32, u32) {
        (
            u32::from_be_bytes([block[0], block[1], block[2], block[3]]),
            u32::from_be_bytes([block[4], block[5], block[6], block[7]]),
        )
    }

    fn store(block: &mut [u8], v0: u32, v1: u32) {
        block[..4].copy_from_slice(&v0.to_be_bytes());
        block[4..8].copy_from_slice(&v1.to_be_bytes());
    }

    fn mix(v: u32, sum: u32, k0: u32, k1: u32) -> u32 {
        ((v << 4).wrapping_add(k0)) ^ v.wrapping_add(sum) ^ ((v >> 5).wrapping_add(k1))
    }
}

impl BlockTransform for Tea {
    fn block_size(&self) -> usize {
        8
    }

    fn encrypt_block(&self, block: &mut [u8]) {
        let [k0, k1, k2, k3] = self.key;
        let (mut v0, mut v1) = Tea::load(block);
        let mut sum = 0u32;
        for _ in 0..TEA_ROUNDS {
            sum = sum.wrapping_add(TEA_DELTA);
            v0 = v0.wrapping_add(Tea::mix(v1, sum, k0, k1));
            v1 = v1.wrapping_add(Tea::mix(v0, sum, k2, k3));
        }
        Tea::store(block, v0, v1);
    }

    fn decrypt_block(&self, block: &mut [u8]) {
        let [k0, k1, k2, k3] = self.key;
        let (mut v0, mut v1) = Tea::load(block);
        let mut sum = TEA_DELTA.wrapping_mul(TEA_ROUNDS);
        for _ in 0..TEA_ROUNDS {
            v1 = v1.wrapping_sub(Tea::mix(v0, sum, k2, k3));
            v0 = v0.wrapping_sub(Tea::mix(v1, sum, k0, k1));
            sum = sum.wrapping_sub(TEA_DELTA);
        }
        Tea::store(block, v0, v1);
    }
}

impl Drop for Tea {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

/// RC4 with a 1 to 256 byte key
struct Rc4 {
    state: [u8; 256],
    i: u8,
    j: u8,
}

impl Rc4 {
    fn new(key: &[u8]) -> Self {
        let mut state = [0u8; 256];
        for (slot, value) in state.iter_mut().zip(0..=255u8) {
            *slot = value;
        }

        let mut j = 0u8;
        for i in 0..256 {
            j = j.wrapping_add(state[i]).wrapping_add(key[i % key.len()]);
            state.swap(i, usize::from(j));
        }

        Rc4 { state, i: 0, j: 0 }
    }
}

impl KeystreamTransform for Rc4 {
    fn apply_keystream(&mut self, data: &mut [u8]) {
        for byte in data.iter_mut() {
            self.i = self.i.wrapping_add(1);
            self.j = self.j.wrapping_add(self.state[usize::from(self.i)]);
            self.state.swap(usize::from(self.i), usize::from(self.j));
            let index = self.state[usize::from(self.i)].wrapping_add(self.state[usize::from(self.j)]);
            *byte ^= self.state[usize::from(index)];
        }
    }
}

impl Drop for Rc4 {
    fn drop(&mut self) {
        self.state.zeroize();
        self.i = 0;
        self.j = 0;
    }
}
