//! This module contains the two AEAD constructions: GCM and ChaCha20-Poly1305
//!
//! Both are split into a keystream (which XORs the data) and an `Authenticator` (which absorbs the
//! AAD and the ciphertext and produces the 16 byte tag). Keeping them apart lets the stream encryptor
//! emit ciphertext as it goes, and lets decryption verify the tag before a single byte of plaintext
//! is produced.
//!
//! GCM follows NIST SP 800-38D with a 96-bit nonce, over any 128-bit `BlockTransform`.
//! ChaCha20-Poly1305 follows RFC 8439.

use std::sync::Arc;

use chacha20::cipher::{KeyIvInit, StreamCipher};
use cipher::generic_array::GenericArray;
use ghash::{
    universal_hash::{KeyInit, UniversalHash},
    GHash,
};
use poly1305::Poly1305;
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, Zeroizing};

use crate::error::{Error, Result};
use crate::modes::{increment, xor, Direction, Feedback, FeedbackStream};
use crate::primitives::{Algorithm, AEAD_NONCE_LEN, TAG_LEN};
use crate::transform::BlockTransform;

pub(crate) enum AeadKeystream {
    Counter(FeedbackStream),
    ChaCha20(Box<chacha20::ChaCha20>),
}

impl AeadKeystream {
    pub fn apply(&mut self, data: &mut [u8]) {
        match self {
            AeadKeystream::Counter(stream) => stream.apply(data, Direction::Encrypt),
            AeadKeystream::ChaCha20(cipher) => cipher.apply_keystream(data),
        }
    }
}

enum Mac {
    /// `mask` is E(J0), XORed into the final GHASH value
    Ghash {
        hash: GHash,
        mask: Zeroizing<[u8; TAG_LEN]>,
    },
    Poly1305(Poly1305),
}

impl Mac {
    fn update(&mut self, data: &[u8]) {
        match self {
            Mac::Ghash { hash, .. } => hash.update_padded(data),
            Mac::Poly1305(mac) => mac.update_padded(data),
        }
    }
}

/// Absorbs the AAD and then the ciphertext, in as many pieces as the caller likes
pub(crate) struct Authenticator {
    mac: Mac,
    pending: Zeroizing<[u8; TAG_LEN]>,
    used: usize,
    aad_len: u64,
    text_len: u64,
}

impl Authenticator {
    fn new(mut mac: Mac, aad: &[u8]) -> Self {
        // the AAD is zero-padded to a block boundary before the ciphertext starts
        mac.update(aad);
        Authenticator {
            mac,
            pending: Zeroizing::new([0u8; TAG_LEN]),
            used: 0,
            aad_len: aad.len() as u64,
            text_len: 0,
        }
    }

    /// Feeds ciphertext into the MAC
    pub fn absorb(&mut self, mut data: &[u8]) {
        self.text_len += data.len() as u64;

        if self.used > 0 {
            let take = (TAG_LEN - self.used).min(data.len());
            self.pending[self.used..self.used + take].copy_from_slice(&data[..take]);
            self.used += take;
            data = &data[take..];

            if self.used < TAG_LEN {
                return;
            }
            self.mac.update(&self.pending[..]);
            self.used = 0;
        }

        let aligned = data.len() - data.len() % TAG_LEN;
        self.mac.update(&data[..aligned]);

        let rest = &data[aligned..];
        self.pending[..rest.len()].copy_from_slice(rest);
        self.used = rest.len();
    }

    /// Closes the MAC and returns the tag
    pub fn finish(mut self) -> [u8; TAG_LEN] {
        if self.used > 0 {
            self.mac.update(&self.pending[..self.used]);
        }

        let mut lengths = [0u8; 16];
        match self.mac {
            Mac::Ghash { .. } => {
                lengths[..8].copy_from_slice(&(self.aad_len * 8).to_be_bytes());
                lengths[8..].copy_from_slice(&(self.text_len * 8).to_be_bytes());
            }
            Mac::Poly1305(_) => {
                lengths[..8].copy_from_slice(&self.aad_len.to_le_bytes());
                lengths[8..].copy_from_slice(&self.text_len.to_le_bytes());
            }
        }
        self.mac.update(&lengths);

        let mut tag = [0u8; TAG_LEN];
        match self.mac {
            Mac::Ghash { hash, mask } => {
                tag.copy_from_slice(&hash.finalize());
                xor(&mut tag, &mask[..]);
            }
            Mac::Poly1305(mac) => tag.copy_from_slice(&mac.finalize()),
        }
        tag
    }

    /// Compares the computed tag with `tag` in constant time
    ///
    /// It returns `Error::Authentication` on any mismatch, including a tag of the wrong length
    pub fn verify(self, tag: &[u8]) -> Result<()> {
        let expected = self.finish();
        if bool::from(expected[..].ct_eq(tag)) {
            Ok(())
        } else {
            Err(Error::Authentication)
        }
    }
}

/// Sets up GCM over a 128-bit block transform
///
/// H = E(0), J0 = nonce || 0x00000001, and the data keystream starts at inc32(J0)
pub(crate) fn gcm(
    transform: Arc<dyn BlockTransform>,
    nonce: &[u8],
    aad: &[u8],
) -> Result<(AeadKeystream, Authenticator)> {
    if nonce.len() != AEAD_NONCE_LEN {
        return Err(Error::Nonce {
            expected: AEAD_NONCE_LEN,
            actual: Some(nonce.len()),
        });
    }

    let mut h = [0u8; 16];
    transform.encrypt_block(&mut h);
    let hash = GHash::new(GenericArray::from_slice(&h));
    h.zeroize();

    let mut counter = [0u8; 16];
    counter[..AEAD_NONCE_LEN].copy_from_slice(nonce);
    counter[15] = 1;

    let mut mask = Zeroizing::new(counter);
    transform.encrypt_block(&mut mask[..]);

    increment(&mut counter[12..]);
    let keystream = FeedbackStream::new(transform, Feedback::Counter32, &counter);
    counter.zeroize();

    Ok((
        AeadKeystream::Counter(keystream),
        Authenticator::new(Mac::Ghash { hash, mask }, aad),
    ))
}

/// Sets up ChaCha20-Poly1305
///
/// The Poly1305 key is the first 32 bytes of keystream block 0, the data starts at block 1
pub(crate) fn chacha20_poly1305(
    key: &[u8],
    nonce: &[u8],
    aad: &[u8],
) -> Result<(AeadKeystream, Authenticator)> {
    if !Algorithm::ChaCha20Poly1305.is_valid_key_len(key.len()) {
        return Err(Error::KeySize {
            algorithm: Algorithm::ChaCha20Poly1305,
            len: key.len(),
        });
    }

    let mut cipher = chacha20::ChaCha20::new_from_slices(key, nonce).map_err(|_| Error::Nonce {
        expected: AEAD_NONCE_LEN,
        actual: Some(nonce.len()),
    })?;

    let mut block = Zeroizing::new([0u8; 64]);
    cipher.apply_keystream(&mut block[..]);
    let mac = Poly1305::new(GenericArray::from_slice(&block[..32]));

    Ok((
        AeadKeystream::ChaCha20(Box::new(cipher)),
        Authenticator::new(Mac::Poly1305(mac), aad),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::block_transform;
    use aes_gcm::{aead::Aead, aead::Payload, Aes256Gcm};
    use chacha20poly1305::ChaCha20Poly1305;
    use hex_literal::hex;

    fn seal(parts: (AeadKeystream, Authenticator), plaintext: &[u8]) -> Vec<u8> {
        let (mut keystream, mut auth) = parts;
        let mut out = plaintext.to_vec();
        keystream.apply(&mut out);
        auth.absorb(&out);
        out.extend_from_slice(&auth.finish());
        out
    }

    fn aes(key: &[u8]) -> Arc<dyn BlockTransform> {
        Arc::from(block_transform(Algorithm::Aes, key).unwrap())
    }

    #[test]
    fn gcm_empty_message() {
        // NIST GCM test case 1
        let sealed = seal(gcm(aes(&[0u8; 16]), &[0u8; 12], &[]).unwrap(), &[]);
        assert_eq!(sealed, hex!("58e2fccefa7e3061367f1d57a4e7455a"));
    }

    #[test]
    fn gcm_one_block() {
        // NIST GCM test case 2
        let sealed = seal(gcm(aes(&[0u8; 16]), &[0u8; 12], &[]).unwrap(), &[0u8; 16]);
        assert_eq!(
            sealed,
            hex!(
                "0388dace60b6a392f328c2b971b2fe78"
                "ab6e47d42cec13bdf53a67b21257bddf"
            )
        );
    }

    #[test]
    fn gcm_matches_aes_gcm() {
        let key = [0x42u8; 32];
        let nonce = [0x24u8; 12];
        let aad = b"header bytes";
        let plaintext = b"a message that is not a multiple of sixteen bytes long";

        let ours = seal(gcm(aes(&key), &nonce, aad).unwrap(), plaintext);
        let theirs = Aes256Gcm::new_from_slice(&key)
            .unwrap()
            .encrypt(
                GenericArray::from_slice(&nonce),
                Payload {
                    msg: plaintext,
                    aad,
                },
            )
            .unwrap();

        assert_eq!(ours, theirs);
    }

    #[test]
    fn chacha20_poly1305_matches_reference() {
        let key = [0x07u8; 32];
        let nonce = [0x01u8; 12];
        let aad = b"aad";
        let plaintext = [0x99u8; 150];

        let ours = seal(chacha20_poly1305(&key, &nonce, aad).unwrap(), &plaintext);
        let theirs = ChaCha20Poly1305::new_from_slice(&key)
            .unwrap()
            .encrypt(
                GenericArray::from_slice(&nonce),
                Payload {
                    msg: &plaintext,
                    aad,
                },
            )
            .unwrap();

        assert_eq!(ours, theirs);
    }

    #[test]
    fn absorbing_in_pieces() {
        let ciphertext = [0x5au8; 53];

        let (_, mut whole) = gcm(aes(&[1u8; 16]), &[2u8; 12], b"aad").unwrap();
        whole.absorb(&ciphertext);

        let (_, mut split) = gcm(aes(&[1u8; 16]), &[2u8; 12], b"aad").unwrap();
        for piece in ciphertext.chunks(7) {
            split.absorb(piece);
        }

        assert_eq!(whole.finish(), split.finish());
    }

    #[test]
    fn verify_rejects_tampering() {
        let sealed = seal(
            chacha20_poly1305(&[3u8; 32], &[4u8; 12], b"").unwrap(),
            b"attack at dawn",
        );
        let (body, tag) = sealed.split_at(sealed.len() - TAG_LEN);

        let (_, mut auth) = chacha20_poly1305(&[3u8; 32], &[4u8; 12], b"").unwrap();
        auth.absorb(body);
        assert!(auth.verify(tag).is_ok());

        let mut forged = tag.to_vec();
        forged[0] ^= 1;
        let (_, mut auth) = chacha20_poly1305(&[3u8; 32], &[4u8; 12], b"").unwrap();
        auth.absorb(body);
        match auth.verify(&forged) {
            Err(Error::Authentication) => {}
            _ => unreachable!(),
        }

        let (_, mut auth) = chacha20_poly1305(&[3u8; 32], &[4u8; 12], b"").unwrap();
        auth.absorb(body);
        assert!(auth.verify(&tag[..8]).is_err());
    }

    #[test]
    fn nonce_lengths_are_checked() {
        match gcm(aes(&[0u8; 16]), &[0u8; 16], &[]) {
            Err(Error::Nonce {
                expected: 12,
                actual: Some(16),
            }) => {}
            _ => unreachable!(),
        }
        match chacha20_poly1305(&[0u8; 32], &[0u8; 8], &[]) {
            Err(Error::Nonce {
                expected: 12,
                actual: Some(8),
            }) => {}
            _ => unreachable!(),
        }
    }
}
