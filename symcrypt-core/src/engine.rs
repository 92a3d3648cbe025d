//! The per-message state shared by the standard codec and the streaming codec
//!
//! An `Engine` is created from a `CipherConfig` for exactly one message. The `*_update` functions
//! take the caller's `pending` buffer, so partial blocks survive between writes, and the `*_finish`
//! functions consume the engine, so a message can only ever be finalized once.

use zeroize::Zeroizing;

use crate::aead::{chacha20_poly1305, gcm, AeadKeystream, Authenticator};
use crate::config::CipherConfig;
use crate::error::{Error, Result};
use crate::modes::{BlockChain, Direction, Feedback, FeedbackStream};
use crate::primitives::{Kind, Mode, Padding, AEAD_NONCE_LEN, TAG_LEN};
use crate::transform::{keystream_transform, KeystreamTransform};

pub(crate) enum Engine {
    /// ECB and CBC, the only modes that consult the padding engine
    Padded { chain: BlockChain, padding: Padding },
    /// CTR, CFB and OFB
    Feedback(FeedbackStream),
    /// RC4 and Salsa20
    Keystream(Box<dyn KeystreamTransform>),
    /// GCM and ChaCha20-Poly1305
    Aead {
        keystream: AeadKeystream,
        auth: Authenticator,
    },
}

impl Engine {
    pub fn new(config: &CipherConfig) -> Result<Self> {
        let algorithm = config.algorithm();
        let key = config.key().expose();
        let nonce = || {
            config.nonce().ok_or(Error::Nonce {
                expected: AEAD_NONCE_LEN,
                actual: None,
            })
        };

        let engine = match algorithm.kind() {
            Kind::Stream => {
                let nonce = config.nonce().unwrap_or_default();
                Engine::Keystream(keystream_transform(algorithm, key, nonce)?)
            }
            Kind::Aead => {
                let (keystream, auth) = chacha20_poly1305(key, nonce()?, config.aad())?;
                Engine::Aead { keystream, auth }
            }
            Kind::Block => {
                let transform = config.transform()?;
                let iv = || {
                    config.iv().ok_or(Error::Iv {
                        expected: config.block_size(),
                        actual: None,
                    })
                };

                match config.mode() {
                    Mode::Ecb => Engine::Padded {
                        chain: BlockChain::ecb(transform),
                        padding: config.padding(),
                    },
                    Mode::Cbc => Engine::Padded {
                        chain: BlockChain::cbc(transform, iv()?),
                        padding: config.padding(),
                    },
                    Mode::Ctr => {
                        Engine::Feedback(FeedbackStream::new(transform, Feedback::Counter, iv()?))
                    }
                    Mode::Cfb => {
                        Engine::Feedback(FeedbackStream::new(transform, Feedback::Cipher, iv()?))
                    }
                    Mode::Ofb => {
                        Engine::Feedback(FeedbackStream::new(transform, Feedback::Output, iv()?))
                    }
                    Mode::Gcm => {
                        let (keystream, auth) = gcm(transform, nonce()?, config.aad())?;
                        Engine::Aead { keystream, auth }
                    }
                }
            }
        };

        Ok(engine)
    }

    /// Encrypts a complete message: `mode(pad(plaintext))`, with the tag appended for AEAD
    pub fn encrypt_all(self, plaintext: &[u8]) -> Result<Vec<u8>> {
        match self {
            Engine::Padded { mut chain, padding } => {
                let mut ciphertext = padding.pad(plaintext, chain.block_size())?;
                chain.encrypt(&mut ciphertext);
                Ok(ciphertext)
            }
            Engine::Feedback(mut stream) => {
                let mut ciphertext = plaintext.to_vec();
                stream.apply(&mut ciphertext, Direction::Encrypt);
                Ok(ciphertext)
            }
            Engine::Keystream(mut keystream) => {
                let mut ciphertext = plaintext.to_vec();
                keystream.apply_keystream(&mut ciphertext);
                Ok(ciphertext)
            }
            Engine::Aead {
                mut keystream,
                mut auth,
            } => {
                let mut ciphertext = Vec::with_capacity(plaintext.len() + TAG_LEN);
                ciphertext.extend_from_slice(plaintext);
                keystream.apply(&mut ciphertext);
                auth.absorb(&ciphertext);
                ciphertext.extend_from_slice(&auth.finish());
                Ok(ciphertext)
            }
        }
    }

    /// Decrypts a complete message: `unpad(mode⁻¹(ciphertext))`, verifying the tag first for AEAD
    pub fn decrypt_all(self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        match self {
            Engine::Padded { mut chain, padding } => {
                let block_size = chain.block_size();
                if ciphertext.is_empty() {
                    return Ok(Vec::new());
                }
                if ciphertext.len() % block_size != 0 {
                    return Err(Error::UnalignedInput {
                        len: ciphertext.len(),
                        block_size,
                    });
                }

                let mut plaintext = Zeroizing::new(ciphertext.to_vec());
                chain.decrypt(&mut plaintext);
                let unpadded = padding
                    .unpad(&plaintext, block_size)
                    .into_result(padding)?;
                Ok(unpadded.to_vec())
            }
            Engine::Feedback(mut stream) => {
                let mut plaintext = ciphertext.to_vec();
                stream.apply(&mut plaintext, Direction::Decrypt);
                Ok(plaintext)
            }
            Engine::Keystream(mut keystream) => {
                let mut plaintext = ciphertext.to_vec();
                keystream.apply_keystream(&mut plaintext);
                Ok(plaintext)
            }
            Engine::Aead {
                mut keystream,
                mut auth,
            } => {
                if ciphertext.len() < TAG_LEN {
                    return Err(Error::Authentication);
                }
                let (body, tag) = ciphertext.split_at(ciphertext.len() - TAG_LEN);

                auth.absorb(body);
                auth.verify(tag)?;

                let mut plaintext = body.to_vec();
                keystream.apply(&mut plaintext);
                Ok(plaintext)
            }
        }
    }

    /// Encrypts as much of `pending + data` as possible
    ///
    /// Only the padded modes keep bytes back (less than one block), everything else is emitted at once
    pub fn encrypt_update(&mut self, pending: &mut Zeroizing<Vec<u8>>, data: &[u8]) -> Vec<u8> {
        match self {
            Engine::Padded { chain, .. } => {
                pending.extend_from_slice(data);
                let ready = pending.len() - pending.len() % chain.block_size();
                let mut ciphertext: Vec<u8> = pending.drain(..ready).collect();
                chain.encrypt(&mut ciphertext);
                ciphertext
            }
            Engine::Feedback(stream) => {
                let mut ciphertext = data.to_vec();
                stream.apply(&mut ciphertext, Direction::Encrypt);
                ciphertext
            }
            Engine::Keystream(keystream) => {
                let mut ciphertext = data.to_vec();
                keystream.apply_keystream(&mut ciphertext);
                ciphertext
            }
            Engine::Aead { keystream, auth } => {
                let mut ciphertext = data.to_vec();
                keystream.apply(&mut ciphertext);
                auth.absorb(&ciphertext);
                ciphertext
            }
        }
    }

    /// Pads and encrypts whatever is still pending, or emits the tag
    ///
    /// `seen` is the total number of plaintext bytes, used for error reporting
    pub fn encrypt_finish(self, pending: &[u8], seen: usize) -> Result<Vec<u8>> {
        match self {
            Engine::Padded { mut chain, padding } => {
                let block_size = chain.block_size();
                let mut ciphertext = padding.pad(pending, block_size).map_err(|err| match err {
                    Error::UnalignedInput { block_size, .. } => Error::UnalignedInput {
                        len: seen,
                        block_size,
                    },
                    other => other,
                })?;
                chain.encrypt(&mut ciphertext);
                Ok(ciphertext)
            }
            Engine::Feedback(_) | Engine::Keystream(_) => Ok(Vec::new()),
            Engine::Aead { auth, .. } => Ok(auth.finish().to_vec()),
        }
    }

    /// Decrypts as much of `pending + data` as can safely be released
    ///
    /// The padded modes always hold back the final block, because it may contain padding. AEAD
    /// releases nothing at all until the tag has been verified.
    pub fn decrypt_update(&mut self, pending: &mut Zeroizing<Vec<u8>>, data: &[u8]) -> Vec<u8> {
        match self {
            Engine::Padded { chain, .. } => {
                pending.extend_from_slice(data);
                let block_size = chain.block_size();
                let ready = pending.len().saturating_sub(1) / block_size * block_size;
                let mut plaintext: Vec<u8> = pending.drain(..ready).collect();
                chain.decrypt(&mut plaintext);
                plaintext
            }
            Engine::Feedback(stream) => {
                let mut plaintext = data.to_vec();
                stream.apply(&mut plaintext, Direction::Decrypt);
                plaintext
            }
            Engine::Keystream(keystream) => {
                let mut plaintext = data.to_vec();
                keystream.apply_keystream(&mut plaintext);
                plaintext
            }
            Engine::Aead { .. } => {
                pending.extend_from_slice(data);
                Vec::new()
            }
        }
    }

    /// Decrypts and unpads the held-back block, or verifies the tag and releases the plaintext
    ///
    /// `seen` is the total number of ciphertext bytes. An empty message decrypts to nothing,
    /// without consulting the padding.
    pub fn decrypt_finish(self, pending: &[u8], seen: usize) -> Result<Vec<u8>> {
        match self {
            Engine::Padded { mut chain, padding } => {
                let block_size = chain.block_size();
                if seen == 0 {
                    return Ok(Vec::new());
                }
                if pending.len() != block_size {
                    return Err(Error::UnalignedInput {
                        len: seen,
                        block_size,
                    });
                }

                let mut block = Zeroizing::new(pending.to_vec());
                chain.decrypt(&mut block);
                let unpadded = padding.unpad(&block, block_size).into_result(padding)?;
                Ok(unpadded.to_vec())
            }
            Engine::Feedback(_) | Engine::Keystream(_) => Ok(Vec::new()),
            aead @ Engine::Aead { .. } => aead.decrypt_all(pending),
        }
    }
}
