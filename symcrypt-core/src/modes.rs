//! This module contains the block modes, written against `BlockTransform` only
//!
//! `BlockChain` covers the whole-block modes (ECB and CBC). It must be fed whole blocks, the
//! padding engine or the stream buffer takes care of that.
//!
//! `FeedbackStream` covers the keystream modes (CTR, CFB, OFB, and the GCM counter). It accepts any
//! number of bytes per call and remembers its position inside the current keystream block, so
//! splitting the input differently never changes the output.

use std::sync::Arc;

use zeroize::Zeroize;

use crate::transform::BlockTransform;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Direction {
    Encrypt,
    Decrypt,
}

/// ECB (no register) or CBC (register = previous ciphertext block, starting at the IV)
pub(crate) struct BlockChain {
    transform: Arc<dyn BlockTransform>,
    register: Option<Vec<u8>>,
}

impl BlockChain {
    pub fn ecb(transform: Arc<dyn BlockTransform>) -> Self {
        BlockChain {
            transform,
            register: None,
        }
    }

    pub fn cbc(transform: Arc<dyn BlockTransform>, iv: &[u8]) -> Self {
        BlockChain {
            transform,
            register: Some(iv.to_vec()),
        }
    }

    pub fn block_size(&self) -> usize {
        self.transform.block_size()
    }

    /// `data.len()` must be a multiple of the block size
    pub fn encrypt(&mut self, data: &mut [u8]) {
        let block_size = self.block_size();
        for block in data.chunks_exact_mut(block_size) {
            match &mut self.register {
                Some(register) => {
                    xor(block, register);
                    self.transform.encrypt_block(block);
                    register.copy_from_slice(block);
                }
                None => self.transform.encrypt_block(block),
            }
        }
    }

    /// `data.len()` must be a multiple of the block size
    pub fn decrypt(&mut self, data: &mut [u8]) {
        let block_size = self.block_size();
        let mut previous = vec![0u8; block_size];
        for block in data.chunks_exact_mut(block_size) {
            match &mut self.register {
                Some(register) => {
                    previous.copy_from_slice(block);
                    self.transform.decrypt_block(block);
                    xor(block, register);
                    register.copy_from_slice(&previous);
                }
                None => self.transform.decrypt_block(block),
            }
        }
    }
}

impl Drop for BlockChain {
    fn drop(&mut self) {
        if let Some(register) = self.register.as_mut() {
            register.zeroize();
        }
    }
}

/// Where the next block of keystream comes from
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Feedback {
    /// CTR: the whole register is a big-endian counter
    Counter,
    /// GCM: only the last 32 bits of the register count
    Counter32,
    /// CFB: the previous ciphertext block
    Cipher,
    /// OFB: the previous keystream block
    Output,
}

pub(crate) struct FeedbackStream {
    transform: Arc<dyn BlockTransform>,
    feedback: Feedback,
    register: Vec<u8>,
    keystream: Vec<u8>,
    used: usize,
}

impl FeedbackStream {
    /// `iv` must be exactly one block long
    pub fn new(transform: Arc<dyn BlockTransform>, feedback: Feedback, iv: &[u8]) -> Self {
        let block_size = transform.block_size();
        FeedbackStream {
            transform,
            feedback,
            register: iv.to_vec(),
            keystream: vec![0u8; block_size],
            used: block_size,
        }
    }

    /// XORs the keystream into `data`
    ///
    /// `direction` only matters for CFB, where the ciphertext is fed back into the register.
    pub fn apply(&mut self, data: &mut [u8], direction: Direction) {
        for byte in data.iter_mut() {
            if self.used == self.keystream.len() {
                self.refill();
            }

            let input = *byte;
            *byte ^= self.keystream[self.used];

            if self.feedback == Feedback::Cipher {
                self.register[self.used] = match direction {
                    Direction::Encrypt => *byte,
                    Direction::Decrypt => input,
                };
            }

            self.used += 1;
        }
    }

    fn refill(&mut self) {
        self.keystream.copy_from_slice(&self.register);
        self.transform.encrypt_block(&mut self.keystream);

        match self.feedback {
            Feedback::Counter => increment(&mut self.register),
            Feedback::Counter32 => {
                let tail = self.register.len() - 4;
                increment(&mut self.register[tail..]);
            }
            Feedback::Output => self.register.copy_from_slice(&self.keystream),
            // overwritten byte by byte in `apply()`
            Feedback::Cipher => {}
        }

        self.used = 0;
    }
}

impl Drop for FeedbackStream {
    fn drop(&mut self) {
        self.register.zeroize();
        self.keystream.zeroize();
    }
}

/// Adds one to a big-endian counter, wrapping around on overflow
pub(crate) fn increment(counter: &mut [u8]) {
    for byte in counter.iter_mut().rev() {
        *byte = byte.wrapping_add(1);
        if *byte != 0 {
            break;
        }
    }
}

pub(crate) fn xor(target: &mut [u8], other: &[u8]) {
    for (a, b) in target.iter_mut().zip(other) {
        *a ^= b;
    }
}
