//! This module is the padding engine
//!
//! `pad()` extends a buffer to a multiple of the block size before encryption, and `unpad()`
//! locates the padding again after decryption. Every scheme except `Padding::None` adds a full
//! block when the input is already aligned, so the padding always fits inside the final block and
//! the end of the data is never ambiguous (Zero padding excepted, see below).
//!
//! None of these schemes resist padding oracles, they exist for compatibility with legacy data.
//!
//! # Examples
//!
//! ```rust
//! # use symcrypt_core::primitives::Padding;
//! let padded = Padding::Pkcs7.pad(b"hello world", 16).unwrap();
//! assert_eq!(padded.len(), 16);
//! assert_eq!(&padded[11..], &[5, 5, 5, 5, 5]);
//!
//! let unpadded = Padding::Pkcs7.unpad(&padded, 16);
//! assert!(unpadded.valid);
//! assert_eq!(unpadded.data, b"hello world");
//! ```

use crate::error::{Error, Result};
use crate::primitives::{random_bytes, Padding};

/// The ISO/IEC 9797-1 method 2 marker: a single 1 bit, followed by zero bits
const MARKER: u8 = 0x80;

/// Every block size whose padding length fits in a single count byte
const BLOCK_SIZES: std::ops::RangeInclusive<usize> = 1..=255;

/// The outcome of stripping padding
///
/// `data` is whatever remains once the padding has been removed. When `valid` is false the padding
/// was malformed and `data` is the input unchanged.
#[derive(Debug, PartialEq, Eq)]
pub struct Unpadded<'a> {
    pub data: &'a [u8],
    pub valid: bool,
}

impl<'a> Unpadded<'a> {
    fn stripped(data: &'a [u8], len: usize) -> Self {
        Unpadded {
            data: &data[..len],
            valid: true,
        }
    }

    fn malformed(data: &'a [u8]) -> Self {
        Unpadded { data, valid: false }
    }

    /// Turns malformed padding into `Error::Padding`
    pub fn into_result(self, padding: Padding) -> Result<&'a [u8]> {
        if self.valid {
            Ok(self.data)
        } else {
            Err(Error::Padding(padding))
        }
    }
}

impl Padding {
    /// Pads `data` to a multiple of `block_size`
    ///
    /// `Padding::None` returns `Error::UnalignedInput` for unaligned data, every other scheme
    /// appends between 1 and `block_size` bytes.
    ///
    /// `Padding::Pkcs5` is treated like PKCS7 here, the 8 byte restriction is enforced when a
    /// `CipherConfig` is built.
    ///
    /// `block_size` must be between 1 and 255, so the count byte can describe a whole block.
    pub fn pad(&self, data: &[u8], block_size: usize) -> Result<Vec<u8>> {
        if !BLOCK_SIZES.contains(&block_size) {
            return Err(Error::BlockSize(block_size));
        }

        let remainder = data.len() % block_size;
        let needed = block_size - remainder;
        let mut padded = Vec::with_capacity(data.len() + needed);
        padded.extend_from_slice(data);

        match self {
            Padding::None if remainder != 0 => {
                return Err(Error::UnalignedInput {
                    len: data.len(),
                    block_size,
                })
            }
            Padding::None => {}
            Padding::Zero => padded.resize(data.len() + needed, 0),
            Padding::Pkcs5 | Padding::Pkcs7 => padded.resize(data.len() + needed, count(needed)),
            Padding::AnsiX923 => {
                padded.resize(data.len() + needed - 1, 0);
                padded.push(count(needed));
            }
            Padding::Iso10126 => {
                padded.extend_from_slice(&random_bytes(needed - 1));
                padded.push(count(needed));
            }
            Padding::Iso97971 | Padding::Iso78164 | Padding::Bit => {
                padded.push(MARKER);
                padded.resize(data.len() + needed, 0);
            }
        }

        Ok(padded)
    }

    /// Locates and strips the padding at the end of `data`
    ///
    /// Padding is only ever searched for inside the final block, so feeding this function the
    /// whole plaintext or just its final block gives the same answer.
    ///
    /// Zero padding cannot tell padding apart from plaintext that ends in zero bytes: every
    /// trailing zero in the final block is removed.
    ///
    /// A `block_size` that `pad()` would reject is reported as malformed padding.
    #[must_use]
    pub fn unpad<'a>(&self, data: &'a [u8], block_size: usize) -> Unpadded<'a> {
        if !BLOCK_SIZES.contains(&block_size) {
            return Unpadded::malformed(data);
        }
        if matches!(self, Padding::None) {
            return Unpadded::stripped(data, data.len());
        }

        let last = match data.last() {
            Some(last) => *last,
            None => return Unpadded::malformed(data),
        };
        let floor = data.len().saturating_sub(block_size);

        match self {
            Padding::None => Unpadded::stripped(data, data.len()),
            Padding::Zero => {
                if last != 0 {
                    return Unpadded::malformed(data);
                }
                let len = data[floor..]
                    .iter()
                    .rposition(|byte| *byte != 0)
                    .map_or(floor, |position| floor + position + 1);
                Unpadded::stripped(data, len)
            }
            Padding::Pkcs5 | Padding::Pkcs7 => match counted_len(data, block_size) {
                Some(len) if data[len..].iter().all(|byte| *byte == last) => {
                    Unpadded::stripped(data, len)
                }
                _ => Unpadded::malformed(data),
            },
            Padding::AnsiX923 => match counted_len(data, block_size) {
                Some(len) if data[len..data.len() - 1].iter().all(|byte| *byte == 0) => {
                    Unpadded::stripped(data, len)
                }
                _ => Unpadded::malformed(data),
            },
            Padding::Iso10126 => match counted_len(data, block_size) {
                Some(len) => Unpadded::stripped(data, len),
                None => Unpadded::malformed(data),
            },
            Padding::Iso97971 | Padding::Iso78164 | Padding::Bit => {
                match data[floor..].iter().rposition(|byte| *byte != 0) {
                    Some(position) if data[floor + position] == MARKER => {
                        Unpadded::stripped(data, floor + position)
                    }
                    _ => Unpadded::malformed(data),
                }
            }
        }
    }
}

// `pad()` has already checked the block size, so the count always fits in one byte
fn count(needed: usize) -> u8 {
    u8::try_from(needed).unwrap_or(u8::MAX)
}

/// Reads the trailing count byte and returns where the data ends, if the count is plausible
fn counted_len(data: &[u8], block_size: usize) -> Option<usize> {
    let count = usize::from(*data.last()?);
    if count == 0 || count > block_size || count > data.len() {
        return None;
    }
    Some(data.len() - count)
}
