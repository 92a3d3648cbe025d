//! This is a basic, auditable wrapper for secret data
//!
//! Keys, IVs and nonces are stored in it for the whole lifetime of a `CipherConfig`.
//! Any data stored in this type will be zeroized on drop, and the data can only be read via `expose()`.
//! `Debug` redacts the contents, so configs can be logged without leaking keys.
//! It was inspired by the `secrecy` crate, so a huge thanks to @tarcieri (github)

use std::fmt::Debug;
use zeroize::Zeroize;

pub struct Protected<T>
where
    T: Zeroize,
{
    data: T,
}

impl<T> Protected<T>
where
    T: Zeroize,
{
    pub fn new(value: T) -> Self {
        Protected { data: value }
    }

    pub fn expose(&self) -> &T {
        &self.data
    }
}

impl Protected<Vec<u8>> {
    /// Copies a borrowed secret into a new protected buffer
    #[must_use]
    pub fn from_slice(value: &[u8]) -> Self {
        Protected::new(value.to_vec())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T> Clone for Protected<T>
where
    T: Zeroize + Clone,
{
    fn clone(&self) -> Self {
        Protected::new(self.data.clone())
    }
}

impl<T> Drop for Protected<T>
where
    T: Zeroize,
{
    fn drop(&mut self) {
        self.data.zeroize();
    }
}

impl<T> Debug for Protected<T>
where
    T: Zeroize,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_is_redacted() {
        let key = Protected::from_slice(b"1234567890123456");
        assert_eq!(format!("{key:?}"), "[REDACTED]");
        assert_eq!(key.len(), 16);
    }

    #[test]
    fn clones_are_independent() {
        let key = Protected::from_slice(b"secret");
        let copy = key.clone();
        drop(key);
        assert_eq!(copy.expose().as_slice(), b"secret");
    }
}
