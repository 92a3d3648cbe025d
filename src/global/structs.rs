use symcrypt_core::primitives::{Algorithm, Mode, Padding};

use crate::global::states::{Key, SkipMode};

pub struct CryptoParams {
    pub algorithm: Algorithm,
    pub mode: Mode,
    pub padding: Padding,
    pub key: Key,
    pub iv: Option<String>,
    pub nonce: Option<String>,
    pub aad: Option<String>,
    pub skip: SkipMode,
}
