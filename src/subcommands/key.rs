use anyhow::{Context, Result};
use std::{fs::File, io::Read};
use symcrypt_core::primitives::{gen_key, Algorithm};
use symcrypt_core::protected::Protected;
use zeroize::Zeroizing;

use crate::global::states::Key;
use crate::global::KEY_ENV;

// this takes the name/relative path of a file, and returns the bytes in a "protected" wrapper
fn get_bytes(name: &str) -> Result<Protected<Vec<u8>>> {
    let mut file = File::open(name).with_context(|| format!("Unable to open file: {}", name))?;
    let mut data = Vec::new();
    file.read_to_end(&mut data)
        .with_context(|| format!("Unable to read file: {}", name))?;
    Ok(Protected::new(data))
}

// this decodes a hex string supplied by the user (whitespace around it is ignored)
pub fn decode_hex(name: &str, value: &str) -> Result<Protected<Vec<u8>>> {
    let bytes = hex::decode(value.trim())
        .with_context(|| format!("The {} is not valid hex", name))?;
    Ok(Protected::new(bytes))
}

// this gets the key from wherever the user told us to get it from
// the length is not checked here, building the `CipherConfig` does that
pub fn get_secret(key: &Key, algorithm: &Algorithm) -> Result<Protected<Vec<u8>>> {
    match key {
        Key::Hex(value) => decode_hex("key", value),
        Key::Keyfile(path) => get_bytes(path),
        Key::Env => {
            let value = Zeroizing::new(
                std::env::var(KEY_ENV)
                    .with_context(|| format!("Unable to read the {} environment variable", KEY_ENV))?,
            );
            decode_hex("key", &value)
        }
        Key::Generate => Ok(gen_key(algorithm)),
    }
}
