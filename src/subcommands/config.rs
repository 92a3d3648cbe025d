use anyhow::{Context, Result};
use paris::Logger;
use symcrypt_core::config::CipherConfig;
use symcrypt_core::primitives::{gen_iv, gen_nonce, get_nonce_len, Kind};
use symcrypt_core::protected::Protected;

use super::key::{decode_hex, get_secret};
use crate::global::states::{Direction, Key};
use crate::global::structs::CryptoParams;

// this turns the user's parameters into a validated `CipherConfig`
// when encrypting, a missing IV or nonce is generated and printed, as it's needed for decryption
pub fn cipher_config(params: &CryptoParams, direction: Direction) -> Result<CipherConfig> {
    let mut logger = Logger::new();
    let algorithm = params.algorithm;

    let key = get_secret(&params.key, &algorithm)?;
    if params.key == Key::Generate {
        logger.info(format!(
            "Your generated key is: {} (keep this safe!)",
            hex::encode(key.expose())
        ));
    }

    let mut builder = CipherConfig::builder(algorithm)
        .key(key.expose())
        .mode(params.mode)
        .padding(params.padding);

    let needs_iv = algorithm.kind() == Kind::Block && params.mode.needs_iv();
    let iv = match &params.iv {
        Some(iv) => Some(decode_hex("IV", iv)?),
        None if needs_iv && direction == Direction::Encrypt => {
            let iv = Protected::new(gen_iv(&algorithm));
            logger.info(format!("Generated IV: {}", hex::encode(iv.expose())));
            Some(iv)
        }
        None => None,
    };
    if let Some(iv) = iv {
        builder = builder.iv(iv.expose());
    }

    let needs_nonce = get_nonce_len(&algorithm, &params.mode).is_some();
    let nonce = match &params.nonce {
        Some(nonce) => Some(decode_hex("nonce", nonce)?),
        None if needs_nonce && direction == Direction::Encrypt => {
            let nonce = Protected::new(gen_nonce(&algorithm, &params.mode));
            logger.info(format!("Generated nonce: {}", hex::encode(nonce.expose())));
            Some(nonce)
        }
        None => None,
    };
    if let Some(nonce) = nonce {
        builder = builder.nonce(nonce.expose());
    }

    if let Some(aad) = &params.aad {
        builder = builder.aad(decode_hex("AAD", aad)?.expose());
    }

    builder
        .build()
        .context("Unable to create the cipher configuration")
}

// e.g. "AES-CBC (PKCS7)", "AES-GCM" or "ChaCha20-Poly1305"
pub fn describe(config: &CipherConfig) -> String {
    let algorithm = config.algorithm();
    match algorithm.kind() {
        Kind::Block if config.is_padded() => {
            format!("{}-{} ({})", algorithm, config.mode(), config.padding())
        }
        Kind::Block => format!("{}-{}", algorithm, config.mode()),
        Kind::Stream | Kind::Aead => algorithm.to_string(),
    }
}
