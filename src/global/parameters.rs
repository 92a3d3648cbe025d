// this file handles getting parameters from clap's ArgMatches
// it returns information (e.g. CryptoParams) to functions that require it

use anyhow::{Context, Result};
use clap::ArgMatches;
use symcrypt_core::primitives::{Algorithm, Mode, Padding, ALGORITHMS, MODES, PADDINGS};

use crate::global::states::{Key, SkipMode};
use crate::global::structs::CryptoParams;
use crate::global::KEY_ENV;

pub fn get_param(name: &str, sub_matches: &ArgMatches) -> Result<String> {
    let value = sub_matches
        .value_of(name)
        .with_context(|| format!("No {} provided", name))?
        .to_string();
    Ok(value)
}

fn optional_param(name: &str, sub_matches: &ArgMatches) -> Option<String> {
    sub_matches.value_of(name).map(str::to_string)
}

pub fn parameter_handler(sub_matches: &ArgMatches) -> Result<CryptoParams> {
    let key = if sub_matches.is_present("key") {
        Key::Hex(get_param("key", sub_matches)?)
    } else if sub_matches.is_present("keyfile") {
        Key::Keyfile(get_param("keyfile", sub_matches)?)
    } else if std::env::var(KEY_ENV).is_ok() {
        Key::Env
    } else if sub_matches.try_contains_id("autogenerate").unwrap_or(false)
        && sub_matches.is_present("autogenerate")
    {
        Key::Generate
    } else {
        return Err(anyhow::anyhow!(
            "No key provided. Use --key, --keyfile or the {} environment variable.",
            KEY_ENV
        ));
    };

    let algorithm = match sub_matches.value_of("algorithm") {
        Some(value) => select(value, &ALGORITHMS).context(
            "Invalid algorithm selected! Use \"symcrypt list algorithms\" to see all possible values.",
        )?,
        None => Algorithm::Aes,
    };

    let mode = match sub_matches.value_of("mode") {
        Some(value) => select(value, &MODES).context(
            "Invalid mode selected! Use \"symcrypt list modes\" to see all possible values.",
        )?,
        None => Mode::Cbc,
    };

    let padding = match sub_matches.value_of("padding") {
        Some(value) => select(value, &PADDINGS).context(
            "Invalid padding selected! Use \"symcrypt list paddings\" to see all possible values.",
        )?,
        None => Padding::Pkcs7,
    };

    Ok(CryptoParams {
        algorithm,
        mode,
        padding,
        key,
        iv: optional_param("iv", sub_matches),
        nonce: optional_param("nonce", sub_matches),
        aad: optional_param("aad", sub_matches),
        skip: skipmode(sub_matches),
    })
}

// values may be selected by their displayed name (case-insensitive), or by their 1-based number in `symcrypt list`
fn select<T: Copy + std::fmt::Display>(input: &str, values: &[T]) -> Option<T> {
    if let Ok(index) = input.parse::<usize>() {
        return index.checked_sub(1).and_then(|i| values.get(i)).copied();
    }

    let input = input.to_lowercase();
    values
        .iter()
        .find(|value| value.to_string().to_lowercase() == input)
        .copied()
}

pub fn skipmode(sub_matches: &ArgMatches) -> SkipMode {
    if sub_matches.is_present("force") {
        SkipMode::HidePrompts
    } else {
        SkipMode::ShowPrompts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_by_name() {
        assert_eq!(select("aes", &ALGORITHMS), Some(Algorithm::Aes));
        assert_eq!(select("3DES", &ALGORITHMS), Some(Algorithm::TripleDes));
        assert_eq!(
            select("chacha20-poly1305", &ALGORITHMS),
            Some(Algorithm::ChaCha20Poly1305)
        );
        assert_eq!(select("gcm", &MODES), Some(Mode::Gcm));
        assert_eq!(select("ansix923", &PADDINGS), Some(Padding::AnsiX923));
        assert_eq!(select("rot13", &ALGORITHMS), None);
    }

    #[test]
    fn select_by_number() {
        assert_eq!(select("1", &ALGORITHMS), Some(Algorithm::Aes));
        assert_eq!(select("10", &ALGORITHMS), Some(Algorithm::ChaCha20Poly1305));
        assert_eq!(select("0", &ALGORITHMS), None);
        assert_eq!(select("11", &ALGORITHMS), None);
    }
}
