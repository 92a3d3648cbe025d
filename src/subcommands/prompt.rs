use anyhow::{Context, Result};
use paris::{warn, Logger};
use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::global::states::SkipMode;
use crate::global::structs::CryptoParams;

// asks before an existing output file is replaced (pressing enter means yes)
// nothing is asked if the output doesn't exist yet, or if --force was passed
pub fn overwrite_check(output: &str, params: &CryptoParams) -> Result<bool> {
    if params.skip == SkipMode::HidePrompts || !Path::new(output).exists() {
        return Ok(true);
    }

    let mut logger = Logger::new();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        logger
            .same()
            .warn(format!("{output} already exists, overwrite it? (Y/n): "));
        io::stdout().flush().context("Unable to flush stdout")?;

        let answer = lines
            .next()
            .context("No answer was given")?
            .context("Unable to read from stdin")?;

        match parse_answer(&answer) {
            Some(overwrite) => return Ok(overwrite),
            None => warn!("Please answer with y or n"),
        }
    }
}

// `None` means the question should be asked again
fn parse_answer(answer: &str) -> Option<bool> {
    match answer.trim().to_lowercase().as_str() {
        "" | "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::global::states::Key;
    use symcrypt_core::primitives::{Algorithm, Mode, Padding};

    #[test]
    fn answers() {
        assert_eq!(parse_answer("\n"), Some(true));
        assert_eq!(parse_answer("Y\r\n"), Some(true));
        assert_eq!(parse_answer(" yes "), Some(true));
        assert_eq!(parse_answer("n\n"), Some(false));
        assert_eq!(parse_answer("NO"), Some(false));
        assert_eq!(parse_answer("maybe"), None);
    }

    #[test]
    fn forced_or_missing_outputs_are_never_asked_about() {
        let mut params = CryptoParams {
            algorithm: Algorithm::Aes,
            mode: Mode::Cbc,
            padding: Padding::Pkcs7,
            key: Key::Generate,
            iv: None,
            nonce: None,
            aad: None,
            skip: SkipMode::ShowPrompts,
        };
        assert!(overwrite_check("this/path/does/not/exist.enc", &params).unwrap());

        params.skip = SkipMode::HidePrompts;
        assert!(overwrite_check("Cargo.toml", &params).unwrap());
    }
}
