use super::config::{cipher_config, describe};
use super::prompt::overwrite_check;
use crate::global::states::Direction;
use crate::global::structs::CryptoParams;
use anyhow::{Context, Result};
use paris::Logger;
use std::fs::File;
use std::process::exit;
use std::time::Instant;
use symcrypt_core::stream::encrypt_stream;

// this function is for encrypting a file in stream mode
// it handles any user-facing interactiveness and opening files
pub fn stream_mode(input: &str, output: &str, params: &CryptoParams) -> Result<()> {
    let mut logger = Logger::new();

    if input == output {
        return Err(anyhow::anyhow!(
            "Input and output files cannot have the same name."
        ));
    }

    let mut input_file =
        File::open(input).with_context(|| format!("Unable to open input file: {}", input))?;

    if !overwrite_check(output, params)? {
        exit(0);
    }

    let config = cipher_config(params, Direction::Encrypt)?;

    let mut output_file =
        File::create(output).with_context(|| format!("Unable to open output file: {}", output))?;

    logger.info(format!("Using {} for encryption", describe(&config)));
    logger.info(format!("Encrypting {} (this may take a while)", input));

    let encrypt_start_time = Instant::now();

    encrypt_stream(&config, &mut input_file, &mut output_file)
        .with_context(|| format!("Unable to encrypt {}", input))?;

    let encrypt_duration = encrypt_start_time.elapsed();

    logger.success(format!(
        "Encryption successful! File saved as {} [took {:.2}s]",
        output,
        encrypt_duration.as_secs_f32(),
    ));

    Ok(())
}
