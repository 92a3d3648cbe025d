use super::config::{cipher_config, describe};
use super::prompt::overwrite_check;
use crate::global::states::Direction;
use crate::global::structs::CryptoParams;
use anyhow::{Context, Result};
use paris::{warn, Logger};
use std::fs::File;
use std::process::exit;
use std::time::Instant;
use symcrypt_core::stream::decrypt_stream;

// this function is for decrypting a file in stream mode
// if decryption fails, the (partial) output file is removed
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

    let config = cipher_config(params, Direction::Decrypt)?;

    let mut output_file =
        File::create(output).with_context(|| format!("Unable to open output file: {}", output))?;

    logger.info(format!("Using {} for decryption", describe(&config)));
    logger.info(format!("Decrypting {} (this may take a while)", input));

    let decrypt_start_time = Instant::now();

    if let Err(err) = decrypt_stream(&config, &mut input_file, &mut output_file) {
        drop(output_file);
        if std::fs::remove_file(output).is_err() {
            warn!("Unable to remove the partially decrypted file: {}", output);
        }
        return Err(err).with_context(|| format!("Unable to decrypt {}", input));
    }

    let decrypt_duration = decrypt_start_time.elapsed();

    logger.success(format!(
        "Decryption successful! File saved as {} [took {:.2}s]",
        output,
        decrypt_duration.as_secs_f32(),
    ));

    Ok(())
}
