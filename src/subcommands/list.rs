use anyhow::Result;
use symcrypt_core::primitives::{get_nonce_len, Algorithm, Kind, Mode, ALGORITHMS, MODES, PADDINGS};

// this just lists values contained within arrays
// the numbers printed here can be passed to --algorithm, --mode and --padding

pub fn show_values(input: &str) -> Result<()> {
    match input.to_lowercase().as_str() {
        "algorithms" => {
            println!("Here are all possible algorithms you can select:");
            for (i, algorithm) in ALGORITHMS.iter().enumerate() {
                println!("{} => {} ({})", (i + 1), algorithm, describe(algorithm));
            }
        }
        "modes" => {
            println!("Here are all possible modes you can select:");
            for (i, mode) in MODES.iter().enumerate() {
                println!("{} => {}", (i + 1), mode);
            }
        }
        "paddings" => {
            println!("Here are all possible paddings you can select:");
            for (i, padding) in PADDINGS.iter().enumerate() {
                println!("{} => {}", (i + 1), padding);
            }
        }
        _ => return Err(anyhow::anyhow!("Item \"{}\" not found", input)),
    }

    Ok(())
}

fn describe(algorithm: &Algorithm) -> String {
    match algorithm.kind() {
        Kind::Block => format!("{}-bit block cipher", algorithm.block_size() * 8),
        Kind::Stream => match get_nonce_len(algorithm, &Mode::Cbc) {
            Some(len) => format!("stream cipher, {len} byte nonce"),
            None => "stream cipher".to_string(),
        },
        Kind::Aead => "AEAD, 12 byte nonce".to_string(),
    }
}
