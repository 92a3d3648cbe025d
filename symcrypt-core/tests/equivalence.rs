mod common;
use common::*;
use symcrypt_core::codec::Codec;
use symcrypt_core::config::CipherConfig;
use symcrypt_core::error::Result;
use symcrypt_core::primitives::{Algorithm, Mode, Padding};
use symcrypt_core::stream::{StreamDecryptor, StreamEncryptor};

fn encrypt_in_pieces(config: &CipherConfig, pieces: &[&[u8]]) -> Result<Vec<u8>> {
    let mut stream = StreamEncryptor::initialize(config)?;
    let mut ciphertext = Vec::new();
    for piece in pieces {
        ciphertext.extend(stream.update(piece)?);
    }
    ciphertext.extend(stream.finalize()?);
    Ok(ciphertext)
}

fn decrypt_in_pieces(config: &CipherConfig, pieces: &[&[u8]]) -> Result<Vec<u8>> {
    let mut stream = StreamDecryptor::initialize(config)?;
    let mut plaintext = Vec::new();
    for piece in pieces {
        plaintext.extend(stream.update(piece)?);
    }
    plaintext.extend(stream.finalize()?);
    Ok(plaintext)
}

#[test]
fn should_match_the_standard_codec_for_every_split() {
    for config in all_configs() {
        let codec = Codec::new(config.clone());
        // ISO10126 filler is random, so only the plaintext can be compared
        let deterministic = config.padding() != Padding::Iso10126 || !config.is_padded();

        for len in [0, 16, 40] {
            if !accepts(&config, len) {
                continue;
            }
            let data = plaintext(len);
            let expected = codec.encrypt(&data).unwrap();

            for split in 0..=len {
                let (head, tail) = data.split_at(split);
                let ciphertext = encrypt_in_pieces(&config, &[head, tail]).unwrap();
                if deterministic {
                    assert_eq!(ciphertext, expected, "{} / {len} / {split}", label(&config));
                }

                let (head, tail) = expected.split_at(split.min(expected.len()));
                let decrypted = decrypt_in_pieces(&config, &[head, tail]).unwrap();
                assert_eq!(decrypted, data, "{} / {len} / {split}", label(&config));
            }

            for chunk_size in 1..=17 {
                let pieces: Vec<&[u8]> = data.chunks(chunk_size).collect();
                let ciphertext = encrypt_in_pieces(&config, &pieces).unwrap();
                if deterministic {
                    assert_eq!(ciphertext, expected, "{} / {len} / {chunk_size}", label(&config));
                }

                let pieces: Vec<&[u8]> = expected.chunks(chunk_size).collect();
                assert_eq!(decrypt_in_pieces(&config, &pieces).unwrap(), data);
            }
        }
    }
}

#[test]
fn should_cross_decrypt_between_codecs() {
    for config in all_configs() {
        let codec = Codec::new(config.clone());
        let data = plaintext(48);
        if !accepts(&config, data.len()) {
            continue;
        }

        let streamed = encrypt_in_pieces(&config, &[&data[..7], &data[7..]]).unwrap();
        assert_eq!(codec.decrypt(&streamed).unwrap(), data, "{}", label(&config));

        let buffered = codec.encrypt(&data).unwrap();
        assert_eq!(
            decrypt_in_pieces(&config, &[&buffered]).unwrap(),
            data,
            "{}",
            label(&config)
        );
    }
}

#[test]
fn should_accept_empty_updates() {
    let config = config(Algorithm::Blowfish, Mode::Cbc, Padding::Pkcs5).unwrap();
    let data = plaintext(20);

    let ciphertext = encrypt_in_pieces(&config, &[&[], &data[..10], &[], &data[10..], &[]]).unwrap();
    assert_eq!(ciphertext, Codec::new(config.clone()).encrypt(&data).unwrap());
    assert_eq!(decrypt_in_pieces(&config, &[&[], &ciphertext, &[]]).unwrap(), data);
}
