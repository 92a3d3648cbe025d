use anyhow::Result;
use clap::ArgMatches;

// this is called from main.rs
// it gets params and sends them to the appropriate functions

use crate::global::parameters::{get_param, parameter_handler};

pub mod config;
pub mod decrypt;
pub mod encrypt;
pub mod key;
pub mod list;
pub mod prompt;

pub fn encrypt(sub_matches: &ArgMatches) -> Result<()> {
    let params = parameter_handler(sub_matches)?;

    encrypt::stream_mode(
        &get_param("input", sub_matches)?,
        &get_param("output", sub_matches)?,
        &params,
    )
}

pub fn decrypt(sub_matches: &ArgMatches) -> Result<()> {
    let params = parameter_handler(sub_matches)?;

    decrypt::stream_mode(
        &get_param("input", sub_matches)?,
        &get_param("output", sub_matches)?,
        &params,
    )
}

pub fn list(sub_matches: &ArgMatches) -> Result<()> {
    list::show_values(&get_param("input", sub_matches)?)
}
