// this file sets constants that are used throughout the codebase

// the environment variable that a hex-encoded key is read from
pub const KEY_ENV: &str = "SYMCRYPT_KEY";

pub mod parameters;
pub mod states;
pub mod structs;
