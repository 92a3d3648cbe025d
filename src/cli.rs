use clap::{Arg, Command};

// this defines all of the clap subcommands and arguments
// encrypt and decrypt share every argument, so they're built by the same function
// it returns the ArgMatches so that a match statement can send everything to the correct place
fn crypto_command(name: &'static str, about: &'static str, short: char) -> Command<'static> {
    Command::new(name)
        .short_flag(short)
        .about(about)
        .arg(
            Arg::new("input")
                .value_name("input")
                .takes_value(true)
                .required(true)
                .help("The input file"),
        )
        .arg(
            Arg::new("output")
                .value_name("output")
                .takes_value(true)
                .required(true)
                .help("The output file"),
        )
        .arg(
            Arg::new("algorithm")
                .short('a')
                .long("algorithm")
                .value_name("algorithm")
                .takes_value(true)
                .help("Select an algorithm by name or number (\"symcrypt list algorithms\" to see all possible values)"),
        )
        .arg(
            Arg::new("mode")
                .short('m')
                .long("mode")
                .value_name("mode")
                .takes_value(true)
                .help("Select a block mode (default is CBC, ignored by stream ciphers)"),
        )
        .arg(
            Arg::new("padding")
                .long("padding")
                .value_name("padding")
                .takes_value(true)
                .help("Select a padding scheme (default is PKCS7, only used by CBC and ECB)"),
        )
        .arg(
            Arg::new("key")
                .short('k')
                .long("key")
                .value_name("hex")
                .takes_value(true)
                .help("The key, as hex (the SYMCRYPT_KEY environment variable is used otherwise)"),
        )
        .arg(
            Arg::new("keyfile")
                .long("keyfile")
                .value_name("file")
                .takes_value(true)
                .conflicts_with("key")
                .help("Read the raw key bytes from a file"),
        )
        .arg(
            Arg::new("iv")
                .long("iv")
                .value_name("hex")
                .takes_value(true)
                .help("The IV, as hex (generated during encryption if it's required and not provided)"),
        )
        .arg(
            Arg::new("nonce")
                .short('n')
                .long("nonce")
                .value_name("hex")
                .takes_value(true)
                .help("The nonce, as hex (generated during encryption if it's required and not provided)"),
        )
        .arg(
            Arg::new("aad")
                .long("aad")
                .value_name("hex")
                .takes_value(true)
                .help("Additional authenticated data, as hex (GCM and ChaCha20-Poly1305 only)"),
        )
        .arg(
            Arg::new("force")
                .short('f')
                .long("force")
                .takes_value(false)
                .help("Overwrite the output file without asking"),
        )
}

pub fn get_matches() -> clap::ArgMatches {
    let encrypt = crypto_command("encrypt", "Encrypt a file", 'e').arg(
        Arg::new("autogenerate")
            .long("auto")
            .takes_value(false)
            .conflicts_with_all(&["key", "keyfile"])
            .help("Generate a random key, and print it once encryption is complete"),
    );

    let decrypt = crypto_command("decrypt", "Decrypt a file", 'd');

    Command::new("symcrypt")
        .version(clap::crate_version!())
        .about("Command-line symmetric encryption of files.")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(encrypt)
        .subcommand(decrypt)
        .subcommand(
            Command::new("list")
                .short_flag('l')
                .about("List the supported algorithms, modes or paddings")
                .arg(
                    Arg::new("input")
                        .value_name("input")
                        .takes_value(true)
                        .required(true)
                        .possible_values(["algorithms", "modes", "paddings"])
                        .help("The item to list"),
                ),
        )
        .get_matches()
}
