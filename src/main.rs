use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use std::path::PathBuf;

mod cipher;
mod codec;
mod commands;
mod key;

/// Reversibly scramble an image with a one-time pad.
///
/// Encryption writes the scrambled image plus a base64 key file; handing
/// the key back recovers the original bit-exactly.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Image to encrypt
    #[arg(short, long, value_name = "FILE", conflicts_with = "decrypt")]
    encrypt: Option<PathBuf>,

    /// Image to decrypt
    #[arg(short, long, value_name = "FILE")]
    decrypt: Option<PathBuf>,

    /// Output image file name (default: <input>_encrypted.<ext> / <input>_decrypted.<ext>)
    #[arg(short = 'i', long, value_name = "FILE")]
    output_image: Option<PathBuf>,

    /// Output key file name (default: <input>_key.txt)
    #[arg(short = 'p', long, value_name = "FILE", requires = "encrypt")]
    output_key: Option<PathBuf>,

    /// Key file for decryption
    #[arg(short, long, value_name = "FILE", requires = "decrypt")]
    key: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    if let Some(input) = args.encrypt {
        commands::encrypt_image(&input, args.output_image, args.output_key)
    } else if let Some(input) = args.decrypt {
        let key_file = args
            .key
            .context("decryption needs the matching key file (--key)")?;
        commands::decrypt_image(&input, &key_file, args.output_image)
    } else {
        Args::command().print_help()?;
        Ok(())
    }
}
