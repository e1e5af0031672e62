// Encrypt/decrypt command flows: codec in, cipher, codec out, key file
// alongside. The cipher core itself never touches the filesystem.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use image::ImageFormat;

use crate::cipher;
use crate::codec;
use crate::key;

pub fn encrypt_image(
    input: &Path,
    output_image: Option<PathBuf>,
    output_key: Option<PathBuf>,
) -> Result<()> {
    let mut raster = codec::load(input)
        .with_context(|| format!("failed to read image {}", input.display()))?;
    log::info!(
        "decoded {} ({}x{}, {:?}, {} pixel bytes)",
        input.display(),
        raster.width,
        raster.height,
        raster.format,
        raster.pixels.len()
    );

    if raster.format == ImageFormat::Jpeg {
        println!("Warning: JPEG re-encoding is lossy; the scrambled image will not decrypt back to the exact original.");
        if !confirm("Proceed anyway? (y/n): ")? {
            println!("Aborted.");
            return Ok(());
        }
    }

    let image_out =
        output_image.unwrap_or_else(|| derived_path(input, "_encrypted", raster.extension()));
    let key_out = output_key.unwrap_or_else(|| derived_path(input, "_key", "txt"));
    ensure_absent(&image_out)?;
    ensure_absent(&key_out)?;

    let (scrambled, pad) = cipher::encrypt(&raster.pixels)?;
    raster.pixels = scrambled;

    codec::save(&raster, &image_out)
        .with_context(|| format!("failed to write scrambled image {}", image_out.display()))?;
    fs::write(&key_out, key::encode(&pad))
        .with_context(|| format!("failed to write key file {}", key_out.display()))?;
    log::debug!("wrote {} and {}", image_out.display(), key_out.display());

    println!("Image encrypted.");
    println!("  Image: {}", image_out.display());
    println!("  Key:   {}", key_out.display());
    println!("Keep the key; without it the image cannot be recovered.");
    Ok(())
}

pub fn decrypt_image(input: &Path, key_file: &Path, output_image: Option<PathBuf>) -> Result<()> {
    let mut raster = codec::load(input)
        .with_context(|| format!("failed to read image {}", input.display()))?;
    log::info!(
        "decoded {} ({}x{}, {:?}, {} pixel bytes)",
        input.display(),
        raster.width,
        raster.height,
        raster.format,
        raster.pixels.len()
    );

    let key_text = fs::read_to_string(key_file)
        .with_context(|| format!("failed to read key file {}", key_file.display()))?;
    let pad = key::parse(&key_text)?;

    let image_out =
        output_image.unwrap_or_else(|| derived_path(input, "_decrypted", raster.extension()));
    ensure_absent(&image_out)?;

    raster.pixels = cipher::decrypt(&raster.pixels, &pad)?;

    codec::save(&raster, &image_out)
        .with_context(|| format!("failed to write decrypted image {}", image_out.display()))?;

    println!("Image decrypted.");
    println!("  Image: {}", image_out.display());
    Ok(())
}

// `photo.png` -> `photo_encrypted.png`, next to the input.
fn derived_path(input: &Path, suffix: &str, extension: &str) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    input.with_file_name(format!("{}{}.{}", stem, suffix, extension))
}

fn ensure_absent(path: &Path) -> Result<()> {
    if path.exists() {
        bail!("{} already exists; refusing to overwrite", path.display());
    }
    Ok(())
}

fn confirm(question: &str) -> Result<bool> {
    print!("{}", question);
    io::stdout().flush().context("failed to flush stdout")?;

    let mut answer = String::new();
    io::stdin()
        .read_line(&mut answer)
        .context("failed to read from stdin")?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{ChannelLayout, Raster};

    #[test]
    fn output_names_derive_from_the_input_stem() {
        assert_eq!(
            derived_path(Path::new("photo.png"), "_encrypted", "png"),
            PathBuf::from("photo_encrypted.png")
        );
        assert_eq!(
            derived_path(Path::new("photo.png"), "_key", "txt"),
            PathBuf::from("photo_key.txt")
        );
        assert_eq!(
            derived_path(Path::new("shots/photo.jpeg"), "_decrypted", "jpg"),
            PathBuf::from("shots/photo_decrypted.jpg")
        );
    }

    #[test]
    fn existing_output_is_refused() {
        assert!(ensure_absent(&std::env::temp_dir()).is_err());
        assert!(ensure_absent(Path::new("does/not/exist.png")).is_ok());
    }

    // The full pipeline the CLI drives, minus the filesystem: decode,
    // scramble, re-encode, decode again, unscramble.
    #[test]
    fn scrambled_png_recovers_through_the_whole_pipeline() {
        let original = Raster {
            width: 3,
            height: 2,
            format: image::ImageFormat::Png,
            layout: ChannelLayout::Rgba,
            pixels: (0u8..24).map(|b| b.wrapping_mul(11)).collect(),
        };
        let plain = original.pixels.clone();

        let (scrambled, pad) = cipher::encrypt(&original.pixels).unwrap();
        let scrambled_raster = Raster {
            pixels: scrambled,
            ..original
        };
        let on_disk = codec::encode(&scrambled_raster).unwrap();

        let mut reloaded = codec::decode(&on_disk).unwrap();
        let key_text = key::encode(&pad);
        let parsed_pad = key::parse(&key_text).unwrap();
        reloaded.pixels = cipher::decrypt(&reloaded.pixels, &parsed_pad).unwrap();

        assert_eq!(reloaded.pixels, plain);
    }
}
