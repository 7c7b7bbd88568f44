//! In-place image recompression with replace-if-smaller semantics.
//!
//! Each image is re-encoded to a sibling scratch file and promoted over
//! the original only when the result is strictly smaller (guarded
//! commit). PNG is re-optimized losslessly; JPEG is normalized to RGB
//! and recompressed at the configured quality.

use crate::config::SiteConfig;
use crate::log;
use crate::utils::plural::plural_count;
use anyhow::{Context, Result};
use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Supported raster formats.
const IMAGE_EXTS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Result of one guarded-commit attempt.
#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    /// Candidate was smaller and replaced the original
    Replaced { before: u64, after: u64 },
    /// Candidate was not smaller and was discarded
    Kept,
}

pub fn optimize_images(config: &SiteConfig) -> Result<()> {
    let dir = config.root_join(&config.images.dir);
    if !dir.is_dir() {
        log!("images"; "directory `{}` not found, skipping images", dir.display());
        return Ok(());
    }

    let files = scan_images(&dir);
    if files.is_empty() {
        log!("images"; "no images in `{}`", dir.display());
        return Ok(());
    }

    let mut replaced = 0usize;
    for path in &files {
        let name = path.file_name().unwrap_or_default().to_string_lossy();
        match recompress(path, config.images.jpeg_quality) {
            Ok(Outcome::Replaced { before, after }) => {
                replaced += 1;
                log!("images"; "✓ {name}: {before} -> {after} bytes");
            }
            Ok(Outcome::Kept) => log!("images"; "= {name}: recompression not smaller"),
            Err(e) => log!("images"; "✗ {name}: {e:#}"),
        }
    }

    log!(
        "images";
        "compressed {} of {}",
        plural_count(replaced, "image"),
        files.len()
    );
    Ok(())
}

/// Supported image files under `dir`, recursively, in stable order.
///
/// Scratch files left behind by an interrupted earlier run are excluded.
fn scan_images(dir: &Path) -> Vec<PathBuf> {
    jwalk::WalkDir::new(dir)
        .skip_hidden(true)
        .sort(true)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path())
        .filter(|path| has_image_ext(path) && !is_scratch(path))
        .collect()
}

fn has_image_ext(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTS.contains(&e.to_ascii_lowercase().as_str()))
}

/// Scratch candidates look like `photo.tmp.jpg`.
fn is_scratch(path: &Path) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|s| s.ends_with(".tmp"))
}

fn scratch_path(path: &Path) -> PathBuf {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("img");
    path.with_extension(format!("tmp.{ext}"))
}

/// Guarded commit: encode a candidate next to the original, then rename
/// over it only if strictly smaller, otherwise discard the candidate.
fn recompress(path: &Path, jpeg_quality: u8) -> Result<Outcome> {
    let img = image::open(path).with_context(|| "decode failed")?;
    let before = fs::metadata(path)?.len();

    let tmp = scratch_path(path);
    if let Err(e) = encode_candidate(&img, path, &tmp, jpeg_quality) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }

    let after = fs::metadata(&tmp)?.len();
    if after < before {
        fs::rename(&tmp, path)?;
        Ok(Outcome::Replaced { before, after })
    } else {
        fs::remove_file(&tmp)?;
        Ok(Outcome::Kept)
    }
}

/// Re-encode with settings appropriate to the source format.
fn encode_candidate(
    img: &DynamicImage,
    source: &Path,
    tmp: &Path,
    jpeg_quality: u8,
) -> Result<()> {
    let ext = source
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let file = File::create(tmp).with_context(|| format!("failed to create `{}`", tmp.display()))?;
    let mut writer = BufWriter::new(file);

    if ext == "png" {
        // Lossless: keep the color model, maximize compression effort
        let encoder =
            PngEncoder::new_with_quality(&mut writer, CompressionType::Best, PngFilter::Adaptive);
        img.write_with_encoder(encoder)?;
    } else {
        // Lossy: normalize to RGB (JPEG has no alpha) and bound the quality
        let encoder = JpegEncoder::new_with_quality(&mut writer, jpeg_quality);
        DynamicImage::ImageRgb8(img.to_rgb8()).write_with_encoder(encoder)?;
    }

    writer.flush()?;
    Ok(())
}
