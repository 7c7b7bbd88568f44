//! Web-font generation via an external subsetting tool.
//!
//! For each `.ttf` source, produces a compressed web variant through
//! `pyftsubset` (fonttools). Flavor preference is woff2 first, woff as
//! the fallback; derived files are regenerated wholesale each run.

use crate::config::SiteConfig;
use crate::utils::exec::{Cmd, FilterRule};
use crate::utils::plural::plural_count;
use crate::{debug, log};
use anyhow::{Result, anyhow};
use std::fs;
use std::path::{Path, PathBuf};

/// Target flavors, most modern first.
const FLAVORS: [&str; 2] = ["woff2", "woff"];

/// fonttools progress chatter that is safe to hide from the console.
const SUBSET_FILTER: FilterRule = FilterRule::new(&["WARNING:", "Saved"]);

pub fn optimize_fonts(config: &SiteConfig) -> Result<()> {
    let dir = config.root_join(&config.fonts.dir);
    if !dir.is_dir() {
        log!("fonts"; "directory `{}` not found, skipping fonts", dir.display());
        return Ok(());
    }

    let Some(subsetter) = subsetter_command(config) else {
        log!("fonts"; "no subsetter available (pip install fonttools brotli), skipping fonts");
        return Ok(());
    };
    debug!("fonts"; "subsetter: {}", subsetter.join(" "));

    let sources = scan_fonts(&dir)?;
    if sources.is_empty() {
        log!("fonts"; "no .ttf fonts in `{}`", dir.display());
        return Ok(());
    }

    let mut converted = 0usize;
    for font in &sources {
        match subset_font(&subsetter, font) {
            Ok(output) => {
                converted += 1;
                log!("fonts"; "✓ {}", output.file_name().unwrap_or_default().to_string_lossy());
            }
            Err(e) => log!("fonts"; "✗ {}: {e:#}", font.display()),
        }
    }

    log!("fonts"; "generated {}", plural_count(converted, "web font"));
    Ok(())
}

/// Resolve the subsetter invocation as an ordered-fallback chain:
/// explicit config override, then `pyftsubset` on PATH, then the
/// fontTools library module through the Python interpreter.
fn subsetter_command(config: &SiteConfig) -> Option<Vec<String>> {
    if let Some(cmd) = &config.fonts.subsetter {
        // The override may carry arguments, e.g. "python3 -m fontTools.subset"
        let words: Vec<String> = cmd.split_whitespace().map(String::from).collect();
        if !words.is_empty() {
            return Some(words);
        }
    }
    if which::which("pyftsubset").is_ok() {
        return Some(vec!["pyftsubset".to_string()]);
    }
    if let Ok(python) = which::which("python3") {
        return Some(vec![
            python.to_string_lossy().into_owned(),
            "-m".to_string(),
            "fontTools.subset".to_string(),
        ]);
    }
    None
}

/// `.ttf` files directly inside `dir`, sorted for stable output order.
fn scan_fonts(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut fonts: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case("ttf"))
        })
        .collect();
    fonts.sort();
    Ok(fonts)
}

/// Try the preferred flavor first, fall back to the secondary on failure.
///
/// Returns the path of the variant that was produced.
fn subset_font(subsetter: &[String], source: &Path) -> Result<PathBuf> {
    let mut last_err = None;
    for flavor in FLAVORS {
        let output = source.with_extension(flavor);
        match run_subset(subsetter, source, flavor, &output) {
            Ok(()) => return Ok(output),
            Err(e) => {
                debug!("fonts"; "{flavor} failed for {}: {e:#}", source.display());
                last_err = Some(e);
            }
        }
    }
    Err(last_err.unwrap_or_else(|| anyhow!("no flavors attempted")))
}

fn run_subset(subsetter: &[String], source: &Path, flavor: &str, output: &Path) -> Result<()> {
    Cmd::from_slice(subsetter)
        .arg(source)
        .args([
            format!("--flavor={flavor}"),
            format!("--output-file={}", output.display()),
        ])
        .filter(&SUBSET_FILTER)
        .run()
        .map(|_| ())
}
