//! Asset optimization: web fonts and raster images.
//!
//! Both phases are sequential batch jobs over a configured directory.
//! Per-item failures are logged and skipped; an absent directory or
//! missing tool skips the phase entirely without failing the run.

mod font;
mod image;

pub use font::optimize_fonts;
pub use self::image::optimize_images;
