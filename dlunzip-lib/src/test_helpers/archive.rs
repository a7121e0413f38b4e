use anyhow::Result;
use image::{ImageFormat, Rgb, RgbImage};
use std::io::{Cursor, Write};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Builds a zip in memory. Entries with `None` content are directories.
pub fn zip_bytes(entries: &[(&str, Option<&[u8]>)]) -> Result<Vec<u8>> {
    let mut zip_buffer = Vec::new();
    let mut zip = ZipWriter::new(Cursor::new(&mut zip_buffer));
    let options = SimpleFileOptions::default();

    for (name, content) in entries {
        match content {
            Some(bytes) => {
                zip.start_file(*name, options)?;
                zip.write_all(bytes)?;
            }
            None => zip.add_directory(*name, options)?,
        }
    }

    zip.finish()?;
    Ok(zip_buffer)
}

/// A solid-colored PNG.
pub fn png_bytes(width: u32, height: u32, color: [u8; 3]) -> Result<Vec<u8>> {
    let image = RgbImage::from_pixel(width, height, Rgb(color));
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// The archive layout the app expects: `image/melon.png` (8x6) and `image/lemon.png` (5x5).
pub fn fruit_archive() -> Result<Vec<u8>> {
    let melon = png_bytes(8, 6, [40, 180, 60])?;
    let lemon = png_bytes(5, 5, [240, 220, 40])?;
    zip_bytes(&[
        ("image/", None),
        ("image/melon.png", Some(melon.as_slice())),
        ("image/lemon.png", Some(lemon.as_slice())),
    ])
}

/// Same as [`fruit_archive`] without `lemon.png`.
pub fn melon_only_archive() -> Result<Vec<u8>> {
    let melon = png_bytes(8, 6, [40, 180, 60])?;
    zip_bytes(&[("image/", None), ("image/melon.png", Some(melon.as_slice()))])
}
