use image::{DynamicImage, ImageReader};
use std::path::{Path, PathBuf};

/// A decoded image together with the file it was read from.
#[derive(Debug, Clone)]
pub struct DisplayImage {
    pub path: PathBuf,
    pub image: DynamicImage,
}

impl DisplayImage {
    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }
}

/// An image-bearing region of the screen.
///
/// Surfaces are only ever touched from the UI thread; see [`crate::ui_thread::UiThread`].
pub trait DisplaySurface: Send + Sync {
    /// Replaces the surface content. `None` leaves the surface empty.
    fn set_image(&self, image: Option<DisplayImage>);

    fn clear(&self) {
        self.set_image(None);
    }
}

/// Reads and decodes `path`. Missing or undecodable files yield `None`.
pub fn load_image(path: &Path) -> Option<DisplayImage> {
    let reader = match ImageReader::open(path) {
        Ok(reader) => reader,
        Err(e) => {
            tracing::debug!("Cannot open {}: {}", path.display(), e);
            return None;
        }
    };

    let decoded = reader
        .with_guessed_format()
        .map_err(image::ImageError::IoError)
        .and_then(|reader| reader.decode());

    match decoded {
        Ok(image) => Some(DisplayImage {
            path: path.to_path_buf(),
            image,
        }),
        Err(e) => {
            tracing::warn!("Failed to decode {}: {}", path.display(), e);
            None
        }
    }
}
