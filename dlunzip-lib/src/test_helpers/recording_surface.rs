use crate::display::{DisplayImage, DisplaySurface};
use std::sync::Mutex;

/// Remembers what it was last given and which threads touched it.
#[derive(Default)]
pub struct RecordingSurface {
    content: Mutex<Option<DisplayImage>>,
    writer_threads: Mutex<Vec<Option<String>>>,
}

impl RecordingSurface {
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.content
            .lock()
            .unwrap()
            .as_ref()
            .map(DisplayImage::dimensions)
    }

    pub fn is_empty(&self) -> bool {
        self.content.lock().unwrap().is_none()
    }

    pub fn writer_threads(&self) -> Vec<Option<String>> {
        self.writer_threads.lock().unwrap().clone()
    }
}

impl DisplaySurface for RecordingSurface {
    fn set_image(&self, image: Option<DisplayImage>) {
        self.writer_threads
            .lock()
            .unwrap()
            .push(std::thread::current().name().map(str::to_string));
        *self.content.lock().unwrap() = image;
    }
}
