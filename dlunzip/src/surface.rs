use crate::ui;
use dlunzip_lib::config::Config;
use dlunzip_lib::controller::{AttemptOutcome, ExtractionStatus};
use dlunzip_lib::display::{DisplayImage, DisplaySurface};
use image::ColorType;
use std::sync::{Arc, Mutex};

/// Holds the image assigned to one display region and describes it on the terminal.
pub struct TerminalSurface {
    label: String,
    content: Mutex<Option<DisplayImage>>,
}

impl TerminalSurface {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            content: Mutex::new(None),
        }
    }

    /// One surface per configured image, in display order.
    pub fn pair(config: &Config) -> [Arc<TerminalSurface>; 2] {
        [
            Arc::new(Self::new(&config.settings.first_image)),
            Arc::new(Self::new(&config.settings.second_image)),
        ]
    }

    pub fn describe(&self) -> Option<String> {
        let content = self.content.lock().unwrap_or_else(|e| e.into_inner());
        content.as_ref().map(|shown| {
            let (width, height) = shown.dimensions();
            format!(
                "{}: {}x{} {} ({})",
                self.label,
                width,
                height,
                color_name(shown.image.color()),
                shown.path.display()
            )
        })
    }
}

impl DisplaySurface for TerminalSurface {
    fn set_image(&self, image: Option<DisplayImage>) {
        tracing::debug!(
            "{}: {}",
            self.label,
            if image.is_some() { "image set" } else { "cleared" }
        );
        *self.content.lock().unwrap_or_else(|e| e.into_inner()) = image;
    }
}

fn color_name(color: ColorType) -> &'static str {
    match color {
        ColorType::L8 | ColorType::L16 => "grayscale",
        ColorType::La8 | ColorType::La16 => "grayscale+alpha",
        ColorType::Rgb8 | ColorType::Rgb16 | ColorType::Rgb32F => "RGB",
        ColorType::Rgba8 | ColorType::Rgba16 | ColorType::Rgba32F => "RGBA",
        _ => "other",
    }
}

pub fn as_surfaces(surfaces: &[Arc<TerminalSurface>; 2]) -> [Arc<dyn DisplaySurface>; 2] {
    let [first, second] = surfaces.clone();
    [first as Arc<dyn DisplaySurface>, second as Arc<dyn DisplaySurface>]
}

/// Prints what each surface ended up showing.
pub fn report(outcome: &AttemptOutcome, surfaces: &[Arc<TerminalSurface>; 2]) {
    if let AttemptOutcome::Displayed {
        extraction: ExtractionStatus::Failed(reason),
        ..
    } = outcome
    {
        ui::warning(&format!("The archive could not be fully extracted: {reason}"));
    }

    for surface in surfaces {
        match surface.describe() {
            Some(description) => ui::success(&description),
            None => ui::warning(&format!("{}: nothing to show", surface.label)),
        }
    }
}
