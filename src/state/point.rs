/// Image points: the data model that flows from the manifest to the UI
///
/// A point is one manifest entry. It may be backed by several alternate
/// images; exactly one of them is displayed at a time.

use iced::widget::image::Handle;
use std::path::PathBuf;

/// One probed image file
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSource {
    /// Resolved path, including the extension that probed successfully
    pub path: PathBuf,
    /// Natural width in pixels
    pub width: u32,
    /// Natural height in pixels
    pub height: u32,
}

impl ImageSource {
    pub fn new(path: PathBuf, width: u32, height: u32) -> Self {
        Self { path, width, height }
    }

    /// Width / height, or 1.0 for degenerate sizes
    pub fn aspect_ratio(&self) -> f32 {
        if self.width == 0 || self.height == 0 {
            return 1.0;
        }
        self.width as f32 / self.height as f32
    }

    pub fn natural_size(&self) -> iced::Size {
        iced::Size::new(self.width as f32, self.height as f32)
    }

    /// Image handle for iced widgets and canvas drawing
    pub fn handle(&self) -> Handle {
        Handle::from_path(&self.path)
    }
}

/// A logical slide: caption, rating and one or more images
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePoint {
    sources: Vec<ImageSource>,
    current: usize,
    pub caption: String,
    /// Possibly half-integer, e.g. 7.5
    pub rating: f32,
}

impl ImagePoint {
    /// Returns None when `sources` is empty
    pub fn new(sources: Vec<ImageSource>, caption: String, rating: f32) -> Option<Self> {
        if sources.is_empty() {
            return None;
        }
        Some(Self {
            sources,
            current: 0,
            caption,
            rating,
        })
    }

    pub fn sources(&self) -> &[ImageSource] {
        &self.sources
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_source(&self) -> &ImageSource {
        &self.sources[self.current]
    }

    pub fn has_alternates(&self) -> bool {
        self.sources.len() > 1
    }

    /// Display another of this point's images.
    /// Returns false if nothing changed.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.sources.len() || index == self.current {
            return false;
        }
        self.current = index;
        true
    }

    /// Step to the next alternate, wrapping around
    pub fn cycle(&mut self) -> bool {
        if !self.has_alternates() {
            return false;
        }
        self.current = (self.current + 1) % self.sources.len();
        true
    }

    /// Rating as a script would print it: `4`, `4.5`
    pub fn rating_label(&self) -> String {
        format_rating(self.rating)
    }
}

/// `4.0` prints as `4`, `4.5` as `4.5`
pub fn format_rating(rating: f32) -> String {
    if rating.fract() == 0.0 {
        format!("{}", rating as i64)
    } else {
        format!("{}", rating)
    }
}

#[cfg(test)]
pub(crate) fn sample_point(caption: &str, rating: f32, images: usize) -> ImagePoint {
    let sources = (0..images)
        .map(|i| ImageSource::new(PathBuf::from(format!("images/{caption}-{i}.jpg")), 400, 300))
        .collect();
    ImagePoint::new(sources, caption.to_string(), rating).unwrap()
}
