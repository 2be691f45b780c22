//! Artwork descriptions.

use alloc::string::String;

use glam::Vec2;

/// Where an artwork's image comes from.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ImageSource {
    /// Decoded bitmap with known pixel dimensions.
    Loaded { width: u32, height: u32 },
    /// Not fetched yet: remote URL or local asset reference.
    Pending { url: String },
    /// No image at all.
    #[default]
    Missing,
}

impl ImageSource {
    /// Width / height of a loaded image. `None` if not loaded or degenerate.
    pub fn aspect_ratio(&self) -> Option<f32> {
        match *self {
            Self::Loaded { width, height } if width > 0 && height > 0 => {
                Some(width as f32 / height as f32)
            }
            _ => None,
        }
    }

    /// Whether the image is decoded.
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }

    /// URL of a pending image.
    pub fn pending_url(&self) -> Option<&str> {
        match self {
            Self::Pending { url } => Some(url),
            _ => None,
        }
    }
}

/// Immutable description of one piece of art.
///
/// Text metadata is carried along for display and has no effect on layout.
///
/// ```
/// use zenhang::{ArtworkSpec, ImageSource};
///
/// let art = ArtworkSpec::new("Water Lilies")
///     .artist("Claude Monet")
///     .size_inches(36.0, 24.0)
///     .image(ImageSource::Loaded { width: 3000, height: 2000 });
///
/// assert_eq!(art.image.aspect_ratio(), Some(1.5));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ArtworkSpec {
    pub title: String,
    pub artist: String,
    pub description: String,
    pub year: String,
    pub medium: String,
    pub category: String,
    pub image: ImageSource,
    /// Requested artwork size (width, height) in inches, excluding the frame.
    pub preferred_size_inches: Vec2,
    /// Derive height from the image's aspect ratio when the image is loaded.
    pub maintain_aspect_ratio: bool,
}

impl ArtworkSpec {
    /// Default preferred size when none is declared.
    pub const DEFAULT_SIZE_INCHES: Vec2 = Vec2::new(24.0, 24.0);

    /// Artwork with a title and default everything else.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: String::new(),
            description: String::new(),
            year: String::new(),
            medium: String::new(),
            category: String::new(),
            image: ImageSource::Missing,
            preferred_size_inches: Self::DEFAULT_SIZE_INCHES,
            maintain_aspect_ratio: true,
        }
    }

    pub fn artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = artist.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn year(mut self, year: impl Into<String>) -> Self {
        self.year = year.into();
        self
    }

    pub fn medium(mut self, medium: impl Into<String>) -> Self {
        self.medium = medium.into();
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the image source.
    pub fn image(mut self, image: ImageSource) -> Self {
        self.image = image;
        self
    }

    /// Set the preferred artwork size in inches.
    pub fn size_inches(mut self, width: f32, height: f32) -> Self {
        self.preferred_size_inches = Vec2::new(width, height);
        self
    }

    /// Toggle aspect-ratio correction.
    pub fn maintain_aspect_ratio(mut self, keep: bool) -> Self {
        self.maintain_aspect_ratio = keep;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_ratio_only_for_loaded_images() {
        assert_eq!(
            ImageSource::Loaded {
                width: 400,
                height: 200
            }
            .aspect_ratio(),
            Some(2.0)
        );
        assert_eq!(
            ImageSource::Loaded {
                width: 400,
                height: 0
            }
            .aspect_ratio(),
            None
        );
        assert_eq!(ImageSource::Missing.aspect_ratio(), None);
        let pending = ImageSource::Pending {
            url: "https://example.com/a.jpg".into(),
        };
        assert_eq!(pending.aspect_ratio(), None);
        assert_eq!(pending.pending_url(), Some("https://example.com/a.jpg"));
    }

    #[test]
    fn builder_defaults() {
        let a = ArtworkSpec::new("Untitled");
        assert_eq!(a.preferred_size_inches, ArtworkSpec::DEFAULT_SIZE_INCHES);
        assert!(a.maintain_aspect_ratio);
        assert!(!a.image.is_loaded());

        let b = a
            .clone()
            .artist("Anon")
            .year("1901")
            .medium("Oil on canvas")
            .category("Impressionism")
            .description("A field.")
            .maintain_aspect_ratio(false);
        assert_eq!(b.artist, "Anon");
        assert_eq!(b.year, "1901");
        assert!(!b.maintain_aspect_ratio);
        assert_eq!(b.title, a.title);
    }
}
