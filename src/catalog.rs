//! Artwork catalog parsing.
//!
//! Accepts a JSON array of artwork records, or an object wrapping one under
//! `artworks`, `items` or `products`. The image reference may appear under
//! `image`, `imageUrl`, `url` or `imageRefOrURL`; the first non-empty one in
//! that order is used. Bad records are skipped with a
//! warning; only a document that is not JSON, or has the wrong top-level
//! shape, is an error.
//!
//! ```
//! use zenhang::catalog;
//!
//! let catalog = catalog::parse(r#"{
//!     "artworks": [
//!         { "title": "Starry Night", "artist": "Vincent van Gogh", "year": 1889,
//!           "imageUrl": "https://example.com/starry.jpg",
//!           "size": { "width": 29, "height": 36.25 } },
//!         { "artist": "nobody" }
//!     ]
//! }"#).unwrap();
//!
//! assert_eq!(catalog.artworks.len(), 1);
//! assert_eq!(catalog.artworks[0].year, "1889");
//! assert_eq!(catalog.warnings.len(), 1);
//! ```

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use glam::Vec2;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::artwork::{ArtworkSpec, ImageSource};
use crate::load::LoadBatch;

/// Keys under which an object-shaped catalog may hold its records.
const LIST_KEYS: [&str; 3] = ["artworks", "items", "products"];

/// Artwork record as it appears in a catalog.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Record {
    #[serde(default)]
    title: String,
    #[serde(default)]
    artist: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    year: Option<Value>,
    #[serde(default)]
    medium: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default, rename = "imageRefOrURL")]
    image_ref_or_url: Option<String>,
    #[serde(default)]
    size: Option<SizeHint>,
    #[serde(default)]
    size_hint: Option<SizeHint>,
    #[serde(default)]
    maintain_aspect_ratio: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct SizeHint {
    width: f32,
    height: f32,
}

/// Parsed catalog.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    /// Valid records, in document order.
    pub artworks: Vec<ArtworkSpec>,
    /// Records that were skipped or patched.
    pub warnings: Vec<CatalogWarning>,
}

impl Catalog {
    /// Start loading the catalog's images.
    pub fn into_batch(self) -> LoadBatch {
        LoadBatch::new(self.artworks)
    }
}

/// Non-fatal problem with one record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogWarning {
    /// Record could not be read; skipped.
    RecordInvalid { index: usize, reason: String },
    /// Record has no title; skipped.
    MissingTitle { index: usize },
    /// Size hint was non-positive or non-finite; default size used.
    SizeInvalid { index: usize },
}

/// Catalog-level failure.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog is not valid JSON: {0}")]
    Malformed(String),
    #[error("catalog must be an array or an object with an `artworks`, `items` or `products` array")]
    UnexpectedShape,
}

/// Parse a catalog document.
pub fn parse(json: &str) -> Result<Catalog, CatalogError> {
    let doc: Value =
        serde_json::from_str(json).map_err(|e| CatalogError::Malformed(e.to_string()))?;
    let records = match doc {
        Value::Array(items) => items,
        Value::Object(mut map) => LIST_KEYS
            .iter()
            .find_map(|k| match map.remove(*k) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .ok_or(CatalogError::UnexpectedShape)?,
        _ => return Err(CatalogError::UnexpectedShape),
    };

    let mut catalog = Catalog::default();
    for (index, value) in records.into_iter().enumerate() {
        let record = match Record::deserialize(value) {
            Ok(r) => r,
            Err(e) => {
                warn!(index, error = %e, "skipping unreadable catalog record");
                catalog.warnings.push(CatalogWarning::RecordInvalid {
                    index,
                    reason: e.to_string(),
                });
                continue;
            }
        };
        if record.title.trim().is_empty() {
            warn!(index, "skipping catalog record without a title");
            catalog.warnings.push(CatalogWarning::MissingTitle { index });
            continue;
        }
        let (artwork, size_ok) = into_artwork(record);
        if !size_ok {
            warn!(index, title = %artwork.title, "invalid size hint; using default size");
            catalog.warnings.push(CatalogWarning::SizeInvalid { index });
        }
        catalog.artworks.push(artwork);
    }
    Ok(catalog)
}

fn into_artwork(record: Record) -> (ArtworkSpec, bool) {
    let (size, size_ok) = match record.size.or(record.size_hint) {
        None => (ArtworkSpec::DEFAULT_SIZE_INCHES, true),
        Some(SizeHint { width, height })
            if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 =>
        {
            (Vec2::new(width, height), true)
        }
        Some(_) => (ArtworkSpec::DEFAULT_SIZE_INCHES, false),
    };
    // First non-empty key wins: image, imageUrl, url, imageRefOrURL.
    let image_ref = [
        record.image,
        record.image_url,
        record.url,
        record.image_ref_or_url,
    ]
    .into_iter()
    .flatten()
    .find(|r| !r.trim().is_empty());
    let image = match image_ref.as_deref().map(str::trim) {
        None | Some("") => ImageSource::Missing,
        Some(url) => ImageSource::Pending {
            url: url.to_string(),
        },
    };
    let year = match record.year {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };
    let artwork = ArtworkSpec {
        title: record.title,
        artist: record.artist,
        description: record.description,
        year,
        medium: record.medium,
        category: record.category,
        image,
        preferred_size_inches: size,
        maintain_aspect_ratio: record.maintain_aspect_ratio.unwrap_or(true),
    };
    (artwork, size_ok)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_array() {
        let c = parse(
            r#"[
                { "title": "A", "image": "https://example.com/a.png",
                  "sizeHint": { "width": 20, "height": 30 }, "maintainAspectRatio": false },
                { "title": "B", "imageRefOrURL": "" }
            ]"#,
        )
        .unwrap();
        assert!(c.warnings.is_empty());
        assert_eq!(c.artworks.len(), 2);
        let a = &c.artworks[0];
        assert_eq!(a.preferred_size_inches, Vec2::new(20.0, 30.0));
        assert!(!a.maintain_aspect_ratio);
        assert_eq!(a.image.pending_url(), Some("https://example.com/a.png"));
        let b = &c.artworks[1];
        assert_eq!(b.image, ImageSource::Missing);
        assert_eq!(b.preferred_size_inches, ArtworkSpec::DEFAULT_SIZE_INCHES);
        assert!(b.maintain_aspect_ratio);
    }

    #[test]
    fn image_keys_resolve_in_order() {
        let c = parse(
            r#"[
                { "title": "both", "image": "https://example.com/a.png",
                  "imageUrl": "https://example.com/b.png" },
                { "title": "fallback", "image": " ", "url": "local/asset/3" },
                { "title": "sized", "size": { "width": 10, "height": 12 },
                  "sizeHint": { "width": 99, "height": 99 } }
            ]"#,
        )
        .unwrap();
        assert!(c.warnings.is_empty());
        assert_eq!(c.artworks.len(), 3);
        assert_eq!(c.artworks[0].image.pending_url(), Some("https://example.com/a.png"));
        assert_eq!(c.artworks[1].image.pending_url(), Some("local/asset/3"));
        assert_eq!(c.artworks[2].preferred_size_inches, Vec2::new(10.0, 12.0));
    }

    #[test]
    fn wrapped_lists() {
        for key in LIST_KEYS {
            let doc = alloc::format!(r#"{{ "{key}": [ {{ "title": "X" }} ] }}"#);
            assert_eq!(parse(&doc).unwrap().artworks.len(), 1, "{key}");
        }
    }

    #[test]
    fn skips_bad_records_and_keeps_the_rest() {
        let c = parse(
            r#"[
                { "title": "ok", "medium": "Oil", "category": "Landscape" },
                { "title": 42 },
                "not an object",
                { "title": "   " },
                { "title": "tiny", "size": { "width": 0, "height": 10 } },
                { "title": "also ok", "url": "local/asset/7", "year": "c. 1500" }
            ]"#,
        )
        .unwrap();
        let titles: Vec<_> = c.artworks.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, ["ok", "tiny", "also ok"]);
        assert_eq!(c.artworks[0].medium, "Oil");
        assert_eq!(c.artworks[2].year, "c. 1500");
        assert_eq!(c.artworks[1].preferred_size_inches, ArtworkSpec::DEFAULT_SIZE_INCHES);

        assert_eq!(c.warnings.len(), 4);
        assert!(matches!(c.warnings[0], CatalogWarning::RecordInvalid { index: 1, .. }));
        assert!(matches!(c.warnings[1], CatalogWarning::RecordInvalid { index: 2, .. }));
        assert_eq!(c.warnings[2], CatalogWarning::MissingTitle { index: 3 });
        assert_eq!(c.warnings[3], CatalogWarning::SizeInvalid { index: 4 });
    }

    #[test]
    fn rejects_bad_documents() {
        assert!(matches!(parse("{ nope"), Err(CatalogError::Malformed(_))));
        assert_eq!(parse("42"), Err(CatalogError::UnexpectedShape));
        assert_eq!(
            parse(r#"{ "artworks": "none" }"#),
            Err(CatalogError::UnexpectedShape)
        );
        assert_eq!(parse(r#"{ "other": [] }"#), Err(CatalogError::UnexpectedShape));
    }

    #[test]
    fn into_batch_waits_on_remote_images() {
        let batch = parse(
            r#"[ { "title": "a", "image": "https://example.com/a.jpg" }, { "title": "b" } ]"#,
        )
        .unwrap()
        .into_batch();
        assert_eq!(batch.remaining(), 1);
        assert_eq!(batch.len(), 2);
    }
}
