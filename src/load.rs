//! Load gating for artwork content.
//!
//! The host fetches images however it likes (HTTP, asset database) and
//! reports each outcome here. Placement must only see the artwork list once
//! every fetch has resolved; [`LoadBatch::finish`] enforces that.
//!
//! ```
//! use zenhang::{ArtworkSpec, ImageSource, load::{LoadBatch, LoadFailure}};
//!
//! let mut batch = LoadBatch::new(vec![
//!     ArtworkSpec::new("a").image(ImageSource::Pending { url: "https://example.com/a.jpg".into() }),
//!     ArtworkSpec::new("b").image(ImageSource::Pending { url: "https://example.com/b.jpg".into() }),
//! ]);
//!
//! let pending: Vec<usize> = batch.pending().map(|(i, _)| i).collect();
//! assert_eq!(pending, [0, 1]);
//!
//! batch.resolve(0, 1600, 1200);
//! assert!(batch.finish_ref().is_err());
//!
//! batch.fail(1, LoadFailure::Timeout);
//! let ready = batch.finish().unwrap();
//! assert_eq!(ready.len(), 1);
//! ```

use alloc::vec::Vec;
use core::fmt;
use core::time::Duration;

use tracing::{debug, warn};

use crate::artwork::{ArtworkSpec, ImageSource};

/// Host-side loading parameters.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LoadConfig {
    /// Per-request timeout the host applies to each fetch. Timed-out entries
    /// are reported with [`LoadFailure::Timeout`] and not retried.
    pub request_timeout: Duration,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Why an entry's image could not be loaded.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LoadFailure {
    Timeout,
    Transport,
    Decode,
    MissingImage,
}

impl fmt::Display for LoadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Timeout => "request timed out",
            Self::Transport => "transport error",
            Self::Decode => "image could not be decoded",
            Self::MissingImage => "no image",
        })
    }
}

/// Load gate error.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    /// Some fetches have not been reported yet.
    #[error("{remaining} image load(s) still pending")]
    Pending { remaining: usize },
}

#[derive(Clone, Debug, PartialEq)]
enum EntryState {
    Waiting,
    Ready,
    Failed(LoadFailure),
}

/// Artworks whose images are being fetched.
#[derive(Clone, Debug, Default)]
pub struct LoadBatch {
    config: LoadConfig,
    entries: Vec<(ArtworkSpec, EntryState)>,
}

impl LoadBatch {
    /// Start a batch with the default [`LoadConfig`]. Entries with
    /// [`ImageSource::Pending`] wait for [`resolve`](Self::resolve) or
    /// [`fail`](Self::fail); the rest are ready.
    pub fn new(artworks: Vec<ArtworkSpec>) -> Self {
        Self::with_config(artworks, LoadConfig::default())
    }

    /// Start a batch whose fetches follow `config`.
    pub fn with_config(artworks: Vec<ArtworkSpec>, config: LoadConfig) -> Self {
        let entries = artworks
            .into_iter()
            .map(|a| {
                let state = match a.image {
                    ImageSource::Pending { .. } => EntryState::Waiting,
                    _ => EntryState::Ready,
                };
                (a, state)
            })
            .collect();
        debug!(
            timeout_ms = config.request_timeout.as_millis() as u64,
            "starting load batch"
        );
        Self { config, entries }
    }

    /// Parameters the host applies to each fetch in this batch.
    pub fn config(&self) -> &LoadConfig {
        &self.config
    }

    /// Total entries, including failed ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries still waiting, with their image URLs.
    pub fn pending(&self) -> impl Iterator<Item = (usize, &str)> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, (_, s))| matches!(s, EntryState::Waiting))
            .filter_map(|(i, (a, _))| a.image.pending_url().map(|u| (i, u)))
    }

    /// Number of entries still waiting.
    pub fn remaining(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, s)| matches!(s, EntryState::Waiting))
            .count()
    }

    /// Number of entries that failed and will be skipped.
    pub fn failed(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, s)| matches!(s, EntryState::Failed(_)))
            .count()
    }

    pub fn is_complete(&self) -> bool {
        self.remaining() == 0
    }

    /// Record a decoded image. Returns `false` if `index` is not waiting.
    pub fn resolve(&mut self, index: usize, width: u32, height: u32) -> bool {
        let Some((artwork, state)) = self.entries.get_mut(index) else {
            return false;
        };
        if *state != EntryState::Waiting {
            return false;
        }
        if width == 0 || height == 0 {
            warn!(index, title = %artwork.title, "image decoded with zero size; skipping");
            *state = EntryState::Failed(LoadFailure::Decode);
            return true;
        }
        debug!(index, title = %artwork.title, width, height, "image loaded");
        artwork.image = ImageSource::Loaded { width, height };
        *state = EntryState::Ready;
        true
    }

    /// Record a failed fetch. The entry is skipped. Returns `false` if
    /// `index` is not waiting.
    pub fn fail(&mut self, index: usize, reason: LoadFailure) -> bool {
        let Some((artwork, state)) = self.entries.get_mut(index) else {
            return false;
        };
        if *state != EntryState::Waiting {
            return false;
        }
        warn!(index, title = %artwork.title, %reason, "image load failed; skipping artwork");
        *state = EntryState::Failed(reason);
        true
    }

    /// Check the gate without consuming the batch.
    pub fn finish_ref(&self) -> Result<(), LoadError> {
        match self.remaining() {
            0 => Ok(()),
            remaining => Err(LoadError::Pending { remaining }),
        }
    }

    /// Artworks ready for placement, in input order, with failed entries
    /// dropped. Errors while any load is outstanding.
    pub fn finish(self) -> Result<Vec<ArtworkSpec>, LoadError> {
        self.finish_ref()?;
        Ok(self
            .entries
            .into_iter()
            .filter(|(_, s)| matches!(s, EntryState::Ready))
            .map(|(a, _)| a)
            .collect())
    }

    /// Drop all entries for a fresh reload. In-flight fetches are not
    /// cancelled; their late results are rejected by `resolve`/`fail`.
    pub fn reset(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;
    use alloc::vec;

    fn pending(title: &str) -> ArtworkSpec {
        ArtworkSpec::new(title).image(ImageSource::Pending {
            url: String::from("https://example.com/") + title,
        })
    }

    #[test]
    fn local_images_are_ready_immediately() {
        let batch = LoadBatch::new(vec![
            ArtworkSpec::new("a").image(ImageSource::Loaded {
                width: 10,
                height: 10,
            }),
            ArtworkSpec::new("b"),
        ]);
        assert!(batch.is_complete());
        assert_eq!(batch.finish().unwrap().len(), 2);
    }

    #[test]
    fn gate_holds_until_every_load_resolves() {
        let mut batch = LoadBatch::new(vec![pending("a"), pending("b"), pending("c")]);
        assert_eq!(batch.remaining(), 3);
        assert!(batch.resolve(2, 300, 200));
        assert_eq!(batch.finish_ref(), Err(LoadError::Pending { remaining: 2 }));
        assert!(batch.fail(0, LoadFailure::Transport));
        assert!(batch.resolve(1, 100, 400));
        assert!(batch.is_complete());
        assert_eq!(batch.failed(), 1);
        let ready = batch.finish().unwrap();
        let titles: Vec<_> = ready.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, ["b", "c"]);
        assert_eq!(ready[1].image.aspect_ratio(), Some(1.5));
    }

    #[test]
    fn finish_errors_while_pending() {
        let batch = LoadBatch::new(vec![pending("a")]);
        assert_eq!(
            batch.finish().unwrap_err(),
            LoadError::Pending { remaining: 1 }
        );
    }

    #[test]
    fn late_or_duplicate_reports_are_rejected() {
        let mut batch = LoadBatch::new(vec![pending("a")]);
        assert!(batch.fail(0, LoadFailure::Timeout));
        assert!(!batch.resolve(0, 10, 10));
        assert!(!batch.fail(0, LoadFailure::Timeout));
        assert!(!batch.resolve(7, 10, 10));
        batch.reset();
        assert!(batch.is_empty());
        assert!(!batch.resolve(0, 10, 10));
    }

    #[test]
    fn zero_sized_decode_counts_as_failure() {
        let mut batch = LoadBatch::new(vec![pending("a")]);
        assert!(batch.resolve(0, 0, 10));
        assert_eq!(batch.failed(), 1);
        assert!(batch.finish().unwrap().is_empty());
    }

    #[test]
    fn pending_lists_urls() {
        let batch = LoadBatch::new(vec![pending("a"), ArtworkSpec::new("local"), pending("c")]);
        let urls: Vec<_> = batch.pending().collect();
        assert_eq!(
            urls,
            [(0, "https://example.com/a"), (2, "https://example.com/c")]
        );
    }

    #[test]
    fn batch_carries_its_config() {
        let batch = LoadBatch::new(vec![pending("a")]);
        assert_eq!(batch.config().request_timeout, Duration::from_secs(30));

        let config = LoadConfig {
            request_timeout: Duration::from_secs(5),
        };
        let mut batch = LoadBatch::with_config(vec![pending("a")], config);
        assert_eq!(batch.config(), &config);
        // Timeouts come back as failures and are not retried.
        assert!(batch.fail(0, LoadFailure::Timeout));
        assert!(batch.finish().unwrap().is_empty());
    }
}
