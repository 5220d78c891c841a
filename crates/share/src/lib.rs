//! Posting finished artwork
//!
//! The canvas only produces snapshots. Sharing one is an injected
//! asynchronous capability the glue awaits; [`SimulatedPost`] stands in for
//! a real service.

mod simulated;

pub use simulated::SimulatedPost;

use serde::{Deserialize, Serialize};
use sumi_config::{ConfigError, PreferenceStore};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum PostError {
    #[error("A title is required")]
    MissingTitle,

    #[error("An artist name is required")]
    MissingArtist,

    #[error("No snapshot to post")]
    NoSnapshot,

    #[error("Failed to remember artist name: {0}")]
    Preferences(#[from] ConfigError),

    #[error("Cancelled")]
    Cancelled,
}

/// Caption attached to a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostMetadata {
    pub title: String,
    pub artist: String,
}

/// A validated post ready for a backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRequest {
    pub metadata: PostMetadata,
    /// `data:image/jpeg;base64,...`
    pub image_data_uri: String,
}

/// What the backend reports after a successful post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostReceipt {
    pub post_id: String,
    pub metadata: PostMetadata,
}

/// Trait for posting backends
#[allow(async_fn_in_trait)]
pub trait PostBackend {
    /// Publish one image with its caption
    async fn post(&mut self, request: PostRequest) -> Result<PostReceipt, PostError>;

    /// Cancel the post in flight
    fn cancel(&mut self);

    /// Check if a post is in flight
    fn is_posting(&self) -> bool;
}

/// Validate the compose form and build a request
///
/// Title and artist are trimmed and must be non-empty, and a snapshot must
/// exist. On success the artist name is remembered in `store` so the next
/// compose form is prefilled.
pub fn compose_post(
    store: &dyn PreferenceStore,
    title: &str,
    artist: &str,
    snapshot: Option<&str>,
) -> Result<PostRequest, PostError> {
    let title = title.trim();
    let artist = artist.trim();
    if title.is_empty() {
        return Err(PostError::MissingTitle);
    }
    if artist.is_empty() {
        return Err(PostError::MissingArtist);
    }
    let image_data_uri = snapshot
        .filter(|uri| !uri.is_empty())
        .ok_or(PostError::NoSnapshot)?;

    if store.artist_name() != artist {
        store.set_artist_name(artist)?;
        debug!("compose_post: remembered artist {:?}", artist);
    }

    Ok(PostRequest {
        metadata: PostMetadata {
            title: title.to_string(),
            artist: artist.to_string(),
        },
        image_data_uri: image_data_uri.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sumi_config::MemoryStore;

    const URI: &str = "data:image/jpeg;base64,/9j/4AAQ";

    #[test]
    fn test_compose_remembers_artist() {
        let store = MemoryStore::new();
        let request = compose_post(&store, " Spring ", "Kōsetsu", Some(URI)).unwrap();

        assert_eq!(request.metadata.title, "Spring");
        assert_eq!(request.image_data_uri, URI);
        assert_eq!(store.artist_name(), "Kōsetsu");
    }

    #[test]
    fn test_compose_requires_fields() {
        let store = MemoryStore::new();
        assert!(matches!(
            compose_post(&store, "  ", "A", Some(URI)),
            Err(PostError::MissingTitle)
        ));
        assert!(matches!(
            compose_post(&store, "T", "", Some(URI)),
            Err(PostError::MissingArtist)
        ));
        assert!(matches!(
            compose_post(&store, "T", "A", None),
            Err(PostError::NoSnapshot)
        ));
        // Failed validation does not touch the stored name
        assert_eq!(store.artist_name(), "");
    }
}
