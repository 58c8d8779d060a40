use serde::{Deserialize, Serialize};

/// Image shown when a card carries none of its own.
pub const DEFAULT_IMAGE_URL: &str = "https://knative.dev/docs/images/logo/rgb/knative-logo-rgb.png";
pub const DEFAULT_IMAGE_ALT: &str = "Knative logo";

/// Image reference attached to a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageData {
    pub url: String,
    pub alt: String,
}

/// A single display record.
///
/// Immutable once constructed. `url` is carried through for renderers and
/// never interpreted by the poller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardData {
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageData>,
}

impl CardData {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            url: None,
            image: None,
        }
    }

    /// The card's image, or the shared default image.
    pub fn image_or_default(&self) -> ImageData {
        self.image.clone().unwrap_or_else(|| ImageData {
            url: DEFAULT_IMAGE_URL.to_string(),
            alt: DEFAULT_IMAGE_ALT.to_string(),
        })
    }
}
