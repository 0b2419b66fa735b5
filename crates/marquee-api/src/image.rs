//! Artwork URL construction.
//!
//! The API only returns relative artwork paths (`/abc123.jpg`); full URLs
//! are built by prefixing the image CDN and a size bucket.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Image CDN root. Size bucket and path are appended directly.
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/";

/// Which artwork family a path belongs to. Each family has its own size table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Poster,
    Backdrop,
    Profile,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ImageSize {
    Small,
    Medium,
    Large,
    #[default]
    Original,
}

impl ImageKind {
    /// CDN size bucket for this kind at the requested size.
    pub fn size_code(self, size: ImageSize) -> &'static str {
        match (self, size) {
            (_, ImageSize::Original) => "original",
            (Self::Poster, ImageSize::Small) | (Self::Profile, ImageSize::Medium) => "w185",
            (Self::Poster, ImageSize::Medium) => "w342",
            (Self::Poster, ImageSize::Large) => "w500",
            (Self::Backdrop, ImageSize::Small) => "w300",
            (Self::Backdrop, ImageSize::Medium) => "w780",
            (Self::Backdrop, ImageSize::Large) => "w1280",
            (Self::Profile, ImageSize::Small) => "w45",
            (Self::Profile, ImageSize::Large) => "h632",
        }
    }
}

/// Full artwork URL, or `None` when the path is absent or blank.
pub fn image_url(path: Option<&str>, kind: ImageKind, size: ImageSize) -> Option<String> {
    let path = path.map(str::trim).filter(|p| !p.is_empty())?;
    let separator = if path.starts_with('/') { "" } else { "/" };
    Some(format!(
        "{IMAGE_BASE_URL}{}{separator}{path}",
        kind.size_code(size)
    ))
}
