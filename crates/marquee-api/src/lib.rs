// marquee-api: Async Rust client for the TMDB movie metadata API (v3)

pub mod client;
pub mod discover;
pub mod error;
pub mod image;
pub mod movies;
pub mod transport;
pub mod types;

pub use client::{Credentials, TmdbClient, DEFAULT_BASE_URL, DEFAULT_LANGUAGE};
pub use discover::DiscoverFilters;
pub use error::Error;
pub use image::{image_url, ImageKind, ImageSize, IMAGE_BASE_URL};
pub use movies::TrendingWindow;
pub use transport::TransportConfig;
