//! Sonarr and Radarr library clients.
//!
//! Both services speak the same v3 REST dialect; a single [`ArrClient`]
//! parameterized by [`MediaKind`](media_cleanup_models::MediaKind) covers both.

mod api;
mod client;

pub use client::ArrClient;
