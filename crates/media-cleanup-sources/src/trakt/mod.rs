pub mod api;
pub mod auth;
pub mod client;
pub mod tokens;

pub use auth::{authorization_url, create_trakt_client, OAuthApp};
pub use client::TraktClient;
pub use tokens::TokenManager;
