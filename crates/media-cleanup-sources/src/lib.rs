pub mod arr;
pub mod error;
pub mod traits;
pub mod trakt;

pub use arr::ArrClient;
pub use error::SourceError;
pub use traits::{LibraryService, TokenSource, WatchHistorySource};
pub use trakt::{authorization_url, OAuthApp, TokenManager, TraktClient};
