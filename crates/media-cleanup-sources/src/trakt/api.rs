use crate::error::{decode_json, ensure_success, SourceError};
use chrono::{DateTime, Utc};
use media_cleanup_models::{MediaKind, WatchedEpisode, WatchedItem, WatchedSeason};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

pub(crate) const WATCHED_SHOWS_URL: &str = "https://api.trakt.tv/users/me/watched/shows";
pub(crate) const WATCHED_MOVIES_URL: &str = "https://api.trakt.tv/users/me/watched/movies";

#[derive(Debug, Clone, Deserialize)]
pub struct TraktIds {
    pub trakt: Option<u64>,
    pub slug: Option<String>,
    pub imdb: Option<String>,
    pub tmdb: Option<u32>,
    pub tvdb: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct TraktShow {
    title: String,
    year: Option<u32>,
    ids: TraktIds,
}

#[derive(Debug, Deserialize)]
struct TraktMovie {
    title: String,
    year: Option<u32>,
    ids: TraktIds,
}

#[derive(Debug, Deserialize)]
struct TraktSeason {
    number: u32,
    #[serde(default)]
    episodes: Vec<TraktSeasonEpisode>,
}

#[derive(Debug, Deserialize)]
struct TraktSeasonEpisode {
    number: u32,
}

#[derive(Debug, Deserialize)]
struct WatchedShowEntry {
    last_watched_at: Option<String>,
    last_collected_at: Option<String>,
    show: TraktShow,
    #[serde(default)]
    seasons: Vec<TraktSeason>,
}

#[derive(Debug, Deserialize)]
struct WatchedMovieEntry {
    last_watched_at: Option<String>,
    last_collected_at: Option<String>,
    movie: TraktMovie,
}

/// Parse an RFC 3339 timestamp; malformed values become `None`
fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?;
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => Some(dt.with_timezone(&Utc)),
        Err(e) => {
            debug!("Ignoring malformed Trakt timestamp {:?}: {}", raw, e);
            None
        }
    }
}

fn show_to_item(entry: WatchedShowEntry) -> Option<WatchedItem> {
    let Some(tvdb) = entry.show.ids.tvdb else {
        debug!("Trakt watched shows: skipping {} (no TVDB id)", entry.show.title);
        return None;
    };

    let seasons = entry
        .seasons
        .into_iter()
        .map(|season| WatchedSeason {
            number: season.number,
            episodes: season
                .episodes
                .into_iter()
                .map(|e| WatchedEpisode { number: e.number })
                .collect(),
        })
        .collect();

    Some(WatchedItem {
        kind: MediaKind::Series,
        external_id: tvdb,
        title: entry.show.title,
        year: entry.show.year,
        last_watched_at: parse_timestamp(entry.last_watched_at.as_deref()),
        last_collected_at: parse_timestamp(entry.last_collected_at.as_deref()),
        seasons,
    })
}

fn movie_to_item(entry: WatchedMovieEntry) -> Option<WatchedItem> {
    let Some(tmdb) = entry.movie.ids.tmdb else {
        debug!("Trakt watched movies: skipping {} (no TMDB id)", entry.movie.title);
        return None;
    };

    Some(WatchedItem {
        kind: MediaKind::Movie,
        external_id: tmdb,
        title: entry.movie.title,
        year: entry.movie.year,
        last_watched_at: parse_timestamp(entry.last_watched_at.as_deref()),
        last_collected_at: parse_timestamp(entry.last_collected_at.as_deref()),
        seasons: Vec::new(),
    })
}

async fn trakt_get(
    client: &Client,
    url: &str,
    access_token: &str,
    client_id: &str,
) -> Result<reqwest::Response, SourceError> {
    let response = client
        .get(url)
        .header("Authorization", format!("Bearer {}", access_token))
        .header("trakt-api-version", "2")
        .header("trakt-api-key", client_id)
        .header("Accept", "application/json")
        .header("Content-Type", "application/json")
        .send()
        .await?;
    Ok(response)
}

/// Fetch watched shows from Trakt
pub async fn get_watched_shows(
    client: &Client,
    access_token: &str,
    client_id: &str,
) -> Result<Vec<WatchedItem>, SourceError> {
    let response = trakt_get(client, WATCHED_SHOWS_URL, access_token, client_id).await?;
    let response = ensure_success(response, "Fetch watched shows").await?;
    let entries: Vec<WatchedShowEntry> = decode_json(response, "watched shows").await?;
    let total = entries.len();
    let items: Vec<WatchedItem> = entries.into_iter().filter_map(show_to_item).collect();
    debug!("Fetched Trakt watched shows: total={}, usable={}", total, items.len());
    Ok(items)
}

/// Fetch watched movies from Trakt
pub async fn get_watched_movies(
    client: &Client,
    access_token: &str,
    client_id: &str,
) -> Result<Vec<WatchedItem>, SourceError> {
    let response = trakt_get(client, WATCHED_MOVIES_URL, access_token, client_id).await?;
    let response = ensure_success(response, "Fetch watched movies").await?;
    let entries: Vec<WatchedMovieEntry> = decode_json(response, "watched movies").await?;
    let total = entries.len();
    let items: Vec<WatchedItem> = entries.into_iter().filter_map(movie_to_item).collect();
    debug!("Fetched Trakt watched movies: total={}, usable={}", total, items.len());
    Ok(items)
}
