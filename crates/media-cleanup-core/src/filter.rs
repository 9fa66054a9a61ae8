use chrono::{DateTime, Duration, Utc};
use media_cleanup_models::WatchedItem;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidWindow {
    #[error("Watched threshold ({watched_days} days) must not exceed max threshold ({max_days} days)")]
    Inverted { watched_days: u32, max_days: u32 },

    #[error("{days} days before {now} is outside the representable date range")]
    OutOfRange { now: DateTime<Utc>, days: u32 },
}

/// Closed interval of activity timestamps eligible for cleanup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecencyWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl RecencyWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// `[now - max_days, now - watched_days]`
    pub fn from_thresholds(now: DateTime<Utc>, watched_days: u32, max_days: u32) -> Result<Self, InvalidWindow> {
        if watched_days > max_days {
            return Err(InvalidWindow::Inverted { watched_days, max_days });
        }
        Ok(Self {
            start: days_before(now, max_days)?,
            end: days_before(now, watched_days)?,
        })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }
}

fn days_before(now: DateTime<Utc>, days: u32) -> Result<DateTime<Utc>, InvalidWindow> {
    Duration::try_days(i64::from(days))
        .and_then(|span| now.checked_sub_signed(span))
        .ok_or(InvalidWindow::OutOfRange { now, days })
}

/// Keep items whose last activity falls inside the window.
///
/// Items without any usable timestamp never qualify.
pub fn filter_recent(items: Vec<WatchedItem>, window: &RecencyWindow) -> Vec<WatchedItem> {
    items
        .into_iter()
        .filter(|item| match item.last_activity() {
            Some(at) => window.contains(at),
            None => {
                debug!("{}: no watch timestamp, skipping", item.title);
                false
            }
        })
        .collect()
}
