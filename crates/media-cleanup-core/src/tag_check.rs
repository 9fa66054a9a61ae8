use media_cleanup_models::{LibraryRecord, MediaKind};
use media_cleanup_sources::LibraryService;
use tracing::{debug, warn};

/// Outcome of asking a library service whether a title is marked temporary
#[derive(Debug, Clone, PartialEq)]
pub enum TagCheck {
    Temporary(LibraryRecord),
    NotTagged,
    NotFound,
    LookupFailed,
}

impl TagCheck {
    pub fn is_temporary(&self) -> bool {
        matches!(self, TagCheck::Temporary(_))
    }

    pub fn into_record(self) -> Option<LibraryRecord> {
        match self {
            TagCheck::Temporary(record) => Some(record),
            _ => None,
        }
    }
}

/// Look up `external_id` and report whether its record carries `temp_tag_id`.
///
/// Never fails: a lookup error is logged and reported as [`TagCheck::LookupFailed`],
/// which callers treat the same as an untagged title.
pub async fn check_temporary(
    service: &dyn LibraryService,
    kind: MediaKind,
    external_id: u32,
    temp_tag_id: u32,
    title: &str,
) -> TagCheck {
    let records = match service.lookup_by_external_id(external_id).await {
        Ok(records) => records,
        Err(e) => {
            warn!(
                operation = "tag_check",
                service = kind.service_name(),
                title = %title,
                error = %e,
                "Lookup of {} {}:{} failed, keeping it",
                kind,
                kind.id_provider(),
                external_id
            );
            return TagCheck::LookupFailed;
        }
    };

    let Some(record) = records.into_iter().next() else {
        debug!("{}: not found in {}", title, kind.service_name());
        return TagCheck::NotFound;
    };

    if record.has_tag(temp_tag_id) {
        debug!("{}: tagged temporary (tag {})", title, temp_tag_id);
        TagCheck::Temporary(record)
    } else {
        debug!("{}: not tagged temporary, kept", title);
        TagCheck::NotTagged
    }
}

pub async fn is_marked_temporary(
    service: &dyn LibraryService,
    kind: MediaKind,
    external_id: u32,
    temp_tag_id: u32,
    title: &str,
) -> bool {
    check_temporary(service, kind, external_id, temp_tag_id, title)
        .await
        .is_temporary()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{record, FakeLibrary};
    use media_cleanup_models::SeriesStatus;

    #[tokio::test]
    async fn test_tagged_record_is_temporary() {
        let library = FakeLibrary::new(MediaKind::Series)
            .with_record(100, record(7, "Show", SeriesStatus::Continuing, &[3, 9]));

        let check = check_temporary(&library, MediaKind::Series, 100, 9, "Show").await;
        assert_eq!(check, TagCheck::Temporary(record(7, "Show", SeriesStatus::Continuing, &[3, 9])));
        assert_eq!(library.lookups(), vec![100]);
    }

    #[tokio::test]
    async fn test_missing_tag_is_kept() {
        let library = FakeLibrary::new(MediaKind::Movie)
            .with_record(5, record(1, "Film", SeriesStatus::default(), &[3]));

        assert_eq!(check_temporary(&library, MediaKind::Movie, 5, 9, "Film").await, TagCheck::NotTagged);
        assert!(!is_marked_temporary(&library, MediaKind::Movie, 5, 9, "Film").await);
    }

    #[tokio::test]
    async fn test_unknown_title_is_not_found() {
        let library = FakeLibrary::new(MediaKind::Movie);
        assert_eq!(check_temporary(&library, MediaKind::Movie, 5, 9, "Film").await, TagCheck::NotFound);
    }

    #[tokio::test]
    async fn test_lookup_failure_fails_closed() {
        let library = FakeLibrary::new(MediaKind::Series).failing_lookups();

        let check = check_temporary(&library, MediaKind::Series, 100, 9, "Show").await;
        assert_eq!(check, TagCheck::LookupFailed);
        assert!(!is_marked_temporary(&library, MediaKind::Series, 100, 9, "Show").await);
    }

    #[tokio::test]
    async fn test_only_first_record_considered() {
        let library = FakeLibrary::new(MediaKind::Series)
            .with_record(100, record(1, "First", SeriesStatus::Ended, &[]))
            .with_record(100, record(2, "Second", SeriesStatus::Ended, &[9]));

        assert_eq!(check_temporary(&library, MediaKind::Series, 100, 9, "Show").await, TagCheck::NotTagged);
    }
}
