use std::collections::BTreeSet;
use std::sync::Arc;

use crate::config::UnknownKindPolicy;
use crate::error::SweepError;
use crate::mapping::media_item_from_remote;
use crate::remote::{RemoteUser, Session};
use crate::sink::LogSink;
use crate::types::{ItemKind, MediaItem};

/// Resolves the configured user and pulls their watched items.
pub struct ItemFetcher {
    sink: Arc<dyn LogSink>,
    unknown_kinds: UnknownKindPolicy,
}

impl ItemFetcher {
    pub fn new(sink: Arc<dyn LogSink>, unknown_kinds: UnknownKindPolicy) -> Self {
        Self { sink, unknown_kinds }
    }

    /// Case-insensitive exact match; zero or several matches are both fatal.
    pub async fn resolve_user(&self, session: &dyn Session, username: &str) -> Result<RemoteUser, SweepError> {
        let wanted = username.to_lowercase();
        let mut matches: Vec<RemoteUser> = session
            .list_users()
            .await
            .map_err(SweepError::UserLookup)?
            .into_iter()
            .filter(|u| u.name.to_lowercase() == wanted)
            .collect();
        if matches.len() != 1 {
            return Err(SweepError::UserNotFound { username: username.to_string(), matches: matches.len() });
        }
        Ok(matches.remove(0))
    }

    /// Watched items in the server's order (watch date ascending).
    pub async fn fetch(
        &self,
        session: &dyn Session,
        user_id: &str,
        kinds: &BTreeSet<ItemKind>,
    ) -> Result<Vec<MediaItem>, SweepError> {
        let raw = session
            .query_watched_items(user_id, kinds)
            .await
            .map_err(SweepError::RemoteQuery)?;

        let mut items = Vec::with_capacity(raw.len());
        for r in raw {
            match media_item_from_remote(r) {
                Ok(item) => items.push(item),
                Err(SweepError::UnsupportedKind { item_id, kind }) if self.unknown_kinds == UnknownKindPolicy::Skip => {
                    self.sink.warn(&format!("Skipping item {} of unsupported kind {}", item_id, kind));
                }
                Err(e) => return Err(e),
            }
        }
        Ok(items)
    }
}
