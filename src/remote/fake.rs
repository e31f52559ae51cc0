use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::RemoteError;
use crate::remote::{RemoteItem, RemoteUser, Session};
use crate::types::ItemKind;

/// In-memory session that records every call it receives.
#[derive(Default)]
pub(crate) struct FakeSession {
    pub(crate) users: Vec<RemoteUser>,
    pub(crate) items: Vec<RemoteItem>,
    pub(crate) fail_query: Option<u16>,
    pub(crate) delete_failures: HashMap<String, (u16, String)>,
    pub(crate) queried: Mutex<Vec<(String, Vec<ItemKind>)>>,
    pub(crate) deleted: Mutex<Vec<String>>,
}

impl FakeSession {
    pub(crate) fn with_items(items: Vec<RemoteItem>) -> Self {
        Self { users: vec![user("u1", "admin")], items, ..Default::default() }
    }

    pub(crate) fn fail_delete(mut self, id: &str, status: u16, message: &str) -> Self {
        self.delete_failures.insert(id.to_string(), (status, message.to_string()));
        self
    }

    pub(crate) fn delete_calls(&self) -> Vec<String> {
        self.deleted.lock().map(|d| d.clone()).unwrap_or_default()
    }
}

pub(crate) fn user(id: &str, name: &str) -> RemoteUser {
    RemoteUser { id: id.to_string(), name: name.to_string() }
}

#[async_trait]
impl Session for FakeSession {
    async fn list_users(&self) -> Result<Vec<RemoteUser>, RemoteError> {
        Ok(self.users.clone())
    }

    async fn query_watched_items(
        &self,
        user_id: &str,
        kinds: &BTreeSet<ItemKind>,
    ) -> Result<Vec<RemoteItem>, RemoteError> {
        self.queried.lock().unwrap().push((user_id.to_string(), kinds.iter().copied().collect()));
        if let Some(status) = self.fail_query {
            return Err(RemoteError::Status { status, message: "query rejected".into() });
        }
        Ok(self.items.clone())
    }

    async fn delete_item(&self, item_id: &str) -> Result<(), RemoteError> {
        self.deleted.lock().unwrap().push(item_id.to_string());
        match self.delete_failures.get(item_id) {
            Some((status, message)) => Err(RemoteError::Status { status: *status, message: message.clone() }),
            None => Ok(()),
        }
    }
}

pub(crate) fn remote_movie(id: &str, name: &str, year: i32, watched: Option<chrono::DateTime<chrono::Utc>>) -> RemoteItem {
    RemoteItem {
        id: id.to_string(),
        name: Some(name.to_string()),
        kind: "Movie".into(),
        production_year: Some(year),
        user_data: Some(crate::remote::RemoteUserData { last_played_date: watched }),
        ..Default::default()
    }
}

pub(crate) fn remote_episode(id: &str, series: &str, name: &str, watched: Option<chrono::DateTime<chrono::Utc>>) -> RemoteItem {
    RemoteItem {
        id: id.to_string(),
        name: Some(name.to_string()),
        kind: "Episode".into(),
        series_name: Some(series.to_string()),
        user_data: Some(crate::remote::RemoteUserData { last_played_date: watched }),
        ..Default::default()
    }
}
