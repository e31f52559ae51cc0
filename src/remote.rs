//! Seam between the sweep pipeline and the catalog server.

pub mod client;
#[cfg(test)]
pub(crate) mod fake;

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ConnectionSettings;
use crate::error::{RemoteError, SweepError};
use crate::types::ItemKind;

pub use client::{JellyfinProvider, JellyfinSession};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RemoteUser {
    pub id: String,
    pub name: String,
}

/// Item as the server reports it. `kind` stays a string so unknown types surface
/// during mapping instead of failing the whole response decode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RemoteItem {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(default)]
    pub series_name: Option<String>,
    #[serde(default)]
    pub production_year: Option<i32>,
    #[serde(default)]
    pub can_delete: Option<bool>,
    #[serde(default)]
    pub user_data: Option<RemoteUserData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RemoteUserData {
    #[serde(default)]
    pub last_played_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemsPage {
    #[serde(default)]
    pub items: Vec<RemoteItem>,
    #[serde(default)]
    pub total_record_count: Option<u64>,
}

/// An authenticated connection. Calls are awaited one at a time by the pipeline.
#[async_trait]
pub trait Session: Send + Sync {
    async fn list_users(&self) -> Result<Vec<RemoteUser>, RemoteError>;

    /// Played items of `kinds` for `user_id`, recursive, oldest watch first.
    async fn query_watched_items(
        &self,
        user_id: &str,
        kinds: &BTreeSet<ItemKind>,
    ) -> Result<Vec<RemoteItem>, RemoteError>;

    async fn delete_item(&self, item_id: &str) -> Result<(), RemoteError>;
}

#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn authenticate(&self, settings: &ConnectionSettings) -> Result<Box<dyn Session>, SweepError>;
}
