use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Catalog item kinds the sweeper knows how to name and match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Movie,
    Episode,
}

impl ItemKind {
    /// Name used by the remote service for this kind (`IncludeItemTypes`, `Type`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Movie => "Movie",
            ItemKind::Episode => "Episode",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "movie" => Ok(ItemKind::Movie),
            "episode" => Ok(ItemKind::Episode),
            other => Err(format!("unknown item kind `{}` (expected Movie or Episode)", other)),
        }
    }
}

/// A watched catalog entry as seen by one sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: String,
    pub kind: ItemKind,
    pub name: String,
    pub series_name: Option<String>, // Episode only
    pub production_year: Option<i32>, // Movie only
    pub last_watched: Option<DateTime<Utc>>,
    pub deletable: Option<bool>,
}

impl MediaItem {
    /// Name used in log lines and for ordering candidates.
    ///
    /// Episodes render as `"{series} - {name}"`, movies as `"{name} - {year}"`.
    /// A missing series or year drops the prefix/suffix rather than printing a blank.
    pub fn formatted_name(&self) -> String {
        match self.kind {
            ItemKind::Episode => match &self.series_name {
                Some(series) => format!("{} - {}", series, self.name),
                None => self.name.clone(),
            },
            ItemKind::Movie => match self.production_year {
                Some(year) => format!("{} - {}", self.name, year),
                None => self.name.clone(),
            },
        }
    }

    /// Value the ignore rules are tested against: series for episodes, title for movies.
    pub fn matching_key(&self) -> &str {
        match self.kind {
            ItemKind::Episode => self.series_name.as_deref().unwrap_or(""),
            ItemKind::Movie => &self.name,
        }
    }

    /// Absence of the flag means the server did not forbid deletion.
    pub fn is_deletable(&self) -> bool {
        self.deletable.unwrap_or(true)
    }
}
