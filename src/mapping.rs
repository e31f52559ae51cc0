use crate::error::SweepError;
use crate::remote::RemoteItem;
use crate::types::{ItemKind, MediaItem};

pub fn kind_from_remote(kind: &str) -> Option<ItemKind> {
    match kind {
        "Movie" => Some(ItemKind::Movie),
        "Episode" => Some(ItemKind::Episode),
        _ => None,
    }
}

/// Convert a wire item; fails with `UnsupportedKind` for types the sweeper cannot name.
pub fn media_item_from_remote(item: RemoteItem) -> Result<MediaItem, SweepError> {
    let kind = kind_from_remote(&item.kind).ok_or_else(|| SweepError::UnsupportedKind {
        item_id: item.id.clone(),
        kind: item.kind.clone(),
    })?;
    let last_watched = item.user_data.as_ref().and_then(|u| u.last_played_date);
    Ok(MediaItem {
        id: item.id,
        kind,
        name: item.name.unwrap_or_default(),
        series_name: item.series_name.filter(|_| kind == ItemKind::Episode),
        production_year: item.production_year.filter(|_| kind == ItemKind::Movie),
        last_watched,
        deletable: item.can_delete,
    })
}
