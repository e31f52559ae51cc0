use std::sync::Arc;

use crate::error::DeletionError;
use crate::remote::Session;
use crate::sink::LogSink;
use crate::types::MediaItem;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeletionTally {
    pub deleted: usize,
    pub failed: usize,
}

/// Deletes candidates one at a time. A failed item is logged and counted, never fatal.
pub struct DeletionExecutor {
    sink: Arc<dyn LogSink>,
    dry_run: bool,
}

impl DeletionExecutor {
    pub fn new(sink: Arc<dyn LogSink>, dry_run: bool) -> Self {
        Self { sink, dry_run }
    }

    pub async fn run(&self, session: &dyn Session, candidates: &[MediaItem]) -> DeletionTally {
        let mut tally = DeletionTally::default();
        for item in candidates {
            let name = item.formatted_name();
            if self.dry_run {
                self.sink.info(&format!("Picked - {}", name));
                continue;
            }
            match self.delete_one(session, item).await {
                Ok(()) => {
                    self.sink.info(&format!("Deleted - {}", name));
                    tally.deleted += 1;
                }
                Err(e) => {
                    self.sink.error(&format!("Could not delete {}: {}", name, e));
                    tally.failed += 1;
                }
            }
        }
        tally
    }

    async fn delete_one(&self, session: &dyn Session, item: &MediaItem) -> Result<(), DeletionError> {
        if !item.is_deletable() {
            return Err(DeletionError::NotDeletable);
        }
        session.delete_item(&item.id).await?;
        Ok(())
    }
}
