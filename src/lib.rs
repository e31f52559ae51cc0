pub mod config;
pub mod error;
pub mod executor;
pub mod fetcher;
pub mod filter;
pub mod mapping;
pub mod remote;
pub mod sink;
pub mod summary;
pub mod sweeper;
pub mod types;

// --- Library API for embedding ---

/// Convenience re-exports for embedders.
pub mod prelude {
    pub use crate::config::{ConnectionSettings, Credentials, FileConfig, RetentionPolicy, Settings, UnknownKindPolicy};
    pub use crate::error::{DeletionError, RemoteError, SweepError};
    pub use crate::remote::{JellyfinProvider, Session, SessionProvider};
    pub use crate::sink::{CaptureSink, Level, LogSink, TracingSink};
    pub use crate::summary::RunSummary;
    pub use crate::sweeper::Sweeper;
    pub use crate::types::{ItemKind, MediaItem};
}
