use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::Settings;
use crate::error::SweepError;
use crate::executor::DeletionExecutor;
use crate::fetcher::ItemFetcher;
use crate::filter::EligibilityFilter;
use crate::remote::{Session, SessionProvider};
use crate::sink::LogSink;
use crate::summary::{RunSummary, SummaryReporter};

/// Sweeper owns the settings and session provider and runs one retention pass.
pub struct Sweeper {
    settings: Settings,
    provider: Box<dyn SessionProvider>,
    sink: Arc<dyn LogSink>,
}

impl Sweeper {
    pub fn new(settings: Settings, provider: Box<dyn SessionProvider>, sink: Arc<dyn LogSink>) -> Self {
        Self { settings, provider, sink }
    }

    pub async fn run(&self) -> Result<RunSummary, SweepError> {
        self.run_at(Utc::now()).await
    }

    /// Authenticate, then sweep with `now` as the reference time.
    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<RunSummary, SweepError> {
        let session = self.provider.authenticate(&self.settings.connection).await?;
        self.sweep(session.as_ref(), now).await
    }

    /// One pass over an already authenticated session. Remote calls are strictly sequential.
    pub async fn sweep(&self, session: &dyn Session, now: DateTime<Utc>) -> Result<RunSummary, SweepError> {
        let policy = &self.settings.policy;
        let fetcher = ItemFetcher::new(self.sink.clone(), policy.unknown_kinds);
        let filter = EligibilityFilter::new(self.sink.clone(), policy);
        let executor = DeletionExecutor::new(self.sink.clone(), policy.dry_run);
        let reporter = SummaryReporter::new(self.sink.clone());

        let user = fetcher.resolve_user(session, &self.settings.connection.username).await?;
        let watched = fetcher.fetch(session, &user.id, &policy.include_kinds).await?;
        tracing::debug!(user = %user.name, watched = watched.len(), cutoff = %filter.cutoff(now), "fetched watched items");

        let eligible = filter.age_eligible(watched, now);
        let picked = eligible.len();
        let selection = filter.split_ignored(eligible);
        tracing::debug!(picked, candidates = selection.candidates.len(), ignored = selection.ignored.len(), "selection ready");

        let tally = executor.run(session, &selection.candidates).await;
        Ok(reporter.report(picked, selection.candidates.len(), tally))
    }
}
