use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::config::RetentionPolicy;
use crate::sink::LogSink;
use crate::types::MediaItem;

/// Outcome of the ignore stage. Both lists keep the age-stage order.
#[derive(Debug, Default)]
pub struct Selection {
    pub candidates: Vec<MediaItem>,
    pub ignored: Vec<MediaItem>,
}

/// Age and ignore-list stages that turn watched items into delete candidates.
pub struct EligibilityFilter {
    sink: Arc<dyn LogSink>,
    retention_days: u32,
    ignore_contains: Vec<String>,
    ignore_equals: Vec<String>,
    print_ignored: bool,
}

impl EligibilityFilter {
    pub fn new(sink: Arc<dyn LogSink>, policy: &RetentionPolicy) -> Self {
        Self {
            sink,
            retention_days: policy.retention_days,
            ignore_contains: policy.ignore_contains.iter().map(|s| s.to_lowercase()).collect(),
            ignore_equals: policy.ignore_equals.iter().map(|s| s.to_lowercase()).collect(),
            print_ignored: policy.print_ignored,
        }
    }

    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_sub_signed(Duration::days(i64::from(self.retention_days)))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Items watched strictly before the cutoff, sorted by formatted name.
    /// Items with no watch date never qualify.
    pub fn age_eligible(&self, items: Vec<MediaItem>, now: DateTime<Utc>) -> Vec<MediaItem> {
        let cutoff = self.cutoff(now);
        let mut keyed: Vec<(String, MediaItem)> = items
            .into_iter()
            .filter(|i| matches!(i.last_watched, Some(t) if t < cutoff))
            .map(|i| (i.formatted_name(), i))
            .collect();
        // stable: equal names keep watch-date order
        keyed.sort_by(|a, b| a.0.cmp(&b.0));
        keyed.into_iter().map(|(_, i)| i).collect()
    }

    pub fn is_ignored(&self, item: &MediaItem) -> bool {
        let key = item.matching_key().to_lowercase();
        self.ignore_contains.iter().any(|c| key.contains(c.as_str()))
            || self.ignore_equals.iter().any(|e| key == *e)
    }

    /// Evaluates every item exactly once; ignore log lines are emitted here and nowhere else.
    pub fn split_ignored(&self, eligible: Vec<MediaItem>) -> Selection {
        let mut selection = Selection::default();
        for item in eligible {
            if self.is_ignored(&item) {
                if self.print_ignored {
                    self.sink.info(&format!("Ignored - {}", item.formatted_name()));
                }
                selection.ignored.push(item);
            } else {
                selection.candidates.push(item);
            }
        }
        selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UnknownKindPolicy;
    use crate::sink::CaptureSink;
    use crate::types::fixtures::{episode, movie};
    use crate::types::ItemKind;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn days_ago(d: i64) -> Option<DateTime<Utc>> {
        Some(now() - Duration::days(d))
    }

    fn policy(contains: &[&str], equals: &[&str], print_ignored: bool) -> RetentionPolicy {
        RetentionPolicy {
            retention_days: 30,
            include_kinds: [ItemKind::Movie, ItemKind::Episode].into_iter().collect(),
            ignore_contains: contains.iter().map(|s| s.to_string()).collect(),
            ignore_equals: equals.iter().map(|s| s.to_string()).collect(),
            dry_run: false,
            print_ignored,
            unknown_kinds: UnknownKindPolicy::Reject,
        }
    }

    fn filter(contains: &[&str], equals: &[&str], print_ignored: bool) -> (EligibilityFilter, Arc<CaptureSink>) {
        let sink = Arc::new(CaptureSink::new());
        (EligibilityFilter::new(sink.clone(), &policy(contains, equals, print_ignored)), sink)
    }

    #[test]
    fn age_threshold_is_strict() {
        let (f, _) = filter(&[], &[], false);
        let items = vec![
            movie("old", "Old", 2000, days_ago(31)),
            movie("edge", "Edge", 2000, Some(f.cutoff(now()))),
            movie("new", "New", 2000, days_ago(5)),
            movie("never", "Never", 2000, None),
        ];
        let eligible = f.age_eligible(items, now());
        assert_eq!(eligible.iter().map(|i| i.id.as_str()).collect::<Vec<_>>(), vec!["old"]);
    }

    #[test]
    fn huge_retention_clamps_cutoff_and_selects_nothing() {
        let sink = Arc::new(CaptureSink::new());
        let mut p = policy(&[], &[], false);
        p.retention_days = u32::MAX;
        let f = EligibilityFilter::new(sink, &p);
        assert_eq!(f.cutoff(now()), DateTime::<Utc>::MIN_UTC);
        let items = vec![
            movie("min", "Ancient", 1, Some(DateTime::<Utc>::MIN_UTC)),
            movie("old", "Old", 1900, Some(Utc.with_ymd_and_hms(1900, 1, 1, 0, 0, 0).unwrap())),
            movie("recent", "Recent", 2024, days_ago(40)),
        ];
        assert!(f.age_eligible(items, now()).is_empty());
    }

    #[test]
    fn orders_by_formatted_name_not_watch_date() {
        let (f, _) = filter(&[], &[], false);
        let items = vec![
            movie("b", "Beta", 2019, days_ago(90)),
            movie("a", "Alpha", 2020, days_ago(40)),
            episode("e", "Show", "Pilot", days_ago(60)),
        ];
        let names: Vec<String> = f.age_eligible(items, now()).iter().map(MediaItem::formatted_name).collect();
        assert_eq!(names, vec!["Alpha - 2020", "Beta - 2019", "Show - Pilot"]);
    }

    #[test]
    fn equals_matches_series_case_insensitively() {
        let (f, _) = filter(&[], &["the office"], false);
        assert!(f.is_ignored(&episode("e", "The Office", "Diversity Day", None)));
        assert!(!f.is_ignored(&episode("e", "The Office (UK)", "Pilot", None)));
        // movies match on title, not series
        assert!(f.is_ignored(&movie("m", "THE OFFICE", 2005, None)));
    }

    #[test]
    fn contains_matches_substrings() {
        let (f, _) = filter(&["Kids"], &[], false);
        assert!(f.is_ignored(&movie("m", "Spy Kids", 2001, None)));
        assert!(f.is_ignored(&episode("e", "The Kids Are Alright", "Pilot", None)));
        assert!(!f.is_ignored(&episode("e", "Show", "Kids episode", None)));
    }

    #[test]
    fn split_keeps_order_and_logs_each_ignored_item_once() {
        let (f, sink) = filter(&["keep"], &[], true);
        let eligible = vec![
            movie("a", "Alpha", 2020, None),
            movie("k", "Keeper", 2010, None),
            movie("z", "Zulu", 2001, None),
        ];
        let selection = f.split_ignored(eligible);
        assert_eq!(selection.candidates.iter().map(|i| i.id.as_str()).collect::<Vec<_>>(), vec!["a", "z"]);
        assert_eq!(selection.ignored.len(), 1);
        assert_eq!(sink.messages(), vec!["Ignored - Keeper - 2010".to_string()]);
    }

    #[test]
    fn quiet_unless_print_ignored() {
        let (f, sink) = filter(&["keep"], &[], false);
        let selection = f.split_ignored(vec![movie("k", "Keeper", 2010, None)]);
        assert_eq!(selection.ignored.len(), 1);
        assert!(sink.messages().is_empty());
    }
}
