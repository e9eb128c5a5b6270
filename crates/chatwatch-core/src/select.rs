//! Priority selection: which sources get polled this invocation.
//!
//! The external chat API has a daily quota, so an invocation polls either
//! the currently live broadcasts (chat activity concentrates there) or, when
//! nothing is live, exactly one upcoming broadcast chosen to balance polling
//! across the whole upcoming set over successive invocations.

use std::collections::HashMap;

use thiserror::Error;

use crate::types::{Source, SourceStatus};

/// Outcome of priority selection for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// One or more live broadcasts; all of them are polled and every
    /// upcoming source is skipped.
    Live(Vec<Source>),
    /// No live broadcast; poll this single upcoming source. `watermark` is
    /// the source's last persisted `published_at` in unix seconds, or 0 when
    /// the source has never been ingested (unbounded catch-up fetch).
    Upcoming { source: Source, watermark: i64 },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectError {
    #[error("no live or upcoming sources to poll")]
    NoCandidates,
}

/// Pick the poll targets for this invocation.
///
/// Live sources take absolute precedence. Among upcoming sources, a source
/// with no watermark wins (first-seen priority); otherwise the source with
/// the oldest watermark — the one that has gone longest without a refresh —
/// is chosen. All ties break on lexicographically smallest `source_id` so
/// the selection is a pure function of its inputs.
///
/// # Errors
///
/// Returns [`SelectError::NoCandidates`] when there is nothing to poll;
/// the caller decides whether that is a no-op success.
pub fn select_targets(
    sources: &[Source],
    watermarks: &HashMap<String, i64>,
) -> Result<Selection, SelectError> {
    let live: Vec<Source> = sources
        .iter()
        .filter(|s| s.status == SourceStatus::Live)
        .cloned()
        .collect();
    if !live.is_empty() {
        return Ok(Selection::Live(live));
    }

    let mut upcoming: Vec<&Source> = sources
        .iter()
        .filter(|s| s.status == SourceStatus::Upcoming)
        .collect();
    if upcoming.is_empty() {
        return Err(SelectError::NoCandidates);
    }
    upcoming.sort_by(|a, b| a.source_id.cmp(&b.source_id));

    // First-seen priority: a source that has never been ingested needs an
    // unbounded catch-up fetch before fairness matters.
    if let Some(fresh) = upcoming
        .iter()
        .find(|s| !watermarks.contains_key(&s.source_id))
    {
        return Ok(Selection::Upcoming {
            source: (*fresh).clone(),
            watermark: 0,
        });
    }

    // All candidates have watermarks; stale-first keeps polling frequency
    // balanced across the upcoming set. The sort above makes min_by_key
    // resolve watermark ties to the smallest source_id.
    let oldest = upcoming
        .iter()
        .min_by_key(|s| watermarks[&s.source_id])
        .copied()
        .cloned();
    match oldest {
        Some(source) => {
            let watermark = watermarks[&source.source_id];
            Ok(Selection::Upcoming { source, watermark })
        }
        None => Err(SelectError::NoCandidates),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(id: &str, status: SourceStatus) -> Source {
        Source {
            source_id: id.to_string(),
            chat_id: format!("chat-{id}"),
            status,
        }
    }

    #[test]
    fn live_sources_preempt_upcoming_entirely() {
        let sources = vec![
            source("up-a", SourceStatus::Upcoming),
            source("live-1", SourceStatus::Live),
            source("up-b", SourceStatus::Upcoming),
        ];
        let selection = select_targets(&sources, &HashMap::new()).unwrap();
        match selection {
            Selection::Live(live) => {
                assert_eq!(live.len(), 1);
                assert_eq!(live[0].source_id, "live-1");
            }
            Selection::Upcoming { .. } => panic!("expected live selection"),
        }
    }

    #[test]
    fn all_live_sources_are_selected_together() {
        let sources = vec![
            source("live-1", SourceStatus::Live),
            source("live-2", SourceStatus::Live),
        ];
        let selection = select_targets(&sources, &HashMap::new()).unwrap();
        assert!(matches!(selection, Selection::Live(ref live) if live.len() == 2));
    }

    #[test]
    fn oldest_watermark_wins_among_upcoming() {
        let sources = vec![
            source("A", SourceStatus::Upcoming),
            source("B", SourceStatus::Upcoming),
        ];
        let watermarks = HashMap::from([("A".to_string(), 100), ("B".to_string(), 50)]);
        let selection = select_targets(&sources, &watermarks).unwrap();
        assert_eq!(
            selection,
            Selection::Upcoming {
                source: source("B", SourceStatus::Upcoming),
                watermark: 50,
            }
        );
    }

    #[test]
    fn missing_watermark_takes_first_seen_priority() {
        let sources = vec![
            source("seen", SourceStatus::Upcoming),
            source("never", SourceStatus::Upcoming),
        ];
        let watermarks = HashMap::from([("seen".to_string(), 10)]);
        let selection = select_targets(&sources, &watermarks).unwrap();
        assert_eq!(
            selection,
            Selection::Upcoming {
                source: source("never", SourceStatus::Upcoming),
                watermark: 0,
            }
        );
    }

    #[test]
    fn missing_watermark_ties_break_lexicographically() {
        let sources = vec![
            source("zz", SourceStatus::Upcoming),
            source("aa", SourceStatus::Upcoming),
        ];
        let selection = select_targets(&sources, &HashMap::new()).unwrap();
        assert!(
            matches!(selection, Selection::Upcoming { ref source, .. } if source.source_id == "aa")
        );
    }

    #[test]
    fn equal_watermark_ties_break_lexicographically() {
        let sources = vec![
            source("beta", SourceStatus::Upcoming),
            source("alpha", SourceStatus::Upcoming),
            source("gamma", SourceStatus::Upcoming),
        ];
        let watermarks = HashMap::from([
            ("alpha".to_string(), 30),
            ("beta".to_string(), 30),
            ("gamma".to_string(), 99),
        ]);
        let selection = select_targets(&sources, &watermarks).unwrap();
        assert_eq!(
            selection,
            Selection::Upcoming {
                source: source("alpha", SourceStatus::Upcoming),
                watermark: 30,
            }
        );
    }

    #[test]
    fn single_remaining_candidate_is_picked() {
        let sources = vec![source("only", SourceStatus::Upcoming)];
        let watermarks = HashMap::from([("only".to_string(), 77)]);
        let selection = select_targets(&sources, &watermarks).unwrap();
        assert_eq!(
            selection,
            Selection::Upcoming {
                source: source("only", SourceStatus::Upcoming),
                watermark: 77,
            }
        );
    }

    #[test]
    fn no_candidates_is_an_error_for_the_caller_to_interpret() {
        let sources = vec![source("done", SourceStatus::Other)];
        assert_eq!(
            select_targets(&sources, &HashMap::new()),
            Err(SelectError::NoCandidates)
        );
        assert_eq!(
            select_targets(&[], &HashMap::new()),
            Err(SelectError::NoCandidates)
        );
    }
}
