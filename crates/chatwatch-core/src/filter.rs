//! Batch filtering of fetched chat messages.

use crate::types::RawMessage;

/// Retain the maximal suffix of `messages` published strictly after
/// `threshold`.
///
/// Precondition: `messages` is ordered ascending by `published_at` — a
/// guarantee of the chat API, not re-verified here. Boundary-equal messages
/// are excluded: once a message at time T is persisted, the next
/// invocation's threshold is ≥ T and a re-fetched copy falls out here,
/// which is the whole de-duplication mechanism.
#[must_use]
pub fn filter_by_threshold(mut messages: Vec<RawMessage>, threshold: i64) -> Vec<RawMessage> {
    match messages.iter().position(|m| m.published_at > threshold) {
        Some(first_new) => messages.split_off(first_new),
        None => Vec::new(),
    }
}

/// Partition messages by author allow-list, preserving order on both sides.
#[must_use]
pub fn separate_by_allowlist(
    messages: Vec<RawMessage>,
    allowed_author_ids: &[String],
) -> (Vec<RawMessage>, Vec<RawMessage>) {
    messages
        .into_iter()
        .partition(|m| allowed_author_ids.iter().any(|id| id == &m.author_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(author: &str, text: &str, published_at: i64) -> RawMessage {
        RawMessage {
            author_id: author.to_string(),
            text: text.to_string(),
            published_at,
            source_id: "src-1".to_string(),
        }
    }

    #[test]
    fn threshold_boundary_is_excluded() {
        let messages = vec![
            message("u1", "a", 10),
            message("u2", "b", 20),
            message("u3", "c", 30),
        ];
        let filtered = filter_by_threshold(messages, 20);
        assert_eq!(filtered, vec![message("u3", "c", 30)]);
    }

    #[test]
    fn threshold_below_all_keeps_everything() {
        let messages = vec![message("u1", "a", 10), message("u2", "b", 20)];
        let filtered = filter_by_threshold(messages.clone(), 5);
        assert_eq!(filtered, messages);
    }

    #[test]
    fn threshold_above_all_yields_empty() {
        let messages = vec![message("u1", "a", 10), message("u2", "b", 20)];
        assert!(filter_by_threshold(messages, 30).is_empty());
    }

    #[test]
    fn empty_input_yields_empty() {
        assert!(filter_by_threshold(Vec::new(), 0).is_empty());
    }

    #[test]
    fn refiltering_at_previous_max_is_idempotent() {
        // Re-running the filter with the previous pass's maximum retained
        // published_at as the threshold must admit nothing — the watermark
        // advance that prevents duplicate persistence.
        let messages = vec![
            message("u1", "a", 10),
            message("u2", "b", 20),
            message("u3", "c", 30),
        ];
        let first_pass = filter_by_threshold(messages, 15);
        let new_watermark = first_pass.last().unwrap().published_at;
        let second_pass = filter_by_threshold(first_pass, new_watermark);
        assert!(second_pass.is_empty());
    }

    #[test]
    fn allowlist_partition_is_stable() {
        let messages = vec![
            message("target", "1", 10),
            message("other", "2", 20),
            message("target", "3", 30),
        ];
        let allowed = vec!["target".to_string()];
        let (matched, unmatched) = separate_by_allowlist(messages, &allowed);
        assert_eq!(
            matched.iter().map(|m| m.text.as_str()).collect::<Vec<_>>(),
            vec!["1", "3"]
        );
        assert_eq!(
            unmatched.iter().map(|m| m.text.as_str()).collect::<Vec<_>>(),
            vec!["2"]
        );
    }

    #[test]
    fn empty_allowlist_matches_nothing() {
        let messages = vec![message("u1", "a", 10)];
        let (matched, unmatched) = separate_by_allowlist(messages, &[]);
        assert!(matched.is_empty());
        assert_eq!(unmatched.len(), 1);
    }
}
