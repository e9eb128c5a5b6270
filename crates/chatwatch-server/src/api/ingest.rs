//! The scheduled ingestion endpoint: one sequential unit of work per
//! invocation, idempotent through the persisted watermark alone.

use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chatwatch_core::{
    filter::{filter_by_threshold, separate_by_allowlist},
    select::{select_targets, SelectError, Selection},
    threshold::{parse_span, resolve_threshold},
    Source, SourceStatus,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct IngestQuery {
    pub span: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub(super) struct IngestSummary {
    pub sources_polled: usize,
    pub messages_fetched: usize,
    pub messages_ingested: usize,
    pub negative_count: usize,
}

pub(super) async fn run_ingest(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<IngestQuery>,
) -> Result<Json<ApiResponse<IngestSummary>>, ApiError> {
    let span = parse_span(query.span.as_deref())
        .map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.to_string()))?;
    let now = Utc::now().timestamp();

    let rows = chatwatch_db::list_sources_by_status(
        &state.pool,
        &[SourceStatus::Live, SourceStatus::Upcoming],
    )
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "source listing failed");
        ApiError::new(req_id.0.clone(), "internal_error", "source listing failed")
    })?;
    let sources: Vec<Source> = rows.into_iter().map(Into::into).collect();

    // Per-source watermarks only matter for choosing among upcoming sources.
    let upcoming_ids: Vec<String> = sources
        .iter()
        .filter(|s| s.status == SourceStatus::Upcoming)
        .map(|s| s.source_id.clone())
        .collect();
    let watermarks: HashMap<String, i64> = if upcoming_ids.is_empty() {
        HashMap::new()
    } else {
        chatwatch_db::latest_published_at_by_source(&state.pool, &upcoming_ids)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "watermark query failed");
                ApiError::new(req_id.0.clone(), "internal_error", "watermark query failed")
            })?
    };

    let selection = match select_targets(&sources, &watermarks) {
        Ok(selection) => selection,
        Err(SelectError::NoCandidates) => {
            tracing::info!("no live or upcoming sources; nothing to poll");
            return Ok(Json(ApiResponse {
                data: IngestSummary::default(),
                meta: ResponseMeta::new(req_id.0),
            }));
        }
    };

    let targets: Vec<(Source, Option<i64>)> = match selection {
        Selection::Live(live) => {
            let mark = chatwatch_db::latest_published_at(&state.pool)
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, "watermark query failed");
                    ApiError::new(req_id.0.clone(), "internal_error", "watermark query failed")
                })?;
            live.into_iter().map(|s| (s, mark)).collect()
        }
        Selection::Upcoming { source, watermark } => {
            // Watermark 0 means first-seen: unbounded catch-up fetch.
            let mark = (watermark != 0).then_some(watermark);
            vec![(source, mark)]
        }
    };

    let mut summary = IngestSummary {
        sources_polled: targets.len(),
        ..IngestSummary::default()
    };
    let mut retained = Vec::new();
    for (source, watermark) in targets {
        let threshold = resolve_threshold(span, now, watermark);
        let messages = state
            .chat
            .list_messages(&source.source_id, &source.chat_id, state.chat_max_results)
            .await
            .map_err(|e| {
                tracing::error!(source_id = %source.source_id, error = %e, "live chat fetch failed");
                ApiError::new(req_id.0.clone(), "internal_error", "live chat fetch failed")
            })?;
        summary.messages_fetched += messages.len();

        let fresh = filter_by_threshold(messages, threshold);
        let (matched, unmatched) = separate_by_allowlist(fresh, &state.target_authors);
        tracing::debug!(
            source_id = %source.source_id,
            threshold,
            matched = matched.len(),
            skipped = unmatched.len(),
            "filtered chat batch"
        );
        retained.extend(matched);
    }

    let classified = chatwatch_sentiment::classify(retained, state.scorer.as_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "sentiment classification failed");
            ApiError::new(
                req_id.0.clone(),
                "internal_error",
                "sentiment classification failed",
            )
        })?;
    summary.messages_ingested = classified.len();
    summary.negative_count = classified.iter().filter(|c| c.is_negative).count();

    chatwatch_db::insert_chats(&state.pool, &classified)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "chat insert failed");
            ApiError::new(req_id.0.clone(), "internal_error", "chat insert failed")
        })?;

    tracing::info!(
        sources_polled = summary.sources_polled,
        messages_ingested = summary.messages_ingested,
        negative_count = summary.negative_count,
        "ingestion complete"
    );

    Ok(Json(ApiResponse {
        data: summary,
        meta: ResponseMeta::new(req_id.0),
    }))
}
