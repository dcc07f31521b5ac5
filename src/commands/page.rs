//! Page Commands
//!
//! One-shot classification, preview and analysis of a captured page, outside
//! the per-tab scan lifecycle.

use std::fs;
use std::path::Path;

use policy_guardian_core::{Analysis, Detection, PageType};
use tracing::{debug, info};

use crate::models::response::CommandResponse;
use crate::services::heuristics::fallback_summary;
use crate::services::page::PageSnapshot;
use crate::services::scan::CONTENT_UNAVAILABLE_ERROR;
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};

/// Load a captured page from disk.
///
/// `.json` files hold a serialized [`PageSnapshot`]; anything else is read as
/// plain text split on blank lines. `url` and `title` override the values
/// stored in a snapshot.
pub fn load_snapshot(
    path: &Path,
    url: Option<String>,
    title: Option<String>,
) -> AppResult<PageSnapshot> {
    let content = fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let mut snapshot = if is_json {
        serde_json::from_str::<PageSnapshot>(&content)
            .map_err(|e| AppError::validation(format!("{}: {}", path.display(), e)))?
    } else {
        PageSnapshot::from_plain_text("", "", Vec::new(), &content)
    };
    if let Some(url) = url {
        snapshot.url = url;
    }
    if let Some(title) = title {
        snapshot.title = title;
    }
    debug!(
        path = %path.display(),
        blocks = snapshot.blocks.len(),
        "Loaded page snapshot"
    );
    Ok(snapshot)
}

/// Classify a page. `data` is null when the page is not a policy page.
pub fn classify_page(state: &AppState, snapshot: &PageSnapshot) -> CommandResponse<Option<Detection>> {
    let detection = state.classifier().classify_snapshot(snapshot);
    match &detection {
        Some(d) => info!(page_type = %d.page_type, confidence = d.confidence, "Page classified"),
        None => info!(url = %snapshot.url, "Page is not a policy page"),
    }
    CommandResponse::ok(detection)
}

/// Opening sentences of a page, without running an analysis.
pub fn preview_page(state: &AppState, snapshot: &PageSnapshot) -> CommandResponse<String> {
    let structured = snapshot.structured(&state.config().structure);
    if structured.is_empty() {
        return CommandResponse::err(CONTENT_UNAVAILABLE_ERROR);
    }
    CommandResponse::ok(fallback_summary(&structured.text))
}

/// Analyze a page's text directly.
pub async fn analyze_page(
    state: &AppState,
    snapshot: &PageSnapshot,
    page_type: Option<PageType>,
) -> CommandResponse<Analysis> {
    let structured = snapshot.structured(&state.config().structure);
    if structured.is_empty() {
        return CommandResponse::err(CONTENT_UNAVAILABLE_ERROR);
    }
    let page_type = page_type.or_else(|| {
        state
            .classifier()
            .classify_snapshot(snapshot)
            .map(|d| d.page_type)
    });
    let analysis = state
        .orchestrator()
        .run_policy_analysis(&structured.text, page_type)
        .await;
    CommandResponse::ok(analysis)
}
