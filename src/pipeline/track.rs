// src/pipeline/track.rs

//! One tracker run: fetch, extract, decide, render, notify, persist.
//!
//! The snapshot is written only after the notifier reports success, so the
//! stored set always matches something that was actually delivered.

use std::fmt;

use crate::error::{AppError, Result};
use crate::models::{Config, Snapshot, TrendPage};
use crate::services::{Notification, Notifier, Renderer, TrendExtractor, TrendSource};
use crate::storage::SnapshotStore;
use crate::utils::metric::top_by_metric;

use super::diff::{TrendDiff, should_notify};

/// Options for a single run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Send even when the trend set is unchanged.
    pub force: bool,
}

/// Pipeline stage, used to report where a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetching,
    Extracting,
    Deciding,
    Rendering,
    Notifying,
    Persisting,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fetching => "fetch",
            Self::Extracting => "extract",
            Self::Deciding => "decide",
            Self::Rendering => "render",
            Self::Notifying => "notify",
            Self::Persisting => "persist",
        };
        f.write_str(name)
    }
}

/// How a run ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// A notification was sent and the snapshot replaced.
    Delivered { trend_count: usize },
    /// The trend set matched the stored snapshot; nothing was sent.
    Unchanged,
    /// The page had no primary trends.
    NoTrends,
    /// A stage failed; later stages did not run.
    Failed { stage: Stage, error: AppError },
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Delivered { .. } | Self::Unchanged)
    }
}

fn failed(stage: Stage, error: AppError) -> RunOutcome {
    log::error!("[{}] {}", stage, error);
    RunOutcome::Failed { stage, error }
}

/// Fetch and extract the page, tagging a failure with its stage.
async fn load_page(
    source: &dyn TrendSource,
    extractor: &TrendExtractor,
) -> std::result::Result<TrendPage, (Stage, AppError)> {
    log::info!("[{}] {}", Stage::Fetching, source.url());
    let html = source.fetch().await.map_err(|e| (Stage::Fetching, e))?;

    let page = extractor
        .extract(&html)
        .map_err(|e| (Stage::Extracting, e))?;
    log::info!(
        "[{}] {} records ({} primary, {} most active, {} longest trending)",
        Stage::Extracting,
        page.total_count(),
        page.primary.len(),
        page.most_active.len(),
        page.longest_trending.len()
    );
    if !page.published.is_known() {
        log::warn!("[{}] Page carries no publish time", Stage::Extracting);
    }
    Ok(page)
}

/// Render the summary for a page, trimming the most-active list.
fn render_summary(config: &Config, renderer: &Renderer, page: &TrendPage) -> Notification {
    let most_active = top_by_metric(&page.most_active, config.render.most_active_limit);
    Notification {
        subject: config.email.subject(&page.published.short),
        html_body: renderer.render_page(page, &most_active),
    }
}

/// Run the tracker once.
pub async fn run_tracker(
    config: &Config,
    source: &dyn TrendSource,
    extractor: &TrendExtractor,
    store: &dyn SnapshotStore,
    renderer: &Renderer,
    notifier: &dyn Notifier,
    options: RunOptions,
) -> RunOutcome {
    let page = match load_page(source, extractor).await {
        Ok(page) => page,
        Err((stage, e)) => return failed(stage, e),
    };

    if page.primary.is_empty() {
        log::warn!("[{}] No trends found on page", Stage::Extracting);
        return RunOutcome::NoTrends;
    }

    let current = page.primary_names();
    let previous = match store.read_latest().await {
        Ok(previous) => previous,
        Err(e) => {
            log::warn!(
                "[{}] Could not read {}: {}. Treating as first run.",
                Stage::Deciding,
                store.location(),
                e
            );
            None
        }
    };

    let diff = TrendDiff::between(previous.as_ref(), &current);
    if !should_notify(&current, previous.as_ref()) {
        if !options.force {
            log::info!("[{}] Trends unchanged. Skipping notification.", Stage::Deciding);
            return RunOutcome::Unchanged;
        }
        log::info!("[{}] Trends unchanged, sending anyway (forced)", Stage::Deciding);
    } else {
        log::info!(
            "[{}] {} changes ({} added, {} removed)",
            Stage::Deciding,
            diff.change_count(),
            diff.added.len(),
            diff.removed.len()
        );
    }

    let notification = render_summary(config, renderer, &page);
    log::debug!(
        "[{}] {} bytes, subject '{}'",
        Stage::Rendering,
        notification.html_body.len(),
        notification.subject
    );

    if let Err(e) = notifier.notify(&notification).await {
        return failed(Stage::Notifying, e);
    }

    let snapshot = Snapshot::new(current, page.published.long.clone());
    if let Err(e) = store.write_latest(&snapshot).await {
        return failed(Stage::Persisting, e);
    }
    log::info!(
        "[{}] Saved {} trends to {} ({})",
        Stage::Persisting,
        snapshot.trend_names.len(),
        store.location(),
        &snapshot.fingerprint[..12]
    );

    RunOutcome::Delivered {
        trend_count: snapshot.trend_names.len(),
    }
}

/// Fetch, extract and render without sending or persisting.
pub async fn render_preview(
    config: &Config,
    source: &dyn TrendSource,
    extractor: &TrendExtractor,
    renderer: &Renderer,
) -> Result<Notification> {
    let page = load_page(source, extractor).await.map_err(|(_, e)| e)?;
    if page.primary.is_empty() {
        return Err(AppError::validation("no trends found on page"));
    }
    Ok(render_summary(config, renderer, &page))
}
