//! Paginated snapshot of a remote board.

use crate::api::BoardApi;
use crate::config::Config;
use crate::errors::AppResult;
use crate::models::BoardItem;
use std::time::Duration;
use tracing::{error, info, warn};

#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub page_size: u32,
    /// Pause between two successful pages.
    pub page_delay: Duration,
    /// Pause before retrying a rate-limited page.
    pub rate_limit_backoff: Duration,
    /// Consecutive rate-limit retries of one page before giving up.
    pub max_rate_limit_retries: u32,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            page_size: 500,
            page_delay: Duration::from_secs(1),
            rate_limit_backoff: Duration::from_secs(5),
            max_rate_limit_retries: 5,
        }
    }
}

impl From<&Config> for FetchOptions {
    fn from(cfg: &Config) -> Self {
        Self {
            page_size: cfg.page_size.max(1),
            page_delay: Duration::from_millis(cfg.page_delay_ms),
            rate_limit_backoff: Duration::from_millis(cfg.rate_limit_backoff_ms),
            max_rate_limit_retries: cfg.max_rate_limit_retries,
        }
    }
}

/// Items fetched from a board, and whether the last page was reached.
///
/// An incomplete snapshot can make existing items look new to the
/// reconciler; callers decide how loudly to report that.
#[derive(Debug, Clone, Default)]
pub struct RemoteSnapshot {
    pub items: Vec<BoardItem>,
    pub complete: bool,
    pub pages: u32,
}

/// Walk the board with the server cursor until it runs out.
///
/// Rate-limited pages are retried with the same cursor. Any other
/// failure stops the walk and returns the pages collected so far; a
/// failure before the first page is returned as an error.
pub async fn fetch_all_items<A>(api: &A, board_id: &str, opts: &FetchOptions) -> AppResult<RemoteSnapshot>
where
    A: BoardApi + ?Sized,
{
    let mut snapshot = RemoteSnapshot::default();
    let mut cursor: Option<String> = None;
    let mut retries = 0u32;

    loop {
        info!(
            board_id,
            page = snapshot.pages + 1,
            first = cursor.is_none(),
            "fetching board page"
        );

        match api.items_page(board_id, opts.page_size, cursor.as_deref()).await {
            Ok(page) => {
                retries = 0;
                snapshot.pages += 1;
                snapshot
                    .items
                    .extend(page.items.into_iter().map(BoardItem::from_raw));

                match page.cursor.filter(|c| !c.is_empty()) {
                    Some(next) => {
                        cursor = Some(next);
                        tokio::time::sleep(opts.page_delay).await;
                    }
                    None => {
                        snapshot.complete = true;
                        break;
                    }
                }
            }
            Err(e) if e.is_rate_limited() => {
                if retries >= opts.max_rate_limit_retries {
                    if snapshot.pages == 0 {
                        return Err(e.into());
                    }
                    warn!(
                        board_id,
                        retries,
                        items = snapshot.items.len(),
                        error = %e,
                        "still rate limited, keeping partial snapshot"
                    );
                    break;
                }
                retries += 1;
                warn!(
                    board_id,
                    retry = retries,
                    backoff_ms = opts.rate_limit_backoff.as_millis() as u64,
                    error = %e,
                    "rate limited, retrying same page"
                );
                tokio::time::sleep(opts.rate_limit_backoff).await;
            }
            Err(e) => {
                if snapshot.pages == 0 {
                    return Err(e.into());
                }
                error!(
                    board_id,
                    pages = snapshot.pages,
                    items = snapshot.items.len(),
                    error = %e,
                    "board fetch failed, keeping partial snapshot"
                );
                break;
            }
        }
    }

    info!(
        board_id,
        items = snapshot.items.len(),
        pages = snapshot.pages,
        complete = snapshot.complete,
        "board snapshot fetched"
    );
    Ok(snapshot)
}
