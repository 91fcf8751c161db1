//! Cumulative consumer over the paginated transaction source

use log::{debug, warn};
use std::sync::RwLock;

use super::{read, write};
use crate::error::{CoreError, CoreResult};
use crate::models::{PaginatedData, Transaction};
use crate::source::TransactionPageSourceRef;
use crate::types::{FetchOutcome, FetchStatus, PageToken};

#[derive(Debug, Default)]
struct PaginatedState {
    data: Option<PaginatedData>,
    status: FetchStatus,
    /// Bumped by every invalidation
    epoch: u64,
}

/// Accumulates pages of all transactions.
///
/// At most one page request is in flight; calls made meanwhile return
/// [`FetchOutcome::AlreadyLoading`]. Once the terminal token has been seen
/// further calls return [`FetchOutcome::Exhausted`] until the data is
/// invalidated.
pub struct PaginatedTransactions {
    source: TransactionPageSourceRef,
    state: RwLock<PaginatedState>,
}

impl PaginatedTransactions {
    pub fn new(source: TransactionPageSourceRef) -> Self {
        Self {
            source,
            state: RwLock::new(PaginatedState::default()),
        }
    }

    pub fn data(&self) -> Option<PaginatedData> {
        read(&self.state).data.clone()
    }

    /// Accumulated items, `None` before the first page has arrived
    pub fn items(&self) -> Option<Vec<Transaction>> {
        read(&self.state).data.as_ref().map(|data| data.items.clone())
    }

    pub fn has_data(&self) -> bool {
        read(&self.state).data.is_some()
    }

    pub fn item_count(&self) -> usize {
        read(&self.state).data.as_ref().map_or(0, |data| data.items.len())
    }

    pub fn next_page(&self) -> Option<PageToken> {
        read(&self.state).data.as_ref().and_then(|data| data.next_page.clone())
    }

    /// True when data is loaded and the source reported another page
    pub fn has_more(&self) -> bool {
        read(&self.state).data.as_ref().map_or(false, PaginatedData::has_more)
    }

    pub fn loading(&self) -> bool {
        read(&self.state).status.is_loading()
    }

    pub fn status(&self) -> FetchStatus {
        read(&self.state).status.clone()
    }

    /// Drop accumulated pages and orphan any in-flight request
    pub fn invalidate_data(&self) {
        let mut state = write(&self.state);
        state.data = None;
        state.status = FetchStatus::Idle;
        state.epoch += 1;
        debug!("Paginated transactions invalidated (epoch {})", state.epoch);
    }

    /// Fetch the next page and append it to the accumulated items
    pub async fn fetch_all(&self) -> CoreResult<FetchOutcome> {
        match self.begin() {
            Ok(ticket) => self.run(ticket).await,
            Err(outcome) => Ok(outcome),
        }
    }

    /// Reserve the single in-flight slot and capture the token to request
    pub(crate) fn begin(&self) -> Result<PageTicket, FetchOutcome> {
        let mut state = write(&self.state);
        if state.status.is_loading() {
            debug!("Transaction page request already in flight, skipping");
            return Err(FetchOutcome::AlreadyLoading);
        }
        let token = match &state.data {
            Some(data) => match &data.next_page {
                Some(token) => Some(token.clone()),
                None => {
                    debug!("No more transaction pages");
                    return Err(FetchOutcome::Exhausted);
                }
            },
            None => None,
        };
        state.status = FetchStatus::Loading;
        Ok(PageTicket {
            token,
            epoch: state.epoch,
        })
    }

    pub(crate) async fn run(&self, ticket: PageTicket) -> CoreResult<FetchOutcome> {
        let PageTicket { token, epoch } = ticket;
        debug!("Requesting transaction page {:?}", token.as_ref().map(PageToken::as_str));
        let result = self.source.next_page(token).await;

        let mut state = write(&self.state);
        if state.epoch != epoch {
            debug!("Discarding transaction page issued in epoch {} (now {})", epoch, state.epoch);
            return Ok(FetchOutcome::Discarded);
        }

        match result {
            Ok(page) => {
                let received = page.items.len();
                let data = state.data.get_or_insert_with(PaginatedData::default);
                data.extend(page);
                debug!(
                    "Appended {} transactions ({} total, more: {})",
                    received,
                    data.items.len(),
                    data.has_more()
                );
                state.status = FetchStatus::Loaded;
                Ok(FetchOutcome::Applied)
            }
            Err(e) => {
                warn!("Transaction page request failed: {}", e);
                state.status = FetchStatus::Failed {
                    reason: e.to_string(),
                };
                Err(CoreError::fetch("transactions", e))
            }
        }
    }
}

/// A page request that has claimed the in-flight slot
#[derive(Debug)]
pub(crate) struct PageTicket {
    token: Option<PageToken>,
    epoch: u64,
}
