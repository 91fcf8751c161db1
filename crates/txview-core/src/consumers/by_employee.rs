//! Consumer over the per-employee transaction source

use log::{debug, warn};
use std::sync::RwLock;

use super::{read, write};
use crate::error::{CoreError, CoreResult};
use crate::models::Transaction;
use crate::source::EmployeeTransactionSourceRef;
use crate::types::{EmployeeId, FetchOutcome, FetchStatus};

#[derive(Debug, Default)]
struct ByEmployeeState {
    data: Option<Vec<Transaction>>,
    status: FetchStatus,
    /// Bumped by every invalidation and every new request
    epoch: u64,
}

/// Holds the full transaction list of a single employee.
///
/// A new request supersedes any request still in flight: only the response
/// to the latest call is stored.
pub struct EmployeeTransactions {
    source: EmployeeTransactionSourceRef,
    state: RwLock<ByEmployeeState>,
}

impl EmployeeTransactions {
    pub fn new(source: EmployeeTransactionSourceRef) -> Self {
        Self {
            source,
            state: RwLock::new(ByEmployeeState::default()),
        }
    }

    pub fn data(&self) -> Option<Vec<Transaction>> {
        read(&self.state).data.clone()
    }

    pub fn has_data(&self) -> bool {
        read(&self.state).data.is_some()
    }

    pub fn loading(&self) -> bool {
        read(&self.state).status.is_loading()
    }

    pub fn status(&self) -> FetchStatus {
        read(&self.state).status.clone()
    }

    pub fn invalidate_data(&self) {
        let mut state = write(&self.state);
        state.data = None;
        state.status = FetchStatus::Idle;
        state.epoch += 1;
        debug!("Employee transactions invalidated (epoch {})", state.epoch);
    }

    /// Replace the held list with `employee_id`'s transactions
    pub async fn fetch_by_id(&self, employee_id: &EmployeeId) -> CoreResult<FetchOutcome> {
        let ticket = self.begin(employee_id.clone());
        self.run(ticket).await
    }

    /// Mark loading and supersede any request still in flight
    pub(crate) fn begin(&self, employee_id: EmployeeId) -> EmployeeTicket {
        let mut state = write(&self.state);
        state.epoch += 1;
        state.status = FetchStatus::Loading;
        EmployeeTicket {
            employee_id,
            epoch: state.epoch,
        }
    }

    pub(crate) async fn run(&self, ticket: EmployeeTicket) -> CoreResult<FetchOutcome> {
        let EmployeeTicket { employee_id, epoch } = ticket;
        debug!("Requesting transactions for employee {}", employee_id);
        let result = self.source.list_for(&employee_id).await;

        let mut state = write(&self.state);
        if state.epoch != epoch {
            debug!(
                "Discarding transactions for employee {} from epoch {} (now {})",
                employee_id, epoch, state.epoch
            );
            return Ok(FetchOutcome::Discarded);
        }

        match result {
            Ok(transactions) => {
                debug!(
                    "Loaded {} transactions for employee {}",
                    transactions.len(),
                    employee_id
                );
                state.data = Some(transactions);
                state.status = FetchStatus::Loaded;
                Ok(FetchOutcome::Applied)
            }
            Err(e) => {
                warn!("Transactions for employee {} failed: {}", employee_id, e);
                state.status = FetchStatus::Failed {
                    reason: e.to_string(),
                };
                Err(CoreError::fetch("employee transactions", e))
            }
        }
    }
}

/// A per-employee request tagged with the epoch it was issued in
#[derive(Debug)]
pub(crate) struct EmployeeTicket {
    employee_id: EmployeeId,
    epoch: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consumers::testing::{transport, tx, ScriptedByEmployee};

    fn id(raw: &str) -> EmployeeId {
        EmployeeId::new(raw).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_replaces_data() {
        let source = ScriptedByEmployee::with(vec![
            ("1", vec![tx("t1", "1"), tx("t2", "1")]),
            ("2", vec![tx("t9", "2")]),
        ]);
        let consumer = EmployeeTransactions::new(source.clone());
        assert!(!consumer.has_data());

        consumer.fetch_by_id(&id("1")).await.unwrap();
        assert_eq!(consumer.data().unwrap().len(), 2);

        consumer.fetch_by_id(&id("2")).await.unwrap();
        let data = consumer.data().unwrap();
        assert_eq!(data.len(), 1);
        assert!(data[0].belongs_to(&id("2")));
        assert_eq!(consumer.status(), FetchStatus::Loaded);
    }

    #[tokio::test]
    async fn test_empty_list_is_loaded_not_missing() {
        let source = ScriptedByEmployee::with(vec![]);
        let consumer = EmployeeTransactions::new(source);

        consumer.fetch_by_id(&id("404")).await.unwrap();
        assert_eq!(consumer.data(), Some(vec![]));
        assert_eq!(consumer.status(), FetchStatus::Loaded);
    }

    #[tokio::test]
    async fn test_invalidate_clears_data() {
        let source = ScriptedByEmployee::with(vec![("1", vec![tx("t1", "1")])]);
        let consumer = EmployeeTransactions::new(source);
        consumer.fetch_by_id(&id("1")).await.unwrap();

        consumer.invalidate_data();
        assert!(consumer.data().is_none());
        assert_eq!(consumer.status(), FetchStatus::Idle);
    }

    #[tokio::test]
    async fn test_latest_request_wins() {
        let source = ScriptedByEmployee::with(vec![
            ("1", vec![tx("t1", "1")]),
            ("2", vec![tx("t2", "2"), tx("t3", "2")]),
        ]);
        source.gate.close();
        let consumer = EmployeeTransactions::new(source.clone());

        let slow_id = id("1");
        let slow = consumer.fetch_by_id(&slow_id);
        let fast = async {
            source.gate.release_one();
            source.gate.release_one();
            consumer.fetch_by_id(&id("2")).await
        };
        let (slow, fast) = tokio::join!(slow, fast);

        assert_eq!(slow.unwrap(), FetchOutcome::Discarded);
        assert_eq!(fast.unwrap(), FetchOutcome::Applied);
        assert_eq!(consumer.data().unwrap().len(), 2);
        assert!(!consumer.loading());
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_data() {
        let source = ScriptedByEmployee::with(vec![("1", vec![tx("t1", "1")])]);
        source.fail("2", transport("offline"));
        let consumer = EmployeeTransactions::new(source.clone());
        consumer.fetch_by_id(&id("1")).await.unwrap();

        assert!(consumer.fetch_by_id(&id("2")).await.is_err());
        assert_eq!(consumer.data().unwrap().len(), 1);
        assert!(consumer.status().is_failed());
        assert!(!consumer.loading());
    }
}
