//! View coordination between the paginated and per-employee consumers
//!
//! [`ViewMode`] is the single source of truth for which consumer is
//! authoritative. Every transition invalidates the other consumer and claims
//! the new fetch while holding the coordinator lock, so the two consumers can
//! never hold live data at the same time.

use log::{info, warn};
use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::consumers::{
    EmployeeDirectory, EmployeeTicket, EmployeeTransactions, PageTicket, PaginatedTransactions,
};
use crate::error::CoreResult;
use crate::models::{EmployeeOption, PaginatedData, ResolvedTransaction, Transaction};
use crate::overlay::ApprovalOverlay;
use crate::source::{
    EmployeeSource, EmployeeSourceRef, EmployeeTransactionSource, EmployeeTransactionSourceRef,
    TransactionPageSource, TransactionPageSourceRef,
};
use crate::types::{
    ConsumerKind, EmployeeSelection, FetchCommand, FetchOutcome, FetchStatus, TransactionId,
    ViewMode,
};

#[derive(Debug, Default)]
struct ViewState {
    mode: ViewMode,
    overlay: ApprovalOverlay,
}

/// Fetch claimed under the coordinator lock, awaited after releasing it
enum PendingFetch {
    Page(PageTicket),
    Employee(EmployeeTicket),
}

/// "View more" affordance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadMore {
    /// A list is shown, more pages exist and no employee filter is active
    pub visible: bool,
    /// Visible and no page request in flight
    pub enabled: bool,
}

/// Everything the presentation layer renders
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSnapshot {
    pub mode: ViewMode,
    /// `None` until a transaction list has been loaded
    pub transactions: Option<Vec<ResolvedTransaction>>,
    /// Filter entries, "all employees" first; empty until the directory loads
    pub employees: Vec<EmployeeOption>,
    pub employees_loading: bool,
    /// Loading flag of the authoritative consumer
    pub transactions_loading: bool,
    pub load_more: LoadMore,
    pub employees_status: FetchStatus,
    pub transactions_status: FetchStatus,
}

pub struct ViewCoordinator {
    employees: EmployeeDirectory,
    paginated: PaginatedTransactions,
    by_employee: EmployeeTransactions,
    state: RwLock<ViewState>,
}

impl ViewCoordinator {
    pub fn new(
        employees: EmployeeSourceRef,
        pages: TransactionPageSourceRef,
        by_employee: EmployeeTransactionSourceRef,
    ) -> Self {
        Self {
            employees: EmployeeDirectory::new(employees),
            paginated: PaginatedTransactions::new(pages),
            by_employee: EmployeeTransactions::new(by_employee),
            state: RwLock::new(ViewState::default()),
        }
    }

    /// Build from one value that serves all three collaborator roles
    pub fn from_source<S>(source: Arc<S>) -> Self
    where
        S: EmployeeSource + TransactionPageSource + EmployeeTransactionSource + 'static,
    {
        Self::new(source.clone(), source.clone(), source)
    }

    fn read_state(&self) -> RwLockReadGuard<'_, ViewState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, ViewState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn employees(&self) -> &EmployeeDirectory {
        &self.employees
    }

    pub fn paginated(&self) -> &PaginatedTransactions {
        &self.paginated
    }

    pub fn by_employee(&self) -> &EmployeeTransactions {
        &self.by_employee
    }

    pub fn mode(&self) -> ViewMode {
        self.read_state().mode.clone()
    }

    pub fn overlay(&self) -> ApprovalOverlay {
        self.read_state().overlay.clone()
    }

    /// First load: all transactions and the employee directory, concurrently.
    ///
    /// Does nothing once the directory is loaded or loading. Returns whether
    /// the load was started.
    pub async fn initialize(&self) -> bool {
        if self.employees.is_fetched() || self.employees.loading() {
            return false;
        }

        info!("Loading employee directory and first transaction page");
        let (transactions, employees) =
            tokio::join!(self.select(EmployeeSelection::All), self.employees.fetch_all());

        if let Err(e) = transactions {
            warn!("Initial transaction load failed: {}", e);
        }
        if let Err(e) = employees {
            warn!("Initial employee load failed: {}", e);
        }
        true
    }

    /// Switch the employee filter.
    ///
    /// Re-selecting "all employees" while that list is already live (or
    /// loading) returns [`FetchOutcome::Unchanged`] instead of appending.
    pub async fn select(&self, selection: EmployeeSelection) -> CoreResult<FetchOutcome> {
        let pending = {
            let mut state = self.write_state();
            let transition = state.mode.transition(selection);

            if state.mode.is_all()
                && transition.mode.is_all()
                && (self.paginated.has_data() || self.paginated.loading())
            {
                return Ok(FetchOutcome::Unchanged);
            }

            info!("View mode {:?} -> {:?}", state.mode, transition.mode);
            state.mode = transition.mode;

            match transition.invalidate {
                ConsumerKind::Paginated => self.paginated.invalidate_data(),
                ConsumerKind::ByEmployee => self.by_employee.invalidate_data(),
            }

            match transition.fetch {
                FetchCommand::NextPage => match self.paginated.begin() {
                    Ok(ticket) => PendingFetch::Page(ticket),
                    Err(outcome) => return Ok(outcome),
                },
                FetchCommand::ForEmployee(id) => PendingFetch::Employee(self.by_employee.begin(id)),
            }
        };

        self.complete(pending).await
    }

    /// Append the next page of all transactions; only applies in
    /// [`ViewMode::All`] while more pages exist.
    pub async fn load_more(&self) -> CoreResult<FetchOutcome> {
        let pending = {
            let state = self.write_state();
            if !state.mode.is_all() {
                return Ok(FetchOutcome::Unchanged);
            }
            if !self.paginated.has_more() {
                return Ok(if self.paginated.has_data() {
                    FetchOutcome::Exhausted
                } else {
                    FetchOutcome::Unchanged
                });
            }
            match self.paginated.begin() {
                Ok(ticket) => PendingFetch::Page(ticket),
                Err(outcome) => return Ok(outcome),
            }
        };

        self.complete(pending).await
    }

    async fn complete(&self, pending: PendingFetch) -> CoreResult<FetchOutcome> {
        match pending {
            PendingFetch::Page(ticket) => self.paginated.run(ticket).await,
            PendingFetch::Employee(ticket) => self.by_employee.run(ticket).await,
        }
    }

    /// Record a local approval decision
    pub fn set_approved(&self, id: TransactionId, approved: bool) {
        let mut state = self.write_state();
        state.overlay = state.overlay.with_approved(id, approved);
    }

    /// Authoritative list: per-employee data if held, else accumulated pages
    pub fn transactions(&self) -> Option<Vec<Transaction>> {
        self.by_employee.data().or_else(|| self.paginated.items())
    }

    /// Authoritative list with the overlay applied
    pub fn resolved_transactions(&self) -> Option<Vec<ResolvedTransaction>> {
        let overlay = self.overlay();
        self.transactions().map(|list| overlay.apply(&list))
    }

    /// Filter entries with "all employees" prepended
    pub fn employee_options(&self) -> Vec<EmployeeOption> {
        match self.employees.data() {
            Some(employees) => std::iter::once(EmployeeOption::all())
                .chain(employees.iter().map(EmployeeOption::from))
                .collect(),
            None => vec![],
        }
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        let state = self.read_state();
        let filtered = self.by_employee.data();
        let paginated = self.paginated.data();
        let paginated_loading = self.paginated.loading();

        let visible = (filtered.is_some() || paginated.is_some())
            && paginated.as_ref().map_or(false, PaginatedData::has_more)
            && filtered.is_none();

        let transactions = filtered
            .or_else(|| paginated.map(|data| data.items))
            .map(|list| state.overlay.apply(&list));

        let (transactions_loading, transactions_status) = match state.mode {
            ViewMode::All => (paginated_loading, self.paginated.status()),
            ViewMode::Filtered(_) => (self.by_employee.loading(), self.by_employee.status()),
        };

        ViewSnapshot {
            mode: state.mode.clone(),
            transactions,
            employees: self.employee_options(),
            employees_loading: self.employees.loading(),
            transactions_loading,
            load_more: LoadMore {
                visible,
                enabled: visible && !paginated_loading,
            },
            employees_status: self.employees.status(),
            transactions_status,
        }
    }
}
