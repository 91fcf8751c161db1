//! Stateful wrappers around the data source collaborators
//!
//! Every consumer keeps its state behind a `std::sync::RwLock` and never holds
//! a guard across an `.await`. A fetch is split into three steps:
//! begin (mark loading, capture the epoch), the source call, and complete
//! (apply only if the epoch is unchanged).

mod by_employee;
mod employees;
mod paginated;

pub use by_employee::EmployeeTransactions;
pub(crate) use by_employee::EmployeeTicket;
pub use employees::EmployeeDirectory;
pub use paginated::PaginatedTransactions;
pub(crate) use paginated::PageTicket;

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted sources for consumer and coordinator tests

    use async_trait::async_trait;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::collections::{HashMap, VecDeque};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tokio::sync::Semaphore;

    use crate::error::FetchError;
    use crate::models::{Employee, Transaction, TransactionPage};
    use crate::source::{EmployeeSource, EmployeeTransactionSource, TransactionPageSource};
    use crate::types::{EmployeeId, PageToken, TransactionId};

    pub fn employee(id: &str, first: &str, last: &str) -> Employee {
        Employee {
            id: EmployeeId::new(id).unwrap(),
            first_name: first.to_string(),
            last_name: last.to_string(),
        }
    }

    pub fn tx(id: &str, employee_id: &str) -> Transaction {
        Transaction {
            id: TransactionId::from(id),
            amount: Decimal::new(2500, 2),
            employee: employee(employee_id, "First", "Last"),
            merchant: format!("Merchant {}", id),
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            approved: false,
        }
    }

    pub fn page(ids: &[&str], next: Option<&str>) -> TransactionPage {
        TransactionPage {
            items: ids.iter().map(|id| tx(id, "1")).collect(),
            next_page: next.map(PageToken::new),
        }
    }

    /// Optional gate a source waits on before answering. Permits are stored,
    /// so releasing before the request arrives is not lost.
    pub struct Gate {
        permits: Semaphore,
        closed: AtomicBool,
    }

    impl Default for Gate {
        fn default() -> Self {
            Self {
                permits: Semaphore::new(0),
                closed: AtomicBool::new(false),
            }
        }
    }

    impl Gate {
        pub fn close(&self) {
            self.closed.store(true, Ordering::SeqCst);
        }

        pub fn open(&self) {
            self.closed.store(false, Ordering::SeqCst);
            self.permits.add_permits(1024);
        }

        /// Let exactly one waiting request through
        pub fn release_one(&self) {
            self.permits.add_permits(1);
        }

        async fn pass(&self) {
            if self.closed.load(Ordering::SeqCst) {
                if let Ok(permit) = self.permits.acquire().await {
                    permit.forget();
                }
            }
        }
    }

    /// Pages keyed by the token that requests them; `""` is the first page.
    #[derive(Default)]
    pub struct ScriptedPages {
        pub pages: Mutex<HashMap<String, Result<TransactionPage, FetchError>>>,
        pub calls: AtomicUsize,
        pub requested: Mutex<Vec<Option<PageToken>>>,
        pub gate: Gate,
    }

    impl ScriptedPages {
        pub fn with(pages: Vec<(&str, TransactionPage)>) -> Arc<Self> {
            let source = Self::default();
            {
                let mut map = source.pages.lock().unwrap();
                for (token, page) in pages {
                    map.insert(token.to_string(), Ok(page));
                }
            }
            Arc::new(source)
        }

        pub fn fail(&self, token: &str, error: FetchError) {
            self.pages.lock().unwrap().insert(token.to_string(), Err(error));
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TransactionPageSource for ScriptedPages {
        async fn next_page(&self, token: Option<PageToken>) -> Result<TransactionPage, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requested.lock().unwrap().push(token.clone());
            self.gate.pass().await;
            let key = token.map(|t| t.as_str().to_string()).unwrap_or_default();
            self.pages
                .lock()
                .unwrap()
                .get(&key)
                .cloned()
                .unwrap_or_else(|| Err(FetchError::InvalidRequest { message: format!("unknown token {:?}", key) }))
        }
    }

    #[derive(Default)]
    pub struct ScriptedByEmployee {
        pub lists: Mutex<HashMap<String, Result<Vec<Transaction>, FetchError>>>,
        pub calls: AtomicUsize,
        pub gate: Gate,
    }

    impl ScriptedByEmployee {
        pub fn with(lists: Vec<(&str, Vec<Transaction>)>) -> Arc<Self> {
            let source = Self::default();
            {
                let mut map = source.lists.lock().unwrap();
                for (id, list) in lists {
                    map.insert(id.to_string(), Ok(list));
                }
            }
            Arc::new(source)
        }

        pub fn fail(&self, id: &str, error: FetchError) {
            self.lists.lock().unwrap().insert(id.to_string(), Err(error));
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl EmployeeTransactionSource for ScriptedByEmployee {
        async fn list_for(&self, employee_id: &EmployeeId) -> Result<Vec<Transaction>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.gate.pass().await;
            self.lists
                .lock()
                .unwrap()
                .get(employee_id.as_str())
                .cloned()
                .unwrap_or_else(|| Ok(vec![]))
        }
    }

    #[derive(Default)]
    pub struct ScriptedEmployees {
        pub responses: Mutex<VecDeque<Result<Vec<Employee>, FetchError>>>,
        pub calls: AtomicUsize,
        pub gate: Gate,
    }

    impl ScriptedEmployees {
        pub fn with(responses: Vec<Result<Vec<Employee>, FetchError>>) -> Arc<Self> {
            let source = Self::default();
            source.responses.lock().unwrap().extend(responses);
            Arc::new(source)
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl EmployeeSource for ScriptedEmployees {
        async fn list(&self) -> Result<Vec<Employee>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.gate.pass().await;
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(vec![]))
        }
    }

    pub fn transport(message: &str) -> FetchError {
        FetchError::Transport {
            message: message.to_string(),
        }
    }
}
