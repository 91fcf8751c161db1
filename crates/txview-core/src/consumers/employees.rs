//! Employee directory consumer

use log::{debug, warn};
use std::sync::RwLock;

use super::{read, write};
use crate::error::{CoreError, CoreResult};
use crate::models::Employee;
use crate::source::EmployeeSourceRef;
use crate::types::{FetchOutcome, FetchStatus};

#[derive(Debug, Default)]
struct DirectoryState {
    data: Option<Vec<Employee>>,
    status: FetchStatus,
}

pub struct EmployeeDirectory {
    source: EmployeeSourceRef,
    state: RwLock<DirectoryState>,
}

impl EmployeeDirectory {
    pub fn new(source: EmployeeSourceRef) -> Self {
        Self {
            source,
            state: RwLock::new(DirectoryState::default()),
        }
    }

    pub fn data(&self) -> Option<Vec<Employee>> {
        read(&self.state).data.clone()
    }

    pub fn is_fetched(&self) -> bool {
        read(&self.state).data.is_some()
    }

    pub fn loading(&self) -> bool {
        read(&self.state).status.is_loading()
    }

    pub fn status(&self) -> FetchStatus {
        read(&self.state).status.clone()
    }

    /// Load the whole directory. Ignored while a load is in flight.
    pub async fn fetch_all(&self) -> CoreResult<FetchOutcome> {
        {
            let mut state = write(&self.state);
            if state.status.is_loading() {
                return Ok(FetchOutcome::AlreadyLoading);
            }
            state.status = FetchStatus::Loading;
        }

        debug!("Requesting employee directory");
        let result = self.source.list().await;

        let mut state = write(&self.state);
        match result {
            Ok(employees) => {
                debug!("Loaded {} employees", employees.len());
                state.data = Some(employees);
                state.status = FetchStatus::Loaded;
                Ok(FetchOutcome::Applied)
            }
            Err(e) => {
                warn!("Employee directory request failed: {}", e);
                state.status = FetchStatus::Failed {
                    reason: e.to_string(),
                };
                Err(CoreError::fetch("employees", e))
            }
        }
    }
}
