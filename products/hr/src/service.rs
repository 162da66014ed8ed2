use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::{Employee, EmployeeError, EmployeeRepository, EmployeeResult, StorageError};

/// Employee use cases. Stateless between calls; cheap to clone.
#[derive(Clone)]
pub struct EmployeeService {
    repo: Arc<dyn EmployeeRepository>,
}

impl EmployeeService {
    pub fn new(repo: Arc<dyn EmployeeRepository>) -> Self {
        Self { repo }
    }

    /// Store a new employee. The candidate's id is ignored.
    ///
    /// Fails with [`EmployeeError::DuplicateResource`] when the email is
    /// already taken, either by the up-front lookup or, when a concurrent
    /// create wins the race, by the storage unique index.
    #[instrument(skip(self, candidate), fields(email = %candidate.email))]
    pub async fn create(&self, candidate: Employee) -> EmployeeResult<Employee> {
        if let Some(existing) = self.repo.find_by_email(&candidate.email).await? {
            warn!(existing_id = existing.id, "email already registered");
            return Err(EmployeeError::duplicate(candidate.email));
        }

        let email = candidate.email.clone();
        let fresh = Employee {
            id: 0,
            ..candidate
        };
        match self.repo.save(fresh).await {
            Ok(saved) => {
                info!(employee_id = saved.id, "employee created");
                Ok(saved)
            }
            Err(StorageError::UniqueViolation(detail)) => {
                warn!(%detail, "email claimed by a concurrent create");
                Err(EmployeeError::duplicate(email))
            }
            Err(err) => Err(err.into()),
        }
    }

    #[instrument(skip(self))]
    pub async fn list_all(&self) -> EmployeeResult<Vec<Employee>> {
        let employees = self.repo.find_all().await?;
        debug!(count = employees.len(), "listed employees");
        Ok(employees)
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: i64) -> EmployeeResult<Option<Employee>> {
        let found = self.repo.find_by_id(id).await?;
        debug!(found = found.is_some(), "looked up employee");
        Ok(found)
    }

    /// Persist a record the caller already fetched. Neither existence nor
    /// email uniqueness is re-checked here; a collision with another row's
    /// email surfaces as [`EmployeeError::Storage`].
    #[instrument(skip(self, existing), fields(employee_id = existing.id))]
    pub async fn update(&self, existing: Employee) -> EmployeeResult<Employee> {
        let saved = self.repo.save(existing).await?;
        info!("employee updated");
        Ok(saved)
    }

    #[instrument(skip(self))]
    pub async fn delete_by_id(&self, id: i64) -> EmployeeResult<()> {
        self.repo.delete_by_id(id).await?;
        info!("employee deleted");
        Ok(())
    }
}
