use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{Employee, EmployeeRepository, StorageError};

/// Process-local [`EmployeeRepository`]. Assigns ids from a counter and
/// enforces the same unique-email rule as the SQL index.
#[derive(Debug, Default)]
pub struct InMemoryEmployeeRepository {
    state: RwLock<State>,
}

#[derive(Debug, Default)]
struct State {
    rows: BTreeMap<i64, Employee>,
    last_id: i64,
}

impl InMemoryEmployeeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl EmployeeRepository for InMemoryEmployeeRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Employee>, StorageError> {
        Ok(self.state.read().await.rows.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Employee>, StorageError> {
        Ok(self.state.read().await.rows.values().cloned().collect())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Employee>, StorageError> {
        let state = self.state.read().await;
        Ok(state.rows.values().find(|e| e.email == email).cloned())
    }

    async fn save(&self, mut employee: Employee) -> Result<Employee, StorageError> {
        let mut state = self.state.write().await;
        let exists = !employee.is_new() && state.rows.contains_key(&employee.id);
        let taken = state
            .rows
            .values()
            .any(|e| e.email == employee.email && (!exists || e.id != employee.id));
        if taken {
            return Err(StorageError::UniqueViolation(format!(
                "employee.email = {}",
                employee.email
            )));
        }
        if !exists {
            state.last_id += 1;
            employee.id = state.last_id;
        }
        state.rows.insert(employee.id, employee.clone());
        Ok(employee)
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), StorageError> {
        self.state.write().await.rows.remove(&id);
        Ok(())
    }

    async fn find_by_full_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<Option<Employee>, StorageError> {
        let state = self.state.read().await;
        Ok(state
            .rows
            .values()
            .find(|e| e.first_name == first_name && e.last_name == last_name)
            .cloned())
    }

    async fn find_by_full_name_sql(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<Option<Employee>, StorageError> {
        self.find_by_full_name(first_name, last_name).await
    }

    async fn delete_all(&self) -> Result<u64, StorageError> {
        let mut state = self.state.write().await;
        let removed = state.rows.len() as u64;
        state.rows.clear();
        Ok(removed)
    }
}
