use async_trait::async_trait;

use crate::{Employee, StorageError};

/// Storage port for employees.
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Employee>, StorageError>;

    /// Every row, ordered by id.
    async fn find_all(&self) -> Result<Vec<Employee>, StorageError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Employee>, StorageError>;

    /// Insert when the id is unset or unknown, otherwise overwrite the row.
    async fn save(&self, employee: Employee) -> Result<Employee, StorageError>;

    /// Deleting an unknown id is not an error.
    async fn delete_by_id(&self, id: i64) -> Result<(), StorageError>;

    /// First employee (lowest id) with exactly this first and last name.
    async fn find_by_full_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<Option<Employee>, StorageError>;

    /// Same lookup as [`find_by_full_name`](Self::find_by_full_name), issued
    /// as a hand-written SQL statement with bound parameters.
    async fn find_by_full_name_sql(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<Option<Employee>, StorageError>;

    /// Remove every row, returning how many were deleted.
    async fn delete_all(&self) -> Result<u64, StorageError>;
}
