use async_trait::async_trait;
use entity::employee;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DbBackend, EntityTrait, QueryFilter, QueryOrder, Set, Statement,
};
use tracing::debug;

use crate::{Employee, EmployeeRepository, StorageError};

const FULL_NAME_SQL_POSTGRES: &str = "SELECT id, first_name, last_name, email FROM employee \
     WHERE first_name = $1 AND last_name = $2 ORDER BY id LIMIT 1";
const FULL_NAME_SQL: &str = "SELECT id, first_name, last_name, email FROM employee \
     WHERE first_name = ? AND last_name = ? ORDER BY id LIMIT 1";

/// [`EmployeeRepository`] over a sea-orm connection pool.
#[derive(Clone, Debug)]
pub struct SeaOrmEmployeeRepository {
    db: DatabaseConnection,
}

impl SeaOrmEmployeeRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn insert(&self, employee: Employee) -> Result<Employee, StorageError> {
        let active = employee::ActiveModel {
            id: NotSet,
            first_name: Set(employee.first_name),
            last_name: Set(employee.last_name),
            email: Set(employee.email),
        };
        let model = active.insert(&self.db).await?;
        debug!(employee_id = model.id, "inserted employee row");
        Ok(model.into())
    }
}

#[async_trait]
impl EmployeeRepository for SeaOrmEmployeeRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Employee>, StorageError> {
        let found = employee::Entity::find_by_id(id).one(&self.db).await?;
        Ok(found.map(Employee::from))
    }

    async fn find_all(&self) -> Result<Vec<Employee>, StorageError> {
        let rows = employee::Entity::find()
            .order_by_asc(employee::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Employee::from).collect())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Employee>, StorageError> {
        let found = employee::Entity::find()
            .filter(employee::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        Ok(found.map(Employee::from))
    }

    async fn save(&self, employee: Employee) -> Result<Employee, StorageError> {
        if employee.is_new() {
            return self.insert(employee).await;
        }
        let Some(existing) = employee::Entity::find_by_id(employee.id)
            .one(&self.db)
            .await?
        else {
            return self.insert(employee).await;
        };
        let mut active: employee::ActiveModel = existing.into();
        active.first_name = Set(employee.first_name);
        active.last_name = Set(employee.last_name);
        active.email = Set(employee.email);
        let model = active.update(&self.db).await?;
        debug!(employee_id = model.id, "updated employee row");
        Ok(model.into())
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), StorageError> {
        let result = employee::Entity::delete_by_id(id).exec(&self.db).await?;
        debug!(employee_id = id, rows = result.rows_affected, "delete by id");
        Ok(())
    }

    async fn find_by_full_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<Option<Employee>, StorageError> {
        let found = employee::Entity::find()
            .filter(employee::Column::FirstName.eq(first_name))
            .filter(employee::Column::LastName.eq(last_name))
            .order_by_asc(employee::Column::Id)
            .one(&self.db)
            .await?;
        Ok(found.map(Employee::from))
    }

    async fn find_by_full_name_sql(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<Option<Employee>, StorageError> {
        let backend = self.db.get_database_backend();
        let sql = match backend {
            DbBackend::Postgres => FULL_NAME_SQL_POSTGRES,
            DbBackend::MySql | DbBackend::Sqlite => FULL_NAME_SQL,
        };
        let statement =
            Statement::from_sql_and_values(backend, sql, [first_name.into(), last_name.into()]);
        let found = employee::Entity::find()
            .from_raw_sql(statement)
            .one(&self.db)
            .await?;
        Ok(found.map(Employee::from))
    }

    async fn delete_all(&self) -> Result<u64, StorageError> {
        let result = employee::Entity::delete_many().exec(&self.db).await?;
        Ok(result.rows_affected)
    }
}
