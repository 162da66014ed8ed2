use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{ConnectionTrait, DbBackend};

const POSTGRES_UP_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS employee (
    id bigserial PRIMARY KEY,
    first_name text NOT NULL,
    last_name text NOT NULL,
    email text NOT NULL
);
CREATE UNIQUE INDEX IF NOT EXISTS idx_employee_email ON employee (email);
"#;

// SQLite only hands out rowid-backed keys for an exact `INTEGER PRIMARY KEY`.
const SQLITE_UP_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS employee (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    email TEXT NOT NULL
);
CREATE UNIQUE INDEX IF NOT EXISTS idx_employee_email ON employee (email);
"#;

const DOWN_SQL: &str = r#"
DROP INDEX IF EXISTS idx_employee_email;
DROP TABLE IF EXISTS employee;
"#;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let sql = match manager.get_database_backend() {
            DbBackend::Postgres => POSTGRES_UP_SQL,
            DbBackend::Sqlite => SQLITE_UP_SQL,
            DbBackend::MySql => {
                return Err(DbErr::Migration("MySQL is not a supported backend".into()));
            }
        };
        manager
            .get_connection()
            .execute_unprepared(sql)
            .await
            .map(|_| ())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(DOWN_SQL)
            .await
            .map(|_| ())
    }
}
