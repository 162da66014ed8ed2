pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_employee;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20240101_000001_create_employee::Migration)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm_migration::sea_orm::{ConnectOptions, ConnectionTrait, Database, DbBackend, Statement};

    async fn sqlite() -> sea_orm_migration::sea_orm::DatabaseConnection {
        let mut opts = ConnectOptions::new("sqlite::memory:");
        opts.max_connections(1).sqlx_logging(false);
        Database::connect(opts).await.unwrap()
    }

    #[tokio::test]
    async fn up_then_down_leaves_no_pending_migrations_behind() {
        let db = sqlite().await;
        Migrator::up(&db, None).await.unwrap();
        assert!(Migrator::get_pending_migrations(&db).await.unwrap().is_empty());

        Migrator::down(&db, Some(1)).await.unwrap();
        assert_eq!(Migrator::get_pending_migrations(&db).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn email_index_rejects_duplicates() {
        let db = sqlite().await;
        Migrator::up(&db, None).await.unwrap();
        let insert = "INSERT INTO employee (first_name, last_name, email) \
                      VALUES ('Todimu', 'Isewon', 'todimu@gmail.com')";
        db.execute(Statement::from_string(DbBackend::Sqlite, insert.to_string()))
            .await
            .unwrap();
        let second = db
            .execute(Statement::from_string(DbBackend::Sqlite, insert.to_string()))
            .await;
        assert!(second.is_err());
    }
}
