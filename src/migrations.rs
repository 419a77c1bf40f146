use anyhow::{Context, Result};
use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, Statement};

type Migration = (&'static str, &'static str);

const SQLITE_MIGRATIONS: &[Migration] = &[(
    "001_create_users_table",
    include_str!("../migrations/sqlite/001_create_users_table.sql"),
)];

const POSTGRES_MIGRATIONS: &[Migration] = &[(
    "001_create_users_table",
    include_str!("../migrations/postgres/001_create_users_table.sql"),
)];

/// Migration set for the given backend, in execution order
pub fn migrations_for(backend: DatabaseBackend) -> Result<&'static [Migration]> {
    match backend {
        DatabaseBackend::Sqlite => Ok(SQLITE_MIGRATIONS),
        DatabaseBackend::Postgres => Ok(POSTGRES_MIGRATIONS),
        other => anyhow::bail!("Unsupported database backend: {:?}", other),
    }
}

fn split_statements(sql: &str) -> impl Iterator<Item = &str> {
    sql.split(';').map(str::trim).filter(|s| !s.is_empty())
}

/// Run database migrations
pub async fn run_migrations(db: &DatabaseConnection) -> Result<()> {
    let backend = db.get_database_backend();
    tracing::info!("Running database migrations for {:?}...", backend);

    for (name, sql) in migrations_for(backend)? {
        tracing::info!("Running migration: {}", name);

        for statement in split_statements(sql) {
            if let Err(e) = db
                .execute(Statement::from_string(backend, statement.to_string()))
                .await
            {
                // Table or index left behind by an earlier run
                let error_msg = e.to_string().to_lowercase();
                if error_msg.contains("duplicate") || error_msg.contains("already exists") {
                    tracing::warn!("Migration statement skipped (already exists): {}", statement);
                } else {
                    return Err(e).context(format!("Failed to execute migration: {}", name));
                }
            }
        }

        tracing::info!("Migration completed: {}", name);
    }

    tracing::info!("All migrations completed successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ConnectOptions, Database};

    #[test]
    fn test_migrations_per_backend() {
        let sqlite = migrations_for(DatabaseBackend::Sqlite).unwrap();
        let postgres = migrations_for(DatabaseBackend::Postgres).unwrap();

        assert_eq!(sqlite.len(), postgres.len());
        assert!(sqlite[0].1.contains("CREATE TABLE IF NOT EXISTS users"));
        assert!(sqlite[0].1.contains("AUTOINCREMENT"));
        assert!(postgres[0].1.contains("SERIAL"));
    }

    #[test]
    fn test_mysql_is_rejected() {
        assert!(migrations_for(DatabaseBackend::MySql).is_err());
    }

    #[test]
    fn test_split_statements_skips_blanks() {
        let parts: Vec<_> = split_statements("CREATE A;\n\n  ;CREATE B;  ").collect();
        assert_eq!(parts, vec!["CREATE A", "CREATE B"]);
    }

    #[tokio::test]
    async fn test_migrations_are_rerunnable() {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1);
        let db = Database::connect(options).await.unwrap();

        run_migrations(&db).await.unwrap();
        run_migrations(&db).await.unwrap();
    }
}
