//! Startup schema bootstrap

use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr};

const INIT_SQL: &str = include_str!("../../../migrations/0001_init.sql");

fn statements() -> impl Iterator<Item = &'static str> {
    INIT_SQL
        .split(';')
        .map(str::trim)
        .filter(|statement| !statement.is_empty())
}

/// Create tables, constraints and indexes if they do not exist yet
pub async fn apply_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    for statement in statements() {
        db.execute_unprepared(statement).await?;
    }
    tracing::info!("Schema applied");
    Ok(())
}
