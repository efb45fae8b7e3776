use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

pub async fn init_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(8)
        .connect(database_url)
        .await
}

pub async fn run_migrations(pool: &PgPool) {
    MIGRATOR
        .run(pool)
        .await
        .expect("Failed to run migrations");
    log::info!("Database migrations complete");
}

/// Seed the default admin account if no members exist yet.
pub async fn seed_admin(pool: &PgPool, admin_password_hash: &str) {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM members")
        .fetch_one(pool)
        .await
        .unwrap_or(0);
    if count > 0 {
        log::info!("Members table already seeded ({count} members), skipping admin seed");
        return;
    }

    let result = sqlx::query(
        "INSERT INTO members (username, password, email, display_name, is_admin) \
         VALUES ('admin', $1, 'admin@localhost', 'Administrator', TRUE)",
    )
    .bind(admin_password_hash)
    .execute(pool)
    .await;

    match result {
        Ok(_) => log::info!("Seeded default admin account"),
        Err(e) => log::error!("Admin seed failed: {e}"),
    }
}
