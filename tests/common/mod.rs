//! Shared test infrastructure for model layer tests.
//!
//! `setup_test_db()` provisions a fresh, uniquely-named PostgreSQL database
//! from the server pointed to by `TEST_DATABASE_URL` and runs the embedded
//! migrations against it. When `TEST_DATABASE_URL` is unset the function
//! returns `None` and the calling test should return early (skip), so the
//! suite still passes on machines without a PostgreSQL server.

use rand::Rng;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use pulsehub::db::MIGRATOR;

pub struct TestDb {
    pool: PgPool,
    pub name: String,
}

impl TestDb {
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

pub async fn setup_test_db() -> Option<TestDb> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;

    let admin = PgPoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await
        .expect("Failed to connect to TEST_DATABASE_URL");

    let suffix: [u8; 8] = rand::rng().random();
    let name = format!("pulsehub_test_{}", hex::encode(suffix));
    sqlx::query(&format!("CREATE DATABASE {name}"))
        .execute(&admin)
        .await
        .expect("Failed to create test database");

    // Swap the database path of the admin URL for the fresh database.
    let base = url.split('?').next().unwrap_or(&url);
    let (prefix, _) = base
        .rsplit_once('/')
        .expect("TEST_DATABASE_URL must contain a database path");
    let db_url = format!("{prefix}/{name}");

    let pool = PgPoolOptions::new()
        .max_connections(4)
        .connect(&db_url)
        .await
        .expect("Failed to connect to test database");

    MIGRATOR.run(&pool).await.expect("Failed to run migrations");

    Some(TestDb { pool, name })
}
