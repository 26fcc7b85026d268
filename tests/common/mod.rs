use credential_verifier::Config;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{ConnectOptions, Connection};
use std::{
    fs,
    path::PathBuf,
    str::FromStr,
    sync::atomic::{AtomicUsize, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};

static SEQ: AtomicUsize = AtomicUsize::new(0);

/// A throwaway SQLite file with a seeded users table.
pub struct TestDb {
    pub path: PathBuf,
}

impl TestDb {
    pub async fn seeded(rows: &[(&str, &str, Option<&str>)]) -> Self {
        let db = Self::from_sql(&[
            "CREATE TABLE usuarios (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                login TEXT NOT NULL,
                senha TEXT NOT NULL,
                nome TEXT NULL
            )",
        ])
        .await;

        let mut conn = db.connect().await;
        for (login, senha, nome) in rows {
            sqlx::query("INSERT INTO usuarios (login, senha, nome) VALUES (?, ?, ?)")
                .bind(*login)
                .bind(*senha)
                .bind(*nome)
                .execute(&mut conn)
                .await
                .expect("failed to seed user");
        }
        conn.close().await.expect("failed to close seeding connection");
        db
    }

    /// Create a fresh database file and run `statements` against it in order.
    pub async fn from_sql(statements: &[&str]) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before UNIX_EPOCH")
            .as_nanos();

        let mut path = std::env::temp_dir();
        path.push(format!(
            "credential-verifier-{}-{}-{}.sqlite",
            std::process::id(),
            nanos,
            SEQ.fetch_add(1, Ordering::SeqCst)
        ));

        let mut conn = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))
            .expect("bad sqlite url")
            .create_if_missing(true)
            .connect()
            .await
            .expect("failed to create test database");

        for stmt in statements {
            sqlx::query(stmt)
                .execute(&mut conn)
                .await
                .expect("failed to run setup statement");
        }

        conn.close().await.expect("failed to close setup connection");
        Self { path }
    }

    async fn connect(&self) -> SqliteConnection {
        SqliteConnectOptions::from_str(&self.url())
            .expect("bad sqlite url")
            .connect()
            .await
            .expect("failed to reopen test database")
    }

    pub fn url(&self) -> String {
        format!("sqlite:{}", self.path.display())
    }

    pub fn config(&self) -> Config {
        Config::new(self.url())
    }

    pub async fn row_count(&self) -> i64 {
        let mut conn = self.connect().await;
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM usuarios")
            .fetch_one(&mut conn)
            .await
            .expect("count failed");
        conn.close().await.expect("failed to close");
        count
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

/// A SQLite URL pointing into a directory that does not exist.
pub fn unreachable_url() -> String {
    let mut path = std::env::temp_dir();
    path.push("credential-verifier-missing-dir");
    path.push("nested");
    path.push("users.sqlite");
    format!("sqlite:{}?mode=rw", path.display())
}
