//! Fixtures shared by the store, search and web tests.
//!
//! Every test gets its own SQLite file in a temp directory, so tests can run
//! in parallel and mutate their database freely.

use std::path::PathBuf;
use std::sync::Arc;

use rusqlite::{params, Connection};

use crate::app::{context::Thresholds, SearchContext};
use crate::semantic::{Embedder, EmbeddingError};
use crate::store::SqliteStore;

pub const SCHEMA: &str = "
    CREATE TABLE transports (
        id INTEGER PRIMARY KEY,
        domain TEXT NOT NULL,
        transport TEXT NOT NULL,
        deleted_at TEXT
    );
    CREATE TABLE users (
        id INTEGER PRIMARY KEY,
        userid TEXT,
        login TEXT NOT NULL,
        email TEXT NOT NULL,
        maildir TEXT NOT NULL,
        identificacion TEXT,
        grupo TEXT,
        dominio INTEGER NOT NULL,
        quota INTEGER,
        deleted_at TEXT
    );
    CREATE TABLE aliases (
        id INTEGER PRIMARY KEY,
        local TEXT NOT NULL,
        remoto TEXT NOT NULL,
        deleted_at TEXT
    );";

pub const THRESHOLDS: Thresholds = Thresholds {
    users: 0.45,
    aliases: 0.35,
};

pub struct TestDb {
    pub path: PathBuf,
    _dir: tempfile::TempDir,
}

impl TestDb {
    /// An empty database with the schema in place.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("mail.db");
        let conn = Connection::open(&path).expect("failed to create database");
        conn.execute_batch(SCHEMA).expect("failed to create schema");
        Self { path, _dir: dir }
    }

    /// The standard fixture used across the search tests.
    ///
    /// Live users 1..=4, a soft-deleted user 5 and user 6 on a soft-deleted
    /// transport. Live aliases 1..=3 and a soft-deleted alias 4.
    pub fn seeded() -> Self {
        let db = Self::new();
        db.add_transport(1, "example.com", "virtual");
        db.add_transport(2, "ventas.example", "smtp:[relay.example]");
        db.add_transport(3, "old.example", "virtual");
        db.soft_delete("transports", 3);

        db.add_user(1, "ops-team", "12345678", "infra", 1);
        db.add_user(2, "netops", "network operations manager", "infra", 1);
        db.add_user(3, "neteng", "network engineer", "infra", 1);
        db.add_user(4, "seller", "lead", "network sales", 2);
        db.add_user(5, "ghost", "network operations manager", "infra", 1);
        db.soft_delete("users", 5);
        db.add_user(6, "orphan", "87654321", "infra", 3);

        db.add_alias(1, "ventas@example.com", "sales-team@example.com");
        db.add_alias(2, "soporte@example.com", "support@helpdesk.example");
        db.add_alias(3, "cobros@example.com", "billing@example.com");
        db.add_alias(4, "viejo@example.com", "sales-old@example.com");
        db.soft_delete("aliases", 4);
        db
    }

    pub fn conn(&self) -> Connection {
        Connection::open(&self.path).expect("failed to open database")
    }

    pub fn add_transport(&self, id: i64, domain: &str, transport: &str) {
        self.conn()
            .execute(
                "INSERT INTO transports (id, domain, transport) VALUES (?1, ?2, ?3)",
                params![id, domain, transport],
            )
            .unwrap();
    }

    pub fn add_user(&self, id: i64, login: &str, identificacion: &str, grupo: &str, dominio: i64) {
        self.conn()
            .execute(
                "INSERT INTO users (id, userid, login, email, maildir, identificacion, grupo, dominio, quota)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    id,
                    format!("u{id}"),
                    login,
                    format!("{login}@example.com"),
                    format!("/var/mail/{login}/"),
                    identificacion,
                    grupo,
                    dominio,
                    1024_i64,
                ],
            )
            .unwrap();
    }

    pub fn add_alias(&self, id: i64, local: &str, remoto: &str) {
        self.conn()
            .execute(
                "INSERT INTO aliases (id, local, remoto) VALUES (?1, ?2, ?3)",
                params![id, local, remoto],
            )
            .unwrap();
    }

    pub fn soft_delete(&self, table: &str, id: i64) {
        self.conn()
            .execute(
                &format!("UPDATE {table} SET deleted_at = '2024-01-01 00:00:00' WHERE id = ?1"),
                params![id],
            )
            .unwrap();
    }

    pub fn store(&self) -> Arc<SqliteStore> {
        Arc::new(SqliteStore::new(&self.path))
    }

    pub fn context(&self) -> Result<SearchContext, crate::app::AppError> {
        SearchContext::initialize(self.store(), Arc::new(KeywordEmbedder), THRESHOLDS)
    }
}

/// Deterministic embedder with one axis per keyword plus a small bias axis.
///
/// A token counts once no matter how often it appears, so cosine scores
/// follow from which keywords two texts share:
///
/// - all three of "network operations manager": 1.0
/// - "network" alone against that query: ~0.58
/// - "network" and "sales" against that query: ~0.41
/// - no keyword at all: ~0.06
pub struct KeywordEmbedder;

pub const KEYWORDS: [&str; 6] = [
    "network",
    "operations",
    "manager",
    "sales",
    "billing",
    "support",
];

const BIAS: f32 = 0.1;

impl Embedder for KeywordEmbedder {
    fn name(&self) -> &str {
        "keywords"
    }

    fn dimensions(&self) -> usize {
        KEYWORDS.len() + 1
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts
            .iter()
            .map(|text| {
                let lower = text.to_lowercase();
                let tokens: Vec<&str> = lower
                    .split(|c: char| !c.is_alphanumeric())
                    .filter(|token| !token.is_empty())
                    .collect();

                let mut vector = vec![0.0; self.dimensions()];
                vector[0] = BIAS;
                for (axis, keyword) in KEYWORDS.iter().enumerate() {
                    if tokens.contains(keyword) {
                        vector[axis + 1] = 1.0;
                    }
                }
                vector
            })
            .collect())
    }
}
