//! Relational store access.
//!
//! Every call opens its own read-only connection; the connection and its
//! statement are dropped on return, error paths included.
//!
//! Substring matching lowercases both sides with `ulower`, a Unicode-aware
//! scalar registered on each connection. SQLite's own `LIKE` only folds ASCII.

use crate::records::{AliasRecord, Transport, UserRecord};
use rusqlite::{functions::FunctionFlags, params, Connection, OpenFlags, Row};
use std::path::PathBuf;

pub trait RecordStore: Send + Sync {
    fn live_users(&self) -> Result<Vec<UserRecord>, StoreError>;
    fn live_aliases(&self) -> Result<Vec<AliasRecord>, StoreError>;
    fn find_users(&self, needle: &str) -> Result<Vec<UserRecord>, StoreError>;
    fn find_aliases(&self, needle: &str) -> Result<Vec<AliasRecord>, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to open store at {path}: {source}")]
    Open {
        path: PathBuf,
        source: rusqlite::Error,
    },

    #[error("query failed: {0}")]
    Query(#[from] rusqlite::Error),
}

const USERS_SELECT: &str = "
    SELECT u.id, u.userid, u.login, u.email, u.maildir, u.identificacion,
           u.grupo, u.dominio, u.quota, t.id, t.domain, t.transport
    FROM users u
    JOIN transports t ON u.dominio = t.id
    WHERE u.deleted_at IS NULL AND t.deleted_at IS NULL";

const ALIASES_SELECT: &str = "
    SELECT id, local, remoto
    FROM aliases
    WHERE deleted_at IS NULL";

const USERS_MATCH: &str = r"
      AND (ulower(u.login) LIKE ?1 ESCAPE '\' OR ulower(u.email) LIKE ?1 ESCAPE '\'
           OR ulower(u.maildir) LIKE ?1 ESCAPE '\'
           OR ulower(u.identificacion) LIKE ?1 ESCAPE '\'
           OR ulower(u.grupo) LIKE ?1 ESCAPE '\' OR ulower(t.domain) LIKE ?1 ESCAPE '\')";

const ALIASES_MATCH: &str = r"
      AND (ulower(local) LIKE ?1 ESCAPE '\' OR ulower(remoto) LIKE ?1 ESCAPE '\')";

/// SQLite-backed store.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|source| StoreError::Open {
            path: self.path.clone(),
            source,
        })?;

        conn.create_scalar_function(
            "ulower",
            1,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            |ctx| {
                let value: Option<String> = ctx.get(0)?;
                Ok(value.map(|text| text.to_lowercase()))
            },
        )?;

        Ok(conn)
    }

    fn query_users(&self, sql: &str, needle: Option<&str>) -> Result<Vec<UserRecord>, StoreError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = match needle {
            Some(needle) => stmt.query_map(params![like_pattern(needle)], user_from_row)?,
            None => stmt.query_map([], user_from_row)?,
        };
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn query_aliases(
        &self,
        sql: &str,
        needle: Option<&str>,
    ) -> Result<Vec<AliasRecord>, StoreError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = match needle {
            Some(needle) => stmt.query_map(params![like_pattern(needle)], alias_from_row)?,
            None => stmt.query_map([], alias_from_row)?,
        };
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

impl RecordStore for SqliteStore {
    fn live_users(&self) -> Result<Vec<UserRecord>, StoreError> {
        self.query_users(&format!("{USERS_SELECT} ORDER BY u.id"), None)
    }

    fn live_aliases(&self) -> Result<Vec<AliasRecord>, StoreError> {
        self.query_aliases(&format!("{ALIASES_SELECT} ORDER BY id"), None)
    }

    fn find_users(&self, needle: &str) -> Result<Vec<UserRecord>, StoreError> {
        self.query_users(
            &format!("{USERS_SELECT}{USERS_MATCH} ORDER BY u.id"),
            Some(needle),
        )
    }

    fn find_aliases(&self, needle: &str) -> Result<Vec<AliasRecord>, StoreError> {
        self.query_aliases(
            &format!("{ALIASES_SELECT}{ALIASES_MATCH} ORDER BY id"),
            Some(needle),
        )
    }
}

/// Lowercases `needle` and wraps it for a literal substring LIKE with `\`
/// as escape.
pub fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<UserRecord> {
    Ok(UserRecord {
        id: row.get(0)?,
        userid: row.get(1)?,
        login: row.get(2)?,
        email: row.get(3)?,
        maildir: row.get(4)?,
        identificacion: row.get(5)?,
        grupo: row.get(6)?,
        dominio: row.get(7)?,
        quota: row.get(8)?,
        transport: Transport {
            id: row.get(9)?,
            domain: row.get(10)?,
            transport: row.get(11)?,
        },
    })
}

fn alias_from_row(row: &Row<'_>) -> rusqlite::Result<AliasRecord> {
    Ok(AliasRecord {
        id: row.get(0)?,
        local: row.get(1)?,
        remoto: row.get(2)?,
    })
}
