//! Labeled text serialization of records for embedding.
//!
//! The text is only ever fed to the embedding model; exact matching runs
//! against the store and never looks at it.

use crate::records::{AliasRecord, SearchRecord, UserRecord};

pub fn user_text(user: &UserRecord) -> String {
    format!(
        "ID: {} Login: {} Email: {} Maildir: {} Identificacion: {} Grupo: {} Dominio: {} Transport: {}",
        user.id,
        user.login,
        user.email,
        user.maildir,
        user.identificacion.as_deref().unwrap_or_default(),
        user.grupo.as_deref().unwrap_or_default(),
        user.transport.domain,
        user.transport.transport,
    )
}

pub fn alias_text(alias: &AliasRecord) -> String {
    format!(
        "ID: {} Local: {} Remoto: {}",
        alias.id, alias.local, alias.remoto
    )
}

/// A corpus entry borrowed from a [`Corpus`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorpusEntry<'a> {
    pub position: usize,
    pub id: i64,
    pub text: &'a str,
}

/// Serialized texts and the position -> id map, built in lockstep.
///
/// Entries are identified by position, so two records that serialize to the
/// same text still stay apart.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    texts: Vec<String>,
    ids: Vec<i64>,
}

impl Corpus {
    pub fn build<R: SearchRecord>(records: &[R]) -> Self {
        let mut corpus = Self {
            texts: Vec::with_capacity(records.len()),
            ids: Vec::with_capacity(records.len()),
        };
        for record in records {
            corpus.texts.push(record.corpus_text());
            corpus.ids.push(record.id());
        }
        corpus
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    /// Record id stored at `position`.
    pub fn id_at(&self, position: usize) -> Option<i64> {
        self.ids.get(position).copied()
    }

    pub fn id_map_len(&self) -> usize {
        self.ids.len()
    }

    pub fn entries(&self) -> impl Iterator<Item = CorpusEntry<'_>> {
        self.texts
            .iter()
            .zip(self.ids.iter())
            .enumerate()
            .map(|(position, (text, id))| CorpusEntry {
                position,
                id: *id,
                text,
            })
    }
}
