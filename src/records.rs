use crate::{
    corpus,
    store::{RecordStore, StoreError},
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The two searchable collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Aliases,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Aliases => "aliases",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transport {
    pub id: i64,
    pub domain: String,
    pub transport: String,
}

/// A live mailbox account joined with its transport row.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub id: i64,
    pub userid: Option<String>,
    pub login: String,
    pub email: String,
    pub maildir: String,
    pub identificacion: Option<String>,
    pub grupo: Option<String>,
    /// Foreign key into `transports`.
    pub dominio: i64,
    pub quota: Option<i64>,
    pub transport: Transport,
}

/// A live mail alias. Serialized as-is in responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AliasRecord {
    pub id: i64,
    pub local: String,
    pub remoto: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportView {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Domain")]
    pub domain: String,
    #[serde(rename = "Transport")]
    pub transport: String,
}

/// Response shape of a user, with the transport nested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserView {
    #[serde(rename = "ID")]
    pub id: i64,
    pub userid: Option<String>,
    pub login: String,
    pub email: String,
    pub maildir: String,
    pub identificacion: Option<String>,
    pub grupo: Option<String>,
    pub dominio: i64,
    pub quota: Option<i64>,
    pub transport: TransportView,
}

impl From<&UserRecord> for UserView {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id,
            userid: user.userid.clone(),
            login: user.login.clone(),
            email: user.email.clone(),
            maildir: user.maildir.clone(),
            identificacion: user.identificacion.clone(),
            grupo: user.grupo.clone(),
            dominio: user.dominio,
            quota: user.quota,
            transport: TransportView {
                id: user.transport.id,
                domain: user.transport.domain.clone(),
                transport: user.transport.transport.clone(),
            },
        }
    }
}

/// A record type that can be snapshotted, embedded and searched.
///
/// Ties each collection to its store queries, its corpus text and its
/// response shape so the search pipeline can stay generic.
pub trait SearchRecord: Clone + Send + Sync + 'static {
    type View: Serialize + Clone + Send;

    const COLLECTION: Collection;

    fn id(&self) -> i64;

    /// Labeled text fed to the embedding model.
    fn corpus_text(&self) -> String;

    fn view(&self) -> Self::View;

    /// Every live row, ordered by id.
    fn load_live(store: &dyn RecordStore) -> Result<Vec<Self>, StoreError>;

    /// Live rows with any searchable column containing `needle`.
    fn find_matching(store: &dyn RecordStore, needle: &str) -> Result<Vec<Self>, StoreError>;
}

impl SearchRecord for UserRecord {
    type View = UserView;

    const COLLECTION: Collection = Collection::Users;

    fn id(&self) -> i64 {
        self.id
    }

    fn corpus_text(&self) -> String {
        corpus::user_text(self)
    }

    fn view(&self) -> UserView {
        UserView::from(self)
    }

    fn load_live(store: &dyn RecordStore) -> Result<Vec<Self>, StoreError> {
        store.live_users()
    }

    fn find_matching(store: &dyn RecordStore, needle: &str) -> Result<Vec<Self>, StoreError> {
        store.find_users(needle)
    }
}

impl SearchRecord for AliasRecord {
    type View = AliasRecord;

    const COLLECTION: Collection = Collection::Aliases;

    fn id(&self) -> i64 {
        self.id
    }

    fn corpus_text(&self) -> String {
        corpus::alias_text(self)
    }

    fn view(&self) -> AliasRecord {
        self.clone()
    }

    fn load_live(store: &dyn RecordStore) -> Result<Vec<Self>, StoreError> {
        store.live_aliases()
    }

    fn find_matching(store: &dyn RecordStore, needle: &str) -> Result<Vec<Self>, StoreError> {
        store.find_aliases(needle)
    }
}
