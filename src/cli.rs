use crate::{
    config::{DEFAULT_CACHE_DIR, DEFAULT_DB_PATH, DEFAULT_LISTEN_ADDR},
    records::Collection,
    semantic::{DEFAULT_ALIAS_THRESHOLD, DEFAULT_MODEL, DEFAULT_USER_THRESHOLD},
};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Settings shared by every command. Each one can come from the environment.
#[derive(ClapArgs, Clone)]
pub struct ConfigArgs {
    /// Shared secret expected in the X-Master-Key header
    #[clap(long, env = "MASTER_KEY", hide_env_values = true, global = true)]
    pub master_key: Option<String>,

    /// SQLite database holding users, transports and aliases
    #[clap(long, env = "DB_PATH", default_value = DEFAULT_DB_PATH, global = true)]
    pub db_path: PathBuf,

    /// Address the HTTP server binds to
    #[clap(long, env = "LISTEN_ADDR", default_value = DEFAULT_LISTEN_ADDR, global = true)]
    pub listen_addr: String,

    /// Embedding model name, or "hash" for the offline lexical embedder
    #[clap(long, env = "EMBEDDING_MODEL", default_value = DEFAULT_MODEL, global = true)]
    pub model: String,

    /// Where downloaded models are cached
    #[clap(long, env = "MODEL_CACHE_DIR", default_value = DEFAULT_CACHE_DIR, global = true)]
    pub cache_dir: PathBuf,

    /// Default semantic threshold for user search
    #[clap(long, env = "USER_THRESHOLD", default_value_t = DEFAULT_USER_THRESHOLD, global = true)]
    pub user_threshold: f32,

    /// Default semantic threshold for alias search
    #[clap(long, env = "ALIAS_THRESHOLD", default_value_t = DEFAULT_ALIAS_THRESHOLD, global = true)]
    pub alias_threshold: f32,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq)]
pub enum CollectionArg {
    User,
    Alias,
}

impl From<CollectionArg> for Collection {
    fn from(arg: CollectionArg) -> Self {
        match arg {
            CollectionArg::User => Collection::Users,
            CollectionArg::Alias => Collection::Aliases,
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Build the search indexes and serve the HTTP API
    Serve {},

    /// Build the search indexes, run one search and print the JSON response
    Search {
        /// Collection to search
        #[clap(value_enum)]
        collection: CollectionArg,

        /// One word for substring search, several for semantic search
        #[clap(allow_hyphen_values = true)]
        query: String,

        /// Page number, starting at 1
        #[clap(long, default_value_t = crate::app::service::DEFAULT_PAGE)]
        page: usize,

        /// Results per page
        #[clap(long, default_value_t = crate::app::service::DEFAULT_LIMIT)]
        limit: usize,

        /// Semantic similarity threshold, overriding the collection default
        #[clap(long, allow_hyphen_values = true)]
        threshold: Option<f32>,
    },
}
