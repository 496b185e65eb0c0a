//! Shared connection: database handle plus the collaborators relations use.

use crate::dependencies::DependencyGraph;
use crate::prompt::{Prompt, StdinPrompt};
use rk_core::{codec_for, BlobCodec, Config, FullTableName, TaggedCodec, Value};
use rk_db::{Cursor, Database, DbResult, DuckDbBackend};
use std::sync::Arc;

/// Behaviour switches fixed when the connection is built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionOptions {
    /// Ask before destructive operations
    pub safe_mode: bool,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self { safe_mode: true }
    }
}

impl From<&Config> for ConnectionOptions {
    fn from(config: &Config) -> Self {
        Self {
            safe_mode: config.safe_mode,
        }
    }
}

/// A database connection shared by every relation bound to it
pub struct Connection {
    db: Arc<dyn Database>,
    dependencies: DependencyGraph,
    codec: Arc<dyn BlobCodec>,
    prompt: Arc<dyn Prompt>,
    options: ConnectionOptions,
}

impl Connection {
    /// Wrap a database with the tagged codec and a stdin prompt
    pub fn new(db: Arc<dyn Database>, options: ConnectionOptions) -> Self {
        Self {
            db,
            dependencies: DependencyGraph::new(),
            codec: Arc::new(TaggedCodec),
            prompt: Arc::new(StdinPrompt::default()),
            options,
        }
    }

    /// Open the database named by a config
    pub fn open(config: &Config) -> DbResult<Self> {
        let db = DuckDbBackend::new(&config.database.path)?;
        log::debug!("Opened {} database at {}", db.db_type(), config.database.path);
        Ok(Self::new(Arc::new(db), ConnectionOptions::from(config))
            .with_codec(codec_for(config.codec)))
    }

    pub fn with_codec(mut self, codec: Arc<dyn BlobCodec>) -> Self {
        self.codec = codec;
        self
    }

    pub fn with_prompt(mut self, prompt: Arc<dyn Prompt>) -> Self {
        self.prompt = prompt;
        self
    }

    /// Run one statement
    pub fn query(&self, sql: &str, args: &[Value]) -> DbResult<Cursor> {
        self.db.query(sql, args)
    }

    /// Table name as it must appear in SQL sent over this connection
    pub fn qualify(&self, table: &FullTableName) -> String {
        table.qualified_in(self.db.catalog())
    }

    pub fn database(&self) -> &dyn Database {
        self.db.as_ref()
    }

    pub fn dependencies(&self) -> &DependencyGraph {
        &self.dependencies
    }

    pub fn codec(&self) -> &dyn BlobCodec {
        self.codec.as_ref()
    }

    pub fn prompt(&self) -> &dyn Prompt {
        self.prompt.as_ref()
    }

    pub fn safe_mode(&self) -> bool {
        self.options.safe_mode
    }

    pub fn options(&self) -> ConnectionOptions {
        self.options
    }
}
