//! Runtime context for CLI commands

use anyhow::{Context, Result};
use rk_core::{Config, CoreError, FullTableName};
use rk_relation::{Connection, FixedPrompt, Relation, StdinPrompt};
use std::path::Path;
use std::sync::Arc;

use crate::cli::GlobalArgs;

/// Runtime context containing the loaded config and the shared connection
pub struct RuntimeContext {
    pub config: Config,

    pub conn: Arc<Connection>,

    /// Verbose output enabled
    pub verbose: bool,
}

impl RuntimeContext {
    /// Create a new runtime context from global arguments
    pub fn new(args: &GlobalArgs) -> Result<Self> {
        let mut config = load_config(args)?;
        if let Some(path) = &args.database {
            config.database.path = path.clone();
        }

        let conn = Connection::open(&config).context("Failed to connect to database")?;
        let conn = if args.yes {
            conn.with_prompt(Arc::new(FixedPrompt::yes()))
        } else {
            conn.with_prompt(Arc::new(StdinPrompt::default()))
        };

        let ctx = Self {
            config,
            conn: Arc::new(conn),
            verbose: args.verbose,
        };
        ctx.verbose(&format!(
            "Connected to {} (schema {}, safe mode {})",
            ctx.config.database.path,
            ctx.config.schema,
            if ctx.conn.safe_mode() { "on" } else { "off" }
        ));
        Ok(ctx)
    }

    /// Print verbose output if enabled
    pub fn verbose(&self, msg: &str) {
        if self.verbose {
            eprintln!("[verbose] {}", msg);
        }
    }

    /// Qualify a table argument; bare names belong to the configured schema
    pub fn table_name(&self, name: &str) -> Result<FullTableName> {
        let qualified = if name.contains('.') {
            FullTableName::parse(name)
        } else {
            FullTableName::new(self.config.schema.as_str(), name)
        };
        qualified.with_context(|| format!("Invalid table name: {name}"))
    }

    /// A relation over `name` with its database's foreign keys loaded
    pub fn relation(&self, name: &str) -> Result<Relation> {
        let table = self.table_name(name)?;
        self.load_dependencies(table.database())?;
        Ok(Relation::bind(self.conn.clone(), table))
    }

    /// Load the dependency graph of every table in `database`
    pub fn load_dependencies(&self, database: &str) -> Result<usize> {
        let loaded = self
            .conn
            .dependencies()
            .load_database(self.conn.database(), database)
            .with_context(|| format!("Failed to load dependencies of {database}"))?;
        self.verbose(&format!("Loaded dependencies of {loaded} table(s) in {database}"));
        Ok(loaded)
    }
}

/// Config from `--config`, else relkit.yml in the project directory, else
/// the defaults
fn load_config(args: &GlobalArgs) -> Result<Config> {
    if let Some(path) = &args.config {
        return Config::load(Path::new(path)).context("Failed to load configuration file");
    }
    match Config::load_from_dir(Path::new(&args.project_dir)) {
        Ok(config) => Ok(config),
        Err(CoreError::ConfigNotFound { .. }) => {
            log::debug!("No relkit.yml in {}, using defaults", args.project_dir);
            Ok(Config::default())
        }
        Err(e) => Err(e).context("Failed to load project configuration"),
    }
}
