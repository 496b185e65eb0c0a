//! rk-relation - Relations for relkit
//!
//! Binds tables to a shared [`Connection`] and exposes the relational
//! algebra over them: restriction, projection, natural join and aggregation.
//! Relations also own the mutating operations (insert, delete, drop), with
//! drops cascading through the foreign-key [`DependencyGraph`].

pub mod connection;
pub mod dependencies;
pub mod error;
pub mod operand;
pub mod prompt;
pub mod relation;
pub mod schema;

pub use connection::{Connection, ConnectionOptions};
pub use dependencies::DependencyGraph;
pub use error::{RelResult, RelationError};
pub use operand::{Expression, Operand, Restriction};
pub use prompt::{Choice, FixedPrompt, LinePrompt, Prompt, StdinPrompt};
pub use relation::{InsertMode, Relation};
pub use schema::Schema;
