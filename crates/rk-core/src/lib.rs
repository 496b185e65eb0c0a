//! rk-core - Core library for relkit
//!
//! This crate provides the types shared by every relkit component: table
//! headings, attribute values and records, the blob codec seam, the
//! foreign-key dependency graph, and configuration parsing.

pub mod blob;
pub mod config;
pub mod erd;
pub mod error;
pub mod heading;
pub mod record;
pub(crate) mod serde_helpers;
pub mod sql_utils;
pub mod table_name;
pub mod table_spec;
pub mod value;

pub use blob::{codec_for, BlobCodec, TaggedCodec};
pub use config::{CodecKind, Config, DatabaseConfig};
pub use erd::{DependencyKind, Erd, ErdRequest, ForeignKeyEdge};
pub use error::{CoreError, CoreResult};
pub use heading::{Attribute, Heading};
pub use record::{Record, Row};
pub use table_name::FullTableName;
pub use table_spec::{SchemaFile, TableSpec};
pub use value::Value;
