//! CLI command implementations

pub(crate) mod count;
pub(crate) mod declare;
pub(crate) mod delete;
pub(crate) mod deps;
pub(crate) mod drop;
pub(crate) mod heading;
pub(crate) mod insert;
pub(crate) mod size;
