//! Serde defaults shared by the config types.

/// Serde default function that returns `true`.
///
/// Used for boolean switches that are on unless explicitly disabled.
pub fn default_true() -> bool {
    true
}
