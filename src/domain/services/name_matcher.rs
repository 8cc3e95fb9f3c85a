//! Name Matcher
//!
//! Pure lookup of remote records by exact name. No I/O.

use crate::domain::entities::Named;

/// Exact, case-sensitive name matching over remote listings.
///
/// Remote platforms promise unique names but this is not relied on:
/// when a listing contains the same name twice, the first entry in list
/// order wins.
pub struct NameMatcher;

impl NameMatcher {
    /// First item whose name equals `name`.
    pub fn first<'a, T: Named>(items: &'a [T], name: &str) -> Option<&'a T> {
        items.iter().find(|item| item.name() == name)
    }

    /// Number of items carrying `name`.
    pub fn count<T: Named>(items: &[T], name: &str) -> usize {
        items.iter().filter(|item| item.name() == name).count()
    }
}
