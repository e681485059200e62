//! Search filter over the in-memory font list.

/// Families whose name contains `query`, ignoring case, in their original order.
///
/// An empty query returns every family.
pub fn filter_fonts(all: &[String], query: &str) -> Vec<String> {
    if query.is_empty() {
        return all.to_vec();
    }
    let query_lower = query.to_lowercase();
    all.iter()
        .filter(|name| name.to_lowercase().contains(&query_lower))
        .cloned()
        .collect()
}
