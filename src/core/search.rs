use crate::domain::model::{Dataset, Record};

/// Shorter queries show the placeholder instead of results.
pub const MIN_QUERY_CHARS: usize = 2;

pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

pub fn is_query_too_short(query: &str) -> bool {
    normalize_query(query).chars().count() < MIN_QUERY_CHARS
}

/// Records whose code or label contains the query, case-insensitively, in dataset order.
pub fn search<'a>(query: &str, dataset: &'a Dataset) -> Vec<&'a Record> {
    let query = normalize_query(query);
    if query.chars().count() < MIN_QUERY_CHARS {
        return Vec::new();
    }

    dataset
        .records()
        .iter()
        .filter(|record| {
            record.code().to_lowercase().contains(&query)
                || record.label().to_lowercase().contains(&query)
        })
        .collect()
}
