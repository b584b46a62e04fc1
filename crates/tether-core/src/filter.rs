use crate::state::PanelRecord;

/// Indices of records matching `query` against the configured fields,
/// preserving input order. A blank query matches everything; matching is
/// case-insensitive substring over any one of the fields. Unknown fields
/// never match and never error.
pub fn filter_indices<R: PanelRecord>(items: &[R], query: &str, fields: &[&str]) -> Vec<usize> {
    let query = query.trim().to_ascii_lowercase();
    if query.is_empty() {
        return (0..items.len()).collect();
    }

    items
        .iter()
        .enumerate()
        .filter_map(|(idx, record)| {
            let matched = fields.iter().any(|field| {
                record
                    .field(field)
                    .is_some_and(|value| value.to_ascii_lowercase().contains(&query))
            });
            matched.then_some(idx)
        })
        .collect()
}

/// Indices of the records assigned to `section`, in input order.
pub fn section_indices<R: PanelRecord>(items: &[R], section: usize) -> Vec<usize> {
    items
        .iter()
        .enumerate()
        .filter_map(|(idx, record)| (record.section() == section).then_some(idx))
        .collect()
}

/// The visible list for one section: section membership first, then the
/// search filter. This is a presentation-time computation; the reducer
/// never calls it.
pub fn visible_indices<R: PanelRecord>(
    items: &[R],
    section: usize,
    query: &str,
    fields: &[&str],
) -> Vec<usize> {
    let matching = filter_indices(items, query, fields);
    matching
        .into_iter()
        .filter(|&idx| items[idx].section() == section)
        .collect()
}
