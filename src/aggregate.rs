/// Label used for records whose category is missing or blank.
pub const OTHER_LABEL: &str = "Otros";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedGroup {
    pub label: String,
    pub count: usize,
}

/// Group `records` by the label `key` extracts, count each group and order the
/// groups by descending count. Ties keep first-seen order.
pub fn group_by_count<T, F>(records: &[T], key: F) -> Vec<AggregatedGroup>
where
    F: Fn(&T) -> Option<&str>,
{
    let mut groups: Vec<AggregatedGroup> = Vec::new();
    for record in records {
        let label = match key(record).map(str::trim) {
            Some(l) if !l.is_empty() => l,
            _ => OTHER_LABEL,
        };
        match groups.iter_mut().find(|g| g.label == label) {
            Some(g) => g.count += 1,
            None => groups.push(AggregatedGroup {
                label: label.to_string(),
                count: 1,
            }),
        }
    }
    // sort_by is stable
    groups.sort_by(|a, b| b.count.cmp(&a.count));
    groups
}

pub fn total(groups: &[AggregatedGroup]) -> usize {
    groups.iter().map(|g| g.count).sum()
}
