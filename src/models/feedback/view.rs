use super::types::FeedbackItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Parse a query-string value; anything other than "asc" means Desc.
    pub fn from_param(s: &str) -> Self {
        if s.eq_ignore_ascii_case("asc") {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

/// An in-memory snapshot of the feedback stream. Every view is re-derived
/// from the unchanged snapshot; the snapshot itself is never mutated.
pub struct FeedbackSnapshot {
    items: Vec<FeedbackItem>,
}

impl FeedbackSnapshot {
    pub fn new(items: Vec<FeedbackItem>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// "All" followed by the distinct categories in first-seen snapshot order.
    pub fn categories(&self) -> Vec<String> {
        let mut categories = vec!["All".to_string()];
        for item in &self.items {
            if !categories.iter().any(|c| c == &item.category) {
                categories.push(item.category.clone());
            }
        }
        categories
    }

    /// Filtered, sorted view of the snapshot.
    ///
    /// The filter is an exact category match, bypassed entirely for "All".
    /// Sorting is by creation timestamp with a stable sort, so items with
    /// identical timestamps keep their snapshot order in either direction.
    pub fn view(&self, category_filter: &str, order: SortOrder) -> Vec<&FeedbackItem> {
        let mut result: Vec<&FeedbackItem> = self
            .items
            .iter()
            .filter(|item| category_filter == "All" || item.category == category_filter)
            .collect();

        match order {
            SortOrder::Asc => result.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            SortOrder::Desc => result.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn item(id: i64, category: &str, secs: i64) -> FeedbackItem {
        FeedbackItem {
            id,
            content: format!("feedback {id}"),
            category: category.to_string(),
            kind: "suggestion".to_string(),
            member_id: Some(100 + id),
            is_anonymous: false,
            created_at: ts(secs),
        }
    }

    fn snapshot() -> FeedbackSnapshot {
        FeedbackSnapshot::new(vec![
            item(1, "Ideas", 10),
            item(2, "Grievances", 20),
            item(3, "Ideas", 30),
        ])
    }

    #[test]
    fn all_filter_returns_everything() {
        let snap = snapshot();
        let view = snap.view("All", SortOrder::Desc);
        assert_eq!(view.len(), 3);
        assert_eq!(view[0].id, 3);
        assert_eq!(view[2].id, 1);
    }

    #[test]
    fn category_filter_is_exact_match() {
        let snap = snapshot();
        let view = snap.view("Ideas", SortOrder::Asc);
        let ids: Vec<i64> = view.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 3]);

        // No partial or case-insensitive matching.
        assert!(snap.view("ideas", SortOrder::Asc).is_empty());
        assert!(snap.view("Idea", SortOrder::Asc).is_empty());
    }

    #[test]
    fn asc_and_desc_are_exact_reverses_without_ties() {
        let snap = snapshot();
        let asc: Vec<i64> = snap.view("All", SortOrder::Asc).iter().map(|i| i.id).collect();
        let mut desc: Vec<i64> = snap.view("All", SortOrder::Desc).iter().map(|i| i.id).collect();
        desc.reverse();
        assert_eq!(asc, desc);
    }

    #[test]
    fn tied_timestamps_keep_snapshot_order() {
        let snap = FeedbackSnapshot::new(vec![
            item(1, "Ideas", 50),
            item(2, "Ideas", 50),
            item(3, "Ideas", 50),
        ]);
        let asc: Vec<i64> = snap.view("All", SortOrder::Asc).iter().map(|i| i.id).collect();
        let desc: Vec<i64> = snap.view("All", SortOrder::Desc).iter().map(|i| i.id).collect();
        assert_eq!(asc, vec![1, 2, 3]);
        assert_eq!(desc, vec![1, 2, 3]);
    }

    #[test]
    fn views_do_not_mutate_the_snapshot() {
        let snap = snapshot();
        let _ = snap.view("Ideas", SortOrder::Asc);
        let _ = snap.view("All", SortOrder::Desc);
        let again: Vec<i64> = snap.view("All", SortOrder::Asc).iter().map(|i| i.id).collect();
        assert_eq!(again, vec![1, 2, 3]);
        assert_eq!(snap.len(), 3);
    }

    #[test]
    fn categories_list_all_first_then_first_seen_order() {
        let snap = snapshot();
        assert_eq!(snap.categories(), vec!["All", "Ideas", "Grievances"]);
    }

    #[test]
    fn sort_order_parsing() {
        assert_eq!(SortOrder::from_param("asc"), SortOrder::Asc);
        assert_eq!(SortOrder::from_param("ASC"), SortOrder::Asc);
        assert_eq!(SortOrder::from_param("desc"), SortOrder::Desc);
        assert_eq!(SortOrder::from_param("anything"), SortOrder::Desc);
        assert_eq!(SortOrder::Asc.toggled(), SortOrder::Desc);
    }
}
