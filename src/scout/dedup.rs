// src/scout/dedup.rs
use std::collections::HashSet;

use super::Candidate;

/// Dedup key: lower-cased, whitespace runs collapsed to one space, trimmed.
pub fn normalize_title(title: &str) -> String {
    title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Drop items whose normalized title was already seen; the earliest occurrence wins.
/// Returns (kept, dropped_count).
pub fn dedup_by_title<T: Candidate>(items: Vec<T>) -> (Vec<T>, usize) {
    let mut seen: HashSet<String> = HashSet::with_capacity(items.len());
    let total = items.len();
    let kept: Vec<T> = items
        .into_iter()
        .filter(|it| seen.insert(normalize_title(it.title())))
        .collect();
    let dropped = total - kept.len();
    (kept, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::types::RawIdea;

    fn titles(items: &[RawIdea]) -> Vec<&str> {
        items.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn case_and_whitespace_variants_collapse() {
        assert_eq!(normalize_title("  AI   Agents\tRising "), "ai agents rising");
    }

    #[test]
    fn first_occurrence_wins() {
        let items = vec![
            RawIdea::new(1, "AI Agents Rising", "A"),
            RawIdea::new(2, "ai agents rising", "B"),
            RawIdea::new(3, "New Tool", "A"),
        ];
        let (kept, dropped) = dedup_by_title(items);
        assert_eq!(titles(&kept), vec!["AI Agents Rising", "New Tool"]);
        assert_eq!(kept[0].id, 1);
        assert_eq!(dropped, 1);
    }

    #[test]
    fn empty_input() {
        let (kept, dropped) = dedup_by_title(Vec::<RawIdea>::new());
        assert!(kept.is_empty());
        assert_eq!(dropped, 0);
    }
}
