//! Pure presentation helpers: filtering, ordering, and proportion math.
//! Render-agnostic so any surface (terminal, web view, tests) consumes
//! the same logic.

use std::cmp::Reverse;

use crate::types::Question;

/// Ephemeral, client-only list controls. Default is the unfiltered
/// insertion-order view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters {
    pub search: String,
    pub kind: FilterKind,
    pub sort: SortKey,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterKind {
    #[default]
    All,
    NotVoted,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Insertion order, as the ids come back from the contract.
    #[default]
    CreationOrder,
    Newest,
    MostVotes,
}

impl Filters {
    fn matches(&self, question: &Question) -> bool {
        let matches_search = question
            .title
            .to_lowercase()
            .contains(&self.search.to_lowercase());
        match self.kind {
            FilterKind::All => matches_search,
            FilterKind::NotVoted => matches_search && !question.has_voted,
        }
    }
}

/// Applies filter and sort to a snapshot. Questions arrive in id-listing
/// order, which is creation order; the contract records no timestamps, so
/// `Newest` is that order reversed.
pub fn apply<'a>(filters: &Filters, questions: &'a [Question]) -> Vec<&'a Question> {
    let mut visible: Vec<&Question> = questions.iter().filter(|q| filters.matches(q)).collect();
    match filters.sort {
        SortKey::CreationOrder => {}
        SortKey::Newest => visible.reverse(),
        SortKey::MostVotes => visible.sort_by_key(|q| Reverse(q.total_votes())),
    }
    visible
}

/// Share of `count` in `total` as a percentage. A question with no votes
/// yet renders as 0%, never as a division error.
pub fn percent(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 * 100.0 / total as f64
}
