//! Filtering and ranking of scan results.

use crate::models::{ScanFilters, StockScore};
use std::cmp::Ordering;

/// Keep the scores accepted by `filters`, preserving order.
pub fn filter_results(scores: Vec<StockScore>, filters: &ScanFilters) -> Vec<StockScore> {
    scores.into_iter().filter(|s| filters.accepts(s)).collect()
}

/// Stable descending sort by opportunity, then weighted score, then confidence.
pub fn sort_by_opportunity(scores: &mut [StockScore]) {
    scores.sort_by(|a, b| {
        b.opportunity
            .cmp(&a.opportunity)
            .then_with(|| {
                b.weighted_score
                    .partial_cmp(&a.weighted_score)
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| b.confidence.partial_cmp(&a.confidence).unwrap_or(Ordering::Equal))
    });
}
