//! Unit tests for filtering and ranking

use algoscan::models::{OpportunityLevel, RiskLevel, ScanFilters, StockScore};
use algoscan::signals::{filter_results, sort_by_opportunity};

fn score(
    symbol: &str,
    opportunity: OpportunityLevel,
    weighted_score: f64,
    confidence: f64,
) -> StockScore {
    StockScore {
        symbol: symbol.to_string(),
        last_price: 10.0,
        volume: 150_000.0,
        buy_signals: 2,
        sell_signals: 0,
        hold_signals: 1,
        setup_signals: 0,
        weighted_score,
        confidence,
        risk: RiskLevel::Medium,
        opportunity,
        reasoning: vec![],
    }
}

fn sample_scores() -> Vec<StockScore> {
    let mut scores = vec![
        score("A", OpportunityLevel::Low, 0.5, 0.2),
        score("B", OpportunityLevel::High, 3.0, 0.9),
        score("C", OpportunityLevel::Medium, 1.5, 0.7),
        score("D", OpportunityLevel::Medium, 1.5, 0.8),
        score("E", OpportunityLevel::Medium, 2.5, 0.65),
    ];
    scores[0].risk = RiskLevel::High;
    scores[0].volume = 10_000.0;
    scores[0].buy_signals = 0;
    scores[0].setup_signals = 0;
    scores[4].buy_signals = 0;
    scores[4].setup_signals = 3;
    scores
}

#[test]
fn test_permissive_filters_keep_everything() {
    let filters = ScanFilters {
        min_confidence: 0.0,
        min_weighted_score: -100.0,
        max_risk: RiskLevel::High,
        min_opportunity: OpportunityLevel::Low,
        min_volume: 0.0,
        required_signals: 0,
    };
    assert_eq!(filters, ScanFilters::permissive());
    let scores = sample_scores();
    assert_eq!(filter_results(scores.clone(), &filters), scores);
}

#[test]
fn test_default_filters() {
    let kept: Vec<String> = filter_results(sample_scores(), &ScanFilters::default())
        .into_iter()
        .map(|s| s.symbol)
        .collect();
    // E passes through its setup votes, A fails on every criterion
    assert_eq!(kept, vec!["B", "C", "D", "E"]);
}

#[test]
fn test_thresholds_are_inclusive() {
    let mut s = score("X", OpportunityLevel::Medium, 1.0, 0.6);
    s.volume = 100_000.0;
    assert!(ScanFilters::default().accepts(&s));
    s.confidence = 0.59;
    assert!(!ScanFilters::default().accepts(&s));
}

#[test]
fn test_relaxing_a_criterion_never_shrinks_results() {
    let strict = ScanFilters {
        min_confidence: 0.75,
        min_weighted_score: 2.0,
        max_risk: RiskLevel::Low,
        min_opportunity: OpportunityLevel::High,
        min_volume: 200_000.0,
        required_signals: 3,
    };
    let permissive = ScanFilters::permissive();
    let relaxations: [fn(&mut ScanFilters, &ScanFilters); 6] = [
        |f, p| f.min_confidence = p.min_confidence,
        |f, p| f.min_weighted_score = p.min_weighted_score,
        |f, p| f.max_risk = p.max_risk,
        |f, p| f.min_opportunity = p.min_opportunity,
        |f, p| f.min_volume = p.min_volume,
        |f, p| f.required_signals = p.required_signals,
    ];

    for start in [strict, ScanFilters::default()] {
        let mut current = start;
        for relax in &relaxations {
            let before = filter_results(sample_scores(), &current).len();
            relax(&mut current, &permissive);
            let after = filter_results(sample_scores(), &current).len();
            assert!(after >= before, "relaxing shrank {} -> {}", before, after);
        }
        assert_eq!(current, permissive);
    }
}

#[test]
fn test_sort_by_opportunity_then_score_then_confidence() {
    let mut scores = sample_scores();
    sort_by_opportunity(&mut scores);
    let order: Vec<&str> = scores.iter().map(|s| s.symbol.as_str()).collect();
    assert_eq!(order, vec!["B", "E", "D", "C", "A"]);

    for pair in scores.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(a.opportunity >= b.opportunity);
        if a.opportunity == b.opportunity {
            assert!(a.weighted_score >= b.weighted_score);
            if a.weighted_score == b.weighted_score {
                assert!(a.confidence >= b.confidence);
            }
        }
    }
}

#[test]
fn test_sort_is_stable_for_ties() {
    let mut scores = vec![
        score("first", OpportunityLevel::Medium, 1.0, 0.5),
        score("second", OpportunityLevel::Medium, 1.0, 0.5),
    ];
    sort_by_opportunity(&mut scores);
    assert_eq!(scores[0].symbol, "first");
}
