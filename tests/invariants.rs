use chrono::NaiveDate;
use serde_json::Map;

use issue_index::{
    IssueIndexAnalytics, KeywordEntry, Period, Trend, TrendDirection, TrendLevel, UpdateFeed,
    UpdateRecord, UpdateType, calculate_trend,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn build_record(
    index_date: NaiveDate,
    score: f64,
    change: f64,
    update_type: UpdateType,
    keywords: &[(&str, f64, TrendLevel)],
) -> UpdateRecord {
    UpdateRecord {
        index_date,
        current_score: score,
        comparison_percentage: change,
        trend_direction: if change >= 0.0 {
            TrendDirection::Up
        } else {
            TrendDirection::Down
        },
        update_type,
        main_keyword: keywords
            .first()
            .map(|(keyword, _, _)| keyword.to_string())
            .unwrap_or_else(|| "none".to_string()),
        top_keywords: keywords
            .iter()
            .map(|(keyword, contribution, trend_level)| KeywordEntry {
                keyword: keyword.to_string(),
                contribution: *contribution,
                trend_level: *trend_level,
            })
            .collect(),
        payload: Map::new(),
    }
}

/// Weekly regular updates across 2024-2025 with a handful of emergencies in between.
fn build_engine() -> IssueIndexAnalytics {
    let mut regular = Vec::new();
    let mut day = date(2024, 1, 7);
    let mut idx = 0u32;
    while day <= date(2025, 6, 29) {
        let score = 40.0 + ((idx * 7) % 45) as f64;
        let change = ((idx * 13) % 41) as f64 - 20.0;
        let keyword = match idx % 3 {
            0 => ("agents", 0.4, TrendLevel::High),
            1 => ("chips", 0.3, TrendLevel::Medium),
            _ => ("policy", 0.2, TrendLevel::Low),
        };
        regular.push(build_record(
            day,
            score,
            change,
            UpdateType::Regular,
            &[keyword, ("open models", 0.1, TrendLevel::Low)],
        ));
        day += chrono::Duration::days(7);
        idx += 1;
    }
    let emergency = vec![
        build_record(
            date(2025, 6, 18),
            95.0,
            42.0,
            UpdateType::Emergency,
            &[("model leak", 0.7, TrendLevel::VeryHigh)],
        ),
        build_record(
            date(2024, 11, 6),
            88.0,
            31.5,
            UpdateType::Emergency,
            &[("chips", 0.6, TrendLevel::VeryHigh)],
        ),
        build_record(
            date(2025, 2, 12),
            20.0,
            -48.0,
            UpdateType::Emergency,
            &[("policy", 0.5, TrendLevel::High)],
        ),
    ];
    IssueIndexAnalytics::new(UpdateFeed::new(regular, emergency)).expect("engine")
}

fn as_of() -> NaiveDate {
    date(2025, 7, 1)
}

#[test]
fn merge_is_complete_and_ordered() {
    let engine = build_engine();
    let all = engine.all_updates();
    assert_eq!(
        all.len(),
        engine.regular_updates().len() + engine.emergency_updates().len()
    );
    assert!(all.windows(2).all(|w| w[0].index_date <= w[1].index_date));
    assert_eq!(
        engine.latest_update().map(|u| u.index_date),
        all.last().map(|u| u.index_date)
    );
}

#[test]
fn periods_are_nested() {
    let engine = build_engine();
    let today = as_of();
    let all = engine.updates_by_period_as_of(Period::All, today);
    let year = engine.updates_by_period_as_of(Period::OneYear, today);
    let half = engine.updates_by_period_as_of(Period::SixMonths, today);
    let quarter = engine.updates_by_period_as_of(Period::ThreeMonths, today);
    assert!(all.len() > year.len());
    assert!(year.len() > half.len());
    assert!(half.len() > quarter.len());
    assert!(!quarter.is_empty());
    // Windows are suffixes of each other, so containment reduces to suffix checks.
    assert!(all.ends_with(year));
    assert!(year.ends_with(half));
    assert!(half.ends_with(quarter));
    assert!(quarter.iter().all(|u| u.index_date >= date(2025, 4, 1)));
}

#[test]
fn statistics_are_consistent_for_every_period() {
    let engine = build_engine();
    for period in [
        Period::ThreeMonths,
        Period::SixMonths,
        Period::OneYear,
        Period::All,
    ] {
        let updates = engine.updates_by_period_as_of(period, as_of());
        let stats = engine.statistics_as_of(period, as_of()).expect("stats");
        assert_eq!(stats.total_updates, updates.len());
        assert_eq!(
            stats.regular_updates + stats.emergency_updates,
            stats.total_updates
        );
        assert!(stats.min_score.score <= stats.avg_score);
        assert!(stats.avg_score <= stats.max_score.score);
        assert_eq!(stats.current_score, updates.last().unwrap().current_score);
        assert_eq!(stats.trend, engine.calculate_trend(updates));
    }
    let all = engine.statistics_as_of(Period::All, as_of()).expect("stats");
    assert_eq!(all.max_score.score, 95.0);
    assert_eq!(all.max_score.date, "2025-06-18");
    assert_eq!(all.min_score.score, 20.0);
    assert_eq!(all.emergency_updates, 3);
}

#[test]
fn empty_window_has_no_statistics() {
    let engine = build_engine();
    let far_future = date(2030, 1, 1);
    assert!(
        engine
            .updates_by_period_as_of(Period::ThreeMonths, far_future)
            .is_empty()
    );
    assert!(engine.statistics_as_of(Period::ThreeMonths, far_future).is_none());
    assert!(engine.chart_data_as_of(Period::ThreeMonths, far_future).is_empty());
    assert!(
        engine
            .keyword_frequency_as_of(Period::ThreeMonths, far_future)
            .is_empty()
    );
}

#[test]
fn surge_detection_respects_threshold_both_ways() {
    let engine = build_engine();
    for threshold in [0.0, 5.0, 15.0, 20.0, 45.0] {
        let events = engine.detect_surge_periods(None, Some(threshold));
        assert!(events.iter().all(|e| e.change.abs() >= threshold));
        let expected = engine
            .all_updates()
            .iter()
            .filter(|u| u.comparison_percentage.abs() >= threshold)
            .count();
        assert_eq!(events.len(), expected);
        assert!(events.windows(2).all(|w| w[0].date <= w[1].date));
    }
}

#[test]
fn keyword_frequency_matches_manual_tally() {
    let engine = build_engine();
    let updates = engine.updates_by_period_as_of(Period::SixMonths, as_of());
    let frequencies = engine.keyword_frequency_as_of(Period::SixMonths, as_of());
    assert!(frequencies.windows(2).all(|w| w[0].frequency >= w[1].frequency));

    for frequency in &frequencies {
        let contributions: Vec<f64> = updates
            .iter()
            .flat_map(|u| u.top_keywords.iter())
            .filter(|k| k.keyword == frequency.keyword)
            .map(|k| k.contribution)
            .collect();
        assert_eq!(frequency.frequency, contributions.len());
        let mean = contributions.iter().sum::<f64>() / contributions.len() as f64;
        assert_eq!(frequency.avg_contribution, (mean * 100.0).round() / 100.0);
    }

    let open_models = frequencies
        .iter()
        .find(|f| f.keyword == "open models")
        .expect("open models");
    let regular_in_window = updates
        .iter()
        .filter(|u| u.update_type == UpdateType::Regular)
        .count();
    assert_eq!(open_models.frequency, regular_in_window);
    let chips = frequencies.iter().find(|f| f.keyword == "chips").expect("chips");
    assert_eq!(chips.trend_level, TrendLevel::Medium);
    let policy = frequencies.iter().find(|f| f.keyword == "policy").expect("policy");
    assert_eq!(policy.trend_level, TrendLevel::High);
}

#[test]
fn trend_classification_on_five_point_windows() {
    let series = |scores: [f64; 5]| -> Vec<UpdateRecord> {
        scores
            .iter()
            .enumerate()
            .map(|(i, s)| {
                build_record(date(2025, 1, 1 + i as u32), *s, 0.0, UpdateType::Regular, &[])
            })
            .collect()
    };
    assert_eq!(calculate_trend(&series([1.0, 2.0, 3.0, 4.0, 5.0])), Trend::Increasing);
    assert_eq!(calculate_trend(&series([5.0, 4.0, 3.0, 2.0, 1.0])), Trend::Decreasing);
    assert_eq!(calculate_trend(&series([3.0, 3.0, 3.0, 3.0, 3.0])), Trend::Stable);
}

#[test]
fn chart_data_projects_each_filtered_update() {
    let engine = build_engine();
    let updates = engine.updates_by_period_as_of(Period::ThreeMonths, as_of());
    let points = engine.chart_data_as_of(Period::ThreeMonths, as_of());
    assert_eq!(points.len(), updates.len());
    for (point, update) in points.iter().zip(updates) {
        assert_eq!(point.date, update.date_string());
        assert_eq!(point.score, update.current_score);
        assert_eq!(point.trend, update.trend_direction);
        assert_eq!(point.update_type, update.update_type);
        assert_eq!(point.main_keyword, update.main_keyword);
        assert_eq!(point.comparison_percentage, update.comparison_percentage);
    }
    let detail = engine.update_by_date(&points[0].date).expect("detail");
    assert_eq!(detail.index_date, updates[0].index_date);
}
