#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn make_expense(id: i64, tag: &str, amount: Decimal, date: NaiveDate) -> Expense {
    Expense {
        id,
        name: format!("gasto {id}"),
        tag: tag.into(),
        amount,
        date,
    }
}

// Wednesday
fn today() -> NaiveDate {
    d(2024, 6, 12)
}

fn fixture() -> Vec<Expense> {
    vec![
        make_expense(1, "Comida", dec!(100), d(2024, 6, 12)),
        make_expense(2, "Comida", dec!(50.25), d(2024, 6, 10)),
        make_expense(3, "Transporte", dec!(20), d(2024, 6, 16)),
        make_expense(4, "Servicios", dec!(5000), d(2024, 6, 1)),
        make_expense(5, "Comida", dec!(75), d(2024, 6, 9)),
        make_expense(6, "Ocio", dec!(300), d(2024, 1, 1)),
        make_expense(7, "Ocio", dec!(999), d(2023, 12, 31)),
        make_expense(8, "Transporte", dec!(10), d(2024, 6, 30)),
        make_expense(9, "Comida", dec!(1), d(2024, 7, 1)),
    ]
}

fn ids(summary: &Summary) -> Vec<i64> {
    let mut ids: Vec<i64> = summary.expenses.iter().map(|e| e.id).collect();
    ids.sort();
    ids
}

// ── Period bounds ─────────────────────────────────────────────

#[test]
fn test_week_starts_monday() {
    let (start, end) = PeriodFilter::new(Period::Week).bounds(today()).unwrap();
    assert_eq!(start, d(2024, 6, 10));
    assert_eq!(end, d(2024, 6, 16));
}

#[test]
fn test_week_on_sunday_and_monday() {
    let filter = PeriodFilter::new(Period::Week);
    assert_eq!(filter.bounds(d(2024, 6, 16)).unwrap(), (d(2024, 6, 10), d(2024, 6, 16)));
    assert_eq!(filter.bounds(d(2024, 6, 17)).unwrap(), (d(2024, 6, 17), d(2024, 6, 23)));
}

#[test]
fn test_week_across_year_boundary() {
    let filter = PeriodFilter::new(Period::Week);
    assert_eq!(filter.bounds(d(2025, 1, 1)).unwrap(), (d(2024, 12, 30), d(2025, 1, 5)));
}

#[test]
fn test_month_bounds() {
    let filter = PeriodFilter::new(Period::Month);
    assert_eq!(filter.bounds(today()).unwrap(), (d(2024, 6, 1), d(2024, 6, 30)));
    assert_eq!(filter.bounds(d(2024, 2, 14)).unwrap(), (d(2024, 2, 1), d(2024, 2, 29)));
    assert_eq!(filter.bounds(d(2023, 12, 31)).unwrap(), (d(2023, 12, 1), d(2023, 12, 31)));
}

#[test]
fn test_year_bounds() {
    let filter = PeriodFilter::new(Period::Year);
    assert_eq!(filter.bounds(today()).unwrap(), (d(2024, 1, 1), d(2024, 12, 31)));
}

#[test]
fn test_custom_bounds() {
    assert_eq!(PeriodFilter::custom(None, None).bounds(today()), None);
    assert_eq!(PeriodFilter::custom(Some(d(2024, 1, 1)), None).bounds(today()), None);
    assert_eq!(PeriodFilter::custom(None, Some(d(2024, 1, 1))).bounds(today()), None);
    assert_eq!(
        PeriodFilter::custom(Some(d(2024, 1, 1)), Some(d(2024, 1, 31))).bounds(today()),
        Some((d(2024, 1, 1), d(2024, 1, 31)))
    );
}

#[test]
fn test_custom_reversed_bounds_are_swapped() {
    assert_eq!(
        PeriodFilter::custom(Some(d(2024, 1, 31)), Some(d(2024, 1, 1))).bounds(today()),
        Some((d(2024, 1, 1), d(2024, 1, 31)))
    );
}

// ── Filtering ─────────────────────────────────────────────────

#[test]
fn test_day_keeps_only_today() {
    let expenses = fixture();
    let summary = summarize(&expenses, &PeriodFilter::new(Period::Day), today());
    assert_eq!(ids(&summary), vec![1]);
}

#[test]
fn test_week_is_inclusive() {
    let expenses = fixture();
    let summary = summarize(&expenses, &PeriodFilter::new(Period::Week), today());
    // Monday 10th and Sunday 16th are both in; Sunday 9th is out
    assert_eq!(ids(&summary), vec![1, 2, 3]);
}

#[test]
fn test_month_is_inclusive() {
    let expenses = fixture();
    let summary = summarize(&expenses, &PeriodFilter::new(Period::Month), today());
    assert_eq!(ids(&summary), vec![1, 2, 3, 4, 5, 8]);
}

#[test]
fn test_year() {
    let expenses = fixture();
    let summary = summarize(&expenses, &PeriodFilter::new(Period::Year), today());
    assert_eq!(ids(&summary), vec![1, 2, 3, 4, 5, 6, 8, 9]);
}

#[test]
fn test_custom_unset_keeps_everything() {
    let expenses = fixture();
    for filter in [
        PeriodFilter::custom(None, None),
        PeriodFilter::custom(Some(d(2024, 6, 1)), None),
        PeriodFilter::custom(None, Some(d(2024, 6, 1))),
    ] {
        let summary = summarize(&expenses, &filter, today());
        assert_eq!(summary.expenses.len(), expenses.len());
    }
}

#[test]
fn test_custom_range_inclusive() {
    let expenses = fixture();
    let filter = PeriodFilter::custom(Some(d(2023, 12, 31)), Some(d(2024, 6, 1)));
    let summary = summarize(&expenses, &filter, today());
    assert_eq!(ids(&summary), vec![4, 6, 7]);
}

#[test]
fn test_every_period_matches_its_bounds() {
    let expenses = fixture();
    for &period in Period::all() {
        let filter = PeriodFilter::new(period);
        let summary = summarize(&expenses, &filter, today());
        let expected: Vec<i64> = match filter.bounds(today()) {
            Some((start, end)) => expenses
                .iter()
                .filter(|e| start <= e.date && e.date <= end)
                .map(|e| e.id)
                .collect(),
            None => expenses.iter().map(|e| e.id).collect(),
        };
        assert_eq!(ids(&summary), expected, "period {period}");
    }
}

#[test]
fn test_sorted_most_recent_first() {
    let expenses = fixture();
    let summary = summarize(&expenses, &PeriodFilter::new(Period::Month), today());
    let dates: Vec<NaiveDate> = summary.expenses.iter().map(|e| e.date).collect();
    let mut sorted = dates.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(dates, sorted);
    assert_eq!(summary.expenses[0].id, 8);
}

#[test]
fn test_empty_list() {
    let summary = summarize(&[], &PeriodFilter::default(), today());
    assert!(summary.expenses.is_empty());
    assert_eq!(summary.total, Decimal::ZERO);
    assert!(summary.by_tag.is_empty());
}

// ── Aggregation ───────────────────────────────────────────────

#[test]
fn test_total_is_sum_of_visible() {
    let expenses = fixture();
    let summary = summarize(&expenses, &PeriodFilter::new(Period::Month), today());
    assert_eq!(summary.total, dec!(5255.25));
}

#[test]
fn test_tag_subtotals() {
    let expenses = fixture();
    let summary = summarize(&expenses, &PeriodFilter::new(Period::Month), today());
    assert_eq!(
        summary.by_tag,
        vec![
            ("Servicios".to_string(), dec!(5000)),
            ("Comida".to_string(), dec!(225.25)),
            ("Transporte".to_string(), dec!(30)),
        ]
    );
}

#[test]
fn test_tag_partition_sums_to_total() {
    let expenses = fixture();
    for &period in Period::all() {
        let summary = summarize(&expenses, &PeriodFilter::new(period), today());
        let partition: Decimal = summary.by_tag.iter().map(|(_, amt)| *amt).sum();
        assert_eq!(partition, summary.total, "period {period}");
    }
}

#[test]
fn test_equal_subtotals_ordered_by_tag() {
    let expenses = vec![
        make_expense(1, "b", dec!(10), today()),
        make_expense(2, "a", dec!(10), today()),
    ];
    let summary = summarize(&expenses, &PeriodFilter::new(Period::Day), today());
    assert_eq!(summary.by_tag[0].0, "a");
    assert_eq!(summary.by_tag[1].0, "b");
}

// ── Period helpers ────────────────────────────────────────────

#[test]
fn test_period_parse() {
    assert_eq!(Period::parse("día"), Some(Period::Day));
    assert_eq!(Period::parse("DIA"), Some(Period::Day));
    assert_eq!(Period::parse("semana"), Some(Period::Week));
    assert_eq!(Period::parse("month"), Some(Period::Month));
    assert_eq!(Period::parse("año"), Some(Period::Year));
    assert_eq!(Period::parse("custom"), Some(Period::Custom));
    assert_eq!(Period::parse("quincena"), None);
}

#[test]
fn test_period_cycle() {
    assert_eq!(Period::Day.next(), Period::Week);
    assert_eq!(Period::Custom.next(), Period::Day);
    assert_eq!(Period::Day.prev(), Period::Custom);
    for &p in Period::all() {
        assert_eq!(p.next().prev(), p);
    }
}

#[test]
fn test_default_period_is_month() {
    assert_eq!(PeriodFilter::default().period, Period::Month);
}

#[test]
fn test_describe() {
    assert_eq!(PeriodFilter::new(Period::Day).describe(today()), "Día (2024-06-12)");
    assert_eq!(
        PeriodFilter::new(Period::Month).describe(today()),
        "Mes (2024-06-01 – 2024-06-30)"
    );
    assert_eq!(PeriodFilter::custom(None, None).describe(today()), "Custom (todo)");
}

// ── Tags ──────────────────────────────────────────────────────

#[test]
fn test_available_tags_merges_and_dedupes() {
    let expenses = fixture();
    let recurring = vec![RecurringExpense {
        id: 1,
        name: "Internet".into(),
        tag: "Hogar".into(),
        amount: dec!(5000),
        last_applied_at: None,
        last_expense_id: None,
    }];
    let tags = available_tags(&expenses, &recurring);
    assert_eq!(tags, vec!["Comida", "Hogar", "Ocio", "Servicios", "Transporte"]);
}

#[test]
fn test_complete_tag() {
    let tags = vec!["Comida".to_string(), "Servicios".to_string()];
    assert_eq!(complete_tag(&tags, "co"), Some("Comida"));
    assert_eq!(complete_tag(&tags, "SER"), Some("Servicios"));
    assert_eq!(complete_tag(&tags, "Comida"), None);
    assert_eq!(complete_tag(&tags, ""), None);
    assert_eq!(complete_tag(&tags, "x"), None);
}

#[test]
fn test_totals_saturate_instead_of_overflowing() {
    let expenses = vec![
        make_expense(1, "Inversión", Decimal::MAX, today()),
        make_expense(2, "Inversión", Decimal::MAX, today()),
        make_expense(3, "Comida", dec!(10), today()),
    ];
    let summary = summarize(&expenses, &PeriodFilter::new(Period::Day), today());
    assert_eq!(summary.total, Decimal::MAX);
    assert_eq!(
        summary.by_tag,
        vec![
            ("Inversión".to_string(), Decimal::MAX),
            ("Comida".to_string(), dec!(10)),
        ]
    );
}

#[test]
fn test_negative_totals_saturate() {
    let expenses = vec![
        make_expense(1, "Ajuste", Decimal::MIN, today()),
        make_expense(2, "Ajuste", Decimal::MIN, today()),
    ];
    let summary = summarize(&expenses, &PeriodFilter::new(Period::Day), today());
    assert_eq!(summary.total, Decimal::MIN);
}
