#![allow(clippy::unwrap_used)]

use super::*;

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_flag_value() {
    let a = args(&["out.csv", "--periodo", "semana"]);
    assert_eq!(flag_value(&a, "--periodo").map(String::as_str), Some("semana"));
    assert_eq!(flag_value(&a, "--desde"), None);
    // a flag without a value is ignored
    assert_eq!(flag_value(&args(&["--periodo"]), "--periodo"), None);
}

#[test]
fn test_filter_defaults_to_month() {
    let filter = parse_filter(None, &[]).unwrap();
    assert_eq!(filter, PeriodFilter::new(Period::Month));
}

#[test]
fn test_filter_named_period() {
    let name = "Semana".to_string();
    let filter = parse_filter(Some(&name), &[]).unwrap();
    assert_eq!(filter.period, Period::Week);

    let bad = "quincena".to_string();
    let err = parse_filter(Some(&bad), &[]).unwrap_err();
    assert!(err.to_string().contains("quincena"));
}

#[test]
fn test_bounds_imply_custom() {
    let a = args(&["--desde", "2024-06-01", "--hasta", "2024-06-15"]);
    let filter = parse_filter(None, &a).unwrap();
    assert_eq!(filter.period, Period::Custom);
    assert_eq!(
        filter.bounds(date(2024, 6, 20)),
        Some((date(2024, 6, 1), date(2024, 6, 15)))
    );
}

#[test]
fn test_bounds_ignored_for_named_period() {
    let name = "año".to_string();
    let a = args(&["año", "--desde", "2024-06-01"]);
    let filter = parse_filter(Some(&name), &a).unwrap();
    assert_eq!(filter, PeriodFilter::new(Period::Year));
}

#[test]
fn test_invalid_date_rejected() {
    let a = args(&["--desde", "01/06/2024"]);
    let err = parse_filter(None, &a).unwrap_err();
    assert!(err.to_string().contains("AAAA-MM-DD"));
}
