#![allow(clippy::unwrap_used)]

use chrono::DateTime;
use rust_decimal_macros::dec;

use super::util::*;

// ── format_amount ─────────────────────────────────────────────

#[test]
fn test_format_amount_whole() {
    assert_eq!(format_amount(dec!(1000)), "$1000.00");
}

#[test]
fn test_format_amount_no_separators() {
    assert_eq!(format_amount(dec!(1234567.89)), "$1234567.89");
}

#[test]
fn test_format_amount_zero() {
    assert_eq!(format_amount(dec!(0)), "$0.00");
}

#[test]
fn test_format_amount_negative() {
    assert_eq!(format_amount(dec!(-4.5)), "-$4.50");
}

#[test]
fn test_format_amount_rounds_half_up() {
    assert_eq!(format_amount(dec!(2.345)), "$2.35");
    assert_eq!(format_amount(dec!(2.344)), "$2.34");
}

// ── format_timestamp ──────────────────────────────────────────

#[test]
fn test_format_timestamp_shape() {
    let ts = DateTime::parse_from_rfc3339("2024-06-01T12:00:00Z").unwrap();
    let out = format_timestamp(&ts);
    assert_eq!(out.len(), "2024-06-01 12:00".len());
    assert!(out.starts_with("2024-0"));
}

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate_fits() {
    assert_eq!(truncate("Pizza", 10), "Pizza");
    assert_eq!(truncate("Pizza", 5), "Pizza");
}

#[test]
fn test_truncate_long() {
    assert_eq!(truncate("Supermercado", 6), "Super…");
}

#[test]
fn test_truncate_accents() {
    assert_eq!(truncate("Calefacción", 8), "Calefac…");
}

#[test]
fn test_truncate_zero() {
    assert_eq!(truncate("Pizza", 0), "");
}

// ── scrolling ─────────────────────────────────────────────────

#[test]
fn test_scroll_down_moves_window() {
    let (mut index, mut scroll) = (0, 0);
    for _ in 0..5 {
        scroll_down(&mut index, &mut scroll, 10, 3);
    }
    assert_eq!(index, 5);
    assert_eq!(scroll, 3);
}

#[test]
fn test_scroll_down_stops_at_end() {
    let (mut index, mut scroll) = (2, 0);
    scroll_down(&mut index, &mut scroll, 3, 5);
    assert_eq!(index, 2);
}

#[test]
fn test_scroll_up_pulls_window() {
    let (mut index, mut scroll) = (3, 3);
    scroll_up(&mut index, &mut scroll);
    assert_eq!((index, scroll), (2, 2));
    let (mut index, mut scroll) = (0, 0);
    scroll_up(&mut index, &mut scroll);
    assert_eq!((index, scroll), (0, 0));
}

#[test]
fn test_scroll_to_bottom_and_top() {
    let (mut index, mut scroll) = (0, 0);
    scroll_to_bottom(&mut index, &mut scroll, 10, 4);
    assert_eq!((index, scroll), (9, 6));
    scroll_to_top(&mut index, &mut scroll);
    assert_eq!((index, scroll), (0, 0));
}

#[test]
fn test_scroll_to_bottom_empty_list() {
    let (mut index, mut scroll) = (0, 0);
    scroll_to_bottom(&mut index, &mut scroll, 0, 4);
    assert_eq!((index, scroll), (0, 0));
}
