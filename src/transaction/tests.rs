use std::collections::HashMap;

use chrono::NaiveDate;

use crate::csv_reader::tests::fixture_filename;
use crate::error::LedgerError;
use crate::profile::{Profile, ProfileRegistry};
use crate::transaction::TransactionSet;

fn amex() -> Profile {
    ProfileRegistry::builtin().get("amex").unwrap().clone()
}

/// Same columns as amex but negative amounts are kept
fn amex_keep_negatives() -> Profile {
    Profile::new("amex-all", "amount", "date", "category", "description", false).unwrap()
}

fn raw_row(date: &str, amount: &str, category: &str, description: &str) -> HashMap<String, String> {
    HashMap::from([
        ("Date".to_string(), date.to_string()),
        ("Amount".to_string(), amount.to_string()),
        ("Category".to_string(), category.to_string()),
        ("Description".to_string(), description.to_string()),
    ])
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_from_csv() {
    let activity = TransactionSet::from_csv(amex(), &fixture_filename("amex.csv")).unwrap();

    // the -5.00 refund row is dropped by the amex profile
    assert_eq!(activity.len(), 3);
    assert_eq!(activity.sum(), 70.75);
    assert_eq!(activity.date_range(), Some((date(2023, 1, 2), date(2023, 2, 10))));
    assert_eq!(activity.to_string(), "01/02/23 - 02/10/23; n=3, sum=$70.75");

    let first = &activity.records()[0];
    assert_eq!(first.date, date(2023, 1, 2));
    assert_eq!(first.amount, 10.0);
    assert_eq!(first.category, "Food");
    assert_eq!(first.description, "Lunch at cafe");
}

#[test]
fn test_from_csv_missing_file() {
    let result = TransactionSet::from_csv(amex(), &fixture_filename("no-such-file.csv"));
    assert!(matches!(result, Err(LedgerError::SourceNotFoundError(_))));
}

#[test]
fn test_negatives_kept_when_not_ignored() {
    let activity =
        TransactionSet::from_csv(amex_keep_negatives(), &fixture_filename("amex.csv")).unwrap();
    assert_eq!(activity.len(), 4);
    assert_eq!(activity.sum(), 65.75);
}

#[test]
fn test_normalise_mixed_case_columns() {
    // Header casing differs from the profile's column names
    let rows = vec![raw_row("01/02/2023", "10.00", "Food", "Lunch")];
    let set = TransactionSet::from_records(amex(), &rows).unwrap();
    assert_eq!(set.len(), 1);
    assert_eq!(set.sum(), 10.0);
}

#[test]
fn test_normalise_strips_currency_formatting() {
    let rows = vec![raw_row("01/02/2023", "$1,234.56", "Travel", "Flight")];
    let set = TransactionSet::from_records(amex(), &rows).unwrap();
    assert_eq!(set.records()[0].amount, 1234.56);
}

#[test]
fn test_malformed_date() {
    let rows = vec![raw_row("2023-01-02", "10.00", "Food", "Lunch")];
    let result = TransactionSet::from_records(amex(), &rows);
    assert_eq!(
        result.unwrap_err(),
        LedgerError::MalformedDateError("2023-01-02".to_string())
    );
}

#[test]
fn test_malformed_amount() {
    let rows = vec![raw_row("01/02/2023", "ten dollars", "Food", "Lunch")];
    let result = TransactionSet::from_records(amex(), &rows);
    assert_eq!(
        result.unwrap_err(),
        LedgerError::MalformedAmountError("ten dollars".to_string())
    );
}

#[test]
fn test_missing_column() {
    let mut row = raw_row("01/02/2023", "10.00", "Food", "Lunch");
    row.remove("Category");
    let result = TransactionSet::from_records(amex(), &[row]);
    assert!(matches!(result, Err(LedgerError::MalformedCsvError(_))));
}

#[test]
fn test_empty_set() {
    let empty = TransactionSet::from_records(amex(), &[]).unwrap();
    assert!(empty.is_empty());
    assert_eq!(empty.sum(), 0.0);
    assert_eq!(empty.date_range(), None);
    assert_eq!(empty.formatted_date_range(), "N/A - N/A");
}

#[test]
fn test_contains_is_structural() {
    let rows = vec![raw_row("01/02/2023", "10.00", "Food", "Lunch")];
    let set = TransactionSet::from_records(amex(), &rows).unwrap();

    let twin = TransactionSet::from_records(amex(), &rows).unwrap();
    assert!(set.contains(&twin.records()[0]));

    let mut other = twin.records()[0].clone();
    other.description = "Dinner".to_string();
    assert!(!set.contains(&other));
}

#[test]
fn test_union_and_difference() {
    let profile = amex_keep_negatives();
    let a = TransactionSet::from_records(
        profile.clone(),
        &[
            raw_row("01/02/2023", "10.00", "Food", "Lunch"),
            raw_row("01/15/2023", "42.50", "Food", "Groceries"),
        ],
    )
    .unwrap();
    let b = TransactionSet::from_records(
        profile,
        &[raw_row("02/10/2023", "18.25", "Transport", "Taxi")],
    )
    .unwrap();

    let both = a.union(&b).unwrap();
    assert_eq!(both.len(), a.len() + b.len());
    assert_eq!(both.sum(), 70.75);
    // self's records come first
    assert_eq!(both.records()[0], a.records()[0]);

    assert_eq!(a.difference(&a).unwrap().len(), 0);

    let only_a = both.difference(&b).unwrap();
    assert_eq!(only_a.len(), 2);
    assert_eq!(only_a.records(), a.records());
}

#[test]
fn test_profile_mismatch() {
    let a = TransactionSet::from_records(amex(), &[]).unwrap();
    let b = TransactionSet::from_records(amex_keep_negatives(), &[]).unwrap();

    assert!(matches!(a.union(&b), Err(LedgerError::ProfileMismatchError(_))));
    assert!(matches!(a.difference(&b), Err(LedgerError::ProfileMismatchError(_))));
}

#[test]
fn test_index_by_partitions() {
    let activity = TransactionSet::from_csv(amex(), &fixture_filename("amex.csv")).unwrap();

    let groups = activity.index_by("category").unwrap();
    let grouped: usize = groups.values().map(TransactionSet::len).sum();
    assert_eq!(grouped, activity.len());

    let food = &groups["Food"];
    assert_eq!(food.len(), 2);
    // original relative order is kept within a group
    assert_eq!(food.records()[0].description, "Lunch at cafe");
    assert_eq!(food.records()[1].description, "Weekly groceries");

    // raw column name, any casing, works too
    let by_raw = activity.index_by("CATEGORY").unwrap();
    assert_eq!(by_raw.len(), groups.len());

    let result = activity.index_by("memo");
    assert!(matches!(result, Err(LedgerError::UnknownFieldError(_))));
}

#[test]
fn test_by_category() {
    let activity = TransactionSet::from_csv(amex(), &fixture_filename("amex.csv")).unwrap();
    let groups = activity.by_category();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups["Food"].sum(), 52.5);
    assert_eq!(groups["Transport"].sum(), 18.25);
}

#[test]
fn test_by_month() {
    let set = TransactionSet::from_records(
        amex(),
        &[
            raw_row("01/05/2023", "10.00", "Food", "Lunch"),
            raw_row("02/10/2023", "18.25", "Transport", "Taxi"),
        ],
    )
    .unwrap();

    let months = set.by_month();
    assert_eq!(months.len(), 2);
    assert_eq!(months["Jan"].len(), 1);
    assert_eq!(months["Feb"].len(), 1);
}

#[test]
fn test_by_description() {
    let activity = TransactionSet::from_csv(amex(), &fixture_filename("amex.csv")).unwrap();

    // case-insensitive by default
    let lunches = activity.by_description("lunch", false).unwrap();
    assert_eq!(lunches.len(), 1);
    assert_eq!(lunches.records()[0].description, "Lunch at cafe");

    let none = activity.by_description("lunch", true).unwrap();
    assert!(none.is_empty());

    // substring search, not a full match
    let taxis = activity.by_description("taxi", false).unwrap();
    assert_eq!(taxis.len(), 1);

    let result = activity.by_description("(unbalanced", false);
    assert!(matches!(result, Err(LedgerError::InvalidPatternError(_))));
}

#[test]
fn test_derived_sets_share_profile() {
    let activity = TransactionSet::from_csv(amex(), &fixture_filename("amex.csv")).unwrap();
    let food = &activity.by_category()["Food"];
    assert_eq!(food.profile(), activity.profile());
}
