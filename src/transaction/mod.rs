use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};

use crate::csv_reader;
use crate::error::LedgerError;
use crate::profile::{Field, Profile};

#[cfg(test)]
mod tests;

/// Date format used by transaction CSV exports
const DATE_FORMAT: &str = "%m/%d/%Y";

lazy_static! {
    static ref MM_DD_YYYY: Regex = Regex::new(r"^\d{2}/\d{2}/\d{4}$").unwrap();
}

/// A single normalised transaction
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Record {
    pub(crate) date: NaiveDate,
    pub(crate) amount: f32,
    pub(crate) category: String,
    pub(crate) description: String,
}

/// An ordered collection of transactions normalised under one profile.
/// Sets are never mutated in place; filtering, grouping and set operations
/// all build new sets carrying the same profile.
#[derive(Debug, Clone)]
pub(crate) struct TransactionSet {
    profile: Profile,
    records: Vec<Record>,
}

impl TransactionSet {
    /// Load a CSV file and normalise its rows
    pub(crate) fn from_csv(profile: Profile, file_path: &Path) -> Result<TransactionSet, LedgerError> {
        let rows = csv_reader::load_csv(file_path)?;
        TransactionSet::from_records(profile, &rows)
    }

    /// Normalise a sequence of raw column-name -> value maps
    pub(crate) fn from_records(
        profile: Profile,
        rows: &[HashMap<String, String>],
    ) -> Result<TransactionSet, LedgerError> {
        let records = normalise(&profile, rows)?;
        Ok(TransactionSet { profile, records })
    }

    /// New set over the same profile. Re-applies the negative-amount
    /// filter so derived sets obey the profile as well.
    fn derive(&self, records: Vec<Record>) -> TransactionSet {
        let records = if self.profile.ignore_negatives() {
            records.into_iter().filter(|r| r.amount >= 0.0).collect()
        } else {
            records
        };
        TransactionSet { profile: self.profile.clone(), records }
    }

    pub(crate) fn profile(&self) -> &Profile {
        &self.profile
    }

    pub(crate) fn records(&self) -> &[Record] {
        &self.records
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Structural membership test over the whole record value
    pub(crate) fn contains(&self, record: &Record) -> bool {
        self.records.contains(record)
    }

    /// Records of `self` not present in `other`, in `self`'s order
    pub(crate) fn difference(&self, other: &TransactionSet) -> Result<TransactionSet, LedgerError> {
        self.check_profile(other, "difference")?;
        let diff: Vec<Record> = self
            .records
            .iter()
            .filter(|&r| !other.contains(r))
            .cloned()
            .collect();
        Ok(self.derive(diff))
    }

    /// Records of `self` followed by records of `other`
    pub(crate) fn union(&self, other: &TransactionSet) -> Result<TransactionSet, LedgerError> {
        self.check_profile(other, "union")?;
        let mut combined = self.records.clone();
        combined.extend_from_slice(&other.records);
        Ok(self.derive(combined))
    }

    fn check_profile(&self, other: &TransactionSet, operation: &str) -> Result<(), LedgerError> {
        if self.profile != other.profile {
            return Err(LedgerError::ProfileMismatchError(format!(
                "{operation} between profiles '{}' and '{}'",
                self.profile.name(),
                other.profile.name()
            )));
        }
        Ok(())
    }

    fn group_by<F>(&self, key: F) -> BTreeMap<String, TransactionSet>
    where
        F: Fn(&Record) -> String,
    {
        let mut groups: BTreeMap<String, Vec<Record>> = BTreeMap::new();
        for record in &self.records {
            groups.entry(key(record)).or_default().push(record.clone());
        }
        groups
            .into_iter()
            .map(|(k, records)| (k, self.derive(records)))
            .collect()
    }

    /// Group by a field, named either logically ("category") or by the
    /// profile's raw column name, case-insensitively. Each group keeps the
    /// original relative order of its records.
    pub(crate) fn index_by(
        &self,
        field: &str,
    ) -> Result<BTreeMap<String, TransactionSet>, LedgerError> {
        let field = self.profile.resolve_field(field)?;
        Ok(self.group_by(|r| group_key(r, field)))
    }

    pub(crate) fn by_category(&self) -> BTreeMap<String, TransactionSet> {
        self.group_by(|r| r.category.clone())
    }

    /// Group by the 3-letter month abbreviation of the transaction date
    pub(crate) fn by_month(&self) -> BTreeMap<String, TransactionSet> {
        self.group_by(|r| r.date.format("%b").to_string())
    }

    /// Transactions whose description matches the pattern, as a substring
    /// search. Case-insensitive unless `case_sensitive` is set.
    pub(crate) fn by_description(
        &self,
        pattern: &str,
        case_sensitive: bool,
    ) -> Result<TransactionSet, LedgerError> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(!case_sensitive)
            .build()
            .map_err(|e| LedgerError::InvalidPatternError(e.to_string()))?;

        let matches: Vec<Record> = self
            .records
            .iter()
            .filter(|r| regex.is_match(&r.description))
            .cloned()
            .collect();
        Ok(self.derive(matches))
    }

    pub(crate) fn sum(&self) -> f32 {
        self.records
            .iter()
            .map(|r| r.amount)
            .fold(0.0, |total, amount| total + amount)
    }

    /// Earliest and latest transaction date, or None for an empty set
    pub(crate) fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let earliest = self.records.iter().map(|r| r.date).min()?;
        let latest = self.records.iter().map(|r| r.date).max()?;
        Some((earliest, latest))
    }

    pub(crate) fn formatted_date_range(&self) -> String {
        match self.date_range() {
            Some((earliest, latest)) => format!(
                "{} - {}",
                earliest.format("%m/%d/%y"),
                latest.format("%m/%d/%y")
            ),
            None => "N/A - N/A".to_string(),
        }
    }
}

impl fmt::Display for TransactionSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}; n={}, sum=${:.2}",
            self.formatted_date_range(),
            self.len(),
            self.sum()
        )
    }
}

/// Turn raw string rows into records under a profile. Keys are lower-cased
/// before column lookup, the date and amount fields are parsed, and rows
/// with a negative amount are dropped when the profile says to. Order of
/// surviving rows is preserved.
fn normalise(
    profile: &Profile,
    rows: &[HashMap<String, String>],
) -> Result<Vec<Record>, LedgerError> {
    let mut records: Vec<Record> = vec![];
    for row in rows {
        let lowered: HashMap<String, &str> = row
            .iter()
            .map(|(k, v)| (k.to_lowercase(), v.as_str()))
            .collect();

        let date = parse_date(field_value(&lowered, profile, Field::Date)?)?;
        let amount = parse_amount(field_value(&lowered, profile, Field::Amount)?)?;
        if profile.ignore_negatives() && amount < 0.0 {
            continue;
        }
        let category = field_value(&lowered, profile, Field::Category)?.to_string();
        let description = field_value(&lowered, profile, Field::Description)?.to_string();

        records.push(Record { date, amount, category, description });
    }

    Ok(records)
}

fn field_value<'a>(
    row: &'a HashMap<String, &str>,
    profile: &Profile,
    field: Field,
) -> Result<&'a str, LedgerError> {
    let column = profile.column(field);
    row.get(&column.to_lowercase()).copied().ok_or_else(|| {
        LedgerError::MalformedCsvError(format!(
            "row has no '{column}' column (profile '{}')",
            profile.name()
        ))
    })
}

fn parse_date(value: &str) -> Result<NaiveDate, LedgerError> {
    let value = value.trim();
    if !MM_DD_YYYY.is_match(value) {
        return Err(LedgerError::MalformedDateError(value.to_string()));
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| LedgerError::MalformedDateError(value.to_string()))
}

fn parse_amount(value: &str) -> Result<f32, LedgerError> {
    let cleaned = value.replace(['$', ','], "");
    cleaned
        .trim()
        .parse::<f32>()
        .map_err(|_| LedgerError::MalformedAmountError(value.to_string()))
}

fn group_key(record: &Record, field: Field) -> String {
    match field {
        Field::Amount => format!("{:.2}", record.amount),
        Field::Date => record.date.format("%Y-%m-%d").to_string(),
        Field::Category => record.category.clone(),
        Field::Description => record.description.clone(),
    }
}
