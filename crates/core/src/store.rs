//! Read-only asset table.
//!
//! The table is loaded once from a CSV export of the asset spreadsheet and never changes
//! afterwards. Services hold it behind an `Arc` and query it without locking.
//!
//! Missing values follow the spreadsheet: a blank cell is absent, and absent sections or
//! authorities are skipped by the enumeration and lookup operations.

use rust_decimal::Decimal;
use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;

use crate::constants::columns;
use crate::record::{AssetRecord, Role};
use crate::{StoreError, StoreResult};

/// Immutable, ordered collection of [`AssetRecord`]s.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<AssetRecord>,
}

struct ColumnIndex {
    identifier: usize,
    description: usize,
    serial_number: usize,
    value: usize,
    origin_section: usize,
    destination_section: usize,
    origin_authority: usize,
    destination_authority: usize,
}

impl ColumnIndex {
    fn resolve(headers: &csv::StringRecord) -> StoreResult<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{FEFF}').trim() == name)
                .ok_or_else(|| StoreError::MissingColumn(name.to_string()))
        };
        Ok(Self {
            identifier: find(columns::IDENTIFIER)?,
            description: find(columns::DESCRIPTION)?,
            serial_number: find(columns::SERIAL_NUMBER)?,
            value: find(columns::VALUE)?,
            origin_section: find(columns::ORIGIN_SECTION)?,
            destination_section: find(columns::DESTINATION_SECTION)?,
            origin_authority: find(columns::ORIGIN_AUTHORITY)?,
            destination_authority: find(columns::DESTINATION_AUTHORITY)?,
        })
    }
}

fn cell(record: &csv::StringRecord, index: usize) -> Option<String> {
    record
        .get(index)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Parses a monetary cell written either with a dot or a comma as decimal separator.
///
/// Accepts `1234.5`, `1234,50`, `1.234,50`, `1,234.50` and an optional `R$` prefix. When both
/// separators appear the last one is the decimal separator. A lone separator that occurs more
/// than once groups thousands. Thousands groups after the first must have exactly three digits;
/// anything else is `None`.
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim().trim_start_matches("R$").trim();
    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, trimmed),
    };

    let decimal_at = match (body.rfind(','), body.rfind('.')) {
        (Some(comma), Some(dot)) => Some(comma.max(dot)),
        (Some(comma), None) if body.matches(',').count() == 1 => Some(comma),
        (None, Some(dot)) if body.matches('.').count() == 1 => Some(dot),
        _ => None,
    };
    let (integer, fraction) = match decimal_at {
        Some(at) => (&body[..at], Some(&body[at + 1..])),
        None => (body, None),
    };

    let mut normalised = String::with_capacity(body.len() + 1);
    if negative {
        normalised.push('-');
    }
    normalised.push_str(&ungroup(integer)?);
    if let Some(fraction) = fraction {
        if !is_digits(fraction) {
            return None;
        }
        normalised.push('.');
        normalised.push_str(fraction);
    }
    Decimal::from_str(&normalised).ok()
}

/// Strips one kind of thousands separator from an integer part.
fn ungroup(integer: &str) -> Option<String> {
    let separators: HashSet<char> = integer.chars().filter(|c| matches!(c, ',' | '.')).collect();
    if separators.len() > 1 {
        return None;
    }

    let mut groups = integer.split([',', '.']);
    let first = groups.next()?;
    if !is_digits(first) || (!separators.is_empty() && first.len() > 3) {
        return None;
    }
    let mut digits = first.to_string();
    for group in groups {
        if group.len() != 3 || !is_digits(group) {
            return None;
        }
        digits.push_str(group);
    }
    Some(digits)
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Picks `;` when the header line has more semicolons than commas.
fn detect_delimiter(contents: &str) -> u8 {
    let header = contents.lines().next().unwrap_or_default();
    let semicolons = header.matches(';').count();
    let commas = header.matches(',').count();
    if semicolons > commas {
        b';'
    } else {
        b','
    }
}

fn distinct<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .flatten()
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

impl RecordStore {
    pub fn from_records(records: Vec<AssetRecord>) -> Self {
        Self { records }
    }

    /// Loads the table from a CSV file.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Open` if the file cannot be read, and any error of
    /// [`RecordStore::from_csv_str`].
    pub fn from_csv_path(path: &Path) -> StoreResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| StoreError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self::from_csv_str(&contents)?;
        tracing::info!(
            "loaded {} asset records from {}",
            store.len(),
            path.display()
        );
        Ok(store)
    }

    /// Parses CSV text with a header row. The delimiter (`,` or `;`) is detected from the
    /// header line and a leading byte-order mark is ignored.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::MissingColumn` if a required header is absent,
    /// `StoreError::InvalidValue` for an unparseable non-blank monetary value, or
    /// `StoreError::Csv` for malformed CSV.
    pub fn from_csv_str(contents: &str) -> StoreResult<Self> {
        let contents = contents.trim_start_matches('\u{FEFF}');
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(detect_delimiter(contents))
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(contents.as_bytes());

        let index = ColumnIndex::resolve(reader.headers()?)?;

        let mut records = Vec::new();
        for (n, result) in reader.records().enumerate() {
            let row = result?;
            if row.iter().all(|field| field.trim().is_empty()) {
                continue;
            }
            // Row numbers as a spreadsheet shows them: header is row 1.
            let row_number = n + 2;

            let value = match cell(&row, index.value) {
                None => None,
                Some(raw) => Some(parse_decimal(&raw).ok_or(StoreError::InvalidValue {
                    row: row_number,
                    value: raw,
                })?),
            };

            records.push(AssetRecord {
                identifier: cell(&row, index.identifier).unwrap_or_default(),
                description: cell(&row, index.description).unwrap_or_default(),
                serial_number: cell(&row, index.serial_number).unwrap_or_default(),
                value,
                origin_section: cell(&row, index.origin_section),
                destination_section: cell(&row, index.destination_section),
                origin_authority: cell(&row, index.origin_authority),
                destination_authority: cell(&row, index.destination_authority),
            });
        }

        Ok(Self { records })
    }

    pub fn records(&self) -> &[AssetRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every record whose identifier matches one of `ids`, in table order.
    ///
    /// Duplicate identifiers in the table all match. An empty result means "not found".
    pub fn lookup_by_identifiers<S: AsRef<str>>(&self, ids: &[S]) -> Vec<&AssetRecord> {
        let wanted: HashSet<&str> = ids.iter().map(AsRef::as_ref).collect();
        self.records
            .iter()
            .filter(|r| wanted.contains(r.identifier.as_str()))
            .collect()
    }

    /// Distinct non-missing origin sections, in order of first appearance.
    pub fn distinct_origin_sections(&self) -> Vec<String> {
        distinct(self.records.iter().map(|r| r.section(Role::Origin)))
    }

    /// Distinct non-missing destination sections, in order of first appearance.
    pub fn distinct_destination_sections(&self) -> Vec<String> {
        distinct(self.records.iter().map(|r| r.section(Role::Destination)))
    }

    /// First non-missing authority recorded for `section` on the given side.
    pub fn authority_for_section(&self, section: &str, role: Role) -> Option<&str> {
        self.records
            .iter()
            .filter(|r| r.section(role) == Some(section))
            .find_map(|r| r.authority(role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "Nº BMP,NOMECLATURA/COMPONENTE,Nº SERIE,VL. ATUALIZ.,Seção de Origem,Seção de Destino,Chefia de Origem,Chefia de Destino";

    fn sample() -> RecordStore {
        let csv = format!(
            "{HEADER}\n\
             101,Cadeira giratória,SN-1,1234.5,SAD,ACI,,Maj. Y\n\
             202,Mesa \u{2013} MDF,SN-2,0,SAD,SRG,Capt. X,\n\
             303,Armário,SN-3,10,,SRG,,Ten. Z\n\
             101,Cadeira fixa,SN-4,,SLOG,ACI,Sgt. W,\n"
        );
        RecordStore::from_csv_str(&csv).unwrap()
    }

    #[test]
    fn test_parse_decimal_formats() {
        assert_eq!(parse_decimal("1234.5"), Some(dec!(1234.5)));
        assert_eq!(parse_decimal("1234,50"), Some(dec!(1234.50)));
        assert_eq!(parse_decimal("1.234,50"), Some(dec!(1234.50)));
        assert_eq!(parse_decimal("R$ 10,00"), Some(dec!(10.00)));
        assert_eq!(parse_decimal("0"), Some(dec!(0)));
        assert_eq!(parse_decimal("n/a"), None);
    }

    #[test]
    fn test_parse_decimal_last_separator_is_decimal() {
        assert_eq!(parse_decimal("1,234.50"), Some(dec!(1234.50)));
        assert_eq!(parse_decimal("1,234,567.89"), Some(dec!(1234567.89)));
        assert_eq!(parse_decimal("1.234.567,89"), Some(dec!(1234567.89)));
        assert_eq!(parse_decimal("1.234.567"), Some(dec!(1234567)));
        assert_eq!(parse_decimal("-1.234,50"), Some(dec!(-1234.50)));
    }

    #[test]
    fn test_parse_decimal_rejects_bad_grouping() {
        assert_eq!(parse_decimal("12,34.5"), None);
        assert_eq!(parse_decimal("1.234.50"), None);
        assert_eq!(parse_decimal("1234.567,89"), None);
        assert_eq!(parse_decimal("1.234,567.89"), None);
        assert_eq!(parse_decimal("1234."), None);
        assert_eq!(parse_decimal(""), None);
    }

    #[test]
    fn test_quoted_grouped_value_in_comma_export() {
        let csv = format!("{HEADER}\n101,Cadeira,SN-1,\"1,234.50\",A,B,,\n");
        let store = RecordStore::from_csv_str(&csv).unwrap();
        assert_eq!(store.records()[0].value, Some(dec!(1234.50)));

        let csv = format!("{HEADER}\n101,Cadeira,SN-1,\"12,34.5\",A,B,,\n");
        assert!(matches!(
            RecordStore::from_csv_str(&csv),
            Err(StoreError::InvalidValue { row: 2, .. })
        ));
    }

    #[test]
    fn test_load_reads_all_rows_and_missing_values() {
        let store = sample();
        assert_eq!(store.len(), 4);

        let first = &store.records()[0];
        assert_eq!(first.identifier, "101");
        assert_eq!(first.value, Some(dec!(1234.5)));
        assert_eq!(first.origin_authority, None);
        assert_eq!(first.destination_authority.as_deref(), Some("Maj. Y"));

        assert_eq!(store.records()[2].origin_section, None);
        assert_eq!(store.records()[3].value, None);
    }

    #[test]
    fn test_lookup_returns_all_matches_in_table_order() {
        let store = sample();
        let found = store.lookup_by_identifiers(&["202", "101"]);
        let serials: Vec<&str> = found.iter().map(|r| r.serial_number.as_str()).collect();
        assert_eq!(serials, vec!["SN-1", "SN-2", "SN-4"]);
    }

    #[test]
    fn test_lookup_subsets_match_exactly() {
        let store = sample();
        let ids = ["101", "202", "303"];
        for mask in 1..(1 << ids.len()) {
            let subset: Vec<&str> = ids
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, id)| *id)
                .collect();
            let found = store.lookup_by_identifiers(&subset);
            let expected = store
                .records()
                .iter()
                .filter(|r| subset.contains(&r.identifier.as_str()))
                .count();
            assert_eq!(found.len(), expected);
            assert!(found.iter().all(|r| subset.contains(&r.identifier.as_str())));
        }
    }

    #[test]
    fn test_lookup_with_unknown_ids_is_empty() {
        let store = sample();
        assert!(store.lookup_by_identifiers(&["999", ""]).is_empty());
        assert!(store.lookup_by_identifiers::<&str>(&[]).is_empty());
    }

    #[test]
    fn test_distinct_sections_skip_missing_and_keep_order() {
        let store = sample();
        assert_eq!(store.distinct_origin_sections(), vec!["SAD", "SLOG"]);
        assert_eq!(store.distinct_destination_sections(), vec!["ACI", "SRG"]);
    }

    #[test]
    fn test_authority_for_section_skips_missing() {
        let store = sample();
        assert_eq!(store.authority_for_section("SAD", Role::Origin), Some("Capt. X"));
        assert_eq!(store.authority_for_section("SRG", Role::Destination), Some("Ten. Z"));
        assert_eq!(store.authority_for_section("ACI", Role::Destination), Some("Maj. Y"));
    }

    #[test]
    fn test_authority_for_section_absent_is_none() {
        let store = sample();
        assert_eq!(store.authority_for_section("SRG", Role::Origin), None);
        assert_eq!(store.authority_for_section("NOPE", Role::Destination), None);
    }

    #[test]
    fn test_semicolon_export_with_bom() {
        let csv = "\u{FEFF}Nº BMP;NOMECLATURA/COMPONENTE;Nº SERIE;VL. ATUALIZ.;Seção de Origem;Seção de Destino;Chefia de Origem;Chefia de Destino\n\
                   7;Impressora;HP-9;1.234,56;SAD;ACI;Capt. X;Maj. Y\n";
        let store = RecordStore::from_csv_str(csv).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.records()[0].value, Some(dec!(1234.56)));
        assert_eq!(store.records()[0].identifier, "7");
    }

    #[test]
    fn test_blank_rows_are_skipped() {
        let csv = format!("{HEADER}\n,,,,,,,\n1,A,B,1,S,D,X,Y\n");
        assert_eq!(RecordStore::from_csv_str(&csv).unwrap().len(), 1);
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let csv = "Nº BMP,NOMECLATURA/COMPONENTE\n1,Cadeira\n";
        match RecordStore::from_csv_str(csv) {
            Err(StoreError::MissingColumn(name)) => assert_eq!(name, "Nº SERIE"),
            other => panic!("Expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_value_is_fatal() {
        let csv = format!("{HEADER}\n1,A,B,1,S,D,X,Y\n2,A,B,abc,S,D,X,Y\n");
        match RecordStore::from_csv_str(&csv) {
            Err(StoreError::InvalidValue { row, value }) => {
                assert_eq!(row, 3);
                assert_eq!(value, "abc");
            }
            other => panic!("Expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn test_from_csv_path() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(file, "{HEADER}").unwrap();
        writeln!(file, "55,Monitor,M-1,99.9,SAD,ACI,Capt. X,Maj. Y").unwrap();

        let store = RecordStore::from_csv_path(file.path()).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.records()[0].description, "Monitor");
    }

    #[test]
    fn test_from_csv_path_missing_file() {
        let result = RecordStore::from_csv_path(Path::new("/definitely/not/here.csv"));
        assert!(matches!(result, Err(StoreError::Open { .. })));
    }
}
