//! CSV export rendering
//!
//! Header row of labels followed by one row per record, both in schema
//! order. Quoting follows the usual spreadsheet rule: a cell containing a
//! quote, comma or newline is wrapped in quotes with inner quotes doubled.

use std::borrow::Cow;

use crate::normalize::NormalizedRecord;
use crate::schema;

/// Escape one CSV cell; `None` renders as an empty cell
pub fn escape_csv_cell(value: Option<&str>) -> Cow<'_, str> {
    let Some(value) = value else {
        return Cow::Borrowed("");
    };
    if value.contains(['"', ',', '\n']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

/// Render records as CSV text, in the order given
pub fn to_csv(records: &[NormalizedRecord]) -> String {
    let mut out = String::new();
    push_row(&mut out, schema::labels());
    for record in records {
        push_row(&mut out, record.schema_values().map(|(_, value)| value));
    }
    out
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>) {
    for (i, cell) in cells.enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&escape_csv_cell(Some(cell)));
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::value::{FieldValue, RawSubmission};

    fn record(pairs: &[(&str, &str)]) -> NormalizedRecord {
        let raw: RawSubmission = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), FieldValue::from(*v)))
            .collect();
        normalize(&raw, &RawSubmission::new())
    }

    fn header() -> String {
        let labels: Vec<_> = schema::labels()
            .map(|l| escape_csv_cell(Some(l)).into_owned())
            .collect();
        format!("{}\n", labels.join(","))
    }

    #[test]
    fn test_escape_none_is_empty() {
        assert_eq!(escape_csv_cell(None), "");
    }

    #[test]
    fn test_escape_plain_is_verbatim() {
        assert_eq!(escape_csv_cell(Some("  Mixed Case; ok ")), "  Mixed Case; ok ");
        assert!(matches!(escape_csv_cell(Some("plain")), Cow::Borrowed(_)));
    }

    #[test]
    fn test_escape_quote_comma_newline() {
        assert_eq!(
            escape_csv_cell(Some("He said \"hi\", then left\n")),
            "\"He said \"\"hi\"\", then left\n\""
        );
        assert_eq!(escape_csv_cell(Some("a,b")), "\"a,b\"");
        assert_eq!(escape_csv_cell(Some("line\nbreak")), "\"line\nbreak\"");
        assert_eq!(escape_csv_cell(Some("\"")), "\"\"\"\"");
    }

    #[test]
    fn test_escape_carriage_return_alone_not_quoted() {
        assert_eq!(escape_csv_cell(Some("a\rb")), "a\rb");
    }

    #[test]
    fn test_empty_export_is_header_only() {
        let csv = to_csv(&[]);
        assert_eq!(csv, header());
        assert_eq!(csv.matches('\n').count(), 1);
    }

    #[test]
    fn test_header_quotes_labels_with_commas() {
        let csv = to_csv(&[]);
        assert!(csv.contains(
            ",\"Which of these sources had the strongest influence on your final decision, and why?\","
        ));
        assert!(csv.starts_with("Submission time,"));
    }

    #[test]
    fn test_rows_in_given_order() {
        let csv = to_csv(&[
            record(&[("purchaseChannel", "second")]),
            record(&[("purchaseChannel", "first")]),
        ]);
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("second"));
        assert!(lines[2].contains("first"));
        assert!(csv.ends_with('\n'));
        assert!(!csv.ends_with("\n\n"));
    }

    #[test]
    fn test_row_has_one_cell_per_field() {
        let csv = to_csv(&[record(&[])]);
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(row, ",".repeat(schema::FIELDS.len() - 1));
    }

    #[test]
    fn test_deterministic() {
        let records = vec![
            record(&[("switchFactors", "price, \"quality\"")]),
            record(&[("purchaseChannel", "Store A")]),
        ];
        assert_eq!(to_csv(&records), to_csv(&records));
    }
}
