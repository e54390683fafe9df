//! Snapshot import
//!
//! Loads a budget document from JSON and transaction lists from JSON or CSV
//! exports. CSV layout (header required, extra columns ignored):
//!
//! ```text
//! date,amount,category,bucket,note
//! 2025-10-02,54.20,groceries,,Weekly shop
//! ```

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::NaiveDate;
use csv::ReaderBuilder;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{Bucket, BudgetDocument, NewTransaction, Transaction};
use crate::store::BudgetSnapshot;

/// Read a budget document from a JSON file
pub fn load_document(path: &Path) -> Result<BudgetDocument> {
    let file = File::open(path)?;
    let doc: BudgetDocument = serde_json::from_reader(BufReader::new(file))?;
    doc.period()?;
    Ok(doc)
}

/// Read transactions from a `.csv` or `.json` file
pub fn load_transactions(path: &Path) -> Result<Vec<NewTransaction>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let transactions = match extension.as_deref() {
        Some("csv") => parse_transactions_csv(reader)?,
        Some("json") => parse_transactions_json(reader)?,
        _ => {
            return Err(Error::Import(format!(
                "Unsupported transactions file (expected .csv or .json): {}",
                path.display()
            )))
        }
    };

    debug!(path = %path.display(), count = transactions.len(), "Loaded transactions");
    Ok(transactions)
}

/// Build a snapshot from a document file and an optional transactions file.
/// Ids are assigned in file order starting at 1.
pub fn load_snapshot(document: &Path, transactions: Option<&Path>) -> Result<BudgetSnapshot> {
    let doc = load_document(document)?;
    let transactions: Vec<Transaction> = match transactions {
        Some(path) => load_transactions(path)?
            .into_iter()
            .enumerate()
            .map(|(i, tx)| tx.into_transaction(i as i64 + 1))
            .collect(),
        None => Vec::new(),
    };
    Ok(BudgetSnapshot::new(Some(doc), transactions))
}

/// Parse a JSON array of transactions
pub fn parse_transactions_json<R: Read>(reader: R) -> Result<Vec<NewTransaction>> {
    let transactions: Vec<NewTransaction> = serde_json::from_reader(reader)?;
    for (i, tx) in transactions.iter().enumerate() {
        tx.validate()
            .map_err(|e| Error::Import(format!("Entry {}: {}", i + 1, e)))?;
    }
    Ok(transactions)
}

/// Parse transactions CSV
pub fn parse_transactions_csv<R: Read>(reader: R) -> Result<Vec<NewTransaction>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));

    let date_col = column("date").ok_or_else(|| Error::Import("Missing 'date' column".into()))?;
    let amount_col =
        column("amount").ok_or_else(|| Error::Import("Missing 'amount' column".into()))?;
    let category_col =
        column("category").ok_or_else(|| Error::Import("Missing 'category' column".into()))?;
    let bucket_col = column("bucket");
    let note_col = column("note");

    let mut transactions = Vec::new();

    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        // Header is line 1
        let line = i + 2;
        let field = |col: usize| record.get(col).unwrap_or("");
        let optional = |col: Option<usize>| {
            col.and_then(|c| record.get(c))
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let date = NaiveDate::parse_from_str(field(date_col), "%Y-%m-%d").map_err(|_| {
            Error::Import(format!(
                "Line {}: invalid date '{}' (use YYYY-MM-DD)",
                line,
                field(date_col)
            ))
        })?;

        let amount = parse_amount(field(amount_col))
            .ok_or_else(|| Error::Import(format!("Line {}: invalid amount '{}'", line, field(amount_col))))?;

        let bucket = match optional(bucket_col) {
            Some(raw) => Some(
                raw.parse::<Bucket>()
                    .map_err(|e| Error::Import(format!("Line {}: {}", line, e)))?,
            ),
            None => None,
        };

        let tx = NewTransaction {
            amount,
            category: field(category_col).to_lowercase(),
            bucket,
            date,
            note: optional(note_col),
        };
        tx.validate()
            .map_err(|e| Error::Import(format!("Line {}: {}", line, e)))?;
        transactions.push(tx);
    }

    Ok(transactions)
}

/// Parse "1,234.50" or "$12.00" into a number.
///
/// "," is only accepted as a thousands separator in groups of three and "."
/// as the decimal point, so "1.234,50" or "12,50" are rejected.
fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| !matches!(c, '$' | ' ')).collect();
    let (int_part, frac_part) = match cleaned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (cleaned.as_str(), None),
    };

    if frac_part.is_some_and(|f| f.is_empty() || !f.chars().all(|c| c.is_ascii_digit())) {
        return None;
    }
    let grouped_ok = int_part
        .split(',')
        .skip(1)
        .all(|g| g.len() == 3 && g.chars().all(|c| c.is_ascii_digit()));
    if !grouped_ok {
        return None;
    }

    let digits: String = int_part.chars().filter(|c| *c != ',').collect();
    let number = match frac_part {
        Some(frac) => format!("{}.{}", digits, frac),
        None => digits,
    };
    number.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_csv() {
        let csv = "date,amount,category,bucket,note\n\
                   2025-10-02,54.20,Groceries,,Weekly shop\n\
                   2025-10-03,\"1,200.00\",housing,needs,\n";
        let txs = parse_transactions_csv(csv.as_bytes()).unwrap();

        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].category, "groceries");
        assert_eq!(txs[0].amount, 54.2);
        assert_eq!(txs[0].bucket, None);
        assert_eq!(txs[0].note.as_deref(), Some("Weekly shop"));
        assert_eq!(txs[1].amount, 1200.0);
        assert_eq!(txs[1].bucket, Some(Bucket::Needs));
        assert_eq!(txs[1].note, None);
    }

    #[test]
    fn test_csv_minimal_columns_any_order() {
        let csv = "category,date,amount\ndining,2025-10-05,$18.75\n";
        let txs = parse_transactions_csv(csv.as_bytes()).unwrap();
        assert_eq!(txs[0].amount, 18.75);
        assert_eq!(txs[0].date, NaiveDate::from_ymd_opt(2025, 10, 5).unwrap());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("54.20"), Some(54.2));
        assert_eq!(parse_amount("$1,234.50"), Some(1234.5));
        assert_eq!(parse_amount("12,345,678"), Some(12_345_678.0));
        assert_eq!(parse_amount("-3"), Some(-3.0));

        assert_eq!(parse_amount("1.234,50"), None);
        assert_eq!(parse_amount("1.234.50"), None);
        assert_eq!(parse_amount("12,50"), None);
        assert_eq!(parse_amount("12."), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount(""), None);
    }

    #[test]
    fn test_european_amount_is_rejected() {
        let csv = "date,amount,category\n2025-10-05,\"1.234,50\",dining\n";
        let err = parse_transactions_csv(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Line 2"));
        assert!(err.to_string().contains("1.234,50"));
    }

    #[test]
    fn test_csv_errors_name_the_line() {
        let bad_date = "date,amount,category\n10/05/2025,5,dining\n";
        let err = parse_transactions_csv(bad_date.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Line 2"));

        let negative = "date,amount,category\n2025-10-05,5,dining\n2025-10-06,-3,dining\n";
        let err = parse_transactions_csv(negative.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Line 3"));

        let bad_bucket = "date,amount,category,bucket\n2025-10-05,5,dining,luxury\n";
        assert!(parse_transactions_csv(bad_bucket.as_bytes()).is_err());

        let missing = "when,amount,category\n2025-10-05,5,dining\n";
        assert!(parse_transactions_csv(missing.as_bytes()).is_err());
    }

    #[test]
    fn test_parse_json() {
        let json = r#"[
            {"amount": 12.5, "category": "dining", "date": "2025-10-04"},
            {"amount": 300, "category": "housing", "bucket": "needs", "date": "2025-10-01", "note": "Rent"}
        ]"#;
        let txs = parse_transactions_json(json.as_bytes()).unwrap();
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[1].bucket, Some(Bucket::Needs));

        let invalid = r#"[{"amount": 0, "category": "dining", "date": "2025-10-04"}]"#;
        assert!(parse_transactions_json(invalid.as_bytes()).is_err());
    }

    #[test]
    fn test_load_snapshot_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let doc_path = dir.path().join("budget.json");
        let tx_path = dir.path().join("transactions.csv");

        let mut doc = File::create(&doc_path).unwrap();
        write!(
            doc,
            r#"{{"id":"doc-1","monthKey":"2025-10","startDay":1,
                "percents":{{"needs":0.5,"wants":0.3,"savings":0.2}},"income":1000}}"#
        )
        .unwrap();

        let mut txs = File::create(&tx_path).unwrap();
        writeln!(txs, "date,amount,category\n2025-10-02,10,dining\n2025-10-03,20,housing").unwrap();

        let snapshot = load_snapshot(&doc_path, Some(&tx_path)).unwrap();
        assert!(snapshot.is_loaded());
        let ids: Vec<i64> = snapshot.transactions.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transactions.xlsx");
        File::create(&path).unwrap();
        assert!(matches!(load_transactions(&path), Err(Error::Import(_))));
    }

    #[test]
    fn test_document_with_bad_month_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("budget.json");
        std::fs::write(
            &path,
            r#"{"id":"d","monthKey":"2025-13","startDay":1,
               "percents":{"needs":0.5,"wants":0.3,"savings":0.2},"income":1000}"#,
        )
        .unwrap();
        assert!(load_document(&path).is_err());
    }
}
