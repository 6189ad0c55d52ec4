use std::collections::HashMap;
use std::path::Path;

use log::info;

use crate::error::LedgerError;


/// Read a header-delimited CSV file into one column-name -> value map per
/// data row, preserving row order. Values stay as strings; type coercion
/// happens during normalisation.
pub(crate) fn load_csv(file_path: &Path) -> Result<Vec<HashMap<String, String>>, LedgerError> {
    if !file_path.exists() {
        return Err(LedgerError::SourceNotFoundError(format!("{}", file_path.display())));
    }

    info!("Reading CSV rows from {:?}", file_path);
    let mut rdr = csv::Reader::from_path(file_path)
        .map_err(|e| LedgerError::SourceNotFoundError(format!("{}: {}", file_path.display(), e)))?;
    let headers = rdr
        .headers()
        .map_err(|e| LedgerError::MalformedCsvError(e.to_string()))?
        .clone();

    let mut rows: Vec<HashMap<String, String>> = vec![];
    for record in rdr.records() {
        // The csv reader rejects rows whose length differs from the header
        let row = record.map_err(|e| LedgerError::MalformedCsvError(e.to_string()))?;
        let mut columns = HashMap::new();
        for (name, value) in headers.iter().zip(row.iter()) {
            columns.insert(name.to_string(), value.to_string());
        }
        rows.push(columns);
    }

    Ok(rows)
}
