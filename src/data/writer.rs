use std::io::Write;

use anyhow::{Context, Result};
use log::warn;

use super::source::DataSource;

/// Write every row of `source` as CSV, with a header row.
///
/// `names` are used as headers when there is one per column; otherwise
/// (e.g. after a column resize) the columns are named `col0`, `col1`, ...
pub fn write_csv<W: Write>(source: &dyn DataSource, names: &[String], out: W) -> Result<()> {
    let columns = source.column_count();
    let headers: Vec<String> = if names.len() == columns {
        names.to_vec()
    } else {
        if !names.is_empty() {
            warn!(
                "{} column names for {columns} columns, using generated names",
                names.len()
            );
        }
        (0..columns).map(|c| format!("col{c}")).collect()
    };

    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(&headers).context("writing CSV header")?;
    for row in 0..source.row_count() {
        let record: Vec<String> = (0..columns)
            .map(|col| source.get(col, row).to_string())
            .collect();
        writer
            .write_record(&record)
            .with_context(|| format!("writing CSV row {row}"))?;
    }
    writer.flush().context("flushing CSV output")?;
    Ok(())
}
