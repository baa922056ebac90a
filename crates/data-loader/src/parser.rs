//! CSV reading and writing, plus typed access to upload rows.
//!
//! Uploads are IMDb rating exports:
//! `Const,Your Rating,Date Rated,Title,Original Title,URL,Title Type,...`
//!
//! Parsing is lenient at the cell level (bad cells become `None`) and strict
//! at the file level (a file the CSV reader cannot make sense of is an error).

use crate::error::{DataLoadError, Result};
use crate::table::{Table, is_missing, parse_number};
use crate::types::*;
use chrono::NaiveDate;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Date format used by both date columns
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Read a CSV document with a header row into a `Table`
pub fn read_table<R: Read>(reader: R) -> Result<Table> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        rows.push(record.iter().map(|c| c.to_string()).collect());
    }

    Ok(Table::new(headers, rows))
}

/// Read a CSV file from disk
pub fn read_table_from_path(path: &Path) -> Result<Table> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })?;
    read_table(file)
}

/// Write a table as CSV with a header row
pub fn write_table<W: Write>(writer: W, table: &Table) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(table.headers())?;
    for row in table.rows() {
        csv_writer.write_record(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Names from `required` that the table's header does not contain
pub fn missing_columns(table: &Table, required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|name| !table.has_column(name))
        .map(|name| name.to_string())
        .collect()
}

/// Fail with `MissingColumns` unless every required upload column is present
pub fn validate_required_columns(table: &Table) -> Result<()> {
    let missing = missing_columns(table, &REQUIRED_COLUMNS);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(DataLoadError::MissingColumns { columns: missing })
    }
}

/// Parse a `YYYY-MM-DD` date, `None` if missing or malformed
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    if is_missing(s) {
        return None;
    }
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

/// Format a date the same way it is parsed
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Turn every row of an upload into a `RawRatingRecord`.
///
/// Requires all `REQUIRED_COLUMNS`; extra columns are ignored.
pub fn parse_raw_records(table: &Table) -> Result<Vec<RawRatingRecord>> {
    validate_required_columns(table)?;

    // Indices are known to exist after validation
    let col = |name: &str| table.column_index(name).unwrap_or_default();
    let c_const = col(CONST);
    let c_your_rating = col(YOUR_RATING);
    let c_date_rated = col(DATE_RATED);
    let c_title = col(TITLE);
    let c_original_title = col(ORIGINAL_TITLE);
    let c_url = col(URL);
    let c_title_type = col(TITLE_TYPE);
    let c_imdb_rating = col(IMDB_RATING);
    let c_runtime = col(RUNTIME);
    let c_year = col(YEAR);
    let c_genres = col(GENRES);
    let c_num_votes = col(NUM_VOTES);
    let c_release_date = col(RELEASE_DATE);
    let c_directors = col(DIRECTORS);

    let records = table
        .rows()
        .iter()
        .map(|row| {
            let text = |i: usize| Some(row[i].clone()).filter(|c| !is_missing(c));
            let number = |i: usize| parse_number(&row[i]);
            RawRatingRecord {
                catalog_id: text(c_const),
                your_rating: number(c_your_rating),
                date_rated: text(c_date_rated),
                title: text(c_title),
                original_title: text(c_original_title),
                url: text(c_url),
                title_type: text(c_title_type),
                imdb_rating: number(c_imdb_rating),
                runtime_mins: number(c_runtime),
                year: number(c_year),
                genres: text(c_genres),
                num_votes: number(c_num_votes),
                release_date: text(c_release_date),
                directors: text(c_directors),
            }
        })
        .collect();

    Ok(records)
}
