use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use crate::error::IoError;

/// Field separator used by submission and answer files.
pub const DEFAULT_DELIMITER: char = ',';

/// An in-memory delimited text table with a header row.
///
/// Cells are kept as the raw strings found in the file; typed access goes through
/// [`Table::f64_column`], [`Table::bool_column`] and friends so that every grader
/// decides itself how strict it wants to be with a column.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create a new table from a header and its records.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::RaggedRow`] if a record does not match the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, IoError> {
        for (i, row) in rows.iter().enumerate() {
            if row.len() != headers.len() {
                return Err(IoError::RaggedRow {
                    row: i,
                    expected: headers.len(),
                    actual: row.len(),
                });
            }
        }
        Ok(Self { headers, rows })
    }

    /// Read a comma separated file with a header row.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the csv file.
    ///
    /// # Returns
    ///
    /// The parsed table.
    pub fn read_csv(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(IoError::FileDoesNotExist(path.to_path_buf()));
        }

        let file = File::open(path)?;
        let table = Self::from_reader(BufReader::new(file))?;
        log::debug!(
            "loaded {} with {} rows and columns {:?}",
            path.display(),
            table.len(),
            table.headers
        );

        Ok(table)
    }

    /// Parse a comma separated table from any reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, IoError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Self::parse(&text, DEFAULT_DELIMITER)
    }

    /// Parse a table from text using the given field delimiter.
    ///
    /// Fields may be wrapped in double quotes, in which case they can contain the
    /// delimiter, line breaks and escaped (doubled) quotes. Blank lines are skipped.
    pub fn parse(text: &str, delimiter: char) -> Result<Self, IoError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut records = parse_records(text, delimiter)?.into_iter();
        let headers = records.next().ok_or(IoError::EmptyTable)?;
        Self::new(headers, records.collect())
    }

    /// The column names, in file order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// The records, without the header.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of records.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no records.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column in the header.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Check if the table has a column with the given name.
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Names from `required` that are not in the header, in the order given.
    pub fn missing_columns<'a>(&self, required: &[&'a str]) -> Vec<&'a str> {
        required
            .iter()
            .copied()
            .filter(|name| !self.has_column(name))
            .collect()
    }

    /// Borrow the raw cells of a column.
    pub fn column(&self, name: &str) -> Result<Vec<&str>, IoError> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| IoError::MissingColumn(name.to_string()))?;
        Ok(self.rows.iter().map(|row| row[idx].as_str()).collect())
    }

    /// Parse a column as floating point numbers.
    pub fn f64_column(&self, name: &str) -> Result<Vec<f64>, IoError> {
        self.column(name)?
            .into_iter()
            .enumerate()
            .map(|(row, cell)| {
                cell.trim()
                    .parse::<f64>()
                    .map_err(|_| invalid_value(name, row, cell, "a number"))
            })
            .collect()
    }

    /// Parse a column of booleans (`True`/`False`, `true`/`false` or `1`/`0`).
    pub fn bool_column(&self, name: &str) -> Result<Vec<bool>, IoError> {
        self.column(name)?
            .into_iter()
            .enumerate()
            .map(|(row, cell)| match cell.trim() {
                "True" | "true" | "TRUE" | "1" | "1.0" => Ok(true),
                "False" | "false" | "FALSE" | "0" | "0.0" => Ok(false),
                _ => Err(invalid_value(name, row, cell, "a boolean")),
            })
            .collect()
    }

    /// Return a copy of the table with its records stably sorted by a column.
    pub fn sorted_by(&self, name: &str) -> Result<Self, IoError> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| IoError::MissingColumn(name.to_string()))?;
        let mut rows = self.rows.clone();
        rows.sort_by(|a, b| a[idx].cmp(&b[idx]));
        Ok(Self {
            headers: self.headers.clone(),
            rows,
        })
    }
}

fn invalid_value(column: &str, row: usize, value: &str, expected: &'static str) -> IoError {
    IoError::InvalidValue {
        column: column.to_string(),
        row,
        value: value.to_string(),
        expected,
    }
}

/// Split delimited text into records of fields.
fn parse_records(text: &str, delimiter: char) -> Result<Vec<Vec<String>>, IoError> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut field_started = false;
    let mut in_quotes = false;
    let mut line = 1;
    let mut quote_line = 1;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => {
                in_quotes = true;
                field_started = true;
                quote_line = line;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                if field_started || !record.is_empty() {
                    record.push(std::mem::take(&mut field));
                    records.push(std::mem::take(&mut record));
                }
                field_started = false;
                line += 1;
            }
            c if c == delimiter => {
                record.push(std::mem::take(&mut field));
                field_started = true;
            }
            _ => {
                field.push(c);
                field_started = true;
            }
        }
    }

    if in_quotes {
        return Err(IoError::ParseError {
            line: quote_line,
            msg: "unterminated quoted field".to_string(),
        });
    }

    if field_started || !record.is_empty() {
        record.push(field);
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() -> Result<(), IoError> {
        let table = Table::parse("id,value\na,1.5\nb,2\n", ',')?;
        assert_eq!(table.headers(), &["id", "value"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.column("id")?, vec!["a", "b"]);
        assert_eq!(table.f64_column("value")?, vec![1.5, 2.0]);
        Ok(())
    }

    #[test]
    fn test_parse_quoted_fields() -> Result<(), IoError> {
        let text = "id,predictions\r\n1,\"['a', 'b']\"\r\n2,\"say \"\"hi\"\"\nthere\"\r\n";
        let table = Table::parse(text, ',')?;
        assert_eq!(
            table.column("predictions")?,
            vec!["['a', 'b']", "say \"hi\"\nthere"]
        );
        Ok(())
    }

    #[test]
    fn test_parse_skips_blank_lines_and_bom() -> Result<(), IoError> {
        let table = Table::parse("\u{feff}key,fare\n\nk1,3\n\n", ',')?;
        assert_eq!(table.headers(), &["key", "fare"]);
        assert_eq!(table.len(), 1);
        Ok(())
    }

    #[test]
    fn test_empty_cells_are_kept() -> Result<(), IoError> {
        let table = Table::parse("a,b,c\n,,\n", ',')?;
        assert_eq!(table.rows(), &[vec![String::new(), String::new(), String::new()]]);
        Ok(())
    }

    #[test]
    fn test_ragged_row() {
        let res = Table::parse("a,b\n1,2,3\n", ',');
        assert!(matches!(
            res,
            Err(IoError::RaggedRow {
                row: 0,
                expected: 2,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_unterminated_quote() {
        let res = Table::parse("a,b\n1,\"oops\n", ',');
        assert!(matches!(res, Err(IoError::ParseError { line: 2, .. })));
    }

    #[test]
    fn test_empty_text() {
        assert!(matches!(Table::parse("", ','), Err(IoError::EmptyTable)));
    }

    #[test]
    fn test_typed_columns() -> Result<(), IoError> {
        let table = Table::parse("x,keep\n1e-3,True\nnope,0\n", ',')?;
        assert_eq!(table.bool_column("keep")?, vec![true, false]);
        let err = table.f64_column("x").unwrap_err();
        assert!(matches!(err, IoError::InvalidValue { row: 1, .. }));
        assert!(matches!(
            table.column("y"),
            Err(IoError::MissingColumn(name)) if name == "y"
        ));
        Ok(())
    }

    #[test]
    fn test_missing_columns_and_sort() -> Result<(), IoError> {
        let table = Table::parse("id,v\nc,3\na,1\nb,2\n", ',')?;
        assert_eq!(table.missing_columns(&["id", "w", "v", "z"]), vec!["w", "z"]);
        let sorted = table.sorted_by("id")?;
        assert_eq!(sorted.column("id")?, vec!["a", "b", "c"]);
        assert_eq!(sorted.f64_column("v")?, vec![1.0, 2.0, 3.0]);
        Ok(())
    }
}
