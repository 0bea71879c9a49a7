//! Column-aligned listing parser
//!
//! The tool pads every column of its `ps` table so that values line up under
//! the header labels. Labels are separated by at least two whitespace
//! characters, while a label or value may itself contain single spaces
//! (`CONTAINER ID`, `2 hours ago`). Rows cannot be split on their own, so
//! every row is sliced at the offsets where the labels begin in the header.
//!
//! All offsets are counted in characters rather than bytes: the tool aligns
//! by character, and truncated values end in a multi-byte `…`.

use std::collections::HashSet;

use crate::{Error, Result};

/// A single column of a listing header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Field name, single spaces replaced by `_` (`CONTAINER_ID`)
    pub name: String,
    /// Label as printed in the header (`CONTAINER ID`)
    pub label: String,
    /// Character offset of the label inside the header
    pub start: usize,
}

/// Ordered set of columns derived from a header line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    columns: Vec<Column>,
}

impl ColumnSpec {
    /// Derive the columns of a header line
    ///
    /// # Errors
    /// Returns [`Error::Parse`] if the header is blank or two labels map to
    /// the same field name.
    pub fn from_header(header: &str) -> Result<Self> {
        let chars: Vec<char> = header.trim_end().chars().collect();
        let mut columns = Vec::new();
        let mut seen = HashSet::new();
        let mut pos = 0;

        while pos < chars.len() {
            while pos < chars.len() && chars[pos].is_whitespace() {
                pos += 1;
            }
            if pos == chars.len() {
                break;
            }

            let start = pos;
            while pos < chars.len() && !is_separator(&chars, pos) {
                pos += 1;
            }

            let label: String = chars[start..pos].iter().collect();
            let name: String = label
                .chars()
                .map(|c| if c.is_whitespace() { '_' } else { c })
                .collect();

            if !seen.insert(name.clone()) {
                return Err(Error::parse(format!(
                    "duplicate column '{name}' in header '{}'",
                    header.trim_end()
                )));
            }

            columns.push(Column { name, label, start });
        }

        if columns.is_empty() {
            return Err(Error::parse("listing header is empty"));
        }

        tracing::trace!(columns = columns.len(), "Parsed listing header");

        Ok(Self { columns })
    }

    /// Number of columns
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Always false for a successfully parsed header
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// The identifier column (first column)
    #[must_use]
    pub fn identifier(&self) -> &Column {
        &self.columns[0]
    }

    /// Columns in header order
    pub fn iter(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    /// Field names in header order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Index of a field name
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Slice a data row into one trimmed value per column
    ///
    /// Field *i* spans from the start of column *i* up to the start of
    /// column *i + 1*; the first field starts at offset 0 and the last runs
    /// to the end of the row. Columns past the end of a short row are empty.
    #[must_use]
    pub fn split_row(&self, row: &str) -> Vec<String> {
        let chars: Vec<char> = row.chars().collect();

        self.columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                let begin = if i == 0 { 0 } else { column.start };
                let end = self
                    .columns
                    .get(i + 1)
                    .map_or(chars.len(), |next| next.start);
                slice(&chars, begin, end).trim().to_string()
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a ColumnSpec {
    type Item = &'a Column;
    type IntoIter = std::slice::Iter<'a, Column>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}

/// A listing split into its header line and data rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing<'a> {
    /// First line of the output
    pub header: &'a str,
    /// Non-blank lines after the header, in output order
    pub rows: Vec<&'a str>,
}

impl<'a> Listing<'a> {
    /// Split tool output into header and rows
    ///
    /// Returns `None` when the output contains nothing but whitespace, i.e.
    /// there is no header to parse at all.
    #[must_use]
    pub fn split(output: &'a str) -> Option<Self> {
        if output.trim().is_empty() {
            return None;
        }

        let mut lines = output.lines();
        let header = lines.next()?;
        let rows = lines.filter(|line| !line.trim().is_empty()).collect();

        Some(Self { header, rows })
    }

    /// Derive the columns of this listing's header
    ///
    /// # Errors
    /// See [`ColumnSpec::from_header`].
    pub fn columns(&self) -> Result<ColumnSpec> {
        ColumnSpec::from_header(self.header)
    }

    /// Width of the identifier column in this listing's layout
    ///
    /// This is the offset where the second column of `spec` begins in this
    /// listing's header. Both listings come from the same tool but need not
    /// share a layout, so the width is measured per listing. A single-column
    /// layout uses the whole row.
    ///
    /// # Errors
    /// Returns [`Error::Parse`] if the header does not contain the label.
    pub fn identifier_width(&self, spec: &ColumnSpec) -> Result<usize> {
        let Some(second) = spec.columns.get(1) else {
            return Ok(usize::MAX);
        };

        find_label(self.header, &second.label).ok_or_else(|| {
            Error::parse(format!(
                "column '{}' not found in header '{}'",
                second.label,
                self.header.trim_end()
            ))
        })
    }

    /// Leading identifier of a row, given the identifier column width
    #[must_use]
    pub fn leading_identifier(row: &str, width: usize) -> String {
        row.chars()
            .take(width)
            .collect::<String>()
            .trim()
            .to_string()
    }
}

/// Case-insensitive search for `label` in `header`, as a character offset
#[must_use]
pub fn find_label(header: &str, label: &str) -> Option<usize> {
    let haystack: Vec<char> = header.chars().collect();
    let needle: Vec<char> = label.chars().collect();

    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }

    (0..=haystack.len() - needle.len()).find(|&i| {
        haystack[i..i + needle.len()]
            .iter()
            .zip(&needle)
            .all(|(a, b)| a.to_lowercase().eq(b.to_lowercase()))
    })
}

fn is_separator(chars: &[char], pos: usize) -> bool {
    chars[pos].is_whitespace() && chars.get(pos + 1).is_some_and(|c| c.is_whitespace())
}

fn slice(chars: &[char], begin: usize, end: usize) -> String {
    let end = end.min(chars.len());
    let begin = begin.min(end);
    chars[begin..end].iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "CONTAINER ID   IMAGE     COMMAND                  CREATED       STATUS       PORTS     NAMES";

    #[test]
    fn test_header_names() {
        let spec = ColumnSpec::from_header(HEADER).unwrap();
        let names: Vec<&str> = spec.names().collect();
        assert_eq!(
            names,
            [
                "CONTAINER_ID",
                "IMAGE",
                "COMMAND",
                "CREATED",
                "STATUS",
                "PORTS",
                "NAMES"
            ]
        );
        assert_eq!(spec.identifier().label, "CONTAINER ID");
    }

    #[test]
    fn test_header_offsets_match_label_search() {
        let spec = ColumnSpec::from_header(HEADER).unwrap();
        for column in &spec {
            assert_eq!(find_label(HEADER, &column.label), Some(column.start));
        }
    }

    #[test]
    fn test_blank_header_is_parse_error() {
        assert!(matches!(
            ColumnSpec::from_header("   "),
            Err(Error::Parse { .. })
        ));
    }

    #[test]
    fn test_duplicate_column_is_parse_error() {
        let err = ColumnSpec::from_header("NAME   NAME").unwrap_err();
        assert!(err.to_string().contains("duplicate column 'NAME'"));
    }

    #[test]
    fn test_split_row_with_inner_spaces() {
        let spec = ColumnSpec::from_header(HEADER).unwrap();
        let row = "abc123def456   nginx     \"nginx -g 'daemon of…\"   2 hours ago   Up 2 hours   80/tcp    web";
        let values = spec.split_row(row);
        assert_eq!(
            values,
            [
                "abc123def456",
                "nginx",
                "\"nginx -g 'daemon of…\"",
                "2 hours ago",
                "Up 2 hours",
                "80/tcp",
                "web"
            ]
        );
    }

    #[test]
    fn test_split_row_empty_column() {
        let spec = ColumnSpec::from_header(HEADER).unwrap();
        let row = "0f1e2d3c4b5a   redis     \"docker-entrypoint.s…\"   3 days ago    Exited (0)             cache";
        let values = spec.split_row(row);
        assert_eq!(values[4], "Exited (0)");
        assert_eq!(values[5], "");
        assert_eq!(values[6], "cache");
    }

    #[test]
    fn test_split_row_shorter_than_header() {
        let spec = ColumnSpec::from_header("ID    NAME    STATUS").unwrap();
        let values = spec.split_row("a1    b");
        assert_eq!(values, ["a1", "b", ""]);
    }

    #[test]
    fn test_slices_partition_row() {
        let spec = ColumnSpec::from_header(HEADER).unwrap();
        let row = "abc123         nginx     \"nginx -g…\"              2 hours ago   Up 2 hours   80/tcp    web";
        let values = spec.split_row(row);
        assert_eq!(values[2], "\"nginx -g…\"");
        let joined: String = values.concat();
        let compact: String = row.chars().filter(|c| !c.is_whitespace()).collect();
        assert_eq!(
            joined.chars().filter(|c| !c.is_whitespace()).collect::<String>(),
            compact
        );
    }

    #[test]
    fn test_listing_split() {
        let output = format!("{HEADER}\nrow one\n\nrow two\n\n");
        let listing = Listing::split(&output).unwrap();
        assert_eq!(listing.header, HEADER);
        assert_eq!(listing.rows, ["row one", "row two"]);
    }

    #[test]
    fn test_listing_split_crlf() {
        let listing = Listing::split("ID    NAME\r\na1    web\r\n").unwrap();
        assert_eq!(listing.header, "ID    NAME");
        assert_eq!(listing.rows, ["a1    web"]);
    }

    #[test]
    fn test_listing_split_empty() {
        assert!(Listing::split("").is_none());
        assert!(Listing::split("\n\n").is_none());
    }

    #[test]
    fn test_identifier_width_case_insensitive() {
        let spec = ColumnSpec::from_header("ID       IMAGE    NAMES").unwrap();
        let listing = Listing::split("id    image    names\n").unwrap();
        assert_eq!(listing.identifier_width(&spec).unwrap(), 6);
    }

    #[test]
    fn test_identifier_width_missing_label() {
        let spec = ColumnSpec::from_header("ID       IMAGE    NAMES").unwrap();
        let listing = Listing::split("ID    STATUS\n").unwrap();
        assert!(matches!(
            listing.identifier_width(&spec),
            Err(Error::Parse { .. })
        ));
    }

    #[test]
    fn test_identifier_width_single_column() {
        let spec = ColumnSpec::from_header("NAMES").unwrap();
        let listing = Listing::split("NAMES\nweb\n").unwrap();
        let width = listing.identifier_width(&spec).unwrap();
        assert_eq!(Listing::leading_identifier("web  ", width), "web");
    }

    #[test]
    fn test_leading_identifier() {
        assert_eq!(
            Listing::leading_identifier("abc123   nginx   web", 9),
            "abc123"
        );
    }
}
