//! CSV reader with encoding and delimiter auto-detection.
//!
//! Produces header-aligned string rows. Knows nothing about films; the
//! [`crate::dataset`] loader maps rows onto columns.

use serde_json::{Map, Value};
use std::path::Path;

use crate::error::{CsvError, CsvResult};

/// Result of parsing with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Column headers, trimmed
    pub headers: Vec<String>,
    /// Data rows, each exactly `headers.len()` cells long
    pub rows: Vec<Row>,
    /// Detected or used encoding
    pub encoding: String,
    /// Detected or used delimiter
    pub delimiter: char,
}

/// One data row with its 1-based line number in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub line: u64,
    pub cells: Vec<String>,
}

impl ParseResult {
    /// Rows as JSON objects keyed by header.
    pub fn to_json(&self) -> Vec<Value> {
        self.rows
            .iter()
            .map(|row| {
                let obj: Map<String, Value> = self
                    .headers
                    .iter()
                    .zip(&row.cells)
                    .map(|(h, v)| (h.clone(), Value::String(v.clone())))
                    .collect();
                Value::Object(obj)
            })
            .collect()
    }
}

/// Detect the encoding of raw bytes.
///
/// Valid UTF-8 is taken as is. Otherwise chardet decides between the Western
/// single-byte encodings and UTF-16; any other guess on a film catalogue is
/// almost always a misdetected Latin-1 file.
pub fn detect_encoding(bytes: &[u8]) -> String {
    if std::str::from_utf8(bytes).is_ok() {
        return "utf-8".to_string();
    }

    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "iso-8859-1" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "iso-8859-15" => "iso-8859-15".to_string(),
        "utf-16le" => "utf-16le".to_string(),
        "utf-16be" => "utf-16be".to_string(),
        _ => "windows-1252".to_string(),
    }
}

/// Decode bytes to string using the specified encoding.
///
/// Invalid UTF-8 falls back to Windows-1252, which maps every byte, so
/// Latin-1 files mislabelled by detection still keep their accented letters.
pub fn decode_content(bytes: &[u8], encoding: &str) -> CsvResult<String> {
    let codec = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => encoding_rs::UTF_8,
        // WHATWG treats the Latin-1 label as Windows-1252, a superset
        "iso-8859-1" | "latin-1" | "latin1" | "windows-1252" | "cp1252" => {
            encoding_rs::WINDOWS_1252
        }
        other => encoding_rs::Encoding::for_label(other.as_bytes())
            .ok_or_else(|| CsvError::EncodingError(other.to_string()))?,
    };

    let (text, _, had_errors) = codec.decode(bytes);
    if had_errors && codec == encoding_rs::UTF_8 {
        return Ok(encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned());
    }
    Ok(text.into_owned())
}

/// Detect the delimiter by counting occurrences in the first line
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [',', ';', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse CSV text with an explicit delimiter.
///
/// Quoted fields may contain the delimiter. Short rows are padded with empty
/// cells, extra cells are ignored, blank lines are skipped.
pub fn parse_str(content: &str, delimiter: char, encoding: String) -> CsvResult<ParseResult> {
    if content.trim().is_empty() {
        return Err(CsvError::EmptyFile);
    }

    let delimiter_byte = u8::try_from(delimiter).map_err(|_| CsvError::ParseError {
        line: 1,
        message: format!("Delimiter '{}' is not a single-byte character", delimiter),
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter_byte)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(CsvError::NoHeaders);
    }

    let newlines: Vec<usize> = content.match_indices('\n').map(|(i, _)| i).collect();
    let mut rows = Vec::new();

    for record in reader.records() {
        let record = record?;
        if record.iter().all(|cell| cell.is_empty()) {
            continue;
        }

        let line = record
            .position()
            .map(|p| record_line(content, &newlines, p.byte() as usize))
            .unwrap_or(0);
        let cells = (0..headers.len())
            .map(|i| record.get(i).unwrap_or("").to_string())
            .collect();

        rows.push(Row { line, cells });
    }

    Ok(ParseResult {
        headers,
        rows,
        encoding,
        delimiter,
    })
}

/// 1-based line of the record starting at `byte`.
///
/// The reader reports the offset before any blank lines it skipped, so step
/// past line breaks first.
fn record_line(content: &str, newlines: &[usize], byte: usize) -> u64 {
    let bytes = content.as_bytes();
    let mut start = byte.min(bytes.len());
    while start < bytes.len() && matches!(bytes[start], b'\n' | b'\r') {
        start += 1;
    }
    newlines.partition_point(|&i| i < start) as u64 + 1
}

/// Parse CSV bytes with auto-detection of encoding and delimiter.
pub fn parse_bytes_auto(bytes: &[u8]) -> CsvResult<ParseResult> {
    if bytes.is_empty() {
        return Err(CsvError::EmptyFile);
    }

    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding)?;
    let delimiter = detect_delimiter(&content);

    parse_str(&content, delimiter, encoding)
}

/// Parse CSV file with auto-detection of encoding and delimiter.
///
/// # Example
/// ```ignore
/// let result = parse_csv_file_auto("NetflixOriginals.csv")?;
/// println!("Encoding: {}, Delimiter: '{}'", result.encoding, result.delimiter);
/// println!("Rows: {}", result.rows.len());
/// ```
pub fn parse_csv_file_auto<P: AsRef<Path>>(path: P) -> CsvResult<ParseResult> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes_auto(&bytes)
}
