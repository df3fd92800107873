use std::path::{Path, PathBuf};

use arrow::error::ArrowError;
use calamine::{open_workbook_auto, Data, Reader};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::errors::ParquetError;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{Dataset, Point};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no rows to load")]
    Empty,
    #[error("row {row}: expected 2 or 3 columns, found {columns}")]
    InvalidShape { row: usize, columns: usize },
    #[error("row {row}, column '{column}': '{value}' is not a number")]
    NonNumericField {
        row: usize,
        column: &'static str,
        value: String,
    },
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("JSON: {0}")]
    JsonLayout(String),
    #[error("Parquet: {0}")]
    Parquet(#[from] ParquetError),
    #[error("Arrow: {0}")]
    Arrow(#[from] ArrowError),
    #[error("spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::Error),
}

// ---------------------------------------------------------------------------
// Table → Dataset
// ---------------------------------------------------------------------------

/// Column layout of a raw table, decided by the width of its first row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableShape {
    /// `x, y`
    TwoColumn,
    /// `label, x, y`
    ThreeColumn,
}

impl TableShape {
    pub fn from_width(columns: usize) -> Option<Self> {
        match columns {
            2 => Some(TableShape::TwoColumn),
            3 => Some(TableShape::ThreeColumn),
            _ => None,
        }
    }

    pub fn width(self) -> usize {
        match self {
            TableShape::TwoColumn => 2,
            TableShape::ThreeColumn => 3,
        }
    }

    /// Field positions of `(label, x, y)` within a row.
    fn positions(self) -> (Option<usize>, usize, usize) {
        match self {
            TableShape::TwoColumn => (None, 0, 1),
            TableShape::ThreeColumn => (Some(0), 1, 2),
        }
    }
}

/// Parse a header-less table of text fields into a [`Dataset`].
///
/// All rows must share the width of the first row (2 or 3). The load is
/// all-or-nothing: the first bad row fails the whole table.
pub fn load_from_table<R, S>(rows: &[R]) -> Result<Dataset, LoadError>
where
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    let first = rows.first().ok_or(LoadError::Empty)?;
    let width = first.as_ref().len();
    let shape = TableShape::from_width(width).ok_or(LoadError::InvalidShape {
        row: 0,
        columns: width,
    })?;
    let (label_pos, x_pos, y_pos) = shape.positions();

    let mut points = Vec::with_capacity(rows.len());
    for (row_no, row) in rows.iter().enumerate() {
        let fields = row.as_ref();
        if fields.len() != shape.width() {
            return Err(LoadError::InvalidShape {
                row: row_no,
                columns: fields.len(),
            });
        }

        let x = numeric_field(fields[x_pos].as_ref(), row_no, "x")?;
        let y = numeric_field(fields[y_pos].as_ref(), row_no, "y")?;
        let label = label_pos
            .map(|pos| fields[pos].as_ref().trim().to_string())
            .unwrap_or_default();

        points.push(Point { x, y, label });
    }

    Ok(Dataset::from_points(points))
}

fn numeric_field(raw: &str, row: usize, column: &'static str) -> Result<f64, LoadError> {
    parse_number(raw).ok_or_else(|| LoadError::NonNumericField {
        row,
        column,
        value: raw.to_string(),
    })
}

/// Parse a finite float, tolerating `,` thousands grouping (`12,345.6`).
pub fn parse_number(raw: &str) -> Option<f64> {
    let s = raw.trim();
    let value = match s.parse::<f64>() {
        Ok(v) => v,
        Err(_) if is_thousands_grouped(s) => s.replace(',', "").parse::<f64>().ok()?,
        Err(_) => return None,
    };
    value.is_finite().then_some(value)
}

fn is_thousands_grouped(s: &str) -> bool {
    let unsigned = s.trim_start_matches(['+', '-']);
    let integer_part = unsigned.split('.').next().unwrap_or("");
    let mut groups = integer_part.split(',');
    let Some(head) = groups.next() else {
        return false;
    };
    let head_ok = (1..=3).contains(&head.len()) && head.chars().all(|c| c.is_ascii_digit());
    let mut saw_tail = false;
    for group in groups {
        if group.len() != 3 || !group.chars().all(|c| c.is_ascii_digit()) {
            return false;
        }
        saw_tail = true;
    }
    head_ok && saw_tail
}

// ---------------------------------------------------------------------------
// Clipboard text
// ---------------------------------------------------------------------------

/// Split pasted text into rows of fields.
///
/// Spreadsheet copies are tab-separated; anything else is split on runs of
/// whitespace. Blank lines are skipped.
pub fn read_clipboard_table(text: &str) -> Vec<Vec<String>> {
    let tabbed = text.contains('\t');
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            if tabbed {
                line.split('\t').map(|f| f.trim().to_string()).collect()
            } else {
                line.split_whitespace().map(str::to_string).collect()
            }
        })
        .collect()
}

/// Load a dataset from pasted clipboard text.
pub fn load_clipboard_text(text: &str) -> Result<Dataset, LoadError> {
    load_from_table(&read_clipboard_table(text))
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

/// Load a dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.txt` – comma-separated, `x,y` or `label,x,y`
/// * `.tsv`          – tab-separated, same layouts
/// * `.json`         – `[[x, y], ...]` or `[[label, x, y], ...]`
/// * `.parquet`      – 2 or 3 columns in `label, x, y` order
/// * `.xlsx` / `.xls` / `.ods` – first worksheet, same layouts
///
/// `has_header` skips one header row for the delimited and spreadsheet formats.
pub fn load_file(path: &Path, has_header: bool) -> Result<Dataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let rows = match ext.as_str() {
        "csv" | "txt" => read_delimited(path, b',', has_header)?,
        "tsv" => read_delimited(path, b'\t', has_header)?,
        "json" => read_json(path)?,
        "parquet" | "pq" => read_parquet(path)?,
        "xlsx" | "xlsm" | "xls" | "ods" => read_spreadsheet(path, has_header)?,
        other => return Err(LoadError::UnsupportedExtension(other.to_string())),
    };

    load_from_table(&rows)
}

fn read_delimited(path: &Path, delimiter: u8, has_header: bool) -> Result<Vec<Vec<String>>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(has_header)
        // Ragged rows must reach `load_from_table` to be reported as a shape error.
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

/// Expected JSON layout: a top-level array of row arrays.
///
/// ```json
/// [["a", 1.0, 2.0], ["b", 2.0, 3.5]]
/// ```
fn read_json(path: &Path) -> Result<Vec<Vec<String>>, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root: JsonValue = serde_json::from_str(&text)?;

    let records = root
        .as_array()
        .ok_or_else(|| LoadError::JsonLayout("expected a top-level array of rows".into()))?;

    records
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            let cells = rec
                .as_array()
                .ok_or_else(|| LoadError::JsonLayout(format!("row {i} is not an array")))?;
            Ok(cells.iter().map(json_cell_to_text).collect())
        })
        .collect()
}

fn json_cell_to_text(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

/// Read every cell of a 2- or 3-column Parquet file as text.
///
/// Cells go through the same validation as every other source, so a null
/// or string cell in the x/y position fails the load.
fn read_parquet(path: &Path) -> Result<Vec<Vec<String>>, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut rows = Vec::new();
    for batch in reader {
        let batch = batch?;
        let columns = batch.columns();
        for row in 0..batch.num_rows() {
            let cells = columns
                .iter()
                .map(|col| arrow::util::display::array_value_to_string(col.as_ref(), row))
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(cells);
        }
    }
    Ok(rows)
}

/// Read the first worksheet as text cells. Empty cells become `""`.
fn read_spreadsheet(path: &Path, has_header: bool) -> Result<Vec<Vec<String>>, LoadError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook.worksheet_range_at(0).ok_or(LoadError::Empty)??;

    let skip = usize::from(has_header);
    Ok(range
        .rows()
        .skip(skip)
        .filter(|row| row.iter().any(|c| !matches!(c, Data::Empty)))
        .map(|row| row.iter().map(spreadsheet_cell_to_text).collect())
        .collect())
}

fn spreadsheet_cell_to_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("scatterfit-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn two_column_table_has_empty_labels() {
        let ds = load_from_table(&[["1", "2"], ["2", "4"], ["3", "6"]]).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.points()[2], Point::new(3.0, 6.0));
        assert!(!ds.has_labels());
    }

    #[test]
    fn three_column_table_attaches_labels_by_row() {
        let ds = load_from_table(&[["a", "1", "2"], ["b", "2", "3"], ["c", "3", "1"]]).unwrap();
        let labels: Vec<&str> = ds.points().iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, ["a", "b", "c"]);
        assert_eq!(ds.points()[1], Point::labelled("b", 2.0, 3.0));
    }

    #[test]
    fn non_numeric_y_fails_whole_table() {
        let err = load_from_table(&[["1", "x"], ["2", "4"]]).unwrap_err();
        assert!(matches!(
            err,
            LoadError::NonNumericField { row: 0, column: "y", .. }
        ));
    }

    #[test]
    fn unsupported_widths_are_shape_errors() {
        let err = load_from_table(&[vec!["1"]]).unwrap_err();
        assert!(matches!(err, LoadError::InvalidShape { row: 0, columns: 1 }));

        let err = load_from_table(&[vec!["1", "2", "3", "4"]]).unwrap_err();
        assert!(matches!(err, LoadError::InvalidShape { columns: 4, .. }));
    }

    #[test]
    fn ragged_rows_are_shape_errors() {
        let rows = vec![vec!["1", "2"], vec!["a", "2", "3"]];
        let err = load_from_table(&rows).unwrap_err();
        assert!(matches!(err, LoadError::InvalidShape { row: 1, columns: 3 }));
    }

    #[test]
    fn empty_table_is_rejected() {
        let rows: Vec<Vec<String>> = Vec::new();
        assert!(matches!(load_from_table(&rows), Err(LoadError::Empty)));
    }

    #[test]
    fn parse_number_rules() {
        assert_eq!(parse_number(" 2.5 "), Some(2.5));
        assert_eq!(parse_number("-1e3"), Some(-1000.0));
        assert_eq!(parse_number("1,234.5"), Some(1234.5));
        assert_eq!(parse_number("-12,345"), Some(-12345.0));
        assert_eq!(parse_number("1,5"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number(""), None);
    }

    #[test]
    fn clipboard_tab_separated_keeps_spaces_in_labels() {
        let rows = read_clipboard_table("north site\t1\t2\r\nsouth site\t2\t4\n\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["north site", "1", "2"]);
    }

    #[test]
    fn clipboard_whitespace_separated() {
        let err = load_clipboard_text("1   2\n2 4\n  3\t6").unwrap_err();
        // A tab anywhere switches the whole paste to tab mode.
        assert!(matches!(err, LoadError::InvalidShape { .. }));

        let ds = load_clipboard_text("1   2\n2 4\n  3 6\n").unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.points()[2].xy(), [3.0, 6.0]);
    }

    #[test]
    fn csv_file_with_and_without_header() {
        let path = temp_file("plain.csv", "a,1,2\nb,2,3\n");
        let ds = load_file(&path, false).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.points()[0].label, "a");

        let path = temp_file("header.csv", "x,y\n1,2\n2,4\n");
        assert_eq!(load_file(&path, true).unwrap().len(), 2);
        assert!(matches!(
            load_file(&path, false),
            Err(LoadError::NonNumericField { row: 0, column: "x", .. })
        ));
    }

    #[test]
    fn csv_ragged_file_is_shape_error() {
        let path = temp_file("ragged.csv", "1,2\n1,2,3\n");
        assert!(matches!(
            load_file(&path, false),
            Err(LoadError::InvalidShape { row: 1, columns: 3 })
        ));
    }

    #[test]
    fn json_rows_accept_numbers_and_strings() {
        let path = temp_file("rows.json", r#"[["a", 1, 2.5], ["b", "2", 3]]"#);
        let ds = load_file(&path, false).unwrap();
        assert_eq!(ds.points()[0], Point::labelled("a", 1.0, 2.5));
        assert_eq!(ds.points()[1], Point::labelled("b", 2.0, 3.0));

        let path = temp_file("object.json", r#"{"x": [1, 2]}"#);
        assert!(matches!(load_file(&path, false), Err(LoadError::JsonLayout(_))));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_file(Path::new("data.xml"), false).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedExtension(ext) if ext == "xml"));
    }

    #[test]
    fn tsv_file_keeps_spaces_in_labels() {
        let path = temp_file("points.tsv", "north site\t1\t2\nsouth site\t2\t4\n");
        let ds = load_file(&path, false).unwrap();
        assert_eq!(ds.points()[0], Point::labelled("north site", 1.0, 2.0));
        assert_eq!(ds.points()[1], Point::labelled("south site", 2.0, 4.0));

        let path = temp_file("bad.tsv", "1\t2\n2\tfour\n");
        assert!(matches!(
            load_file(&path, false),
            Err(LoadError::NonNumericField { row: 1, column: "y", .. })
        ));
    }

    fn write_parquet(name: &str, labels: Vec<&str>, xs: Vec<Option<f64>>, ys: Vec<Option<f64>>) -> PathBuf {
        use std::sync::Arc;

        use arrow::array::{Float64Array, StringArray};
        use arrow::datatypes::{DataType, Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(Schema::new(vec![
            Field::new("label", DataType::Utf8, false),
            Field::new("x", DataType::Float64, true),
            Field::new("y", DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(labels)),
                Arc::new(Float64Array::from(xs)),
                Arc::new(Float64Array::from(ys)),
            ],
        )
        .unwrap();

        let path = std::env::temp_dir().join(format!("scatterfit-{}-{name}", std::process::id()));
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
        path
    }

    #[test]
    fn parquet_file_is_read_in_row_order() {
        let path = write_parquet(
            "points.parquet",
            vec!["a", "b", "c"],
            vec![Some(1e-7), Some(2.5), Some(1.5e20)],
            vec![Some(-3.0), Some(0.0), Some(42.0)],
        );
        let ds = load_file(&path, false).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.points()[0], Point::labelled("a", 1e-7, -3.0));
        assert_eq!(ds.points()[2], Point::labelled("c", 1.5e20, 42.0));
    }

    #[test]
    fn parquet_null_coordinate_fails_whole_file() {
        let path = write_parquet(
            "nulls.parquet",
            vec!["a", "b"],
            vec![Some(1.0), Some(2.0)],
            vec![Some(1.0), None],
        );
        assert!(matches!(
            load_file(&path, false),
            Err(LoadError::NonNumericField { row: 1, column: "y", .. })
        ));
    }

    #[test]
    fn spreadsheet_cells_render_as_plain_numbers() {
        assert_eq!(spreadsheet_cell_to_text(&Data::Float(2.5)), "2.5");
        assert_eq!(spreadsheet_cell_to_text(&Data::Float(3.0)), "3");
        assert_eq!(spreadsheet_cell_to_text(&Data::Int(-7)), "-7");
        assert_eq!(spreadsheet_cell_to_text(&Data::String("site".into())), "site");
        assert_eq!(spreadsheet_cell_to_text(&Data::Empty), "");
        assert_eq!(parse_number(&spreadsheet_cell_to_text(&Data::Float(1e-7))), Some(1e-7));
    }

    #[test]
    fn corrupt_spreadsheet_is_an_error() {
        let path = temp_file("broken.xlsx", "this is not a zip archive");
        assert!(matches!(load_file(&path, false), Err(LoadError::Spreadsheet(_))));

        let missing = std::env::temp_dir().join("scatterfit-no-such-workbook.xlsx");
        assert!(load_file(&missing, false).is_err());
    }
}
