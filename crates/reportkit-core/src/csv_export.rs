//! Tabular export of derived rows as a CSV artifact.
//!
//! Row types describe their columns with a [`RowSchema`]: an ordered list of
//! fields, each optionally bound to a column position and header. When any
//! field is bound, output is positional and gaps render as empty cells.
//! Without bindings, every field is exported under its own name in
//! declaration order.
//!
//! Dialect: `,` separator, `\n` terminator, quoting only when a cell holds a
//! separator, quote, or line break.

use std::io::{self, Write};
use std::marker::PhantomData;

use crate::aggregator::Aggregator;
use crate::configuration::Configuration;
use crate::domain::{LaunchResults, ReportError, Result};
use crate::extension::Extension;
use crate::storage::{data_path, ReportStorage};

/// Column binding for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub position: usize,
    /// Header text; `None` renders an empty header cell.
    pub column: Option<&'static str>,
}

/// One field of a row type.
pub struct Field<T> {
    pub name: &'static str,
    pub binding: Option<Binding>,
    value: fn(&T) -> String,
}

impl<T> Field<T> {
    pub fn value(&self, row: &T) -> String {
        (self.value)(row)
    }
}

/// Manual schema descriptor for a row type.
pub struct RowSchema<T> {
    fields: Vec<Field<T>>,
}

impl<T> Default for RowSchema<T> {
    fn default() -> Self {
        Self { fields: Vec::new() }
    }
}

impl<T> RowSchema<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Field bound to `position` with header `column`.
    pub fn column(
        self,
        position: usize,
        column: &'static str,
        name: &'static str,
        value: fn(&T) -> String,
    ) -> Self {
        self.push(
            name,
            Some(Binding {
                position,
                column: Some(column),
            }),
            value,
        )
    }

    /// Field bound to `position` without a header name.
    pub fn positional(self, position: usize, name: &'static str, value: fn(&T) -> String) -> Self {
        self.push(
            name,
            Some(Binding {
                position,
                column: None,
            }),
            value,
        )
    }

    /// Field with no column binding.
    pub fn field(self, name: &'static str, value: fn(&T) -> String) -> Self {
        self.push(name, None, value)
    }

    fn push(
        mut self,
        name: &'static str,
        binding: Option<Binding>,
        value: fn(&T) -> String,
    ) -> Self {
        self.fields.push(Field {
            name,
            binding,
            value,
        });
        self
    }

    pub fn fields(&self) -> &[Field<T>] {
        &self.fields
    }

    /// Whether any field carries a column binding.
    pub fn is_positional(&self) -> bool {
        self.fields.iter().any(|f| f.binding.is_some())
    }

    /// Column slots in output order. Positional mode yields `None` at gaps;
    /// at a duplicated position the first declared field wins.
    fn slots(&self) -> Vec<Option<&Field<T>>> {
        if !self.is_positional() {
            return self.fields.iter().map(Some).collect();
        }
        let width = self
            .fields
            .iter()
            .filter_map(|f| f.binding.map(|b| b.position + 1))
            .max()
            .unwrap_or(0);
        let mut slots: Vec<Option<&Field<T>>> = vec![None; width];
        for field in &self.fields {
            if let Some(binding) = field.binding {
                let slot = &mut slots[binding.position];
                if slot.is_none() {
                    *slot = Some(field);
                }
            }
        }
        slots
    }

    pub fn header(&self) -> Vec<String> {
        let positional = self.is_positional();
        self.slots()
            .into_iter()
            .map(|slot| match slot {
                Some(field) if positional => field
                    .binding
                    .and_then(|b| b.column)
                    .unwrap_or_default()
                    .to_string(),
                Some(field) => field.name.to_string(),
                None => String::new(),
            })
            .collect()
    }

    pub fn record(&self, row: &T) -> Vec<String> {
        self.slots()
            .into_iter()
            .map(|slot| slot.map(|f| f.value(row)).unwrap_or_default())
            .collect()
    }
}

/// A row type exportable as CSV.
pub trait CsvRecord: Sized {
    fn schema() -> RowSchema<Self>;
}

fn needs_quotes(cell: &str) -> bool {
    cell.contains([',', '"', '\r', '\n'])
}

fn write_line<W: Write>(out: &mut W, cells: &[String]) -> io::Result<()> {
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            out.write_all(b",")?;
        }
        if needs_quotes(cell) {
            out.write_all(b"\"")?;
            out.write_all(cell.replace('"', "\"\"").as_bytes())?;
            out.write_all(b"\"")?;
        } else {
            out.write_all(cell.as_bytes())?;
        }
    }
    out.write_all(b"\n")
}

/// Write the header line followed by one line per row.
pub fn write_csv<T: CsvRecord, W: Write>(mut out: W, rows: &[T]) -> io::Result<()> {
    let schema = T::schema();
    write_line(&mut out, &schema.header())?;
    for row in rows {
        write_line(&mut out, &schema.record(row))?;
    }
    out.flush()
}

/// Encode `rows` into an in-memory CSV buffer.
pub fn to_csv_bytes<T: CsvRecord>(rows: &[T]) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_csv(&mut buf, rows)?;
    Ok(buf)
}

/// A concrete CSV export: which file to write and how to derive its rows.
pub trait CsvExport: Send + Sync {
    type Row: CsvRecord;

    /// Extension name under which the export is registered.
    fn name(&self) -> &str;

    /// Logical file name; the artifact lands at `data/<file_name>`.
    fn file_name(&self) -> &str;

    /// Derive rows from the launches. Must not have side effects.
    fn rows(&self, launches: &[LaunchResults]) -> Result<Vec<Self::Row>>;
}

/// Adapts a [`CsvExport`] into an extension with the aggregator capability.
pub struct CsvExportAggregator<E> {
    export: E,
}

impl<E: CsvExport> CsvExportAggregator<E> {
    pub fn new(export: E) -> Self {
        Self { export }
    }

    pub fn path(&self) -> String {
        data_path(self.export.file_name())
    }
}

impl<E: CsvExport> Extension for CsvExportAggregator<E> {
    fn name(&self) -> &str {
        self.export.name()
    }

    fn as_aggregator(&self) -> Option<&dyn Aggregator> {
        Some(self)
    }
}

impl<E: CsvExport> Aggregator for CsvExportAggregator<E> {
    fn aggregate(
        &self,
        _configuration: &Configuration,
        launches: &[LaunchResults],
        storage: &dyn ReportStorage,
    ) -> Result<()> {
        let path = self.path();
        let rows = self.export.rows(launches)?;
        let payload = to_csv_bytes(&rows).map_err(|e| ReportError::export(&path, e))?;
        storage.add_data_binary(&path, payload)?;
        Ok(())
    }
}

/// [`CsvExport`] backed by a row-producing closure.
pub struct FnCsvExport<T, F> {
    name: String,
    file_name: String,
    rows: F,
    _row: PhantomData<fn() -> T>,
}

impl<T, F> FnCsvExport<T, F>
where
    T: CsvRecord,
    F: Fn(&[LaunchResults]) -> Result<Vec<T>> + Send + Sync,
{
    pub fn new(name: impl Into<String>, file_name: impl Into<String>, rows: F) -> Self {
        Self {
            name: name.into(),
            file_name: file_name.into(),
            rows,
            _row: PhantomData,
        }
    }
}

impl<T, F> CsvExport for FnCsvExport<T, F>
where
    T: CsvRecord,
    F: Fn(&[LaunchResults]) -> Result<Vec<T>> + Send + Sync,
{
    type Row = T;

    fn name(&self) -> &str {
        &self.name
    }

    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn rows(&self, launches: &[LaunchResults]) -> Result<Vec<T>> {
        (self.rows)(launches)
    }
}

/// Build a CSV aggregator from a closure.
pub fn csv_aggregator<T, F>(
    name: impl Into<String>,
    file_name: impl Into<String>,
    rows: F,
) -> CsvExportAggregator<FnCsvExport<T, F>>
where
    T: CsvRecord,
    F: Fn(&[LaunchResults]) -> Result<Vec<T>> + Send + Sync,
{
    CsvExportAggregator::new(FnCsvExport::new(name, file_name, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain {
        a: String,
        b: String,
    }

    impl CsvRecord for Plain {
        fn schema() -> RowSchema<Self> {
            RowSchema::new()
                .field("a", |r: &Plain| r.a.clone())
                .field("b", |r: &Plain| r.b.clone())
        }
    }

    struct Unnamed {
        v: u32,
    }

    impl CsvRecord for Unnamed {
        fn schema() -> RowSchema<Self> {
            RowSchema::new()
                .positional(1, "v", |r: &Unnamed| r.v.to_string())
                .field("ignored", |_| "never".to_string())
        }
    }

    #[test]
    fn unbound_schema_falls_back_to_field_names() {
        let rows = vec![Plain {
            a: "1".to_string(),
            b: "2".to_string(),
        }];
        let out = String::from_utf8(to_csv_bytes(&rows).unwrap()).unwrap();
        assert_eq!(out, "a,b\n1,2\n");
    }

    #[test]
    fn unnamed_binding_renders_empty_header() {
        let schema = Unnamed::schema();
        assert_eq!(schema.header(), vec!["", ""]);
        assert_eq!(schema.record(&Unnamed { v: 7 }), vec!["", "7"]);
    }

    #[test]
    fn unbound_fields_are_skipped_in_positional_mode() {
        let out = String::from_utf8(to_csv_bytes(&[Unnamed { v: 3 }]).unwrap()).unwrap();
        assert_eq!(out, ",\n,3\n");
        assert!(!out.contains("never"));
    }

    #[test]
    fn empty_rows_still_write_header() {
        let out = String::from_utf8(to_csv_bytes::<Plain>(&[]).unwrap()).unwrap();
        assert_eq!(out, "a,b\n");
    }

    #[test]
    fn cells_with_special_characters_are_quoted() {
        let rows = vec![Plain {
            a: "x,y".to_string(),
            b: "say \"hi\"\nbye".to_string(),
        }];
        let out = String::from_utf8(to_csv_bytes(&rows).unwrap()).unwrap();
        assert_eq!(out, "a,b\n\"x,y\",\"say \"\"hi\"\"\nbye\"\n");
    }

    #[test]
    fn duplicate_position_keeps_first_declared() {
        struct Dup;
        impl CsvRecord for Dup {
            fn schema() -> RowSchema<Self> {
                RowSchema::new()
                    .column(0, "First", "first", |_| "1".to_string())
                    .column(0, "Second", "second", |_| "2".to_string())
            }
        }
        let out = String::from_utf8(to_csv_bytes(&[Dup]).unwrap()).unwrap();
        assert_eq!(out, "First\n1\n");
    }

    #[test]
    fn write_error_is_propagated() {
        struct Failing;
        impl Write for Failing {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }
        let err = write_csv::<Plain, _>(Failing, &[]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
