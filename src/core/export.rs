use crate::core::order::OrderList;
use crate::core::Storage;
use crate::domain::model::SOURCE_COLUMN;
use crate::utils::error::{MercurialeError, Result};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::borrow::Cow;

pub const EXPORT_FILENAME: &str = "ma_commande.csv";
pub const EXPORT_MIME: &str = "text/csv;charset=utf-8";
/// 讓試算表軟體辨識 UTF-8
pub const UTF8_BOM: &str = "\u{FEFF}";

#[derive(Debug, Clone)]
pub struct CsvExporter {
    delimiter: u8,
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self { delimiter: b';' }
    }
}

impl CsvExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// `Source` followed by the order's field union.
    pub fn columns(order: &OrderList) -> Vec<String> {
        let mut columns = vec![SOURCE_COLUMN.to_string()];
        columns.extend(order.columns());
        columns
    }

    /// Quotes `cell` when it contains the delimiter, a quote or `\n`;
    /// inner quotes are doubled. Anything else is written as is.
    pub fn escape_cell<'a>(&self, cell: &'a str) -> Cow<'a, str> {
        let delimiter = self.delimiter as char;
        if cell.contains(delimiter) || cell.contains('"') || cell.contains('\n') {
            Cow::Owned(format!("\"{}\"", cell.replace('"', "\"\"")))
        } else {
            Cow::Borrowed(cell)
        }
    }

    /// Serializes the order as BOM-prefixed, `;`-separated CSV.
    ///
    /// The header is a plain join of the column names. Data cells go through
    /// [`CsvExporter::escape_cell`]. Lines are joined with `\n` and the last
    /// row has no terminator.
    pub fn export_bytes(&self, order: &OrderList) -> Result<Vec<u8>> {
        if order.is_empty() {
            return Err(MercurialeError::EmptyOrder);
        }

        let fields = order.columns();
        let columns = Self::columns(order);

        // 引號由 escape_cell 處理，writer 只負責分隔與換行
        let mut wtr = WriterBuilder::new()
            .delimiter(self.delimiter)
            .quote_style(QuoteStyle::Never)
            .terminator(Terminator::Any(b'\n'))
            .has_headers(false)
            .from_writer(UTF8_BOM.as_bytes().to_vec());

        wtr.write_record(&columns)?;
        for entry in order.entries() {
            let cells = entry.cells(&fields);
            wtr.write_record(cells.iter().map(|c| self.escape_cell(c).into_owned()))?;
        }

        let mut bytes = wtr.into_inner().map_err(|e| e.into_error())?;
        // csv 每列都會補換行，最後一列不需要
        if bytes.last() == Some(&b'\n') {
            bytes.pop();
        }

        tracing::debug!(
            "Serialized {} order entries into {} bytes",
            order.len(),
            bytes.len()
        );
        Ok(bytes)
    }

    pub fn export_string(&self, order: &OrderList) -> Result<String> {
        let bytes = self.export_bytes(order)?;
        String::from_utf8(bytes).map_err(|e| MercurialeError::IoError(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            e,
        )))
    }

    /// Writes the export through `storage` and returns the written location.
    pub async fn export_to<S: Storage>(
        &self,
        order: &OrderList,
        storage: &S,
        filename: &str,
    ) -> Result<String> {
        let bytes = self.export_bytes(order)?;
        let path = storage.write_file(filename, &bytes).await?;
        tracing::info!(
            "💾 Exported {} entries ({} bytes, {}) to {}",
            order.len(),
            bytes.len(),
            EXPORT_MIME,
            path
        );
        Ok(path)
    }
}
