use crate::utils::error::MercurialeError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;
use std::str::FromStr;

/// 商品代碼欄位，同時作為識別
pub const CODE_FIELD: &str = "Code Produit";
pub const LABEL_FIELD: &str = "Libellé produit";
/// 訂單項目合併進去的來源欄位
pub const SOURCE_FIELD: &str = "source";
/// 匯出 / 顯示時的來源欄位標題
pub const SOURCE_COLUMN: &str = "Source";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceTag {
    #[default]
    Folkestone,
    Vendome,
    Washington,
}

impl SourceTag {
    pub const ALL: [SourceTag; 3] = [
        SourceTag::Folkestone,
        SourceTag::Vendome,
        SourceTag::Washington,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceTag::Folkestone => "folkestone",
            SourceTag::Vendome => "vendome",
            SourceTag::Washington => "washington",
        }
    }

    /// Display name used in placeholders.
    pub fn label(&self) -> &'static str {
        match self {
            SourceTag::Folkestone => "Folkestone",
            SourceTag::Vendome => "Vendome",
            SourceTag::Washington => "Washington",
        }
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceTag {
    type Err = MercurialeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "folkestone" => Ok(SourceTag::Folkestone),
            "vendome" | "vendôme" => Ok(SourceTag::Vendome),
            "washington" => Ok(SourceTag::Washington),
            _ => Err(MercurialeError::UnknownSource {
                value: s.to_string(),
            }),
        }
    }
}

/// 純量欄位轉字串：null 與缺欄位都視為空字串
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_text(n),
        // 巢狀結構不在預期內，保留 JSON 原文
        other => other.to_string(),
    }
}

/// 整數值的浮點數不帶 `.0`（`4.0` 寫成 `4`），與試算表及代碼比對一致
fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.is_finite() && f.fract() == 0.0 && f.abs() < 1e21 => {
            if f == 0.0 {
                "0".to_string()
            } else {
                format!("{:.0}", f)
            }
        }
        _ => n.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    pub data: Map<String, Value>,
}

impl Record {
    pub fn new(data: Map<String, Value>) -> Self {
        Self { data }
    }

    pub fn field_text(&self, field: &str) -> String {
        self.data.get(field).map(value_text).unwrap_or_default()
    }

    pub fn code(&self) -> String {
        self.field_text(CODE_FIELD)
    }

    pub fn label(&self) -> String {
        self.field_text(LABEL_FIELD)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }
}

/// 一份 mercuriale，載入後不可變
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    source: SourceTag,
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(source: SourceTag, records: Vec<Record>) -> Self {
        Self { source, records }
    }

    pub fn source(&self) -> SourceTag {
        self.source
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Columns of the search table: field names of the first record.
    pub fn headers(&self) -> Vec<String> {
        self.records
            .first()
            .map(|r| r.data.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// First record whose stringified code equals `code`.
    pub fn find_by_code(&self, code: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.code() == code)
    }
}

/// A record drawn into the order list, tagged with the mercuriale it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderEntry {
    source: SourceTag,
    record: Record,
}

impl OrderEntry {
    /// 合併語意：記錄本身的 `source` 欄位被來源標記覆蓋
    pub fn new(record: &Record, source: SourceTag) -> Self {
        let mut record = record.clone();
        record.data.shift_remove(SOURCE_FIELD);
        Self { source, record }
    }

    pub fn source(&self) -> SourceTag {
        self.source
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn code(&self) -> String {
        self.record.code()
    }

    pub fn matches(&self, code: &str, source: SourceTag) -> bool {
        self.source == source && self.record.code() == code
    }

    /// One table or export row: the source tag, then `fields` in order.
    pub fn cells(&self, fields: &[String]) -> Vec<String> {
        let mut cells = Vec::with_capacity(fields.len() + 1);
        cells.push(self.source.to_string());
        cells.extend(fields.iter().map(|f| self.record.field_text(f)));
        cells
    }

    /// The merged object view: all record fields plus `source`.
    pub fn to_merged(&self) -> Map<String, Value> {
        let mut merged = self.record.data.clone();
        merged.insert(
            SOURCE_FIELD.to_string(),
            Value::String(self.source.to_string()),
        );
        merged
    }
}
