use std::{io::Read, str::FromStr};

use encoding_rs::Encoding;
use itertools::Itertools;
use rust_decimal::Decimal;

use crate::{
    error::{DataLoadError, SchemaError},
    io_utils,
};

pub const PAYMENT_TYPE: &str = "payment_type";
pub const PAYMENT_INSTALLMENTS: &str = "payment_installments";
pub const PAYMENT_VALUE: &str = "payment_value";

/// Cell contents read as "no value", matching the usual CSV export markers.
const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// One payment line of an order. A `None` field was blank in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRecord {
    pub payment_type: Option<String>,
    pub payment_installments: Option<i64>,
    pub payment_value: Option<Decimal>,
}

impl PaymentRecord {
    pub fn new(
        payment_type: impl Into<String>,
        payment_installments: i64,
        payment_value: Decimal,
    ) -> Self {
        Self {
            payment_type: Some(payment_type.into()),
            payment_installments: Some(payment_installments),
            payment_value: Some(payment_value),
        }
    }
}

/// Immutable, ordered collection of payment records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    records: Vec<PaymentRecord>,
}

impl Dataset {
    pub fn new(records: Vec<PaymentRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[PaymentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sum of every present `payment_value`, or `None` if it overflows.
    pub fn total_value(&self) -> Option<Decimal> {
        self.records
            .iter()
            .filter_map(|r| r.payment_value)
            .try_fold(Decimal::ZERO, Decimal::checked_add)
    }

    /// Reads every data row of `reader`, locating the required columns by
    /// header name. Columns beyond the three required ones are ignored.
    pub fn from_csv_reader<R>(
        reader: &mut csv::Reader<R>,
        encoding: &'static Encoding,
    ) -> Result<Self, DataLoadError>
    where
        R: Read,
    {
        let headers = io_utils::reader_headers(reader, encoding)?;
        let columns = ColumnPositions::resolve(&headers)?;

        let mut records = Vec::new();
        for (row_idx, record) in reader.byte_records().enumerate() {
            let record = record?;
            let decoded = io_utils::decode_record(&record, encoding)?;
            // header is line 1
            records.push(columns.parse_row(&decoded, row_idx + 2)?);
        }
        Ok(Self { records })
    }
}

impl FromIterator<PaymentRecord> for Dataset {
    fn from_iter<I: IntoIterator<Item = PaymentRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

struct ColumnPositions {
    payment_type: usize,
    installments: usize,
    value: usize,
}

impl ColumnPositions {
    fn resolve(headers: &[String]) -> Result<Self, SchemaError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| SchemaError::MissingColumn {
                    column: name.to_string(),
                    found: headers.iter().map(|h| h.trim()).join(", "),
                })
        };
        Ok(Self {
            payment_type: find(PAYMENT_TYPE)?,
            installments: find(PAYMENT_INSTALLMENTS)?,
            value: find(PAYMENT_VALUE)?,
        })
    }

    fn parse_row(&self, fields: &[String], row: usize) -> Result<PaymentRecord, DataLoadError> {
        let cell = |idx: usize| {
            let raw = fields.get(idx).map(|s| s.trim()).unwrap_or("");
            (!is_missing(raw)).then_some(raw)
        };
        let malformed = |column: &'static str, value: &str| DataLoadError::Malformed {
            row,
            column,
            value: value.to_string(),
        };

        let payment_installments = cell(self.installments)
            .map(|raw| {
                parse_installments(raw).ok_or_else(|| malformed(PAYMENT_INSTALLMENTS, raw))
            })
            .transpose()?;
        let payment_value = cell(self.value)
            .map(|raw| parse_decimal(raw).ok_or_else(|| malformed(PAYMENT_VALUE, raw)))
            .transpose()?;
        Ok(PaymentRecord {
            payment_type: cell(self.payment_type).map(str::to_string),
            payment_installments,
            payment_value,
        })
    }
}

fn is_missing(raw: &str) -> bool {
    MISSING_MARKERS.contains(&raw)
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

/// Integer counts are sometimes exported as floats (`3.0`); accept those when
/// the fractional part is zero.
fn parse_installments(raw: &str) -> Option<i64> {
    if let Ok(value) = raw.parse::<i64>() {
        return Some(value);
    }
    let value = parse_decimal(raw)?;
    if value.fract().is_zero() {
        i64::try_from(value).ok()
    } else {
        None
    }
}
