use crate::error::{BankError, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

/// One row of a batch file.
///
/// Columns are shared across commands; each command reads the ones it needs
/// (see [`crate::interfaces::batch`]) and ignores the rest.
#[derive(Debug, Deserialize, PartialEq, Clone, Default)]
pub struct CommandRecord {
    pub command: String,
    pub account: Option<u64>,
    pub counterparty: Option<u64>,
    pub client: Option<u64>,
    pub loan: Option<u64>,
    pub amount: Option<Decimal>,
    pub rate: Option<Decimal>,
    pub installments: Option<u32>,
    pub reference: Option<String>,
    pub text: Option<String>,
    /// Card columns; older files without them still parse.
    #[serde(default)]
    pub card: Option<u64>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub expires_on: Option<NaiveDate>,
    #[serde(default)]
    pub closing_day: Option<u8>,
    #[serde(default)]
    pub due_day: Option<u8>,
}

/// Reads banking commands from a CSV source.
///
/// This reader wraps `csv::Reader` and provides an iterator over
/// `Result<CommandRecord>`. It trims whitespace and accepts short rows.
pub struct CommandReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CommandReader<R> {
    /// Creates a new `CommandReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily reads and deserializes commands, one row at a time.
    pub fn commands(self) -> impl Iterator<Item = Result<CommandRecord>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(BankError::from))
    }
}
