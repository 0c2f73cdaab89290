//! Export service domain logic for the donor registry.
//!
//! Produces the two downloads the settings page offers: the raw donor table as
//! delimited text, and the printable camp report. Both list donors in
//! registration order.

use anyhow::{anyhow, Context, Result};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use log::{info, warn};
use serde::Serialize;
use serde_json::Value;
use shared::CampInfo;

pub use crate::backend::domain::camp_document::{camp_document_filename, to_document};
use crate::backend::domain::donor_service::DonorService;
use crate::backend::domain::errors::ExportError;

pub const CSV_FILENAME: &str = "donors.csv";

/// Field left out of delimited exports
const IDENTIFIER_FIELD: &str = "id";

#[derive(Debug, Clone)]
pub struct CsvExport {
    pub content: String,
    pub filename: String,
    pub donor_count: usize,
}

#[derive(Debug, Clone)]
pub struct DocumentExport {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub donor_count: usize,
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Serialize records as delimited text.
///
/// The header is the field names of the first record in declaration order,
/// without `id`. Every value is quoted; missing values become empty strings.
/// Rows are joined with `\n` and there is no trailing newline. An empty input
/// produces empty text.
pub fn to_delimited_text<T: Serialize>(records: &[T]) -> Result<String> {
    let rows: Vec<serde_json::Map<String, Value>> = records
        .iter()
        .map(|record| match serde_json::to_value(record)? {
            Value::Object(map) => Ok(map),
            other => Err(anyhow!("Export records must serialize as objects, got {}", other)),
        })
        .collect::<Result<_>>()?;

    let Some(first) = rows.first() else {
        return Ok(String::new());
    };

    let header: Vec<&str> = first
        .keys()
        .map(String::as_str)
        .filter(|key| *key != IDENTIFIER_FIELD)
        .collect();

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for row in &rows {
        writer.write_record(header.iter().map(|key| cell_text(row.get(*key))))?;
    }

    let body = writer
        .into_inner()
        .map_err(|e| anyhow!("Failed to flush CSV writer: {}", e))?;
    let body = String::from_utf8(body).context("CSV output was not UTF-8")?;
    let body = body.strip_suffix('\n').unwrap_or(&body);

    Ok(format!("{}\n{}", header.join(","), body))
}

/// Export service that handles all export-related business logic
#[derive(Clone)]
pub struct ExportService {
    donor_service: DonorService,
}

impl ExportService {
    pub fn new(donor_service: DonorService) -> Self {
        Self { donor_service }
    }

    /// Every donor as delimited text
    pub async fn export_csv(&self) -> Result<CsvExport, ExportError> {
        info!("📄 EXPORT: Exporting donors as CSV");

        let donors: Vec<shared::Donor> = self
            .donor_service
            .list_donors_oldest_first()
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        if donors.is_empty() {
            warn!("❌ EXPORT: No donors to export");
            return Err(ExportError::NoData);
        }

        let content = to_delimited_text(&donors)?;
        info!(
            "✅ EXPORT: Generated CSV for {} donors ({} bytes)",
            donors.len(),
            content.len()
        );

        Ok(CsvExport {
            content,
            filename: CSV_FILENAME.to_string(),
            donor_count: donors.len(),
        })
    }

    /// The printable camp report
    pub async fn export_camp_details(&self, camp: CampInfo) -> Result<DocumentExport, ExportError> {
        info!("📄 EXPORT: Generating camp details for '{}'", camp.name.trim());

        let donors = self.donor_service.list_donors_oldest_first().await?;
        let bytes = to_document(&camp, &donors)?;
        let filename = camp_document_filename(&camp.name);

        info!(
            "✅ EXPORT: Generated {} ({} donors, {} bytes)",
            filename,
            donors.len(),
            bytes.len()
        );

        Ok(DocumentExport {
            bytes,
            filename,
            donor_count: donors.len(),
        })
    }
}
