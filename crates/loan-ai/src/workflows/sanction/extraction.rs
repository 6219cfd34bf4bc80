use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Turns an uploaded document into plain text for the ingestion stage.
/// Implementations own the parsing concern; the workflow only requires
/// "text or failure".
pub trait DocumentExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> Result<String, ExtractionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),
    #[error("unsupported document format: {}", .extension.as_deref().unwrap_or("<none>"))]
    UnsupportedFormat { extension: Option<String> },
    #[error("malformed csv statement: {0}")]
    MalformedCsv(#[from] csv::Error),
}

/// Extracts raw text from CSV bank-statement exports. Binary formats such
/// as PDF arrive through external OCR collaborators and are rejected here.
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvStatementExtractor;

impl DocumentExtractor for CsvStatementExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => {}
            other => {
                return Err(ExtractionError::UnsupportedFormat {
                    extension: other.map(str::to_owned),
                })
            }
        }

        let file = File::open(path)?;
        read_csv_text(file)
    }
}

/// Flatten a CSV document into one line per record, header first.
fn read_csv_text<R: Read>(reader: R) -> Result<String, ExtractionError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut text = csv_reader
        .headers()?
        .iter()
        .collect::<Vec<_>>()
        .join(",");

    for record in csv_reader.records() {
        let record = record?;
        text.push('\n');
        text.push_str(&record.iter().collect::<Vec<_>>().join(","));
    }

    Ok(text)
}
