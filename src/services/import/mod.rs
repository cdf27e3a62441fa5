//! Job centre CSV bulk import
//!
//! Pipeline for one uploaded file:
//! 1. Gate the upload (extension, size) and validate the header row.
//!    Nothing touches the database until both pass.
//! 2. Open one transaction and walk the data rows in file order. Row-level
//!    problems (short row, missing field, rejected insert) are counted and
//!    reported; the loop keeps going.
//! 3. Commit at the end. Any fault inside the loop rolls back every insert
//!    of the run instead.

pub mod csv_row;
pub mod store;

use std::future::Future;
use std::io::Read;
use std::path::Path;

use csv::ByteRecord;
use sqlx::PgPool;
use tracing::{debug, error, info, warn};

use crate::defaults::MAX_UPLOAD_BYTES;
use crate::types::ImportResult;

use self::csv_row::{decode_fields, parse_row, CsvHeader};
pub use self::store::{JobCentreStore, PgJobCentreStore, StoreError};

/// A file handed to the importer, from a multipart upload or from disk
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content: Vec<u8>,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content,
        }
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }

    /// Read a local file. The size is checked from metadata first so an
    /// oversize file is refused without loading it.
    pub fn from_path(path: &Path) -> Result<Self, ImportError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let metadata = std::fs::metadata(path)
            .map_err(|e| ImportError::Unreadable(format!("{}: {}", path.display(), e)))?;
        ensure_csv_extension(&file_name)?;
        ensure_size(metadata.len())?;

        let content = std::fs::read(path)
            .map_err(|e| ImportError::Unreadable(format!("{}: {}", path.display(), e)))?;
        Ok(Self::new(file_name, content))
    }
}

/// Per-run switches
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportOptions {
    /// Skip rows whose (name, state) already exists
    pub skip_duplicates: bool,
    /// Cap on kept `error_details` messages
    pub max_error_details: Option<usize>,
}

/// Top-level import failure. Validation variants happen before any row is
/// read; `Transaction` means the run was rolled back.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("No file uploaded")]
    MissingFile,
    #[error("File upload failed: {0}")]
    UploadFailed(String),
    #[error("Invalid file type. Only CSV files are allowed")]
    InvalidFileType,
    #[error("File too large. Maximum size is 5MB (got {size} bytes)")]
    FileTooLarge { size: u64 },
    #[error("Unable to read uploaded file: {0}")]
    Unreadable(String),
    #[error("CSV file is empty")]
    EmptyFile,
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("Import failed: {0}")]
    Transaction(String),
}

impl ImportError {
    pub fn is_validation(&self) -> bool {
        !matches!(self, ImportError::Transaction(_))
    }
}

fn ensure_csv_extension(file_name: &str) -> Result<(), ImportError> {
    let is_csv = Path::new(file_name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        Ok(())
    } else {
        Err(ImportError::InvalidFileType)
    }
}

fn ensure_size(size: u64) -> Result<(), ImportError> {
    if size > MAX_UPLOAD_BYTES {
        Err(ImportError::FileTooLarge { size })
    } else {
        Ok(())
    }
}

/// Extension and size gate, checked before the content is looked at
pub fn validate_upload(file: &UploadedFile) -> Result<(), ImportError> {
    ensure_csv_extension(&file.file_name)?;
    ensure_size(file.size())
}

/// A CSV source whose header row has been read and validated
#[derive(Debug)]
pub struct CsvImport<R> {
    reader: csv::Reader<R>,
    header: CsvHeader,
}

impl<R: Read> CsvImport<R> {
    /// Read the header row and check the required columns are there.
    pub fn open(source: R) -> Result<Self, ImportError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b',')
            .quote(b'"')
            .has_headers(false)
            .flexible(true)
            .from_reader(source);

        let mut first = ByteRecord::new();
        let has_header = reader
            .read_byte_record(&mut first)
            .map_err(|e| ImportError::Unreadable(e.to_string()))?;
        if !has_header {
            return Err(ImportError::EmptyFile);
        }

        let header = CsvHeader::from_record(&first).ok_or(ImportError::EmptyFile)?;

        let missing = header.missing_required();
        if !missing.is_empty() {
            return Err(ImportError::MissingColumns(missing));
        }

        Ok(Self { reader, header })
    }

    pub fn header(&self) -> &CsvHeader {
        &self.header
    }

    /// Process every data row against `store`.
    ///
    /// Returns `Err(ImportError::Transaction)` on a fault; the caller owns
    /// the transaction and must roll it back.
    pub async fn run<S>(
        mut self,
        store: &mut S,
        options: &ImportOptions,
    ) -> Result<ImportResult, ImportError>
    where
        S: JobCentreStore + ?Sized,
    {
        let mut result = ImportResult::new(options.max_error_details);
        let mut record = ByteRecord::new();
        // header is row 1
        let mut row_number: usize = 1;

        loop {
            let has_row = self.reader.read_byte_record(&mut record).map_err(|e| {
                ImportError::Transaction(format!("failed to read row {}: {}", row_number + 1, e))
            })?;
            if !has_row {
                break;
            }
            row_number += 1;

            let fields = decode_fields(&record);
            let centre = match parse_row(&self.header, &fields) {
                Ok(Some(centre)) => centre,
                Ok(None) => continue,
                Err(e) => {
                    debug!("Row {} rejected: {}", row_number, e);
                    result.record_error(format!("Row {}: {}", row_number, e));
                    continue;
                }
            };

            if options.skip_duplicates {
                let exists = store
                    .exists(&centre.name, &centre.state)
                    .await
                    .map_err(|e| fault(row_number, e))?;
                if exists {
                    debug!("Row {} skipped: '{}' already exists in {}", row_number, centre.name, centre.state);
                    result.record_skipped();
                    continue;
                }
            }

            match store.insert(&centre).await {
                Ok(_) => result.record_imported(),
                Err(StoreError::Rejected(message)) => {
                    debug!("Row {} insert rejected: {}", row_number, message);
                    result.record_error(format!("Row {}: Database error - {}", row_number, message));
                }
                Err(e @ StoreError::Fault(_)) => return Err(fault(row_number, e)),
            }
        }

        Ok(result.finish())
    }
}

fn fault(row_number: usize, err: StoreError) -> ImportError {
    ImportError::Transaction(format!("database failure at row {}: {}", row_number, err))
}

/// Import one upload into PostgreSQL inside a single transaction.
pub async fn import_job_centres(
    pool: &PgPool,
    file: &UploadedFile,
    options: &ImportOptions,
) -> Result<ImportResult, ImportError> {
    info!(
        "Job centre import started: file='{}', size={} bytes, skip_duplicates={}",
        file.file_name,
        file.size(),
        options.skip_duplicates
    );

    validate_upload(file)?;
    let import = CsvImport::open(file.content.as_slice())?;
    debug!("Header of '{}' has {} columns", file.file_name, import.header().len());

    let mut store = PgJobCentreStore::begin(pool)
        .await
        .map_err(|e| ImportError::Transaction(format!("could not start transaction: {}", e)))?;

    match import.run(&mut store, options).await {
        Ok(result) => {
            store
                .commit()
                .await
                .map_err(|e| ImportError::Transaction(format!("commit failed: {}", e)))?;
            info!(
                "Job centre import '{}' committed: {} imported, {} skipped, {} errors",
                file.file_name, result.imported, result.skipped, result.errors
            );
            Ok(result)
        }
        Err(e) => {
            error!("Job centre import '{}' failed, rolling back: {}", file.file_name, e);
            if let Err(rollback_err) = store.rollback().await {
                warn!("Rollback of import '{}' failed: {}", file.file_name, rollback_err);
            }
            Err(e)
        }
    }
}

/// Import a CSV file from disk.
///
/// The file is read and its header checked before `connect` is called, so a
/// file that fails validation never opens a database connection.
pub async fn import_local_file<F, Fut>(
    path: &Path,
    options: &ImportOptions,
    connect: F,
) -> Result<ImportResult, ImportError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = anyhow::Result<PgPool>>,
{
    let file = UploadedFile::from_path(path)?;
    validate_upload(&file)?;
    CsvImport::open(file.content.as_slice())?;

    let pool = connect()
        .await
        .map_err(|e| ImportError::Transaction(format!("database unavailable: {:#}", e)))?;

    import_job_centres(&pool, &file, options).await
}

#[cfg(test)]
pub(crate) mod memory;
