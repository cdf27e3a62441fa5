//! Header lookup and per-row validation for job centre CSV files

use std::collections::HashMap;

use csv::ByteRecord;

use crate::types::{parse_services, JobCentreCategory, NewJobCentre};

/// Columns that must be present in the header row
pub const REQUIRED_COLUMNS: [&str; 4] = ["name", "category", "state", "city"];

/// Every column the importer understands, in template order
pub const KNOWN_COLUMNS: [&str; 14] = [
    "name",
    "category",
    "description",
    "address",
    "state",
    "city",
    "contact_number",
    "email",
    "website",
    "services",
    "operating_hours",
    "is_verified",
    "is_government",
    "is_active",
];

const UTF8_BOM: &str = "\u{feff}";

/// Header row of an upload: column names and a name → position lookup
#[derive(Debug, Clone)]
pub struct CsvHeader {
    columns: Vec<String>,
    positions: HashMap<String, usize>,
}

impl CsvHeader {
    /// Build from the raw first record. Returns `None` when the record has no
    /// non-blank field.
    pub fn from_record(record: &ByteRecord) -> Option<Self> {
        let columns: Vec<String> = record
            .iter()
            .enumerate()
            .map(|(i, raw)| {
                let name = String::from_utf8_lossy(raw);
                if i == 0 {
                    name.trim_start_matches(UTF8_BOM).trim().to_string()
                } else {
                    name.trim().to_string()
                }
            })
            .collect();

        if columns.iter().all(|c| c.is_empty()) {
            return None;
        }

        let mut positions = HashMap::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            // first occurrence wins when a column is repeated
            positions.entry(name.clone()).or_insert(i);
        }

        Some(Self { columns, positions })
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.positions.contains_key(column)
    }

    /// Required columns absent from this header, in canonical order
    pub fn missing_required(&self) -> Vec<String> {
        REQUIRED_COLUMNS
            .iter()
            .filter(|c| !self.contains(c))
            .map(|c| c.to_string())
            .collect()
    }

    /// Value of `column` in `row`, if the header has that column
    fn value<'r>(&self, row: &'r [String], column: &str) -> Option<&'r str> {
        self.positions
            .get(column)
            .and_then(|&i| row.get(i))
            .map(String::as_str)
    }
}

/// Why a data row was rejected. The batch carries on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowError {
    #[error("Insufficient columns (expected {expected}, found {found})")]
    InsufficientColumns { expected: usize, found: usize },
    #[error("Missing required fields (name, state, city)")]
    MissingRequiredFields,
}

/// Decode a raw record into trimmed strings. Invalid UTF-8 is replaced
/// rather than rejected.
pub fn decode_fields(record: &ByteRecord) -> Vec<String> {
    record
        .iter()
        .map(|raw| String::from_utf8_lossy(raw).trim().to_string())
        .collect()
}

/// Turn one data row into a job centre.
///
/// `Ok(None)` means the row is entirely blank and must be ignored without
/// touching any counter.
pub fn parse_row(header: &CsvHeader, row: &[String]) -> Result<Option<NewJobCentre>, RowError> {
    if row.iter().all(|f| f.is_empty()) {
        return Ok(None);
    }

    if row.len() < header.len() {
        return Err(RowError::InsufficientColumns {
            expected: header.len(),
            found: row.len(),
        });
    }

    let text = |column: &str| header.value(row, column).unwrap_or("").to_string();
    let optional = |column: &str| {
        header
            .value(row, column)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };
    let flag = |column: &str| header.value(row, column) == Some("1");

    let name = text("name");
    let state = text("state");
    let city = text("city");
    if name.is_empty() || state.is_empty() || city.is_empty() {
        return Err(RowError::MissingRequiredFields);
    }

    let category = header
        .value(row, "category")
        .map(JobCentreCategory::parse_or_default)
        .unwrap_or_default();

    let services = header
        .value(row, "services")
        .map(parse_services)
        .unwrap_or_default();

    // Active unless the column exists and says otherwise
    let is_active = !header.contains("is_active") || flag("is_active");

    Ok(Some(NewJobCentre {
        name,
        category,
        description: optional("description"),
        address: optional("address"),
        state,
        city,
        contact_number: optional("contact_number"),
        email: optional("email"),
        website: optional("website"),
        services,
        operating_hours: optional("operating_hours"),
        is_verified: flag("is_verified"),
        is_government: flag("is_government"),
        is_active,
    }))
}

/// Blank upload template: every known column plus one example row.
pub fn template_csv() -> anyhow::Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(KNOWN_COLUMNS)?;
    writer.write_record([
        "Lagos Career Support Centre",
        "both",
        "Walk-in CV reviews and job matching",
        "12 Allen Avenue",
        "Lagos",
        "Ikeja",
        "+2348012345678",
        "info@example.ng",
        "https://example.ng",
        "CV Writing, Interview Prep, Job Matching",
        "Mon-Fri 9am-5pm",
        "0",
        "0",
        "1",
    ])?;
    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("failed to finish template: {}", e.error()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(columns: &[&str]) -> CsvHeader {
        CsvHeader::from_record(&ByteRecord::from(columns.to_vec())).unwrap()
    }

    fn row(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn test_header_reports_missing_required_columns() {
        let h = header(&["name", "state", "city"]);
        assert_eq!(h.missing_required(), vec!["category".to_string()]);

        let h = header(&["description"]);
        assert_eq!(h.missing_required(), vec!["name", "category", "state", "city"]);
    }

    #[test]
    fn test_header_matching_is_case_sensitive() {
        let h = header(&["Name", "category", "state", "city"]);
        assert_eq!(h.missing_required(), vec!["name".to_string()]);
    }

    #[test]
    fn test_header_strips_bom_and_whitespace() {
        let h = header(&["\u{feff}name", " category ", "state", "city"]);
        assert!(h.missing_required().is_empty());
    }

    #[test]
    fn test_blank_header_is_rejected() {
        assert!(CsvHeader::from_record(&ByteRecord::from(vec!["", " "])).is_none());
        assert!(CsvHeader::from_record(&ByteRecord::new()).is_none());
    }

    #[test]
    fn test_minimal_row_gets_defaults() {
        let h = header(&["name", "category", "state", "city"]);
        let centre = parse_row(&h, &row(&["Lagos Jobs Hub", "online", "Lagos", "Ikeja"]))
            .unwrap()
            .unwrap();

        assert_eq!(centre.name, "Lagos Jobs Hub");
        assert_eq!(centre.category, JobCentreCategory::Online);
        assert!(centre.services.is_empty());
        assert!(!centre.is_verified);
        assert!(!centre.is_government);
        assert!(centre.is_active);
        assert!(centre.description.is_none());
    }

    #[test]
    fn test_invalid_category_is_coerced() {
        let h = header(&["name", "category", "state", "city"]);
        let centre = parse_row(&h, &row(&["Hub", "invalid_value", "Oyo", "Ibadan"]))
            .unwrap()
            .unwrap();
        assert_eq!(centre.category, JobCentreCategory::Offline);
    }

    #[test]
    fn test_flags_require_exact_one() {
        let h = header(&["name", "category", "state", "city", "is_verified", "is_government", "is_active"]);

        let centre = parse_row(&h, &row(&["Hub", "both", "Kano", "Kano", "1", "yes", "0"]))
            .unwrap()
            .unwrap();
        assert!(centre.is_verified);
        assert!(!centre.is_government);
        assert!(!centre.is_active);

        // Present but empty is_active turns the centre inactive
        let centre = parse_row(&h, &row(&["Hub", "both", "Kano", "Kano", "", "", ""]))
            .unwrap()
            .unwrap();
        assert!(!centre.is_active);
    }

    #[test]
    fn test_columns_are_looked_up_by_name() {
        let h = header(&["city", "services", "state", "category", "name", "email"]);
        let centre = parse_row(
            &h,
            &row(&["Abuja", "Resume Review, , Interview Prep,  ", "FCT", "both", "Hub", ""]),
        )
        .unwrap()
        .unwrap();

        assert_eq!(centre.name, "Hub");
        assert_eq!(centre.state, "FCT");
        assert_eq!(centre.city, "Abuja");
        assert_eq!(centre.services, vec!["Resume Review", "Interview Prep"]);
        assert!(centre.email.is_none());
    }

    #[test]
    fn test_blank_row_is_ignored() {
        let h = header(&KNOWN_COLUMNS);
        let blank = row(&[""; 14]);
        assert_eq!(parse_row(&h, &blank), Ok(None));

        // Shorter than the header but still blank
        assert_eq!(parse_row(&h, &row(&["", ""])), Ok(None));
    }

    #[test]
    fn test_short_row_is_an_error() {
        let h = header(&["name", "category", "state", "city"]);
        assert_eq!(
            parse_row(&h, &row(&["Hub", "online"])),
            Err(RowError::InsufficientColumns { expected: 4, found: 2 })
        );
    }

    #[test]
    fn test_whitespace_only_required_field_is_missing() {
        let h = header(&["name", "category", "state", "city"]);
        let fields = decode_fields(&ByteRecord::from(vec!["Hub", "online", "   ", "Ikeja"]));
        assert_eq!(parse_row(&h, &fields), Err(RowError::MissingRequiredFields));
    }

    #[test]
    fn test_template_has_every_known_column() {
        let bytes = template_csv().unwrap();
        let mut reader = csv::ReaderBuilder::new().has_headers(false).from_reader(bytes.as_slice());
        let mut first = ByteRecord::new();
        assert!(reader.read_byte_record(&mut first).unwrap());

        let h = CsvHeader::from_record(&first).unwrap();
        assert!(h.missing_required().is_empty());
        assert_eq!(h.len(), KNOWN_COLUMNS.len());

        let mut sample = ByteRecord::new();
        assert!(reader.read_byte_record(&mut sample).unwrap());
        let centre = parse_row(&h, &decode_fields(&sample)).unwrap().unwrap();
        assert_eq!(centre.category, JobCentreCategory::Both);
        assert_eq!(centre.services.len(), 3);
        assert!(centre.is_active);
    }

    #[test]
    fn test_decode_fields_replaces_invalid_utf8() {
        let mut record = ByteRecord::new();
        record.push_field(b" Caf\xe9 ");
        let fields = decode_fields(&record);
        assert_eq!(fields, vec!["Caf\u{fffd}".to_string()]);
    }
}
