// CSV bulk source for the drug catalog
use crate::catalog::{Catalog, CatalogRecord};
use rxlink_core::text::normalize_key;
use rxlink_core::Result;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use tracing::warn;

/// One row of the bulk source. Missing columns deserialize to empty strings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SourceRow {
    drug_name: String,
    generic_name: String,
    drug_classes: String,
    activity: String,
    rx_otc: String,
    pregnancy_category: String,
    side_effects: String,
    related_drugs: String,
}

impl SourceRow {
    fn into_entry(self) -> Option<(String, CatalogRecord)> {
        let name = normalize_key(&self.drug_name);
        if name.is_empty() {
            return None;
        }
        let record = CatalogRecord {
            generic_name: self.generic_name.trim().to_string(),
            drug_classes: self.drug_classes.trim().to_string(),
            activity: self.activity.trim().to_string(),
            rx_otc: self.rx_otc.trim().to_string(),
            pregnancy_category: self.pregnancy_category.trim().to_string(),
            side_effects: self.side_effects.trim().to_string(),
            related_drugs: self.related_drugs.trim().to_string(),
        };
        Some((name, record))
    }
}

/// Read a catalog from a CSV file with a header row
pub fn read_csv_path<P: AsRef<Path>>(path: P) -> Result<Catalog> {
    let file = std::fs::File::open(path.as_ref())?;
    read_csv(file)
}

/// Read a catalog from any CSV reader.
///
/// Rows that fail to decode are skipped with a warning; an I/O failure
/// aborts the read.
pub fn read_csv<R: Read>(reader: R) -> Result<Catalog> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::None)
        .from_reader(reader);

    let mut records = BTreeMap::new();
    let mut skipped = 0usize;

    for (line, row) in reader.deserialize::<SourceRow>().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => return Err(e.into()),
            Err(e) => {
                warn!("Skipping unreadable catalog row {}: {}", line + 1, e);
                skipped += 1;
                continue;
            }
        };
        match row.into_entry() {
            Some((name, record)) => {
                records.insert(name, record);
            }
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!("Skipped {} catalog rows without a usable drug name", skipped);
    }

    Ok(Catalog::from_normalized(records))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "drug_name,generic_name,drug_classes,activity,rx_otc,pregnancy_category,side_effects,related_drugs\n";

    #[test]
    fn test_read_rows() {
        let data = format!(
            "{HEADER}\" Metformin \",metformin,\"Antidiabetic agents\",87%,Rx,B,\"Nausea. Diarrhea.\",glipizide: https://example.org/glipizide\n\
             Aspirin,aspirin, Salicylates ,91%,OTC,D,Heartburn,\n"
        );
        let catalog = read_csv(data.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 2);

        let metformin = catalog.get("metformin").unwrap();
        assert_eq!(metformin.drug_classes, "Antidiabetic agents");
        assert_eq!(metformin.side_effects, "Nausea. Diarrhea.");

        let aspirin = catalog.get("aspirin").unwrap();
        assert_eq!(aspirin.drug_classes, "Salicylates");
        assert_eq!(aspirin.related_drugs, "");
    }

    #[test]
    fn test_blank_names_skipped() {
        let data = format!("{HEADER}  ,x,,,,,,\nLipitor,atorvastatin,,,,,,\n");
        let catalog = read_csv(data.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.contains("lipitor"));
    }

    #[test]
    fn test_missing_columns_default_to_empty() {
        let data = "drug_name,side_effects\nZoloft,Insomnia\n";
        let catalog = read_csv(data.as_bytes()).unwrap();
        let zoloft = catalog.get("zoloft").unwrap();
        assert_eq!(zoloft.side_effects, "Insomnia");
        assert_eq!(zoloft.generic_name, "");
        assert_eq!(zoloft.pregnancy_category, "");
    }

    #[test]
    fn test_short_rows_accepted() {
        let data = format!("{HEADER}Tylenol,acetaminophen\n");
        let catalog = read_csv(data.as_bytes()).unwrap();
        assert_eq!(catalog.get("tylenol").unwrap().generic_name, "acetaminophen");
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_csv_path(dir.path().join("absent.csv")).is_err());
    }
}
