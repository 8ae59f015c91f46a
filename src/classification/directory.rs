//! Country name → category lookup
//!
//! The category table is a CSV snapshot of the published country risk
//! classification (`country,category`). The page marks high-income OECD
//! countries with `./.`, which is read as category 0.

use super::CountryCategory;
use crate::error::PremiumError;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Default path to the country category table
pub const DEFAULT_CATEGORIES_PATH: &str = "data/country_categories.csv";

/// Default path to the country information sections
pub const DEFAULT_INFO_PATH: &str = "data/country_info.json";

/// Marker used in the published table for category 0
const NOT_CLASSIFIED_MARKER: &str = "./.";

/// Free-text country information, keyed by section title
pub type CountryInfo = BTreeMap<String, String>;

/// A resolved country
#[derive(Debug, Clone, Serialize)]
pub struct CountryEntry {
    pub name: String,
    pub category: CountryCategory,
}

/// Read-only country directory passed to whoever needs to resolve names
#[derive(Debug, Clone, Default)]
pub struct CountryDirectory {
    /// Keyed by normalized (lowercase, trimmed) name
    entries: HashMap<String, CountryEntry>,
    info: HashMap<String, CountryInfo>,
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

fn parse_category(raw: &str) -> Result<CountryCategory, String> {
    let raw = raw.trim();
    if raw == NOT_CLASSIFIED_MARKER {
        return CountryCategory::new(0).map_err(|e| e.to_string());
    }
    let value: i64 = raw
        .parse()
        .map_err(|_| format!("category '{}' is not a number", raw))?;
    CountryCategory::new(value).map_err(|e| e.to_string())
}

/// Load `country,category` rows from any reader
pub fn load_categories_from_reader<R: Read>(reader: R) -> Result<Vec<CountryEntry>, String> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut entries = Vec::new();

    for result in csv_reader.records() {
        let record = result.map_err(|e| e.to_string())?;
        let name = record.get(0).unwrap_or_default().trim();
        if name.is_empty() {
            continue;
        }
        let raw_category = record
            .get(1)
            .ok_or_else(|| format!("row for '{}' has no category column", name))?;
        let category = parse_category(raw_category).map_err(|e| format!("{}: {}", name, e))?;
        entries.push(CountryEntry {
            name: name.to_string(),
            category,
        });
    }

    Ok(entries)
}

/// Load country information sections from a JSON reader
pub fn load_info_from_reader<R: Read>(reader: R) -> Result<HashMap<String, CountryInfo>, String> {
    let raw: HashMap<String, CountryInfo> =
        serde_json::from_reader(reader).map_err(|e| e.to_string())?;
    Ok(raw.into_iter().map(|(name, info)| (normalize(&name), info)).collect())
}

impl CountryDirectory {
    /// Build from already parsed entries
    pub fn from_entries(entries: Vec<CountryEntry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|entry| (normalize(&entry.name), entry))
            .collect();
        Self {
            entries,
            info: HashMap::new(),
        }
    }

    /// Load the category table; the information file is optional
    pub fn load(categories_path: &Path, info_path: Option<&Path>) -> Result<Self, PremiumError> {
        let load_err = |path: &Path, message: String| PremiumError::Load {
            path: path.display().to_string(),
            message,
        };

        let file = File::open(categories_path).map_err(|e| load_err(categories_path, e.to_string()))?;
        let entries =
            load_categories_from_reader(file).map_err(|e| load_err(categories_path, e))?;
        let mut directory = Self::from_entries(entries);
        log::info!(
            "Loaded {} country categories from {}",
            directory.len(),
            categories_path.display()
        );

        if let Some(path) = info_path {
            if path.exists() {
                let file = File::open(path).map_err(|e| load_err(path, e.to_string()))?;
                directory.info = load_info_from_reader(file).map_err(|e| load_err(path, e))?;
                log::info!("Loaded country information for {} countries", directory.info.len());
            } else {
                log::debug!("No country information file at {}", path.display());
            }
        }

        Ok(directory)
    }

    /// Load from the default `data/` locations
    pub fn load_default() -> Result<Self, PremiumError> {
        Self::load(Path::new(DEFAULT_CATEGORIES_PATH), Some(Path::new(DEFAULT_INFO_PATH)))
    }

    /// Attach information sections (replaces any loaded ones)
    pub fn with_info(mut self, info: HashMap<String, CountryInfo>) -> Self {
        self.info = info.into_iter().map(|(name, sections)| (normalize(&name), sections)).collect();
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a country, case-insensitively
    pub fn find(&self, name: &str) -> Option<&CountryEntry> {
        self.entries.get(&normalize(name))
    }

    /// Resolve a country name to its category or fail
    pub fn category(&self, name: &str) -> Result<CountryCategory, PremiumError> {
        self.find(name)
            .map(|entry| entry.category)
            .ok_or_else(|| PremiumError::CountryNotFound(name.trim().to_string()))
    }

    /// Information sections for a country, if any were loaded
    pub fn info(&self, name: &str) -> Option<&CountryInfo> {
        self.info.get(&normalize(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "country,category\nArgentina,7\nGermany,./.\nChina,2\n  India , 3 \n";

    fn sample_directory() -> CountryDirectory {
        CountryDirectory::from_entries(load_categories_from_reader(SAMPLE.as_bytes()).unwrap())
    }

    #[test]
    fn test_load_categories() {
        let entries = load_categories_from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].name, "Argentina");
        assert_eq!(entries[0].category.value(), 7);
        assert_eq!(entries[3].name, "India");
    }

    #[test]
    fn test_not_classified_marker_is_category_zero() {
        let directory = sample_directory();
        assert_eq!(directory.category("Germany").unwrap().value(), 0);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let directory = sample_directory();
        assert_eq!(directory.category("argentina").unwrap().value(), 7);
        assert_eq!(directory.category(" INDIA ").unwrap().value(), 3);
    }

    #[test]
    fn test_unknown_country() {
        let directory = sample_directory();
        let err = directory.category("Atlantis").unwrap_err();
        assert!(matches!(err, PremiumError::CountryNotFound(ref n) if n == "Atlantis"));
    }

    #[test]
    fn test_bad_category_rejected() {
        let bad = "country,category\nNowhere,9\n";
        assert!(load_categories_from_reader(bad.as_bytes()).is_err());

        let garbage = "country,category\nNowhere,high\n";
        assert!(load_categories_from_reader(garbage.as_bytes()).is_err());
    }

    #[test]
    fn test_info_sections() {
        let json = r#"{"China": {"Cover policy": "Open without restrictions."}}"#;
        let info = load_info_from_reader(json.as_bytes()).unwrap();
        let directory = sample_directory().with_info(info);

        let sections = directory.info("china").unwrap();
        assert_eq!(sections["Cover policy"], "Open without restrictions.");
        assert!(directory.info("Argentina").is_none());
    }

    #[test]
    fn test_load_default_data_files() {
        let directory = CountryDirectory::load_default().expect("Failed to load country data");
        assert!(directory.len() > 20);
        assert_eq!(directory.category("Argentina").unwrap().value(), 7);
        assert_eq!(directory.category("Germany").unwrap().value(), 0);
    }
}
