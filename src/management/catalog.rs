use std::{io::ErrorKind, path::Path};

use crate::{
    reporter::Reporter,
    types::{CatalogRow, ShowRecord},
    utils,
};

/// Show metadata loaded from a CSV file with `show,bio,host,tags` columns.
///
/// Records keep the order of the source file. A later row with the same show
/// name replaces the earlier record in place.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    shows: Vec<ShowRecord>,
}

impl Catalog {
    /// Reads the catalog from `path`.
    ///
    /// A missing or unreadable file gives an empty catalog and a warning,
    /// never an error. Uploads still go ahead without enrichment.
    pub async fn load(path: &Path, reporter: &dyn Reporter) -> Self {
        let content = match async_fs::read(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                reporter.warning(&format!("Metadata file not found: {}", path.display()));
                return Self::default();
            }
            Err(e) => {
                reporter.warning(&format!(
                    "Cannot read metadata file {}: {}",
                    path.display(),
                    e
                ));
                return Self::default();
            }
        };

        let catalog = Self::from_csv(&content, reporter);
        reporter.info(&format!("Loaded metadata for {} shows", catalog.len()));
        catalog
    }

    /// Parses CSV content. Rows with a blank show name are skipped and rows
    /// that fail to parse are skipped with a warning.
    pub fn from_csv(content: &[u8], reporter: &dyn Reporter) -> Self {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(content);

        let mut catalog = Self::default();
        for (index, row) in reader.deserialize::<CatalogRow>().enumerate() {
            match row {
                Ok(row) => catalog.insert_row(row),
                Err(e) => reporter.warning(&format!(
                    "Skipping metadata row {}: {}",
                    index + 2,
                    e
                )),
            }
        }
        catalog
    }

    fn insert_row(&mut self, row: CatalogRow) {
        let name = row.show.trim();
        if name.is_empty() {
            return;
        }

        let record = ShowRecord {
            name: name.to_string(),
            bio: row.bio.trim().to_string(),
            host: row.host.trim().to_string(),
            tags: utils::split_trimmed(&row.tags, ';'),
        };

        match self.shows.iter_mut().find(|show| show.name == record.name) {
            Some(existing) => *existing = record,
            None => self.shows.push(record),
        }
    }

    pub fn len(&self) -> usize {
        self.shows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shows.is_empty()
    }

    pub fn shows(&self) -> &[ShowRecord] {
        &self.shows
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.shows.iter().map(|show| show.name.as_str())
    }

    /// Exact lookup ignoring case.
    pub fn get(&self, name: &str) -> Option<&ShowRecord> {
        let name = name.to_lowercase();
        self.shows
            .iter()
            .find(|show| show.name.to_lowercase() == name)
    }

    /// Fuzzy lookup of a free-text show name.
    pub fn resolve(&self, query: &str) -> Option<&ShowRecord> {
        let matched = utils::best_match(query, self.names())?;
        self.shows.iter().find(|show| show.name == matched)
    }
}
