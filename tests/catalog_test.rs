mod common;

use cloudcast::{management::Catalog, reporter::Level};
use common::{CATALOG_CSV, MemoryReporter, write_file};

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[test]
fn test_parses_rows_and_splits_tags() {
    let reporter = MemoryReporter::default();
    let catalog = Catalog::from_csv(CATALOG_CSV.as_bytes(), &reporter);

    assert_eq!(catalog.len(), 2);

    let late = catalog.get("Late Night Sessions").unwrap();
    assert_eq!(late.bio, "Deep cuts.");
    assert_eq!(late.host, "DJ X");
    assert_eq!(late.tags, strings(&["house", "deep"]));

    // no limit on tags at load time
    let morning = catalog.get("Morning Coffee").unwrap();
    assert_eq!(
        morning.tags,
        strings(&["ambient", "folk", "jazz", "soul", "funk", "disco"])
    );
}

#[test]
fn test_skips_rows_without_name() {
    let csv = "show,bio,host,tags\n   ,orphan bio,Nobody,x\n,,,\nReal Show,,Host,\n";
    let catalog = Catalog::from_csv(csv.as_bytes(), &MemoryReporter::default());

    assert_eq!(catalog.len(), 1);
    let names: Vec<&str> = catalog.names().collect();
    assert_eq!(names, vec!["Real Show"]);
    assert!(catalog.get("Real Show").unwrap().tags.is_empty());
}

#[test]
fn test_trims_fields_and_tolerates_missing_columns() {
    let csv = "show,host\n  Padded Show  ,  Someone  \nShort Row\n";
    let catalog = Catalog::from_csv(csv.as_bytes(), &MemoryReporter::default());

    let padded = catalog.get("Padded Show").unwrap();
    assert_eq!(padded.host, "Someone");
    assert_eq!(padded.bio, "");
    assert!(padded.tags.is_empty());

    let short = catalog.get("short row").unwrap();
    assert_eq!(short.host, "");
}

#[test]
fn test_later_duplicate_replaces_earlier_row() {
    let csv = "show,bio,host,tags\nDup,first,A,x\nOther,,B,\nDup,second,C,y\n";
    let catalog = Catalog::from_csv(csv.as_bytes(), &MemoryReporter::default());

    assert_eq!(catalog.len(), 2);
    let names: Vec<&str> = catalog.names().collect();
    assert_eq!(names, vec!["Dup", "Other"]);
    assert_eq!(catalog.get("Dup").unwrap().bio, "second");
}

#[test]
fn test_get_is_case_insensitive() {
    let catalog = Catalog::from_csv(CATALOG_CSV.as_bytes(), &MemoryReporter::default());
    assert!(catalog.get("late night sessions").is_some());
    assert!(catalog.get("LATE NIGHT SESSIONS").is_some());
    assert!(catalog.get("late night").is_none());
}

#[test]
fn test_resolving_exact_names_returns_records_unchanged() {
    let catalog = Catalog::from_csv(CATALOG_CSV.as_bytes(), &MemoryReporter::default());
    for show in catalog.shows() {
        assert_eq!(catalog.resolve(&show.name), Some(show));
    }
}

#[test]
fn test_resolve_fuzzy_and_miss() {
    let catalog = Catalog::from_csv(CATALOG_CSV.as_bytes(), &MemoryReporter::default());
    assert_eq!(
        catalog.resolve("late night session").map(|s| s.name.as_str()),
        Some("Late Night Sessions")
    );
    assert_eq!(
        catalog.resolve("Late Night").map(|s| s.name.as_str()),
        Some("Late Night Sessions")
    );
    assert!(catalog.resolve("Completely Different").is_none());
}

#[tokio::test]
async fn test_load_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shows.csv");
    write_file(&path, CATALOG_CSV.as_bytes());

    let reporter = MemoryReporter::default();
    let catalog = Catalog::load(&path, &reporter).await;

    assert_eq!(catalog.len(), 2);
    assert_eq!(
        reporter.messages(Level::Info),
        vec!["Loaded metadata for 2 shows".to_string()]
    );
}

#[tokio::test]
async fn test_missing_file_gives_empty_catalog_with_warning() {
    let dir = tempfile::tempdir().unwrap();
    let reporter = MemoryReporter::default();

    let catalog = Catalog::load(&dir.path().join("missing.csv"), &reporter).await;

    assert!(catalog.is_empty());
    assert!(catalog.resolve("Late Night Sessions").is_none());
    assert_eq!(reporter.messages(Level::Warning).len(), 1);
}
