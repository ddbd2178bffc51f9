use std::{collections::BTreeMap, sync::Arc};

use tabled::Table;

use crate::{
    error,
    management::Catalog,
    reporter::Reporter,
    types::{ShowRecord, ShowSummary, ShowTableRow},
    warning,
};

pub async fn shows(search: Option<String>, json: bool, reporter: Arc<dyn Reporter>) {
    let settings = super::upload_settings();
    let catalog = Catalog::load(&settings.metadata_file, reporter.as_ref()).await;

    let shows: Vec<&ShowRecord> = match &search {
        Some(query) => catalog.resolve(query).into_iter().collect(),
        None => catalog.shows().iter().collect(),
    };

    if shows.is_empty() {
        match search {
            Some(query) => warning!("No show matches '{}'", query),
            None => warning!("No shows in {}", settings.metadata_file.display()),
        }
        return;
    }

    if json {
        let summaries: BTreeMap<&str, ShowSummary> = shows
            .iter()
            .map(|show| {
                (
                    show.name.as_str(),
                    ShowSummary {
                        host: show.host.clone(),
                        tags: show.tags.clone(),
                    },
                )
            })
            .collect();

        match serde_json::to_string_pretty(&summaries) {
            Ok(out) => println!("{}", out),
            Err(e) => error!("Failed to serialize shows: {}", e),
        }
        return;
    }

    let rows: Vec<ShowTableRow> = shows
        .into_iter()
        .map(|show| ShowTableRow {
            name: show.name.clone(),
            host: show.host.clone(),
            tags: show.tags.join(", "),
        })
        .collect();

    println!("{}", Table::new(rows));
}
