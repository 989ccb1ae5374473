use anstream::println;
use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use appcv_client::VersionRecord;

/// Published or installed versions, annotated with local state.
#[derive(Debug, Serialize)]
pub struct VersionListing {
    pub latest: Option<String>,
    pub active: Option<String>,
    pub versions: Vec<VersionEntry>,
}

#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(PartialEq))]
pub struct VersionEntry {
    #[serde(flatten)]
    pub record: VersionRecord,
    pub installed: bool,
    pub active: bool,
}

impl VersionListing {
    pub fn new(
        records: Vec<VersionRecord>,
        installed: &[String],
        latest: Option<String>,
        active: Option<String>,
    ) -> Self {
        let versions = records
            .into_iter()
            .map(|record| VersionEntry {
                installed: installed.contains(&record.version),
                active: active.as_ref() == Some(&record.version),
                record,
            })
            .collect();

        Self {
            latest,
            active,
            versions,
        }
    }

    /// A listing built only from what is installed, newest first.
    pub fn offline(installed: &[String], active: Option<String>) -> Self {
        let records = installed.iter().map(VersionRecord::new).collect();
        Self::new(records, installed, installed.first().cloned(), active)
    }
}

/// Serializes the listing, indented with tabs.
pub fn to_json(listing: &VersionListing) -> Result<String, serde_json::Error> {
    let mut json = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut json, PrettyFormatter::with_indent(b"\t"));
    listing.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&json).into_owned())
}

pub fn print_versions(listing: &VersionListing) {
    let width = listing
        .versions
        .iter()
        .map(|entry| entry.record.version.len())
        .max()
        .unwrap_or(0);

    for entry in &listing.versions {
        let version = &entry.record.version;
        let marker = if entry.active { "*" } else { " " };

        let mut suffix = String::new();
        if let Some(date) = &entry.record.date {
            suffix.push_str(&format!("  {}", date.dimmed()));
        }
        if entry.installed {
            suffix.push_str(&format!("  {}", "[installed]".green()));
        }
        if listing.latest.as_ref() == Some(version) {
            suffix.push_str(&format!("  {}", "(latest)".cyan()));
        }

        if suffix.is_empty() {
            println!("{marker} {version}");
        } else {
            println!("{marker} {version:width$}{suffix}");
        }
    }
}
