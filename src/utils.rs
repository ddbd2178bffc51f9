use difflib::sequencematcher::SequenceMatcher;

use crate::types::DateParts;

/// Minimum similarity ratio for a fuzzy match to count.
pub const MATCH_CUTOFF: f64 = 0.6;

/// Mixcloud accepts at most five tags per cloudcast.
pub const MAX_TAGS: usize = 5;

pub const DEFAULT_DESCRIPTION: &str = "Uploaded via Mixcloud Uploader";

/// Returns the candidate that best matches `query`, compared case-insensitively.
///
/// Scores are Ratcliff/Obershelp ratios (`2 * matches / total length`) of
/// the lower-cased strings, which rate a shortened title such as
/// "Late Night" close to "Late Night Sessions". Only candidates scoring at
/// least [`MATCH_CUTOFF`] qualify. On a tie the earliest candidate in
/// iteration order wins, so two candidates that differ only by case resolve
/// to the first one seen. The returned string keeps the candidate's
/// original casing.
pub fn best_match<'a, I>(query: &str, candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let query: Vec<char> = query.to_lowercase().chars().collect();
    let mut best: Option<(&'a str, f64)> = None;

    for candidate in candidates {
        let score = similarity(&query, candidate);
        if score < MATCH_CUTOFF {
            continue;
        }
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((candidate, score));
        }
    }

    best.map(|(candidate, _)| candidate)
}

fn similarity(query: &[char], candidate: &str) -> f64 {
    let candidate: Vec<char> = candidate.to_lowercase().chars().collect();
    if query.is_empty() && candidate.is_empty() {
        return 1.0;
    }

    let mut matcher = SequenceMatcher::new(&candidate[..], query);
    f64::from(matcher.ratio())
}

/// Splits a comma-separated tag string, trimming entries and dropping empty ones.
pub fn parse_tag_list(tags: &str) -> Vec<String> {
    split_trimmed(tags, ',')
}

/// Splits on `separator`, trimming each segment and dropping empty ones.
pub fn split_trimmed(value: &str, separator: char) -> Vec<String> {
    value
        .split(separator)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Chooses the outbound tags: explicit tags when any were given, otherwise
/// the catalog's. The result never holds more than [`MAX_TAGS`] entries.
pub fn merge_tags(explicit: Option<&[String]>, catalog: &[String]) -> Vec<String> {
    let source = match explicit {
        Some(tags) if !tags.is_empty() => tags,
        _ => catalog,
    };
    source.iter().take(MAX_TAGS).cloned().collect()
}

/// Returns the explicit value unless it is absent or blank.
pub fn merge_field(explicit: Option<&str>, catalog: &str) -> String {
    match explicit.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => catalog.to_string(),
    }
}

/// Builds `YYYY-MM-DD` from the caller's components, zero-padding day and
/// month to two characters. Yields `None` unless all three are non-empty.
pub fn build_date_string(parts: &DateParts) -> Option<String> {
    let day = parts.day.trim();
    let month = parts.month.trim();
    let year = parts.year.trim();

    if day.is_empty() || month.is_empty() || year.is_empty() {
        return None;
    }

    Some(format!("{year}-{month:0>2}-{day:0>2}"))
}

/// Lower-cases the show name and replaces spaces with hyphens.
pub fn show_slug(show_name: &str) -> String {
    show_name.to_lowercase().replace(' ', "-")
}

/// Joins the bio and the tracklist line with a blank line.
///
/// The tracklist line is only added when a date string is present. When
/// neither part exists, [`DEFAULT_DESCRIPTION`] is used.
pub fn build_description(
    bio: &str,
    show_name: &str,
    date: Option<&str>,
    tracklist_base_url: &str,
) -> String {
    let mut parts = Vec::new();

    let bio = bio.trim();
    if !bio.is_empty() {
        parts.push(bio.to_string());
    }

    if let Some(date) = date.filter(|d| !d.is_empty()) {
        parts.push(format!(
            "Tracklist: {}/{}/{}",
            tracklist_base_url.trim_end_matches('/'),
            show_slug(show_name),
            date
        ));
    }

    if parts.is_empty() {
        return DEFAULT_DESCRIPTION.to_string();
    }

    parts.join("\n\n")
}

/// Formats the cloudcast name as `"{show} {date} w/ {host}"`.
///
/// Missing segments are interpolated as empty strings.
pub fn display_title(show_name: &str, date: Option<&str>, host: &str) -> String {
    format!("{} {} w/ {}", show_name, date.unwrap_or_default(), host)
}
