use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::query::{DirectoryQuery, SortOrder, ViewMode};
use crate::profiles::{EntityKind, ProfileId, ProfileRecord};

/// Card shown in the grid or list view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectoryEntry {
    pub id: ProfileId,
    pub kind: EntityKind,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub sectors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incubator: Option<IncubatorRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub startup_count: Option<usize>,
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    search_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncubatorRef {
    pub id: ProfileId,
    pub name: String,
}

/// One page of directory results together with the canonical filter URL.
#[derive(Debug, Clone, Serialize)]
pub struct DirectoryPage {
    pub query: String,
    pub view: ViewMode,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
    pub entries: Vec<DirectoryEntry>,
}

impl DirectoryEntry {
    pub fn from_record(record: &ProfileRecord) -> Self {
        let summary = record
            .text("tagline")
            .or_else(|| record.text("headline"))
            .or_else(|| record.text("description"))
            .map(str::to_string);
        let search_text = [
            Some(record.display_name()),
            record.text("tagline"),
            record.text("headline"),
            record.text("description"),
            record.text("bio"),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join("\n")
        .to_lowercase();

        Self {
            id: record.id.clone(),
            kind: record.kind,
            name: record.display_name().to_string(),
            summary,
            location: record.text("location").map(str::to_string),
            sectors: record.list("sectors").to_vec(),
            stage: record.text("stage").map(str::to_string),
            logo_url: record
                .text("logo_url")
                .or_else(|| record.text("avatar_url"))
                .map(str::to_string),
            website: record.text("website").map(str::to_string),
            rating: record.review.rating,
            incubator: None,
            startup_count: None,
            created_at: record.created_at,
            search_text,
        }
    }

    fn matches(&self, query: &DirectoryQuery) -> bool {
        let search = query
            .search
            .as_deref()
            .map(|term| term.trim().to_lowercase())
            .filter(|term| !term.is_empty());
        if let Some(term) = search {
            if !self.search_text.contains(&term) {
                return false;
            }
        }

        if !query.sectors.is_empty()
            && !self
                .sectors
                .iter()
                .any(|sector| query.sectors.iter().any(|wanted| wanted == sector))
        {
            return false;
        }

        if let Some(stage) = &query.stage {
            if !self
                .stage
                .as_deref()
                .is_some_and(|value| value.eq_ignore_ascii_case(stage))
            {
                return false;
            }
        }

        if let Some(location) = &query.location {
            if !self
                .location
                .as_deref()
                .is_some_and(|value| value.eq_ignore_ascii_case(location))
            {
                return false;
            }
        }

        if let Some(incubator) = &query.incubator {
            let linked = match self.kind {
                EntityKind::Incubator => Some(&self.id),
                _ => self.incubator.as_ref().map(|reference| &reference.id),
            };
            if !linked.is_some_and(|id| &id.0 == incubator) {
                return false;
            }
        }

        true
    }
}

/// Approved startups, annotated with the approved incubator they belong to.
pub fn startup_page(
    startups: &[ProfileRecord],
    incubators: &[ProfileRecord],
    query: &DirectoryQuery,
    default_per_page: usize,
) -> DirectoryPage {
    paginate(startup_entries(startups, incubators, query), query, default_per_page)
}

/// Every startup matching `query`, sorted but not paginated.
pub fn startup_entries(
    startups: &[ProfileRecord],
    incubators: &[ProfileRecord],
    query: &DirectoryQuery,
) -> Vec<DirectoryEntry> {
    let incubator_names: HashMap<&ProfileId, &str> = incubators
        .iter()
        .filter(|record| record.is_public() && record.kind == EntityKind::Incubator)
        .map(|record| (&record.id, record.display_name()))
        .collect();

    let entries = startups
        .iter()
        .filter(|record| record.is_public() && record.kind == EntityKind::Startup)
        .map(|record| {
            let mut entry = DirectoryEntry::from_record(record);
            entry.incubator = record.incubator_id().and_then(|id| {
                incubator_names.get(&id).map(|name| IncubatorRef {
                    name: name.to_string(),
                    id,
                })
            });
            entry
        })
        .collect();

    select(entries, query)
}

/// Approved incubators with the number of approved startups that reference each one.
pub fn incubator_page(
    incubators: &[ProfileRecord],
    startups: &[ProfileRecord],
    query: &DirectoryQuery,
    default_per_page: usize,
) -> DirectoryPage {
    paginate(incubator_entries(incubators, startups, query), query, default_per_page)
}

pub fn incubator_entries(
    incubators: &[ProfileRecord],
    startups: &[ProfileRecord],
    query: &DirectoryQuery,
) -> Vec<DirectoryEntry> {
    let mut counts: HashMap<ProfileId, usize> = HashMap::new();
    for startup in startups
        .iter()
        .filter(|record| record.is_public() && record.kind == EntityKind::Startup)
    {
        if let Some(id) = startup.incubator_id() {
            *counts.entry(id).or_default() += 1;
        }
    }

    let entries = incubators
        .iter()
        .filter(|record| record.is_public() && record.kind == EntityKind::Incubator)
        .map(|record| {
            let mut entry = DirectoryEntry::from_record(record);
            entry.startup_count = Some(counts.get(&record.id).copied().unwrap_or_default());
            entry
        })
        .collect();

    select(entries, query)
}

fn select(entries: Vec<DirectoryEntry>, query: &DirectoryQuery) -> Vec<DirectoryEntry> {
    let mut entries: Vec<DirectoryEntry> = entries
        .into_iter()
        .filter(|entry| entry.matches(query))
        .collect();
    entries.sort_by(|left, right| compare(left, right, query.sort));
    entries
}

fn paginate(
    entries: Vec<DirectoryEntry>,
    query: &DirectoryQuery,
    default_per_page: usize,
) -> DirectoryPage {
    let total = entries.len();
    let per_page = query.per_page(default_per_page);
    let page = query.page();
    let total_pages = total.div_ceil(per_page);
    let entries = entries
        .into_iter()
        .skip((page - 1).saturating_mul(per_page))
        .take(per_page)
        .collect();

    DirectoryPage {
        query: query.to_query_string(),
        view: query.view,
        total,
        page,
        per_page,
        total_pages,
        entries,
    }
}

fn by_name(left: &DirectoryEntry, right: &DirectoryEntry) -> Ordering {
    left.name
        .to_lowercase()
        .cmp(&right.name.to_lowercase())
        .then_with(|| left.id.cmp(&right.id))
}

fn compare(left: &DirectoryEntry, right: &DirectoryEntry, sort: SortOrder) -> Ordering {
    match sort {
        SortOrder::Newest => right
            .created_at
            .cmp(&left.created_at)
            .then_with(|| right.id.cmp(&left.id)),
        SortOrder::Oldest => left
            .created_at
            .cmp(&right.created_at)
            .then_with(|| left.id.cmp(&right.id)),
        SortOrder::NameAsc => by_name(left, right),
        SortOrder::NameDesc => by_name(right, left),
        SortOrder::MostStartups => right
            .startup_count
            .unwrap_or_default()
            .cmp(&left.startup_count.unwrap_or_default())
            .then_with(|| by_name(left, right)),
    }
}
