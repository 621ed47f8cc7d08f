//! Directory filter state and its query-string form.
//!
//! The browse page keeps its filters in the URL so a reload (or a shared link) restores the
//! same view. `to_query_string` omits defaults so the canonical URL stays short.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

pub const MAX_PER_PAGE: usize = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    NameAsc,
    NameDesc,
    MostStartups,
}

impl SortOrder {
    pub const fn label(self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
            SortOrder::NameAsc => "name_asc",
            SortOrder::NameDesc => "name_desc",
            SortOrder::MostStartups => "most_startups",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "newest" => Some(Self::Newest),
            "oldest" => Some(Self::Oldest),
            "name_asc" => Some(Self::NameAsc),
            "name_desc" => Some(Self::NameDesc),
            "most_startups" => Some(Self::MostStartups),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    pub const fn label(self) -> &'static str {
        match self {
            ViewMode::Grid => "grid",
            ViewMode::List => "list",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryQuery {
    pub search: Option<String>,
    pub sectors: Vec<String>,
    pub stage: Option<String>,
    pub location: Option<String>,
    pub incubator: Option<String>,
    pub sort: SortOrder,
    pub view: ViewMode,
    pub page: usize,
    /// `None` falls back to the configured page size.
    pub per_page: Option<usize>,
}

impl Default for DirectoryQuery {
    fn default() -> Self {
        Self {
            search: None,
            sectors: Vec::new(),
            stage: None,
            location: None,
            incubator: None,
            sort: SortOrder::default(),
            view: ViewMode::default(),
            page: 1,
            per_page: None,
        }
    }
}

impl DirectoryQuery {
    /// Parse a raw query string, ignoring unknown keys and unparseable values.
    pub fn from_query_string(raw: &str) -> Self {
        let mut query = Self::default();

        for pair in raw.trim_start_matches('?').split('&') {
            if pair.is_empty() {
                continue;
            }
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let value = decode(value);
            let value = value.trim();

            match key {
                "q" | "search" => query.search = non_empty(value),
                "sectors" | "sector" => {
                    for sector in value.split(',').map(str::trim) {
                        let sector = sector.to_ascii_lowercase();
                        if !sector.is_empty() && !query.sectors.contains(&sector) {
                            query.sectors.push(sector);
                        }
                    }
                }
                "stage" => query.stage = non_empty(value).map(|stage| stage.to_ascii_lowercase()),
                "location" => query.location = non_empty(value),
                "incubator" => query.incubator = non_empty(value),
                "sort" => {
                    if let Some(sort) = SortOrder::parse(value) {
                        query.sort = sort;
                    }
                }
                "view" => match value {
                    "grid" => query.view = ViewMode::Grid,
                    "list" => query.view = ViewMode::List,
                    _ => {}
                },
                "page" => {
                    if let Ok(page) = value.parse::<usize>() {
                        query.page = page.max(1);
                    }
                }
                "per_page" => {
                    if let Ok(per_page) = value.parse::<usize>() {
                        query.per_page = Some(per_page.clamp(1, MAX_PER_PAGE));
                    }
                }
                _ => {}
            }
        }

        query
    }

    /// Canonical query string for the current filters; defaults are left out.
    pub fn to_query_string(&self) -> String {
        let mut pairs: Vec<(&str, Cow<'_, str>)> = Vec::new();
        if let Some(search) = &self.search {
            pairs.push(("q", Cow::Borrowed(search)));
        }
        if !self.sectors.is_empty() {
            pairs.push(("sectors", Cow::Owned(self.sectors.join(","))));
        }
        if let Some(stage) = &self.stage {
            pairs.push(("stage", Cow::Borrowed(stage)));
        }
        if let Some(location) = &self.location {
            pairs.push(("location", Cow::Borrowed(location)));
        }
        if let Some(incubator) = &self.incubator {
            pairs.push(("incubator", Cow::Borrowed(incubator)));
        }
        if self.sort != SortOrder::default() {
            pairs.push(("sort", Cow::Borrowed(self.sort.label())));
        }
        if self.view != ViewMode::default() {
            pairs.push(("view", Cow::Borrowed(self.view.label())));
        }
        if self.page > 1 {
            pairs.push(("page", Cow::Owned(self.page.to_string())));
        }
        if let Some(per_page) = self.per_page {
            pairs.push(("per_page", Cow::Owned(per_page.to_string())));
        }

        pairs
            .into_iter()
            .map(|(key, value)| format!("{key}={}", urlencoding::encode(&value)))
            .collect::<Vec<_>>()
            .join("&")
    }

    pub fn page(&self) -> usize {
        self.page.max(1)
    }

    pub fn per_page(&self, default: usize) -> usize {
        self.per_page.unwrap_or(default).clamp(1, MAX_PER_PAGE)
    }
}

fn decode(value: &str) -> String {
    let spaced = value.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(Cow::into_owned)
        .unwrap_or(spaced)
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_gives_defaults() {
        let query = DirectoryQuery::from_query_string("");
        assert_eq!(query.page, 1);
        assert_eq!(query.sort, SortOrder::Newest);
        assert_eq!(query.view, ViewMode::Grid);
        assert_eq!(query.to_query_string(), "");
        assert_eq!(query, DirectoryQuery::default());
    }

    #[test]
    fn default_query_survives_the_url() {
        let query = DirectoryQuery::default();
        assert_eq!(query.page, 1);
        assert_eq!(DirectoryQuery::from_query_string(&query.to_query_string()), query);
    }

    #[test]
    fn huge_page_numbers_are_kept_verbatim() {
        let query = DirectoryQuery::from_query_string(&format!("page={}", usize::MAX));
        assert_eq!(query.page, usize::MAX);
    }

    #[test]
    fn filters_round_trip_through_url() {
        let query = DirectoryQuery {
            search: Some("cold chain & storage".to_string()),
            sectors: vec!["agritech".to_string(), "logistics".to_string()],
            stage: Some("mvp".to_string()),
            location: Some("Pune".to_string()),
            incubator: None,
            sort: SortOrder::NameAsc,
            view: ViewMode::List,
            page: 2,
            per_page: Some(24),
        };

        let raw = query.to_query_string();
        assert!(raw.contains("q=cold%20chain%20%26%20storage"));
        assert!(raw.contains("sectors=agritech%2Clogistics"));
        assert_eq!(DirectoryQuery::from_query_string(&raw), query);
    }

    #[test]
    fn parsing_is_lenient() {
        let query = DirectoryQuery::from_query_string(
            "?sector=FinTech&sector=saas,fintech&sort=bogus&view=list&page=0&per_page=500&utm=x",
        );
        assert_eq!(query.sectors, vec!["fintech".to_string(), "saas".to_string()]);
        assert_eq!(query.sort, SortOrder::Newest);
        assert_eq!(query.view, ViewMode::List);
        assert_eq!(query.page, 1);
        assert_eq!(query.per_page, Some(MAX_PER_PAGE));
    }

    #[test]
    fn plus_signs_decode_as_spaces() {
        let query = DirectoryQuery::from_query_string("q=solar+cold+rooms");
        assert_eq!(query.search.as_deref(), Some("solar cold rooms"));
    }
}
