use std::sync::Arc;

use inwork_poverty::data::cache::{CacheKey, LoadCache, SourceId};
use inwork_poverty::data::clean::{self, TableProfile};
use inwork_poverty::data::filter::Selection;
use inwork_poverty::data::loader::{DataSource, Loader};
use inwork_poverty::data::model::Dataset;
use inwork_poverty::error::DataResult;

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Tabs
// ---------------------------------------------------------------------------

/// One tab per question the dashboard answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Indicators,
    Evolution,
    EuropeanAverage,
    Countries,
    Gender,
    Age,
    Crises,
    Regions,
    Map,
    Conclusion,
}

impl Tab {
    pub const ALL: [Tab; 10] = [
        Tab::Indicators,
        Tab::Evolution,
        Tab::EuropeanAverage,
        Tab::Countries,
        Tab::Gender,
        Tab::Age,
        Tab::Crises,
        Tab::Regions,
        Tab::Map,
        Tab::Conclusion,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Indicators => "What are the main indicators?",
            Tab::Evolution => "How has in-work poverty evolved over time?",
            Tab::EuropeanAverage => "How does this compare to the European average?",
            Tab::Countries => "Which countries are most and least affected?",
            Tab::Gender => "Are there gender differences in in-work poverty?",
            Tab::Age => "Which age groups are most at risk?",
            Tab::Crises => "Did economic crises worsen in-work poverty?",
            Tab::Regions => "Is there a North–South or East–West divide?",
            Tab::Map => "Where in Europe is in-work poverty highest?",
            Tab::Conclusion => "What can we learn from this?",
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    loader: Loader,
    cache: LoadCache,

    /// What to load: an explicit location or automatic resolution.
    pub source: SourceId,

    /// Bumped by "Reload" to bypass the load cache.
    pub cache_version: u32,

    /// Where the current dataset was read from.
    pub loaded_from: Option<DataSource>,

    /// Canonical table, shared read-only with every view.
    pub dataset: Option<Arc<Dataset>>,

    /// Basic information about the raw table.
    pub profile: Option<TableProfile>,

    /// Current control values (None until a non-empty dataset is loaded).
    pub selection: Option<Selection>,

    /// Colour per country for the line charts.
    pub colors: ColorMap,

    pub active_tab: Tab,

    /// Fatal error shown in place of the views.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(loader: Loader, explicit: Option<&str>) -> Self {
        Self {
            loader,
            cache: LoadCache::new(),
            source: SourceId::from_explicit(explicit),
            cache_version: 1,
            loaded_from: None,
            dataset: None,
            profile: None,
            selection: None,
            colors: ColorMap::default(),
            active_tab: Tab::Indicators,
            status_message: None,
        }
    }

    fn cache_key(&self) -> CacheKey {
        CacheKey::new(self.source.clone(), self.cache_version)
    }

    fn build(&mut self) -> DataResult<(DataSource, TableProfile, Dataset)> {
        let key = self.cache_key();
        let loaded = self.cache.load(&self.loader, &key)?;
        let profile = clean::profile(&loaded.table)?;
        let dataset = clean::clean(&loaded.table)?;
        Ok((loaded.source.clone(), profile, dataset))
    }

    /// Load (through the cache) and clean the current source. On failure
    /// nothing of the previous dataset is kept on screen.
    pub fn reload(&mut self) {
        match self.build() {
            Ok((source, profile, dataset)) => {
                log::info!(
                    "{} observations for {} countries from {source}",
                    dataset.len(),
                    dataset.countries.len()
                );
                self.loaded_from = Some(source);
                self.profile = Some(profile);
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load dataset: {e}");
                self.loaded_from = None;
                self.profile = None;
                self.dataset = None;
                self.selection = None;
                self.status_message = Some(e.to_string());
            }
        }
    }

    /// Ingest a newly cleaned dataset and keep the selection valid.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.colors = ColorMap::new(&dataset.countries);
        self.selection = match self.selection.take() {
            Some(sel) => sel.reconcile(&dataset),
            None => Selection::initial(&dataset),
        };
        self.status_message = if dataset.is_empty() {
            Some("No country has enough years of data to be shown.".to_string())
        } else {
            None
        };
        self.dataset = Some(Arc::new(dataset));
    }

    /// Switch to an explicit file or URL.
    pub fn open_source(&mut self, location: &str) {
        self.source = SourceId::from_explicit(Some(location));
        self.reload();
    }

    /// Force a fresh read of the current source.
    pub fn bump_version(&mut self) {
        self.cache_version += 1;
        self.reload();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use inwork_poverty::config::Config;

    fn csv(rows: &[(&str, i32)]) -> String {
        let mut text = String::from("geo,sex,age,TIME_PERIOD,OBS_VALUE\n");
        for (geo, year) in rows {
            text.push_str(&format!("{geo},T,TOTAL,{year},5.0\n"));
        }
        text
    }

    fn state_for(path: &std::path::Path) -> AppState {
        let loader = Loader::with_search_dirs(Config::default(), vec![]);
        AppState::new(loader, path.to_str())
    }

    #[test]
    fn reload_builds_dataset_and_selection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("iw.csv");
        let rows: Vec<(&str, i32)> = (2015..2020).map(|y| ("SE", y)).collect();
        std::fs::write(&path, csv(&rows)).unwrap();

        let mut state = state_for(&path);
        state.reload();
        assert!(state.status_message.is_none());
        let ds = state.dataset.as_ref().unwrap();
        assert_eq!(ds.len(), 5);
        assert_eq!(state.selection.as_ref().unwrap().country, "Sweden");
        assert_eq!(state.selection.as_ref().unwrap().year, 2019);
        assert_eq!(state.profile.as_ref().unwrap().rows, 5);
    }

    #[test]
    fn cached_until_version_bump() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("iw.csv");
        let rows: Vec<(&str, i32)> = (2015..2020).map(|y| ("SE", y)).collect();
        std::fs::write(&path, csv(&rows)).unwrap();

        let mut state = state_for(&path);
        state.reload();

        let mut more = rows.clone();
        more.extend((2015..2020).map(|y| ("NO", y)));
        std::fs::write(&path, csv(&more)).unwrap();

        state.reload();
        assert_eq!(state.dataset.as_ref().unwrap().countries.len(), 1);

        state.bump_version();
        assert_eq!(state.dataset.as_ref().unwrap().countries.len(), 2);
    }

    #[test]
    fn failure_clears_previous_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("iw.csv");
        let rows: Vec<(&str, i32)> = (2015..2020).map(|y| ("SE", y)).collect();
        std::fs::write(&path, csv(&rows)).unwrap();

        let mut state = state_for(&path);
        state.reload();
        assert!(state.dataset.is_some());

        state.open_source(dir.path().join("missing.csv").to_str().unwrap());
        assert!(state.dataset.is_none());
        assert!(state.selection.is_none());
        assert!(state.status_message.is_some());
    }
}
