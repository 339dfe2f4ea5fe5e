//! Read-only projections behind every chart, table and KPI.
//!
//! Each view is a pure function of the canonical observations and a
//! selection: filter, group, and take the arithmetic mean of `value`.
//! Nothing here mutates the table.

use std::collections::BTreeMap;

use super::filter::{Filter, Selection};
use super::model::{AgeGroup, Dataset, Observation, Region, Sex};

/// Rows shown by the preview table.
pub const PREVIEW_ROWS: usize = 10;

/// Arithmetic mean, `None` when there is nothing to average.
pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Mean `value` per key over the observations passing `filter`. Rows whose
/// key is `None` (e.g. a missing year) are left out.
pub fn mean_by<K, F>(observations: &[Observation], filter: &Filter, key: F) -> BTreeMap<K, f64>
where
    K: Ord,
    F: Fn(&Observation) -> Option<K>,
{
    let mut groups: BTreeMap<K, (f64, usize)> = BTreeMap::new();
    for obs in filter.apply(observations) {
        if let Some(k) = key(obs) {
            let entry = groups.entry(k).or_insert((0.0, 0));
            entry.0 += obs.value;
            entry.1 += 1;
        }
    }
    groups
        .into_iter()
        .map(|(k, (sum, n))| (k, sum / n as f64))
        .collect()
}

fn mean_of(observations: &[Observation], filter: &Filter) -> Option<f64> {
    mean(filter.apply(observations).map(|obs| obs.value))
}

fn by_year(observations: &[Observation], filter: &Filter) -> Vec<(i32, f64)> {
    mean_by(observations, filter, |obs| obs.year).into_iter().collect()
}

// ---------------------------------------------------------------------------
// Main indicators
// ---------------------------------------------------------------------------

/// KPIs for a single year: the European average over all countries, the
/// selected country, and the gap between the two.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Indicators {
    pub year: i32,
    pub european: Option<f64>,
    pub country: Option<f64>,
    pub difference: Option<f64>,
}

pub fn indicators(observations: &[Observation], sel: &Selection) -> Indicators {
    let europe = Filter::all()
        .sex(sel.sex)
        .age_group(sel.age_group)
        .year(sel.year);
    let european = mean_of(observations, &europe);
    let country = mean_of(observations, &sel.filter());
    Indicators {
        year: sel.year,
        european,
        country,
        difference: country.zip(european).map(|(c, e)| c - e),
    }
}

// ---------------------------------------------------------------------------
// Trends
// ---------------------------------------------------------------------------

/// Mean rate per year for one country.
pub fn trend(observations: &[Observation], country: &str, sex: Sex, age: AgeGroup) -> Vec<(i32, f64)> {
    let filter = Filter::all().country(country).sex(sex).age_group(age);
    by_year(observations, &filter)
}

/// Mean rate per year over every country in the table.
pub fn european_trend(observations: &[Observation], sex: Sex, age: AgeGroup) -> Vec<(i32, f64)> {
    by_year(observations, &Filter::all().sex(sex).age_group(age))
}

/// One trend per compared country, by name; countries with no data are absent.
pub fn compared_trends(observations: &[Observation], sel: &Selection) -> Vec<(String, Vec<(i32, f64)>)> {
    let filter = Filter::all()
        .countries(sel.compared.iter().cloned())
        .sex(sel.sex)
        .age_group(sel.age_group);
    let mut trends: BTreeMap<String, Vec<(i32, f64)>> = BTreeMap::new();
    for ((country, year), value) in mean_by(observations, &filter, |obs| {
        Some((obs.country_name.clone(), obs.year?))
    }) {
        trends.entry(country).or_default().push((year, value));
    }
    trends.into_iter().collect()
}

// ---------------------------------------------------------------------------
// Comparisons
// ---------------------------------------------------------------------------

/// Mean rate per country for one year, lowest first.
pub fn country_ranking(observations: &[Observation], year: i32, sex: Sex, age: AgeGroup) -> Vec<(String, f64)> {
    let filter = Filter::all().year(year).sex(sex).age_group(age);
    let mut ranking: Vec<(String, f64)> =
        mean_by(observations, &filter, |obs| Some(obs.country_name.clone()))
            .into_iter()
            .collect();
    ranking.sort_by(|a, b| a.1.total_cmp(&b.1));
    ranking
}

/// Men and women over time for one country.
pub fn gender_gap(observations: &[Observation], country: &str, age: AgeGroup) -> BTreeMap<Sex, Vec<(i32, f64)>> {
    let filter = Filter::all()
        .country(country)
        .age_group(age)
        .sexes([Sex::M, Sex::F]);
    let mut series: BTreeMap<Sex, Vec<(i32, f64)>> = BTreeMap::new();
    for ((year, sex), value) in mean_by(observations, &filter, |obs| Some((obs.year?, obs.sex))) {
        series.entry(sex).or_default().push((year, value));
    }
    series
}

/// Mean rate per age group for one country at the latest year of the whole
/// table. `None` when the table has no year at all.
pub fn age_breakdown(dataset: &Dataset, country: &str, sex: Sex) -> Option<(i32, Vec<(AgeGroup, f64)>)> {
    let latest = dataset.latest_year()?;
    let filter = Filter::all().country(country).year(latest).sex(sex);
    let groups = mean_by(&dataset.observations, &filter, |obs| Some(obs.age_group));
    Some((latest, groups.into_iter().collect()))
}

// ---------------------------------------------------------------------------
// Crises
// ---------------------------------------------------------------------------

/// A shaded period on the yearly chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrisisPeriod {
    pub label: &'static str,
    pub start: i32,
    pub end: i32,
}

pub const CRISIS_PERIODS: [CrisisPeriod; 3] = [
    CrisisPeriod {
        label: "Financial crisis",
        start: 2008,
        end: 2010,
    },
    CrisisPeriod {
        label: "COVID-19",
        start: 2020,
        end: 2021,
    },
    CrisisPeriod {
        label: "Inflation",
        start: 2022,
        end: 2023,
    },
];

/// Mean rate per year over the whole table, every sex and age group.
pub fn yearly_average(observations: &[Observation]) -> Vec<(i32, f64)> {
    by_year(observations, &Filter::all())
}

// ---------------------------------------------------------------------------
// Regions and map
// ---------------------------------------------------------------------------

/// Mean rate per region for one year, highest first.
pub fn regional_averages(observations: &[Observation], year: i32) -> Vec<(Region, f64)> {
    let mut regions: Vec<(Region, f64)> =
        mean_by(observations, &Filter::all().year(year), |obs| Some(obs.region))
            .into_iter()
            .collect();
    regions.sort_by(|a, b| b.1.total_cmp(&a.1));
    regions
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapEntry {
    pub iso3: String,
    pub country: String,
    pub value: f64,
}

/// Values for the map of Europe. Countries without an ISO3 code are left
/// out rather than drawn with a placeholder.
pub fn map_values(observations: &[Observation], year: i32, sex: Sex, age: AgeGroup) -> Vec<MapEntry> {
    let filter = Filter::all().year(year).sex(sex).age_group(age);
    mean_by(observations, &filter, |obs| {
        Some((obs.iso3.clone()?, obs.country_name.clone()))
    })
    .into_iter()
    .map(|((iso3, country), value)| MapEntry {
        iso3,
        country,
        value,
    })
    .collect()
}

/// First rows of the canonical table for one country and year.
pub fn preview<'a>(observations: &'a [Observation], country: &str, year: i32) -> Vec<&'a Observation> {
    let filter = Filter::all().country(country).year(year);
    filter.apply(observations).take(PREVIEW_ROWS).collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn obs(code: &str, name: &str, sex: Sex, age: AgeGroup, year: Option<i32>, value: f64) -> Observation {
        Observation {
            country_code: code.into(),
            country_name: name.into(),
            iso3: crate::data::countries::iso3(code),
            sex,
            age_group: age,
            year,
            value,
            quality_flag: "OK".into(),
            validation_status: "unknown".into(),
            region: crate::data::countries::region(code),
        }
    }

    fn table() -> Vec<Observation> {
        use AgeGroup::*;
        use Sex::*;
        vec![
            obs("FR", "France", T, AllAges, Some(2020), 7.0),
            obs("FR", "France", T, AllAges, Some(2021), 8.0),
            obs("FR", "France", M, AllAges, Some(2021), 9.0),
            obs("FR", "France", F, AllAges, Some(2021), 6.0),
            obs("FR", "France", T, Y18To24, Some(2021), 12.0),
            obs("FR", "France", T, AllAges, None, 50.0),
            obs("RO", "Romania", T, AllAges, Some(2021), 15.0),
            obs("SE", "Sweden", T, AllAges, Some(2021), 4.0),
            obs("ZZ", "ZZ", T, AllAges, Some(2021), 1.0),
        ]
    }

    fn selection(country: &str, year: i32) -> Selection {
        Selection {
            country: country.into(),
            sex: Sex::T,
            age_group: AgeGroup::AllAges,
            year,
            compared: BTreeSet::from([country.to_string()]),
        }
    }

    #[test]
    fn mean_of_nothing_is_none() {
        assert_eq!(mean(Vec::new()), None);
        assert_eq!(mean([1.0, 2.0, 6.0]), Some(3.0));
    }

    #[test]
    fn indicators_for_selected_year() {
        let kpis = indicators(&table(), &selection("France", 2021));
        // T, all ages, 2021: FR 8, RO 15, SE 4, ZZ 1 -> 7
        assert_eq!(kpis.european, Some(7.0));
        assert_eq!(kpis.country, Some(8.0));
        assert_eq!(kpis.difference, Some(1.0));
    }

    #[test]
    fn indicators_without_data_are_none() {
        let kpis = indicators(&table(), &selection("France", 1990));
        assert_eq!(kpis.european, None);
        assert_eq!(kpis.country, None);
        assert_eq!(kpis.difference, None);
    }

    #[test]
    fn trend_skips_missing_years() {
        let points = trend(&table(), "France", Sex::T, AgeGroup::AllAges);
        assert_eq!(points, vec![(2020, 7.0), (2021, 8.0)]);
    }

    #[test]
    fn european_trend_averages_countries() {
        let points = european_trend(&table(), Sex::T, AgeGroup::AllAges);
        assert_eq!(points, vec![(2020, 7.0), (2021, 7.0)]);
    }

    #[test]
    fn compared_trends_drop_empty_series() {
        let mut sel = selection("France", 2021);
        sel.toggle_compared("Nowhere");
        let trends = compared_trends(&table(), &sel);
        assert_eq!(trends.len(), 1);
        assert_eq!(trends[0].0, "France");
    }

    #[test]
    fn compared_trends_follow_the_selection() {
        let mut sel = selection("France", 2021);
        sel.toggle_compared("Sweden");
        let trends = compared_trends(&table(), &sel);
        let names: Vec<&str> = trends.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["France", "Sweden"]);
        assert_eq!(trends[0].1, vec![(2020, 7.0), (2021, 8.0)]);
        assert_eq!(trends[1].1, vec![(2021, 4.0)]);

        sel.compared.clear();
        assert!(compared_trends(&table(), &sel).is_empty());
    }

    #[test]
    fn ranking_is_ascending() {
        let ranking = country_ranking(&table(), 2021, Sex::T, AgeGroup::AllAges);
        let names: Vec<&str> = ranking.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["ZZ", "Sweden", "France", "Romania"]);
    }

    #[test]
    fn gender_gap_has_men_and_women_only() {
        let gap = gender_gap(&table(), "France", AgeGroup::AllAges);
        assert_eq!(gap.keys().copied().collect::<Vec<_>>(), [Sex::F, Sex::M]);
        assert_eq!(gap[&Sex::M], vec![(2021, 9.0)]);
        assert_eq!(gap[&Sex::F], vec![(2021, 6.0)]);
    }

    #[test]
    fn age_breakdown_uses_latest_year() {
        let ds = Dataset::from_observations(table());
        let (year, groups) = age_breakdown(&ds, "France", Sex::T).unwrap();
        assert_eq!(year, 2021);
        assert_eq!(groups, vec![(AgeGroup::AllAges, 8.0), (AgeGroup::Y18To24, 12.0)]);
        assert!(age_breakdown(&Dataset::default(), "France", Sex::T).is_none());
    }

    #[test]
    fn yearly_average_over_everything() {
        let years = yearly_average(&table());
        assert_eq!(years[0], (2020, 7.0));
        // 8 + 9 + 6 + 12 + 15 + 4 + 1 = 55 over 7 rows
        assert_eq!(years[1].0, 2021);
        assert!((years[1].1 - 55.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn regions_highest_first() {
        let regions = regional_averages(&table(), 2021);
        assert_eq!(regions[0], (Region::East, 15.0));
        assert_eq!(regions.last().unwrap(), &(Region::Other, 1.0));
        assert_eq!(regions.len(), 4);
    }

    #[test]
    fn map_excludes_codes_without_iso3() {
        let entries = map_values(&table(), 2021, Sex::T, AgeGroup::AllAges);
        let codes: Vec<&str> = entries.iter().map(|e| e.iso3.as_str()).collect();
        assert_eq!(codes, ["FRA", "ROU", "SWE"]);
        assert!(entries.iter().all(|e| e.country != "ZZ"));
    }

    #[test]
    fn preview_is_capped() {
        let mut rows = table();
        for _ in 0..20 {
            rows.push(obs("SE", "Sweden", Sex::F, AgeGroup::AllAges, Some(2021), 3.0));
        }
        let shown = preview(&rows, "Sweden", 2021);
        assert_eq!(shown.len(), PREVIEW_ROWS);
        assert!(shown.iter().all(|o| o.country_name == "Sweden"));
    }
}
