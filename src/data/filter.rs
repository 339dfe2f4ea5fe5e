use std::collections::BTreeSet;

use super::model::{AgeGroup, Dataset, Observation, Region, Sex};

// ---------------------------------------------------------------------------
// Filter predicate: a conjunction of equality tests
// ---------------------------------------------------------------------------

/// Conjunction of optional equality tests. An unset field does not
/// constrain; an observation passes only when every set field matches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    pub country: Option<String>,
    /// Country names; an empty set matches nothing.
    pub countries: Option<BTreeSet<String>>,
    pub sex: Option<Sex>,
    pub sexes: Option<BTreeSet<Sex>>,
    pub age_group: Option<AgeGroup>,
    /// Rows with a missing year never match a year test.
    pub year: Option<i32>,
    pub region: Option<Region>,
}

impl Filter {
    /// The filter that lets everything through.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn country(mut self, name: impl Into<String>) -> Self {
        self.country = Some(name.into());
        self
    }

    pub fn countries(mut self, names: impl IntoIterator<Item = String>) -> Self {
        self.countries = Some(names.into_iter().collect());
        self
    }

    pub fn sex(mut self, sex: Sex) -> Self {
        self.sex = Some(sex);
        self
    }

    pub fn sexes(mut self, sexes: impl IntoIterator<Item = Sex>) -> Self {
        self.sexes = Some(sexes.into_iter().collect());
        self
    }

    pub fn age_group(mut self, age_group: AgeGroup) -> Self {
        self.age_group = Some(age_group);
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    pub fn matches(&self, obs: &Observation) -> bool {
        self.country.as_ref().map_or(true, |c| *c == obs.country_name)
            && self
                .countries
                .as_ref()
                .map_or(true, |set| set.contains(&obs.country_name))
            && self.sex.map_or(true, |s| s == obs.sex)
            && self.sexes.as_ref().map_or(true, |set| set.contains(&obs.sex))
            && self.age_group.map_or(true, |a| a == obs.age_group)
            && self.year.map_or(true, |y| obs.year == Some(y))
            && self.region.map_or(true, |r| r == obs.region)
    }

    /// Observations passing the filter, in table order.
    pub fn apply<'s, 'a: 's>(&'s self, observations: &'a [Observation]) -> impl Iterator<Item = &'a Observation> + 's {
        observations.iter().filter(move |obs| self.matches(obs))
    }
}

// ---------------------------------------------------------------------------
// Selection: what the user picked in the side panel
// ---------------------------------------------------------------------------

/// The current control values. Every option comes from the dataset's own
/// distinct values.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub country: String,
    pub sex: Sex,
    pub age_group: AgeGroup,
    pub year: i32,
    /// Countries drawn on the line charts.
    pub compared: BTreeSet<String>,
}

impl Selection {
    /// First country, sex and age group, latest year; the line charts start
    /// with the selected country only. `None` for an empty dataset.
    pub fn initial(dataset: &Dataset) -> Option<Self> {
        let country = dataset.countries.first()?.clone();
        Some(Selection {
            sex: *dataset.sexes.first()?,
            age_group: *dataset.age_groups.first()?,
            year: dataset.latest_year()?,
            compared: BTreeSet::from([country.clone()]),
            country,
        })
    }

    /// Keep the selection valid after the dataset changed, falling back to
    /// the initial values for anything that disappeared.
    pub fn reconcile(self, dataset: &Dataset) -> Option<Self> {
        let initial = Self::initial(dataset)?;
        let compared: BTreeSet<String> = self
            .compared
            .into_iter()
            .filter(|c| dataset.countries.contains(c))
            .collect();
        Some(Selection {
            country: if dataset.countries.contains(&self.country) {
                self.country
            } else {
                initial.country
            },
            sex: if dataset.sexes.contains(&self.sex) {
                self.sex
            } else {
                initial.sex
            },
            age_group: if dataset.age_groups.contains(&self.age_group) {
                self.age_group
            } else {
                initial.age_group
            },
            year: if dataset.years.contains(&self.year) {
                self.year
            } else {
                initial.year
            },
            compared: if compared.is_empty() {
                initial.compared
            } else {
                compared
            },
        })
    }

    /// Country, sex, age group and year of the selection.
    pub fn filter(&self) -> Filter {
        Filter::all()
            .country(self.country.clone())
            .sex(self.sex)
            .age_group(self.age_group)
            .year(self.year)
    }

    pub fn toggle_compared(&mut self, country: &str) {
        if !self.compared.remove(country) {
            self.compared.insert(country.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(country: &str, sex: Sex, age_group: AgeGroup, year: Option<i32>) -> Observation {
        Observation {
            country_code: "XX".into(),
            country_name: country.into(),
            iso3: None,
            sex,
            age_group,
            year,
            value: 1.0,
            quality_flag: "OK".into(),
            validation_status: "unknown".into(),
            region: Region::Other,
        }
    }

    fn matching(ds: &Dataset, filter: &Filter) -> Vec<usize> {
        ds.observations
            .iter()
            .enumerate()
            .filter(|(_, obs)| filter.matches(obs))
            .map(|(i, _)| i)
            .collect()
    }

    fn dataset() -> Dataset {
        Dataset::from_observations(vec![
            obs("Spain", Sex::F, AgeGroup::AllAges, Some(2020)),
            obs("Spain", Sex::M, AgeGroup::Y18To24, Some(2021)),
            obs("Austria", Sex::T, AgeGroup::AllAges, None),
        ])
    }

    #[test]
    fn applied_rows_outlive_the_filter() {
        let ds = dataset();
        let rows: Vec<&Observation> = {
            let f = Filter::all().country("Spain");
            f.apply(&ds.observations).collect()
        };
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|o| o.country_name == "Spain"));
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let ds = dataset();
        assert_eq!(matching(&ds, &Filter::all()), vec![0, 1, 2]);
    }

    #[test]
    fn conjunction_of_tests() {
        let ds = dataset();
        let f = Filter::all().country("Spain").sex(Sex::M);
        assert_eq!(matching(&ds, &f), vec![1]);
        let f = Filter::all().country("Spain").age_group(AgeGroup::AllAges);
        assert_eq!(matching(&ds, &f), vec![0]);
        let f = Filter::all().country("Spain").region(Region::South);
        assert!(matching(&ds, &f).is_empty());
    }

    #[test]
    fn missing_year_never_matches_a_year() {
        let ds = dataset();
        let f = Filter::all().country("Austria").year(2020);
        assert!(matching(&ds, &f).is_empty());
        assert_eq!(matching(&ds, &Filter::all().country("Austria")), vec![2]);
    }

    #[test]
    fn empty_set_matches_nothing() {
        let ds = dataset();
        assert!(matching(&ds, &Filter::all().countries(Vec::new())).is_empty());
        let f = Filter::all().sexes([Sex::M, Sex::F]);
        assert_eq!(matching(&ds, &f), vec![0, 1]);
    }

    #[test]
    fn initial_selection_comes_from_the_data() {
        let sel = Selection::initial(&dataset()).unwrap();
        assert_eq!(sel.country, "Austria");
        assert_eq!(sel.sex, Sex::F);
        assert_eq!(sel.age_group, AgeGroup::AllAges);
        assert_eq!(sel.year, 2021);
        assert_eq!(sel.compared, BTreeSet::from(["Austria".to_string()]));
        assert!(Selection::initial(&Dataset::default()).is_none());
    }

    #[test]
    fn reconcile_drops_vanished_values() {
        let ds = dataset();
        let mut sel = Selection::initial(&ds).unwrap();
        sel.country = "Spain".into();
        sel.year = 1999;
        sel.toggle_compared("Atlantis");
        sel.toggle_compared("Austria");

        let sel = sel.reconcile(&ds).unwrap();
        assert_eq!(sel.country, "Spain");
        assert_eq!(sel.year, 2021);
        assert_eq!(sel.compared, BTreeSet::from(["Austria".to_string()]));
    }
}
