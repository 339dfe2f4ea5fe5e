use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use inwork_poverty::data::clean::TableProfile;
use inwork_poverty::data::filter::Selection;
use inwork_poverty::data::model::{Dataset, Observation, Sex};
use inwork_poverty::data::views::{self, Indicators, CRISIS_PERIODS};

use crate::color::reds;
use crate::state::{AppState, Tab};
use crate::ui::charts::{bar_chart, line_chart, Series};

const ROW_HEIGHT: f32 = 18.0;

fn pct(value: Option<f64>) -> String {
    value.map_or_else(|| "—".to_string(), |v| format!("{v:.1}"))
}

fn signed(value: Option<f64>) -> String {
    value.map_or_else(|| "—".to_string(), |v| format!("{v:+.1}"))
}

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Tab strip plus the content of the active tab.
pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("In-work at-risk-of-poverty in Europe");
    ui.label("Share of employed people whose disposable income is below 60% of their country's median.");
    ui.small("Source: Eurostat (EU-SILC), table ilc_iw01");

    if let Some(profile) = &state.profile {
        about_dataset(ui, profile);
    }
    ui.separator();

    ui.horizontal_wrapped(|ui: &mut Ui| {
        for tab in Tab::ALL {
            ui.selectable_value(&mut state.active_tab, tab, tab.title());
        }
    });
    ui.separator();

    let (Some(dataset), Some(sel)) = (state.dataset.clone(), state.selection.clone()) else {
        return;
    };
    let obs = dataset.observations.as_slice();

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading(state.active_tab.title());
            match state.active_tab {
                Tab::Indicators => indicators_tab(ui, obs, &sel),
                Tab::Evolution => evolution_tab(ui, state, obs, &sel, false),
                Tab::EuropeanAverage => evolution_tab(ui, state, obs, &sel, true),
                Tab::Countries => countries_tab(ui, obs, &sel),
                Tab::Gender => gender_tab(ui, obs, &sel),
                Tab::Age => age_tab(ui, &dataset, &sel),
                Tab::Crises => crises_tab(ui, obs),
                Tab::Regions => regions_tab(ui, obs, &sel),
                Tab::Map => map_tab(ui, obs, &sel),
                Tab::Conclusion => conclusion_tab(ui, obs, &sel),
            }
        });
}

// ---------------------------------------------------------------------------
// Dataset information
// ---------------------------------------------------------------------------

fn about_dataset(ui: &mut Ui, profile: &TableProfile) {
    egui::CollapsingHeader::new("About this dataset")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.label(format!(
                "Rows: {}   Columns: {}   Missing values: {}",
                profile.rows, profile.columns, profile.missing_cells
            ));
            ui.label(
                "Annual data by country, sex and age group, in percent, for people \
                 whose work status is 'employed'. Missing rates are filled with the \
                 median, and only countries with at least five years of data are shown.",
            );
            if profile.missing_cells > 0 {
                ui.strong("Data completeness per column");
                let bars: Vec<(String, f64)> = profile
                    .completeness
                    .iter()
                    .map(|(name, ratio)| (name.clone(), ratio * 100.0))
                    .collect();
                bar_chart(ui, "completeness", &bars, Color32::LIGHT_BLUE, false);
            }
        });
}

// ---------------------------------------------------------------------------
// Tabs
// ---------------------------------------------------------------------------

fn kpi_grid(ui: &mut Ui, kpis: &Indicators, country: &str) {
    egui::Grid::new("kpis")
        .num_columns(3)
        .spacing([48.0, 4.0])
        .show(ui, |ui: &mut Ui| {
            ui.label(format!("Europe in {} (%)", kpis.year));
            ui.label(format!("{country} in {} (%)", kpis.year));
            ui.label("Difference vs Europe");
            ui.end_row();
            ui.label(RichText::new(pct(kpis.european)).size(28.0).strong());
            ui.label(RichText::new(pct(kpis.country)).size(28.0).strong());
            ui.label(RichText::new(signed(kpis.difference)).size(28.0).strong());
            ui.end_row();
        });
}

fn indicators_tab(ui: &mut Ui, obs: &[Observation], sel: &Selection) {
    let kpis = views::indicators(obs, sel);
    kpi_grid(ui, &kpis, &sel.country);

    ui.add_space(12.0);
    ui.strong(format!("Preview: {} in {}", sel.country, sel.year));
    observation_table(ui, "preview", &views::preview(obs, &sel.country, sel.year));
}

fn evolution_tab(ui: &mut Ui, state: &AppState, obs: &[Observation], sel: &Selection, with_europe: bool) {
    ui.small("Filters: countries (multi-select), sex, age group.");
    let mut series: Vec<Series> = Vec::new();
    if with_europe {
        series.push(
            Series::new(
                "European average",
                views::european_trend(obs, sel.sex, sel.age_group),
                Color32::GRAY,
            )
            .dashed(),
        );
    }
    for (country, points) in views::compared_trends(obs, sel) {
        let color = state.colors.color_for(&country);
        series.push(Series::new(country, points, color));
    }
    ui.label(format!("{}, {}", sel.sex.label(), sel.age_group.label()));
    let id = if with_europe { "vs_europe" } else { "evolution" };
    line_chart(ui, id, &series, &[]);
}

fn countries_tab(ui: &mut Ui, obs: &[Observation], sel: &Selection) {
    ui.small("Filters: sex, age group and year.");
    let ranking = views::country_ranking(obs, sel.year, sel.sex, sel.age_group);
    ui.label(format!("In-work poverty by country, {}", sel.year));
    bar_chart(ui, "ranking", &ranking, Color32::from_rgb(60, 179, 113), true);
    value_table(ui, "ranking_table", "Country", &ranking);
}

fn gender_tab(ui: &mut Ui, obs: &[Observation], sel: &Selection) {
    ui.small("Filters: country and age group.");
    let gap = views::gender_gap(obs, &sel.country, sel.age_group);
    let series: Vec<Series> = gap
        .into_iter()
        .map(|(sex, points)| {
            let color = match sex {
                Sex::M => Color32::from_rgb(31, 119, 180),
                _ => Color32::from_rgb(255, 127, 14),
            };
            Series::new(sex.label(), points, color)
        })
        .collect();
    ui.label(format!("Gender gap in {}", sel.country));
    line_chart(ui, "gender", &series, &[]);
}

fn age_tab(ui: &mut Ui, dataset: &Dataset, sel: &Selection) {
    ui.small("Filters: country and sex.");
    let Some((year, groups)) = views::age_breakdown(dataset, &sel.country, sel.sex) else {
        ui.label("No data for this selection.");
        return;
    };
    let bars: Vec<(String, f64)> = groups
        .into_iter()
        .map(|(age, v)| (age.label().to_string(), v))
        .collect();
    ui.label(format!("In-work poverty by age, {} {year}", sel.country));
    bar_chart(ui, "age", &bars, Color32::from_rgb(255, 165, 0), false);
    value_table(ui, "age_table", "Age group", &bars);
}

fn crises_tab(ui: &mut Ui, obs: &[Observation]) {
    ui.small(
        "How did in-work poverty react after 2008 (financial crisis), 2020 (COVID-19) \
         and 2022 (inflation shock)?",
    );
    let yearly = views::yearly_average(obs);
    let shading = [
        Color32::RED,
        Color32::from_rgb(255, 165, 0),
        Color32::from_rgb(128, 0, 128),
    ];
    let periods: Vec<_> = CRISIS_PERIODS.into_iter().zip(shading).collect();
    let series = [Series::new(
        "European average",
        yearly.clone(),
        Color32::from_rgb(65, 105, 225),
    )];
    line_chart(ui, "crises", &series, &periods);

    ui.strong("Average European in-work poverty rate by year");
    let rows: Vec<(String, f64)> = yearly.into_iter().map(|(y, v)| (y.to_string(), v)).collect();
    value_table(ui, "crises_table", "Year", &rows);
}

fn regions_tab(ui: &mut Ui, obs: &[Observation], sel: &Selection) {
    ui.small("Countries grouped into broad European regions.");
    let rows: Vec<(String, f64)> = views::regional_averages(obs, sel.year)
        .into_iter()
        .map(|(region, v)| (region.label().to_string(), v))
        .collect();
    ui.strong(format!("Regional averages in {}", sel.year));
    value_table(ui, "regions_table", "Region", &rows);
    bar_chart(ui, "regions", &rows, Color32::from_rgb(0, 128, 128), false);
}

fn map_tab(ui: &mut Ui, obs: &[Observation], sel: &Selection) {
    ui.small("Filters: sex, age group and year.");
    let mut entries = views::map_values(obs, sel.year, sel.sex, sel.age_group);
    if entries.is_empty() {
        ui.label("No data for this selection.");
        return;
    }
    entries.sort_by(|a, b| b.value.total_cmp(&a.value));
    let (lo, hi) = entries
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), e| {
            (lo.min(e.value), hi.max(e.value))
        });
    let span = hi - lo;

    ui.label(format!("In-work poverty across Europe, {}", sel.year));
    ui.push_id("map_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .column(Column::auto().at_least(60.0))
            .column(Column::auto().at_least(160.0))
            .column(Column::remainder())
            .header(20.0, |mut header| {
                header.col(|ui| {
                    ui.strong("ISO3");
                });
                header.col(|ui| {
                    ui.strong("Country");
                });
                header.col(|ui| {
                    ui.strong("Rate (%)");
                });
            })
            .body(|mut body| {
                for entry in &entries {
                    let t = if span > 0.0 { (entry.value - lo) / span } else { 0.5 };
                    let fill = reds(t);
                    let text = if t > 0.5 { Color32::WHITE } else { Color32::BLACK };
                    body.row(ROW_HEIGHT, |mut row| {
                        row.col(|ui| {
                            ui.monospace(&entry.iso3);
                        });
                        row.col(|ui| {
                            ui.label(&entry.country);
                        });
                        row.col(|ui| {
                            ui.label(
                                RichText::new(format!(" {:.1} ", entry.value))
                                    .background_color(fill)
                                    .color(text),
                            );
                        });
                    });
                }
            });
    });
}

fn conclusion_tab(ui: &mut Ui, obs: &[Observation], sel: &Selection) {
    let kpis = views::indicators(obs, sel);
    ui.strong(format!("Main findings ({})", sel.year));
    ui.label(format!("• European average: {}%", pct(kpis.european)));
    ui.label(format!("• {}: {}%", sel.country, pct(kpis.country)));
    ui.label(format!("• Difference vs Europe: {} points", signed(kpis.difference)));

    ui.add_space(12.0);
    ui.strong("Did you know?");
    for fact in [
        "Even full-time workers can be at risk of poverty if wages are below living standards.",
        "In 2022, over 9% of employed people in the EU were still living at risk of poverty.",
        "Nordic countries tend to have the lowest in-work poverty rates in Europe.",
        "Gender gaps in poverty are often linked to part-time work and care responsibilities.",
    ] {
        ui.label(format!("• {fact}"));
    }
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// Two-column table: a label and a rate.
fn value_table(ui: &mut Ui, id: &str, label: &str, rows: &[(String, f64)]) {
    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .column(Column::auto().at_least(160.0))
            .column(Column::remainder())
            .header(20.0, |mut header| {
                header.col(|ui| {
                    ui.strong(label);
                });
                header.col(|ui| {
                    ui.strong("Rate (%)");
                });
            })
            .body(|mut body| {
                for (name, value) in rows {
                    body.row(ROW_HEIGHT, |mut row| {
                        row.col(|ui| {
                            ui.label(name);
                        });
                        row.col(|ui| {
                            ui.label(format!("{value:.2}"));
                        });
                    });
                }
            });
    });
}

fn observation_table(ui: &mut Ui, id: &str, rows: &[&Observation]) {
    if rows.is_empty() {
        ui.label("No rows for this country and year.");
        return;
    }
    const HEADERS: [&str; 8] = [
        "Code", "Country", "Sex", "Age group", "Year", "Rate (%)", "Flag", "Region",
    ];
    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .columns(Column::auto().at_least(48.0), HEADERS.len())
            .header(20.0, |mut header| {
                for h in HEADERS {
                    header.col(|ui| {
                        ui.strong(h);
                    });
                }
            })
            .body(|mut body| {
                for obs in rows {
                    let cells = [
                        obs.country_code.clone(),
                        obs.country_name.clone(),
                        obs.sex.label().to_string(),
                        obs.age_group.label().to_string(),
                        obs.year.map_or_else(|| "—".to_string(), |y| y.to_string()),
                        format!("{:.1}", obs.value),
                        obs.quality_flag.clone(),
                        obs.region.label().to_string(),
                    ];
                    body.row(ROW_HEIGHT, |mut row| {
                        for cell in &cells {
                            row.col(|ui| {
                                ui.label(cell);
                            });
                        }
                    });
                }
            });
    });
}
