use comfy_table::{presets::NOTHING, *};

use inwork_poverty::data::clean::TableProfile;
use inwork_poverty::data::filter::Selection;
use inwork_poverty::data::model::Dataset;
use inwork_poverty::data::views;

fn styled(table: &mut Table) -> &mut Table {
    table
        .load_preset(NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_style(TableComponent::BottomBorder, '─')
        .set_style(TableComponent::MiddleHeaderIntersections, '─')
        .set_style(TableComponent::HeaderLines, '─')
        .set_style(TableComponent::BottomBorderIntersections, '─')
        .set_style(TableComponent::TopBorder, '─')
        .set_style(TableComponent::TopBorderIntersections, '─')
}

fn bold(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}

fn rate(value: Option<f64>) -> String {
    value.map_or_else(|| "—".to_string(), |v| format!("{v:.1}"))
}

pub fn display_profile(profile: &TableProfile) {
    let mut table = Table::new();
    styled(&mut table).set_header(vec![bold("Column"), bold("Complete (%)")]);
    for (name, ratio) in &profile.completeness {
        table.add_row(vec![
            Cell::new(name),
            Cell::new(format!("{:.1}", ratio * 100.0)).set_alignment(CellAlignment::Right),
        ]);
    }
    println!(
        "Rows: {}  Columns: {}  Missing values: {}",
        profile.rows, profile.columns, profile.missing_cells
    );
    println!("{table}\n");
}

pub fn display_dataset(dataset: &Dataset) {
    let Some(sel) = Selection::initial(dataset) else {
        println!("No country has enough years of data to be shown.");
        return;
    };
    println!(
        "{} observations, {} countries, years {}–{}",
        dataset.len(),
        dataset.countries.len(),
        dataset.first_year().unwrap_or(sel.year),
        sel.year
    );

    let kpis = views::indicators(&dataset.observations, &sel);
    let mut table = Table::new();
    styled(&mut table).set_header(vec![
        bold("Year"),
        bold("Europe (%)"),
        bold(&sel.country),
        bold("Difference"),
    ]);
    table.add_row(vec![
        kpis.year.to_string(),
        rate(kpis.european),
        rate(kpis.country),
        kpis.difference
            .map_or_else(|| "—".to_string(), |v| format!("{v:+.1}")),
    ]);
    println!("{table}\n");

    let mut table = Table::new();
    styled(&mut table).set_header(vec![bold("Year"), bold(&format!("{} (%)", sel.country))]);
    for (year, value) in views::trend(&dataset.observations, &sel.country, sel.sex, sel.age_group) {
        table.add_row(vec![year.to_string(), format!("{value:.1}")]);
    }
    println!("{table}\n");

    let mut table = Table::new();
    styled(&mut table).set_header(vec![bold("Region"), bold(&format!("Average {} (%)", sel.year))]);
    for (region, value) in views::regional_averages(&dataset.observations, sel.year) {
        table.add_row(vec![region.label().to_string(), format!("{value:.2}")]);
    }
    println!("{table}");
}
