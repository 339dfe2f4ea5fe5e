use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use inwork_poverty::data::loader::DATA_FILE_NAME;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel. Every option list comes from the dataset.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = state.dataset.clone() else {
        ui.label("No dataset loaded.");
        return;
    };
    let Some(sel) = state.selection.as_mut() else {
        ui.label("Nothing to filter.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.strong("Country");
            egui::ComboBox::from_id_salt("country")
                .selected_text(sel.country.as_str())
                .width(ui.available_width())
                .show_ui(ui, |ui: &mut Ui| {
                    for country in &dataset.countries {
                        ui.selectable_value(&mut sel.country, country.clone(), country.as_str());
                    }
                });

            ui.strong("Sex");
            egui::ComboBox::from_id_salt("sex")
                .selected_text(sel.sex.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for sex in &dataset.sexes {
                        ui.selectable_value(&mut sel.sex, *sex, sex.label());
                    }
                });

            ui.strong("Age group");
            egui::ComboBox::from_id_salt("age_group")
                .selected_text(sel.age_group.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for age in &dataset.age_groups {
                        ui.selectable_value(&mut sel.age_group, *age, age.label());
                    }
                });

            if let (Some(first), Some(last)) = (dataset.first_year(), dataset.latest_year()) {
                ui.strong("Year");
                ui.add(egui::Slider::new(&mut sel.year, first..=last));
            }
            ui.separator();

            // ---- Countries drawn on the line charts ----
            let header = format!(
                "Countries for line charts  ({}/{})",
                sel.compared.len(),
                dataset.countries.len()
            );
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("compared")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            sel.compared = dataset.countries.clone();
                        }
                        if ui.small_button("None").clicked() {
                            sel.compared.clear();
                        }
                    });
                    for country in &dataset.countries {
                        let mut checked = sel.compared.contains(country);
                        let text = RichText::new(country).color(state.colors.color_for(country));
                        if ui.checkbox(&mut checked, text).changed() {
                            sel.toggle_compared(country);
                        }
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        if ui
            .button("Reload")
            .on_hover_text("Read the source again instead of the cached copy")
            .clicked()
        {
            state.bump_version();
        }

        ui.separator();

        if let (Some(ds), Some(source)) = (&state.dataset, &state.loaded_from) {
            ui.label(format!(
                "{} observations, {} countries  ·  {source}",
                ds.len(),
                ds.countries.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open the in-work poverty extract")
        .set_file_name(DATA_FILE_NAME)
        .add_filter("Delimited text", &["csv", "tsv", "txt"])
        .pick_file();

    if let Some(path) = file {
        log::info!("Opening {}", path.display());
        state.open_source(&path.to_string_lossy());
    }
}
