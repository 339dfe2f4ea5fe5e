use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, LineStyle, Plot, PlotPoints, Points, Polygon};

use inwork_poverty::data::views::CrisisPeriod;

const CHART_HEIGHT: f32 = 320.0;
const Y_LABEL: &str = "In-work poverty rate (%)";

/// A named yearly series for a line chart.
pub struct Series {
    pub name: String,
    pub points: Vec<(i32, f64)>,
    pub color: Color32,
    pub dashed: bool,
}

impl Series {
    pub fn new(name: impl Into<String>, points: Vec<(i32, f64)>, color: Color32) -> Self {
        Series {
            name: name.into(),
            points,
            color,
            dashed: false,
        }
    }

    pub fn dashed(mut self) -> Self {
        self.dashed = true;
        self
    }
}

fn plot_points(points: &[(i32, f64)]) -> Vec<[f64; 2]> {
    points.iter().map(|&(x, y)| [x as f64, y]).collect()
}

// ---------------------------------------------------------------------------
// Line charts (one line per series, year on x)
// ---------------------------------------------------------------------------

/// Yearly line chart with markers, optionally shading periods behind the lines.
pub fn line_chart(ui: &mut Ui, id: &str, series: &[Series], shaded: &[(CrisisPeriod, Color32)]) {
    if series.iter().all(|s| s.points.is_empty()) {
        ui.label("No data for this selection.");
        return;
    }

    let (y_min, y_max) = series
        .iter()
        .flat_map(|s| s.points.iter().map(|&(_, y)| y))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| {
            (lo.min(y), hi.max(y))
        });

    Plot::new(id)
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label("Year")
        .y_axis_label(Y_LABEL)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (period, color) in shaded {
                let (x0, x1) = (period.start as f64, period.end as f64);
                let corners: PlotPoints = vec![[x0, y_min], [x1, y_min], [x1, y_max], [x0, y_max]].into();
                plot_ui.polygon(
                    Polygon::new(corners)
                        .fill_color(color.gamma_multiply(0.2))
                        .name(period.label),
                );
            }

            for s in series.iter().filter(|s| !s.points.is_empty()) {
                let points = plot_points(&s.points);
                let mut line = Line::new(PlotPoints::from(points.clone()))
                    .name(&s.name)
                    .color(s.color)
                    .width(2.0);
                if s.dashed {
                    line = line.style(LineStyle::dashed_loose());
                }
                plot_ui.line(line);
                plot_ui.points(
                    Points::new(PlotPoints::from(points))
                        .name(&s.name)
                        .color(s.color)
                        .radius(3.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Bar charts (one bar per category)
// ---------------------------------------------------------------------------

/// Bar chart with one named bar per category; hovering a bar shows its name.
pub fn bar_chart(ui: &mut Ui, id: &str, bars: &[(String, f64)], color: Color32, horizontal: bool) {
    if bars.is_empty() {
        ui.label("No data for this selection.");
        return;
    }

    let bars: Vec<Bar> = bars
        .iter()
        .enumerate()
        .map(|(i, (name, value))| Bar::new(i as f64, *value).name(name).fill(color))
        .collect();
    let mut chart = BarChart::new(bars).color(color);
    if horizontal {
        chart = chart.horizontal();
    }

    let plot = Plot::new(id)
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_scroll(false)
        .show_x(false);
    let plot = if horizontal {
        plot.x_axis_label(Y_LABEL)
    } else {
        plot.y_axis_label(Y_LABEL)
    };
    plot.show(ui, |plot_ui| plot_ui.bar_chart(chart));
}
