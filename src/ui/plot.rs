use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Plot, PlotPoints, Points};

use crate::data::charts;
use crate::data::model::ListingTable;
use crate::data::summary::{summarize, Summary};
use crate::state::{AppState, Tab, MAX_MODEL_BARS, PREVIEW_ROWS};

// ---------------------------------------------------------------------------
// Central panel: KPI strip + tabbed charts
// ---------------------------------------------------------------------------

/// Render the central panel: headline numbers, tab bar, active chart.
pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    let Some(table) = state.table.clone() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a listings CSV to explore  (File → Open CSV…)");
        });
        return;
    };

    let summary = summarize(&table, &state.visible_indices);
    kpi_row(ui, &summary);
    ui.separator();

    ui.horizontal(|ui: &mut Ui| {
        for tab in Tab::ALL {
            ui.selectable_value(&mut state.active_tab, tab, tab.label());
        }
    });
    ui.separator();

    if state.visible_indices.is_empty() {
        ui.label(RichText::new("No rows match the current filters.").italics());
    }

    match state.active_tab {
        Tab::Scatter => scatter_chart(ui, &table, state),
        Tab::Boxes => box_chart(ui, &table, state),
        Tab::Models => model_chart(ui, &table, state),
        Tab::Table => preview_table(ui, &table, state),
    }
}

fn kpi_row(ui: &mut Ui, summary: &Summary) {
    ui.columns(4, |cols: &mut [Ui]| {
        metric(&mut cols[0], "Matching listings", summary.count.to_string());
        metric(&mut cols[1], "Mean price", dollars(summary.mean_price));
        metric(&mut cols[2], "Median price", dollars(summary.median_price));
        metric(&mut cols[3], "Mean odometer", miles(summary.mean_odometer));
    });
}

fn metric(ui: &mut Ui, label: &str, value: String) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(label);
        ui.label(RichText::new(value).size(20.0).strong());
    });
}

fn dollars(v: Option<f64>) -> String {
    v.map(|v| format!("${v:.0}")).unwrap_or_else(|| "N/A".to_string())
}

fn miles(v: Option<f64>) -> String {
    v.map(|v| format!("{v:.0} mi")).unwrap_or_else(|| "N/A".to_string())
}

// ---------------------------------------------------------------------------
// Scatter: price vs odometer, coloured by body type
// ---------------------------------------------------------------------------

fn scatter_chart(ui: &mut Ui, table: &ListingTable, state: &AppState) {
    let series = charts::scatter_series(table, &state.visible_indices, state.log_price);

    Plot::new("scatter_plot")
        .legend(Legend::default())
        .x_axis_label("Odometer")
        .y_axis_label(price_axis_label(state.log_price))
        .show(ui, |plot_ui| {
            for s in &series {
                let color = state
                    .color_map
                    .as_ref()
                    .map(|cm| cm.color_for(&s.label))
                    .unwrap_or(Color32::LIGHT_BLUE);

                let points: PlotPoints = s.points.clone().into();
                plot_ui.points(
                    Points::new(points)
                        .name(&s.label)
                        .color(color)
                        .radius(1.5),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Boxplot: price distribution per manufacturer
// ---------------------------------------------------------------------------

fn box_chart(ui: &mut Ui, table: &ListingTable, state: &AppState) {
    let boxes = charts::price_by_manufacturer(table, &state.visible_indices, state.log_price);
    let labels: Vec<String> = boxes.iter().map(|b| b.manufacturer.clone()).collect();

    let elems: Vec<BoxElem> = boxes
        .iter()
        .enumerate()
        .map(|(i, b)| {
            BoxElem::new(i as f64, BoxSpread::new(b.min, b.q1, b.median, b.q3, b.max))
                .name(format!("{} ({} listings)", b.manufacturer, b.count))
                .box_width(0.6)
        })
        .collect();

    Plot::new("box_plot")
        .y_axis_label(price_axis_label(state.log_price))
        .x_axis_formatter(move |mark, _range| category_tick(&labels, mark.value))
        .show(ui, |plot_ui| {
            plot_ui.box_plot(BoxPlot::new(elems));
        });
}

// ---------------------------------------------------------------------------
// Histogram: listings per model (top bars only, to keep the axis readable)
// ---------------------------------------------------------------------------

fn model_chart(ui: &mut Ui, table: &ListingTable, state: &AppState) {
    let counts = charts::model_counts(table, &state.visible_indices);
    let top: Vec<(String, usize)> = counts.into_iter().take(MAX_MODEL_BARS).collect();
    let labels: Vec<String> = top.iter().map(|(model, _)| model.clone()).collect();

    let bars: Vec<Bar> = top
        .iter()
        .enumerate()
        .map(|(i, (model, n))| Bar::new(i as f64, *n as f64).name(model).width(0.7))
        .collect();

    Plot::new("model_histogram")
        .y_axis_label("Listings")
        .x_axis_formatter(move |mark, _range| category_tick(&labels, mark.value))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

/// Label integer tick positions with their category, leave the rest blank.
fn category_tick(labels: &[String], value: f64) -> String {
    let rounded = value.round();
    if (value - rounded).abs() > 0.01 || rounded < 0.0 {
        return String::new();
    }
    labels
        .get(rounded as usize)
        .cloned()
        .unwrap_or_default()
}

fn price_axis_label(log_price: bool) -> &'static str {
    if log_price {
        "log10(price)"
    } else {
        "Price"
    }
}

// ---------------------------------------------------------------------------
// Data preview table
// ---------------------------------------------------------------------------

fn preview_table(ui: &mut Ui, table: &ListingTable, state: &AppState) {
    use egui_extras::{Column, TableBuilder};

    let shown = state.visible_indices.len().min(PREVIEW_ROWS);
    if state.visible_indices.len() > shown {
        ui.label(format!(
            "Showing first {shown} of {} matching rows.",
            state.visible_indices.len()
        ));
    }

    TableBuilder::new(ui)
        .striped(true)
        .columns(Column::auto().at_least(60.0), table.headers.len())
        .header(20.0, |mut header| {
            for name in &table.headers {
                header.col(|ui: &mut Ui| {
                    ui.label(RichText::new(name.as_str()).strong());
                });
            }
        })
        .body(|body| {
            body.rows(18.0, shown, |mut row| {
                let listing = &table.rows[state.visible_indices[row.index()]];
                for name in &table.headers {
                    row.col(|ui: &mut Ui| {
                        ui.label(listing.cell(name));
                    });
                }
            });
        });
}
