use std::f32::consts::{FRAC_PI_2, TAU};
use std::ops::RangeInclusive;

use eframe::egui::{self, Align2, Color32, FontId, RichText, Sense, Stroke, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Line, Plot, PlotPoint,
    PlotPoints, Points, Text,
};

use silent_struggle::aggregate::{CategorySeries, CrossTab, DistributionTable, GroupedNumeric};

use crate::color;

// ---------------------------------------------------------------------------
// Shared plot setup
// ---------------------------------------------------------------------------

/// A static plot: the page is read, not explored.
fn static_plot(id: &str, height: f32) -> Plot {
    Plot::new(id)
        .height(height)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .allow_double_click_reset(false)
        .show_background(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
}

/// Axis formatter printing `labels[i]` at integer positions only.
fn category_axis(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let idx = mark.value.round();
        if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    }
}

fn max_percent<'a>(values: impl Iterator<Item = &'a f64>) -> f64 {
    values.copied().fold(0.0, f64::max)
}

// ---------------------------------------------------------------------------
// Horizontal bars (stress gap)
// ---------------------------------------------------------------------------

/// Ascending horizontal bars; the largest share is highlighted.
pub fn ranked_bars(ui: &mut Ui, id: &str, series: &CategorySeries) {
    let top = max_percent(series.iter().map(|e| &e.percent));
    let bars: Vec<Bar> = series
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let fill = if e.percent >= top { color::CLAY } else { color::ASH };
            Bar::new(i as f64, e.percent)
                .name(&e.category)
                .fill(fill)
                .width(0.6)
        })
        .collect();
    let labels: Vec<String> = series.iter().map(|e| e.category.clone()).collect();

    static_plot(id, 40.0 * series.len().max(3) as f32)
        .show_axes([false, true])
        .include_x(0.0)
        .include_x(top * 1.15 + 1.0)
        .y_axis_formatter(category_axis(labels))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal());
            for (i, e) in series.iter().enumerate() {
                plot_ui.text(
                    Text::new(PlotPoint::new(e.percent + top * 0.02, i as f64), format!("{:.1}%", e.percent))
                        .color(color::BONE)
                        .anchor(Align2::LEFT_CENTER),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Lollipop (global headspace)
// ---------------------------------------------------------------------------

pub fn lollipop(ui: &mut Ui, id: &str, series: &CategorySeries) {
    let top = max_percent(series.iter().map(|e| &e.percent));
    let labels: Vec<String> = series.iter().map(|e| e.category.clone()).collect();
    let heads: PlotPoints = series
        .iter()
        .enumerate()
        .map(|(i, e)| [e.percent, i as f64])
        .collect();

    static_plot(id, 28.0 * series.len().max(4) as f32)
        .show_axes([false, true])
        .include_x(0.0)
        .include_x(top * 1.15 + 1.0)
        .y_axis_formatter(category_axis(labels))
        .show(ui, |plot_ui| {
            for (i, e) in series.iter().enumerate() {
                let stem = PlotPoints::from(vec![[0.0, i as f64], [e.percent, i as f64]]);
                plot_ui.line(Line::new(stem).color(color::ASH.gamma_multiply(0.4)).width(1.0));
                plot_ui.text(
                    Text::new(PlotPoint::new(e.percent + top * 0.03, i as f64), format!("{:.0}%", e.percent))
                        .color(color::ASH)
                        .anchor(Align2::LEFT_CENTER),
                );
            }
            plot_ui.points(Points::new(heads).radius(6.0).color(color::SAGE).filled(true));
        });
}

// ---------------------------------------------------------------------------
// Box plots (age distribution)
// ---------------------------------------------------------------------------

/// One box per group with its mean written above; empty groups say so.
pub fn distribution_boxes(ui: &mut Ui, id: &str, summary: &GroupedNumeric, titles: &[&str]) {
    let fills = [color::CLAY, color::ASH];
    let ceiling = summary
        .groups
        .iter()
        .filter_map(|g| g.max())
        .fold(0.0, f64::max);
    let labels: Vec<String> = std::iter::once(String::new())
        .chain(summary.groups.iter().enumerate().map(|(i, g)| {
            titles.get(i).map_or_else(|| g.label.clone(), |t| t.to_string())
        }))
        .collect();

    let boxes: Vec<BoxElem> = summary
        .groups
        .iter()
        .enumerate()
        .filter_map(|(i, g)| {
            let spread = BoxSpread::new(
                g.min()?,
                g.quantile(0.25)?,
                g.median?,
                g.quantile(0.75)?,
                g.max()?,
            );
            let fill = fills[i % fills.len()];
            Some(
                BoxElem::new((i + 1) as f64, spread)
                    .name(&g.label)
                    .fill(fill.gamma_multiply(0.6))
                    .stroke(Stroke::new(1.5, fill))
                    .box_width(0.5),
            )
        })
        .collect();

    static_plot(id, 320.0)
        .show_axes([true, true])
        .include_x(0.4)
        .include_x(summary.groups.len() as f64 + 0.6)
        .include_y(0.0)
        .include_y(ceiling * 1.15 + 1.0)
        .x_axis_formatter(category_axis(labels))
        .show(ui, |plot_ui| {
            plot_ui.box_plot(BoxPlot::new(boxes));
            for (i, g) in summary.groups.iter().enumerate() {
                let text = match g.mean {
                    Some(mean) => format!("Mean: {mean:.1}y"),
                    None => "no data".to_string(),
                };
                plot_ui.text(
                    Text::new(PlotPoint::new((i + 1) as f64, ceiling * 1.08 + 0.5), text)
                        .color(fills[i % fills.len()]),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Heatmap (habit loop)
// ---------------------------------------------------------------------------

/// Grid of cells shaded by percentage. Absent cells print a dash.
pub fn heatmap(ui: &mut Ui, id: &str, tab: &CrossTab) {
    ui.push_id(id, |ui| {
        TableBuilder::new(ui)
            .striped(false)
            .resizable(false)
            .vscroll(false)
            .cell_layout(egui::Layout::centered_and_justified(egui::Direction::LeftToRight))
            .column(TableColumn::exact(150.0))
            .columns(TableColumn::remainder(), tab.column_labels.len())
            .header(28.0, |mut header| {
                header.col(|ui| {
                    ui.label(RichText::new(&tab.row_column).monospace().color(color::ASH));
                });
                for label in &tab.column_labels {
                    header.col(|ui| {
                        ui.strong(label);
                    });
                }
            })
            .body(|mut body| {
                for row_label in &tab.row_labels {
                    body.row(40.0, |mut row| {
                        row.col(|ui| {
                            ui.label(RichText::new(row_label).monospace());
                        });
                        for col_label in &tab.column_labels {
                            row.col(|ui| match tab.get(row_label, col_label) {
                                Some(value) => {
                                    ui.painter().rect_filled(
                                        ui.max_rect().shrink(1.5),
                                        3.0,
                                        color::heat_color(value),
                                    );
                                    ui.label(
                                        RichText::new(format!("{value:.0}%"))
                                            .monospace()
                                            .color(color::heat_text_color(value)),
                                    );
                                }
                                None => {
                                    ui.label(RichText::new("–").color(color::ASH));
                                }
                            });
                        }
                    });
                }
            });
    });
}

// ---------------------------------------------------------------------------
// Donut
// ---------------------------------------------------------------------------

/// Ring of shares, clockwise from twelve o'clock, with a legend below.
pub fn donut(ui: &mut Ui, series: &CategorySeries, center_label: &str, diameter: f32) {
    let colors: Vec<Color32> = {
        let fallback = color::category_colors(series.len());
        series
            .iter()
            .zip(fallback)
            .map(|(e, c)| color::answer_color(&e.category, c))
            .collect()
    };

    ui.vertical_centered(|ui| {
        let (rect, _) = ui.allocate_exact_size(egui::vec2(diameter, diameter), Sense::hover());
        let painter = ui.painter_at(rect);
        let center = rect.center();
        let thickness = diameter * 0.2;
        let radius = diameter / 2.0 - thickness / 2.0 - 2.0;

        let mut start = -FRAC_PI_2;
        for (entry, &fill) in series.iter().zip(&colors) {
            let sweep = TAU * (entry.percent / 100.0) as f32;
            if sweep <= 0.0 {
                continue;
            }
            let steps = ((sweep / TAU) * 120.0).ceil().max(2.0) as usize;
            let arc: Vec<egui::Pos2> = (0..=steps)
                .map(|s| {
                    let a = start + sweep * s as f32 / steps as f32;
                    center + radius * egui::vec2(a.cos(), a.sin())
                })
                .collect();
            painter.add(egui::Shape::line(arc, Stroke::new(thickness, fill)));

            let mid = start + sweep / 2.0;
            painter.text(
                center + radius * egui::vec2(mid.cos(), mid.sin()),
                Align2::CENTER_CENTER,
                format!("{:.1}%", entry.percent),
                FontId::monospace(10.0),
                if fill == color::CLAY { color::BACKGROUND } else { color::BONE },
            );
            start += sweep;
        }

        painter.text(
            center,
            Align2::CENTER_CENTER,
            center_label,
            FontId::monospace(11.0),
            color::ASH,
        );

        legend_row(ui, series.iter().map(|e| e.category.as_str()).zip(colors.iter().copied()));
    });
}

fn legend_row<'a>(ui: &mut Ui, entries: impl Iterator<Item = (&'a str, Color32)>) {
    ui.horizontal_wrapped(|ui| {
        for (label, fill) in entries {
            let (swatch, _) = ui.allocate_exact_size(egui::vec2(10.0, 10.0), Sense::hover());
            ui.painter().rect_filled(swatch, 2.0, fill);
            ui.label(RichText::new(label).small().monospace());
            ui.add_space(6.0);
        }
    });
}

// ---------------------------------------------------------------------------
// Stacked horizontal bars (gender divide)
// ---------------------------------------------------------------------------

/// One bar per row label, split into the column labels' shares.
pub fn stacked_bars(ui: &mut Ui, id: &str, tab: &CrossTab) {
    let mut fills = vec![color::CHARCOAL, color::CLAY];
    if tab.column_labels.len() > fills.len() {
        fills.extend(color::generate_palette(tab.column_labels.len() - fills.len()));
    }

    let mut charts: Vec<BarChart> = Vec::new();
    for (j, label) in tab.column_labels.iter().enumerate() {
        let bars: Vec<Bar> = tab
            .row_labels
            .iter()
            .enumerate()
            .map(|(i, row)| {
                Bar::new(i as f64, tab.get(row, label).unwrap_or(0.0))
                    .name(row)
                    .fill(fills[j])
                    .width(0.6)
            })
            .collect();
        let mut chart = BarChart::new(bars).name(label).color(fills[j]).horizontal();
        if !charts.is_empty() {
            let below: Vec<&BarChart> = charts.iter().collect();
            chart = chart.stack_on(&below);
        }
        charts.push(chart);
    }

    // segment centres for the labels
    let mut annotations = Vec::new();
    for (i, row) in tab.row_labels.iter().enumerate() {
        let mut offset = 0.0;
        for label in &tab.column_labels {
            let value = tab.get(row, label).unwrap_or(0.0);
            if value >= 5.0 {
                annotations.push((offset + value / 2.0, i as f64, format!("{value:.0}%")));
            }
            offset += value;
        }
    }

    static_plot(id, 60.0 * tab.row_labels.len().max(2) as f32)
        .show_axes([false, true])
        .include_x(0.0)
        .include_x(100.0)
        .y_axis_formatter(category_axis(tab.row_labels.clone()))
        .legend(Legend::default())
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
            for (x, y, text) in annotations {
                plot_ui.text(Text::new(PlotPoint::new(x, y), text).color(color::BONE));
            }
        });
}

// ---------------------------------------------------------------------------
// Grouped vertical bars (symptom triad)
// ---------------------------------------------------------------------------

pub fn grouped_bars(ui: &mut Ui, id: &str, dist: &DistributionTable, titles: &[&str]) {
    let n = dist.categories.len().max(1);
    let width = 0.8 / n as f64;
    let generated = color::category_colors(n);
    let labels: Vec<String> = dist
        .columns
        .iter()
        .enumerate()
        .map(|(i, c)| titles.get(i).map_or_else(|| c.clone(), |t| t.to_string()))
        .collect();

    let charts: Vec<BarChart> = dist
        .categories
        .iter()
        .enumerate()
        .map(|(k, category)| {
            let fill = color::answer_color(category, generated[k]);
            let bars: Vec<Bar> = dist
                .percents
                .iter()
                .enumerate()
                .map(|(i, row)| {
                    let x = i as f64 - 0.4 + width * (k as f64 + 0.5);
                    Bar::new(x, row[k]).name(category).fill(fill).width(width * 0.95)
                })
                .collect();
            BarChart::new(bars).name(category).color(fill)
        })
        .collect();

    static_plot(id, 280.0)
        .show_axes([true, true])
        .include_y(0.0)
        .include_x(-0.6)
        .include_x(dist.columns.len() as f64 - 0.4)
        .x_axis_formatter(category_axis(labels))
        .legend(Legend::default())
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

// ---------------------------------------------------------------------------
// Headline number
// ---------------------------------------------------------------------------

pub fn headline(ui: &mut Ui, caption: &str, percent: f64) {
    ui.horizontal(|ui| {
        ui.label(RichText::new(caption).monospace().color(color::ASH));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(RichText::new(format!("{percent:.1}%")).size(44.0).color(color::CLAY));
        });
    });
}
