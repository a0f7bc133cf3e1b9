use eframe::egui::{self, RichText, Stroke, Ui};

use silent_struggle::dashboard::ChartResult;
use silent_struggle::AggregateError;

use crate::color;
use crate::state::AppState;
use crate::ui::plot;

// ---------------------------------------------------------------------------
// Building blocks
// ---------------------------------------------------------------------------

fn card<R>(ui: &mut Ui, add_contents: impl FnOnce(&mut Ui) -> R) -> R {
    egui::Frame::group(ui.style())
        .fill(color::CARD)
        .stroke(Stroke::NONE)
        .inner_margin(16.0)
        .show(ui, add_contents)
        .inner
}

/// Shown in place of a chart whose aggregation failed.
fn placeholder(ui: &mut Ui, err: &AggregateError) {
    card(ui, |ui| {
        ui.set_min_height(80.0);
        ui.vertical_centered(|ui| {
            ui.label(RichText::new("NO DATA").monospace().color(color::CLAY));
            ui.label(RichText::new(err.to_string()).small().color(color::ASH));
        });
    });
}

/// Draw `result` with `draw`, or a placeholder when it failed.
fn chart<T>(ui: &mut Ui, result: &ChartResult<T>, draw: impl FnOnce(&mut Ui, &T)) {
    match result {
        Ok(value) => draw(ui, value),
        Err(err) => placeholder(ui, err),
    }
}

fn section_heading(ui: &mut Ui, number: u8, title: &str, lede: &str) {
    ui.add_space(72.0);
    ui.heading(RichText::new(format!("{number:02}. {title}")).size(28.0));
    ui.label(RichText::new(lede).color(color::ASH));
    ui.add_space(16.0);
}

fn aside(ui: &mut Ui, title: &str, body: &str) {
    ui.horizontal(|ui| {
        let (bar, _) = ui.allocate_exact_size(egui::vec2(2.0, 90.0), egui::Sense::hover());
        ui.painter().rect_filled(bar, 0.0, color::CLAY);
        ui.add_space(12.0);
        ui.vertical(|ui| {
            ui.label(RichText::new(title).size(22.0).strong());
            ui.label(body);
        });
    });
}

// ---------------------------------------------------------------------------
// The page
// ---------------------------------------------------------------------------

/// Render every section, top to bottom.
pub fn page(ui: &mut Ui, state: &AppState) {
    let dash = &state.dashboard;

    hero(ui, state);

    section_heading(
        ui,
        1,
        "The Stress Gap",
        "Share of each occupation reporting growing stress.",
    );
    card(ui, |ui| {
        chart(ui, &dash.stress_by_occupation, |ui, series| {
            plot::ranked_bars(ui, "stress_gap", series);
        });
    });

    section_heading(
        ui,
        2,
        "Age & Stress",
        "Does age correlate with the perceived rise in stress?",
    );
    ui.columns(2, |cols| {
        aside(
            &mut cols[0],
            "Generational Weight.",
            "Clay marks respondents reporting growing stress; ash marks those who do not.",
        );
        card(&mut cols[1], |ui| {
            chart(ui, &dash.age_by_stress, |ui, ages| {
                plot::distribution_boxes(
                    ui,
                    "age_by_stress",
                    ages,
                    &["Growing Stress: YES", "Growing Stress: NO"],
                );
            });
        });
    });

    section_heading(
        ui,
        3,
        "Global Headspace",
        "Respondents with a mental health history, by country of residence.",
    );
    card(ui, |ui| {
        chart(ui, &dash.history_by_country, |ui, series| {
            if series.is_empty() {
                ui.label(RichText::new("No country has enough respondents.").color(color::ASH));
            } else {
                plot::lollipop(ui, "global_headspace", series);
            }
        });
    });

    section_heading(
        ui,
        4,
        "The Habit Loop",
        "Isolation (days indoors) against emotional volatility (mood swings).",
    );
    ui.columns(2, |cols| {
        card(&mut cols[0], |ui| {
            chart(ui, &dash.habit_loop, |ui, tab| plot::heatmap(ui, "habit_loop", tab));
        });
        aside(
            &mut cols[1],
            "Isolation Amplifies.",
            "Each column sums to 100%: how every mood-swing level spreads across time spent indoors.",
        );
    });

    section_heading(
        ui,
        5,
        "Coping & Care",
        "Who struggles to cope, and who seeks treatment.",
    );
    ui.columns(2, |cols| {
        card(&mut cols[0], |ui| {
            chart(ui, &dash.coping_struggles, |ui, series| {
                plot::donut(ui, series, "COPING\nSTRUGGLES", 240.0);
            });
        });
        card(&mut cols[1], |ui| {
            ui.label(RichText::new("THE GENDER DIVIDE").monospace().color(color::ASH));
            chart(ui, &dash.gender_treatment, |ui, tab| {
                plot::stacked_bars(ui, "gender_treatment", tab);
            });
        });
    });

    section_heading(
        ui,
        6,
        "The Holistic View",
        "Behavioural symptoms and systemic responsiveness.",
    );
    chart(ui, &dash.self_employed, |ui, rate| {
        plot::headline(ui, "DEMOGRAPHIC CONTEXT · SELF-EMPLOYED", rate.percent);
    });
    ui.add_space(16.0);
    ui.columns(2, |cols| {
        card(&mut cols[0], |ui| {
            ui.vertical_centered(|ui| {
                ui.label(RichText::new("SYMPTOM TRIAD").monospace().color(color::ASH));
            });
            chart(ui, &dash.symptom_triad, |ui, dist| {
                plot::grouped_bars(
                    ui,
                    "symptom_triad",
                    dist,
                    &["Habit Changes", "Work Interest", "Social Weakness"],
                );
            });
        });
        card(&mut cols[1], |ui| {
            ui.vertical_centered(|ui| {
                ui.label(RichText::new("SYSTEMIC & HISTORY").monospace().color(color::ASH));
            });
            ui.columns(dash.systemic_factors.len().max(1), |panels| {
                for (ui, panel) in panels.iter_mut().zip(&dash.systemic_factors) {
                    chart(ui, &panel.series, |ui, series| {
                        plot::donut(ui, series, &panel.title.replace(' ', "\n"), 140.0);
                    });
                }
            });
        });
    });

    ui.add_space(100.0);
}

fn hero(ui: &mut Ui, state: &AppState) {
    ui.add_space(48.0);
    ui.columns(2, |cols| {
        let ui = &mut cols[0];
        ui.label(RichText::new("The Silent").size(56.0));
        ui.label(RichText::new("Struggle.").size(56.0).color(color::CLAY));
        ui.label(
            RichText::new(format!(
                "DATA SOURCE: GLOBAL MENTAL HEALTH SURVEY • N={}",
                state.table.n_rows()
            ))
            .monospace()
            .color(color::ASH),
        );
        ui.add_space(16.0);
        ui.label("\"How does your mind feel today?\" An exploration of stress and isolation at work.");

        card(&mut cols[1], |ui| {
            ui.label(RichText::new("Snapshot").size(22.0));
            chart(ui, &state.dashboard.growing_stress, |ui, rate| {
                plot::headline(ui, "GROWING STRESS", rate.percent);
                ui.label(
                    RichText::new("of respondents feel their stress is increasing.")
                        .small()
                        .color(color::ASH),
                );
            });
        });
    });

    if let Some(message) = &state.status_message {
        ui.add_space(8.0);
        ui.label(RichText::new(message).small().color(color::CLAY));
    }
}
