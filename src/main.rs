use std::path::PathBuf;

use clap::Parser;
use eframe::{App, Frame, egui};
use egui::{Align, Color32, Layout, RichText, Ui};
use egui_extras::{Column, TableBuilder};
use tracing::info;

mod config;
mod editor;
mod error;
mod models;
mod routines;
mod store;

use config::Config;
use editor::{Action, Editor, NotificationLevel};
use error::Result;
use models::{tab_title, Category, WorkoutDay};
use store::{FileStore, ProgramStore};

const TITLE: &str = "Workout Program Manager";

/// Edit a weekly workout program, saved locally after every change
#[derive(Parser, Debug)]
#[command(name = "workout-manager")]
#[command(version, about, long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    RUST_LOG        Log filter (overrides --debug)")]
struct Cli {
    /// Storage file (default: ~/.workout-manager/storage.json)
    #[arg(short = 'f', long)]
    data_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short = 'd', long)]
    debug: bool,

    /// Replace the stored program with the default one before starting
    #[arg(long)]
    reset: bool,

    /// Print the stored program as JSON and exit
    #[arg(long)]
    print: bool,
}

fn configure_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_line_number(true)
        .with_target(false)
        .with_file(true)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    configure_logging(cli.debug || config.debug);

    let data_path = match cli.data_file {
        Some(path) => path,
        None => config.data_path()?,
    };
    let file = FileStore::open(data_path)?;
    info!("Using storage at {}", file.path().display());
    let mut store = ProgramStore::open(Box::new(file))?;
    if cli.reset {
        store.reset()?;
    }
    if cli.print {
        println!("{}", serde_json::to_string_pretty(store.program())?);
        return Ok(());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.effective_window_size())
            .with_title(TITLE),
        ..Default::default()
    };
    let editor = Editor::new(store);

    eframe::run_native(
        TITLE,
        options,
        Box::new(move |cc| {
            configure_style(&cc.egui_ctx);
            Ok(Box::new(WorkoutApp::new(editor)))
        }),
    )?;
    Ok(())
}

fn configure_style(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();
    style.text_styles.insert(
        egui::TextStyle::Body,
        egui::FontId::new(18.0, egui::FontFamily::Proportional),
    );
    style.text_styles.insert(
        egui::TextStyle::Button,
        egui::FontId::new(16.0, egui::FontFamily::Proportional),
    );
    style.text_styles.insert(
        egui::TextStyle::Heading,
        egui::FontId::new(28.0, egui::FontFamily::Proportional),
    );
    ctx.set_style(style);
}

struct WorkoutApp {
    editor: Editor,
}

impl WorkoutApp {
    fn new(editor: Editor) -> Self {
        WorkoutApp { editor }
    }
}

impl App for WorkoutApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        // Actions are applied after layout so rendering never sees a half-edited program.
        let mut actions = Vec::new();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.heading(TITLE);
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if ui.button("+ Add New Day").clicked() {
                        actions.push(Action::OpenAddDay);
                    }
                });
            });
            ui.add_space(6.0);
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            self.show_status_bar(ui, &mut actions);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_tabs(ui, &mut actions);
            ui.separator();
            ui.add_space(10.0);

            let selected = self.editor.selected_day().map(str::to_owned);
            let day = selected
                .as_deref()
                .and_then(|label| self.editor.program().get(label))
                .cloned();
            match (selected, day) {
                (Some(label), Some(day)) => self.show_day(ui, &label, &day, &mut actions),
                _ if self.editor.program().is_empty() => {
                    ui.label(
                        RichText::new("No workout days yet. Add one to get started.")
                            .weak(),
                    );
                }
                _ => {
                    ui.label(RichText::new("Pick a day above.").weak());
                }
            }
        });

        if self.editor.add_day_open {
            self.show_add_day_dialog(ctx, &mut actions);
        }

        for action in actions {
            self.editor.dispatch(action);
        }
    }
}

impl WorkoutApp {
    fn show_tabs(&self, ui: &mut Ui, actions: &mut Vec<Action>) {
        let selected = self.editor.selected_day();
        ui.horizontal_wrapped(|ui| {
            for label in self.editor.program().labels() {
                let tab = ui
                    .selectable_label(selected == Some(label), tab_title(label))
                    .on_hover_text(label);
                if tab.clicked() && selected != Some(label) {
                    actions.push(Action::SelectDay(label.to_string()));
                }
            }
        });
    }

    fn show_day(&mut self, ui: &mut Ui, label: &str, day: &WorkoutDay, actions: &mut Vec<Action>) {
        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                ui.label(RichText::new(label).size(24.0).strong());
                ui.label(RichText::new(&day.focus).weak());
            });
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                let delete = egui::Button::new(RichText::new("Delete Day").color(Color32::WHITE))
                    .fill(Color32::from_rgb(170, 40, 40));
                if ui.add(delete).clicked() {
                    actions.push(Action::DeleteDay(label.to_string()));
                }
            });
        });
        ui.add_space(10.0);

        self.show_exercise_table(ui, day, actions);

        ui.add_space(10.0);
        self.show_add_exercise_row(ui, actions);
    }

    fn show_exercise_table(&mut self, ui: &mut Ui, day: &WorkoutDay, actions: &mut Vec<Action>) {
        if day.exercises.is_empty() {
            ui.label(RichText::new("No exercises yet.").weak());
            return;
        }
        let height = (ui.available_height() - 60.0).max(120.0);
        let editing = &mut self.editor.editing;

        TableBuilder::new(ui)
            .striped(true)
            .max_scroll_height(height)
            .cell_layout(Layout::left_to_right(Align::Center))
            .column(Column::remainder().at_least(160.0))
            .column(Column::auto().at_least(110.0))
            .column(Column::auto().at_least(170.0))
            .column(Column::auto())
            .body(|mut body| {
                for exercise in &day.exercises {
                    body.row(34.0, |mut row| match editing.as_mut().filter(|e| e.id == exercise.id) {
                        Some(buffer) => {
                            row.col(|ui| {
                                ui.add(egui::TextEdit::singleline(&mut buffer.name));
                            });
                            row.col(|ui| {
                                ui.label(RichText::new(exercise.category.label()).weak());
                            });
                            row.col(|ui| {
                                ui.add(egui::TextEdit::singleline(&mut buffer.sets).desired_width(40.0));
                                ui.label("×");
                                ui.add(egui::TextEdit::singleline(&mut buffer.reps).desired_width(70.0));
                            });
                            row.col(|ui| {
                                if ui.button("Save").clicked() {
                                    actions.push(Action::SaveEdit);
                                }
                                if ui.button("Cancel").clicked() {
                                    actions.push(Action::CancelEdit);
                                }
                            });
                        }
                        None => {
                            row.col(|ui| {
                                ui.label(RichText::new(&exercise.name).strong());
                            });
                            row.col(|ui| {
                                ui.label(RichText::new(exercise.category.label()).weak());
                            });
                            row.col(|ui| {
                                ui.label(exercise.summary());
                            });
                            row.col(|ui| {
                                if ui.button("Edit").clicked() {
                                    actions.push(Action::BeginEdit(exercise.id));
                                }
                                if ui.button("Delete").clicked() {
                                    actions.push(Action::DeleteExercise(exercise.id));
                                }
                            });
                        }
                    });
                }
            });
    }

    fn show_add_exercise_row(&mut self, ui: &mut Ui, actions: &mut Vec<Action>) {
        let draft = &mut self.editor.new_exercise;
        ui.horizontal(|ui| {
            egui::ComboBox::from_id_salt("new_exercise_category")
                .selected_text(draft.category.map_or("Category", |c| c.label()))
                .show_ui(ui, |ui| {
                    for category in Category::ALL {
                        ui.selectable_value(&mut draft.category, Some(category), category.label());
                    }
                });
            ui.add(
                egui::TextEdit::singleline(&mut draft.name)
                    .hint_text("Exercise name")
                    .desired_width(220.0),
            );
            ui.add(
                egui::TextEdit::singleline(&mut draft.sets)
                    .hint_text("Sets")
                    .desired_width(60.0),
            );
            ui.add(
                egui::TextEdit::singleline(&mut draft.reps)
                    .hint_text("Reps")
                    .desired_width(80.0),
            );
            if ui.button("Add").clicked() {
                actions.push(Action::SubmitNewExercise);
            }
        });
    }

    fn show_add_day_dialog(&mut self, ctx: &egui::Context, actions: &mut Vec<Action>) {
        let mut open = true;
        let draft = &mut self.editor.new_day;
        egui::Window::new("Add New Workout Day")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.add_space(8.0);
                ui.add(egui::TextEdit::singleline(&mut draft.name).hint_text("Day Name"));
                ui.add_space(6.0);
                ui.add(
                    egui::TextEdit::singleline(&mut draft.focus)
                        .hint_text("Focus (e.g., Chest, Back)"),
                );
                ui.add_space(8.0);
                if ui.button("Add Day").clicked() {
                    actions.push(Action::SubmitNewDay);
                }
            });
        if !open {
            actions.push(Action::CloseAddDay);
        }
    }

    fn show_status_bar(&self, ui: &mut Ui, actions: &mut Vec<Action>) {
        ui.horizontal(|ui| {
            if let Some(notification) = self.editor.notification() {
                let color = match notification.level {
                    NotificationLevel::Error => ui.visuals().error_fg_color,
                    NotificationLevel::Info => Color32::from_rgb(90, 170, 90),
                };
                ui.label(RichText::new(&notification.message).color(color));
                if ui.small_button("Dismiss").clicked() {
                    actions.push(Action::DismissNotification);
                }
            }
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                match self.editor.last_saved() {
                    Some(at) => ui.label(RichText::new(format!("Saved at {}", at.format("%H:%M:%S"))).weak()),
                    None => ui.label(RichText::new("Not saved yet").weak()),
                };
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::parse_from(["workout-manager", "-f", "/tmp/gym.json", "--reset", "-d"]);
        assert_eq!(cli.data_file, Some(PathBuf::from("/tmp/gym.json")));
        assert!(cli.reset);
        assert!(cli.debug);
        assert!(!cli.print);
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["workout-manager"]);
        assert!(cli.data_file.is_none());
        assert!(!cli.reset && !cli.debug && !cli.print);
    }
}
