use std::path::PathBuf;

use chrono::{DateTime, Local};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;

use crate::backend_bridge::commands::BackendCommand;
use crate::config::{self, Settings};
use crate::controller::events::UiEvent;
use crate::controller::orchestration::dispatch_backend_command;
use crate::controller::reducer::{ControllerState, FormFields, GenerationPhase};

const CONTENT_TYPES: &[&str] = &["blog post", "article", "social media post", "newsletter"];
const TONES: &[&str] = &[
    "informative",
    "casual",
    "formal",
    "persuasive",
    "enthusiastic",
];

fn server_environment_label(server_url: &str) -> &'static str {
    let server = server_url.to_ascii_lowercase();
    if server.contains("127.0.0.1") || server.contains("localhost") {
        "Local"
    } else if server.contains("staging") {
        "Staging"
    } else if server.contains("dev") {
        "Development"
    } else {
        "Production"
    }
}

pub struct StudioApp {
    state: ControllerState,
    server_url: String,
    settings_path: PathBuf,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    last_event_at: Option<DateTime<Local>>,
}

impl StudioApp {
    pub fn new(
        settings: Settings,
        settings_path: PathBuf,
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
    ) -> Self {
        let form = FormFields {
            topic: settings.topic,
            content_type: settings.content_type,
            target_audience: settings.target_audience,
            tone: settings.tone,
        };
        Self {
            state: ControllerState::new(form),
            server_url: settings.server_url,
            settings_path,
            cmd_tx,
            ui_rx,
            last_event_at: None,
        }
    }

    fn drain_backend_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            self.last_event_at = Some(Local::now());
            self.state.apply(event);
        }
    }

    fn persist_form(&self) {
        let settings = Settings {
            server_url: self.server_url.clone(),
            topic: self.state.form.topic.clone(),
            content_type: self.state.form.content_type.clone(),
            target_audience: self.state.form.target_audience.clone(),
            tone: self.state.form.tone.clone(),
        };
        if let Err(err) = config::save_settings(&self.settings_path, &settings) {
            tracing::warn!("failed to persist settings: {err}");
        }
    }

    fn form_ui(&mut self, ui: &mut egui::Ui) {
        ui.heading("Describe the content");
        ui.add_space(4.0);

        ui.label("Topic");
        ui.text_edit_singleline(&mut self.state.form.topic);

        ui.label("Content type");
        egui::ComboBox::from_id_salt("content_type")
            .selected_text(self.state.form.content_type.clone())
            .show_ui(ui, |ui| {
                for option in CONTENT_TYPES {
                    ui.selectable_value(
                        &mut self.state.form.content_type,
                        (*option).to_string(),
                        *option,
                    );
                }
            });

        ui.label("Target audience");
        ui.text_edit_singleline(&mut self.state.form.target_audience);

        ui.label("Tone");
        egui::ComboBox::from_id_salt("tone")
            .selected_text(self.state.form.tone.clone())
            .show_ui(ui, |ui| {
                for option in TONES {
                    ui.selectable_value(&mut self.state.form.tone, (*option).to_string(), *option);
                }
            });

        ui.add_space(8.0);
        let trigger = ui.add_enabled(
            self.state.trigger_enabled(),
            egui::Button::new(self.state.trigger_label()),
        );
        if trigger.clicked() {
            if let Some(cmd) = self.state.submit() {
                dispatch_backend_command(&self.cmd_tx, cmd, &mut self.state.status);
                self.persist_form();
            }
        }

        if self.state.loading_visible() {
            ui.horizontal(|ui| {
                ui.add(egui::Spinner::new());
                if let Some(note) = self.state.loading_note() {
                    ui.label(note);
                }
            });
        }
    }

    fn result_ui(&self, ui: &mut egui::Ui) {
        match &self.state.phase {
            GenerationPhase::Result { view } => {
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        ui.heading("Generated Content");
                        ui.label(&view.final_output);
                        for section in &view.sections {
                            ui.separator();
                            ui.strong(format!("Task {}", section.task_id.0));
                            ui.label(&section.output);
                        }
                    });
            }
            GenerationPhase::Failed { message } => {
                ui.colored_label(
                    egui::Color32::from_rgb(0xcc, 0x33, 0x33),
                    format!("Error: {message}"),
                );
            }
            _ => {}
        }
    }
}

impl eframe::App for StudioApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_backend_events();
        // Keep polling the bridge channel while idle; tighten while a run
        // is in flight so the terminal event lands promptly.
        if self.state.loading_visible() {
            ctx.request_repaint_after(std::time::Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        egui::TopBottomPanel::top("studio_header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Content Generation Studio");
                ui.label(egui::RichText::new(server_environment_label(&self.server_url)).weak());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if let Some(at) = self.last_event_at {
                        ui.label(
                            egui::RichText::new(format!("updated {}", at.format("%H:%M:%S")))
                                .weak(),
                        );
                    }
                    if !self.state.status.is_empty() {
                        ui.label(self.state.status.clone());
                    }
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.wide_layout {
                ui.columns(2, |columns| {
                    self.form_ui(&mut columns[0]);
                    self.result_ui(&mut columns[1]);
                });
            } else {
                self.form_ui(ui);
                ui.add_space(12.0);
                self.result_ui(ui);
            }
        });
    }
}
