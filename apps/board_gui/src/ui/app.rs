use std::time::Duration;

use board_core::{AnimationTuning, BoardSnapshot, PresentationMode, Settings};
use crossbeam_channel::{Receiver, Sender, TryRecvError};
use eframe::egui;
use shared::error::ErrorNotice;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{err_label, UiError, UiErrorContext, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::ui::{grid::GridBoard, marquee::MarqueeBoard};

const MAX_EVENTS_PER_FRAME: usize = 64;

pub struct BoardApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    mode: PresentationMode,
    rows_per_page: usize,
    tuning: AnimationTuning,
    status: String,
    status_banner: Option<UiError>,
    snapshot: Option<Box<BoardSnapshot>>,
    notice: Option<ErrorNotice>,
    marquee: MarqueeBoard,
    grid: GridBoard,
}

impl BoardApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        settings: &Settings,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            mode: settings.presentation_mode,
            rows_per_page: settings.rows_per_page,
            tuning: settings.animation_tuning(),
            status: "Starting...".to_string(),
            status_banner: None,
            snapshot: None,
            notice: None,
            marquee: MarqueeBoard::default(),
            grid: GridBoard::default(),
        }
    }

    fn process_ui_events(&mut self) {
        for _ in 0..MAX_EVENTS_PER_FRAME {
            let event = match self.ui_rx.try_recv() {
                Ok(event) => event,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if self.status_banner.is_none() {
                        self.status_banner = Some(UiError::from_message(
                            UiErrorContext::General,
                            "Backend worker disconnected; restart the board",
                        ));
                    }
                    break;
                }
            };

            match event {
                UiEvent::Info(message) => self.status = message,
                UiEvent::BoardLoaded(snapshot) => {
                    self.status = format!(
                        "Loaded {} scheduled shipments at {}",
                        snapshot.classification.scheduled_count(),
                        snapshot.loaded_at.format("%H:%M:%S")
                    );
                    self.status_banner = None;
                    self.notice = None;
                    self.marquee.reset();
                    self.grid.load(snapshot.grid_rows.clone(), self.rows_per_page);
                    self.snapshot = Some(snapshot);
                }
                UiEvent::LoadFailed(notice) => {
                    self.snapshot = None;
                    self.marquee.reset();
                    self.grid.load(Vec::new(), self.rows_per_page);
                    self.notice = Some(notice);
                }
                UiEvent::PageAdvanced(index) => self.grid.show_page(index),
                UiEvent::Error(err) => {
                    tracing::warn!(context = ?err.context(), "{}", err.message());
                    self.status_banner = Some(err);
                }
            }
        }
    }

    fn request_refresh(&mut self) {
        let before = self.status.clone();
        dispatch_backend_command(&self.cmd_tx, BackendCommand::Refresh, &mut self.status);
        if self.status != before {
            self.status_banner = Some(UiError::from_message(
                UiErrorContext::General,
                self.status.clone(),
            ));
        } else {
            self.status = "Refreshing...".to_string();
        }
    }

    fn show_top_bar(&mut self, ctx: &egui::Context) {
        let heading = match &self.snapshot {
            Some(snapshot) => format!("Shipments - {}", snapshot.today.format("%A %m/%d/%Y")),
            None => "Shipments".to_string(),
        };
        let mode_label = self.mode.to_string();
        let mut refresh_clicked = false;

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(heading);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    refresh_clicked = ui.button("Refresh").clicked();
                    ui.label(egui::RichText::new(mode_label).weak());
                });
            });
        });

        if refresh_clicked {
            self.request_refresh();
        }
    }

    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(err) = &self.status_banner {
                    ui.colored_label(
                        ui.visuals().error_fg_color,
                        format!("{}: {}", err_label(err.category()), err.message()),
                    );
                } else {
                    ui.label(egui::RichText::new(&self.status).weak());
                }
            });
        });
    }

    fn show_notice(ui: &mut egui::Ui, notice: &ErrorNotice) {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() / 3.0);
            ui.label(
                egui::RichText::new(&notice.message)
                    .size(28.0)
                    .color(ui.visuals().error_fg_color),
            );
            ui.label(egui::RichText::new("The board will update on the next refresh.").weak());
        });
    }

    /// Returns whether anything on screen is still moving.
    fn show_board(&mut self, ctx: &egui::Context) -> bool {
        let now = ctx.input(|input| input.time);
        let mut animating = false;
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(notice) = &self.notice {
                Self::show_notice(ui, notice);
                return;
            }
            let Some(snapshot) = &self.snapshot else {
                ui.centered_and_justified(|ui| {
                    ui.spinner();
                });
                return;
            };

            let policy = self.mode.overflow_policy();
            animating = match self.mode {
                PresentationMode::Marquee => {
                    self.marquee
                        .show(ui, &snapshot.classification, policy, &self.tuning, now)
                }
                PresentationMode::Grid => self.grid.show(ui, policy, &self.tuning, now),
            };
        });
        animating
    }
}

impl eframe::App for BoardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        self.show_top_bar(ctx);
        self.show_status_bar(ctx);
        let animating = self.show_board(ctx);

        if animating {
            ctx.request_repaint_after(Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(Duration::from_millis(250));
        }
    }
}

impl Drop for BoardApp {
    fn drop(&mut self) {
        let _ = self.cmd_tx.try_send(BackendCommand::Shutdown);
    }
}
