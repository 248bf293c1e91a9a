//! Backend worker: owns the tokio runtime, the refresh timer and the slide rotation.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};

use board_core::{
    board::{load_cycle, BoardSnapshot, RenderTarget},
    rotator::{page_count, RotationHandle, SlideRotator},
    source::{source_from_location, RecordSource},
    PresentationMode, Settings,
};
use chrono::Local;
use crossbeam_channel::{Receiver, Sender, TrySendError};
use shared::error::{BoardError, ErrorNotice};
use tokio::time::{interval, MissedTickBehavior};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

/// The window, as seen from the worker. Detaches once the UI side hangs up.
struct UiChannelTarget {
    ui_tx: Sender<UiEvent>,
    attached: Arc<AtomicBool>,
}

impl UiChannelTarget {
    fn deliver(&self, event: UiEvent) {
        match self.ui_tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                tracing::warn!("ui event queue is full; dropping board update");
            }
            Err(TrySendError::Disconnected(_)) => {
                self.attached.store(false, Ordering::SeqCst);
            }
        }
    }
}

impl RenderTarget for UiChannelTarget {
    fn show_board(&mut self, snapshot: &BoardSnapshot) {
        self.deliver(UiEvent::BoardLoaded(Box::new(snapshot.clone())));
    }

    fn show_error(&mut self, notice: &ErrorNotice) {
        self.deliver(UiEvent::LoadFailed(notice.clone()));
    }
}

pub fn launch(
    cmd_tx: Sender<BackendCommand>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    settings: Settings,
) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let source = source_from_location(&settings.source);
            let attached = Arc::new(AtomicBool::new(true));
            let mut target = UiChannelTarget {
                ui_tx: ui_tx.clone(),
                attached: attached.clone(),
            };

            let refresh_task = spawn_refresh_timer(cmd_tx, settings.refresh_interval);
            let _ = ui_tx.try_send(UiEvent::Info(format!(
                "Backend worker ready; reading {}",
                source.name()
            )));

            let mut rotation: Option<RotationHandle> = None;
            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::Refresh => {
                        // The old timer must not advance pages of the next snapshot.
                        if let Some(handle) = rotation.take() {
                            handle.stop();
                        }

                        let render_target: Option<&mut dyn RenderTarget> =
                            if attached.load(Ordering::SeqCst) {
                                Some(&mut target)
                            } else {
                                None
                            };
                        let outcome =
                            load_cycle(source.as_ref(), render_target, &Local::now()).await;
                        let snapshot = match outcome {
                            Ok(snapshot) => snapshot,
                            Err(BoardError::MissingRenderTarget { .. }) => break,
                            Err(err) => {
                                target.deliver(UiEvent::Error(UiError::from_message(
                                    UiErrorContext::Refresh,
                                    err.to_string(),
                                )));
                                continue;
                            }
                        };

                        if settings.presentation_mode == PresentationMode::Grid {
                            rotation = start_rotation(&snapshot, &settings, ui_tx.clone());
                        }
                    }
                    BackendCommand::Shutdown => break,
                }
            }

            if let Some(handle) = rotation.take() {
                handle.stop();
            }
            if let Some(task) = refresh_task {
                task.abort();
            }
            tracing::info!("backend worker stopped");
        });
    });
}

/// Queues a refresh immediately and then once per `period`.
fn spawn_refresh_timer(
    cmd_tx: Sender<BackendCommand>,
    period: Duration,
) -> Option<tokio::task::JoinHandle<()>> {
    if period.is_zero() {
        let _ = cmd_tx.try_send(BackendCommand::Refresh);
        return None;
    }

    Some(tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match cmd_tx.try_send(BackendCommand::Refresh) {
                Ok(()) | Err(TrySendError::Full(_)) => {}
                Err(TrySendError::Disconnected(_)) => break,
            }
        }
    }))
}

fn start_rotation(
    snapshot: &BoardSnapshot,
    settings: &Settings,
    ui_tx: Sender<UiEvent>,
) -> Option<RotationHandle> {
    let pages = page_count(snapshot.grid_rows.len(), settings.rows_per_page);
    let handle = RotationHandle::spawn(
        SlideRotator::new(pages),
        settings.rotation_interval,
        move |index| {
            let _ = ui_tx.try_send(UiEvent::PageAdvanced(index));
        },
    );
    tracing::debug!(pages, rotating = handle.is_some(), "grid rotation prepared");
    handle
}
