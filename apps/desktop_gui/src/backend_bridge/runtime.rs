//! Runtime bridge between the UI command queue and the generation client.
//!
//! The egui thread never touches the network: a dedicated worker thread owns
//! a tokio runtime, drains [`BackendCommand`]s, and forwards client events
//! back over the UI channel.

use std::thread;

use crossbeam_channel::{Receiver, Sender};

use client_core::{ClientEvent, GenerationClient};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{classify_submit_failure, UiError, UiErrorContext, UiEvent};

pub fn launch(server_url: String, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
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
            let client = GenerationClient::new(server_url);

            // The event socket is registered once at startup; terminal
            // events for accepted jobs arrive only through it.
            match client.connect().await {
                Ok(()) => {
                    let _ = ui_tx.try_send(UiEvent::Info("Connected to event socket".to_string()));
                }
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                        UiErrorContext::BackendStartup,
                        format!("event socket unavailable: {err}"),
                    )));
                    tracing::error!("event socket connect failed: {err}");
                }
            }

            let mut events = client.subscribe_events();
            let ui_tx_clone = ui_tx.clone();
            let forward_task = tokio::spawn(async move {
                while let Ok(event) = events.recv().await {
                    let evt = match event {
                        ClientEvent::Accepted { job_id } => UiEvent::Accepted { job_id },
                        ClientEvent::Completed { job_id, result } => {
                            UiEvent::Completed { job_id, result }
                        }
                        ClientEvent::Failed { job_id, error } => UiEvent::Failed { job_id, error },
                        ClientEvent::Error(message) => UiEvent::Error(UiError::from_message(
                            UiErrorContext::EventStream,
                            message,
                        )),
                    };
                    let _ = ui_tx_clone.try_send(evt);
                }
            });

            let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));
            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::SubmitGeneration { request } => {
                        tracing::info!(topic = %request.topic, "backend: submit_generation");
                        if let Err(err) = client.submit(&request).await {
                            tracing::error!("backend: submit_generation failed: {err}");
                            let _ = ui_tx.try_send(UiEvent::SubmitFailed {
                                message: classify_submit_failure(&err),
                            });
                        }
                    }
                }
            }
            forward_task.abort();
        });
    });
}
