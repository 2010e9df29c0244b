use std::thread;

use futures::future::{BoxFuture, FutureExt};
use log::debug;
use tokio::sync::{mpsc, oneshot};

use crate::events::{Event, EventSource};
use crate::platform::{MediaEvent, PlatformApi};
use crate::widgets::Controls;
use crate::{ControlsConfig, Error, Result, Synchronizer};

enum Command {
    Dispatch(EventSource, Event, oneshot::Sender<()>),
    Snapshot(oneshot::Sender<Controls>),
    Close(oneshot::Sender<()>),
}

/// An async-friendly handle to a synchronizer running on a dedicated thread.
///
/// The worker thread owns the `Synchronizer` and runs a single-threaded
/// runtime that interleaves incoming events, the deferred control-bar hide
/// and the picture-in-picture request, so every handler still runs to
/// completion on one logical thread.
#[derive(Clone)]
pub struct ControlsHandle {
    cmd_tx: mpsc::UnboundedSender<Command>,
}

impl ControlsHandle {
    /// Spawn the worker and build the synchronizer on it
    pub async fn new<P>(platform: P, config: ControlsConfig) -> Result<Self>
    where
        P: PlatformApi + 'static,
    {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<Command>();
        let (init_tx, init_rx): (oneshot::Sender<Result<()>>, oneshot::Receiver<Result<()>>) =
            oneshot::channel();

        thread::spawn(move || {
            let rt = match tokio::runtime::Builder::new_current_thread().enable_time().build() {
                Ok(rt) => rt,
                Err(err) => {
                    let _ = init_tx.send(Err(Error::Other(format!("Worker runtime failed: {}", err))));
                    return;
                }
            };

            // Initialize the synchronizer on the worker thread
            let sync = match crate::new_synchronizer(&platform, config) {
                Ok(s) => s,
                Err(err) => {
                    let _ = init_tx.send(Err(err));
                    return;
                }
            };

            let _ = init_tx.send(Ok(()));
            rt.block_on(run_worker(sync, cmd_rx));
            debug!("controls worker stopped");
        });

        // Wait for the worker to report initialization success or failure
        let init_res = init_rx
            .await
            .map_err(|e| Error::Channel(format!("Worker init canceled: {}", e)))?;
        init_res?;

        Ok(Self { cmd_tx })
    }

    /// Deliver a user or platform event; resolves once its handlers ran
    pub async fn dispatch(&self, source: EventSource, event: Event) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Dispatch(source, event, tx))?;
        rx.await
            .map_err(|e| Error::Channel(format!("Dispatch canceled: {}", e)))
    }

    /// Forward a media source notification
    pub async fn media_event(&self, ev: MediaEvent) -> Result<()> {
        self.dispatch(EventSource::Video, Event::Media(ev)).await
    }

    /// Forward a document-level key press
    pub async fn key(&self, key: &str) -> Result<()> {
        self.dispatch(EventSource::Document, Event::KeyDown(key.to_string()))
            .await
    }

    /// Copy of the current widget state
    pub async fn snapshot(&self) -> Result<Controls> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Snapshot(tx))?;
        rx.await
            .map_err(|e| Error::Channel(format!("Snapshot canceled: {}", e)))
    }

    /// Detach the listeners and stop the worker
    pub async fn close(self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Close(tx))?;
        rx.await
            .map_err(|e| Error::Channel(format!("Close canceled: {}", e)))
    }

    fn send(&self, cmd: Command) -> Result<()> {
        self.cmd_tx
            .send(cmd)
            .map_err(|_| Error::Channel("worker has stopped".to_string()))
    }
}

async fn run_worker(mut sync: Synchronizer, mut cmd_rx: mpsc::UnboundedReceiver<Command>) {
    let mut pending_pip: Option<BoxFuture<'static, Result<()>>> = None;

    loop {
        let deadline = sync.hide_deadline();
        let sleep_target = tokio::time::Instant::from_std(deadline.unwrap_or_else(std::time::Instant::now));

        tokio::select! {
            biased;

            _ = async { pending_pip.as_mut().unwrap().await }, if pending_pip.is_some() => {
                // Outcome already logged by the task; the button is re-enabled.
                pending_pip = None;
            }
            _ = tokio::time::sleep_until(sleep_target), if deadline.is_some() => {
                sync.fire_due_timers(std::time::Instant::now());
            }
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(Command::Dispatch(source, event, resp)) => {
                        if let Some(task) = sync.dispatch(source, &event) {
                            pending_pip = Some(task.run().boxed());
                        }
                        let _ = resp.send(());
                    }
                    Some(Command::Snapshot(resp)) => {
                        let _ = resp.send(sync.controls().clone());
                    }
                    Some(Command::Close(resp)) => {
                        sync.detach();
                        let _ = resp.send(());
                        break;
                    }
                    // Every handle was dropped
                    None => break,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::SimulatedPlatform;
    use crate::widgets::{PlaybackIcon, Visibility};
    use std::time::Duration;

    async fn pump(platform: &SimulatedPlatform, handle: &ControlsHandle) {
        for ev in platform.media.take_events() {
            handle.media_event(ev).await.unwrap();
        }
    }

    #[tokio::test]
    async fn handle_plays_and_reports_state() {
        let platform = SimulatedPlatform::new();
        let handle = ControlsHandle::new(platform.clone(), ControlsConfig::default())
            .await
            .unwrap();
        platform.media.load(42.0);
        pump(&platform, &handle).await;

        handle.key("k").await.unwrap();
        pump(&platform, &handle).await;

        let c = handle.snapshot().await.unwrap();
        assert_eq!(c.play.icon, PlaybackIcon::Pause);
        assert_eq!(c.duration.text, "00:42");
        assert_eq!(c.flash.pulses, 1);
        handle.close().await.unwrap();
    }

    #[tokio::test]
    async fn deferred_hide_runs_on_worker() {
        let platform = SimulatedPlatform::new();
        let cfg = ControlsConfig {
            hide_delay_ms: 20,
            ..Default::default()
        };
        let handle = ControlsHandle::new(platform.clone(), cfg).await.unwrap();
        handle.key(" ").await.unwrap();
        pump(&platform, &handle).await;

        tokio::time::sleep(Duration::from_millis(150)).await;
        let c = handle.snapshot().await.unwrap();
        assert_eq!(c.bar.visibility, Visibility::Hidden);
        handle.close().await.unwrap();
    }

    #[tokio::test]
    async fn invalid_config_fails_init() {
        let cfg = ControlsConfig {
            fullscreen_order: Vec::new(),
            ..Default::default()
        };
        let res = ControlsHandle::new(SimulatedPlatform::new(), cfg).await;
        assert!(matches!(res, Err(Error::ConfigError(_))));
    }

    #[tokio::test]
    async fn closed_handle_rejects_commands() {
        let handle = ControlsHandle::new(SimulatedPlatform::new(), ControlsConfig::default())
            .await
            .unwrap();
        let other = handle.clone();
        handle.close().await.unwrap();
        assert!(other.snapshot().await.is_err());
    }
}
