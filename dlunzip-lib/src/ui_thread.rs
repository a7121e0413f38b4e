use crate::error::DlUnzipError;
use anyhow::{Context, Result};
use std::sync::mpsc;
use std::thread::{self, JoinHandle, ThreadId};
use tokio::sync::oneshot;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Handle to the single thread that owns the display surfaces.
///
/// Jobs run in submission order. The thread exits once every handle is dropped.
#[derive(Debug, Clone)]
pub struct UiThread {
    id: ThreadId,
    sender: mpsc::Sender<Job>,
}

impl UiThread {
    pub fn spawn() -> Result<(Self, JoinHandle<()>)> {
        let (sender, receiver) = mpsc::channel::<Job>();
        let handle = thread::Builder::new()
            .name("ui".to_string())
            .spawn(move || {
                while let Ok(job) = receiver.recv() {
                    job();
                }
                tracing::debug!("UI thread stopped");
            })
            .context("Failed to spawn UI thread")?;

        let ui = Self {
            id: handle.thread().id(),
            sender,
        };
        Ok((ui, handle))
    }

    pub fn is_current(&self) -> bool {
        thread::current().id() == self.id
    }

    /// Runs `f` on the UI thread and waits for its result. Runs inline when
    /// already on the UI thread.
    pub async fn run_sync<F, R>(&self, f: F) -> Result<R, DlUnzipError>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        if self.is_current() {
            return Ok(f());
        }

        let (tx, rx) = oneshot::channel();
        self.sender
            .send(Box::new(move || {
                let _ = tx.send(f());
            }))
            .map_err(|_| DlUnzipError::UiThreadGone)?;
        rx.await.map_err(|_| DlUnzipError::UiThreadGone)
    }

    /// Queues `f` on the UI thread without waiting. Runs inline when already on it.
    pub fn post<F>(&self, f: F) -> Result<(), DlUnzipError>
    where
        F: FnOnce() + Send + 'static,
    {
        if self.is_current() {
            f();
            return Ok(());
        }

        self.sender
            .send(Box::new(f))
            .map_err(|_| DlUnzipError::UiThreadGone)
    }
}
