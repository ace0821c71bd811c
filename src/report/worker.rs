//! Background report generation
//!
//! A job owns a renderer and a snapshot of the table, renders on its own
//! thread, and sends one message back when done. The UI loop polls it.

use super::{ReportError, ReportRenderer, ReportTable};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::thread;
use tracing::{error, info};

/// Result of polling a job
#[derive(Debug)]
pub enum JobStatus {
    /// Still rendering
    Pending,
    /// Report written to this path
    Done(PathBuf),
    /// Rendering failed
    Failed(ReportError),
}

/// A report being rendered on a worker thread
pub struct ReportJob {
    path: PathBuf,
    rx: Receiver<Result<(), ReportError>>,
}

impl ReportJob {
    /// Start rendering `table` to `path` on a new thread
    pub fn spawn(renderer: Box<dyn ReportRenderer>, table: ReportTable, path: PathBuf) -> Self {
        let (tx, rx) = channel();
        let target = path.clone();

        thread::spawn(move || {
            let result = renderer.render(&table, &target);
            match &result {
                Ok(()) => info!(path = %target.display(), rows = table.rows.len(), "report generated"),
                Err(e) => error!(path = %target.display(), "report failed: {}", e),
            }
            // The receiver may be gone if the app quit mid-render
            let _ = tx.send(result);
        });

        ReportJob { path, rx }
    }

    /// Check for completion without blocking
    pub fn poll(&self) -> JobStatus {
        match self.rx.try_recv() {
            Ok(Ok(())) => JobStatus::Done(self.path.clone()),
            Ok(Err(e)) => JobStatus::Failed(e),
            Err(TryRecvError::Empty) => JobStatus::Pending,
            Err(TryRecvError::Disconnected) => JobStatus::Failed(ReportError::WorkerGone),
        }
    }

    /// Block until the job finishes
    pub fn wait(self) -> Result<PathBuf, ReportError> {
        match self.rx.recv() {
            Ok(Ok(())) => Ok(self.path),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(ReportError::WorkerGone),
        }
    }
}
