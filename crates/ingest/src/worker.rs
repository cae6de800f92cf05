use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::Context as _;
use photodb_core::{EditTicket, UploadBatch};

use crate::ingest_batch;

struct Job {
    ticket: EditTicket,
    paths: Vec<PathBuf>,
}

/// Background decoder. Each submitted job is delivered back as one
/// [`UploadBatch`] once every file in it has been read.
pub struct IngestWorker {
    jobs: Option<Sender<Job>>,
    results: Receiver<UploadBatch>,
    handle: Option<JoinHandle<()>>,
    pending: usize,
}

impl IngestWorker {
    pub fn spawn() -> anyhow::Result<Self> {
        let (job_tx, job_rx) = mpsc::channel::<Job>();
        let (result_tx, result_rx) = mpsc::channel::<UploadBatch>();
        let handle = std::thread::Builder::new()
            .name("photodb-ingest".to_string())
            .spawn(move || {
                while let Ok(job) = job_rx.recv() {
                    let images = ingest_batch(&job.paths);
                    tracing::debug!(
                        ticket = %job.ticket,
                        files = job.paths.len(),
                        images = images.len(),
                        "upload batch decoded"
                    );
                    let batch = UploadBatch {
                        ticket: job.ticket,
                        images,
                    };
                    if result_tx.send(batch).is_err() {
                        break;
                    }
                }
            })
            .context("spawn ingest worker thread")?;

        Ok(Self {
            jobs: Some(job_tx),
            results: result_rx,
            handle: Some(handle),
            pending: 0,
        })
    }

    pub fn submit(&mut self, ticket: EditTicket, paths: Vec<PathBuf>) -> anyhow::Result<()> {
        let jobs = self.jobs.as_ref().context("ingest worker is shut down")?;
        jobs.send(Job { ticket, paths })
            .map_err(|_| anyhow::anyhow!("ingest worker stopped"))?;
        self.pending += 1;
        Ok(())
    }

    /// Jobs submitted but not yet collected.
    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn try_recv(&mut self) -> Option<UploadBatch> {
        match self.results.try_recv() {
            Ok(batch) => {
                self.pending = self.pending.saturating_sub(1);
                Some(batch)
            }
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    pub fn recv_timeout(&mut self, timeout: Duration) -> Option<UploadBatch> {
        match self.results.recv_timeout(timeout) {
            Ok(batch) => {
                self.pending = self.pending.saturating_sub(1);
                Some(batch)
            }
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }
}

impl Drop for IngestWorker {
    fn drop(&mut self) {
        self.jobs.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl std::fmt::Debug for IngestWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestWorker")
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}
