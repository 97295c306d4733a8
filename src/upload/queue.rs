use super::driver::{drive, DriverSettings};
use super::notify::{Notification, NotificationSink};
use super::progress::ProgressSource;
use super::summary::QueueSummary;
use super::types::{FileRef, QueuedUpload, UploadId, UploadStatus};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::AbortHandle;
use tracing::{debug, info};

struct Entry {
    upload: QueuedUpload,
    task: Option<AbortHandle>,
}

impl Entry {
    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tick {
    Continue,
    Finished,
}

pub(crate) struct Shared {
    records: Mutex<Vec<Entry>>,
    snapshot: watch::Sender<Vec<QueuedUpload>>,
    increments: Mutex<Box<dyn ProgressSource>>,
    notifier: Arc<dyn NotificationSink>,
    settings: DriverSettings,
    runtime: Handle,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Vec<Entry>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // Called with the records lock held so snapshots go out in mutation order.
    fn publish(&self, records: &[Entry]) {
        self.snapshot
            .send_replace(records.iter().map(|e| e.upload.clone()).collect());
    }

    /// Pending -> Uploading. Returns false when the record is gone or no longer pending.
    pub(crate) fn begin(&self, id: UploadId) -> bool {
        let mut records = self.lock();
        let Some(entry) = records.iter_mut().find(|e| e.upload.id == id) else {
            return false;
        };
        if entry.upload.status != UploadStatus::Pending {
            return false;
        }
        entry.upload.status = UploadStatus::Uploading;
        debug!(%id, file = entry.upload.name(), "upload started");
        self.publish(&records);
        true
    }

    pub(crate) fn advance(&self, id: UploadId) -> Tick {
        let mut records = self.lock();
        let Some(entry) = records.iter_mut().find(|e| e.upload.id == id) else {
            return Tick::Finished;
        };
        if entry.upload.status != UploadStatus::Uploading {
            return Tick::Finished;
        }

        let step = {
            let mut increments = self
                .increments
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            let raw = increments.next_increment();
            if raw.is_finite() {
                raw.max(0.0)
            } else {
                0.0
            }
        };
        let progress = (entry.upload.progress + step).min(100.0);
        entry.upload.progress = progress;

        if progress < 100.0 {
            debug!(%id, progress, "upload progressed");
            self.publish(&records);
            return Tick::Continue;
        }

        entry.upload.status = UploadStatus::Complete;
        entry.task = None;
        let name = entry.upload.name().to_string();
        info!(%id, file = %name, "upload complete");
        self.publish(&records);
        drop(records);

        self.notifier
            .notify(Notification::success(format!("{} uploaded successfully", name)));
        Tick::Finished
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        let records = self
            .records
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        for entry in records.iter_mut() {
            entry.cancel();
        }
    }
}

/// Ordered queue of simulated uploads.
///
/// Every operation is tolerant: unknown ids and out-of-state calls are
/// no-ops. Cloning yields another handle to the same queue.
#[derive(Clone)]
pub struct UploadQueue {
    shared: Arc<Shared>,
}

impl UploadQueue {
    /// Driver tasks are spawned on `runtime`.
    pub fn new(
        settings: DriverSettings,
        increments: Box<dyn ProgressSource>,
        notifier: Arc<dyn NotificationSink>,
        runtime: Handle,
    ) -> Self {
        let (snapshot, _) = watch::channel(Vec::new());
        Self {
            shared: Arc::new(Shared {
                records: Mutex::new(Vec::new()),
                snapshot,
                increments: Mutex::new(increments),
                notifier,
                settings,
                runtime,
            }),
        }
    }

    /// Append one pending record per file, in the given order.
    pub fn enqueue<I>(&self, files: I) -> Vec<UploadId>
    where
        I: IntoIterator<Item = FileRef>,
    {
        let added: Vec<QueuedUpload> = files.into_iter().map(QueuedUpload::pending).collect();
        if added.is_empty() {
            return Vec::new();
        }

        let ids = added.iter().map(|u| u.id).collect();
        let mut records = self.shared.lock();
        for upload in added {
            debug!(id = %upload.id, file = upload.name(), size = upload.size(), "queued");
            records.push(Entry { upload, task: None });
        }
        self.shared.publish(&records);
        ids
    }

    /// Schedule every pending record that is not already waiting to start.
    /// The k-th one scheduled starts after `k` stagger intervals.
    pub fn start_all(&self) {
        let settings = self.shared.settings;
        let mut records = self.shared.lock();
        let mut position = 0;

        for entry in records.iter_mut() {
            if entry.upload.status != UploadStatus::Pending || entry.task.is_some() {
                continue;
            }
            let delay = settings.stagger_for(position);
            let task = self.shared.runtime.spawn(drive(
                Arc::downgrade(&self.shared),
                entry.upload.id,
                delay,
                settings.tick_interval,
            ));
            entry.task = Some(task.abort_handle());
            position += 1;
        }

        if position > 0 {
            info!(count = position, "starting uploads");
        }
    }

    /// Apply one progress tick to `id`. Normally called by the driver task.
    pub fn advance(&self, id: UploadId) {
        self.shared.advance(id);
    }

    /// Delete `id` whatever its status and stop its timer.
    pub fn remove(&self, id: UploadId) -> bool {
        let mut records = self.shared.lock();
        let Some(index) = records.iter().position(|e| e.upload.id == id) else {
            return false;
        };
        let mut entry = records.remove(index);
        entry.cancel();
        debug!(%id, file = entry.upload.name(), "removed");
        self.shared.publish(&records);
        true
    }

    /// Move a pending or uploading record to `Error`. Nothing in the
    /// simulator calls this; it exists for callers that model failures.
    pub fn fail(&self, id: UploadId, reason: impl Into<String>) -> bool {
        let reason = reason.into();
        let mut records = self.shared.lock();
        let Some(entry) = records.iter_mut().find(|e| e.upload.id == id) else {
            return false;
        };
        if !entry.upload.status.is_active() {
            return false;
        }
        entry.cancel();
        entry.upload.status = UploadStatus::Error(reason.clone());
        let name = entry.upload.name().to_string();
        tracing::warn!(%id, file = %name, %reason, "upload failed");
        self.shared.publish(&records);
        drop(records);

        self.shared.notifier.notify(Notification::error(format!(
            "{} failed to upload: {}",
            name, reason
        )));
        true
    }

    /// Drop every record and stop every timer.
    pub fn clear(&self) {
        let mut records = self.shared.lock();
        if records.is_empty() {
            return;
        }
        for entry in records.iter_mut() {
            entry.cancel();
        }
        records.clear();
        self.shared.publish(&records);
    }

    pub fn snapshot(&self) -> Vec<QueuedUpload> {
        self.shared.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<QueuedUpload>> {
        self.shared.snapshot.subscribe()
    }

    pub fn get(&self, id: UploadId) -> Option<QueuedUpload> {
        self.shared
            .snapshot
            .borrow()
            .iter()
            .find(|u| u.id == id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.shared.snapshot.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn summary(&self) -> QueueSummary {
        QueueSummary::from_uploads(&self.shared.snapshot.borrow())
    }

    /// Resolves once every record is complete or failed.
    pub async fn settled(&self) {
        let mut rx = self.subscribe();
        loop {
            let done = rx.borrow_and_update().iter().all(|u| u.status.is_terminal());
            if done {
                return;
            }
            if rx.changed().await.is_err() {
                return;
            }
        }
    }
}
