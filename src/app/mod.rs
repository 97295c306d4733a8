mod state;
mod ui;

use crate::config::UploaderConfig;
use crate::upload::{
    DriverSettings, FileProcessor, FileRef, QueuedUpload, RandomIncrements, UploadQueue,
};
use eframe::{egui, App};
pub use state::{PanelState, Toast, ToastBoard};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;
use tokio::sync::watch;

pub struct StorageUploader {
    queue: UploadQueue,
    snapshot: watch::Receiver<Vec<QueuedUpload>>,
    processor: FileProcessor,
    state: PanelState,
    toasts: ToastBoard,
    // driver tasks run here; dropping it stops them
    _runtime: Runtime,
}

impl StorageUploader {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: &UploaderConfig,
        processor: FileProcessor,
        runtime: Runtime,
    ) -> Self {
        tracing::info!("initializing upload panel");
        let toasts = ToastBoard::new(
            Duration::from_secs(config.ui.toast_duration_secs),
            Some(cc.egui_ctx.clone()),
        );
        let queue = UploadQueue::new(
            DriverSettings::from(&config.upload),
            Box::new(RandomIncrements::new(config.upload.max_increment)),
            Arc::new(toasts.clone()),
            runtime.handle().clone(),
        );

        let snapshot = queue.subscribe();
        runtime.spawn(repaint_on_change(queue.subscribe(), cc.egui_ctx.clone()));

        Self {
            queue,
            snapshot,
            processor,
            state: PanelState::open(),
            toasts,
            _runtime: runtime,
        }
    }

    /// Queue picked paths, expanding folders. Unreadable picks are skipped.
    pub fn add_paths(&mut self, paths: Vec<PathBuf>) {
        let files = self.processor.collect(&paths);
        if files.is_empty() && !paths.is_empty() {
            self.state.error_message = Some("Nothing in the selection could be queued".to_string());
            return;
        }
        self.add_files(files);
    }

    pub fn add_files(&mut self, files: Vec<FileRef>) {
        if files.is_empty() {
            return;
        }
        self.state.error_message = None;
        self.state.is_open = true;
        let ids = self.queue.enqueue(files);
        tracing::info!("queued {} files", ids.len());
    }

    pub fn start_upload(&mut self) {
        self.state.error_message = None;
        self.queue.start_all();
    }

    /// Closing the panel discards the queue and stops its timers.
    pub fn close_panel(&mut self) {
        tracing::info!("closing upload panel");
        self.queue.clear();
        self.state.close();
    }

    pub fn update_state(&mut self, ctx: &egui::Context) {
        let (hovering, dropped) = ctx.input(|i| {
            (
                !i.raw.hovered_files.is_empty(),
                i.raw.dropped_files.clone(),
            )
        });
        self.state.is_dragging = hovering;

        if !dropped.is_empty() {
            let files = files_from_drop(&self.processor, dropped);
            self.add_files(files);
        }

        if !self.toasts.visible(std::time::Instant::now()).is_empty() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}

/// Dropped entries in drop order. Entries with a path are read from disk
/// (folders expanded); the rest use the bytes the window delivered.
fn files_from_drop(processor: &FileProcessor, dropped: Vec<egui::DroppedFile>) -> Vec<FileRef> {
    let mut files = Vec::new();
    for file in dropped {
        if let Some(path) = file.path {
            files.extend(processor.collect([path]));
        } else if let Some(bytes) = file.bytes {
            files.push(FileRef::from_bytes(file.name, bytes));
        } else {
            tracing::warn!("dropped file {} has neither a path nor content", file.name);
        }
    }
    files
}

async fn repaint_on_change(mut rx: watch::Receiver<Vec<QueuedUpload>>, ctx: egui::Context) {
    while rx.changed().await.is_ok() {
        ctx.request_repaint();
    }
}

impl App for StorageUploader {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_state(ctx);
        self.render(ctx);
    }
}
