mod driver;
mod file_processor;
mod notify;
mod progress;
mod queue;
mod summary;
mod types;

pub use driver::DriverSettings;
pub use file_processor::FileProcessor;
pub use notify::{
    CollectingNotifier, Notification, NotificationKind, NotificationSink, TracingNotifier,
};
pub use progress::{FixedIncrements, ProgressSource, RandomIncrements};
pub use queue::UploadQueue;
pub use summary::QueueSummary;
pub use types::{FileRef, FileSource, QueuedUpload, UploadId, UploadStatus};
