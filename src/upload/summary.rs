use super::types::{QueuedUpload, UploadStatus};

/// Counts derived from one queue snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct QueueSummary {
    pub total: usize,
    pub pending: usize,
    pub uploading: usize,
    pub complete: usize,
    pub failed: usize,
    /// Sum of every record's progress, in percent
    progress_sum: f32,
}

impl QueueSummary {
    pub fn from_uploads(uploads: &[QueuedUpload]) -> Self {
        uploads.iter().fold(Self::default(), |mut summary, upload| {
            summary.total += 1;
            summary.progress_sum += upload.progress;
            match upload.status {
                UploadStatus::Pending => summary.pending += 1,
                UploadStatus::Uploading => summary.uploading += 1,
                UploadStatus::Complete => summary.complete += 1,
                UploadStatus::Error(_) => summary.failed += 1,
            }
            summary
        })
    }

    /// Overall progress in `[0, 1]`.
    pub fn get_progress_percentage(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            (self.progress_sum / (self.total as f32 * 100.0)).clamp(0.0, 1.0)
        }
    }

    pub fn is_busy(&self) -> bool {
        self.uploading > 0
    }

    /// The upload button is useless on an empty or fully uploaded queue.
    pub fn can_upload(&self) -> bool {
        self.total > 0 && self.complete < self.total
    }

    pub fn upload_button_label(&self) -> String {
        if self.pending > 0 {
            format!("Upload ({})", self.pending)
        } else {
            "Upload".to_string()
        }
    }

    pub fn get_status_text(&self) -> String {
        if self.total == 0 {
            return String::new();
        }
        let mut text = format!(
            "{}/{} files | ⏳ Pending: {} | 📤 Uploading: {} | ✅ Done: {}",
            self.complete, self.total, self.pending, self.uploading, self.complete
        );
        if self.failed > 0 {
            text.push_str(&format!(" | ❌ Failed: {}", self.failed));
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::types::FileRef;

    fn upload(progress: f32, status: UploadStatus) -> QueuedUpload {
        let mut upload = QueuedUpload::pending(FileRef::from_bytes("f.bin", vec![1, 2, 3]));
        upload.progress = progress;
        upload.status = status;
        upload
    }

    #[test]
    fn empty_queue() {
        let summary = QueueSummary::from_uploads(&[]);
        assert_eq!(summary.total, 0);
        assert!(!summary.can_upload());
        assert_eq!(summary.upload_button_label(), "Upload");
        assert_eq!(summary.get_progress_percentage(), 0.0);
        assert!(summary.get_status_text().is_empty());
    }

    #[test]
    fn counts_each_status() {
        let summary = QueueSummary::from_uploads(&[
            upload(0.0, UploadStatus::Pending),
            upload(0.0, UploadStatus::Pending),
            upload(50.0, UploadStatus::Uploading),
            upload(100.0, UploadStatus::Complete),
            upload(30.0, UploadStatus::Error("nope".into())),
        ]);

        assert_eq!(summary.pending, 2);
        assert_eq!(summary.uploading, 1);
        assert_eq!(summary.complete, 1);
        assert_eq!(summary.failed, 1);
        assert!(summary.is_busy());
        assert!(summary.can_upload());
        assert_eq!(summary.upload_button_label(), "Upload (2)");
        assert!((summary.get_progress_percentage() - 0.36).abs() < 1e-6);
        assert!(summary.get_status_text().contains("❌ Failed: 1"));
    }

    #[test]
    fn fully_uploaded_queue_disables_upload() {
        let summary = QueueSummary::from_uploads(&[
            upload(100.0, UploadStatus::Complete),
            upload(100.0, UploadStatus::Complete),
        ]);
        assert!(!summary.can_upload());
        assert_eq!(summary.get_progress_percentage(), 1.0);
        assert_eq!(summary.upload_button_label(), "Upload");
    }
}
