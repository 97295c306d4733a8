use crate::upload::{Notification, NotificationSink};
use eframe::egui;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

#[derive(Default)]
pub struct PanelState {
    pub is_open: bool,
    pub is_dragging: bool,
    pub show_details: bool,
    pub error_message: Option<String>,
}

impl PanelState {
    pub fn open() -> Self {
        Self {
            is_open: true,
            show_details: true,
            ..Self::default()
        }
    }

    pub fn close(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub notification: Notification,
    pub shown_at: Instant,
}

/// Notification sink backing the toast overlay.
#[derive(Clone)]
pub struct ToastBoard {
    toasts: Arc<Mutex<Vec<Toast>>>,
    lifetime: Duration,
    ctx: Option<egui::Context>,
}

impl ToastBoard {
    pub fn new(lifetime: Duration, ctx: Option<egui::Context>) -> Self {
        Self {
            toasts: Arc::new(Mutex::new(Vec::new())),
            lifetime,
            ctx,
        }
    }

    /// Toasts still on screen at `now`, oldest first. Expired ones are dropped.
    pub fn visible(&self, now: Instant) -> Vec<Toast> {
        let mut toasts = self.toasts.lock().unwrap_or_else(PoisonError::into_inner);
        toasts.retain(|t| now.saturating_duration_since(t.shown_at) < self.lifetime);
        toasts.clone()
    }

    /// Fraction of the toast's life left, for fading.
    pub fn remaining(&self, toast: &Toast, now: Instant) -> f32 {
        if self.lifetime.is_zero() {
            return 0.0;
        }
        let elapsed = now.saturating_duration_since(toast.shown_at);
        1.0 - (elapsed.as_secs_f32() / self.lifetime.as_secs_f32()).min(1.0)
    }
}

impl NotificationSink for ToastBoard {
    fn notify(&self, notification: Notification) {
        self.toasts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Toast {
                notification,
                shown_at: Instant::now(),
            });
        if let Some(ctx) = &self.ctx {
            ctx.request_repaint();
        }
    }
}
