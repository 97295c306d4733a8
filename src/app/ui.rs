use super::{PanelState, StorageUploader};
use crate::upload::{NotificationKind, QueueSummary, QueuedUpload, UploadStatus};
use crate::utils::file_size::FileSizeUtils;
use eframe::egui::{self, Align, Align2, Color32, RichText, Stroke};
use rfd::FileDialog;
use std::time::Instant;

const ACCENT: Color32 = Color32::from_rgb(161, 89, 225);
const SUCCESS: Color32 = Color32::from_rgb(0, 180, 0);
const DANGER: Color32 = Color32::from_rgb(220, 50, 50);
const MUTED: Color32 = Color32::from_rgb(150, 150, 150);

impl StorageUploader {
    pub fn render(&mut self, ctx: &egui::Context) {
        let uploads = self.snapshot.borrow_and_update().clone();
        let summary = QueueSummary::from_uploads(&uploads);

        egui::CentralPanel::default().show(ctx, |ui| {
            if !self.state.is_open {
                ui.vertical_centered(|ui| {
                    ui.add_space(ui.available_height() / 2.0 - 20.0);
                    let button =
                        egui::Button::new("☁ Upload Files").min_size(egui::vec2(200.0, 40.0));
                    if ui.add(button).clicked() {
                        self.state = PanelState::open();
                    }
                });
                return;
            }

            let total_height = ui.available_height();
            let footer_height = 48.0;

            egui::ScrollArea::vertical()
                .max_height(total_height - footer_height)
                .show(ui, |ui| {
                    ui.add_space(12.0);
                    ui.horizontal(|ui| {
                        ui.label(RichText::new("☁").size(24.0).color(ACCENT));
                        ui.vertical(|ui| {
                            ui.heading("Upload Files");
                            ui.label(
                                RichText::new("Drag & drop or browse")
                                    .color(ui.visuals().text_color().gamma_multiply(0.7)),
                            );
                        });
                    });

                    ui.add_space(12.0);
                    self.render_drop_zone(ui);

                    if !uploads.is_empty() {
                        ui.add_space(12.0);
                        self.render_queue(ui, &uploads, &summary);
                    }
                });

            ui.with_layout(egui::Layout::bottom_up(Align::Center), |ui| {
                ui.add_space(8.0);
                self.render_footer(ui, &summary);
            });
        });

        self.render_toasts(ctx);
    }

    fn render_drop_zone(&mut self, ui: &mut egui::Ui) {
        let stroke = if self.state.is_dragging {
            Stroke::new(2.0, ACCENT)
        } else {
            Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color)
        };

        egui::Frame::none()
            .stroke(stroke)
            .rounding(8.0)
            .inner_margin(24.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.vertical_centered(|ui| {
                    let icon_color = if self.state.is_dragging { ACCENT } else { MUTED };
                    ui.label(RichText::new("📤").size(32.0).color(icon_color));
                    ui.label(RichText::new(if self.state.is_dragging {
                        "Drop files here"
                    } else {
                        "Drag files here"
                    })
                    .strong());
                    ui.label(RichText::new("or browse your files").color(MUTED));
                    ui.add_space(8.0);
                    ui.horizontal(|ui| {
                        if ui.button("📄 Browse files").clicked() {
                            if let Some(paths) = FileDialog::new().pick_files() {
                                self.add_paths(paths);
                            }
                        }
                        if ui.button("📁 Browse folder").clicked() {
                            if let Some(path) = FileDialog::new().pick_folder() {
                                self.add_paths(vec![path]);
                            }
                        }
                    });
                });
            });
    }

    fn render_queue(
        &mut self,
        ui: &mut egui::Ui,
        uploads: &[QueuedUpload],
        summary: &QueueSummary,
    ) {
        ui.group(|ui| {
            let progress_bar = egui::ProgressBar::new(summary.get_progress_percentage())
                .show_percentage()
                .animate(summary.is_busy())
                .fill(ACCENT);
            ui.add(progress_bar);
            ui.label(summary.get_status_text());

            if ui
                .button(if self.state.show_details {
                    "Hide Details"
                } else {
                    "Show Details"
                })
                .clicked()
            {
                self.state.show_details = !self.state.show_details;
            }
        });

        if !self.state.show_details {
            return;
        }

        let mut removed = Vec::new();
        egui::ScrollArea::vertical()
            .id_source("upload_queue")
            .max_height(220.0)
            .show(ui, |ui| {
                egui::Frame::none()
                    .fill(ui.style().visuals.extreme_bg_color)
                    .inner_margin(8.0)
                    .show(ui, |ui| {
                        for upload in uploads {
                            if Self::render_row(ui, upload) {
                                removed.push(upload.id);
                            }
                            ui.add_space(4.0);
                        }
                    });
            });

        for id in removed {
            self.queue.remove(id);
        }
    }

    /// Returns true when the row's remove button was clicked.
    fn render_row(ui: &mut egui::Ui, upload: &QueuedUpload) -> bool {
        let mut remove = false;
        ui.horizontal(|ui| {
            ui.label("📄");
            ui.vertical(|ui| {
                ui.label(RichText::new(upload.name()).strong());
                ui.horizontal(|ui| {
                    ui.colored_label(MUTED, FileSizeUtils::format_size(upload.size()));
                    match &upload.status {
                        UploadStatus::Uploading => {
                            ui.add(
                                egui::ProgressBar::new(upload.progress / 100.0)
                                    .desired_width(160.0)
                                    .fill(ACCENT),
                            );
                        }
                        UploadStatus::Error(reason) => {
                            ui.colored_label(DANGER, reason);
                        }
                        _ => {}
                    }
                });
            });

            ui.with_layout(egui::Layout::right_to_left(Align::Center), |ui| match &upload
                .status
            {
                UploadStatus::Complete => {
                    ui.colored_label(SUCCESS, "✅");
                }
                UploadStatus::Error(_) => {
                    ui.colored_label(DANGER, "❌");
                }
                UploadStatus::Pending | UploadStatus::Uploading => {
                    if ui.small_button("✖").on_hover_text("Remove").clicked() {
                        remove = true;
                    }
                }
            });
        });
        remove
    }

    fn render_footer(&mut self, ui: &mut egui::Ui, summary: &QueueSummary) {
        if let Some(error) = &self.state.error_message {
            ui.colored_label(DANGER, error);
            ui.add_space(4.0);
        }

        ui.horizontal(|ui| {
            let width = (ui.available_width() - ui.spacing().item_spacing.x) / 2.0;
            if ui
                .add(egui::Button::new("Cancel").min_size(egui::vec2(width, 32.0)))
                .clicked()
            {
                self.close_panel();
            }

            ui.add_enabled_ui(summary.can_upload(), |ui| {
                let button = egui::Button::new(
                    RichText::new(summary.upload_button_label()).color(Color32::WHITE),
                )
                .fill(ACCENT)
                .min_size(egui::vec2(width, 32.0));
                if ui.add(button).clicked() {
                    self.start_upload();
                }
            });
        });
    }

    fn render_toasts(&self, ctx: &egui::Context) {
        let now = Instant::now();
        let toasts = self.toasts.visible(now);
        if toasts.is_empty() {
            return;
        }

        egui::Area::new("toasts")
            .anchor(Align2::RIGHT_BOTTOM, [-12.0, -64.0])
            .show(ctx, |ui| {
                for toast in &toasts {
                    let (icon, color) = match toast.notification.kind {
                        NotificationKind::Success => ("✅", SUCCESS),
                        NotificationKind::Error => ("❌", DANGER),
                        NotificationKind::Info => ("ℹ", ACCENT),
                    };
                    let fade = self.toasts.remaining(toast, now).max(0.2);
                    let text = ui.visuals().text_color().gamma_multiply(fade);
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.colored_label(color.gamma_multiply(fade), icon);
                            ui.colored_label(text, &toast.notification.message);
                        });
                    });
                    ui.add_space(4.0);
                }
            });
    }
}
