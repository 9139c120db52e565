use super::{PayablesUploader, ServerHealth};
use egui::{Align, Color32, RichText};
use payables_uploader::upload::{FileType, UploadStatus};
use rfd::FileDialog;

const ACCENT: Color32 = Color32::from_rgb(33, 115, 70);
const SUCCESS: Color32 = Color32::from_rgb(0, 180, 0);
const FAILURE: Color32 = Color32::from_rgb(220, 50, 50);
const MUTED: Color32 = Color32::from_rgb(150, 150, 150);

impl PayablesUploader {
    pub fn render(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let footer_height = 40.0;
            let content_height = ui.available_height() - footer_height;

            egui::ScrollArea::vertical()
                .max_height(content_height)
                .show(ui, |ui| {
                    ui.add_space(20.0);
                    ui.vertical_centered(|ui| {
                        ui.heading("Payables Report Uploader");
                        ui.add_space(5.0);
                        ui.label(
                            RichText::new("Upload the three workbooks to build the payables summary")
                                .color(ui.visuals().text_color().gamma_multiply(0.7)),
                        );
                    });

                    ui.add_space(20.0);
                    self.render_pickers(ui);

                    ui.add_space(20.0);
                    self.render_actions(ui);

                    if self.state.progress_visible {
                        ui.add_space(15.0);
                        let progress_bar = egui::ProgressBar::new(self.state.progress_fraction())
                            .show_percentage()
                            .animate(self.state.is_busy)
                            .fill(ACCENT);
                        ui.add(progress_bar);
                    }

                    if !self.state.status_text.is_empty() {
                        ui.add_space(10.0);
                        ui.vertical_centered(|ui| {
                            let color = if self.state.status_text.starts_with("Error") {
                                FAILURE
                            } else {
                                ui.visuals().text_color()
                            };
                            ui.colored_label(color, &self.state.status_text);
                        });
                    }

                    if !self.state.file_statuses.is_empty() {
                        ui.add_space(10.0);
                        self.render_details(ui);
                    }

                    ui.add_space(20.0);
                });

            ui.with_layout(egui::Layout::bottom_up(Align::Center), |ui| {
                ui.add_space(10.0);
                self.render_footer(ui);
            });
        });
    }

    fn render_pickers(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.label("Select the Excel files (.xlsx)");
            ui.add_space(8.0);

            egui::Grid::new("file_pickers")
                .num_columns(3)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    for file_type in FileType::ALL {
                        ui.label(file_type.title());

                        let enabled = !self.state.is_busy;
                        if ui
                            .add_enabled(enabled, egui::Button::new("📁 Browse"))
                            .clicked()
                        {
                            if let Some(path) = FileDialog::new()
                                .set_title(file_type.title())
                                .add_filter("Excel workbook", &["xlsx"])
                                .add_filter("All files", &["*"])
                                .pick_file()
                            {
                                self.state.selection.set(file_type, Some(path));
                            }
                        }

                        match self.state.selection.get(file_type) {
                            Some(path) => {
                                let name = path
                                    .file_name()
                                    .map(|n| n.to_string_lossy().into_owned())
                                    .unwrap_or_default();
                                ui.label(name).on_hover_text(path.display().to_string());
                            }
                            None => {
                                ui.colored_label(MUTED, "No file selected");
                            }
                        }
                        ui.end_row();
                    }
                });
        });
    }

    fn render_actions(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            let label = if self.state.is_busy {
                "⏳ Uploading..."
            } else {
                "📤 Upload & Process"
            };
            let button = egui::Button::new(label).min_size(egui::vec2(200.0, 40.0));
            if ui.add_enabled(!self.state.is_busy, button).clicked() {
                self.start_upload();
            }

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button("📂 Open Processed Folder").clicked() {
                    self.open_processed_folder();
                }

                let download = egui::Button::new("⬇ Download Final Report");
                if ui
                    .add_enabled(!self.state.is_downloading, download)
                    .clicked()
                {
                    self.download_report();
                }

                if self.state.last_report.is_some() && ui.button("📄 Open Report").clicked() {
                    self.open_last_report();
                }

                if ui
                    .add_enabled(!self.state.is_busy, egui::Button::new("🗑 Clear"))
                    .clicked()
                {
                    self.state.clear_selection();
                }
            });
        });
    }

    fn render_details(&mut self, ui: &mut egui::Ui) {
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

        if self.state.show_details {
            egui::Frame::none()
                .fill(ui.style().visuals.extreme_bg_color)
                .show(ui, |ui| {
                    ui.add_space(8.0);
                    for status in &self.state.file_statuses {
                        ui.horizontal(|ui| match &status.status {
                            UploadStatus::Success => {
                                ui.label("✅");
                                ui.colored_label(
                                    SUCCESS,
                                    format!("{} ({})", status.name, status.file_type),
                                );
                            }
                            UploadStatus::Error(err) => {
                                ui.label("❌");
                                ui.colored_label(FAILURE, format!("{} - {}", status.name, err));
                            }
                        });
                        ui.add_space(4.0);
                    }
                    ui.add_space(8.0);
                });
        }
    }

    fn render_footer(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let (dot, text) = match &self.state.server_health {
                ServerHealth::Unknown => (MUTED, "Server status unknown".to_string()),
                ServerHealth::Checking => (MUTED, "Checking server...".to_string()),
                ServerHealth::Online(message) => (SUCCESS, message.clone()),
                ServerHealth::Offline(reason) => (FAILURE, reason.clone()),
            };
            ui.colored_label(dot, "●");
            ui.label(RichText::new(self.backend.base_url()).monospace())
                .on_hover_text(text);

            let checking = self.state.server_health == ServerHealth::Checking;
            if ui
                .add_enabled(!checking, egui::Button::new("↻").small())
                .on_hover_text("Check server")
                .clicked()
            {
                self.check_health();
            }
        });
    }
}
