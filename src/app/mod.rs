mod state;
mod ui;

use eframe::App;
use payables_uploader::config::UploaderConfig;
use payables_uploader::upload::{HttpBackend, UploadController, UploadView};
use std::future::Future;
use std::sync::mpsc::{self, Sender};
use std::time::Duration;
use tracing::{error, info};

pub use state::{BackgroundEvent, ChannelView, ServerHealth, TaggedEvent, UploadState};

const IDLE_REPAINT: Duration = Duration::from_millis(250);

pub struct PayablesUploader {
    config: UploaderConfig,
    backend: HttpBackend,
    state: UploadState,
    view_sender: Sender<TaggedEvent>,
    background_sender: Sender<BackgroundEvent>,
}

impl PayablesUploader {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: UploaderConfig) -> Self {
        info!("Initializing payables report uploader");
        let backend = HttpBackend::new(config.server_url.clone());

        let (view_sender, view_receiver) = mpsc::channel();
        let (background_sender, background_receiver) = mpsc::channel();
        let state = UploadState {
            view_receiver: Some(view_receiver),
            background_receiver: Some(background_receiver),
            ..Default::default()
        };

        let mut app = Self {
            config,
            backend,
            state,
            view_sender,
            background_sender,
        };
        app.check_health();
        app
    }

    fn controller(&self) -> UploadController<HttpBackend> {
        UploadController::new(self.backend.clone()).with_reset_delay(self.config.reset_delay)
    }

    pub fn start_upload(&mut self) {
        if self.state.is_busy {
            return;
        }
        // Marks the window busy so a second click waits for this run.
        let run = self.state.begin_run();
        info!("Starting upload run {} of {:?}", run, self.state.selection);

        let controller = self.controller();
        let selection = self.state.selection.clone();
        let mut view = ChannelView::for_run(self.view_sender.clone(), run);
        let mut failure_view = view.clone();

        run_in_background(
            "upload",
            async move {
                if let Err(e) = controller.upload_files(&selection, &mut view).await {
                    info!("Upload finished with error: {}", e);
                }
            },
            move |reason| report_start_failure(&mut failure_view, "upload", &reason),
        );
    }

    pub fn open_processed_folder(&mut self) {
        let controller = self.controller();
        let mut view = ChannelView::untagged(self.view_sender.clone());
        let mut failure_view = view.clone();

        run_in_background(
            "open folder",
            async move {
                controller.open_processed_folder(&mut view).await;
            },
            move |reason| {
                failure_view.set_status(&format!("Error opening folder: {}", reason))
            },
        );
    }

    pub fn check_health(&mut self) {
        self.state.server_health = ServerHealth::Checking;
        let backend = self.backend.clone();
        let sender = self.background_sender.clone();
        let failure_sender = sender.clone();

        run_in_background(
            "health check",
            async move {
                let result = backend.health_check().await.map_err(|e| e.to_string());
                sender
                    .send(BackgroundEvent::Health(result))
                    .unwrap_or_default();
            },
            move |reason| {
                failure_sender
                    .send(BackgroundEvent::Health(Err(reason)))
                    .unwrap_or_default()
            },
        );
    }

    pub fn download_report(&mut self) {
        if self.state.is_downloading {
            return;
        }
        self.state.is_downloading = true;
        self.state.status_text = "Downloading final report...".to_string();

        let backend = self.backend.clone();
        let sender = self.background_sender.clone();
        let dest_dir = self.config.download_dir.clone();
        let failure_sender = sender.clone();

        run_in_background(
            "report download",
            async move {
                let result = backend
                    .download_final_report(&dest_dir)
                    .await
                    .map_err(|e| e.to_string());
                sender
                    .send(BackgroundEvent::ReportSaved(result))
                    .unwrap_or_default();
            },
            move |reason| {
                failure_sender
                    .send(BackgroundEvent::ReportSaved(Err(reason)))
                    .unwrap_or_default()
            },
        );
    }

    pub fn open_last_report(&mut self) {
        if let Some(path) = &self.state.last_report {
            if let Err(e) = open::that(path) {
                error!("Failed to open {}: {}", path.display(), e);
                self.state.status_text = format!("Error opening report: {}", e);
            }
        }
    }

    pub fn update_state(&mut self, ctx: &egui::Context) {
        if self.state.poll() {
            ctx.request_repaint();
        }
        // Workers cannot wake the UI thread, so keep polling while anything may arrive.
        ctx.request_repaint_after(IDLE_REPAINT);
    }
}

/// Runs `task` to completion on a fresh runtime in its own thread.
/// `on_start_failure` gets the reason when no runtime could be built.
fn run_in_background<F, E>(name: &'static str, task: F, on_start_failure: E)
where
    F: Future<Output = ()> + Send + 'static,
    E: FnOnce(String) + Send + 'static,
{
    std::thread::spawn(move || match tokio::runtime::Runtime::new() {
        Ok(rt) => rt.block_on(task),
        Err(e) => {
            error!("Failed to start runtime for {}: {}", name, e);
            on_start_failure(e.to_string());
        }
    });
}

/// Releases the trigger when an upload never got to run.
fn report_start_failure<V: UploadView>(view: &mut V, task: &str, reason: &str) {
    view.set_status(&format!("Error: failed to start {}: {}", task, reason));
    view.set_progress(0);
    view.set_busy(false);
}

impl App for PayablesUploader {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_state(ctx);
        self.render(ctx);
    }
}
