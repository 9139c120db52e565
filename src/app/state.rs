use derivative::Derivative;
use payables_uploader::upload::{FileSelection, FileStatus, UploadView, ViewEvent};
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};
use tracing::debug;

/// A view update stamped with the upload run that produced it.
/// `None` marks updates that belong to no run, such as folder messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedEvent {
    pub run: Option<u64>,
    pub event: ViewEvent,
}

/// Forwards controller updates from a worker thread to the window.
#[derive(Clone)]
pub struct ChannelView {
    run: Option<u64>,
    sender: Sender<TaggedEvent>,
}

impl ChannelView {
    pub fn for_run(sender: Sender<TaggedEvent>, run: u64) -> Self {
        Self {
            run: Some(run),
            sender,
        }
    }

    pub fn untagged(sender: Sender<TaggedEvent>) -> Self {
        Self { run: None, sender }
    }

    fn send(&self, event: ViewEvent) {
        self.sender
            .send(TaggedEvent {
                run: self.run,
                event,
            })
            .unwrap_or_default();
    }
}

impl UploadView for ChannelView {
    fn set_status(&mut self, message: &str) {
        self.send(ViewEvent::Status(message.to_string()));
    }

    fn set_progress(&mut self, percent: u8) {
        self.send(ViewEvent::Progress(percent));
    }

    fn set_progress_visible(&mut self, visible: bool) {
        self.send(ViewEvent::ProgressVisible(visible));
    }

    fn set_busy(&mut self, busy: bool) {
        self.send(ViewEvent::Busy(busy));
    }

    fn record_file(&mut self, status: FileStatus) {
        self.send(ViewEvent::File(status));
    }
}

/// Results of the side actions that are not part of the upload workflow.
#[derive(Debug, Clone)]
pub enum BackgroundEvent {
    Health(Result<String, String>),
    ReportSaved(Result<PathBuf, String>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ServerHealth {
    #[default]
    Unknown,
    Checking,
    Online(String),
    Offline(String),
}

#[derive(Derivative)]
#[derivative(Debug, Default)]
pub struct UploadState {
    pub selection: FileSelection,
    pub status_text: String,
    pub progress: u8,
    pub progress_visible: bool,
    pub is_busy: bool,
    pub is_downloading: bool,
    pub file_statuses: Vec<FileStatus>,
    pub show_details: bool,
    pub server_health: ServerHealth,
    pub last_report: Option<PathBuf>,
    pub current_run: u64,
    #[derivative(Debug = "ignore")]
    pub view_receiver: Option<Receiver<TaggedEvent>>,
    #[derivative(Debug = "ignore")]
    pub background_receiver: Option<Receiver<BackgroundEvent>>,
}

impl UploadState {
    /// Starts a new upload run; updates from older runs are dropped from now on.
    pub fn begin_run(&mut self) -> u64 {
        self.current_run += 1;
        self.is_busy = true;
        self.current_run
    }

    pub fn apply_tagged(&mut self, tagged: TaggedEvent) {
        match tagged.run {
            Some(run) if run != self.current_run => {
                debug!("Dropping update from finished run {}: {:?}", run, tagged.event)
            }
            _ => self.apply(tagged.event),
        }
    }

    pub fn apply(&mut self, event: ViewEvent) {
        match event {
            ViewEvent::Status(message) => self.status_text = message,
            ViewEvent::Progress(percent) => self.progress = percent.min(100),
            ViewEvent::ProgressVisible(visible) => self.progress_visible = visible,
            ViewEvent::Busy(busy) => {
                if busy {
                    self.file_statuses.clear();
                }
                self.is_busy = busy;
            }
            ViewEvent::File(status) => self.file_statuses.push(status),
        }
    }

    pub fn apply_background(&mut self, event: BackgroundEvent) {
        match event {
            BackgroundEvent::Health(Ok(message)) => {
                self.server_health = ServerHealth::Online(message)
            }
            BackgroundEvent::Health(Err(reason)) => {
                self.server_health = ServerHealth::Offline(reason)
            }
            BackgroundEvent::ReportSaved(Ok(path)) => {
                self.is_downloading = false;
                self.status_text = format!("Final report saved to {}", path.display());
                self.last_report = Some(path);
            }
            BackgroundEvent::ReportSaved(Err(reason)) => {
                self.is_downloading = false;
                self.status_text = format!("Error downloading report: {}", reason);
            }
        }
    }

    /// Drains whatever the worker threads have sent since the last frame.
    pub fn poll(&mut self) -> bool {
        let mut had_updates = false;

        let view_events: Vec<_> = self
            .view_receiver
            .as_ref()
            .map(|receiver| receiver.try_iter().collect())
            .unwrap_or_default();
        for event in view_events {
            had_updates = true;
            self.apply_tagged(event);
        }

        let background_events: Vec<_> = self
            .background_receiver
            .as_ref()
            .map(|receiver| receiver.try_iter().collect())
            .unwrap_or_default();
        for event in background_events {
            had_updates = true;
            self.apply_background(event);
        }

        had_updates
    }

    pub fn progress_fraction(&self) -> f32 {
        f32::from(self.progress) / 100.0
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.file_statuses.clear();
        self.status_text.clear();
        self.show_details = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use payables_uploader::upload::{FileType, UploadStatus};
    use std::sync::mpsc::channel;

    #[test]
    fn view_events_update_the_window_state() {
        let mut state = UploadState::default();
        state.apply(ViewEvent::Busy(true));
        state.apply(ViewEvent::ProgressVisible(true));
        state.apply(ViewEvent::Progress(50));
        state.apply(ViewEvent::Status("Files uploaded, processing...".into()));

        assert!(state.is_busy);
        assert!(state.progress_visible);
        assert_eq!(state.progress_fraction(), 0.5);
        assert_eq!(state.status_text, "Files uploaded, processing...");
    }

    #[test]
    fn new_run_clears_previous_file_outcomes() {
        let mut state = UploadState::default();
        state.apply(ViewEvent::File(FileStatus {
            file_type: FileType::BankBalance,
            name: "bb.xlsx".into(),
            status: UploadStatus::Success,
        }));
        assert_eq!(state.file_statuses.len(), 1);

        state.apply(ViewEvent::Busy(true));
        assert!(state.file_statuses.is_empty());
    }

    #[test]
    fn poll_drains_both_channels() {
        let (view_tx, view_rx) = channel();
        let (bg_tx, bg_rx) = channel();
        let mut state = UploadState {
            view_receiver: Some(view_rx),
            background_receiver: Some(bg_rx),
            ..Default::default()
        };

        assert!(!state.poll());

        ChannelView::untagged(view_tx).set_progress(100);
        bg_tx
            .send(BackgroundEvent::Health(Err("Server unreachable".into())))
            .unwrap();

        assert!(state.poll());
        assert_eq!(state.progress, 100);
        assert_eq!(
            state.server_health,
            ServerHealth::Offline("Server unreachable".into())
        );
    }

    #[test]
    fn late_reset_from_previous_run_does_not_hide_new_progress() {
        let (view_tx, view_rx) = channel();
        let mut state = UploadState {
            view_receiver: Some(view_rx),
            ..Default::default()
        };

        let first = state.begin_run();
        let mut first_view = ChannelView::for_run(view_tx.clone(), first);
        first_view.set_progress(100);
        first_view.set_busy(false);
        state.poll();
        assert!(!state.is_busy);

        let second = state.begin_run();
        let mut second_view = ChannelView::for_run(view_tx.clone(), second);
        second_view.set_busy(true);
        second_view.set_progress_visible(true);
        second_view.set_progress(0);
        // The first run's delayed reset lands while the second is uploading.
        first_view.set_progress(0);
        first_view.set_progress_visible(false);
        second_view.set_progress(50);
        state.poll();

        assert!(state.is_busy);
        assert!(state.progress_visible);
        assert_eq!(state.progress, 50);
    }

    #[test]
    fn untagged_updates_always_apply() {
        let mut state = UploadState::default();
        state.begin_run();
        state.apply_tagged(TaggedEvent {
            run: None,
            event: ViewEvent::Status("Folder opened successfully".into()),
        });
        assert_eq!(state.status_text, "Folder opened successfully");
    }

    #[test]
    fn saved_report_is_remembered() {
        let mut state = UploadState {
            is_downloading: true,
            ..Default::default()
        };
        state.apply_background(BackgroundEvent::ReportSaved(Ok(PathBuf::from(
            "out/Payables_Summary.xlsx",
        ))));

        assert!(!state.is_downloading);
        assert_eq!(
            state.last_report.as_deref(),
            Some(std::path::Path::new("out/Payables_Summary.xlsx"))
        );
    }
}
