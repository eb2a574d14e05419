// SPDX-License-Identifier: GPL-3.0-only

//! Session owner
//!
//! The session owns the photo log, navigation and filter state, the capture
//! surface and the exporter. Front ends feed it commands and read its state;
//! it runs the effects returned by the state machine.

use crate::app::state::{Command, Effect, FilterState, NavigationState};
use crate::errors::ExportError;
use crate::photo_log::{PhotoLog, PhotoRecord};
use crate::pipelines::export::Exporter;
use crate::pipelines::photo::CaptureSurface;
use futures::FutureExt;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Confirmation and alert dialogs
///
/// Calls block only the command that raised them.
pub trait Prompter {
    /// Ask a yes/no question
    fn confirm(&mut self, message: &str) -> bool;
    /// Show a message that only needs acknowledging
    fn alert(&mut self, message: &str);
}

pub const DELETE_ALL_PROMPT: &str = "Delete all photos? This cannot be undone.";

/// Which export path produced a report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Photobooth,
    Zip,
}

/// Result of a finished export task
#[derive(Debug)]
pub struct ExportReport {
    pub kind: ExportKind,
    /// File name handed to the download trigger
    pub result: Result<String, ExportError>,
}

/// What a dispatched command did, for the front end
#[derive(Debug)]
pub enum Outcome {
    /// Nothing beyond a possible state change
    None,
    /// A photo was added at index 0
    Captured(Arc<PhotoRecord>),
    /// An export is running in the background
    ExportStarted(ExportKind),
}

struct PendingExport {
    kind: ExportKind,
    handle: JoinHandle<Result<String, ExportError>>,
}

pub struct Session {
    log: PhotoLog,
    nav: NavigationState,
    filter: FilterState,
    surface: CaptureSurface,
    exporter: Exporter,
    pending: Vec<PendingExport>,
}

impl Session {
    pub fn new(surface: CaptureSurface, exporter: Exporter) -> Self {
        Self {
            log: PhotoLog::new(),
            nav: NavigationState::new(),
            filter: FilterState::default(),
            surface,
            exporter,
            pending: Vec::new(),
        }
    }

    pub fn with_filter(mut self, filter: FilterState) -> Self {
        self.filter = filter;
        self
    }

    pub fn log(&self) -> &PhotoLog {
        &self.log
    }

    pub fn nav(&self) -> &NavigationState {
        &self.nav
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn surface(&self) -> &CaptureSurface {
        &self.surface
    }

    pub fn is_exporting(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Handle one input command
    ///
    /// Must be called from within a tokio runtime; exports are spawned onto it.
    pub fn dispatch(&mut self, command: Command, prompter: &mut dyn Prompter) -> Outcome {
        let Some(effect) = self.nav.update(command, &mut self.filter, self.log.len()) else {
            return Outcome::None;
        };
        self.run_effect(effect, prompter)
    }

    fn run_effect(&mut self, effect: Effect, prompter: &mut dyn Prompter) -> Outcome {
        match effect {
            Effect::Capture => match self.surface.capture(&self.filter) {
                Some(record) => {
                    let record = self.log.prepend(record);
                    self.nav.handle_photo_added();
                    info!(id = %record.id, count = self.log.len(), "Photo added to log");
                    Outcome::Captured(record)
                }
                None => Outcome::None,
            },
            Effect::ExportPhotobooth(indices) => {
                let Some(records) = self.resolve(&indices) else {
                    return Outcome::None;
                };
                let exporter = self.exporter.clone();
                self.spawn_export(ExportKind::Photobooth, async move {
                    exporter.export_photobooth(records).await
                })
            }
            Effect::ExportZip(indices) => {
                let Some(records) = self.resolve(&indices) else {
                    return Outcome::None;
                };
                let selection: Vec<_> = indices.into_iter().zip(records).collect();
                let exporter = self.exporter.clone();
                self.spawn_export(ExportKind::Zip, async move { exporter.export_zip(selection).await })
            }
            Effect::Warn(warning) => {
                debug!(%warning, "Warning shown");
                prompter.alert(&warning.to_string());
                Outcome::None
            }
            Effect::ConfirmDeleteAll => {
                if prompter.confirm(DELETE_ALL_PROMPT) {
                    self.log.clear();
                    self.nav.handle_log_cleared();
                } else {
                    debug!("Delete all declined");
                }
                Outcome::None
            }
        }
    }

    fn resolve(&self, indices: &[usize]) -> Option<Vec<Arc<PhotoRecord>>> {
        match self.log.resolve(indices) {
            Ok(records) => Some(records),
            Err(index) => {
                warn!(error = %ExportError::IndexOutOfRange(index), "Export aborted");
                None
            }
        }
    }

    fn spawn_export<F>(&mut self, kind: ExportKind, task: F) -> Outcome
    where
        F: std::future::Future<Output = Result<String, ExportError>> + Send + 'static,
    {
        info!(?kind, "Export started");
        self.pending.push(PendingExport {
            kind,
            handle: tokio::spawn(task),
        });
        Outcome::ExportStarted(kind)
    }

    /// Collect exports that have finished, without waiting
    pub fn poll_exports(&mut self) -> Vec<ExportReport> {
        let mut finished = Vec::new();
        let mut still_running = Vec::new();

        for mut pending in self.pending.drain(..) {
            match (&mut pending.handle).now_or_never() {
                Some(joined) => finished.push(report(pending.kind, joined)),
                None => still_running.push(pending),
            }
        }

        self.pending = still_running;
        finished
    }

    /// Wait for every running export
    pub async fn wait_for_exports(&mut self) -> Vec<ExportReport> {
        let mut reports = Vec::new();
        for pending in self.pending.drain(..) {
            reports.push(report(pending.kind, pending.handle.await));
        }
        reports
    }

    /// Release the capture device
    pub fn shutdown(&mut self) {
        self.surface.shutdown();
    }
}

fn report(
    kind: ExportKind,
    joined: Result<Result<String, ExportError>, tokio::task::JoinError>,
) -> ExportReport {
    let result = joined.map_err(ExportError::from).and_then(|r| r);
    match &result {
        Ok(file) => info!(?kind, file = %file, "Export finished"),
        // A photo that cannot be drawn aborts the export without a download
        Err(ExportError::SurfaceUnavailable(reason)) => {
            warn!(?kind, reason = %reason, "Export aborted, drawing surface unavailable")
        }
        Err(e) => warn!(?kind, error = %e, "Export failed"),
    }
    ExportReport { kind, result }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::Mode;
    use crate::pipelines::export::{DownloadTrigger, ZipPackager};
    use crate::pipelines::photo::encoding::{EncodedImage, encode_jpeg};
    use crate::pipelines::photo::stamp::Timestamp;
    use image::{Rgba, RgbaImage};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingDownloads(Mutex<Vec<String>>);

    impl DownloadTrigger for RecordingDownloads {
        fn trigger(&self, filename: &str, _bytes: &[u8]) {
            self.0.lock().unwrap().push(filename.to_string());
        }
    }

    struct Silent;

    impl Prompter for Silent {
        fn confirm(&mut self, _message: &str) -> bool {
            false
        }

        fn alert(&mut self, _message: &str) {}
    }

    #[tokio::test]
    async fn test_failed_strip_leaves_no_download() {
        let downloads = Arc::new(RecordingDownloads::default());
        let exporter = Exporter::new(Arc::new(ZipPackager), downloads.clone());
        let mut session = Session::new(CaptureSurface::idle(), exporter);

        let good = encode_jpeg(&RgbaImage::from_pixel(64, 48, Rgba([0, 0, 255, 255])), 90).unwrap();
        let stamp = Timestamp {
            date: "02/14/05".into(),
            time: "7:15 PM".into(),
        };
        for i in 0..4 {
            let display = if i == 2 {
                EncodedImage::from_raw(b"not a jpeg".to_vec(), 64, 48)
            } else {
                good.clone()
            };
            session.log.prepend(PhotoRecord::new(display, good.clone(), stamp.clone()));
        }
        session.nav.mode = Mode::SelectPhotobooth {
            selection: vec![0, 1, 2],
        };
        session.nav.gallery_cursor = 3;

        let outcome = session.dispatch(Command::Ok, &mut Silent);
        assert!(matches!(outcome, Outcome::ExportStarted(ExportKind::Photobooth)));

        let reports = session.wait_for_exports().await;
        assert_eq!(reports.len(), 1);
        assert!(matches!(reports[0].result, Err(ExportError::SurfaceUnavailable(_))));
        assert!(downloads.0.lock().unwrap().is_empty());
        assert_eq!(session.log.len(), 4);
        assert_eq!(session.nav.mode, Mode::Menu);
    }
}
