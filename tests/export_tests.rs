// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for the session: capture, photobooth and zip export

use base64::{Engine as _, engine::general_purpose};
use futures::future::BoxFuture;
use image::{Rgba, RgbaImage};
use pocketpix::app::{Command, DELETE_ALL_PROMPT, ExportKind, Mode, Outcome, Prompter, Session};
use pocketpix::backends::camera::{
    BackendResult, CameraFrame, CaptureDevice, FrameSource, SourceRequest, TestPatternDevice,
};
use pocketpix::constants::photobooth::{STRIP_WIDTH, strip_height};
use pocketpix::errors::{BackendError, ExportError};
use pocketpix::pipelines::export::{ArchivePackager, DownloadTrigger, Exporter, ZipPackager};
use pocketpix::pipelines::photo::CaptureSurface;
use std::collections::{BTreeMap, VecDeque};
use std::io::{Cursor, Read};
use std::sync::{Arc, Mutex};

/// Keeps every download in memory
#[derive(Default)]
struct RecordingDownloads {
    files: Mutex<Vec<(String, Vec<u8>)>>,
}

impl RecordingDownloads {
    fn files(&self) -> Vec<(String, Vec<u8>)> {
        self.files.lock().unwrap().clone()
    }
}

impl DownloadTrigger for RecordingDownloads {
    fn trigger(&self, filename: &str, bytes: &[u8]) {
        self.files
            .lock()
            .unwrap()
            .push((filename.to_string(), bytes.to_vec()));
    }
}

/// Records what it was asked to pack and returns a fixed blob
#[derive(Default)]
struct RecordingPackager {
    requests: Mutex<Vec<BTreeMap<String, String>>>,
}

impl ArchivePackager for RecordingPackager {
    fn package(&self, entries: BTreeMap<String, String>) -> BoxFuture<'static, Result<Vec<u8>, ExportError>> {
        self.requests.lock().unwrap().push(entries);
        Box::pin(async { Ok::<Vec<u8>, ExportError>(b"archive".to_vec()) })
    }
}

/// Answers confirmations from a script and remembers alerts
#[derive(Default)]
struct ScriptedPrompter {
    answers: VecDeque<bool>,
    confirms: Vec<String>,
    alerts: Vec<String>,
}

impl ScriptedPrompter {
    fn answering(answers: &[bool]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            ..Default::default()
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&mut self, message: &str) -> bool {
        self.confirms.push(message.to_string());
        self.answers.pop_front().unwrap_or(false)
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}

struct StillSource(Option<Arc<CameraFrame>>);

impl FrameSource for StillSource {
    fn current_frame(&self) -> Option<Arc<CameraFrame>> {
        self.0.clone()
    }

    fn stop(&mut self) {
        self.0 = None;
    }
}

struct BrokenDevice;

impl CaptureDevice for BrokenDevice {
    fn name(&self) -> String {
        "broken".to_string()
    }

    fn acquire(&self, _request: SourceRequest) -> BoxFuture<'static, BackendResult<Box<dyn FrameSource>>> {
        Box::pin(async {
            Err::<Box<dyn FrameSource>, BackendError>(BackendError::DeviceNotFound(
                "/dev/video9".to_string(),
            ))
        })
    }
}

fn gradient_surface(width: u32, height: u32) -> CaptureSurface {
    let frame = CameraFrame::from_rgba(RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
    }));
    CaptureSurface::with_source(Box::new(StillSource(Some(Arc::new(frame)))))
}

fn session_with(
    surface: CaptureSurface,
    packager: Arc<dyn ArchivePackager>,
) -> (Session, Arc<RecordingDownloads>) {
    let downloads = Arc::new(RecordingDownloads::default());
    let exporter = Exporter::new(packager, downloads.clone());
    (Session::new(surface, exporter), downloads)
}

fn send(session: &mut Session, prompter: &mut ScriptedPrompter, commands: &[Command]) -> Vec<Outcome> {
    commands
        .iter()
        .map(|&c| session.dispatch(c, prompter))
        .collect()
}

fn snap(session: &mut Session, times: usize) {
    let mut prompter = ScriptedPrompter::default();
    for _ in 0..times {
        assert!(matches!(
            session.dispatch(Command::Shutter, &mut prompter),
            Outcome::Captured(_)
        ));
    }
}

#[tokio::test]
async fn test_captures_are_prepended() {
    let (mut session, _) = session_with(gradient_surface(160, 120), Arc::new(ZipPackager));
    let mut prompter = ScriptedPrompter::default();

    let first = match session.dispatch(Command::Shutter, &mut prompter) {
        Outcome::Captured(record) => record,
        other => panic!("expected a capture, got {:?}", other),
    };
    snap(&mut session, 1);

    assert_eq!(session.log().len(), 2);
    assert_eq!(session.log().get(1).unwrap().id, first.id);
    assert_ne!(first.display_image, first.export_image);
}

#[tokio::test]
async fn test_shutter_ignored_outside_camera() {
    let (mut session, _) = session_with(gradient_surface(64, 48), Arc::new(ZipPackager));
    let mut prompter = ScriptedPrompter::default();

    send(&mut session, &mut prompter, &[Command::MenuButton, Command::Shutter]);
    assert_eq!(session.log().len(), 0);
}

#[tokio::test]
async fn test_unavailable_device_leaves_surface_idle() {
    let surface = CaptureSurface::open(&BrokenDevice, SourceRequest::default()).await;
    assert!(!surface.is_live());

    let (mut session, _) = session_with(surface, Arc::new(ZipPackager));
    let mut prompter = ScriptedPrompter::default();
    let outcomes = send(&mut session, &mut prompter, &[Command::Shutter, Command::MenuButton]);

    assert!(matches!(outcomes[0], Outcome::None));
    assert_eq!(session.log().len(), 0);
    assert_eq!(session.nav().mode, Mode::Menu, "navigation keeps working");
}

#[tokio::test]
async fn test_zero_dimension_frame_adds_nothing() {
    let frame = CameraFrame::from_rgba(RgbaImage::new(0, 0));
    let surface = CaptureSurface::with_source(Box::new(StillSource(Some(Arc::new(frame)))));
    let (mut session, _) = session_with(surface, Arc::new(ZipPackager));
    let mut prompter = ScriptedPrompter::default();

    session.dispatch(Command::Shutter, &mut prompter);
    assert_eq!(session.log().len(), 0);
}

#[tokio::test]
async fn test_test_pattern_device_captures() {
    let surface = CaptureSurface::open(&TestPatternDevice, SourceRequest { width: 320, height: 240 }).await;
    let (mut session, _) = session_with(surface, Arc::new(ZipPackager));

    snap(&mut session, 1);
    let record = session.log().get(0).unwrap();
    assert_eq!((record.display_image.width, record.display_image.height), (320, 240));
}

#[tokio::test]
async fn test_photobooth_export_end_to_end() {
    let (mut session, downloads) = session_with(gradient_surface(320, 180), Arc::new(ZipPackager));
    snap(&mut session, 5);

    let mut prompter = ScriptedPrompter::default();
    use Command::*;
    send(&mut session, &mut prompter, &[MenuButton, Ok]);
    assert!(matches!(session.nav().mode, Mode::SelectPhotobooth { .. }));

    let outcomes = send(&mut session, &mut prompter, &[Ok, Right, Ok, Right, Ok, Right, Ok]);
    assert!(matches!(
        outcomes.last(),
        Some(Outcome::ExportStarted(ExportKind::Photobooth))
    ));
    assert_eq!(session.nav().mode, Mode::Menu);

    let reports = session.wait_for_exports().await;
    assert_eq!(reports.len(), 1);
    let filename = reports[0].result.as_ref().unwrap();
    assert!(filename.starts_with("PocketPix_Photobooth_"));
    assert!(filename.ends_with(".jpg"));

    let files = downloads.files();
    assert_eq!(files.len(), 1);
    assert_eq!(&files[0].0, filename);
    let strip = image::load_from_memory(&files[0].1).unwrap();
    assert_eq!((strip.width(), strip.height()), (STRIP_WIDTH, strip_height()));
    assert!(!session.is_exporting());
}

#[tokio::test]
async fn test_photobooth_with_too_few_photos_warns() {
    let (mut session, downloads) = session_with(gradient_surface(64, 48), Arc::new(ZipPackager));
    snap(&mut session, 3);

    let mut prompter = ScriptedPrompter::default();
    send(&mut session, &mut prompter, &[Command::MenuButton, Command::Ok]);

    assert_eq!(prompter.alerts.len(), 1);
    assert!(prompter.alerts[0].contains('4'));
    assert_eq!(session.nav().mode, Mode::Menu);
    assert!(session.wait_for_exports().await.is_empty());
    assert!(downloads.files().is_empty());
}

#[tokio::test]
async fn test_zip_export_packs_stamped_copies() {
    let (mut session, downloads) = session_with(gradient_surface(96, 72), Arc::new(ZipPackager));
    snap(&mut session, 4);

    let mut prompter = ScriptedPrompter::default();
    use Command::*;
    let outcomes = send(
        &mut session,
        &mut prompter,
        &[MenuButton, Down, Ok, Right, Ok, Right, Right, Ok, MenuButton],
    );
    assert!(matches!(
        outcomes.last(),
        Some(Outcome::ExportStarted(ExportKind::Zip))
    ));
    assert_eq!(session.nav().mode, Mode::Menu);
    assert!(session.nav().mode.selection().is_empty());

    let reports = session.wait_for_exports().await;
    let filename = reports[0].result.as_ref().unwrap();
    assert!(filename.starts_with("PocketPix_Memories_") && filename.ends_with(".zip"));

    let files = downloads.files();
    let mut archive = zip::ZipArchive::new(Cursor::new(files[0].1.clone())).unwrap();
    let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
    names.sort();
    assert_eq!(names, vec!["PocketPix_IMG_1001.jpg", "PocketPix_IMG_1003.jpg"]);

    let mut entry = Vec::new();
    archive
        .by_name("PocketPix_IMG_1003.jpg")
        .unwrap()
        .read_to_end(&mut entry)
        .unwrap();
    assert_eq!(entry, session.log().get(3).unwrap().export_image.bytes());
}

#[tokio::test]
async fn test_packager_receives_base64_without_prefix() {
    let packager = Arc::new(RecordingPackager::default());
    let (mut session, downloads) = session_with(gradient_surface(64, 48), packager.clone());
    snap(&mut session, 2);

    let mut prompter = ScriptedPrompter::default();
    use Command::*;
    send(&mut session, &mut prompter, &[MenuButton, Down, Ok, Ok, MenuButton]);
    session.wait_for_exports().await;

    let requests = packager.requests.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    let payload = &requests[0]["PocketPix_IMG_1000.jpg"];
    assert!(!payload.starts_with("data:"));
    let bytes = general_purpose::STANDARD.decode(payload).unwrap();
    assert_eq!(bytes, session.log().get(0).unwrap().export_image.bytes());

    assert_eq!(downloads.files()[0].1, b"archive");
}

#[tokio::test]
async fn test_delete_all_requires_confirmation() {
    let (mut session, _) = session_with(gradient_surface(64, 48), Arc::new(ZipPackager));
    snap(&mut session, 2);

    use Command::*;
    let mut declining = ScriptedPrompter::answering(&[false]);
    send(&mut session, &mut declining, &[MenuButton, Down, Down, Ok]);
    assert_eq!(declining.confirms, vec![DELETE_ALL_PROMPT.to_string()]);
    assert_eq!(session.log().len(), 2);
    assert_eq!(session.nav().mode, Mode::Menu);

    let mut accepting = ScriptedPrompter::answering(&[true]);
    send(&mut session, &mut accepting, &[Ok]);
    assert!(session.log().is_empty());
    assert_eq!(session.nav().mode, Mode::Camera);
}

#[tokio::test]
async fn test_finishing_empty_zip_selection_warns() {
    let (mut session, downloads) = session_with(gradient_surface(64, 48), Arc::new(ZipPackager));
    snap(&mut session, 2);

    let mut prompter = ScriptedPrompter::default();
    use Command::*;
    let outcomes = send(&mut session, &mut prompter, &[MenuButton, Down, Ok, MenuButton]);

    assert!(matches!(outcomes.last(), Some(Outcome::None)));
    assert_eq!(prompter.alerts, vec!["No photos selected, nothing to export".to_string()]);
    assert_eq!(session.nav().mode, Mode::Menu);
    assert!(session.wait_for_exports().await.is_empty());
    assert!(downloads.files().is_empty());
}
