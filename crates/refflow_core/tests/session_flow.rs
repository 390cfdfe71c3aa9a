//! End-to-end behavior of a tagging session through the public API.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use refflow_core::config::Settings;
use refflow_core::export::{
    parse_concat_manifest, EngineError, EngineObserver, EngineResult, ExportStatus,
    TranscodeCommand, TranscodeEngine,
};
use refflow_core::media::ManualClock;
use refflow_core::models::{EventId, TagDraft, TagId};
use refflow_core::session::{FocusTarget, Key, KeyOutcome, NoticeLevel, Session};
use refflow_core::store::ToggleOutcome;

/// In-memory engine recording every call. Clips contain `[start-end]`.
#[derive(Default)]
struct RecordingEngine {
    files: HashMap<String, Vec<u8>>,
    calls: Vec<String>,
}

#[async_trait]
impl TranscodeEngine for RecordingEngine {
    async fn load(&mut self) -> EngineResult<()> {
        self.calls.push("load".into());
        Ok(())
    }

    async fn import_file(&mut self, name: &str, _source: &Path) -> EngineResult<()> {
        self.calls.push(format!("import {}", name));
        self.files.insert(name.to_string(), Vec::new());
        Ok(())
    }

    async fn write_file(&mut self, name: &str, contents: &[u8]) -> EngineResult<()> {
        self.files.insert(name.to_string(), contents.to_vec());
        Ok(())
    }

    async fn exec(
        &mut self,
        command: &TranscodeCommand,
        observer: &dyn EngineObserver,
        _cancel: &CancellationToken,
    ) -> EngineResult<()> {
        self.calls.push(command.to_string());
        observer.progress(1.0);
        let bytes = match command {
            TranscodeCommand::ExtractClip { start, duration, .. } => {
                format!("[{}-{}]", start, start + duration).into_bytes()
            }
            TranscodeCommand::Concat { manifest, .. } => {
                let listing = String::from_utf8_lossy(&self.files[manifest]).into_owned();
                parse_concat_manifest(&listing)
                    .iter()
                    .flat_map(|f| self.files[f].clone())
                    .collect()
            }
        };
        self.files.insert(command.output().to_string(), bytes);
        Ok(())
    }

    async fn read_file(&mut self, name: &str) -> EngineResult<Vec<u8>> {
        self.files
            .get(name)
            .cloned()
            .ok_or_else(|| EngineError::file_not_found(name))
    }

    async fn cleanup(&mut self) -> EngineResult<()> {
        self.calls.push("cleanup".into());
        Ok(())
    }
}

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn settings(&self) -> Settings {
        let mut settings = Settings::default();
        settings.paths.output_folder = self.dir.path().join("exports").display().to_string();
        settings.paths.logs_folder = self.dir.path().join("logs").display().to_string();
        settings.paths.temp_root = self.dir.path().join("temp").display().to_string();
        settings
    }

    fn video(&self) -> std::path::PathBuf {
        let path = self.dir.path().join("match.mp4");
        std::fs::write(&path, b"not really a video").unwrap();
        path
    }

    fn session(&self) -> Session {
        Session::new(self.settings(), ManualClock::with_duration(120.0))
    }
}

fn tag_for(session: &Session, key: char) -> TagId {
    session.store().catalog().find_by_shortcut(key).unwrap().id
}

fn record(session: &mut Session, tag: TagId, start: f64, end: f64) -> EventId {
    session.jump_to_time(start);
    session.start_recording(tag).unwrap();
    session.jump_to_time(end);
    session.stop_recording().unwrap()
}

fn assert_usage_counts_match(session: &Session) {
    for tag in session.store().catalog().tags() {
        assert_eq!(
            tag.usage_count as usize,
            session.store().events().count_for_tag(tag.id),
            "usage count of {}",
            tag.name
        );
    }
}

#[test]
fn usage_counts_follow_events_through_edits() {
    let ws = Workspace::new();
    let mut s = ws.session();
    let goal = tag_for(&s, 'g');
    let foul = tag_for(&s, 'f');

    let first = record(&mut s, goal, 1.0, 3.0);
    record(&mut s, goal, 4.0, 6.0);
    record(&mut s, foul, 7.0, 9.0);
    assert_usage_counts_match(&s);

    s.delete_event(first).unwrap();
    assert_usage_counts_match(&s);

    let removed = s.delete_tag(foul).unwrap();
    assert_eq!(removed.len(), 1);
    assert_usage_counts_match(&s);
    assert_eq!(s.store().events().len(), 1);
}

#[test]
fn start_then_immediate_stop_gives_zero_length_event() {
    let ws = Workspace::new();
    let mut s = ws.session();
    let pass = tag_for(&s, 'p');
    s.jump_to_time(12.0);
    s.start_recording(pass).unwrap();
    let id = s.stop_recording().unwrap();
    let event = s.store().event(id).unwrap();
    assert_eq!(event.start_time, 12.0);
    assert_eq!(event.duration(), 0.0);
}

#[test]
fn second_start_keeps_first_recording() {
    let ws = Workspace::new();
    let mut s = ws.session();
    let attack = tag_for(&s, 'a');
    let corner = tag_for(&s, 'c');

    s.jump_to_time(5.0);
    assert!(s.start_recording(attack).unwrap().is_some());
    s.jump_to_time(8.0);
    assert!(s.start_recording(corner).unwrap().is_none());

    let active = s.active_recording().unwrap();
    assert_eq!(active.tag_id, attack);
    assert_eq!(active.start_time, 5.0);
}

#[test]
fn shortcuts_follow_tagging_mode_and_focus() {
    let ws = Workspace::new();
    let mut s = ws.session();

    assert_eq!(s.handle_key(Key::Char('g'), FocusTarget::Document), KeyOutcome::Ignored);

    s.set_tagging_mode(true);
    assert_eq!(s.handle_key(Key::Char('g'), FocusTarget::TextInput), KeyOutcome::Ignored);
    assert!(matches!(
        s.handle_key(Key::Char('G'), FocusTarget::Document),
        KeyOutcome::Recording(ToggleOutcome::Started(_))
    ));
    assert_eq!(s.handle_key(Key::Escape, FocusTarget::TextInput), KeyOutcome::Cancelled);
    assert!(s.active_recording().is_none());
    assert!(s.store().events().is_empty());
}

#[test]
fn at_most_one_active_playlist() {
    let ws = Workspace::new();
    let mut s = ws.session();
    let count_active = |s: &Session| {
        s.store()
            .playlists()
            .playlists()
            .iter()
            .filter(|p| p.is_active)
            .count()
    };
    assert_eq!(count_active(&s), 1);

    let created = s.create_playlist("Set Pieces").unwrap();
    s.set_active_playlist(created).unwrap();
    assert_eq!(count_active(&s), 1);
    assert_eq!(s.store().active_playlist().unwrap().id, created);

    s.delete_playlist(created).unwrap();
    assert_eq!(count_active(&s), 0);
    assert!(s.store().active_playlist().is_none());
}

#[test]
fn reorder_keeps_playlist_members() {
    let ws = Workspace::new();
    let mut s = ws.session();
    let goal = tag_for(&s, 'g');
    let ids: Vec<EventId> = (0..4)
        .map(|i| record(&mut s, goal, i as f64 * 10.0, i as f64 * 10.0 + 2.0))
        .collect();
    for id in &ids {
        s.add_to_active_playlist(*id).unwrap();
    }
    let playlist = s.store().active_playlist().unwrap().id;

    s.reorder_playlist(playlist, 0, 3).unwrap();
    let mut after = s.store().playlist(playlist).unwrap().event_ids.clone();
    assert_eq!(after.len(), ids.len());
    assert_eq!(after[3], ids[0]);
    after.sort();
    assert_eq!(after, ids);

    assert!(s.reorder_playlist(playlist, 0, 4).is_err());
}

#[test]
fn duplicate_playlist_add_is_reported_not_stored() {
    let ws = Workspace::new();
    let mut s = ws.session();
    let goal = tag_for(&s, 'g');
    let id = record(&mut s, goal, 1.0, 2.0);

    assert!(s.add_to_active_playlist(id).unwrap());
    s.drain_notices();
    assert!(!s.add_to_active_playlist(id).unwrap());
    let notices = s.drain_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Info);
    assert_eq!(s.store().active_playlist().unwrap().len(), 1);
}

#[test]
fn seeking_clamps_to_media_bounds() {
    let ws = Workspace::new();
    let mut s = ws.session();
    assert_eq!(s.jump_to_time(-4.0), 0.0);
    assert_eq!(s.jump_to_time(500.0), 120.0);
    assert_eq!(s.skip(-30.0), 90.0);
}

#[test]
fn custom_tag_drives_shortcut_and_timeline() {
    let ws = Workspace::new();
    let mut s = ws.session();
    let save = s.add_tag(&TagDraft::new("Save", "#22c55e", "s")).unwrap();
    s.set_tagging_mode(true);

    s.jump_to_time(30.0);
    s.handle_key(Key::Char('s'), FocusTarget::Document);
    s.jump_to_time(36.0);
    s.handle_key(Key::Char('s'), FocusTarget::Document);

    let layout = s.timeline_layout();
    assert_eq!(layout.markers.len(), 1);
    assert_eq!(layout.markers[0].tag_id, save);
    assert_eq!(layout.markers[0].label, "Save: 00:30 - 00:36");
    assert!((layout.markers[0].left_percent - 25.0).abs() < 1e-9);
    assert!((layout.markers[0].width_percent - 5.0).abs() < 1e-9);
}

#[tokio::test]
async fn export_cuts_clips_in_chronological_order() {
    let ws = Workspace::new();
    let mut s = ws.session();
    let video = ws.video();
    s.load_video(&video).unwrap();
    let goal = tag_for(&s, 'g');

    let late = record(&mut s, goal, 10.0, 15.0);
    let early = record(&mut s, goal, 2.0, 5.0);
    s.add_to_active_playlist(late).unwrap();
    s.add_to_active_playlist(early).unwrap();
    let playlist = s.store().active_playlist().unwrap().id;
    s.drain_notices();

    let mut engine = RecordingEngine::default();
    let saved = s.export_playlist(playlist, &mut engine).await.unwrap();

    assert_eq!(std::fs::read(&saved).unwrap(), b"[2-5][10-15]");
    assert_eq!(saved.file_name().unwrap(), "Attacking Plays.mp4");
    assert_eq!(engine.calls.first().map(String::as_str), Some("load"));
    assert_eq!(engine.calls.last().map(String::as_str), Some("cleanup"));

    assert!(matches!(s.current_export_status(), ExportStatus::Done { .. }));
    assert!(!s.is_exporting());
    let notices = s.drain_notices();
    assert_eq!(notices.last().unwrap().message, "Export complete!");
}

#[tokio::test]
async fn rejected_exports_never_reach_the_engine() {
    let ws = Workspace::new();
    let mut s = ws.session();
    let playlist = s.store().active_playlist().unwrap().id;
    let mut engine = RecordingEngine::default();

    // Empty playlist.
    assert!(s.export_playlist(playlist, &mut engine).await.is_err());

    // Populated playlist but no video.
    let goal = tag_for(&s, 'g');
    let id = record(&mut s, goal, 1.0, 4.0);
    s.add_to_active_playlist(id).unwrap();
    s.drain_notices();
    assert!(s.export_playlist(playlist, &mut engine).await.is_err());
    let notices = s.drain_notices();
    assert_eq!(notices[0].message, "No video loaded");

    assert!(engine.calls.is_empty());
    assert_eq!(s.current_export_status(), ExportStatus::Idle);
}
