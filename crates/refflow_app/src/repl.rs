//! Line-oriented front end over a [`Session`].
//!
//! One task owns the session. It waits on three sources at once: stdin
//! lines, export status changes, and the spawned export task. Exports run
//! on their own task so the transport and tagging stay usable meanwhile.

use std::future::pending;
use std::path::PathBuf;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use refflow_core::config::Settings;
use refflow_core::export::{ExportArtifact, ExportResult, ExportStatus, FfmpegEngine};
use refflow_core::models::{PlaylistId, TagDraft};
use refflow_core::session::{FocusTarget, Key, KeyOutcome, NoticeLevel, Session, TagClick};
use refflow_core::store::ToggleOutcome;
use refflow_core::timeline::format_time;

use crate::command::{Command, HELP};

enum Input {
    Line(Option<String>),
    Status,
    ExportFinished(Result<ExportResult<ExportArtifact>, tokio::task::JoinError>),
}

pub struct Repl {
    session: Session,
    status_rx: watch::Receiver<ExportStatus>,
    running: Option<JoinHandle<ExportResult<ExportArtifact>>>,
}

impl Repl {
    pub fn new(settings: Settings) -> Self {
        let session = Session::headless(settings);
        let status_rx = session.export_status();
        Self {
            session,
            status_rx,
            running: None,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        println!("RefFlow {} - type 'help' for commands", refflow_core::version());

        loop {
            let running = &mut self.running;
            let input = tokio::select! {
                line = lines.next_line() => Input::Line(line?),
                changed = self.status_rx.changed() => match changed {
                    Ok(()) => Input::Status,
                    Err(_) => Input::Line(None),
                },
                joined = async {
                    match running.as_mut() {
                        Some(handle) => handle.await,
                        None => pending().await,
                    }
                } => Input::ExportFinished(joined),
            };

            match input {
                Input::Line(None) => break,
                Input::Line(Some(line)) => match Command::parse(&line) {
                    Ok(Some(Command::Quit)) => break,
                    Ok(Some(command)) => self.execute(command),
                    Ok(None) => {}
                    Err(err) => println!("[error] {}", err),
                },
                Input::Status => self.print_status(),
                Input::ExportFinished(joined) => {
                    self.running = None;
                    match joined {
                        Ok(result) => {
                            if let Ok(path) = self.session.finish_export(result) {
                                println!("saved {}", path.display());
                            }
                        }
                        Err(err) => {
                            tracing::error!(error = %err, "Export task aborted");
                            println!("[error] Export task aborted: {}", err);
                        }
                    }
                }
            }
            self.print_notices();
        }

        if let Some(handle) = self.running.take() {
            self.session.cancel_export();
            if let Ok(result) = handle.await {
                let _ = self.session.finish_export(result);
            }
            self.print_notices();
        }
        tracing::info!("RefFlow shutting down");
        Ok(())
    }

    fn print_notices(&mut self) {
        for notice in self.session.drain_notices() {
            let level = match notice.level {
                NoticeLevel::Success => "ok",
                NoticeLevel::Info => "info",
                NoticeLevel::Error => "error",
            };
            println!("[{}] {}", level, notice.message);
        }
    }

    fn print_status(&mut self) {
        let status = self.status_rx.borrow_and_update().clone();
        match status {
            ExportStatus::Running { percent, stage } => println!("export: {} {}%", stage, percent),
            ExportStatus::Done { file_name } => println!("export: done ({})", file_name),
            ExportStatus::Failed { message } => println!("export: failed ({})", message),
            ExportStatus::Idle => {}
        }
    }

    fn execute(&mut self, command: Command) {
        match command {
            Command::Help => println!("{}", HELP),
            Command::Quit => {}
            Command::State => match serde_json::to_string_pretty(&self.session.snapshot()) {
                Ok(json) => println!("{}", json),
                Err(err) => println!("[error] {}", err),
            },
            Command::Timeline => self.print_timeline(),

            Command::Load(path) => {
                if self.session.load_video(&path).is_ok() {
                    self.session.clock_mut().set_duration(None);
                }
            }
            Command::Duration(seconds) => {
                self.session.clock_mut().set_duration(Some(seconds));
                self.session.on_duration_change(seconds);
                self.print_position();
            }
            Command::Advance(seconds) => {
                self.session.clock_mut().advance(seconds);
                self.session.sync_clock();
                self.print_position();
            }
            Command::Play => {
                if !self.session.playback().is_playing {
                    self.session.toggle_play_pause();
                }
            }
            Command::Pause => {
                if self.session.playback().is_playing {
                    self.session.toggle_play_pause();
                }
            }
            Command::TogglePlay => {
                let playing = self.session.toggle_play_pause();
                println!("{}", if playing { "playing" } else { "paused" });
            }
            Command::Seek(time) => {
                self.session.jump_to_time(time);
                self.print_position();
            }
            Command::SeekFraction(fraction) => {
                self.session.seek_fraction(fraction);
                self.print_position();
            }
            Command::Skip(seconds) => {
                self.session.skip(seconds);
                self.print_position();
            }
            Command::SkipForward => {
                self.session.skip_forward();
                self.print_position();
            }
            Command::SkipBack => {
                self.session.skip_back();
                self.print_position();
            }
            Command::Rate(rate) => {
                if self.session.set_rate(rate).is_ok() {
                    println!("rate {}x", rate);
                }
            }

            Command::Tagging(on) => {
                let on = match on {
                    Some(on) => {
                        self.session.set_tagging_mode(on);
                        on
                    }
                    None => self.session.toggle_tagging_mode(),
                };
                println!("tagging {}", if on { "on" } else { "off" });
            }
            Command::Key(name) => match self.session.handle_key(Key::from_name(&name), FocusTarget::Document) {
                KeyOutcome::Cancelled => println!("recording cancelled"),
                KeyOutcome::Recording(outcome) => self.print_toggle(outcome),
                KeyOutcome::Ignored => {}
            },
            Command::Click(tag) => match self.session.click_tag(tag) {
                Ok(TagClick::Recording(outcome)) => self.print_toggle(outcome),
                Ok(TagClick::Filter(Some(tag))) => println!("filter {}", tag),
                Ok(TagClick::Filter(None)) => println!("filter cleared"),
                Err(_) => {}
            },
            Command::Filter(filter) => self.session.set_tag_filter(filter),
            Command::Next => {
                if self.session.jump_to_next_event().is_some() {
                    self.print_position();
                }
            }
            Command::Prev => {
                if self.session.jump_to_prev_event().is_some() {
                    self.print_position();
                }
            }
            Command::Goto(event) => {
                if self.session.jump_to_event(event).is_ok() {
                    self.print_position();
                }
            }

            Command::TagAdd { name, color, shortcut } => {
                if let Ok(id) = self.session.add_tag(&TagDraft::new(name, color, shortcut)) {
                    println!("{}", id);
                }
            }
            Command::TagEdit { id, name, color, shortcut } => {
                let _ = self.session.update_tag(id, &TagDraft::new(name, color, shortcut));
            }
            Command::TagRemove(id) => {
                if let Ok(removed) = self.session.delete_tag(id) {
                    if !removed.is_empty() {
                        println!("{} event(s) removed", removed.len());
                    }
                }
            }
            Command::EventRemove(id) => {
                let _ = self.session.delete_event(id);
            }

            Command::PlaylistNew(name) => {
                if let Ok(id) = self.session.create_playlist(&name) {
                    println!("{}", id);
                }
            }
            Command::PlaylistUse(id) => {
                let _ = self.session.set_active_playlist(id);
            }
            Command::PlaylistAdd(event) => {
                let _ = self.session.add_to_active_playlist(event);
            }
            Command::PlaylistRemove(id, event) => {
                if let Ok(false) = self.session.remove_event_from_playlist(id, event) {
                    println!("{} is not in {}", event, id);
                }
            }
            Command::PlaylistMove(id, from, to) => {
                let _ = self.session.reorder_playlist(id, from, to);
            }
            Command::PlaylistDelete(id) => {
                let _ = self.session.delete_playlist(id);
            }
            Command::PlayAll => {
                if self.session.play_all().is_some() {
                    self.print_position();
                }
            }

            Command::ZoomIn => println!("zoom {:.1}x", self.session.zoom_in()),
            Command::ZoomOut => println!("zoom {:.1}x", self.session.zoom_out()),
            Command::Zoom(zoom) => println!("zoom {:.1}x", self.session.set_timeline_zoom(zoom)),
            Command::Scroll(scroll) => self.session.set_timeline_scroll(scroll),

            Command::Export(playlist) => self.start_export(playlist),
            Command::CancelExport => self.session.cancel_export(),
        }
    }

    fn start_export(&mut self, playlist: Option<PlaylistId>) {
        let Some(playlist) = playlist.or_else(|| self.session.store().active_playlist().map(|p| p.id)) else {
            println!("[error] Please select a playlist first");
            return;
        };

        let Ok(job) = self.session.prepare_export(playlist) else {
            return;
        };

        let settings = self.session.settings();
        let temp_root = PathBuf::from(&settings.paths.temp_root);
        let mut engine = FfmpegEngine::new(settings.export.ffmpeg_cmd(), temp_root)
            .with_keep_work_dir(settings.export.keep_work_dir);

        println!("exporting {} clip(s) from {}", job.plan().clips.len(), job.plan().playlist_name);
        self.running = Some(tokio::spawn(async move { job.run(&mut engine).await }));
    }

    fn print_toggle(&self, outcome: ToggleOutcome) {
        match outcome {
            ToggleOutcome::Started(active) => {
                println!("recording {} from {}", active.tag_id, format_time(active.start_time));
            }
            ToggleOutcome::Stopped(finished) => {
                println!(
                    "recorded {} {} - {}",
                    finished.tag_id,
                    format_time(finished.start_time),
                    format_time(finished.end_time)
                );
            }
            ToggleOutcome::Ignored => println!("another tag is recording"),
        }
    }

    fn print_position(&self) {
        let playback = self.session.playback();
        println!(
            "{} / {}",
            format_time(playback.current_time),
            format_time(playback.duration)
        );
    }

    fn print_timeline(&self) {
        let layout = self.session.timeline_layout();
        println!("{} at {:.1}%", layout.time_label, layout.playhead_percent);
        if let Some(filter) = &layout.filter_label {
            println!("filter: {}", filter);
        }
        for marker in &layout.markers {
            println!(
                "  {:<8} {:>6.2}% +{:<6.2}% {}",
                marker.event_id, marker.left_percent, marker.width_percent, marker.label
            );
        }
        if let Some(recording) = &layout.recording {
            println!(
                "  recording {} {:>6.2}% +{:.2}%",
                recording.tag_id, recording.left_percent, recording.width_percent
            );
        }
    }
}
