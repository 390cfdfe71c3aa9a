//! Parsing of front-end command lines.

use std::fmt;

use refflow_core::models::{EventId, PlaylistId, TagId};

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Quit,
    State,
    Timeline,

    Load(String),
    Duration(f64),
    Advance(f64),
    Play,
    Pause,
    TogglePlay,
    Seek(f64),
    SeekFraction(f64),
    Skip(f64),
    SkipForward,
    SkipBack,
    Rate(f64),

    Tagging(Option<bool>),
    Key(String),
    Click(TagId),
    Filter(Option<TagId>),
    Next,
    Prev,
    Goto(EventId),

    TagAdd { name: String, color: String, shortcut: String },
    TagEdit { id: TagId, name: String, color: String, shortcut: String },
    TagRemove(TagId),
    EventRemove(EventId),

    PlaylistNew(String),
    PlaylistUse(PlaylistId),
    PlaylistAdd(EventId),
    PlaylistRemove(PlaylistId, EventId),
    PlaylistMove(PlaylistId, usize, usize),
    PlaylistDelete(PlaylistId),
    PlayAll,

    ZoomIn,
    ZoomOut,
    Zoom(f64),
    Scroll(f64),

    Export(Option<PlaylistId>),
    CancelExport,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError(String);

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ParseError {}

fn err<T>(message: impl Into<String>) -> Result<T, ParseError> {
    Err(ParseError(message.into()))
}

pub const HELP: &str = "\
Transport:  load <file> | duration <s> | play | pause | toggle | advance <s>
            seek <s> | seekpct <0..1> | skip <±s> | ff | rw | rate <x>
Tagging:    tagging [on|off] | key <k> | click <tag> | filter <tag|none>
            next | prev | goto <event>
Tags:       tag add <name> <#rrggbb> [key] | tag edit <id> <name> <#rrggbb> [key] | tag rm <id>
Events:     event rm <id>
Playlists:  playlist new <name> | playlist use <id> | playlist add <event>
            playlist remove <id> <event> | playlist move <id> <from> <to>
            playlist rm <id> | playall
Timeline:   zoom in|out|<x> | scroll <px> | timeline
Export:     export [playlist] | cancel
Other:      state | help | quit";

impl Command {
    /// Parse one line. Blank lines and `#` comments yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let words: Vec<&str> = line.split_whitespace().collect();
        let args = &words[1..];
        let rest = || line[words[0].len()..].trim().to_string();

        let command = match words[0].to_lowercase().as_str() {
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            "state" => Command::State,
            "timeline" => Command::Timeline,

            "load" => {
                let path = rest();
                if path.is_empty() {
                    return err("usage: load <file>");
                }
                Command::Load(path)
            }
            "duration" => Command::Duration(number(args, 0)?),
            "advance" => Command::Advance(number(args, 0)?),
            "play" => Command::Play,
            "pause" => Command::Pause,
            "toggle" => Command::TogglePlay,
            "seek" => Command::Seek(number(args, 0)?),
            "seekpct" => Command::SeekFraction(number(args, 0)?),
            "skip" => Command::Skip(number(args, 0)?),
            "ff" => Command::SkipForward,
            "rw" => Command::SkipBack,
            "rate" => Command::Rate(number(args, 0)?),

            "tagging" => match args.first().copied() {
                None => Command::Tagging(None),
                Some("on") => Command::Tagging(Some(true)),
                Some("off") => Command::Tagging(Some(false)),
                Some(other) => return err(format!("expected on/off, got '{}'", other)),
            },
            "key" => match args.first() {
                Some(k) => Command::Key(k.to_string()),
                None => return err("usage: key <k>"),
            },
            "click" => Command::Click(TagId(id(args, 0, "tag")?)),
            "filter" => match args.first().copied() {
                None | Some("none") => Command::Filter(None),
                Some(_) => Command::Filter(Some(TagId(id(args, 0, "tag")?))),
            },
            "next" => Command::Next,
            "prev" => Command::Prev,
            "goto" => Command::Goto(EventId(id(args, 0, "event")?)),

            "tag" => parse_tag(args)?,
            "event" => match args {
                ["rm", _] => Command::EventRemove(EventId(id(args, 1, "event")?)),
                _ => return err("usage: event rm <id>"),
            },
            "playlist" => parse_playlist(args, line)?,
            "playall" => Command::PlayAll,

            "zoom" => match args.first().copied() {
                Some("in") => Command::ZoomIn,
                Some("out") => Command::ZoomOut,
                Some(_) => Command::Zoom(number(args, 0)?),
                None => return err("usage: zoom in|out|<x>"),
            },
            "scroll" => Command::Scroll(number(args, 0)?),

            "export" => match args.first() {
                None => Command::Export(None),
                Some(_) => Command::Export(Some(PlaylistId(id(args, 0, "playlist")?))),
            },
            "cancel" => Command::CancelExport,

            other => return err(format!("unknown command '{}' (try 'help')", other)),
        };
        Ok(Some(command))
    }
}

fn parse_tag(args: &[&str]) -> Result<Command, ParseError> {
    match args {
        ["add", name, color] => Ok(Command::TagAdd {
            name: name.to_string(),
            color: color.to_string(),
            shortcut: String::new(),
        }),
        ["add", name, color, shortcut] => Ok(Command::TagAdd {
            name: name.to_string(),
            color: color.to_string(),
            shortcut: shortcut.to_string(),
        }),
        ["edit", _, name, color, ..] => Ok(Command::TagEdit {
            id: TagId(id(args, 1, "tag")?),
            name: name.to_string(),
            color: color.to_string(),
            shortcut: args.get(4).map(|s| s.to_string()).unwrap_or_default(),
        }),
        ["rm", _] => Ok(Command::TagRemove(TagId(id(args, 1, "tag")?))),
        _ => err("usage: tag add|edit|rm ..."),
    }
}

fn parse_playlist(args: &[&str], line: &str) -> Result<Command, ParseError> {
    match args.first().copied() {
        Some("new") => {
            // Names may contain spaces.
            let name = line
                .split_once("new")
                .map(|(_, name)| name.trim().to_string())
                .unwrap_or_default();
            Ok(Command::PlaylistNew(name))
        }
        Some("use") => Ok(Command::PlaylistUse(PlaylistId(id(args, 1, "playlist")?))),
        Some("add") => Ok(Command::PlaylistAdd(EventId(id(args, 1, "event")?))),
        Some("remove") => Ok(Command::PlaylistRemove(
            PlaylistId(id(args, 1, "playlist")?),
            EventId(id(args, 2, "event")?),
        )),
        Some("move") => Ok(Command::PlaylistMove(
            PlaylistId(id(args, 1, "playlist")?),
            index(args, 2)?,
            index(args, 3)?,
        )),
        Some("rm") => Ok(Command::PlaylistDelete(PlaylistId(id(args, 1, "playlist")?))),
        _ => err("usage: playlist new|use|add|remove|move|rm ..."),
    }
}

fn number(args: &[&str], at: usize) -> Result<f64, ParseError> {
    let raw = args.get(at).ok_or_else(|| ParseError("missing number".into()))?;
    raw.parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| ParseError(format!("not a number: '{}'", raw)))
}

fn index(args: &[&str], at: usize) -> Result<usize, ParseError> {
    let raw = args.get(at).ok_or_else(|| ParseError("missing index".into()))?;
    raw.parse()
        .map_err(|_| ParseError(format!("not an index: '{}'", raw)))
}

/// Accept `3` as well as the display form `tag-3`.
fn id(args: &[&str], at: usize, kind: &str) -> Result<u64, ParseError> {
    let raw = args
        .get(at)
        .ok_or_else(|| ParseError(format!("missing {} id", kind)))?;
    let digits = raw
        .strip_prefix(kind)
        .and_then(|r| r.strip_prefix('-'))
        .unwrap_or(raw);
    digits
        .parse()
        .map_err(|_| ParseError(format!("not a {} id: '{}'", kind, raw)))
}
