//! Terminal jigsaw runner (default binary).
//!
//! Loads the image off-thread, slices it into a session, restores any save for
//! the level, then runs a crossterm event loop: left-button drags move pieces,
//! keys trigger power-ups. Rendering goes through the framebuffer renderer.

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use tui_jigsaw::adapter::{AppConfig, ImageLoader, ImageSource, SaveStore};
use tui_jigsaw::core::{
    Bitmap, PieceSet, PuzzleObserver, PuzzleSession, PuzzleSnapshot, SessionOptions,
};
use tui_jigsaw::input::{handle_key_event, handle_mouse_event, is_cancel, should_quit, PointerEvent};
use tui_jigsaw::term::{FrameBuffer, PuzzleView, TerminalRenderer, Viewport};
use tui_jigsaw::types::{Coord, PuzzleAction};

/// Pixel side of the logical surface the session lays its grid over
const SURFACE: u32 = 1000;
const FRAME: Duration = Duration::from_millis(33);

fn main() -> Result<()> {
    let config = AppConfig::from_env();
    init_tracing(config.log_path.as_deref())?;
    info!(
        level = config.level,
        difficulty = config.difficulty.as_str(),
        grid_size = config.grid_size,
        "starting"
    );

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &config);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn init_tracing(path: Option<&Path>) -> Result<()> {
    // The terminal is in raw mode; only log to a file.
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .compact()
        .init();
    Ok(())
}

fn time_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}

/// Logs session events and remembers completion.
#[derive(Default)]
struct EventLog {
    completed: bool,
}

impl PuzzleObserver for EventLog {
    fn on_piece_connected(&mut self, piece: Coord, connections: u8) {
        debug!(row = piece.row, col = piece.col, connections, "piece connected");
    }

    fn on_puzzle_completed(&mut self) {
        info!("puzzle completed");
        self.completed = true;
    }

    fn on_progress_changed(&mut self, correct: u32, locked: u32, total: u32) {
        debug!(correct, locked, total, "progress");
    }
}

struct App {
    session: PuzzleSession,
    image: Bitmap,
    show_sample: bool,
    store: Option<SaveStore>,
}

impl App {
    fn new(config: &AppConfig, image: Bitmap) -> Result<Self> {
        let options = SessionOptions {
            level: config.level,
            surface: SURFACE,
            seed: config.seed.unwrap_or_else(time_seed),
        };
        let puzzle = config.puzzle_config();
        let mut session =
            PuzzleSession::new(&image, puzzle, options).context("failed to start puzzle")?;

        let store = config.save_dir.clone().map(SaveStore::new);
        if let Some(store) = &store {
            match store.load(session.level()) {
                Ok(Some(record)) => match session.restore(&record) {
                    Ok(report) => info!(
                        restored = report.restored,
                        skipped = report.skipped,
                        "restored save"
                    ),
                    Err(err) => warn!(error = %err, "ignoring incompatible save"),
                },
                Ok(None) => {}
                Err(err) => warn!(error = %err, "could not read save"),
            }
        }
        session.drain_events();

        Ok(Self {
            session,
            image,
            show_sample: puzzle.show_sample,
            store,
        })
    }

    fn save(&self) {
        let Some(store) = &self.store else {
            return;
        };
        if self.session.is_complete() {
            return;
        }
        if let Err(err) = store.save(&self.session.save()) {
            warn!(error = %err, "save failed");
        }
    }

    fn apply(&mut self, action: PuzzleAction) {
        match action {
            PuzzleAction::AutoSolveOne => {
                self.session.auto_solve_one_piece();
            }
            PuzzleAction::ShuffleRemaining => {
                self.session.shuffle_remaining_pieces();
            }
            PuzzleAction::Save => self.save(),
            PuzzleAction::Reset => self.session.reset(),
            PuzzleAction::ToggleSample => self.show_sample = !self.show_sample,
        }
    }

    fn pointer(&mut self, view: &PuzzleView, viewport: Viewport, ev: PointerEvent) {
        let layout = view.layout(self.session.grid().size(), viewport);
        let (col, row) = ev.cell();
        let (x, y) = layout.cell_to_pixel(self.session.geometry(), col, row);
        match ev {
            PointerEvent::Down { .. } => {
                self.session.pick(x, y);
            }
            PointerEvent::Drag { .. } => {
                self.session.drag(x, y);
            }
            PointerEvent::Up { .. } => {
                self.session.drop(x, y);
            }
        }
    }

    /// Forward events; drop the save once the puzzle is done.
    fn dispatch_events(&mut self) {
        let mut log = EventLog::default();
        self.session.notify(&mut log);
        if log.completed {
            if let Some(store) = &self.store {
                if let Err(err) = store.remove(self.session.level()) {
                    warn!(error = %err, "could not remove save");
                }
            }
        }
    }
}

fn run(term: &mut TerminalRenderer, config: &AppConfig) -> Result<()> {
    let mut loader = ImageLoader::new()?;
    loader.request(ImageSource::from_path(config.image_path.clone()));

    let view = PuzzleView::new();
    let mut fb = FrameBuffer::new(0, 0);
    let mut snap = PuzzleSnapshot::default();
    let mut app: Option<App> = None;
    let no_pieces = PieceSet::new();

    loop {
        if app.is_none() {
            if let Some(loaded) = loader.try_recv() {
                let image = loaded.result.context("failed to load puzzle image")?;
                app = Some(App::new(config, image)?);
            }
        }

        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let viewport = Viewport::new(w, h);
        match &app {
            Some(a) => {
                a.session.snapshot_into(&mut snap);
                let sample = a.show_sample.then_some(&a.image);
                view.render_into(&snap, a.session.pieces(), sample, viewport, &mut fb);
            }
            None => {
                snap.clear();
                view.render_into(&snap, &no_pieces, None, viewport, &mut fb);
            }
        }
        term.draw_swap(&mut fb)?;

        if !event::poll(FRAME)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if should_quit(key) {
                    loader.cancel();
                    if let Some(a) = &app {
                        a.save();
                    }
                    return Ok(());
                }
                let Some(a) = app.as_mut() else {
                    continue;
                };
                if is_cancel(key) {
                    a.session.cancel_drag();
                } else if let Some(action) = handle_key_event(key) {
                    a.apply(action);
                }
                a.dispatch_events();
            }
            Event::Mouse(mouse) => {
                let (Some(a), Some(ev)) = (app.as_mut(), handle_mouse_event(mouse)) else {
                    continue;
                };
                a.pointer(&view, viewport, ev);
                a.dispatch_events();
            }
            Event::Resize(..) => term.invalidate(),
            _ => {}
        }
    }
}
