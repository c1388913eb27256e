//! outliner: A keyboard-driven outliner for trees of markdown notes.
#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use log::{error, info};
use outliner::app_state::{demo_tree, outline_text, AppState};
use outliner::debounce::next_wakeup;
use outliner::item::{Item, ItemId};
use outliner::link::Link;
use outliner::path::Path;
use outliner::store::{self, JsonStore};
use outliner::sync::SyncTracker;
use outliner::{config, logging, ui};
use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind, MouseButton,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// How long the event loop sleeps when no timer is pending.
const IDLE_POLL: Duration = Duration::from_millis(500);

#[derive(Parser)]
#[command(name = "outliner")]
#[command(about = "Keyboard-driven outliner for trees of markdown notes", long_about = None)]
struct Args {
    /// JSON record file to open (defaults to the configured store path)
    #[arg(value_name = "FILE")]
    store: Option<PathBuf>,

    /// Open zoomed into the node with this id
    #[arg(long, value_name = "ID")]
    zoom: Option<String>,

    /// Where the zoomed node was last seen, as dot-separated indices
    #[arg(long, value_name = "PATH", requires = "zoom")]
    at: Option<Path>,

    /// Print the outline as indented text and exit
    #[arg(long)]
    dump: bool,

    /// Start from a sample outline when the store is empty
    #[arg(long)]
    demo: bool,
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    let cfg = config::Config::load();

    if let Err(e) = logging::init(&cfg.log_file, &cfg.log_level) {
        eprintln!("Logging disabled: {e}");
    }

    let path = args
        .store
        .unwrap_or_else(|| PathBuf::from(&cfg.store_path));
    let mut json = JsonStore::new(path);
    let (root, tracker) = match store::open(&mut json).map_err(io::Error::other)? {
        Some(loaded) => loaded,
        None if args.demo => (demo_tree(), SyncTracker::default()),
        None => (Item::create(""), SyncTracker::default()),
    };
    info!(
        "opened {} with {} nodes",
        json.path().display(),
        root.count()
    );

    if args.dump {
        print!("{}", outline_text(&root, &Path::root(), cfg.indent_width));
        return Ok(());
    }

    let mut state = AppState::new(root, tracker, Box::new(json), &cfg);
    if let Some(id) = args.zoom {
        state.open_link(&Link {
            id: ItemId::from(id.as_str()),
            path: args.at,
        });
    }

    run_tui(state)
}

fn run_tui(mut app: AppState) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        error!("event loop failed: {e}");
        eprintln!("Error: {e}");
    }
    app.shutdown();
    if let Some(msg) = app.message.take() {
        eprintln!("{msg}");
    }

    result
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;
        if app.quit {
            return Ok(());
        }

        let wait = next_wakeup(&[&app.submit_timer, &app.sync_timer], Instant::now(), IDLE_POLL);
        if event::poll(wait)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key, Instant::now());
                }
                Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                    app.click(mouse.column, mouse.row);
                }
                _ => {}
            }
        }
        app.tick(Instant::now());
    }
}
