//! The terminal shell's state: one [`Session`] plus everything around it.
//!
//! The shell owns the only copy of the root (inside the session), the text
//! buffer of the node being edited, the two debounce timers and the store.
//! Keys are turned into commands through the [`Keymap`]; anything unbound is
//! typed into the edit buffer. The buffer is written into the tree when the
//! submit timer fires or right before any command runs, and the tree is
//! pushed to the store once the sync timer fires.

use crate::config::Config;
use crate::debounce::Debouncer;
use crate::edit::{Command, EditTarget, Session};
use crate::item::Item;
use crate::keymap::Keymap;
use crate::link::{Link, Resolution};
use crate::markdown::{render_plain, source_position, RenderedDoc, Renderer};
use crate::navigation;
use crate::path::Path;
use crate::selection::{Position, Resolved, Selection};
use crate::store::{self, Store};
use crate::sync::SyncTracker;
use edtui::{EditorEventHandler, EditorMode, EditorState, Index2, Lines};
use log::{info, warn};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Instant;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Which screen is shown.
pub enum View {
    /// The outline below the current start node.
    Outline,
    /// A deep link pointed at a node that no longer exists.
    NotFound(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// One drawn screen row, recorded by the UI for mouse hit-testing.
pub struct RowHit {
    /// Absolute screen row.
    pub y: u16,
    /// Screen column where the node's text begins.
    pub text_x: u16,
    /// The node drawn on this row.
    pub path: Path,
    /// Which of the node's rendered lines this row shows.
    pub line: usize,
}

/// Shell state shared by the event loop and the UI.
pub struct AppState {
    /// Owner of the root and of the edit target.
    pub session: Session,
    /// Text buffer of the node being edited.
    pub editor_state: Option<EditorState>,
    /// Drives the edit buffer for keys the keymap does not claim.
    pub editor_handler: EditorEventHandler,
    /// Key to command table.
    pub keymap: Keymap,
    /// Inline markdown renderer; plain text is shown if it failed to load.
    pub renderer: Option<Renderer>,
    /// Fires when typing pauses, writing the buffer into the tree.
    pub submit_timer: Debouncer,
    /// Fires when changes settle, pushing them to the store.
    pub sync_timer: Debouncer,
    /// What the store has already seen.
    pub tracker: SyncTracker,
    /// Where the outline is persisted.
    pub store: Box<dyn Store>,
    /// Active screen.
    pub view: View,
    /// Highlighted node while nothing is edited.
    pub selected: Path,
    /// Status feedback displayed in the help bar.
    pub message: Option<String>,
    /// Rows drawn by the last frame.
    pub rows: Vec<RowHit>,
    /// First outline line shown.
    pub scroll: usize,
    /// Columns per outline level.
    pub indent_width: usize,
    /// Set once the user asked to leave.
    pub quit: bool,
}

impl AppState {
    #[must_use]
    /// A viewing session over `root`.
    pub fn new(root: Item, tracker: SyncTracker, store: Box<dyn Store>, cfg: &Config) -> Self {
        let renderer = match Renderer::new() {
            Ok(renderer) => Some(renderer),
            Err(e) => {
                warn!("{e}; node text is shown unrendered");
                None
            }
        };
        let selected = if root.is_leaf() {
            Path::root()
        } else {
            Path::from([0])
        };
        Self {
            session: Session::new(root),
            editor_state: None,
            editor_handler: EditorEventHandler::default(),
            keymap: Keymap::standard(cfg.vim_bindings),
            renderer,
            submit_timer: Debouncer::new(cfg.submit_delay()),
            sync_timer: Debouncer::new(cfg.sync_delay()),
            tracker,
            store,
            view: View::Outline,
            selected,
            message: None,
            rows: Vec::new(),
            scroll: 0,
            indent_width: cfg.indent_width,
            quit: false,
        }
    }

    #[must_use]
    /// The current root.
    pub fn root(&self) -> &Item {
        self.session.root()
    }

    /// Render a node's text for viewing.
    pub fn render(&mut self, text: &str) -> RenderedDoc {
        match self.renderer.as_mut() {
            Some(renderer) => renderer.render(text),
            None => render_plain(text),
        }
    }

    #[must_use]
    /// Contents of the edit buffer, rows joined by newlines.
    pub fn pending_text(&self) -> Option<String> {
        self.editor_state.as_ref().map(|state| {
            state
                .lines
                .iter_row()
                .map(|line| line.iter().collect::<String>())
                .collect::<Vec<_>>()
                .join("\n")
        })
    }

    /// Rebuild the edit buffer from whatever the session now edits.
    fn sync_editor(&mut self) {
        self.editor_state = self.session.editing().and_then(|editing| {
            let node = self.session.root().find_by_path(&editing.path)?;
            let mut state = EditorState::new(Lines::from(node.text.as_str()));
            state.mode = EditorMode::Insert;
            state.cursor = Index2::new(editing.selection.focus.row, editing.selection.focus.column);
            Some(state)
        });
        if let Some(editing) = self.session.editing() {
            self.selected = editing.path.clone();
        }
    }

    /// Keep the session's caret in step with the edit buffer.
    fn record_caret(&mut self) {
        if let Some(state) = &self.editor_state {
            let focus = Position::new(state.cursor.row, state.cursor.col);
            self.session.set_caret(Resolved {
                anchor: focus,
                focus,
                has_focus: true,
            });
        }
    }

    /// Start editing `target`, committing whatever was being edited before.
    pub fn begin_edit(&mut self, target: &EditTarget) -> bool {
        self.commit_pending(Instant::now());
        self.session.leave();
        let started = self.session.begin(target);
        self.sync_editor();
        started
    }

    /// Write the edit buffer into the tree now, if it differs.
    pub fn commit_pending(&mut self, now: Instant) {
        self.submit_timer.cancel();
        self.record_caret();
        if let Some(text) = self.pending_text() {
            if self.session.submit(&text) {
                self.sync_timer.schedule(now);
            }
        }
    }

    /// Run `command` for the edited node and adopt the outcome.
    pub fn run_command(&mut self, command: Command, now: Instant) {
        self.submit_timer.cancel();
        self.record_caret();
        let pending = self.pending_text();
        let leaving = self.session.editing().map(|e| e.path.clone());
        let Some(outcome) = self.session.apply(command, pending.as_deref()) else {
            return;
        };
        if outcome.changed {
            self.sync_timer.schedule(now);
        }
        if outcome.target.is_none() {
            if let Some(path) = leaving {
                self.selected = path;
            }
        }
        self.sync_editor();
    }

    /// Handle one key press.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        self.message = None;
        match self.view {
            View::NotFound(_) => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                    self.view = View::Outline;
                    self.zoom(Path::root());
                }
            }
            View::Outline if self.editor_state.is_some() => self.handle_edit_key(key, now),
            View::Outline => self.handle_view_key(key, now),
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent, now: Instant) {
        let command = self.keymap.command_for(key).filter(|command| {
            *command != Command::Backspace || self.pending_text().is_some_and(|t| t.is_empty())
        });
        if let Some(command) = command {
            self.run_command(command, now);
            return;
        }
        let before = self.pending_text();
        if let Some(state) = self.editor_state.as_mut() {
            self.editor_handler.on_key_event(key, state);
            state.mode = EditorMode::Insert;
        }
        self.record_caret();
        if self.pending_text() != before {
            self.submit_timer.schedule(now);
        }
    }

    fn handle_view_key(&mut self, key: KeyEvent, now: Instant) {
        if let Some(command @ (Command::Toggle | Command::Expand | Command::Collapse)) =
            self.keymap.command_for(key)
        {
            self.apply_to_selected(command, now);
            return;
        }
        match (key.code, key.modifiers) {
            (KeyCode::Char('q'), _) => self.quit = true,
            (KeyCode::Up | KeyCode::Char('k'), KeyModifiers::NONE) => self.select_prev(),
            (KeyCode::Down | KeyCode::Char('j'), KeyModifiers::NONE) => self.select_next(),
            (KeyCode::Enter | KeyCode::Char('i'), KeyModifiers::NONE) => self.edit_selected(now),
            (KeyCode::Char('a'), KeyModifiers::NONE) => {
                if self.begin_edit(&EditTarget::with(self.selected.clone(), Selection::end())) {
                    self.run_command(Command::Enter, now);
                }
            }
            (KeyCode::Char('z'), KeyModifiers::NONE) => self.zoom(self.selected.clone()),
            (KeyCode::Char('u') | KeyCode::Backspace, KeyModifiers::NONE) => {
                if let Some(parent) = self.session.start().parent() {
                    self.zoom(parent);
                }
            }
            _ => {}
        }
    }

    fn apply_to_selected(&mut self, command: Command, now: Instant) {
        if self.session.begin(&EditTarget::at(self.selected.clone())) {
            self.run_command(command, now);
            self.session.leave();
            self.editor_state = None;
        }
    }

    /// Begin editing the highlighted node; on an empty outline, create the first node.
    pub fn edit_selected(&mut self, now: Instant) {
        let selected = self.selected.clone();
        let empty_start = &selected == self.session.start()
            && self.root().find_by_path(&selected).is_some_and(Item::is_leaf);
        if !self.begin_edit(&EditTarget::at(selected)) {
            self.selected = self.session.start().clone();
            return;
        }
        if empty_start && self.session.start().is_root() {
            self.run_command(Command::Enter, now);
        }
    }

    fn select_next(&mut self) {
        let start = self.session.start().clone();
        let next = navigation::context_in(self.root(), &start, &self.selected)
            .and_then(|context| navigation::navigate_next(self.root(), &context));
        if let Some(path) = next {
            self.selected = path;
        }
    }

    fn select_prev(&mut self) {
        let start = self.session.start().clone();
        if let Some(context) = navigation::context_in(self.root(), &start, &self.selected) {
            self.selected = navigation::navigate_prev(&context);
        } else {
            self.selected = start;
        }
    }

    /// Render from `start`; editing stops, its text is kept.
    pub fn zoom(&mut self, start: Path) {
        self.commit_pending(Instant::now());
        self.session.zoom(start);
        self.editor_state = None;
        self.selected = self.session.start().clone();
        self.scroll = 0;
    }

    /// Follow a deep link, or show the not-found screen.
    pub fn open_link(&mut self, link: &Link) {
        match link.resolve(self.root()) {
            Resolution::Found { path, relocated } => {
                if relocated {
                    self.message = Some(format!("`{}` moved to `{path}`", link.id));
                }
                self.view = View::Outline;
                self.zoom(path);
            }
            Resolution::NotFound => {
                info!("link `{link}` points at a removed node");
                self.view = View::NotFound(link.to_string());
            }
        }
    }

    /// Turn a click at screen (`x`, `y`) into an edit of the node drawn there.
    ///
    /// Clicks inside rendered markdown land at the matching source position.
    pub fn click(&mut self, x: u16, y: u16) {
        let Some(hit) = self.rows.iter().find(|row| row.y == y).cloned() else {
            return;
        };
        let column = usize::from(x.saturating_sub(hit.text_x));
        let editing_here = self
            .session
            .editing()
            .is_some_and(|editing| editing.path == hit.path);
        let position = match self.root().find_by_path(&hit.path) {
            Some(node) if !editing_here => {
                let text = node.text.clone();
                let doc = self.render(&text);
                doc.hit(hit.line, column).map_or_else(
                    || Position::new(hit.line, column),
                    |(leaf, offset)| source_position(&text, &doc, leaf, offset),
                )
            }
            _ => Position::new(hit.line, column),
        };
        self.begin_edit(&EditTarget::with(hit.path, Selection::caret(position)));
    }

    /// Fire whichever timers are due.
    pub fn tick(&mut self, now: Instant) {
        if self.submit_timer.poll(now) {
            self.commit_pending(now);
        }
        if self.sync_timer.poll(now) {
            self.sync();
        }
    }

    /// Push pending changes to the store; failures are kept for the next try.
    pub fn sync(&mut self) {
        if let Err(e) = store::push(self.store.as_mut(), &mut self.tracker, self.session.root()) {
            warn!("sync failed: {e}");
            self.message = Some(format!("Sync failed: {e}"));
        }
    }

    /// Commit the edit buffer and push everything before exiting.
    pub fn shutdown(&mut self) {
        self.commit_pending(Instant::now());
        self.sync_timer.cancel();
        self.sync();
    }
}

#[must_use]
/// A small outline to start from.
pub fn demo_tree() -> Item {
    let node = |text: &str, children: Vec<Item>| Item::create(text).with_children(children);
    node(
        "",
        vec![
            node(
                "Welcome to the **outliner**",
                vec![
                    node("Use *Up* and *Down* to move between nodes", vec![]),
                    node("`Tab` indents, `Shift+Tab` un-indents", vec![]),
                    node("`Alt+Up` and `Alt+Down` reorder", vec![]),
                ],
            ),
            node(
                "Editing",
                vec![
                    node("`Enter` opens a new node below", vec![]),
                    node("`Backspace` on an empty node removes it", vec![]),
                    node("`Alt+.` folds and unfolds", vec![]),
                ],
            ),
            node("See [the docs](https://example.com) for more", vec![]),
        ],
    )
}

#[must_use]
/// The outline below `start` as indented text, one bullet per node.
pub fn outline_text(root: &Item, start: &Path, indent_width: usize) -> String {
    let mut out = String::new();
    for context in navigation::visible_nodes(root, start) {
        let Some(node) = root.find_by_path(&context.path) else {
            continue;
        };
        if context.depth == 0 {
            if node.has_content() {
                out.push_str(&node.text);
                out.push('\n');
            }
            continue;
        }
        let pad = " ".repeat((context.depth - 1) * indent_width);
        for (index, line) in node.text.split('\n').enumerate() {
            let marker = if index == 0 { bullet(node) } else { " " };
            out.push_str(&format!("{pad}{marker} {line}\n"));
        }
    }
    out
}

#[must_use]
/// Leaf `•`, expanded parent `-`, collapsed parent `+`.
pub fn bullet(node: &Item) -> &'static str {
    match (node.is_leaf(), node.expand) {
        (true, _) => "•",
        (false, true) => "-",
        (false, false) => "+",
    }
}

#[cfg(test)]
#[path = "tests/app_state.rs"]
mod tests;
