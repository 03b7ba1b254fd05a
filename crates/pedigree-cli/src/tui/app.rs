//! Application state and main event loop.
//!
//! Navigation and data live in the [`Controller`]; this module only keeps
//! what belongs to the terminal (cursor positions, the typed photo path,
//! the tree viewport) and turns key presses into controller intents.

use std::io::Stdout;
use std::path::{Path, PathBuf};
use std::time::Instant;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::prelude::*;

use pedigree_core::{
    Config, Controller, Detail, FormField, HorseId, LayoutConfig, ParentLink, ParentRole,
    PhotoUpload, Sex, SupabaseStore, TreeLayout, View, Viewport,
};

use super::clipboard::Osc52Clipboard;
use super::components::tree::cell_layout;
use super::event::{Event, EventHandler};
use super::ui;

/// Cells moved per pan key press.
const PAN_STEP: f64 = 4.0;
/// Scale factor per zoom step.
const ZOOM_STEP: f64 = 1.25;

/// Work that waits on the store or the filesystem.
///
/// Actions run between frames so a busy message is on screen while they
/// are awaited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Fetch,
    Submit,
    /// Read and attach a photo; `then_submit` saves the horse once it is attached.
    LoadPhoto { path: PathBuf, then_submit: bool },
}

impl Action {
    fn busy_message(&self) -> &'static str {
        match self {
            Self::Fetch => "Loading horses...",
            Self::Submit => "Saving horse...",
            Self::LoadPhoto { .. } => "Reading photo...",
        }
    }
}

// =============================================================================
// Tree View
// =============================================================================

/// Lineage diagram laid out in character cells, with its viewport.
pub struct TreeView {
    pub root: HorseId,
    pub layout: TreeLayout,
    pub viewport: Viewport,
    /// Node highlighted for keyboard navigation.
    pub focused: usize,
}

impl TreeView {
    pub fn new(root: HorseId, layout: TreeLayout, config: &LayoutConfig, canvas: Rect) -> Self {
        let mut view = Self {
            root,
            layout,
            viewport: Viewport::new(config),
            focused: 0,
        };
        view.center_on(0, canvas);
        view
    }

    /// Pan so node `index` is vertically centred; the root hugs the left edge.
    pub fn center_on(&mut self, index: usize, canvas: Rect) {
        let Some(node) = self.layout.nodes.get(index) else {
            return;
        };
        let (sx, sy) = self
            .viewport
            .to_screen(node.x, node.y + self.layout.node_height / 2.0);

        let target_x = if index == 0 {
            1.0
        } else {
            (f64::from(canvas.width) - self.layout.node_width * self.viewport.scale) / 2.0
        };
        let target_y = f64::from(canvas.height) / 2.0;
        self.viewport.pan(target_x - sx, target_y - sy);
    }

    pub fn focus_next(&mut self, canvas: Rect) {
        self.focused = (self.focused + 1) % self.layout.nodes.len().max(1);
        self.center_on(self.focused, canvas);
    }

    pub fn focus_previous(&mut self, canvas: Rect) {
        let len = self.layout.nodes.len().max(1);
        self.focused = (self.focused + len - 1) % len;
        self.center_on(self.focused, canvas);
    }

    pub fn focused_id(&self) -> Option<HorseId> {
        self.layout.nodes.get(self.focused).map(|n| n.id.clone())
    }

    /// Node under a terminal cell, if any.
    pub fn node_at_cell(&self, column: u16, row: u16, canvas: Rect) -> Option<usize> {
        if !canvas.contains(Position::new(column, row)) {
            return None;
        }
        let (x, y) = self
            .viewport
            .to_layout(f64::from(column - canvas.x), f64::from(row - canvas.y));
        self.layout.node_at(x, y)
    }
}

// =============================================================================
// App
// =============================================================================

/// Main application state.
pub struct App {
    /// View state, horse collection and registration form
    pub controller: Controller<SupabaseStore>,
    /// Configuration
    pub config: Config,
    /// Cursor in the horse list
    pub selected: usize,
    /// Focused field in the registration form
    pub focus: FormField,
    /// Photo path as typed
    pub photo_path: String,
    /// Why the typed photo could not be attached
    pub photo_error: Option<String>,
    /// Lineage diagram while the tree view is open
    pub tree: Option<TreeView>,
    /// Message shown while an action is awaited
    pub busy: Option<&'static str>,
    /// Last known terminal size
    pub screen: Rect,
    /// Whether the app should quit
    pub should_quit: bool,
    clipboard: Osc52Clipboard,
    drag_from: Option<(u16, u16)>,
}

impl App {
    /// Create a new app instance.
    pub fn new(config: Config, controller: Controller<SupabaseStore>) -> Self {
        Self {
            controller,
            config,
            selected: 0,
            focus: FormField::Name,
            photo_path: String::new(),
            photo_error: None,
            tree: None,
            busy: None,
            screen: Rect::default(),
            should_quit: false,
            clipboard: Osc52Clipboard,
            drag_from: None,
        }
    }

    /// Run the main event loop.
    pub async fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        let mut events = EventHandler::new();
        let mut pending = Some(Action::Fetch);

        loop {
            let size = terminal.size()?;
            self.screen = Rect::new(0, 0, size.width, size.height);

            if let Some(action) = pending.take() {
                self.busy = Some(action.busy_message());
                terminal.draw(|frame| ui::render(self, frame))?;
                self.perform(action).await;
                self.busy = None;
            }

            self.sync_tree();
            terminal.draw(|frame| ui::render(self, frame))?;

            let Some(event) = events.next().await else {
                break;
            };
            pending = match event {
                Event::Key(key) => self.handle_key_event(key),
                Event::Mouse(mouse) => {
                    self.handle_mouse_event(mouse);
                    None
                }
                Event::Resize => None,
                Event::Tick => {
                    self.controller.tick(Instant::now());
                    None
                }
            };

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    async fn perform(&mut self, action: Action) {
        match action {
            Action::Fetch => {
                self.controller.retry().await;
                self.move_selection(0);
            }
            Action::Submit => self.submit().await,
            Action::LoadPhoto { path, then_submit } => {
                if self.load_photo(path).await && then_submit {
                    self.submit().await;
                }
            }
        }
    }

    async fn submit(&mut self) {
        if self.controller.submit().await.is_ok() {
            self.selected = self.controller.horses().len().saturating_sub(1);
            self.reset_form_state();
        }
    }

    /// Attach the photo at `path`; false when it could not be read or decoded.
    async fn load_photo(&mut self, path: PathBuf) -> bool {
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Could not read photo {}: {}", path.display(), e);
                self.photo_error = Some(format!("Could not read {}: {}", path.display(), e));
                return false;
            }
        };

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        match PhotoUpload::new(file_name, bytes) {
            Ok(photo) => {
                self.controller.attach_photo(photo);
                self.photo_error = None;
                true
            }
            Err(e) => {
                self.photo_error = Some(e.to_string());
                false
            }
        }
    }

    /// Rebuild the diagram when the tree view opens or changes root.
    fn sync_tree(&mut self) {
        let View::LineageTree(id) = self.controller.view() else {
            self.tree = None;
            return;
        };
        if self.tree.as_ref().is_some_and(|tree| &tree.root == id) {
            return;
        }

        let id = id.clone();
        let config = cell_layout(&self.config.tree);
        let canvas = ui::tree_canvas(self.screen);
        self.tree = self.controller.lineage().map(|node| {
            let layout = TreeLayout::compute(&node, &config);
            TreeView::new(id, layout, &config, canvas)
        });
    }

    fn reset_form_state(&mut self) {
        self.focus = FormField::Name;
        self.photo_path.clear();
        self.photo_error = None;
    }

    /// Move the list cursor, keeping it inside the collection.
    fn move_selection(&mut self, delta: isize) {
        let len = self.controller.horses().len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        let next = self.selected as isize + delta;
        self.selected = next.clamp(0, len as isize - 1) as usize;
    }

    // =========================================================================
    // Keyboard
    // =========================================================================

    /// Handle a key press; returns work that has to be awaited.
    fn handle_key_event(&mut self, key: KeyEvent) -> Option<Action> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return None;
        }

        match self.controller.view().clone() {
            View::List => self.handle_list_key(key),
            View::Details(_) => self.handle_details_key(key),
            View::Add => self.handle_form_key(key),
            View::LineageTree(_) => self.handle_tree_key(key),
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1),
            KeyCode::Home => self.selected = 0,
            KeyCode::End => self.move_selection(isize::MAX / 2),
            KeyCode::Enter => {
                if let Some(horse) = self.controller.horses().get(self.selected) {
                    let id = horse.id.clone();
                    self.controller.select_horse(id);
                }
            }
            KeyCode::Char('a') => {
                self.controller.request_add();
                if *self.controller.view() == View::Add {
                    self.reset_form_state();
                }
            }
            KeyCode::Char('r') => return Some(Action::Fetch),
            _ => {}
        }
        None
    }

    fn handle_details_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => self.controller.go_back(),
            KeyCode::Char('t') | KeyCode::Enter => self.controller.request_tree(),
            KeyCode::Char('s') => {
                self.controller
                    .share(&self.config.share.origin, &mut self.clipboard, Instant::now());
            }
            KeyCode::Char('f') => self.open_parent(ParentRole::Father),
            KeyCode::Char('m') => self.open_parent(ParentRole::Mother),
            KeyCode::Char('r') => return Some(Action::Fetch),
            _ => {}
        }
        None
    }

    /// Open the details of the current horse's registered parent.
    fn open_parent(&mut self, role: ParentRole) {
        let Some(Detail::Found(horse)) = self.controller.detail() else {
            return;
        };
        let (father, mother) = self.controller.parents(horse);
        let link = match role {
            ParentRole::Father => father,
            ParentRole::Mother => mother,
        };
        if let ParentLink::Known(parent) = link {
            let id = parent.id.clone();
            self.controller.select_horse(id);
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc => {
                self.controller.cancel_add();
                self.reset_form_state();
            }
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Some(self.submit_action(true));
            }
            KeyCode::Tab | KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.focus = self.focus.previous(),
            KeyCode::Enter if self.focus == FormField::Photo => {
                return Some(self.submit_action(false));
            }
            KeyCode::Enter => self.focus = self.focus.next(),
            _ => self.edit_field(key),
        }
        None
    }

    /// What saving the form means right now: a typed photo path that is
    /// not attached yet is loaded first.
    fn submit_action(&self, submit_after_load: bool) -> Action {
        let attached = self
            .controller
            .form()
            .photo
            .as_ref()
            .map(|p| p.file_name.as_str());
        pending_photo(&self.photo_path, attached)
            .map(|path| Action::LoadPhoto {
                path,
                then_submit: submit_after_load,
            })
            .unwrap_or(Action::Submit)
    }

    fn edit_field(&mut self, key: KeyEvent) {
        match self.focus {
            FormField::Sex => {
                let sex = match key.code {
                    KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') => Some(
                        self.controller
                            .form()
                            .sex
                            .parse::<Sex>()
                            .map(Sex::toggle)
                            .unwrap_or(Sex::Male),
                    ),
                    KeyCode::Char('m') | KeyCode::Char('M') => Some(Sex::Male),
                    KeyCode::Char('f') | KeyCode::Char('F') => Some(Sex::Female),
                    _ => None,
                };
                if let Some(sex) = sex {
                    self.controller.set_field(FormField::Sex, sex.as_str());
                } else if key.code == KeyCode::Backspace {
                    self.controller.set_field(FormField::Sex, "");
                }
            }
            FormField::Father | FormField::Mother => {
                let role = if self.focus == FormField::Father {
                    ParentRole::Father
                } else {
                    ParentRole::Mother
                };
                match key.code {
                    KeyCode::Left => self.cycle_parent(role, -1),
                    KeyCode::Right | KeyCode::Char(' ') => self.cycle_parent(role, 1),
                    KeyCode::Backspace | KeyCode::Delete => self.controller.set_parent(role, None),
                    _ => {}
                }
            }
            FormField::Photo => match key.code {
                KeyCode::Char(c) => self.photo_path.push(c),
                KeyCode::Backspace => {
                    self.photo_path.pop();
                }
                KeyCode::Delete => {
                    self.photo_path.clear();
                    self.photo_error = None;
                    self.controller.clear_photo();
                }
                _ => {}
            },
            field => {
                let mut value = self.controller.form().value(field).to_string();
                match key.code {
                    KeyCode::Char(c) if field == FormField::Age && !c.is_ascii_digit() => return,
                    KeyCode::Char(c) => value.push(c),
                    KeyCode::Backspace => {
                        value.pop();
                    }
                    _ => return,
                }
                self.controller.set_field(field, value);
            }
        }
    }

    /// Step through "None registered" followed by the eligible horses.
    fn cycle_parent(&mut self, role: ParentRole, delta: isize) {
        let options: Vec<HorseId> = self
            .controller
            .parent_candidates(role)
            .iter()
            .map(|horse| horse.id.clone())
            .collect();
        let current = self.controller.form().value(role.field());
        let index = options
            .iter()
            .position(|id| id.as_str() == current)
            .map_or(0, |i| i + 1);

        let len = options.len() as isize + 1;
        let next = (index as isize + delta).rem_euclid(len) as usize;
        let choice = next.checked_sub(1).and_then(|i| options.get(i).cloned());
        self.controller.set_parent(role, choice);
    }

    fn handle_tree_key(&mut self, key: KeyEvent) -> Option<Action> {
        let canvas = ui::tree_canvas(self.screen);
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc | KeyCode::Backspace => self.controller.go_back(),
            KeyCode::Enter => {
                if let Some(id) = self.tree.as_ref().and_then(TreeView::focused_id) {
                    self.controller.select_horse(id);
                }
            }
            code => {
                let Some(tree) = self.tree.as_mut() else {
                    return None;
                };
                let (cx, cy) = (f64::from(canvas.width) / 2.0, f64::from(canvas.height) / 2.0);
                match code {
                    KeyCode::Left | KeyCode::Char('h') => tree.viewport.pan(PAN_STEP, 0.0),
                    KeyCode::Right | KeyCode::Char('l') => tree.viewport.pan(-PAN_STEP, 0.0),
                    KeyCode::Up | KeyCode::Char('k') => tree.viewport.pan(0.0, PAN_STEP / 2.0),
                    KeyCode::Down | KeyCode::Char('j') => tree.viewport.pan(0.0, -PAN_STEP / 2.0),
                    KeyCode::Char('+') | KeyCode::Char('=') => {
                        tree.viewport.zoom_at(ZOOM_STEP, cx, cy)
                    }
                    KeyCode::Char('-') => tree.viewport.zoom_at(1.0 / ZOOM_STEP, cx, cy),
                    KeyCode::Char('0') => {
                        tree.viewport.reset();
                        tree.focused = 0;
                        tree.center_on(0, canvas);
                    }
                    KeyCode::Tab => tree.focus_next(canvas),
                    KeyCode::BackTab => tree.focus_previous(canvas),
                    _ => {}
                }
            }
        }
        None
    }

    // =========================================================================
    // Mouse
    // =========================================================================

    /// Click a card to open it; drag to pan; scroll to zoom at the pointer.
    fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        let canvas = ui::tree_canvas(self.screen);
        let Some(tree) = self.tree.as_mut() else {
            return;
        };
        let local_x = f64::from(mouse.column.saturating_sub(canvas.x));
        let local_y = f64::from(mouse.row.saturating_sub(canvas.y));

        match mouse.kind {
            MouseEventKind::ScrollUp => tree.viewport.zoom_at(ZOOM_STEP, local_x, local_y),
            MouseEventKind::ScrollDown => tree.viewport.zoom_at(1.0 / ZOOM_STEP, local_x, local_y),
            MouseEventKind::Down(MouseButton::Left) => {
                match tree.node_at_cell(mouse.column, mouse.row, canvas) {
                    Some(index) => {
                        let id = tree.layout.nodes[index].id.clone();
                        self.controller.select_horse(id);
                    }
                    None => self.drag_from = Some((mouse.column, mouse.row)),
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some((x, y)) = self.drag_from {
                    let dx = f64::from(mouse.column) - f64::from(x);
                    let dy = f64::from(mouse.row) - f64::from(y);
                    tree.viewport.pan(dx, dy);
                    self.drag_from = Some((mouse.column, mouse.row));
                }
            }
            MouseEventKind::Up(MouseButton::Left) => self.drag_from = None,
            _ => {}
        }
    }
}

/// Typed photo path that still has to be read, if any.
fn pending_photo(typed: &str, attached: Option<&str>) -> Option<PathBuf> {
    let path = typed.trim();
    if path.is_empty() {
        return None;
    }
    let typed_name = Path::new(path).file_name().map(|n| n.to_string_lossy());
    if attached.is_some() && attached == typed_name.as_deref() {
        return None;
    }
    Some(PathBuf::from(path))
}
