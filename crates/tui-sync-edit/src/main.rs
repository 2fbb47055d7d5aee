//! TUI demo for linked simultaneous editing
//!
//! A small terminal editor built with crossterm and ratatui around a
//! [`sync_edit::MemoryEditor`]. Select a region, press Ctrl+E, and every repeated word in it
//! can be edited at once.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p tui-sync-edit -- [file_path]
//! ```
//!
//! Without a path a built-in sample is loaded. Settings are read from `sync-edit.yaml` in the
//! working directory, or from the file named by `SYNC_EDIT_CONFIG`.
//!
//! # Keys
//!
//! - Arrows / Home / End: move the caret
//! - Shift+arrows / Shift+Home / Shift+End: extend the selection
//! - Ctrl+A: select everything
//! - Ctrl+E: start sync-edit on the selection
//! - Ctrl+N: next repeated word
//! - Esc: end sync-edit
//! - Ctrl+S: save
//! - Ctrl+Q: quit

mod logging;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::{
    env, fs,
    io::{self, stdout},
    path::{Path, PathBuf},
    time::Duration,
};
use sync_edit::{
    EditorHost, MemoryEditor, Position, Rgba, SyncEditConfig, SyncEditError, SyncEditSession,
};

const SAMPLE: &str = "\
fn area(width: u32, height: u32) -> u32 {
    let result = width * height;
    result
}

fn perimeter(width: u32, height: u32) -> u32 {
    let result = 2 * (width + height);
    result
}
";

struct App {
    editor: MemoryEditor,
    session: SyncEditSession,
    file_path: Option<PathBuf>,
    scroll_top: usize,
    viewport_height: usize,
    status_message: String,
    should_quit: bool,
}

impl App {
    fn new(file_path: Option<PathBuf>, config: SyncEditConfig) -> io::Result<Self> {
        let text = match &file_path {
            Some(path) if path.exists() => fs::read_to_string(path)?,
            Some(_) => String::new(),
            None => SAMPLE.to_string(),
        };
        tracing::info!(
            path = ?file_path,
            chars = text.chars().count(),
            "opened document"
        );

        Ok(Self {
            editor: MemoryEditor::new(&text),
            session: SyncEditSession::new(config),
            file_path,
            scroll_top: 0,
            viewport_height: 0,
            status_message: "Select a region and press Ctrl+E".to_string(),
            should_quit: false,
        })
    }

    fn save_file(&mut self) -> io::Result<()> {
        let Some(path) = &self.file_path else {
            self.status_message = "No file to save to (sample document)".to_string();
            return Ok(());
        };
        fs::write(path, self.editor.text_string())?;
        self.status_message = format!("Saved {}", path.display());
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        let messages_before = self.editor.messages().len();
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);

        let result: Result<(), SyncEditError> = match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('q')) => {
                self.should_quit = true;
                Ok(())
            }
            (KeyModifiers::CONTROL, KeyCode::Char('s')) => {
                if let Err(e) = self.save_file() {
                    self.status_message = format!("Save failed: {}", e);
                }
                Ok(())
            }
            (KeyModifiers::CONTROL, KeyCode::Char('a')) => {
                self.editor.select(0, self.editor.char_count());
                self.pump()
            }
            (KeyModifiers::CONTROL, KeyCode::Char('e')) => self
                .session
                .start(&mut self.editor)
                .and_then(|_| self.pump()),
            (KeyModifiers::CONTROL, KeyCode::Char('n')) => self
                .session
                .next(&mut self.editor)
                .and_then(|_| self.pump()),
            (_, KeyCode::Esc) => self
                .session
                .cancel(&mut self.editor)
                .and_then(|_| self.pump()),
            (_, KeyCode::Left) => self.move_primary(shift, |_, caret| caret.saturating_sub(1)),
            (_, KeyCode::Right) => {
                let len = self.editor.char_count();
                self.move_primary(shift, |_, caret| (caret + 1).min(len))
            }
            (_, KeyCode::Up) => self.move_primary(shift, |app, caret| app.vertical(caret, -1)),
            (_, KeyCode::Down) => self.move_primary(shift, |app, caret| app.vertical(caret, 1)),
            (_, KeyCode::Home) => self.move_primary(shift, |app, caret| app.line_start(caret)),
            (_, KeyCode::End) => self.move_primary(shift, |app, caret| app.line_end(caret)),
            (_, KeyCode::Backspace) => self.editor.backspace_into(&mut self.session).map(|_| ()),
            (_, KeyCode::Enter) => self.editor.type_into(&mut self.session, "\n").map(|_| ()),
            (_, KeyCode::Tab) => self.editor.type_into(&mut self.session, "    ").map(|_| ()),
            (mods, KeyCode::Char(c)) if !mods.contains(KeyModifiers::CONTROL) => self
                .editor
                .type_into(&mut self.session, c.encode_utf8(&mut [0; 4]))
                .map(|_| ()),
            _ => Ok(()),
        };

        if let Err(err) = result {
            tracing::error!("sync-edit command failed: {}", err);
            self.status_message = format!("Error: {}", err);
        } else if self.editor.messages().len() > messages_before {
            if let Some(message) = self.editor.last_message() {
                self.status_message = message.to_string();
            }
        }

        self.adjust_scroll();
    }

    fn handle_paste(&mut self, text: String) {
        if let Err(err) = self.editor.type_into(&mut self.session, &text) {
            tracing::error!("paste failed: {}", err);
            self.status_message = format!("Error: {}", err);
        }
        self.adjust_scroll();
    }

    /// Deliver the editor's queued selection events to the session.
    fn pump(&mut self) -> Result<(), SyncEditError> {
        let decisions = self.editor.pump(&mut self.session)?;
        tracing::trace!(?decisions, "delivered selection events");
        Ok(())
    }

    /// Move the primary caret; everything else collapses, as in a single-caret editor.
    fn move_primary(
        &mut self,
        extend: bool,
        target: impl FnOnce(&Self, usize) -> usize,
    ) -> Result<(), SyncEditError> {
        let (anchor, caret) = self
            .editor
            .selection_offsets_all()
            .first()
            .copied()
            .unwrap_or((0, 0));
        let next = target(self, caret);
        if extend {
            self.editor.select(anchor, next);
        } else {
            self.editor.click(next);
        }
        self.pump()
    }

    fn line_start(&self, offset: usize) -> usize {
        let position = self.editor.offset_to_position(offset);
        self.editor.position_to_offset(Position::new(position.line, 0))
    }

    fn line_end(&self, offset: usize) -> usize {
        let position = self.editor.offset_to_position(offset);
        self.editor.position_to_offset(Position::new(position.line, usize::MAX))
    }

    fn vertical(&self, offset: usize, delta: isize) -> usize {
        let position = self.editor.offset_to_position(offset);
        let last_line = self.editor.line_count().saturating_sub(1);
        let line = position.line.saturating_add_signed(delta).min(last_line);
        self.editor.position_to_offset(Position::new(line, position.column))
    }

    fn caret_position(&self) -> Position {
        self.editor.offset_to_position(self.editor.primary_caret())
    }

    fn adjust_scroll(&mut self) {
        if self.viewport_height == 0 {
            return;
        }
        let line = self.caret_position().line;
        if line < self.scroll_top {
            self.scroll_top = line;
        }
        if line >= self.scroll_top + self.viewport_height {
            self.scroll_top = line - self.viewport_height + 1;
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),    // editor
                Constraint::Length(1), // status line
                Constraint::Length(1), // key hints
            ])
            .split(frame.area());

        self.viewport_height = chunks[0].height.saturating_sub(2) as usize;
        self.adjust_scroll();

        self.render_editor(frame, chunks[0]);
        self.render_status_line(frame, chunks[1]);
        self.render_shortcuts(frame, chunks[2]);
    }

    /// Style for the character at `offset`: session highlights first, selections on top.
    fn style_at(&self, offset: usize, selections: &[(usize, usize)]) -> Style {
        let mut style = Style::default().fg(Color::White);
        for entry in self.editor.highlights().values() {
            if !entry.ranges.iter().any(|range| range.contains(&offset)) {
                continue;
            }
            if let Some(color) = entry.style.background {
                style = style.bg(to_color(color));
            }
            if let Some(color) = entry.style.foreground {
                style = style.fg(to_color(color)).add_modifier(Modifier::BOLD);
            }
        }
        if selections
            .iter()
            .any(|&(start, end)| start <= offset && offset < end)
        {
            style = style.add_modifier(Modifier::REVERSED);
        }
        style
    }

    fn render_editor(&self, frame: &mut Frame, area: Rect) {
        let inner_height = area.height.saturating_sub(2) as usize;
        let inner_width = area.width.saturating_sub(2) as usize;

        let selections: Vec<(usize, usize)> = self
            .editor
            .selection_offsets_all()
            .into_iter()
            .map(|(anchor, caret)| (anchor.min(caret), anchor.max(caret)))
            .collect();

        let mut display_lines = Vec::with_capacity(inner_height);
        for row in 0..inner_height {
            let line = self.scroll_top + row;
            let Some(text) = self.editor.line_text(line) else {
                display_lines.push(Line::from(""));
                continue;
            };
            let line_start = self.editor.position_to_offset(Position::new(line, 0));

            let mut spans: Vec<Span> = Vec::new();
            let mut current_style: Option<Style> = None;
            let mut buffer = String::new();
            for (col, ch) in text.chars().take(inner_width).enumerate() {
                let style = self.style_at(line_start + col, &selections);
                if current_style.is_some_and(|current| current != style) {
                    spans.push(Span::styled(
                        std::mem::take(&mut buffer),
                        current_style.unwrap_or_default(),
                    ));
                }
                current_style = Some(style);
                if ch == '\t' {
                    buffer.push(' ');
                } else {
                    buffer.push(ch);
                }
            }
            if !buffer.is_empty() {
                spans.push(Span::styled(buffer, current_style.unwrap_or_default()));
            }
            display_lines.push(Line::from(spans));
        }

        let title = match &self.file_path {
            Some(path) => format!(" {} ", path.display()),
            None => " sample ".to_string(),
        };
        let block = Block::default().borders(Borders::ALL).title(title);
        let paragraph = Paragraph::new(display_lines).block(block);
        frame.render_widget(paragraph, area);

        let caret = self.caret_position();
        if inner_height == 0
            || inner_width == 0
            || caret.line < self.scroll_top
            || caret.line >= self.scroll_top + inner_height
        {
            return;
        }
        let x = area.x + 1 + caret.column.min(inner_width.saturating_sub(1)) as u16;
        let y = area.y + 1 + (caret.line - self.scroll_top) as u16;
        frame.set_cursor_position((x, y));
    }

    fn render_status_line(&self, frame: &mut Frame, area: Rect) {
        let caret = self.caret_position();
        let carets = self.editor.selection_offsets_all().len();
        let session = match self.session.current_group() {
            Some(group) => format!(
                "sync-edit \"{}\" {}/{}",
                group.word,
                self.session.state().current_index() + 1,
                self.session.state().groups().len()
            ),
            None => "sync-edit off".to_string(),
        };
        let status_text = format!(
            "Ln {} Col {} | carets: {} | {} | {}",
            caret.line + 1,
            caret.column + 1,
            carets,
            session,
            self.status_message
        );

        let status_line = Paragraph::new(status_text).style(
            Style::default()
                .bg(Color::DarkGray)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
        frame.render_widget(status_line, area);
    }

    fn render_shortcuts(&self, frame: &mut Frame, area: Rect) {
        let shortcuts =
            "Ctrl-E:sync-edit  Ctrl-N:next word  Esc:end  Ctrl-A:select all  Ctrl-S:save  Ctrl-Q:quit";
        let shortcuts_line =
            Paragraph::new(shortcuts).style(Style::default().bg(Color::Blue).fg(Color::White));
        frame.render_widget(shortcuts_line, area);
    }
}

fn to_color(color: Rgba) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

fn load_config() -> SyncEditConfig {
    let path = env::var_os("SYNC_EDIT_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|| Path::new("sync-edit.yaml").to_path_buf());
    match SyncEditConfig::load(&path) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to load {}: {}, using defaults", path.display(), err);
            SyncEditConfig::default()
        }
    }
}

fn main() -> io::Result<()> {
    let _log_guard = logging::init();

    let file_path = env::args().nth(1).map(PathBuf::from);
    let config = load_config();
    let mut app = App::new(file_path, config)?;

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;

        if app.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => app.handle_key_event(key),
                Event::Paste(text) => app.handle_paste(text),
                _ => {}
            }
        }
    }

    Ok(())
}
