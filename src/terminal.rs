// SPDX-License-Identifier: GPL-3.0-only

//! Terminal camera
//!
//! Renders the viewfinder, gallery, grid and menu to the terminal using
//! Unicode half-block characters for improved vertical resolution, and maps
//! keys onto the abstract camera commands.

use crate::Config;
use crate::app::{Command, ExportKind, ExportReport, MenuItem, Mode, Outcome, Prompter, Session};
use crate::backends::camera::SourceSpec;
use crate::constants::export::entry_name;
use crate::constants::navigation::GRID_COLUMNS;
use crate::constants::terminal::{FLASH_DURATION, POLL_INTERVAL, THUMBNAIL_SIZE};
use crate::errors::ExportError;
use crate::photo_log::{PhotoLog, PhotoRecord};
use crate::pipelines::export::{DirectoryDownloads, Exporter, ZipPackager};
use crate::pipelines::photo::CaptureSurface;
use crate::pipelines::photo::processing::{render_preview, thumbnail};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use image::RgbaImage;
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Clear, Paragraph, Widget, Wrap},
};
use std::collections::HashMap;
use std::io::{self, stdout};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};
use uuid::Uuid;

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

/// Run the terminal camera
pub fn run(config: &Config, source: SourceSpec) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    // Exports are spawned from the input loop
    let _guard = runtime.enter();

    let device = source.device();
    let device_name = device.name();
    let surface = runtime
        .block_on(CaptureSurface::open(device.as_ref(), config.request()))
        .with_quality(config.jpeg_quality);

    let export_dir = config.export_dir();
    let exporter = Exporter::new(
        Arc::new(ZipPackager),
        Arc::new(DirectoryDownloads::new(&export_dir)),
    )
    .with_quality(config.jpeg_quality);
    let mut session = Session::new(surface, exporter).with_filter(config.initial_filter());

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let result = run_app(&mut terminal, &mut session, &device_name);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Let running exports land before the runtime goes away
    let reports = runtime.block_on(session.wait_for_exports());
    for report in &reports {
        if let Ok(file) = &report.result {
            println!("Saved: {}", export_dir.join(file).display());
        }
    }
    session.shutdown();

    result
}

/// What a key press asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Command(Command),
    Help,
    Quit,
}

fn map_key(key: &KeyEvent) -> Option<Input> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Input::Quit);
    }

    let command = match key.code {
        KeyCode::Up => Command::Up,
        KeyCode::Down => Command::Down,
        KeyCode::Left => Command::Left,
        KeyCode::Right => Command::Right,
        KeyCode::Enter => Command::Ok,
        KeyCode::Esc => Command::Home,
        KeyCode::Char(' ') => Command::Shutter,
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'm' => Command::MenuButton,
            'f' => Command::CycleFilter,
            'r' => Command::ToggleMirror,
            'g' => Command::ToggleGallery,
            'w' => Command::ZoomToggle,
            '?' => return Some(Input::Help),
            'q' => return Some(Input::Quit),
            _ => return None,
        },
        _ => return None,
    };
    Some(Input::Command(command))
}

fn run_app(
    terminal: &mut Tui,
    session: &mut Session,
    device_name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut view = ViewState::new(device_name);

    loop {
        for report in session.poll_exports() {
            view.on_export_report(&report);
        }
        view.thumbnails.retain(session.log());

        terminal.draw(|f| draw(f, session, &mut view))?;

        // Handle input with timeout for frame updates
        if event::poll(POLL_INTERVAL)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match map_key(&key) {
                Some(Input::Quit) => break,
                Some(Input::Help) => view.show_help = !view.show_help,
                Some(Input::Command(command)) => {
                    view.show_help = false;
                    let mut prompter = TerminalPrompter {
                        terminal: &mut *terminal,
                    };
                    let outcome = session.dispatch(command, &mut prompter);
                    view.on_outcome(&outcome);
                }
                None => {}
            }
        }
    }

    info!(photos = session.log().len(), "Leaving terminal camera");
    Ok(())
}

/// Front-end only state: never read by the state machine
struct ViewState {
    device_name: String,
    show_help: bool,
    flash_until: Option<Instant>,
    message: String,
    thumbnails: ThumbnailCache,
}

impl ViewState {
    fn new(device_name: &str) -> Self {
        Self {
            device_name: device_name.to_string(),
            show_help: false,
            flash_until: None,
            message: "Space: snap | m: menu | ?: help".to_string(),
            thumbnails: ThumbnailCache::default(),
        }
    }

    fn flash_active(&self) -> bool {
        self.flash_until.is_some_and(|until| Instant::now() < until)
    }

    fn on_outcome(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Captured(record) => {
                self.flash_until = Some(Instant::now() + FLASH_DURATION);
                self.message = format!("Snap! {} {}", record.date_stamp(), record.time_stamp());
            }
            Outcome::ExportStarted(ExportKind::Photobooth) => {
                self.message = "Developing photobooth strip...".to_string();
            }
            Outcome::ExportStarted(ExportKind::Zip) => {
                self.message = "Packing zip...".to_string();
            }
            Outcome::None => {}
        }
    }

    fn on_export_report(&mut self, report: &ExportReport) {
        self.message = match &report.result {
            Ok(file) => format!("Saved {}", file),
            // Aborted exports stay silent
            Err(ExportError::SurfaceUnavailable(_)) => String::new(),
            Err(e) => format!("Export failed: {}", e),
        };
    }
}

/// Decoded display images, keyed by record id
///
/// The grid uses small thumbnails; the single view keeps one photo at
/// full resolution.
#[derive(Default)]
struct ThumbnailCache {
    entries: HashMap<Uuid, RgbaImage>,
    full: Option<(Uuid, RgbaImage)>,
}

impl ThumbnailCache {
    fn get(&mut self, record: &PhotoRecord) -> Option<&RgbaImage> {
        if !self.entries.contains_key(&record.id) {
            match record.display_image.decode() {
                Ok(image) => {
                    self.entries
                        .insert(record.id, thumbnail(&image, THUMBNAIL_SIZE));
                }
                Err(e) => {
                    warn!(id = %record.id, error = %e, "Failed to decode photo");
                    return None;
                }
            }
        }
        self.entries.get(&record.id)
    }

    /// The record's display image at its native resolution
    fn full(&mut self, record: &PhotoRecord) -> Option<&RgbaImage> {
        if self.full.as_ref().is_none_or(|(id, _)| *id != record.id) {
            match record.display_image.decode() {
                Ok(image) => self.full = Some((record.id, image)),
                Err(e) => {
                    warn!(id = %record.id, error = %e, "Failed to decode photo");
                    self.full = None;
                }
            }
        }
        self.full.as_ref().map(|(_, image)| image)
    }

    /// Drop entries for records no longer in the log
    fn retain(&mut self, log: &PhotoLog) {
        if self.entries.len() > log.len() {
            let live: Vec<Uuid> = log.iter().map(|r| r.id).collect();
            self.entries.retain(|id, _| live.contains(id));
        }
        if self
            .full
            .as_ref()
            .is_some_and(|(id, _)| !log.iter().any(|r| r.id == *id))
        {
            self.full = None;
        }
    }
}

fn draw(f: &mut Frame, session: &Session, view: &mut ViewState) {
    let [main, status] = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(f.area());

    match &session.nav().mode {
        Mode::Camera => draw_camera(f, main, session, view),
        Mode::GallerySingle => draw_single(f, main, session, view),
        Mode::GalleryGrid | Mode::SelectPhotobooth { .. } | Mode::SelectZip { .. } => {
            draw_grid(f, main, session, view)
        }
        Mode::Menu => draw_menu(f, main, session),
    }

    f.render_widget(
        StatusBar {
            message: &status_line(session, view),
        },
        status,
    );

    if view.show_help {
        draw_help(f, main);
    }
}

fn draw_camera(f: &mut Frame, area: Rect, session: &Session, view: &ViewState) {
    if view.flash_active() {
        f.render_widget(Block::default().style(Style::default().bg(Color::White)), area);
        return;
    }

    let filter = session.filter();
    let preview = session.surface().preview_frame().and_then(|frame| {
        render_preview(
            &frame,
            filter.filter(),
            filter.mirror,
            area.width as u32,
            area.height as u32 * 2,
        )
        .ok()
    });

    let placeholder = if session.surface().is_live() {
        "Waiting for camera..."
    } else {
        "No camera. Check the log for details."
    };
    f.render_widget(
        RasterWidget {
            image: preview.as_ref(),
            placeholder,
        },
        area,
    );

    let label = format!(" {} ", filter.filter().name);
    let badge = Rect::new(area.x + 1, area.y, (label.len() as u16).min(area.width), 1);
    f.render_widget(
        Paragraph::new(label).style(Style::default().fg(Color::Black).bg(Color::Rgb(255, 159, 28))),
        badge,
    );
}

fn draw_single(f: &mut Frame, area: Rect, session: &Session, view: &mut ViewState) {
    let log = session.log();
    let cursor = session.nav().gallery_cursor;
    let Some(record) = log.get(cursor) else {
        f.render_widget(
            RasterWidget {
                image: None,
                placeholder: "No photos yet. Press g, then Space to snap.",
            },
            area,
        );
        return;
    };

    let [picture, caption] = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);
    f.render_widget(
        RasterWidget {
            image: view.thumbnails.full(record),
            placeholder: "Unreadable photo",
        },
        picture,
    );
    let text = format!(
        "{}  {} {}  ({}/{})",
        entry_name(cursor),
        record.date_stamp(),
        record.time_stamp(),
        cursor + 1,
        log.len()
    );
    f.render_widget(Paragraph::new(text).alignment(Alignment::Center), caption);
}

/// First visible grid row so that the cursor row stays on screen
fn first_visible_row(cursor: usize, visible_rows: usize) -> usize {
    let cursor_row = cursor / GRID_COLUMNS;
    (cursor_row + 1).saturating_sub(visible_rows.max(1))
}

fn draw_grid(f: &mut Frame, area: Rect, session: &Session, view: &mut ViewState) {
    let nav = session.nav();
    let log = session.log();

    let title = match &nav.mode {
        Mode::SelectPhotobooth { selection } => {
            format!(" PHOTOBOOTH: pick 4 ({}/4) ", selection.len())
        }
        Mode::SelectZip { selection } => {
            format!(" EXPORT ZIP: {} selected, m to save ", selection.len())
        }
        _ => " GALLERY ".to_string(),
    };
    let frame = Block::bordered().title(title);
    let inner = frame.inner(area);
    f.render_widget(frame, area);

    let cell_width = inner.width / GRID_COLUMNS as u16;
    // 4:3 cells, two pixels per row, plus the border
    let cell_height = (cell_width * 3 / 8 + 2).max(3);
    if cell_width < 4 || inner.height < cell_height {
        return;
    }
    let visible_rows = (inner.height / cell_height) as usize;
    let first_row = first_visible_row(nav.gallery_cursor, visible_rows);

    for (index, record) in log.iter().enumerate().skip(first_row * GRID_COLUMNS) {
        let row = index / GRID_COLUMNS - first_row;
        if row >= visible_rows {
            break;
        }
        let col = index % GRID_COLUMNS;
        let cell = Rect::new(
            inner.x + col as u16 * cell_width,
            inner.y + row as u16 * cell_height,
            cell_width,
            cell_height,
        );

        let is_cursor = index == nav.gallery_cursor;
        let mut block = Block::bordered().border_style(if is_cursor {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        });
        match &nav.mode {
            Mode::SelectPhotobooth { .. } => {
                if let Some(rank) = nav.mode.selection_rank(index) {
                    block = block.title(Line::from(format!(" {} ", rank)).style(Style::default().fg(Color::Magenta)));
                }
            }
            Mode::SelectZip { .. } => {
                if nav.mode.selection_rank(index).is_some() {
                    block = block.title(Line::from(" ✓ ").style(Style::default().fg(Color::Green)));
                }
            }
            _ => {}
        }

        let picture = block.inner(cell);
        f.render_widget(block, cell);
        f.render_widget(
            RasterWidget {
                image: view.thumbnails.get(record),
                placeholder: "?",
            },
            picture,
        );
    }
}

fn draw_menu(f: &mut Frame, area: Rect, session: &Session) {
    let nav = session.nav();
    let mut lines = vec![Line::from("")];
    for (i, item) in MenuItem::ALL.iter().enumerate() {
        let selected = i == nav.menu_cursor;
        let text = format!("{} {}", if selected { "▶" } else { " " }, item.label());
        let style = if selected {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(text).style(style));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(format!("{} photos", session.log().len())).style(Style::default().fg(Color::DarkGray)));

    let panel = centered(area, 30, lines.len() as u16 + 2);
    f.render_widget(Clear, panel);
    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" MENU ")),
        panel,
    );
}

fn draw_help(f: &mut Frame, area: Rect) {
    let lines: Vec<Line> = [
        "Space   snap",
        "f       next filter",
        "r / ↑   mirror (viewfinder)",
        "g       gallery",
        "w       grid",
        "←↑↓→    move",
        "Enter   ok / pick",
        "m       menu / finish zip",
        "Esc     back to camera",
        "q       quit",
    ]
    .into_iter()
    .map(Line::from)
    .collect();

    let panel = centered(area, 34, lines.len() as u16 + 2);
    f.render_widget(Clear, panel);
    f.render_widget(Paragraph::new(lines).block(Block::bordered().title(" HELP ")), panel);
}

fn status_line(session: &Session, view: &ViewState) -> String {
    let filter = session.filter();
    let mut line = format!(
        " {} | {} | {} | mirror {} | {} photos",
        view.device_name,
        session.nav().mode.name(),
        filter.filter().name,
        if filter.mirror { "on" } else { "off" },
        session.log().len()
    );
    if session.is_exporting() {
        line.push_str(" | exporting");
    }
    if !view.message.is_empty() {
        line.push_str(" | ");
        line.push_str(&view.message);
    }
    line
}

/// A rectangle of at most `width` x `height` centered in `area`
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Modal dialogs drawn over a cleared screen
///
/// Reading the answer blocks only the command that asked.
struct TerminalPrompter<'a> {
    terminal: &'a mut Tui,
}

impl TerminalPrompter<'_> {
    fn show(&mut self, title: &str, message: &str, hint: &str) -> io::Result<()> {
        self.terminal.draw(|f| {
            let panel = centered(f.area(), 48, 7);
            f.render_widget(Clear, panel);
            f.render_widget(
                Paragraph::new(vec![
                    Line::from(message),
                    Line::from(""),
                    Line::from(hint).style(Style::default().fg(Color::DarkGray)),
                ])
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(Block::bordered().title(title)),
                panel,
            );
        })?;
        Ok(())
    }

    fn read_key(&mut self) -> io::Result<KeyEvent> {
        loop {
            if let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                return Ok(key);
            }
        }
    }
}

impl Prompter for TerminalPrompter<'_> {
    fn confirm(&mut self, message: &str) -> bool {
        if let Err(e) = self.show(" CONFIRM ", message, "[y] yes   [n] no") {
            error!(error = %e, "Failed to show confirmation");
            return false;
        }
        loop {
            match self.read_key() {
                Ok(key) => match key.code {
                    KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => return true,
                    KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => return false,
                    _ => {}
                },
                Err(e) => {
                    error!(error = %e, "Failed to read confirmation");
                    return false;
                }
            }
        }
    }

    fn alert(&mut self, message: &str) {
        if let Err(e) = self.show(" ! ", message, "press any key") {
            error!(error = %e, "Failed to show alert");
            return;
        }
        if let Err(e) = self.read_key() {
            error!(error = %e, "Failed to read alert acknowledgement");
        }
    }
}

/// Widget that renders a raster using half-block characters
struct RasterWidget<'a> {
    image: Option<&'a RgbaImage>,
    placeholder: &'a str,
}

impl Widget for RasterWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(image) = self.image.filter(|i| i.width() > 0 && i.height() > 0) else {
            let msg: String = self.placeholder.chars().take(area.width as usize).collect();
            let x = area.x + (area.width.saturating_sub(msg.chars().count() as u16)) / 2;
            let y = area.y + area.height / 2;
            if y < area.y + area.height && x < area.x + area.width {
                buf.set_string(x, y, msg, Style::default());
            }
            return;
        };
        if area.width == 0 || area.height == 0 {
            return;
        }

        // Each terminal cell displays 2 vertical pixels
        let aspect = image.width() as f64 / image.height() as f64;
        let term_width = area.width as f64;
        let term_height = (area.height * 2) as f64;

        let (display_width, display_height) = if term_width / term_height > aspect {
            // Area is wider - fit to height
            let w = term_height * aspect;
            ((w as u16).max(1), area.height)
        } else {
            // Area is taller - fit to width
            let h = term_width / aspect;
            (area.width, ((h / 2.0) as u16).max(1))
        };

        // Center the image
        let x_offset = area.x + (area.width.saturating_sub(display_width)) / 2;
        let y_offset = area.y + (area.height.saturating_sub(display_height)) / 2;

        let x_scale = image.width() as f64 / display_width as f64;
        let y_scale = image.height() as f64 / (display_height * 2) as f64;

        for ty in 0..display_height {
            for tx in 0..display_width {
                let src_x = ((tx as f64 * x_scale) as u32).min(image.width() - 1);
                let src_top = ((ty as f64 * 2.0 * y_scale) as u32).min(image.height() - 1);
                let src_bottom = (((ty as f64 * 2.0 + 1.0) * y_scale) as u32).min(image.height() - 1);

                let top = image.get_pixel(src_x, src_top);
                let bottom = image.get_pixel(src_x, src_bottom);

                if let Some(cell) = buf.cell_mut((x_offset + tx, y_offset + ty)) {
                    cell.set_char('▀');
                    cell.set_fg(Color::Rgb(top[0], top[1], top[2]));
                    cell.set_bg(Color::Rgb(bottom[0], bottom[1], bottom[2]));
                }
            }
        }
    }
}

/// Status bar widget
struct StatusBar<'a> {
    message: &'a str,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = Style::default().fg(Color::White).bg(Color::DarkGray);

        // Fill background
        for x in area.x..area.x + area.width {
            if let Some(cell) = buf.cell_mut((x, area.y)) {
                cell.set_char(' ');
                cell.set_style(style);
            }
        }

        let text: String = self.message.chars().take(area.width as usize).collect();
        buf.set_string(area.x, area.y, text, style);
    }
}
