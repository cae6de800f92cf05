//! ratatui-based UI.

use std::hash::{DefaultHasher, Hash as _, Hasher as _};
use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::Context as _;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{event, terminal};
use photodb_application::AppContext;
use photodb_core::Item;
use photodb_ingest::IngestWorker;
use photodb_storage::Slot;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{
    Block, Borders, Clear, HighlightSpacing, List, ListItem, ListState, Paragraph, Wrap,
};
use ratatui_image::picker::Picker;
use ratatui_image::protocol::Protocol as ImageProtocol;
use ratatui_image::{Image as ImageWidget, Resize};
use unicode_width::UnicodeWidthChar;

mod picker;

const ACCENT: Color = Color::Blue;
const DESCRIPTION_HINT_TOKENS: usize = 200;

pub struct Ui<S> {
    ctx: AppContext<S>,
    worker: IngestWorker,
    form: EditForm,
    upload_panel: UploadPanel,
    image_picker: Picker,
    preview: PreviewCache,
}

impl<S: Slot> Ui<S> {
    pub fn new(ctx: AppContext<S>, worker: IngestWorker) -> Self {
        Self {
            ctx,
            worker,
            form: EditForm::default(),
            upload_panel: UploadPanel::default(),
            image_picker: Picker::halfblocks(),
            preview: PreviewCache::default(),
        }
    }

    pub fn run(mut self) -> anyhow::Result<AppContext<S>> {
        let mut terminal = setup_terminal()?;
        self.image_picker = picker::detect();
        terminal.clear().ok();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            self.event_loop(&mut terminal)
        }));
        let restore_result = restore_terminal(&mut terminal);

        match (result, restore_result) {
            (Ok(Ok(())), Ok(())) => Ok(self.ctx),
            (Ok(Ok(())), Err(err)) => Err(err),
            (Ok(Err(err)), _) => Err(err),
            (Err(panic), Ok(())) => Err(anyhow::anyhow!(panic_to_string(panic))),
            (Err(panic), Err(err)) => Err(anyhow::anyhow!(
                "{}\n(additionally failed to restore terminal: {err})",
                panic_to_string(panic)
            )),
        }
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> anyhow::Result<()> {
        let tick_rate = Duration::from_millis(100);
        let mut needs_redraw = true;

        loop {
            if self.collect_uploads() {
                needs_redraw = true;
            }

            if needs_redraw {
                terminal.draw(|frame| self.draw(frame.area(), frame))?;
                needs_redraw = false;
            }

            if !event::poll(tick_rate)? {
                continue;
            }

            match event::read()? {
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Release {
                        continue;
                    }
                    needs_redraw = true;

                    let quit = if self.upload_panel.open {
                        self.handle_upload_panel_key(key)?;
                        false
                    } else if self.ctx.controller.is_editing() {
                        self.handle_edit_key(key);
                        false
                    } else {
                        self.handle_view_key(key)
                    };
                    if quit {
                        return Ok(());
                    }
                }
                _ => {}
            }
        }
    }

    /// Applies finished upload batches. Returns whether anything arrived.
    fn collect_uploads(&mut self) -> bool {
        let mut arrived = false;
        while let Some(batch) = self.worker.try_recv() {
            arrived = true;
            let requested = batch.ticket;
            match self.ctx.controller.add_images(batch) {
                Ok(0) => self.set_status("No images in upload"),
                Ok(n) => self.set_status(format!("Added {n} image{}", plural(n))),
                Err(err) => tracing::debug!(ticket = %requested, %err, "upload dropped"),
            }
        }
        arrived
    }

    fn handle_view_key(&mut self, key: KeyEvent) -> bool {
        let catalog = self.ctx.store.catalog();
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return true,
            KeyCode::Down => {
                let _ = self.ctx.select_relative(1);
            }
            KeyCode::Up => {
                let _ = self.ctx.select_relative(-1);
            }
            KeyCode::Right => self.ctx.controller.next_image(catalog),
            KeyCode::Left => self.ctx.controller.prev_image(catalog),
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                self.ctx.controller.show_image(catalog, index);
            }
            KeyCode::Char('a') => {
                if let Err(err) = self.ctx.add_item() {
                    self.set_status(err.to_string());
                }
            }
            KeyCode::Char('e') => match self.ctx.controller.begin_edit(catalog) {
                Ok(_) => {
                    if let Some(scratch) = self.ctx.controller.scratch() {
                        self.form = EditForm::from_item(scratch);
                    }
                }
                Err(err) => self.set_status(err.to_string()),
            },
            KeyCode::Char('d') => {
                if let Err(err) = self.ctx.delete_selected() {
                    self.set_status(err.to_string());
                }
            }
            _ => {}
        }
        false
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let catalog = self.ctx.store.catalog();
        match key.code {
            KeyCode::Esc => {
                let _ = self.ctx.controller.cancel_edit();
                self.set_status("Edit cancelled");
            }
            KeyCode::Char('s') if ctrl => {
                if self.commit_date() {
                    let _ = self.ctx.save_edit();
                }
            }
            KeyCode::Char('u') if ctrl => {
                self.upload_panel.open = true;
                self.upload_panel.input.clear();
            }
            KeyCode::Char('x') if ctrl => {
                let index = self.ctx.controller.image_index();
                if let Ok(true) = self.ctx.controller.remove_image(index) {
                    self.set_status(format!("Removed image {}", index + 1));
                }
            }
            KeyCode::Char('d') if ctrl => {
                if let Err(err) = self.ctx.delete_selected() {
                    self.set_status(err.to_string());
                }
            }
            KeyCode::Right => self.ctx.controller.next_image(catalog),
            KeyCode::Left => self.ctx.controller.prev_image(catalog),
            KeyCode::Tab => {
                if self.commit_date() {
                    self.form.focus = self.form.focus.next();
                }
            }
            KeyCode::BackTab => {
                if self.commit_date() {
                    self.form.focus = self.form.focus.prev();
                }
            }
            KeyCode::Backspace => {
                self.form.active_buffer().pop();
                self.apply_form_field();
            }
            KeyCode::Char(c) if !ctrl => {
                if self.form.accepts(c) {
                    self.form.active_buffer().push(c);
                    self.apply_form_field();
                }
            }
            _ => {}
        }
    }

    fn apply_form_field(&mut self) {
        match self.form.focus {
            FormField::ItemNumber => {
                let _ = self.ctx.controller.set_item_number(&self.form.item_number);
            }
            FormField::Description => {
                let _ = self
                    .ctx
                    .controller
                    .set_description(self.form.description.clone());
            }
            FormField::DateCreated => {}
        }
    }

    /// Pushes the date buffer into the scratch copy. Returns `false` and keeps
    /// focus on the field when the date does not parse.
    fn commit_date(&mut self) -> bool {
        if self.form.focus != FormField::DateCreated {
            return true;
        }
        match self.ctx.controller.set_date_created(&self.form.date_created) {
            Ok(()) => true,
            Err(err) => {
                self.set_status(err.to_string());
                false
            }
        }
    }

    fn handle_upload_panel_key(&mut self, key: KeyEvent) -> anyhow::Result<()> {
        match key.code {
            KeyCode::Esc => {
                self.upload_panel.open = false;
            }
            KeyCode::Enter => {
                self.upload_panel.open = false;
                let paths = photodb_ingest::parse_path_list(&self.upload_panel.input);
                if paths.is_empty() {
                    return Ok(());
                }
                let Some(ticket) = self.ctx.controller.edit_ticket() else {
                    return Ok(());
                };
                let count = paths.len();
                self.worker.submit(ticket, paths)?;
                self.set_status(format!("Decoding {count} file{}...", plural(count)));
            }
            KeyCode::Backspace => {
                self.upload_panel.input.pop();
            }
            KeyCode::Char(c) => {
                self.upload_panel.input.push(c);
            }
            _ => {}
        }
        Ok(())
    }

    fn set_status(&mut self, msg: impl Into<String>) {
        self.ctx.status = Some(msg.into());
    }

    fn draw(&mut self, area: Rect, frame: &mut ratatui::Frame) {
        frame.render_widget(Clear, area);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(area);

        let title = Paragraph::new(Text::from(self.header_lines()))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::BOTTOM));
        frame.render_widget(title, layout[0]);

        let body_layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
            .split(layout[1]);

        self.draw_item_list(frame, body_layout[0]);
        if self.ctx.controller.is_editing() {
            self.draw_edit_form(frame, body_layout[1]);
        } else {
            self.draw_details(frame, body_layout[1]);
        }

        let footer = Paragraph::new(Text::from(self.footer_lines()))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::TOP));
        frame.render_widget(footer, layout[2]);

        if self.upload_panel.open {
            self.draw_upload_panel(area, frame);
        }
    }

    fn header_lines(&self) -> Vec<Line<'static>> {
        let mut spans = vec![Span::styled(
            "Photo Database",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )];
        let pending = self.worker.pending();
        if pending > 0 {
            spans.push(Span::styled(
                format!("  decoding {pending} upload{}", plural(pending)),
                Style::default().fg(Color::DarkGray),
            ));
        }
        vec![Line::from(spans)]
    }

    fn footer_lines(&self) -> Vec<Line<'static>> {
        let hints = if self.upload_panel.open {
            "Enter: decode files  Esc: close"
        } else if self.ctx.controller.is_editing() {
            "Tab: next field  ←/→: images  Ctrl+u: upload  Ctrl+x: remove image  Ctrl+s: save  Esc: cancel  Ctrl+d: delete"
        } else {
            "↑/↓: select  ←/→: images  1-9: jump  a: add  e: edit  d: delete  q: quit"
        };
        let mut lines = vec![Line::raw(hints)];
        if let Some(status) = self.ctx.status.as_deref() {
            lines.push(Line::styled(
                status.to_string(),
                Style::default().fg(Color::DarkGray),
            ));
        }
        lines
    }

    fn draw_item_list(&self, frame: &mut ratatui::Frame, area: Rect) {
        let items = self.ctx.store.items();
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("Items ({})", items.len()));

        if items.is_empty() {
            let paragraph = Paragraph::new(Text::from(vec![
                Line::raw("No items."),
                Line::raw(""),
                Line::raw("Press a to add one."),
            ]))
            .block(block)
            .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, area);
            return;
        }

        let max_width = area.width.saturating_sub(6) as usize;
        let rows: Vec<ListItem> = items
            .iter()
            .map(|item| {
                let lines = list_row_lines(item, max_width.max(8));
                ListItem::new(Text::from(lines))
            })
            .collect();

        let highlight_style = Style::default()
            .fg(Color::Black)
            .bg(ACCENT)
            .add_modifier(Modifier::BOLD);

        let list = List::new(rows)
            .block(block)
            .highlight_style(highlight_style)
            .highlight_symbol("> ")
            .highlight_spacing(HighlightSpacing::Always);

        let mut state = ListState::default();
        state.select(self.ctx.selected_position());
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_details(&mut self, frame: &mut ratatui::Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Details");
        let Some(item) = self.ctx.displayed_item().cloned() else {
            let paragraph = Paragraph::new("No selection.").block(block);
            frame.render_widget(paragraph, area);
            return;
        };
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(6),
                Constraint::Length(7),
            ])
            .split(inner);

        let bold = Style::default().add_modifier(Modifier::BOLD);
        let heading = vec![
            Line::from(vec![
                Span::styled("Item Number ", bold),
                Span::styled(format!("#{}", item.item_number), bold.fg(ACCENT)),
            ]),
            Line::raw(format!("ID: {}", item.id)),
        ];
        frame.render_widget(Paragraph::new(Text::from(heading)), layout[0]);

        let index = self.ctx.controller.image_index();
        self.draw_image(frame, layout[1], &item.images, index);

        let text = vec![
            Line::styled("Description", bold),
            Line::raw(item.description.clone()),
            Line::raw(""),
            Line::styled("Date Created", bold),
            Line::raw(item.date_created.clone()),
        ];
        frame.render_widget(
            Paragraph::new(Text::from(text)).wrap(Wrap { trim: false }),
            layout[2],
        );
    }

    fn draw_image(&mut self, frame: &mut ratatui::Frame, area: Rect, images: &[String], index: usize) {
        let Some(image) = images.get(index) else {
            frame.render_widget(
                Paragraph::new("(no images)").alignment(Alignment::Center),
                area,
            );
            return;
        };

        let counter = if images.len() > 1 {
            format!(" {} / {} ", index + 1, images.len())
        } else {
            String::new()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(counter)
            .title_alignment(Alignment::Center);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        match self.preview.protocol_for(&self.image_picker, image, inner) {
            Some(protocol) => {
                let proto_area = protocol.area();
                let draw_width = proto_area.width.min(inner.width);
                let draw_height = proto_area.height.min(inner.height);
                let draw_area = Rect::new(
                    inner.x + inner.width.saturating_sub(draw_width) / 2,
                    inner.y + inner.height.saturating_sub(draw_height) / 2,
                    draw_width,
                    draw_height,
                );
                frame.render_widget(ImageWidget::new(protocol), draw_area);
            }
            None => {
                let paragraph = Paragraph::new(Text::from(vec![
                    Line::raw(""),
                    Line::raw(describe_image(image)),
                ]))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
                frame.render_widget(paragraph, inner);
            }
        }
    }

    fn draw_edit_form(&mut self, frame: &mut ratatui::Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Edit Item");
        let Some(scratch) = self.ctx.controller.scratch().cloned() else {
            frame.render_widget(block, area);
            return;
        };
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(inner);

        let bold = Style::default().add_modifier(Modifier::BOLD);
        let index = self.ctx.controller.image_index();
        let mut lines = Vec::new();

        lines.push(self.form_label(FormField::ItemNumber, "Item Number (3 digits)"));
        lines.push(Line::raw(format!("  {}", self.form.item_number)));
        lines.push(Line::raw(""));

        lines.push(Line::styled(
            format!("Images ({})", scratch.images.len()),
            bold,
        ));
        if scratch.images.is_empty() {
            lines.push(Line::raw("  (none; Ctrl+u to upload)"));
        }
        for (idx, image) in scratch.images.iter().enumerate() {
            let text = format!("  {}. {}", idx + 1, describe_image(image));
            if idx == index {
                lines.push(Line::styled(text, Style::default().fg(ACCENT)));
            } else {
                lines.push(Line::raw(text));
            }
        }
        lines.push(Line::raw(""));

        let tokens = self.form.description.split_whitespace().count();
        lines.push(self.form_label(
            FormField::Description,
            &format!("Description (max {DESCRIPTION_HINT_TOKENS} tokens, {tokens} used)"),
        ));
        lines.push(Line::raw(format!("  {}", self.form.description)));
        lines.push(Line::raw(""));

        lines.push(self.form_label(FormField::DateCreated, "Date Created"));
        let date_valid = photodb_core::parse_date(&self.form.date_created).is_ok();
        let mut date_spans = vec![Span::raw(format!("  {}", self.form.date_created))];
        if !date_valid {
            date_spans.push(Span::styled(
                "  (YYYY-MM-DD)",
                Style::default().fg(Color::Red),
            ));
        }
        lines.push(Line::from(date_spans));

        frame.render_widget(
            Paragraph::new(Text::from(lines)).wrap(Wrap { trim: false }),
            layout[0],
        );
        self.draw_image(frame, layout[1], &scratch.images, index);
    }

    fn form_label(&self, field: FormField, label: &str) -> Line<'static> {
        let focused = self.form.focus == field;
        let marker = if focused { "▸ " } else { "  " };
        let style = if focused {
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        Line::styled(format!("{marker}{label}"), style)
    }

    fn draw_upload_panel(&self, area: Rect, frame: &mut ratatui::Frame) {
        let popup_area = centered_rect(70, 25, area);
        frame.render_widget(Clear, popup_area);

        let lines = vec![
            Line::raw("Image files, separated by ';' or ','"),
            Line::raw(""),
            Line::from(vec![
                Span::styled("> ", Style::default().fg(ACCENT)),
                Span::raw(self.upload_panel.input.clone()),
            ]),
        ];
        let paragraph = Paragraph::new(Text::from(lines))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Upload Images"),
            )
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, popup_area);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum FormField {
    #[default]
    ItemNumber,
    Description,
    DateCreated,
}

impl FormField {
    fn next(self) -> Self {
        match self {
            FormField::ItemNumber => FormField::Description,
            FormField::Description => FormField::DateCreated,
            FormField::DateCreated => FormField::ItemNumber,
        }
    }

    fn prev(self) -> Self {
        match self {
            FormField::ItemNumber => FormField::DateCreated,
            FormField::Description => FormField::ItemNumber,
            FormField::DateCreated => FormField::Description,
        }
    }
}

/// Text buffers backing the edit form while an edit session is open.
#[derive(Debug, Clone, Default)]
struct EditForm {
    focus: FormField,
    item_number: String,
    description: String,
    date_created: String,
}

impl EditForm {
    fn from_item(item: &Item) -> Self {
        Self {
            focus: FormField::ItemNumber,
            item_number: item.item_number.to_string(),
            description: item.description.clone(),
            date_created: item.date_created.clone(),
        }
    }

    fn active_buffer(&mut self) -> &mut String {
        match self.focus {
            FormField::ItemNumber => &mut self.item_number,
            FormField::Description => &mut self.description,
            FormField::DateCreated => &mut self.date_created,
        }
    }

    fn accepts(&self, c: char) -> bool {
        match self.focus {
            FormField::ItemNumber => c.is_ascii_digit() && self.item_number.len() < 3,
            FormField::Description => !c.is_control(),
            FormField::DateCreated => {
                (c.is_ascii_digit() || c == '-') && self.date_created.len() < 10
            }
        }
    }
}

#[derive(Debug, Default)]
struct UploadPanel {
    open: bool,
    input: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PreviewKey {
    image_hash: u64,
    width: u16,
    height: u16,
}

/// Last rendered inline image, so redraws do not re-decode it.
#[derive(Default)]
struct PreviewCache {
    key: Option<PreviewKey>,
    protocol: Option<ImageProtocol>,
}

impl PreviewCache {
    fn protocol_for(&mut self, picker: &Picker, image: &str, area: Rect) -> Option<&ImageProtocol> {
        let (_, payload) = split_data_uri(image)?;
        let key = PreviewKey {
            image_hash: hash_str(image),
            width: area.width,
            height: area.height,
        };
        if self.key != Some(key) {
            self.key = Some(key);
            self.protocol = decode_inline(payload).and_then(|decoded| {
                picker
                    .new_protocol(
                        decoded,
                        Rect::new(0, 0, area.width, area.height),
                        Resize::Fit(None),
                    )
                    .map_err(|err| tracing::debug!(error = %err, "image protocol failed"))
                    .ok()
            });
        }
        self.protocol.as_ref()
    }
}

fn decode_inline(payload: &str) -> Option<image::DynamicImage> {
    let bytes = STANDARD
        .decode(payload)
        .map_err(|err| tracing::debug!(error = %err, "bad base64 payload"))
        .ok()?;
    image::load_from_memory(&bytes)
        .map_err(|err| tracing::debug!(error = %err, "undecodable inline image"))
        .ok()
}

fn hash_str(value: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Splits `data:<mime>;base64,<payload>`.
fn split_data_uri(image: &str) -> Option<(&str, &str)> {
    image.strip_prefix("data:")?.split_once(";base64,")
}

fn describe_image(image: &str) -> String {
    match split_data_uri(image) {
        Some((mime, payload)) => {
            let bytes = payload.len() / 4 * 3;
            format!("inline {mime}, {}", format_bytes(bytes))
        }
        None => image.to_string(),
    }
}

fn format_bytes(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    let b = bytes as f64;
    if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{bytes} B")
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

fn list_row_lines(item: &Item, max_width: usize) -> Vec<Line<'static>> {
    let count = item.images.len();
    vec![
        Line::styled(
            format!("#{}", item.item_number),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Line::raw(truncate_to_width(&item.description, max_width)),
        Line::styled(
            format!("{} • {count} image{}", item.date_created, plural(count)),
            Style::default().fg(Color::DarkGray),
        ),
    ]
}

/// Cuts `text` to at most `max_width` terminal columns, marking the cut with
/// an ellipsis.
fn truncate_to_width(text: &str, max_width: usize) -> String {
    let text = text.lines().next().unwrap_or("");
    let total: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= max_width {
        return text.to_string();
    }
    let budget = max_width.saturating_sub(1);
    let mut out = String::new();
    let mut used = 0usize;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

fn setup_terminal() -> anyhow::Result<Terminal<CrosstermBackend<Stdout>>> {
    terminal::enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen).context("enter alt screen")?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).context("create terminal")
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> anyhow::Result<()> {
    terminal::disable_raw_mode().context("disable raw mode")?;
    crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("leave alt screen")?;
    Ok(())
}

fn panic_to_string(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("panic: {s}")
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("panic: {s}")
    } else {
        "panic: (unknown payload)".to_string()
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
