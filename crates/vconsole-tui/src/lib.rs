// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use log::{debug, warn};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use vconsole_app::{
    ActivityId, AppMode, ColumnHeader, ColumnKind, ConsoleCommand, ConsoleState, FilterField,
    ListEvent, ListMode, ListPanel, Notice, PanelRow, Pagination, StatusTone, TabKind,
};

const PAGE_WINDOW_EDGE: u32 = 1;
const PAGE_WINDOW_AROUND: u32 = 2;
const FILTER_MARK: &str = "▼";
const PAGE_GAP: &str = "…";
const NO_ACTIVITY_HINT: &str =
    "no activity selected -- pick one on the activities tab and press enter";

/// What the shell needs from the process hosting it.
pub trait ConsoleRuntime {
    /// The list behind `tab`; `None` while the tab has nothing to list yet.
    fn panel(&mut self, tab: TabKind) -> Option<&mut dyn ListPanel>;
    /// Points the sign-ups tab at `activity_id`, discarding its previous list.
    fn open_sign_ups(&mut self, activity_id: ActivityId) -> Result<()>;
    fn drain_notices(&mut self) -> Vec<Notice>;
    /// HTTP status of a rejected session, once the backend has sent one.
    fn login_required(&self) -> Option<u16>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiOptions {
    /// Cut search results down to the selected page instead of listing all.
    pub slice_query_results: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InternalEvent {
    ClearStatus { token: u64 },
}

#[derive(Debug, Clone, PartialEq)]
struct PanelSnapshot {
    headers: Vec<ColumnHeader>,
    rows: Vec<PanelRow>,
    mode: ListMode,
    pagination: Pagination,
    loading: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FilterFormUi {
    fields: &'static [FilterField],
    inputs: Vec<String>,
    cursor: usize,
}

impl FilterFormUi {
    fn move_cursor(&mut self, delta: isize) {
        let len = self.fields.len().max(1) as isize;
        self.cursor = (self.cursor as isize + delta).rem_euclid(len) as usize;
    }

    fn current_mut(&mut self) -> Option<&mut String> {
        self.inputs.get_mut(self.cursor)
    }

    fn pairs(&self) -> Vec<(&'static str, String)> {
        self.fields
            .iter()
            .map(|field| field.key)
            .zip(self.inputs.iter().cloned())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BrowseCommand {
    Quit,
    NextTab,
    PrevTab,
    MoveRow(isize),
    NextPage,
    PrevPage,
    FirstPage,
    LastPage,
    OpenFilter,
    ResetFilter,
    Reload,
    OpenSelected,
    ToggleHelp,
}

#[derive(Debug, Default)]
struct ViewData {
    options: UiOptions,
    snapshot: Option<PanelSnapshot>,
    loaded_tabs: Vec<TabKind>,
    queried_tabs: Vec<TabKind>,
    sign_up_activity: Option<ActivityId>,
    selected_row: usize,
    filter_form: Option<FilterFormUi>,
    help_visible: bool,
    status_token: u64,
}

pub fn run_app<R: ConsoleRuntime>(
    state: &mut ConsoleState,
    runtime: &mut R,
    options: UiOptions,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData {
        options,
        ..ViewData::default()
    };
    let (internal_tx, internal_rx) = mpsc::channel();

    activate_tab(state, runtime, &mut view_data, &internal_tx);

    let mut result = Ok(());
    loop {
        if let Some(status) = runtime.login_required() {
            result = Err(login_required_error(status));
            break;
        }

        process_internal_events(state, &view_data, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        match next_key_event() {
            Ok(Some(key)) => {
                if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                    break;
                }
            }
            Ok(None) => {}
            Err(error) => {
                result = Err(error);
                break;
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn next_key_event() -> Result<Option<KeyEvent>> {
    if !event::poll(Duration::from_millis(120)).context("poll event")? {
        return Ok(None);
    }
    match event::read().context("read event")? {
        Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(key)),
        _ => Ok(None),
    }
}

fn login_required_error(status: u16) -> anyhow::Error {
    anyhow!(
        "backend rejected the session with HTTP {status} -- sign in again, \
         put the new token in [session] token (or VCONSOLE_TOKEN) and restart"
    )
}

fn process_internal_events(
    state: &mut ConsoleState,
    view_data: &ViewData,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(ConsoleCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(4));
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut ConsoleState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(ConsoleCommand::SetStatus(message.into()));
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

/// Loads the active tab the first time it is shown, then refreshes the view.
fn activate_tab<R: ConsoleRuntime>(
    state: &mut ConsoleState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let tab = state.active_tab;
    view_data.selected_row = 0;
    view_data.filter_form = None;
    if !view_data.loaded_tabs.contains(&tab)
        && runtime.panel(tab).is_some()
        && run_panel_action(state, runtime, view_data, internal_tx, "load", |panel| {
            panel.load(1)
        })
    {
        view_data.loaded_tabs.push(tab);
    }
    refresh_view_data(state, runtime, view_data);
}

/// Runs `action` on the active panel and reports the outcome on the status
/// line. Returns whether the action succeeded.
fn run_panel_action<R, F>(
    state: &mut ConsoleState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    label: &str,
    action: F,
) -> bool
where
    R: ConsoleRuntime,
    F: FnOnce(&mut dyn ListPanel) -> Result<ListEvent>,
{
    let tab = state.active_tab;
    let Some(panel) = runtime.panel(tab) else {
        emit_status(state, view_data, internal_tx, NO_ACTIVITY_HINT);
        return false;
    };
    let outcome = action(panel);

    let notices = runtime.drain_notices();
    for notice in &notices {
        debug!("notice [{}] {}", notice.level.label(), notice.message);
    }

    let succeeded = outcome.is_ok();
    let message = match outcome {
        Ok(event) => notices
            .last()
            .map(|notice| format!("{}: {}", notice.level.label(), notice.message))
            .or_else(|| event_status(event)),
        Err(error) => {
            warn!("{label} on {} failed: {error:#}", tab.label());
            Some(format!("{label} failed: {error}"))
        }
    };
    if let Some(message) = message {
        emit_status(state, view_data, internal_tx, message);
    }

    refresh_view_data(state, runtime, view_data);
    succeeded
}

fn event_status(event: ListEvent) -> Option<String> {
    match event {
        ListEvent::PageLoaded { page, total } => {
            Some(format!("page {page} loaded ({total} records)"))
        }
        ListEvent::QueryApplied { matches: 1 } => Some("1 match".to_owned()),
        ListEvent::QueryApplied { matches } => Some(format!("{matches} matches")),
        ListEvent::PageSelected { page } => Some(format!("page {page}")),
        ListEvent::Unchanged => None,
    }
}

fn refresh_view_data<R: ConsoleRuntime>(
    state: &ConsoleState,
    runtime: &mut R,
    view_data: &mut ViewData,
) {
    view_data.queried_tabs = TabKind::ALL
        .into_iter()
        .filter(|tab| {
            runtime
                .panel(*tab)
                .is_some_and(|panel| panel.mode() == ListMode::Queried)
        })
        .collect();

    let slice = view_data.options.slice_query_results;
    view_data.snapshot = runtime.panel(state.active_tab).map(|panel| PanelSnapshot {
        headers: panel.headers(),
        rows: panel.rows(slice),
        mode: panel.mode(),
        pagination: panel.pagination(),
        loading: panel.is_loading(),
    });

    let row_count = view_data
        .snapshot
        .as_ref()
        .map_or(0, |snapshot| snapshot.rows.len());
    view_data.selected_row = view_data.selected_row.min(row_count.saturating_sub(1));
}

fn handle_key_event<R: ConsoleRuntime>(
    state: &mut ConsoleState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if view_data.help_visible {
        view_data.help_visible = false;
        return false;
    }

    match state.mode {
        AppMode::Filter => {
            handle_filter_key(state, runtime, view_data, internal_tx, key);
            false
        }
        AppMode::Browse => match browse_command_for_key(key) {
            Some(command) => apply_browse_command(state, runtime, view_data, internal_tx, command),
            None => false,
        },
    }
}

fn browse_command_for_key(key: KeyEvent) -> Option<BrowseCommand> {
    match key.code {
        KeyCode::Char('q') => Some(BrowseCommand::Quit),
        KeyCode::Tab => Some(BrowseCommand::NextTab),
        KeyCode::BackTab => Some(BrowseCommand::PrevTab),
        KeyCode::Char('j') | KeyCode::Down => Some(BrowseCommand::MoveRow(1)),
        KeyCode::Char('k') | KeyCode::Up => Some(BrowseCommand::MoveRow(-1)),
        KeyCode::Char('n') | KeyCode::Right | KeyCode::PageDown => Some(BrowseCommand::NextPage),
        KeyCode::Char('p') | KeyCode::Left | KeyCode::PageUp => Some(BrowseCommand::PrevPage),
        KeyCode::Home => Some(BrowseCommand::FirstPage),
        KeyCode::End => Some(BrowseCommand::LastPage),
        KeyCode::Char('/') => Some(BrowseCommand::OpenFilter),
        KeyCode::Char('r') => Some(BrowseCommand::ResetFilter),
        KeyCode::Char('R') => Some(BrowseCommand::Reload),
        KeyCode::Enter => Some(BrowseCommand::OpenSelected),
        KeyCode::Char('?') => Some(BrowseCommand::ToggleHelp),
        _ => None,
    }
}

fn apply_browse_command<R: ConsoleRuntime>(
    state: &mut ConsoleState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    command: BrowseCommand,
) -> bool {
    match command {
        BrowseCommand::Quit => return true,
        BrowseCommand::NextTab => {
            state.dispatch(ConsoleCommand::NextTab);
            activate_tab(state, runtime, view_data, internal_tx);
        }
        BrowseCommand::PrevTab => {
            state.dispatch(ConsoleCommand::PrevTab);
            activate_tab(state, runtime, view_data, internal_tx);
        }
        BrowseCommand::MoveRow(delta) => move_row(view_data, delta),
        BrowseCommand::NextPage
        | BrowseCommand::PrevPage
        | BrowseCommand::FirstPage
        | BrowseCommand::LastPage => {
            let target = view_data
                .snapshot
                .as_ref()
                .and_then(|snapshot| page_target(snapshot.pagination, command));
            if let Some(page) = target {
                view_data.selected_row = 0;
                run_panel_action(state, runtime, view_data, internal_tx, "page change", |panel| {
                    panel.change_page(page)
                });
            }
        }
        BrowseCommand::OpenFilter => open_filter_form(state, runtime, view_data, internal_tx),
        BrowseCommand::ResetFilter => {
            view_data.selected_row = 0;
            run_panel_action(state, runtime, view_data, internal_tx, "reset", |panel| {
                panel.reset()
            });
        }
        BrowseCommand::Reload => {
            run_panel_action(state, runtime, view_data, internal_tx, "reload", |panel| {
                panel.reload()
            });
        }
        BrowseCommand::OpenSelected => open_selected(state, runtime, view_data, internal_tx),
        BrowseCommand::ToggleHelp => view_data.help_visible = true,
    }
    false
}

fn move_row(view_data: &mut ViewData, delta: isize) {
    let row_count = view_data
        .snapshot
        .as_ref()
        .map_or(0, |snapshot| snapshot.rows.len());
    view_data.selected_row = view_data
        .selected_row
        .saturating_add_signed(delta)
        .min(row_count.saturating_sub(1));
}

/// The page a paging command lands on, or `None` when it would not move.
fn page_target(pagination: Pagination, command: BrowseCommand) -> Option<u32> {
    let last = pagination.page_count().max(1);
    let current = pagination.current_page.clamp(1, last);
    let target = match command {
        BrowseCommand::NextPage => current.saturating_add(1).min(last),
        BrowseCommand::PrevPage => current.saturating_sub(1).max(1),
        BrowseCommand::FirstPage => 1,
        BrowseCommand::LastPage => last,
        _ => return None,
    };
    (target != pagination.current_page).then_some(target)
}

fn open_selected<R: ConsoleRuntime>(
    state: &mut ConsoleState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    if state.active_tab != TabKind::Activities {
        return;
    }
    let Some(row_id) = view_data
        .snapshot
        .as_ref()
        .and_then(|snapshot| snapshot.rows.get(view_data.selected_row))
        .map(|row| row.id)
    else {
        return;
    };

    let activity_id = ActivityId::new(row_id);
    if let Err(error) = runtime.open_sign_ups(activity_id) {
        emit_status(
            state,
            view_data,
            internal_tx,
            format!("open sign-ups failed: {error}"),
        );
        return;
    }
    view_data.sign_up_activity = Some(activity_id);
    view_data.loaded_tabs.retain(|tab| *tab != TabKind::SignUps);
    state.dispatch(ConsoleCommand::SelectTab(TabKind::SignUps));
    activate_tab(state, runtime, view_data, internal_tx);
}

fn open_filter_form<R: ConsoleRuntime>(
    state: &mut ConsoleState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let Some(panel) = runtime.panel(state.active_tab) else {
        emit_status(state, view_data, internal_tx, NO_ACTIVITY_HINT);
        return;
    };
    let fields = panel.filter_fields();
    let inputs = fields
        .iter()
        .map(|field| panel.filter_value(field.key).unwrap_or_default())
        .collect();
    view_data.filter_form = Some(FilterFormUi {
        fields,
        inputs,
        cursor: 0,
    });
    state.dispatch(ConsoleCommand::OpenFilter);
}

fn close_filter_form(state: &mut ConsoleState, view_data: &mut ViewData) {
    view_data.filter_form = None;
    state.dispatch(ConsoleCommand::CloseFilter);
}

fn handle_filter_key<R: ConsoleRuntime>(
    state: &mut ConsoleState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Esc => return close_filter_form(state, view_data),
        KeyCode::Enter => return submit_filter_form(state, runtime, view_data, internal_tx),
        _ => {}
    }

    let Some(form) = view_data.filter_form.as_mut() else {
        state.dispatch(ConsoleCommand::CloseFilter);
        return;
    };
    let control = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Tab | KeyCode::Down => form.move_cursor(1),
        KeyCode::BackTab | KeyCode::Up => form.move_cursor(-1),
        KeyCode::Backspace => {
            if let Some(input) = form.current_mut() {
                input.pop();
            }
        }
        KeyCode::Char('u') if control => {
            if let Some(input) = form.current_mut() {
                input.clear();
            }
        }
        KeyCode::Char(ch) if !control => {
            if let Some(input) = form.current_mut() {
                input.push(ch);
            }
        }
        _ => {}
    }
}

fn submit_filter_form<R: ConsoleRuntime>(
    state: &mut ConsoleState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let Some(form) = view_data.filter_form.as_ref() else {
        return;
    };
    let owned = form.pairs();
    let pairs = owned
        .iter()
        .map(|(key, value)| (*key, value.as_str()))
        .collect::<Vec<_>>();

    view_data.selected_row = 0;
    if run_panel_action(state, runtime, view_data, internal_tx, "search", |panel| {
        panel.submit_filter(&pairs)
    }) {
        close_filter_form(state, view_data);
    }
}

/// Page numbers to show, with `None` where a run of pages is elided.
fn page_window(total_pages: u32, current_page: u32) -> Vec<Option<u32>> {
    if total_pages == 0 {
        return Vec::new();
    }
    let current = current_page.clamp(1, total_pages);
    let mut pages = Vec::new();

    let left_end = (1 + PAGE_WINDOW_EDGE).min(total_pages.saturating_add(1));
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current.saturating_sub(PAGE_WINDOW_AROUND));
    let mid_end = current
        .saturating_add(PAGE_WINDOW_AROUND + 1)
        .min(total_pages.saturating_add(1));
    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(total_pages.saturating_sub(PAGE_WINDOW_EDGE) + 1);
    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=total_pages).map(Some));
    pages
}

fn render_page_window(window: &[Option<u32>], current_page: u32) -> String {
    window
        .iter()
        .map(|page| match page {
            Some(page) if *page == current_page => format!("[{page}]"),
            Some(page) => page.to_string(),
            None => PAGE_GAP.to_owned(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn footer_text(snapshot: &PanelSnapshot, options: UiOptions) -> String {
    let pagination = snapshot.pagination;
    let pages = pagination.page_count();
    let mut parts = match snapshot.mode {
        ListMode::Paging => vec![format!("{} records", pagination.total_count)],
        ListMode::Queried if options.slice_query_results => {
            vec![format!("search | {} matches", pagination.total_count)]
        }
        ListMode::Queried => vec![format!(
            "search | {} matches (all shown)",
            pagination.total_count
        )],
    };
    parts.push(format!(
        "page {} of {}",
        pagination.current_page,
        pages.max(1)
    ));
    let window = page_window(pages, pagination.current_page);
    if !window.is_empty() {
        parts.push(render_page_window(&window, pagination.current_page));
    }
    parts.join(" | ")
}

fn status_text(state: &ConsoleState) -> String {
    let (mode, keys) = match state.mode {
        AppMode::Browse => (
            "BROWSE",
            "tab/shift+tab tabs | j/k rows | n/p pages | / filter | r reset | R reload | enter sign-ups | ? help | q quit",
        ),
        AppMode::Filter => (
            "FILTER",
            "tab/shift+tab field | enter search | ctrl+u clear | esc cancel",
        ),
    };
    match &state.status_line {
        Some(status) => format!("{mode} | {status} | {keys}"),
        None => format!("{mode} | {keys}"),
    }
}

fn tab_title(tab: TabKind, view_data: &ViewData) -> String {
    let mut title = match (tab, view_data.sign_up_activity) {
        (TabKind::SignUps, Some(activity)) => format!("{} #{activity}", tab.label()),
        _ => tab.label().to_owned(),
    };
    if view_data.queried_tabs.contains(&tab) {
        title.push(' ');
        title.push_str(FILTER_MARK);
    }
    format!(" {title} ")
}

fn table_title(tab: TabKind, snapshot: &PanelSnapshot) -> String {
    let mut title = format!(
        "{} | {} | {} rows",
        tab.label(),
        snapshot.mode.label(),
        snapshot.rows.len()
    );
    if snapshot.loading {
        title.push_str(" | loading");
    }
    title
}

fn render_filter_form_text(form: &FilterFormUi) -> String {
    let mut lines = form
        .fields
        .iter()
        .zip(&form.inputs)
        .enumerate()
        .map(|(index, (field, input))| {
            let focused = index == form.cursor;
            let marker = if focused { ">" } else { " " };
            let caret = if focused { "_" } else { "" };
            format!("{marker} {:<16}{input}{caret}", format!("{}:", field.label))
        })
        .collect::<Vec<_>>();
    lines.push(String::new());
    lines.push("blank fields are ignored; enums take a label or a code".to_owned());
    lines.join("\n")
}

fn help_overlay_text() -> &'static str {
    "browse: tab/shift+tab tabs | j/k rows | n/p or left/right pages | home/end first/last page\n\
browse: / filter | r clear filter | R reload page | enter open sign-ups (activities) | q quit\n\
filter: tab/shift+tab field | type to edit | backspace | ctrl+u clear field | enter search | esc cancel\n\
any key closes this help"
}

fn tone_color(tone: StatusTone) -> Color {
    match tone {
        StatusTone::Neutral => Color::Reset,
        StatusTone::Info => Color::Cyan,
        StatusTone::Success => Color::Green,
        StatusTone::Warning => Color::Yellow,
        StatusTone::Error => Color::Red,
    }
}

fn aligned_cell(text: String, kind: ColumnKind) -> Cell<'static> {
    let alignment = if kind.is_right_aligned() {
        Alignment::Right
    } else {
        Alignment::Left
    };
    Cell::from(Line::from(text).alignment(alignment))
}

fn render(frame: &mut ratatui::Frame<'_>, state: &ConsoleState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let selected = TabKind::ALL
        .iter()
        .position(|tab| *tab == state.active_tab)
        .unwrap_or(0);
    let tab_titles = TabKind::ALL
        .iter()
        .map(|tab| tab_title(*tab, view_data))
        .collect::<Vec<String>>();
    let tabs = Tabs::new(tab_titles)
        .block(Block::default().title("vconsole").borders(Borders::ALL))
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .select(selected);
    frame.render_widget(tabs, layout[0]);

    render_table(frame, layout[1], state, view_data);

    let footer = view_data
        .snapshot
        .as_ref()
        .map(|snapshot| footer_text(snapshot, view_data.options))
        .unwrap_or_default();
    let status_widget = Paragraph::new(format!("{footer}\n{}", status_text(state)))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status_widget, layout[2]);

    if let Some(form) = &view_data.filter_form {
        let area = centered_rect(60, 50, frame.area());
        frame.render_widget(Clear, area);
        let widget = Paragraph::new(render_filter_form_text(form)).block(
            Block::default()
                .title(format!("filter {}", state.active_tab.label()))
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(widget, area);
    }

    if view_data.help_visible {
        let area = centered_rect(80, 40, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn render_table(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &ConsoleState,
    view_data: &ViewData,
) {
    let Some(snapshot) = &view_data.snapshot else {
        let empty = Paragraph::new(NO_ACTIVITY_HINT).block(
            Block::default()
                .borders(Borders::ALL)
                .title(state.active_tab.label()),
        );
        frame.render_widget(empty, area);
        return;
    };

    let widths = snapshot
        .headers
        .iter()
        .map(|header| Constraint::Length(header.width))
        .collect::<Vec<_>>();
    let header = Row::new(snapshot.headers.iter().map(|header| {
        aligned_cell(header.title.to_owned(), header.kind).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    }));

    let rows = snapshot.rows.iter().enumerate().map(|(row_index, row)| {
        let selected_row = row_index == view_data.selected_row;
        let cells = row
            .cells
            .iter()
            .zip(&snapshot.headers)
            .map(|(value, header)| {
                let mut style = Style::default().fg(tone_color(value.tone()));
                if selected_row {
                    style = style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
                }
                aligned_cell(value.display(), header.kind).style(style)
            })
            .collect::<Vec<_>>();
        Row::new(cells)
    });

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(
            Block::default()
                .title(table_title(state.active_tab, snapshot))
                .borders(Borders::ALL),
        );
    frame.render_widget(table, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::{
        BrowseCommand, ConsoleRuntime, FilterFormUi, PanelSnapshot, UiOptions, ViewData,
        activate_tab, browse_command_for_key, footer_text, handle_key_event,
        login_required_error, page_target, page_window, render_filter_form_text,
        render_page_window, status_text, tab_title,
    };
    use anyhow::{Result, bail};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::sync::mpsc;
    use vconsole_app::{
        ActivityFilter, ActivityId, ActivityPreview, AdminAccount, AdminFilter, AppMode,
        ConsoleState, ListMode, ListPanel, ListView, Notice, NoticeLevel, Pagination,
        SignUpFilter, SignUpRecord, TabKind, Volunteer, VolunteerFilter,
    };
    use vconsole_testkit::{ConsoleFaker, InMemorySource, SourceCall};

    type Admins = ListView<InMemorySource<AdminAccount, AdminFilter>>;
    type Activities = ListView<InMemorySource<ActivityPreview, ActivityFilter>>;
    type Volunteers = ListView<InMemorySource<Volunteer, VolunteerFilter>>;
    type SignUps = ListView<InMemorySource<SignUpRecord, SignUpFilter>>;

    struct TestRuntime {
        admins: Admins,
        activities: Activities,
        volunteers: Volunteers,
        sign_ups: Option<SignUps>,
        opened: Vec<ActivityId>,
        notices: Vec<Notice>,
        login_required: Option<u16>,
    }

    impl TestRuntime {
        fn new() -> Result<Self> {
            let mut faker = ConsoleFaker::new(11);
            let admins = (1..=30)
                .map(|id| {
                    let mut account = faker.admin_account(id);
                    account.name = if id == 5 {
                        "Alice".to_owned()
                    } else {
                        format!("Admin {id}")
                    };
                    account
                })
                .collect();
            let activities = (1..=15).map(|id| faker.activity_preview(id)).collect();
            let volunteers = (1..=5).map(|id| faker.volunteer(id)).collect();

            Ok(Self {
                admins: ListView::new(
                    InMemorySource::new(admins, |filter: &AdminFilter, account: &AdminAccount| {
                        filter
                            .name
                            .as_deref()
                            .is_none_or(|name| account.name.contains(name))
                    }),
                    12,
                )?,
                activities: ListView::new(
                    InMemorySource::new(activities, |_: &ActivityFilter, _: &ActivityPreview| {
                        true
                    }),
                    12,
                )?,
                volunteers: ListView::new(
                    InMemorySource::new(volunteers, |_: &VolunteerFilter, _: &Volunteer| true),
                    12,
                )?,
                sign_ups: None,
                opened: Vec::new(),
                notices: Vec::new(),
                login_required: None,
            })
        }
    }

    impl ConsoleRuntime for TestRuntime {
        fn panel(&mut self, tab: TabKind) -> Option<&mut dyn ListPanel> {
            match tab {
                TabKind::Admins => Some(&mut self.admins),
                TabKind::Activities => Some(&mut self.activities),
                TabKind::Volunteers => Some(&mut self.volunteers),
                TabKind::SignUps => self
                    .sign_ups
                    .as_mut()
                    .map(|view| view as &mut dyn ListPanel),
            }
        }

        fn open_sign_ups(&mut self, activity_id: ActivityId) -> Result<()> {
            if activity_id.get() == 13 {
                bail!("activity 13 is archived");
            }
            let mut faker = ConsoleFaker::new(activity_id.get() as u64);
            let work = faker.work(1);
            let records = (1..=20)
                .map(|id| faker.sign_up_record(id, &work))
                .collect();
            self.sign_ups = Some(ListView::new(
                InMemorySource::new(records, |_: &SignUpFilter, _: &SignUpRecord| true),
                12,
            )?);
            self.opened.push(activity_id);
            Ok(())
        }

        fn drain_notices(&mut self) -> Vec<Notice> {
            std::mem::take(&mut self.notices)
        }

        fn login_required(&self) -> Option<u16> {
            self.login_required
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    struct Harness {
        state: ConsoleState,
        runtime: TestRuntime,
        view_data: ViewData,
        tx: mpsc::Sender<super::InternalEvent>,
        _rx: mpsc::Receiver<super::InternalEvent>,
    }

    impl Harness {
        fn start(tab: TabKind) -> Result<Self> {
            let (tx, rx) = mpsc::channel();
            let mut harness = Self {
                state: ConsoleState::new(tab),
                runtime: TestRuntime::new()?,
                view_data: ViewData::default(),
                tx,
                _rx: rx,
            };
            activate_tab(
                &mut harness.state,
                &mut harness.runtime,
                &mut harness.view_data,
                &harness.tx,
            );
            Ok(harness)
        }

        fn press(&mut self, code: KeyCode) -> bool {
            handle_key_event(
                &mut self.state,
                &mut self.runtime,
                &mut self.view_data,
                &self.tx,
                key(code),
            )
        }

        fn type_text(&mut self, text: &str) {
            for ch in text.chars() {
                self.press(KeyCode::Char(ch));
            }
        }

        fn status(&self) -> &str {
            self.state.status_line.as_deref().unwrap_or_default()
        }
    }

    #[test]
    fn page_window_elides_distant_pages() {
        assert_eq!(
            page_window(12, 6),
            vec![
                Some(1),
                None,
                Some(4),
                Some(5),
                Some(6),
                Some(7),
                Some(8),
                None,
                Some(12)
            ]
        );
        assert_eq!(
            render_page_window(&page_window(12, 6), 6),
            "1 … 4 5 [6] 7 8 … 12"
        );
    }

    #[test]
    fn page_window_without_gaps_for_short_lists() {
        assert!(page_window(0, 1).is_empty());
        assert_eq!(page_window(1, 1), vec![Some(1)]);
        assert_eq!(
            page_window(4, 1),
            vec![Some(1), Some(2), Some(3), Some(4)]
        );
        assert_eq!(page_window(4, 9).last(), Some(&Some(4)));
    }

    #[test]
    fn page_window_saturates_at_the_largest_page_count() {
        let max = u32::MAX;
        assert_eq!(
            page_window(max, max),
            vec![Some(1), None, Some(max - 2), Some(max - 1), Some(max)]
        );
        assert_eq!(
            page_window(max, 1),
            vec![Some(1), Some(2), Some(3), None, Some(max)]
        );
    }

    #[test]
    fn page_targets_stay_in_range() {
        let pagination = Pagination {
            current_page: 1,
            total_count: 37,
            page_size: 12,
        };
        assert_eq!(page_target(pagination, BrowseCommand::PrevPage), None);
        assert_eq!(page_target(pagination, BrowseCommand::NextPage), Some(2));
        assert_eq!(page_target(pagination, BrowseCommand::LastPage), Some(4));

        let last = Pagination {
            current_page: 4,
            ..pagination
        };
        assert_eq!(page_target(last, BrowseCommand::NextPage), None);
        assert_eq!(page_target(last, BrowseCommand::FirstPage), Some(1));

        let empty = Pagination {
            current_page: 1,
            total_count: 0,
            page_size: 12,
        };
        assert_eq!(page_target(empty, BrowseCommand::NextPage), None);
    }

    #[test]
    fn browse_keys_map_to_commands() {
        assert_eq!(
            browse_command_for_key(key(KeyCode::Char('/'))),
            Some(BrowseCommand::OpenFilter)
        );
        assert_eq!(
            browse_command_for_key(key(KeyCode::Char('r'))),
            Some(BrowseCommand::ResetFilter)
        );
        assert_eq!(
            browse_command_for_key(key(KeyCode::Char('R'))),
            Some(BrowseCommand::Reload)
        );
        assert_eq!(
            browse_command_for_key(key(KeyCode::BackTab)),
            Some(BrowseCommand::PrevTab)
        );
        assert_eq!(browse_command_for_key(key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn first_activation_loads_page_one() -> Result<()> {
        let harness = Harness::start(TabKind::Admins)?;
        let snapshot = harness.view_data.snapshot.as_ref().expect("admins loaded");
        assert_eq!(snapshot.rows.len(), 12);
        assert_eq!(snapshot.pagination.total_count, 30);
        assert_eq!(harness.view_data.loaded_tabs, vec![TabKind::Admins]);
        assert_eq!(harness.status(), "page 1 loaded (30 records)");
        Ok(())
    }

    #[test]
    fn switching_back_to_a_tab_does_not_refetch() -> Result<()> {
        let mut harness = Harness::start(TabKind::Admins)?;
        harness.press(KeyCode::Tab);
        assert_eq!(harness.state.active_tab, TabKind::Activities);
        harness.press(KeyCode::BackTab);
        assert_eq!(harness.state.active_tab, TabKind::Admins);
        assert_eq!(harness.runtime.admins.source().calls().len(), 1);
        Ok(())
    }

    #[test]
    fn paging_keys_fetch_and_clamp() -> Result<()> {
        let mut harness = Harness::start(TabKind::Admins)?;
        harness.press(KeyCode::Char('n'));
        harness.press(KeyCode::Char('n'));
        harness.press(KeyCode::Char('n'));
        assert_eq!(harness.runtime.admins.pagination().current_page, 3);
        assert_eq!(harness.runtime.admins.items().len(), 6);
        // page 3 is the last one; no further fetch
        assert_eq!(harness.runtime.admins.source().calls().len(), 3);

        harness.press(KeyCode::Home);
        assert_eq!(harness.runtime.admins.pagination().current_page, 1);
        Ok(())
    }

    #[test]
    fn row_cursor_stays_inside_the_page() -> Result<()> {
        let mut harness = Harness::start(TabKind::Admins)?;
        harness.press(KeyCode::Char('k'));
        assert_eq!(harness.view_data.selected_row, 0);
        for _ in 0..20 {
            harness.press(KeyCode::Char('j'));
        }
        assert_eq!(harness.view_data.selected_row, 11);
        Ok(())
    }

    #[test]
    fn filter_form_runs_a_search() -> Result<()> {
        let mut harness = Harness::start(TabKind::Admins)?;
        harness.press(KeyCode::Char('/'));
        assert_eq!(harness.state.mode, AppMode::Filter);
        harness.type_text("Alicx");
        harness.press(KeyCode::Backspace);
        harness.type_text("e");
        harness.press(KeyCode::Enter);

        assert_eq!(harness.state.mode, AppMode::Browse);
        assert!(harness.view_data.filter_form.is_none());
        assert_eq!(harness.runtime.admins.mode(), ListMode::Queried);
        assert_eq!(harness.runtime.admins.items().len(), 1);
        assert_eq!(harness.view_data.queried_tabs, vec![TabKind::Admins]);
        assert_eq!(harness.status(), "1 match");
        assert_eq!(tab_title(TabKind::Admins, &harness.view_data), " admins ▼ ");

        harness.press(KeyCode::Char('/'));
        let form = harness.view_data.filter_form.as_ref().expect("form open");
        assert_eq!(form.inputs[0], "Alice");
        harness.press(KeyCode::Esc);

        harness.press(KeyCode::Char('r'));
        assert_eq!(harness.runtime.admins.mode(), ListMode::Paging);
        assert!(harness.view_data.queried_tabs.is_empty());
        Ok(())
    }

    #[test]
    fn blank_filter_submit_makes_no_call() -> Result<()> {
        let mut harness = Harness::start(TabKind::Admins)?;
        harness.press(KeyCode::Char('/'));
        harness.type_text("   ");
        harness.press(KeyCode::Enter);

        assert_eq!(harness.state.mode, AppMode::Browse);
        assert_eq!(harness.runtime.admins.mode(), ListMode::Paging);
        assert!(
            harness
                .runtime
                .admins
                .source()
                .calls()
                .iter()
                .all(|call| matches!(call, SourceCall::FetchPage(_)))
        );
        Ok(())
    }

    #[test]
    fn invalid_filter_keeps_the_form_open() -> Result<()> {
        let mut harness = Harness::start(TabKind::Admins)?;
        harness.press(KeyCode::Char('/'));
        harness.press(KeyCode::Tab);
        harness.type_text("robot");
        harness.press(KeyCode::Enter);

        assert_eq!(harness.state.mode, AppMode::Filter);
        assert!(harness.status().starts_with("search failed: invalid"));
        assert_eq!(harness.runtime.admins.mode(), ListMode::Paging);
        Ok(())
    }

    #[test]
    fn failed_reload_reports_and_keeps_rows() -> Result<()> {
        let mut harness = Harness::start(TabKind::Admins)?;
        harness.runtime.admins.source_mut().fail_with("backend down");
        harness.runtime.notices.push(Notice::new(NoticeLevel::Error, "network error"));
        harness.press(KeyCode::Char('R'));

        assert_eq!(harness.status(), "reload failed: backend down");
        assert!(harness.runtime.notices.is_empty());
        let snapshot = harness.view_data.snapshot.as_ref().expect("rows kept");
        assert_eq!(snapshot.rows.len(), 12);
        assert!(!snapshot.loading);
        Ok(())
    }

    #[test]
    fn enter_on_an_activity_opens_its_sign_ups() -> Result<()> {
        let mut harness = Harness::start(TabKind::Activities)?;
        harness.press(KeyCode::Char('j'));
        harness.press(KeyCode::Char('j'));
        harness.press(KeyCode::Enter);

        assert_eq!(harness.state.active_tab, TabKind::SignUps);
        assert_eq!(harness.runtime.opened, vec![ActivityId::new(3)]);
        assert_eq!(harness.view_data.sign_up_activity, Some(ActivityId::new(3)));
        let snapshot = harness.view_data.snapshot.as_ref().expect("sign-ups loaded");
        assert_eq!(snapshot.pagination.total_count, 20);
        assert_eq!(tab_title(TabKind::SignUps, &harness.view_data), " sign-ups #3 ");
        Ok(())
    }

    #[test]
    fn open_sign_ups_failure_stays_on_activities() -> Result<()> {
        let mut harness = Harness::start(TabKind::Activities)?;
        harness.press(KeyCode::Char('n'));
        // page 2 starts at activity 13
        harness.press(KeyCode::Enter);
        assert_eq!(harness.state.active_tab, TabKind::Activities);
        assert_eq!(
            harness.status(),
            "open sign-ups failed: activity 13 is archived"
        );
        Ok(())
    }

    #[test]
    fn sign_ups_tab_without_an_activity_shows_a_hint() -> Result<()> {
        let mut harness = Harness::start(TabKind::Volunteers)?;
        harness.press(KeyCode::Tab);
        assert_eq!(harness.state.active_tab, TabKind::SignUps);
        assert!(harness.view_data.snapshot.is_none());

        harness.press(KeyCode::Char('/'));
        assert_eq!(harness.state.mode, AppMode::Browse);
        assert!(harness.status().starts_with("no activity selected"));
        Ok(())
    }

    #[test]
    fn quit_keys_end_the_loop() -> Result<()> {
        let mut harness = Harness::start(TabKind::Admins)?;
        assert!(!harness.press(KeyCode::Char('?')));
        assert!(harness.view_data.help_visible);
        // first key only closes the help overlay
        assert!(!harness.press(KeyCode::Char('q')));
        assert!(harness.press(KeyCode::Char('q')));
        assert!(handle_key_event(
            &mut harness.state,
            &mut harness.runtime,
            &mut harness.view_data,
            &harness.tx,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        ));
        Ok(())
    }

    #[test]
    fn footer_describes_paging_and_search() {
        let mut snapshot = PanelSnapshot {
            headers: Vec::new(),
            rows: Vec::new(),
            mode: ListMode::Paging,
            pagination: Pagination {
                current_page: 2,
                total_count: 37,
                page_size: 12,
            },
            loading: false,
        };
        assert_eq!(
            footer_text(&snapshot, UiOptions::default()),
            "37 records | page 2 of 4 | 1 [2] 3 4"
        );

        snapshot.mode = ListMode::Queried;
        snapshot.pagination = Pagination {
            current_page: 1,
            total_count: 2,
            page_size: 12,
        };
        assert_eq!(
            footer_text(&snapshot, UiOptions::default()),
            "search | 2 matches (all shown) | page 1 of 1 | [1]"
        );
        assert_eq!(
            footer_text(
                &snapshot,
                UiOptions {
                    slice_query_results: true
                }
            ),
            "search | 2 matches | page 1 of 1 | [1]"
        );
    }

    #[test]
    fn filter_form_text_marks_the_focused_field() {
        let form = FilterFormUi {
            fields: <AdminFilter as vconsole_app::FilterForm>::FIELDS,
            inputs: vec!["Al".to_owned(), String::new(), String::new()],
            cursor: 0,
        };
        let text = render_filter_form_text(&form);
        let first = text.lines().next().unwrap_or_default();
        assert!(first.starts_with("> "));
        assert!(first.ends_with("Al_"));
    }

    #[test]
    fn status_line_shows_mode_and_message() {
        let mut state = ConsoleState::default();
        assert!(status_text(&state).starts_with("BROWSE | tab/shift+tab"));
        state.status_line = Some("3 matches".to_owned());
        state.mode = AppMode::Filter;
        assert!(status_text(&state).starts_with("FILTER | 3 matches | "));
    }

    #[test]
    fn login_required_error_is_actionable() {
        let message = login_required_error(401).to_string();
        assert!(message.contains("HTTP 401"));
        assert!(message.contains("[session] token"));
    }
}
