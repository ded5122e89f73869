use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};

use todo_api::{
    application::todo_service::{TodoService, TodoServiceImpl},
    config::Config,
    domain::{
        repository::TodoRepository,
        todo::{CreateTodo, Todo},
        update::{UpdatePayload, UpdateRequest},
    },
    infrastructure::sqlite_repo::SqliteTodoRepository,
};

type Term = Terminal<CrosstermBackend<std::io::Stdout>>;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    let repo = SqliteTodoRepository::connect(&config.database_url).await?;
    repo.init().await?;
    let service = TodoServiceImpl::new(repo);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let res = run_app(&mut terminal, App::new(service, config.database_url)).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    res
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode { View, Create, Edit }

#[derive(Clone, Copy, PartialEq, Eq)]
enum Filter { All, InProgress, Done }

impl Filter {
    fn next(self) -> Self {
        match self { Filter::All => Filter::InProgress, Filter::InProgress => Filter::Done, Filter::Done => Filter::All }
    }

    fn label(self) -> &'static str {
        match self { Filter::All => "All", Filter::InProgress => "In Progress", Filter::Done => "Done" }
    }

    fn includes(self, todo: &Todo) -> bool {
        match self { Filter::All => true, Filter::InProgress => !todo.completed, Filter::Done => todo.completed }
    }
}

fn status_label(todo: &Todo) -> &'static str {
    if todo.completed { "Done" } else { "In Progress" }
}

struct App<R: TodoRepository> {
    service: TodoServiceImpl<R>,
    database_url: String,
    items: Vec<Todo>,
    visible: Vec<usize>,
    list_state: ListState,
    selected: usize,
    filter: Filter,
    mode: Mode,
    draft: String,
    /// Last failed operation, shown in the footer until the next action.
    notice: Option<String>,
}

impl<R: TodoRepository> App<R> {
    fn new(service: TodoServiceImpl<R>, database_url: String) -> Self {
        Self {
            service,
            database_url,
            items: Vec::new(),
            visible: Vec::new(),
            list_state: ListState::default(),
            selected: 0,
            filter: Filter::All,
            mode: Mode::View,
            draft: String::new(),
            notice: None,
        }
    }

    async fn load(&mut self) -> Result<()> {
        self.items = self.service.list().await?;
        self.refilter();
        Ok(())
    }

    fn refilter(&mut self) {
        let filter = self.filter;
        self.visible = self.items.iter().enumerate().filter(|(_, t)| filter.includes(t)).map(|(i, _)| i).collect();
        if self.visible.is_empty() {
            self.selected = 0;
            self.list_state.select(None);
        } else {
            self.selected = self.selected.min(self.visible.len() - 1);
            self.list_state.select(Some(self.selected));
        }
    }

    fn current(&self) -> Option<&Todo> {
        self.visible.get(self.selected).and_then(|&i| self.items.get(i))
    }

    async fn toggle_current(&mut self) -> Result<()> {
        let Some(id) = self.current().map(|t| t.id) else { return Ok(()) };
        if let Err(e) = self.service.update(id, UpdateRequest::Toggle).await {
            self.notice = Some(e.to_string());
        }
        self.load().await
    }

    async fn delete_current(&mut self) -> Result<()> {
        let Some(id) = self.current().map(|t| t.id) else { return Ok(()) };
        if let Err(e) = self.service.delete(id).await {
            self.notice = Some(e.to_string());
        }
        self.selected = self.selected.saturating_sub(1);
        self.load().await
    }

    async fn submit_draft(&mut self) -> Result<()> {
        let text = self.draft.trim().to_string();
        let target = self.current().map(|t| (t.id, t.body.clone()));
        let result = match (self.mode, target) {
            (Mode::Create, _) => self.service.create(CreateTodo::new(text)).await.map(|_| ()),
            (Mode::Edit, Some((_, body))) if body == text => Ok(()),
            (Mode::Edit, Some(_)) if text.is_empty() => {
                self.notice = Some("Todo cannot be empty".into());
                Ok(())
            }
            (Mode::Edit, Some((id, _))) => {
                let payload = UpdatePayload { body: Some(text), completed: None };
                self.service.update(id, UpdateRequest::Fields(payload)).await.map(|_| ())
            }
            _ => Ok(()),
        };
        if let Err(e) = result {
            self.notice = Some(e.to_string());
        }
        self.mode = Mode::View;
        self.draft.clear();
        self.load().await
    }
}

async fn run_app<R: TodoRepository>(terminal: &mut Term, mut app: App<R>) -> Result<()> {
    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();
    app.load().await?;

    loop {
        terminal.draw(|f| draw(f, &mut app))?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                // Only act on key presses; ignore repeats and releases to prevent duplicate input
                if key.kind != KeyEventKind::Press { continue; }
                match app.mode {
                    Mode::View => {
                        app.notice = None;
                        match key.code {
                            KeyCode::Char('q') => break,
                            KeyCode::Up => app.selected = app.selected.saturating_sub(1),
                            KeyCode::Down => {
                                if app.selected + 1 < app.visible.len() { app.selected += 1; }
                            }
                            KeyCode::Enter => app.toggle_current().await?,
                            KeyCode::Char('d') => app.delete_current().await?,
                            KeyCode::Char('n') => {
                                app.mode = Mode::Create;
                                app.draft.clear();
                            }
                            KeyCode::Char('e') => {
                                if let Some(body) = app.current().map(|t| t.body.clone()) {
                                    app.mode = Mode::Edit;
                                    app.draft = body;
                                }
                            }
                            KeyCode::Char('f') => {
                                app.filter = app.filter.next();
                                app.refilter();
                            }
                            _ => {}
                        }
                    }
                    Mode::Create | Mode::Edit => match key.code {
                        KeyCode::Esc => { app.mode = Mode::View; app.draft.clear(); }
                        KeyCode::Enter => app.submit_draft().await?,
                        KeyCode::Backspace => { app.draft.pop(); }
                        KeyCode::Char(c) => app.draft.push(c),
                        _ => {}
                    },
                }
            }
        }
        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }
    }
    Ok(())
}

fn draw<R: TodoRepository>(f: &mut Frame, app: &mut App<R>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1), Constraint::Length(3)])
        .split(f.size());

    let header = Paragraph::new("Enter: toggle, n: new, e: edit, d: delete, f: filter, q: quit")
        .block(Block::default().borders(Borders::ALL).title("today's tasks"));
    f.render_widget(header, chunks[0]);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);

    let rows: Vec<ListItem> = app
        .visible
        .iter()
        .filter_map(|&i| app.items.get(i))
        .map(|t| ListItem::new(format!("{} {}", if t.completed { "[x]" } else { "[ ]" }, t.body)))
        .collect();
    if app.visible.is_empty() { app.list_state.select(None); } else { app.list_state.select(Some(app.selected)); }
    let list = List::new(rows)
        .block(Block::default().borders(Borders::ALL).title(format!("todos [{}]", app.filter.label())))
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD | Modifier::REVERSED))
        .highlight_symbol(">> ");
    f.render_stateful_widget(list, middle[0], &mut app.list_state);

    let detail = match app.current() {
        Some(t) => format!(
            "#{}\n\n{}\n\nStatus: {}\nCreated: {}",
            t.id,
            t.body,
            status_label(t),
            t.created_at.format("%Y-%m-%d %H:%M"),
        ),
        None => "No todos".to_string(),
    };
    f.render_widget(Paragraph::new(detail).block(Block::default().borders(Borders::ALL).title("details")), middle[1]);

    let (title, footer) = match app.mode {
        Mode::View => ("info", app.notice.clone().unwrap_or_else(|| format!("DATABASE_URL={}", app.database_url))),
        Mode::Create => ("new", format!("{}_  |  Enter to add, Esc to cancel", app.draft)),
        Mode::Edit => ("edit", format!("{}_  |  Enter to save, Esc to cancel", app.draft)),
    };
    f.render_widget(Paragraph::new(footer).block(Block::default().borders(Borders::ALL).title(title)), chunks[2]);
}
