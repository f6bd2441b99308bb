use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use item_resolver::{resolve_text, Catalog, Category, Family, ResolveError, Selection};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Search,
    Catalog,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Search => Page::Catalog,
            Page::Catalog => Page::Search,
        }
    }
}

pub struct App {
    catalog: Arc<dyn Catalog>,
    pub input: String,
    pub category: Option<Category>,
    pub selection: Option<Selection>,
    pub state: TableState,
    pub counts: Vec<(Family, i64)>,
    pub current_page: Page,
    pub chosen: Option<String>,
    pub message: String,
    max_selectable: usize,
}

impl App {
    pub fn new(catalog: Arc<dyn Catalog>, counts: Vec<(Family, i64)>, max_selectable: usize) -> Self {
        Self {
            catalog,
            input: String::new(),
            category: None,
            selection: None,
            state: TableState::default(),
            counts,
            current_page: Page::Search,
            chosen: None,
            message: "Type a query such as 'w ak-47 redline ft st' and press Enter".to_string(),
            max_selectable,
        }
    }

    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    /// Names shown in the results table
    pub fn candidates(&self) -> Vec<String> {
        match &self.selection {
            Some(Selection::Single(name)) => vec![name.clone()],
            Some(Selection::Choose(names)) => names.clone(),
            _ => Vec::new(),
        }
    }

    /// Resolve the current input and reset the table cursor
    pub fn submit(&mut self) {
        self.chosen = None;

        match resolve_text(self.catalog.as_ref(), &self.input) {
            Ok((category, names)) => {
                let selection = Selection::from_names(names, self.max_selectable);
                self.message = format!("{}: {}", category, selection.message());
                self.category = Some(category);
                self.selection = Some(selection);
            }
            Err(ResolveError::MalformedQuery { reason, .. }) => {
                self.message = format!("Malformed query: {}", reason);
                self.category = None;
                self.selection = None;
            }
            Err(err) => {
                self.message = format!("Error: {}", err);
                self.category = None;
                self.selection = None;
            }
        }

        if self.candidates().is_empty() {
            self.state.select(None);
        } else {
            self.state.select(Some(0));
        }
    }

    /// Confirm the highlighted candidate
    pub fn pick_selected(&mut self) {
        let picked = match (&self.selection, self.state.selected()) {
            (Some(selection), Some(i)) => selection.pick(i + 1).map(str::to_string),
            _ => None,
        };
        if let Some(name) = picked {
            self.message = format!("Selected: {}", name);
            self.chosen = Some(name);
        }
    }

    pub fn next(&mut self) {
        let len = self.candidates().len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.candidates().len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Esc => return Ok(()),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(())
                }
                KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    app.clear_input()
                }
                KeyCode::Tab => app.next_page(),
                KeyCode::Enter if app.current_page == Page::Search => app.submit(),
                KeyCode::Right if app.current_page == Page::Search => app.pick_selected(),
                KeyCode::Down => app.next(),
                KeyCode::Up => app.previous(),
                KeyCode::Backspace => app.backspace(),
                KeyCode::Char(c) if app.current_page == Page::Search => app.push_char(c),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Query input
            Constraint::Min(0),    // Results or catalog
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_input(f, chunks[0], app);

    match app.current_page {
        Page::Search => render_results(f, chunks[1], app),
        Page::Catalog => render_catalog(f, chunks[1], app),
    }

    render_status_bar(f, chunks[2], app);
}

fn render_input(f: &mut Frame, area: Rect, app: &App) {
    let category = app
        .category
        .map(|c| c.name().to_string())
        .unwrap_or_else(|| "-".to_string());

    let line = Line::from(vec![
        Span::styled("> ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        Span::raw(app.input.as_str()),
        Span::styled("▏", Style::default().fg(Color::Yellow)),
    ]);

    let input = Paragraph::new(vec![line]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!(" Query [{}] ", category)),
    );

    f.render_widget(input, area);
}

fn render_results(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["#", "Market name"].iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let chosen = app.chosen.clone();
    let rows: Vec<Row> = app
        .candidates()
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            let color = if chosen.as_deref() == Some(name.as_str()) {
                Color::Green
            } else if name.starts_with(item_resolver::STAR) {
                Color::Magenta
            } else {
                Color::White
            };
            Row::new(vec![
                Cell::from(format!("{}", i + 1)),
                Cell::from(name).style(Style::default().fg(color)),
            ])
            .height(1)
        })
        .collect();

    let title = match &app.selection {
        Some(Selection::TooMany(n)) => format!(" Results: too many ({}), refine the query ", n),
        Some(Selection::NotFound) => " Results: nothing found ".to_string(),
        Some(selection) => format!(" Results: {} ", selection.numbered().len()),
        None => " Results ".to_string(),
    };

    let table = Table::new(rows, [Constraint::Length(4), Constraint::Min(20)])
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(title),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_catalog(f: &mut Frame, area: Rect, app: &App) {
    let header_cells = ["Table", "Rows"].iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.counts.iter().map(|(family, count)| {
        Row::new(vec![
            Cell::from(family.table()),
            Cell::from(format!("{}", count)),
        ])
    });

    let table = Table::new(rows, [Constraint::Length(16), Constraint::Length(12)])
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(" Catalog - Rows per table "),
        );

    f.render_widget(table, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let status_spans = vec![
        Span::styled(format!(" {} ", app.message), Style::default().fg(Color::Cyan)),
        Span::raw(" | "),
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::raw(" Resolve | "),
        Span::styled("↑/↓", Style::default().fg(Color::Yellow)),
        Span::raw(" Nav | "),
        Span::styled("→", Style::default().fg(Color::Yellow)),
        Span::raw(" Pick | "),
        Span::styled("Tab", Style::default().fg(Color::Yellow)),
        Span::raw(" Page | "),
        Span::styled("Esc", Style::default().fg(Color::Red)),
        Span::raw(" Quit"),
    ];

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use item_resolver::{
        CatalogRecord, KnifeSkin, MemoryCatalog, QualitySet, SkinRecord, ToolRecord,
    };

    fn app() -> App {
        let catalog = MemoryCatalog::from_records(vec![
            CatalogRecord::Skin(
                SkinRecord::knife("Karambit", KnifeSkin::Vanilla, QualitySet::empty())
                    .with_stattrak(),
            ),
            CatalogRecord::Tool(ToolRecord {
                name: "Name Tag".to_string(),
            }),
            CatalogRecord::Tool(ToolRecord {
                name: "Sticker Remover".to_string(),
            }),
        ]);
        App::new(Arc::new(catalog), vec![(Family::Tool, 2)], 30)
    }

    fn type_query(app: &mut App, text: &str) {
        app.clear_input();
        for c in text.chars() {
            app.push_char(c);
        }
        app.submit();
    }

    #[test]
    fn test_submit_single_match() {
        let mut app = app();
        type_query(&mut app, "k karambit st");
        assert_eq!(app.category, Some(Category::Knife));
        assert_eq!(app.candidates(), vec!["★ StatTrak™ Karambit"]);
        assert_eq!(app.state.selected(), Some(0));
    }

    #[test]
    fn test_navigation_wraps() {
        let mut app = app();
        type_query(&mut app, "t e");
        assert_eq!(app.candidates().len(), 2);
        app.next();
        assert_eq!(app.state.selected(), Some(1));
        app.next();
        assert_eq!(app.state.selected(), Some(0));
        app.previous();
        assert_eq!(app.state.selected(), Some(1));
    }

    #[test]
    fn test_pick_selected() {
        let mut app = app();
        type_query(&mut app, "t e");
        app.next();
        app.pick_selected();
        assert_eq!(app.chosen.as_deref(), Some("Sticker Remover"));
    }

    #[test]
    fn test_malformed_query_clears_results() {
        let mut app = app();
        type_query(&mut app, "w karambit");
        assert!(app.selection.is_none());
        assert!(app.message.starts_with("Malformed query"));
        assert_eq!(app.state.selected(), None);
    }

    #[test]
    fn test_backspace() {
        let mut app = app();
        app.push_char('t');
        app.push_char('x');
        app.backspace();
        assert_eq!(app.input, "t");
    }
}
