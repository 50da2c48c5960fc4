// Terminal operator panel for a Weiss GripKit
// Run with: cargo run -p example --bin panel_tui
// Make sure the simulator is running: cargo run -p sim

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;
use weiss_gripkit::drivers::GripkitConfig;
use weiss_gripkit::panel::{GripperPanel, UiState, UserCommand};
use weiss_gripkit::GripStatus;

struct App {
    endpoint: String,
    last_action: String,
    should_quit: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // No tracing subscriber: the screen belongs to the panel
    let config = GripkitConfig::from_env();
    let panel = GripperPanel::start(&config).map_err(|e| format!("Failed to start panel: {}", e))?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App {
        endpoint: config.connection_url(),
        last_action: "Waiting for first status".to_string(),
        should_quit: false,
    };
    let res = run_app(&mut terminal, &panel, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    panel.shutdown().await;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    panel: &GripperPanel,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    while !app.should_quit {
        let state = panel.current_state();
        terminal.draw(|f| ui(f, &state, app))?;

        // Input is polled with a timeout so status changes keep redrawing
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key_event(key.code, panel, app, &state).await;
                }
            }
        }
    }
    Ok(())
}

async fn handle_key_event(key: KeyCode, panel: &GripperPanel, app: &mut App, state: &UiState) {
    match key {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('g') => {
            app.last_action = "Grip requested".to_string();
            panel.dispatch(UserCommand::GripRequested).await;
        }
        KeyCode::Char('r') => {
            app.last_action = "Release requested".to_string();
            panel.dispatch(UserCommand::ReleaseRequested).await;
        }
        KeyCode::Char('d') => {
            let direction = state.grip_direction.toggled();
            app.last_action = format!("Direction set to {}", direction);
            panel.dispatch(UserCommand::DirectionChanged(direction)).await;
        }
        _ => {}
    }
}

fn ui(f: &mut Frame, state: &UiState, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Connection
            Constraint::Min(7),    // Gripper
            Constraint::Length(5), // Help
        ])
        .split(f.area());

    render_connection(f, chunks[0], state, app);
    render_gripper(f, chunks[1], state);
    render_help(f, chunks[2], app);
}

fn flag(value: bool, yes: &'static str, no: &'static str) -> Span<'static> {
    if value {
        Span::styled(yes, Style::default().fg(Color::Green))
    } else {
        Span::styled(no, Style::default().fg(Color::Red))
    }
}

fn render_connection(f: &mut Frame, area: Rect, state: &UiState, app: &App) {
    let line = Line::from(vec![
        Span::styled("Endpoint: ", Style::default().fg(Color::Cyan)),
        Span::raw(format!("{}  ", app.endpoint)),
        flag(state.communication_ok, "Communication OK", "No communication"),
    ]);

    let block = Paragraph::new(line).block(Block::default().borders(Borders::ALL).title("Connection"));
    f.render_widget(block, area);
}

fn render_gripper(f: &mut Frame, area: Rect, state: &UiState) {
    let status_color = match state.status {
        GripStatus::Gripped => Color::Green,
        GripStatus::Released => Color::Blue,
        GripStatus::NoPart => Color::Yellow,
        GripStatus::Error => Color::Red,
    };

    let lines = vec![
        Line::from(vec![
            Span::styled("Status:    ", Style::default().fg(Color::Cyan)),
            Span::styled(
                state.status.to_string(),
                Style::default().fg(status_color).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("Activated: ", Style::default().fg(Color::Cyan)),
            flag(state.activated, "Yes", "No, activate the gripper on the robot"),
        ]),
        Line::from(vec![
            Span::styled("Mounted:   ", Style::default().fg(Color::Cyan)),
            flag(state.mounted, "Yes", "No, mount the gripper on the flange"),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Direction: ", Style::default().fg(Color::Cyan)),
            Span::styled(state.grip_direction.to_string(), Style::default().fg(Color::Magenta)),
        ]),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Gripper")
            .border_style(Style::default().fg(Color::Yellow)),
    );
    f.render_widget(paragraph, area);
}

fn render_help(f: &mut Frame, area: Rect, app: &App) {
    let help_text = vec![
        Line::from("  g=Grip  r=Release  d=Toggle direction  q=Quit"),
        Line::from(""),
        Line::from(Span::styled(app.last_action.as_str(), Style::default().fg(Color::Yellow))),
    ];

    let help_block = Paragraph::new(help_text).block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(help_block, area);
}
