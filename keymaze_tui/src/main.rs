use keymaze_core::{
    Action, Maze, Position, Solver, Terrain, Validation,
    generator::{GeneratorConfig, generate},
    render_actions, validate,
};

use anyhow::{Context, Result};
use clap::Parser;
use ratatui::{
    crossterm::{
        self,
        event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    },
    prelude::*,
    widgets::*,
};
use std::{
    io::{self, Stdout},
    path::PathBuf,
    time::{Duration, Instant},
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Maze layout file to load
    #[arg(short, long, value_name = "MAZE_FILE")]
    map: Option<PathBuf>,

    /// Generate a random maze from this seed instead of loading a file
    #[arg(short, long)]
    seed: Option<u64>,

    /// Rank frontier nodes by accumulated cost alone
    #[arg(long)]
    no_heuristic: bool,
}

struct App {
    /// The maze being walked.
    maze: Maze,
    /// The solver's plan, if one exists.
    plan: Option<Vec<Action>>,
    /// Independent validation of the plan.
    verdict: Option<Validation>,
    /// Current walker position along the plan.
    walker: Position,
    /// Steps of the plan already taken.
    step: usize,
    /// Flag to control the main loop.
    should_quit: bool,
}

impl App {
    fn new(maze: Maze, no_heuristic: bool) -> Self {
        let solver = if no_heuristic {
            Solver::new(&maze).without_heuristic()
        } else {
            Solver::new(&maze)
        };
        let plan = solver.run();
        let verdict = plan.as_ref().map(|p| validate(&maze, p));
        let walker = maze.initial();
        App {
            maze,
            plan,
            verdict,
            walker,
            step: 0,
            should_quit: false,
        }
    }

    /// Advances the walker one step along the plan.
    fn tick(&mut self) {
        let Some(plan) = &self.plan else {
            return;
        };
        let Some(action) = plan.get(self.step) else {
            return;
        };
        if let Some(next) = action.apply(self.walker) {
            self.walker = next;
        }
        self.step += 1;
    }

    /// Sets the quit flag.
    fn quit(&mut self) {
        self.should_quit = true;
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let maze = match args.seed {
        Some(seed) => generate(seed, &GeneratorConfig::default())?,
        None => {
            let path = args.map.unwrap_or(PathBuf::from("maps/maze01.txt"));
            let layout = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read maze file {}", path.display()))?;
            Maze::parse(&layout)?
        }
    };

    // Set up the terminal
    let mut terminal = setup_terminal()?;

    // Create the application state
    let mut app = App::new(maze, args.no_heuristic);

    // Run the main application loop
    run_app(&mut terminal, &mut app)?;

    // Restore the terminal state
    restore_terminal(&mut terminal)?;

    Ok(())
}

/// Configures the terminal for TUI interaction.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(Into::into)
}

/// Restores the terminal to its original state.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Runs the main loop of the TUI application.
fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if crossterm::event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => app.quit(),
                    _ => {}
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

/// Renders the user interface.
fn ui(frame: &mut Frame, app: &App) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(75), // Area for the maze
            Constraint::Percentage(25), // Area for plan/status
        ])
        .split(frame.area());

    render_maze(frame, main_layout[0], app);
    render_status(frame, main_layout[1], app);
}

/// Renders the maze with the walker overlaid.
fn render_maze(frame: &mut Frame, area: Rect, app: &App) {
    let maze = &app.maze;
    let mut lines: Vec<Line> = Vec::with_capacity(maze.height());

    for y in 0..maze.height() {
        let mut spans: Vec<Span> = Vec::with_capacity(maze.width());
        for x in 0..maze.width() {
            let position = Position::new(x, y);
            if position == app.walker {
                spans.push(Span::styled("@", Style::default().fg(Color::Red).bold()));
                continue;
            }
            let span = match maze.terrain_at(position) {
                Some(Terrain::Wall) => Span::styled("#", Style::default().fg(Color::DarkGray)),
                Some(Terrain::Mud) => Span::styled("m", Style::default().fg(Color::Yellow)),
                Some(Terrain::Key) => Span::styled("k", Style::default().fg(Color::Cyan)),
                Some(Terrain::Goal) => Span::styled("g", Style::default().fg(Color::Green)),
                Some(Terrain::Initial) => Span::styled("+", Style::default().fg(Color::Blue)),
                _ => Span::raw(" "),
            };
            spans.push(span);
        }
        lines.push(Line::from(spans));
    }

    let maze_paragraph = Paragraph::new(lines)
        .block(Block::default().title("Keymaze").borders(Borders::ALL))
        .alignment(Alignment::Center);

    frame.render_widget(maze_paragraph, area);
}

/// Renders the plan, its validated cost, and the walk progress.
fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    let mut lines: Vec<Line> = Vec::new();
    match (&app.plan, &app.verdict) {
        (Some(plan), Some(verdict)) => {
            lines.push(Line::from(format!(
                "Plan: {}  (validated cost {})",
                render_actions(plan),
                verdict.cost
            )));
            let progress = if app.step >= plan.len() {
                "Goal reached.".to_string()
            } else {
                format!("Step {}/{}", app.step, plan.len())
            };
            lines.push(Line::from(progress));
        }
        _ => {
            lines.push(Line::from(Span::styled(
                "No solution exists for this maze.",
                Style::default().fg(Color::Red),
            )));
        }
    }
    lines.push(Line::from("Press 'q' or 'Esc' to quit."));

    let status_widget = Paragraph::new(lines)
        .block(Block::default().title("Status").borders(Borders::ALL))
        .alignment(Alignment::Left);
    frame.render_widget(status_widget, area);
}
