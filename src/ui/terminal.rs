use {
    super::{
        input::{Command, InputState},
        layout::render_layout,
    },
    crate::{app::App, error::FeeWatchResult},
    crossterm::event::{Event, EventStream, KeyEventKind},
    futures_util::StreamExt,
    ratatui::{backend::CrosstermBackend, Terminal},
    std::{io::Stdout, time::Duration},
};

/// Redraw cadence while nothing else happens, so live tabs keep moving
const REFRESH_INTERVAL: Duration = Duration::from_millis(500);

/// Run the TUI event loop until the operator quits
///
/// Keys, finished fetches and the redraw tick are multiplexed on the
/// caller's task.
pub async fn run_ui(app: &mut App) -> FeeWatchResult<()> {
    let stdout = std::io::stdout();
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    crossterm::terminal::enable_raw_mode()?;

    // Alternate screen keeps stderr logs off the table
    crossterm::execute!(
        std::io::stdout(),
        crossterm::terminal::EnterAlternateScreen,
        crossterm::cursor::Hide
    )?;
    terminal.clear()?;

    let result = event_loop(&mut terminal, app).await;

    // Restore the terminal even when the loop failed
    crossterm::execute!(
        std::io::stdout(),
        crossterm::terminal::LeaveAlternateScreen,
        crossterm::cursor::Show
    )?;
    crossterm::terminal::disable_raw_mode()?;

    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> FeeWatchResult<()> {
    let mut events = EventStream::new();
    let mut input = InputState::default();
    let mut refresh = tokio::time::interval(REFRESH_INTERVAL);

    loop {
        let snapshot = app.snapshot().await;
        terminal.draw(|f| render_layout(f, &snapshot, &input))?;

        tokio::select! {
            Some(completion) = app.next_completion() => {
                app.apply_completion(completion);
            }
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    match input.handle_key(key, snapshot.tab, snapshot.page_size) {
                        Command::Quit => break,
                        Command::Dispatch(action) => app.dispatch(action),
                        Command::Nothing => {}
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
            _ = refresh.tick() => {}
        }
    }

    Ok(())
}
