use std::{io, path::Path, sync::Arc, time::Duration};

use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use eyre::{Context, Result};
use futures::StreamExt;
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
};
use tokio::{
    select,
    time::{MissedTickBehavior, interval},
};

use crate::{
    controller::{Controller, RelayState},
    device,
    settings::Settings,
};

pub async fn run(path: &Path) -> Result<()> {
    let settings = Settings::load(path).await?;
    let driver = device::from_settings(&settings)?;

    let has_power = driver.supports_power();
    let (controller, completions) = Controller::new(Arc::from(driver));

    enable_raw_mode().wrap_err("Failed to enable raw mode")?;
    execute!(io::stdout(), EnterAlternateScreen).wrap_err("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend).wrap_err("Failed to create terminal")?;

    let interval_secs = settings.poll_interval_secs.max(1);
    let result = event_loop(&mut terminal, controller, completions, interval_secs, has_power).await;

    disable_raw_mode().wrap_err("Failed to disable raw mode")?;
    execute!(io::stdout(), LeaveAlternateScreen).wrap_err("Failed to leave alternate screen")?;

    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut controller: Controller,
    mut completions: tokio::sync::mpsc::Receiver<crate::controller::Completion>,
    interval_secs: u64,
    has_power: bool,
) -> Result<()> {
    let mut events = EventStream::new();

    // The first tick fires immediately and issues the initial poll.
    let mut timer = interval(Duration::from_secs(interval_secs));
    timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        terminal
            .draw(|frame| render(frame, &controller, has_power))
            .wrap_err("Failed to draw frame")?;

        select! {
            _ = timer.tick() => controller.tick(),

            Some(completion) = completions.recv() => controller.apply(completion),

            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if handle_key(&mut controller, key.code, key.modifiers) {
                        return Ok(());
                    }
                }

                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e).wrap_err("Terminal event error"),
                None => return Ok(()),
            },
        }
    }
}

/// Returns true when the view should close.
fn handle_key(controller: &mut Controller, code: KeyCode, modifiers: KeyModifiers) -> bool {
    match (code, modifiers) {
        (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => return true,
        (KeyCode::Char('q') | KeyCode::Esc, _) => return true,

        (KeyCode::Char(' ') | KeyCode::Enter, _) => controller.tap(),

        (KeyCode::Char('r'), _) => {
            if controller.state() != RelayState::Changing {
                controller.poll();
            }
        }

        _ => {}
    }

    false
}

fn render(frame: &mut Frame, controller: &Controller, has_power: bool) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let (label, colour) = state_appearance(controller.state());

    let state = Paragraph::new(label)
        .style(Style::default().fg(colour))
        .centered()
        .block(Block::default().borders(Borders::ALL).title("relay"));

    frame.render_widget(state, chunks[0]);

    if has_power {
        let power = Paragraph::new(Line::from(format!("power: {}", controller.power()))).centered();
        frame.render_widget(power, chunks[1]);
    }

    let help = Paragraph::new("space: toggle  ·  r: refresh  ·  q: quit")
        .style(Style::default().fg(Color::DarkGray));

    frame.render_widget(help, chunks[3]);
}

fn state_appearance(state: RelayState) -> (&'static str, Color) {
    match state {
        RelayState::Unknown => ("-", Color::DarkGray),
        RelayState::Loading => ("connecting...", Color::Gray),
        RelayState::Failed => ("error", Color::Red),
        RelayState::On => ("on", Color::Green),
        RelayState::Off => ("off", Color::Red),
        RelayState::Changing => ("switching...", Color::Gray),
    }
}
