use crate::{
    display::{DisplayFields, DisplayUpdate},
    session::Session,
    state::ButtonLabel,
};
use chrono::Utc;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::{io, time::Duration};
use tokio::sync::mpsc;
use vitalsim_protocol::Severity;

pub(super) async fn run(
    mut session: Session,
    mut rx: mpsc::Receiver<DisplayUpdate>,
) -> Result<(), io::Error> {
    let mut fields = DisplayFields::default();

    let mut terminal = ratatui::init();

    let result = loop {
        let button = session.emergency().button();

        if let Err(e) = terminal.draw(|f| render(f, &fields, button)) {
            break Err(e);
        }

        // Handle keyboard input
        match poll_key() {
            Ok(Some(KeyCode::Char('q') | KeyCode::Esc)) => break Ok(()),
            Ok(Some(KeyCode::Char(' ') | KeyCode::Char('e') | KeyCode::Enter)) => {
                session.toggle();
            }
            Ok(_) => {}
            Err(e) => break Err(e),
        }

        // Handle new readings
        while let Ok(update) = rx.try_recv() {
            fields.apply(update);
        }
    };

    ratatui::restore();

    session.shutdown().await;

    result
}

fn poll_key() -> Result<Option<KeyCode>, io::Error> {
    if event::poll(Duration::from_millis(100))? {
        if let Event::Key(key) = event::read()? {
            // Some platforms also report releases, which would toggle twice
            if key.kind == KeyEventKind::Press {
                return Ok(Some(key.code));
            }
        }
    }

    Ok(None)
}

fn render(f: &mut Frame, fields: &DisplayFields, button: ButtonLabel) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(1),
            ]
            .as_ref(),
        )
        .split(f.area());

    let value_style = Style::default().add_modifier(Modifier::BOLD);

    f.render_widget(
        Paragraph::new(fields.heart_rate.as_str())
            .style(value_style)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Heart Rate")),
        chunks[0],
    );

    f.render_widget(
        Paragraph::new(fields.spo2.as_str())
            .style(value_style)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Oxygen Saturation")),
        chunks[1],
    );

    let status_style = match fields.severity {
        Some(Severity::Critical) => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        Some(Severity::Normal) => Style::default().fg(Color::Green),
        None => Style::default(),
    };

    f.render_widget(
        Paragraph::new(fields.status())
            .style(status_style)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Status")),
        chunks[2],
    );

    f.render_widget(
        Paragraph::new(button.text)
            .style(
                Style::default()
                    .fg(Color::White)
                    .bg(button.colour)
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL)),
        chunks[3],
    );

    let age = match fields.age(Utc::now()) {
        Some(seconds) => format!("Last updated {seconds}s ago"),
        None => "Waiting for first reading".to_string(),
    };

    f.render_widget(
        Paragraph::new(format!("{age}  |  space: toggle emergency  q: quit"))
            .style(Style::default().fg(Color::Yellow)),
        chunks[4],
    );
}
