use crate::app::App;
use crate::refresh::ResourceKind;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use super::components;

pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Project tabs
            Constraint::Min(6),    // Resource sections
            Constraint::Length(3), // Status bar
        ])
        .split(f.area());

    components::header::render(f, app, chunks[0]);

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(chunks[1]);
    for (kind, area) in ResourceKind::ALL.into_iter().zip(sections.iter()) {
        components::section::render(f, app, *area, kind);
    }

    components::status_bar::render(f, app, chunks[2]);

    if app.show_help {
        components::help::render(f, f.area());
    }
}
