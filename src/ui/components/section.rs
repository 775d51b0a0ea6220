use crate::app::{App, ResourceState};
use crate::refresh::{ResourceData, ResourceKind};
use crate::ui::format::spinner;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Table, TableState, Wrap},
    Frame,
};

use super::{build_table, pull_request_table, release_table};

/// One stacked section. The focused section carries the row selection.
pub fn render(f: &mut Frame, app: &App, area: Rect, kind: ResourceKind) {
    let focused = kind == app.active_kind;
    let state = app.section_state(kind);

    let mut title = format!(" {} ({}) ", kind.label(), state.map_or(0, ResourceState::len));
    if state.is_some_and(ResourceState::is_loading) {
        title.push_str(spinner(app.spinner_frame));
        title.push(' ');
    }
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title);

    let Some(state) = state else {
        f.render_widget(block, area);
        return;
    };

    let inner = block.inner(area);
    f.render_widget(block, area);

    let table_area = match (state.visible_error(), &state.data) {
        (Some(err), None) => {
            f.render_widget(error_paragraph(&err.to_string()), inner);
            return;
        }
        (Some(err), Some(_)) => {
            let parts = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(1), Constraint::Min(1)])
                .split(inner);
            f.render_widget(error_paragraph(&err.to_string()), parts[0]);
            parts[1]
        }
        (None, _) => inner,
    };

    let data = match &state.data {
        Some(data) if !data.is_empty() => data,
        Some(_) => {
            let empty = Paragraph::new(format!("No {} found", kind.label().to_lowercase()))
                .style(Style::default().fg(Color::Gray));
            f.render_widget(empty, table_area);
            return;
        }
        None => {
            let message = if state.is_loading() {
                format!("{} Loading...", spinner(app.spinner_frame))
            } else {
                String::new()
            };
            f.render_widget(
                Paragraph::new(message).style(Style::default().fg(Color::Yellow)),
                table_area,
            );
            return;
        }
    };

    let table = match data {
        ResourceData::Builds(builds) => build_table::table(builds, &app.date_format),
        ResourceData::Releases(releases) => release_table::table(releases, &app.date_format),
        ResourceData::PullRequests(prs) => pull_request_table::table(prs),
    };
    let table = styled(table);

    let mut table_state = TableState::default();
    if focused {
        table_state.select(Some(app.selected_row));
    }
    f.render_stateful_widget(table, table_area, &mut table_state);
}

fn styled(table: Table<'_>) -> Table<'_> {
    table
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ")
}

fn error_paragraph(message: &str) -> Paragraph<'static> {
    Paragraph::new(Line::from(vec![
        Span::styled("Error: ", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
        Span::styled(message.to_string(), Style::default().fg(Color::Red)),
    ]))
    .wrap(Wrap { trim: true })
}
