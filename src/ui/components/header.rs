use crate::app::App;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Tabs},
    Frame,
};

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if app.projects.is_empty() {
        let block = Block::default().borders(Borders::ALL).title("Projects");
        f.render_widget(block, area);
        return;
    }

    let titles: Vec<Line> = app
        .projects
        .iter()
        .map(|project| Line::from(project.as_str()))
        .collect();

    let title = format!(
        "Projects ({}/{})",
        app.active_project + 1,
        app.projects.len()
    );

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title(title))
        .select(app.active_project)
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    f.render_widget(tabs, area);
}
