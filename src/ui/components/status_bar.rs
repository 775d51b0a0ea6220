use crate::app::App;
use crate::ui::format::spinner;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let last_refresh = match app.last_refresh {
        Some(at) => at.format(&app.date_format).to_string(),
        None => "never".to_string(),
    };
    let auto_refresh = if app.refresh_interval.is_zero() {
        "off".to_string()
    } else {
        format!("{}s", app.refresh_interval.as_secs())
    };

    let mut spans = vec![
        Span::raw(format!("Last refresh: {} | ", last_refresh)),
        Span::raw(format!("Auto: {} | ", auto_refresh)),
    ];

    let loading = app.loading_count();
    if loading > 0 {
        spans.push(Span::styled(
            format!("{} Loading {} | ", spinner(app.spinner_frame), loading),
            Style::default().fg(Color::Yellow),
        ));
    }

    let errors = app.error_count();
    if errors > 0 {
        spans.push(Span::styled(
            format!("Errors: {} | ", errors),
            Style::default().fg(Color::Red),
        ));
    }

    spans.push(Span::styled(
        "?: help | q: quit | ←/→: project | Tab: section | Enter: open | r: refresh",
        Style::default().fg(Color::DarkGray),
    ));

    let paragraph = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default());

    f.render_widget(paragraph, area);
}
