use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect) {
    // Calculate the popup area (centered)
    let popup_area = centered_rect(60, 70, area);

    // Clear the background
    f.render_widget(Clear, popup_area);

    // Create the help content
    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Controls",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from(vec![
            Span::styled("q", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw(" or "),
            Span::styled("Ctrl+C", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw(" - Quit the application"),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("?", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw(" - Show/hide this help"),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Navigation:",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )]),
        key_line("←/→", "h/l", "Previous / next project"),
        key_line("↑/↓", "k/j", "Move selection"),
        key_line("Tab", "Shift+Tab", "Next / previous section"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Actions:",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("Enter", Style::default().fg(Color::Cyan)),
            Span::raw(" - Open selected item in the browser"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("r", Style::default().fg(Color::Cyan)),
            Span::raw(" - Refresh all projects"),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Status Indicators:",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("✓", Style::default().fg(Color::Green)),
            Span::raw(" succeeded  "),
            Span::styled("✗", Style::default().fg(Color::Red)),
            Span::raw(" failed  "),
            Span::styled("●", Style::default().fg(Color::Yellow)),
            Span::raw(" running  "),
            Span::styled("○", Style::default().fg(Color::Blue)),
            Span::raw(" queued  "),
            Span::styled("◐", Style::default().fg(Color::LightYellow)),
            Span::raw(" partial"),
        ]),
        Line::from(vec![
            Span::raw("  Reviews: approved/total, "),
            Span::styled("✗n", Style::default().fg(Color::Red)),
            Span::raw(" rejections, ○n waiting for author"),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press Esc, ? or q to close",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )]),
    ];

    let paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(" Help ")
                .title_alignment(Alignment::Center),
        )
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Left);

    f.render_widget(paragraph, popup_area);
}

fn key_line(primary: &'static str, alternate: &'static str, description: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(primary, Style::default().fg(Color::Cyan)),
        Span::raw(" or "),
        Span::styled(alternate, Style::default().fg(Color::Cyan)),
        Span::raw(format!(" - {}", description)),
    ])
}

/// Rectangle of the given percentage size, centred in `r`.
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_is_inside_and_centred() {
        let area = Rect::new(0, 0, 100, 50);
        let popup = centered_rect(60, 70, area);

        assert_eq!(popup.width, 60);
        assert_eq!(popup.height, 35);
        assert_eq!(popup.x, 20);
        assert!(popup.y + popup.height <= area.height);
    }
}
