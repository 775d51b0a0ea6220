use crate::azure::PullRequest;
use crate::ui::format::{status_color, status_symbol, truncate};
use ratatui::{
    layout::Constraint,
    style::{Color, Modifier, Style},
    widgets::{Cell, Row, Table},
};

pub fn table(pull_requests: &[PullRequest]) -> Table<'_> {
    let rows: Vec<Row> = pull_requests
        .iter()
        .map(|pr| {
            let status = pr.status_display();
            let reviewers = pr.reviewer_summary();
            let reviewer_color = if pr.has_rejections() {
                Color::Red
            } else if pr.is_approved() {
                Color::Green
            } else {
                Color::Gray
            };

            Row::new(vec![
                Cell::from(format!("!{}", pr.pull_request_id)),
                Cell::from(truncate(&pr.title, 50)),
                Cell::from(truncate(&pr.repository.name, 20)),
                Cell::from(truncate(&pr.branch_summary(), 40)),
                Cell::from(truncate(&pr.created_by.display_name, 20)),
                Cell::from(reviewers.to_string()).style(Style::default().fg(reviewer_color)),
                Cell::from(format!("{} {}", status_symbol(status), status))
                    .style(Style::default().fg(status_color(status))),
            ])
        })
        .collect();

    Table::new(
        rows,
        [
            Constraint::Length(7),
            Constraint::Percentage(30),
            Constraint::Percentage(12),
            Constraint::Percentage(22),
            Constraint::Percentage(12),
            Constraint::Length(10),
            Constraint::Length(12),
        ],
    )
    .header(
        Row::new(vec![
            "ID",
            "Title",
            "Repository",
            "Branches",
            "Author",
            "Reviews",
            "Status",
        ])
        .style(Style::default().add_modifier(Modifier::BOLD)),
    )
}
