use crate::azure::Release;
use crate::ui::format::{format_timestamp, status_color, status_symbol, truncate};
use ratatui::{
    layout::Constraint,
    style::{Modifier, Style},
    widgets::{Cell, Row, Table},
};

pub fn table<'a>(releases: &'a [Release], date_format: &str) -> Table<'a> {
    let rows: Vec<Row> = releases
        .iter()
        .map(|release| {
            let overall = release.overall_status();
            let status = overall.as_str();
            Row::new(vec![
                Cell::from(format!("{} {}", status_symbol(status), status))
                    .style(Style::default().fg(status_color(status))),
                Cell::from(truncate(&release.name, 25)),
                Cell::from(truncate(&release.release_definition.name, 25)),
                Cell::from(truncate(&release.environment_summary(), 60)),
                Cell::from(format_timestamp(release.created_on, date_format)),
            ])
        })
        .collect();

    Table::new(
        rows,
        [
            Constraint::Percentage(14),
            Constraint::Percentage(16),
            Constraint::Percentage(16),
            Constraint::Percentage(40),
            Constraint::Percentage(14),
        ],
    )
    .header(
        Row::new(vec!["Status", "Release", "Definition", "Environments", "Created"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
}
