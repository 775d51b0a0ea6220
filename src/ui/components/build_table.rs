use crate::azure::Build;
use crate::ui::format::{format_duration, format_timestamp, status_color, status_symbol, truncate};
use ratatui::{
    layout::Constraint,
    style::{Modifier, Style},
    widgets::{Cell, Row, Table},
};

pub fn table<'a>(builds: &'a [Build], date_format: &str) -> Table<'a> {
    let rows: Vec<Row> = builds
        .iter()
        .map(|build| {
            let status = build.status_text();
            let color = status_color(status);
            Row::new(vec![
                Cell::from(truncate(&build.definition.name, 30)),
                Cell::from(build.build_number.clone()),
                Cell::from(truncate(build.branch_name(), 30)),
                Cell::from(format!("{} {}", status_symbol(status), status))
                    .style(Style::default().fg(color)),
                Cell::from(format_duration(build.duration())),
                Cell::from(format_timestamp(build.queue_time, date_format)),
                Cell::from(truncate(&build.requested_for.display_name, 20)),
            ])
        })
        .collect();

    Table::new(
        rows,
        [
            Constraint::Percentage(20),
            Constraint::Percentage(12),
            Constraint::Percentage(18),
            Constraint::Percentage(14),
            Constraint::Percentage(8),
            Constraint::Percentage(14),
            Constraint::Percentage(14),
        ],
    )
    .header(
        Row::new(vec![
            "Definition",
            "Number",
            "Branch",
            "Status",
            "Duration",
            "Queued",
            "Requested by",
        ])
        .style(Style::default().add_modifier(Modifier::BOLD)),
    )
}
