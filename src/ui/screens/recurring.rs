use chrono::Local;
use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::session::State;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, format_timestamp, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App, state: &State) {
    let title = format!(" Gastos Recurrentes ({}) ", state.recurring.len());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border_style())
        .title(Span::styled(title, theme::title_style()));

    if state.recurring.is_empty() {
        let msg = vec![
            Line::from(""),
            Line::from(Span::styled(
                "No hay gastos recurrentes",
                theme::dim_style(),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Presiona a para crear uno (luz, agua, internet...)",
                theme::dim_style(),
            )),
        ];
        f.render_widget(Paragraph::new(msg).centered().block(block), area);
        return;
    }

    let now = Local::now();
    let header_cells = ["Nombre", "Etiqueta", "Monto", "Último aplicado", "Estado"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = state
        .recurring
        .iter()
        .enumerate()
        .skip(app.recurring_scroll)
        .take(app.visible_rows)
        .map(|(i, recurring)| {
            let style = if i == app.recurring_index {
                theme::selected_style()
            } else if i % 2 == 0 {
                theme::normal_style()
            } else {
                theme::alt_row_style()
            };
            let last = recurring
                .last_applied_at
                .as_ref()
                .map(format_timestamp)
                .unwrap_or_else(|| "Nunca".to_string());
            let status = if recurring.can_apply_at(&now) {
                Cell::from("Disponible").style(theme::available_style())
            } else {
                Cell::from("Aplicado este mes").style(theme::dim_style())
            };
            Row::new(vec![
                Cell::from(truncate(&recurring.name, 30)),
                Cell::from(truncate(&recurring.tag, 20)),
                Cell::from(format_amount(recurring.amount)),
                Cell::from(last),
                status,
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Min(16),
        Constraint::Length(20),
        Constraint::Length(14),
        Constraint::Length(18),
        Constraint::Length(18),
    ];

    let table = Table::new(rows, widths).header(header).block(block);
    f.render_widget(table, area);
}
