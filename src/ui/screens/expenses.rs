use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Tabs},
    Frame,
};
use rust_decimal::Decimal;

use crate::session::State;
use crate::summary::{self, Period, Summary};
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App, state: &State) {
    let visible = summary::summarize(&state.expenses, &app.filter, app.today);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Period selector
            Constraint::Length(7), // Total + per-tag
            Constraint::Min(3),    // Expense list
        ])
        .split(area);

    render_period_tabs(f, chunks[0], app);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(chunks[1]);
    render_card(
        f,
        cards[0],
        "Total",
        visible.total,
        Some(format!("{} gastos", visible.expenses.len())),
    );
    render_by_tag(f, cards[1], &visible);

    render_list(f, chunks[2], app, &visible);
}

fn render_period_tabs(f: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<Line> = Period::all()
        .iter()
        .map(|p| {
            if *p == app.filter.period {
                Line::from(Span::styled(
                    p.as_str(),
                    Style::default()
                        .fg(theme::ACCENT)
                        .add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(Span::styled(p.as_str(), theme::dim_style()))
            }
        })
        .collect();

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(44), Constraint::Min(10)])
        .split(area);

    let tabs = Tabs::new(titles).divider(Span::styled(" | ", Style::default().fg(theme::OVERLAY)));
    f.render_widget(tabs, halves[0]);
    f.render_widget(
        Paragraph::new(Span::styled(app.filter.describe(app.today), theme::dim_style())),
        halves[1],
    );
}

fn render_card(f: &mut Frame, area: Rect, title: &str, amount: Decimal, subtitle: Option<String>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border_style())
        .title(Span::styled(format!(" {title} "), theme::title_style()));

    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(format_amount(amount), theme::amount_style())),
        Line::from(Span::styled(subtitle.unwrap_or_default(), theme::dim_style())),
    ])
    .centered()
    .block(block);

    f.render_widget(text, area);
}

fn render_by_tag(f: &mut Frame, area: Rect, visible: &Summary) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border_style())
        .title(Span::styled(" Por etiqueta ", theme::title_style()));

    let rows = area.height.saturating_sub(2) as usize;
    let width = area.width.saturating_sub(4) as usize;
    let mut lines: Vec<Line> = visible
        .by_tag
        .iter()
        .take(rows)
        .map(|(tag, amount)| {
            let amount = format_amount(*amount);
            let name_width = width.saturating_sub(amount.chars().count() + 1);
            Line::from(vec![
                Span::styled(
                    format!("{:<name_width$} ", truncate(tag, name_width)),
                    theme::normal_style(),
                ),
                Span::styled(amount, theme::amount_style()),
            ])
        })
        .collect();
    if visible.by_tag.len() > rows && rows > 0 {
        lines.truncate(rows - 1);
        lines.push(Line::from(Span::styled(
            format!("… y {} más", visible.by_tag.len() - (rows - 1)),
            theme::dim_style(),
        )));
    }

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_list(f: &mut Frame, area: Rect, app: &App, visible: &Summary) {
    let title = format!(" Gastos ({}) ", visible.expenses.len());

    if visible.expenses.is_empty() {
        let msg = vec![
            Line::from(""),
            Line::from(Span::styled("No hay gastos en este período", theme::dim_style())),
            Line::from(""),
            Line::from(Span::styled(
                "Presiona a para agregar uno",
                theme::dim_style(),
            )),
        ];
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_style())
            .title(Span::styled(title, theme::title_style()));
        f.render_widget(Paragraph::new(msg).centered().block(block), area);
        return;
    }

    let header_cells = ["Fecha", "Nombre", "Etiqueta", "Monto"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = visible
        .expenses
        .iter()
        .enumerate()
        .skip(app.expense_scroll)
        .take(app.visible_rows)
        .map(|(i, expense)| {
            let style = if i == app.expense_index {
                theme::selected_style()
            } else if i % 2 == 0 {
                theme::normal_style()
            } else {
                theme::alt_row_style()
            };
            Row::new(vec![
                Cell::from(expense.date.format("%Y-%m-%d").to_string()),
                Cell::from(truncate(&expense.name, 40)),
                Cell::from(truncate(&expense.tag, 20)),
                Cell::from(format_amount(expense.amount)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Min(20),
        Constraint::Length(20),
        Constraint::Length(14),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_style())
            .title(Span::styled(title, theme::title_style())),
    );

    f.render_widget(table, area);
}
