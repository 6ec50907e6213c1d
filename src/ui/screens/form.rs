use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::session::State;
use crate::summary;
use crate::ui::app::{App, Field};
use crate::ui::render::centered;
use crate::ui::theme;

/// The "Agregar Gasto" / "Nuevo Gasto Recurrente" popup.
pub(crate) fn render(f: &mut Frame, area: Rect, app: &App, state: &State) {
    let fields = app.form_fields();
    let focused = app.focused_form_field();
    let height = fields.len() as u16 * 2 + 6;
    let popup = centered(area, 60, height);

    f.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::ACCENT))
        .title(Span::styled(format!(" {} ", app.form_title()), theme::title_style()))
        .style(Style::default().bg(theme::HEADER_BG));
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let mut constraints: Vec<Constraint> = fields.iter().map(|_| Constraint::Length(2)).collect();
    constraints.push(Constraint::Length(1)); // tag suggestions
    constraints.push(Constraint::Min(1)); // hints
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (i, &field) in fields.iter().enumerate() {
        let value = app.form_value(field);
        render_field(f, rows[i], field, value, field == focused, field.placeholder(app.screen));
    }

    let tags = summary::available_tags(&state.expenses, &state.recurring);
    let suggestions = if tags.is_empty() {
        String::new()
    } else {
        format!(" Etiquetas: {}", tags.join(", "))
    };
    f.render_widget(
        Paragraph::new(Span::styled(suggestions, theme::dim_style())),
        rows[fields.len()],
    );
    f.render_widget(
        Paragraph::new(Span::styled(
            " Tab siguiente · Enter guardar · Esc cancelar",
            theme::dim_style(),
        )),
        rows[fields.len() + 1],
    );
}

/// One `Label: value` row. Passwords are masked; empty values show the placeholder.
pub(crate) fn render_field(
    f: &mut Frame,
    area: Rect,
    field: Field,
    value: &str,
    focused: bool,
    placeholder: &str,
) {
    let label = format!(" {:<11}", field.label());
    let shown = if field == Field::Password {
        "•".repeat(value.chars().count())
    } else {
        value.to_string()
    };
    let value_span = if shown.is_empty() && !focused {
        Span::styled(placeholder.to_string(), theme::dim_style())
    } else {
        Span::styled(shown.clone(), theme::field_style(focused))
    };
    let line = Line::from(vec![
        Span::styled(
            label.clone(),
            if focused {
                theme::section_style()
            } else {
                theme::normal_style()
            },
        ),
        value_span,
    ]);
    f.render_widget(Paragraph::new(line), area);

    if focused {
        let x = area.x + (label.chars().count() + shown.chars().count()) as u16;
        f.set_cursor_position((x.min(area.right().saturating_sub(1)), area.y));
    }
}
