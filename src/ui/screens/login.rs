use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::form::render_field;
use crate::session::{AuthMode, State};
use crate::ui::app::App;
use crate::ui::render::{centered, render_error_banner};
use crate::ui::theme;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App, state: &State) {
    if let Some(error) = &state.error {
        render_error_banner(f, Rect::new(area.x, area.y, area.width, 1.min(area.height)), error);
    }

    let fields = app.auth_fields();
    let focused = app.focused_auth_field();
    let height = fields.len() as u16 * 2 + 7;
    let popup = centered(area, 56, height);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::ACCENT))
        .title(Span::styled(
            format!(" {} ", app.auth_mode.title()),
            theme::section_style(),
        ));
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let mut constraints = vec![Constraint::Length(2)]; // subtitle
    constraints.extend(fields.iter().map(|_| Constraint::Length(2)));
    constraints.push(Constraint::Length(1)); // auth error
    constraints.push(Constraint::Min(1)); // hints
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    let subtitle = match app.auth_mode {
        AuthMode::Login => " Ingresa para ver tus gastos",
        AuthMode::Register => " Registra una cuenta nueva",
    };
    f.render_widget(
        Paragraph::new(Span::styled(subtitle, theme::dim_style())),
        rows[0],
    );

    for (i, &field) in fields.iter().enumerate() {
        let value = app.auth_value(field);
        render_field(f, rows[i + 1], field, value, field == focused, "");
    }

    let error_row = rows[fields.len() + 1];
    if let Some(err) = &state.auth_error {
        f.render_widget(
            Paragraph::new(Span::styled(format!(" {err}"), Style::default().fg(theme::RED))),
            error_row,
        );
    }

    let toggle = match app.auth_mode {
        AuthMode::Login => "¿No tienes cuenta? Ctrl-t para registrarte",
        AuthMode::Register => "¿Ya tienes cuenta? Ctrl-t para iniciar sesión",
    };
    let hints = Paragraph::new(vec![
        Line::from(Span::styled(
            " Tab cambiar campo · Enter continuar · Esc salir",
            theme::dim_style(),
        )),
        Line::from(Span::styled(format!(" {toggle}"), theme::dim_style())),
    ]);
    f.render_widget(hints, rows[fields.len() + 2]);
}
