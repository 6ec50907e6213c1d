use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use super::app::{App, InputMode, Screen};
use super::commands;
use super::theme;
use crate::session::State;
use crate::summary;

pub(crate) fn render(f: &mut Frame, app: &App, state: &State) {
    if state.initializing {
        render_splash(f, f.area(), "Cargando sesión...");
        return;
    }
    if !state.is_authenticated() {
        super::screens::login::render(f, f.area(), app, state);
        return;
    }

    let error_height = u16::from(state.error.is_some());
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),            // Tab bar
            Constraint::Length(error_height), // Error banner
            Constraint::Min(5),               // Main content
            Constraint::Length(1),            // Status bar
            Constraint::Length(1),            // Command bar
        ])
        .split(f.area());

    render_tab_bar(f, chunks[0], app, state);
    if let Some(error) = &state.error {
        render_error_banner(f, chunks[1], error);
    }
    render_screen(f, chunks[2], app, state);
    render_status_bar(f, chunks[3], app, state);
    render_command_bar(f, chunks[4], app);

    if app.input_mode == InputMode::Form {
        super::screens::form::render(f, f.area(), app, state);
    }
    if app.show_help {
        render_help_overlay(f, f.area());
    }
}

fn render_splash(f: &mut Frame, area: Rect, msg: &str) {
    let y = area.y + area.height / 2;
    let line = Rect::new(area.x, y, area.width, 1.min(area.height));
    f.render_widget(
        Paragraph::new(Span::styled(msg, theme::dim_style())).centered(),
        line,
    );
}

pub(crate) fn render_error_banner(f: &mut Frame, area: Rect, error: &str) {
    let banner = Paragraph::new(Line::from(vec![
        Span::styled(format!(" {error} "), theme::error_style()),
        Span::styled("  x para descartar", theme::dim_style()),
    ]));
    f.render_widget(banner, area);
}

fn render_tab_bar(f: &mut Frame, area: Rect, app: &App, state: &State) {
    let titles: Vec<Line> = Screen::all()
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let num = format!("{}", i + 1);
            if *s == app.screen {
                Line::from(vec![
                    Span::styled(format!("{num}:"), theme::dim_style()),
                    Span::styled(
                        format!("{s}"),
                        Style::default()
                            .fg(theme::ACCENT)
                            .add_modifier(Modifier::BOLD),
                    ),
                ])
            } else {
                Line::from(Span::styled(format!("{num}:{s}"), theme::dim_style()))
            }
        })
        .collect();

    let greeting = match &state.user {
        Some(user) => format!("Hola, {} ({}) ", user.name, user.email),
        None => String::new(),
    };
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(10),
            Constraint::Length(greeting.chars().count() as u16),
        ])
        .split(area);

    let tabs = Tabs::new(titles)
        .divider(Span::styled(" | ", Style::default().fg(theme::OVERLAY)))
        .style(Style::default().bg(theme::HEADER_BG));
    f.render_widget(tabs, halves[0]);
    f.render_widget(
        Paragraph::new(Span::styled(greeting, theme::header_style())),
        halves[1],
    );
}

fn render_screen(f: &mut Frame, area: Rect, app: &App, state: &State) {
    match app.screen {
        Screen::Expenses => super::screens::expenses::render(f, area, app, state),
        Screen::Recurring => super::screens::recurring::render(f, area, app, state),
    }
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App, state: &State) {
    let mode_label = format!(" {} ", app.input_mode);
    let mode_bg = match app.input_mode {
        InputMode::Normal => theme::ACCENT,
        InputMode::Command => theme::GREEN,
        InputMode::Form => theme::YELLOW,
        InputMode::Confirm => theme::RED,
    };
    let mode_style = Style::default()
        .fg(theme::HEADER_BG)
        .bg(mode_bg)
        .add_modifier(Modifier::BOLD);

    let info = match app.screen {
        Screen::Expenses => {
            let visible = summary::summarize(&state.expenses, &app.filter, app.today);
            format!(
                " {} | {} | {} gastos",
                app.screen,
                app.filter.describe(app.today),
                visible.expenses.len()
            )
        }
        Screen::Recurring => format!(" {} | {} plantillas", app.screen, state.recurring.len()),
    };

    let right = if state.syncing || app.sync_requested {
        " Sincronizando... "
    } else {
        match app.screen {
            Screen::Expenses => " a agregar | D borrar | [ ] período | ? ayuda ",
            Screen::Recurring => " a nuevo | A aplicar | D borrar | ? ayuda ",
        }
    };

    let available = area.width as usize;
    let used = mode_label.chars().count() + info.chars().count() + right.chars().count();
    let pad = available.saturating_sub(used);

    let bar = Paragraph::new(Line::from(vec![
        Span::styled(&mode_label, mode_style),
        Span::styled(&info, theme::status_bar_style()),
        Span::styled(" ".repeat(pad), theme::status_bar_style()),
        Span::styled(right, theme::status_bar_style()),
    ]));
    f.render_widget(bar, area);
}

fn render_command_bar(f: &mut Frame, area: Rect, app: &App) {
    let (content, cursor_offset) = match app.input_mode {
        InputMode::Command => (
            Line::from(vec![
                Span::styled(":", Style::default().fg(theme::ACCENT)),
                Span::styled(&app.command_input, theme::command_bar_style()),
            ]),
            Some(1 + app.command_input.chars().count() as u16),
        ),
        InputMode::Confirm => (
            Line::from(vec![
                Span::styled(&app.confirm_message, Style::default().fg(theme::YELLOW)),
                Span::styled(" [s/N] ", Style::default().fg(theme::RED)),
            ]),
            None,
        ),
        InputMode::Normal | InputMode::Form => (
            if app.status_message.is_empty() {
                Line::from(Span::styled(
                    " : comandos, r sincronizar, ? ayuda",
                    theme::dim_style(),
                ))
            } else {
                Line::from(Span::styled(
                    &app.status_message,
                    theme::command_bar_style(),
                ))
            },
            None,
        ),
    };

    let bar = Paragraph::new(content).style(Style::default().bg(theme::COMMAND_BG));
    f.render_widget(bar, area);

    if let Some(offset) = cursor_offset {
        f.set_cursor_position((area.x + offset, area.y));
    }
}

fn help_line(text: &str) -> Line<'_> {
    Line::from(Span::styled(text, theme::normal_style()))
}

fn render_help_overlay(f: &mut Frame, area: Rect) {
    let mut help_text = vec![
        Line::from(Span::styled(
            " Ayuda de Gastos ",
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(" Navegación", theme::section_style())),
        help_line("  j/k o ↑/↓       Mover cursor          1-2 / Tab  Cambiar pantalla"),
        help_line("  g/G             Inicio/Fin            [ / ]      Período anterior/siguiente"),
        help_line("  Ctrl-q          Salir"),
        Line::from(""),
        Line::from(Span::styled(" Acciones", theme::section_style())),
        help_line("  a               Agregar gasto o recurrente"),
        help_line("  A (Recurrentes) Aplicar al mes actual  D          Borrar seleccionado"),
        help_line("  r               Sincronizar           x          Descartar error"),
        help_line("  :               Modo comando          Esc        Cancelar"),
        help_line("  Tab (formulario) Siguiente campo / completar etiqueta"),
        Line::from(""),
        Line::from(Span::styled(" Comandos", theme::section_style())),
    ];

    let mut seen = std::collections::HashSet::new();
    let mut cmd_lines: Vec<(&str, &str)> = Vec::new();
    for (&name, cmd) in commands::COMMANDS.iter() {
        if name.len() <= 2 {
            continue;
        }
        if seen.insert(cmd.description) {
            cmd_lines.push((name, cmd.description));
        }
    }
    cmd_lines.sort_by_key(|(name, _)| *name);
    for (name, desc) in &cmd_lines {
        help_text.push(Line::from(Span::styled(
            format!("  :{name:<14} {desc}"),
            theme::normal_style(),
        )));
    }

    help_text.push(Line::from(""));
    help_text.push(Line::from(Span::styled(
        " Presiona cualquier tecla para cerrar ",
        theme::dim_style(),
    )));

    let popup_height = (help_text.len() as u16 + 2).min(area.height.saturating_sub(2));
    let popup_width = 80.min(area.width.saturating_sub(4));
    let popup_area = centered(area, popup_width, popup_height);

    f.render_widget(Clear, popup_area);
    let help = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT))
            .style(Style::default().bg(theme::HEADER_BG)),
    );
    f.render_widget(help, popup_area);
}

/// A `width` x `height` rectangle centered in `area`.
pub(crate) fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}
