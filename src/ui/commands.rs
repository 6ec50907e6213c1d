use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::NaiveDate;

use super::app::{Action, App, Screen};
use crate::export;
use crate::session::State;
use crate::summary::{self, Period, PeriodFilter};

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &State) -> anyhow::Result<Option<Action>>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Salir", cmd_quit, r);
    register_command!("quit", "Salir", cmd_quit, r);
    register_command!("help", "Mostrar la ayuda", cmd_help, r);
    register_command!("h", "Mostrar la ayuda", cmd_help, r);
    register_command!(
        "periodo",
        "Cambiar período (e.g. :periodo semana)",
        cmd_periodo,
        r
    );
    register_command!("p", "Cambiar período (e.g. :p mes)", cmd_periodo, r);
    register_command!(
        "rango",
        "Rango personalizado (e.g. :rango 2024-01-01 2024-01-31)",
        cmd_rango,
        r
    );
    register_command!("sync", "Sincronizar con el servidor", cmd_sync, r);
    register_command!("logout", "Cerrar sesión", cmd_logout, r);
    register_command!(
        "export",
        "Exportar gastos del período a CSV (e.g. :export ~/gastos.csv)",
        cmd_export,
        r
    );
    register_command!("gastos", "Ir a Gastos", cmd_gastos, r);
    register_command!("g", "Ir a Gastos", cmd_gastos, r);
    register_command!("recurrentes", "Ir a Recurrentes", cmd_recurrentes, r);
    register_command!("rec", "Ir a Recurrentes", cmd_recurrentes, r);

    r
});

pub(crate) fn handle_command(
    input: &str,
    app: &mut App,
    state: &State,
) -> anyhow::Result<Option<Action>> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if cmd_name.is_empty() {
        return Ok(None);
    }

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, state)
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Comando desconocido: :{cmd_name}. ¿Quisiste decir :{suggestion}?"
        ));
        Ok(None)
    }
}

pub(crate) fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1)
        .min_by_key(|k| (levenshtein(input, k), **k))
        .unwrap_or(&"help")
        .to_string()
}

pub(crate) fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _state: &State) -> anyhow::Result<Option<Action>> {
    app.running = false;
    Ok(None)
}

fn cmd_help(_args: &str, app: &mut App, _state: &State) -> anyhow::Result<Option<Action>> {
    app.show_help = true;
    Ok(None)
}

fn cmd_periodo(args: &str, app: &mut App, state: &State) -> anyhow::Result<Option<Action>> {
    if args.is_empty() {
        let names: Vec<&str> = Period::all().iter().map(|p| p.as_str()).collect();
        app.set_status(format!(
            "Período: {}. Opciones: {}",
            app.filter.describe(app.today),
            names.join(", ")
        ));
        return Ok(None);
    }

    match Period::parse(args) {
        Some(period) => {
            app.filter.period = period;
            app.expense_index = 0;
            app.expense_scroll = 0;
            app.clamp_selection(state);
            app.set_status(format!("Período: {}", app.filter.describe(app.today)));
        }
        None => app.set_status(format!("Período desconocido: {args}")),
    }
    Ok(None)
}

fn cmd_rango(args: &str, app: &mut App, state: &State) -> anyhow::Result<Option<Action>> {
    let parts: Vec<&str> = args.split_whitespace().collect();
    let (start, end) = match parts.as_slice() {
        [] => (None, None),
        [start, end] => match (parse_date(start), parse_date(end)) {
            (Some(s), Some(e)) => (Some(s), Some(e)),
            _ => {
                app.set_status("Fechas inválidas. Usa AAAA-MM-DD");
                return Ok(None);
            }
        },
        _ => {
            app.set_status("Uso: :rango <desde> <hasta>  (sin argumentos muestra todo)");
            return Ok(None);
        }
    };

    app.filter = PeriodFilter::custom(start, end);
    app.expense_index = 0;
    app.expense_scroll = 0;
    app.clamp_selection(state);
    app.set_status(format!("Período: {}", app.filter.describe(app.today)));
    Ok(None)
}

fn cmd_sync(_args: &str, _app: &mut App, _state: &State) -> anyhow::Result<Option<Action>> {
    Ok(Some(Action::Sync))
}

fn cmd_logout(_args: &str, _app: &mut App, _state: &State) -> anyhow::Result<Option<Action>> {
    Ok(Some(Action::Logout))
}

fn cmd_export(args: &str, app: &mut App, state: &State) -> anyhow::Result<Option<Action>> {
    let path = if args.is_empty() {
        export::default_export_path(&app.filter, app.today)
    } else {
        export::shellexpand(args).into()
    };

    let visible = summary::summarize(&state.expenses, &app.filter, app.today);
    let count = export::export_csv(&path, &visible.expenses)?;
    if count == 0 {
        app.set_status(format!("Sin gastos en el período. Archivo vacío: {}", path.display()));
    } else {
        app.set_status(format!("Exportados {count} gastos a {}", path.display()));
    }
    Ok(None)
}

fn cmd_gastos(_args: &str, app: &mut App, _state: &State) -> anyhow::Result<Option<Action>> {
    app.screen = Screen::Expenses;
    Ok(None)
}

fn cmd_recurrentes(_args: &str, app: &mut App, _state: &State) -> anyhow::Result<Option<Action>> {
    app.screen = Screen::Recurring;
    Ok(None)
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}
