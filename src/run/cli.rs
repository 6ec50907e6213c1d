use anyhow::Result;
use chrono::{Local, NaiveDate};
use std::path::PathBuf;

use crate::api::ExpenseApi;
use crate::export;
use crate::session::{AuthForm, AuthMode, ExpenseForm, Outcome, Tracker};
use crate::summary::{self, Period, PeriodFilter};
use crate::ui::util::format_amount;

pub(crate) fn as_cli<A: ExpenseApi>(args: &[String], tracker: &mut Tracker<A>) -> Result<()> {
    match args[1].as_str() {
        "login" => cli_login(&args[2..], tracker),
        "register" => cli_register(&args[2..], tracker),
        "logout" => {
            tracker.logout();
            println!("Sesión cerrada");
            Ok(())
        }
        "whoami" => cli_whoami(tracker),
        "sync" => cli_sync(tracker),
        "summary" | "s" => cli_summary(&args[2..], tracker),
        "add" => cli_add(&args[2..], tracker),
        "export" => cli_export(&args[2..], tracker),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("gastos {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Comando desconocido: {other}");
        }
    }
}

fn print_usage() {
    println!("Gastos - cliente de terminal para tu registro de gastos");
    println!();
    println!("Uso: gastos [--api <url>] [comando]");
    println!();
    println!("Comandos:");
    println!("  (ninguno)                          Abre la interfaz interactiva");
    println!("  login <email> <contraseña>         Inicia sesión");
    println!("  register <nombre> <email> <contraseña>");
    println!("                                     Crea una cuenta");
    println!("  logout                             Cierra la sesión guardada");
    println!("  whoami                             Muestra el usuario actual");
    println!("  sync                               Descarga gastos y recurrentes");
    println!("  summary [periodo]                  Total y subtotales por etiqueta");
    println!("    --desde <AAAA-MM-DD>             Inicio del rango (periodo custom)");
    println!("    --hasta <AAAA-MM-DD>             Fin del rango (periodo custom)");
    println!("  add <nombre> <etiqueta> <monto> [AAAA-MM-DD]");
    println!("                                     Registra un gasto (fecha: hoy)");
    println!("  export [ruta]                      Exporta los gastos del período a CSV");
    println!("    --periodo <periodo>              dia, semana, mes, año o custom (por defecto: mes)");
    println!("  --help, -h                         Muestra esta ayuda");
    println!("  --version, -V                      Muestra la versión");
}

fn cli_login<A: ExpenseApi>(args: &[String], tracker: &mut Tracker<A>) -> Result<()> {
    let [email, password] = args else {
        anyhow::bail!("Uso: gastos login <email> <contraseña>");
    };
    let form = AuthForm {
        name: String::new(),
        email: email.clone(),
        password: password.clone(),
    };
    authenticate(AuthMode::Login, &form, tracker)
}

fn cli_register<A: ExpenseApi>(args: &[String], tracker: &mut Tracker<A>) -> Result<()> {
    let [name, email, password] = args else {
        anyhow::bail!("Uso: gastos register <nombre> <email> <contraseña>");
    };
    let form = AuthForm {
        name: name.clone(),
        email: email.clone(),
        password: password.clone(),
    };
    authenticate(AuthMode::Register, &form, tracker)
}

fn authenticate<A: ExpenseApi>(
    mode: AuthMode,
    form: &AuthForm,
    tracker: &mut Tracker<A>,
) -> Result<()> {
    if !tracker.submit_auth(mode, form) {
        let state = tracker.state();
        let msg = state
            .auth_error
            .as_deref()
            .or(state.error.as_deref())
            .unwrap_or("No se pudo iniciar sesión");
        anyhow::bail!("{msg}");
    }
    let state = tracker.state();
    if !state.is_authenticated() {
        anyhow::bail!(
            "{}",
            state.error.as_deref().unwrap_or("No se pudo iniciar sesión")
        );
    }
    if let Some(greeting) = state.greeting() {
        println!("{greeting}");
    }
    report_error(tracker);
    Ok(())
}

/// Resume the stored session or fail with a hint to log in.
fn require_session<A: ExpenseApi>(tracker: &mut Tracker<A>) -> Result<()> {
    tracker.bootstrap();
    let state = tracker.state();
    if state.is_authenticated() {
        return Ok(());
    }
    match &state.error {
        Some(msg) => anyhow::bail!("{msg}"),
        None => anyhow::bail!("No hay sesión activa. Usa: gastos login <email> <contraseña>"),
    }
}

fn report_error<A: ExpenseApi>(tracker: &Tracker<A>) {
    if let Some(msg) = &tracker.state().error {
        eprintln!("Aviso: {msg}");
    }
}

fn cli_whoami<A: ExpenseApi>(tracker: &mut Tracker<A>) -> Result<()> {
    require_session(tracker)?;
    if let Some(user) = &tracker.state().user {
        println!("{} <{}>", user.name, user.email);
    }
    Ok(())
}

fn cli_sync<A: ExpenseApi>(tracker: &mut Tracker<A>) -> Result<()> {
    require_session(tracker)?;
    let state = tracker.state();
    if let Some(msg) = &state.error {
        anyhow::bail!("{msg}");
    }
    println!(
        "{} gastos, {} gastos recurrentes",
        state.expenses.len(),
        state.recurring.len()
    );
    Ok(())
}

fn cli_summary<A: ExpenseApi>(args: &[String], tracker: &mut Tracker<A>) -> Result<()> {
    let today = Local::now().date_naive();
    let filter = parse_filter(args.first().filter(|a| !a.starts_with('-')), args)?;

    require_session(tracker)?;
    report_error(tracker);
    let state = tracker.state();
    let summary = summary::summarize(&state.expenses, &filter, today);

    if let Some(greeting) = state.greeting() {
        println!("{greeting}");
    }
    println!("{}", filter.describe(today));
    println!("{}", "─".repeat(40));
    println!("  Total:      {}", format_amount(summary.total));
    println!("  Gastos:     {}", summary.expenses.len());

    if !summary.by_tag.is_empty() {
        println!();
        println!("Por etiqueta:");
        for (tag, amount) in &summary.by_tag {
            println!("  {tag:<24} {}", format_amount(*amount));
        }
    }

    Ok(())
}

fn cli_add<A: ExpenseApi>(args: &[String], tracker: &mut Tracker<A>) -> Result<()> {
    if !(3..=4).contains(&args.len()) {
        anyhow::bail!("Uso: gastos add <nombre> <etiqueta> <monto> [AAAA-MM-DD]");
    }
    let mut form = ExpenseForm::new(Local::now().date_naive());
    form.name = args[0].clone();
    form.tag = args[1].clone();
    form.amount = args[2].clone();
    if let Some(date) = args.get(3) {
        form.date = date.clone();
    }

    require_session(tracker)?;
    match tracker.add_expense(&form) {
        Outcome::Done => {
            println!(
                "Gasto agregado: {} ({})",
                form.name.trim(),
                format_amount(parsed_amount(&form))
            );
            Ok(())
        }
        Outcome::Skipped => {
            anyhow::bail!("Monto o fecha inválidos: '{}' '{}'", form.amount, form.date)
        }
        Outcome::Failed => anyhow::bail!(
            "{}",
            tracker
                .state()
                .error
                .as_deref()
                .unwrap_or("No se pudo agregar el gasto")
        ),
    }
}

fn parsed_amount(form: &ExpenseForm) -> rust_decimal::Decimal {
    form.to_request().map(|r| r.amount).unwrap_or_default()
}

fn cli_export<A: ExpenseApi>(args: &[String], tracker: &mut Tracker<A>) -> Result<()> {
    let today = Local::now().date_naive();
    let filter = parse_filter(flag_value(args, "--periodo"), args)?;

    // Output path is the first non-flag argument
    let output_path = args
        .first()
        .filter(|a| !a.starts_with('-'))
        .map(|a| PathBuf::from(export::shellexpand(a)))
        .unwrap_or_else(|| export::default_export_path(&filter, today));

    require_session(tracker)?;
    report_error(tracker);
    let state = tracker.state();
    let summary = summary::summarize(&state.expenses, &filter, today);
    let count = export::export_csv(&output_path, &summary.expenses)?;
    if count == 0 {
        println!("Sin gastos para {}", filter.describe(today));
    } else {
        println!("Exportados {count} gastos a {}", output_path.display());
    }
    Ok(())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a String> {
    args.windows(2).find(|w| w[0] == flag).map(|w| &w[1])
}

/// Build a filter from a period name plus optional `--desde`/`--hasta`.
/// Giving either bound without a period implies the custom range.
fn parse_filter(period: Option<&String>, args: &[String]) -> Result<PeriodFilter> {
    let start = flag_value(args, "--desde").map(|s| parse_date(s)).transpose()?;
    let end = flag_value(args, "--hasta").map(|s| parse_date(s)).transpose()?;

    let period = match period {
        Some(name) => Period::parse(name)
            .ok_or_else(|| anyhow::anyhow!("Período desconocido: {name}"))?,
        None if start.is_some() || end.is_some() => Period::Custom,
        None => Period::default(),
    };

    Ok(match period {
        Period::Custom => PeriodFilter::custom(start, end),
        other => PeriodFilter::new(other),
    })
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("Fecha inválida (usa AAAA-MM-DD): {s}"))
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
