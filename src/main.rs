mod api;
mod config;
mod error;
mod payment;
mod receipt;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tabled::{settings::Style, Table, Tabled};

use crate::api::{ApiClient, PaymentRequest};
use crate::config::{
    config_dir, load_config, load_state, save_state, HistoryEntry, CONFIG_TEMPLATE,
};
use crate::error::{FeesError, Result};
use crate::payment::{change_due, reconcile, validate_amount, PaymentMethod};
use crate::receipt::{
    class_code, format_receipt_number, peek_next_sequence, resolve_next_sequence, year_code,
    CounterStore, FileCounterStore,
};

#[derive(Parser)]
#[command(name = "fees")]
#[command(version, about = "Minimal CLI school-fees payment system", long_about = None)]
struct Cli {
    /// Path to config directory (default: ~/.fees or XDG config)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with a template config file
    Init,

    /// Record a fee payment for a student
    Pay {
        /// Student identifier known to the payments API
        student: String,

        /// Payment amount in whole currency units
        amount: i64,

        /// Class name used in the receipt number (e.g., "CM2", "Maternelle 2")
        #[arg(short, long)]
        class: String,

        /// Payment method: cash or mobile-money (momo, mtn, om also accepted)
        #[arg(short, long, default_value = "cash")]
        method: String,

        /// Cash tendered by the payer; change is computed from it
        #[arg(short, long)]
        given: Option<i64>,

        /// Payment date (default: today)
        #[arg(long)]
        date: Option<String>,

        /// Skip the SMS/WhatsApp notification for this payment
        #[arg(long)]
        no_notify: bool,
    },

    /// Show a student's reconciled fee balance
    Balance {
        /// Student identifier known to the payments API
        student: String,
    },

    /// List payments recorded from this machine
    List {
        /// Number of payments to show (default: all)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// List payments held by the payments API
    Payments {
        /// Only show payments whose receipt matches this class
        #[arg(short, long)]
        class: Option<String>,

        /// Number of payments to show (default: all)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Preview the next receipt number for a class
    NextReceipt {
        /// Class name (e.g., "CM2", "Maternelle 2")
        #[arg(short, long)]
        class: String,
    },

    /// Reset the local receipt counter for a class
    ResetCounter {
        /// Class name (e.g., "CM2", "Maternelle 2")
        #[arg(short, long)]
        class: String,
    },

    /// Show configuration and upcoming receipt numbers
    Status,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Determine config directory
    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Pay {
            student,
            amount,
            class,
            method,
            given,
            date,
            no_notify,
        } => cmd_pay(&cfg_dir, &student, amount, &class, &method, given, date, no_notify),
        Commands::Balance { student } => cmd_balance(&cfg_dir, &student),
        Commands::List { limit } => cmd_list(&cfg_dir, limit),
        Commands::Payments { class, limit } => cmd_payments(&cfg_dir, class, limit),
        Commands::NextReceipt { class } => cmd_next_receipt(&cfg_dir, &class),
        Commands::ResetCounter { class } => cmd_reset_counter(&cfg_dir, &class),
        Commands::Status => cmd_status(&cfg_dir),
    }
}

/// Initialize config directory with a template config file
fn cmd_init(cfg_dir: &PathBuf) -> Result<()> {
    use std::fs;

    if cfg_dir.exists() {
        return Err(FeesError::AlreadyInitialized(cfg_dir.clone()));
    }

    fs::create_dir_all(cfg_dir)?;
    fs::write(cfg_dir.join("config.toml"), CONFIG_TEMPLATE)?;

    println!("Initialized fees config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Edit your school details and API URL:  $EDITOR {}/config.toml",
        cfg_dir.display()
    );
    println!("  2. Record your first payment:");
    println!("     fees pay <student-id> <amount> --class <class> --method cash --given <tendered>");

    Ok(())
}

// Table row structs for tabled
#[derive(Tabled)]
struct LocalPaymentRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "RECEIPT")]
    receipt: String,
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = "STUDENT")]
    student: String,
    #[tabled(rename = "CLASS")]
    class: String,
    #[tabled(rename = "AMOUNT")]
    amount: String,
    #[tabled(rename = "METHOD")]
    method: String,
}

#[derive(Tabled)]
struct RemotePaymentRow {
    #[tabled(rename = "RECEIPT")]
    receipt: String,
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = "STUDENT")]
    student: String,
    #[tabled(rename = "AMOUNT")]
    amount: String,
    #[tabled(rename = "METHOD")]
    method: String,
}

fn format_money(value: i64, symbol: &str) -> String {
    format!("{} {}", format_grouped(value), symbol)
}

fn format_grouped(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    if value < 0 {
        format!("-{out}")
    } else {
        out
    }
}

/// Record a fee payment: reconcile -> validate -> resolve sequence ->
/// format receipt -> submit -> record locally -> reconcile -> notify.
/// The stages are strictly sequential; everything after a successful
/// submission degrades to warnings instead of failing the payment.
fn cmd_pay(
    cfg_dir: &PathBuf,
    student: &str,
    amount: i64,
    class: &str,
    method_input: &str,
    given: Option<i64>,
    date_str: Option<String>,
    no_notify: bool,
) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(FeesError::ConfigNotFound(cfg_dir.clone()));
    }

    if amount <= 0 {
        return Err(FeesError::InvalidAmount);
    }

    let method = PaymentMethod::parse(method_input)?;
    if given.is_some() && method != PaymentMethod::Cash {
        eprintln!("Warning: --given only applies to cash payments; no change will be computed");
    }
    let config = load_config(cfg_dir)?;
    let api = ApiClient::new(&config.api);
    let academic_year = config.school.academic_year.clone();

    // Fresh balance before validating; a stale remaining total is how
    // overpayments slip through
    let balance = reconcile(&api, student, &academic_year)?;
    validate_amount(student, amount, &balance)?;

    let (amount_given, change) = match (method, given) {
        (PaymentMethod::Cash, Some(g)) => (Some(g), Some(change_due(g, amount))),
        _ => (None, None),
    };

    let mut store = FileCounterStore::new(cfg_dir);
    let seq = resolve_next_sequence(&api, &mut store, &academic_year, class)?;
    let receipt = format_receipt_number(&academic_year, class, seq);

    let now = chrono::Local::now();
    let date = match date_str {
        Some(s) => {
            NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|_| FeesError::InvalidDate(s))?
        }
        None => now.date_naive(),
    };
    let time = now.format("%H:%M:%S").to_string();

    let request = PaymentRequest {
        student_id: student.to_string(),
        amount,
        method,
        amount_given,
        change,
        receipt_id: receipt.clone(),
        date: date.to_string(),
        time: time.clone(),
    };
    api.create_payment(&request)?;

    // Local record of what went out
    let mut state = load_state(cfg_dir)?;
    state.history.push(HistoryEntry {
        receipt: receipt.clone(),
        student: student.to_string(),
        class: class.to_string(),
        amount,
        method,
        change: change.unwrap_or(0),
        date,
        time,
    });
    save_state(cfg_dir, &state)?;

    // Refresh the balance; on failure the local estimate stands in and the
    // committed payment is untouched
    let remaining = match reconcile(&api, student, &academic_year) {
        Ok(fresh) => fresh.total_remaining,
        Err(e) => {
            eprintln!("Warning: could not refresh balance after payment: {e}");
            (balance.total_remaining - amount).max(0)
        }
    };

    let symbol = &config.currency.symbol;
    println!("Recorded {receipt}");
    println!("  Student:   {student}");
    println!("  Class:     {class}");
    println!("  Amount:    {} ({method})", format_money(amount, symbol));
    if let Some(c) = change {
        println!("  Change:    {}", format_money(c, symbol));
    }
    if remaining <= 0 {
        println!("  Remaining: {} (fully paid)", format_money(0, symbol));
    } else {
        println!("  Remaining: {}", format_money(remaining, symbol));
    }

    if config.api.notify && !no_notify {
        let message = format!(
            "{}: payment of {} received. Receipt {}. Remaining balance: {}.",
            config.school.name,
            format_money(amount, symbol),
            receipt,
            format_money(remaining.max(0), symbol),
        );
        if let Err(e) = api.notify(student, &message) {
            eprintln!("Warning: {e}");
        }
    }

    Ok(())
}

/// Show a student's reconciled fee balance
fn cmd_balance(cfg_dir: &PathBuf, student: &str) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(FeesError::ConfigNotFound(cfg_dir.clone()));
    }

    let config = load_config(cfg_dir)?;
    let api = ApiClient::new(&config.api);

    let balance = reconcile(&api, student, &config.school.academic_year)?;
    let symbol = &config.currency.symbol;

    println!("Balance for {} ({})", student, config.school.academic_year);
    println!(
        "  Expected:  {}",
        format_money(balance.total_expected, symbol)
    );
    println!("  Paid:      {}", format_money(balance.total_paid, symbol));
    println!(
        "  Remaining: {}",
        format_money(balance.total_remaining, symbol)
    );
    if balance.total_remaining <= 0 {
        println!("  Status:    FULLY PAID");
    } else {
        println!("  Status:    OUTSTANDING");
    }

    Ok(())
}

/// List payments recorded from this machine
fn cmd_list(cfg_dir: &PathBuf, limit: Option<usize>) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(FeesError::ConfigNotFound(cfg_dir.clone()));
    }

    let config = load_config(cfg_dir)?;
    let state = load_state(cfg_dir)?;

    if state.history.is_empty() {
        println!("No payments recorded yet.");
        return Ok(());
    }

    let entries: Vec<_> = state.history.iter().rev().enumerate().collect();
    let entries = match limit {
        Some(n) => &entries[..n.min(entries.len())],
        None => &entries[..],
    };

    let rows: Vec<LocalPaymentRow> = entries
        .iter()
        .map(|(idx, entry)| LocalPaymentRow {
            index: idx + 1,
            receipt: entry.receipt.clone(),
            date: entry.date.to_string(),
            student: entry.student.clone(),
            class: entry.class.clone(),
            amount: format_money(entry.amount, &config.currency.symbol),
            method: entry.method.to_string(),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");

    let shown_total: i64 = entries.iter().map(|(_, e)| e.amount).sum();
    println!();
    println!(
        "Total: {} payment(s), {}",
        state.history.len(),
        format_money(shown_total, &config.currency.symbol)
    );

    Ok(())
}

/// List payments held by the payments API
fn cmd_payments(cfg_dir: &PathBuf, class: Option<String>, limit: Option<usize>) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(FeesError::ConfigNotFound(cfg_dir.clone()));
    }

    let config = load_config(cfg_dir)?;
    let api = ApiClient::new(&config.api);

    let mut payments = api.get_payments()?;

    if let Some(ref class) = class {
        let code = class_code(class);
        payments.retain(|p| p.receipt_id.contains(&code));
    }

    if payments.is_empty() {
        println!("No payments found.");
        return Ok(());
    }

    let total_count = payments.len();
    if let Some(n) = limit {
        payments.truncate(n);
    }

    let rows: Vec<RemotePaymentRow> = payments
        .iter()
        .map(|p| RemotePaymentRow {
            receipt: p.receipt_id.clone(),
            date: p.date.clone(),
            student: p.student_id.clone(),
            amount: format_money(p.amount, &config.currency.symbol),
            method: p.method.clone(),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");

    println!();
    println!("Total: {total_count} payment(s)");

    Ok(())
}

/// Preview the next receipt number for a class without consuming a sequence
fn cmd_next_receipt(cfg_dir: &PathBuf, class: &str) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(FeesError::ConfigNotFound(cfg_dir.clone()));
    }

    let config = load_config(cfg_dir)?;
    let api = ApiClient::new(&config.api);
    let store = FileCounterStore::new(cfg_dir);

    let seq = peek_next_sequence(&api, &store, &config.school.academic_year, class)?;
    let receipt = format_receipt_number(&config.school.academic_year, class, seq);

    println!("Next receipt for {class}: {receipt}");

    Ok(())
}

/// Reset the local receipt counter for a class
fn cmd_reset_counter(cfg_dir: &PathBuf, class: &str) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(FeesError::ConfigNotFound(cfg_dir.clone()));
    }

    let config = load_config(cfg_dir)?;
    let yc = year_code(&config.school.academic_year);
    let cc = class_code(class);

    let mut store = FileCounterStore::new(cfg_dir);
    store.reset(&yc, &cc)?;

    println!("Reset receipt counter for {class} ({yc}-{cc})");

    Ok(())
}

/// Show configuration and upcoming receipt numbers
fn cmd_status(cfg_dir: &PathBuf) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(FeesError::ConfigNotFound(cfg_dir.clone()));
    }

    let config = load_config(cfg_dir)?;
    let state = load_state(cfg_dir)?;

    println!("School Fees Status");
    println!("{}", "-".repeat(50));
    println!("Config directory: {}", cfg_dir.display());
    println!("School:           {}", config.school.name);
    println!("Academic year:    {}", config.school.academic_year);
    println!("Payments API:     {}", config.api.base_url);
    println!("Recorded locally: {} payment(s)", state.history.len());

    if !state.counters.is_empty() {
        println!();
        println!("Next receipt numbers (local counters):");
        for (key, last) in &state.counters {
            if let Some((yc, cc)) = key.split_once('-') {
                println!("  REC-{}-{:03}-{}", yc, last + 1, cc);
            }
        }
    }

    if !state.history.is_empty() {
        println!();
        println!("Recent payments:");
        for entry in state.history.iter().rev().take(5) {
            println!(
                "  {} - {} - {}",
                entry.receipt,
                entry.student,
                format_money(entry.amount, &config.currency.symbol)
            );
        }
    }

    Ok(())
}
