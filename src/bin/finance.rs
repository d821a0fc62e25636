use std::{
    error::Error,
    io::{self},
    path::PathBuf,
    process::exit,
};

use clap::{Parser, Subcommand};
use rusqlite::Connection;
use serde::Serialize;
use serde_json::json;
use time::Date;

use finance_ledger::{
    AppState, Config, PasswordHash, Transaction, TransactionQuery, TransactionType,
    TransactionUpdate, UserID, backup_database, dump_user_data, log_in, parse_date,
    register_user, restore_database, setup_logging,
    stores::{BudgetStore, LedgerStore},
};

/// Track income and expenses, set monthly budgets and report on savings.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    config: Config,

    /// The user to log in as, the password is read from the terminal.
    #[arg(long, short, env = "FINANCE_USERNAME", global = true)]
    username: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Register a new user.
    Register {
        /// The name to log in with.
        username: String,
    },
    /// Record a transaction.
    Add {
        /// Either "income" or "expense".
        transaction_type: TransactionType,
        /// The category label, e.g. "Food".
        category: String,
        /// The amount of money, never negative.
        amount: f64,
        /// The date as YYYY-MM-DD, defaults to today.
        #[arg(long, value_parser = parse_date)]
        date: Option<Date>,
    },
    /// Change some fields of a transaction.
    Update {
        /// The ID of the transaction.
        id: i64,
        /// The new type, "income" or "expense".
        #[arg(long = "type")]
        transaction_type: Option<TransactionType>,
        /// The new category.
        #[arg(long)]
        category: Option<String>,
        /// The new amount.
        #[arg(long)]
        amount: Option<f64>,
        /// The new date as YYYY-MM-DD.
        #[arg(long, value_parser = parse_date)]
        date: Option<Date>,
    },
    /// Delete a transaction.
    Delete {
        /// The ID of the transaction.
        id: i64,
    },
    /// List transactions, optionally filtered.
    List {
        /// Only list "income" or "expense".
        #[arg(long = "type")]
        transaction_type: Option<TransactionType>,
        /// Only list this category.
        #[arg(long)]
        category: Option<String>,
        /// The first day to include as YYYY-MM-DD.
        #[arg(long, value_parser = parse_date, requires = "to")]
        from: Option<Date>,
        /// The last day to include as YYYY-MM-DD.
        #[arg(long, value_parser = parse_date, requires = "from")]
        to: Option<Date>,
    },
    /// Set the spending limit for a category in a month.
    SetBudget {
        /// The expense category.
        category: String,
        /// The most to spend that month.
        amount: f64,
        /// The month, 1 = January.
        month: u8,
        /// The calendar year.
        year: i32,
    },
    /// List the budgets for a month.
    Budgets {
        /// The month, 1 = January.
        month: u8,
        /// The calendar year.
        year: i32,
    },
    /// Check a month's spending against its budgets.
    CheckBudget {
        /// The month, 1 = January.
        month: u8,
        /// The calendar year.
        year: i32,
    },
    /// Income, expense and savings totals.
    Report {
        #[command(subcommand)]
        period: ReportPeriod,
    },
    /// Print everything stored for the logged in user.
    Dump,
    /// Copy the database file into a backup directory.
    Backup {
        /// The directory to write the backup to.
        #[arg(long, default_value = "backups")]
        backup_dir: PathBuf,
    },
    /// Replace the database file with a backup.
    Restore {
        /// The backup file to restore from.
        backup_file: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum ReportPeriod {
    /// Totals for a calendar month.
    Monthly {
        /// The month, 1 = January.
        month: u8,
        /// The calendar year.
        year: i32,
    },
    /// Totals for a calendar year.
    Yearly {
        /// The calendar year.
        year: i32,
    },
    /// Totals between two dates, inclusive.
    Period {
        /// The first day as YYYY-MM-DD.
        #[arg(value_parser = parse_date)]
        start: Date,
        /// The last day as YYYY-MM-DD.
        #[arg(value_parser = parse_date)]
        end: Date,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(error) = setup_logging(cli.config.log_level, &cli.config.log_file) {
        print_error(format!("Could not set up logging: {error}"));
        exit(1);
    }

    if let Err(error) = run(cli) {
        print_error(error);
        exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    // The file copies must not race an open connection.
    match cli.command {
        Command::Backup { backup_dir } => {
            let backup_file = backup_database(&cli.config.db_path, &backup_dir)?;
            return print_json(&json!({ "backup_file": backup_file }));
        }
        Command::Restore { backup_file } => {
            let restored = restore_database(&backup_file, &cli.config.db_path)?;
            if !restored {
                print_error(format!("Backup file {backup_file:?} does not exist."));
            }
            return print_json(&json!({ "restored": restored }));
        }
        _ => {}
    }

    tracing::debug!("Opening database at {:?}", cli.config.db_path);
    let state = AppState::new(
        Connection::open(&cli.config.db_path)?,
        &cli.config.timezone,
    )?;

    if let Command::Register { username } = cli.command {
        let Some(raw_password) = get_new_password()? else {
            return Ok(());
        };
        let connection = state.lock_connection()?;
        let user = register_user(&username, &raw_password, PasswordHash::DEFAULT_COST, &connection)?;

        return print_json(&user);
    }

    let user_id = authenticate(&state, cli.username.as_deref())?;

    match cli.command {
        Command::Add {
            transaction_type,
            category,
            amount,
            date,
        } => {
            let mut builder = Transaction::build(user_id, transaction_type, &category, amount);
            if let Some(date) = date {
                builder = builder.date(date);
            }
            let id = state.ledger_store().add(builder)?;

            print_json(&json!({ "id": id }))
        }
        Command::Update {
            id,
            transaction_type,
            category,
            amount,
            date,
        } => {
            let update = TransactionUpdate {
                transaction_type,
                category,
                amount,
                date,
            };
            let mut ledger = state.ledger_store();
            let updated = match ledger.get(id) {
                Ok(transaction) if transaction.user_id == user_id => ledger.update(id, update)?,
                Ok(_) | Err(finance_ledger::Error::NotFound) => false,
                Err(error) => return Err(error.into()),
            };

            print_json(&json!({ "updated": updated }))
        }
        Command::Delete { id } => {
            let mut ledger = state.ledger_store();
            let deleted = match ledger.get(id) {
                Ok(transaction) if transaction.user_id == user_id => ledger.delete(id)?,
                Ok(_) | Err(finance_ledger::Error::NotFound) => false,
                Err(error) => return Err(error.into()),
            };

            print_json(&json!({ "deleted": deleted }))
        }
        Command::List {
            transaction_type,
            category,
            from,
            to,
        } => {
            let query = TransactionQuery {
                transaction_type,
                category,
                date_range: from.zip(to).map(|(from, to)| from..=to),
            };

            print_json(&state.ledger_store().query(user_id, &query)?)
        }
        Command::SetBudget {
            category,
            amount,
            month,
            year,
        } => print_json(
            &state
                .budget_store()
                .set_budget(user_id, &category, amount, month, year)?,
        ),
        Command::Budgets { month, year } => {
            print_json(&state.budget_store().list_budgets(user_id, month, year)?)
        }
        Command::CheckBudget { month, year } => {
            print_json(&state.budget_evaluator().budget_status(user_id, month, year)?)
        }
        Command::Report { period } => {
            let reporter = state.reporter();
            let report = match period {
                ReportPeriod::Monthly { month, year } => {
                    reporter.monthly_report(user_id, month, year)?
                }
                ReportPeriod::Yearly { year } => reporter.yearly_report(user_id, year)?,
                ReportPeriod::Period { start, end } => {
                    reporter.period_totals(user_id, start, end)?
                }
            };

            print_json(&report)
        }
        Command::Dump => {
            let connection = state.lock_connection()?;

            print_json(&dump_user_data(user_id, &connection)?)
        }
        Command::Register { .. } | Command::Backup { .. } | Command::Restore { .. } => Ok(()),
    }
}

fn authenticate(state: &AppState, username: Option<&str>) -> Result<UserID, Box<dyn Error>> {
    let Some(username) = username else {
        return Err("this command needs a user, pass --username or set FINANCE_USERNAME".into());
    };

    let raw_password = rpassword::prompt_password(format!("Password for {username}: "))?;
    let connection = state.lock_connection()?;

    Ok(log_in(username, &raw_password, &connection)?)
}

fn get_new_password() -> Result<Option<String>, Box<dyn Error>> {
    let first_password = match rpassword::prompt_password("Enter a password: ") {
        Ok(string) => string,
        Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(error) => return Err(format!("could not read password from stdin: {error}").into()),
    };

    let second_password = match rpassword::prompt_password("Enter the same password again: ") {
        Ok(string) => string,
        Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(error) => return Err(format!("could not read password from stdin: {error}").into()),
    };

    if first_password != second_password {
        return Err("passwords must match, try again.".into());
    }

    Ok(Some(first_password))
}

fn print_json(value: &impl Serialize) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);

    Ok(())
}

fn print_error(error: impl ToString) {
    eprintln!(
        "\x1b[31;1m{}\x1b[0m",
        capitalise_first_char(&error.to_string())
    );
}

/// From https://crates.io/crates/capitalize
fn capitalise_first_char(string: &str) -> String {
    let mut chars = string.chars();
    let Some(first) = chars.next() else {
        return String::with_capacity(0);
    };
    first.to_uppercase().chain(chars).collect()
}
