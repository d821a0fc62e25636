use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Date, Month};

use finance_ledger::{
    PasswordHash, Transaction, TransactionType, ValidatedPassword, initialize_db,
    stores::{
        BudgetStore, LedgerStore,
        sqlite::{SQLiteBudgetStore, SQLiteLedgerStore},
    },
    user::create_user,
};

/// A utility for creating a test database for the finance ledger.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The year to add the sample transactions and budgets to.
    #[arg(long, default_value_t = 2024)]
    year: i32,
}

const SAMPLE_EXPENSES: [(&str, f64, u8); 4] = [
    ("Rent", 950.0, 1),
    ("Food", 120.5, 7),
    ("Food", 95.25, 21),
    ("Transport", 40.0, 14),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user \"test\" with password \"test\"...");

    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked("test"),
        PasswordHash::DEFAULT_COST,
    )?;
    let user = create_user("test", password_hash, &conn)?;

    println!("Adding a year of sample transactions and budgets...");

    let connection = std::sync::Arc::new(std::sync::Mutex::new(conn));
    let mut ledger = SQLiteLedgerStore::new(connection.clone(), time::UtcOffset::UTC);
    let mut budgets = SQLiteBudgetStore::new(connection);

    for month in 1..=12u8 {
        let month_of_year = Month::try_from(month)?;

        ledger.add(
            Transaction::build(user.id, TransactionType::Income, "Salary", 3200.0)
                .date(Date::from_calendar_date(args.year, month_of_year, 15)?),
        )?;

        for (category, amount, day) in SAMPLE_EXPENSES {
            ledger.add(
                Transaction::build(user.id, TransactionType::Expense, category, amount)
                    .date(Date::from_calendar_date(args.year, month_of_year, day)?),
            )?;
        }

        budgets.set_budget(user.id, "Rent", 950.0, month, args.year)?;
        budgets.set_budget(user.id, "Food", 200.0, month, args.year)?;
    }

    println!("Success!");

    Ok(())
}
