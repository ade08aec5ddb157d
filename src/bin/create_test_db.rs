use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use time::{Duration, OffsetDateTime};

use kakeibo::{Category, Entry, EntryType, create_entry, initialize_db, open_db};

/// A utility for creating a test database for the kakeibo web server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Expense categories and amounts repeated over the sample period.
const SAMPLE_EXPENSES: [(&str, i64, &str); 5] = [
    ("食費", 1280, "supermarket"),
    ("交通費", 420, "train"),
    ("日用品", 860, "detergent"),
    ("外食", 2400, "ramen with friends"),
    ("光熱費", 7350, "electricity"),
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
    let conn = open_db(output_path)?;

    initialize_db(&conn)?;

    println!("Creating sample entries...");

    let today = OffsetDateTime::now_utc().date();
    let mut count = 0;

    for days_ago in 0..90 {
        let date = today - Duration::days(days_ago);

        if date.day() == 25 {
            create_entry(
                Entry::build(
                    date,
                    EntryType::Income,
                    280_000,
                    Category::new_unchecked("給料"),
                )
                .description("salary"),
                &conn,
            )?;
            count += 1;
        }

        let (category, amount, description) =
            SAMPLE_EXPENSES[days_ago as usize % SAMPLE_EXPENSES.len()];

        if days_ago % 2 == 0 {
            create_entry(
                Entry::build(
                    date,
                    EntryType::Expense,
                    amount,
                    Category::new_unchecked(category),
                )
                .description(description),
                &conn,
            )?;
            count += 1;
        }
    }

    println!("Created {count} entries.");
    println!("Success!");

    Ok(())
}
