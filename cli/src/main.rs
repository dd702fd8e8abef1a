use anyhow::Result;
use clap::{Parser, Subcommand};
use kwcounter_core::{CounterService, Error, IndexStore, KeywordCountTable, Scanner, Vocabulary};
use std::io::{self, BufRead, Write};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "kwcounter")]
#[command(about = "Count keyword occurrences across a project's source files", long_about = None)]
struct Cli {
    /// Directory holding the persisted index records
    #[arg(long, default_value = "./kwstore")]
    store: String,
    /// File with one keyword per line; defaults to the Java reserved words
    #[arg(long)]
    keywords: Option<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the keyword count file for a project (no-op if one exists)
    Generate { path: String },
    /// Print the stored keyword counts for a project
    Get { path: String },
    /// Re-scan the project and overwrite the stored counts
    Update { path: String },
    /// Delete the stored keyword counts for a project
    Delete { path: String },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    let vocabulary = match &cli.keywords {
        Some(file) => Vocabulary::from_file(file)?,
        None => Vocabulary::default(),
    };
    let store = IndexStore::open(&cli.store, &vocabulary)?;
    let service = CounterService::new(Scanner::new(vocabulary), store);

    match cli.command {
        Some(Commands::Generate { path }) => generate(&service, &path)?,
        Some(Commands::Get { path }) => get(&service, &path)?,
        Some(Commands::Update { path }) => update(&service, &path)?,
        Some(Commands::Delete { path }) => delete(&service, &path)?,
        None => menu_loop(&service)?,
    }
    Ok(())
}

fn generate(service: &CounterService, path: &str) -> Result<()> {
    if service.generate(path)? {
        println!("Generated keyword count file successfully.");
    } else {
        println!("The keyword count file for the given project path has already been generated.");
    }
    Ok(())
}

fn get(service: &CounterService, path: &str) -> Result<()> {
    match service.retrieve(path) {
        Ok(counts) => print_counts(&counts),
        Err(Error::NotFound(_)) => {
            println!("No keyword count file exists for the given project path. Run generate first.");
        }
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

fn update(service: &CounterService, path: &str) -> Result<()> {
    if service.update(path)? {
        println!("Regenerated keyword count file successfully.");
    }
    Ok(())
}

fn delete(service: &CounterService, path: &str) -> Result<()> {
    if service.delete(path)? {
        println!("Keyword count file for given project deleted successfully.");
    } else {
        println!("Keyword count file for given project does not exist.");
    }
    Ok(())
}

fn print_counts(counts: &KeywordCountTable) {
    if counts.is_empty() {
        println!("No keywords found for this project.");
        return;
    }
    for (keyword, count) in counts {
        println!("Keyword: {keyword}, Count: {count}");
    }
}

fn print_menu() {
    println!("*************************************************************");
    println!("*         1. Generate Keyword Count File                    *");
    println!("*         2. Get Keyword Count                              *");
    println!("*         3. Update Keyword Count (Rerun)                   *");
    println!("*         4. Delete Keyword Count File                      *");
    println!("*         5. Exit                                           *");
    println!("*************************************************************");
}

/// Interactive front end: prompt for an operation and a project path until
/// the user exits or stdin closes.
fn menu_loop(service: &CounterService) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print_menu();
        let Some(choice) = prompt(&mut lines, "Enter your choice of operation: ")? else {
            break;
        };
        let op: fn(&CounterService, &str) -> Result<()> = match choice.trim() {
            "1" => generate,
            "2" => get,
            "3" => update,
            "4" => delete,
            "5" => {
                println!("Exiting");
                break;
            }
            _ => {
                println!("Invalid choice. Please enter a number between 1 and 5.");
                continue;
            }
        };
        let Some(path) = prompt_path(&mut lines)? else {
            break;
        };
        if let Err(err) = op(service, &path) {
            eprintln!("An error occurred: {err}");
        }
    }
    Ok(())
}

fn prompt<I>(lines: &mut I, message: &str) -> Result<Option<String>>
where
    I: Iterator<Item = io::Result<String>>,
{
    print!("{message}");
    io::stdout().flush()?;
    match lines.next() {
        Some(line) => Ok(Some(line?)),
        None => Ok(None),
    }
}

fn prompt_path<I>(lines: &mut I) -> Result<Option<String>>
where
    I: Iterator<Item = io::Result<String>>,
{
    loop {
        let Some(line) = prompt(lines, "Enter the path of the project: ")? else {
            return Ok(None);
        };
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            return Ok(Some(trimmed.to_string()));
        }
        println!("Invalid path. Please enter a valid path.");
    }
}
