//! Bookshelf CLI - command-line client for the bookshelf reading-list API.
//!
//! Handles account management (register, activate, login, logout) and
//! book CRUD against a running bookshelf server.

use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use bookshelf_client::api::{build_client, BooksClient};
use bookshelf_client::auth::{FileTokenStore, SessionManager};
use bookshelf_client::config::Config;
use bookshelf_client::models::NewBook;

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn print_usage() {
    eprintln!("Usage: bookshelf <command>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  login [email]                 authenticate and store the session token");
    eprintln!("  logout                        invalidate and forget the session token");
    eprintln!("  register <username> <email>   create an account (activation required)");
    eprintln!("  activate <token>              activate an account with an emailed token");
    eprintln!("  status                        show whether a session is active");
    eprintln!("  books list                    list all books");
    eprintln!("  books show <id>               show one book");
    eprintln!("  books add <title> <authors> <isbn> <date> <genre> [description]");
    eprintln!("  books edit <id> <title> <authors> <isbn> <date> <genre> [description]");
    eprintln!("  books delete <id>             delete a book");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        print_usage();
        std::process::exit(2);
    }

    let mut config = Config::load().context("Failed to load configuration")?;
    let base_url = config.base_url();
    info!(base_url = %base_url, "bookshelf client starting");

    let http = build_client().context("Failed to build HTTP client")?;
    let store = FileTokenStore::new(Config::session_dir()?);
    let mut session = SessionManager::new(http.clone(), base_url.clone(), Box::new(store));
    let books = BooksClient::new(http, base_url);

    match args[0].as_str() {
        "login" => {
            let email = match args.get(1) {
                Some(email) => email.clone(),
                None => prompt("Email", config.last_email.as_deref())?,
            };
            let password = rpassword::prompt_password("Password: ")?;

            match session.login(&email, &password).await {
                Ok(()) => {
                    config.last_email = Some(email);
                    config.save()?;
                    println!("Logged in.");
                }
                Err(e) => fail(&e.to_string()),
            }
        }
        "logout" => match session.logout().await {
            Ok(()) => println!("Logged out."),
            Err(e) => fail(&e.to_string()),
        },
        "register" => {
            let (username, email) = match (args.get(1), args.get(2)) {
                (Some(u), Some(e)) => (u.clone(), e.clone()),
                _ => {
                    print_usage();
                    std::process::exit(2);
                }
            };
            let password = rpassword::prompt_password("Password: ")?;

            match session.register(&username, &email, &password).await {
                Ok(()) => println!("Registration accepted. Check your email for an activation token."),
                Err(e) => fail(&e.to_string()),
            }
        }
        "activate" => {
            let Some(token) = args.get(1) else {
                print_usage();
                std::process::exit(2);
            };
            match session.activate(token).await {
                Ok(()) => println!("Account activated. You can now log in."),
                Err(e) => fail(&e.to_string()),
            }
        }
        "status" => {
            if session.is_authenticated() {
                println!("Logged in.");
            } else {
                println!("Not logged in.");
            }
        }
        "books" => run_books_command(&args[1..], &session, &books).await?,
        _ => {
            print_usage();
            std::process::exit(2);
        }
    }

    Ok(())
}

async fn run_books_command(
    args: &[String],
    session: &SessionManager,
    books: &BooksClient,
) -> Result<()> {
    match args.first().map(String::as_str) {
        Some("list") => match books.list(session).await {
            Ok(list) => {
                for book in list {
                    println!(
                        "{:>5}  {}  by {}  [{}]  {:.1}",
                        book.id, book.title, book.authors, book.isbn, book.average_rating
                    );
                }
            }
            Err(e) => fail(&e.to_string()),
        },
        Some("show") => {
            let id = parse_id(args.get(1))?;
            match books.get(session, id).await {
                Ok(book) => {
                    println!("{} by {}", book.title, book.authors);
                    println!("  isbn: {}", book.isbn);
                    println!("  published: {}", book.publication_date);
                    println!("  genre: {}", book.genre);
                    println!("  rating: {:.1}", book.average_rating);
                    if !book.description.is_empty() {
                        println!("  {}", book.description);
                    }
                }
                Err(e) => fail(&e.to_string()),
            }
        }
        Some("add") => {
            if args.len() < 6 {
                print_usage();
                std::process::exit(2);
            }
            let book = NewBook {
                title: args[1].clone(),
                authors: args[2].clone(),
                isbn: args[3].clone(),
                publication_date: args[4].clone(),
                genre: args[5].clone(),
                description: args.get(6).cloned().unwrap_or_default(),
            };
            match books.create(session, &book).await {
                Ok(created) => println!("Added book {}.", created.id),
                Err(e) => fail(&e.to_string()),
            }
        }
        Some("edit") => {
            if args.len() < 7 {
                print_usage();
                std::process::exit(2);
            }
            let id = parse_id(args.get(1))?;
            let book = NewBook {
                title: args[2].clone(),
                authors: args[3].clone(),
                isbn: args[4].clone(),
                publication_date: args[5].clone(),
                genre: args[6].clone(),
                description: args.get(7).cloned().unwrap_or_default(),
            };
            match books.update(session, id, &book).await {
                Ok(updated) => println!("Updated book {}.", updated.id),
                Err(e) => fail(&e.to_string()),
            }
        }
        Some("delete") => {
            let id = parse_id(args.get(1))?;
            match books.delete(session, id).await {
                Ok(()) => println!("Deleted book {}.", id),
                Err(e) => fail(&e.to_string()),
            }
        }
        _ => {
            print_usage();
            std::process::exit(2);
        }
    }
    Ok(())
}

fn parse_id(arg: Option<&String>) -> Result<i64> {
    arg.ok_or_else(|| anyhow::anyhow!("missing book id"))?
        .parse()
        .context("book id must be a number")
}

/// Prompt on stdout with an optional default shown in brackets.
fn prompt(label: &str, default: Option<&str>) -> Result<String> {
    match default {
        Some(value) => print!("{} [{}]: ", label, value),
        None => print!("{}: ", label),
    }
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    let line = line.trim();
    if line.is_empty() {
        if let Some(value) = default {
            return Ok(value.to_string());
        }
    }
    Ok(line.to_string())
}

fn fail(message: &str) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}
