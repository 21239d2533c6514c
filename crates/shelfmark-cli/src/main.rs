use std::time::Instant;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use shelfmark_core::{
    filter_books, AppConfig, AuthPayload, Book, BookRepository, BookStatus, CredentialGate,
    ExitCode, Session, ShelfmarkError, SignupClient, SqliteStore,
};

// ─── CLI Definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "shelfmark",
    about = "Local-first personal book tracker",
    version,
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output in JSON format (for scripts).
    /// Also enabled by setting SHELFMARK_JSON=1.
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a local account and sign in.
    Register {
        username: String,
        #[arg(long)]
        password: String,
    },

    /// Sign in with a registered account.
    Login {
        username: String,
        #[arg(long)]
        password: String,
    },

    /// Sign out.
    Logout,

    /// Show the signed-in user, if any.
    Whoami,

    /// Add a book to the shelf.
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: String,
        #[arg(long)]
        pages: u32,
        #[arg(long)]
        published: i32,
        #[arg(long)]
        isbn: String,
        #[arg(long)]
        cover: Option<String>,
        #[arg(long, default_value = "new")]
        status: String,
    },

    /// List all books on the shelf.
    List,

    /// Filter books by a case-insensitive substring of title, author, or ISBN.
    Search { query: String },

    /// Update fields of an existing book.
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        pages: Option<u32>,
        #[arg(long)]
        published: Option<i32>,
        #[arg(long)]
        isbn: Option<String>,
        #[arg(long)]
        cover: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },

    /// Delete a book by id.
    Delete { id: String },

    /// Register against the hosted signup endpoint (optional integration).
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        key: String,
        /// Shared secret; falls back to the env var named in config.
        #[arg(long)]
        secret: Option<String>,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────────

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

/// Book commands are gated on an open session, mirroring the navigation
/// guard of the original UI.
fn require_session<S: shelfmark_core::SlotStore>(gate: &CredentialGate<'_, S>) -> Result<Session> {
    match gate.current()? {
        Some(session) => Ok(session),
        None => {
            eprintln!("Not signed in. Use `shelfmark login` or `shelfmark register`.");
            std::process::exit(ExitCode::AuthRequired as i32);
        }
    }
}

fn parse_status(s: &str) -> BookStatus {
    match s.parse() {
        Ok(status) => status,
        Err(_) => {
            eprintln!("Invalid status: {s} (expected new, reading, or finished)");
            std::process::exit(ExitCode::InvalidArgs as i32);
        }
    }
}

fn print_book_line(book: &Book) {
    println!(
        "{id}  {title:<32}  {author:<24}  {year}  [{status}]",
        id = book.id,
        title = book.title,
        author = book.author,
        year = book.published,
        status = book.status,
    );
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let start = Instant::now();
    let cli = Cli::parse();

    let json_output = cli.json || std::env::var("SHELFMARK_JSON").as_deref() == Ok("1");

    // Load config (honors SHELFMARK_DATA_DIR if set)
    let mut config = AppConfig::load()?;
    if let Ok(data_dir) = std::env::var("SHELFMARK_DATA_DIR") {
        config.core.data_dir = data_dir;
    }

    let store = SqliteStore::open(&config.database_path())?;
    let gate = CredentialGate::new(&store);
    let repo = BookRepository::new(&store);

    match cli.command {
        Commands::Register { username, password } => {
            if username.is_empty() || password.is_empty() {
                eprintln!("All fields are required");
                std::process::exit(ExitCode::InvalidArgs as i32);
            }
            match gate.register(&username, &password) {
                Ok(session) => {
                    if json_output {
                        print_json(&serde_json::json!({
                            "status": "ok",
                            "data": { "username": session.username },
                            "meta": { "duration_ms": start.elapsed().as_millis() as u64 }
                        }))?;
                    } else {
                        println!("Registered and signed in as {}", session.username);
                    }
                }
                Err(e @ ShelfmarkError::UsernameTaken(_)) => {
                    eprintln!("{e}");
                    std::process::exit(ExitCode::GeneralError as i32);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Commands::Login { username, password } => match gate.authenticate(&username, &password) {
            Ok(session) => {
                if json_output {
                    print_json(&serde_json::json!({
                        "status": "ok",
                        "data": { "username": session.username },
                        "meta": { "duration_ms": start.elapsed().as_millis() as u64 }
                    }))?;
                } else {
                    println!("Signed in as {}", session.username);
                }
            }
            Err(e @ ShelfmarkError::InvalidCredentials) => {
                eprintln!("{e}");
                std::process::exit(ExitCode::GeneralError as i32);
            }
            Err(e) => return Err(e.into()),
        },

        Commands::Logout => {
            gate.logout()?;
            if json_output {
                print_json(&serde_json::json!({"status": "ok", "data": null}))?;
            } else {
                println!("Signed out.");
            }
        }

        Commands::Whoami => match gate.current()? {
            Some(session) => {
                if json_output {
                    print_json(&serde_json::json!({"status": "ok", "data": session}))?;
                } else {
                    println!("{}", session.username);
                }
            }
            None => {
                if json_output {
                    print_json(&serde_json::json!({"status": "ok", "data": null}))?;
                } else {
                    println!("Not signed in.");
                }
            }
        },

        Commands::Add { title, author, pages, published, isbn, cover, status } => {
            require_session(&gate)?;
            if title.trim().is_empty() {
                eprintln!("Title must not be empty");
                std::process::exit(ExitCode::InvalidArgs as i32);
            }

            let mut book = Book::new(title, author);
            book.pages = pages;
            book.published = published;
            book.isbn = isbn;
            book.cover = cover;
            book.status = parse_status(&status);

            repo.add(&book)?;
            if json_output {
                print_json(&serde_json::json!({
                    "status": "ok",
                    "data": book,
                    "meta": { "duration_ms": start.elapsed().as_millis() as u64 }
                }))?;
            } else {
                println!("Added: {} ({})", book.title, book.id);
            }
        }

        Commands::List => {
            require_session(&gate)?;
            let books = repo.get_all()?;
            if json_output {
                print_json(&serde_json::json!({
                    "status": "ok",
                    "data": { "items": books, "total": books.len() },
                    "meta": { "duration_ms": start.elapsed().as_millis() as u64 }
                }))?;
            } else if books.is_empty() {
                println!("No books on the shelf. Use `shelfmark add` to add one.");
            } else {
                for book in &books {
                    print_book_line(book);
                }
            }
        }

        Commands::Search { query } => {
            require_session(&gate)?;
            let books = repo.get_all()?;
            let results = filter_books(&books, &query);
            if json_output {
                print_json(&serde_json::json!({
                    "status": "ok",
                    "data": { "items": results, "total": results.len(), "query": query },
                    "meta": { "duration_ms": start.elapsed().as_millis() as u64 }
                }))?;
            } else if results.is_empty() {
                println!("No results for: {query}");
            } else {
                for book in &results {
                    print_book_line(book);
                }
            }
        }

        Commands::Update { id, title, author, pages, published, isbn, cover, status } => {
            require_session(&gate)?;
            let books = repo.get_all()?;
            let mut book = match books.into_iter().find(|b| b.id == id) {
                Some(b) => b,
                None => {
                    eprintln!("Book not found: {id}");
                    std::process::exit(ExitCode::NotFound as i32);
                }
            };

            if let Some(t) = title { book.title = t; }
            if let Some(a) = author { book.author = a; }
            if let Some(p) = pages { book.pages = p; }
            if let Some(y) = published { book.published = y; }
            if let Some(i) = isbn { book.isbn = i; }
            if let Some(c) = cover { book.cover = Some(c); }
            if let Some(s) = status { book.status = parse_status(&s); }

            repo.update(&book)?;
            if json_output {
                print_json(&serde_json::json!({
                    "status": "ok",
                    "data": book,
                    "meta": { "duration_ms": start.elapsed().as_millis() as u64 }
                }))?;
            } else {
                println!("Updated: {}", book.title);
            }
        }

        Commands::Delete { id } => {
            require_session(&gate)?;
            let deleted = repo.delete(&id)?;
            if !deleted {
                eprintln!("Book not found: {id}");
                std::process::exit(ExitCode::NotFound as i32);
            }
            if json_output {
                print_json(&serde_json::json!({
                    "status": "ok",
                    "data": { "deleted": id },
                    "meta": { "duration_ms": start.elapsed().as_millis() as u64 }
                }))?;
            } else {
                println!("Deleted book: {id}");
            }
        }

        Commands::Signup { name, email, key, secret } => {
            let secret = match secret.or_else(|| std::env::var(&config.api.secret_env).ok()) {
                Some(s) => s,
                None => {
                    eprintln!(
                        "No signup secret: pass --secret or set {}",
                        config.api.secret_env
                    );
                    std::process::exit(ExitCode::InvalidArgs as i32);
                }
            };

            let payload = AuthPayload { name, email, key, secret };
            let client = SignupClient::new(config.api.base_url.clone());

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            match runtime.block_on(client.signup(&payload)) {
                Ok(response) => {
                    if json_output {
                        print_json(&serde_json::json!({
                            "status": "ok",
                            "data": response,
                            "meta": { "duration_ms": start.elapsed().as_millis() as u64 }
                        }))?;
                    } else {
                        println!(
                            "Signup accepted: {}",
                            response.message.as_deref().unwrap_or("ok")
                        );
                    }
                }
                Err(e) => {
                    eprintln!("Signup failed: {e}");
                    std::process::exit(ExitCode::GeneralError as i32);
                }
            }
        }
    }

    Ok(())
}
