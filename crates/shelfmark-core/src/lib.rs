pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod search;
pub mod storage;

pub use api::{AuthPayload, SignupClient, SignupResponse, DEFAULT_BASE_URL};
pub use auth::CredentialGate;
pub use config::{ApiConfig, AppConfig, CoreConfig};
pub use error::{ExitCode, Result, ShelfmarkError};
pub use models::*;
pub use search::filter_books;
pub use storage::{BookRepository, MemoryStore, SlotStore, SqliteStore};
