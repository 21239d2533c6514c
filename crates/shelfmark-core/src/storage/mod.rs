pub mod memory;
pub mod repositories;
pub mod sqlite;

pub use memory::MemoryStore;
pub use repositories::BookRepository;
pub use sqlite::SqliteStore;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

/// Slot holding the serialized book collection.
pub const BOOKS_SLOT: &str = "books";
/// Slot holding the serialized credential table.
pub const USERS_SLOT: &str = "users";
/// Slot holding the serialized session marker.
pub const SESSION_SLOT: &str = "session";

/// Key-value persistence port. Each slot holds one serialized value,
/// read in full and overwritten in full; an absent key means no data.
///
/// Implementations are not required to be atomic across `get`/`set`
/// pairs — callers doing read-modify-write cycles rely on single-threaded
/// use and get last-write-wins semantics otherwise.
pub trait SlotStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Read a slot holding a JSON array of records. An absent slot is an
/// empty list; a corrupt slot is logged and masked as an empty list.
pub(crate) fn read_list<S, T>(store: &S, key: &str) -> Result<Vec<T>>
where
    S: SlotStore + ?Sized,
    T: DeserializeOwned,
{
    match store.get(key)? {
        None => Ok(Vec::new()),
        Some(raw) => match serde_json::from_str(&raw) {
            Ok(list) => Ok(list),
            Err(e) => {
                tracing::warn!(slot = key, error = %e, "corrupt slot, treating as empty");
                Ok(Vec::new())
            }
        },
    }
}

/// Serialize a record list and overwrite its slot.
pub(crate) fn write_list<S, T>(store: &S, key: &str, list: &[T]) -> Result<()>
where
    S: SlotStore + ?Sized,
    T: Serialize,
{
    let raw = serde_json::to_string(list)?;
    tracing::debug!(slot = key, records = list.len(), "persisting slot");
    store.set(key, &raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Book;

    #[test]
    fn test_read_list_absent_slot_is_empty() {
        let store = MemoryStore::new();
        let books: Vec<Book> = read_list(&store, BOOKS_SLOT).unwrap();
        assert!(books.is_empty());
    }

    #[test]
    fn test_read_list_corrupt_slot_is_empty() {
        let store = MemoryStore::new();
        store.set(BOOKS_SLOT, "{not json").unwrap();
        let books: Vec<Book> = read_list(&store, BOOKS_SLOT).unwrap();
        assert!(books.is_empty());
    }

    #[test]
    fn test_write_then_read_list() {
        let store = MemoryStore::new();
        let books = vec![Book::new("Dune", "Frank Herbert")];
        write_list(&store, BOOKS_SLOT, &books).unwrap();
        let loaded: Vec<Book> = read_list(&store, BOOKS_SLOT).unwrap();
        assert_eq!(loaded, books);
    }
}
