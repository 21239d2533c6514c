use crate::error::Result;
use crate::models::Book;
use crate::storage::{read_list, write_list, SlotStore, BOOKS_SLOT};

/// Durable book collection behind the `"books"` slot.
///
/// Every mutation is a full read-modify-write of the slot: the current
/// collection is loaded, changed in memory, and written back wholesale.
/// There is no cross-call cache.
pub struct BookRepository<'a, S: SlotStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: SlotStore + ?Sized> BookRepository<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// The full collection in append order. An absent or corrupt slot
    /// yields an empty collection.
    pub fn get_all(&self) -> Result<Vec<Book>> {
        read_list(self.store, BOOKS_SLOT)
    }

    /// Append a record. Ids are not checked for duplicates here; the
    /// timestamp-derived id is taken as unique.
    pub fn add(&self, book: &Book) -> Result<()> {
        let mut books = self.get_all()?;
        books.push(book.clone());
        write_list(self.store, BOOKS_SLOT, &books)
    }

    /// Replace the first record whose id matches, keeping its position.
    /// Returns `false` (and leaves the collection untouched) when no
    /// record matches.
    pub fn update(&self, book: &Book) -> Result<bool> {
        let mut books = self.get_all()?;
        match books.iter_mut().find(|b| b.id == book.id) {
            Some(existing) => {
                *existing = book.clone();
                write_list(self.store, BOOKS_SLOT, &books)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove every record whose id matches (normally at most one).
    /// Returns `false` when nothing matched.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let mut books = self.get_all()?;
        let before = books.len();
        books.retain(|b| b.id != id);
        if books.len() == before {
            return Ok(false);
        }
        write_list(self.store, BOOKS_SLOT, &books)?;
        Ok(true)
    }
}
