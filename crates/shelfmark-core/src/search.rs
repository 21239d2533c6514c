use crate::models::Book;

/// True when the query is a case-insensitive substring of the book's
/// title, author, or ISBN. An empty query matches every record.
pub fn matches(book: &Book, query: &str) -> bool {
    let q = query.to_lowercase();
    book.title.to_lowercase().contains(&q)
        || book.author.to_lowercase().contains(&q)
        || book.isbn.to_lowercase().contains(&q)
}

/// Derived, non-persisted view of the collection: every record matching
/// the query, in collection order. Side-effect-free.
pub fn filter_books(books: &[Book], query: &str) -> Vec<Book> {
    books.iter().filter(|b| matches(b, query)).cloned().collect()
}
