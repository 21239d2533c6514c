mod book_repository;

pub use book_repository::BookRepository;
