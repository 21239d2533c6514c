pub mod book;
pub mod credential;

pub use book::*;
pub use credential::*;
