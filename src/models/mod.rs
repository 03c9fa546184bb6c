pub mod book;

pub use book::{Book, BookChanges, BookInput, NewBook};
