//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer.

use async_trait::async_trait;

use super::DomainError;
use crate::models::{Book, BookChanges, NewBook};

/// Repository trait for Book entity
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Find all books, newest first
    async fn find_all(&self) -> Result<Vec<Book>, DomainError>;

    /// Find a single book by ID
    async fn find_by_id(&self, id: i32) -> Result<Option<Book>, DomainError>;

    /// Insert a new book, stamping both timestamps
    async fn create(&self, book: NewBook) -> Result<Book, DomainError>;

    /// Apply field changes to an existing book and refresh `updated_at`
    async fn update(&self, id: i32, changes: BookChanges) -> Result<Book, DomainError>;

    /// Delete a book by ID
    async fn delete(&self, id: i32) -> Result<(), DomainError>;

    /// Number of stored books
    async fn count(&self) -> Result<u64, DomainError>;
}
