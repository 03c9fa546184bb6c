//! Book Service - Catalog rules without the HTTP layer
//!
//! Handlers hand raw request bodies to these functions; parsing, validation
//! and repository calls all happen here so every operation returns a single
//! `DomainError` kind on failure.

use serde_json::Value;

use crate::domain::{BookRepository, DomainError};
use crate::models::{Book, BookChanges, BookInput, NewBook};

const INVALID_JSON: &str = "Invalid JSON data";
const REQUIRED_FIELDS: &str = "Title and Author are required";
const BLANK_FIELDS: &str = "Title and Author cannot be empty";
const NO_FIELDS: &str = "No fields to update";

/// Decode a request body into a partial book.
/// Anything other than a JSON object is rejected.
pub fn parse_input(body: &[u8]) -> Result<BookInput, DomainError> {
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        tracing::debug!("Rejected body: {}", e);
        DomainError::Validation(INVALID_JSON.to_string())
    })?;

    if !value.is_object() {
        return Err(DomainError::Validation(INVALID_JSON.to_string()));
    }

    serde_json::from_value(value).map_err(|e| {
        tracing::debug!("Rejected body fields: {}", e);
        DomainError::Validation(INVALID_JSON.to_string())
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Check the fields required on creation
pub fn validate_new(input: BookInput) -> Result<NewBook, DomainError> {
    let (Some(title), Some(author)) = (non_blank(input.title), non_blank(input.author)) else {
        return Err(DomainError::Validation(REQUIRED_FIELDS.to_string()));
    };

    Ok(NewBook {
        title,
        author,
        isbn: input.isbn,
        published_year: input.published_year.filter(|y| *y != 0),
        genre: input.genre,
        description: input.description,
        cover_image: input.cover_image,
    })
}

/// Check an update payload: at least one field, and no blanked title/author
pub fn validate_changes(input: BookInput) -> Result<BookChanges, DomainError> {
    let changes = BookChanges::from(input);

    if changes.is_empty() {
        return Err(DomainError::Validation(NO_FIELDS.to_string()));
    }

    let blank = |v: &Option<String>| v.as_ref().is_some_and(|s| s.trim().is_empty());
    if blank(&changes.title) || blank(&changes.author) {
        return Err(DomainError::Validation(BLANK_FIELDS.to_string()));
    }

    Ok(changes)
}

/// List every book, newest first
pub async fn list_books(repo: &dyn BookRepository) -> Result<Vec<Book>, DomainError> {
    let books = repo.find_all().await?;
    tracing::debug!("List books returned {} records", books.len());
    Ok(books)
}

pub async fn get_book(repo: &dyn BookRepository, id: i32) -> Result<Book, DomainError> {
    repo.find_by_id(id).await?.ok_or(DomainError::NotFound)
}

pub async fn create_book(repo: &dyn BookRepository, body: &[u8]) -> Result<Book, DomainError> {
    let new_book = validate_new(parse_input(body)?)?;
    let book = repo.create(new_book).await?;
    tracing::info!("Created book {} ({:?})", book.id, book.title);
    Ok(book)
}

/// Update a book in place.
///
/// A bad id reports 404 ahead of field errors, so the id is only looked up
/// separately when the payload itself is unusable; otherwise the repository
/// update does the existence check.
pub async fn update_book(
    repo: &dyn BookRepository,
    id: i32,
    body: &[u8],
) -> Result<Book, DomainError> {
    let input = parse_input(body)?;

    let changes = match validate_changes(input) {
        Ok(changes) => changes,
        Err(e) => {
            if repo.find_by_id(id).await?.is_none() {
                return Err(DomainError::NotFound);
            }
            return Err(e);
        }
    };

    let book = repo.update(id, changes).await?;
    tracing::info!("Updated book {}", id);
    Ok(book)
}

pub async fn delete_book(repo: &dyn BookRepository, id: i32) -> Result<(), DomainError> {
    repo.delete(id).await?;
    tracing::info!("Deleted book {}", id);
    Ok(())
}
