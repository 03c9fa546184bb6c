//! SeaORM implementation of BookRepository

use async_trait::async_trait;
use chrono::SecondsFormat;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryOrder, Set,
};

use crate::domain::{BookRepository, DomainError};
use crate::models::book::{Column, Entity as BookEntity};
use crate::models::{Book, BookChanges, NewBook};

/// Current time in the stored timestamp format (fixed width, so text order is time order)
pub fn timestamp_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// A row removed between the lookup and the write surfaces as `RecordNotUpdated`
fn update_error(e: DbErr) -> DomainError {
    match e {
        DbErr::RecordNotUpdated => DomainError::NotFound,
        other => other.into(),
    }
}

/// SeaORM-based implementation of BookRepository
pub struct SeaOrmBookRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookRepository for SeaOrmBookRepository {
    async fn find_all(&self) -> Result<Vec<Book>, DomainError> {
        let books = BookEntity::find()
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await?;

        Ok(books.into_iter().map(Book::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Book>, DomainError> {
        let book = BookEntity::find_by_id(id).one(&self.db).await?;
        Ok(book.map(Book::from))
    }

    async fn create(&self, book: NewBook) -> Result<Book, DomainError> {
        let now = timestamp_now();
        let result = book.into_insert_model(&now).insert(&self.db).await?;
        Ok(Book::from(result))
    }

    async fn update(&self, id: i32, changes: BookChanges) -> Result<Book, DomainError> {
        let existing = BookEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut active = existing.into_active_model();
        changes.apply(&mut active);
        active.updated_at = Set(timestamp_now());

        let result = active.update(&self.db).await.map_err(update_error)?;
        Ok(Book::from(result))
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = BookEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound);
        }

        Ok(())
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(BookEntity::find().count(&self.db).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vanished_row_on_update_is_not_found() {
        assert_eq!(update_error(DbErr::RecordNotUpdated), DomainError::NotFound);
        assert!(matches!(
            update_error(DbErr::Custom("disk full".into())),
            DomainError::Database(_)
        ));
    }

    #[test]
    fn timestamps_have_fixed_width() {
        let now = timestamp_now();
        assert_eq!(now.len(), "2026-10-19T08:00:00.000000Z".len());
        assert!(now.ends_with('Z'));
    }
}
