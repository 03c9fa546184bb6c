use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub published_year: Option<i32>,
    pub genre: Option<String>,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// DTO for API responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub published_year: Option<i32>,
    pub genre: Option<String>,
    pub description: Option<String>,
    /// URL or relative path of the cover picture
    pub cover_image: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Model> for Book {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            author: model.author,
            isbn: model.isbn,
            published_year: model.published_year,
            genre: model.genre,
            description: model.description,
            cover_image: model.cover_image,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Partial book record as sent by clients on create and update.
///
/// Every field is optional here; a JSON `null` is treated the same as an
/// absent key. Server-owned fields (`id`, timestamps) are not part of the
/// input and are silently ignored when present in a body.
#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct BookInput {
    pub title: Option<String>,
    pub author: Option<String>,
    /// Accepts a string or a bare number
    #[serde(default, deserialize_with = "deserialize_text")]
    pub isbn: Option<String>,
    /// Accepts a number or a numeric string; `0` or `""` means "no year"
    #[serde(default, deserialize_with = "deserialize_year")]
    pub published_year: Option<i32>,
    pub genre: Option<String>,
    pub description: Option<String>,
    pub cover_image: Option<String>,
}

fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Text {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Text>::deserialize(deserializer)?.map(|text| match text {
        Text::Text(text) => text,
        Text::Number(number) => number.to_string(),
    }))
}

fn deserialize_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Year {
        Number(i32),
        Float(f64),
        Text(String),
    }

    fn invalid<E: serde::de::Error>(raw: impl std::fmt::Display) -> E {
        E::custom(format!("invalid published_year: {}", raw))
    }

    match Option::<Year>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Year::Number(year)) => Ok(Some(year)),
        Some(Year::Float(year))
            if year.fract() == 0.0 && year >= i32::MIN as f64 && year <= i32::MAX as f64 =>
        {
            Ok(Some(year as i32))
        }
        Some(Year::Float(year)) => Err(invalid(year)),
        // Blank is an explicit "no year", same as 0
        Some(Year::Text(text)) if text.trim().is_empty() => Ok(Some(0)),
        Some(Year::Text(text)) => text.trim().parse::<i32>().map(Some).map_err(|_| invalid(&text)),
    }
}

/// Validated fields for a new record; title and author are guaranteed non-blank.
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub published_year: Option<i32>,
    pub genre: Option<String>,
    pub description: Option<String>,
    pub cover_image: Option<String>,
}

/// Field changes for an existing record. `None` leaves a column untouched;
/// `published_year: Some(None)` clears the year.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BookChanges {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub published_year: Option<Option<i32>>,
    pub genre: Option<String>,
    pub description: Option<String>,
    pub cover_image: Option<String>,
}

impl BookChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.isbn.is_none()
            && self.published_year.is_none()
            && self.genre.is_none()
            && self.description.is_none()
            && self.cover_image.is_none()
    }

    /// Copy the supplied fields onto an active model; other columns stay unchanged
    pub fn apply(self, active: &mut ActiveModel) {
        if let Some(title) = self.title {
            active.title = Set(title);
        }
        if let Some(author) = self.author {
            active.author = Set(author);
        }
        if let Some(isbn) = self.isbn {
            active.isbn = Set(Some(isbn));
        }
        if let Some(year) = self.published_year {
            active.published_year = Set(year);
        }
        if let Some(genre) = self.genre {
            active.genre = Set(Some(genre));
        }
        if let Some(description) = self.description {
            active.description = Set(Some(description));
        }
        if let Some(cover_image) = self.cover_image {
            active.cover_image = Set(Some(cover_image));
        }
    }
}

impl From<BookInput> for BookChanges {
    fn from(input: BookInput) -> Self {
        Self {
            title: input.title,
            author: input.author,
            isbn: input.isbn,
            published_year: input.published_year.map(|y| (y != 0).then_some(y)),
            genre: input.genre,
            description: input.description,
            cover_image: input.cover_image,
        }
    }
}

impl NewBook {
    /// Build the insert model; timestamps are stamped by the caller
    pub fn into_insert_model(self, now: &str) -> ActiveModel {
        ActiveModel {
            id: NotSet,
            title: Set(self.title),
            author: Set(self.author),
            isbn: Set(self.isbn),
            published_year: Set(self.published_year),
            genre: Set(self.genre),
            description: Set(self.description),
            cover_image: Set(self.cover_image),
            created_at: Set(now.to_string()),
            updated_at: Set(now.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_accepts_numbers_and_numeric_strings() {
        let input: BookInput =
            serde_json::from_str(r#"{"title":"Dune","published_year":"1965"}"#).unwrap();
        assert_eq!(input.published_year, Some(1965));

        let input: BookInput = serde_json::from_str(r#"{"published_year":1965}"#).unwrap();
        assert_eq!(input.published_year, Some(1965));

        let input: BookInput = serde_json::from_str(r#"{"published_year":null}"#).unwrap();
        assert_eq!(input.published_year, None);
    }

    #[test]
    fn year_accepts_whole_floats_and_blank_text() {
        let input: BookInput = serde_json::from_str(r#"{"published_year":1965.0}"#).unwrap();
        assert_eq!(input.published_year, Some(1965));

        let input: BookInput = serde_json::from_str(r#"{"published_year":" "}"#).unwrap();
        assert_eq!(input.published_year, Some(0));
        let changes = BookChanges::from(input);
        assert_eq!(changes.published_year, Some(None));
    }

    #[test]
    fn year_rejects_garbage() {
        for body in [r#"{"published_year":"soon"}"#, r#"{"published_year":1965.5}"#] {
            assert!(serde_json::from_str::<BookInput>(body).is_err(), "{}", body);
        }
    }

    #[test]
    fn isbn_accepts_numbers() {
        let input: BookInput = serde_json::from_str(r#"{"isbn":9780441172719}"#).unwrap();
        assert_eq!(input.isbn.as_deref(), Some("9780441172719"));

        let input: BookInput = serde_json::from_str(r#"{"isbn":"0-441-17271-7"}"#).unwrap();
        assert_eq!(input.isbn.as_deref(), Some("0-441-17271-7"));

        let input: BookInput = serde_json::from_str(r#"{"isbn":null}"#).unwrap();
        assert_eq!(input.isbn, None);
    }

    #[test]
    fn server_owned_fields_are_ignored() {
        let input: BookInput =
            serde_json::from_str(r#"{"id":42,"created_at":"x","genre":"Sci-Fi"}"#).unwrap();
        let changes = BookChanges::from(input);
        assert_eq!(changes.genre.as_deref(), Some("Sci-Fi"));
        assert!(changes.title.is_none());
    }

    #[test]
    fn zero_year_clears_on_update() {
        let changes = BookChanges::from(BookInput {
            published_year: Some(0),
            ..Default::default()
        });
        assert_eq!(changes.published_year, Some(None));
        assert!(!changes.is_empty());
        assert!(BookChanges::default().is_empty());
    }
}
