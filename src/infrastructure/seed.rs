use crate::domain::{BookRepository, DomainError};
use crate::models::NewBook;

fn demo_book(title: &str, author: &str, isbn: &str, year: i32, genre: &str) -> NewBook {
    NewBook {
        title: title.to_owned(),
        author: author.to_owned(),
        isbn: Some(isbn.to_owned()),
        published_year: Some(year),
        genre: Some(genre.to_owned()),
        description: None,
        cover_image: None,
    }
}

/// Insert a handful of demo books into an empty catalog.
/// Returns the number of books inserted (0 when the catalog already has data).
pub async fn seed_demo_data(repo: &dyn BookRepository) -> Result<usize, DomainError> {
    if repo.count().await? > 0 {
        tracing::info!("Catalog is not empty, skipping demo data");
        return Ok(0);
    }

    let books = vec![
        demo_book("Dune", "Frank Herbert", "9780441172719", 1965, "Science Fiction"),
        demo_book("Foundation", "Isaac Asimov", "9780553293357", 1951, "Science Fiction"),
        demo_book("The Hobbit", "J.R.R. Tolkien", "9780547928227", 1937, "Fantasy"),
        demo_book("Pride and Prejudice", "Jane Austen", "9780141439518", 1813, "Classic"),
    ];

    let total = books.len();
    for book in books {
        repo.create(book).await?;
    }

    Ok(total)
}
