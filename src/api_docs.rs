use crate::api;
use crate::models::{Book, BookInput};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::books::read_books,
        api::books::write_books,
        api::books::remove_book,
    ),
    components(schemas(Book, BookInput)),
    tags(
        (name = "elibrary", description = "eLibrary book catalog API")
    )
)]
pub struct ApiDoc;
