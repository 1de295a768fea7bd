use crate::models::book::NewBook;
use crate::models::error::ApiError;
use crate::services::catalog::{create_book, delete_book, find_book, list_books, update_book};
use crate::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Json, Response},
};
use tracing::debug;

/// Shape of a request path under the `books` resource.
#[derive(Debug, PartialEq, Eq)]
pub enum Target<'a> {
    /// `/books`
    Collection,
    /// `/books/{id}`
    Book(&'a str),
    /// `/books/...` with any other number of segments
    Unrecognized,
}

/// Splits `path` on `/` and classifies it by segment count. No decoding and
/// no trailing-slash normalization: `/books/` addresses the book with id `""`.
pub fn parse_path(path: &str) -> Result<Target<'_>, ApiError> {
    let segments: Vec<&str> = path.split('/').skip(1).collect();

    match segments.as_slice() {
        ["books"] => Ok(Target::Collection),
        ["books", id] => Ok(Target::Book(*id)),
        ["books", ..] => Ok(Target::Unrecognized),
        _ => Err(ApiError::ResourceNotFound),
    }
}

/// Single entry point for every request.
pub async fn dispatch(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Result<Response, ApiError> {
    let target = parse_path(uri.path())?;
    debug!("Dispatching {} {:?}", method, target);

    match (method, target) {
        (Method::GET, Target::Collection) => {
            let books = list_books(state.store()).await?;
            Ok((StatusCode::OK, Json(books)).into_response())
        }
        (Method::GET, Target::Book(book_id)) => {
            let book = find_book(state.store(), book_id).await?;
            Ok((StatusCode::OK, Json(book)).into_response())
        }
        (Method::POST, Target::Collection) => {
            let new_book = NewBook::from_json(&body)?;
            let _guard = state.write_guard().await;
            let book = create_book(state.store(), new_book).await?;
            Ok((StatusCode::CREATED, Json(book)).into_response())
        }
        (Method::PUT, Target::Book(book_id)) => {
            let _guard = state.write_guard().await;
            let book = update_book(state.store(), book_id, &body).await?;
            Ok((StatusCode::OK, Json(book)).into_response())
        }
        (Method::DELETE, Target::Book(book_id)) => {
            let _guard = state.write_guard().await;
            delete_book(state.store(), book_id).await?;
            Ok(StatusCode::NO_CONTENT.into_response())
        }
        _ => Err(ApiError::InvalidRequest),
    }
}
