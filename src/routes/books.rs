use crate::models::book::BookPatch;
use crate::models::filter::{BookFilter, FilterParams};
use crate::models::responses::BookResponse;
use crate::routes::error::ApiError;
use crate::routes::params::{BookId, JsonParams};
use crate::services::catalog;
use crate::utils::url::{book_location, request_base_url};
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Json},
};
use tracing::info;

pub async fn list_books(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<BookResponse>>, ApiError> {
    let filter = BookFilter::from_params(&FilterParams::from_pairs(pairs));
    let books = catalog::list_books(&state.backend, &filter).await?;

    info!("Listing {} books ({} filters)", books.len(), filter.criteria().len());

    Ok(Json(books.into_iter().map(BookResponse::from).collect()))
}

pub async fn get_book(
    id: BookId,
    State(state): State<AppState>,
) -> Result<Json<BookResponse>, ApiError> {
    let book = catalog::find_book(&state.backend, &id.known()?).await?;
    Ok(Json(BookResponse::from(book)))
}

pub async fn create_book(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
    JsonParams(params): JsonParams,
) -> Result<impl IntoResponse, ApiError> {
    let patch = BookPatch::from_params(&params);
    let book = catalog::create_book(&state.backend, &patch).await?;

    let base_url = request_base_url(&headers, &uri, state.config.public_base_url.as_deref());
    let location = book_location(&base_url, &book.id);

    Ok((StatusCode::CREATED, [(header::LOCATION, location)]))
}

pub async fn update_book(
    id: BookId,
    State(state): State<AppState>,
    JsonParams(params): JsonParams,
) -> Result<Json<BookResponse>, ApiError> {
    let id = id.known()?;
    let patch = BookPatch::from_params(&params);
    let book = catalog::update_book(&state.backend, &id, &patch).await?;
    Ok(Json(BookResponse::from(book)))
}

pub async fn delete_book(
    BookId(id): BookId,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    if let Some(id) = id {
        catalog::delete_book(&state.backend, &id).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}
