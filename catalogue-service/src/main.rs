//! Bookstore Catalogue Service - REST transport over the in-memory
//! `catalogue` core.
//!
//! The core is synchronous and lock-based, not async; every handler
//! bridges into it with `spawn_blocking` rather than awaiting a lock
//! directly, so a thread blocked on a contended record lock never stalls
//! the Tokio reactor.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use catalogue::{Catalogue, CatalogueError};
use tower_http::cors::CorsLayer;
use tracing::info;

mod types;
use types::*;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let catalogue = Arc::new(Catalogue::new());

    let app = Router::new()
        .route("/health", get(health_check))
        // Stock-management capability (operator-facing).
        .route("/store/books", post(add_books))
        .route("/store/books", get(get_books))
        .route("/store/books", delete(remove_books))
        .route("/store/books/all", delete(remove_all_books))
        .route("/store/books/lookup", post(get_books_by_isbn))
        .route("/store/books/in-demand", get(get_books_in_demand))
        .route("/store/copies", post(add_copies))
        .route("/store/editor-picks", post(update_editor_picks))
        // Purchase capability (client-facing).
        .route("/purchase/books", post(buy_books))
        .route("/purchase/books/lookup", post(get_books_for_clients))
        .route("/purchase/books/ratings", post(rate_books))
        .route("/purchase/editor-picks", get(get_editor_picks))
        .route("/purchase/top-rated", get(get_top_rated_books))
        .layer(CorsLayer::permissive())
        .with_state(catalogue);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await.unwrap();

    info!("bookstore catalogue service listening on http://0.0.0.0:8080");
    axum::serve(listener, app).await.unwrap();
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy", "service": "bookstore-catalogue" }))
}

// -- Stock-management capability -------------------------------------

async fn add_books(
    State(cat): State<Arc<Catalogue>>,
    Json(books): Json<Vec<StockBookDto>>,
) -> Result<impl IntoResponse, AppError> {
    let books: Vec<_> = books.into_iter().map(catalogue::StockBook::from).collect();
    tokio::task::spawn_blocking(move || cat.add_books(Some(books)))
        .await
        .expect("add_books worker panicked")?;
    Ok(StatusCode::CREATED)
}

async fn get_books(State(cat): State<Arc<Catalogue>>) -> impl IntoResponse {
    let books = tokio::task::spawn_blocking(move || cat.get_books())
        .await
        .expect("get_books worker panicked");
    Json(books.into_iter().map(StockBookDto::from).collect::<Vec<_>>())
}

async fn remove_books(
    State(cat): State<Arc<Catalogue>>,
    Json(req): Json<IsbnSetRequest>,
) -> Result<impl IntoResponse, AppError> {
    tokio::task::spawn_blocking(move || cat.remove_books(Some(req.isbns)))
        .await
        .expect("remove_books worker panicked")?;
    Ok(StatusCode::NO_CONTENT)
}

async fn remove_all_books(State(cat): State<Arc<Catalogue>>) -> impl IntoResponse {
    tokio::task::spawn_blocking(move || cat.remove_all_books())
        .await
        .expect("remove_all_books worker panicked");
    StatusCode::NO_CONTENT
}

async fn get_books_by_isbn(
    State(cat): State<Arc<Catalogue>>,
    Json(req): Json<IsbnSetRequest>,
) -> Result<impl IntoResponse, AppError> {
    let books = tokio::task::spawn_blocking(move || cat.get_books_by_isbn(Some(req.isbns)))
        .await
        .expect("get_books_by_isbn worker panicked")?;
    Ok(Json(books.into_iter().map(StockBookDto::from).collect::<Vec<_>>()))
}

async fn get_books_in_demand(State(cat): State<Arc<Catalogue>>) -> Result<impl IntoResponse, AppError> {
    let books = tokio::task::spawn_blocking(move || cat.get_books_in_demand())
        .await
        .expect("get_books_in_demand worker panicked")?;
    Ok(Json(books.into_iter().map(StockBookDto::from).collect::<Vec<_>>()))
}

async fn add_copies(
    State(cat): State<Arc<Catalogue>>,
    Json(copies): Json<Vec<BookCopyDto>>,
) -> Result<impl IntoResponse, AppError> {
    let copies: Vec<_> = copies.into_iter().map(catalogue::BookCopy::from).collect();
    tokio::task::spawn_blocking(move || cat.add_copies(Some(copies)))
        .await
        .expect("add_copies worker panicked")?;
    Ok(StatusCode::NO_CONTENT)
}

async fn update_editor_picks(
    State(cat): State<Arc<Catalogue>>,
    Json(picks): Json<Vec<BookEditorPickDto>>,
) -> Result<impl IntoResponse, AppError> {
    let picks: Vec<_> = picks.into_iter().map(catalogue::BookEditorPick::from).collect();
    tokio::task::spawn_blocking(move || cat.update_editor_picks(Some(picks)))
        .await
        .expect("update_editor_picks worker panicked")?;
    Ok(StatusCode::NO_CONTENT)
}

// -- Purchase capability ----------------------------------------------

async fn buy_books(
    State(cat): State<Arc<Catalogue>>,
    Json(copies): Json<Vec<BookCopyDto>>,
) -> Result<impl IntoResponse, AppError> {
    let copies: Vec<_> = copies.into_iter().map(catalogue::BookCopy::from).collect();
    tokio::task::spawn_blocking(move || cat.buy_books(Some(copies)))
        .await
        .expect("buy_books worker panicked")?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_books_for_clients(
    State(cat): State<Arc<Catalogue>>,
    Json(req): Json<IsbnSetRequest>,
) -> Result<impl IntoResponse, AppError> {
    let books = tokio::task::spawn_blocking(move || cat.get_books_for_clients(Some(req.isbns)))
        .await
        .expect("get_books_for_clients worker panicked")?;
    Ok(Json(books.into_iter().map(BookDto::from).collect::<Vec<_>>()))
}

async fn rate_books(
    State(cat): State<Arc<Catalogue>>,
    Json(ratings): Json<Vec<BookRatingDto>>,
) -> Result<impl IntoResponse, AppError> {
    let ratings: Vec<_> = ratings.into_iter().map(catalogue::BookRating::from).collect();
    tokio::task::spawn_blocking(move || cat.rate_books(Some(ratings)))
        .await
        .expect("rate_books worker panicked")?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_editor_picks(
    State(cat): State<Arc<Catalogue>>,
    Query(q): Query<CountQuery>,
) -> Result<impl IntoResponse, AppError> {
    let picks = tokio::task::spawn_blocking(move || cat.get_editor_picks(q.k))
        .await
        .expect("get_editor_picks worker panicked")?;
    Ok(Json(picks.into_iter().map(BookDto::from).collect::<Vec<_>>()))
}

async fn get_top_rated_books(
    State(cat): State<Arc<Catalogue>>,
    Query(q): Query<CountQuery>,
) -> Result<impl IntoResponse, AppError> {
    let books = tokio::task::spawn_blocking(move || cat.get_top_rated_books(q.k))
        .await
        .expect("get_top_rated_books worker panicked")?;
    Ok(Json(books.into_iter().map(BookDto::from).collect::<Vec<_>>()))
}

/// Maps a [`CatalogueError`] onto an HTTP status and JSON body.
struct AppError(CatalogueError);

impl From<CatalogueError> for AppError {
    fn from(err: CatalogueError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            CatalogueError::NullInput
            | CatalogueError::InvalidIsbn(_)
            | CatalogueError::InvalidBookFields { .. }
            | CatalogueError::InvalidCopyCount { .. }
            | CatalogueError::InvalidRating { .. }
            | CatalogueError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            CatalogueError::IsbnNotPresent(_) => StatusCode::NOT_FOUND,
            CatalogueError::DuplicateIsbn(_) | CatalogueError::OutOfStock { .. } => StatusCode::CONFLICT,
        };

        let body = Json(serde_json::json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}
