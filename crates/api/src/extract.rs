//! Request extractors whose rejections render through [`AppError`].

use axum::extract::FromRequest;

use crate::error::AppError;

/// JSON body extractor for handlers that return [`AppError`].
///
/// Behaves like [`axum::Json`] but turns a missing content type, malformed
/// JSON, or a body of the wrong shape into a `{ error, code }` 400 instead of
/// axum's plain-text rejection.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
