//! Request extractors that reject with `AppError`
//!
//! Wrappers over axum's `Json`, `Path` and `Query` so malformed bodies, path
//! segments and query strings come back as `invalid_argument` JSON errors
//! instead of axum's plain-text rejections.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);
