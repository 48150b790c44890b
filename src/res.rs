use axum::{response::{IntoResponse, Response}, Json};
use serde::Serialize;

/// `{ "success": true, "data": ... }`
pub struct Success<T>(pub T);

#[derive(Serialize)]
struct Envelope<T> {
    success: bool,
    data: T,
}

impl<T: Serialize> IntoResponse for Success<T> {
    fn into_response(self) -> Response {
        Json(Envelope { success: true, data: self.0 }).into_response()
    }
}
