use axum::{
    debug_handler,
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
};
use serde::{Deserialize, Serialize};

use crate::{
    identity::Caller,
    poll::{self, WaitMode},
    res::Success,
    store::{Message, MessageStore},
    AppError, AppResult, AppState,
};

#[derive(Deserialize)]
pub(crate) struct FetchQuery {
    wt: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Comments {
    pub comments: Vec<Message>,
}

/// Long-polls for messages after `last`. An empty list means nothing arrived in time.
///
/// Undecodable segments and query strings are refused with the same envelope as a
/// non-numeric watermark.
#[debug_handler(state = AppState)]
pub(crate) async fn fetch(
    Caller(_): Caller,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<FetchQuery>, QueryRejection>,
    State(store): State<MessageStore>,
) -> AppResult<Success<Comments>> {
    let Path(last) = path.map_err(|err| {
        tracing::debug!(%err, "undecodable watermark");
        AppError::bad_parameter()
    })?;
    let Query(FetchQuery { wt }) = query.map_err(|err| {
        tracing::debug!(%err, "undecodable query");
        AppError::bad_parameter()
    })?;
    let watermark: i64 = last.trim().parse().map_err(|_| AppError::bad_parameter())?;

    let comments = poll::poll(&store, watermark, WaitMode::from_query(wt.as_deref())).await?;
    Ok(Success(Comments { comments }))
}

#[debug_handler(state = AppState)]
pub(crate) async fn missing_watermark(Caller(_): Caller) -> AppError {
    AppError::bad_parameter()
}
