use axum::{debug_handler, extract::{rejection::JsonRejection, State}, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::{
    identity::{Caller, IdentityResolver},
    res::Success,
    store::MessageStore,
    AppError, AppResult, AppState,
};

#[derive(Deserialize)]
pub(crate) struct PostBody {
    #[serde(rename = "type")]
    kind: Option<Value>,
    data: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Posted {
    pub comment_insert_no: i64,
}

/// Strings pass through; other non-null values are stored as their JSON text.
fn present(value: Option<Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

#[debug_handler(state = AppState)]
pub(crate) async fn post(
    Caller(claim): Caller,
    State(identity): State<IdentityResolver>,
    State(store): State<MessageStore>,
    body: Result<Json<PostBody>, JsonRejection>,
) -> AppResult<Success<Posted>> {
    let writer = identity.handle_for(claim.require_user_id()?);

    let Ok(Json(PostBody { kind, data })) = body else {
        return Err(AppError::InsufficientParameters);
    };
    let (Some(kind), Some(data)) = (present(kind), present(data)) else {
        return Err(AppError::InsufficientParameters);
    };

    let comment_insert_no = store.insert_message(&writer, &kind, &data).await?;
    debug!(writer = %writer, no = comment_insert_no, "message posted");

    Ok(Success(Posted { comment_insert_no }))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn empty_and_null_fields_are_missing() {
        assert_eq!(present(None), None);
        assert_eq!(present(Some(Value::Null)), None);
        assert_eq!(present(Some(json!(""))), None);
        assert_eq!(present(Some(json!("hi"))).as_deref(), Some("hi"));
        assert_eq!(present(Some(json!({"url": "a.png"}))).as_deref(), Some(r#"{"url":"a.png"}"#));
    }
}
