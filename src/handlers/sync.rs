use axum::{debug_handler, extract::State};
use serde::Serialize;
use tracing::info;

use crate::{
    identity::{Caller, IdentityResolver},
    res::Success,
    store::{Message, MessageStore, UserEntry, RECENT_LIMIT},
    AppResult, AppState, ChatInfo,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncData {
    pub chat_info: ChatInfo,
    pub user_info: UserInfo,
    pub comments: Vec<Message>,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub me: String,
    pub users: Vec<UserEntry>,
}

/// Publishes the caller's profile and hands back everything a fresh client needs.
#[debug_handler(state = AppState)]
pub(crate) async fn sync(
    Caller(claim): Caller,
    State(identity): State<IdentityResolver>,
    State(store): State<MessageStore>,
    State(chat_info): State<ChatInfo>,
) -> AppResult<Success<SyncData>> {
    let user_id = claim.require_user_id()?;
    let profile = claim.require_profile()?;
    let me = identity.handle_for(user_id);

    store.upsert_user(&me, &profile).await?;
    let users = store.list_users().await?;
    let comments = store.recent_messages(RECENT_LIMIT).await?;

    info!(handle = %me, nick = %profile.nick, "synced");

    Ok(Success(SyncData {
        chat_info,
        user_info: UserInfo { me, users },
        comments,
    }))
}
