use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserEntry {
    pub hash: String,
    pub nick: String,
    #[sqlx(rename = "nicknameColor")]
    pub nickname_color: String,
    #[sqlx(rename = "profileImage")]
    pub profile_image: String,

    // unique: hash
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Message {
    pub no: i64,
    pub writer: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
    pub data: String,
    pub date: String,

    // unique: no, assigned on insert and never reused
}
