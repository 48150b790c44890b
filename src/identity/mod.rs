use std::sync::Arc;

use hmac::{Hmac, Mac};
use serde_json::{Map, Number, Value};
use sha1::Sha1;

use crate::{AppError, AppResult};

mod caller;
pub mod token;

pub use caller::{Caller, TOKEN_HEADER};

type HmacSha1 = Hmac<Sha1>;

/// Claims carried by a verified credential. Lives for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityClaim {
    user_id: Option<String>,
    pub nick: Option<String>,
    pub nickname_color: Option<String>,
    pub profile_image: Option<String>,
}

/// Display fields published in the user directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub nick: String,
    pub nickname_color: String,
    pub profile_image: String,
}

impl IdentityClaim {
    fn from_claims(claims: &Map<String, Value>) -> Self {
        Self {
            user_id: text_claim(claims, "idx"),
            nick: text_claim(claims, "nick"),
            nickname_color: text_claim(claims, "nicknameColor"),
            profile_image: text_claim(claims, "profileImage"),
        }
    }

    pub fn require_user_id(&self) -> AppResult<&str> {
        self.user_id.as_deref().ok_or(AppError::MalformedClaim)
    }

    pub fn require_profile(&self) -> AppResult<Profile> {
        match (&self.nick, &self.nickname_color, &self.profile_image) {
            (Some(nick), Some(nickname_color), Some(profile_image)) => Ok(Profile {
                nick: nick.clone(),
                nickname_color: nickname_color.clone(),
                profile_image: profile_image.clone(),
            }),
            _ => Err(AppError::MalformedClaim),
        }
    }
}

/// A claim is present when it is truthy: `null`, `false`, `0` and `""` count as absent.
/// Numbers and `true` are rendered the way they were concatenated into handles before.
/// Arrays and objects are not usable as text and count as absent too.
fn text_claim(claims: &Map<String, Value>, key: &str) -> Option<String> {
    match claims.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(number_text(n)),
        Value::Bool(true) => Some("true".to_owned()),
        _ => None,
    }
}

/// Integral floats drop their fraction (`1.0` -> `"1"`).
fn number_text(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => (f as i64).to_string(),
        _ => n.to_string(),
    }
}

#[derive(Clone)]
pub struct IdentityResolver {
    secret: Arc<[u8]>,
    salt: Arc<str>,
}

impl IdentityResolver {
    pub fn new(secret: impl AsRef<[u8]>, salt: impl Into<String>) -> Self {
        Self {
            secret: Arc::from(secret.as_ref()),
            salt: Arc::from(salt.into()),
        }
    }

    pub fn resolve(&self, credential: &str) -> AppResult<IdentityClaim> {
        let claims = token::verify(credential, &self.secret)?;
        Ok(IdentityClaim::from_claims(&claims))
    }

    /// Pseudonymous handle for `user_id`: hex HMAC-SHA1 keyed with `salt || user_id`
    /// over an empty message.
    pub fn handle_for(&self, user_id: &str) -> String {
        let key = [self.salt.as_bytes(), user_id.as_bytes()].concat();
        let mac = HmacSha1::new_from_slice(&key).expect("HMAC can take key of any size");
        hex::encode(mac.finalize().into_bytes())
    }

    pub fn sign(&self, claims: &Value) -> AppResult<String> {
        token::encode(claims, &self.secret)
    }
}
