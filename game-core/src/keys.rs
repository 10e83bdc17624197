//! Opaque, URL-safe references to stored records.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use game_types::GameError;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    User,
    Game,
}

impl RecordKind {
    fn name(self) -> &'static str {
        match self {
            RecordKind::User => "User",
            RecordKind::Game => "Game",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "User" => Some(RecordKind::User),
            "Game" => Some(RecordKind::Game),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordKey {
    pub kind: RecordKind,
    pub id: Uuid,
}

impl RecordKey {
    pub fn new(kind: RecordKind, id: Uuid) -> Self {
        Self { kind, id }
    }

    pub fn encode(&self) -> String {
        URL_SAFE_NO_PAD.encode(format!("{}:{}", self.kind.name(), self.id.as_hyphenated()))
    }

    pub fn decode(encoded: &str) -> Result<Self, GameError> {
        let invalid = || GameError::InvalidKeyEncoding {
            key: encoded.to_string(),
        };

        let bytes = URL_SAFE_NO_PAD.decode(encoded).map_err(|_| invalid())?;
        let raw = String::from_utf8(bytes).map_err(|_| invalid())?;
        let (kind, id) = raw.split_once(':').ok_or_else(invalid)?;
        let kind = RecordKind::from_name(kind).ok_or_else(invalid)?;
        let id = Uuid::parse_str(id).map_err(|_| invalid())?;

        Ok(Self { kind, id })
    }
}

pub fn encode_key(kind: RecordKind, id: Uuid) -> String {
    RecordKey::new(kind, id).encode()
}

/// Decode `encoded`, requiring it to reference a record of `kind`
pub fn decode_key(kind: RecordKind, encoded: &str) -> Result<Uuid, GameError> {
    let key = RecordKey::decode(encoded)?;
    if key.kind != kind {
        return Err(GameError::InvalidKeyEncoding {
            key: encoded.to_string(),
        });
    }
    Ok(key.id)
}
