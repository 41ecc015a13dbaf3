use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::StoreError;

/// Partition key of the player table.
pub const PLAYER_NAME: &str = "playerName";

/// A player profile as stored in the table, keyed by `playerName`.
///
/// Profile fields hold whatever JSON the caller sent. Attributes written by
/// anything else are kept in `extra` so a read returns the whole item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    #[serde(rename = "playerName")]
    pub player_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Value>,
    #[serde(rename = "realName", default, skip_serializing_if = "Option::is_none")]
    pub real_name: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PlayerRecord {
    pub fn new(player_name: impl Into<String>) -> Self {
        Self {
            player_name: player_name.into(),
            location: None,
            real_name: None,
            extra: Map::new(),
        }
    }

    pub fn to_item(&self) -> Result<HashMap<String, AttributeValue>, StoreError> {
        Ok(serde_dynamo::to_item(self)?)
    }

    pub fn from_item(item: HashMap<String, AttributeValue>) -> Result<Self, StoreError> {
        Ok(serde_dynamo::from_item(item)?)
    }
}

/// Object key of a player's avatar image in the avatar bucket.
pub fn avatar_key(player_name: &str) -> String {
    format!("{player_name}/avatar.jpg")
}

/// Acknowledgement of a put. The table returns nothing for a plain overwrite,
/// so this serializes to `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WriteAck {}
