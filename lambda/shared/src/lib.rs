//! Pieces shared by the `player_get` and `player_put` functions: the player
//! record, configuration, and the clients for the table and the avatar bucket.

pub mod avatar;
pub mod config;
pub mod error;
pub mod player;
pub mod store;

#[cfg(feature = "test-util")]
pub mod testing;

pub use avatar::{AvatarSigner, S3AvatarSigner};
pub use config::Config;
pub use error::{ConfigError, SignError, StoreError};
pub use player::{avatar_key, PlayerRecord, WriteAck};
pub use store::{DynamoPlayerStore, PlayerStore};
