use std::future::Future;

use aws_sdk_dynamodb::{types::AttributeValue, Client};

use crate::{player::PLAYER_NAME, PlayerRecord, StoreError, WriteAck};

/// Point reads and full-replace writes of player records, keyed by name.
pub trait PlayerStore {
    fn get_player(
        &self,
        player_name: &str,
    ) -> impl Future<Output = Result<Option<PlayerRecord>, StoreError>> + Send;

    fn put_player(
        &self,
        record: &PlayerRecord,
    ) -> impl Future<Output = Result<WriteAck, StoreError>> + Send;
}

pub struct DynamoPlayerStore {
    client: Client,
    table: String,
}

impl DynamoPlayerStore {
    pub fn new(client: Client, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }
}

impl PlayerStore for DynamoPlayerStore {
    async fn get_player(&self, player_name: &str) -> Result<Option<PlayerRecord>, StoreError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table)
            .key(PLAYER_NAME, AttributeValue::S(player_name.to_string()))
            .send()
            .await
            .map_err(aws_sdk_dynamodb::Error::from)?;

        output.item.map(PlayerRecord::from_item).transpose()
    }

    async fn put_player(&self, record: &PlayerRecord) -> Result<WriteAck, StoreError> {
        self.client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(record.to_item()?))
            .send()
            .await
            .map_err(aws_sdk_dynamodb::Error::from)?;

        Ok(WriteAck::default())
    }
}
