//! In-memory stand-ins for the table and the avatar bucket, plus a tracing
//! layer for asserting on error logs.

use std::collections::HashMap;
use std::fmt::{self, Write as _};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::{get_item::GetItemError, put_item::PutItemError};
use aws_smithy_runtime_api::client::result::ConnectorError;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use crate::{AvatarSigner, PlayerRecord, PlayerStore, SignError, StoreError, WriteAck};

#[derive(Debug, Default)]
pub struct MemoryPlayerStore {
    records: Mutex<HashMap<String, PlayerRecord>>,
    gets: AtomicUsize,
    puts: AtomicUsize,
    failing: bool,
}

impl MemoryPlayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every call fails as if the table were unreachable. Records
    /// added with [`Self::with_record`] are kept but never returned.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn with_record(self, record: PlayerRecord) -> Self {
        self.lock().insert(record.player_name.clone(), record);
        self
    }

    pub fn record(&self, player_name: &str) -> Option<PlayerRecord> {
        self.lock().get(player_name).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get_calls(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn put_calls(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, PlayerRecord>> {
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl PlayerStore for MemoryPlayerStore {
    async fn get_player(&self, player_name: &str) -> Result<Option<PlayerRecord>, StoreError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(connection_refused::<GetItemError>());
        }
        Ok(self.record(player_name))
    }

    async fn put_player(&self, record: &PlayerRecord) -> Result<WriteAck, StoreError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(connection_refused::<PutItemError>());
        }
        self.lock().insert(record.player_name.clone(), record.clone());
        Ok(WriteAck::default())
    }
}

/// Cause carried by the errors of a failing [`MemoryPlayerStore`].
pub const CONNECTION_REFUSED: &str = "connection refused to dynamodb.eu-west-1";

fn connection_refused<E>() -> StoreError
where
    aws_sdk_dynamodb::Error: From<SdkError<E>>,
{
    let cause = ConnectorError::io(CONNECTION_REFUSED.into());
    let err: SdkError<E> = SdkError::dispatch_failure(cause);
    StoreError::Dynamo(err.into())
}

/// One recorded presign request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresignCall {
    pub key: String,
    pub content_type: Option<String>,
}

#[derive(Debug, Default)]
pub struct MemoryAvatarSigner {
    calls: Mutex<Vec<PresignCall>>,
    failing: bool,
}

impl MemoryAvatarSigner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<PresignCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl AvatarSigner for MemoryAvatarSigner {
    async fn presign_upload(
        &self,
        key: &str,
        content_type: Option<&str>,
    ) -> Result<String, SignError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(PresignCall {
                key: key.to_string(),
                content_type: content_type.map(str::to_string),
            });
        if self.failing {
            return Err(SignError::Unavailable("credentials expired".to_string()));
        }
        Ok(format!("https://avatars.example.com/{key}?X-Amz-Signature=test"))
    }
}

/// Records the fields of every `ERROR` level event seen by the subscriber it
/// is layered onto, one line per event.
#[derive(Debug, Clone, Default)]
pub struct ErrorEvents {
    lines: Arc<Mutex<Vec<String>>>,
}

impl ErrorEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.lines().len()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

struct LineVisitor(String);

impl Visit for LineVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if !self.0.is_empty() {
            self.0.push(' ');
        }
        let _ = write!(self.0, "{}={:?}", field.name(), value);
    }
}

impl<S: Subscriber> Layer<S> for ErrorEvents {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::ERROR {
            let mut visitor = LineVisitor(String::new());
            event.record(&mut visitor);
            self.lines
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(visitor.0);
        }
    }
}
