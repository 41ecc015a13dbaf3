use lambda_http::{Body, Error, Request, RequestExt, Response};
use player_shared::{avatar_key, AvatarSigner, PlayerRecord, PlayerStore};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};

pub(crate) const PLAYER_ID: &str = "playerId";
const SAVE_ERROR: &str = "Error saving player";

/// Put body. Fields are taken as whatever JSON was sent; only presence matters.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct PlayerUpdate {
    location: Option<Value>,
    #[serde(rename = "realName")]
    real_name: Option<Value>,
    newavatar: Option<Value>,
    #[serde(rename = "fileType")]
    file_type: Option<Value>,
}

/// Each put is exactly one of these, so it makes exactly one external call.
#[derive(Debug, PartialEq)]
pub(crate) enum PutPlayerRequest {
    UploadAvatar {
        key: String,
        content_type: Option<String>,
    },
    WriteProfile(PlayerRecord),
}

impl PutPlayerRequest {
    /// Any `newavatar` other than `""` selects the upload; profile fields are
    /// then ignored. A non-string `fileType` is passed on as its JSON text.
    pub(crate) fn new(player_id: &str, update: PlayerUpdate) -> Self {
        match update.newavatar {
            Some(avatar) if avatar != "" => Self::UploadAvatar {
                key: avatar_key(player_id),
                content_type: update.file_type.map(|v| match v {
                    Value::String(s) => s,
                    other => other.to_string(),
                }),
            },
            _ => Self::WriteProfile(PlayerRecord {
                location: update.location,
                real_name: update.real_name,
                ..PlayerRecord::new(player_id)
            }),
        }
    }
}

#[derive(Serialize)]
struct SignedUrl {
    signedurl: String,
}

fn json_response<T: Serialize>(value: &T) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(200)
        .header("content-type", "application/json")
        .body(Body::Text(serde_json::to_string(value)?))?)
}

pub(crate) async fn put_player<S, A>(
    store: &S,
    signer: &A,
    request: PutPlayerRequest,
) -> Result<Response<Body>, Error>
where
    S: PlayerStore,
    A: AvatarSigner,
{
    match request {
        PutPlayerRequest::UploadAvatar { key, content_type } => {
            // Signing failures fail the invocation instead of becoming a 500.
            let signedurl = signer.presign_upload(&key, content_type.as_deref()).await?;
            info!(key = %key, "issued avatar upload url");
            json_response(&SignedUrl { signedurl })
        }
        PutPlayerRequest::WriteProfile(record) => match store.put_player(&record).await {
            Ok(ack) => json_response(&ack),
            Err(e) => {
                error!(player_id = %record.player_name, error = %e, "error saving player");
                Ok(Response::builder()
                    .status(500)
                    .header("content-type", "text/plain")
                    .body(Body::Text(SAVE_ERROR.to_string()))?)
            }
        },
    }
}

pub(crate) async fn function_handler<S, A>(
    store: &S,
    signer: &A,
    event: Request,
) -> Result<Response<Body>, Error>
where
    S: PlayerStore,
    A: AvatarSigner,
{
    let params = event.path_parameters();
    let player_id = params
        .first(PLAYER_ID)
        .ok_or("Missing playerId path parameter")?;

    let update: PlayerUpdate = serde_json::from_slice(event.body().as_ref())?;

    put_player(store, signer, PutPlayerRequest::new(player_id, update)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use player_shared::testing::{
        ErrorEvents, MemoryAvatarSigner, MemoryPlayerStore, PresignCall, CONNECTION_REFUSED,
    };
    use serde_json::json;
    use std::collections::HashMap;
    use tracing_subscriber::layer::SubscriberExt;

    fn request(player_id: &str, body: Value) -> Request {
        Request::new(Body::Text(body.to_string())).with_path_parameters(HashMap::from([(
            PLAYER_ID.to_string(),
            player_id.to_string(),
        )]))
    }

    fn text(response: &Response<Body>) -> &str {
        match response.body() {
            Body::Text(text) => text,
            other => panic!("expected a text body, got {other:?}"),
        }
    }

    fn carol(location: &str) -> Value {
        json!({ "location": location, "realName": "Carol C", "newavatar": "" })
    }

    fn carol_record(location: &str) -> PlayerRecord {
        PlayerRecord {
            location: Some(json!(location)),
            real_name: Some(json!("Carol C")),
            ..PlayerRecord::new("carol")
        }
    }

    fn update(body: Value) -> PlayerUpdate {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn empty_or_missing_avatar_selects_profile_write() {
        assert_eq!(
            PutPlayerRequest::new("carol", update(json!({ "location": "LA" }))),
            PutPlayerRequest::WriteProfile(PlayerRecord {
                location: Some(json!("LA")),
                ..PlayerRecord::new("carol")
            })
        );

        for avatar in [json!(""), Value::Null] {
            let request = PutPlayerRequest::new("carol", update(json!({ "newavatar": avatar })));
            assert!(matches!(request, PutPlayerRequest::WriteProfile(_)));
        }
    }

    #[test]
    fn avatar_selects_upload_and_drops_profile_fields() {
        let body = json!({
            "location": "LA",
            "realName": "Dave D",
            "newavatar": "x",
            "fileType": "image/jpeg",
        });
        assert_eq!(
            PutPlayerRequest::new("dave", update(body)),
            PutPlayerRequest::UploadAvatar {
                key: "dave/avatar.jpg".to_string(),
                content_type: Some("image/jpeg".to_string()),
            }
        );
    }

    #[test]
    fn any_non_empty_avatar_value_selects_upload() {
        for avatar in [json!(true), json!(0), json!("0"), json!({})] {
            let request = PutPlayerRequest::new("dave", update(json!({ "newavatar": avatar })));
            assert!(matches!(request, PutPlayerRequest::UploadAvatar { .. }));
        }
    }

    #[tokio::test]
    async fn writes_profile() {
        let store = MemoryPlayerStore::new();
        let signer = MemoryAvatarSigner::new();

        let response = function_handler(&store, &signer, request("carol", carol("LA")))
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(text(&response), "{}");
        assert_eq!(store.put_calls(), 1);
        assert!(signer.calls().is_empty());
        assert_eq!(store.record("carol"), Some(carol_record("LA")));
    }

    #[tokio::test]
    async fn profile_fields_are_stored_verbatim() {
        let store = MemoryPlayerStore::new();
        let signer = MemoryAvatarSigner::new();
        let body = json!({ "location": 42, "realName": ["C", "C"], "newavatar": "" });

        let response = function_handler(&store, &signer, request("carol", body))
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(
            store.record("carol"),
            Some(PlayerRecord {
                location: Some(json!(42)),
                real_name: Some(json!(["C", "C"])),
                ..PlayerRecord::new("carol")
            })
        );
    }

    #[tokio::test]
    async fn issues_avatar_upload_url() {
        let store = MemoryPlayerStore::new();
        let signer = MemoryAvatarSigner::new();
        let body = json!({ "newavatar": "x", "fileType": "image/jpeg" });

        let response = function_handler(&store, &signer, request("dave", body))
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(store.put_calls(), 0);
        assert_eq!(
            signer.calls(),
            vec![PresignCall {
                key: "dave/avatar.jpg".to_string(),
                content_type: Some("image/jpeg".to_string()),
            }]
        );

        let body: Value = serde_json::from_str(text(&response)).unwrap();
        let url = "https://avatars.example.com/dave/avatar.jpg?X-Amz-Signature=test";
        assert_eq!(body, json!({ "signedurl": url }));
    }

    #[tokio::test]
    async fn boolean_avatar_flag_issues_upload_url() {
        let store = MemoryPlayerStore::new();
        let signer = MemoryAvatarSigner::new();
        let body = json!({ "newavatar": true, "fileType": "image/png", "location": "LA" });

        let response = function_handler(&store, &signer, request("dave", body))
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(store.put_calls(), 0);
        assert_eq!(signer.calls().len(), 1);
    }

    #[tokio::test]
    async fn store_failure_is_a_500_with_one_error_log() {
        let errors = ErrorEvents::new();
        let _guard = tracing::subscriber::set_default(
            tracing_subscriber::registry().with(errors.clone()),
        );
        let store = MemoryPlayerStore::failing().with_record(carol_record("LA"));
        let signer = MemoryAvatarSigner::new();

        let response = function_handler(&store, &signer, request("carol", carol("SF")))
            .await
            .unwrap();

        assert_eq!(response.status(), 500);
        assert_eq!(text(&response), SAVE_ERROR);
        assert_eq!(errors.count(), 1);
        let line = &errors.lines()[0];
        assert!(line.contains(CONNECTION_REFUSED), "{line}");
        assert_eq!(store.len(), 1);
        assert_eq!(store.record("carol"), Some(carol_record("LA")));
    }

    #[tokio::test]
    async fn signing_failure_fails_the_invocation() {
        let store = MemoryPlayerStore::new();
        let signer = MemoryAvatarSigner::failing();
        let body = json!({ "newavatar": "x", "fileType": "image/png" });

        let result = function_handler(&store, &signer, request("dave", body)).await;

        assert!(result.is_err());
        assert_eq!(store.put_calls(), 0);
    }

    #[tokio::test]
    async fn repeated_put_replaces_the_record() {
        let store = MemoryPlayerStore::new();
        let signer = MemoryAvatarSigner::new();

        function_handler(&store, &signer, request("carol", carol("LA")))
            .await
            .unwrap();
        function_handler(&store, &signer, request("carol", carol("SF")))
            .await
            .unwrap();
        assert_eq!(store.record("carol"), Some(carol_record("SF")));

        function_handler(
            &store,
            &signer,
            request("carol", json!({ "realName": "Carol C" })),
        )
        .await
        .unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.put_calls(), 3);
        assert_eq!(
            store.record("carol"),
            Some(PlayerRecord {
                real_name: Some(json!("Carol C")),
                ..PlayerRecord::new("carol")
            })
        );
    }

    #[tokio::test]
    async fn unparsable_body_fails_the_invocation() {
        let store = MemoryPlayerStore::new();
        let signer = MemoryAvatarSigner::new();
        let event = Request::new(Body::Text("not json".to_string())).with_path_parameters(
            HashMap::from([(PLAYER_ID.to_string(), "carol".to_string())]),
        );

        let result = function_handler(&store, &signer, event).await;

        assert!(result.is_err());
        assert_eq!(store.put_calls(), 0);
        assert!(signer.calls().is_empty());
    }
}
