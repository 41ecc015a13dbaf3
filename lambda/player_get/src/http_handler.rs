use lambda_http::{Body, Error, Request, RequestExt, Response};
use player_shared::PlayerStore;
use tracing::{debug, error};

pub(crate) const PLAYER_ID: &str = "playerId";
const RETRIEVE_ERROR: &str = "Error retrieving player";

/// Looks up one player. A missing record is answered with `{}`, not a 404.
pub(crate) async fn get_player<S: PlayerStore>(
    store: &S,
    player_id: &str,
) -> Result<Response<Body>, Error> {
    let body = match store.get_player(player_id).await {
        Ok(Some(record)) => serde_json::to_string(&record)?,
        Ok(None) => {
            debug!(player_id, "no such player");
            "{}".to_string()
        }
        Err(e) => {
            error!(player_id, error = %e, "Error getting player");
            return Ok(Response::builder()
                .status(500)
                .header("content-type", "text/plain")
                .body(Body::Text(RETRIEVE_ERROR.to_string()))?);
        }
    };

    Ok(Response::builder()
        .status(200)
        .header("content-type", "application/json")
        .body(Body::Text(body))?)
}

pub(crate) async fn function_handler<S: PlayerStore>(
    store: &S,
    event: Request,
) -> Result<Response<Body>, Error> {
    let params = event.path_parameters();
    let player_id = params
        .first(PLAYER_ID)
        .ok_or("Missing playerId path parameter")?;

    get_player(store, player_id).await
}
