use lambda_http::{run, service_fn, tracing, Error};
use player_shared::{Config, DynamoPlayerStore};
mod http_handler;
use http_handler::function_handler;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();

    let config = Config::from_env()?;
    let sdk_config = config.load_sdk_config().await;
    let store = DynamoPlayerStore::new(
        aws_sdk_dynamodb::Client::new(&sdk_config),
        &config.player_table,
    );

    run(service_fn(|event| function_handler(&store, event))).await
}
