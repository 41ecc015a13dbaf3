use lambda_http::{run, service_fn, tracing, Error};
use player_shared::{Config, DynamoPlayerStore, S3AvatarSigner};
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
    let signer = S3AvatarSigner::new(
        aws_sdk_s3::Client::new(&sdk_config),
        config.require_avatar_bucket()?,
    );

    run(service_fn(|event| function_handler(&store, &signer, event))).await
}
