use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::info;

use crate::models::response::GatewayResponse;
use crate::relay::Relay;

pub const DEFAULT_REGION: &str = "us-east-1";

/// Extracts the region from a function ARN (`arn:aws:lambda:<region>:<account>:function:<name>`).
pub fn region_from_arn(arn: &str) -> &str {
    let mut parts = arn.split(':');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some("arn"), Some(_), Some("lambda"), Some(region)) if !region.is_empty() => region,
        _ => DEFAULT_REGION,
    }
}

/// Serves invocations until the runtime shuts the process down.
pub async fn run(relay: Relay) -> Result<(), Error> {
    let relay = &relay;
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        info!(
            region = region_from_arn(&event.context.invoked_function_arn),
            request_id = %event.context.request_id,
            "Invocation started"
        );
        Ok::<GatewayResponse, Error>(relay.handle(event.payload).await)
    }))
    .await
}
