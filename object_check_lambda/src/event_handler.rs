use std::time::{Duration, SystemTime};

use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::Client as S3Client;
use lambda_http::http::header;
use lambda_http::http::StatusCode;
use lambda_http::{tracing, Body, Error, Request, RequestExt, Response};

use crate::error::CheckError;
use crate::event::{decode_envelope, ObjectRef};

/// Deadline of the current invocation, if the request came through the Lambda runtime.
fn invocation_deadline(event: &Request) -> Option<SystemTime> {
    event
        .lambda_context_ref()
        .filter(|ctx| ctx.deadline > 0)
        .map(|ctx| SystemTime::UNIX_EPOCH + Duration::from_millis(ctx.deadline))
}

/// Issues a single GetObject for `object`. The response body is dropped unread.
pub(crate) async fn check_object(
    s3_client: &S3Client,
    object: &ObjectRef,
    deadline: Option<SystemTime>,
) -> Result<(), CheckError> {
    let request = s3_client
        .get_object()
        .bucket(&object.bucket)
        .key(&object.key)
        .send();
    let output = match deadline {
        None => request.await?,
        Some(deadline) => {
            let remaining = deadline
                .duration_since(SystemTime::now())
                .map_err(|_| CheckError::DeadlineExceeded)?;
            if remaining.is_zero() {
                return Err(CheckError::DeadlineExceeded);
            }
            // dropping the send future on expiry aborts the in-flight request
            tokio::time::timeout(remaining, request)
                .await
                .map_err(|_| CheckError::DeadlineExceeded)??
        }
    };
    drop(output.body);
    Ok(())
}

fn error_response(err: &CheckError) -> Result<Response<Body>, Error> {
    let response = Response::builder()
        .status(err.status_code())
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(header::X_CONTENT_TYPE_OPTIONS, "nosniff")
        .body(Body::from(format!("{}\n", err.public_message())))?;
    Ok(response)
}

pub(crate) async fn function_handler(
    event: Request,
    s3_client: &S3Client,
) -> Result<Response<Body>, Error> {
    let deadline = invocation_deadline(&event);
    let body: &[u8] = event.body().as_ref();

    let envelope = match decode_envelope(body) {
        Ok(envelope) => envelope,
        Err(err) => {
            tracing::warn!(error = %err, "Rejecting request body");
            return error_response(&err);
        }
    };
    let object = match envelope.first_object() {
        Ok(object) => object,
        Err(err) => {
            tracing::warn!(error = %err, "Rejecting request body");
            return error_response(&err);
        }
    };
    if envelope.records.len() > 1 {
        tracing::debug!(
            ignored = envelope.records.len() - 1,
            "Only the first S3 record is checked"
        );
    }

    if let Err(err) = check_object(s3_client, &object, deadline).await {
        tracing::error!(
            bucket = %object.bucket,
            key = %object.key,
            error = %DisplayErrorContext(&err),
            "Failed to get S3 object"
        );
        return error_response(&err);
    }

    tracing::info!(bucket = %object.bucket, key = %object.key, "Found S3 object");
    let response = Response::builder()
        .status(StatusCode::OK)
        .body(Body::Empty)?;
    Ok(response)
}
