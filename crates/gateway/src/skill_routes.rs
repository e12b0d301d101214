use {
    axum::{
        Json,
        body::Bytes,
        extract::State,
        http::StatusCode,
        response::{IntoResponse, Response},
    },
    findmy_skill::Error,
    tracing::{error, warn},
};

use crate::server::AppState;

/// Handle one skill turn. The body is read raw so that a missing content
/// type or unparseable JSON gets the same generic 400 as any other
/// malformed envelope.
pub async fn skill_turn_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let payload: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, body_len = body.len(), "skill request body is not JSON");
            let status = StatusCode::BAD_REQUEST;
            return (status, generic_body(status)).into_response();
        },
    };

    match state.skill.handle_value(payload).await {
        Ok(envelope) => Json(envelope).into_response(),
        Err(e) => {
            let status = status_for(&e);
            if status.is_server_error() {
                error!(error = %e, "skill turn failed");
            } else {
                warn!(error = %e, "skill turn rejected");
            }
            (status, generic_body(status)).into_response()
        },
    }
}

fn status_for(err: &Error) -> StatusCode {
    match err {
        Error::InvalidApplication { .. } => StatusCode::FORBIDDEN,
        Error::UnrecognizedIntent { .. } | Error::InvalidInput { .. } | Error::SerdeJson(_) => {
            StatusCode::BAD_REQUEST
        },
        Error::AccountService { .. } | Error::External { .. } => StatusCode::BAD_GATEWAY,
    }
}

fn generic_body(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("request failed")
}
