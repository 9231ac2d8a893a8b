//! Contact controller.
//!
//! Every handler hands the data-layer response straight back to the caller.
//! Upstream error responses are forwarded as they are; other failures become
//! a JSON [`ErrorResponse`](caravel_core::ErrorResponse).

use crate::{
    extractors::Context,
    responses::{render, AppError},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use bytes::Bytes;
use caravel_core::{BoxResponse, CaravelResult, RequestContext};
use tracing::{debug, error};

/// Creates the contact router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/contact", post(create_contact).put(update_contact))
        .route("/v1/contact/:contactid", get(get_contact))
}

async fn get_contact(
    State(state): State<AppState>,
    Context(ctx): Context,
    Path(contact_id): Path<String>,
) -> Response {
    debug!(parent: ctx.span(), contact_id = %contact_id, "Get contact request");

    let result = state.data_source.get(&ctx, &contact_id).await;
    respond(&ctx, result)
}

async fn create_contact(State(state): State<AppState>, Context(ctx): Context, body: Bytes) -> Response {
    debug!(parent: ctx.span(), "Create contact request");

    let result = state.data_source.create(&ctx, body).await;
    respond(&ctx, result)
}

async fn update_contact(State(state): State<AppState>, Context(ctx): Context, body: Bytes) -> Response {
    debug!(parent: ctx.span(), "Update contact request");

    let result = state.data_source.update(&ctx, body).await;
    respond(&ctx, result)
}

fn respond(ctx: &RequestContext, result: CaravelResult<BoxResponse>) -> Response {
    match result {
        Ok(response) => write_response(ctx, response),
        Err(mut err) => {
            error!(parent: ctx.span(), error = %err, "Contact request failed");
            match err.take_upstream_response() {
                Some(response) => write_response(ctx, response),
                None => AppError::from(err).with_trace_id(ctx.request_id()).into_response(),
            }
        }
    }
}

fn write_response(ctx: &RequestContext, response: BoxResponse) -> Response {
    render(response.as_ref()).unwrap_or_else(|e| {
        error!(parent: ctx.span(), error = %e, "Failed to write contact response");
        AppError::from(e).with_trace_id(ctx.request_id()).into_response()
    })
}
