use actix_web::http::StatusCode;
use actix_web::{Responder, web};
use std::sync::Arc;

use super::error_code::ErrorCode;
use super::helpers::{error_from_affilink, error_with_code, success_with_message};
use super::types::{SubscribeRequest, UnsubscribeRequest};
use crate::errors::AffilinkError;
use crate::services::{NewsletterService, SubscribeOutcome};

fn newsletter_error(err: AffilinkError) -> actix_web::HttpResponse {
    match err {
        AffilinkError::Validation(_) => error_with_code(&err, ErrorCode::InvalidEmail),
        AffilinkError::Conflict(_) => error_with_code(&err, ErrorCode::AlreadySubscribed),
        AffilinkError::NotFound(_) => error_with_code(&err, ErrorCode::SubscriberNotFound),
        _ => error_from_affilink(&err),
    }
}

pub async fn subscribe(
    payload: web::Json<SubscribeRequest>,
    service: web::Data<Arc<NewsletterService>>,
) -> impl Responder {
    let SubscribeRequest { email, full_name } = payload.into_inner();

    match service.subscribe(&email, full_name).await {
        Ok(outcome) => {
            let message = match outcome {
                SubscribeOutcome::Created(_) => "Successfully subscribed!",
                SubscribeOutcome::Resubscribed(_) => "Successfully resubscribed!",
            };
            success_with_message(
                StatusCode::CREATED,
                message,
                Some(outcome.subscriber().clone()),
            )
        }
        Err(e) => newsletter_error(e),
    }
}

pub async fn unsubscribe(
    payload: web::Json<UnsubscribeRequest>,
    service: web::Data<Arc<NewsletterService>>,
) -> impl Responder {
    match service.unsubscribe(&payload.email).await {
        Ok(subscriber) => success_with_message(
            StatusCode::OK,
            "Successfully unsubscribed",
            Some(subscriber),
        ),
        Err(e) => newsletter_error(e),
    }
}
