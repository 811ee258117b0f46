//! 后台用户与订阅者列表

use actix_web::{Responder, web};
use std::sync::Arc;

use crate::api::services::helpers::api_result;
use crate::services::{DashboardService, NewsletterService};

pub async fn list_users(service: web::Data<Arc<DashboardService>>) -> impl Responder {
    api_result(service.users().await)
}

pub async fn list_subscribers(service: web::Data<Arc<NewsletterService>>) -> impl Responder {
    api_result(service.list_subscribers().await)
}
