use std::str::FromStr;

use tracing::warn;

use crate::analytics::ClickEvent;
use crate::storage::models::{
    CartItem, Product, ProductInput, Profile, SavedProduct, Subscriber, SubscriberStatus,
};
use migration::entities::{
    affiliate_click, cart_item, newsletter_subscriber, product, profile, saved_product,
};

/// 将 Sea-ORM Model 转换为 Product
pub fn model_to_product(model: product::Model) -> Product {
    Product {
        id: model.id,
        name: model.name,
        description: model.description,
        category: model.category,
        price: model.price,
        affiliate_link: model.affiliate_link,
        image_url: model.image_url,
        rating: model.rating,
        review_count: model.review_count,
        is_featured: model.is_featured,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

/// 将 ProductInput 转换为 ActiveModel（id 和 created_at 仅在新建时写入）
pub fn product_input_to_active_model(
    input: &ProductInput,
    id: &str,
    is_new: bool,
) -> product::ActiveModel {
    use sea_orm::ActiveValue::*;

    let now = chrono::Utc::now();
    product::ActiveModel {
        id: Set(id.to_string()),
        name: Set(input.name.clone()),
        description: Set(input.description.clone()),
        category: Set(input.category.clone()),
        price: Set(input.price),
        affiliate_link: Set(input.affiliate_link.clone()),
        image_url: Set(input.image_url.clone()),
        rating: Set(input.rating),
        review_count: Set(input.review_count),
        is_featured: Set(input.is_featured),
        created_at: if is_new { Set(now) } else { NotSet },
        updated_at: Set(now),
    }
}

pub fn model_to_click(model: affiliate_click::Model) -> ClickEvent {
    ClickEvent {
        id: model.id,
        product_id: model.product_id,
        user_id: model.user_id,
        ip_address: model.ip_address,
        user_agent: model.user_agent,
        created_at: model.created_at,
        conversion: model.conversion,
        revenue: model.revenue,
    }
}

pub fn model_to_profile(model: profile::Model) -> Profile {
    Profile {
        id: model.id,
        email: model.email,
        full_name: model.full_name,
        is_admin: model.is_admin,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

pub fn model_to_cart_item(model: cart_item::Model) -> CartItem {
    CartItem {
        id: model.id,
        user_id: model.user_id,
        product_id: model.product_id,
        quantity: model.quantity,
        created_at: model.created_at,
    }
}

pub fn model_to_saved_product(model: saved_product::Model) -> SavedProduct {
    SavedProduct {
        id: model.id,
        user_id: model.user_id,
        product_id: model.product_id,
        created_at: model.created_at,
    }
}

pub fn model_to_subscriber(model: newsletter_subscriber::Model) -> Subscriber {
    // 未知状态按已退订处理，避免误发邮件
    let status = SubscriberStatus::from_str(&model.status).unwrap_or_else(|e| {
        warn!("{} (subscriber {})", e, model.id);
        SubscriberStatus::Unsubscribed
    });

    Subscriber {
        id: model.id,
        email: model.email,
        full_name: model.full_name,
        status,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}
