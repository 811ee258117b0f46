//! API 请求 / 响应类型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::storage::ProductFilter;

/// 统一响应信封
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    pub data: Option<T>,
}

/// POST /affiliate/track-click
#[derive(Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct TrackClickRequest {
    #[serde(default)]
    pub product_id: Option<String>,
}

#[derive(Serialize, Clone, Debug)]
pub struct TrackClickResponse {
    /// 存储失败时为 None，响应仍然成功
    pub click_id: Option<i64>,
}

/// POST /analytics/track-conversion
#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TrackConversionRequest {
    pub click_id: i64,
    /// 接受数字或字符串
    pub revenue: Decimal,
}

/// ?tz_offset=<minutes>
#[derive(Deserialize, Clone, Debug, Default)]
pub struct TimezoneQuery {
    pub tz_offset: Option<i32>,
}

/// GET /products 查询参数
#[derive(Deserialize, Clone, Debug, Default)]
pub struct ProductListQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub featured: Option<bool>,
}

impl From<ProductListQuery> for ProductFilter {
    fn from(query: ProductListQuery) -> Self {
        let non_empty = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        ProductFilter {
            category: non_empty(query.category),
            search: non_empty(query.search),
            featured: query.featured,
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: String,
    #[serde(default)]
    pub quantity: Option<i32>,
}

#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFromCartRequest {
    pub cart_item_id: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct UpdateCartRequest {
    pub quantity: i32,
}

#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ToggleSavedRequest {
    pub product_id: String,
}

#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub full_name: Option<String>,
}

#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeRequest {
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct UnsubscribeRequest {
    pub email: String,
}
