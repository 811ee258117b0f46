use url::Url;

use crate::errors::Result;

/// UTM 参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UtmParams {
    pub source: String,
    pub medium: String,
    pub campaign: String,
    pub content: String,
}

impl UtmParams {
    /// `timestamp_millis` 写入 utm_content，区分同一商品的多次点击
    pub fn for_product(product_id: &str, source: &str, timestamp_millis: i64) -> Self {
        Self {
            source: source.to_string(),
            medium: "affiliate".to_string(),
            campaign: format!("product_{}", product_id),
            content: format!("click_{}", timestamp_millis),
        }
    }
}

/// 给商品的联盟链接追加 UTM 参数和推荐人
///
/// 原有查询参数保留，新参数追加在后面。
pub fn build_affiliate_link(
    base_link: &str,
    product_id: &str,
    user_id: Option<&str>,
    source: &str,
) -> Result<String> {
    let params = UtmParams::for_product(product_id, source, chrono::Utc::now().timestamp_millis());
    decorate(base_link, &params, user_id)
}

fn decorate(base_link: &str, params: &UtmParams, user_id: Option<&str>) -> Result<String> {
    let mut url = Url::parse(base_link)?;
    {
        let mut query = url.query_pairs_mut();
        query
            .append_pair("utm_source", &params.source)
            .append_pair("utm_medium", &params.medium)
            .append_pair("utm_campaign", &params.campaign)
            .append_pair("utm_content", &params.content);
        if let Some(uid) = user_id.filter(|u| !u.is_empty()) {
            query.append_pair("ref", uid);
        }
    }
    Ok(url.to_string())
}
