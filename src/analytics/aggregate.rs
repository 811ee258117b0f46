//! 点击聚合
//!
//! 对一组点击事件做一次 O(n) 折叠，得到：
//! - 全局汇总（点击数、转化数、收入、转化率、涉及商品数）
//! - 按商品分组的 Top-N（按点击数降序，相同点击数按商品 id 升序）
//! - 按观看者本地日期的点击直方图
//! - 最近的 N 条点击
//!
//! 纯函数，不修改输入，不写回任何数据。收入只累计已转化的事件，
//! 缺失的 revenue 按 0 处理。

use std::collections::{BTreeMap, HashMap};

use chrono::{FixedOffset, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use super::ClickEvent;
use crate::storage::Product;
use crate::utils::round_money;

/// 聚合范围
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregationScope {
    /// 全站（后台分析页）
    SiteWide,
    /// 单个用户（联盟个人面板）
    User(String),
}

impl AggregationScope {
    pub fn user_id(&self) -> Option<&str> {
        match self {
            AggregationScope::SiteWide => None,
            AggregationScope::User(id) => Some(id),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AggregationOptions {
    pub top_n: usize,
    pub recent_limit: usize,
    /// 观看者所在时区，用于日期分桶
    pub offset: FixedOffset,
}

/// 单个商品的累计值
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductTally {
    pub count: usize,
    pub conversions: usize,
    pub revenue: Decimal,
}

/// 一次折叠的中间结果
#[derive(Debug, Clone, Default)]
pub struct ClickFold {
    pub products: BTreeMap<String, ProductTally>,
    pub daily: BTreeMap<NaiveDate, usize>,
    pub total_clicks: usize,
    pub total_conversions: usize,
    pub total_revenue: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportTotals {
    pub total_clicks: usize,
    pub total_conversions: usize,
    pub total_revenue: Decimal,
    pub conversion_rate: String,
    pub unique_products: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductPerformance {
    pub product_id: String,
    /// 商品已被删除时为 None，分组仍然保留
    pub product: Option<Product>,
    pub clicks: usize,
    pub conversions: usize,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyClicks {
    pub date: NaiveDate,
    pub clicks: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsReport {
    pub totals: ReportTotals,
    pub top_products: Vec<ProductPerformance>,
    pub daily_clicks: Vec<DailyClicks>,
    pub recent_clicks: Vec<ClickEvent>,
}

/// 浏览器约定的时区偏移（Date#getTimezoneOffset，单位分钟，UTC 以西为正）
pub fn viewer_offset(browser_offset_minutes: i32) -> Option<FixedOffset> {
    browser_offset_minutes
        .checked_mul(60)
        .and_then(FixedOffset::west_opt)
}

/// 转化率百分比，保留两位小数；没有点击时为 "0"
pub fn format_conversion_rate(conversions: usize, clicks: usize) -> String {
    if clicks == 0 {
        return "0".to_string();
    }
    let rate = Decimal::from(conversions as u64) * Decimal::ONE_HUNDRED
        / Decimal::from(clicks as u64);
    let rate = rate.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rate)
}

/// 单次遍历累计商品分组、日期直方图和全局汇总
pub fn fold_events(events: &[ClickEvent], offset: FixedOffset) -> ClickFold {
    let mut fold = ClickFold::default();

    for event in events {
        let tally = fold.products.entry(event.product_id.clone()).or_default();
        tally.count += 1;
        fold.total_clicks += 1;

        if event.conversion {
            let revenue = event.revenue.unwrap_or_default();
            tally.conversions += 1;
            tally.revenue += revenue;
            fold.total_conversions += 1;
            fold.total_revenue += revenue;
        }

        let local_date = event.created_at.with_timezone(&offset).date_naive();
        *fold.daily.entry(local_date).or_insert(0) += 1;
    }

    fold
}

/// 生成分析报告
///
/// `events` 为 None（上游读取失败）时按空集合处理。
pub fn aggregate(
    events: Option<&[ClickEvent]>,
    catalog: &[Product],
    options: &AggregationOptions,
) -> AnalyticsReport {
    let events = events.unwrap_or(&[]);
    let fold = fold_events(events, options.offset);

    let by_id: HashMap<&str, &Product> = catalog.iter().map(|p| (p.id.as_str(), p)).collect();

    let totals = ReportTotals {
        total_clicks: fold.total_clicks,
        total_conversions: fold.total_conversions,
        total_revenue: money(fold.total_revenue),
        conversion_rate: format_conversion_rate(fold.total_conversions, fold.total_clicks),
        unique_products: fold.products.len(),
    };

    // BTreeMap 已按 product_id 升序，稳定排序保证并列时顺序确定
    let mut groups: Vec<(String, ProductTally)> = fold.products.into_iter().collect();
    groups.sort_by(|a, b| b.1.count.cmp(&a.1.count));
    groups.truncate(options.top_n);

    let top_products = groups
        .into_iter()
        .map(|(product_id, tally)| ProductPerformance {
            product: by_id.get(product_id.as_str()).map(|p| (*p).clone()),
            product_id,
            clicks: tally.count,
            conversions: tally.conversions,
            revenue: money(tally.revenue),
        })
        .collect();

    let daily_clicks = fold
        .daily
        .into_iter()
        .map(|(date, clicks)| DailyClicks { date, clicks })
        .collect();

    AnalyticsReport {
        totals,
        top_products,
        daily_clicks,
        recent_clicks: recent_clicks(events, options.recent_limit),
    }
}

/// 最近创建的 N 条点击，新的在前，同一时刻按 id 降序
pub fn recent_clicks(events: &[ClickEvent], limit: usize) -> Vec<ClickEvent> {
    let mut sorted: Vec<&ClickEvent> = events.iter().collect();
    sorted.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
    sorted.into_iter().take(limit).cloned().collect()
}

fn money(value: Decimal) -> Decimal {
    let mut value = round_money(value);
    value.rescale(2);
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use std::str::FromStr;

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
    }

    fn event(id: i64, product: &str, conversion: bool, revenue: Option<&str>) -> ClickEvent {
        ClickEvent {
            id,
            product_id: product.to_string(),
            user_id: None,
            ip_address: "unknown".to_string(),
            user_agent: "unknown".to_string(),
            created_at: base_time() + Duration::minutes(id),
            conversion,
            revenue: revenue.map(|r| Decimal::from_str(r).unwrap()),
        }
    }

    fn product(id: &str, name: &str) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            category: "Supplements".to_string(),
            price: Decimal::from(20),
            affiliate_link: None,
            image_url: None,
            rating: None,
            review_count: 0,
            is_featured: false,
            created_at: base_time(),
            updated_at: base_time(),
        }
    }

    fn site_options() -> AggregationOptions {
        AggregationOptions {
            top_n: 10,
            recent_limit: 10,
            offset: FixedOffset::east_opt(0).unwrap(),
        }
    }

    #[test]
    fn test_per_product_tallies() {
        let events = vec![
            event(1, "A", false, None),
            event(2, "A", true, Some("10")),
            event(3, "B", false, None),
        ];

        let fold = fold_events(&events, FixedOffset::east_opt(0).unwrap());
        assert_eq!(
            fold.products["A"],
            ProductTally {
                count: 2,
                conversions: 1,
                revenue: Decimal::from(10),
            }
        );
        assert_eq!(
            fold.products["B"],
            ProductTally {
                count: 1,
                conversions: 0,
                revenue: Decimal::ZERO,
            }
        );
    }

    #[test]
    fn test_revenue_sums_only_converted_events() {
        let events = vec![
            event(1, "A", true, Some("10.50")),
            // 未转化的 revenue 不计入
            event(2, "A", false, Some("99")),
            // 已转化但没有 revenue 按 0 处理
            event(3, "B", true, None),
            event(4, "C", true, Some("0.25")),
        ];

        let report = aggregate(Some(&events), &[], &site_options());
        assert_eq!(report.totals.total_revenue, Decimal::from_str("10.75").unwrap());
        assert_eq!(report.totals.total_conversions, 3);
        assert_eq!(report.totals.total_revenue.to_string(), "10.75");
    }

    #[test]
    fn test_revenue_is_order_independent() {
        let events: Vec<ClickEvent> = (1..=50)
            .map(|i| {
                let revenue = format!("{}.{:02}", i * 3, i % 100);
                event(i, &format!("P{}", i % 7), i % 3 == 0, Some(&revenue))
            })
            .collect();
        let mut reversed = events.clone();
        reversed.reverse();

        let forward = aggregate(Some(&events), &[], &site_options());
        let backward = aggregate(Some(&reversed), &[], &site_options());

        assert_eq!(forward.totals.total_revenue, backward.totals.total_revenue);
        assert_eq!(forward.totals.total_clicks, backward.totals.total_clicks);
        assert_eq!(
            forward
                .top_products
                .iter()
                .map(|p| (&p.product_id, p.clicks, p.revenue))
                .collect::<Vec<_>>(),
            backward
                .top_products
                .iter()
                .map(|p| (&p.product_id, p.clicks, p.revenue))
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_zero_events_rate_is_literal_zero() {
        let report = aggregate(Some(&[]), &[], &site_options());
        assert_eq!(report.totals.conversion_rate, "0");
        assert_eq!(report.totals.total_clicks, 0);
        assert_eq!(report.totals.unique_products, 0);
    }

    #[test]
    fn test_missing_events_treated_as_empty() {
        let report = aggregate(None, &[product("A", "Omega 3")], &site_options());
        assert_eq!(report.totals.total_clicks, 0);
        assert_eq!(report.totals.conversion_rate, "0");
        assert!(report.top_products.is_empty());
        assert!(report.daily_clicks.is_empty());
        assert!(report.recent_clicks.is_empty());
    }

    #[test]
    fn test_conversion_rate_two_decimals() {
        assert_eq!(format_conversion_rate(1, 3), "33.33");
        assert_eq!(format_conversion_rate(2, 3), "66.67");
        assert_eq!(format_conversion_rate(1, 8), "12.50");
        assert_eq!(format_conversion_rate(4, 4), "100.00");
        assert_eq!(format_conversion_rate(0, 5), "0.00");
    }

    #[test]
    fn test_top_n_ordered_by_count_desc() {
        let mut events = Vec::new();
        let mut id = 0;
        for (product, clicks) in [("E", 1), ("A", 4), ("C", 2), ("B", 4), ("D", 7), ("F", 2)] {
            for _ in 0..clicks {
                id += 1;
                events.push(event(id, product, false, None));
            }
        }

        let options = AggregationOptions {
            top_n: 5,
            ..site_options()
        };
        let report = aggregate(Some(&events), &[], &options);
        let order: Vec<(&str, usize)> = report
            .top_products
            .iter()
            .map(|p| (p.product_id.as_str(), p.clicks))
            .collect();

        // 并列按 id 升序
        assert_eq!(order, vec![("D", 7), ("A", 4), ("B", 4), ("C", 2), ("F", 2)]);
        for pair in report.top_products.windows(2) {
            assert!(pair[0].clicks >= pair[1].clicks);
        }
        assert_eq!(report.totals.unique_products, 6);
    }

    #[test]
    fn test_missing_product_group_is_kept() {
        let events = vec![event(1, "A", false, None), event(2, "gone", false, None)];
        let catalog = vec![product("A", "Omega 3")];

        let report = aggregate(Some(&events), &catalog, &site_options());
        assert_eq!(report.top_products.len(), 2);

        let gone = report
            .top_products
            .iter()
            .find(|p| p.product_id == "gone")
            .unwrap();
        assert!(gone.product.is_none());

        let found = report
            .top_products
            .iter()
            .find(|p| p.product_id == "A")
            .unwrap();
        assert_eq!(found.product.as_ref().unwrap().name, "Omega 3");
    }

    #[test]
    fn test_recent_clicks_newest_first() {
        let mut events: Vec<ClickEvent> = (1..=15).map(|i| event(i, "A", false, None)).collect();
        // 同一时刻的两条按 id 降序
        events[0].created_at = events[14].created_at;

        let recent = recent_clicks(&events, 10);
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].id, 15);
        assert_eq!(recent[1].id, 1);
        assert_eq!(recent[2].id, 14);
        for pair in recent.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
        }
    }

    #[test]
    fn test_daily_histogram_uses_viewer_offset() {
        let late_evening_utc = Utc.with_ymd_and_hms(2025, 3, 10, 2, 30, 0).unwrap();
        let mut a = event(1, "A", false, None);
        a.created_at = late_evening_utc;
        let mut b = event(2, "A", false, None);
        b.created_at = late_evening_utc + Duration::hours(12);

        // UTC-5：浏览器返回 300
        let options = AggregationOptions {
            offset: viewer_offset(300).unwrap(),
            ..site_options()
        };
        let report = aggregate(Some(&[a, b]), &[], &options);

        assert_eq!(
            report.daily_clicks,
            vec![
                DailyClicks {
                    date: NaiveDate::from_ymd_opt(2025, 3, 9).unwrap(),
                    clicks: 1,
                },
                DailyClicks {
                    date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
                    clicks: 1,
                },
            ]
        );
    }

    #[test]
    fn test_viewer_offset_bounds() {
        assert_eq!(viewer_offset(-330).unwrap().local_minus_utc(), 330 * 60);
        assert!(viewer_offset(24 * 60).is_none());
        assert!(viewer_offset(i32::MAX).is_none());
    }

    #[test]
    fn test_input_is_not_mutated() {
        let events = vec![event(2, "B", true, Some("1")), event(1, "A", false, None)];
        let before = events.clone();
        let _ = aggregate(Some(&events), &[], &site_options());
        assert_eq!(events, before);
    }
}
