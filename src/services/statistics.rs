// src/services/statistics.rs
//
// Agregações dos endpoints `/count`. Funções puras: recebem a coleção já
// filtrada e dobram tudo numa passada só.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::models::{
    location::{Location, LocationCoverage, LocationHealthScore, LocationStatistics, Position},
    product::{Product, ProductHealthScore, ProductStatistics},
    promotion::{
        DiscountType, DiscountTypeCounts, Promotion, PromotionHealthScore, PromotionStatistics,
    },
};

const UNCATEGORIZED: &str = "Uncategorized";

// Percentual inteiro arredondado "half up"
fn percent_rounded(part: u64, whole: u64) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part * 200 + whole) / (whole * 2)) as u32
}

fn percent(part: f64, whole: f64) -> f64 {
    if whole > 0.0 { part / whole * 100.0 } else { 0.0 }
}

// Somas monetárias saturam em vez de estourar (o `Mul`/`Add` do Decimal entra em pânico)
fn add_value(total: Decimal, quantity: i64, price: Decimal) -> Decimal {
    Decimal::from(quantity)
        .checked_mul(price)
        .and_then(|value| total.checked_add(value))
        .unwrap_or(Decimal::MAX)
}

pub fn product_statistics(products: &[Product], low_stock_only: bool) -> ProductStatistics {
    let mut stats = ProductStatistics::default();
    let mut total_value = Decimal::ZERO;
    let mut categories: BTreeMap<String, u64> = BTreeMap::new();

    for product in products {
        stats.total += 1;
        if product.is_active {
            stats.active += 1;
        } else {
            stats.inactive += 1;
        }
        if product.is_low_stock() {
            stats.low_stock += 1;
        }

        stats.total_quantity = stats.total_quantity.saturating_add(product.quantity);
        total_value = add_value(total_value, product.quantity, product.price);

        let category = if product.category.trim().is_empty() {
            UNCATEGORIZED
        } else {
            product.category.as_str()
        };
        *categories.entry(category.to_string()).or_default() += 1;
    }

    stats.count = if low_stock_only { stats.low_stock } else { stats.total };
    stats.total_value = total_value.round_dp(2);
    stats.average_value = if stats.total > 0 {
        (total_value / Decimal::from(stats.total)).round_dp(2)
    } else {
        Decimal::ZERO
    };
    stats.total_categories = categories.len() as u64;
    stats.categories = categories;
    stats.health_score = ProductHealthScore {
        stock_health: percent_rounded(stats.total - stats.low_stock, stats.total),
        active_ratio: percent_rounded(stats.active, stats.total),
    };
    stats
}

pub fn location_statistics(locations: &[Location]) -> LocationStatistics {
    let mut stats = LocationStatistics::default();
    let mut zones = BTreeSet::new();
    let mut sections = BTreeSet::new();
    let mut aisles = BTreeSet::new();
    let mut products = BTreeSet::new();
    let (mut sum_x, mut sum_y) = (0.0_f64, 0.0_f64);

    for location in locations {
        stats.total += 1;
        if location.is_active {
            stats.active += 1;
        } else {
            stats.inactive += 1;
        }

        if !location.zone.is_empty() {
            zones.insert(location.zone.clone());
        }
        if !location.section.is_empty() {
            sections.insert(location.section.clone());
        }
        if let Some(aisle) = location.aisle.as_ref().filter(|a| !a.is_empty()) {
            aisles.insert(aisle.clone());
        }
        products.insert(location.product_id);

        sum_x += location.position.x;
        sum_y += location.position.y;
    }

    stats.count = stats.total;
    stats.total_zones = zones.len() as u64;
    stats.total_sections = sections.len() as u64;
    stats.total_aisles = aisles.len() as u64;
    stats.products_covered = products.len() as u64;
    if stats.total > 0 {
        let n = stats.total as f64;
        stats.avg_position = Position { x: sum_x / n, y: sum_y / n };
    }
    stats.coverage = LocationCoverage {
        zones: zones.into_iter().collect(),
        sections: sections.into_iter().collect(),
        aisles: aisles.into_iter().collect(),
    };
    stats.health_score = LocationHealthScore {
        active_ratio: percent(stats.active as f64, stats.total as f64),
        coverage_ratio: percent(stats.products_covered as f64, stats.total as f64),
    };
    stats
}

// Vigente/futura/expirada olham só as datas; `is_active` entra apenas em active/inactive.
pub fn promotion_statistics(promotions: &[Promotion], now: DateTime<Utc>) -> PromotionStatistics {
    let mut stats = PromotionStatistics::default();
    let mut discount_sum = Decimal::ZERO;
    let mut products = BTreeSet::new();
    let mut discount_types = DiscountTypeCounts::default();

    for promotion in promotions {
        stats.total += 1;
        if promotion.is_active {
            stats.active += 1;
        } else {
            stats.inactive += 1;
        }

        if promotion.is_current(now) {
            stats.current += 1;
        }
        if promotion.start_date > now {
            stats.upcoming += 1;
        }
        if promotion.end_date < now {
            stats.expired += 1;
        }

        match promotion.discount_type {
            DiscountType::Percentage => discount_types.percentage += 1,
            DiscountType::Fixed => discount_types.fixed += 1,
            DiscountType::FreeShipping => discount_types.free_shipping += 1,
        }

        stats.total_uses = stats.total_uses.saturating_add(promotion.current_uses);
        stats.total_max_uses = stats.total_max_uses.saturating_add(promotion.max_uses.unwrap_or(0));
        discount_sum = discount_sum.checked_add(promotion.discount_value).unwrap_or(Decimal::MAX);
        products.insert(promotion.product_id);
    }

    stats.count = stats.total;
    stats.usage_rate = percent(stats.total_uses as f64, stats.total_max_uses as f64);
    stats.avg_discount_value = if stats.total > 0 {
        discount_sum / Decimal::from(stats.total)
    } else {
        Decimal::ZERO
    };
    stats.products_with_promotions = products.len() as u64;
    stats.discount_types = discount_types;
    stats.health_score = PromotionHealthScore {
        active_ratio: percent(stats.active as f64, stats.total as f64),
        current_ratio: percent(stats.current as f64, stats.total as f64),
        usage_ratio: stats.usage_rate,
    };
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    fn product(quantity: i64, price: Decimal, category: &str, is_active: bool) -> Product {
        let now = Utc::now();
        Product {
            id: Uuid::new_v4(),
            seller_id: Uuid::nil(),
            name: "p".into(),
            description: "d".into(),
            price,
            quantity,
            sku: Uuid::new_v4().to_string(),
            category: category.into(),
            stock_alert: 10,
            is_active,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn product_fold_counts_stock_value_and_categories() {
        let products = vec![
            product(5, Decimal::new(1000, 2), "Tools", true),   // baixo estoque, 50.00
            product(20, Decimal::new(250, 2), "Tools", true),   // 50.00
            product(11, Decimal::new(100, 2), "Garden", false), // 11.00
        ];
        let stats = product_statistics(&products, false);

        assert_eq!(stats.count, 3);
        assert_eq!(stats.active, 2);
        assert_eq!(stats.inactive, 1);
        assert_eq!(stats.low_stock, 1);
        assert_eq!(stats.total_quantity, 36);
        assert_eq!(stats.total_value, Decimal::new(11100, 2));
        assert_eq!(stats.average_value, Decimal::new(3700, 2));
        assert_eq!(stats.categories.get("Tools"), Some(&2));
        assert_eq!(stats.total_categories, 2);
        assert_eq!(stats.health_score.stock_health, 67);
        assert_eq!(stats.health_score.active_ratio, 67);

        let low_only = product_statistics(&products, true);
        assert_eq!(low_only.count, 1);
        assert_eq!(low_only.total, 3);
    }

    #[test]
    fn quantity_equal_to_alert_is_low_stock() {
        let stats = product_statistics(&[product(10, Decimal::ONE, "A", true)], false);
        assert_eq!(stats.low_stock, 1);
        assert_eq!(stats.health_score.stock_health, 0);
    }

    #[test]
    fn unset_alert_falls_back_to_default() {
        let mut unset = product(9, Decimal::ONE, "A", true);
        unset.stock_alert = 0;
        let mut zero_quantity = product(0, Decimal::ONE, "A", true);
        zero_quantity.stock_alert = 0;
        let stats = product_statistics(&[unset, product(11, Decimal::ONE, "A", true)], false);
        assert_eq!(stats.low_stock, 1);
        assert!(zero_quantity.is_low_stock());
    }

    #[test]
    fn huge_values_saturate_instead_of_overflowing() {
        let max_price = Decimal::new(999_999_999_999, 2);
        let products = vec![
            product(i64::MAX, max_price, "Bulk", true),
            product(i64::MAX, max_price, "Bulk", true),
        ];
        let stats = product_statistics(&products, false);
        assert_eq!(stats.total_quantity, i64::MAX);
        assert_eq!(stats.total_value, Decimal::MAX);

        let now = Utc::now();
        let promotions = vec![
            promotion((-1, 1), DiscountType::Fixed, (i64::MAX, Some(i64::MAX)), true, now),
            promotion((-1, 1), DiscountType::Fixed, (i64::MAX, Some(i64::MAX)), true, now),
        ];
        let stats = promotion_statistics(&promotions, now);
        assert_eq!(stats.total_uses, i64::MAX);
        assert_eq!(stats.total_max_uses, i64::MAX);
    }

    #[test]
    fn empty_collections_fold_to_zero() {
        let products = product_statistics(&[], false);
        assert_eq!(products.health_score, ProductHealthScore::default());
        assert_eq!(products.average_value, Decimal::ZERO);

        let locations = location_statistics(&[]);
        assert_eq!(locations.avg_position, Position::default());

        let promotions = promotion_statistics(&[], Utc::now());
        assert_eq!(promotions.usage_rate, 0.0);
    }

    fn location(product_id: Uuid, zone: &str, aisle: Option<&str>, x: f64, is_active: bool) -> Location {
        let now = Utc::now();
        Location {
            id: Uuid::new_v4(),
            seller_id: Uuid::nil(),
            product_id,
            name: Uuid::new_v4().to_string(),
            description: "d".into(),
            zone: zone.into(),
            section: "S1".into(),
            aisle: aisle.map(Into::into),
            shelf: None,
            position: Position { x, y: 2.0 },
            is_active,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn location_fold_reports_coverage() {
        let product = Uuid::new_v4();
        let locations = vec![
            location(product, "B", Some("A1"), 0.0, true),
            location(product, "A", None, 4.0, true),
            location(Uuid::new_v4(), "A", Some("A2"), 8.0, false),
            location(Uuid::new_v4(), "C", Some("A1"), 8.0, true),
        ];
        let stats = location_statistics(&locations);

        assert_eq!(stats.total, 4);
        assert_eq!(stats.inactive, 1);
        assert_eq!(stats.coverage.zones, vec!["A", "B", "C"]);
        assert_eq!(stats.total_aisles, 2);
        assert_eq!(stats.products_covered, 3);
        assert_eq!(stats.avg_position, Position { x: 5.0, y: 2.0 });
        assert_eq!(stats.health_score.active_ratio, 75.0);
        assert_eq!(stats.health_score.coverage_ratio, 75.0);
    }

    fn promotion(
        offset_days: (i64, i64),
        kind: DiscountType,
        uses: (i64, Option<i64>),
        is_active: bool,
        now: DateTime<Utc>,
    ) -> Promotion {
        Promotion {
            id: Uuid::new_v4(),
            seller_id: Uuid::nil(),
            product_id: Uuid::new_v4(),
            title: Uuid::new_v4().to_string(),
            description: "d".into(),
            message: "m".into(),
            discount_type: kind,
            discount_value: Decimal::new(10, 0),
            start_date: now + Duration::days(offset_days.0),
            end_date: now + Duration::days(offset_days.1),
            is_active,
            current_uses: uses.0,
            max_uses: uses.1,
            conditions: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn promotion_fold_buckets_by_date_and_type() {
        let now = Utc::now();
        let promotions = vec![
            promotion((-1, 1), DiscountType::Percentage, (5, Some(10)), true, now),
            promotion((2, 3), DiscountType::Fixed, (0, Some(10)), true, now),
            promotion((-3, -2), DiscountType::FreeShipping, (5, None), false, now),
            promotion((-1, 1), DiscountType::Percentage, (0, None), false, now),
        ];
        let stats = promotion_statistics(&promotions, now);

        assert_eq!(stats.total, 4);
        assert_eq!(stats.active, 2);
        assert_eq!(stats.current, 2);
        assert_eq!(stats.upcoming, 1);
        assert_eq!(stats.expired, 1);
        assert_eq!(stats.total_uses, 10);
        assert_eq!(stats.total_max_uses, 20);
        assert_eq!(stats.usage_rate, 50.0);
        assert_eq!(stats.discount_types.percentage, 2);
        assert_eq!(stats.discount_types.free_shipping, 1);
        assert_eq!(stats.avg_discount_value, Decimal::new(10, 0));
        assert_eq!(stats.products_with_promotions, 4);
        assert_eq!(stats.health_score.current_ratio, 50.0);
    }
}
