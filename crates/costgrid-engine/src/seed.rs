//! Built-in planning data used when no scenario file is supplied.

use costgrid_common::{Category, CostItem, CostType, DriverSet, MonthlyValues};

use crate::waterfall::WaterfallPoint;

/// Bar colours of the bridge chart.
pub mod palette {
    pub const NAVY: &str = "#002D62";
    pub const RED: &str = "#F40009";
    pub const GREEN: &str = "#008751";
    pub const GREY: &str = "#94A3B8";
}

pub fn seed_drivers() -> DriverSet {
    DriverSet::default()
}

pub fn seed_cost_items() -> Vec<CostItem> {
    let mut server_upgrades = MonthlyValues::flat(0.0);
    server_upgrades.set(2, 50_000.0);
    server_upgrades.set(6, 50_000.0);

    vec![
        CostItem::new(
            "c1",
            Category::Staff,
            "500100",
            "Base Salaries",
            CostType::OpEx,
            MonthlyValues::flat(150_000.0),
        )
        .locked(),
        CostItem::new(
            "c2",
            Category::Staff,
            "500200",
            "Health Insurance",
            CostType::OpEx,
            MonthlyValues::flat(12_000.0),
        )
        .locked(),
        CostItem::new(
            "c3",
            Category::Office,
            "600100",
            "Office Rental (HQ)",
            CostType::OpEx,
            MonthlyValues::flat(45_000.0),
        ),
        CostItem::new(
            "c4",
            Category::It,
            "700500",
            "Server Upgrades",
            CostType::CapEx,
            server_upgrades,
        ),
        CostItem::new(
            "c5",
            Category::Travel,
            "650100",
            "Regional Visits",
            CostType::OpEx,
            MonthlyValues::flat(5_000.0),
        ),
    ]
}

/// 2024 actuals to 2025 budget, in millions.
pub fn seed_waterfall() -> Vec<WaterfallPoint> {
    vec![
        WaterfallPoint::total("2024 Actuals", 10.0).with_fill(palette::GREY),
        WaterfallPoint::increase("Inflation", 0.5).with_fill(palette::RED),
        WaterfallPoint::increase("New Projects", 1.5).with_fill(palette::NAVY),
        WaterfallPoint::increase("Headcount", 1.0).with_fill(palette::NAVY),
        WaterfallPoint::decrease("Savings", 0.5).with_fill(palette::GREEN),
        WaterfallPoint::total("2025 Budget", 12.5).with_fill(palette::NAVY),
    ]
}
