//! Bridge ("waterfall") chart layout.
//!
//! Each point is turned into a floating bar: an invisible `float` segment
//! stacked under the visible `bar`. Totals sit on the axis and reset the
//! running level; increases and decreases hang from it.

use costgrid_common::format_millions;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How a point moves the running level.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Total,
    Increase,
    Decrease,
}

/// One named input step of the bridge.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct WaterfallPoint {
    pub name: String,
    /// Non-negative magnitude; direction comes from the flags.
    pub value: f64,
    pub is_total: bool,
    pub is_decrease: bool,
    /// Display colour, ignored by the layout.
    pub fill: Option<String>,
}

impl WaterfallPoint {
    fn with_flags(name: impl Into<String>, value: f64, is_total: bool, is_decrease: bool) -> Self {
        Self {
            name: name.into(),
            value,
            is_total,
            is_decrease,
            fill: None,
        }
    }

    pub fn total(name: impl Into<String>, value: f64) -> Self {
        Self::with_flags(name, value, true, false)
    }

    pub fn increase(name: impl Into<String>, value: f64) -> Self {
        Self::with_flags(name, value, false, false)
    }

    pub fn decrease(name: impl Into<String>, value: f64) -> Self {
        Self::with_flags(name, value, false, true)
    }

    pub fn with_fill(mut self, fill: impl Into<String>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    /// `is_total` wins over `is_decrease` when both are set.
    pub fn movement(&self) -> Movement {
        if self.is_total {
            Movement::Total
        } else if self.is_decrease {
            Movement::Decrease
        } else {
            Movement::Increase
        }
    }
}

/// Chart geometry for one point.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct WaterfallBar {
    pub name: String,
    /// Height of the transparent segment under the bar.
    pub float: f64,
    /// Height of the visible bar.
    pub bar: f64,
    /// Signed value for labels and tooltips.
    pub display_value: f64,
    /// Running level after this point.
    pub cumulative: f64,
    pub is_total: bool,
    pub fill: Option<String>,
}

impl WaterfallBar {
    pub fn top(&self) -> f64 {
        self.float + self.bar
    }

    /// Tooltip text, e.g. `$-0.5M` for a decrease of half a million.
    pub fn tooltip(&self) -> String {
        format_millions(self.display_value, 1)
    }
}

/// Lay out the bridge left to right. Accepts any sequence, including empty.
pub fn layout(points: &[WaterfallPoint]) -> Vec<WaterfallBar> {
    let mut cumulative = 0.0;
    points
        .iter()
        .map(|point| {
            let (float, display_value) = match point.movement() {
                Movement::Total => {
                    cumulative = point.value;
                    (0.0, point.value)
                }
                Movement::Decrease => {
                    let float = cumulative - point.value;
                    cumulative -= point.value;
                    (float, -point.value)
                }
                Movement::Increase => {
                    let float = cumulative;
                    cumulative += point.value;
                    (float, point.value)
                }
            };
            WaterfallBar {
                name: point.name.clone(),
                float,
                bar: point.value,
                display_value,
                cumulative,
                is_total: point.is_total,
                fill: point.fill.clone(),
            }
        })
        .collect()
}
