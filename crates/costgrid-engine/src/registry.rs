use costgrid_common::{
    CostItem, CostType, MONTHS_PER_YEAR, order_independent_sum, parse_cell_input,
};
use rustc_hash::FxHashMap;

/// Result of a single cell edit. Every variant other than `Applied` leaves
/// the registry untouched; callers are free to ignore the outcome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditOutcome {
    Applied { previous: f64, value: f64 },
    Locked,
    UnknownItem,
    MonthOutOfRange,
}

impl EditOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, EditOutcome::Applied { .. })
    }
}

/// Ordered list of cost rows with an id index.
#[derive(Debug, Clone, Default)]
pub struct CostRegistry {
    items: Vec<CostItem>,
    index: FxHashMap<String, usize>,
}

impl PartialEq for CostRegistry {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl CostRegistry {
    /// Build a registry. When ids repeat, lookups resolve to the first row.
    pub fn new(items: Vec<CostItem>) -> Self {
        let mut index = FxHashMap::default();
        for (pos, item) in items.iter().enumerate() {
            index.entry(item.id.clone()).or_insert(pos);
        }
        Self { items, index }
    }

    pub fn items(&self) -> &[CostItem] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &CostItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&CostItem> {
        self.index.get(id).map(|&pos| &self.items[pos])
    }

    pub fn into_items(self) -> Vec<CostItem> {
        self.items
    }

    /// Apply a user edit to one month of one row.
    ///
    /// `raw` goes through [`parse_cell_input`], so bad text lands as `0`.
    /// Locked rows, unknown ids and months past December are ignored.
    pub fn set_cell(&mut self, item_id: &str, month: usize, raw: &str) -> EditOutcome {
        let Some(&pos) = self.index.get(item_id) else {
            return EditOutcome::UnknownItem;
        };
        let item = &mut self.items[pos];
        if item.is_locked {
            return EditOutcome::Locked;
        }
        let Some(previous) = item.monthly_values.get(month) else {
            return EditOutcome::MonthOutOfRange;
        };
        let value = parse_cell_input(raw);
        item.monthly_values.set(month, value);
        EditOutcome::Applied { previous, value }
    }

    /// New registry with every row passed through `f`, order preserved.
    pub fn map_items(&self, mut f: impl FnMut(&CostItem) -> CostItem) -> CostRegistry {
        CostRegistry {
            items: self.items.iter().map(&mut f).collect(),
            index: self.index.clone(),
        }
    }

    /// Sum of one row's twelve months.
    pub fn row_total(&self, id: &str) -> Option<f64> {
        self.get(id).map(CostItem::total)
    }

    /// Sum across rows for one month. Out-of-range months total to zero.
    pub fn column_total(&self, month: usize) -> f64 {
        order_independent_sum(
            self.items
                .iter()
                .filter_map(|item| item.monthly_values.get(month)),
        )
    }

    pub fn column_totals(&self) -> [f64; MONTHS_PER_YEAR] {
        std::array::from_fn(|month| self.column_total(month))
    }

    /// Sum of all row totals.
    pub fn grand_total(&self) -> f64 {
        order_independent_sum(self.items.iter().map(CostItem::total))
    }

    /// Grand total restricted to one accounting treatment.
    pub fn total_for_type(&self, cost_type: CostType) -> f64 {
        order_independent_sum(
            self.items
                .iter()
                .filter(|item| item.cost_type == cost_type)
                .map(CostItem::total),
        )
    }
}
