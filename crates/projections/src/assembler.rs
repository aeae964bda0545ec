//! Regrouping of flat order/item join rows.

use std::collections::HashMap;

use common::OrderId;
use store::OrderFlatRow;

use crate::views::OrderView;

/// Folds flat join rows into one [`OrderView`] per order.
///
/// Orders come out in the order their first row was seen. Order-level
/// columns are taken from that first row and items keep row order. A row
/// without item columns contributes the order only. Repeated item rows are
/// kept as they are.
#[derive(Debug, Default)]
pub struct OrderViewAssembler {
    index: HashMap<OrderId, usize>,
    views: Vec<OrderView>,
}

impl OrderViewAssembler {
    /// Creates an empty assembler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Groups all rows at once.
    pub fn assemble(rows: impl IntoIterator<Item = OrderFlatRow>) -> Vec<OrderView> {
        let mut assembler = Self::new();
        for row in rows {
            assembler.push(row);
        }
        assembler.finish()
    }

    /// Adds one row.
    pub fn push(&mut self, row: OrderFlatRow) {
        let (header, item) = row.into_parts();

        let slot = match self.index.get(&header.order_id) {
            Some(&slot) => slot,
            None => {
                let slot = self.views.len();
                self.index.insert(header.order_id, slot);
                self.views.push(OrderView::from_header(header, Vec::new()));
                slot
            }
        };

        if let Some(item) = item {
            self.views[slot].items.push(item.into());
        }
    }

    /// Number of distinct orders seen so far.
    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Returns the views in first-seen order.
    pub fn finish(self) -> Vec<OrderView> {
        self.views
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use common::{Address, Money, OrderStatus};
    use store::FlatItemColumns;

    use super::*;

    fn row(order_id: i64, member: &str, item: Option<(&str, i64, u32)>) -> OrderFlatRow {
        OrderFlatRow {
            order_id: OrderId::new(order_id),
            member_name: member.to_string(),
            order_date: Utc::now(),
            status: OrderStatus::Ordered,
            address: Address::new("Seoul", "1", "1111"),
            item: item.map(|(name, price, count)| FlatItemColumns {
                item_name: name.to_string(),
                order_price: Money::new(price),
                count,
            }),
        }
    }

    fn item_names(view: &OrderView) -> Vec<&str> {
        view.items.iter().map(|i| i.item_name.as_str()).collect()
    }

    #[test]
    fn groups_rows_by_order_in_first_seen_order() {
        let views = OrderViewAssembler::assemble(vec![
            row(1, "userA", Some(("A", 100, 1))),
            row(1, "userA", Some(("B", 200, 2))),
            row(2, "userB", Some(("C", 300, 3))),
        ]);

        assert_eq!(views.len(), 2);
        assert_eq!(views[0].order_id, OrderId::new(1));
        assert_eq!(item_names(&views[0]), vec!["A", "B"]);
        assert_eq!(views[1].order_id, OrderId::new(2));
        assert_eq!(views[1].member_name, "userB");
        assert_eq!(item_names(&views[1]), vec!["C"]);
    }

    #[test]
    fn order_without_items_gets_empty_list() {
        let views = OrderViewAssembler::assemble(vec![
            row(1, "userA", Some(("A", 100, 1))),
            row(2, "userA", None),
        ]);

        assert_eq!(views.len(), 2);
        assert!(views[1].items.is_empty());
    }

    #[test]
    fn interleaved_rows_keep_first_seen_order() {
        let views = OrderViewAssembler::assemble(vec![
            row(5, "userB", Some(("X", 1, 1))),
            row(3, "userA", Some(("Y", 1, 1))),
            row(5, "userB", Some(("Z", 1, 1))),
        ]);

        let ids: Vec<i64> = views.iter().map(|v| v.order_id.as_i64()).collect();
        assert_eq!(ids, vec![5, 3]);
        assert_eq!(item_names(&views[0]), vec!["X", "Z"]);
    }

    #[test]
    fn duplicate_item_rows_are_kept() {
        let views = OrderViewAssembler::assemble(vec![
            row(1, "userA", Some(("A", 100, 1))),
            row(1, "userA", Some(("A", 100, 1))),
        ]);
        assert_eq!(views[0].items.len(), 2);
    }

    #[test]
    fn empty_input_gives_no_views() {
        let assembler = OrderViewAssembler::new();
        assert!(assembler.is_empty());
        assert!(assembler.finish().is_empty());
    }
}
