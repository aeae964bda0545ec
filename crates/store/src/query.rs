use common::OrderStatus;

/// Builder for order listing filters.
///
/// Every field is optional; an empty search matches all orders. Orders are
/// always listed by ascending id, and `offset`/`limit` page over orders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderSearch {
    /// Only orders placed by the member with exactly this name.
    pub member_name: Option<String>,

    /// Only orders in this status.
    pub status: Option<OrderStatus>,

    /// Number of orders to skip.
    pub offset: Option<usize>,

    /// Maximum number of orders to return.
    pub limit: Option<usize>,
}

impl OrderSearch {
    /// Creates a search matching every order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters by member name.
    pub fn member_name(mut self, name: impl Into<String>) -> Self {
        self.member_name = Some(name.into());
        self
    }

    /// Filters by order status.
    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Skips this many orders.
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Returns at most this many orders.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Returns the same filter without paging.
    pub fn without_paging(&self) -> Self {
        Self {
            offset: None,
            limit: None,
            ..self.clone()
        }
    }

    /// Returns true if a member name and status satisfy the filter.
    pub fn matches(&self, member_name: &str, status: OrderStatus) -> bool {
        if let Some(ref name) = self.member_name
            && name != member_name
        {
            return false;
        }
        if let Some(wanted) = self.status
            && wanted != status
        {
            return false;
        }
        true
    }

    /// Applies `offset` and `limit` to an already filtered sequence.
    pub fn page<T>(&self, rows: impl IntoIterator<Item = T>) -> Vec<T> {
        let rows = rows.into_iter().skip(self.offset.unwrap_or(0));
        match self.limit {
            Some(limit) => rows.take(limit).collect(),
            None => rows.collect(),
        }
    }

    // Values past i64::MAX clamp; no table holds that many rows.
    pub(crate) fn sql_limit(&self) -> Option<i64> {
        self.limit.map(clamp_to_i64)
    }

    pub(crate) fn sql_offset(&self) -> i64 {
        clamp_to_i64(self.offset.unwrap_or(0))
    }
}

fn clamp_to_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_search_matches_everything() {
        let search = OrderSearch::new();
        assert!(search.matches("userA", OrderStatus::Ordered));
        assert!(search.matches("userB", OrderStatus::Cancelled));
    }

    #[test]
    fn filters_by_member_name_and_status() {
        let search = OrderSearch::new()
            .member_name("userA")
            .status(OrderStatus::Ordered);

        assert!(search.matches("userA", OrderStatus::Ordered));
        assert!(!search.matches("userB", OrderStatus::Ordered));
        assert!(!search.matches("userA", OrderStatus::Cancelled));
    }

    #[test]
    fn page_applies_offset_then_limit() {
        let search = OrderSearch::new().offset(1).limit(2);
        assert_eq!(search.page(1..=5), vec![2, 3]);
    }

    #[test]
    fn page_without_limit_keeps_the_tail() {
        let search = OrderSearch::new().offset(3);
        assert_eq!(search.page(1..=5), vec![4, 5]);
    }

    #[test]
    fn without_paging_keeps_filters() {
        let search = OrderSearch::new()
            .member_name("userA")
            .offset(10)
            .limit(5)
            .without_paging();

        assert_eq!(search.member_name.as_deref(), Some("userA"));
        assert!(search.offset.is_none());
        assert!(search.limit.is_none());
    }

    #[test]
    fn sql_paging_values() {
        let search = OrderSearch::new();
        assert_eq!(search.sql_limit(), None);
        assert_eq!(search.sql_offset(), 0);

        let search = search.offset(20).limit(10);
        assert_eq!(search.sql_limit(), Some(10));
        assert_eq!(search.sql_offset(), 20);
    }

    #[test]
    fn sql_paging_values_clamp_instead_of_wrapping() {
        let search = OrderSearch::new().offset(usize::MAX).limit(usize::MAX);
        assert_eq!(search.sql_limit(), Some(i64::MAX));
        assert_eq!(search.sql_offset(), i64::MAX);
    }
}
