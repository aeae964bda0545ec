//! Integration tests for the domain services.
//!
//! These run the services against the in-memory store and check the
//! transactional behaviour: stock changes on order and cancel, rollback of
//! failed orders, and the duplicate-member rule.

use common::{Address, DeliveryStatus, ItemId, MemberId, Money, OrderId, OrderStatus};
use domain::{
    DomainError, FetchPlan, ItemError, ItemService, JoinMember, MemberError, MemberService,
    OrderError, OrderService, PlaceOrder, UpdateItem,
};
use store::{InMemoryStore, MemberRepository, NewItem, OrderSearch, Store};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

struct Shop {
    store: InMemoryStore,
    members: MemberService<InMemoryStore>,
    items: ItemService<InMemoryStore>,
    orders: OrderService<InMemoryStore>,
}

fn shop() -> Shop {
    init_tracing();
    let store = InMemoryStore::new();
    Shop {
        members: MemberService::new(store.clone()),
        items: ItemService::new(store.clone()),
        orders: OrderService::new(store.clone()),
        store,
    }
}

fn seoul() -> Address {
    Address::new("Seoul", "1", "1111")
}

fn book(name: &str, price: i64, stock: u32) -> NewItem {
    NewItem {
        name: name.to_string(),
        price: Money::new(price),
        stock_quantity: stock,
    }
}

async fn join(shop: &Shop, name: &str) -> MemberId {
    shop.members
        .join(JoinMember::new(name, seoul()))
        .await
        .unwrap()
}

async fn stock_of(shop: &Shop, id: ItemId) -> u32 {
    shop.items.find_one(id).await.unwrap().stock_quantity()
}

mod members {
    use super::*;

    #[tokio::test]
    async fn join_and_find() {
        let shop = shop();
        let id = join(&shop, "kim").await;

        let member = shop.members.find_one(id).await.unwrap();
        assert_eq!(member.name(), "kim");
        assert_eq!(member.address(), &seoul());
        assert_eq!(shop.members.find_members().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_join_fails_without_second_row() {
        let shop = shop();
        join(&shop, "kim").await;

        let err = shop
            .members
            .join(JoinMember::new("kim", Address::new("Busan", "2", "2222")))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::DuplicateMember { ref name } if name == "kim"));

        let mut tx = shop.store.begin().await.unwrap();
        assert_eq!(tx.find_members_by_name("kim").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn join_with_blank_name_is_rejected() {
        let shop = shop();
        let err = shop
            .members
            .join(JoinMember::new(" ", seoul()))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Member(MemberError::EmptyName)));
        assert!(shop.members.find_members().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn join_with_incomplete_address_is_rejected() {
        let shop = shop();
        let err = shop
            .members
            .join(JoinMember::new("kim", Address::new("Seoul", "1", "")))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Member(MemberError::IncompleteAddress)));
        assert!(shop.members.find_members().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_is_visible_to_a_fresh_lookup() {
        let shop = shop();
        let id = join(&shop, "kim").await;

        shop.members.update(id, "lee").await.unwrap();

        let member = shop.members.find_one(id).await.unwrap();
        assert_eq!(member.name(), "lee");
    }

    #[tokio::test]
    async fn update_to_taken_name_is_duplicate() {
        let shop = shop();
        join(&shop, "kim").await;
        let lee = join(&shop, "lee").await;

        let err = shop.members.update(lee, "kim").await.unwrap_err();
        assert!(matches!(err, DomainError::DuplicateMember { .. }));
        assert_eq!(shop.members.find_one(lee).await.unwrap().name(), "lee");
    }

    #[tokio::test]
    async fn unknown_member_is_not_found() {
        let shop = shop();

        let err = shop.members.find_one(MemberId::new(42)).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::NotFound {
                entity: "Member",
                id: 42
            }
        ));

        let err = shop
            .members
            .update(MemberId::new(42), "ghost")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }
}

mod items {
    use super::*;

    #[tokio::test]
    async fn save_find_and_update() {
        let shop = shop();
        let id = shop
            .items
            .save_item(book("JPA1 BOOK", 10000, 100))
            .await
            .unwrap();

        let updated = shop
            .items
            .update_item(id, UpdateItem::new("JPA1 BOOK", Money::new(11000), 50))
            .await
            .unwrap();
        assert_eq!(updated.price(), Money::new(11000));

        let item = shop.items.find_one(id).await.unwrap();
        assert_eq!(item.price(), Money::new(11000));
        assert_eq!(item.stock_quantity(), 50);
        assert_eq!(shop.items.find_items().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn invalid_item_is_not_saved() {
        let shop = shop();
        let err = shop
            .items
            .save_item(book("", 10000, 1))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Item(ItemError::EmptyName)));
        assert!(shop.items.find_items().await.unwrap().is_empty());
    }
}

mod orders {
    use super::*;

    #[tokio::test]
    async fn placing_an_order_takes_stock() {
        let shop = shop();
        let member = join(&shop, "kim").await;
        let item = shop
            .items
            .save_item(book("JPA1 BOOK", 10000, 10))
            .await
            .unwrap();

        let order_id = shop
            .orders
            .order(PlaceOrder::single(member, item, 2))
            .await
            .unwrap();

        let order = shop.orders.find_order(order_id).await.unwrap();
        assert_eq!(order.status(), OrderStatus::Ordered);
        assert_eq!(order.member().unwrap().name(), "kim");
        assert_eq!(order.delivery().unwrap().status(), DeliveryStatus::Ready);
        assert_eq!(order.delivery().unwrap().address(), &seoul());
        assert_eq!(order.lines().unwrap().len(), 1);
        assert_eq!(order.total_price().unwrap(), Money::new(20000));
        assert_eq!(stock_of(&shop, item).await, 8);
    }

    #[tokio::test]
    async fn lines_are_priced_at_the_current_price() {
        let shop = shop();
        let member = join(&shop, "kim").await;
        let item = shop
            .items
            .save_item(book("JPA1 BOOK", 10000, 10))
            .await
            .unwrap();
        shop.items
            .update_item(item, UpdateItem::new("JPA1 BOOK", Money::new(15000), 10))
            .await
            .unwrap();

        let order_id = shop
            .orders
            .order(PlaceOrder::single(member, item, 1))
            .await
            .unwrap();

        let order = shop.orders.find_order(order_id).await.unwrap();
        assert_eq!(order.lines().unwrap()[0].order_price(), Money::new(15000));
    }

    #[tokio::test]
    async fn repeated_item_lines_share_stock() {
        let shop = shop();
        let member = join(&shop, "kim").await;
        let item = shop
            .items
            .save_item(book("JPA1 BOOK", 10000, 10))
            .await
            .unwrap();

        let order_id = shop
            .orders
            .order(PlaceOrder::new(member).line(item, 3).line(item, 4))
            .await
            .unwrap();
        assert_eq!(stock_of(&shop, item).await, 3);

        shop.orders.cancel_order(order_id).await.unwrap();
        assert_eq!(stock_of(&shop, item).await, 10);
    }

    #[tokio::test]
    async fn not_enough_stock_fails() {
        let shop = shop();
        let member = join(&shop, "kim").await;
        let item = shop
            .items
            .save_item(book("JPA1 BOOK", 10000, 10))
            .await
            .unwrap();

        let err = shop
            .orders
            .order(PlaceOrder::single(member, item, 11))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DomainError::Item(ItemError::NotEnoughStock {
                requested: 11,
                available: 10,
                ..
            })
        ));
        assert_eq!(stock_of(&shop, item).await, 10);
    }

    #[tokio::test]
    async fn failing_second_line_rolls_back_everything() {
        let shop = shop();
        let member = join(&shop, "kim").await;
        let plenty = shop
            .items
            .save_item(book("JPA1 BOOK", 10000, 10))
            .await
            .unwrap();
        let scarce = shop
            .items
            .save_item(book("JPA2 BOOK", 20000, 1))
            .await
            .unwrap();

        let err = shop
            .orders
            .order(PlaceOrder::new(member).line(plenty, 5).line(scarce, 2))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Item(ItemError::NotEnoughStock { .. })));

        assert_eq!(stock_of(&shop, plenty).await, 10);
        assert_eq!(stock_of(&shop, scarce).await, 1);
        let orders = shop
            .orders
            .find_orders(&OrderSearch::new(), &FetchPlan::none())
            .await
            .unwrap();
        assert!(orders.is_empty());
    }

    #[tokio::test]
    async fn zero_count_and_empty_orders_are_rejected() {
        let shop = shop();
        let member = join(&shop, "kim").await;
        let item = shop
            .items
            .save_item(book("JPA1 BOOK", 10000, 10))
            .await
            .unwrap();

        let err = shop
            .orders
            .order(PlaceOrder::single(member, item, 0))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::Order(OrderError::InvalidCount { count: 0 })
        ));

        let err = shop.orders.order(PlaceOrder::new(member)).await.unwrap_err();
        assert!(matches!(err, DomainError::Order(OrderError::NoLines)));
    }

    #[tokio::test]
    async fn unknown_member_or_item_is_not_found() {
        let shop = shop();
        let member = join(&shop, "kim").await;
        let item = shop
            .items
            .save_item(book("JPA1 BOOK", 10000, 10))
            .await
            .unwrap();

        let err = shop
            .orders
            .order(PlaceOrder::single(MemberId::new(99), item, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Member", .. }));

        let err = shop
            .orders
            .order(PlaceOrder::new(member).line(item, 1).line(ItemId::new(99), 1))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Item", .. }));
        assert_eq!(stock_of(&shop, item).await, 10);
    }

    #[tokio::test]
    async fn cancel_restores_stock_and_flips_status() {
        let shop = shop();
        let member = join(&shop, "kim").await;
        let item = shop
            .items
            .save_item(book("JPA1 BOOK", 10000, 10))
            .await
            .unwrap();
        let order_id = shop
            .orders
            .order(PlaceOrder::single(member, item, 2))
            .await
            .unwrap();

        shop.orders.cancel_order(order_id).await.unwrap();

        let order = shop.orders.find_order(order_id).await.unwrap();
        assert_eq!(order.status(), OrderStatus::Cancelled);
        assert_eq!(stock_of(&shop, item).await, 10);
    }

    #[tokio::test]
    async fn cancelling_twice_fails() {
        let shop = shop();
        let member = join(&shop, "kim").await;
        let item = shop
            .items
            .save_item(book("JPA1 BOOK", 10000, 10))
            .await
            .unwrap();
        let order_id = shop
            .orders
            .order(PlaceOrder::single(member, item, 2))
            .await
            .unwrap();

        shop.orders.cancel_order(order_id).await.unwrap();
        let err = shop.orders.cancel_order(order_id).await.unwrap_err();

        assert!(matches!(err, DomainError::Order(OrderError::AlreadyCancelled)));
        assert_eq!(stock_of(&shop, item).await, 10);
    }

    #[tokio::test]
    async fn cancel_unknown_order_is_not_found() {
        let shop = shop();
        let err = shop
            .orders
            .cancel_order(OrderId::new(5))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Order", id: 5 }));
    }
}

mod fetch_plans {
    use super::*;

    async fn seeded() -> Shop {
        let shop = shop();
        let member = join(&shop, "kim").await;
        let a = shop
            .items
            .save_item(book("JPA1 BOOK", 10000, 10))
            .await
            .unwrap();
        let b = shop
            .items
            .save_item(book("JPA2 BOOK", 20000, 10))
            .await
            .unwrap();
        shop.orders
            .order(PlaceOrder::new(member).line(a, 1).line(b, 2))
            .await
            .unwrap();
        shop.orders
            .order(PlaceOrder::single(member, b, 1))
            .await
            .unwrap();
        shop
    }

    #[tokio::test]
    async fn full_plan_costs_root_plus_three_per_order_plus_one_per_line() {
        let shop = seeded().await;

        let before = shop.store.queries().count();
        let orders = shop
            .orders
            .find_orders(&OrderSearch::new(), &FetchPlan::full())
            .await
            .unwrap();
        let issued = shop.store.queries().count() - before;

        assert_eq!(orders.len(), 2);
        // 1 root + 3 * 2 orders + (2 + 1) lines
        assert_eq!(issued, 10);
        let first_line = &orders[0].lines().unwrap()[0];
        assert_eq!(first_line.item().unwrap().name(), "JPA1 BOOK");
    }

    #[tokio::test]
    async fn empty_plan_costs_only_the_root_query() {
        let shop = seeded().await;

        let before = shop.store.queries().count();
        let orders = shop
            .orders
            .find_orders(&OrderSearch::new(), &FetchPlan::none())
            .await
            .unwrap();

        assert_eq!(shop.store.queries().count() - before, 1);
        assert!(orders[0].member().is_err());
        assert!(orders[0].lines().is_err());
    }

    #[tokio::test]
    async fn partial_plan_loads_only_what_it_names() {
        let shop = seeded().await;

        let orders = shop
            .orders
            .find_orders(&OrderSearch::new(), &FetchPlan::none().with_lines())
            .await
            .unwrap();

        let lines = orders[0].lines().unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].item().is_none());
        assert!(orders[0].delivery().is_err());
    }
}
