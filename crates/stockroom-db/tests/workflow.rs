mod common;

use chrono::Utc;
use common::{customer, memory_db, product, stock_of, user};
use stockroom_core::{
    CoreError, DateRange, NewInventoryTransaction, NewSale, NewSaleReturn, Page, ReturnFilter,
    SaleFilter, TransactionType,
};
use stockroom_db::{Database, DbConfig, DbError};

fn movement(product_id: i64, kind: TransactionType, quantity: i64) -> NewInventoryTransaction {
    NewInventoryTransaction {
        product_id,
        quantity,
        transaction_type: kind,
        reference: None,
        notes: None,
    }
}

fn sale(product_id: i64, customer_id: i64, quantity: i64, unit_price_cents: i64) -> NewSale {
    NewSale {
        product_id,
        customer_id,
        quantity,
        unit_price_cents,
        notes: None,
    }
}

fn sale_return(sale_id: i64, product_id: i64, quantity: i64) -> NewSaleReturn {
    NewSaleReturn {
        sale_id,
        product_id,
        quantity,
        reason: Some("damaged".to_string()),
        notes: None,
    }
}

#[tokio::test]
async fn test_stock_walkthrough() {
    let db = memory_db().await;
    let clerk = user(&db, "clerk@example.com", false).await;
    let buyer = customer(&db, "Ada").await;
    let p = product(&db, &clerk, "KB-001", 10, 5).await.product.id;
    let workflow = db.workflow();

    // IN 5: 10 -> 15
    let entry = workflow
        .record_transaction(movement(p, TransactionType::In, 5), &clerk)
        .await
        .unwrap();
    assert_eq!(entry.transaction.quantity, 5);
    assert_eq!(entry.transaction.transaction_type, TransactionType::In);
    assert_eq!(entry.product.product.stock, 15);

    // OUT 20 is rejected and leaves no trace
    let rejected = workflow
        .record_transaction(movement(p, TransactionType::Out, 20), &clerk)
        .await;
    assert!(matches!(
        rejected,
        Err(DbError::Core(CoreError::InsufficientStock { available: 15, requested: 20, .. }))
    ));
    assert_eq!(stock_of(&db, p).await, 15);
    assert_eq!(db.inventory().get_multi(Page::default(), None).await.unwrap().len(), 1);

    // Sale 3 @ 9.99: 15 -> 12
    let sold = workflow.record_sale(sale(p, buyer, 3, 999), &clerk).await.unwrap();
    assert_eq!(sold.sale.total_amount_cents, 2997);
    assert_eq!(sold.sale.total_amount().to_string(), "$29.97");
    assert_eq!(sold.customer.id, buyer);
    assert_eq!(sold.product.stock, 12);
    assert_eq!(stock_of(&db, p).await, 12);

    // Return 3: 12 -> 15
    let returned = workflow
        .record_return(sale_return(sold.sale.id, p, 3), &clerk)
        .await
        .unwrap();
    assert_eq!(returned.quantity, 3);
    assert_eq!(returned.created_by, clerk.user_id);
    assert_eq!(stock_of(&db, p).await, 15);

    // Return 4 exceeds the sale
    let too_many = workflow
        .record_return(sale_return(sold.sale.id, p, 4), &clerk)
        .await;
    assert!(matches!(
        too_many,
        Err(DbError::Core(CoreError::ReturnExceedsSale { sold: 3, requested: 4, .. }))
    ));
    assert_eq!(stock_of(&db, p).await, 15);

    let returns = db
        .returns()
        .get_by_sale(sold.sale.id, Page::default(), None)
        .await
        .unwrap();
    assert_eq!(returns.len(), 1);
}

#[tokio::test]
async fn test_returns_are_checked_per_return_not_cumulatively() {
    let db = memory_db().await;
    let clerk = user(&db, "clerk@example.com", false).await;
    let buyer = customer(&db, "Ada").await;
    let p = product(&db, &clerk, "KB-001", 10, 0).await.product.id;
    let workflow = db.workflow();

    // 10 -> 7
    let sold = workflow.record_sale(sale(p, buyer, 3, 999), &clerk).await.unwrap();

    // 2 + 2 exceeds the 3 sold, each alone does not
    for _ in 0..2 {
        workflow
            .record_return(sale_return(sold.sale.id, p, 2), &clerk)
            .await
            .unwrap();
    }
    assert_eq!(stock_of(&db, p).await, 11);

    let returns = db
        .returns()
        .get_by_sale(sold.sale.id, Page::default(), None)
        .await
        .unwrap();
    assert_eq!(returns.len(), 2);
    assert_eq!(returns.iter().map(|r| r.quantity).sum::<i64>(), 4);
}

#[tokio::test]
async fn test_adjustment_sets_absolute_stock() {
    let db = memory_db().await;
    let clerk = user(&db, "clerk@example.com", false).await;
    let p = product(&db, &clerk, "KB-001", 10, 5).await.product.id;

    let entry = db
        .workflow()
        .record_transaction(movement(p, TransactionType::Adjustment, 0), &clerk)
        .await
        .unwrap();
    assert_eq!(entry.product.product.stock, 0);

    db.workflow()
        .record_transaction(movement(p, TransactionType::Adjustment, 42), &clerk)
        .await
        .unwrap();
    assert_eq!(stock_of(&db, p).await, 42);

    let negative = db
        .workflow()
        .record_transaction(movement(p, TransactionType::Adjustment, -1), &clerk)
        .await;
    assert!(matches!(negative, Err(DbError::Core(CoreError::Validation(_)))));

    let zero_in = db
        .workflow()
        .record_transaction(movement(p, TransactionType::In, 0), &clerk)
        .await;
    assert!(matches!(zero_in, Err(DbError::Core(CoreError::Validation(_)))));
    assert_eq!(stock_of(&db, p).await, 42);

    let ledger = db
        .inventory()
        .get_by_product(p, Page::default(), None)
        .await
        .unwrap();
    assert_eq!(ledger.len(), 2);
}

#[tokio::test]
async fn test_movement_on_missing_product() {
    let db = memory_db().await;
    let clerk = user(&db, "clerk@example.com", false).await;

    let result = db
        .workflow()
        .record_transaction(movement(999, TransactionType::In, 1), &clerk)
        .await;
    assert!(matches!(result, Err(DbError::NotFound { ref entity, .. }) if entity == "Product"));
}

#[tokio::test]
async fn test_in_does_not_overflow() {
    let db = memory_db().await;
    let clerk = user(&db, "clerk@example.com", false).await;
    let p = product(&db, &clerk, "KB-001", i64::MAX - 1, 0).await.product.id;

    let result = db
        .workflow()
        .record_transaction(movement(p, TransactionType::In, 2), &clerk)
        .await;
    assert!(matches!(result, Err(DbError::Core(CoreError::Validation(_)))));
    assert_eq!(stock_of(&db, p).await, i64::MAX - 1);
}

#[tokio::test]
async fn test_sale_requires_customer() {
    let db = memory_db().await;
    let clerk = user(&db, "clerk@example.com", false).await;
    let p = product(&db, &clerk, "KB-001", 10, 5).await.product.id;

    let result = db.workflow().record_sale(sale(p, 404, 1, 999), &clerk).await;
    assert!(matches!(result, Err(DbError::NotFound { ref entity, .. }) if entity == "Customer"));
    assert_eq!(stock_of(&db, p).await, 10);
    assert!(db.sales().get_multi(Page::default(), None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_sale_over_stock_is_rejected() {
    let db = memory_db().await;
    let clerk = user(&db, "clerk@example.com", false).await;
    let buyer = customer(&db, "Ada").await;
    let p = product(&db, &clerk, "KB-001", 2, 0).await.product.id;

    let result = db.workflow().record_sale(sale(p, buyer, 3, 100), &clerk).await;
    assert!(matches!(
        result,
        Err(DbError::Core(CoreError::InsufficientStock { available: 2, requested: 3, .. }))
    ));
    assert_eq!(stock_of(&db, p).await, 2);

    // Exactly the remaining stock is fine
    db.workflow().record_sale(sale(p, buyer, 2, 100), &clerk).await.unwrap();
    assert_eq!(stock_of(&db, p).await, 0);
}

#[tokio::test]
async fn test_return_must_match_sale_product() {
    let db = memory_db().await;
    let clerk = user(&db, "clerk@example.com", false).await;
    let buyer = customer(&db, "Ada").await;
    let sold_product = product(&db, &clerk, "KB-001", 10, 0).await.product.id;
    let other_product = product(&db, &clerk, "MS-001", 10, 0).await.product.id;

    let sold = db
        .workflow()
        .record_sale(sale(sold_product, buyer, 2, 500), &clerk)
        .await
        .unwrap();

    let result = db
        .workflow()
        .record_return(sale_return(sold.sale.id, other_product, 1), &clerk)
        .await;
    assert!(matches!(result, Err(DbError::Core(CoreError::Validation(_)))));
    assert_eq!(stock_of(&db, sold_product).await, 8);
    assert_eq!(stock_of(&db, other_product).await, 10);

    let missing = db
        .workflow()
        .record_return(sale_return(404, sold_product, 1), &clerk)
        .await;
    assert!(matches!(missing, Err(DbError::NotFound { ref entity, .. }) if entity == "Sale"));
}

#[tokio::test]
async fn test_workflow_respects_owner_scope() {
    let db = memory_db().await;
    let alice = user(&db, "alice@example.com", false).await;
    let bob = user(&db, "bob@example.com", false).await;
    let admin = user(&db, "admin@example.com", true).await;
    let buyer = customer(&db, "Ada").await;
    let p = product(&db, &alice, "ALICE-1", 10, 0).await.product.id;

    let hidden = db.workflow().record_sale(sale(p, buyer, 1, 100), &bob).await;
    assert!(matches!(hidden, Err(DbError::NotFound { .. })));

    let sold = db.workflow().record_sale(sale(p, buyer, 1, 100), &alice).await.unwrap();
    let hidden_return = db
        .workflow()
        .record_return(sale_return(sold.sale.id, p, 1), &bob)
        .await;
    assert!(matches!(hidden_return, Err(DbError::NotFound { .. })));

    // Superusers act on anyone's products
    db.workflow()
        .record_transaction(movement(p, TransactionType::In, 5), &admin)
        .await
        .unwrap();
    assert_eq!(stock_of(&db, p).await, 14);

    assert!(db.sales().get(sold.sale.id, bob.owner_scope()).await.unwrap().is_none());
    assert!(db.sales().get(sold.sale.id, alice.owner_scope()).await.unwrap().is_some());
}

#[tokio::test]
async fn test_sales_filters_and_summary() {
    let db = memory_db().await;
    let alice = user(&db, "alice@example.com", false).await;
    let bob = user(&db, "bob@example.com", false).await;
    let ada = customer(&db, "Ada").await;
    let grace = customer(&db, "Grace").await;
    let pa = product(&db, &alice, "ALICE-1", 100, 0).await.product.id;
    let pb = product(&db, &bob, "BOB-1", 100, 0).await.product.id;

    let workflow = db.workflow();
    workflow.record_sale(sale(pa, ada, 1, 1000), &alice).await.unwrap();
    workflow.record_sale(sale(pa, grace, 2, 1000), &alice).await.unwrap();
    workflow.record_sale(sale(pb, ada, 3, 500), &bob).await.unwrap();

    let today = Utc::now().date_naive();
    let yesterday = today.pred_opt().unwrap();

    let all = db.sales().get_daily(today, None).await.unwrap();
    assert_eq!(all.len(), 3);
    assert!(db.sales().get_daily(yesterday, None).await.unwrap().is_empty());

    let adas = db
        .sales()
        .get_by_customer(ada, Page::default(), None)
        .await
        .unwrap();
    assert_eq!(adas.len(), 2);

    let filter = SaleFilter {
        customer_id: Some(ada),
        start_date: Some(today),
        end_date: Some(today),
    };
    let alices_ada = db
        .sales()
        .get_filtered(filter, Page::default(), alice.owner_scope())
        .await
        .unwrap();
    assert_eq!(alices_ada.len(), 1);

    let everything = DateRange::from_dates(None, None).unwrap();
    let summary = db.sales().summary(everything, None).await.unwrap();
    assert_eq!(summary.total_sales, 3);
    assert_eq!(summary.total_revenue_cents, 1000 + 2000 + 1500);

    let alices = db.sales().summary(everything, alice.owner_scope()).await.unwrap();
    assert_eq!(alices.total_sales, 2);
    assert_eq!(alices.total_revenue_cents, 3000);

    let empty = db
        .sales()
        .summary(DateRange::day(yesterday).unwrap(), None)
        .await
        .unwrap();
    assert_eq!(empty.total_sales, 0);
    assert_eq!(empty.total_revenue_cents, 0);

    let backwards = SaleFilter {
        customer_id: None,
        start_date: Some(today),
        end_date: Some(yesterday),
    };
    let invalid = db.sales().get_filtered(backwards, Page::default(), None).await;
    assert!(matches!(invalid, Err(DbError::Core(CoreError::Validation(_)))));
}

#[tokio::test]
async fn test_returns_filter_by_product() {
    let db = memory_db().await;
    let clerk = user(&db, "clerk@example.com", false).await;
    let buyer = customer(&db, "Ada").await;
    let kb = product(&db, &clerk, "KB-001", 10, 0).await.product.id;
    let ms = product(&db, &clerk, "MS-001", 10, 0).await.product.id;

    let workflow = db.workflow();
    let s1 = workflow.record_sale(sale(kb, buyer, 2, 100), &clerk).await.unwrap();
    let s2 = workflow.record_sale(sale(ms, buyer, 2, 100), &clerk).await.unwrap();
    workflow.record_return(sale_return(s1.sale.id, kb, 1), &clerk).await.unwrap();
    workflow.record_return(sale_return(s2.sale.id, ms, 2), &clerk).await.unwrap();

    let filter = ReturnFilter {
        sale_id: None,
        product_id: Some(ms),
    };
    let found = db
        .returns()
        .get_filtered(filter, Page::default(), None)
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].sale_id, s2.sale.id);
    assert_eq!(db.returns().get_multi(Page::default(), None).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_concurrent_sales_never_oversell() {
    let path = std::env::temp_dir().join(format!("stockroom-{}.db", uuid::Uuid::new_v4()));
    let db = Database::new(DbConfig::new(&path).max_connections(8))
        .await
        .unwrap();

    let clerk = user(&db, "clerk@example.com", false).await;
    let buyer = customer(&db, "Ada").await;
    let p = product(&db, &clerk, "KB-001", 5, 0).await.product.id;

    let mut handles = Vec::new();
    for _ in 0..12 {
        let workflow = db.workflow();
        let clerk = clerk.clone();
        handles.push(tokio::spawn(async move {
            workflow.record_sale(sale(p, buyer, 1, 100), &clerk).await
        }));
    }

    let mut succeeded = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => succeeded += 1,
            Err(DbError::Core(CoreError::InsufficientStock { .. })) => rejected += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(succeeded, 5);
    assert_eq!(rejected, 7);
    assert_eq!(stock_of(&db, p).await, 0);
    assert_eq!(db.sales().get_multi(Page::default(), None).await.unwrap().len(), 5);

    db.close().await;
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
    }
}
