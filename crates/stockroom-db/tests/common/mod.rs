#![allow(dead_code)]

use stockroom_core::{CustomerCreate, NewUser, Principal, ProductCreate, ProductDetail};
use stockroom_db::{Database, DbConfig};

pub async fn memory_db() -> Database {
    Database::new(DbConfig::in_memory()).await.unwrap()
}

pub async fn user(db: &Database, email: &str, is_superuser: bool) -> Principal {
    let user = db
        .users()
        .create(NewUser {
            email: email.to_string(),
            hashed_password: "not-a-real-hash".to_string(),
            full_name: None,
            is_active: true,
            is_superuser,
        })
        .await
        .unwrap();
    Principal::from_user(&user)
}

pub fn product_input(name: &str, sku: Option<&str>, stock: i64, min_quantity: i64) -> ProductCreate {
    ProductCreate {
        name: name.to_string(),
        description: None,
        sku: sku.map(str::to_string),
        barcode: None,
        price_cents: 999,
        cost_cents: 500,
        stock,
        min_quantity,
        category_id: None,
        supplier_id: None,
    }
}

pub async fn product(
    db: &Database,
    owner: &Principal,
    sku: &str,
    stock: i64,
    min_quantity: i64,
) -> ProductDetail {
    db.products()
        .create(product_input(sku, Some(sku), stock, min_quantity), owner.user_id)
        .await
        .unwrap()
}

pub async fn customer(db: &Database, name: &str) -> i64 {
    db.customers()
        .create(CustomerCreate {
            full_name: name.to_string(),
            email: None,
            phone: None,
            address: None,
        })
        .await
        .unwrap()
        .id
}

pub async fn stock_of(db: &Database, product_id: i64) -> i64 {
    db.products()
        .get(product_id, None)
        .await
        .unwrap()
        .unwrap()
        .product
        .stock
}
