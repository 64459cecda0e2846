pub mod booking;
pub mod cart;
pub mod contact_message;
pub mod delivery_info;
pub mod order;
pub mod order_item;
pub mod product;
pub mod rating;
pub mod user;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait, Schema, Set, TransactionTrait};
use std::sync::Arc;

use crate::entities::{
    booking::Entity as Booking, cart::Entity as Cart, contact_message::Entity as ContactMessage,
    delivery_info::Entity as DeliveryInfo, order::Entity as Order, order_item::Entity as OrderItem,
    product::Entity as Product, rating::Entity as CafeRating, user::Entity as User,
};

pub async fn setup_schema(db: &DatabaseConnection) {
    let schema = Schema::new(db.get_database_backend());
    let create_user_table = schema.create_table_from_entity(User);
    let create_product_table = schema.create_table_from_entity(Product);
    let create_cart_table = schema.create_table_from_entity(Cart);
    let create_delivery_info_table = schema.create_table_from_entity(DeliveryInfo);
    let create_order_table = schema.create_table_from_entity(Order);
    let create_order_item_table = schema.create_table_from_entity(OrderItem);
    let create_booking_table = schema.create_table_from_entity(Booking);
    let create_rating_table = schema.create_table_from_entity(CafeRating);
    let create_contact_message_table = schema.create_table_from_entity(ContactMessage);

    db.execute(db.get_database_backend().build(&create_user_table))
        .await
        .expect("Failed to create user schema");
    db.execute(db.get_database_backend().build(&create_product_table))
        .await
        .expect("Failed to create product schema");
    db.execute(db.get_database_backend().build(&create_cart_table))
        .await
        .expect("Failed to create cart schema");
    db.execute(db.get_database_backend().build(&create_delivery_info_table))
        .await
        .expect("Failed to create delivery info schema");
    db.execute(db.get_database_backend().build(&create_order_table))
        .await
        .expect("Failed to create order schema");
    db.execute(db.get_database_backend().build(&create_order_item_table))
        .await
        .expect("Failed to create order item schema");
    db.execute(db.get_database_backend().build(&create_booking_table))
        .await
        .expect("Failed to create booking schema");
    db.execute(db.get_database_backend().build(&create_rating_table))
        .await
        .expect("Failed to create rating schema");
    db.execute(db.get_database_backend().build(&create_contact_message_table))
        .await
        .expect("Failed to create contact message schema");
}

// Seeds an admin account, a demo customer and a starter menu so a fresh
// database is usable right away.
pub async fn primary_setup(db: Arc<DatabaseConnection>) {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password("Secret15".as_bytes(), &salt)
        .expect("Failed to hash password")
        .to_string();

    let new_admin = user::ActiveModel {
        email: Set("admin@cafe-raduga.ru".to_owned()),
        username: Set("admin".to_owned()),
        password: Set(password_hash.clone()),
        role: Set(user::Role::Admin),
        ..Default::default()
    };

    let new_user = user::ActiveModel {
        email: Set("user@example.com".to_owned()),
        username: Set("user".to_owned()),
        password: Set(password_hash),
        role: Set(user::Role::User),
        ..Default::default()
    };

    let starter_menu = [
        (
            "Каша молочная с ягодами",
            "Овсяная каша на молоке со свежими ягодами",
            Decimal::new(25000, 2),
            product::Category::Breakfast,
        ),
        (
            "Куриные котлетки с пюре",
            "Паровые котлетки из курицы с картофельным пюре",
            Decimal::new(32000, 2),
            product::Category::Child,
        ),
        (
            "Ягодный морс",
            "Домашний морс из клюквы и брусники",
            Decimal::new(12000, 2),
            product::Category::Drink,
        ),
        (
            "Торт Радуга",
            "Фирменный разноцветный бисквитный торт",
            Decimal::new(45000, 2),
            product::Category::Dessert,
        ),
    ];

    let products: Vec<product::ActiveModel> = starter_menu
        .into_iter()
        .map(|(title, description, price, category)| product::ActiveModel {
            title: Set(title.to_owned()),
            description: Set(description.to_owned()),
            full_description: Set(String::new()),
            price: Set(price),
            category: Set(category),
            image: Set(String::new()),
            ingredients: Set(String::new()),
            calories: Set(None),
            protein: Set(String::new()),
            carbs: Set(String::new()),
            is_available: Set(true),
            ..Default::default()
        })
        .collect();

    match db.begin().await {
        Ok(txn) => {
            let users = user::Entity::insert_many([new_user, new_admin]).exec(&txn).await;
            let menu = product::Entity::insert_many(products).exec(&txn).await;
            match (users, menu) {
                (Ok(_), Ok(_)) => match txn.commit().await {
                    Ok(_) => {}
                    Err(_) => {
                        panic!("Failed to run primary setup, but function requested.");
                    }
                },
                _ => {
                    let _ = txn.rollback().await;
                    panic!("Failed to run primary setup, but function requested.");
                }
            }
        }
        Err(_) => {
            panic!("Failed to run primary setup, but function requested.");
        }
    }
}
