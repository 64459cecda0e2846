use crate::entities::order::Entity as Order;
use crate::entities::product::Entity as Product;
use sea_orm::entity::prelude::*;
use serde::Serialize;

// Title and price are copied from the product at checkout time, so the
// line keeps making sense after the product is edited or deleted.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "order_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(indexed)]
    pub order_id: i32,
    pub product_id: Option<i32>,
    pub product_title: String,
    pub product_price: Decimal,
    pub quantity: u32,
}

impl Model {
    pub fn line_total(&self) -> Decimal {
        self.product_price * Decimal::from(self.quantity)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Order",
        from = "crate::entities::order_item::Column::OrderId",
        to = "crate::entities::order::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Order,
    #[sea_orm(
        belongs_to = "Product",
        from = "crate::entities::order_item::Column::ProductId",
        to = "crate::entities::product::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Product,
}

impl ActiveModelBehavior for ActiveModel {}

impl Related<crate::entities::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl Related<crate::entities::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn line_total_is_price_times_quantity() {
        let item = Model {
            id: 1,
            order_id: 1,
            product_id: Some(3),
            product_title: "Fruit salad".to_string(),
            product_price: Decimal::new(19950, 2), // 199.50
            quantity: 3,
        };
        assert_eq!(item.line_total(), Decimal::new(59850, 2)); // 598.50
    }
}
