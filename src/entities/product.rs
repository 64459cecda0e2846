use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Text")]
    pub full_description: String,
    pub price: Decimal,
    pub category: Category,
    // URL, the images themselves are hosted elsewhere
    pub image: String,
    // comma separated
    pub ingredients: String,
    pub calories: Option<i32>,
    pub protein: String,
    pub carbs: String,
    #[sea_orm(default = true)]
    pub is_available: bool,
}

impl Model {
    pub fn ingredients_list(&self) -> Vec<String> {
        if self.ingredients.is_empty() {
            return Vec::new();
        }
        self.ingredients
            .split(',')
            .map(|ing| ing.trim().to_string())
            .collect()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Copy, PartialEq, Debug, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(
    enum_name = "category_enum",
    db_type = "String(StringLen::N(255))",
    rs_type = "String"
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[sea_orm(string_value = "breakfast")]
    Breakfast,
    #[sea_orm(string_value = "main")]
    Main,
    #[sea_orm(string_value = "salad")]
    Salad,
    #[sea_orm(string_value = "drink")]
    Drink,
    #[sea_orm(string_value = "dessert")]
    Dessert,
    #[sea_orm(string_value = "child")]
    Child,
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "breakfast" => Ok(Self::Breakfast),
            "main" => Ok(Self::Main),
            "salad" => Ok(Self::Salad),
            "drink" => Ok(Self::Drink),
            "dessert" => Ok(Self::Dessert),
            "child" => Ok(Self::Child),
            _ => Err(format!("Invalid category: {}", s)),
        }
    }
}
