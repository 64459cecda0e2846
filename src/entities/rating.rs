use crate::entities::user::Entity as User;
use sea_orm::entity::prelude::*;
use serde::Serialize;

// Allowed codes for the categorical criteria, checked at the API boundary.
pub const FOOD_TASTE_CHOICES: [&str; 5] = ["excellent", "good", "average", "poor", "bad"];
pub const PORTION_SIZE_CHOICES: [&str; 3] = ["large", "normal", "small"];
pub const SPEED_SERVICE_CHOICES: [&str; 4] = ["fast", "normal", "slow", "very_slow"];
pub const STAFF_FRIENDLINESS_CHOICES: [&str; 4] = ["excellent", "good", "average", "poor"];
pub const PRICE_QUALITY_CHOICES: [&str; 4] = ["excellent", "good", "fair", "poor"];
pub const CHILD_FRIENDLY_CHOICES: [&str; 4] = ["excellent", "good", "average", "poor"];
pub const RECOMMEND_CHOICES: [&str; 3] = ["yes", "maybe", "no"];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "cafe_ratings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    // star criteria, 1-5 each
    pub food_quality: i32,
    pub service_quality: i32,
    pub atmosphere: i32,
    pub cleanliness: i32,
    // categorical criteria
    pub food_taste: String,
    pub portion_size: String,
    pub speed_service: String,
    pub staff_friendliness: String,
    pub price_quality: String,
    pub child_friendly: String,
    pub recommend: String,
    #[sea_orm(column_type = "Text")]
    pub comment: String,
    pub overall_rating: f64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "User",
        from = "Column::UserId",
        to = "crate::entities::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl ActiveModelBehavior for ActiveModel {}

impl Related<crate::entities::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

// The overall score is the mean of the four star criteria; the categorical
// answers do not feed into it.
pub fn overall_rating(
    food_quality: i32,
    service_quality: i32,
    atmosphere: i32,
    cleanliness: i32,
) -> f64 {
    (food_quality + service_quality + atmosphere + cleanliness) as f64 / 4.0
}
