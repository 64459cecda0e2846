use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// Per-session delivery selection, written by `POST /cart/delivery` and read
// back when the cart is shown or an order is placed.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "delivery_info")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub session_key: String,
    pub city: DeliveryCity,
    pub distance_km: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Copy, PartialEq, Debug, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(
    enum_name = "delivery_city_enum",
    db_type = "String(StringLen::N(255))",
    rs_type = "String"
)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryCity {
    #[sea_orm(string_value = "tula")]
    Tula,
    #[sea_orm(string_value = "moscow")]
    Moscow,
    #[sea_orm(string_value = "other")]
    Other,
}

impl DeliveryCity {
    // Unknown city keys are treated as "other", same as the checkout form does.
    pub fn parse_or_other(value: &str) -> DeliveryCity {
        DeliveryCity::from_str(value).unwrap_or(DeliveryCity::Other)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Tula => "Тула",
            Self::Moscow => "Москва",
            Self::Other => "Другой город",
        }
    }

    fn base_price(&self) -> i64 {
        match self {
            Self::Tula => 100,
            Self::Moscow => 300,
            Self::Other => 200,
        }
    }

    fn price_per_km(&self) -> i64 {
        match self {
            Self::Tula => 10,
            Self::Moscow => 15,
            Self::Other => 20,
        }
    }

    fn is_main_city(&self) -> bool {
        matches!(self, Self::Tula)
    }
}

// Main city ships for the flat base price, everywhere else pays per kilometer.
pub fn delivery_price(city: DeliveryCity, distance_km: i32) -> Decimal {
    if city.is_main_city() {
        Decimal::from(city.base_price())
    } else {
        Decimal::from(city.base_price() + distance_km as i64 * city.price_per_km())
    }
}

impl FromStr for DeliveryCity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tula" => Ok(Self::Tula),
            "moscow" => Ok(Self::Moscow),
            "other" => Ok(Self::Other),
            _ => Err(format!("Invalid city: {}", s)),
        }
    }
}

impl ToString for DeliveryCity {
    fn to_string(&self) -> String {
        match self {
            Self::Tula => "tula".to_string(),
            Self::Moscow => "moscow".to_string(),
            Self::Other => "other".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn main_city_is_flat_price_regardless_of_distance() {
        assert_eq!(delivery_price(DeliveryCity::Tula, 0), Decimal::from(100));
        assert_eq!(delivery_price(DeliveryCity::Tula, 45), Decimal::from(100));
    }

    #[test]
    fn moscow_charges_base_plus_per_km() {
        // 300 + 10 * 15
        assert_eq!(delivery_price(DeliveryCity::Moscow, 10), Decimal::from(450));
    }

    #[test]
    fn other_city_charges_base_plus_per_km() {
        // 200 + 5 * 20
        assert_eq!(delivery_price(DeliveryCity::Other, 5), Decimal::from(300));
    }

    #[test]
    fn unknown_city_key_falls_back_to_other() {
        assert_eq!(DeliveryCity::parse_or_other("piter"), DeliveryCity::Other);
        assert_eq!(DeliveryCity::parse_or_other("tula"), DeliveryCity::Tula);
    }
}
