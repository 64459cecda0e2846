use crate::entities::user::Entity as User;
use chrono::{Duration, NaiveDate, NaiveTime};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

pub const HOURLY_RATE: i64 = 2500;
pub const MIN_DURATION_HOURS: i32 = 1;
pub const MAX_DURATION_HOURS: i32 = 8;
// Bookings are taken at most 90 days ahead.
pub const MAX_ADVANCE_DAYS: i64 = 90;

pub fn opening_time() -> NaiveTime {
    NaiveTime::from_hms_opt(10, 0, 0).expect("valid opening time")
}

// Latest allowed start. The cafe itself closes at 22:00.
pub fn last_start_time() -> NaiveTime {
    NaiveTime::from_hms_opt(20, 0, 0).expect("valid last start time")
}

pub fn closing_time() -> NaiveTime {
    NaiveTime::from_hms_opt(22, 0, 0).expect("valid closing time")
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    #[sea_orm(indexed)]
    pub event_date: Date,
    pub event_time: Time,
    pub event_duration: i32,
    pub event_end_time: Time,
    pub guests_count: i32,
    pub event_type: EventType,
    // list of service codes, e.g. ["animator", "cake"]
    pub services: Json,
    pub phone: String,
    #[sea_orm(column_type = "Text")]
    pub comments: String,
    #[sea_orm(indexed)]
    pub status: Status,
    pub base_cost: Decimal,
    pub services_cost: Decimal,
    pub total_cost: Decimal,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl Model {
    pub fn blocks_slot(&self) -> bool {
        matches!(self.status, Status::Pending | Status::Confirmed)
    }
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

// Open-interval test: touching ends ([14,16) then [16,18)) do not collide.
pub fn slots_overlap(
    candidate_start: NaiveTime,
    candidate_end: NaiveTime,
    existing_start: NaiveTime,
    existing_end: NaiveTime,
) -> bool {
    candidate_start < existing_end && candidate_end > existing_start
}

pub fn service_price(code: &str) -> i64 {
    match code {
        "animator" => 1000,
        "cake" => 1500,
        "decorations" => 2000,
        "photographer" => 2500,
        _ => 0,
    }
}

pub struct BookingCosts {
    pub base: Decimal,
    pub services: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Error, PartialEq)]
pub enum SlotError {
    #[error("Event date has already passed")]
    DateInPast,
    #[error("Bookings are accepted at most {MAX_ADVANCE_DAYS} days ahead")]
    TooFarAhead,
    #[error("The cafe opens at 10:00")]
    BeforeOpening,
    #[error("Events may start until 20:00")]
    AfterLastStart,
    #[error("The cafe closes at 22:00")]
    EndsAfterClosing,
    #[error("Duration should be between {MIN_DURATION_HOURS} and {MAX_DURATION_HOURS} hours")]
    BadDuration,
}

// Checks the candidate slot against business hours and the booking window,
// returning the computed end time when everything holds. `today` is passed
// in so the rules stay checkable without a clock.
pub fn validate_slot(
    event_date: NaiveDate,
    event_time: NaiveTime,
    duration_hours: i32,
    today: NaiveDate,
) -> Result<NaiveTime, SlotError> {
    if !(MIN_DURATION_HOURS..=MAX_DURATION_HOURS).contains(&duration_hours) {
        return Err(SlotError::BadDuration);
    }
    if event_date < today {
        return Err(SlotError::DateInPast);
    }
    if event_date > today + Duration::days(MAX_ADVANCE_DAYS) {
        return Err(SlotError::TooFarAhead);
    }
    if event_time < opening_time() {
        return Err(SlotError::BeforeOpening);
    }
    if event_time >= last_start_time() {
        return Err(SlotError::AfterLastStart);
    }
    // a non-zero remainder means the slot ran past midnight, which is
    // always past closing no matter what the wrapped time reads
    let (end, wrapped) =
        event_time.overflowing_add_signed(Duration::hours(duration_hours as i64));
    if wrapped != 0 || end > closing_time() {
        return Err(SlotError::EndsAfterClosing);
    }
    Ok(end)
}

pub fn calculate_costs(duration_hours: i32, services: &[String]) -> BookingCosts {
    let base = Decimal::from(HOURLY_RATE * duration_hours as i64);
    let services_sum: i64 = services.iter().map(|code| service_price(code)).sum();
    let services = Decimal::from(services_sum);
    BookingCosts {
        base,
        services,
        total: base + services,
    }
}

#[derive(Clone, Copy, PartialEq, Debug, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(
    enum_name = "booking_status_enum",
    db_type = "String(StringLen::N(255))",
    rs_type = "String"
)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
    #[sea_orm(string_value = "completed")]
    Completed,
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            _ => Err(format!("Invalid status: {}", s)),
        }
    }
}

impl ToString for Status {
    fn to_string(&self) -> String {
        match self {
            Self::Pending => "pending".to_string(),
            Self::Confirmed => "confirmed".to_string(),
            Self::Cancelled => "cancelled".to_string(),
            Self::Completed => "completed".to_string(),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Debug, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(
    enum_name = "event_type_enum",
    db_type = "String(StringLen::N(255))",
    rs_type = "String"
)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    #[sea_orm(string_value = "birthday")]
    Birthday,
    #[sea_orm(string_value = "holiday")]
    Holiday,
    #[sea_orm(string_value = "graduation")]
    Graduation,
    #[sea_orm(string_value = "other")]
    Other,
}

impl FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "birthday" => Ok(Self::Birthday),
            "holiday" => Ok(Self::Holiday),
            "graduation" => Ok(Self::Graduation),
            "other" => Ok(Self::Other),
            _ => Err(format!("Invalid event type: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn end_time_is_start_plus_duration() {
        let today = chrono::NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        for duration in MIN_DURATION_HOURS..=MAX_DURATION_HOURS {
            assert_eq!(
                validate_slot(today, at(10, 0), duration, today),
                Ok(at(10 + duration as u32, 0))
            );
        }
        assert_eq!(validate_slot(today, at(19, 30), 2, today), Ok(at(21, 30)));
    }

    #[test]
    fn overlapping_slots_are_detected() {
        assert!(slots_overlap(at(15, 0), at(17, 0), at(14, 0), at(16, 0)));
        assert!(slots_overlap(at(14, 0), at(16, 0), at(15, 0), at(17, 0)));
        // one inside the other
        assert!(slots_overlap(at(14, 30), at(15, 30), at(14, 0), at(16, 0)));
    }

    #[test]
    fn adjacent_slots_do_not_overlap() {
        assert!(!slots_overlap(at(16, 0), at(18, 0), at(14, 0), at(16, 0)));
        assert!(!slots_overlap(at(12, 0), at(14, 0), at(14, 0), at(16, 0)));
    }

    #[test]
    fn cost_covers_hours_and_services() {
        let services = vec!["animator".to_string(), "cake".to_string()];
        let costs = calculate_costs(2, &services);
        assert_eq!(costs.base, Decimal::from(5000));
        assert_eq!(costs.services, Decimal::from(2500));
        assert_eq!(costs.total, Decimal::from(7500));
    }

    #[test]
    fn unknown_services_cost_nothing() {
        let services = vec!["pony_rides".to_string()];
        let costs = calculate_costs(1, &services);
        assert_eq!(costs.services, Decimal::from(0));
        assert_eq!(costs.total, Decimal::from(HOURLY_RATE));
    }

    #[test]
    fn slot_validation_enforces_window_and_hours() {
        let today = chrono::NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let in_week = today + chrono::Duration::days(7);

        assert_eq!(validate_slot(in_week, at(14, 0), 2, today), Ok(at(16, 0)));
        // boundary: today itself and the 90th day are fine
        assert!(validate_slot(today, at(10, 0), 1, today).is_ok());
        assert!(validate_slot(today + chrono::Duration::days(90), at(10, 0), 1, today).is_ok());

        assert_eq!(
            validate_slot(today - chrono::Duration::days(1), at(14, 0), 2, today),
            Err(SlotError::DateInPast)
        );
        assert_eq!(
            validate_slot(today + chrono::Duration::days(91), at(14, 0), 2, today),
            Err(SlotError::TooFarAhead)
        );
        assert_eq!(
            validate_slot(in_week, at(9, 30), 2, today),
            Err(SlotError::BeforeOpening)
        );
        assert_eq!(
            validate_slot(in_week, at(20, 0), 1, today),
            Err(SlotError::AfterLastStart)
        );
        assert_eq!(
            validate_slot(in_week, at(19, 0), 4, today),
            Err(SlotError::EndsAfterClosing)
        );
        assert_eq!(
            validate_slot(in_week, at(14, 0), 9, today),
            Err(SlotError::BadDuration)
        );
    }

    // An end at or past midnight wraps to a small NaiveTime; the closing
    // check must not be fooled by that.
    #[test]
    fn slots_running_past_midnight_are_rejected() {
        let today = chrono::NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let in_week = today + chrono::Duration::days(7);

        // 19:00 + 5h = midnight exactly
        assert_eq!(
            validate_slot(in_week, at(19, 0), 5, today),
            Err(SlotError::EndsAfterClosing)
        );
        // 19:30 + 8h = 03:30 the next day
        assert_eq!(
            validate_slot(in_week, at(19, 30), 8, today),
            Err(SlotError::EndsAfterClosing)
        );
        assert_eq!(
            validate_slot(in_week, at(16, 0), 8, today),
            Err(SlotError::EndsAfterClosing)
        );
    }

    #[test]
    fn cancelled_bookings_do_not_block_the_slot() {
        let statuses = [
            (Status::Pending, true),
            (Status::Confirmed, true),
            (Status::Cancelled, false),
            (Status::Completed, false),
        ];
        for (status, blocks) in statuses {
            let model = Model {
                id: 1,
                user_id: 1,
                event_date: chrono::NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
                event_time: at(14, 0),
                event_duration: 2,
                event_end_time: at(16, 0),
                guests_count: 10,
                event_type: EventType::Birthday,
                services: serde_json::json!([]),
                phone: "+79990001122".to_string(),
                comments: String::new(),
                status,
                base_cost: Decimal::from(5000),
                services_cost: Decimal::from(0),
                total_cost: Decimal::from(5000),
                created_at: Default::default(),
                updated_at: Default::default(),
            };
            assert_eq!(model.blocks_slot(), blocks);
        }
    }
}
