use std::collections::HashSet;
use std::sync::Arc;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, SubsecRound, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use crate::domain::models::booking::Booking;
use crate::domain::models::schedule::{AvailabilityCheck, BlockedDate, WeeklyScheduleSlot};
use crate::domain::ports::{BookingRepository, ScheduleRepository};
use crate::error::AppError;

pub const SLOT_MINUTES: u32 = 30;
const TOTAL_MINUTES: u32 = 1440;

pub const REASON_BLOCKED: &str = "Leverandøren er ikke tilgjengelig denne dagen";
pub const REASON_OUTSIDE_HOURS: &str = "Tidspunktet er utenfor leverandørens arbeidstid";
pub const REASON_BOOKED: &str = "Tidspunktet er allerede booket";
pub const REASON_OFF_GRID: &str = "Tidspunktet må være på hel eller halv time";

/// 0 = Sunday ... 6 = Saturday
pub fn weekday_index(date: NaiveDate) -> i32 {
    date.weekday().num_days_from_sunday() as i32
}

pub fn parse_hhmm(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M").ok()
}

/// Minute-of-day bounds of a schedule slot. "23:59" closes the day.
fn window_minutes(slot: &WeeklyScheduleSlot) -> Option<(u32, u32)> {
    let start = parse_hhmm(&slot.start_time)?;
    let end = parse_hhmm(&slot.end_time)?;
    let start_idx = start.hour() * 60 + start.minute();
    let mut end_idx = end.hour() * 60 + end.minute();
    if end_idx == TOTAL_MINUTES - 1 { end_idx = TOTAL_MINUTES; }
    (start_idx < end_idx).then_some((start_idx, end_idx))
}

/// Bookable instants sit on the slot grid in local time, with no seconds or fractions.
pub fn ensure_on_grid(at: DateTime<Utc>, tz: Tz) -> Result<(), AppError> {
    let local = at.with_timezone(&tz);
    if local.minute() % SLOT_MINUTES != 0 || local.second() != 0 || local.nanosecond() != 0 {
        return Err(AppError::Validation(REASON_OFF_GRID.into()));
    }
    Ok(())
}

pub fn local_to_utc(naive: NaiveDateTime, tz: Tz) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&naive).earliest().map(|dt| dt.with_timezone(&Utc))
}

/// UTC instants of local midnight on `date` and on the day after.
pub fn day_bounds_utc(date: NaiveDate, tz: Tz) -> (DateTime<Utc>, DateTime<Utc>) {
    let start_naive = date.and_time(NaiveTime::MIN);
    let end_naive = start_naive + Duration::days(1);
    let start = local_to_utc(start_naive, tz).unwrap_or_else(|| Utc.from_utc_datetime(&start_naive));
    let end = local_to_utc(end_naive, tz).unwrap_or_else(|| Utc.from_utc_datetime(&end_naive));
    (start, end)
}

fn booked_local_times(existing_bookings: &[Booking], date: NaiveDate, tz: Tz) -> HashSet<NaiveTime> {
    existing_bookings
        .iter()
        .filter(|b| b.status.is_active())
        .map(|b| b.scheduled_at.with_timezone(&tz).naive_local())
        .filter(|local| local.date() == date)
        .map(|local| local.time().trunc_subsecs(0))
        .collect()
}

pub fn calculate_slots(
    date: NaiveDate,
    schedule: &[WeeklyScheduleSlot],
    blocked: Option<&BlockedDate>,
    existing_bookings: &[Booking],
    tz: Tz,
    now: DateTime<Utc>,
) -> Vec<String> {
    if blocked.is_some() {
        return Vec::new();
    }

    let day = weekday_index(date);
    let mut windows: Vec<(u32, u32)> = schedule
        .iter()
        .filter(|s| s.is_active && s.day_of_week == day)
        .filter_map(window_minutes)
        .collect();

    if windows.is_empty() {
        return Vec::new();
    }
    windows.sort();

    let booked = booked_local_times(existing_bookings, date, tz);
    let now_local = now.with_timezone(&tz).naive_local();

    let mut valid_slots = Vec::new();
    for (win_start, win_end) in windows {
        let mut cursor = win_start;
        while cursor < win_end {
            if let Some(t) = NaiveTime::from_hms_opt(cursor / 60, cursor % 60, 0)
                && date.and_time(t) > now_local
                && !booked.contains(&t) {
                valid_slots.push(t.format("%H:%M").to_string());
            }
            cursor += SLOT_MINUTES;
        }
    }

    valid_slots.sort();
    valid_slots.dedup();
    valid_slots
}

/// Single-instant variant of `calculate_slots`. The first failing check wins:
/// blocked date, then working hours, then existing bookings.
pub fn check_slot(
    at: NaiveDateTime,
    schedule: &[WeeklyScheduleSlot],
    blocked: Option<&BlockedDate>,
    existing_bookings: &[Booking],
    tz: Tz,
) -> AvailabilityCheck {
    if blocked.is_some() {
        return AvailabilityCheck::unavailable(REASON_BLOCKED);
    }

    let day = weekday_index(at.date());
    let minute = at.time().hour() * 60 + at.time().minute();
    let within_hours = schedule
        .iter()
        .filter(|s| s.is_active && s.day_of_week == day)
        .filter_map(window_minutes)
        .any(|(start, end)| start <= minute && minute < end);

    if !within_hours {
        return AvailabilityCheck::unavailable(REASON_OUTSIDE_HOURS);
    }

    let taken = existing_bookings
        .iter()
        .filter(|b| b.status.is_active())
        .any(|b| b.scheduled_at.with_timezone(&tz).naive_local().trunc_subsecs(0) == at.trunc_subsecs(0));

    if taken {
        return AvailabilityCheck::unavailable(REASON_BOOKED);
    }

    AvailabilityCheck::available()
}

#[derive(Clone)]
pub struct AvailabilityService {
    schedule_repo: Arc<dyn ScheduleRepository>,
    booking_repo: Arc<dyn BookingRepository>,
    tz: Tz,
}

impl AvailabilityService {
    pub fn new(schedule_repo: Arc<dyn ScheduleRepository>, booking_repo: Arc<dyn BookingRepository>, tz: Tz) -> Self {
        Self { schedule_repo, booking_repo, tz }
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }

    pub async fn available_slots(&self, provider_id: &str, date: NaiveDate) -> Result<Vec<String>, AppError> {
        let blocked = self.schedule_repo.find_blocked_date(provider_id, date).await?;
        if blocked.is_some() {
            return Ok(Vec::new());
        }

        let schedule = self.schedule_repo.list_active_for_day(provider_id, weekday_index(date)).await?;
        if schedule.is_empty() {
            return Ok(Vec::new());
        }

        let (day_start, day_end) = day_bounds_utc(date, self.tz);
        let bookings = self.booking_repo.list_active_by_range(provider_id, day_start, day_end).await?;

        Ok(calculate_slots(date, &schedule, None, &bookings, self.tz, Utc::now()))
    }

    pub async fn is_blocked_at(&self, provider_id: &str, at: DateTime<Utc>) -> Result<bool, AppError> {
        let date = at.with_timezone(&self.tz).date_naive();
        Ok(self.schedule_repo.find_blocked_date(provider_id, date).await?.is_some())
    }

    pub async fn check_availability(&self, provider_id: &str, at: DateTime<Utc>) -> Result<AvailabilityCheck, AppError> {
        let local = at.with_timezone(&self.tz).naive_local();
        let date = local.date();

        let blocked = self.schedule_repo.find_blocked_date(provider_id, date).await?;
        if blocked.is_some() {
            return Ok(AvailabilityCheck::unavailable(REASON_BLOCKED));
        }

        let schedule = self.schedule_repo.list_active_for_day(provider_id, weekday_index(date)).await?;
        let (day_start, day_end) = day_bounds_utc(date, self.tz);
        let bookings = self.booking_repo.list_active_by_range(provider_id, day_start, day_end).await?;

        Ok(check_slot(local, &schedule, None, &bookings, self.tz))
    }
}
