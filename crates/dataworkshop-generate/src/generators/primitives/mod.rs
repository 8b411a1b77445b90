use chrono::{Duration, NaiveDate};
use rand::Rng;
use rand::RngCore;
use rand::seq::IndexedRandom;

use dataworkshop_core::DECIMAL_SCALE;

use crate::generators::GeneratedValue;

/// Random UUID v4 drawn from the row RNG.
pub fn uuid_v4(rng: &mut dyn RngCore) -> GeneratedValue {
    let mut bytes = [0_u8; 16];
    rng.fill_bytes(&mut bytes);
    let uuid = uuid::Builder::from_random_bytes(bytes).into_uuid();
    GeneratedValue::Uuid(uuid.to_string())
}

/// Uniform integer in the closed interval `[min, max]`.
pub fn int_range(min: i64, max: i64, rng: &mut dyn RngCore) -> GeneratedValue {
    GeneratedValue::Int(rng.random_range(min..=max))
}

/// Uniform decimal over the scaled grid `[low, high]` (see
/// [`dataworkshop_core::decimal_scaled_range`]).
pub fn decimal_scaled(low: i64, high: i64, rng: &mut dyn RngCore) -> GeneratedValue {
    let scaled = rng.random_range(low..=high);
    let factor = 10_f64.powi(DECIMAL_SCALE);
    GeneratedValue::Float(scaled as f64 / factor)
}

/// Uniform date in `[start, start + span_days]`.
pub fn date_range(start: NaiveDate, span_days: i64, rng: &mut dyn RngCore) -> GeneratedValue {
    let offset = rng.random_range(0..=span_days);
    GeneratedValue::Date(start + Duration::days(offset))
}

/// Uniform pick with replacement; `Null` only for an empty list.
pub fn pick_text(values: &[String], rng: &mut dyn RngCore) -> GeneratedValue {
    values
        .choose(rng)
        .map(|value| GeneratedValue::Text(value.clone()))
        .unwrap_or(GeneratedValue::Null)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn uuid_has_v4_layout() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let GeneratedValue::Uuid(text) = uuid_v4(&mut rng) else {
            panic!("expected uuid");
        };
        let parsed = uuid::Uuid::parse_str(&text).expect("valid uuid");
        assert_eq!(parsed.get_version_num(), 4);
        assert_eq!(text.len(), 36);
    }

    #[test]
    fn single_day_span_returns_start() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let day = NaiveDate::from_ymd_opt(2024, 2, 29).expect("date");
        assert_eq!(date_range(day, 0, &mut rng), GeneratedValue::Date(day));
    }

    #[test]
    fn pick_from_empty_list_is_null() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assert!(pick_text(&[], &mut rng).is_null());
    }
}
