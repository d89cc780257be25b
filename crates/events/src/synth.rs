use chrono::{DateTime, Utc};
use rand::Rng;
use uuid::Builder;

use crate::catalog::*;
use crate::record::EventRecord;

/// Wall-clock layout of the `timestamp` field.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Build a fresh randomized event stamped with the current wall-clock time.
pub fn synthesize<R: Rng + ?Sized>(rng: &mut R) -> EventRecord {
    synthesize_at(rng, Utc::now())
}

/// Build a randomized event stamped with `now`.
///
/// The output is a pure function of the generator state and `now`. The
/// identifiers fold `now` into their random draws, so generators that share a
/// seed still diverge across runs. The optional demographic values are always
/// drawn, so whether they end up present never shifts the fields of later
/// events.
pub fn synthesize_at<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>) -> EventRecord {
    let clock = clock_mix(now);

    let user_draw = rng.gen_range(0..USER_ID_SPACE);
    let user_id = ((u64::from(user_draw) + clock % u64::from(USER_ID_SPACE))
        % u64::from(USER_ID_SPACE))
    .to_string();

    let entropy: u128 = rng.gen();
    let stamp = (u128::from(clock) << 64) | u128::from(clock.rotate_left(32));
    let client_id = Builder::from_random_bytes((entropy ^ stamp).to_be_bytes())
        .into_uuid()
        .to_string();
    let session_id = format!("sess_{}_{}", now.timestamp_millis(), &client_id[..6]);
    let target_text = format!("button {}", rng.gen_range(0..10u8));

    let device_type = pick(rng, DEVICE_TYPES);
    let page_path = pick(rng, PAGE_PATHS);
    let country = pick(rng, COUNTRIES);
    let city = pick(rng, CITIES);
    let browser = pick(rng, BROWSERS);
    let language = pick(rng, LANGUAGES);
    let user_agent = pick(rng, USER_AGENTS);

    let age_roll: f64 = rng.gen();
    let age = rng.gen_range(MIN_AGE..MAX_AGE);
    let gender_roll: f64 = rng.gen();
    let gender = pick(rng, GENDERS);

    let time_on_page_seconds = rng.gen_range(0..MAX_TIME_ON_PAGE_SECONDS);

    EventRecord {
        event_name: EVENT_NAME.to_string(),
        timestamp: now.format(TIMESTAMP_FORMAT).to_string(),
        client_id,
        user_id: Some(user_id),
        session_id,
        device_type: device_type.to_string(),
        traffic_medium: TRAFFIC_MEDIUM.to_string(),
        traffic_source: TRAFFIC_SOURCE.to_string(),
        traffic_campaign: None,
        page_path: page_path.to_string(),
        page_title: PAGE_TITLE.to_string(),
        referrer: String::new(),
        click_x: None,
        click_y: None,
        page_x: None,
        page_y: None,
        target_text,
        target_tag: "button".to_string(),
        target_class: String::new(),
        target_id: String::new(),
        target_href: String::new(),
        target_type: String::new(),
        target_value: String::new(),
        is_button: 1,
        is_link: 0,
        is_input: 0,
        is_textarea: 0,
        is_select: 0,
        element_tag: "button".to_string(),
        element_id: String::new(),
        element_class: String::new(),
        element_text: String::new(),
        element_path: String::new(),
        country: country.to_string(),
        city: city.to_string(),
        timezone: EVENT_TIMEZONE.to_string(),
        device_os: DEVICE_OS.to_string(),
        browser: browser.to_string(),
        language: language.to_string(),
        user_agent: user_agent.to_string(),
        screen_resolution: SCREEN_RESOLUTION.to_string(),
        viewport_size: VIEWPORT_SIZE.to_string(),
        utm_params: String::new(),
        form_action: String::new(),
        form_method: String::new(),
        form_id: String::new(),
        form_class: String::new(),
        form_fields: String::new(),
        form_field_count: 0,
        user_gender: (gender_roll < GENDER_PRESENT_PROBABILITY).then(|| gender.to_string()),
        user_age: (age_roll < AGE_PRESENT_PROBABILITY).then_some(age),
        time_on_page_seconds,
        sdk_key: SDK_KEY.to_string(),
    }
}

/// Scrambled wall-clock value (splitmix64 finalizer over the nanosecond stamp).
fn clock_mix(now: DateTime<Utc>) -> u64 {
    let nanos = now
        .timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp_micros().wrapping_mul(1_000));
    let mut z = (nanos as u64).wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn pick<R: Rng + ?Sized>(rng: &mut R, catalog: &[&'static str]) -> &'static str {
    catalog[rng.gen_range(0..catalog.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 45).unwrap()
    }

    #[test]
    fn same_seed_and_time_yield_same_event() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        for _ in 0..16 {
            assert_eq!(synthesize_at(&mut a, fixed_now()), synthesize_at(&mut b, fixed_now()));
        }
    }

    #[test]
    fn same_seed_at_different_times_yields_different_identifiers() {
        let later = Utc.with_ymd_and_hms(2025, 8, 1, 9, 0, 0).unwrap();
        let mut early_ids = HashSet::new();
        let mut early_users = Vec::new();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..8 {
            let event = synthesize_at(&mut rng, fixed_now());
            early_ids.insert(event.client_id);
            early_users.push(event.user_id);
        }

        let mut rng = StdRng::seed_from_u64(7);
        let mut later_users = Vec::new();
        for _ in 0..8 {
            let event = synthesize_at(&mut rng, later);
            assert!(!early_ids.contains(&event.client_id));
            later_users.push(event.user_id);
        }
        assert_ne!(early_users, later_users);
    }

    #[test]
    fn nearby_instants_still_change_client_id() {
        let now = fixed_now();
        let next = now + chrono::Duration::nanoseconds(1);
        let a = synthesize_at(&mut StdRng::seed_from_u64(3), now);
        let b = synthesize_at(&mut StdRng::seed_from_u64(3), next);
        assert_ne!(a.client_id, b.client_id);
        assert_eq!(a.device_type, b.device_type);
    }

    #[test]
    fn identifiers_are_well_formed() {
        let mut rng = StdRng::seed_from_u64(1);
        let event = synthesize_at(&mut rng, fixed_now());

        assert_eq!(event.client_id.len(), 36);
        assert_eq!(event.client_id.matches('-').count(), 4);
        assert!(event
            .session_id
            .starts_with(&format!("sess_{}_", fixed_now().timestamp_millis())));
        assert!(event.session_id.ends_with(&event.client_id[..6]));
        let uid: u32 = event.user_id.as_deref().unwrap().parse().unwrap();
        assert!(uid < USER_ID_SPACE);
        assert_eq!(event.timestamp, "2024-03-01 12:30:45.000");
    }

    #[test]
    fn age_presence_tracks_probability() {
        let mut rng = StdRng::seed_from_u64(0xA6E);
        let draws = 10_000;
        let present = (0..draws)
            .filter(|_| synthesize_at(&mut rng, fixed_now()).user_age.is_some())
            .count();
        let fraction = present as f64 / draws as f64;
        assert!(
            (fraction - AGE_PRESENT_PROBABILITY).abs() < 0.03,
            "age present fraction {fraction}"
        );
    }

    #[test]
    fn gender_presence_tracks_probability() {
        let mut rng = StdRng::seed_from_u64(0x6E9);
        let draws = 10_000;
        let present = (0..draws)
            .filter(|_| synthesize_at(&mut rng, fixed_now()).user_gender.is_some())
            .count();
        let fraction = present as f64 / draws as f64;
        assert!(
            (fraction - GENDER_PRESENT_PROBABILITY).abs() < 0.03,
            "gender present fraction {fraction}"
        );
    }
}
