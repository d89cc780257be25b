//! Fixed value catalogs the synthesizer draws categorical fields from.

pub const PAGE_PATHS: &[&str] = &["/", "/home", "/product", "/cart", "/checkout"];

pub const DEVICE_TYPES: &[&str] = &["desktop", "mobile", "tablet"];

pub const BROWSERS: &[&str] = &["Chrome", "Safari", "Edge", "Firefox"];

pub const COUNTRIES: &[&str] = &["KR", "US", "JP", "CN"];

pub const CITIES: &[&str] = &["Seoul", "Busan", "Tokyo", "Beijing"];

pub const LANGUAGES: &[&str] = &["ko-KR", "en-US", "ja-JP"];

pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64)",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)",
    "Mozilla/5.0 (Linux; Android 10)",
];

pub const GENDERS: &[&str] = &["M", "F"];

/// Probability that `user_age` is present on a synthesized event.
pub const AGE_PRESENT_PROBABILITY: f64 = 0.7;
/// Probability that `user_gender` is present on a synthesized event.
pub const GENDER_PRESENT_PROBABILITY: f64 = 0.5;

/// Inclusive lower bound of synthesized ages.
pub const MIN_AGE: u8 = 18;
/// Exclusive upper bound of synthesized ages.
pub const MAX_AGE: u8 = 78;

/// Exclusive upper bound of the simulated time-on-page, in seconds.
pub const MAX_TIME_ON_PAGE_SECONDS: u32 = 300;

/// Exclusive upper bound of numeric anonymous user ids.
pub const USER_ID_SPACE: u32 = 1_000_000;

pub const EVENT_NAME: &str = "auto_click";
pub const TRAFFIC_MEDIUM: &str = "direct";
pub const TRAFFIC_SOURCE: &str = "cli_simulator";
pub const PAGE_TITLE: &str = "CLI Simulate";
pub const EVENT_TIMEZONE: &str = "Asia/Seoul";
pub const DEVICE_OS: &str = "Linux";
pub const SCREEN_RESOLUTION: &str = "1920x1080";
pub const VIEWPORT_SIZE: &str = "1920x900";
pub const SDK_KEY: &str = "test_sdk_key";
