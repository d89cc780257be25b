use serde::{Deserialize, Serialize};

/// One simulated user-interaction event, as posted to the collector.
///
/// Optional fields are `None` when logically absent and encode as JSON
/// `null`; they are never replaced by an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub event_name: String,
    pub timestamp: String,
    pub client_id: String,
    pub user_id: Option<String>,
    pub session_id: String,
    pub device_type: String,
    pub traffic_medium: String,
    pub traffic_source: String,
    pub traffic_campaign: Option<String>,

    // Page context
    pub page_path: String,
    pub page_title: String,
    pub referrer: String,
    pub click_x: Option<u16>,
    pub click_y: Option<u16>,
    pub page_x: Option<u16>,
    pub page_y: Option<u16>,

    // Click target
    pub target_text: String,
    pub target_tag: String,
    pub target_class: String,
    pub target_id: String,
    pub target_href: String,
    pub target_type: String,
    pub target_value: String,
    pub is_button: u8,
    pub is_link: u8,
    pub is_input: u8,
    pub is_textarea: u8,
    pub is_select: u8,

    // Element metadata
    pub element_tag: String,
    pub element_id: String,
    pub element_class: String,
    pub element_text: String,
    pub element_path: String,

    // Geo, device and browser
    pub country: String,
    pub city: String,
    pub timezone: String,
    pub device_os: String,
    pub browser: String,
    pub language: String,
    pub user_agent: String,
    pub screen_resolution: String,
    pub viewport_size: String,
    pub utm_params: String,

    // Form metadata
    pub form_action: String,
    pub form_method: String,
    pub form_id: String,
    pub form_class: String,
    pub form_fields: String,
    pub form_field_count: u8,

    // Demographics
    pub user_gender: Option<String>,
    pub user_age: Option<u8>,

    pub time_on_page_seconds: u32,
    pub sdk_key: String,
}

impl EventRecord {
    /// Number of fields in the wire schema.
    pub const FIELD_COUNT: usize = 53;
}
