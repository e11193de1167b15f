//! Framework-neutral WASM <-> JavaScript bridge.

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use serde_json::{Map, Value};
use serde_wasm_bindgen::{from_value, to_value};
use vitals_core::{AdminEmailPolicy, UserOverview, VitalsConfig, VitalsError};
use vitals_records::overview::AdminOverview;
use vitals_synth::Profile;
use wasm_bindgen::prelude::*;

#[derive(Deserialize)]
struct JsVitalsConfig {
    #[serde(default)]
    window_days: Option<usize>,
    #[serde(default)]
    fetch_limit: Option<usize>,
    #[serde(default)]
    admin_email: Option<String>,
}

impl From<JsVitalsConfig> for VitalsConfig {
    fn from(cfg: JsVitalsConfig) -> Self {
        let mut base = VitalsConfig::default();
        if let Some(days) = cfg.window_days.filter(|days| *days > 0) {
            base.window_days = days;
        }
        if let Some(limit) = cfg.fetch_limit.filter(|limit| *limit > 0) {
            base.fetch_limit = limit;
        }
        if let Some(email) = cfg.admin_email {
            base.admin_email = email;
        }
        base
    }
}

/// Reconcile an array of raw health documents into a daily summary.
#[wasm_bindgen]
pub fn summarize_records(records: JsValue, config: Option<JsValue>) -> Result<JsValue, JsValue> {
    set_panic_hook();

    let records_value = from_value::<Value>(records)
        .map_err(|err| JsValue::from_str(&format!("Could not read health records: {err}")))?;
    let cfg = read_config(config)?;

    let summary = vitals_records::summarize_records_value(&records_value, &cfg)
        .map_err(|err| JsValue::from_str(&format_vitals_error(err)))?;

    to_value(&summary).map_err(|err| JsValue::from_str(&format!("Could not serialize summary: {err}")))
}

/// Canonical sleep key in place, legacy key removed.
#[wasm_bindgen]
pub fn normalize_record(record: JsValue) -> Result<JsValue, JsValue> {
    set_panic_hook();

    let fields = from_value::<Map<String, Value>>(record)
        .map_err(|err| JsValue::from_str(&format!("Could not read record: {err}")))?;

    to_value(&vitals_records::normalize(&fields))
        .map_err(|err| JsValue::from_str(&format!("Could not serialize record: {err}")))
}

/// Synthetic hourly records for `from..=to` (`YYYY-MM-DD`), reproducible per seed.
#[wasm_bindgen]
pub fn generate_records(profile: &str, from: &str, to: &str, seed: u32) -> Result<JsValue, JsValue> {
    set_panic_hook();

    let profile: Profile = profile
        .parse()
        .map_err(|err| JsValue::from_str(&format_vitals_error(err)))?;
    let start = parse_date(from)?;
    let end = parse_date(to)?;

    let mut rng = StdRng::seed_from_u64(u64::from(seed));
    let events = vitals_synth::generate(profile, start, end, &mut rng);

    to_value(&events).map_err(|err| JsValue::from_str(&format!("Could not serialize records: {err}")))
}

/// Admin roll-ups over already loaded users.
#[wasm_bindgen]
pub fn admin_overview(users: JsValue, config: Option<JsValue>) -> Result<JsValue, JsValue> {
    set_panic_hook();

    let users = from_value::<Vec<UserOverview>>(users)
        .map_err(|err| JsValue::from_str(&format!("Could not read users: {err}")))?;
    let cfg = read_config(config)?;

    to_value(&AdminOverview::build(&users, cfg.window_days))
        .map_err(|err| JsValue::from_str(&format!("Could not serialize overview: {err}")))
}

#[wasm_bindgen]
pub fn is_admin_email(email: Option<String>, config: Option<JsValue>) -> Result<bool, JsValue> {
    let cfg = read_config(config)?;
    Ok(AdminEmailPolicy::from_config(&cfg).is_admin(email.as_deref()))
}

fn read_config(config: Option<JsValue>) -> Result<VitalsConfig, JsValue> {
    match config {
        Some(js_cfg) if !js_cfg.is_undefined() && !js_cfg.is_null() => {
            let cfg: JsVitalsConfig = from_value(js_cfg)
                .map_err(|err| JsValue::from_str(&format!("Could not read config: {err}")))?;
            Ok(VitalsConfig::from(cfg))
        }
        _ => Ok(VitalsConfig::default()),
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, JsValue> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|err| JsValue::from_str(&format!("Invalid date {value}: {err}")))
}

fn set_panic_hook() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

fn format_vitals_error(err: VitalsError) -> String {
    format!("Vitals error: {err}")
}
