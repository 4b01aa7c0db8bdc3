//! Asynchronous client for the parking service's REST API.
//!
//! - One typed method per endpoint; DTOs stay private to this module.
//! - The slot list is cached briefly so route changes do not refetch it, and
//!   the last good copy is served (marked stale) when the service is down.

use std::{
    path::Path,
    sync::Arc,
    time::{Duration, SystemTime},
};

use reqwest::{multipart, Client, StatusCode, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use time::{
    format_description::{well_known::Rfc3339, FormatItem},
    macros::format_description,
    OffsetDateTime, PrimitiveDateTime,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::domain::{
    ClearReceipt, Detection, ParkedVehicle, Slot, SlotStatus, User, VehicleCategory,
};
use crate::util::version::user_agent;

const NAIVE_WITH_FRACTION: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]");
const NAIVE_SECONDS: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
    #[error("failed to read upload: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CacheStatus {
    Fresh,
    Cached,
    Stale,
}

#[derive(Clone, Debug)]
pub struct CachedPayload<T> {
    pub data: T,
    pub fetched_at: SystemTime,
    pub status: CacheStatus,
}

impl<T> CachedPayload<T> {
    fn new(data: T, fetched_at: SystemTime, status: CacheStatus) -> Self {
        Self {
            data,
            fetched_at,
            status,
        }
    }
}

#[derive(Default)]
struct SlotCache {
    slots: Option<Cached<Vec<Slot>>>,
}

#[derive(Clone)]
pub struct ParkingClient {
    http: Client,
    base_url: Url,
    cache: Arc<Mutex<SlotCache>>,
    ttl: Duration,
}

impl ParkingClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let http = Client::builder()
            .user_agent(user_agent())
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
            cache: Arc::new(Mutex::new(SlotCache::default())),
            ttl: config.slot_cache_ttl,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn login(&self, username: &str, vehicle_plate: &str) -> Result<User, ApiError> {
        let body = Credentials {
            username,
            vehicle_plate,
            vehicle_type: None,
        };
        let response: AuthResponse = self.post_json("login", &body).await?;
        info!(username, "logged in");
        Ok(response.user.into())
    }

    pub async fn register(
        &self,
        username: &str,
        vehicle_plate: &str,
        vehicle_type: Option<VehicleCategory>,
    ) -> Result<User, ApiError> {
        let body = Credentials {
            username,
            vehicle_plate,
            vehicle_type,
        };
        let response: AuthResponse = self.post_json("register", &body).await?;
        info!(username, "registered");
        let mut user = User::from(response.user);
        // The service does not echo the vehicle type back.
        user.vehicle_type = user.vehicle_type.or(vehicle_type);
        Ok(user)
    }

    /// Slots sorted by id. Serves a cached copy inside the TTL and the last
    /// good copy (marked stale) when the request fails.
    pub async fn list_slots(&self) -> Result<CachedPayload<Vec<Slot>>, ApiError> {
        if let Some(payload) = self.cached_slots().await {
            return Ok(payload);
        }

        match self.fetch_slots("slots").await {
            Ok(slots) => Ok(self.store_slots(slots).await),
            Err(error) => {
                if let Some(stale) = self.cached_slots_stale().await {
                    warn!("slot refresh failed, serving last known list: {error}");
                    return Ok(stale);
                }
                Err(error)
            }
        }
    }

    /// Drops the cached slot list so the next `list_slots` hits the service.
    pub async fn invalidate_slots(&self) {
        self.cache.lock().await.slots = None;
    }

    pub async fn book_slot(&self, slot_id: u32, vehicle_plate: &str) -> Result<Slot, ApiError> {
        let body = SlotActionBody {
            slot_id,
            vehicle_plate,
        };
        let dto: SlotDto = self.post_json("slots/book", &body).await?;
        self.invalidate_slots().await;
        info!(slot_id, "slot booked");
        Ok(dto.into())
    }

    pub async fn park_slot(&self, slot_id: u32, vehicle_plate: &str) -> Result<Slot, ApiError> {
        let body = SlotActionBody {
            slot_id,
            vehicle_plate,
        };
        let dto: SlotDto = self.post_json("slots/park", &body).await?;
        self.invalidate_slots().await;
        info!(slot_id, "slot parked");
        Ok(dto.into())
    }

    pub async fn clear_slot(&self, slot_id: u32, rate_per_hour: f64) -> Result<ClearReceipt, ApiError> {
        let body = ClearBody {
            slot_id,
            rate_per_hour,
        };
        let dto: ClearDto = self.post_json("slots/clear", &body).await?;
        self.invalidate_slots().await;
        info!(slot_id, fee = dto.fee, "slot cleared");
        Ok(dto.into())
    }

    /// Parked slots whose plate is on the employee whitelist.
    pub async fn parked_employee_slots(&self) -> Result<Vec<Slot>, ApiError> {
        self.fetch_slots("slots/parked-employees").await
    }

    /// Uploads one camera frame for vehicle and plate recognition.
    pub async fn predict_ocr(
        &self,
        file_name: &str,
        image: Vec<u8>,
    ) -> Result<Detection, ApiError> {
        let part = multipart::Part::bytes(image)
            .file_name(file_name.to_string())
            .mime_str(image_mime(file_name))?;
        let form = multipart::Form::new().part("file", part);
        let url = self.url("predict_ocr")?;
        debug!(%url, file_name, "uploading frame for recognition");
        let dto: DetectionDto = self.send(self.http.post(url).multipart(form)).await?;
        if dto.auto_parked.unwrap_or(false) {
            self.invalidate_slots().await;
        }
        Ok(dto.into())
    }

    pub async fn predict_ocr_file(&self, path: &Path) -> Result<Detection, ApiError> {
        let image = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.jpg".to_string());
        self.predict_ocr(&file_name, image).await
    }

    pub async fn parked_vehicles(&self) -> Result<Vec<ParkedVehicle>, ApiError> {
        let url = self.url("get_parked_vehicles")?;
        let raw: serde_json::Value = self.send(self.http.get(url)).await?;
        Ok(parse_parked_vehicles(raw))
    }

    pub async fn add_vehicle(
        &self,
        license_plate: &str,
        vehicle_type: VehicleCategory,
    ) -> Result<Option<String>, ApiError> {
        let body = VehicleBody {
            license_plate,
            vehicle_type: Some(vehicle_type),
        };
        let response: MessageDto = self.post_json("add_vehicle", &body).await?;
        info!(license_plate, "vehicle added");
        Ok(response.message)
    }

    pub async fn remove_vehicle(&self, license_plate: &str) -> Result<Option<String>, ApiError> {
        let body = VehicleBody {
            license_plate,
            vehicle_type: None,
        };
        let response: MessageDto = self.post_json("remove_vehicle", &body).await?;
        self.invalidate_slots().await;
        info!(license_plate, "vehicle removed");
        Ok(response.message)
    }

    async fn fetch_slots(&self, path: &str) -> Result<Vec<Slot>, ApiError> {
        let url = self.url(path)?;
        let dtos: Vec<SlotDto> = self.send(self.http.get(url)).await?;
        let mut slots: Vec<Slot> = dtos.into_iter().map(Slot::from).collect();
        slots.sort_by_key(|slot| slot.slot_id);
        debug!(count = slots.len(), path, "fetched slots");
        Ok(slots)
    }

    async fn cached_slots(&self) -> Option<CachedPayload<Vec<Slot>>> {
        let cache = self.cache.lock().await;
        cache
            .slots
            .as_ref()
            .and_then(|entry| entry.if_fresh(self.ttl))
    }

    async fn cached_slots_stale(&self) -> Option<CachedPayload<Vec<Slot>>> {
        let cache = self.cache.lock().await;
        cache.slots.as_ref().map(Cached::stale)
    }

    async fn store_slots(&self, data: Vec<Slot>) -> CachedPayload<Vec<Slot>> {
        let fetched_at = SystemTime::now();
        let payload = CachedPayload::new(data.clone(), fetched_at, CacheStatus::Fresh);
        self.cache.lock().await.slots = Some(Cached::new(data, fetched_at));
        payload
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path)?;
        debug!(%url, "POST");
        self.send(self.http.post(url).json(body)).await
    }

    async fn send<T>(&self, builder: reqwest::RequestBuilder) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let message = extract_error_message(status, &body);
        warn!(%status, "service rejected request: {message}");
        Err(ApiError::Rejected { status, message })
    }

    fn url(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(path)
    }
}

struct Cached<T> {
    value: T,
    fetched_at: SystemTime,
}

impl<T: Clone> Cached<T> {
    fn new(value: T, fetched_at: SystemTime) -> Self {
        Self { value, fetched_at }
    }

    fn if_fresh(&self, ttl: Duration) -> Option<CachedPayload<T>> {
        if self
            .fetched_at
            .elapsed()
            .map(|elapsed| elapsed <= ttl)
            .unwrap_or(false)
        {
            Some(CachedPayload::new(
                self.value.clone(),
                self.fetched_at,
                CacheStatus::Cached,
            ))
        } else {
            None
        }
    }

    fn stale(&self) -> CachedPayload<T> {
        CachedPayload::new(self.value.clone(), self.fetched_at, CacheStatus::Stale)
    }
}

#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a str,
    vehicle_plate: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    vehicle_type: Option<VehicleCategory>,
}

#[derive(Serialize)]
struct SlotActionBody<'a> {
    slot_id: u32,
    vehicle_plate: &'a str,
}

#[derive(Serialize)]
struct ClearBody {
    slot_id: u32,
    rate_per_hour: f64,
}

#[derive(Serialize)]
struct VehicleBody<'a> {
    license_plate: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    vehicle_type: Option<VehicleCategory>,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    #[serde(default)]
    #[allow(dead_code)]
    success: bool,
    user: UserDto,
}

#[derive(Debug, Deserialize)]
struct UserDto {
    username: String,
    vehicle_plate: String,
    #[serde(default)]
    vehicle_type: Option<String>,
}

impl From<UserDto> for User {
    fn from(dto: UserDto) -> Self {
        let vehicle_type = dto.vehicle_type.as_deref().and_then(|raw| {
            raw.parse::<VehicleCategory>()
                .map_err(|err| warn!("{err}; leaving vehicle type unset"))
                .ok()
        });
        Self {
            username: dto.username,
            vehicle_plate: dto.vehicle_plate,
            vehicle_type,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SlotDto {
    #[serde(deserialize_with = "u32_from_json")]
    slot_id: u32,
    #[serde(default)]
    status: SlotStatus,
    #[serde(default)]
    parked_vehicle_plate: Option<String>,
    #[serde(default)]
    parked_time: Option<String>,
}

impl From<SlotDto> for Slot {
    fn from(dto: SlotDto) -> Self {
        Self {
            slot_id: dto.slot_id,
            status: dto.status,
            parked_vehicle_plate: dto.parked_vehicle_plate.filter(|plate| !plate.is_empty()),
            parked_time: parse_timestamp(dto.parked_time.as_deref()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ClearDto {
    #[serde(deserialize_with = "u32_from_json")]
    slot_id: u32,
    #[serde(default)]
    parked_time: Option<String>,
    #[serde(default)]
    cleared_time: Option<String>,
    #[serde(default)]
    duration_hours: f64,
    fee: f64,
}

impl From<ClearDto> for ClearReceipt {
    fn from(dto: ClearDto) -> Self {
        Self {
            slot_id: dto.slot_id,
            parked_time: parse_timestamp(dto.parked_time.as_deref()),
            cleared_time: parse_timestamp(dto.cleared_time.as_deref()),
            duration_hours: dto.duration_hours,
            fee: dto.fee,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DetectionDto {
    #[serde(default)]
    vehicle_types: Vec<String>,
    #[serde(default)]
    recognized_plates: Vec<String>,
    #[serde(default)]
    annotated_image: Option<String>,
    #[serde(default, deserialize_with = "optional_u32_from_json")]
    suggested_slot: Option<u32>,
    #[serde(default)]
    auto_parked: Option<bool>,
    #[serde(default)]
    message: Option<String>,
}

impl From<DetectionDto> for Detection {
    fn from(dto: DetectionDto) -> Self {
        Self {
            vehicle_types: dto.vehicle_types,
            recognized_plates: dto.recognized_plates,
            annotated_image: dto.annotated_image,
            suggested_slot: dto.suggested_slot,
            auto_parked: dto.auto_parked.unwrap_or(false),
            message: dto.message,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ParkedVehicleDto {
    #[serde(default, deserialize_with = "optional_string_from_json")]
    id: Option<String>,
    license_plate: String,
    #[serde(default)]
    vehicle_type: Option<String>,
    #[serde(default)]
    parking_state: Option<String>,
    #[serde(default)]
    time_in: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ParkedVehiclesWrapper {
    vehicles: Vec<ParkedVehicleDto>,
}

impl From<ParkedVehicleDto> for ParkedVehicle {
    fn from(dto: ParkedVehicleDto) -> Self {
        Self {
            id: dto.id.unwrap_or_else(|| dto.license_plate.clone()),
            license_plate: dto.license_plate,
            vehicle_type: dto.vehicle_type,
            parking_state: dto.parking_state,
            time_in: parse_timestamp(dto.time_in.as_deref()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct MessageDto {
    #[serde(default)]
    message: Option<String>,
}

fn parse_parked_vehicles(value: serde_json::Value) -> Vec<ParkedVehicle> {
    if let Ok(wrapper) = serde_json::from_value::<ParkedVehiclesWrapper>(value.clone()) {
        return wrapper.vehicles.into_iter().map(ParkedVehicle::from).collect();
    }

    if let Ok(entries) = serde_json::from_value::<Vec<ParkedVehicleDto>>(value) {
        return entries.into_iter().map(ParkedVehicle::from).collect();
    }

    warn!("unrecognised parked-vehicle payload; showing an empty list");
    Vec::new()
}

/// Accepts RFC 3339 and the offset-less ISO form the service emits for UTC.
pub fn parse_timestamp(raw: Option<&str>) -> Option<OffsetDateTime> {
    let value = raw?.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(parsed) = OffsetDateTime::parse(value, &Rfc3339) {
        return Some(parsed);
    }

    let naive = PrimitiveDateTime::parse(value, NAIVE_WITH_FRACTION)
        .or_else(|_| PrimitiveDateTime::parse(value, NAIVE_SECONDS));
    match naive {
        Ok(parsed) => Some(parsed.assume_utc()),
        Err(err) => {
            warn!("unparseable timestamp {value:?}: {err}");
            None
        }
    }
}

/// Best human-readable reason from an error body: FastAPI `detail`
/// (string or validation list), then `error`, then `message`.
pub fn extract_error_message(status: StatusCode, body: &str) -> String {
    let fallback = || {
        status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| format!("request failed with status {}", status.as_u16()))
    };

    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        let trimmed = body.trim();
        return if trimmed.is_empty() || trimmed.len() > 200 {
            fallback()
        } else {
            trimmed.to_string()
        };
    };

    match value.get("detail") {
        Some(serde_json::Value::String(detail)) => return detail.clone(),
        Some(serde_json::Value::Array(items)) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|msg| msg.as_str()))
                .collect();
            if !messages.is_empty() {
                return messages.join("; ");
            }
        }
        _ => {}
    }

    ["error", "message"]
        .iter()
        .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .map(str::to_string)
        .unwrap_or_else(fallback)
}

fn image_mime(file_name: &str) -> &'static str {
    let lower = file_name.to_ascii_lowercase();
    if lower.ends_with(".png") {
        "image/png"
    } else if lower.ends_with(".webp") {
        "image/webp"
    } else if lower.ends_with(".bmp") {
        "image/bmp"
    } else {
        "image/jpeg"
    }
}

struct StringOrNumber;

impl<'de> serde::de::Visitor<'de> for StringOrNumber {
    type Value = String;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a string or number")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(value.to_string())
    }

    fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(value)
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(value.to_string())
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(value.to_string())
    }
}

fn u32_from_json<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = deserializer.deserialize_any(StringOrNumber)?;
    raw.trim()
        .parse()
        .map_err(|_| serde::de::Error::custom(format!("invalid slot id {raw:?}")))
}

fn optional_u32_from_json<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::Number(number)) => {
            number.as_u64().and_then(|n| u32::try_from(n).ok())
        }
        Some(serde_json::Value::String(text)) => text.trim().parse().ok(),
        _ => None,
    })
}

fn optional_string_from_json<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::String(text)) => Some(text),
        Some(serde_json::Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    fn client() -> ParkingClient {
        ParkingClient::new(&ClientConfig::default()).unwrap()
    }

    fn client_with_ttl(ttl: Duration) -> ParkingClient {
        let config = ClientConfig {
            slot_cache_ttl: ttl,
            ..ClientConfig::default()
        };
        ParkingClient::new(&config).unwrap()
    }

    #[test]
    fn slot_payload_maps_to_domain() {
        let dtos: Vec<SlotDto> = serde_json::from_str(
            r#"[
                {"slot_id": 96, "status": "parked", "parked_vehicle_plate": "LA-2231",
                 "parked_time": "2024-05-01T10:20:30.123456"},
                {"slot_id": "12", "status": "booked", "parked_vehicle_plate": "ABC123", "parked_time": null},
                {"slot_id": 3, "status": "free", "parked_vehicle_plate": null}
            ]"#,
        )
        .unwrap();
        let slots: Vec<Slot> = dtos.into_iter().map(Slot::from).collect();

        assert_eq!(slots[0].status, SlotStatus::Parked);
        assert_eq!(
            slots[0].parked_time,
            Some(datetime!(2024-05-01 10:20:30.123456 UTC))
        );
        assert_eq!(slots[1].slot_id, 12);
        assert_eq!(slots[1].parked_vehicle_plate.as_deref(), Some("ABC123"));
        assert_eq!(slots[2], Slot::free(3));
    }

    #[test]
    fn timestamps_with_and_without_offsets_parse() {
        assert_eq!(
            parse_timestamp(Some("2024-05-01T10:20:30")),
            Some(datetime!(2024-05-01 10:20:30 UTC))
        );
        assert_eq!(
            parse_timestamp(Some("2024-05-01T10:20:30+05:30")),
            Some(datetime!(2024-05-01 10:20:30 +05:30))
        );
        assert_eq!(parse_timestamp(Some("yesterday")), None);
        assert_eq!(parse_timestamp(Some("")), None);
        assert_eq!(parse_timestamp(None), None);
    }

    #[test]
    fn clear_receipt_keeps_fee_and_times() {
        let dto: ClearDto = serde_json::from_str(
            r#"{"slot_id": 42, "parked_time": "2024-05-01T10:00:00",
                "cleared_time": "2024-05-01T11:30:00", "duration_hours": 1.5, "fee": 15.0}"#,
        )
        .unwrap();
        let receipt = ClearReceipt::from(dto);
        assert_eq!(receipt.slot_id, 42);
        assert_eq!(receipt.fee, 15.0);
        assert_eq!(receipt.cleared_time, Some(datetime!(2024-05-01 11:30 UTC)));
    }

    #[test]
    fn detection_payload_tolerates_missing_fields() {
        let dto: DetectionDto = serde_json::from_str(
            r#"{"vehicle_types": ["car"], "recognized_plates": ["CAB 1234"],
                "annotated_image": "iVBORw0KGgo=", "suggested_slot": "44"}"#,
        )
        .unwrap();
        let detection = Detection::from(dto);
        assert_eq!(detection.suggested_slot, Some(44));
        assert!(!detection.auto_parked);
        assert_eq!(detection.primary_category(), Some(VehicleCategory::Cars));
        assert_eq!(
            detection.annotated_data_uri().as_deref(),
            Some("data:image/png;base64,iVBORw0KGgo=")
        );
    }

    #[test]
    fn parked_vehicles_accept_wrapped_and_bare_lists() {
        let wrapped = serde_json::json!({
            "vehicles": [{"id": 7, "license_plate": "AB-1", "vehicle_type": "car",
                          "parking_state": "parked", "time_in": "2024-05-01T08:00:00"}]
        });
        let vehicles = parse_parked_vehicles(wrapped);
        assert_eq!(vehicles.len(), 1);
        assert_eq!(vehicles[0].id, "7");
        assert!(vehicles[0].is_parked());

        let bare = serde_json::json!([{"license_plate": "XY-9"}]);
        let vehicles = parse_parked_vehicles(bare);
        assert_eq!(vehicles[0].id, "XY-9");
        assert_eq!(vehicles[0].time_in, None);

        assert!(parse_parked_vehicles(serde_json::json!({"unexpected": true})).is_empty());
    }

    #[test]
    fn user_payload_tolerates_unknown_vehicle_type() {
        let dto: UserDto = serde_json::from_str(
            r#"{"username": "ravi", "vehicle_plate": "KX-1", "vehicle_type": "hovercraft"}"#,
        )
        .unwrap();
        let user = User::from(dto);
        assert_eq!(user.vehicle_type, None);

        let dto: UserDto = serde_json::from_str(
            r#"{"username": "ravi", "vehicle_plate": "KX-1", "vehicle_type": "vans"}"#,
        )
        .unwrap();
        assert_eq!(User::from(dto).vehicle_type, Some(VehicleCategory::Vans));
    }

    #[test]
    fn error_messages_prefer_detail() {
        assert_eq!(
            extract_error_message(StatusCode::BAD_REQUEST, r#"{"detail": "Slot 5 not free"}"#),
            "Slot 5 not free"
        );
        assert_eq!(
            extract_error_message(
                StatusCode::UNPROCESSABLE_ENTITY,
                r#"{"detail": [{"loc": ["body", "slot_id"], "msg": "field required"}]}"#
            ),
            "field required"
        );
        assert_eq!(
            extract_error_message(StatusCode::NOT_FOUND, r#"{"error": "Vehicle not found"}"#),
            "Vehicle not found"
        );
        assert_eq!(
            extract_error_message(StatusCode::INTERNAL_SERVER_ERROR, ""),
            "Internal Server Error"
        );
        assert_eq!(
            extract_error_message(StatusCode::BAD_GATEWAY, "upstream down"),
            "upstream down"
        );
    }

    #[test]
    fn request_bodies_match_the_service_contract() {
        let body = serde_json::to_value(Credentials {
            username: "amal",
            vehicle_plate: "CAB-1",
            vehicle_type: None,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"username": "amal", "vehicle_plate": "CAB-1"}));

        let body = serde_json::to_value(Credentials {
            username: "amal",
            vehicle_plate: "CAB-1",
            vehicle_type: Some(VehicleCategory::ThreeWheelers),
        })
        .unwrap();
        assert_eq!(body["vehicle_type"], "threeWheelers");

        let body = serde_json::to_value(ClearBody {
            slot_id: 9,
            rate_per_hour: 10.0,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"slot_id": 9, "rate_per_hour": 10.0}));
    }

    #[test]
    fn endpoints_join_onto_the_base_path() {
        let config = ClientConfig::default()
            .with_base_url_override(Some("http://192.168.1.2:8000/api"));
        let client = ParkingClient::new(&config).unwrap();
        assert_eq!(
            client.url("slots/book").unwrap().as_str(),
            "http://192.168.1.2:8000/api/slots/book"
        );
    }

    #[tokio::test]
    async fn missing_upload_surfaces_as_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = client()
            .predict_ocr_file(&dir.path().join("absent.jpg"))
            .await;
        assert!(matches!(result, Err(ApiError::Io(_))));
    }

    #[test]
    fn upload_mime_follows_extension() {
        assert_eq!(image_mime("frame.PNG"), "image/png");
        assert_eq!(image_mime("frame.jpeg"), "image/jpeg");
        assert_eq!(image_mime("frame"), "image/jpeg");
    }

    #[tokio::test]
    async fn cached_slots_are_served_until_invalidated() {
        let client = client_with_ttl(Duration::from_secs(60));
        assert!(client.cached_slots().await.is_none());
        assert!(client.cached_slots_stale().await.is_none());

        let stored = client.store_slots(vec![Slot::free(1)]).await;
        assert_eq!(stored.status, CacheStatus::Fresh);

        let cached = client.cached_slots().await.unwrap();
        assert_eq!(cached.status, CacheStatus::Cached);
        assert_eq!(cached.data, vec![Slot::free(1)]);

        client.invalidate_slots().await;
        assert!(client.cached_slots().await.is_none());
    }

    #[tokio::test]
    async fn expired_cache_is_only_available_as_stale() {
        let client = client_with_ttl(Duration::ZERO);
        client.store_slots(vec![Slot::booked(2, "A1")]).await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert!(client.cached_slots().await.is_none());
        let stale = client.cached_slots_stale().await.unwrap();
        assert_eq!(stale.status, CacheStatus::Stale);
    }

    #[tokio::test]
    async fn unreachable_service_falls_back_to_last_known_slots() {
        let config = ClientConfig {
            api_base_url: Url::parse("http://127.0.0.1:1/").unwrap(),
            request_timeout: Duration::from_secs(2),
            slot_cache_ttl: Duration::ZERO,
            ..ClientConfig::default()
        };
        let client = ParkingClient::new(&config).unwrap();
        assert!(client.list_slots().await.is_err());

        client.store_slots(vec![Slot::booked(45, "CAB-1234")]).await;
        tokio::time::sleep(Duration::from_millis(5)).await;

        let payload = client.list_slots().await.unwrap();
        assert_eq!(payload.status, CacheStatus::Stale);
        assert_eq!(payload.data, vec![Slot::booked(45, "CAB-1234")]);
    }
}
