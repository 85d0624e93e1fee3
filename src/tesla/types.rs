use serde::Deserialize;

/// Entry in the account's vehicle list.
#[derive(Debug, Clone, Deserialize)]
pub struct Vehicle {
    pub id: i64,
    pub vehicle_id: i64,
    pub state: String,
    #[serde(default)]
    pub in_service: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VehiclesResponse {
    pub response: Vec<Vehicle>,
}

/// Charge-related fields of a `vehicle_data` reply.
///
/// The Owner API sends many more fields than any caller here reads; the
/// unknown ones are ignored and absent ones default to zero values.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChargeState {
    pub battery_heater_on: bool,
    pub battery_level: i32,
    pub battery_range: f64,
    pub charge_current_request: i32,
    pub charge_enable_request: bool,
    pub charge_energy_added: f64,
    pub charge_limit_soc: i32,
    pub charge_limit_soc_max: i32,
    pub charge_limit_soc_min: i32,
    pub charge_miles_added_rated: f64,
    pub charge_port_door_open: bool,
    pub charge_port_latch: String,
    pub charge_rate: f64,
    pub charger_actual_current: i32,
    pub charger_phases: i32,
    pub charger_power: i32,
    pub charger_voltage: i32,
    pub charging_state: String,
    pub est_battery_range: f64,
    pub fast_charger_present: bool,
    pub scheduled_charging_pending: bool,
    pub time_to_full_charge: f64,
    pub timestamp: i64,
    pub usable_battery_level: i32,
}

/// Position fields of a `vehicle_data` reply.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DriveState {
    pub gps_as_of: i64,
    pub heading: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub power: i32,
    pub timestamp: i64,
}

/// Full `vehicle_data` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct VehicleData {
    pub display_name: String,
    pub state: String,
    #[serde(default)]
    pub charge_state: ChargeState,
    #[serde(default)]
    pub drive_state: DriveState,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VehicleDataResponse {
    pub response: VehicleData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WakeState {
    pub state: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WakeResponse {
    pub response: WakeState,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommandResult {
    #[serde(default)]
    pub reason: String,
    pub result: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommandResponse {
    pub response: CommandResult,
}

/// Condensed view of one vehicle, as the charging controller needs it.
#[derive(Debug, Clone, PartialEq)]
pub struct CarStatus {
    pub battery_level: i32,
    pub charge_limit: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub is_charging: bool,
    pub is_plugged_in: bool,
}

impl From<VehicleData> for CarStatus {
    fn from(data: VehicleData) -> Self {
        Self {
            battery_level: data.charge_state.battery_level,
            charge_limit: data.charge_state.charge_limit_soc,
            latitude: data.drive_state.latitude,
            longitude: data.drive_state.longitude,
            is_charging: data.charge_state.charger_actual_current > 0,
            is_plugged_in: data.charge_state.charge_port_latch == "Engaged",
        }
    }
}
