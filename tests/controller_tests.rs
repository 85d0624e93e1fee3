use serde_json::json;
use solarcharge::charge::{ChargeLedger, Controller};
use solarcharge::config::{CarConfig, SiteConfig};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SITE_LAT: f64 = 59.12;
const SITE_LON: f64 = 10.34;

fn site() -> SiteConfig {
    SiteConfig {
        name: "home".to_string(),
        site_id: 117,
        api_key: "SE-KEY".to_string(),
        latitude: SITE_LAT,
        longitude: SITE_LON,
        start_charge_threshold: 5000.0,
        stop_charge_threshold: 2000.0,
    }
}

fn car(vehicle_id: i64) -> CarConfig {
    CarConfig {
        name: format!("car-{vehicle_id}"),
        vehicle_id,
        access_token: "owner-token".to_string(),
    }
}

async fn mount_power(server: &MockServer, watts: f64) {
    Mock::given(method("GET"))
        .and(path("/sites/117/overview"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sitesOverviews": {
                "count": 1,
                "siteEnergyList": [
                    { "siteId": 117, "siteOverview": { "currentPower": { "power": watts } } }
                ]
            }
        })))
        .mount(server)
        .await;
}

async fn mount_vehicle(
    server: &MockServer,
    battery_level: i32,
    charging: bool,
    lat: f64,
    lon: f64,
) {
    Mock::given(method("GET"))
        .and(path("/api/1/vehicles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": [
                { "id": 42, "vehicle_id": 1042, "state": "online", "in_service": false }
            ]
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/1/vehicles/42/vehicle_data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {
                "display_name": "Nikola",
                "state": "online",
                "charge_state": {
                    "battery_level": battery_level,
                    "charge_limit_soc": 90,
                    "charger_actual_current": if charging { 16 } else { 0 },
                    "charge_port_latch": "Engaged"
                },
                "drive_state": { "latitude": lat, "longitude": lon }
            }
        })))
        .mount(server)
        .await;
}

fn command_ok() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "response": { "reason": "", "result": true }
    }))
}

fn controller(
    ledger_path: &std::path::Path,
    tesla: &MockServer,
    solar: &MockServer,
) -> Controller {
    let ledger = ChargeLedger::open(ledger_path).expect("ledger");
    Controller::new(ledger)
        .with_owner_api_base(tesla.uri())
        .with_solar_base(solar.uri())
}

#[tokio::test]
async fn starts_charging_on_surplus_and_records_it() {
    let tesla = MockServer::start().await;
    let solar = MockServer::start().await;
    mount_power(&solar, 6000.0).await;
    mount_vehicle(&tesla, 60, false, SITE_LAT, SITE_LON).await;
    Mock::given(method("POST"))
        .and(path("/api/1/vehicles/42/command/charge_start"))
        .respond_with(command_ok())
        .expect(1)
        .mount(&tesla)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let ledger_path = dir.path().join("ledger.json");
    let mut controller = controller(&ledger_path, &tesla, &solar);

    let charging = controller
        .run_once(&[site()], &[car(42)])
        .await
        .expect("sweep");
    assert_eq!(charging, 1);

    let reopened = ChargeLedger::open(&ledger_path).expect("reopen");
    assert!(reopened.is_charging_by_solar(42));
}

#[tokio::test]
async fn stops_solar_charging_when_surplus_is_gone() {
    let tesla = MockServer::start().await;
    let solar = MockServer::start().await;
    mount_power(&solar, 1500.0).await;
    mount_vehicle(&tesla, 70, true, SITE_LAT, SITE_LON).await;
    Mock::given(method("POST"))
        .and(path("/api/1/vehicles/42/command/charge_stop"))
        .respond_with(command_ok())
        .expect(1)
        .mount(&tesla)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let ledger_path = dir.path().join("ledger.json");
    {
        let mut seed = ChargeLedger::open(&ledger_path).expect("seed ledger");
        seed.mark_started(42);
        seed.persist().expect("persist seed");
    }
    let mut controller = controller(&ledger_path, &tesla, &solar);

    let charging = controller
        .run_once(&[site()], &[car(42)])
        .await
        .expect("sweep");
    assert_eq!(charging, 0);

    let reopened = ChargeLedger::open(&ledger_path).expect("reopen");
    assert!(!reopened.is_charging_by_solar(42));
}

#[tokio::test]
async fn leaves_distant_cars_alone() {
    let tesla = MockServer::start().await;
    let solar = MockServer::start().await;
    mount_power(&solar, 6000.0).await;
    // Parked a few kilometres away from the site.
    mount_vehicle(&tesla, 60, false, 59.15, 10.40).await;
    Mock::given(method("POST"))
        .and(path("/api/1/vehicles/42/command/charge_start"))
        .respond_with(command_ok())
        .expect(0)
        .mount(&tesla)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let mut controller = controller(&dir.path().join("ledger.json"), &tesla, &solar);

    let charging = controller
        .run_once(&[site()], &[car(42)])
        .await
        .expect("sweep");
    assert_eq!(charging, 0);
}

#[tokio::test]
async fn dry_run_issues_no_commands() {
    let tesla = MockServer::start().await;
    let solar = MockServer::start().await;
    mount_power(&solar, 6000.0).await;
    mount_vehicle(&tesla, 60, false, SITE_LAT, SITE_LON).await;
    Mock::given(method("POST"))
        .and(path("/api/1/vehicles/42/command/charge_start"))
        .respond_with(command_ok())
        .expect(0)
        .mount(&tesla)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let ledger_path = dir.path().join("ledger.json");
    let mut controller = controller(&ledger_path, &tesla, &solar).with_dry_run(true);

    let charging = controller
        .run_once(&[site()], &[car(42)])
        .await
        .expect("sweep");
    assert_eq!(charging, 1);

    let reopened = ChargeLedger::open(&ledger_path).expect("reopen");
    assert!(!reopened.is_charging_by_solar(42));
}

#[tokio::test]
async fn one_failing_car_does_not_abort_the_sweep() {
    let tesla = MockServer::start().await;
    let solar = MockServer::start().await;
    mount_power(&solar, 6000.0).await;
    // The vehicle list only knows car 42; car 41 fails its lookup.
    mount_vehicle(&tesla, 60, false, SITE_LAT, SITE_LON).await;
    Mock::given(method("POST"))
        .and(path("/api/1/vehicles/42/command/charge_start"))
        .respond_with(command_ok())
        .expect(1)
        .mount(&tesla)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let mut controller = controller(&dir.path().join("ledger.json"), &tesla, &solar);

    let charging = controller
        .run_once(&[site()], &[car(41), car(42)])
        .await
        .expect("sweep");
    assert_eq!(charging, 1);
}

#[tokio::test]
async fn unreachable_site_is_skipped() {
    let tesla = MockServer::start().await;
    let solar = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sites/117/overview"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&solar)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let mut controller = controller(&dir.path().join("ledger.json"), &tesla, &solar);

    let charging = controller
        .run_once(&[site()], &[car(42)])
        .await
        .expect("sweep");
    assert_eq!(charging, 0);
}
