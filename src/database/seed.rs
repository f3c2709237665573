//! Datos de demostración (`SEED_DEMO_DATA=true`)
//!
//! Todo pasa por la API del store, así que funciona igual sobre PostgreSQL
//! y sobre memoria. Si el autobús de demo ya existe no se inserta nada.

use bcrypt::hash;
use rust_decimal::Decimal;
use tracing::info;

use crate::models::{NewPoint, NewRoute, NewRoutePoint, NewUser, UserRole};
use crate::repositories::FleetStore;
use crate::services::auth_service::BCRYPT_COST;
use crate::utils::errors::{AppError, AppResult};

pub const DEMO_ADMIN_EMAIL: &str = "admin@busfleet.local";
pub const DEMO_DRIVER_EMAIL: &str = "driver@busfleet.local";
pub const DEMO_PASSWORD: &str = "demo123";
pub const DEMO_BUS_NUMBER: &str = "100";

/// (nombre, dirección, latitud, longitud) con 4 decimales
const DEMO_STOPS: [(&str, &str, i64, i64); 4] = [
    ("Terminal Central", "Av. Principal, 1000", -235505, -466333),
    ("Praça da Matriz", "Praça da Matriz, s/n", -235489, -466388),
    ("Mercado Municipal", "Rua do Mercado, 306", -235416, -466297),
    ("Estação Norte", "Av. Norte, 2500", -235352, -466254),
];

/// Resumen de lo insertado
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub users: usize,
    pub routes: usize,
    pub points: usize,
}

pub async fn seed_demo_data(store: &dyn FleetStore) -> AppResult<SeedReport> {
    if store.find_route_by_bus_number(DEMO_BUS_NUMBER).await?.is_some() {
        info!("🌱 Datos de demo ya presentes, nada que insertar");
        return Ok(SeedReport::default());
    }

    let password_hash = hash(DEMO_PASSWORD, BCRYPT_COST).map_err(|e| AppError::Hash(e.to_string()))?;

    store
        .create_user(NewUser {
            name: "Administrador Demo".to_string(),
            email: DEMO_ADMIN_EMAIL.to_string(),
            password_hash: password_hash.clone(),
            role: UserRole::Admin,
        })
        .await?;

    let driver = store
        .create_user(NewUser {
            name: "Conductor Demo".to_string(),
            email: DEMO_DRIVER_EMAIL.to_string(),
            password_hash,
            role: UserRole::Driver,
        })
        .await?;

    let route = store
        .create_route(NewRoute {
            name: "Linha Centro".to_string(),
            bus_number: DEMO_BUS_NUMBER.to_string(),
            description: Some("Circular pelo centro da cidade".to_string()),
            max_capacity: 50,
            driver_id: Some(driver.id),
        })
        .await?;

    for (order, (name, address, latitude, longitude)) in DEMO_STOPS.iter().enumerate() {
        let point = store
            .create_point(NewPoint {
                name: name.to_string(),
                description: None,
                address: Some(address.to_string()),
                latitude: Decimal::new(*latitude, 4),
                longitude: Decimal::new(*longitude, 4),
            })
            .await?;

        let order = order as i32;
        store
            .insert_route_point(NewRoutePoint {
                route_id: route.id,
                point_id: point.id,
                order,
                estimated_time: Some(order * 7),
            })
            .await?;
    }

    let report = SeedReport {
        users: 2,
        routes: 1,
        points: DEMO_STOPS.len(),
    };
    info!(
        users = report.users,
        routes = report.routes,
        points = report.points,
        "🌱 Datos de demo insertados"
    );
    Ok(report)
}
