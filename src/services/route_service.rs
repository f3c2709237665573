//! Administración de rutas: alta, listado, consulta y asignación de conductor

use tracing::info;
use uuid::Uuid;

use crate::models::{NewRoute, Route, RouteStop, User, UserRole, DEFAULT_MAX_CAPACITY};
use crate::repositories::{FleetStore, SharedStore};
use crate::utils::errors::{conflict_error, validation_error, AppError, AppResult};

/// Ruta con su conductor y sus paradas ordenadas
#[derive(Debug, Clone)]
pub struct RouteDetail {
    pub route: Route,
    pub driver: Option<User>,
    pub stops: Vec<RouteStop>,
}

/// Cargar conductor y paradas de una ruta ya obtenida
pub async fn load_route_detail(store: &dyn FleetStore, route: Route) -> AppResult<RouteDetail> {
    let driver = match route.driver_id {
        Some(driver_id) => store.find_user_by_id(driver_id).await?,
        None => None,
    };
    let stops = store.list_route_stops(route.id).await?;

    Ok(RouteDetail { route, driver, stops })
}

/// Datos de alta ya validados por el DTO
#[derive(Debug, Clone)]
pub struct CreateRoute {
    pub name: String,
    pub bus_number: String,
    pub description: Option<String>,
    pub max_capacity: Option<i32>,
    pub driver_id: Option<Uuid>,
}

pub struct RouteService {
    store: SharedStore,
}

impl RouteService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub async fn create(&self, request: CreateRoute) -> AppResult<RouteDetail> {
        let bus_number = request.bus_number.trim().to_string();
        if bus_number.is_empty() {
            return Err(validation_error("bus_number", "Bus number is required"));
        }

        if self.store.find_route_by_bus_number(&bus_number).await?.is_some() {
            return Err(conflict_error("Route", "bus number", &bus_number));
        }

        if let Some(driver_id) = request.driver_id {
            self.ensure_driver(driver_id).await?;
        }

        let route = self
            .store
            .create_route(NewRoute {
                name: request.name.trim().to_string(),
                bus_number,
                description: request.description,
                max_capacity: request.max_capacity.unwrap_or(DEFAULT_MAX_CAPACITY),
                driver_id: request.driver_id,
            })
            .await?;

        info!(route_id = %route.id, bus_number = %route.bus_number, "✅ Ruta creada");
        load_route_detail(self.store.as_ref(), route).await
    }

    pub async fn list(&self) -> AppResult<Vec<RouteDetail>> {
        let routes = self.store.list_routes().await?;
        let mut details = Vec::with_capacity(routes.len());
        for route in routes {
            details.push(load_route_detail(self.store.as_ref(), route).await?);
        }
        Ok(details)
    }

    pub async fn get(&self, route_id: Uuid) -> AppResult<RouteDetail> {
        let route = self
            .store
            .find_route_by_id(route_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Route not found".to_string()))?;

        load_route_detail(self.store.as_ref(), route).await
    }

    /// Asignar (o desasignar con `None`) el conductor de una ruta
    pub async fn assign_driver(
        &self,
        route_id: Uuid,
        driver_id: Option<Uuid>,
    ) -> AppResult<RouteDetail> {
        if self.store.find_route_by_id(route_id).await?.is_none() {
            return Err(AppError::NotFound("Route not found".to_string()));
        }

        if let Some(driver_id) = driver_id {
            self.ensure_driver(driver_id).await?;
        }

        let route = self
            .store
            .assign_driver(route_id, driver_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Route not found".to_string()))?;

        info!(route_id = %route_id, driver_id = ?driver_id, "👤 Conductor asignado");
        load_route_detail(self.store.as_ref(), route).await
    }

    async fn ensure_driver(&self, driver_id: Uuid) -> AppResult<User> {
        let driver = self
            .store
            .find_user_by_id(driver_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Driver not found".to_string()))?;

        if driver.role != UserRole::Driver {
            return Err(AppError::BadRequest(
                "The specified user is not a driver".to_string(),
            ));
        }

        Ok(driver)
    }
}
