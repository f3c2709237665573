//! Store en memoria
//!
//! Reproduce las restricciones del schema SQL (unicidad y orden) sobre
//! `HashMap`s protegidos por un único `RwLock`. Cada operación de escritura
//! toma el lock de escritura una sola vez, así que es atómica.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::FleetStore;
use crate::models::{
    NewPoint, NewRoute, NewRoutePoint, NewUser, Point, PointPatch, Route, RoutePoint,
    RouteStatusPatch, RouteStop, User, UserRole,
};
use crate::services::route_status_service::{apply_status_patch, reclassify_passed};
use crate::utils::errors::{AppError, AppResult};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    routes: HashMap<Uuid, Route>,
    points: HashMap<Uuid, Point>,
    route_points: Vec<RoutePoint>,
}

#[derive(Debug, Default)]
pub struct MemoryFleetStore {
    tables: RwLock<Tables>,
}

impl MemoryFleetStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FleetStore for MemoryFleetStore {
    async fn create_user(&self, user: NewUser) -> AppResult<User> {
        let mut tables = self.tables.write().await;

        if tables
            .users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(AppError::Conflict(format!(
                "Email '{}' is already in use",
                user.email
            )));
        }

        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_user_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn update_user_role(&self, id: Uuid, role: UserRole) -> AppResult<Option<User>> {
        let mut tables = self.tables.write().await;
        Ok(tables.users.get_mut(&id).map(|user| {
            user.role = role;
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn create_route(&self, route: NewRoute) -> AppResult<Route> {
        let mut tables = self.tables.write().await;

        if tables.routes.values().any(|r| r.bus_number == route.bus_number) {
            return Err(AppError::Conflict(format!(
                "Bus number '{}' is already in use",
                route.bus_number
            )));
        }

        let now = Utc::now();
        let created = Route {
            id: Uuid::new_v4(),
            name: route.name,
            bus_number: route.bus_number,
            description: route.description,
            is_active: false,
            current_passengers: 0,
            max_capacity: route.max_capacity,
            current_point_index: 0,
            driver_id: route.driver_id,
            created_at: now,
            updated_at: now,
        };
        tables.routes.insert(created.id, created.clone());
        Ok(created)
    }

    async fn list_routes(&self) -> AppResult<Vec<Route>> {
        let tables = self.tables.read().await;
        let mut routes: Vec<Route> = tables.routes.values().cloned().collect();
        routes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(routes)
    }

    async fn find_route_by_id(&self, id: Uuid) -> AppResult<Option<Route>> {
        Ok(self.tables.read().await.routes.get(&id).cloned())
    }

    async fn find_route_by_bus_number(&self, bus_number: &str) -> AppResult<Option<Route>> {
        let tables = self.tables.read().await;
        Ok(tables
            .routes
            .values()
            .find(|r| r.bus_number == bus_number)
            .cloned())
    }

    async fn assign_driver(
        &self,
        route_id: Uuid,
        driver_id: Option<Uuid>,
    ) -> AppResult<Option<Route>> {
        let mut tables = self.tables.write().await;
        Ok(tables.routes.get_mut(&route_id).map(|route| {
            route.driver_id = driver_id;
            route.updated_at = Utc::now();
            route.clone()
        }))
    }

    async fn apply_route_status(
        &self,
        route_id: Uuid,
        patch: &RouteStatusPatch,
    ) -> AppResult<Route> {
        let mut tables = self.tables.write().await;

        let current = tables
            .routes
            .get(&route_id)
            .ok_or_else(|| AppError::NotFound("Route not found".to_string()))?;

        let mut next = apply_status_patch(current, patch)?;
        next.updated_at = Utc::now();
        tables.routes.insert(route_id, next.clone());

        if let Some(index) = patch.current_point_index {
            let stops = tables
                .route_points
                .iter_mut()
                .filter(|rp| rp.route_id == route_id);
            reclassify_passed(stops, index);
        }

        Ok(next)
    }

    async fn create_point(&self, point: NewPoint) -> AppResult<Point> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let created = Point {
            id: Uuid::new_v4(),
            name: point.name,
            description: point.description,
            address: point.address,
            latitude: point.latitude,
            longitude: point.longitude,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        tables.points.insert(created.id, created.clone());
        Ok(created)
    }

    async fn list_active_points(&self) -> AppResult<Vec<Point>> {
        let tables = self.tables.read().await;
        let mut points: Vec<Point> = tables
            .points
            .values()
            .filter(|p| p.is_active)
            .cloned()
            .collect();
        points.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(points)
    }

    async fn find_point_by_id(&self, id: Uuid) -> AppResult<Option<Point>> {
        Ok(self.tables.read().await.points.get(&id).cloned())
    }

    async fn update_point(&self, id: Uuid, patch: PointPatch) -> AppResult<Option<Point>> {
        let mut tables = self.tables.write().await;
        Ok(tables.points.get_mut(&id).map(|point| {
            let mut updated = patch.apply_to(point);
            updated.updated_at = Utc::now();
            *point = updated.clone();
            updated
        }))
    }

    async fn list_route_stops(&self, route_id: Uuid) -> AppResult<Vec<RouteStop>> {
        let tables = self.tables.read().await;
        let mut stops: Vec<RouteStop> = tables
            .route_points
            .iter()
            .filter(|rp| rp.route_id == route_id)
            .filter_map(|rp| {
                tables.points.get(&rp.point_id).map(|point| RouteStop {
                    route_point: rp.clone(),
                    point: point.clone(),
                })
            })
            .collect();
        stops.sort_by_key(RouteStop::order);
        Ok(stops)
    }

    async fn list_point_memberships(&self, point_id: Uuid) -> AppResult<Vec<RoutePoint>> {
        let tables = self.tables.read().await;
        let mut memberships: Vec<RoutePoint> = tables
            .route_points
            .iter()
            .filter(|rp| rp.point_id == point_id)
            .cloned()
            .collect();
        memberships.sort_by_key(|rp| (rp.route_id, rp.order));
        Ok(memberships)
    }

    async fn find_route_point(
        &self,
        route_id: Uuid,
        point_id: Uuid,
    ) -> AppResult<Option<RoutePoint>> {
        let tables = self.tables.read().await;
        Ok(tables
            .route_points
            .iter()
            .find(|rp| rp.route_id == route_id && rp.point_id == point_id)
            .cloned())
    }

    async fn find_route_point_by_order(
        &self,
        route_id: Uuid,
        order: i32,
    ) -> AppResult<Option<RoutePoint>> {
        let tables = self.tables.read().await;
        Ok(tables
            .route_points
            .iter()
            .find(|rp| rp.route_id == route_id && rp.order == order)
            .cloned())
    }

    async fn max_route_point_order(&self, route_id: Uuid) -> AppResult<Option<i32>> {
        let tables = self.tables.read().await;
        Ok(tables
            .route_points
            .iter()
            .filter(|rp| rp.route_id == route_id)
            .map(|rp| rp.order)
            .max())
    }

    async fn insert_route_point(&self, route_point: NewRoutePoint) -> AppResult<RoutePoint> {
        let mut tables = self.tables.write().await;

        let taken = tables.route_points.iter().any(|rp| {
            rp.route_id == route_point.route_id
                && (rp.point_id == route_point.point_id || rp.order == route_point.order)
        });
        if taken {
            return Err(AppError::Conflict(
                "Point or order is already used on this route".to_string(),
            ));
        }

        let now = Utc::now();
        let created = RoutePoint {
            id: Uuid::new_v4(),
            route_id: route_point.route_id,
            point_id: route_point.point_id,
            order: route_point.order,
            estimated_time: route_point.estimated_time,
            is_passed: false,
            created_at: now,
            updated_at: now,
        };
        tables.route_points.push(created.clone());
        Ok(created)
    }

    async fn delete_route_point(&self, route_id: Uuid, point_id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.route_points.len();
        tables
            .route_points
            .retain(|rp| !(rp.route_id == route_id && rp.point_id == point_id));
        Ok(tables.route_points.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use rust_decimal::Decimal;

    fn new_route(bus_number: &str) -> NewRoute {
        NewRoute {
            name: "Linha Sul".to_string(),
            bus_number: bus_number.to_string(),
            description: None,
            max_capacity: 30,
            driver_id: None,
        }
    }

    #[tokio::test]
    async fn test_unique_constraints() {
        let store = MemoryFleetStore::new();

        let user = NewUser {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            password_hash: "hash".to_string(),
            role: UserRole::Driver,
        };
        store.create_user(user.clone()).await.unwrap();
        let duplicate = NewUser {
            email: "ANA@example.com".to_string(),
            ..user
        };
        assert!(matches!(store.create_user(duplicate).await, Err(AppError::Conflict(_))));

        store.create_route(new_route("42")).await.unwrap();
        assert!(matches!(
            store.create_route(new_route("42")).await,
            Err(AppError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_rejected_patch_writes_nothing() {
        let store = MemoryFleetStore::new();
        let route = store.create_route(new_route("7")).await.unwrap();

        let patch = RouteStatusPatch {
            current_passengers: Some(31),
            is_active: Some(true),
            current_point_index: Some(3),
        };
        assert!(matches!(
            store.apply_route_status(route.id, &patch).await,
            Err(AppError::CapacityExceeded { .. })
        ));

        let unchanged = store.find_route_by_id(route.id).await.unwrap().unwrap();
        assert_eq!(unchanged, route);
    }

    #[tokio::test]
    async fn test_concurrent_status_updates_stay_consistent() {
        let store = Arc::new(MemoryFleetStore::new());
        let route = store.create_route(new_route("88")).await.unwrap();

        for order in 0..5 {
            let point = store
                .create_point(NewPoint {
                    name: format!("Parada {}", order),
                    description: None,
                    address: None,
                    latitude: Decimal::ZERO,
                    longitude: Decimal::ZERO,
                })
                .await
                .unwrap();
            store
                .insert_route_point(NewRoutePoint {
                    route_id: route.id,
                    point_id: point.id,
                    order,
                    estimated_time: None,
                })
                .await
                .unwrap();
        }

        let route_id = route.id;
        let handles: Vec<_> = (0..20)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    let patch = RouteStatusPatch {
                        current_passengers: Some(i),
                        is_active: None,
                        current_point_index: Some(i % 5),
                    };
                    store.apply_route_status(route_id, &patch).await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        // El estado final corresponde a un único patch completo
        let final_route = store.find_route_by_id(route.id).await.unwrap().unwrap();
        assert_eq!(final_route.current_point_index, final_route.current_passengers % 5);

        let stops = store.list_route_stops(route.id).await.unwrap();
        for stop in stops {
            assert_eq!(
                stop.route_point.is_passed,
                stop.order() <= final_route.current_point_index
            );
        }
    }
}
