use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use super::FleetStore;
use crate::models::{
    NewPoint, NewRoute, NewRoutePoint, NewUser, Point, PointPatch, Route, RoutePoint,
    RouteStatusPatch, RouteStop, User, UserRole,
};
use crate::services::route_status_service::apply_status_patch;
use crate::utils::errors::{map_db_error, AppError, AppResult};

const ROUTE_POINT_COLUMNS: &str =
    "id, route_id, point_id, sort_order, estimated_time, is_passed, created_at, updated_at";

/// Fila plana del join route_points ⨝ points
#[derive(Debug, sqlx::FromRow)]
struct RouteStopRow {
    rp_id: Uuid,
    route_id: Uuid,
    point_id: Uuid,
    sort_order: i32,
    estimated_time: Option<i32>,
    is_passed: bool,
    rp_created_at: DateTime<Utc>,
    rp_updated_at: DateTime<Utc>,
    name: String,
    description: Option<String>,
    address: Option<String>,
    latitude: Decimal,
    longitude: Decimal,
    is_active: bool,
    p_created_at: DateTime<Utc>,
    p_updated_at: DateTime<Utc>,
}

impl From<RouteStopRow> for RouteStop {
    fn from(row: RouteStopRow) -> Self {
        Self {
            route_point: RoutePoint {
                id: row.rp_id,
                route_id: row.route_id,
                point_id: row.point_id,
                order: row.sort_order,
                estimated_time: row.estimated_time,
                is_passed: row.is_passed,
                created_at: row.rp_created_at,
                updated_at: row.rp_updated_at,
            },
            point: Point {
                id: row.point_id,
                name: row.name,
                description: row.description,
                address: row.address,
                latitude: row.latitude,
                longitude: row.longitude,
                is_active: row.is_active,
                created_at: row.p_created_at,
                updated_at: row.p_updated_at,
            },
        }
    }
}

/// Store respaldado por PostgreSQL
#[derive(Clone)]
pub struct PgFleetStore {
    pool: PgPool,
}

impl PgFleetStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Ejecutar las migraciones de `migrations/`
    pub async fn run_migrations(&self) -> AppResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::Internal(format!("Error running migrations: {}", e)))
    }
}

#[async_trait]
impl FleetStore for PgFleetStore {
    async fn create_user(&self, user: NewUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, password_hash, role, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, TRUE, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user.name)
        .bind(&user.email)
        .bind(user.password_hash)
        .bind(user.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error(e, &format!("Email '{}' is already in use", user.email)))
    }

    async fn find_user_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn update_user_role(&self, id: Uuid, role: UserRole) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET role = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(role)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create_route(&self, route: NewRoute) -> AppResult<Route> {
        sqlx::query_as::<_, Route>(
            r#"
            INSERT INTO routes (id, name, bus_number, description, is_active, current_passengers,
                                max_capacity, current_point_index, driver_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, FALSE, 0, $5, 0, $6, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(route.name)
        .bind(&route.bus_number)
        .bind(route.description)
        .bind(route.max_capacity)
        .bind(route.driver_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_db_error(e, &format!("Bus number '{}' is already in use", route.bus_number))
        })
    }

    async fn list_routes(&self) -> AppResult<Vec<Route>> {
        let routes = sqlx::query_as::<_, Route>("SELECT * FROM routes ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;

        Ok(routes)
    }

    async fn find_route_by_id(&self, id: Uuid) -> AppResult<Option<Route>> {
        let route = sqlx::query_as::<_, Route>("SELECT * FROM routes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(route)
    }

    async fn find_route_by_bus_number(&self, bus_number: &str) -> AppResult<Option<Route>> {
        let route = sqlx::query_as::<_, Route>("SELECT * FROM routes WHERE bus_number = $1")
            .bind(bus_number)
            .fetch_optional(&self.pool)
            .await?;

        Ok(route)
    }

    async fn assign_driver(
        &self,
        route_id: Uuid,
        driver_id: Option<Uuid>,
    ) -> AppResult<Option<Route>> {
        let route = sqlx::query_as::<_, Route>(
            "UPDATE routes SET driver_id = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(route_id)
        .bind(driver_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(route)
    }

    async fn apply_route_status(
        &self,
        route_id: Uuid,
        patch: &RouteStatusPatch,
    ) -> AppResult<Route> {
        let mut tx = self.pool.begin().await?;

        // FOR UPDATE serializa actualizaciones concurrentes de la misma ruta
        let current = sqlx::query_as::<_, Route>("SELECT * FROM routes WHERE id = $1 FOR UPDATE")
            .bind(route_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Route not found".to_string()))?;

        let next = apply_status_patch(&current, patch)?;

        let updated = sqlx::query_as::<_, Route>(
            r#"
            UPDATE routes
            SET current_passengers = $2, is_active = $3, current_point_index = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(route_id)
        .bind(next.current_passengers)
        .bind(next.is_active)
        .bind(next.current_point_index)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(index) = patch.current_point_index {
            sqlx::query(
                r#"
                UPDATE route_points
                SET is_passed = (sort_order <= $2), updated_at = NOW()
                WHERE route_id = $1
                "#,
            )
            .bind(route_id)
            .bind(index)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(updated)
    }

    async fn create_point(&self, point: NewPoint) -> AppResult<Point> {
        let point = sqlx::query_as::<_, Point>(
            r#"
            INSERT INTO points (id, name, description, address, latitude, longitude, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, TRUE, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(point.name)
        .bind(point.description)
        .bind(point.address)
        .bind(point.latitude)
        .bind(point.longitude)
        .fetch_one(&self.pool)
        .await?;

        Ok(point)
    }

    async fn list_active_points(&self) -> AppResult<Vec<Point>> {
        let points = sqlx::query_as::<_, Point>(
            "SELECT * FROM points WHERE is_active = TRUE ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(points)
    }

    async fn find_point_by_id(&self, id: Uuid) -> AppResult<Option<Point>> {
        let point = sqlx::query_as::<_, Point>("SELECT * FROM points WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(point)
    }

    async fn update_point(&self, id: Uuid, patch: PointPatch) -> AppResult<Option<Point>> {
        let point = sqlx::query_as::<_, Point>(
            r#"
            UPDATE points
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                address = COALESCE($4, address),
                latitude = COALESCE($5, latitude),
                longitude = COALESCE($6, longitude),
                is_active = COALESCE($7, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(patch.name)
        .bind(patch.description)
        .bind(patch.address)
        .bind(patch.latitude)
        .bind(patch.longitude)
        .bind(patch.is_active)
        .fetch_optional(&self.pool)
        .await?;

        Ok(point)
    }

    async fn list_route_stops(&self, route_id: Uuid) -> AppResult<Vec<RouteStop>> {
        let rows = sqlx::query_as::<_, RouteStopRow>(
            r#"
            SELECT rp.id AS rp_id, rp.route_id, rp.point_id, rp.sort_order, rp.estimated_time,
                   rp.is_passed, rp.created_at AS rp_created_at, rp.updated_at AS rp_updated_at,
                   p.name, p.description, p.address, p.latitude, p.longitude, p.is_active,
                   p.created_at AS p_created_at, p.updated_at AS p_updated_at
            FROM route_points rp
            JOIN points p ON p.id = rp.point_id
            WHERE rp.route_id = $1
            ORDER BY rp.sort_order ASC
            "#,
        )
        .bind(route_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(RouteStop::from).collect())
    }

    async fn list_point_memberships(&self, point_id: Uuid) -> AppResult<Vec<RoutePoint>> {
        let query = format!(
            "SELECT {} FROM route_points WHERE point_id = $1 ORDER BY route_id, sort_order",
            ROUTE_POINT_COLUMNS
        );
        let memberships = sqlx::query_as::<_, RoutePoint>(&query)
            .bind(point_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(memberships)
    }

    async fn find_route_point(
        &self,
        route_id: Uuid,
        point_id: Uuid,
    ) -> AppResult<Option<RoutePoint>> {
        let query = format!(
            "SELECT {} FROM route_points WHERE route_id = $1 AND point_id = $2",
            ROUTE_POINT_COLUMNS
        );
        let route_point = sqlx::query_as::<_, RoutePoint>(&query)
            .bind(route_id)
            .bind(point_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(route_point)
    }

    async fn find_route_point_by_order(
        &self,
        route_id: Uuid,
        order: i32,
    ) -> AppResult<Option<RoutePoint>> {
        let query = format!(
            "SELECT {} FROM route_points WHERE route_id = $1 AND sort_order = $2",
            ROUTE_POINT_COLUMNS
        );
        let route_point = sqlx::query_as::<_, RoutePoint>(&query)
            .bind(route_id)
            .bind(order)
            .fetch_optional(&self.pool)
            .await?;

        Ok(route_point)
    }

    async fn max_route_point_order(&self, route_id: Uuid) -> AppResult<Option<i32>> {
        let (max,): (Option<i32>,) =
            sqlx::query_as("SELECT MAX(sort_order) FROM route_points WHERE route_id = $1")
                .bind(route_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(max)
    }

    async fn insert_route_point(&self, route_point: NewRoutePoint) -> AppResult<RoutePoint> {
        let query = format!(
            r#"
            INSERT INTO route_points (id, route_id, point_id, sort_order, estimated_time, is_passed, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, FALSE, NOW(), NOW())
            RETURNING {}
            "#,
            ROUTE_POINT_COLUMNS
        );
        sqlx::query_as::<_, RoutePoint>(&query)
            .bind(Uuid::new_v4())
            .bind(route_point.route_id)
            .bind(route_point.point_id)
            .bind(route_point.order)
            .bind(route_point.estimated_time)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_db_error(e, "Point or order is already used on this route"))
    }

    async fn delete_route_point(&self, route_id: Uuid, point_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM route_points WHERE route_id = $1 AND point_id = $2")
            .bind(route_id)
            .bind(point_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
