use tracing::info;
use uuid::Uuid;

use crate::models::{NewPoint, Point, PointPatch, RoutePoint};
use crate::repositories::SharedStore;
use crate::utils::errors::{AppError, AppResult};

/// Parada con las rutas a las que pertenece
#[derive(Debug, Clone)]
pub struct PointDetail {
    pub point: Point,
    pub memberships: Vec<RoutePoint>,
}

pub struct PointService {
    store: SharedStore,
}

impl PointService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub async fn create(&self, point: NewPoint) -> AppResult<Point> {
        let point = self.store.create_point(point).await?;
        info!(point_id = %point.id, name = %point.name, "✅ Parada creada");
        Ok(point)
    }

    pub async fn list_active(&self) -> AppResult<Vec<Point>> {
        self.store.list_active_points().await
    }

    pub async fn get(&self, point_id: Uuid) -> AppResult<PointDetail> {
        let point = self
            .store
            .find_point_by_id(point_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Point not found".to_string()))?;
        let memberships = self.store.list_point_memberships(point_id).await?;

        Ok(PointDetail { point, memberships })
    }

    pub async fn update(&self, point_id: Uuid, patch: PointPatch) -> AppResult<Point> {
        self.store
            .update_point(point_id, patch)
            .await?
            .ok_or_else(|| AppError::NotFound("Point not found".to_string()))
    }
}
