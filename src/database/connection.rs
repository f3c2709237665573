//! Conexión al almacenamiento
//!
//! Con `DATABASE_URL` se usa PostgreSQL (y se aplican las migraciones);
//! sin ella, el store en memoria.

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use crate::config::DatabaseConfig;
use crate::repositories::{MemoryFleetStore, PgFleetStore, SharedStore};

/// Construir el store de la aplicación
pub async fn connect_store(database: Option<DatabaseConfig>) -> Result<SharedStore> {
    let Some(database) = database else {
        warn!("⚠️ DATABASE_URL no definida: usando store en memoria (los datos no persisten)");
        return Ok(Arc::new(MemoryFleetStore::new()));
    };

    info!("🗄️ Conectando a PostgreSQL: {}", mask_database_url(&database.url));
    let pool = database.create_pool().await?;

    let store = PgFleetStore::new(pool);
    store.run_migrations().await?;
    info!("✅ Migraciones aplicadas");

    Ok(Arc::new(store))
}

/// Enmascarar las credenciales de la URL para los logs
fn mask_database_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at_pos)) if at_pos > scheme_end => {
            format!("{}***:***@{}", &url[..scheme_end + 3], &url[at_pos + 1..])
        }
        _ => url.to_string(),
    }
}
