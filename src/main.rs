use anyhow::Result;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use dotenvy::dotenv;

use bus_fleet_status::{
    config::{DatabaseConfig, EnvironmentConfig},
    create_app,
    database::{connect_store, seed_demo_data},
    AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("🚌 Bus Fleet Status API");
    info!("================================================");

    let config = match EnvironmentConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("❌ Configuración inválida: {}", e);
            return Err(e.into());
        }
    };
    info!("⚙️ Entorno: {}", config.environment);
    if config.is_development() {
        info!("🛠️ Modo desarrollo: CORS {:?}", config.cors_origins);
    }
    if config.trust_proxy {
        info!("🔁 TRUST_PROXY activo: rate limiting por x-forwarded-for");
    }
    if config.is_production() && config.admin_key.is_none() {
        warn!("⚠️ ADMIN_KEY no definida: no se podrán crear administradores");
    }

    let store = connect_store(DatabaseConfig::from_env()).await?;

    if config.seed_demo_data {
        seed_demo_data(store.as_ref()).await?;
    }

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let server_url = config.server_url();
    let app = create_app(AppState::new(store, config));

    info!("🌐 Servidor iniciando en http://{}", server_url);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  / - Banner del servicio");
    info!("   GET  /api - Índice de endpoints");
    info!("🔐 Auth:");
    info!("   POST /api/auth/register - Registrar usuario");
    info!("   POST /api/auth/login - Login");
    info!("   POST /api/auth/promote - Promover a administrador");
    info!("   GET  /api/auth/profile - Perfil del usuario");
    info!("🛣️ Rutas:");
    info!("   POST /api/routes - Crear ruta (admin)");
    info!("   GET  /api/routes - Listar rutas");
    info!("   GET  /api/routes/:id - Obtener ruta");
    info!("   PUT  /api/routes/:id/status - Actualizar estado (conductor o admin)");
    info!("   PUT  /api/routes/:id/driver - Asignar conductor (admin)");
    info!("📍 Paradas:");
    info!("   POST /api/points - Crear parada (admin)");
    info!("   GET  /api/points - Listar paradas activas");
    info!("   GET  /api/points/:id - Obtener parada");
    info!("   PUT  /api/points/:id - Actualizar parada (admin)");
    info!("   POST /api/points/route - Añadir parada a ruta (admin)");
    info!("   DELETE /api/points/route/:routeId/:pointId - Quitar parada de ruta (admin)");
    info!("🌍 Públicos:");
    info!("   GET  /api/public/bus/:busNumber - Estado público del autobús");
    info!("   GET  /api/public/health - Health check");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal SIGTERM recibida, apagando servidor...");
        },
    }
}
