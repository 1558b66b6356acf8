use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use rental_booking::config::environment::EnvironmentConfig;
use rental_booking::database;
use rental_booking::{create_app, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚗 Vehicle Rental Booking API");
    info!("=============================");

    let config = EnvironmentConfig::from_env()?;

    // Inicializar base de datos
    let pool = match database::create_pool(&config.database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(e);
        }
    };

    database::run_migrations(&pool).await?;

    let addr: SocketAddr = config.server_addr().parse()?;
    let app = create_app(AppState::new(pool, config));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET   /health - Endpoint de prueba");
    info!("👤 Usuarios:");
    info!("   POST  /users - Registrar usuario");
    info!("   POST  /users/login - Login");
    info!("📅 Reservas:");
    info!("   GET   /bookings/available-vehicles - Vehículos disponibles en una ventana");
    info!("   POST  /bookings - Crear reserva");
    info!("   GET   /bookings?booking_id=|user_id= - Consultar reservas");
    info!("   GET   /bookings/admin - Todas las reservas (vista admin)");
    info!("   PATCH /bookings/cancel - Cancelar reserva");
    info!("   PATCH /bookings/confirm - Confirmar reserva");
    info!("   PATCH /bookings/finish - Finalizar reserva");
    info!("   PATCH /bookings/feedback - Dejar feedback");
    info!("   PATCH /bookings/rate - Puntuar reserva");
    info!("   POST  /bookings/message - Añadir mensaje");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            anyhow::anyhow!(e)
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
