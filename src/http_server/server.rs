//! # HTTP Server
//!
//! Main HTTP server combining all endpoint routers.
//!
//! The repositories are created once and shared: the auth service and
//! the profile services see the same user set, and the appointment and
//! consultation services see the same appointment set.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Json, Router};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::appointment::repository::InMemoryAppointmentRepository;
use crate::appointment::AppointmentService;
use crate::auth::user::InMemoryUserRepository;
use crate::auth::{AccessGuard, AuthService, JwtConfig, JwtManager};
use crate::consultation::repository::InMemoryConsultationRepository;
use crate::consultation::ConsultationService;
use crate::directory::availability::InMemoryAvailabilityRepository;
use crate::directory::departments::InMemoryDepartmentRepository;
use crate::directory::doctors::InMemoryDoctorRepository;
use crate::directory::hospital_config::InMemoryHospitalConfigRepository;
use crate::directory::nurses::InMemoryNurseRepository;
use crate::directory::patients::InMemoryPatientRepository;
use crate::directory::{
    AvailabilityService, DepartmentService, DoctorService, HospitalConfigService, NurseService,
    PatientService,
};

use super::appointment_routes::{appointment_routes, AppointmentState};
use super::auth_routes::{auth_routes, AuthState};
use super::config::HttpServerConfig;
use super::consultation_routes::{consultation_routes, ConsultationState};
use super::department_routes::{department_routes, DepartmentState};
use super::hospital_config_routes::{hospital_config_routes, HospitalConfigState};
use super::patient_routes::{patient_routes, PatientState};
use super::staff_routes::{staff_routes, StaffState};
use super::user_routes::{user_routes, UserAdminState};

/// HTTP server for the hospital administration API
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with default configuration
    pub fn new() -> Self {
        Self::with_config(HttpServerConfig::default(), JwtConfig::default())
    }

    /// Create a new HTTP server with custom configuration
    pub fn with_config(config: HttpServerConfig, tokens: JwtConfig) -> Self {
        let router = Self::build_router(&config, tokens);
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    fn build_router(config: &HttpServerConfig, tokens: JwtConfig) -> Router {
        // Shared repositories
        let users = Arc::new(InMemoryUserRepository::new());
        let patients = Arc::new(InMemoryPatientRepository::new());
        let doctors = Arc::new(InMemoryDoctorRepository::new());
        let nurses = Arc::new(InMemoryNurseRepository::new());
        let departments = Arc::new(InMemoryDepartmentRepository::new());
        let slots = Arc::new(InMemoryAvailabilityRepository::new());
        let hospital_configs = Arc::new(InMemoryHospitalConfigRepository::new());
        let appointments = Arc::new(InMemoryAppointmentRepository::new());
        let consultations = Arc::new(InMemoryConsultationRepository::new());

        let token_manager = JwtManager::new(tokens);
        let guard = AccessGuard::new(token_manager.clone());

        // Per-concern states
        let auth_state = Arc::new(AuthState {
            service: AuthService::new(Arc::clone(&users), token_manager.clone()),
        });
        let user_state = Arc::new(UserAdminState {
            service: AuthService::new(Arc::clone(&users), token_manager.clone()),
            guard: guard.clone(),
        });
        let staff_state = Arc::new(StaffState {
            doctors: DoctorService::new(Arc::clone(&doctors), Arc::clone(&users)),
            nurses: NurseService::new(nurses, Arc::clone(&users)),
            availability: AvailabilityService::new(slots, Arc::clone(&doctors)),
            guard: guard.clone(),
        });
        let patient_state = Arc::new(PatientState {
            service: PatientService::new(Arc::clone(&patients), Arc::clone(&users)),
            guard: guard.clone(),
        });
        let department_state = Arc::new(DepartmentState {
            service: DepartmentService::new(departments),
            guard: guard.clone(),
        });
        let hospital_config_state = Arc::new(HospitalConfigState {
            service: HospitalConfigService::new(hospital_configs),
            guard: guard.clone(),
        });
        let appointment_state = Arc::new(AppointmentState {
            service: AppointmentService::new(Arc::clone(&appointments), patients, doctors),
            guard: guard.clone(),
        });
        let consultation_state = Arc::new(ConsultationState {
            service: ConsultationService::new(consultations, appointments),
            guard,
        });

        // Configure CORS from config
        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            use tower_http::cors::AllowOrigin;
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        // Admin routes share one prefix
        let admin = Router::new()
            .nest("/users", user_routes(user_state))
            .merge(staff_routes(staff_state))
            .nest("/departments", department_routes(department_state))
            .nest("/hospital-configs", hospital_config_routes(hospital_config_state));

        Router::new()
            .merge(health_routes())
            .nest("/auth", auth_routes(auth_state))
            .nest("/admin", admin)
            .nest("/patients", patient_routes(patient_state))
            .nest("/appointments", appointment_routes(appointment_state))
            .nest("/consultations", consultation_routes(consultation_state))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Start the HTTP server (async)
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid listen address: {e}"),
            )
        })?;

        tracing::info!(%addr, "http server listening");

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

impl Default for HttpServer {
    fn default() -> Self {
        Self::new()
    }
}

/// Health check at the root level
fn health_routes() -> Router {
    Router::new().route("/health", get(health_handler))
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
