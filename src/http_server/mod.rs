//! # HTTP Server Module
//!
//! Axum routers per concern, combined into one server.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/auth/*` - Signup and login (public)
//! - `/admin/*` - User, staff, department and config management (ADMIN)
//! - `/patients/*` - Patient profile creation (PATIENT)
//! - `/appointments/*` - Appointment lifecycle (authenticated)
//! - `/consultations/*` - Consultation workflow (authenticated)

pub mod config;
pub mod server;

pub mod appointment_routes;
pub mod auth_routes;
pub mod consultation_routes;
pub mod department_routes;
pub mod hospital_config_routes;
pub mod patient_routes;
pub mod staff_routes;
pub mod user_routes;

pub use config::HttpServerConfig;
pub use server::HttpServer;
