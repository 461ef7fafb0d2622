//! # Appointment Module
//!
//! Booking, state transitions and deletion guards for appointments.

pub mod errors;
pub mod model;
pub mod repository;
pub mod api;

pub use api::AppointmentService;
pub use errors::{AppointmentError, AppointmentResult};
pub use model::{Appointment, AppointmentStatus};
pub use repository::{AppointmentRepository, InMemoryAppointmentRepository};
