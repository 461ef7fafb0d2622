//! # Consultation Module
//!
//! Clinical records written after completed appointments, with a
//! one-way edit lock.

pub mod errors;
pub mod model;
pub mod repository;
pub mod api;

pub use api::ConsultationService;
pub use errors::{ConsultationError, ConsultationResult};
pub use model::Consultation;
pub use repository::{ConsultationRepository, InMemoryConsultationRepository};
