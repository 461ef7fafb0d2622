//! carebase - a role-gated hospital administration backend
//!
//! Identity and token issuance, role-based access control, the
//! appointment/consultation lifecycle, and the directory services
//! around them (users, staff profiles, departments, availability,
//! hospital configuration), served over HTTP.

pub mod appointment;
pub mod auth;
pub mod config;
pub mod consultation;
pub mod directory;
pub mod http_server;
pub mod store;
