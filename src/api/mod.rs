//! # API de Demostración
//! src/api/mod.rs
//!
//! Endpoints de ejemplo que viven sobre el router:
//!
//! - `GET /api/status` - Estado del servidor
//! - `GET /api/echo?message=...` - Echo por query parameter
//! - `POST /api/echo` - Echo del body
//! - `GET /api/users` - Lista de usuarios en memoria
//! - `POST /api/users` - Crea un usuario (JSON con name y email)
//!
//! El store de usuarios se comparte entre workers detrás de un `Arc`
//! con mutex interno: la mutación concurrente está sincronizada de
//! forma explícita.

pub mod handlers;
pub mod users;

pub use handlers::register_api_routes;
pub use users::{User, UserStore};
