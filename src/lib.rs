//! # HiloWeb
//! src/lib.rs
//!
//! Servidor web HTTP concurrente implementado desde cero para demostrar
//! conceptos de sistemas operativos: concurrencia con un pool de threads,
//! sincronización y manejo de recursos.
//!
//! ## Arquitectura
//!
//! El servidor está dividido en módulos especializados:
//! - `http`: Parsing de requests y construcción de responses HTTP
//! - `server`: Loop de aceptación TCP y manejo de conexiones
//! - `pool`: Pool acotado de workers que procesa las conexiones
//! - `router`: Enrutamiento exacto (método + path) a handlers
//! - `files`: Servido de archivos estáticos con protección de traversal
//! - `api`: Endpoints de demostración (/api/status, /api/echo, /api/users)
//! - `metrics`: Contadores básicos del servidor
//! - `config`: Configuración por CLI
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use web_server::config::Config;
//! use web_server::server::Server;
//!
//! let config = Config::default();
//! let server = Server::bind(config).expect("Error al iniciar servidor");
//! server.run().expect("Error fatal");
//! ```

pub mod api;
pub mod config;
pub mod files;
pub mod http;
pub mod metrics;
pub mod pool;
pub mod router;
pub mod server;
