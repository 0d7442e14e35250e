//! # Métricas del Servidor
//! src/metrics/mod.rs
//!
//! Contadores básicos en memoria: total de requests atendidos,
//! requests por código de estado y conexiones activas. Los consume
//! el endpoint `/api/status`.

pub mod collector;

pub use collector::MetricsCollector;
