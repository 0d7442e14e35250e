//! # Collector de Métricas
//! src/metrics/collector.rs
//!
//! Recolecta contadores del servidor. Los workers lo comparten detrás
//! de un `Arc` y todo acceso pasa por el mutex interno.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Instant;

/// Collector de métricas thread-safe
pub struct MetricsCollector {
    inner: Mutex<MetricsData>,
    start_time: Instant,
}

/// Datos internos de métricas
struct MetricsData {
    /// Contador total de requests respondidos
    total_requests: u64,

    /// Requests por código de estado
    status_codes: HashMap<u16, u64>,

    /// Conexiones siendo atendidas ahora mismo
    active_connections: u64,
}

impl MetricsCollector {
    /// Crea un nuevo collector de métricas
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsData {
                total_requests: 0,
                status_codes: HashMap::new(),
                active_connections: 0,
            }),
            start_time: Instant::now(),
        }
    }

    /// Registra un request respondido con su código de estado
    pub fn record_request(&self, status_code: u16) {
        let mut data = self.inner.lock().unwrap();
        data.total_requests += 1;
        *data.status_codes.entry(status_code).or_insert(0) += 1;
    }

    /// Marca el inicio de atención de una conexión
    pub fn connection_opened(&self) {
        let mut data = self.inner.lock().unwrap();
        data.active_connections += 1;
    }

    /// Marca el fin de atención de una conexión
    pub fn connection_closed(&self) {
        let mut data = self.inner.lock().unwrap();
        if data.active_connections > 0 {
            data.active_connections -= 1;
        }
    }

    /// Total de requests respondidos
    pub fn total_requests(&self) -> u64 {
        self.inner.lock().unwrap().total_requests
    }

    /// Conexiones siendo atendidas ahora mismo
    pub fn active_connections(&self) -> u64 {
        self.inner.lock().unwrap().active_connections
    }

    /// Requests registrados con un código de estado dado
    pub fn count_for_status(&self, status_code: u16) -> u64 {
        self.inner
            .lock()
            .unwrap()
            .status_codes
            .get(&status_code)
            .copied()
            .unwrap_or(0)
    }

    /// Segundos desde que arrancó el servidor
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}
