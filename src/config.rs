//! # Configuración del Servidor
//! src/config.rs
//!
//! Este módulo define la configuración del servidor HTTP con soporte
//! para argumentos CLI.
//!
//! ## Ejemplos de uso
//!
//! ```bash
//! # Puerto como único argumento posicional
//! ./web_server 9090
//!
//! # Opciones de afinado
//! ./web_server 9090 --workers 50 --backlog 1000 --read-timeout-ms 5000
//! ```
//!
//! Un puerto no numérico no es un error fatal: se sustituye por el
//! puerto por defecto (8080) con una advertencia.

use clap::Parser;

/// Puerto usado cuando no se indica uno válido
pub const DEFAULT_PORT: u16 = 8080;

/// Parsea el puerto de forma tolerante: un valor no numérico cae al
/// puerto por defecto con una advertencia en vez de abortar.
fn parse_port_lenient(raw: &str) -> Result<u16, std::convert::Infallible> {
    Ok(raw.parse().unwrap_or_else(|_| {
        eprintln!(
            "⚠️  Puerto inválido '{}'. Usando puerto por defecto: {}",
            raw, DEFAULT_PORT
        );
        DEFAULT_PORT
    }))
}

/// Configuración del servidor HTTP concurrente
#[derive(Debug, Clone, Parser)]
#[command(name = "web_server")]
#[command(about = "Servidor web HTTP concurrente con pool de threads")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(value_name = "PORT", default_value = "8080", value_parser = parse_port_lenient)]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Directorio raíz de archivos estáticos
    #[arg(long = "static-dir", default_value = "./public")]
    pub static_dir: String,

    // === Concurrencia ===
    /// Número de workers del pool (máximo de conexiones simultáneas)
    #[arg(long, default_value = "50")]
    pub workers: usize,

    /// Backlog del socket de escucha (conexiones aceptadas en espera)
    #[arg(long, default_value = "1000")]
    pub backlog: usize,

    // === Timeouts ===
    /// Timeout de lectura por conexión en milisegundos
    #[arg(long = "read-timeout-ms", default_value = "5000")]
    pub read_timeout_ms: u64,

    /// Periodo de gracia del apagado en milisegundos
    #[arg(long = "grace-period-ms", default_value = "10000")]
    pub grace_period_ms: u64,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use web_server::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "0.0.0.0:8080");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        if self.workers == 0 {
            return Err("Workers must be >= 1".to_string());
        }
        if self.backlog == 0 {
            return Err("Backlog must be >= 1".to_string());
        }
        if self.read_timeout_ms == 0 {
            return Err("Read timeout must be > 0".to_string());
        }
        Ok(())
    }

    /// Imprime un resumen de la configuración
    pub fn print_summary(&self) {
        println!("╔════════════════════════════════════════════╗");
        println!("║       HiloWeb - Servidor Multi-Thread      ║");
        println!("╚════════════════════════════════════════════╝");
        println!();
        println!("🌐 Network:");
        println!("   Address:       {}", self.address());
        println!("   Static dir:    {}", self.static_dir);
        println!();
        println!("👷 Concurrencia:");
        println!("   Workers:       {}", self.workers);
        println!("   Backlog:       {}", self.backlog);
        println!("   Read timeout:  {} ms", self.read_timeout_ms);
        println!("   Grace period:  {} ms", self.grace_period_ms);
        println!();
        println!("═════════════════════════════════════════════");
        println!();
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            host: "0.0.0.0".to_string(),
            static_dir: "./public".to_string(),
            workers: 50,
            backlog: 1000,
            read_timeout_ms: 5_000,
            grace_period_ms: 10_000,
        }
    }
}
