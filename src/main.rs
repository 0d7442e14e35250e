//! # HiloWeb - Entry Point
//! src/main.rs
//!
//! Punto de entrada del servidor web concurrente.
//!
//! Uso: `web_server [PORT]`. Un puerto no numérico o ausente cae al
//! puerto por defecto (8080) con una advertencia.

use web_server::config::Config;
use web_server::server::Server;

fn main() {
    let config = Config::new();

    if let Err(e) = config.validate() {
        eprintln!("💥 Configuración inválida: {}", e);
        std::process::exit(1);
    }

    config.print_summary();

    // Bind es el único error fatal del proceso
    let server = match Server::bind(config) {
        Ok(server) => server,
        Err(e) => {
            eprintln!("💥 Error fatal al iniciar el servidor: {}", e);
            std::process::exit(1);
        }
    };

    install_shutdown_hook(&server);

    if let Err(e) = server.run() {
        eprintln!("💥 Error fatal: {}", e);
        std::process::exit(1);
    }

    println!("👋 Servidor detenido.");
}

/// Instala el manejador de SIGINT/SIGTERM que dispara el apagado ordenado.
#[cfg(unix)]
fn install_shutdown_hook(server: &Server) {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let handle = server.shutdown_handle();

    match Signals::new([SIGINT, SIGTERM]) {
        Ok(mut signals) => {
            std::thread::spawn(move || {
                if signals.forever().next().is_some() {
                    println!("\n⏹  Señal recibida, apagando servidor...");
                    handle.trigger();
                }
            });
        }
        Err(e) => {
            eprintln!("⚠️  No se pudo instalar el manejador de señales: {}", e);
        }
    }
}

#[cfg(not(unix))]
fn install_shutdown_hook(_server: &Server) {}
