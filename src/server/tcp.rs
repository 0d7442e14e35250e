//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Loop de aceptación bloqueante sobre un pool de workers de tamaño
//! fijo. El acceptor nunca procesa requests: cada conexión aceptada se
//! encola en el pool y un worker la atiende de principio a fin con I/O
//! bloqueante (timeout de lectura incluido).
//!
//! Aislamiento de fallos: un error de parseo descarta la conexión sin
//! respuesta; un timeout o error de I/O se loggea y cierra esa conexión;
//! nada de eso termina el proceso ni afecta a otras conexiones. El único
//! error fatal es no poder hacer bind del socket de escucha.

use crate::api::{self, UserStore};
use crate::config::Config;
use crate::files::StaticFiles;
use crate::http::{Request, Response};
use crate::metrics::MetricsCollector;
use crate::pool::ThreadPool;
use crate::router::Router;
use socket2::{Domain, Protocol, Socket, Type};
use std::io::BufReader;
use std::net::{Ipv4Addr, SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Servidor HTTP concurrente
pub struct Server {
    config: Config,
    router: Arc<Router>,
    metrics: Arc<MetricsCollector>,
    listener: TcpListener,
    running: Arc<AtomicBool>,
}

/// Handle para disparar el apagado ordenado desde otro thread
///
/// Marca la bandera de apagado y se conecta al puerto de escucha para
/// desbloquear el `accept` bloqueante del acceptor.
pub struct ShutdownHandle {
    running: Arc<AtomicBool>,
    port: u16,
}

impl ShutdownHandle {
    /// Dispara el apagado: no se aceptan más conexiones y el servidor
    /// drena los workers dentro del periodo de gracia configurado.
    pub fn trigger(&self) {
        self.running.store(false, Ordering::SeqCst);

        // Despertar el accept bloqueante con una conexión local
        let wake_addr = SocketAddr::new(Ipv4Addr::LOCALHOST.into(), self.port);
        let _ = TcpStream::connect_timeout(&wake_addr, Duration::from_millis(200));
    }
}

impl Server {
    /// Construye el servidor: tabla de rutas, estado compartido y
    /// socket de escucha con el backlog configurado.
    ///
    /// Un fallo aquí (bind) es el único error fatal del proceso.
    pub fn bind(config: Config) -> std::io::Result<Self> {
        let metrics = Arc::new(MetricsCollector::new());
        let store = Arc::new(UserStore::with_demo_users());

        // La tabla de rutas se llena una sola vez, antes de aceptar
        // conexiones; detrás del Arc queda inmutable
        let mut router = Router::new(StaticFiles::new(&config.static_dir));
        api::register_api_routes(&mut router, store, Arc::clone(&metrics));
        let router = Arc::new(router);

        let listener = Self::bind_listener(&config)?;

        Ok(Self {
            config,
            router,
            metrics,
            listener,
            running: Arc::new(AtomicBool::new(true)),
        })
    }

    /// Crea el socket de escucha con backlog explícito
    ///
    /// `std::net::TcpListener` no permite configurar el backlog, por
    /// eso el socket se arma con socket2 y se convierte al final.
    fn bind_listener(config: &Config) -> std::io::Result<TcpListener> {
        let address: SocketAddr = config.address().parse().map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Invalid bind address {}: {}", config.address(), e),
            )
        })?;

        let domain = if address.is_ipv4() {
            Domain::IPV4
        } else {
            Domain::IPV6
        };

        let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
        socket.set_reuse_address(true)?;
        socket.bind(&address.into())?;
        socket.listen(config.backlog as i32)?;

        Ok(socket.into())
    }

    /// Dirección real en la que quedó escuchando el servidor
    ///
    /// Útil con puerto 0 (efímero) en los tests.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Obtiene un handle de apagado para usar desde otro thread
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        let port = self
            .listener
            .local_addr()
            .map(|a| a.port())
            .unwrap_or(self.config.port);

        ShutdownHandle {
            running: Arc::clone(&self.running),
            port,
        }
    }

    /// Loop principal: acepta conexiones hasta el apagado
    ///
    /// Cada conexión aceptada se entrega al pool sin esperar su
    /// procesamiento. Errores de accept se loggean y el loop continúa;
    /// al apagarse, el pool drena con el periodo de gracia configurado.
    pub fn run(self) -> std::io::Result<()> {
        let address = self.listener.local_addr()?;
        println!("[+] Servidor escuchando en {}", address);
        println!(
            "[*] Pool: {} workers, cola de {} conexiones\n",
            self.config.workers, self.config.backlog
        );

        let pool = ThreadPool::new(self.config.workers, self.config.backlog);
        let read_timeout = Duration::from_millis(self.config.read_timeout_ms);

        loop {
            match self.listener.accept() {
                Ok((stream, peer)) => {
                    if !self.running.load(Ordering::SeqCst) {
                        break;
                    }

                    let router = Arc::clone(&self.router);
                    let metrics = Arc::clone(&self.metrics);

                    let job = Box::new(move || {
                        metrics.connection_opened();
                        if let Err(e) =
                            Self::handle_connection(stream, &router, &metrics, read_timeout)
                        {
                            eprintln!("   ❌ Error atendiendo a {}: {}", peer, e);
                        }
                        metrics.connection_closed();
                    });

                    if let Err(e) = pool.submit(job) {
                        // Cola llena: la conexión se descarta, el
                        // acceptor no espera a los workers
                        eprintln!("   ⚠️  Conexión de {} descartada: {}", peer, e);
                    }
                }
                Err(e) => {
                    if !self.running.load(Ordering::SeqCst) {
                        break;
                    }
                    eprintln!("   ❌ Error al aceptar conexión: {}", e);
                }
            }
        }

        println!("⏳ Apagando: drenando workers...");
        pool.shutdown(Duration::from_millis(self.config.grace_period_ms));

        Ok(())
    }

    /// Atiende una conexión completa: timeout → parse → route →
    /// serialize → close
    ///
    /// Un fallo de parseo (request malformado, stream vacío, timeout de
    /// lectura) descarta la conexión sin escribir respuesta. La conexión
    /// se cierra al salir, cuando el stream se dropea.
    fn handle_connection(
        stream: TcpStream,
        router: &Router,
        metrics: &MetricsCollector,
        read_timeout: Duration,
    ) -> std::io::Result<()> {
        let start = Instant::now();

        stream.set_read_timeout(Some(read_timeout))?;

        let peer = stream
            .peer_addr()
            .map(|a| a.ip().to_string())
            .unwrap_or_else(|_| "desconocido".to_string());

        let mut reader = BufReader::new(stream.try_clone()?);

        match Request::parse(&mut reader) {
            Ok(request) => {
                let response = router.route(&request);

                let mut stream = stream;
                response.send(&mut stream)?;

                metrics.record_request(response.status().as_u16());

                let latency = start.elapsed();
                println!(
                    "[{}] {} {} → {} ({:.2}ms)",
                    peer,
                    request.method(),
                    request.path(),
                    response.status().as_u16(),
                    latency.as_secs_f64() * 1000.0
                );
            }
            Err(e) => {
                // Drop silencioso: cerrar sin responder
                println!("[{}] petición descartada: {}", peer, e);
            }
        }

        Ok(())
    }
}
