//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Este módulo implementa el router que mapea peticiones a handlers.
//!
//! ## Arquitectura
//!
//! ```text
//! Request → Router → Handler → Response
//! ```
//!
//! El lookup es exacto sobre la clave `METHOD:PATH` (método
//! case-sensitive, path con slash inicial, sin patrones ni wildcards).
//! Si no hay ruta registrada y el método es GET (case-insensitive), la
//! petición cae al servidor de archivos estáticos; cualquier otro
//! método sin ruta produce 404.
//!
//! La tabla se construye una vez al arrancar y no se muta después:
//! detrás de un `Arc` es segura para lecturas concurrentes sin locks.

use crate::files::{ServeError, StaticFiles};
use crate::http::{Request, Response, StatusCode};
use std::collections::HashMap;

/// Tipo de handler: una closure que recibe un Request y retorna una
/// Response. Se usa `Box<dyn Fn>` para que los handlers puedan capturar
/// estado compartido (ej: el store de usuarios detrás de un `Arc`).
pub type Handler = Box<dyn Fn(&Request) -> Response + Send + Sync>;

/// Router de despacho exacto con fallback a archivos estáticos
pub struct Router {
    /// Mapa de "METHOD:PATH" → handler
    routes: HashMap<String, Handler>,

    /// Colaborador para el fallback de GET
    statics: StaticFiles,
}

impl Router {
    /// Crea un router vacío con el servidor de estáticos dado
    pub fn new(statics: StaticFiles) -> Self {
        Self {
            routes: HashMap::new(),
            statics,
        }
    }

    /// Registra una ruta con su handler
    ///
    /// # Ejemplo
    /// ```
    /// use web_server::router::Router;
    /// use web_server::files::StaticFiles;
    /// use web_server::http::{Request, Response};
    ///
    /// let mut router = Router::new(StaticFiles::new("./public"));
    /// router.register("GET", "/hello", |_req| {
    ///     Response::json(r#"{"message": "Hello"}"#)
    /// });
    /// ```
    pub fn register<H>(&mut self, method: &str, path: &str, handler: H)
    where
        H: Fn(&Request) -> Response + Send + Sync + 'static,
    {
        self.routes
            .insert(format!("{}:{}", method, path), Box::new(handler));
    }

    /// Despacha un request al handler apropiado
    ///
    /// Orden de lookup:
    /// 1. Ruta API exacta `METHOD:PATH`
    /// 2. GET sin ruta → archivos estáticos (con `/` → `/index.html`)
    /// 3. Cualquier otro caso → 404
    pub fn route(&self, request: &Request) -> Response {
        let key = format!("{}:{}", request.method(), request.path());

        if let Some(handler) = self.routes.get(&key) {
            return handler(request);
        }

        if request.method().eq_ignore_ascii_case("GET") {
            return self.serve_static(request.path());
        }

        Response::not_found()
    }

    /// Fallback de archivos estáticos para GET
    ///
    /// Traduce las señales del colaborador: path inseguro ⇒ 400,
    /// archivo ausente ⇒ 404, error de I/O ⇒ 500.
    fn serve_static(&self, path: &str) -> Response {
        let path = if path == "/" { "/index.html" } else { path };

        match self.statics.serve(path) {
            Ok((content, content_type)) => Response::new(StatusCode::Ok)
                .with_header("Content-Type", content_type)
                .with_body_bytes(content),
            Err(ServeError::Unsafe) => Response::error(StatusCode::BadRequest, "Invalid path"),
            Err(ServeError::NotFound) => Response::not_found(),
            Err(ServeError::Io(_)) => {
                Response::error(StatusCode::InternalServerError, "Failed to read file")
            }
        }
    }

    /// Número de rutas registradas
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    static DIR_COUNTER: AtomicU32 = AtomicU32::new(0);

    fn temp_root() -> PathBuf {
        let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
        let dir = std::env::temp_dir().join(format!(
            "web_server_router_test_{}_{}",
            std::process::id(),
            id
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn request(raw: &[u8]) -> Request {
        Request::parse(&mut Cursor::new(raw)).unwrap()
    }

    fn empty_router() -> Router {
        Router::new(StaticFiles::new(temp_root()))
    }

    #[test]
    fn test_route_found() {
        let mut router = empty_router();
        router.register("GET", "/test", |_req| Response::json(r#"{"test": "ok"}"#));

        let response = router.route(&request(b"GET /test HTTP/1.1\r\n\r\n"));
        assert_eq!(response.status(), StatusCode::Ok);
    }

    #[test]
    fn test_method_is_case_sensitive_in_table() {
        // La tabla es exacta: "get" no matchea la ruta "GET", cae al
        // fallback de estáticos (por ser GET case-insensitive) y da 404
        let mut router = empty_router();
        router.register("GET", "/test", |_req| Response::json("{}"));

        let response = router.route(&request(b"get /test HTTP/1.1\r\n\r\n"));
        assert_eq!(response.status(), StatusCode::NotFound);
    }

    #[test]
    fn test_same_path_different_methods() {
        let mut router = empty_router();
        router.register("GET", "/api/echo", |_req| Response::json(r#"{"via": "get"}"#));
        router.register("POST", "/api/echo", |_req| Response::json(r#"{"via": "post"}"#));

        let get = router.route(&request(b"GET /api/echo HTTP/1.1\r\n\r\n"));
        let post = router.route(&request(b"POST /api/echo HTTP/1.1\r\n\r\n"));

        assert!(String::from_utf8_lossy(get.body()).contains("get"));
        assert!(String::from_utf8_lossy(post.body()).contains("post"));
    }

    #[test]
    fn test_unmatched_non_get_is_404() {
        let router = empty_router();

        let response = router.route(&request(b"DELETE /x HTTP/1.1\r\n\r\n"));
        assert_eq!(response.status(), StatusCode::NotFound);
    }

    #[test]
    fn test_unmatched_get_falls_back_to_statics() {
        let root = temp_root();
        fs::write(root.join("page.html"), b"<p>hola</p>").unwrap();
        let router = Router::new(StaticFiles::new(&root));

        let response = router.route(&request(b"GET /page.html HTTP/1.1\r\n\r\n"));

        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(response.header("Content-Type"), Some("text/html; charset=UTF-8"));
        assert_eq!(response.body(), b"<p>hola</p>");
    }

    #[test]
    fn test_root_path_rewrites_to_index() {
        let root = temp_root();
        fs::write(root.join("index.html"), b"<h1>inicio</h1>").unwrap();
        let router = Router::new(StaticFiles::new(&root));

        let response = router.route(&request(b"GET / HTTP/1.1\r\n\r\n"));

        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(response.body(), b"<h1>inicio</h1>");
    }

    #[test]
    fn test_missing_static_file_is_404() {
        let router = empty_router();

        let response = router.route(&request(b"GET /nonexistent HTTP/1.1\r\n\r\n"));
        assert_eq!(response.status(), StatusCode::NotFound);
    }

    #[test]
    fn test_traversal_path_is_400() {
        let router = empty_router();

        let response = router.route(&request(b"GET /../../etc/passwd HTTP/1.1\r\n\r\n"));
        assert_eq!(response.status(), StatusCode::BadRequest);
    }

    #[test]
    fn test_handler_can_capture_shared_state() {
        let counter = Arc::new(AtomicU32::new(0));
        let mut router = empty_router();

        let captured = Arc::clone(&counter);
        router.register("GET", "/count", move |_req| {
            let n = captured.fetch_add(1, Ordering::SeqCst) + 1;
            Response::json(&format!(r#"{{"count": {}}}"#, n))
        });

        router.route(&request(b"GET /count HTTP/1.1\r\n\r\n"));
        router.route(&request(b"GET /count HTTP/1.1\r\n\r\n"));

        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_route_count() {
        let mut router = empty_router();
        assert_eq!(router.route_count(), 0);

        router.register("GET", "/a", |_req| Response::json("{}"));
        router.register("POST", "/a", |_req| Response::json("{}"));
        assert_eq!(router.route_count(), 2);
    }
}
