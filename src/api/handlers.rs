//! # Handlers de la API de Demostración
//! src/api/handlers.rs
//!
//! Implementa los endpoints `/api/*`. Cada handler recibe un Request y
//! retorna una Response; el estado compartido (store de usuarios,
//! métricas) viaja capturado en las closures que se registran en el
//! router.

use crate::api::users::UserStore;
use crate::http::{Request, Response, StatusCode};
use crate::metrics::MetricsCollector;
use crate::router::Router;
use std::sync::Arc;

/// Registra todas las rutas de la API en el router
pub fn register_api_routes(
    router: &mut Router,
    store: Arc<UserStore>,
    metrics: Arc<MetricsCollector>,
) {
    router.register("GET", "/api/status", {
        let metrics = Arc::clone(&metrics);
        move |_req| status_handler(&metrics)
    });

    router.register("GET", "/api/echo", echo_handler);

    router.register("POST", "/api/echo", echo_post_handler);

    router.register("GET", "/api/users", {
        let store = Arc::clone(&store);
        move |_req| list_users_handler(&store)
    });

    router.register("POST", "/api/users", {
        let store = Arc::clone(&store);
        move |req| create_user_handler(req, &store)
    });
}

/// Handler para GET /api/status
///
/// # Ejemplo de response
/// ```json
/// {"status":"running","uptime_seconds":12,"processors":8,
///  "requests":{"total":42,"active_connections":1}}
/// ```
fn status_handler(metrics: &MetricsCollector) -> Response {
    let processors = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);

    let body = serde_json::json!({
        "status": "running",
        "uptime_seconds": metrics.uptime_secs(),
        "processors": processors,
        "requests": {
            "total": metrics.total_requests(),
            "active_connections": metrics.active_connections(),
        },
    });

    Response::json(&body.to_string())
}

/// Handler para GET /api/echo?message=...
///
/// Sin parámetro `message` responde un saludo por defecto.
fn echo_handler(req: &Request) -> Response {
    let message = req.query_param("message").unwrap_or("Hello from the server!");

    let body = serde_json::json!({ "echo": message });
    Response::json(&body.to_string())
}

/// Handler para POST /api/echo
///
/// Devuelve el body recibido; un body ausente o vacío es 400.
fn echo_post_handler(req: &Request) -> Response {
    let body = match req.body_string() {
        Some(b) if !b.is_empty() => b,
        _ => return Response::error(StatusCode::BadRequest, "No body provided"),
    };

    let json = serde_json::json!({ "received": body });
    Response::json(&json.to_string())
}

/// Handler para GET /api/users
fn list_users_handler(store: &UserStore) -> Response {
    match serde_json::to_string(&store.list()) {
        Ok(json) => Response::json(&json),
        Err(e) => Response::error(
            StatusCode::InternalServerError,
            &format!("Serialization error: {}", e),
        ),
    }
}

/// Handler para POST /api/users
///
/// Espera un body JSON `{"name": "...", "email": "..."}`. Body
/// ausente/vacío, JSON inválido o campos faltantes ⇒ 400. Con éxito
/// responde 201 con el usuario creado.
fn create_user_handler(req: &Request, store: &UserStore) -> Response {
    let body = match req.body() {
        Some(b) if !b.is_empty() => b,
        _ => return Response::error(StatusCode::BadRequest, "No body provided"),
    };

    let parsed: serde_json::Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(_) => return Response::error(StatusCode::BadRequest, "Invalid JSON body"),
    };

    let name = parsed.get("name").and_then(|v| v.as_str());
    let email = parsed.get("email").and_then(|v| v.as_str());

    let (name, email) = match (name, email) {
        (Some(name), Some(email)) => (name, email),
        _ => return Response::error(StatusCode::BadRequest, "Name and email required"),
    };

    let user = store.create(name, email);

    match serde_json::to_string(&user) {
        Ok(json) => Response::new(StatusCode::Created)
            .with_header("Content-Type", "application/json")
            .with_body(&json),
        Err(e) => Response::error(
            StatusCode::InternalServerError,
            &format!("Serialization error: {}", e),
        ),
    }
}
