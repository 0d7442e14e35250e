//! # Construcción de Respuestas HTTP
//!
//! Este módulo proporciona una API para construir respuestas HTTP de
//! forma programática y serializarlas al socket.
//!
//! Toda respuesta nace con los headers por defecto `Server` y
//! `Connection: close` (el servidor no mantiene conexiones
//! persistentes); un handler puede sobrescribirlos. Cada vez que se
//! asigna un body, `Content-Length` se recalcula al tamaño exacto en
//! bytes: un valor viejo o externo nunca sobrevive a la asignación.
//!
//! ## Ejemplo de uso
//!
//! ```
//! use web_server::http::{Response, StatusCode};
//!
//! let response = Response::new(StatusCode::Ok)
//!     .with_header("Content-Type", "application/json")
//!     .with_body(r#"{"message": "Hello"}"#);
//!
//! let bytes = response.to_bytes();
//! // Ahora puedes enviar `bytes` por el socket
//! ```

use super::StatusCode;
use std::collections::HashMap;
use std::io::Write;

/// Identidad del servidor en el header `Server`
pub const SERVER_NAME: &str = "HiloWeb/1.0";

/// Representa una respuesta HTTP completa
#[derive(Debug, Clone)]
pub struct Response {
    /// Código de estado HTTP (200, 404, etc.)
    status: StatusCode,

    /// Headers HTTP; el nombre conserva su capitalización
    headers: HashMap<String, String>,

    /// Cuerpo de la respuesta (puede ser vacío)
    body: Vec<u8>,
}

impl Response {
    /// Crea una nueva respuesta con el código de estado especificado
    ///
    /// La respuesta incluye los headers por defecto `Server` y
    /// `Connection: close`; un handler puede sobrescribirlos.
    pub fn new(status: StatusCode) -> Self {
        let mut headers = HashMap::new();
        headers.insert("Server".to_string(), SERVER_NAME.to_string());
        headers.insert("Connection".to_string(), "close".to_string());

        Self {
            status,
            headers,
            body: Vec::new(),
        }
    }

    /// Agrega un header a la respuesta (versión builder)
    ///
    /// Si el header ya existe, se sobrescribe.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }

    /// Agrega un header a una respuesta existente (versión mutable)
    pub fn add_header(&mut self, name: &str, value: &str) {
        self.headers.insert(name.to_string(), value.to_string());
    }

    /// Asigna el body y recalcula `Content-Length`
    ///
    /// El header de longitud siempre refleja el tamaño exacto del body
    /// asignado, aunque existiera un valor previo.
    pub fn set_body(&mut self, body: Vec<u8>) {
        self.body = body;
        self.headers
            .insert("Content-Length".to_string(), self.body.len().to_string());
    }

    /// Establece el cuerpo de la respuesta desde un string
    ///
    /// # Ejemplo
    /// ```
    /// use web_server::http::{Response, StatusCode};
    ///
    /// let response = Response::new(StatusCode::Ok)
    ///     .with_body("Hello World");
    /// ```
    pub fn with_body(mut self, body: &str) -> Self {
        self.set_body(body.as_bytes().to_vec());
        self
    }

    /// Establece el cuerpo de la respuesta desde bytes
    ///
    /// Útil para respuestas binarias (imágenes, etc.)
    pub fn with_body_bytes(mut self, body: Vec<u8>) -> Self {
        self.set_body(body);
        self
    }

    /// Crea una respuesta JSON exitosa (200 OK)
    ///
    /// # Ejemplo
    /// ```
    /// use web_server::http::Response;
    ///
    /// let response = Response::json(r#"{"status": "ok"}"#);
    /// ```
    pub fn json(body: &str) -> Self {
        Self::new(StatusCode::Ok)
            .with_header("Content-Type", "application/json")
            .with_body(body)
    }

    /// Crea una respuesta de error con body JSON `{"error": "mensaje"}`
    ///
    /// # Ejemplo
    /// ```
    /// use web_server::http::{Response, StatusCode};
    ///
    /// let response = Response::error(StatusCode::BadRequest, "No body provided");
    /// ```
    pub fn error(status: StatusCode, message: &str) -> Self {
        let body = serde_json::json!({ "error": message }).to_string();
        Self::new(status)
            .with_header("Content-Type", "application/json")
            .with_body(&body)
    }

    /// Respuesta 404 estándar
    pub fn not_found() -> Self {
        Self::error(StatusCode::NotFound, "Resource not found")
    }

    /// Serializa la respuesta a un writer
    ///
    /// Orden fijo: status line, headers (orden de iteración
    /// indiferente), línea vacía, body. La parte textual se descarga
    /// (`flush`) antes de escribir los bytes binarios del body.
    pub fn send<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut head = format!(
            "HTTP/1.1 {} {}\r\n",
            self.status.as_u16(),
            self.status.reason_phrase()
        );

        for (name, value) in &self.headers {
            head.push_str(name);
            head.push_str(": ");
            head.push_str(value);
            head.push_str("\r\n");
        }
        head.push_str("\r\n");

        writer.write_all(head.as_bytes())?;
        writer.flush()?;

        if !self.body.is_empty() {
            writer.write_all(&self.body)?;
            writer.flush()?;
        }

        Ok(())
    }

    /// Convierte la respuesta completa a bytes
    ///
    /// Mismo formato que `send`, en memoria.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = Vec::new();
        // to_bytes escribe sobre un Vec: nunca falla
        let _ = self.send(&mut result);
        result
    }

    /// Obtiene el código de estado de la respuesta
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Obtiene una referencia a los headers
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Obtiene un header por nombre exacto
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(|s| s.as_str())
    }

    /// Obtiene una referencia al body
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_response_has_default_headers() {
        let response = Response::new(StatusCode::Ok);

        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(response.header("Server"), Some(SERVER_NAME));
        assert_eq!(response.header("Connection"), Some("close"));
        assert!(response.body().is_empty());
    }

    #[test]
    fn test_default_headers_can_be_overwritten() {
        let response = Response::new(StatusCode::Ok).with_header("Server", "otro/2.0");

        assert_eq!(response.header("Server"), Some("otro/2.0"));
    }

    #[test]
    fn test_with_header() {
        let response = Response::new(StatusCode::Ok)
            .with_header("Content-Type", "text/plain")
            .with_header("X-Custom", "value");

        assert_eq!(response.header("Content-Type"), Some("text/plain"));
        assert_eq!(response.header("X-Custom"), Some("value"));
    }

    #[test]
    fn test_with_body_sets_content_length() {
        let response = Response::new(StatusCode::Ok).with_body("Hello World");

        assert_eq!(response.body(), b"Hello World");
        assert_eq!(response.header("Content-Length"), Some("11"));
    }

    #[test]
    fn test_stale_content_length_never_survives() {
        // Un Content-Length externo se recalcula al asignar el body
        let response = Response::new(StatusCode::Ok)
            .with_header("Content-Length", "999")
            .with_body("hello");

        assert_eq!(response.header("Content-Length"), Some("5"));
    }

    #[test]
    fn test_set_body_recomputes_length() {
        let mut response = Response::new(StatusCode::Ok).with_body("primera version");
        response.set_body(b"v2".to_vec());

        assert_eq!(response.header("Content-Length"), Some("2"));
        assert_eq!(response.body(), b"v2");
    }

    #[test]
    fn test_json_response() {
        let response = Response::json(r#"{"status": "ok"}"#);

        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert_eq!(response.body(), br#"{"status": "ok"}"#);
    }

    #[test]
    fn test_error_response() {
        let response = Response::error(StatusCode::BadRequest, "Invalid input");

        assert_eq!(response.status(), StatusCode::BadRequest);
        let body_str = String::from_utf8(response.body().to_vec()).unwrap();
        assert!(body_str.contains("Invalid input"));
    }

    #[test]
    fn test_error_response_escapes_message() {
        // El mensaje se serializa con serde_json: las comillas no rompen el JSON
        let response = Response::error(StatusCode::BadRequest, r#"valor "raro""#);

        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["error"], r#"valor "raro""#);
    }

    #[test]
    fn test_to_bytes_format() {
        let response = Response::new(StatusCode::Ok)
            .with_header("Content-Type", "text/plain")
            .with_body("Test");

        let text = String::from_utf8(response.to_bytes()).unwrap();

        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains("Content-Type: text/plain\r\n"));
        assert!(text.contains("Content-Length: 4\r\n"));
        assert!(text.contains("Connection: close\r\n"));
        assert!(text.ends_with("\r\n\r\nTest"));
    }

    #[test]
    fn test_empty_body_response() {
        let response = Response::new(StatusCode::NotFound);
        let text = String::from_utf8(response.to_bytes()).unwrap();

        // Debe terminar con \r\n\r\n (sin body)
        assert!(text.starts_with("HTTP/1.1 404 Not Found\r\n"));
        assert!(text.ends_with("\r\n\r\n"));
    }

    #[test]
    fn test_binary_body_preserved() {
        let binary_data = vec![0x00, 0x01, 0x02, 0xFF];
        let response = Response::new(StatusCode::Ok).with_body_bytes(binary_data.clone());

        assert_eq!(response.body(), &binary_data[..]);
        assert_eq!(response.header("Content-Length"), Some("4"));

        let bytes = response.to_bytes();
        assert!(bytes.ends_with(&binary_data));
    }
}
