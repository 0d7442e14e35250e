//! # Módulo HTTP
//!
//! Este módulo implementa el protocolo HTTP desde cero, sin usar
//! librerías de alto nivel. Incluye:
//!
//! - Parsing de requests (request line, headers, body acotado)
//! - Construcción y serialización de responses
//! - Manejo de status codes
//! - Extracción de query parameters
//!
//! El servidor no mantiene conexiones persistentes: cada conexión
//! atiende exactamente un ciclo request/response y se cierra
//! (`Connection: close`). No hay chunked transfer encoding; el único
//! framing de body es por `Content-Length`.
//!
//! ### Formato de Request
//!
//! ```text
//! GET /path?query=value HTTP/1.1\r\n
//! Header-Name: Header-Value\r\n
//! Another-Header: Value\r\n
//! \r\n
//! ```
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: application/json\r\n
//! Content-Length: 13\r\n
//! \r\n
//! {"ok": true}
//! ```

pub mod request;   // Parsing de HTTP requests
pub mod response;  // Construcción de HTTP responses
pub mod status;    // Códigos de estado HTTP

// Re-exportamos los tipos principales para facilitar su uso
pub use request::{ParseError, Request};
pub use response::Response;
pub use status::StatusCode;
