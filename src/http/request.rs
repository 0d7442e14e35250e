//! # Parsing de Requests HTTP
//! src/http/request.rs
//!
//! Este módulo implementa un parser HTTP desde cero sobre un stream
//! buffereado. El parser es una máquina de estados sobre líneas
//! terminadas en CRLF (tolerando LF a secas):
//!
//! 1. **Request line**: `METHOD /path?query VERSION`, exactamente 3
//!    campos separados por espacios simples, o el parseo falla.
//! 2. **Headers**: pares `Name: Value` hasta una línea vacía; las líneas
//!    malformadas se saltan, no abortan.
//! 3. **Body**: solo para POST con `Content-Length` numérico; se leen
//!    exactamente esos bytes (o menos si el stream termina antes).
//!
//! Un fallo de parseo no produce respuesta: el worker descarta la
//! conexión en silencio.

use std::collections::HashMap;
use std::io::{BufRead, Read};

/// Tamaño máximo de body que el parser acepta leer
pub const MAX_BODY_SIZE: usize = 1024 * 1024;

/// Representa un request HTTP parseado
#[derive(Debug, Clone)]
pub struct Request {
    /// Método HTTP tal como llegó (el router es case-sensitive)
    method: String,

    /// Path de la petición, sin query string (ej: "/api/users")
    path: String,

    /// Versión HTTP declarada (no se valida; es un token opaco)
    version: String,

    /// Headers con nombre en minúsculas (lookup case-insensitive)
    headers: HashMap<String, String>,

    /// Query parameters (ej: {"message": "hola"})
    query_params: HashMap<String, String>,

    /// Body del request, presente solo cuando se leyó explícitamente
    body: Option<Vec<u8>>,
}

/// Errores que pueden ocurrir durante el parsing
///
/// Cualquiera de estos hace que el worker cierre la conexión sin
/// escribir respuesta (drop silencioso).
#[derive(Debug)]
pub enum ParseError {
    /// Stream vacío o primera línea vacía
    EmptyRequest,

    /// Request line sin exactamente 3 campos
    InvalidRequestLine,

    /// Error de I/O leyendo el stream (incluye timeout de lectura)
    Io(std::io::Error),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::EmptyRequest => write!(f, "Empty request"),
            ParseError::InvalidRequestLine => write!(f, "Invalid request line format"),
            ParseError::Io(e) => write!(f, "I/O error while reading request: {}", e),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ParseError {
    fn from(e: std::io::Error) -> Self {
        ParseError::Io(e)
    }
}

impl Request {
    /// Parsea un request HTTP desde un stream buffereado
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use web_server::http::Request;
    /// use std::io::Cursor;
    ///
    /// let raw = b"GET /api/echo?message=hola HTTP/1.1\r\n\r\n";
    /// let request = Request::parse(&mut Cursor::new(&raw[..])).unwrap();
    ///
    /// assert_eq!(request.path(), "/api/echo");
    /// assert_eq!(request.query_param("message"), Some("hola"));
    /// ```
    pub fn parse<R: BufRead>(reader: &mut R) -> Result<Self, ParseError> {
        // 1. Request line
        let request_line = match Self::read_line(reader)? {
            Some(line) if !line.is_empty() => line,
            _ => return Err(ParseError::EmptyRequest),
        };

        // Exactamente 3 campos separados por espacios simples
        let parts: Vec<&str> = request_line.split(' ').collect();
        if parts.len() != 3 {
            return Err(ParseError::InvalidRequestLine);
        }

        let method = parts[0].to_string();
        let (path, query_params) = Self::parse_target(parts[1]);
        let version = parts[2].to_string();

        // 2. Headers
        let headers = Self::parse_headers(reader)?;

        // 3. Body (solo POST con Content-Length válido)
        let body = Self::parse_body(reader, &method, &headers)?;

        Ok(Request {
            method,
            path,
            version,
            headers,
            query_params,
            body,
        })
    }

    /// Lee una línea terminada en CRLF (o LF a secas)
    ///
    /// Retorna `None` al final del stream.
    fn read_line<R: BufRead>(reader: &mut R) -> Result<Option<String>, ParseError> {
        let mut line = String::new();
        let bytes_read = reader.read_line(&mut line)?;

        if bytes_read == 0 {
            return Ok(None);
        }

        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }

        Ok(Some(line))
    }

    /// Separa el target en path y query parameters
    ///
    /// Ejemplo: "/api/echo?message=hola&x=1"
    /// Retorna: ("/api/echo", {"message": "hola", "x": "1"})
    fn parse_target(target: &str) -> (String, HashMap<String, String>) {
        if let Some(query_start) = target.find('?') {
            let path = target[..query_start].to_string();
            let query_params = Self::parse_query_string(&target[query_start + 1..]);
            (path, query_params)
        } else {
            (target.to_string(), HashMap::new())
        }
    }

    /// Parsea una query string en un HashMap
    ///
    /// Cada par se separa en su primer `=`; los pares sin `=` (o con `=`
    /// al inicio) se saltan. Con claves repetidas gana la última.
    fn parse_query_string(query: &str) -> HashMap<String, String> {
        let mut params = HashMap::new();

        for pair in query.split('&') {
            if let Some(eq_pos) = pair.find('=') {
                if eq_pos > 0 {
                    let key = &pair[..eq_pos];
                    let value = &pair[eq_pos + 1..];
                    params.insert(key.to_string(), value.to_string());
                }
            }
        }

        params
    }

    /// Parsea los headers hasta la línea vacía o el fin del stream
    ///
    /// Cada línea se separa en su primer `:`. Las líneas sin `:` (o con
    /// `:` en la posición 0) se saltan; la recolección continúa. Los
    /// nombres se guardan en minúsculas y con claves repetidas gana la
    /// última aparición.
    fn parse_headers<R: BufRead>(reader: &mut R) -> Result<HashMap<String, String>, ParseError> {
        let mut headers = HashMap::new();

        while let Some(line) = Self::read_line(reader)? {
            if line.is_empty() {
                break;
            }

            if let Some(colon_pos) = line.find(':') {
                if colon_pos > 0 {
                    let name = line[..colon_pos].trim().to_lowercase();
                    let value = line[colon_pos + 1..].trim().to_string();
                    headers.insert(name, value);
                }
            }
        }

        Ok(headers)
    }

    /// Lee el body cuando corresponde
    ///
    /// Solo POST (case-insensitive) con un `Content-Length` que parsea
    /// como entero no negativo captura body. Un length ausente o no
    /// parseable significa "sin body", no un error de parseo. Si el
    /// stream termina antes, lo leído hasta ahí queda como body.
    fn parse_body<R: BufRead>(
        reader: &mut R,
        method: &str,
        headers: &HashMap<String, String>,
    ) -> Result<Option<Vec<u8>>, ParseError> {
        if !method.eq_ignore_ascii_case("POST") {
            return Ok(None);
        }

        let length = match headers.get("content-length").and_then(|v| v.parse::<usize>().ok()) {
            Some(length) => length.min(MAX_BODY_SIZE),
            None => return Ok(None),
        };

        let mut body = vec![0u8; length];
        let mut filled = 0;

        while filled < length {
            let n = reader.read(&mut body[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }

        body.truncate(filled);

        if filled == 0 {
            return Ok(None);
        }

        Ok(Some(body))
    }

    // === Métodos públicos para acceder a los campos ===

    /// Obtiene el método HTTP del request, tal como llegó
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Obtiene el path del request
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Obtiene la versión HTTP declarada
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Obtiene todos los headers (claves en minúsculas)
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Obtiene un header específico, con lookup case-insensitive
    ///
    /// # Ejemplo
    /// ```
    /// use web_server::http::Request;
    /// use std::io::Cursor;
    ///
    /// let raw = b"GET / HTTP/1.1\r\nContent-Type: text/plain\r\n\r\n";
    /// let request = Request::parse(&mut Cursor::new(&raw[..])).unwrap();
    ///
    /// assert_eq!(request.header("CONTENT-TYPE"), Some("text/plain"));
    /// ```
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(|s| s.as_str())
    }

    /// Obtiene todos los query parameters
    pub fn query_params(&self) -> &HashMap<String, String> {
        &self.query_params
    }

    /// Obtiene un query parameter específico
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_params.get(name).map(|s| s.as_str())
    }

    /// Obtiene el body del request, si se leyó uno
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Obtiene el body del request como String
    pub fn body_string(&self) -> Option<String> {
        self.body
            .as_ref()
            .and_then(|b| String::from_utf8(b.clone()).ok())
    }
}
