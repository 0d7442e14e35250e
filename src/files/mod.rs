//! # Archivos Estáticos
//! src/files/mod.rs
//!
//! Resuelve paths de URL dentro de un directorio raíz configurado y
//! retorna (bytes, content-type). La resolución camina los componentes
//! del path y solo admite segmentos normales: cualquier `..` u otro
//! componente que pueda escapar de la raíz se rechaza como path
//! inseguro antes de tocar el filesystem.

use std::fs;
use std::path::{Component, Path, PathBuf};

/// Resultado fallido al servir un archivo
///
/// El router traduce cada variante a su respuesta: `Unsafe` ⇒ 400,
/// `NotFound` ⇒ 404, `Io` ⇒ 500.
#[derive(Debug)]
pub enum ServeError {
    /// El path resuelve fuera del directorio raíz
    Unsafe,

    /// El archivo no existe o es un directorio
    NotFound,

    /// Error de I/O leyendo un archivo existente
    Io(std::io::Error),
}

impl std::fmt::Display for ServeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServeError::Unsafe => write!(f, "Path escapes the static root"),
            ServeError::NotFound => write!(f, "File not found"),
            ServeError::Io(e) => write!(f, "I/O error reading file: {}", e),
        }
    }
}

impl std::error::Error for ServeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServeError::Io(e) => Some(e),
            _ => None,
        }
    }
}

/// Servidor de archivos estáticos anclado a un directorio raíz
pub struct StaticFiles {
    root: PathBuf,
}

impl StaticFiles {
    /// Crea un servidor de archivos anclado en `root`
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// Resuelve un path de URL dentro de la raíz
    ///
    /// Solo se admiten componentes normales; `..`, raíces y prefijos
    /// se rechazan como inseguros.
    fn resolve(&self, url_path: &str) -> Result<PathBuf, ServeError> {
        let mut resolved = self.root.clone();

        for component in Path::new(url_path.trim_start_matches('/')).components() {
            match component {
                Component::Normal(segment) => resolved.push(segment),
                Component::CurDir => {}
                _ => return Err(ServeError::Unsafe),
            }
        }

        Ok(resolved)
    }

    /// Sirve el archivo en `url_path`
    ///
    /// Retorna los bytes del archivo junto con su content-type, o el
    /// error que el router traducirá a 400/404/500.
    ///
    /// # Ejemplo
    /// ```no_run
    /// use web_server::files::StaticFiles;
    ///
    /// let statics = StaticFiles::new("./public");
    /// let (bytes, content_type) = statics.serve("/index.html").unwrap();
    /// assert_eq!(content_type, "text/html; charset=UTF-8");
    /// ```
    pub fn serve(&self, url_path: &str) -> Result<(Vec<u8>, &'static str), ServeError> {
        let path = self.resolve(url_path)?;

        if !path.is_file() {
            return Err(ServeError::NotFound);
        }

        let content = fs::read(&path).map_err(ServeError::Io)?;
        Ok((content, content_type(url_path)))
    }
}

/// Mapea la extensión del archivo a su MIME type
///
/// Extensión desconocida ⇒ `application/octet-stream`.
pub fn content_type(path: &str) -> &'static str {
    let extension = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "html" | "htm" => "text/html; charset=UTF-8",
        "css" => "text/css",
        "js" => "application/javascript",
        "json" => "application/json",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        _ => "application/octet-stream",
    }
}
