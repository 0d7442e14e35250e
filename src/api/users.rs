//! # Store de Usuarios en Memoria
//! src/api/users.rs
//!
//! Colección de usuarios de demostración compartida entre workers.
//! Todo acceso pasa por el mutex interno; los datos se pierden al
//! reiniciar el proceso.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Usuario de demostración
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: u32,
    pub name: String,
    pub email: String,
}

/// Datos internos del store
struct UsersData {
    users: Vec<User>,
    next_id: u32,
}

/// Store de usuarios thread-safe
pub struct UserStore {
    inner: Mutex<UsersData>,
}

impl UserStore {
    /// Crea un store vacío
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(UsersData {
                users: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Crea un store con los dos usuarios de demostración
    pub fn with_demo_users() -> Self {
        let store = Self::new();
        store.create("Alice", "alice@example.com");
        store.create("Bob", "bob@example.com");
        store
    }

    /// Retorna una copia de todos los usuarios
    pub fn list(&self) -> Vec<User> {
        self.inner.lock().unwrap().users.clone()
    }

    /// Crea un usuario nuevo con el siguiente id disponible
    pub fn create(&self, name: &str, email: &str) -> User {
        let mut data = self.inner.lock().unwrap();

        let user = User {
            id: data.next_id,
            name: name.to_string(),
            email: email.to_string(),
        };
        data.next_id += 1;
        data.users.push(user.clone());

        user
    }

    /// Número de usuarios almacenados
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().users.len()
    }

    /// Verifica si el store está vacío
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}
