//! # Pool de Workers
//! src/pool/mod.rs
//!
//! Pool de threads de tamaño fijo que drena una cola acotada de
//! trabajos. Es la cota de concurrencia del servidor: como máximo
//! `workers` conexiones se procesan a la vez y las demás esperan en la
//! cola hasta que un worker se libere.
//!
//! Un fallo dentro de un trabajo (incluido un panic) se aísla en el
//! worker que lo ejecuta: nunca tumba al pool ni a otros workers.

use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// Unidad de trabajo del pool
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Estado compartido entre los workers y el pool
struct PoolShared {
    /// Cola FIFO de trabajos pendientes
    queue: Mutex<VecDeque<Job>>,

    /// Condvar para despertar workers cuando hay trabajo
    available: Condvar,

    /// Bandera de apagado
    shutdown: AtomicBool,

    /// Capacidad máxima de la cola
    capacity: usize,
}

/// Pool de workers de tamaño fijo
pub struct ThreadPool {
    shared: Arc<PoolShared>,
    workers: Vec<thread::JoinHandle<()>>,
}

impl ThreadPool {
    /// Crea un pool con `workers` threads y una cola de capacidad
    /// `queue_capacity`
    pub fn new(workers: usize, queue_capacity: usize) -> Self {
        let shared = Arc::new(PoolShared {
            queue: Mutex::new(VecDeque::new()),
            available: Condvar::new(),
            shutdown: AtomicBool::new(false),
            capacity: queue_capacity,
        });

        let handles = (0..workers)
            .map(|_| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || Self::worker_loop(shared))
            })
            .collect();

        Self {
            shared,
            workers: handles,
        }
    }

    /// Loop principal de cada worker
    ///
    /// Espera trabajos en la cola y los ejecuta uno a uno. Al apagarse
    /// el pool, el worker drena lo que quede en la cola y termina.
    fn worker_loop(shared: Arc<PoolShared>) {
        loop {
            let job = {
                let mut queue = shared.queue.lock().unwrap();
                loop {
                    if let Some(job) = queue.pop_front() {
                        break job;
                    }
                    if shared.shutdown.load(Ordering::SeqCst) {
                        return;
                    }
                    queue = shared.available.wait(queue).unwrap();
                }
            };

            // Frontera del worker: ni un panic escapa al pool
            let _ = catch_unwind(AssertUnwindSafe(job));
        }
    }

    /// Encola un trabajo
    ///
    /// Retorna Err si la cola está a su capacidad máxima; el que llama
    /// decide qué hacer con el trabajo rechazado.
    pub fn submit(&self, job: Job) -> Result<(), String> {
        let mut queue = self.shared.queue.lock().unwrap();

        if queue.len() >= self.shared.capacity {
            return Err(format!(
                "Queue is full (max capacity: {})",
                self.shared.capacity
            ));
        }

        queue.push_back(job);
        self.shared.available.notify_one();
        Ok(())
    }

    /// Número de trabajos esperando en la cola
    pub fn queued(&self) -> usize {
        self.shared.queue.lock().unwrap().len()
    }

    /// Número de workers del pool
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Apagado ordenado
    ///
    /// Despierta a los workers y les da hasta `grace` para drenar la
    /// cola y terminar. Los workers que no terminen dentro del plazo
    /// quedan abandonados (mueren con el proceso).
    pub fn shutdown(mut self, grace: Duration) {
        self.shared.shutdown.store(true, Ordering::SeqCst);
        self.shared.available.notify_all();

        let deadline = Instant::now() + grace;
        while Instant::now() < deadline {
            if self.workers.iter().all(|h| h.is_finished()) {
                break;
            }
            thread::sleep(Duration::from_millis(50));
        }

        let mut forced = 0;
        for handle in self.workers.drain(..) {
            if handle.is_finished() {
                let _ = handle.join();
            } else {
                forced += 1;
            }
        }

        if forced > 0 {
            eprintln!(
                "⚠️  {} workers no terminaron dentro del periodo de gracia",
                forced
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::mpsc;

    #[test]
    fn test_all_jobs_complete() {
        let pool = ThreadPool::new(4, 100);
        let done = Arc::new(AtomicUsize::new(0));

        for _ in 0..32 {
            let done = Arc::clone(&done);
            pool.submit(Box::new(move || {
                done.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();
        }

        pool.shutdown(Duration::from_secs(5));
        assert_eq!(done.load(Ordering::SeqCst), 32);
    }

    #[test]
    fn test_concurrency_never_exceeds_pool_size() {
        const WORKERS: usize = 4;
        const JOBS: usize = 24;

        let pool = ThreadPool::new(WORKERS, JOBS);
        let active = Arc::new(AtomicUsize::new(0));
        let max_active = Arc::new(AtomicUsize::new(0));
        let done = Arc::new(AtomicUsize::new(0));

        for _ in 0..JOBS {
            let active = Arc::clone(&active);
            let max_active = Arc::clone(&max_active);
            let done = Arc::clone(&done);

            pool.submit(Box::new(move || {
                let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                max_active.fetch_max(now, Ordering::SeqCst);
                thread::sleep(Duration::from_millis(20));
                active.fetch_sub(1, Ordering::SeqCst);
                done.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();
        }

        pool.shutdown(Duration::from_secs(10));

        assert_eq!(done.load(Ordering::SeqCst), JOBS);
        assert!(max_active.load(Ordering::SeqCst) <= WORKERS);
    }

    #[test]
    fn test_queue_full_rejects() {
        // Un solo worker bloqueado: la cola (capacidad 2) se llena
        let pool = ThreadPool::new(1, 2);
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let (started_tx, started_rx) = mpsc::channel::<()>();

        pool.submit(Box::new(move || {
            started_tx.send(()).unwrap();
            release_rx.recv().unwrap();
        }))
        .unwrap();

        // Esperar a que el worker tome el primer trabajo
        started_rx.recv().unwrap();

        pool.submit(Box::new(|| {})).unwrap();
        pool.submit(Box::new(|| {})).unwrap();
        assert_eq!(pool.queued(), 2);

        let result = pool.submit(Box::new(|| {}));
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("full"));

        release_tx.send(()).unwrap();
        pool.shutdown(Duration::from_secs(5));
    }

    #[test]
    fn test_panicking_job_does_not_kill_worker() {
        let pool = ThreadPool::new(1, 10);
        let done = Arc::new(AtomicUsize::new(0));

        pool.submit(Box::new(|| panic!("trabajo roto"))).unwrap();

        let done_clone = Arc::clone(&done);
        pool.submit(Box::new(move || {
            done_clone.fetch_add(1, Ordering::SeqCst);
        }))
        .unwrap();

        pool.shutdown(Duration::from_secs(5));

        // El trabajo posterior al panic se ejecutó en el mismo worker
        assert_eq!(done.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_shutdown_drains_pending_queue() {
        let pool = ThreadPool::new(2, 100);
        let done = Arc::new(AtomicUsize::new(0));

        for _ in 0..20 {
            let done = Arc::clone(&done);
            pool.submit(Box::new(move || {
                thread::sleep(Duration::from_millis(5));
                done.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();
        }

        pool.shutdown(Duration::from_secs(10));
        assert_eq!(done.load(Ordering::SeqCst), 20);
    }

    #[test]
    fn test_worker_count() {
        let pool = ThreadPool::new(7, 10);
        assert_eq!(pool.worker_count(), 7);
        pool.shutdown(Duration::from_secs(1));
    }
}
