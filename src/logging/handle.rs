use std::sync::atomic::{AtomicBool, Ordering};

use tracing_appender::non_blocking::WorkerGuard;

/// Handle для управления lifecycle логирования.
///
/// Держит guard файлового appender'а: пока handle жив, фоновый поток пишет
/// буферизованные события на диск.
pub struct LoggingHandle {
    file_guard: Option<WorkerGuard>,
    shutdown_in_progress: AtomicBool,
}

impl LoggingHandle {
    pub fn new(file_guard: Option<WorkerGuard>) -> Self {
        Self {
            file_guard,
            shutdown_in_progress: AtomicBool::new(false),
        }
    }

    /// Есть ли активный файловый sink.
    pub fn has_file_sink(&self) -> bool {
        self.file_guard.is_some()
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutdown_in_progress.load(Ordering::Acquire)
    }

    /// Сбрасывает буферы и освобождает guard.
    pub fn shutdown(mut self) {
        self.shutdown_in_progress.store(true, Ordering::Release);
        tracing::info!(
            file_sink = self.file_guard.is_some(),
            "Logging shutdown"
        );

        let start = std::time::Instant::now();
        drop(self.file_guard.take());
        tracing::debug!(
            flush_ms = start.elapsed().as_millis() as u64,
            "Logging flushed"
        );
    }
}

impl std::fmt::Debug for LoggingHandle {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("LoggingHandle")
            .field("file_sink", &self.file_guard.is_some())
            .field("shutdown_in_progress", &self.is_shutting_down())
            .finish()
    }
}
