use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Flags raised by signal handlers and polled by the run loop.
#[derive(Debug, Default, Clone)]
pub struct SignalFlags {
    stop: Arc<AtomicBool>,
    save: Arc<AtomicBool>,
}

impl SignalFlags {
    /// SIGINT and SIGTERM request a snapshot followed by exit;
    /// SIGUSR1 requests a snapshot and execution continues.
    pub fn install() -> io::Result<Self> {
        use signal_hook::consts::{SIGINT, SIGTERM};
        use signal_hook::flag;

        let flags = Self::default();
        flag::register(SIGINT, Arc::clone(&flags.stop))?;
        flag::register(SIGTERM, Arc::clone(&flags.stop))?;
        #[cfg(unix)]
        flag::register(signal_hook::consts::SIGUSR1, Arc::clone(&flags.save))?;
        Ok(flags)
    }

    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    pub fn request_save(&self) {
        self.save.store(true, Ordering::SeqCst);
    }

    pub fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    /// Returns true once per save request.
    pub fn take_save_request(&self) -> bool {
        self.save.swap(false, Ordering::SeqCst)
    }
}
