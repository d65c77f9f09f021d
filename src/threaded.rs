//! Scene driven from its own OS thread.
//!
//! The tick thread is the only writer; renderers take read locks. Dropping
//! the [`TickThread`] stops and joins the thread, so no tick lands after it.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::geometry::Bounds;
use crate::rng::RandomSource;
use crate::scene::Scene;

/// Scene behind a single-writer lock.
#[derive(Clone, Debug)]
pub struct SharedScene {
    inner: Arc<RwLock<Scene>>,
}

impl SharedScene {
    pub fn new(scene: Scene) -> Self {
        Self {
            inner: Arc::new(RwLock::new(scene)),
        }
    }

    /// Read access for rendering. A poisoned lock still yields the last state.
    pub fn read(&self) -> RwLockReadGuard<'_, Scene> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn set_bounds(&self, bounds: Bounds) {
        self.write(|scene| scene.set_bounds(bounds));
    }

    fn write<T>(&self, f: impl FnOnce(&mut Scene) -> T) -> T {
        let mut guard = self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }
}

/// Handle to a running tick thread.
pub struct TickThread {
    stop: Arc<AtomicBool>,
    ticks: Arc<AtomicU64>,
    handle: Option<JoinHandle<()>>,
}

impl TickThread {
    /// Ticks `scene` every `period`, starting one period from now.
    pub fn spawn<R>(scene: SharedScene, mut rng: R, period: Duration) -> std::io::Result<Self>
    where
        R: RandomSource + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let ticks = Arc::new(AtomicU64::new(0));

        let handle = thread::Builder::new().name("starfall-tick".into()).spawn({
            let stop = Arc::clone(&stop);
            let ticks = Arc::clone(&ticks);
            move || {
                let mut next = Instant::now() + period;
                while !stop.load(Ordering::Acquire) {
                    let now = Instant::now();
                    if now < next {
                        thread::park_timeout(next - now);
                        continue;
                    }
                    scene.write(|s| s.tick(&mut rng));
                    ticks.fetch_add(1, Ordering::Release);
                    next += period;
                    if next < now {
                        next = now + period;
                    }
                }
                tracing::debug!("tick thread exiting");
            }
        })?;

        tracing::info!(period_ms = period.as_millis() as u64, "tick thread started");
        Ok(Self {
            stop,
            ticks,
            handle: Some(handle),
        })
    }

    /// Ticks performed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Acquire)
    }

    /// Stops and joins now.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        self.stop.store(true, Ordering::Release);
        handle.thread().unpark();
        if handle.join().is_err() {
            tracing::error!("tick thread panicked");
        }
    }
}

impl Drop for TickThread {
    fn drop(&mut self) {
        self.shutdown();
    }
}
