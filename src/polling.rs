use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use log::{debug, info};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Delivery gate shared by all fetches of one polling run.
///
/// Deliveries run while holding the lock, so `close` returns only after any
/// delivery in progress has finished, and none start afterwards.
struct TickGate {
    open: Mutex<bool>,
}

impl TickGate {
    fn new() -> Self {
        Self { open: Mutex::new(true) }
    }

    fn is_open(&self) -> bool {
        *self.open.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn run_if_open(&self, deliver: impl FnOnce()) -> bool {
        let open = self.open.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if *open {
            deliver();
        }
        *open
    }

    fn close(&self) {
        *self.open.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = false;
    }
}

struct ActiveRun {
    generation: u64,
    gate: Arc<TickGate>,
    ticker: JoinHandle<()>,
}

enum LoopState {
    Idle,
    Polling(ActiveRun),
}

/// Fixed-interval fetch scheduler with synchronous cancellation.
///
/// Every tick spawns its fetch as a separate task, so a slow fetch never
/// delays the next tick. Overlapping fetches deliver in completion order.
pub struct PollingLoop {
    period: Duration,
    state: LoopState,
    last_generation: u64,
}

impl PollingLoop {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            state: LoopState::Idle,
            last_generation: 0,
        }
    }

    pub fn is_polling(&self) -> bool {
        matches!(self.state, LoopState::Polling(_))
    }

    /// Generation of the running loop, `None` while idle.
    pub fn generation(&self) -> Option<u64> {
        match &self.state {
            LoopState::Polling(run) => Some(run.generation),
            LoopState::Idle => None,
        }
    }

    /// Starts ticking on `runtime`. `deliver` receives each fetch result with the
    /// run's generation. Already polling: returns the current generation unchanged.
    pub fn start<F, Fut, T, D>(&mut self, runtime: &Handle, fetch: F, deliver: D) -> u64
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
        D: Fn(u64, T) + Send + Sync + 'static,
    {
        if let LoopState::Polling(run) = &self.state {
            debug!("Polling loop already running (generation {})", run.generation);
            return run.generation;
        }

        self.last_generation += 1;
        let generation = self.last_generation;
        let period = self.period;
        let gate = Arc::new(TickGate::new());
        let deliver = Arc::new(deliver);

        let ticker_gate = Arc::clone(&gate);
        let ticker = runtime.spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                interval.tick().await;
                if !ticker_gate.is_open() {
                    break;
                }

                let pending = fetch();
                let gate = Arc::clone(&ticker_gate);
                let deliver = Arc::clone(&deliver);
                tokio::spawn(async move {
                    let output = pending.await;
                    if !gate.run_if_open(|| deliver(generation, output)) {
                        debug!("Dropped tick result of stopped generation {}", generation);
                    }
                });
            }
        });

        info!("Polling started every {}ms (generation {})", period.as_millis(), generation);
        self.state = LoopState::Polling(ActiveRun { generation, gate, ticker });
        generation
    }

    /// Stops ticking. No delivery happens after this returns. Idempotent.
    pub fn stop(&mut self) {
        if let LoopState::Polling(run) = std::mem::replace(&mut self.state, LoopState::Idle) {
            run.gate.close();
            run.ticker.abort();
            info!("Polling stopped (generation {})", run.generation);
        }
    }
}

impl Drop for PollingLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use tokio::runtime::Runtime;

    fn counting_loop(runtime: &Runtime, polling: &mut PollingLoop, fetch_delay: Duration) -> Arc<AtomicUsize> {
        let delivered = Arc::new(AtomicUsize::new(0));
        let sink = Arc::clone(&delivered);
        polling.start(
            runtime.handle(),
            move || async move {
                tokio::time::sleep(fetch_delay).await;
            },
            move |_, ()| {
                sink.fetch_add(1, Ordering::SeqCst);
            },
        );
        delivered
    }

    #[test]
    fn ticks_until_stopped_then_never_again() {
        let runtime = Runtime::new().unwrap();
        let mut polling = PollingLoop::new(Duration::from_millis(20));
        let delivered = counting_loop(&runtime, &mut polling, Duration::from_millis(1));

        thread::sleep(Duration::from_millis(250));
        polling.stop();
        let after_stop = delivered.load(Ordering::SeqCst);
        assert!(after_stop >= 2, "only {} ticks delivered", after_stop);

        thread::sleep(Duration::from_millis(200));
        assert_eq!(delivered.load(Ordering::SeqCst), after_stop);
        assert!(!polling.is_polling());
    }

    #[test]
    fn slow_fetches_in_flight_at_stop_are_discarded() {
        let runtime = Runtime::new().unwrap();
        let mut polling = PollingLoop::new(Duration::from_millis(10));
        let delivered = counting_loop(&runtime, &mut polling, Duration::from_millis(80));

        thread::sleep(Duration::from_millis(150));
        polling.stop();
        let after_stop = delivered.load(Ordering::SeqCst);

        thread::sleep(Duration::from_millis(200));
        assert_eq!(delivered.load(Ordering::SeqCst), after_stop);
    }

    #[test]
    fn first_tick_waits_one_period() {
        let runtime = Runtime::new().unwrap();
        let mut polling = PollingLoop::new(Duration::from_millis(300));
        let delivered = counting_loop(&runtime, &mut polling, Duration::ZERO);

        thread::sleep(Duration::from_millis(50));
        assert_eq!(delivered.load(Ordering::SeqCst), 0);
        polling.stop();
    }

    #[test]
    fn restart_bumps_generation_and_double_start_does_not() {
        let runtime = Runtime::new().unwrap();
        let mut polling = PollingLoop::new(Duration::from_millis(50));
        assert_eq!(polling.generation(), None);

        let first = polling.start(runtime.handle(), || async {}, |_, ()| {});
        let again = polling.start(runtime.handle(), || async {}, |_, ()| {});
        assert_eq!(first, again);

        polling.stop();
        polling.stop();
        assert_eq!(polling.generation(), None);

        let second = polling.start(runtime.handle(), || async {}, |_, ()| {});
        assert_eq!(second, first + 1);
        assert_eq!(polling.generation(), Some(second));
    }

    #[test]
    fn delivery_carries_generation() {
        let runtime = Runtime::new().unwrap();
        let mut polling = PollingLoop::new(Duration::from_millis(10));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let generation = polling.start(
            runtime.handle(),
            || async { 5u32 },
            move |generation, value| sink.lock().unwrap().push((generation, value)),
        );

        thread::sleep(Duration::from_millis(100));
        polling.stop();

        let seen = seen.lock().unwrap();
        assert!(!seen.is_empty());
        assert!(seen.iter().all(|&(g, v)| g == generation && v == 5));
    }
}
