//! Fixed-interval tick scheduling driven by the UI frame clock.

/// Shortest accepted tick interval in seconds.
pub const MIN_INTERVAL: f64 = 0.001;
/// Longest accepted tick interval in seconds.
pub const MAX_INTERVAL: f64 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq)]
enum TickState {
    Stopped,
    /// `last` is `None` until the first tick after a start.
    Running { last: Option<f64> },
}

/// Decides on which frames the simulation should advance.
///
/// The ticker never advances anything itself: the viewer calls
/// [`Ticker::poll`] once per frame with the current frame time and steps
/// the simulation when it returns `true`. At most one tick is reported per
/// poll, so slow frames never cause catch-up bursts.
///
/// Stopping cancels the pending tick. Both [`Ticker::start`] and
/// [`Ticker::stop`] are idempotent.
#[derive(Clone, Debug)]
pub struct Ticker {
    interval: f64,
    state: TickState,
    last_dt: f64,
}

impl Ticker {
    /// Creates a stopped ticker. `interval` is clamped to
    /// [`MIN_INTERVAL`]..=[`MAX_INTERVAL`].
    pub fn new(interval: f64) -> Self {
        Self {
            interval: clamp_interval(interval),
            state: TickState::Stopped,
            last_dt: 0.0,
        }
    }

    /// Seconds between ticks.
    pub fn interval(&self) -> f64 {
        self.interval
    }

    /// Changes the interval, clamped like [`Ticker::new`].
    pub fn set_interval(&mut self, interval: f64) {
        self.interval = clamp_interval(interval);
    }

    /// Time between the last two reported ticks, in seconds.
    pub fn last_dt(&self) -> f64 {
        self.last_dt
    }

    /// `true` between [`Ticker::start`] and [`Ticker::stop`].
    pub fn is_running(&self) -> bool {
        matches!(self.state, TickState::Running { .. })
    }

    /// Starts ticking; the first poll afterwards is due immediately.
    ///
    /// ### Returns
    /// `true` if the ticker was stopped before this call.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        self.state = TickState::Running { last: None };
        true
    }

    /// Stops ticking and cancels any pending tick.
    ///
    /// ### Returns
    /// `true` if the ticker was running before this call.
    pub fn stop(&mut self) -> bool {
        let was_running = self.is_running();
        self.state = TickState::Stopped;
        was_running
    }

    /// Reports whether a tick is due at frame time `now` (seconds).
    ///
    /// A due tick is consumed: the next one is due `interval` seconds later.
    pub fn poll(&mut self, now: f64) -> bool {
        let TickState::Running { last } = &mut self.state else {
            return false;
        };

        let prev = *last;
        match prev {
            None => {
                *last = Some(now);
                true
            }
            Some(prev) if now - prev >= self.interval => {
                self.last_dt = now - prev;
                *last = Some(now);
                true
            }
            Some(_) => false,
        }
    }
}

fn clamp_interval(interval: f64) -> f64 {
    if interval.is_nan() {
        MIN_INTERVAL
    } else {
        interval.clamp(MIN_INTERVAL, MAX_INTERVAL)
    }
}
