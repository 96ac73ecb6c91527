//! Recording engine and surface host for unit tests

use crate::engine::Engine;
use crate::surface_view::SurfaceHost;
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Create { surface: u32, width: i32, height: i32 },
    Destroy,
    Resize { surface: u32, width: i32, height: i32 },
    SurfaceDestroy,
    Pause,
    Resume,
    Draw,
    KeyDown(i32),
    KeyUp(i32),
    Touch(Vec<u8>),
}

#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    pub fn push(&self, call: Call) {
        self.0.lock().push(call);
    }

    pub fn snapshot(&self) -> Vec<Call> {
        self.0.lock().clone()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.0.lock().iter().filter(|c| *c == call).count()
    }

    /// Calls other than draws, in order
    pub fn without_draws(&self) -> Vec<Call> {
        self.0
            .lock()
            .iter()
            .filter(|c| **c != Call::Draw)
            .cloned()
            .collect()
    }
}

pub struct MockEngine {
    calls: CallLog,
}

impl MockEngine {
    pub fn new() -> Self {
        Self {
            calls: CallLog::default(),
        }
    }

    pub fn with_log(calls: CallLog) -> Self {
        Self { calls }
    }

    pub fn calls(&self) -> CallLog {
        self.calls.clone()
    }
}

impl Engine for MockEngine {
    type Surface = u32;
    type Assets = ();

    fn create(&mut self, surface: u32, width: i32, height: i32, _assets: ()) {
        self.calls.push(Call::Create { surface, width, height });
    }

    fn destroy(&mut self) {
        self.calls.push(Call::Destroy);
    }

    fn surface_resize(&mut self, surface: u32, width: i32, height: i32) {
        self.calls.push(Call::Resize { surface, width, height });
    }

    fn surface_destroy(&mut self) {
        self.calls.push(Call::SurfaceDestroy);
    }

    fn pause(&mut self) {
        self.calls.push(Call::Pause);
    }

    fn resume(&mut self) {
        self.calls.push(Call::Resume);
    }

    fn draw(&mut self) {
        self.calls.push(Call::Draw);
        // keep the log from growing too fast
        thread::sleep(Duration::from_micros(200));
    }

    fn key_down(&mut self, code: i32) {
        self.calls.push(Call::KeyDown(code));
    }

    fn key_up(&mut self, code: i32) {
        self.calls.push(Call::KeyUp(code));
    }

    fn touch(&mut self, data: &[u8]) {
        self.calls.push(Call::Touch(data.to_vec()));
    }
}

/// Surface holder stand-in with a settable surface and frame
pub struct MockHost {
    state: Mutex<(u32, i32, i32)>,
}

impl MockHost {
    pub fn new(surface: u32, width: i32, height: i32) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new((surface, width, height)),
        })
    }

    pub fn set(&self, surface: u32, width: i32, height: i32) {
        *self.state.lock() = (surface, width, height);
    }
}

impl SurfaceHost for MockHost {
    type Surface = u32;
    type Assets = ();

    fn surface(&self) -> u32 {
        self.state.lock().0
    }

    fn surface_frame(&self) -> (i32, i32) {
        let state = self.state.lock();
        (state.1, state.2)
    }

    fn assets(&self) {}
}

/// Poll `cond` for up to five seconds.
pub fn wait_until<F: FnMut() -> bool>(mut cond: F) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(1));
    }
    cond()
}
