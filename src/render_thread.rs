//! Dedicated render thread
//!
//! The thread owns the engine. Every engine call goes through the action
//! queue or the draw at the end of an iteration, so nothing else ever
//! touches the engine concurrently.

use crate::action_queue::ActionQueue;
use crate::engine::Engine;
use crate::error::RenderError;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum RenderState {
    NotStarted = 0,
    Running = 1,
    Stopping = 2,
    Stopped = 3,
}

impl From<u8> for RenderState {
    fn from(value: u8) -> Self {
        match value {
            1 => RenderState::Running,
            2 => RenderState::Stopping,
            3 => RenderState::Stopped,
            _ => RenderState::NotStarted,
        }
    }
}

/// Flags shared between the UI thread and the render thread.
/// Each flag has a single writer.
#[derive(Debug)]
pub struct RenderFlags {
    stop: AtomicBool,
    paused: AtomicBool,
    state: AtomicU8,
}

impl RenderFlags {
    pub fn new() -> Self {
        Self {
            stop: AtomicBool::new(false),
            paused: AtomicBool::new(false),
            state: AtomicU8::new(RenderState::NotStarted as u8),
        }
    }

    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Release);
        let _ = self.state.compare_exchange(
            RenderState::Running as u8,
            RenderState::Stopping as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }

    pub fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    pub fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::Release);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    pub fn state(&self) -> RenderState {
        RenderState::from(self.state.load(Ordering::Acquire))
    }

    fn set_state(&self, state: RenderState) {
        self.state.store(state as u8, Ordering::Release);
    }
}

impl Default for RenderFlags {
    fn default() -> Self {
        Self::new()
    }
}

/// Render-thread side state handed to every queued action.
///
/// All forwarding helpers are no-ops until the engine has been created.
pub struct RenderContext<E: Engine> {
    engine: E,
    created: bool,
    flags: Arc<RenderFlags>,
}

impl<E: Engine> RenderContext<E> {
    pub fn new(engine: E, flags: Arc<RenderFlags>) -> Self {
        Self {
            engine,
            created: false,
            flags,
        }
    }

    pub fn is_created(&self) -> bool {
        self.created
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn flags(&self) -> &RenderFlags {
        &self.flags
    }

    /// Create the engine on the first surface, resize it afterwards.
    pub fn create_or_resize<A>(&mut self, surface: E::Surface, width: i32, height: i32, assets: A)
    where
        A: FnOnce() -> E::Assets,
    {
        if self.created {
            log::info!("engine surface resize {}x{}", width, height);
            self.engine.surface_resize(surface, width, height);
        } else {
            log::info!("engine create {}x{}", width, height);
            self.created = true;
            self.engine.create(surface, width, height, assets());
        }
    }

    pub fn surface_destroy(&mut self) {
        if self.created {
            self.engine.surface_destroy();
        }
    }

    pub fn pause(&mut self) {
        self.flags.set_paused(true);
        if self.created {
            self.engine.pause();
        }
    }

    pub fn resume(&mut self) {
        self.flags.set_paused(false);
        if self.created {
            self.engine.resume();
        }
    }

    pub fn key_down(&mut self, code: i32) {
        if self.created {
            self.engine.key_down(code);
        }
    }

    pub fn key_up(&mut self, code: i32) {
        if self.created {
            self.engine.key_up(code);
        }
    }

    pub fn touch(&mut self, data: &[u8]) {
        if self.created {
            self.engine.touch(data);
        }
    }

    /// Draw one frame unless paused or not yet created. Returns whether a
    /// frame was drawn.
    pub fn draw(&mut self) -> bool {
        if self.flags.is_paused() || !self.created {
            return false;
        }
        self.engine.draw();
        true
    }

    fn shutdown(&mut self) {
        if self.created {
            self.created = false;
            log::info!("engine destroy");
            self.engine.destroy();
        }
    }
}

pub type RenderQueue<E> = ActionQueue<RenderContext<E>>;

/// Handle to the running render thread
pub struct RenderThread {
    handle: Option<JoinHandle<()>>,
    flags: Arc<RenderFlags>,
}

impl RenderThread {
    pub fn spawn<E: Engine>(
        name: &str,
        engine: E,
        queue: Arc<RenderQueue<E>>,
        flags: Arc<RenderFlags>,
    ) -> Result<Self, RenderError> {
        let ctx = RenderContext::new(engine, Arc::clone(&flags));
        flags.set_state(RenderState::Running);

        let handle = thread::Builder::new()
            .name(name.to_owned())
            .spawn(move || run(ctx, queue))
            .inspect_err(|_| flags.set_state(RenderState::NotStarted))?;

        log::info!("render thread {} started", name);
        Ok(Self {
            handle: Some(handle),
            flags,
        })
    }

    pub fn flags(&self) -> &Arc<RenderFlags> {
        &self.flags
    }

    pub fn state(&self) -> RenderState {
        self.flags.state()
    }

    pub fn request_stop(&self) {
        self.flags.request_stop();
    }

    /// Wait for the thread to exit. Does not request a stop on its own.
    pub fn join(&mut self) -> Result<(), RenderError> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };

        handle.join().map_err(|payload| {
            self.flags.set_state(RenderState::Stopped);
            let message = panic_message(payload.as_ref());
            log::error!("render thread panicked: {}", message);
            RenderError::Panicked(message)
        })
    }
}

impl Drop for RenderThread {
    fn drop(&mut self) {
        self.request_stop();
        let _ = self.join();
    }
}

fn run<E: Engine>(mut ctx: RenderContext<E>, queue: Arc<RenderQueue<E>>) {
    let flags = Arc::clone(&ctx.flags);
    let _stopped = PublishStopped(Arc::clone(&flags));

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        while !flags.stop_requested() {
            queue.drain(&mut ctx);
            if !ctx.draw() {
                thread::yield_now();
            }
        }
    }));

    queue.close();
    ctx.shutdown();

    match outcome {
        Ok(()) => log::info!("render thread stopped"),
        Err(payload) => {
            log::error!(
                "render thread aborted: {}",
                panic_message(payload.as_ref())
            );
            panic::resume_unwind(payload);
        }
    }
}

/// Publishes `Stopped` however the render loop exits.
struct PublishStopped(Arc<RenderFlags>);

impl Drop for PublishStopped {
    fn drop(&mut self) {
        self.0.set_state(RenderState::Stopped);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_owned()
    }
}
