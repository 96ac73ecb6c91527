//! Render surface: the view that owns the render thread
//!
//! Every lifecycle and input callback arrives on the UI thread and is turned
//! into a queued action, so the engine only ever sees calls from the render
//! thread, interleaved with its draws.

use crate::config::{GlueConfig, PixelFormat};
use crate::engine::Engine;
use crate::error::RenderError;
use crate::render_thread::{RenderContext, RenderFlags, RenderQueue, RenderState, RenderThread};
use crate::touch::{MotionEvent, TouchEvent};
use std::sync::Arc;

/// Source of the current surface, its frame and the asset manager
pub trait SurfaceHost: Send + Sync + 'static {
    type Surface;
    type Assets;

    fn surface(&self) -> Self::Surface;
    fn surface_frame(&self) -> (i32, i32);
    fn assets(&self) -> Self::Assets;
}

type DynHost<E> = dyn SurfaceHost<Surface = <E as Engine>::Surface, Assets = <E as Engine>::Assets>;

pub struct RenderSurface<E: Engine> {
    host: Arc<DynHost<E>>,
    queue: Arc<RenderQueue<E>>,
    thread: RenderThread,
    pixel_format: PixelFormat,
}

impl<E: Engine> RenderSurface<E> {
    pub fn new<H>(host: Arc<H>, engine: E, config: &GlueConfig) -> Result<Self, RenderError>
    where
        H: SurfaceHost<Surface = E::Surface, Assets = E::Assets>,
    {
        let queue = Arc::new(RenderQueue::new());
        let flags = Arc::new(RenderFlags::new());
        let thread =
            RenderThread::spawn(&config.render_thread_name, engine, Arc::clone(&queue), flags)?;

        Ok(Self {
            host,
            queue,
            thread,
            pixel_format: config.pixel_format,
        })
    }

    /// Format the host should request for the surface
    pub fn pixel_format(&self) -> PixelFormat {
        self.pixel_format
    }

    pub fn state(&self) -> RenderState {
        self.thread.state()
    }

    pub fn is_paused(&self) -> bool {
        self.thread.flags().is_paused()
    }

    /// Run `action` on the render thread before its next draw. Returns
    /// `false` once the render thread has stopped; the action is dropped.
    pub fn queue_event<F>(&self, action: F) -> bool
    where
        F: FnOnce(&mut RenderContext<E>) + Send + 'static,
    {
        self.queue.submit(action)
    }

    /// Actions waiting for the next drain
    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    pub fn surface_created(&self) {
        log::info!("surfaceCreated");
    }

    pub fn surface_changed(&self, format: i32, width: i32, height: i32) {
        log::info!("surfaceChanged format={} {}x{}", format, width, height);

        let host = Arc::clone(&self.host);
        self.queue_event(move |ctx| {
            let (width, height) = host.surface_frame();
            ctx.create_or_resize(host.surface(), width, height, || host.assets());
        });
    }

    pub fn surface_destroyed(&self) {
        log::info!("surfaceDestroyed");
        self.queue_event(|ctx| ctx.surface_destroy());
    }

    pub fn on_pause(&self) {
        log::info!("onPause");
        self.queue_event(|ctx| ctx.pause());
    }

    pub fn on_resume(&self) {
        log::info!("onResume");
        self.queue_event(|ctx| ctx.resume());
    }

    /// Ask the render thread to stop. It destroys the engine on its way out.
    pub fn on_destroy(&self) {
        log::info!("onDestroy");
        self.thread.request_stop();
    }

    /// Wait for the render thread after [`on_destroy`](Self::on_destroy).
    pub fn join(&mut self) -> Result<(), RenderError> {
        self.thread.join()
    }

    /// Always `false`: the host keeps its default key handling.
    pub fn on_key_down(&self, key_code: i32) -> bool {
        log::debug!("onKeyDown {}", key_code);
        self.queue_event(move |ctx| ctx.key_down(key_code));
        false
    }

    pub fn on_key_up(&self, key_code: i32) -> bool {
        log::debug!("onKeyUp {}", key_code);
        self.queue_event(move |ctx| ctx.key_up(key_code));
        false
    }

    /// Serializes on the render thread; a malformed event is logged and dropped.
    pub fn on_touch_event(&self, event: &MotionEvent) -> bool {
        log::debug!("onTouchEvent action={:#x}", event.action);

        let event = event.clone();
        self.queue_event(move |ctx| {
            match TouchEvent::from_motion(&event).and_then(|touch| touch.encode()) {
                Ok(data) => ctx.touch(&data),
                Err(e) => log::error!("dropping touch event: {}", e),
            }
        });
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{wait_until, Call, MockEngine, MockHost};
    use crate::touch::Pointer;

    fn surface(host: &Arc<MockHost>) -> (RenderSurface<MockEngine>, crate::test_support::CallLog) {
        let engine = MockEngine::new();
        let calls = engine.calls();
        let view = RenderSurface::new(Arc::clone(host), engine, &GlueConfig::default()).unwrap();
        (view, calls)
    }

    fn stop(mut view: RenderSurface<MockEngine>) {
        view.on_destroy();
        view.join().unwrap();
        assert_eq!(view.state(), RenderState::Stopped);
    }

    #[test]
    fn surface_changed_creates_then_resizes() {
        let host = MockHost::new(1, 1080, 1920);
        let (view, calls) = surface(&host);

        view.surface_created();
        view.surface_changed(3, 1080, 1920);
        assert!(wait_until(|| calls.count(&Call::Draw) > 0));

        host.set(2, 1920, 1080);
        view.surface_changed(3, 1920, 1080);
        assert!(wait_until(|| calls.count(&Call::Resize { surface: 2, width: 1920, height: 1080 }) == 1));

        stop(view);
        assert_eq!(
            calls.without_draws(),
            vec![
                Call::Create { surface: 1, width: 1080, height: 1920 },
                Call::Resize { surface: 2, width: 1920, height: 1080 },
                Call::Destroy,
            ]
        );
    }

    #[test]
    fn forwarding_before_create_is_dropped() {
        let host = MockHost::new(1, 10, 10);
        let (view, calls) = surface(&host);

        view.on_key_down(4);
        view.surface_destroyed();
        view.on_pause();
        view.on_resume();
        view.on_touch_event(&MotionEvent::new(0, 1, vec![Pointer { id: 0, x: 1.0, y: 1.0 }]));

        let (tx, rx) = std::sync::mpsc::channel();
        view.queue_event(move |_| tx.send(()).unwrap());
        rx.recv().unwrap();

        stop(view);
        assert!(calls.snapshot().is_empty());
    }

    #[test]
    fn input_is_forwarded_in_order() {
        let host = MockHost::new(1, 10, 10);
        let (view, calls) = surface(&host);
        view.surface_changed(3, 10, 10);

        let touch = MotionEvent::new(0, 42, vec![Pointer { id: 3, x: 5.0, y: 6.0 }]);
        assert!(!view.on_key_down(24));
        assert!(!view.on_touch_event(&touch));
        assert!(!view.on_key_up(24));
        assert!(wait_until(|| calls.count(&Call::KeyUp(24)) == 1));

        stop(view);

        let expected_bytes = TouchEvent::from_motion(&touch).unwrap().encode().unwrap();
        assert_eq!(expected_bytes.len(), 28);
        assert_eq!(
            calls.without_draws(),
            vec![
                Call::Create { surface: 1, width: 10, height: 10 },
                Call::KeyDown(24),
                Call::Touch(expected_bytes),
                Call::KeyUp(24),
                Call::Destroy,
            ]
        );
    }

    #[test]
    fn bad_touch_event_is_dropped_and_loop_continues() {
        let host = MockHost::new(1, 10, 10);
        let (view, calls) = surface(&host);
        view.surface_changed(3, 10, 10);

        // pointer index 2 with a single pointer
        view.on_touch_event(&MotionEvent::new(5 | (2 << 8), 0, vec![Pointer { id: 0, x: 0.0, y: 0.0 }]));
        view.on_key_down(7);
        assert!(wait_until(|| calls.count(&Call::KeyDown(7)) == 1));

        stop(view);
        assert!(calls
            .snapshot()
            .iter()
            .all(|c| !matches!(c, Call::Touch(_))));
    }

    #[test]
    fn pause_and_resume_reach_engine() {
        let host = MockHost::new(1, 10, 10);
        let (view, calls) = surface(&host);
        view.surface_changed(3, 10, 10);

        view.on_pause();
        assert!(wait_until(|| view.is_paused()));
        view.on_resume();
        assert!(wait_until(|| !view.is_paused() && calls.count(&Call::Resume) == 1));

        view.surface_destroyed();
        assert!(wait_until(|| calls.count(&Call::SurfaceDestroy) == 1));

        stop(view);
        assert_eq!(
            calls.without_draws(),
            vec![
                Call::Create { surface: 1, width: 10, height: 10 },
                Call::Pause,
                Call::Resume,
                Call::SurfaceDestroy,
                Call::Destroy,
            ]
        );
    }

    #[test]
    fn engine_fault_stops_thread_and_rejects_input() {
        let host = MockHost::new(1, 10, 10);
        let (mut view, calls) = surface(&host);
        view.surface_changed(3, 10, 10);
        assert!(wait_until(|| calls.count(&Call::Draw) > 0));

        view.queue_event(|_| panic!("engine fault"));
        assert!(wait_until(|| view.state() == RenderState::Stopped));

        for _ in 0..1000 {
            view.on_key_down(4);
        }
        assert_eq!(view.pending_events(), 0);
        assert_eq!(calls.count(&Call::KeyDown(4)), 0);
        assert_eq!(calls.count(&Call::Destroy), 1);
        assert!(matches!(view.join(), Err(RenderError::Panicked(_))));
    }

    #[test]
    fn dropping_the_view_stops_the_thread() {
        let host = MockHost::new(1, 10, 10);
        let (view, calls) = surface(&host);
        view.surface_changed(3, 10, 10);
        assert!(wait_until(|| calls.count(&Call::Draw) > 0));

        drop(view);
        assert_eq!(calls.count(&Call::Destroy), 1);
    }
}
