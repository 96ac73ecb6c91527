//! Activity host: forwards activity callbacks to the render surface

use crate::config::GlueConfig;
use crate::engine::Engine;
use crate::error::Result;
use crate::logging;
use crate::surface_view::{RenderSurface, SurfaceHost};
use crate::touch::MotionEvent;
use std::sync::Arc;

pub struct ActivityBase<E: Engine> {
    config: GlueConfig,
    surface_view: Option<RenderSurface<E>>,
}

impl<E: Engine> ActivityBase<E> {
    pub fn new(config: GlueConfig) -> Self {
        Self {
            config,
            surface_view: None,
        }
    }

    pub fn surface_view(&self) -> Option<&RenderSurface<E>> {
        self.surface_view.as_ref()
    }

    /// Build the render surface and start its render thread.
    pub fn on_create<H>(&mut self, host: Arc<H>, engine: E) -> Result<()>
    where
        H: SurfaceHost<Surface = E::Surface, Assets = E::Assets>,
    {
        logging::init(&self.config.log);
        log::info!("onCreate");

        if let Some(mut old) = self.surface_view.take() {
            log::warn!("onCreate with a live surface view, stopping it first");
            old.on_destroy();
            old.join()?;
        }
        self.surface_view = Some(RenderSurface::new(host, engine, &self.config)?);
        Ok(())
    }

    pub fn on_pause(&self) {
        if let Some(view) = &self.surface_view {
            view.on_pause();
        }
    }

    pub fn on_resume(&self) {
        if let Some(view) = &self.surface_view {
            view.on_resume();
        }
    }

    /// Stop the render thread and block until it has exited.
    ///
    /// Blocks the calling (UI) thread for the final drain and
    /// `Engine::destroy`, so the engine never outlives the activity. Hosts
    /// that must not wait call [`RenderSurface::on_destroy`] directly; it
    /// only raises the stop flag.
    pub fn on_destroy(&mut self) -> Result<()> {
        if let Some(mut view) = self.surface_view.take() {
            view.on_destroy();
            view.join()?;
        }
        Ok(())
    }

    pub fn on_key_down(&self, key_code: i32) -> bool {
        self.surface_view
            .as_ref()
            .is_some_and(|view| view.on_key_down(key_code))
    }

    pub fn on_key_up(&self, key_code: i32) -> bool {
        self.surface_view
            .as_ref()
            .is_some_and(|view| view.on_key_up(key_code))
    }

    pub fn on_touch_event(&self, event: &MotionEvent) -> bool {
        self.surface_view
            .as_ref()
            .is_some_and(|view| view.on_touch_event(event))
    }
}

impl<E: Engine> Default for ActivityBase<E> {
    fn default() -> Self {
        Self::new(GlueConfig::default())
    }
}
