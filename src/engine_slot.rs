//! Engine instance behind the exported JNI entry points
//!
//! When Java drives the render thread it calls the `engine*` natives
//! directly. The slot builds the engine on `create` from an installed
//! factory, drops it on `destroy`, and turns every other call into a no-op
//! while no engine is live.

use crate::engine::Engine;
use crate::error::{GlueError, Result};

type Factory<E> = Box<dyn Fn() -> E + Send + Sync>;

pub struct EngineSlot<E: Engine> {
    factory: Option<Factory<E>>,
    engine: Option<E>,
}

impl<E: Engine> EngineSlot<E> {
    pub fn new() -> Self {
        Self {
            factory: None,
            engine: None,
        }
    }

    pub fn install_factory<F>(&mut self, factory: F)
    where
        F: Fn() -> E + Send + Sync + 'static,
    {
        self.factory = Some(Box::new(factory));
    }

    pub fn is_live(&self) -> bool {
        self.engine.is_some()
    }

    pub fn create(
        &mut self,
        surface: E::Surface,
        width: i32,
        height: i32,
        assets: E::Assets,
    ) -> Result<()> {
        if self.engine.is_some() {
            log::warn!("engine create while an engine is live, destroying the old one");
            self.destroy();
        }

        let factory = self.factory.as_ref().ok_or(GlueError::NoEngineFactory)?;
        let mut engine = factory();
        log::info!("engine create {}x{}", width, height);
        engine.create(surface, width, height, assets);
        self.engine = Some(engine);
        Ok(())
    }

    pub fn destroy(&mut self) {
        if let Some(mut engine) = self.engine.take() {
            log::info!("engine destroy");
            engine.destroy();
        }
    }

    /// Run `f` against the live engine, if any.
    pub fn with_engine<F, R>(&mut self, f: F) -> Option<R>
    where
        F: FnOnce(&mut E) -> R,
    {
        self.engine.as_mut().map(f)
    }
}

impl<E: Engine> Default for EngineSlot<E> {
    fn default() -> Self {
        Self::new()
    }
}
