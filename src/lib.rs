//! Android platform glue for the Viry3D engine
//!
//! Hosts the engine on a dedicated render thread behind an action queue:
//! - [`activity::ActivityBase`] receives activity lifecycle and input callbacks
//! - [`surface_view::RenderSurface`] turns them into queued actions
//! - [`render_thread::RenderThread`] drains the queue and draws, one frame per loop
//! - [`touch`] flattens motion events into the record the engine reads
//!
//! On Android the `jni` module also exports the natives of
//! `com.viry3d.lib.JNI` for hosts whose render thread lives in Java.

pub mod action_queue;
pub mod activity;
pub mod config;
pub mod context_slot;
pub mod engine;
pub mod engine_slot;
pub mod error;
pub mod logging;
pub mod render_thread;
pub mod surface_view;
pub mod touch;

#[cfg(target_os = "android")]
pub mod jni;

#[cfg(test)]
mod test_support;

pub use action_queue::ActionQueue;
pub use activity::ActivityBase;
pub use config::{GlueConfig, LogConfig, PixelFormat};
pub use context_slot::ContextSlot;
pub use engine::Engine;
pub use engine_slot::EngineSlot;
pub use error::{GlueError, RenderError, Result, TouchError};
pub use render_thread::{RenderContext, RenderFlags, RenderState, RenderThread};
pub use surface_view::{RenderSurface, SurfaceHost};
pub use touch::{MotionEvent, Pointer, TouchAction, TouchEvent};
