//! The native engine ABI
//!
//! The engine lives outside this crate. Everything here only decides *when*
//! these calls happen; the render thread is the only caller.

/// Engine entry points driven by the render thread.
///
/// `Surface` is the window the engine renders into and `Assets` the source
/// it loads packaged resources from. On Android these are
/// [`NativeWindow`](crate::jni::NativeWindow) and
/// [`AssetManager`](crate::jni::AssetManager).
pub trait Engine: Send + 'static {
    type Surface: Send + 'static;
    type Assets: Send + 'static;

    fn create(&mut self, surface: Self::Surface, width: i32, height: i32, assets: Self::Assets);
    fn destroy(&mut self);
    fn surface_resize(&mut self, surface: Self::Surface, width: i32, height: i32);
    fn surface_destroy(&mut self);
    fn pause(&mut self);
    fn resume(&mut self);
    fn draw(&mut self);
    fn key_down(&mut self, code: i32);
    fn key_up(&mut self, code: i32);

    /// Raw touch record, see [`TouchEvent::decode`](crate::touch::TouchEvent::decode).
    fn touch(&mut self, data: &[u8]);
}

impl<E: Engine + ?Sized> Engine for Box<E> {
    type Surface = E::Surface;
    type Assets = E::Assets;

    fn create(&mut self, surface: Self::Surface, width: i32, height: i32, assets: Self::Assets) {
        (**self).create(surface, width, height, assets);
    }

    fn destroy(&mut self) {
        (**self).destroy();
    }

    fn surface_resize(&mut self, surface: Self::Surface, width: i32, height: i32) {
        (**self).surface_resize(surface, width, height);
    }

    fn surface_destroy(&mut self) {
        (**self).surface_destroy();
    }

    fn pause(&mut self) {
        (**self).pause();
    }

    fn resume(&mut self) {
        (**self).resume();
    }

    fn draw(&mut self) {
        (**self).draw();
    }

    fn key_down(&mut self, code: i32) {
        (**self).key_down(code);
    }

    fn key_up(&mut self, code: i32) {
        (**self).key_up(code);
    }

    fn touch(&mut self, data: &[u8]) {
        (**self).touch(data);
    }
}
