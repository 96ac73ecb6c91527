//! JNI façade for `com.viry3d.lib.JNI`
//!
//! Two directions:
//! - [`JniFacade`] calls *into* the hosting activity (paths, finish, screen-on).
//!   `engineCreate` publishes it and engines fetch it with [`facade`].
//! - the exported `Java_com_viry3d_lib_JNI_engine*` natives are called *from*
//!   Java's render thread and forward into the process-global engine slot.

#![allow(non_snake_case)]

use crate::config::LogConfig;
use crate::context_slot::ContextSlot;
use crate::engine::Engine;
use crate::engine_slot::EngineSlot;
use crate::error::Result;
use crate::logging;

use jni::objects::{GlobalRef, JByteArray, JObject, JString, JValue};
use jni::sys::jint;
use jni::{AttachGuard, JNIEnv, JavaVM};
use once_cell::sync::{Lazy, OnceCell};
use parking_lot::Mutex;
use std::ptr::NonNull;
use std::sync::Arc;

// ============================================================================
// Native handles
// ============================================================================

/// Owned `ANativeWindow` reference, released on drop
#[derive(Debug)]
pub struct NativeWindow(NonNull<ndk_sys::ANativeWindow>);

// ANativeWindow is reference counted and usable from any thread.
unsafe impl Send for NativeWindow {}

impl NativeWindow {
    /// Acquire the window backing a `android.view.Surface`.
    pub fn from_surface(env: &JNIEnv, surface: &JObject) -> Option<Self> {
        NonNull::new(unsafe {
            ndk_sys::ANativeWindow_fromSurface(env.get_raw().cast(), surface.as_raw().cast())
        })
        .map(NativeWindow)
    }

    pub fn as_ptr(&self) -> *mut ndk_sys::ANativeWindow {
        self.0.as_ptr()
    }
}

impl Drop for NativeWindow {
    fn drop(&mut self) {
        unsafe {
            ndk_sys::ANativeWindow_release(self.0.as_ptr());
        }
    }
}

/// `AAssetManager` plus a global reference keeping its Java owner alive
#[derive(Debug)]
pub struct AssetManager {
    raw: NonNull<ndk_sys::AAssetManager>,
    _java: GlobalRef,
}

unsafe impl Send for AssetManager {}

impl AssetManager {
    pub fn from_java(env: &JNIEnv, asset_manager: &JObject) -> Option<Self> {
        let java = env.new_global_ref(asset_manager).ok()?;
        let raw = NonNull::new(unsafe {
            ndk_sys::AAssetManager_fromJava(env.get_raw().cast(), asset_manager.as_raw().cast())
        })?;
        Some(Self { raw, _java: java })
    }

    pub fn as_ptr(&self) -> *mut ndk_sys::AAssetManager {
        self.raw.as_ptr()
    }
}

/// Engine type the exported natives drive
pub type AndroidEngine = dyn Engine<Surface = NativeWindow, Assets = AssetManager>;

// ============================================================================
// Activity façade
// ============================================================================

/// Android API calls on behalf of the engine. Holds no state beyond the
/// activity and the Java `JNI` object that owns it.
///
/// Published by `engineCreate`; engines reach it through [`facade`].
pub struct JniFacade {
    vm: JavaVM,
    jni: GlobalRef,
    activity: GlobalRef,
}

impl JniFacade {
    /// Build from a `com.viry3d.lib.JNI` instance, reading its `mActivity`.
    pub fn from_jni_object(env: &mut JNIEnv, jni_object: &JObject) -> Result<Self> {
        let built = Self::build(env, jni_object);
        describe_failure(env, built)
    }

    fn build(env: &mut JNIEnv, jni_object: &JObject) -> jni::errors::Result<Self> {
        let activity = env
            .get_field(jni_object, "mActivity", "Landroid/app/Activity;")?
            .l()?;
        Ok(Self {
            vm: env.get_java_vm()?,
            jni: env.new_global_ref(jni_object)?,
            activity: env.new_global_ref(&activity)?,
        })
    }

    /// Attach the calling thread and run `f`. A pending Java exception is
    /// described and cleared before the error is returned.
    fn call<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut JNIEnv) -> jni::errors::Result<T>,
    {
        let mut env: AttachGuard<'_> = self.vm.attach_current_thread()?;
        let result = f(&mut *env);
        describe_failure(&mut *env, result)
    }

    /// Send the user to the launcher without finishing the activity.
    pub fn back_to_home(&self) -> Result<()> {
        self.call(|env| {
            let action: JObject = env.new_string("android.intent.action.MAIN")?.into();
            let intent = env.new_object(
                "android/content/Intent",
                "(Ljava/lang/String;)V",
                &[JValue::Object(&action)],
            )?;
            let category: JObject = env.new_string("android.intent.category.HOME")?.into();
            env.call_method(
                &intent,
                "addCategory",
                "(Ljava/lang/String;)Landroid/content/Intent;",
                &[JValue::Object(&category)],
            )?;
            env.call_method(
                &self.activity,
                "startActivity",
                "(Landroid/content/Intent;)V",
                &[JValue::Object(&intent)],
            )?;
            Ok(())
        })
    }

    /// Path of the installed APK
    pub fn package_path(&self) -> Result<String> {
        self.call(|env| {
            let path = env
                .call_method(&self.activity, "getPackageResourcePath", "()Ljava/lang/String;", &[])?
                .l()?;
            java_string(env, path)
        })
    }

    /// External files directory, or the internal one when external storage
    /// is unavailable.
    pub fn files_dir_path(&self) -> Result<String> {
        self.call(|env| {
            let external = env
                .call_method(
                    &self.activity,
                    "getExternalFilesDir",
                    "(Ljava/lang/String;)Ljava/io/File;",
                    &[JValue::Object(&JObject::null())],
                )?
                .l()?;
            let dir = if external.is_null() {
                env.call_method(&self.activity, "getFilesDir", "()Ljava/io/File;", &[])?
                    .l()?
            } else {
                external
            };

            let path = env
                .call_method(&dir, "getAbsolutePath", "()Ljava/lang/String;", &[])?
                .l()?;
            java_string(env, path)
        })
    }

    pub fn quit_application(&self) -> Result<()> {
        self.call(|env| {
            env.call_method(&self.activity, "finish", "()V", &[])?;
            Ok(())
        })
    }

    /// Toggle `FLAG_KEEP_SCREEN_ON`. Goes through `JNI.keepScreenOn`, which
    /// posts the change to the UI thread, so any thread may call this.
    pub fn keep_screen_on(&self, enable: bool) -> Result<()> {
        self.call(|env| {
            env.call_method(
                &self.jni,
                "keepScreenOn",
                "(Z)I",
                &[JValue::Bool(u8::from(enable))],
            )?;
            Ok(())
        })
    }
}

fn java_string(env: &mut JNIEnv, obj: JObject) -> jni::errors::Result<String> {
    let s = JString::from(obj);
    let value: String = env.get_string(&s)?.into();
    Ok(value)
}

fn describe_failure<T>(env: &mut JNIEnv, result: jni::errors::Result<T>) -> Result<T> {
    if result.is_err() && env.exception_check().unwrap_or(false) {
        let _ = env.exception_describe();
        let _ = env.exception_clear();
    }
    Ok(result?)
}

static FACADE: Lazy<ContextSlot<JniFacade>> = Lazy::new(ContextSlot::new);

/// Façade of the activity hosting the live engine
pub fn facade() -> Option<Arc<JniFacade>> {
    FACADE.current()
}

// ============================================================================
// Exported natives
// ============================================================================

static ENGINE: OnceCell<Mutex<EngineSlot<Box<AndroidEngine>>>> = OnceCell::new();

fn engine_slot() -> &'static Mutex<EngineSlot<Box<AndroidEngine>>> {
    ENGINE.get_or_init(|| Mutex::new(EngineSlot::new()))
}

/// Register how `engineCreate` builds the engine. Call once from the app's
/// `JNI_OnLoad`.
pub fn install_engine_factory<F>(factory: F)
where
    F: Fn() -> Box<AndroidEngine> + Send + Sync + 'static,
{
    engine_slot().lock().install_factory(factory);
}

fn with_engine<F: FnOnce(&mut Box<AndroidEngine>)>(f: F) {
    engine_slot().lock().with_engine(f);
}

#[no_mangle]
pub extern "system" fn Java_com_viry3d_lib_JNI_engineCreate<'local>(
    mut env: JNIEnv<'local>,
    this: JObject<'local>,
    surface: JObject<'local>,
    width: jint,
    height: jint,
    asset_manager: JObject<'local>,
) {
    logging::init(&LogConfig::default());

    match JniFacade::from_jni_object(&mut env, &this) {
        Ok(facade) => {
            FACADE.publish(facade);
        }
        Err(e) => log::error!("engineCreate: activity façade unavailable: {}", e),
    }

    let Some(window) = NativeWindow::from_surface(&env, &surface) else {
        log::error!("engineCreate: surface has no native window");
        return;
    };
    let Some(assets) = AssetManager::from_java(&env, &asset_manager) else {
        log::error!("engineCreate: asset manager unavailable");
        return;
    };

    if let Err(e) = engine_slot().lock().create(window, width, height, assets) {
        log::error!("engineCreate: {}", e);
    }
}

#[no_mangle]
pub extern "system" fn Java_com_viry3d_lib_JNI_engineDestroy<'local>(
    _env: JNIEnv<'local>,
    _this: JObject<'local>,
) {
    engine_slot().lock().destroy();
    FACADE.withdraw();
}

#[no_mangle]
pub extern "system" fn Java_com_viry3d_lib_JNI_engineSurfaceResize<'local>(
    env: JNIEnv<'local>,
    _this: JObject<'local>,
    surface: JObject<'local>,
    width: jint,
    height: jint,
) {
    let Some(window) = NativeWindow::from_surface(&env, &surface) else {
        log::error!("engineSurfaceResize: surface has no native window");
        return;
    };
    with_engine(|engine| engine.surface_resize(window, width, height));
}

#[no_mangle]
pub extern "system" fn Java_com_viry3d_lib_JNI_engineSurfaceDestroy<'local>(
    _env: JNIEnv<'local>,
    _this: JObject<'local>,
) {
    with_engine(|engine| engine.surface_destroy());
}

#[no_mangle]
pub extern "system" fn Java_com_viry3d_lib_JNI_enginePause<'local>(
    _env: JNIEnv<'local>,
    _this: JObject<'local>,
) {
    with_engine(|engine| engine.pause());
}

#[no_mangle]
pub extern "system" fn Java_com_viry3d_lib_JNI_engineResume<'local>(
    _env: JNIEnv<'local>,
    _this: JObject<'local>,
) {
    with_engine(|engine| engine.resume());
}

#[no_mangle]
pub extern "system" fn Java_com_viry3d_lib_JNI_engineDraw<'local>(
    _env: JNIEnv<'local>,
    _this: JObject<'local>,
) {
    with_engine(|engine| engine.draw());
}

#[no_mangle]
pub extern "system" fn Java_com_viry3d_lib_JNI_engineKeyDown<'local>(
    _env: JNIEnv<'local>,
    _this: JObject<'local>,
    key_code: jint,
) {
    with_engine(|engine| engine.key_down(key_code));
}

#[no_mangle]
pub extern "system" fn Java_com_viry3d_lib_JNI_engineKeyUp<'local>(
    _env: JNIEnv<'local>,
    _this: JObject<'local>,
    key_code: jint,
) {
    with_engine(|engine| engine.key_up(key_code));
}

#[no_mangle]
pub extern "system" fn Java_com_viry3d_lib_JNI_engineTouch<'local>(
    env: JNIEnv<'local>,
    _this: JObject<'local>,
    touch_data: JByteArray<'local>,
) {
    let data = match env.convert_byte_array(&touch_data) {
        Ok(data) => data,
        Err(e) => {
            log::error!("engineTouch: {}", e);
            return;
        }
    };
    with_engine(|engine| engine.touch(&data));
}
