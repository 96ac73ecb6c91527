//! Runtime configuration for the platform glue

use log::LevelFilter;

/// `android.graphics.PixelFormat` values accepted by the surface holder.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
#[repr(i32)]
pub enum PixelFormat {
    Rgba8888 = 1,
    Rgbx8888 = 2,
    #[default]
    Rgb888 = 3,
    Rgb565 = 4,
}

impl From<i32> for PixelFormat {
    fn from(value: i32) -> Self {
        match value {
            1 => PixelFormat::Rgba8888,
            2 => PixelFormat::Rgbx8888,
            4 => PixelFormat::Rgb565,
            _ => PixelFormat::Rgb888,
        }
    }
}

/// Logger settings
#[derive(Clone, Debug)]
pub struct LogConfig {
    pub tag: String,
    pub max_level: LevelFilter,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            tag: "Viry3D".to_owned(),
            max_level: LevelFilter::Debug,
        }
    }
}

/// Settings shared by the activity, the surface view and the render thread
#[derive(Clone, Debug)]
pub struct GlueConfig {
    pub log: LogConfig,
    pub render_thread_name: String,
    pub pixel_format: PixelFormat,
}

impl Default for GlueConfig {
    fn default() -> Self {
        Self {
            log: LogConfig::default(),
            render_thread_name: "viry3d-render".to_owned(),
            pixel_format: PixelFormat::default(),
        }
    }
}

impl GlueConfig {
    pub fn with_render_thread_name(mut self, name: impl Into<String>) -> Self {
        self.render_thread_name = name.into();
        self
    }

    pub fn with_log_level(mut self, level: LevelFilter) -> Self {
        self.log.max_level = level;
        self
    }
}
