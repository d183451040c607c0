use super::api::{AAudioApi, BuilderHandle, StreamHandle};
use super::capability::{self, SymbolResolver, Tier26, Tier28, Tier32};
use super::ffi::{
    AAudioStream, AAudioStreamBuilder, DataCallback, ErrorCallback, aaudio_channel_mask_t,
    aaudio_format_t, aaudio_result_t, aaudio_stream_state_t,
};
use crate::error::AoError;
use crate::hw::error_fmt;
use crate::hw::options::AAudioOptions;
use libloading::Library;
use std::ffi::CStr;
use std::os::raw::{c_char, c_void};
use std::ptr;
use tracing::debug;

/// `libaaudio.so` loaded and bound up to the device API level.
pub struct AAudioLibrary {
    api_level: i32,
    t26: Tier26,
    t28: Option<Tier28>,
    t32: Option<Tier32>,
    // Dropped last: every function pointer above points into it.
    _library: Library,
}

impl std::fmt::Debug for AAudioLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AAudioLibrary")
            .field("api_level", &self.api_level)
            .field("tier28", &self.t28.is_some())
            .field("tier32", &self.t32.is_some())
            .finish()
    }
}

struct DlResolver<'a> {
    library: &'a Library,
    global: Option<Library>,
}

impl SymbolResolver for DlResolver<'_> {
    fn resolve(&self, symbol: &str) -> Option<*mut c_void> {
        lookup(self.library, symbol)
            .or_else(|| self.global.as_ref().and_then(|g| lookup(g, symbol)))
    }
}

fn lookup(library: &Library, symbol: &str) -> Option<*mut c_void> {
    // SAFETY: the symbol is only read as an address, never called here.
    let sym = unsafe { library.get::<*mut c_void>(symbol.as_bytes()) }.ok()?;
    let addr = *sym;
    (!addr.is_null()).then_some(addr)
}

#[cfg(unix)]
fn open_library(path: &str) -> Result<Library, libloading::Error> {
    use libloading::os::unix::{Library as UnixLibrary, RTLD_GLOBAL, RTLD_NOW};
    // SAFETY: loading libaaudio runs no initializers with preconditions.
    unsafe { UnixLibrary::open(Some(path), RTLD_NOW | RTLD_GLOBAL) }.map(Library::from)
}

#[cfg(not(unix))]
fn open_library(path: &str) -> Result<Library, libloading::Error> {
    // SAFETY: see the unix variant.
    unsafe { Library::new(path) }
}

#[cfg(unix)]
fn global_namespace() -> Option<Library> {
    Some(libloading::os::unix::Library::this().into())
}

#[cfg(not(unix))]
fn global_namespace() -> Option<Library> {
    None
}

#[cfg(target_os = "android")]
fn device_api_level() -> Option<i32> {
    use std::os::raw::c_int;

    let this = libloading::os::unix::Library::this();
    // SAFETY: both symbols are bionic libc functions with these prototypes.
    unsafe {
        if let Ok(get_level) = this.get::<unsafe extern "C" fn() -> c_int>(b"android_get_device_api_level") {
            let level = get_level();
            if level > 0 {
                return Some(level);
            }
        }
        let property_get = this
            .get::<unsafe extern "C" fn(*const c_char, *mut c_char) -> c_int>(
                b"__system_property_get",
            )
            .ok()?;
        // PROP_VALUE_MAX
        let mut value = [0 as c_char; 92];
        if property_get(c"ro.build.version.sdk".as_ptr(), value.as_mut_ptr()) <= 0 {
            return None;
        }
        CStr::from_ptr(value.as_ptr()).to_str().ok()?.trim().parse().ok()
    }
}

#[cfg(not(target_os = "android"))]
fn device_api_level() -> Option<i32> {
    None
}

impl AAudioLibrary {
    /// Open the audio library and bind every capability tier the device supports.
    ///
    /// The library handle is released again if probing fails.
    pub fn load(options: &AAudioOptions) -> Result<Self, AoError> {
        let api_level = options
            .api_level
            .or_else(device_api_level)
            .ok_or(AoError::UnknownApiLevel)?;

        let library = open_library(&options.library).map_err(|e| AoError::LibraryLoad {
            library: options.library.clone(),
            reason: e.to_string(),
        })?;

        let caps = {
            let resolver = DlResolver {
                library: &library,
                global: global_namespace(),
            };
            capability::probe(api_level, capability::CAPABILITY_TABLE, &resolver)?
        };

        let t26 = Tier26::bind(&caps).ok_or(AoError::UnsupportedApiLevel {
            api_level,
            required: Tier26::MIN_API_LEVEL,
        })?;
        let t28 = Tier28::bind(&caps);
        let t32 = Tier32::bind(&caps);
        debug!(
            "Loaded {} (API level {api_level}, {} symbols)",
            options.library,
            caps.len()
        );

        Ok(Self {
            api_level,
            t26,
            t28,
            t32,
            _library: library,
        })
    }
}

fn c_text(text: *const c_char) -> Option<String> {
    if text.is_null() {
        return None;
    }
    // SAFETY: AAudio returns static NUL-terminated strings.
    Some(unsafe { CStr::from_ptr(text) }.to_string_lossy().into_owned())
}

impl AAudioApi for AAudioLibrary {
    fn api_level(&self) -> i32 {
        self.api_level
    }

    fn has_tier(&self, min_api_level: i32) -> bool {
        match min_api_level {
            level if level <= Tier26::MIN_API_LEVEL => true,
            level if level <= Tier28::MIN_API_LEVEL => self.t28.is_some(),
            level if level <= Tier32::MIN_API_LEVEL => self.t32.is_some(),
            _ => false,
        }
    }

    fn result_text(&self, result: aaudio_result_t) -> String {
        let text = unsafe { (self.t26.convert_result_to_text)(result) };
        c_text(text).unwrap_or_else(|| error_fmt::result_name(result))
    }

    fn state_text(&self, state: aaudio_stream_state_t) -> String {
        let text = unsafe { (self.t26.convert_stream_state_to_text)(state) };
        c_text(text).unwrap_or_else(|| error_fmt::state_name(state))
    }

    fn create_stream_builder(&self) -> Result<BuilderHandle, aaudio_result_t> {
        let mut builder: *mut AAudioStreamBuilder = ptr::null_mut();
        let result = unsafe { (self.t26.create_stream_builder)(&mut builder) };
        if result < 0 {
            return Err(result);
        }
        BuilderHandle::from_raw(builder).ok_or(super::ffi::AAUDIO_ERROR_NULL)
    }

    fn builder_delete(&self, builder: BuilderHandle) -> aaudio_result_t {
        unsafe { (self.t26.builder_delete)(builder.as_ptr()) }
    }

    fn builder_set_device_id(&self, builder: BuilderHandle, device_id: i32) {
        unsafe { (self.t26.builder_set_device_id)(builder.as_ptr(), device_id) }
    }

    fn builder_set_direction(&self, builder: BuilderHandle, direction: i32) {
        unsafe { (self.t26.builder_set_direction)(builder.as_ptr(), direction) }
    }

    fn builder_set_sharing_mode(&self, builder: BuilderHandle, mode: i32) {
        unsafe { (self.t26.builder_set_sharing_mode)(builder.as_ptr(), mode) }
    }

    fn builder_set_format(&self, builder: BuilderHandle, format: aaudio_format_t) {
        unsafe { (self.t26.builder_set_format)(builder.as_ptr(), format) }
    }

    fn builder_set_sample_rate(&self, builder: BuilderHandle, sample_rate: i32) {
        unsafe { (self.t26.builder_set_sample_rate)(builder.as_ptr(), sample_rate) }
    }

    fn builder_set_channel_count(&self, builder: BuilderHandle, channels: i32) {
        unsafe { (self.t26.builder_set_channel_count)(builder.as_ptr(), channels) }
    }

    fn builder_set_buffer_capacity(&self, builder: BuilderHandle, frames: i32) {
        unsafe { (self.t26.builder_set_buffer_capacity_in_frames)(builder.as_ptr(), frames) }
    }

    fn builder_set_performance_mode(&self, builder: BuilderHandle, mode: i32) {
        unsafe { (self.t26.builder_set_performance_mode)(builder.as_ptr(), mode) }
    }

    fn builder_set_data_callback(
        &self,
        builder: BuilderHandle,
        callback: DataCallback,
        user_data: *mut c_void,
    ) {
        unsafe { (self.t26.builder_set_data_callback)(builder.as_ptr(), Some(callback), user_data) }
    }

    fn builder_set_error_callback(
        &self,
        builder: BuilderHandle,
        callback: ErrorCallback,
        user_data: *mut c_void,
    ) {
        unsafe {
            (self.t26.builder_set_error_callback)(builder.as_ptr(), Some(callback), user_data)
        }
    }

    fn builder_set_content_type(&self, builder: BuilderHandle, content_type: i32) -> bool {
        let Some(t28) = self.t28 else {
            return false;
        };
        unsafe { (t28.builder_set_content_type)(builder.as_ptr(), content_type) };
        true
    }

    fn builder_set_usage(&self, builder: BuilderHandle, usage: i32) -> bool {
        let Some(t28) = self.t28 else {
            return false;
        };
        unsafe { (t28.builder_set_usage)(builder.as_ptr(), usage) };
        true
    }

    fn builder_set_session_id(&self, builder: BuilderHandle, session_id: i32) -> bool {
        let Some(t28) = self.t28 else {
            return false;
        };
        unsafe { (t28.builder_set_session_id)(builder.as_ptr(), session_id) };
        true
    }

    fn builder_set_channel_mask(
        &self,
        builder: BuilderHandle,
        mask: aaudio_channel_mask_t,
    ) -> bool {
        let Some(t32) = self.t32 else {
            return false;
        };
        unsafe { (t32.builder_set_channel_mask)(builder.as_ptr(), mask) };
        true
    }

    fn open_stream(&self, builder: BuilderHandle) -> Result<StreamHandle, aaudio_result_t> {
        let mut stream: *mut AAudioStream = ptr::null_mut();
        let result = unsafe { (self.t26.builder_open_stream)(builder.as_ptr(), &mut stream) };
        if result < 0 {
            return Err(result);
        }
        StreamHandle::from_raw(stream).ok_or(super::ffi::AAUDIO_ERROR_NULL)
    }

    fn stream_close(&self, stream: StreamHandle) -> aaudio_result_t {
        unsafe { (self.t26.stream_close)(stream.as_ptr()) }
    }

    fn stream_request_start(&self, stream: StreamHandle) -> aaudio_result_t {
        unsafe { (self.t26.stream_request_start)(stream.as_ptr()) }
    }

    fn stream_request_pause(&self, stream: StreamHandle) -> aaudio_result_t {
        unsafe { (self.t26.stream_request_pause)(stream.as_ptr()) }
    }

    fn stream_state(&self, stream: StreamHandle) -> aaudio_stream_state_t {
        unsafe { (self.t26.stream_get_state)(stream.as_ptr()) }
    }

    fn stream_wait_for_state_change(
        &self,
        stream: StreamHandle,
        input_state: aaudio_stream_state_t,
        timeout_nanos: i64,
    ) -> Result<aaudio_stream_state_t, aaudio_result_t> {
        let mut next = input_state;
        let result = unsafe {
            (self.t26.stream_wait_for_state_change)(
                stream.as_ptr(),
                input_state,
                &mut next,
                timeout_nanos,
            )
        };
        if result < 0 { Err(result) } else { Ok(next) }
    }

    fn stream_buffer_capacity(&self, stream: StreamHandle) -> i32 {
        unsafe { (self.t26.stream_get_buffer_capacity_in_frames)(stream.as_ptr()) }
    }

    fn stream_frames_per_burst(&self, stream: StreamHandle) -> i32 {
        unsafe { (self.t26.stream_get_frames_per_burst)(stream.as_ptr()) }
    }

    fn stream_xrun_count(&self, stream: StreamHandle) -> i32 {
        unsafe { (self.t26.stream_get_x_run_count)(stream.as_ptr()) }
    }

    fn stream_sample_rate(&self, stream: StreamHandle) -> i32 {
        unsafe { (self.t26.stream_get_sample_rate)(stream.as_ptr()) }
    }

    fn stream_channel_count(&self, stream: StreamHandle) -> i32 {
        unsafe { (self.t26.stream_get_channel_count)(stream.as_ptr()) }
    }

    fn stream_format(&self, stream: StreamHandle) -> aaudio_format_t {
        unsafe { (self.t26.stream_get_format)(stream.as_ptr()) }
    }

    fn stream_frames_written(&self, stream: StreamHandle) -> i64 {
        unsafe { (self.t26.stream_get_frames_written)(stream.as_ptr()) }
    }

    fn stream_timestamp(
        &self,
        stream: StreamHandle,
        clock_id: i32,
    ) -> Result<(i64, i64), aaudio_result_t> {
        let mut position = 0i64;
        let mut time_nanos = 0i64;
        let result = unsafe {
            (self.t26.stream_get_timestamp)(stream.as_ptr(), clock_id, &mut position, &mut time_nanos)
        };
        if result < 0 {
            return Err(result);
        }
        Ok((position, time_nanos))
    }
}

impl Drop for AAudioLibrary {
    fn drop(&mut self) {
        debug!("Releasing AAudio library (API level {})", self.api_level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_api_level_fails_before_loading() {
        let options = AAudioOptions {
            api_level: None,
            library: "libdoes-not-exist-aaudio.so".to_string(),
            ..AAudioOptions::default()
        };
        if device_api_level().is_none() {
            assert!(matches!(
                AAudioLibrary::load(&options),
                Err(AoError::UnknownApiLevel)
            ));
        }
    }

    #[test]
    fn missing_library_is_a_capability_failure() {
        let options = AAudioOptions {
            api_level: Some(33),
            library: "libdoes-not-exist-aaudio.so".to_string(),
            ..AAudioOptions::default()
        };
        let err = AAudioLibrary::load(&options).unwrap_err();
        assert!(err.is_capability());
        if let AoError::LibraryLoad { library, .. } = err {
            assert_eq!(library, "libdoes-not-exist-aaudio.so");
        } else {
            panic!("expected LibraryLoad");
        }
    }
}
