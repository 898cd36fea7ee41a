// SPDX-License-Identifier: GPL-3.0-only

//! Minimal CUDA driver API access
//!
//! NVENC sessions are opened on a CUDA context. Only initialisation, device
//! lookup and context lifetime are needed here.

use std::ffi::{CStr, c_char, c_int, c_void};
use std::path::Path;

use libloading::Library;
use tracing::{debug, warn};

use crate::errors::BackendError;

/// `CUcontext`
pub type CuContext = *mut c_void;
/// `CUresult`
pub type CuResult = c_int;

pub const CUDA_SUCCESS: CuResult = 0;

type CuInitFn = unsafe extern "C" fn(flags: u32) -> CuResult;
type CuDeviceGetFn = unsafe extern "C" fn(device: *mut c_int, ordinal: c_int) -> CuResult;
type CuDeviceGetNameFn = unsafe extern "C" fn(name: *mut c_char, len: c_int, device: c_int) -> CuResult;
type CuDriverGetVersionFn = unsafe extern "C" fn(version: *mut c_int) -> CuResult;
type CuCtxCreateFn = unsafe extern "C" fn(ctx: *mut CuContext, flags: u32, device: c_int) -> CuResult;
type CuCtxDestroyFn = unsafe extern "C" fn(ctx: CuContext) -> CuResult;

/// Loaded CUDA driver library
pub struct CudaDriver {
    cu_device_get: CuDeviceGetFn,
    cu_device_get_name: CuDeviceGetNameFn,
    cu_driver_get_version: CuDriverGetVersionFn,
    cu_ctx_create: CuCtxCreateFn,
    cu_ctx_destroy: CuCtxDestroyFn,
    _library: Library,
}

fn check(call: &'static str, code: CuResult) -> Result<(), BackendError> {
    if code == CUDA_SUCCESS {
        Ok(())
    } else {
        Err(BackendError::Cuda { call, code })
    }
}

/// Resolve one symbol into a plain function pointer
///
/// # Safety
///
/// `T` must match the C signature of `name`.
unsafe fn symbol<T: Copy>(library: &Library, name: &[u8]) -> Result<T, BackendError> {
    // SAFETY: Upheld by the caller.
    let sym: libloading::Symbol<T> = unsafe { library.get(name) }.map_err(|e| {
        BackendError::SymbolNotFound(format!(
            "{}: {}",
            String::from_utf8_lossy(name.strip_suffix(b"\0").unwrap_or(name)),
            e
        ))
    })?;
    Ok(*sym)
}

impl CudaDriver {
    /// Platform-specific CUDA driver library name
    pub fn library_name() -> &'static str {
        if cfg!(target_os = "windows") {
            "nvcuda.dll"
        } else {
            "libcuda.so.1"
        }
    }

    /// Load the driver library and run `cuInit`
    pub fn load(path: Option<&Path>) -> Result<Self, BackendError> {
        let target = path
            .map(|p| p.as_os_str().to_owned())
            .unwrap_or_else(|| Self::library_name().into());
        debug!(library = ?target, "Loading CUDA driver");

        // SAFETY: Loading the CUDA driver runs its initializers, which are
        // sound to run once per process.
        let library = unsafe { Library::new(&target) }
            .map_err(|e| BackendError::CudaUnavailable(e.to_string()))?;

        // SAFETY: Every signature below matches cuda.h.
        let (cu_init, driver) = unsafe {
            let cu_init: CuInitFn = symbol(&library, b"cuInit\0")?;
            let driver = Self {
                cu_device_get: symbol(&library, b"cuDeviceGet\0")?,
                cu_device_get_name: symbol(&library, b"cuDeviceGetName\0")?,
                cu_driver_get_version: symbol(&library, b"cuDriverGetVersion\0")?,
                cu_ctx_create: symbol(&library, b"cuCtxCreate_v2\0")?,
                cu_ctx_destroy: symbol(&library, b"cuCtxDestroy_v2\0")?,
                _library: library,
            };
            (cu_init, driver)
        };

        // SAFETY: cuInit takes no pointers.
        check("cuInit", unsafe { cu_init(0) })?;
        Ok(driver)
    }

    /// Device handle for an ordinal
    pub fn device(&self, ordinal: usize) -> Result<c_int, BackendError> {
        let ordinal = c_int::try_from(ordinal).map_err(|_| BackendError::Cuda {
            call: "cuDeviceGet",
            code: -1,
        })?;
        let mut device: c_int = 0;
        // SAFETY: `device` is a valid out pointer.
        check("cuDeviceGet", unsafe { (self.cu_device_get)(&mut device, ordinal) })?;
        Ok(device)
    }

    /// Marketing name of a device
    pub fn device_name(&self, device: c_int) -> Result<String, BackendError> {
        let mut buf = [0 as c_char; 256];
        // SAFETY: The buffer length passed matches `buf`; the driver
        // NUL-terminates within it.
        check("cuDeviceGetName", unsafe {
            (self.cu_device_get_name)(buf.as_mut_ptr(), buf.len() as c_int, device)
        })?;
        // SAFETY: NUL-terminated by cuDeviceGetName.
        let name = unsafe { CStr::from_ptr(buf.as_ptr()) };
        Ok(name.to_string_lossy().into_owned())
    }

    /// CUDA driver version, e.g. 12040 for 12.4
    pub fn driver_version(&self) -> Result<i32, BackendError> {
        let mut version: c_int = 0;
        // SAFETY: `version` is a valid out pointer.
        check("cuDriverGetVersion", unsafe {
            (self.cu_driver_get_version)(&mut version)
        })?;
        Ok(version)
    }

    /// Create a context on `device`, current on the calling thread
    pub fn create_context(&self, device: c_int) -> Result<CuContext, BackendError> {
        let mut ctx: CuContext = std::ptr::null_mut();
        // SAFETY: `ctx` is a valid out pointer.
        check("cuCtxCreate", unsafe { (self.cu_ctx_create)(&mut ctx, 0, device) })?;
        Ok(ctx)
    }

    /// Destroy a context created by [`Self::create_context`]
    pub fn destroy_context(&self, ctx: CuContext) {
        if ctx.is_null() {
            return;
        }
        // SAFETY: `ctx` came from cuCtxCreate and is destroyed once.
        let code = unsafe { (self.cu_ctx_destroy)(ctx) };
        if code != CUDA_SUCCESS {
            warn!(code, "cuCtxDestroy failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_maps_error_codes() {
        assert!(check("cuInit", CUDA_SUCCESS).is_ok());
        assert_eq!(
            check("cuInit", 100),
            Err(BackendError::Cuda {
                call: "cuInit",
                code: 100
            })
        );
    }

    #[test]
    fn test_missing_library_is_cuda_unavailable() {
        let result = CudaDriver::load(Some(Path::new("/nonexistent/libcuda.so.1")));
        assert!(matches!(result, Err(BackendError::CudaUnavailable(_))));
    }
}
