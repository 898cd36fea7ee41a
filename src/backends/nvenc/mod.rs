// SPDX-License-Identifier: GPL-3.0-only

//! Hardware backend: an NVENC session on a CUDA device
//!
//! Opening the backend walks CUDA init, device lookup and context creation,
//! then opens an encode session on that context and lists the codec GUIDs
//! the session accepts. The session and context are released on drop,
//! encoder first.

pub mod cuda;
pub mod ffi;

use std::ffi::{CStr, c_void};
use std::path::Path;

use tracing::{debug, info};

use self::cuda::{CuContext, CudaDriver};
use self::ffi::{
    NV_ENC_SUCCESS, NvEncCapsParam, NvEncOpenEncodeSessionExParams, NvGuid, NvencLibrary,
    NvencStatus, check_status, codec_guid, is_not_applicable_status, status_name,
};
use super::CapabilityBackend;
use crate::caps::{CapabilityId, CodecId};
use crate::errors::{BackendError, QueryError};
use crate::probe::{CapabilityQuery, DeviceInfo};

/// Open NVENC session used for capability queries
pub struct NvencBackend {
    library: NvencLibrary,
    cuda: CudaDriver,
    context: CuContext,
    encoder: *mut c_void,
    encode_guids: Vec<NvGuid>,
    device: DeviceInfo,
}

impl NvencBackend {
    /// Open a session on CUDA device `ordinal`
    ///
    /// Library paths default to the platform names when not given.
    pub fn open(
        ordinal: usize,
        cuda_library: Option<&Path>,
        nvenc_library: Option<&Path>,
    ) -> Result<Self, BackendError> {
        let cuda = CudaDriver::load(cuda_library)?;
        let device = cuda.device(ordinal)?;
        let info = DeviceInfo {
            name: cuda.device_name(device)?,
            driver_version: cuda.driver_version()?,
        };
        info!(name = %info.name, driver = info.driver_version, "CUDA device ready");

        let library = NvencLibrary::load(nvenc_library)?;
        let context = cuda.create_context(device)?;

        // From here on Drop owns the cleanup
        let mut backend = Self {
            library,
            cuda,
            context,
            encoder: std::ptr::null_mut(),
            encode_guids: Vec::new(),
            device: info,
        };
        backend.open_session()?;
        backend.encode_guids = backend.list_encode_guids()?;

        debug!(count = backend.encode_guids.len(), "Encode GUIDs listed");
        Ok(backend)
    }

    fn open_session(&mut self) -> Result<(), BackendError> {
        let mut params = NvEncOpenEncodeSessionExParams::cuda(self.context);
        let mut encoder: *mut c_void = std::ptr::null_mut();
        // SAFETY: `params` is correctly versioned and `encoder` is a valid
        // out pointer.
        let status = unsafe { (self.library.api().open_encode_session_ex)(&mut params, &mut encoder) };
        check_status("nvEncOpenEncodeSessionEx", status, None)?;
        self.encoder = encoder;
        Ok(())
    }

    fn list_encode_guids(&self) -> Result<Vec<NvGuid>, BackendError> {
        let api = self.library.api();

        let mut count = 0u32;
        // SAFETY: Open session; `count` is a valid out pointer.
        let status = unsafe { (api.get_encode_guid_count)(self.encoder, &mut count) };
        check_status("nvEncGetEncodeGUIDCount", status, self.last_error())?;

        let mut guids = vec![NvGuid::default(); count as usize];
        let mut written = 0u32;
        // SAFETY: `guids` holds `count` entries.
        let status = unsafe {
            (api.get_encode_guids)(self.encoder, guids.as_mut_ptr(), count, &mut written)
        };
        check_status("nvEncGetEncodeGUIDs", status, self.last_error())?;

        guids.truncate(written as usize);
        Ok(guids)
    }

    /// Driver-provided detail for the last failed call, if any
    fn last_error(&self) -> Option<String> {
        let get = self.library.api().get_last_error_string?;
        if self.encoder.is_null() {
            return None;
        }
        // SAFETY: Open session; the returned string is owned by the driver
        // and valid until the next call.
        let ptr = unsafe { get(self.encoder) };
        if ptr.is_null() {
            return None;
        }
        // SAFETY: Non-null, NUL-terminated.
        let msg = unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned();
        (!msg.is_empty()).then_some(msg)
    }

    /// Whether the session lists `codec` as an encode GUID
    pub fn supports_codec(&self, codec: CodecId) -> bool {
        self.encode_guids.contains(&codec_guid(codec))
    }

    fn query_status(&self, codec: CodecId, cap: CapabilityId) -> (NvencStatus, i32) {
        let mut param = NvEncCapsParam::new(cap.raw());
        let mut value = 0i32;
        // SAFETY: Open session; `param` and `value` are valid for the call.
        let status = unsafe {
            (self.library.api().get_encode_caps)(self.encoder, codec_guid(codec), &mut param, &mut value)
        };
        (status, value)
    }
}

impl CapabilityQuery for NvencBackend {
    fn query(&mut self, codec: CodecId, cap: CapabilityId) -> Result<i32, QueryError> {
        if !self.supports_codec(codec) {
            return Err(QueryError::NotApplicable);
        }

        let (status, value) = self.query_status(codec, cap);
        match status {
            NV_ENC_SUCCESS => Ok(value),
            s if is_not_applicable_status(s) => Err(QueryError::NotApplicable),
            s => {
                let detail = self.last_error().unwrap_or_default();
                Err(QueryError::Fatal(format!(
                    "nvEncGetEncodeCaps({}, {}) returned {} {}",
                    codec.short_name(),
                    cap,
                    status_name(s),
                    detail
                )
                .trim_end()
                .to_string()))
            }
        }
    }
}

impl CapabilityBackend for NvencBackend {
    fn device_info(&self) -> Option<DeviceInfo> {
        Some(self.device.clone())
    }
}

impl Drop for NvencBackend {
    fn drop(&mut self) {
        if !self.encoder.is_null() {
            // SAFETY: `encoder` came from nvEncOpenEncodeSessionEx and is
            // destroyed once.
            let status = unsafe { (self.library.api().destroy_encoder)(self.encoder) };
            if status != NV_ENC_SUCCESS {
                tracing::warn!(status = status_name(status), "nvEncDestroyEncoder failed");
            }
            self.encoder = std::ptr::null_mut();
        }
        self.cuda.destroy_context(self.context);
        self.context = std::ptr::null_mut();
        debug!("NVENC session closed");
    }
}
