// SPDX-License-Identifier: GPL-3.0-only

//! Raw bindings for the parts of `nvEncodeAPI` used to read capabilities
//!
//! The library is loaded at runtime with `libloading`. Only the function
//! list entries the prober calls are typed; the others keep their slot in
//! the table as untyped pointers so the layout matches the driver's.

use std::ffi::{c_char, c_void};
use std::path::Path;

use libloading::Library;
use tracing::{debug, info};

use crate::caps::CodecId;
use crate::errors::BackendError;

/// NVENC API return type
pub type NvencStatus = i32;

pub const NV_ENC_SUCCESS: NvencStatus = 0;
pub const NV_ENC_ERR_NO_ENCODE_DEVICE: NvencStatus = 1;
pub const NV_ENC_ERR_INVALID_PARAM: NvencStatus = 8;
pub const NV_ENC_ERR_UNSUPPORTED_PARAM: NvencStatus = 12;

/// API version the bindings are written against (12.1)
pub const NVENCAPI_MAJOR_VERSION: u32 = 12;
pub const NVENCAPI_MINOR_VERSION: u32 = 1;

/// Packed API version passed in `api_version` fields
pub const NVENCAPI_VERSION: u32 = NVENCAPI_MAJOR_VERSION | (NVENCAPI_MINOR_VERSION << 24);

/// Version as reported by `NvEncodeAPIGetMaxSupportedVersion`
pub const NVENCAPI_REPORTED_VERSION: u32 = (NVENCAPI_MAJOR_VERSION << 4) | NVENCAPI_MINOR_VERSION;

/// `NVENCAPI_STRUCT_VERSION(ver)`
pub const fn nvenc_struct_version(struct_ver: u32) -> u32 {
    NVENCAPI_VERSION | (struct_ver << 16) | (0x7 << 28)
}

/// `NV_ENC_DEVICE_TYPE_CUDA`
pub const NV_ENC_DEVICE_TYPE_CUDA: u32 = 1;

/// GUID with the Windows layout NVENC uses
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct NvGuid {
    pub data1: u32,
    pub data2: u16,
    pub data3: u16,
    pub data4: [u8; 8],
}

pub const NV_ENC_CODEC_H264_GUID: NvGuid = NvGuid {
    data1: 0x6BC8_2762,
    data2: 0x4E63,
    data3: 0x4CA4,
    data4: [0xAA, 0x85, 0x1A, 0x4D, 0x14, 0x15, 0x26, 0xD2],
};

pub const NV_ENC_CODEC_HEVC_GUID: NvGuid = NvGuid {
    data1: 0x790C_DC88,
    data2: 0x4522,
    data3: 0x4D7B,
    data4: [0x94, 0x25, 0xBD, 0xA9, 0x97, 0x5F, 0x76, 0x03],
};

pub const NV_ENC_CODEC_AV1_GUID: NvGuid = NvGuid {
    data1: 0x0A35_2289,
    data2: 0x0AA7,
    data3: 0x4759,
    data4: [0x86, 0x2D, 0x5D, 0x15, 0xCD, 0x16, 0xD2, 0x54],
};

/// Encode GUID of a codec
pub fn codec_guid(codec: CodecId) -> NvGuid {
    match codec {
        CodecId::H264 => NV_ENC_CODEC_H264_GUID,
        CodecId::Hevc => NV_ENC_CODEC_HEVC_GUID,
        CodecId::Av1 => NV_ENC_CODEC_AV1_GUID,
    }
}

/// `NV_ENC_CAPS_PARAM`
#[repr(C)]
pub struct NvEncCapsParam {
    pub version: u32,
    pub caps_to_query: i32,
    pub reserved: [u32; 62],
}

impl NvEncCapsParam {
    pub fn new(caps_to_query: i32) -> Self {
        Self {
            version: nvenc_struct_version(1),
            caps_to_query,
            reserved: [0; 62],
        }
    }
}

/// `NV_ENC_OPEN_ENCODE_SESSION_EX_PARAMS`
#[repr(C)]
pub struct NvEncOpenEncodeSessionExParams {
    pub version: u32,
    pub device_type: u32,
    /// CUcontext for CUDA devices
    pub device: *mut c_void,
    pub reserved: *mut c_void,
    pub api_version: u32,
    pub reserved1: [u32; 253],
    pub reserved2: [*mut c_void; 64],
}

impl NvEncOpenEncodeSessionExParams {
    pub fn cuda(context: *mut c_void) -> Self {
        // SAFETY: All-zeros is valid for this POD struct. Pointer fields
        // become null.
        let mut s: Self = unsafe { std::mem::zeroed() };
        s.version = nvenc_struct_version(1);
        s.device_type = NV_ENC_DEVICE_TYPE_CUDA;
        s.device = context;
        s.api_version = NVENCAPI_VERSION;
        s
    }
}

/// Function pointer slot the prober never calls
pub type UnusedFn = Option<unsafe extern "C" fn()>;

pub type OpenEncodeSessionExFn = unsafe extern "C" fn(
    params: *mut NvEncOpenEncodeSessionExParams,
    encoder: *mut *mut c_void,
) -> NvencStatus;
pub type GetEncodeGuidCountFn =
    unsafe extern "C" fn(encoder: *mut c_void, count: *mut u32) -> NvencStatus;
pub type GetEncodeGuidsFn = unsafe extern "C" fn(
    encoder: *mut c_void,
    guids: *mut NvGuid,
    array_size: u32,
    count: *mut u32,
) -> NvencStatus;
pub type GetEncodeCapsFn = unsafe extern "C" fn(
    encoder: *mut c_void,
    encode_guid: NvGuid,
    caps_param: *mut NvEncCapsParam,
    caps_val: *mut i32,
) -> NvencStatus;
pub type DestroyEncoderFn = unsafe extern "C" fn(encoder: *mut c_void) -> NvencStatus;
pub type GetLastErrorStringFn = unsafe extern "C" fn(encoder: *mut c_void) -> *const c_char;

/// `NV_ENCODE_API_FUNCTION_LIST`, filled in by `NvEncodeAPICreateInstance`
#[repr(C)]
#[allow(non_snake_case)]
pub struct NvEncodeApiFunctionList {
    pub version: u32,
    pub reserved: u32,
    pub nvEncOpenEncodeSession: UnusedFn,
    pub nvEncGetEncodeGUIDCount: Option<GetEncodeGuidCountFn>,
    pub nvEncGetEncodeProfileGUIDCount: UnusedFn,
    pub nvEncGetEncodeProfileGUIDs: UnusedFn,
    pub nvEncGetEncodeGUIDs: Option<GetEncodeGuidsFn>,
    pub nvEncGetInputFormatCount: UnusedFn,
    pub nvEncGetInputFormats: UnusedFn,
    pub nvEncGetEncodeCaps: Option<GetEncodeCapsFn>,
    pub nvEncGetEncodePresetCount: UnusedFn,
    pub nvEncGetEncodePresetGUIDs: UnusedFn,
    pub nvEncGetEncodePresetConfig: UnusedFn,
    pub nvEncInitializeEncoder: UnusedFn,
    pub nvEncCreateInputBuffer: UnusedFn,
    pub nvEncDestroyInputBuffer: UnusedFn,
    pub nvEncCreateBitstreamBuffer: UnusedFn,
    pub nvEncDestroyBitstreamBuffer: UnusedFn,
    pub nvEncEncodePicture: UnusedFn,
    pub nvEncLockBitstream: UnusedFn,
    pub nvEncUnlockBitstream: UnusedFn,
    pub nvEncLockInputBuffer: UnusedFn,
    pub nvEncUnlockInputBuffer: UnusedFn,
    pub nvEncGetEncodeStats: UnusedFn,
    pub nvEncGetSequenceParams: UnusedFn,
    pub nvEncRegisterAsyncEvent: UnusedFn,
    pub nvEncUnregisterAsyncEvent: UnusedFn,
    pub nvEncMapInputResource: UnusedFn,
    pub nvEncUnmapInputResource: UnusedFn,
    pub nvEncDestroyEncoder: Option<DestroyEncoderFn>,
    pub nvEncInvalidateRefFrames: UnusedFn,
    pub nvEncOpenEncodeSessionEx: Option<OpenEncodeSessionExFn>,
    pub nvEncRegisterResource: UnusedFn,
    pub nvEncUnregisterResource: UnusedFn,
    pub nvEncReconfigureEncoder: UnusedFn,
    pub reserved1: *mut c_void,
    pub nvEncCreateMVBuffer: UnusedFn,
    pub nvEncDestroyMVBuffer: UnusedFn,
    pub nvEncRunMotionEstimationOnly: UnusedFn,
    pub nvEncGetLastErrorString: Option<GetLastErrorStringFn>,
    pub nvEncSetIOCudaStreams: UnusedFn,
    pub nvEncGetEncodePresetConfigEx: UnusedFn,
    pub nvEncGetSequenceParamEx: UnusedFn,
    pub nvEncRestoreEncoderState: UnusedFn,
    pub nvEncLookaheadPicture: UnusedFn,
    pub reserved2: [*mut c_void; 275],
}

impl Default for NvEncodeApiFunctionList {
    fn default() -> Self {
        // SAFETY: All-zeros is valid: every function slot is an Option
        // (None) or a raw pointer (null).
        let mut s: Self = unsafe { std::mem::zeroed() };
        s.version = nvenc_struct_version(2);
        s
    }
}

type CreateInstanceFn = unsafe extern "C" fn(list: *mut NvEncodeApiFunctionList) -> NvencStatus;
type GetMaxSupportedVersionFn = unsafe extern "C" fn(version: *mut u32) -> NvencStatus;

/// Entry points used for capability queries, resolved from the function list
#[derive(Clone, Copy)]
pub struct NvencApi {
    pub open_encode_session_ex: OpenEncodeSessionExFn,
    pub get_encode_guid_count: GetEncodeGuidCountFn,
    pub get_encode_guids: GetEncodeGuidsFn,
    pub get_encode_caps: GetEncodeCapsFn,
    pub destroy_encoder: DestroyEncoderFn,
    pub get_last_error_string: Option<GetLastErrorStringFn>,
}

/// Loaded NVENC library and its resolved function table
pub struct NvencLibrary {
    api: NvencApi,
    // Must outlive every function pointer in `api`.
    _library: Library,
}

impl NvencLibrary {
    /// Platform-specific NVENC library name
    pub fn library_name() -> &'static str {
        if cfg!(target_os = "windows") {
            "nvEncodeAPI64.dll"
        } else {
            "libnvidia-encode.so.1"
        }
    }

    /// Load the NVENC library from the default search path or `path`
    pub fn load(path: Option<&Path>) -> Result<Self, BackendError> {
        let library = match path {
            Some(path) => {
                debug!(path = %path.display(), "Loading NVENC library");
                // SAFETY: Loading a shared library runs its initializers; the
                // NVENC runtime has no unsound ones.
                unsafe { Library::new(path) }
            }
            None => {
                debug!(name = Self::library_name(), "Loading NVENC library");
                // SAFETY: As above.
                unsafe { Library::new(Self::library_name()) }
            }
        }
        .map_err(|e| BackendError::LibraryNotFound(e.to_string()))?;

        let max_supported_version = {
            // SAFETY: Symbol name and signature match nvEncodeAPI.h.
            let get_version: libloading::Symbol<GetMaxSupportedVersionFn> =
                unsafe { library.get(b"NvEncodeAPIGetMaxSupportedVersion\0") }
                    .map_err(|e| BackendError::SymbolNotFound(e.to_string()))?;
            let mut version = 0u32;
            // SAFETY: `version` is a valid out pointer.
            let status = unsafe { get_version(&mut version) };
            check_status("NvEncodeAPIGetMaxSupportedVersion", status, None)?;
            version
        };

        info!(
            driver = %format!("{}.{}", max_supported_version >> 4, max_supported_version & 0xF),
            "NVENC library loaded"
        );

        if max_supported_version < NVENCAPI_REPORTED_VERSION {
            return Err(BackendError::VersionMismatch {
                required: NVENCAPI_REPORTED_VERSION,
                supported: max_supported_version,
            });
        }

        let mut list = NvEncodeApiFunctionList::default();
        {
            // SAFETY: Symbol name and signature match nvEncodeAPI.h.
            let create_instance: libloading::Symbol<CreateInstanceFn> =
                unsafe { library.get(b"NvEncodeAPICreateInstance\0") }
                    .map_err(|e| BackendError::SymbolNotFound(e.to_string()))?;
            // SAFETY: `list` is a correctly versioned function list.
            let status = unsafe { create_instance(&mut list) };
            check_status("NvEncodeAPICreateInstance", status, None)?;
        }

        let api = NvencApi {
            open_encode_session_ex: require(list.nvEncOpenEncodeSessionEx, "nvEncOpenEncodeSessionEx")?,
            get_encode_guid_count: require(list.nvEncGetEncodeGUIDCount, "nvEncGetEncodeGUIDCount")?,
            get_encode_guids: require(list.nvEncGetEncodeGUIDs, "nvEncGetEncodeGUIDs")?,
            get_encode_caps: require(list.nvEncGetEncodeCaps, "nvEncGetEncodeCaps")?,
            destroy_encoder: require(list.nvEncDestroyEncoder, "nvEncDestroyEncoder")?,
            get_last_error_string: list.nvEncGetLastErrorString,
        };

        Ok(Self {
            api,
            _library: library,
        })
    }

    pub fn api(&self) -> &NvencApi {
        &self.api
    }
}

fn require<T>(entry: Option<T>, name: &str) -> Result<T, BackendError> {
    entry.ok_or_else(|| BackendError::SymbolNotFound(format!("{} missing from function list", name)))
}

/// Turn a non-success status into a [`BackendError`]
pub fn check_status(
    call: &'static str,
    status: NvencStatus,
    message: Option<String>,
) -> Result<(), BackendError> {
    match status {
        NV_ENC_SUCCESS => Ok(()),
        NV_ENC_ERR_NO_ENCODE_DEVICE => Err(BackendError::NoEncodeDevice),
        _ => Err(BackendError::Nvenc {
            call,
            status,
            message: message.unwrap_or_else(|| status_name(status).to_string()),
        }),
    }
}

/// Symbolic name of an `NVENCSTATUS`
pub fn status_name(status: NvencStatus) -> &'static str {
    match status {
        0 => "NV_ENC_SUCCESS",
        1 => "NV_ENC_ERR_NO_ENCODE_DEVICE",
        2 => "NV_ENC_ERR_UNSUPPORTED_DEVICE",
        3 => "NV_ENC_ERR_INVALID_ENCODERDEVICE",
        4 => "NV_ENC_ERR_INVALID_DEVICE",
        5 => "NV_ENC_ERR_DEVICE_NOT_EXIST",
        6 => "NV_ENC_ERR_INVALID_PTR",
        7 => "NV_ENC_ERR_INVALID_EVENT",
        8 => "NV_ENC_ERR_INVALID_PARAM",
        9 => "NV_ENC_ERR_INVALID_CALL",
        10 => "NV_ENC_ERR_OUT_OF_MEMORY",
        11 => "NV_ENC_ERR_ENCODER_NOT_INITIALIZED",
        12 => "NV_ENC_ERR_UNSUPPORTED_PARAM",
        13 => "NV_ENC_ERR_LOCK_BUSY",
        14 => "NV_ENC_ERR_NOT_ENOUGH_BUFFER",
        15 => "NV_ENC_ERR_INVALID_VERSION",
        16 => "NV_ENC_ERR_MAP_FAILED",
        17 => "NV_ENC_ERR_NEED_MORE_INPUT",
        18 => "NV_ENC_ERR_ENCODER_BUSY",
        19 => "NV_ENC_ERR_EVENT_NOT_REGISTERD",
        20 => "NV_ENC_ERR_GENERIC",
        21 => "NV_ENC_ERR_INCOMPATIBLE_CLIENT_KEY",
        22 => "NV_ENC_ERR_UNIMPLEMENTED",
        23 => "NV_ENC_ERR_RESOURCE_REGISTER_FAILED",
        24 => "NV_ENC_ERR_RESOURCE_NOT_REGISTERED",
        25 => "NV_ENC_ERR_RESOURCE_NOT_MAPPED",
        26 => "NV_ENC_ERR_NEED_MORE_OUTPUT",
        _ => "NV_ENC_ERR_UNKNOWN",
    }
}

/// Whether a caps query status means "no value for this pair"
pub fn is_not_applicable_status(status: NvencStatus) -> bool {
    matches!(status, NV_ENC_ERR_INVALID_PARAM | NV_ENC_ERR_UNSUPPORTED_PARAM)
}
