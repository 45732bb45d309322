#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// contract of a 2D hardware accelerator.
pub mod backend;

/// dispatch configuration.
pub mod config;

/// backend selection, hardware conversion and software fallback.
pub mod dispatch;

pub use crate::backend::{
    HardwareBackend, HwBufferDesc, HwHandle, HwMemory, HwStatus, HwSurface, HwSurfaceMut,
    ImportGuard, NoHardware, TransformFlags,
};
pub use crate::config::DispatchConfig;
pub use crate::dispatch::{convert_hardware, select_backend, Backend, Converter};
