/// HRESULT to engine error mapping

use std::any::Any;
use triangle_engine::triangle::{Error, Result};
use triangle_engine::engine_error;
use windows::Win32::Foundation::E_OUTOFMEMORY;
use windows::Win32::Graphics::Dxgi::{
    DXGI_ERROR_DEVICE_HUNG, DXGI_ERROR_DEVICE_REMOVED, DXGI_ERROR_DEVICE_RESET,
};

pub(crate) const LOG_SOURCE: &str = "triangle::d3d12";

/// Convert a `windows` error into an engine error, logging it
///
/// Device removal, reset and hang become `DeviceLost`, `E_OUTOFMEMORY`
/// becomes `OutOfMemory`, everything else is a `BackendError`.
pub(crate) fn map_hresult(context: &str, error: windows::core::Error) -> Error {
    engine_error!(LOG_SOURCE, "{}: {:?}", context, error);

    let code = error.code();
    if code == DXGI_ERROR_DEVICE_REMOVED || code == DXGI_ERROR_DEVICE_RESET || code == DXGI_ERROR_DEVICE_HUNG {
        Error::DeviceLost(format!("{}: {}", context, error.message()))
    } else if code == E_OUTOFMEMORY {
        Error::OutOfMemory
    } else {
        Error::BackendError(format!("{}: {:?}", context, error))
    }
}

/// `map_hresult` for device bring-up: generic failures become `InitializationFailed`
pub(crate) fn map_init_hresult(context: &str, error: windows::core::Error) -> Error {
    match map_hresult(context, error) {
        Error::BackendError(message) => Error::InitializationFailed(message),
        other => other,
    }
}

/// `map_err` shorthand for `windows::core::Result`
pub(crate) trait HResultExt<T> {
    fn or_engine(self, context: &str) -> Result<T>;
}

impl<T> HResultExt<T> for windows::core::Result<T> {
    fn or_engine(self, context: &str) -> Result<T> {
        self.map_err(|e| map_hresult(context, e))
    }
}

/// Downcast a trait object handed across the backend seam
///
/// Mixing objects from different backends is an `InvalidResource` error.
pub(crate) fn downcast<'a, T: 'static>(object: &'a dyn Any, what: &str) -> Result<&'a T> {
    object.downcast_ref::<T>().ok_or_else(|| {
        engine_error!(LOG_SOURCE, "{} was not created by the Direct3D 12 backend", what);
        Error::InvalidResource(format!("{} was not created by the Direct3D 12 backend", what))
    })
}
