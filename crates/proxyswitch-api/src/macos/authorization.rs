use std::ptr;

use security_framework_sys::authorization::{
    AuthorizationCopyRights, AuthorizationCreate, AuthorizationFree, AuthorizationRef,
    AuthorizationRights, errAuthorizationSuccess, kAuthorizationFlagDefaults,
    kAuthorizationFlagExtendRights, kAuthorizationFlagInteractionAllowed,
    kAuthorizationFlagPreAuthorize,
};
use system_configuration::sys::preferences::AuthorizationRef as PreferencesAuthorizationRef;
use tracing::debug;

use crate::error::Error;
use crate::types::AuthorizationMode;

/// An `AuthorizationRef` with pre-authorized, extended rights.
///
/// Freed when dropped.
#[derive(Debug)]
pub struct MacAuthorization {
    handle: AuthorizationRef,
}

// SAFETY: Authorization Services references are not bound to the thread
// that created them, and this type never hands out mutable access.
unsafe impl Send for MacAuthorization {}
// SAFETY: see `Send`; the handle is only read after construction.
unsafe impl Sync for MacAuthorization {}

impl MacAuthorization {
    pub(crate) fn acquire(mode: AuthorizationMode) -> Result<Self, Error> {
        let mut handle: AuthorizationRef = ptr::null_mut();
        // SAFETY: null rights and environment are documented as valid; the
        // out-pointer refers to a live local.
        let status = unsafe {
            AuthorizationCreate(
                ptr::null(),
                ptr::null(),
                kAuthorizationFlagDefaults,
                &raw mut handle,
            )
        };
        if status != errAuthorizationSuccess || handle.is_null() {
            return Err(Error::Authorization { status });
        }
        let authorization = Self { handle };

        let mut flags = kAuthorizationFlagExtendRights | kAuthorizationFlagPreAuthorize;
        if mode == AuthorizationMode::Interactive {
            flags |= kAuthorizationFlagInteractionAllowed;
        }
        let rights = AuthorizationRights {
            count: 0,
            items: ptr::null_mut(),
        };
        // SAFETY: `authorization.handle` was just created; `rights` outlives
        // the call and no rights are copied out.
        let status = unsafe {
            AuthorizationCopyRights(
                authorization.handle,
                &raw const rights,
                ptr::null(),
                flags,
                ptr::null_mut(),
            )
        };
        if status != errAuthorizationSuccess {
            debug!(status, ?mode, "authorization rights not granted");
            return Err(Error::Authorization { status });
        }
        Ok(authorization)
    }

    pub(crate) fn as_preferences_ref(&self) -> PreferencesAuthorizationRef {
        self.handle.cast_const().cast()
    }
}

impl Drop for MacAuthorization {
    fn drop(&mut self) {
        // SAFETY: the handle came from `AuthorizationCreate` and is freed once.
        unsafe {
            AuthorizationFree(self.handle, kAuthorizationFlagDefaults);
        }
    }
}
