#[cfg(feature = "simdutf8")]
use simdutf8::basic as simd_utf8;

/// Validates UTF-8 bytes and returns a borrowed `&str` on success.
#[inline]
pub(crate) fn validate(bytes: &[u8]) -> Result<&str, ()> {
    #[cfg(feature = "simdutf8")]
    {
        simd_utf8::from_utf8(bytes).map_err(|_| ())
    }

    #[cfg(not(feature = "simdutf8"))]
    {
        core::str::from_utf8(bytes).map_err(|_| ())
    }
}

/// Returns a `&str` from trusted-input bytes.
///
/// In `unsafe-str` mode this skips validation and relies on the caller's
/// trusted-input invariant.
#[cfg(feature = "unsafe-str")]
#[inline]
#[allow(clippy::unnecessary_wraps)]
pub(crate) fn trusted(bytes: &[u8]) -> Result<&str, ()> {
    // Safety: callers only use this on the Trusted decode path.
    Ok(unsafe { core::str::from_utf8_unchecked(bytes) })
}

/// Returns a `&str` from trusted-input bytes.
#[cfg(not(feature = "unsafe-str"))]
#[inline]
pub(crate) fn trusted(bytes: &[u8]) -> Result<&str, ()> {
    validate(bytes)
}
