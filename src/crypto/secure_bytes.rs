//! Owned key bytes that are wiped when dropped
//!
//! Pages are pinned with `mlock` on unix so key material does not end up in
//! swap. Pinning is best effort and silently skipped without privileges.

use std::ops::Deref;
use zeroize::Zeroize;

/// Byte buffer that is zeroed and unlocked on drop
pub struct SecureBytes(Vec<u8>);

impl SecureBytes {
    /// Take ownership of `data` and lock it in memory where possible
    pub fn new(data: Vec<u8>) -> Self {
        let secure = Self(data);
        secure.lock_memory();
        secure
    }

    #[cfg(unix)]
    fn lock_memory(&self) {
        if self.0.is_empty() {
            return;
        }
        unsafe {
            libc::mlock(self.0.as_ptr() as *const libc::c_void, self.0.len());
        }
    }

    #[cfg(not(unix))]
    fn lock_memory(&self) {}

    #[cfg(unix)]
    fn unlock_memory(&self) {
        if self.0.is_empty() {
            return;
        }
        unsafe {
            libc::munlock(self.0.as_ptr() as *const libc::c_void, self.0.len());
        }
    }

    #[cfg(not(unix))]
    fn unlock_memory(&self) {}

    /// Number of bytes held
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no bytes are held
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Deref for SecureBytes {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Zeroize for SecureBytes {
    fn zeroize(&mut self) {
        // Zero in place; the allocation stays locked until drop
        self.0.as_mut_slice().zeroize();
    }
}

impl Drop for SecureBytes {
    fn drop(&mut self) {
        self.zeroize();
        self.unlock_memory();
    }
}

impl std::fmt::Debug for SecureBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecureBytes")
            .field("len", &self.0.len())
            .field("data", &"[REDACTED]")
            .finish()
    }
}
