//! Privileged-port check run before binding.

/// Ports below this need elevated privilege on Unix.
pub const FIRST_UNPRIVILEGED_PORT: u16 = 1024;

/// Whether the current process runs with root privileges.
pub fn is_root() -> bool {
    #[cfg(unix)]
    unsafe {
        if libc::geteuid() != 0 {
            return false;
        }
    }
    true
}

/// True when binding `port` will likely fail for lack of privilege.
///
/// Only a hint: capabilities such as `CAP_NET_BIND_SERVICE` can still allow
/// the bind, so callers warn and attempt it anyway.
pub fn needs_privilege(port: u16) -> bool {
    port != 0 && port < FIRST_UNPRIVILEGED_PORT && !is_root()
}
