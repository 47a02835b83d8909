//! Login normalization for Kubernetes resource names
//!
//! GitHub logins may contain characters (uppercase, `-`, `.`) that are not
//! usable verbatim inside generated resource names. [`escape`] maps any login
//! onto the `[a-z0-9-]` alphabet the same way JupyterHub does, so volumes
//! provisioned here line up with the claims JupyterHub generates per user.

/// Safe-alphabet check: lowercase ASCII letters and digits pass through
/// unescaped, everything else is hex-escaped.
fn is_safe(byte: u8) -> bool {
    byte.is_ascii_lowercase() || byte.is_ascii_digit()
}

/// Escape a raw login into a resource-name-safe string.
///
/// Each byte outside `[a-z0-9]` is emitted as `-` followed by two lowercase
/// hex digits of the byte value. The escape is applied byte-wise over the
/// UTF-8 encoding, so multi-byte characters expand to one escape per byte.
///
/// Escaping before any case folding keeps the mapping injective: `"A.b"`
/// becomes `"-41-2eb"` while `"a.b"` becomes `"a-2eb"`. Inputs already inside
/// the safe alphabet are returned unchanged.
pub fn escape(login: &str) -> String {
    let mut out = String::with_capacity(login.len());

    for byte in login.bytes() {
        if is_safe(byte) {
            out.push(byte as char);
        } else {
            out.push_str(&format!("-{:02x}", byte));
        }
    }

    out
}
