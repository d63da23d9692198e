use std::{os::unix::ffi::OsStrExt, path::Path};

/// Upper bound in bytes for paths and argument strings kept as evidence.
pub const EVIDENCE_MAX: usize = libc::PATH_MAX as usize;

/// Marker the kernel appends to links whose target has been unlinked.
const DELETED_SUFFIX: &[u8] = b" (deleted)";

/// Return the path unless the kernel reports it as deleted.
///
/// ```
/// # use std::path::Path;
/// # use procstat::utils::live_path;
/// assert_eq!(live_path(Path::new("/usr/sbin/nginx")), Some(Path::new("/usr/sbin/nginx")));
/// assert_eq!(live_path(Path::new("/usr/sbin/nginx (deleted)")), None);
/// ```
#[inline]
pub fn live_path(path: &Path) -> Option<&Path> {
    if path.as_os_str().as_bytes().ends_with(DELETED_SUFFIX) {
        None
    } else {
        Some(path)
    }
}

/// Truncate `s` to at most `max` bytes without splitting a character.
#[inline]
pub fn bounded(mut s: String, max: usize) -> String {
    if s.len() > max {
        let mut end = max;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        s.truncate(end);
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_live_path() {
        let path = Path::new("/usr/lib/libssl.so.3");
        assert_eq!(live_path(path), Some(path));

        let path = Path::new("/usr/lib/libssl.so.3 (deleted)");
        assert_eq!(live_path(path), None);

        // only a trailing marker counts
        let path = Path::new("/srv/(deleted)/bin");
        assert_eq!(live_path(path), Some(path));
    }

    #[test]
    fn test_bounded() {
        assert_eq!(bounded("nginx -g daemon".into(), 5), "nginx");
        assert_eq!(bounded("short".into(), 64), "short");
        // 'é' is two bytes, cutting at 2 would split it
        assert_eq!(bounded("aé".into(), 2), "a");
    }

    proptest! {
        #[test]
        fn bounded_never_exceeds_limit(s in ".*", max in 0usize..64) {
            let out = bounded(s.clone(), max);
            prop_assert!(out.len() <= max);
            prop_assert!(s.starts_with(&out));
        }
    }
}
