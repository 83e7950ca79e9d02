/// Seconds since the UNIX epoch, used to stamp saved textures
#[cfg(not(target_arch = "wasm32"))]
pub fn timestamp_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
}

/// Seconds since the UNIX epoch: the page's time origin plus the time elapsed since it
#[cfg(target_arch = "wasm32")]
pub fn timestamp_secs() -> u64 {
    web_sys::window()
        .and_then(|window| window.performance())
        .map(|perf| ((perf.time_origin() + perf.now()) / 1000.0) as u64)
        .unwrap_or(0)
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_is_epoch_based() {
        // 2020-09-13, well before any build of this crate
        assert!(timestamp_secs() > 1_600_000_000);
    }
}
