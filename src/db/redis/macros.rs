/// Read-through caching for lookups that may come back empty.
///
/// Checks `$cache` for `$key` first. On a miss the `$block` future is awaited;
/// it must resolve to `AppResult<Option<T>>`. A `Some` result is queued for
/// writing with `$ttl` seconds to live, a `None` result is never cached so a
/// record created later is still found.
///
/// Evaluates to `AppResult<Option<T>>`.
///
/// # Example
/// ```rust,ignore
/// let uploader = cached_optional!(cache, CacheKey::Uploader(id), 3600, async {
///     Ok(store.find_user(id).await?.map(|u| u.summary()))
/// })?;
/// ```
#[macro_export]
macro_rules! cached_optional {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        match $cache.get_from_cache(&key).await {
            Ok(Some(cached)) => Ok(Some(cached)),
            Ok(None) => match $block.await {
                Ok(Some(value)) => {
                    $cache.set_in_background(&key, &value, $ttl);
                    Ok(Some(value))
                }
                other => other,
            },
            Err(e) => Err(e),
        }
    }};
}
