// src/infrastructure/cache/mod.rs
//! Cache backends.
//!
//! Every namespace segment carries a version counter. The physical name of a
//! key embeds the versions of all segments on its path, so bumping
//! `sly.article` makes every key below `sly.article.*` unreachable at once.
mod blackhole;
mod memory;
mod redis_cache;

pub use blackhole::BlackholeCache;
pub use memory::MemoryCache;
pub use redis_cache::RedisCache;

/// Keys longer than this are replaced by their blake3 digest.
const MAX_KEY_LEN: usize = 200;

/// `sly.article.list` -> `["sly", "sly.article", "sly.article.list"]`.
pub(crate) fn namespace_chain(namespace: &str) -> Vec<&str> {
    namespace
        .match_indices('.')
        .map(|(idx, _)| &namespace[..idx])
        .chain(std::iter::once(namespace))
        .collect()
}

/// Whether `namespace` is `root` or nested below it.
pub(crate) fn is_within(namespace: &str, root: &str) -> bool {
    namespace == root
        || namespace
            .strip_prefix(root)
            .is_some_and(|rest| rest.starts_with('.'))
}

pub(crate) fn physical_key(prefix: &str, namespace: &str, versions: &[u64], key: &str) -> String {
    let segments: Vec<String> = namespace
        .split('.')
        .zip(versions.iter().chain(std::iter::repeat(&0)))
        .map(|(segment, version)| format!("{segment}@{version}"))
        .collect();
    let key = if key.len() > MAX_KEY_LEN {
        format!("#{}", blake3::hash(key.as_bytes()).to_hex())
    } else {
        key.to_string()
    };
    format!("{prefix}:{}:{key}", segments.join("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_lists_every_ancestor() {
        assert_eq!(namespace_chain("sly"), vec!["sly"]);
        assert_eq!(
            namespace_chain("sly.article.list"),
            vec!["sly", "sly.article", "sly.article.list"]
        );
    }

    #[test]
    fn nesting_is_segment_aware() {
        assert!(is_within("sly.article.row", "sly.article"));
        assert!(is_within("sly.article", "sly.article"));
        assert!(!is_within("sly.articles", "sly.article"));
    }

    #[test]
    fn physical_keys_embed_versions_and_hash_long_keys() {
        assert_eq!(
            physical_key("sly", "sly.article", &[0, 3], "1_1"),
            "sly:sly@0.article@3:1_1"
        );

        let long = "k".repeat(MAX_KEY_LEN + 1);
        let physical = physical_key("sly", "sly", &[0], &long);
        assert!(physical.starts_with("sly:sly@0:#"));
        assert_eq!(physical, physical_key("sly", "sly", &[0], &long));
    }
}
