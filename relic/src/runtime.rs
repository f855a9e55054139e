//! Serving-layer configuration: how many OS worker threads the demo
//! adapter spins up and how each configures its `monoio` runtime. The
//! routing core itself is config-free (no persisted route tables, no hot
//! reload, both explicit Non-goals), so this is purely the ambient surface
//! around it, modeled on `monolake_core::config::RuntimeConfig`: each
//! worker gets an independent runtime and its own `Rc` mount of the same
//! `Router` (`spec.md` §5).
use serde::{Deserialize, Serialize};

fn default_workers() -> u16 {
    match std::thread::available_parallelism() {
        Ok(n) => n.get().min(u16::MAX as usize) as u16,
        Err(_) => 1,
    }
}

const fn default_entries() -> u32 {
    32768
}

const fn default_cpu_affinity() -> bool {
    true
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RuntimeType {
    #[cfg(target_os = "linux")]
    IoUring,
    Legacy,
}

impl Default for RuntimeType {
    #[cfg(target_os = "linux")]
    fn default() -> Self {
        Self::IoUring
    }

    #[cfg(not(target_os = "linux"))]
    fn default() -> Self {
        Self::Legacy
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Number of OS worker threads; each runs an independent `monoio`
    /// runtime and its own mount of the router.
    #[serde(default = "default_workers")]
    pub workers: u16,
    /// `io_uring`/epoll queue depth passed to `monoio::RuntimeBuilder`.
    #[serde(default = "default_entries")]
    pub entries: u32,
    #[serde(default)]
    pub runtime_type: RuntimeType,
    /// Pin each worker thread to its own CPU core.
    #[serde(default = "default_cpu_affinity")]
    pub cpu_affinity: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            entries: default_entries(),
            runtime_type: RuntimeType::default(),
            cpu_affinity: default_cpu_affinity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_workers_is_at_least_one() {
        assert!(RuntimeConfig::default().workers >= 1);
    }

    #[test]
    fn deserializes_with_defaults_for_missing_fields() {
        let cfg: RuntimeConfig = toml::from_str("workers = 4\n").unwrap();
        assert_eq!(cfg.workers, 4);
        assert_eq!(cfg.entries, default_entries());
        assert!(cfg.cpu_affinity);
    }
}
