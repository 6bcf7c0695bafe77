use rusoto_core::Region;
use std::time::Duration;

pub type Queue = String;
pub type Port = u32;

/// Default number of attempts per message.
pub const DEFAULT_RETRIES: u64 = 3;

/// Where the consumed queue lives, and therefore how the deletion client
/// is built.
///
/// `Debug` runs the batch without any queue client at all: messages are
/// processed and classified, but nothing is deleted.
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Local(Port, Queue),
    AWS(Region, Queue),
    Debug,
}

/// Immutable per-batch policy.
///
/// A `Config` is built once and handed to the [`Redriver`](crate::redriver::Redriver);
/// nothing mutates it afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub mode: Mode,
    pub retries: u64,
    pub batch_deadline: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            mode: Mode::Debug,
            retries: DEFAULT_RETRIES,
            batch_deadline: None,
        }
    }
}

impl Config {
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_retries(mut self, retries: u64) -> Self {
        self.retries = retries;
        self
    }

    /// Bound the total wall-clock time one batch may take. Messages still
    /// running when the deadline expires are recorded as failures.
    pub fn with_batch_deadline(mut self, deadline: Duration) -> Self {
        self.batch_deadline = Some(deadline);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(Mode::Debug, config.mode);
        assert_eq!(DEFAULT_RETRIES, config.retries);
        assert!(config.batch_deadline.is_none());
    }

    #[test]
    fn test_builders() {
        let config = Config::default()
            .with_mode(Mode::Local(9324, "test-queue".to_owned()))
            .with_retries(5)
            .with_batch_deadline(Duration::from_secs(30));
        assert_eq!(Mode::Local(9324, "test-queue".to_owned()), config.mode);
        assert_eq!(5, config.retries);
        assert_eq!(Some(Duration::from_secs(30)), config.batch_deadline);
    }
}
