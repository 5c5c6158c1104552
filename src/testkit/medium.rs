//! Cache media with failure behavior.

use crate::error::{Error, Result};
use crate::port::outbound::cache::CacheMedium;

/// A medium on which every operation fails, as an unavailable or full store
/// would.
#[derive(Debug, Default)]
pub struct BrokenMedium;

impl CacheMedium for BrokenMedium {
    fn name(&self) -> &'static str {
        "broken"
    }

    fn read(&self, _key: &str) -> Result<Option<String>> {
        Err(Error::Database("medium unavailable".into()))
    }

    fn write(&self, _key: &str, _payload: &str) -> Result<()> {
        Err(Error::Database("medium full".into()))
    }

    fn remove(&self, _key: &str) -> Result<bool> {
        Err(Error::Database("medium unavailable".into()))
    }

    fn keys(&self) -> Result<Vec<String>> {
        Err(Error::Database("medium unavailable".into()))
    }

    fn clear(&self) -> Result<usize> {
        Err(Error::Database("medium unavailable".into()))
    }
}
