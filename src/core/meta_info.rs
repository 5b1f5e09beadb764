//! Descriptive metadata of a Data packet.

use crate::core::change_counter::{ChangeCount, ChangeCounter};
use crate::core::key_locator::KeyLocator;
use crate::core::name::Component;
use std::cell::Cell;
use std::time::Duration;

/// Kind of content carried by a Data packet, with its NDN-TLV code
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ContentType {
    #[default]
    Blob,
    Link,
    Key,
    Nack,
    Other(u64),
}

impl ContentType {
    pub fn code(self) -> u64 {
        match self {
            ContentType::Blob => 0,
            ContentType::Link => 1,
            ContentType::Key => 2,
            ContentType::Nack => 3,
            ContentType::Other(code) => code,
        }
    }

    pub fn from_code(code: u64) -> Self {
        match code {
            0 => ContentType::Blob,
            1 => ContentType::Link,
            2 => ContentType::Key,
            3 => ContentType::Nack,
            other => ContentType::Other(other),
        }
    }
}

/// Content type, freshness and final block of a Data packet.
///
/// Older producers put the key locator here instead of in the signature; that
/// slot is kept as [`MetaInfo::legacy_key_locator`] for compatibility.
#[derive(Debug, Clone, Default)]
pub struct MetaInfo {
    content_type: ContentType,
    freshness_period: Option<Duration>,
    final_block_id: Option<Component>,
    locator: ChangeCounter<KeyLocator>,
    change_count: Cell<u64>,
}

impl MetaInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub fn freshness_period(&self) -> Option<Duration> {
        self.freshness_period
    }

    pub fn final_block_id(&self) -> Option<&Component> {
        self.final_block_id.as_ref()
    }

    /// Key locator stored by older producers
    #[deprecated(note = "the key locator belongs in the Signature")]
    pub fn legacy_key_locator(&self) -> &KeyLocator {
        self.locator.get()
    }

    pub(crate) fn locator(&self) -> &KeyLocator {
        self.locator.get()
    }

    pub fn set_content_type(&mut self, content_type: ContentType) -> &mut Self {
        self.content_type = content_type;
        self.changed();
        self
    }

    /// Set the freshness period, truncated to whole milliseconds (the wire
    /// precision). Periods beyond `u64::MAX` milliseconds saturate.
    pub fn set_freshness_period(&mut self, period: Option<Duration>) -> &mut Self {
        self.freshness_period = period.map(|p| Duration::from_millis(whole_millis(p)));
        self.changed();
        self
    }

    pub fn set_final_block_id(&mut self, component: Option<Component>) -> &mut Self {
        self.final_block_id = component;
        self.changed();
        self
    }

    #[deprecated(note = "set the key locator on the Signature instead")]
    pub fn set_legacy_key_locator(&mut self, locator: KeyLocator) -> &mut Self {
        self.set_locator(locator)
    }

    pub(crate) fn set_locator(&mut self, locator: KeyLocator) -> &mut Self {
        self.locator.set(locator);
        self.changed();
        self
    }

    fn changed(&self) {
        self.change_count.set(self.change_count.get() + 1);
    }
}

impl ChangeCount for MetaInfo {
    fn change_count(&self) -> u64 {
        if self.locator.check_changed() {
            self.changed();
        }
        self.change_count.get()
    }
}

impl PartialEq for MetaInfo {
    fn eq(&self, other: &Self) -> bool {
        self.content_type == other.content_type
            && self.freshness_period == other.freshness_period
            && self.final_block_id == other.final_block_id
            && self.locator == other.locator
    }
}

impl Eq for MetaInfo {}

/// Milliseconds in `period`, saturating at `u64::MAX`
pub(crate) fn whole_millis(period: Duration) -> u64 {
    u64::try_from(period.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setters_count() {
        let mut meta = MetaInfo::new();
        meta.set_content_type(ContentType::Key)
            .set_freshness_period(Some(Duration::from_secs(10)));
        assert_eq!(meta.change_count(), 2);
        assert_eq!(meta.content_type(), ContentType::Key);
    }

    #[test]
    fn test_freshness_truncated_to_millis() {
        let mut meta = MetaInfo::new();
        meta.set_freshness_period(Some(Duration::from_micros(1500)));
        assert_eq!(meta.freshness_period(), Some(Duration::from_millis(1)));

        meta.set_freshness_period(Some(Duration::MAX));
        assert_eq!(meta.freshness_period(), Some(Duration::from_millis(u64::MAX)));
    }

    #[test]
    fn test_content_type_codes() {
        assert_eq!(ContentType::from_code(3), ContentType::Nack);
        assert_eq!(ContentType::from_code(1024), ContentType::Other(1024));
        assert_eq!(ContentType::Other(7).code(), 7);
    }
}
