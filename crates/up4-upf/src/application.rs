//! Application filters.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use up4_types::Ip4Prefix;

use crate::{UpfEntityError, UpfEntityType, SLICE_MOBILE};

/// An application filter, classifying traffic into an application ID.
///
/// Any combination of the three match fields may be set; an application with
/// none of them matches all traffic. Among overlapping applications the one
/// with the highest priority wins.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UpfApplication {
    pub app_id: u8,
    pub priority: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip4_prefix: Option<Ip4Prefix>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub l4_port_range: Option<RangeInclusive<u16>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_proto: Option<u8>,
    #[serde(default)]
    pub slice_id: u8,
}

impl UpfApplication {
    pub fn builder() -> UpfApplicationBuilder {
        UpfApplicationBuilder::default()
    }
}

impl fmt::Display for UpfApplication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Application(app_id={}, priority={}",
            self.app_id, self.priority
        )?;
        if let Some(prefix) = &self.ip4_prefix {
            write!(f, ", prefix={}", prefix)?;
        }
        if let Some(range) = &self.l4_port_range {
            write!(f, ", l4_ports={}..={}", range.start(), range.end())?;
        }
        if let Some(proto) = self.ip_proto {
            write!(f, ", ip_proto={}", proto)?;
        }
        write!(f, ", slice_id={})", self.slice_id)
    }
}

#[derive(Debug, Clone)]
pub struct UpfApplicationBuilder {
    app_id: Option<u8>,
    priority: Option<i32>,
    ip4_prefix: Option<Ip4Prefix>,
    l4_port_range: Option<RangeInclusive<u16>>,
    ip_proto: Option<u8>,
    slice_id: u8,
}

impl Default for UpfApplicationBuilder {
    fn default() -> Self {
        Self {
            app_id: None,
            priority: None,
            ip4_prefix: None,
            l4_port_range: None,
            ip_proto: None,
            slice_id: SLICE_MOBILE,
        }
    }
}

impl UpfApplicationBuilder {
    pub fn with_app_id(mut self, app_id: u8) -> Self {
        self.app_id = Some(app_id);
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_ip4_prefix(mut self, prefix: Ip4Prefix) -> Self {
        self.ip4_prefix = Some(prefix);
        self
    }

    pub fn with_l4_port_range(mut self, range: RangeInclusive<u16>) -> Self {
        self.l4_port_range = Some(range);
        self
    }

    pub fn with_ip_proto(mut self, proto: u8) -> Self {
        self.ip_proto = Some(proto);
        self
    }

    pub fn with_slice_id(mut self, slice_id: u8) -> Self {
        self.slice_id = slice_id;
        self
    }

    pub fn build(self) -> Result<UpfApplication, UpfEntityError> {
        let kind = UpfEntityType::Application;
        let app_id = self
            .app_id
            .ok_or_else(|| UpfEntityError::missing(kind, "app_id"))?;
        let priority = self
            .priority
            .ok_or_else(|| UpfEntityError::missing(kind, "priority"))?;

        if let Some(range) = &self.l4_port_range {
            if range.is_empty() {
                return Err(UpfEntityError::InvalidPortRange {
                    low: *range.start(),
                    high: *range.end(),
                });
            }
        }

        Ok(UpfApplication {
            app_id,
            priority,
            ip4_prefix: self.ip4_prefix,
            l4_port_range: self.l4_port_range,
            ip_proto: self.ip_proto,
            slice_id: self.slice_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_build_with_all_filters() {
        let app = UpfApplication::builder()
            .with_app_id(1)
            .with_priority(10)
            .with_ip4_prefix("10.20.0.0/16".parse().unwrap())
            .with_l4_port_range(80..=8080)
            .with_ip_proto(6)
            .build()
            .unwrap();
        assert_eq!(app.slice_id, SLICE_MOBILE);
        assert_eq!(
            app.to_string(),
            "Application(app_id=1, priority=10, prefix=10.20.0.0/16, l4_ports=80..=8080, \
             ip_proto=6, slice_id=0)"
        );
    }

    #[test]
    fn test_filters_are_optional() {
        let app = UpfApplication::builder()
            .with_app_id(2)
            .with_priority(1)
            .build()
            .unwrap();
        assert_eq!(app.ip4_prefix, None);
        assert_eq!(app.l4_port_range, None);
        assert_eq!(app.ip_proto, None);
    }

    #[test]
    fn test_priority_required() {
        assert_eq!(
            UpfApplication::builder().with_app_id(2).build(),
            Err(UpfEntityError::missing(UpfEntityType::Application, "priority"))
        );
    }

    #[test]
    #[allow(clippy::reversed_empty_ranges)]
    fn test_empty_port_range_rejected() {
        assert_eq!(
            UpfApplication::builder()
                .with_app_id(2)
                .with_priority(1)
                .with_l4_port_range(100..=99)
                .build(),
            Err(UpfEntityError::InvalidPortRange { low: 100, high: 99 })
        );
    }
}
