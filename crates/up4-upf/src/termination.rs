//! Uplink and downlink terminations.
//!
//! A termination is the per-UE, per-application end of a session: it selects
//! the counter to update, the traffic class, and (downlink) the GTP-U
//! encapsulation parameters.

use serde::{Deserialize, Serialize};
use std::fmt;
use up4_types::Ipv4Address;

use crate::{UpfEntityError, UpfEntityType};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UpfTerminationUplink {
    pub ue_session_id: Ipv4Address,
    pub application_id: u8,
    pub counter_id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traffic_class: Option<u8>,
    #[serde(default)]
    pub drop: bool,
}

impl UpfTerminationUplink {
    pub fn builder() -> UpfTerminationUplinkBuilder {
        UpfTerminationUplinkBuilder::default()
    }

    pub fn needs_dropping(&self) -> bool {
        self.drop
    }
}

impl fmt::Display for UpfTerminationUplink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "UplinkTermination(ue_session_id={}, app_id={}, ctr_id={}",
            self.ue_session_id, self.application_id, self.counter_id
        )?;
        if let Some(tc) = self.traffic_class {
            write!(f, ", tc={}", tc)?;
        }
        write!(f, ", drop={})", self.drop)
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpfTerminationUplinkBuilder {
    ue_session_id: Option<Ipv4Address>,
    application_id: Option<u8>,
    counter_id: Option<u32>,
    traffic_class: Option<u8>,
    drop: bool,
}

impl UpfTerminationUplinkBuilder {
    pub fn with_ue_session_id(mut self, ue_address: Ipv4Address) -> Self {
        self.ue_session_id = Some(ue_address);
        self
    }

    pub fn with_application_id(mut self, app_id: u8) -> Self {
        self.application_id = Some(app_id);
        self
    }

    pub fn with_counter_id(mut self, counter_id: u32) -> Self {
        self.counter_id = Some(counter_id);
        self
    }

    pub fn with_traffic_class(mut self, tc: u8) -> Self {
        self.traffic_class = Some(tc);
        self
    }

    pub fn needs_dropping(mut self, drop: bool) -> Self {
        self.drop = drop;
        self
    }

    pub fn build(self) -> Result<UpfTerminationUplink, UpfEntityError> {
        let kind = UpfEntityType::TerminationUplink;
        Ok(UpfTerminationUplink {
            ue_session_id: self
                .ue_session_id
                .ok_or_else(|| UpfEntityError::missing(kind, "ue_session_id"))?,
            application_id: self
                .application_id
                .ok_or_else(|| UpfEntityError::missing(kind, "application_id"))?,
            counter_id: self
                .counter_id
                .ok_or_else(|| UpfEntityError::missing(kind, "counter_id"))?,
            traffic_class: self.traffic_class,
            drop: self.drop,
        })
    }
}

/// A downlink termination.
///
/// TEID and QFI are only set on forwarding terminations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UpfTerminationDownlink {
    pub ue_session_id: Ipv4Address,
    pub application_id: u8,
    pub counter_id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teid: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qfi: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traffic_class: Option<u8>,
    #[serde(default)]
    pub drop: bool,
}

impl UpfTerminationDownlink {
    pub fn builder() -> UpfTerminationDownlinkBuilder {
        UpfTerminationDownlinkBuilder::default()
    }

    pub fn needs_dropping(&self) -> bool {
        self.drop
    }
}

impl fmt::Display for UpfTerminationDownlink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DownlinkTermination(ue_session_id={}, app_id={}, ctr_id={}",
            self.ue_session_id, self.application_id, self.counter_id
        )?;
        if let Some(teid) = self.teid {
            write!(f, ", teid={}", teid)?;
        }
        if let Some(qfi) = self.qfi {
            write!(f, ", qfi={}", qfi)?;
        }
        if let Some(tc) = self.traffic_class {
            write!(f, ", tc={}", tc)?;
        }
        write!(f, ", drop={})", self.drop)
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpfTerminationDownlinkBuilder {
    ue_session_id: Option<Ipv4Address>,
    application_id: Option<u8>,
    counter_id: Option<u32>,
    teid: Option<u32>,
    qfi: Option<u8>,
    traffic_class: Option<u8>,
    drop: bool,
}

impl UpfTerminationDownlinkBuilder {
    pub fn with_ue_session_id(mut self, ue_address: Ipv4Address) -> Self {
        self.ue_session_id = Some(ue_address);
        self
    }

    pub fn with_application_id(mut self, app_id: u8) -> Self {
        self.application_id = Some(app_id);
        self
    }

    pub fn with_counter_id(mut self, counter_id: u32) -> Self {
        self.counter_id = Some(counter_id);
        self
    }

    pub fn with_teid(mut self, teid: u32) -> Self {
        self.teid = Some(teid);
        self
    }

    pub fn with_qfi(mut self, qfi: u8) -> Self {
        self.qfi = Some(qfi);
        self
    }

    pub fn with_traffic_class(mut self, tc: u8) -> Self {
        self.traffic_class = Some(tc);
        self
    }

    pub fn needs_dropping(mut self, drop: bool) -> Self {
        self.drop = drop;
        self
    }

    pub fn build(self) -> Result<UpfTerminationDownlink, UpfEntityError> {
        let kind = UpfEntityType::TerminationDownlink;
        Ok(UpfTerminationDownlink {
            ue_session_id: self
                .ue_session_id
                .ok_or_else(|| UpfEntityError::missing(kind, "ue_session_id"))?,
            application_id: self
                .application_id
                .ok_or_else(|| UpfEntityError::missing(kind, "application_id"))?,
            counter_id: self
                .counter_id
                .ok_or_else(|| UpfEntityError::missing(kind, "counter_id"))?,
            teid: self.teid,
            qfi: self.qfi,
            traffic_class: self.traffic_class,
            drop: self.drop,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_uplink_termination() {
        let term = UpfTerminationUplink::builder()
            .with_ue_session_id(Ipv4Address::new(17, 0, 0, 1))
            .with_application_id(0)
            .with_counter_id(10)
            .with_traffic_class(3)
            .build()
            .unwrap();
        assert_eq!(
            term.to_string(),
            "UplinkTermination(ue_session_id=17.0.0.1, app_id=0, ctr_id=10, tc=3, drop=false)"
        );
    }

    #[test]
    fn test_uplink_termination_requires_counter() {
        let err = UpfTerminationUplink::builder()
            .with_ue_session_id(Ipv4Address::new(17, 0, 0, 1))
            .with_application_id(0)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            UpfEntityError::missing(UpfEntityType::TerminationUplink, "counter_id")
        );
    }

    #[test]
    fn test_downlink_termination_drop_has_no_tunnel() {
        let term = UpfTerminationDownlink::builder()
            .with_ue_session_id(Ipv4Address::new(17, 0, 0, 1))
            .with_application_id(1)
            .with_counter_id(11)
            .needs_dropping(true)
            .build()
            .unwrap();
        assert!(term.needs_dropping());
        assert_eq!(term.teid, None);
        assert_eq!(term.qfi, None);
        assert_eq!(
            term.to_string(),
            "DownlinkTermination(ue_session_id=17.0.0.1, app_id=1, ctr_id=11, drop=true)"
        );
    }
}
