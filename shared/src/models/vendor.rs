//! Vendor status model
//!
//! Vendor master data lives outside this subsystem; only the status
//! matters here, as a guard at purchase order generation.

use serde::{Deserialize, Serialize};

/// Vendor standing with the business
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VendorStatus {
    Active,
    Inactive,
    Blacklisted,
}

impl VendorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VendorStatus::Active => "active",
            VendorStatus::Inactive => "inactive",
            VendorStatus::Blacklisted => "blacklisted",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(VendorStatus::Active),
            "inactive" => Some(VendorStatus::Inactive),
            "blacklisted" => Some(VendorStatus::Blacklisted),
            _ => None,
        }
    }

    /// Purchase orders may only be generated against active vendors
    pub fn can_receive_orders(&self) -> bool {
        matches!(self, VendorStatus::Active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_active_vendors_receive_orders() {
        assert!(VendorStatus::Active.can_receive_orders());
        assert!(!VendorStatus::Inactive.can_receive_orders());
        assert!(!VendorStatus::Blacklisted.can_receive_orders());
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            VendorStatus::Active,
            VendorStatus::Inactive,
            VendorStatus::Blacklisted,
        ] {
            assert_eq!(VendorStatus::from_str(status.as_str()), Some(status));
        }
    }
}
