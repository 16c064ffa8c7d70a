//! Status and category enums for depot entities.

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
///
/// Only [`OrderStatus::Completed`] orders count toward sales reports; the
/// other two states describe orders still in flight or parked by an admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    /// Order is out with a courier.
    #[default]
    InDelivery,
    /// Transaction concluded successfully.
    Completed,
    /// Order was put on hold (payment issue, customer unreachable, ...).
    Suspended,
}

impl OrderStatus {
    /// Whether this order contributes to revenue reporting.
    #[must_use]
    pub const fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InDelivery => write!(f, "in-delivery"),
            Self::Completed => write!(f, "completed"),
            Self::Suspended => write!(f, "suspended"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in-delivery" => Ok(Self::InDelivery),
            "completed" => Ok(Self::Completed),
            "suspended" => Ok(Self::Suspended),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// Product category for the depot catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    /// 19L refill gallons, the depot's main product line.
    Gallon,
    /// Sealed bottles (330ml-1.5L).
    Bottle,
    /// Sealed cups (220-240ml), sold by the carton.
    Cup,
    #[default]
    Other,
}

impl ProductCategory {
    /// Human-readable label for document rendering.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Gallon => "Gallon",
            Self::Bottle => "Bottle",
            Self::Cup => "Cup",
            Self::Other => "Other",
        }
    }
}

impl std::fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gallon => write!(f, "gallon"),
            Self::Bottle => write!(f, "bottle"),
            Self::Cup => write!(f, "cup"),
            Self::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for ProductCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gallon" => Ok(Self::Gallon),
            "bottle" => Ok(Self::Bottle),
            "cup" => Ok(Self::Cup),
            "other" => Ok(Self::Other),
            _ => Err(format!("invalid product category: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_order_status_roundtrip() {
        for status in [
            OrderStatus::InDelivery,
            OrderStatus::Completed,
            OrderStatus::Suspended,
        ] {
            let s = status.to_string();
            assert_eq!(OrderStatus::from_str(&s), Ok(status));
        }
    }

    #[test]
    fn test_order_status_serde_kebab_case() {
        let json = serde_json::to_string(&OrderStatus::InDelivery).expect("serialize");
        assert_eq!(json, "\"in-delivery\"");
    }

    #[test]
    fn test_only_completed_counts() {
        assert!(OrderStatus::Completed.is_completed());
        assert!(!OrderStatus::InDelivery.is_completed());
        assert!(!OrderStatus::Suspended.is_completed());
    }

    #[test]
    fn test_category_roundtrip() {
        for cat in [
            ProductCategory::Gallon,
            ProductCategory::Bottle,
            ProductCategory::Cup,
            ProductCategory::Other,
        ] {
            let s = cat.to_string();
            assert_eq!(ProductCategory::from_str(&s), Ok(cat));
        }
    }

    #[test]
    fn test_invalid_status_rejected() {
        assert!(OrderStatus::from_str("finished").is_err());
        assert!(ProductCategory::from_str("jerrycan").is_err());
    }
}
