//! Status enums for orders and payments.

use serde::{Deserialize, Serialize};

/// Order lifecycle status as reported by the backend.
///
/// The backend stores these capitalized (`"Pending"`, `"Shipped"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Returns true once the order can no longer change.
    #[must_use]
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    /// Case-insensitive, so `shipped` and `Shipped` both parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("invalid order status: {s}"))
    }
}

/// Payment method chosen at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Credit or debit card.
    #[default]
    Card,
    /// UPI payment.
    Upi,
    /// Net banking.
    Netbanking,
    /// Cash on delivery.
    Cod,
}

impl PaymentMethod {
    /// All methods in the order the checkout page lists them.
    pub const ALL: [Self; 4] = [Self::Card, Self::Upi, Self::Netbanking, Self::Cod];

    /// Human readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Card => "Credit / Debit Card",
            Self::Upi => "UPI Payment",
            Self::Netbanking => "Net Banking",
            Self::Cod => "Cash on Delivery",
        }
    }

    /// Wire name sent to the backend.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Upi => "upi",
            Self::Netbanking => "netbanking",
            Self::Cod => "cod",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "card" => Ok(Self::Card),
            "upi" => Ok(Self::Upi),
            "netbanking" => Ok(Self::Netbanking),
            "cod" => Ok(Self::Cod),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}
