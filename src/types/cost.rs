use std::fmt;
use std::ops::AddAssign;

/// A newtype wrapper for cost values in USD
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Cost(f64);

impl Cost {
    /// Create a new Cost from a raw value
    #[inline]
    pub fn new(value: f64) -> Self {
        Cost(value)
    }

    /// Get the raw value
    #[inline]
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Format as currency string. Small amounts keep more precision:
    /// below one cent four decimals, below one dollar three, otherwise two.
    pub fn to_formatted_string(&self) -> String {
        // Handle negative zero case
        let value = if self.0 == 0.0 { 0.0 } else { self.0 };
        if value < 0.01 {
            format!("${:.4}", value)
        } else if value < 1.0 {
            format!("${:.3}", value)
        } else {
            format!("${:.2}", value)
        }
    }

    /// Check if the cost is positive
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > 0.0
    }
}

impl AddAssign<f64> for Cost {
    fn add_assign(&mut self, rhs: f64) {
        self.0 += rhs;
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_formatted_string())
    }
}

impl From<f64> for Cost {
    fn from(value: f64) -> Self {
        Cost(value)
    }
}

impl From<Cost> for f64 {
    fn from(cost: Cost) -> Self {
        cost.0
    }
}
