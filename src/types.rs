pub use chrono::{
    Duration,
    NaiveDate as Date,
    NaiveDateTime as DateTime,
};

use {
    derive_more::{Add, AddAssign, From, FromStr, Into, Neg, Sub, SubAssign, Sum},
    std::{fmt::{Debug, Display}, hash::Hash},
};

pub trait Id: Hash + Ord + Copy + Send + Sync + Display + Debug {}

impl<T: Hash + Ord + Copy + Send + Sync + Display + Debug> Id for T {}

pub trait Named<Name: Id> {
    fn get_name(&self) -> Name;
}

#[derive(Debug, PartialOrd, PartialEq, Ord, Eq, Hash, Clone, Copy)]
#[derive(derive_more::Display, FromStr, Add, Sub, AddAssign, SubAssign, From, Into)]
pub struct OrderID(pub u64);

/// Identifier of any simulated agent: traders, brokers and exchanges share one namespace.
#[derive(Debug, PartialOrd, PartialEq, Ord, Eq, Hash, Clone, Copy)]
#[derive(derive_more::Display, FromStr, From, Into)]
pub struct AgentID(pub u64);

/// Price expressed in price steps.
#[derive(Debug, PartialOrd, PartialEq, Ord, Eq, Hash, Clone, Copy)]
#[derive(derive_more::Display, Add, Sub, AddAssign, SubAssign, Neg, From, Into)]
pub struct Price(pub i64);

#[derive(Debug, PartialOrd, PartialEq, Ord, Eq, Hash, Clone, Copy)]
#[derive(derive_more::Display, FromStr, Add, Sub, AddAssign, SubAssign, Sum, From, Into)]
pub struct Size(pub i64);

#[derive(derive_more::Display, Debug, PartialEq, PartialOrd, Eq, Ord, Hash, Clone, Copy)]
pub enum Direction {
    Buy,
    Sell,
}

/// Resting orders of the broker book as `(OrderID, Size)` pairs in arrival order.
#[derive(Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct ObState {
    pub bids: Vec<(OrderID, Size)>,
    pub asks: Vec<(OrderID, Size)>,
}

impl Direction
{
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Direction::Buy => Direction::Sell,
            Direction::Sell => Direction::Buy,
        }
    }

    /// Signed slippage of a fill against the reference price.
    /// Positive values are unfavourable for the order owner.
    #[inline]
    pub fn slippage(self, fill_price: Price, reference_price: Price) -> Price {
        match self {
            Direction::Buy => fill_price - reference_price,
            Direction::Sell => reference_price - fill_price,
        }
    }
}

impl Size
{
    #[inline]
    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Whether the size is a whole number of tradable units.
    #[inline]
    pub fn is_multiple_of(self, unit: Size) -> bool {
        unit.0 > 0 && self.0 % unit.0 == 0
    }
}

impl Price
{
    /// Volume-weighted average of `(size, price)` pairs rounded to the nearest price step.
    /// Returns `None` if the total size is not positive.
    pub fn volume_weighted<'a>(trades: impl IntoIterator<Item=&'a (Size, Price)>) -> Option<(Size, Self)>
    {
        let (total_size, notional) = trades.into_iter().fold(
            (0_i64, 0_i128),
            |(total_size, notional), (Size(size), Price(price))| {
                (total_size + size, notional + *size as i128 * *price as i128)
            },
        );
        if total_size <= 0 {
            return None;
        }
        let average = (notional as f64 / total_size as f64).round() as i64;
        Some((Size(total_size), Price(average)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slippage_sign()
    {
        assert_eq!(Direction::Buy.slippage(Price(52), Price(50)), Price(2));
        assert_eq!(Direction::Sell.slippage(Price(52), Price(50)), Price(-2));
        assert_eq!(Direction::Sell.slippage(Price(50), Price(50)), Price(0));
    }

    #[test]
    fn test_volume_weighted_rounding()
    {
        let trades = [(Size(1), Price(10)), (Size(2), Price(11))];
        assert_eq!(Price::volume_weighted(&trades), Some((Size(3), Price(11))));
        assert_eq!(Price::volume_weighted(&[] as &[(Size, Price)]), None);
    }

    #[test]
    fn test_multiple_of_unit()
    {
        assert!(Size(10).is_multiple_of(Size(5)));
        assert!(!Size(7).is_multiple_of(Size(5)));
        assert!(!Size(10).is_multiple_of(Size(0)));
    }
}
