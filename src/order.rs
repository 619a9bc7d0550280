use crate::types::{AgentID, DateTime, Direction, Duration, Id, OrderID, Price, Size};

#[derive(derive_more::Display, Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum OrderKind {
    Limit,
    Market,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
/// Execution outcome of an order.
pub struct Fill {
    /// Execution price.
    pub price: Price,
    /// Time elapsed between the order placement and its execution.
    pub time: Duration,
    /// Signed slippage against the order reference price.
    pub slippage: Price,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
/// Client instruction together with its execution outcome.
///
/// Orders are plain values: every notification carries its own snapshot,
/// so stamping a fill onto a copy never touches the order resting in a book.
pub struct Order<Symbol: Id> {
    /// Order identifier. Unique per broker only.
    pub id: OrderID,
    /// Owner of the order.
    pub agent_id: AgentID,
    pub symbol: Symbol,
    pub size: Size,
    pub direction: Direction,
    /// Datetime of the order placement by its owner.
    pub time_placed: DateTime,
    pub kind: OrderKind,
    /// Always set for limit orders.
    pub limit_price: Option<Price>,
    /// Reference price used when the order itself carries no limit price.
    pub best: Option<Price>,
    /// Whether the order is a synthetic combination of several client orders.
    pub combined: bool,
    pub fill: Option<Fill>,
}

impl<Symbol: Id> Order<Symbol>
{
    pub fn limit(
        agent_id: AgentID,
        time_placed: DateTime,
        symbol: Symbol,
        size: Size,
        direction: Direction,
        price: Price,
        id: OrderID) -> Self
    {
        Order {
            id,
            agent_id,
            symbol,
            size,
            direction,
            time_placed,
            kind: OrderKind::Limit,
            limit_price: Some(price),
            best: None,
            combined: false,
            fill: None,
        }
    }

    pub fn market(
        agent_id: AgentID,
        time_placed: DateTime,
        symbol: Symbol,
        size: Size,
        direction: Direction,
        id: OrderID) -> Self
    {
        Order {
            id,
            agent_id,
            symbol,
            size,
            direction,
            time_placed,
            kind: OrderKind::Market,
            limit_price: None,
            best: None,
            combined: false,
            fill: None,
        }
    }

    /// Market order owned by the broker and standing for several client orders.
    pub fn combined(
        broker: AgentID,
        time_placed: DateTime,
        symbol: Symbol,
        size: Size,
        direction: Direction,
        best: Option<Price>,
        id: OrderID) -> Self
    {
        Order {
            best,
            combined: true,
            ..Self::market(broker, time_placed, symbol, size, direction, id)
        }
    }

    /// Re-expresses the order as a limit order at `price`, keeping its identity.
    pub fn to_limit(&self, price: Price) -> Self {
        Order {
            kind: OrderKind::Limit,
            limit_price: Some(price),
            best: Some(price),
            ..*self
        }
    }

    #[inline]
    pub fn reference_price(&self) -> Option<Price> {
        self.limit_price.or(self.best)
    }

    #[inline]
    pub fn is_filled(&self) -> bool {
        self.fill.is_some()
    }

    #[inline]
    pub fn is_buy(&self) -> bool {
        self.direction == Direction::Buy
    }

    /// Returns a snapshot of the order executed at `price` at the datetime `now`.
    /// Slippage is measured against the order's own reference price,
    /// and is zero when the order has none.
    pub fn filled(&self, price: Price, now: DateTime) -> Self {
        let slippage = self.reference_price()
            .map(|reference| self.direction.slippage(price, reference))
            .unwrap_or(Price(0));
        Order {
            fill: Some(
                Fill {
                    price,
                    time: now - self.time_placed,
                    slippage,
                }
            ),
            ..*self
        }
    }
}

/// Hands out order IDs for orders created by a single broker.
///
/// IDs start at `broker * block`, so brokers with different IDs
/// do not collide as long as each of them creates fewer than `block` orders.
#[derive(Debug, Clone)]
pub struct OrderIdAllocator {
    next_order_id: OrderID,
}

impl OrderIdAllocator
{
    pub const DEFAULT_BLOCK: u64 = 1000;

    pub fn new(broker: AgentID, block: u64) -> Self {
        OrderIdAllocator {
            next_order_id: OrderID(broker.0.saturating_mul(block)),
        }
    }

    pub fn next_id(&mut self) -> OrderID {
        let id = self.next_order_id;
        self.next_order_id += OrderID(1);
        id
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::types::Date,
    };

    fn dt(h: u32, m: u32, s: u32) -> DateTime {
        Date::from_ymd_opt(2020, 1, 2).unwrap().and_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn test_filled_copy_is_independent()
    {
        let order = Order::limit(AgentID(7), dt(9, 30, 0), "ABM", Size(100), Direction::Buy, Price(50), OrderID(1));
        let filled = order.filled(Price(52), dt(9, 31, 0));
        assert_eq!(order.fill, None);
        assert_eq!(
            filled.fill,
            Some(Fill { price: Price(52), time: Duration::minutes(1), slippage: Price(2) })
        );
        assert!(filled.is_filled());
    }

    #[test]
    fn test_to_limit_keeps_identity()
    {
        let order = Order::market(AgentID(3), dt(10, 0, 0), "ABM", Size(3), Direction::Sell, OrderID(42));
        let limit = order.to_limit(Price(99));
        assert_eq!(limit.id, OrderID(42));
        assert_eq!(limit.agent_id, AgentID(3));
        assert_eq!(limit.time_placed, order.time_placed);
        assert_eq!(limit.kind, OrderKind::Limit);
        assert_eq!(limit.limit_price, Some(Price(99)));
        assert_eq!(limit.best, Some(Price(99)));
    }

    #[test]
    fn test_market_order_without_reference_has_zero_slippage()
    {
        let order = Order::market(AgentID(3), dt(10, 0, 0), "ABM", Size(3), Direction::Sell, OrderID(42));
        let filled = order.filled(Price(10), dt(10, 0, 5));
        assert_eq!(filled.fill.map(|fill| fill.slippage), Some(Price(0)));
    }

    #[test]
    fn test_allocator_is_seeded_from_broker()
    {
        let mut ids = OrderIdAllocator::new(AgentID(2), OrderIdAllocator::DEFAULT_BLOCK);
        assert_eq!(ids.next_id(), OrderID(2000));
        assert_eq!(ids.next_id(), OrderID(2001));
        assert_eq!(ids.next_id(), OrderID(2002));
    }
}
