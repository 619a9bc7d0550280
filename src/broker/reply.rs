use crate::{
    broker::request::Message,
    order::Order,
    types::{AgentID, DateTime, Duration, Id, OrderID, Price, Size},
};

/// Defines [`OddLotBroker`](crate::broker::OddLotBroker) reaction to a message.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BrokerAction<Symbol: Id> {
    /// Delay, in nanoseconds, to be applied by the kernel before delivery.
    pub delay: u64,
    pub content: BrokerActionKind<Symbol>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum BrokerActionKind<Symbol: Id> {
    BrokerToExchange(BrokerToExchange<Symbol>),
    BrokerToTrader(BrokerToTrader<Symbol>),
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BrokerToExchange<Symbol: Id> {
    pub exchange_id: AgentID,
    pub message: Message<Symbol>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BrokerToTrader<Symbol: Id> {
    pub trader_id: AgentID,
    pub event_dt: DateTime,
    pub content: BrokerReply<Symbol>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum BrokerReply<Symbol: Id>
{
    MarketClosed,

    FinalClose,

    OrderAccepted(Order<Symbol>),

    OrderExecuted(Order<Symbol>),

    OrderCancelled(Order<Symbol>),

    Filled(Filled),
}

#[derive(derive_more::Display, Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
/// Where the filled order was executed.
pub enum FillType {
    /// The order has just arrived and matched immediately in the broker book.
    #[display(fmt = "INSTANT")]
    Instant,
    /// The order was resting in the broker book.
    #[display(fmt = "BOOK")]
    Book,
    /// The order was executed by the exchange as a part of a combined order.
    #[display(fmt = "COMBINED_BOOK")]
    CombinedBook,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Filled {
    pub order_id: OrderID,
    pub sender: AgentID,
    pub fill_price: Price,
    pub fill_time: Duration,
    pub size: Size,
    /// Positive values are unfavourable for the order owner.
    pub slippage: Price,
    pub fill_type: FillType,
}

impl<Symbol: Id> BrokerAction<Symbol>
{
    pub fn get_trader_id(&self) -> Option<AgentID> {
        match &self.content {
            BrokerActionKind::BrokerToTrader(BrokerToTrader { trader_id, .. }) => Some(*trader_id),
            BrokerActionKind::BrokerToExchange(_) => None,
        }
    }

    pub fn get_exchange_id(&self) -> Option<AgentID> {
        match &self.content {
            BrokerActionKind::BrokerToExchange(BrokerToExchange { exchange_id, .. }) => {
                Some(*exchange_id)
            }
            BrokerActionKind::BrokerToTrader(_) => None,
        }
    }
}
