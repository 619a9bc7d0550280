use crate::{
    order::Order,
    types::{AgentID, Duration, Id},
};

#[derive(derive_more::Display, Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
/// Kind of an inbound broker message.
pub enum MessageKind {
    #[display(fmt = "LIMIT_ORDER")]
    LimitOrder,
    #[display(fmt = "MARKET_ORDER")]
    MarketOrder,
    #[display(fmt = "CANCEL_ORDER")]
    CancelOrder,
    #[display(fmt = "MODIFY_ORDER")]
    ModifyOrder,
    #[display(fmt = "ORDER_ACCEPTED")]
    OrderAccepted,
    #[display(fmt = "ORDER_EXECUTED")]
    OrderExecuted,
    #[display(fmt = "ORDER_CANCELLED")]
    OrderCancelled,
    #[display(fmt = "QUERY_LAST_TRADE")]
    QueryLastTrade,
    #[display(fmt = "QUERY_SPREAD")]
    QuerySpread,
    #[display(fmt = "QUERY_ORDER_STREAM")]
    QueryOrderStream,
    #[display(fmt = "QUERY_TRANSACTED_VOLUME")]
    QueryTransactedVolume,
}

impl MessageKind
{
    /// Whether the message places, cancels or modifies an order
    /// and thus cannot be served while the market is closed.
    #[inline]
    pub fn is_order_flow(self) -> bool {
        matches!(
            self,
            MessageKind::LimitOrder
                | MessageKind::MarketOrder
                | MessageKind::CancelOrder
                | MessageKind::ModifyOrder
        )
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
/// Message delivered to the broker by the kernel.
pub struct Message<Symbol: Id> {
    /// Agent that sent the message.
    pub sender: AgentID,
    pub body: MessageBody<Symbol>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub enum MessageBody<Symbol: Id>
{
    LimitOrder(Order<Symbol>),

    MarketOrder(Order<Symbol>),

    CancelOrder(Order<Symbol>),

    ModifyOrder {
        order: Order<Symbol>,
        new_order: Order<Symbol>,
    },

    OrderAccepted(Order<Symbol>),

    OrderExecuted(Order<Symbol>),

    OrderCancelled(Order<Symbol>),

    Query(ExchangeQuery<Symbol>),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
/// Market data queries. The broker passes them through to the exchange.
pub enum ExchangeQuery<Symbol: Id>
{
    LastTrade(Symbol),

    Spread {
        symbol: Symbol,
        depth: usize,
    },

    OrderStream {
        symbol: Symbol,
        length: usize,
    },

    TransactedVolume {
        symbol: Symbol,
        lookback: Duration,
    },
}

impl<Symbol: Id> MessageBody<Symbol>
{
    pub fn kind(&self) -> MessageKind {
        match self {
            MessageBody::LimitOrder(_) => MessageKind::LimitOrder,
            MessageBody::MarketOrder(_) => MessageKind::MarketOrder,
            MessageBody::CancelOrder(_) => MessageKind::CancelOrder,
            MessageBody::ModifyOrder { .. } => MessageKind::ModifyOrder,
            MessageBody::OrderAccepted(_) => MessageKind::OrderAccepted,
            MessageBody::OrderExecuted(_) => MessageKind::OrderExecuted,
            MessageBody::OrderCancelled(_) => MessageKind::OrderCancelled,
            MessageBody::Query(ExchangeQuery::LastTrade(_)) => MessageKind::QueryLastTrade,
            MessageBody::Query(ExchangeQuery::Spread { .. }) => MessageKind::QuerySpread,
            MessageBody::Query(ExchangeQuery::OrderStream { .. }) => MessageKind::QueryOrderStream,
            MessageBody::Query(ExchangeQuery::TransactedVolume { .. }) => {
                MessageKind::QueryTransactedVolume
            }
        }
    }
}

impl<Symbol: Id> Message<Symbol>
{
    #[inline]
    pub fn new(sender: AgentID, body: MessageBody<Symbol>) -> Self {
        Message { sender, body }
    }

    #[inline]
    pub fn kind(&self) -> MessageKind {
        self.body.kind()
    }
}
