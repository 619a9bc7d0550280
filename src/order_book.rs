use {
    crate::{
        history::{History, HistoryEntry},
        order::Order,
        types::{AgentID, DateTime, Direction, Id, ObState, OrderID, Price, Size},
    },
    std::{
        collections::VecDeque,
        fmt::{Display, Formatter},
    },
    tracing::{debug, warn},
};


/// Order book of a broker for a single symbol.
///
/// Both sides consist of exactly one level: orders are kept in arrival order
/// regardless of their limit prices, and an incoming order only matches
/// a resting order of exactly the same size. Partial fills never happen.
pub struct BrokerOrderBook<Symbol: Id> {
    symbol: Symbol,
    /// The only bid level.
    bids: VecDeque<Order<Symbol>>,
    /// The only ask level.
    asks: VecDeque<Order<Symbol>>,
    history: History,
    last_trade: Option<Price>,
    last_update_dt: Option<DateTime>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
/// Order book event.
pub enum OrderBookEvent<Symbol: Id> {
    /// New order entered the book.
    Accepted(Order<Symbol>),
    /// New order matched with a resting one.
    /// Both snapshots carry their fills.
    Matched {
        incoming: Order<Symbol>,
        resting: Order<Symbol>,
    },
    /// Resting order was cancelled.
    Cancelled(Order<Symbol>),
    /// Total size and average price of the trades caused by a single submission.
    LastTrade {
        size: Size,
        price: Price,
    },
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
/// Error struct indicating that there is no order with such ID.
pub struct NoSuchID;

impl Display for NoSuchID {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "No such ID is currently active in the order book")
    }
}

impl std::error::Error for NoSuchID {}

impl<Symbol: Id> BrokerOrderBook<Symbol>
{
    /// Creates an empty book.
    ///
    /// # Arguments
    ///
    /// * `symbol` — The only symbol accepted by the book.
    /// * `history_depth` — Number of history slots to retain.
    pub fn new(symbol: Symbol, history_depth: usize) -> Self {
        BrokerOrderBook {
            symbol,
            bids: Default::default(),
            asks: Default::default(),
            history: History::new(history_depth),
            last_trade: None,
            last_update_dt: None,
        }
    }

    #[inline]
    pub fn symbol(&self) -> Symbol {
        self.symbol
    }

    #[inline]
    pub fn history(&self) -> &History {
        &self.history
    }

    #[inline]
    /// Average price of the most recent trade.
    pub fn last_trade(&self) -> Option<Price> {
        self.last_trade
    }

    #[inline]
    pub fn last_update_dt(&self) -> Option<DateTime> {
        self.last_update_dt
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    #[inline]
    fn side(&self, direction: Direction) -> &VecDeque<Order<Symbol>> {
        match direction {
            Direction::Buy => &self.bids,
            Direction::Sell => &self.asks,
        }
    }

    #[inline]
    fn side_mut(&mut self, direction: Direction) -> &mut VecDeque<Order<Symbol>> {
        match direction {
            Direction::Buy => &mut self.bids,
            Direction::Sell => &mut self.asks,
        }
    }

    #[inline]
    /// Yields resting orders of the given side in arrival order.
    pub fn resting(&self, direction: Direction) -> impl Iterator<Item=&Order<Symbol>> + '_ {
        self.side(direction).iter()
    }

    pub fn contains(&self, id: OrderID) -> bool {
        self.bids.iter().chain(self.asks.iter()).any(|order| order.id == id)
    }

    pub fn get(&self, id: OrderID) -> Option<&Order<Symbol>> {
        self.bids.iter().chain(self.asks.iter()).find(|order| order.id == id)
    }

    #[inline]
    /// Total resting bid size.
    pub fn bid_volume(&self) -> Size {
        self.bids.iter().map(|order| order.size).sum()
    }

    #[inline]
    /// Total resting ask size.
    pub fn ask_volume(&self) -> Size {
        self.asks.iter().map(|order| order.size).sum()
    }

    pub fn get_ob_state(&self) -> ObState {
        let ids_and_sizes = |side: &VecDeque<Order<Symbol>>| side.iter()
            .map(|order| (order.id, order.size))
            .collect();
        ObState {
            bids: ids_and_sizes(&self.bids),
            asks: ids_and_sizes(&self.asks),
        }
    }

    /// Matches the limit order against the book or enters it into the book.
    ///
    /// Orders with a foreign symbol, a non-positive size or without a limit price
    /// are discarded without any state change or event.
    ///
    /// # Arguments
    ///
    /// * `dt` — Current datetime.
    /// * `order` — Order to submit.
    /// * `callback` — Receives events in the order they happen.
    pub fn submit(
        &mut self,
        dt: DateTime,
        order: Order<Symbol>,
        mut callback: impl FnMut(OrderBookEvent<Symbol>))
    {
        if order.symbol != self.symbol {
            warn!(
                "{dt} :: Order {} discarded. Its symbol {} does not match the order book symbol {}",
                order.id, order.symbol, self.symbol
            );
            return;
        }
        if !order.size.is_positive() {
            warn!(
                "{dt} :: Order {} discarded. Size ({}) must be a positive integer",
                order.id, order.size
            );
            return;
        }
        let price = if let Some(price) = order.limit_price {
            price
        } else {
            warn!("{dt} :: Order {} discarded. Broker book accepts limit orders only", order.id);
            return;
        };

        self.history.enter(
            order.id,
            HistoryEntry::new(dt, order.size, order.direction, order.limit_price),
        );

        let mut remaining = order;
        let mut executed = Vec::new();
        // Exact-size matching leaves nothing after the first match,
        // but the size bound is what terminates the loop
        while remaining.size.is_positive() {
            if let Some(resting) = self.take_match(&remaining) {
                let resting = resting.filled(price, dt);
                let incoming = Order { size: resting.size, ..remaining }.filled(price, dt);
                self.history.record_transaction(order.id, dt, order.size);
                if !self.history.record_transaction(resting.id, dt, resting.size) {
                    debug!("{dt} :: Order {} has aged out of the history window", resting.id)
                }
                debug!(
                    "{dt} :: MATCHED: new order {} vs old order {}: {} @ {}",
                    incoming.id, resting.id, incoming.size, price
                );
                remaining.size -= incoming.size;
                executed.push((incoming.size, price));
                callback(OrderBookEvent::Matched { incoming, resting })
            } else {
                debug!("{dt} :: ACCEPTED: new order {}", remaining.id);
                self.side_mut(remaining.direction).push_back(remaining);
                callback(OrderBookEvent::Accepted(remaining));
                break;
            }
        }

        if let Some((size, price)) = Price::volume_weighted(&executed) {
            debug!("{dt} :: Last trade: {size} @ {price}");
            self.last_trade = Some(price);
            callback(OrderBookEvent::LastTrade { size, price });
            self.history.advance()
        }
        self.last_update_dt = Some(dt)
    }

    /// Removes and returns the first resting order of the opposite side
    /// having exactly the remaining size of the given order.
    fn take_match(&mut self, order: &Order<Symbol>) -> Option<Order<Symbol>> {
        let opposite_side = self.side_mut(order.direction.opposite());
        let position = opposite_side.iter().position(|resting| resting.size == order.size)?;
        opposite_side.remove(position)
    }

    fn locate(&self, mut predicate: impl FnMut(&Order<Symbol>) -> bool) -> Option<(Direction, usize)> {
        [Direction::Buy, Direction::Sell].into_iter().find_map(
            |direction| self.side(direction).iter()
                .position(&mut predicate)
                .map(|position| (direction, position))
        )
    }

    fn remove_at(&mut self, dt: DateTime, direction: Direction, position: usize) -> Option<Order<Symbol>> {
        let removed = self.side_mut(direction).remove(position)?;
        self.history.record_cancellation(removed.id, dt, removed.size);
        self.last_update_dt = Some(dt);
        Some(removed)
    }

    /// Cancels the resting order, returning it if successful.
    ///
    /// # Arguments
    ///
    /// * `dt` — Current datetime.
    /// * `id` — Order ID to cancel.
    /// * `quiet` — Suppresses the [`OrderBookEvent::Cancelled`] event.
    /// * `callback` — Receives the cancellation event.
    pub fn cancel(
        &mut self,
        dt: DateTime,
        id: OrderID,
        quiet: bool,
        mut callback: impl FnMut(OrderBookEvent<Symbol>)) -> Result<Order<Symbol>, NoSuchID>
    {
        let (direction, position) = self.locate(|order| order.id == id).ok_or(NoSuchID)?;
        let cancelled = self.remove_at(dt, direction, position).ok_or(NoSuchID)?;
        if quiet {
            debug!("{dt} :: Order {id} quietly removed from the book");
        } else {
            debug!("{dt} :: CANCELLED: order {id}");
            callback(OrderBookEvent::Cancelled(cancelled))
        }
        Ok(cancelled)
    }

    /// Cancels the resting order only if it belongs to `owner`.
    /// Order IDs are not unique across owners, so orders of other agents sharing the ID are left intact.
    pub fn cancel_owned(
        &mut self,
        dt: DateTime,
        id: OrderID,
        owner: AgentID,
        mut callback: impl FnMut(OrderBookEvent<Symbol>)) -> Result<Order<Symbol>, NoSuchID>
    {
        let (direction, position) = self.locate(|order| order.id == id && order.agent_id == owner)
            .ok_or(NoSuchID)?;
        let cancelled = self.remove_at(dt, direction, position).ok_or(NoSuchID)?;
        debug!("{dt} :: CANCELLED: order {id} of {owner}");
        callback(OrderBookEvent::Cancelled(cancelled));
        Ok(cancelled)
    }

    /// Removes the resting orders at the given `positions` of one side without any event,
    /// returning them in the order of `positions`. Positions out of range are skipped.
    ///
    /// Used when the orders are absorbed into a combined order rather than cancelled.
    pub fn absorb(&mut self, dt: DateTime, direction: Direction, positions: &[usize]) -> Vec<Order<Symbol>>
    {
        let side = self.side(direction);
        let absorbed: Vec<Order<Symbol>> = positions.iter()
            .filter_map(|&position| side.get(position).copied())
            .collect();
        let mut descending = positions.to_vec();
        descending.sort_unstable_by(|a, b| b.cmp(a));
        descending.dedup();
        for position in descending {
            if let Some(removed) = self.remove_at(dt, direction, position) {
                debug!("{dt} :: Order {} absorbed", removed.id)
            }
        }
        absorbed
    }
}
