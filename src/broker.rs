use {
    crate::{
        broker::{
            reply::{
                BrokerAction,
                BrokerActionKind,
                BrokerReply,
                BrokerToExchange,
                BrokerToTrader,
                Filled,
                FillType,
            },
            request::{Message, MessageBody},
        },
        config::BrokerConfig,
        event_log::{EventKind, EventLog},
        exchange::ExchangeView,
        lot_combination::find_divisible_subset,
        order::{Order, OrderIdAllocator},
        order_book::{BrokerOrderBook, OrderBookEvent},
        types::{AgentID, DateTime, Id, Named, OrderID, Size},
        utils::queue::MessageReceiver,
    },
    std::collections::HashMap,
    tracing::{debug, info, warn},
};

pub mod reply;
pub mod request;


/// Broker that nets client orders against its own book
/// and combines odd lots into tradable units before forwarding them to the exchange.
pub struct OddLotBroker<Symbol: Id> {
    name: AgentID,
    exchange_id: AgentID,
    config: BrokerConfig,

    order_books: HashMap<Symbol, BrokerOrderBook<Symbol>>,
    /// Combined Order ID -> Client orders it stands for
    combined_orders: HashMap<OrderID, Vec<Order<Symbol>>>,

    order_ids: OrderIdAllocator,
    event_log: EventLog,
}

impl<Symbol: Id> Named<AgentID> for OddLotBroker<Symbol>
{
    fn get_name(&self) -> AgentID {
        self.name
    }
}

impl<Symbol: Id> OddLotBroker<Symbol>
{
    /// Creates a broker with an empty book for each of the `symbols`.
    ///
    /// # Arguments
    ///
    /// * `name` — Broker ID. Also seeds the IDs of the combined orders.
    /// * `exchange_id` — ID of the exchange to forward orders to.
    /// * `symbols` — Symbols traded on the exchange.
    /// * `config` — Broker settings.
    pub fn new(
        name: AgentID,
        exchange_id: AgentID,
        symbols: impl IntoIterator<Item=Symbol>,
        config: BrokerConfig) -> Self
    {
        OddLotBroker {
            name,
            exchange_id,
            config,
            order_books: symbols.into_iter()
                .map(|symbol| (symbol, BrokerOrderBook::new(symbol, config.history_depth)))
                .collect(),
            combined_orders: Default::default(),
            order_ids: OrderIdAllocator::new(name, config.id_block),
            event_log: EventLog::new(),
        }
    }

    #[inline]
    pub fn config(&self) -> &BrokerConfig {
        &self.config
    }

    #[inline]
    pub fn exchange_id(&self) -> AgentID {
        self.exchange_id
    }

    #[inline]
    pub fn order_book(&self, symbol: Symbol) -> Option<&BrokerOrderBook<Symbol>> {
        self.order_books.get(&symbol)
    }

    #[cfg(test)]
    pub(crate) fn order_book_mut(&mut self, symbol: Symbol) -> Option<&mut BrokerOrderBook<Symbol>> {
        self.order_books.get_mut(&symbol)
    }

    /// Client orders standing behind the combined order,
    /// until the exchange reports its execution or cancellation.
    #[inline]
    pub fn constituents(&self, combined_order_id: OrderID) -> Option<&[Order<Symbol>]> {
        self.combined_orders.get(&combined_order_id).map(Vec::as_slice)
    }

    #[inline]
    pub fn pending_combined_orders(&self) -> usize {
        self.combined_orders.len()
    }

    #[inline]
    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    /// Defines the broker reaction to any incoming message.
    /// Called whenever the kernel delivers a message to the broker.
    ///
    /// # Arguments
    ///
    /// * `exchange` — Read-only view of the exchange the broker is connected to.
    /// * `message_receiver` — Proxy providing pushing access to the outgoing action queue.
    /// * `message` — Received message to be reacted to.
    pub fn process_message(
        &mut self,
        exchange: &impl ExchangeView<Symbol>,
        mut message_receiver: MessageReceiver<BrokerAction<Symbol>>,
        message: Message<Symbol>)
    {
        let now = exchange.current_datetime();
        let kind = message.kind();

        if exchange.is_market_closed() && kind.is_order_flow() {
            debug!("{now} :: {kind} from {} rejected. Market is closed", message.sender);
            message_receiver.push(
                self.create_broker_reply(message.sender, now, BrokerReply::MarketClosed)
            );
            return;
        }
        if exchange.is_final_close() {
            debug!("{now} :: {kind} from {} rejected. Simulation is over", message.sender);
            message_receiver.push(
                self.create_broker_reply(message.sender, now, BrokerReply::FinalClose)
            );
            return;
        }

        match message.body {
            MessageBody::LimitOrder(order) => {
                // Limit orders enter the broker book only when synthesized from odd-lot market orders
                debug!("{now} :: Client limit order {} ignored", order.id)
            }
            MessageBody::MarketOrder(order) => {
                self.handle_market_order(exchange, &mut message_receiver, now, order)
            }
            MessageBody::CancelOrder(order) => {
                self.handle_cancel_order(&mut message_receiver, now, message, order)
            }
            MessageBody::OrderAccepted(order) => {
                self.handle_combined_order_accepted(&mut message_receiver, now, order)
            }
            MessageBody::OrderExecuted(order) => {
                if message.sender == self.exchange_id {
                    self.handle_combined_order_executed(&mut message_receiver, now, order)
                } else {
                    // Executions in the broker book are reported when they happen
                    debug!("{now} :: Execution of order {} reported by {}", order.id, message.sender)
                }
            }
            MessageBody::OrderCancelled(order) => {
                self.handle_combined_order_cancelled(&mut message_receiver, now, order)
            }
            MessageBody::ModifyOrder { .. } | MessageBody::Query(_) => {
                message_receiver.push(self.create_broker_request(message))
            }
        }
    }

    fn handle_market_order(
        &mut self,
        exchange: &impl ExchangeView<Symbol>,
        message_receiver: &mut MessageReceiver<BrokerAction<Symbol>>,
        now: DateTime,
        order: Order<Symbol>)
    {
        if !self.order_books.contains_key(&order.symbol) {
            warn!("{now} :: Market order {} discarded. Unknown symbol: {}", order.id, order.symbol);
            return;
        }
        if !order.size.is_positive() {
            warn!(
                "{now} :: Market order {} discarded. Size ({}) must be a positive integer",
                order.id, order.size
            );
            return;
        }

        if order.size.is_multiple_of(self.config.tradable_unit) {
            debug!("{now} :: Even lot {} of size {} sent to exchange", order.id, order.size);
            self.event_log.log(now, EventKind::OrderSentToExchange);
            message_receiver.push(self.create_exchange_order(order));
            return;
        }

        if let Some(combined) = self.combine_odd_lot(now, order) {
            info!(
                "{now} :: Odd lot {} of size {} combined into order {} of size {}",
                order.id, order.size, combined.id, combined.size
            );
            self.event_log.log(now, EventKind::OrderCombinedToExchange);
            message_receiver.push(self.create_exchange_order(combined));
            return;
        }

        if let Some(price) = exchange.best_opposite(order.symbol, order.is_buy()) {
            debug!("{now} :: Odd lot {} sent to book at {price}", order.id);
            self.event_log.log(now, EventKind::OrderSentToBook);
            self.submit_to_book(message_receiver, now, order.to_limit(price))
        } else {
            debug!("{now} :: Odd lot {} sent to exchange. No reference price", order.id);
            self.event_log.log(now, EventKind::OrderSentToExchange);
            message_receiver.push(self.create_exchange_order(order))
        }
    }

    /// Combines the odd-lot order with orders resting on the same side of the broker book
    /// so that the total size is a multiple of the tradable unit.
    ///
    /// The selected resting orders are removed from the book without notifying their owners:
    /// they are not cancelled but absorbed into the returned combined order.
    fn combine_odd_lot(&mut self, now: DateTime, order: Order<Symbol>) -> Option<Order<Symbol>>
    {
        let order_book = self.order_books.get_mut(&order.symbol)?;
        // Positions rather than IDs: order IDs are only unique per owner
        let resting: Vec<(usize, Size)> = order_book.resting(order.direction)
            .map(|resting| resting.size)
            .enumerate()
            .collect();
        if resting.is_empty() {
            return None;
        }
        let selected = find_divisible_subset(order.size, &resting, self.config.tradable_unit)?;

        let mut constituents = order_book.absorb(now, order.direction, &selected);
        let best = constituents.last().and_then(|constituent| constituent.limit_price);
        let size = constituents.iter().map(|constituent| constituent.size).sum::<Size>() + order.size;
        let combined = Order::combined(
            self.name,
            now,
            order.symbol,
            size,
            order.direction,
            best,
            self.order_ids.next_id(),
        );
        // The incoming order has no limit price, so its fills are measured against the combination reference
        constituents.push(Order { best: order.best.or(best), ..order });
        self.combined_orders.insert(combined.id, constituents);
        Some(combined)
    }

    fn submit_to_book(
        &mut self,
        message_receiver: &mut MessageReceiver<BrokerAction<Symbol>>,
        now: DateTime,
        order: Order<Symbol>)
    {
        let mut ob_events = Vec::new();
        if let Some(order_book) = self.order_books.get_mut(&order.symbol) {
            order_book.submit(now, order, |event| ob_events.push(event));
        }
        for event in ob_events {
            self.interpret_ob_event(message_receiver, now, event)
        }
    }

    fn interpret_ob_event(
        &mut self,
        message_receiver: &mut MessageReceiver<BrokerAction<Symbol>>,
        now: DateTime,
        event: OrderBookEvent<Symbol>)
    {
        match event {
            OrderBookEvent::Accepted(order) => {
                message_receiver.push(
                    self.create_broker_reply(order.agent_id, now, BrokerReply::OrderAccepted(order))
                )
            }
            OrderBookEvent::Matched { incoming, resting } => {
                message_receiver.extend(
                    [
                        self.create_fill_reply(now, incoming, FillType::Instant),
                        self.create_fill_reply(now, resting, FillType::Book),
                    ].into_iter().flatten()
                );
                message_receiver.extend([
                    self.create_broker_reply(incoming.agent_id, now, BrokerReply::OrderExecuted(incoming)),
                    self.create_broker_reply(resting.agent_id, now, BrokerReply::OrderExecuted(resting)),
                ])
            }
            OrderBookEvent::Cancelled(order) => {
                message_receiver.push(
                    self.create_broker_reply(order.agent_id, now, BrokerReply::OrderCancelled(order))
                )
            }
            OrderBookEvent::LastTrade { size, price } => {
                info!("{now} :: LAST_TRADE {size} @ {price}");
                self.event_log.log_last_trade(now, size, price)
            }
        }
    }

    fn handle_cancel_order(
        &mut self,
        message_receiver: &mut MessageReceiver<BrokerAction<Symbol>>,
        now: DateTime,
        message: Message<Symbol>,
        order: Order<Symbol>)
    {
        let mut ob_events = Vec::new();
        let cancelled = self.order_books.get_mut(&order.symbol).map(
            |order_book| order_book.cancel_owned(now, order.id, message.sender, |event| ob_events.push(event))
        );
        if let Some(Ok(_)) = cancelled {
            for event in ob_events {
                self.interpret_ob_event(message_receiver, now, event)
            }
        } else {
            // Not resting with the broker on behalf of the sender, so the exchange must be holding it
            message_receiver.push(self.create_broker_request(message))
        }
    }

    fn handle_combined_order_accepted(
        &mut self,
        message_receiver: &mut MessageReceiver<BrokerAction<Symbol>>,
        now: DateTime,
        order: Order<Symbol>)
    {
        if let Some(constituents) = self.combined_orders.get(&order.id) {
            message_receiver.extend(
                constituents.iter().map(
                    |constituent| self.create_broker_reply(
                        constituent.agent_id,
                        now,
                        BrokerReply::OrderAccepted(*constituent),
                    )
                )
            )
        } else {
            warn!("{now} :: Accepted order {} is not a combined order of this broker", order.id)
        }
    }

    fn handle_combined_order_executed(
        &mut self,
        message_receiver: &mut MessageReceiver<BrokerAction<Symbol>>,
        now: DateTime,
        order: Order<Symbol>)
    {
        let fill_price = if let Some(fill) = order.fill {
            fill.price
        } else {
            warn!("{now} :: Executed order {} carries no fill price", order.id);
            return;
        };
        let constituents = if let Some(constituents) = self.combined_orders.remove(&order.id) {
            constituents
        } else {
            warn!("{now} :: Executed order {} is not a combined order of this broker", order.id);
            return;
        };
        debug!(
            "{now} :: Combined order {} executed at {fill_price}. Notifying {} owners",
            order.id, constituents.len()
        );
        for constituent in constituents {
            let executed = constituent.filled(fill_price, now);
            message_receiver.extend(self.create_fill_reply(now, executed, FillType::CombinedBook));
            message_receiver.push(
                self.create_broker_reply(executed.agent_id, now, BrokerReply::OrderExecuted(executed))
            )
        }
    }

    fn handle_combined_order_cancelled(
        &mut self,
        message_receiver: &mut MessageReceiver<BrokerAction<Symbol>>,
        now: DateTime,
        order: Order<Symbol>)
    {
        if let Some(constituents) = self.combined_orders.remove(&order.id) {
            message_receiver.extend(
                constituents.into_iter().map(
                    |constituent| self.create_broker_reply(
                        constituent.agent_id,
                        now,
                        BrokerReply::OrderCancelled(constituent),
                    )
                )
            )
        } else {
            warn!("{now} :: Cancelled order {} is not a combined order of this broker", order.id)
        }
    }

    fn create_fill_reply(
        &self,
        now: DateTime,
        order: Order<Symbol>,
        fill_type: FillType) -> Option<BrokerAction<Symbol>>
    {
        let fill = order.fill?;
        let filled = Filled {
            order_id: order.id,
            sender: self.name,
            fill_price: fill.price,
            fill_time: fill.time,
            size: order.size,
            slippage: fill.slippage,
            fill_type,
        };
        Some(self.create_broker_reply(order.agent_id, now, BrokerReply::Filled(filled)))
    }

    fn create_exchange_order(&self, order: Order<Symbol>) -> BrokerAction<Symbol> {
        self.create_broker_request(Message::new(self.name, MessageBody::MarketOrder(order)))
    }

    fn create_broker_reply(
        &self,
        trader_id: AgentID,
        event_dt: DateTime,
        content: BrokerReply<Symbol>) -> BrokerAction<Symbol>
    {
        BrokerAction {
            delay: self.config.delay,
            content: BrokerActionKind::BrokerToTrader(
                BrokerToTrader {
                    trader_id,
                    event_dt,
                    content,
                }
            ),
        }
    }

    fn create_broker_request(&self, message: Message<Symbol>) -> BrokerAction<Symbol> {
        BrokerAction {
            delay: self.config.delay,
            content: BrokerActionKind::BrokerToExchange(
                BrokerToExchange {
                    exchange_id: self.exchange_id,
                    message,
                }
            ),
        }
    }
}
