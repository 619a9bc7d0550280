pub mod broker;
pub mod config;
pub mod event_log;
pub mod exchange;
pub mod history;
pub mod lot_combination;
pub mod order;
pub mod order_book;
pub mod types;
pub mod utils;

pub mod prelude {
    pub use crate::{
        broker::{
            OddLotBroker,
            reply::{
                BrokerAction,
                BrokerActionKind,
                BrokerReply,
                BrokerToExchange,
                BrokerToTrader,
                Filled,
                FillType,
            },
            request::{ExchangeQuery, Message, MessageBody, MessageKind},
        },
        config::{BrokerConfig, ConfigError},
        event_log::{BrokerEvent, EventKind, EventLog},
        exchange::{ExchangeState, ExchangeView},
        history::{History, HistoryEntry},
        lot_combination::{find_divisible_subset, MAX_COMBINED_ORDERS},
        order::{Fill, Order, OrderIdAllocator, OrderKind},
        order_book::{BrokerOrderBook, NoSuchID, OrderBookEvent},
        types::*,
        utils::{
            chrono,
            constants,
            csv,
            derive_more,
            queue::MessageReceiver,
            yaml_rust,
        },
    };
}

#[cfg(test)]
mod tests {
    use {
        crate::prelude::*,
        std::{collections::VecDeque, path::Path},
    };

    #[derive(derive_more::Display, Debug, Hash, Ord, PartialOrd, Eq, PartialEq, Copy, Clone)]
    enum SymbolName {
        ABM,
        JPM,
    }

    const EXCHANGE: AgentID = AgentID(0);
    const BROKER: AgentID = AgentID(1);

    fn dt(h: u32, m: u32) -> DateTime {
        Date::from_ymd_opt(2020, 6, 1).unwrap().and_hms_opt(h, m, 0).unwrap()
    }

    /// Delivers messages to the broker one at a time, playing the exchange role
    /// for combined orders: each is accepted and then executed at `fill_price`.
    fn run(
        broker: &mut OddLotBroker<SymbolName>,
        exchange: &ExchangeState<SymbolName>,
        messages: impl IntoIterator<Item=Message<SymbolName>>,
        fill_price: Price) -> (Vec<BrokerAction<SymbolName>>, Vec<BrokerToTrader<SymbolName>>)
    {
        let mut pending: VecDeque<_> = messages.into_iter().collect();
        let mut to_exchange = Vec::new();
        let mut to_traders = Vec::new();
        while let Some(message) = pending.pop_front() {
            let mut actions = VecDeque::new();
            broker.process_message(exchange, MessageReceiver::new(&mut actions), message);
            for action in actions {
                match action.content {
                    BrokerActionKind::BrokerToExchange(
                        BrokerToExchange { message: Message { body: MessageBody::MarketOrder(order), .. }, .. }
                    ) if order.combined => {
                        let executed = order.filled(fill_price, exchange.current_datetime());
                        pending.push_back(Message::new(EXCHANGE, MessageBody::OrderAccepted(order)));
                        pending.push_back(Message::new(EXCHANGE, MessageBody::OrderExecuted(executed)));
                        to_exchange.push(action)
                    }
                    BrokerActionKind::BrokerToExchange(_) => to_exchange.push(action),
                    BrokerActionKind::BrokerToTrader(reply) => to_traders.push(reply),
                }
            }
        }
        (to_exchange, to_traders)
    }

    #[test]
    fn test_odd_lot_session()
    {
        let config = BrokerConfig::from_yaml_file(
            Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("odd_lot_broker.yml")
        ).unwrap();
        assert_eq!(config.tradable_unit, Size(5));
        assert_eq!(config.delay, constants::ONE_MILLISECOND);

        let mut broker = OddLotBroker::new(BROKER, EXCHANGE, [SymbolName::ABM, SymbolName::JPM], config);
        let mut exchange = ExchangeState::new(EXCHANGE, dt(9, 30), dt(16, 0), 1);
        exchange.set_quote(SymbolName::ABM, Some(Price(99)), Some(Price(101)));
        exchange.current_dt = dt(10, 0);

        let now = exchange.current_dt;
        let market = |agent, size, id| Message::new(
            AgentID(agent),
            MessageBody::MarketOrder(
                Order::market(AgentID(agent), now, SymbolName::ABM, Size(size), Direction::Buy, OrderID(id))
            ),
        );
        let (to_exchange, to_traders) = run(
            &mut broker,
            &exchange,
            [market(10, 3, 1), market(11, 10, 2), market(12, 2, 3)],
            Price(102),
        );

        // The even lot and the combination of the two odd lots
        assert_eq!(to_exchange.len(), 2);
        assert!(to_exchange.iter().all(|action| action.get_exchange_id() == Some(EXCHANGE)));
        assert!(to_exchange.iter().all(|action| action.delay == constants::ONE_MILLISECOND));

        let fills: Vec<(AgentID, Filled)> = to_traders.iter()
            .filter_map(
                |reply| match reply.content {
                    BrokerReply::Filled(filled) => Some((reply.trader_id, filled)),
                    _ => None
                }
            )
            .collect();
        assert_eq!(fills.len(), 2);
        for (trader_id, filled) in fills {
            assert!(trader_id == AgentID(10) || trader_id == AgentID(12));
            assert_eq!(filled.fill_type, FillType::CombinedBook);
            assert_eq!(filled.fill_price, Price(102));
            assert_eq!(filled.slippage, Price(1));
            assert_eq!(filled.sender, BROKER)
        }
        assert!(to_traders.iter().all(|reply| reply.trader_id != AgentID(11)));
        assert_eq!(broker.pending_combined_orders(), 0);
        assert!(broker.order_book(SymbolName::ABM).unwrap().is_empty());

        exchange.current_dt = dt(16, 0);
        let (to_exchange, to_traders) = run(&mut broker, &exchange, [market(10, 3, 4)], Price(102));
        assert!(to_exchange.is_empty());
        assert_eq!(to_traders.len(), 1);
        assert_eq!(to_traders[0].content, BrokerReply::MarketClosed);

        let mut csv = Vec::new();
        broker.event_log().write_csv(&mut csv, "%H:%M").unwrap();
        assert_eq!(
            String::from_utf8(csv).unwrap(),
            "EventTime,EventType,Event\n\
            10:00,ORDER_SENT_TO_BOOK,\n\
            10:00,ORDER_SENT_TO_EXCHANGE,\n\
            10:00,ORDER_COMBINED_TO_EXCHANGE,\n"
        )
    }
}
