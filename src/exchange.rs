use {
    crate::types::{AgentID, DateTime, Id, Named, Price},
    std::collections::HashMap,
};

/// Exchange-facing view consumed by the [`OddLotBroker`](crate::broker::OddLotBroker).
///
/// The broker never mutates the exchange: it only reads market hours,
/// the simulated clock and the top of the exchange order books.
pub trait ExchangeView<Symbol: Id>: Named<AgentID>
{
    /// Current simulated datetime.
    fn current_datetime(&self) -> DateTime;

    /// Market opening datetime of the current simulated day.
    fn market_open(&self) -> DateTime;

    /// Market closing datetime of the current simulated day.
    fn market_close(&self) -> DateTime;

    fn is_market_closed(&self) -> bool;

    /// Number of the current simulated day.
    fn current_day(&self) -> u32;

    /// Number of the last simulated day.
    fn final_day(&self) -> u32;

    fn best_bid(&self, symbol: Symbol) -> Option<Price>;

    fn best_ask(&self, symbol: Symbol) -> Option<Price>;

    /// Best price on the side opposite to the order direction:
    /// best ask for a buy order and best bid for a sell order.
    fn best_opposite(&self, symbol: Symbol, buy: bool) -> Option<Price> {
        if buy {
            self.best_ask(symbol)
        } else {
            self.best_bid(symbol)
        }
    }

    /// Whether the simulation is past the close of its final day.
    fn is_final_close(&self) -> bool {
        let now = self.current_datetime();
        now > self.market_close()
            && now > self.market_open()
            && self.current_day() == self.final_day()
    }
}

/// Plain snapshot of the exchange state implementing [`ExchangeView`].
///
/// Whoever owns the simulation keeps it in sync with the actual exchange.
#[derive(Debug, Clone)]
pub struct ExchangeState<Symbol: Id> {
    pub name: AgentID,
    pub current_dt: DateTime,
    pub market_open: DateTime,
    pub market_close: DateTime,
    pub current_day: u32,
    pub final_day: u32,
    /// `(best bid, best ask)` for each traded symbol.
    pub quotes: HashMap<Symbol, (Option<Price>, Option<Price>)>,
}

impl<Symbol: Id> ExchangeState<Symbol>
{
    pub fn new(
        name: AgentID,
        market_open: DateTime,
        market_close: DateTime,
        final_day: u32) -> Self
    {
        ExchangeState {
            name,
            current_dt: market_open,
            market_open,
            market_close,
            current_day: 1,
            final_day,
            quotes: Default::default(),
        }
    }

    pub fn set_quote(&mut self, symbol: Symbol, best_bid: Option<Price>, best_ask: Option<Price>) {
        self.quotes.insert(symbol, (best_bid, best_ask));
    }
}

impl<Symbol: Id> Named<AgentID> for ExchangeState<Symbol>
{
    fn get_name(&self) -> AgentID {
        self.name
    }
}

impl<Symbol: Id> ExchangeView<Symbol> for ExchangeState<Symbol>
{
    fn current_datetime(&self) -> DateTime {
        self.current_dt
    }

    fn market_open(&self) -> DateTime {
        self.market_open
    }

    fn market_close(&self) -> DateTime {
        self.market_close
    }

    fn is_market_closed(&self) -> bool {
        self.current_dt < self.market_open || self.current_dt >= self.market_close
    }

    fn current_day(&self) -> u32 {
        self.current_day
    }

    fn final_day(&self) -> u32 {
        self.final_day
    }

    fn best_bid(&self, symbol: Symbol) -> Option<Price> {
        self.quotes.get(&symbol).and_then(|(best_bid, _)| *best_bid)
    }

    fn best_ask(&self, symbol: Symbol) -> Option<Price> {
        self.quotes.get(&symbol).and_then(|(_, best_ask)| *best_ask)
    }
}
