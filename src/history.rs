use {
    crate::types::{DateTime, Direction, OrderID, Price, Size},
    std::collections::{HashMap, VecDeque},
};

#[derive(Debug, Clone, Eq, PartialEq)]
/// Transaction record of a single order.
pub struct HistoryEntry {
    pub entry_time: DateTime,
    pub size: Size,
    pub direction: Direction,
    pub limit_price: Option<Price>,
    pub transactions: Vec<(DateTime, Size)>,
    /// Stays empty in the broker book: modifications are routed to the exchange.
    pub modifications: Vec<(DateTime, Size)>,
    pub cancellations: Vec<(DateTime, Size)>,
}

impl HistoryEntry
{
    pub fn new(
        entry_time: DateTime,
        size: Size,
        direction: Direction,
        limit_price: Option<Price>) -> Self
    {
        HistoryEntry {
            entry_time,
            size,
            direction,
            limit_price,
            transactions: Vec::new(),
            modifications: Vec::new(),
            cancellations: Vec::new(),
        }
    }
}

/// Bounded window of order records indexed by the number of trades since they were entered.
///
/// Slot `0` holds orders entered since the most recent trade.
/// Every trade pushes a fresh slot to the front,
/// and slots beyond the window depth are dropped.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct History {
    slots: VecDeque<HashMap<OrderID, HistoryEntry>>,
    depth: usize,
}

impl History
{
    /// Creates a window retaining at most `depth` slots. Zero depth is treated as one.
    pub fn new(depth: usize) -> Self {
        let depth = depth.max(1);
        History {
            slots: VecDeque::from([HashMap::new()]),
            depth,
        }
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(HashMap::is_empty)
    }

    /// Orders entered `ticks` trades ago.
    pub fn slot(&self, ticks: usize) -> Option<&HashMap<OrderID, HistoryEntry>> {
        self.slots.get(ticks)
    }

    /// Records a new order under the current slot.
    pub fn enter(&mut self, id: OrderID, entry: HistoryEntry) {
        if let Some(current) = self.slots.front_mut() {
            current.insert(id, entry);
        }
    }

    /// Finds the record of the order if it is still inside the window.
    pub fn find(&self, id: OrderID) -> Option<(usize, &HistoryEntry)> {
        self.slots.iter()
            .enumerate()
            .find_map(|(ticks, slot)| slot.get(&id).map(|entry| (ticks, entry)))
    }

    fn find_mut(&mut self, id: OrderID) -> Option<&mut HistoryEntry> {
        self.slots.iter_mut().find_map(|slot| slot.get_mut(&id))
    }

    /// Returns `false` if the order has already aged out of the window.
    pub fn record_transaction(&mut self, id: OrderID, dt: DateTime, size: Size) -> bool {
        self.find_mut(id)
            .map(|entry| entry.transactions.push((dt, size)))
            .is_some()
    }

    /// Returns `false` if the order has already aged out of the window.
    pub fn record_cancellation(&mut self, id: OrderID, dt: DateTime, size: Size) -> bool {
        self.find_mut(id)
            .map(|entry| entry.cancellations.push((dt, size)))
            .is_some()
    }

    /// Starts a new slot after a trade and drops the slots outside the window.
    pub fn advance(&mut self) {
        self.slots.push_front(HashMap::new());
        self.slots.truncate(self.depth);
    }
}
