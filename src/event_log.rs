use {
    crate::types::{DateTime, Price, Size},
    std::io::Write,
};

#[derive(derive_more::Display, Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum EventKind {
    #[display(fmt = "ORDER_SENT_TO_EXCHANGE")]
    OrderSentToExchange,
    #[display(fmt = "ORDER_COMBINED_TO_EXCHANGE")]
    OrderCombinedToExchange,
    #[display(fmt = "ORDER_SENT_TO_BOOK")]
    OrderSentToBook,
    #[display(fmt = "LAST_TRADE")]
    LastTrade,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BrokerEvent {
    pub dt: DateTime,
    pub kind: EventKind,
    /// Traded size and average price. Present for [`EventKind::LastTrade`] only.
    pub trade: Option<(Size, Price)>,
}

/// Chronological log of the broker routing decisions and trades.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<BrokerEvent>,
}

impl EventLog
{
    pub fn new() -> Self {
        Default::default()
    }

    pub fn log(&mut self, dt: DateTime, kind: EventKind) {
        self.events.push(BrokerEvent { dt, kind, trade: None })
    }

    pub fn log_last_trade(&mut self, dt: DateTime, size: Size, price: Price) {
        self.events.push(BrokerEvent { dt, kind: EventKind::LastTrade, trade: Some((size, price)) })
    }

    #[inline]
    pub fn events(&self) -> &[BrokerEvent] {
        &self.events
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.events.iter().filter(|event| event.kind == kind).count()
    }

    /// Writes the log as CSV with the `EventTime,EventType,Event` header.
    /// `LAST_TRADE` events are written as `size,price`.
    ///
    /// # Arguments
    ///
    /// * `writer` — Destination of the CSV records.
    /// * `datetime_format` — Format of the `EventTime` column.
    pub fn write_csv(&self, writer: impl Write, datetime_format: &str) -> csv::Result<()>
    {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(["EventTime", "EventType", "Event"])?;
        for BrokerEvent { dt, kind, trade } in &self.events {
            let event = trade
                .map(|(size, price)| format!("{size},{price}"))
                .unwrap_or_default();
            writer.write_record([
                dt.format(datetime_format).to_string(),
                kind.to_string(),
                event,
            ])?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::types::Date};

    #[test]
    fn test_write_csv()
    {
        let dt = Date::from_ymd_opt(2020, 1, 2).unwrap().and_hms_opt(9, 30, 0).unwrap();
        let mut log = EventLog::new();
        log.log(dt, EventKind::OrderSentToBook);
        log.log_last_trade(dt, Size(10), Price(25));
        assert_eq!(log.count(EventKind::LastTrade), 1);

        let mut buffer = Vec::new();
        log.write_csv(&mut buffer, "%Y-%m-%d %H:%M:%S").unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "EventTime,EventType,Event\n\
            2020-01-02 09:30:00,ORDER_SENT_TO_BOOK,\n\
            2020-01-02 09:30:00,LAST_TRADE,\"10,25\"\n"
        )
    }
}
