//! CSV execution sink: one row per decision with its target weight.

use serde::Serialize;
use std::collections::HashMap;
use std::io::Write;

use crate::domain::decision::Decision;
use crate::domain::error::CountertrendError;
use crate::domain::execution::plan_orders;
use crate::ports::execution_port::ExecutionSink;

#[derive(Debug, Serialize)]
struct OrderRow<'a> {
    code: &'a str,
    action: String,
    reason: &'static str,
    intraday_return: Option<f64>,
    target_weight: Option<f64>,
}

pub struct CsvOrderSink<W: Write> {
    writer: csv::Writer<W>,
    entry_weight: f64,
    include_holds: bool,
    rows_written: usize,
}

impl<W: Write> CsvOrderSink<W> {
    pub fn new(inner: W, entry_weight: f64) -> Self {
        Self {
            writer: csv::Writer::from_writer(inner),
            entry_weight,
            include_holds: true,
            rows_written: 0,
        }
    }

    pub fn include_holds(mut self, include: bool) -> Self {
        self.include_holds = include;
        self
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    pub fn into_inner(self) -> Result<W, CountertrendError> {
        self.writer.into_inner().map_err(|e| CountertrendError::Io(e.into_error()))
    }
}

impl<W: Write> ExecutionSink for CsvOrderSink<W> {
    fn submit(&mut self, decisions: &[Decision]) -> Result<(), CountertrendError> {
        let sink_error = |e: csv::Error| CountertrendError::Source {
            reason: format!("failed to write order row: {}", e),
        };

        let targets: HashMap<String, f64> = plan_orders(decisions, self.entry_weight)
            .into_iter()
            .map(|order| (order.code, order.target_weight))
            .collect();

        for d in decisions {
            if !self.include_holds && !d.is_actionable() {
                continue;
            }
            self.writer
                .serialize(OrderRow {
                    code: &d.code,
                    action: d.action.to_string(),
                    reason: d.reason.label(),
                    intraday_return: d.reason.intraday_return(),
                    target_weight: targets.get(&d.code).copied(),
                })
                .map_err(sink_error)?;
            self.rows_written += 1;
        }
        self.writer.flush()?;
        Ok(())
    }
}
