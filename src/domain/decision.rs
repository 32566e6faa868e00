//! Rebalance decisions handed to the execution layer.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Enter,
    Exit,
    Hold,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Enter => write!(f, "enter"),
            Action::Exit => write!(f, "exit"),
            Action::Hold => write!(f, "hold"),
        }
    }
}

/// Why a decision was taken. Variants computed from prices carry the
/// intraday return that triggered them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reason {
    /// Candidate is down for the day and not yet held.
    CounterTrend { intraday_return: f64 },
    /// Candidate is flat or up for the day.
    NotDown { intraday_return: f64 },
    /// Candidate is already in the book.
    AlreadyHeld { intraday_return: f64 },
    /// Held instrument dropped out of the candidate list.
    NoLongerCandidate,
}

impl Reason {
    pub fn intraday_return(&self) -> Option<f64> {
        match *self {
            Reason::CounterTrend { intraday_return }
            | Reason::NotDown { intraday_return }
            | Reason::AlreadyHeld { intraday_return } => Some(intraday_return),
            Reason::NoLongerCandidate => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Reason::CounterTrend { .. } => "counter_trend",
            Reason::NotDown { .. } => "not_down",
            Reason::AlreadyHeld { .. } => "already_held",
            Reason::NoLongerCandidate => "no_longer_candidate",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.intraday_return() {
            Some(r) => write!(f, "{} ({:+.4}%)", self.label(), r * 100.0),
            None => write!(f, "{}", self.label()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub code: String,
    pub action: Action,
    pub reason: Reason,
}

impl Decision {
    pub fn enter(code: impl Into<String>, intraday_return: f64) -> Self {
        Self {
            code: code.into(),
            action: Action::Enter,
            reason: Reason::CounterTrend { intraday_return },
        }
    }

    pub fn exit(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            action: Action::Exit,
            reason: Reason::NoLongerCandidate,
        }
    }

    pub fn hold(code: impl Into<String>, reason: Reason) -> Self {
        Self {
            code: code.into(),
            action: Action::Hold,
            reason,
        }
    }

    pub fn is_actionable(&self) -> bool {
        self.action != Action::Hold
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.action, self.code, self.reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_action_and_reason() {
        let d = Decision::enter("AAPL", -0.02);
        assert_eq!(d.action, Action::Enter);
        assert_eq!(d.reason.intraday_return(), Some(-0.02));
        assert!(d.is_actionable());

        let d = Decision::exit("MSFT");
        assert_eq!(d.action, Action::Exit);
        assert_eq!(d.reason, Reason::NoLongerCandidate);
        assert_eq!(d.reason.intraday_return(), None);

        let d = Decision::hold("IBM", Reason::NotDown { intraday_return: 0.0 });
        assert!(!d.is_actionable());
    }

    #[test]
    fn display_formats() {
        assert_eq!(
            Decision::enter("AAPL", -0.01).to_string(),
            "enter AAPL: counter_trend (-1.0000%)"
        );
        assert_eq!(
            Decision::exit("MSFT").to_string(),
            "exit MSFT: no_longer_candidate"
        );
    }
}
