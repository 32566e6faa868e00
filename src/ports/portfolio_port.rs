//! Portfolio port trait.

use crate::domain::error::CountertrendError;
use crate::domain::portfolio::Holdings;

pub trait PortfolioPort {
    fn positions(&self) -> Result<Holdings, CountertrendError>;
}
