pub mod money;

pub use money::{Money, MoneyParseError, CURRENCY_PREFIX};
