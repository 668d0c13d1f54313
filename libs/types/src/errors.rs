//! Error taxonomy for order admission and lookups
//!
//! Admission errors travel back to the client with their numeric codes;
//! lookup errors display as the exact reply strings the protocol uses.

use thiserror::Error;

/// Admission failures. When any of these is returned, no order id has
/// been consumed and no engine state has changed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderRejected {
    /// The order-id ceiling has been reached.
    #[error("TOO_MANY_ORDERS")]
    TooManyOrders,

    /// Price, quantity, direction or order type failed validation.
    #[error("SILLY_VALUE")]
    SillyValue,

    /// Account id outside the configured [0, cap) range.
    #[error("TOO_HIGH_ACCOUNT")]
    TooHighAccount,
}

impl OrderRejected {
    /// Numeric code used in the backend-error reply.
    pub fn code(self) -> u8 {
        match self {
            OrderRejected::TooManyOrders => 1,
            OrderRejected::SillyValue => 2,
            OrderRejected::TooHighAccount => 3,
        }
    }
}

/// Lookup failures for status and cancel queries. The display strings are
/// the reply payloads, verbatim.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupError {
    #[error("No such ID")]
    NoSuchOrder,

    #[error("Account not known on this book")]
    UnknownAccount,
}
