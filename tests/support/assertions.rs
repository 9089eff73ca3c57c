use predicta::error::{Error, ExchangeError};

/// Unwrap the exchange error behind `result`, failing on success or any
/// other error kind.
pub fn expect_exchange_error<T: std::fmt::Debug>(result: Result<T, Error>) -> ExchangeError {
    match result {
        Ok(value) => panic!("expected exchange error, got Ok({value:?})"),
        Err(Error::Exchange(err)) => err,
        Err(other) => panic!("expected exchange error, got {other}"),
    }
}
