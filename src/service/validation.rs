//! Request checks applied before anything reaches the engine.

use tracing::warn;

use super::slug::is_valid_slug;
use super::{ExchangeSettings, NewMarket};
use crate::domain::OrderRequest;
use crate::error::ExchangeError;

/// Check a market creation request against the configured limits.
pub(crate) fn check_new_market(
    settings: &ExchangeSettings,
    request: &NewMarket,
) -> Result<(), ExchangeError> {
    check_question(settings, &request.question)?;
    if let Some(description) = &request.description {
        check_description(settings, description)?;
    }
    if let Some(slug) = &request.slug {
        check_slug(slug)?;
    }
    Ok(())
}

/// Check an order's quantity. Price bounds are the engine's concern.
pub(crate) fn check_order(
    settings: &ExchangeSettings,
    request: &OrderRequest,
) -> Result<(), ExchangeError> {
    let max = settings.max_order_quantity;
    if request.quantity == 0 || request.quantity > max {
        warn!(quantity = request.quantity, max = max, "Order quantity out of range");
        return Err(ExchangeError::InvalidQuantity {
            quantity: request.quantity,
            reason: format!("must be between 1 and {max}"),
        });
    }
    Ok(())
}

fn check_question(settings: &ExchangeSettings, question: &str) -> Result<(), ExchangeError> {
    let len = question.trim().chars().count();
    let (min, max) = (settings.min_question_len, settings.max_question_len);
    if len < min || len > max {
        warn!(len = len, min = min, max = max, "Question length out of range");
        return Err(ExchangeError::InvalidField {
            field: "question",
            reason: format!("must be {min} to {max} characters, got {len}"),
        });
    }
    Ok(())
}

fn check_description(settings: &ExchangeSettings, description: &str) -> Result<(), ExchangeError> {
    let len = description.chars().count();
    let max = settings.max_description_len;
    if len > max {
        return Err(ExchangeError::InvalidField {
            field: "description",
            reason: format!("must be at most {max} characters, got {len}"),
        });
    }
    Ok(())
}

fn check_slug(slug: &str) -> Result<(), ExchangeError> {
    if !is_valid_slug(slug) {
        return Err(ExchangeError::InvalidField {
            field: "slug",
            reason: format!("'{slug}' must be lower-case letters and digits joined by single hyphens"),
        });
    }
    Ok(())
}
