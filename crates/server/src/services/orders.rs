//! Order pricing and status transition rules.
//!
//! Pure functions: the handlers resolve products and permissions, then
//! delegate the arithmetic and legality decisions here.

use rust_decimal::Decimal;

use harborfront_core::{OrderStatus, ProductId};

use crate::error::AppError;
use crate::models::order::NewOrderItem;
use crate::services::authz::PermissionContext;

/// Snapshot a cached price into a line item.
///
/// `unit_price` is frozen here; later catalog drift never changes it.
///
/// # Errors
///
/// Returns `AppError::InvalidInput` for a non-positive quantity.
pub fn price_item(
    product_id: ProductId,
    unit_price: Decimal,
    quantity: i32,
) -> Result<NewOrderItem, AppError> {
    if quantity <= 0 {
        return Err(AppError::InvalidInput(format!(
            "quantity must be positive for product {product_id}"
        )));
    }

    Ok(NewOrderItem {
        product_id,
        quantity,
        unit_price,
        total_price: unit_price * Decimal::from(quantity),
    })
}

/// Sum line totals into the order total.
#[must_use]
pub fn order_total(items: &[NewOrderItem]) -> Decimal {
    items.iter().map(|item| item.total_price).sum()
}

/// Decide the order's next status from a client-supplied token.
///
/// Checks, in order: the token parses, the caller may request it
/// (approve/reject are admin-gated), and the transition is legal from
/// the current status.
///
/// # Errors
///
/// Returns `AppError::InvalidInput` for unknown tokens and illegal
/// transitions, `AppError::Forbidden` when a non-admin requests an
/// admin-gated status.
pub fn apply_status_change(
    current: OrderStatus,
    requested: &str,
    ctx: &PermissionContext,
) -> Result<OrderStatus, AppError> {
    let next: OrderStatus = requested
        .parse()
        .map_err(|_| AppError::InvalidInput(format!("unknown order status: {requested}")))?;

    if next.requires_admin() {
        ctx.require_admin()?;
    }

    if !current.can_transition_to(next) {
        return Err(AppError::InvalidInput(format!(
            "cannot transition order from {current} to {next}"
        )));
    }

    Ok(next)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use harborfront_core::{StoreId, UserId, UserRole};
    use rust_decimal_macros::dec;

    fn ctx(role: UserRole) -> PermissionContext {
        PermissionContext {
            user_id: UserId::new(1),
            role,
            store_id: Some(StoreId::new(1)),
        }
    }

    #[test]
    fn line_total_is_unit_price_times_quantity() {
        let item = price_item(ProductId::new("SKU-1"), dec!(10.00), 3).unwrap();
        assert_eq!(item.total_price, dec!(30.00));
        assert_eq!(item.unit_price, dec!(10.00));
    }

    #[test]
    fn zero_or_negative_quantity_is_rejected() {
        assert!(price_item(ProductId::new("SKU-1"), dec!(1.00), 0).is_err());
        assert!(price_item(ProductId::new("SKU-1"), dec!(1.00), -2).is_err());
    }

    #[test]
    fn order_total_sums_line_totals() {
        let items = vec![
            price_item(ProductId::new("A"), dec!(10.00), 3).unwrap(),
            price_item(ProductId::new("B"), dec!(2.50), 2).unwrap(),
        ];
        assert_eq!(order_total(&items), dec!(35.00));
    }

    #[test]
    fn pricing_keeps_decimal_precision() {
        let item = price_item(ProductId::new("A"), dec!(0.10), 3).unwrap();
        assert_eq!(item.total_price, dec!(0.30));
    }

    #[test]
    fn admin_may_approve_pending() {
        let next = apply_status_change(OrderStatus::Pending, "approved", &ctx(UserRole::Admin));
        assert_eq!(next.unwrap(), OrderStatus::Approved);
    }

    #[test]
    fn non_admin_may_not_approve_or_reject() {
        let user = ctx(UserRole::User);
        assert!(matches!(
            apply_status_change(OrderStatus::Pending, "approved", &user),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            apply_status_change(OrderStatus::Pending, "rejected", &user),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn non_admin_may_cancel_pending() {
        let next = apply_status_change(OrderStatus::Pending, "cancelled", &ctx(UserRole::User));
        assert_eq!(next.unwrap(), OrderStatus::Cancelled);
    }

    #[test]
    fn unknown_token_is_invalid_input() {
        assert!(matches!(
            apply_status_change(OrderStatus::Pending, "teleported", &ctx(UserRole::Admin)),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn illegal_transition_is_invalid_input() {
        assert!(matches!(
            apply_status_change(OrderStatus::Delivered, "pending", &ctx(UserRole::Admin)),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            apply_status_change(OrderStatus::Rejected, "shipped", &ctx(UserRole::Admin)),
            Err(AppError::InvalidInput(_))
        ));
    }
}
