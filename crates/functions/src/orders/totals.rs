//! Order total calculation.
//!
//! Totals are always derived from the validated lines; nothing the client
//! sends as a total is ever read.

use kirana_core::{Money, MoneyError, OrderTotals};

use super::validate::OrderLine;

/// Shipping fee charged on every order.
pub const SHIPPING_FEE: Money = Money::ZERO;

/// A validated line with its computed `unitPrice × qty`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedLine {
    pub line: OrderLine,
    pub line_total: Money,
}

/// Lines and totals of one order, computed together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedOrder {
    pub lines: Vec<PricedLine>,
    pub totals: OrderTotals,
}

/// Price every line and sum them in a single pass.
///
/// # Errors
///
/// Returns [`MoneyError::Overflow`] if a line total or the sum does not fit
/// in a decimal.
pub fn price_order(lines: Vec<OrderLine>) -> Result<PricedOrder, MoneyError> {
    let mut items_total = Money::ZERO;
    let mut priced = Vec::with_capacity(lines.len());

    for line in lines {
        let line_total = line.unit_price.checked_times(line.qty)?;
        items_total = items_total.checked_add(line_total)?;
        priced.push(PricedLine { line, line_total });
    }

    let grand_total = items_total.checked_add(SHIPPING_FEE)?;

    Ok(PricedOrder {
        lines: priced,
        totals: OrderTotals {
            items_total,
            shipping: SHIPPING_FEE,
            grand_total,
        },
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use kirana_core::ProductId;
    use rust_decimal::Decimal;

    use super::*;

    fn line(name: &str, price: &str, qty: u32) -> OrderLine {
        OrderLine {
            product_id: ProductId::new(format!("P-{name}")),
            name: name.to_owned(),
            image_url: String::new(),
            unit_price: Money::new(Decimal::from_str(price).unwrap()),
            qty,
        }
    }

    #[test]
    fn test_fresh_mart_totals() {
        let priced = price_order(vec![line("Milk", "50", 2), line("Bread", "40", 1)]).unwrap();

        assert_eq!(priced.totals.items_total, Money::from_units(140));
        assert_eq!(priced.totals.shipping, Money::ZERO);
        assert_eq!(priced.totals.grand_total, Money::from_units(140));

        let line_totals: Vec<Money> = priced.lines.iter().map(|l| l.line_total).collect();
        assert_eq!(line_totals, [Money::from_units(100), Money::from_units(40)]);
    }

    #[test]
    fn test_fractional_prices_are_exact() {
        let priced = price_order(vec![line("Tea", "0.1", 3), line("Salt", "0.2", 1)]).unwrap();
        assert_eq!(priced.totals.items_total.to_string(), "0.5");
        assert_eq!(
            priced.totals.grand_total,
            priced
                .totals
                .items_total
                .checked_add(priced.totals.shipping)
                .unwrap()
        );
    }

    #[test]
    fn test_line_order_is_preserved() {
        let priced = price_order(vec![line("B", "1", 1), line("A", "2", 1)]).unwrap();
        let names: Vec<&str> = priced.lines.iter().map(|l| l.line.name.as_str()).collect();
        assert_eq!(names, ["B", "A"]);
    }

    #[test]
    fn test_overflow_is_rejected() {
        let huge = OrderLine {
            unit_price: Money::new(Decimal::MAX),
            ..line("Gold", "1", 1)
        };
        let result = price_order(vec![huge, line("Gold", "1", 2)]);
        assert!(matches!(result, Err(MoneyError::Overflow)));
    }
}
