//! Per-month aggregate statistics.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Counts and totals for one calendar month.
///
/// Built once by the aggregation engine and never mutated afterwards.
/// `combined_total` is always exactly `signup_total + renewal_total`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyStats {
    active: u64,
    pending_cancel: u64,
    new_subscriptions: u64,
    renewals: u64,
    cancellations: u64,
    ended: u64,
    signup_total: Decimal,
    renewal_total: Decimal,
    combined_total: Decimal,
}

impl MonthlyStats {
    pub fn active(&self) -> u64 {
        self.active
    }

    pub fn pending_cancel(&self) -> u64 {
        self.pending_cancel
    }

    pub fn new_subscriptions(&self) -> u64 {
        self.new_subscriptions
    }

    pub fn renewals(&self) -> u64 {
        self.renewals
    }

    pub fn cancellations(&self) -> u64 {
        self.cancellations
    }

    pub fn ended(&self) -> u64 {
        self.ended
    }

    pub fn signup_total(&self) -> Decimal {
        self.signup_total
    }

    pub fn renewal_total(&self) -> Decimal {
        self.renewal_total
    }

    pub fn combined_total(&self) -> Decimal {
        self.combined_total
    }
}

/// Running tallies while scanning a month's records.
#[derive(Debug, Default)]
pub(crate) struct StatsAccumulator {
    pub active: u64,
    pub pending_cancel: u64,
    pub new_subscriptions: u64,
    pub renewals: u64,
    pub cancellations: u64,
    pub ended: u64,
    pub signup_total: Decimal,
    pub renewal_total: Decimal,
}

impl StatsAccumulator {
    pub fn finish(self) -> MonthlyStats {
        MonthlyStats {
            active: self.active,
            pending_cancel: self.pending_cancel,
            new_subscriptions: self.new_subscriptions,
            renewals: self.renewals,
            cancellations: self.cancellations,
            ended: self.ended,
            signup_total: self.signup_total,
            renewal_total: self.renewal_total,
            combined_total: self.signup_total + self.renewal_total,
        }
    }
}

/// Renders a monetary amount with two decimals and `,` thousands separators.
///
/// Rounds half away from zero, e.g. `1234.565` renders as `1,234.57`.
pub fn format_money(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    let text = rounded.abs().to_string();
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, fraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn money(raw: &str) -> Decimal {
        raw.parse().unwrap()
    }

    #[test]
    fn finish_derives_combined_total() {
        let acc = StatsAccumulator {
            signup_total: money("49.99"),
            renewal_total: money("100.005"),
            ..Default::default()
        };
        let stats = acc.finish();
        assert_eq!(stats.combined_total(), money("149.995"));
    }

    #[test]
    fn empty_accumulator_is_all_zero() {
        let stats = StatsAccumulator::default().finish();
        assert_eq!(stats.active(), 0);
        assert_eq!(stats.combined_total(), Decimal::ZERO);
    }

    #[test]
    fn format_money_uses_two_decimals() {
        assert_eq!(format_money(money("0")), "0.00");
        assert_eq!(format_money(money("49.99")), "49.99");
        assert_eq!(format_money(money("5")), "5.00");
        assert_eq!(format_money(money("0.5")), "0.50");
    }

    #[test]
    fn format_money_groups_thousands() {
        assert_eq!(format_money(money("1234.5")), "1,234.50");
        assert_eq!(format_money(money("999.999")), "1,000.00");
        assert_eq!(format_money(money("1234567.891")), "1,234,567.89");
    }

    #[test]
    fn format_money_rounds_half_away_from_zero() {
        assert_eq!(format_money(money("0.125")), "0.13");
        assert_eq!(format_money(money("2.675")), "2.68");
    }
}
