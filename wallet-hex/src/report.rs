//! Balance valuation over a daily rate table.
//!
//! Pure functions: the caller supplies the wallets and the table, and gets
//! back a report carrying the table's effective date. Intermediate sums keep
//! full precision; rounding to 2 decimal places happens exactly once, at
//! report construction.

use rust_decimal::Decimal;

use wallet_types::{
    BalanceLine, BalanceReport, RateTable, UpdatedBalanceLine, Wallet, WalletUpdateResponse,
};

/// Builds the full per-currency report used by listings and totals.
///
/// The rate source always returns the complete supported set, so a wallet
/// currency missing from the table is an internal inconsistency; it is
/// logged and skipped rather than silently valued at zero.
pub fn balance_report(wallets: &[Wallet], rates: &RateTable) -> BalanceReport {
    let mut lines = Vec::with_capacity(wallets.len());
    let mut total = Decimal::ZERO;

    for wallet in wallets {
        match rates.rate(wallet.currency) {
            Some(rate) => {
                let value = wallet.amount * rate;
                total += value;
                lines.push(BalanceLine {
                    currency: wallet.currency,
                    value_pln: value.round_dp(2),
                });
            }
            None => {
                tracing::warn!(
                    currency = %wallet.currency,
                    effective_date = %rates.effective_date(),
                    "supported currency missing from rate table"
                );
            }
        }
    }

    BalanceReport {
        wallet_report: lines,
        total_pln: total.round_dp(2),
        effective_date: rates.effective_date(),
    }
}

/// Builds the report returned right after a wallet mutation.
///
/// The mutated currency's PLN value becomes `null` when the table does not
/// quote it; the total is still computed over every rated currency the user
/// holds.
pub fn wallet_update_report(
    updated: &Wallet,
    all_wallets: &[Wallet],
    rates: &RateTable,
    message: String,
) -> WalletUpdateResponse {
    let value_pln = rates
        .rate(updated.currency)
        .map(|rate| (updated.amount * rate).round_dp(2));

    let total: Decimal = all_wallets
        .iter()
        .filter_map(|wallet| rates.rate(wallet.currency).map(|rate| wallet.amount * rate))
        .sum();

    WalletUpdateResponse {
        message,
        wallet_report: vec![UpdatedBalanceLine {
            currency: updated.currency,
            amount: updated.amount,
            value_pln,
        }],
        total_in_pln: total.round_dp(2),
        effective_date: rates.effective_date(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::NaiveDate;
    use wallet_types::{Currency, UserId};

    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn table(pairs: &[(Currency, &str)]) -> RateTable {
        let rates: HashMap<Currency, Decimal> =
            pairs.iter().map(|(c, r)| (*c, dec(r))).collect();
        RateTable::new(rates, NaiveDate::from_ymd_opt(2025, 2, 24).unwrap())
    }

    fn wallet(currency: Currency, amount: &str) -> Wallet {
        Wallet::new(UserId::new(), currency, dec(amount)).unwrap()
    }

    #[test]
    fn test_single_currency_report() {
        let wallets = vec![wallet(Currency::EUR, "100")];
        let rates = table(&[(Currency::EUR, "4.30")]);

        let report = balance_report(&wallets, &rates);

        assert_eq!(report.wallet_report.len(), 1);
        assert_eq!(report.wallet_report[0].currency, Currency::EUR);
        assert_eq!(report.wallet_report[0].value_pln, dec("430.00"));
        assert_eq!(report.total_pln, dec("430.00"));
        assert_eq!(
            report.effective_date,
            NaiveDate::from_ymd_opt(2025, 2, 24).unwrap()
        );
    }

    #[test]
    fn test_total_rounds_once_at_the_end() {
        // Each value alone rounds to x.01; summing rounded values would give
        // 0.02 + 0.02, but the exact sum is 0.0298 -> 0.03.
        let wallets = vec![
            wallet(Currency::EUR, "0.0149"),
            wallet(Currency::USD, "0.0149"),
        ];
        let rates = table(&[(Currency::EUR, "1"), (Currency::USD, "1")]);

        let report = balance_report(&wallets, &rates);

        assert_eq!(report.total_pln, dec("0.03"));
    }

    #[test]
    fn test_rounding_stays_within_half_a_grosz() {
        let cases = [
            ("123.456", "4.3021"),
            ("0.01", "3.9999"),
            ("99999.99", "1.2345"),
            ("7", "0.2963"),
        ];
        for (amount, rate) in cases {
            let wallets = vec![wallet(Currency::CHF, amount)];
            let rates = table(&[(Currency::CHF, rate)]);

            let report = balance_report(&wallets, &rates);

            let exact = dec(amount) * dec(rate);
            let diff = (report.wallet_report[0].value_pln - exact).abs();
            assert!(diff <= dec("0.005"), "diff {diff} for {amount} * {rate}");
        }
    }

    #[test]
    fn test_missing_currency_skipped_from_full_report() {
        let wallets = vec![
            wallet(Currency::EUR, "100"),
            wallet(Currency::JPY, "5000"),
        ];
        let rates = table(&[(Currency::EUR, "4.30")]);

        let report = balance_report(&wallets, &rates);

        assert_eq!(report.wallet_report.len(), 1);
        assert_eq!(report.total_pln, dec("430.00"));
    }

    #[test]
    fn test_update_report_values_mutated_currency() {
        let updated = wallet(Currency::EUR, "100");
        let all = vec![updated.clone(), wallet(Currency::USD, "10")];
        let rates = table(&[(Currency::EUR, "4.30"), (Currency::USD, "3.95")]);

        let report =
            wallet_update_report(&updated, &all, &rates, "Successfully added 100 EUR.".into());

        assert_eq!(report.wallet_report.len(), 1);
        assert_eq!(report.wallet_report[0].amount, dec("100"));
        assert_eq!(report.wallet_report[0].value_pln, Some(dec("430.00")));
        assert_eq!(report.total_in_pln, dec("469.50"));
    }

    #[test]
    fn test_update_report_marks_unrated_currency_unavailable() {
        let updated = wallet(Currency::XDR, "50");
        let all = vec![updated.clone(), wallet(Currency::EUR, "100")];
        let rates = table(&[(Currency::EUR, "4.30")]);

        let report = wallet_update_report(&updated, &all, &rates, "msg".into());

        assert_eq!(report.wallet_report[0].value_pln, None);
        // total still covers the rated currencies
        assert_eq!(report.total_in_pln, dec("430.00"));
    }

    #[test]
    fn test_empty_wallets_yield_zero_total() {
        let report = balance_report(&[], &table(&[(Currency::EUR, "4.30")]));
        assert!(report.wallet_report.is_empty());
        assert_eq!(report.total_pln, dec("0.00"));
    }
}
