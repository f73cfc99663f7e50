use std::fmt::Write;

use tripsplit_application::{ExpenseDraft, SettlementSummary, Trip};
use tripsplit_domain::{CurrencyCode, Money, ParticipantId};

pub fn format_money(amount: Money, currency: CurrencyCode) -> String {
    format!("{} {currency}", amount.to_major(currency))
}

fn format_signed(amount: Money, currency: CurrencyCode) -> String {
    if amount.is_positive() {
        format!("+{}", format_money(amount, currency))
    } else {
        format_money(amount, currency)
    }
}

fn display_name(trip: &Trip, id: ParticipantId) -> String {
    trip.participants
        .iter()
        .find(|participant| participant.user_id == id)
        .map(|participant| participant.full_name.clone())
        .unwrap_or_else(|| id.to_string())
}

pub fn render_summary(trip: &Trip, summary: &SettlementSummary) -> String {
    let currency = summary.currency;
    let mut out = String::new();

    let _ = writeln!(out, "Trip: {} ({currency})", trip.name);
    let _ = writeln!(
        out,
        "Expenses: {}, total spent {}",
        summary.expense_count,
        format_money(summary.total_spent, currency)
    );

    let names: Vec<String> = summary
        .balances
        .iter()
        .map(|balance| display_name(trip, balance.participant_id))
        .collect();
    let width = names.iter().map(|name| name.chars().count()).max().unwrap_or(0);

    let _ = writeln!(out, "\nBalances");
    for (balance, name) in summary.balances.iter().zip(&names) {
        let _ = writeln!(
            out,
            "  {name:<width$}  {}",
            format_signed(balance.amount, currency)
        );
    }

    let _ = writeln!(out, "\nSettlements");
    if summary.settlements.is_empty() {
        let _ = writeln!(out, "  Everyone is settled up.");
    }
    for settlement in &summary.settlements {
        let _ = writeln!(
            out,
            "  {} -> {}: {}",
            display_name(trip, settlement.from),
            display_name(trip, settlement.to),
            format_money(settlement.amount, settlement.currency)
        );
    }

    if !summary.warnings.is_empty() {
        let _ = writeln!(out, "\nWarnings");
        for warning in &summary.warnings {
            let _ = writeln!(out, "  {warning}");
        }
    }

    out.trim_end().to_string()
}

pub fn render_draft(draft: &ExpenseDraft) -> String {
    let mut out = String::new();
    let missing = "-";

    let _ = writeln!(out, "Description: {}", draft.description);
    let _ = writeln!(
        out,
        "Amount:      {}",
        draft
            .amount
            .map(|amount| format_money(amount, draft.currency))
            .unwrap_or_else(|| format!("{missing} {}", draft.currency))
    );
    let _ = writeln!(
        out,
        "Payer:       {}",
        draft.payer.as_deref().unwrap_or(missing)
    );
    let _ = writeln!(
        out,
        "With:        {}",
        if draft.participants.is_empty() {
            missing.to_string()
        } else {
            draft.participants.join(", ")
        }
    );
    let _ = writeln!(out, "Split:       {:?}", draft.split_type);
    let _ = write!(out, "Category:    {:?}", draft.category);
    if let Some(confidence) = draft.category_confidence {
        let _ = write!(out, " ({confidence:.1})");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tripsplit_application::{LedgerWarning, SettlementSummary};
    use tripsplit_domain::{Balance, ExpenseCategory, Settlement, TripParticipant};
    use tripsplit_tokenizer::DetectedSplit;
    use uuid::Uuid;

    const ALICE: ParticipantId = ParticipantId(Uuid::from_u128(1));
    const BOB: ParticipantId = ParticipantId(Uuid::from_u128(2));

    #[rstest]
    #[case::cents(Money::from_i64(1234), CurrencyCode::USD, "12.34 USD")]
    #[case::negative(Money::from_i64(-5), CurrencyCode::EUR, "-0.05 EUR")]
    #[case::yen(Money::from_i64(1500), CurrencyCode::JPY, "1500 JPY")]
    fn formats_money(#[case] amount: Money, #[case] currency: CurrencyCode, #[case] expected: &str) {
        assert_eq!(format_money(amount, currency), expected);
    }

    fn trip() -> Trip {
        Trip {
            name: "Lisbon".to_string(),
            currency: CurrencyCode::EUR,
            participants: vec![
                TripParticipant::new(ALICE, "Alice Martin"),
                TripParticipant::new(BOB, "Bob"),
            ],
            expenses: Vec::new(),
        }
    }

    #[test]
    fn renders_summary() {
        let summary = SettlementSummary {
            currency: CurrencyCode::EUR,
            total_spent: Money::from_i64(4000),
            expense_count: 1,
            balances: vec![
                Balance {
                    participant_id: ALICE,
                    amount: Money::from_i64(2000),
                },
                Balance {
                    participant_id: BOB,
                    amount: Money::from_i64(-2000),
                },
            ],
            settlements: vec![Settlement {
                from: BOB,
                to: ALICE,
                amount: Money::from_i64(2000),
                currency: CurrencyCode::EUR,
            }],
            warnings: vec![LedgerWarning::ExpenseSkipped {
                index: 1,
                reason: "no rate".to_string(),
            }],
        };

        let expected = "\
Trip: Lisbon (EUR)
Expenses: 1, total spent 40.00 EUR

Balances
  Alice Martin  +20.00 EUR
  Bob           -20.00 EUR

Settlements
  Bob -> Alice Martin: 20.00 EUR

Warnings
  expense #1 skipped: no rate";
        assert_eq!(render_summary(&trip(), &summary), expected);
    }

    #[test]
    fn settled_trip_says_so() {
        let summary = SettlementSummary {
            currency: CurrencyCode::EUR,
            total_spent: Money::ZERO,
            expense_count: 0,
            balances: Vec::new(),
            settlements: Vec::new(),
            warnings: Vec::new(),
        };
        assert!(render_summary(&trip(), &summary).ends_with("Everyone is settled up."));
    }

    #[test]
    fn renders_draft() {
        let draft = ExpenseDraft {
            description: "Dinner".to_string(),
            amount: Some(Money::from_i64(6050)),
            currency: CurrencyCode::USD,
            payer: Some("I".to_string()),
            participants: vec!["Alice".to_string(), "Bob".to_string()],
            split_type: DetectedSplit::Equal,
            split: None,
            category: ExpenseCategory::Food,
            category_confidence: Some(0.7),
        };

        let expected = "\
Description: Dinner
Amount:      60.50 USD
Payer:       I
With:        Alice, Bob
Split:       Equal
Category:    Food (0.7)";
        assert_eq!(render_draft(&draft), expected);
    }
}
