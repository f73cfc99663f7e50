use chrono::NaiveDate;
use rstest::{fixture, rstest};
use rust_decimal_macros::dec;
use tripsplit_application::{
    ExpenseRecord, LedgerConfig, LedgerError, LedgerWarning, Trip, TripLedger,
};
use tripsplit_domain::{
    CurrencyCode, ExpenseCategory, FuzzyNameMatcher, ItineraryMetadata, Money, ParticipantId,
    ParticipantRole, SplitType, TripParticipant,
    metadata::TransportDetails,
    services::{CustomSplit, PercentagePolicy, PercentageSplit, ShareBuildError, SplitSpec},
};
use uuid::Uuid;

const ALICE: ParticipantId = ParticipantId(Uuid::from_u128(0xa));
const BOB: ParticipantId = ParticipantId(Uuid::from_u128(0xb));
const CAROL: ParticipantId = ParticipantId(Uuid::from_u128(0xc));
const DANA: ParticipantId = ParticipantId(Uuid::from_u128(0xd));
const VICTOR: ParticipantId = ParticipantId(Uuid::from_u128(0xe));

fn date(value: &str) -> NaiveDate {
    value.parse().unwrap()
}

#[fixture]
fn participants() -> Vec<TripParticipant> {
    vec![
        TripParticipant::new(ALICE, "Alice Martin").with_role(ParticipantRole::Owner),
        TripParticipant::new(BOB, "Bob Smith"),
        TripParticipant::new(CAROL, "Carol Jones"),
        TripParticipant::new(DANA, "Dana Reyes").with_window(Some(date("2024-06-05")), None),
        TripParticipant::new(VICTOR, "Victor Hale").with_role(ParticipantRole::Viewer),
    ]
}

fn record(amount: i64, on: &str) -> ExpenseRecord {
    ExpenseRecord {
        id: None,
        description: None,
        amount: Money::from_i64(amount),
        currency: CurrencyCode::USD,
        date: date(on),
        category: None,
        payer: None,
        split: SplitSpec::equal_all(),
        fx_rate: None,
        metadata: None,
    }
}

fn balance_pairs(summary: &tripsplit_application::SettlementSummary) -> Vec<(ParticipantId, i64)> {
    summary
        .balances
        .iter()
        .map(|balance| (balance.participant_id, balance.amount.amount()))
        .collect()
}

#[rstest]
fn equal_split_excludes_viewers_and_absent_members(participants: Vec<TripParticipant>) {
    let ledger = TripLedger::new(
        &participants,
        CurrencyCode::USD,
        &FuzzyNameMatcher,
        LedgerConfig::default(),
    )
    .unwrap();

    let summary = ledger.summarize(&[record(9000, "2024-06-02")]).unwrap();

    assert_eq!(
        balance_pairs(&summary),
        vec![(ALICE, 6000), (BOB, -3000), (CAROL, -3000), (DANA, 0)]
    );
    assert_eq!(summary.total_spent, Money::from_i64(9000));
    assert!(summary.warnings.is_empty());
}

#[rstest]
fn late_joiner_shares_expenses_inside_window(participants: Vec<TripParticipant>) {
    let ledger = TripLedger::new(
        &participants,
        CurrencyCode::USD,
        &FuzzyNameMatcher,
        LedgerConfig::default(),
    )
    .unwrap();

    let prepared = ledger
        .prepare_expense(0, &record(10_001, "2024-06-05"))
        .unwrap();

    let shares: Vec<(ParticipantId, i64)> = prepared
        .expense
        .shares
        .iter()
        .map(|share| (share.participant_id, share.share_amount.amount()))
        .collect();
    assert_eq!(
        shares,
        vec![(ALICE, 2501), (BOB, 2500), (CAROL, 2500), (DANA, 2500)]
    );
}

#[rstest]
fn named_payer_and_settlements(participants: Vec<TripParticipant>) {
    let ledger = TripLedger::new(
        &participants,
        CurrencyCode::USD,
        &FuzzyNameMatcher,
        LedgerConfig::default(),
    )
    .unwrap();
    let dinner = ExpenseRecord {
        payer: Some("bob".to_string()),
        split: SplitSpec::Equal {
            participants: Some(vec![
                "Alice".to_string(),
                "Bob".to_string(),
                "Carol".to_string(),
            ]),
            split_count: None,
        },
        ..record(10_000, "2024-06-01")
    };

    let summary = ledger.summarize(&[dinner]).unwrap();

    assert_eq!(
        balance_pairs(&summary),
        vec![(ALICE, -3334), (BOB, 6667), (CAROL, -3333), (DANA, 0)]
    );
    let settlements: Vec<(ParticipantId, ParticipantId, i64)> = summary
        .settlements
        .iter()
        .map(|settlement| (settlement.from, settlement.to, settlement.amount.amount()))
        .collect();
    assert_eq!(settlements, vec![(ALICE, BOB, 3334), (CAROL, BOB, 3333)]);
    assert!(
        summary
            .settlements
            .iter()
            .all(|settlement| settlement.currency == CurrencyCode::USD)
    );
}

#[rstest]
fn unknown_payer_falls_back_to_owner(participants: Vec<TripParticipant>) {
    let ledger = TripLedger::new(
        &participants,
        CurrencyCode::USD,
        &FuzzyNameMatcher,
        LedgerConfig::default(),
    )
    .unwrap();
    let taxi = ExpenseRecord {
        payer: Some("Zed".to_string()),
        ..record(3000, "2024-06-01")
    };

    let prepared = ledger.prepare_expense(4, &taxi).unwrap();

    assert_eq!(prepared.expense.payer_id, ALICE);
    assert!(matches!(
        prepared.warnings.as_slice(),
        [LedgerWarning::PayerDefaulted { index: 4, requested, .. }] if requested == "Zed"
    ));
}

#[rstest]
fn viewer_cannot_be_payer(participants: Vec<TripParticipant>) {
    let ledger = TripLedger::new(
        &participants,
        CurrencyCode::USD,
        &FuzzyNameMatcher,
        LedgerConfig::default(),
    )
    .unwrap();
    let snacks = ExpenseRecord {
        payer: Some(VICTOR.to_string()),
        ..record(900, "2024-06-01")
    };

    let prepared = ledger.prepare_expense(0, &snacks).unwrap();

    assert_eq!(prepared.expense.payer_id, ALICE);
    assert_eq!(prepared.warnings.len(), 1);
}

#[rstest]
fn foreign_currency_is_converted(participants: Vec<TripParticipant>) {
    let ledger = TripLedger::new(
        &participants,
        CurrencyCode::USD,
        &FuzzyNameMatcher,
        LedgerConfig::default(),
    )
    .unwrap();
    let museum = ExpenseRecord {
        currency: CurrencyCode::EUR,
        fx_rate: Some(dec!(1.1)),
        split: SplitSpec::Custom {
            splits: vec![
                CustomSplit {
                    participant: "Bob".to_string(),
                    amount: Money::from_i64(2001),
                },
                CustomSplit {
                    participant: "Carol".to_string(),
                    amount: Money::from_i64(1999),
                },
            ],
        },
        ..record(4000, "2024-06-03")
    };

    let prepared = ledger.prepare_expense(0, &museum).unwrap();

    assert_eq!(prepared.expense.currency, CurrencyCode::USD);
    assert_eq!(prepared.expense.amount, Money::from_i64(4400));
    assert!(prepared.expense.is_balanced());
    assert_eq!(prepared.expense.split_type, SplitType::Custom);
}

#[rstest]
fn broken_records_are_skipped_with_warnings(participants: Vec<TripParticipant>) {
    let ledger = TripLedger::new(
        &participants,
        CurrencyCode::USD,
        &FuzzyNameMatcher,
        LedgerConfig::default(),
    )
    .unwrap();
    let id = Uuid::from_u128(42);
    let records = vec![
        ExpenseRecord {
            id: Some(id),
            ..record(6000, "2024-06-01")
        },
        ExpenseRecord {
            id: Some(id),
            ..record(6000, "2024-06-01")
        },
        ExpenseRecord {
            currency: CurrencyCode::GBP,
            ..record(1000, "2024-06-01")
        },
        ExpenseRecord {
            split: SplitSpec::Custom {
                splits: vec![CustomSplit {
                    participant: "Bob".to_string(),
                    amount: Money::from_i64(10),
                }],
            },
            ..record(5500, "2024-06-01")
        },
    ];

    let summary = ledger.summarize(&records).unwrap();

    assert_eq!(summary.expense_count, 1);
    assert_eq!(
        balance_pairs(&summary),
        vec![(ALICE, 4000), (BOB, -2000), (CAROL, -2000), (DANA, 0)]
    );
    let kinds: Vec<&str> = summary
        .warnings
        .iter()
        .map(|warning| match warning {
            LedgerWarning::PayerDefaulted { .. } => "payer",
            LedgerWarning::ExpenseSkipped { .. } => "skipped",
            LedgerWarning::DuplicateExpense { .. } => "duplicate",
        })
        .collect();
    assert_eq!(kinds, vec!["duplicate", "skipped", "skipped"]);
    assert!(summary.warnings[2].to_string().contains("expense #3"));
}

#[rstest]
fn overflowing_custom_split_is_never_accepted(participants: Vec<TripParticipant>) {
    let ledger = TripLedger::new(
        &participants,
        CurrencyCode::USD,
        &FuzzyNameMatcher,
        LedgerConfig::default(),
    )
    .unwrap();
    let custom = |participant: &str, amount: i64| CustomSplit {
        participant: participant.to_string(),
        amount: Money::from_i64(amount),
    };
    let wrapped = ExpenseRecord {
        split: SplitSpec::Custom {
            splits: vec![
                custom("Alice", i64::MAX),
                custom("Bob", i64::MAX),
                custom("Alice", 2),
            ],
        },
        ..record(0, "2024-06-01")
    };

    assert_eq!(
        ledger.prepare_expense(0, &wrapped),
        Err(LedgerError::Shares {
            index: 0,
            source: ShareBuildError::AmountOutOfRange,
        })
    );

    let summary = ledger.summarize(&[wrapped]).unwrap();
    assert_eq!(summary.expense_count, 0);
    assert!(summary.settlements.is_empty());
    assert!(matches!(
        summary.warnings.as_slice(),
        [LedgerWarning::ExpenseSkipped { index: 0, .. }]
    ));
}

#[rstest]
fn trip_total_past_i64_is_an_error(participants: Vec<TripParticipant>) {
    let ledger = TripLedger::new(
        &participants,
        CurrencyCode::USD,
        &FuzzyNameMatcher,
        LedgerConfig::default(),
    )
    .unwrap();
    let unsplit = ExpenseRecord {
        split: SplitSpec::None,
        ..record(i64::MAX, "2024-06-01")
    };

    assert_eq!(
        ledger.summarize(&[unsplit.clone(), unsplit]),
        Err(LedgerError::TotalOutOfRange)
    );
}

#[rstest]
fn strict_policy_rejects_percentage_drift(participants: Vec<TripParticipant>) {
    let config = LedgerConfig {
        percentage_policy: PercentagePolicy::Strict,
        ..LedgerConfig::default()
    };
    let ledger = TripLedger::new(&participants, CurrencyCode::USD, &FuzzyNameMatcher, config)
        .unwrap();
    let hotel = ExpenseRecord {
        split: SplitSpec::Percentage {
            splits: vec![
                PercentageSplit {
                    participant: "Alice".to_string(),
                    percentage: dec!(60),
                },
                PercentageSplit {
                    participant: "Bob".to_string(),
                    percentage: dec!(50),
                },
            ],
        },
        ..record(10_000, "2024-06-01")
    };

    let err = ledger.prepare_expense(7, &hotel).unwrap_err();

    assert_eq!(
        err,
        LedgerError::Shares {
            index: 7,
            source: ShareBuildError::PercentageTotalMismatch { total: dec!(110) },
        }
    );
    assert_eq!(err.expense_index(), Some(7));
}

#[test]
fn trip_without_shareholders_is_rejected() {
    let viewers = vec![TripParticipant::new(VICTOR, "Victor Hale").with_role(ParticipantRole::Viewer)];
    let result = TripLedger::new(
        &viewers,
        CurrencyCode::USD,
        &FuzzyNameMatcher,
        LedgerConfig::default(),
    );
    assert!(matches!(result, Err(LedgerError::NoParticipants)));
}

#[rstest]
fn category_comes_from_metadata_when_missing(participants: Vec<TripParticipant>) {
    let ledger = TripLedger::new(
        &participants,
        CurrencyCode::USD,
        &FuzzyNameMatcher,
        LedgerConfig::default(),
    )
    .unwrap();
    let train = ExpenseRecord {
        metadata: Some(ItineraryMetadata::Transport(TransportDetails::default())),
        ..record(1200, "2024-06-01")
    };

    let prepared = ledger.prepare_expense(0, &train).unwrap();

    assert_eq!(prepared.expense.category, ExpenseCategory::Transport);
}

#[test]
fn trip_file_deserializes() {
    let json = r#"{
        "name": "Lisbon",
        "currency": "EUR",
        "participants": [
            {"user_id": "00000000-0000-0000-0000-00000000000a", "full_name": "Alice Martin", "role": "owner"},
            {"user_id": "00000000-0000-0000-0000-00000000000b", "full_name": "Bob Smith"}
        ],
        "expenses": [
            {"amount": 4500, "currency": "EUR", "date": "2024-06-01", "payer": "Bob"},
            {
                "amount": 3000,
                "currency": "GBP",
                "date": "2024-06-02",
                "fx_rate": "1.17",
                "split": {"type": "custom", "splits": [{"participant": "Alice", "amount": 3000}]},
                "metadata": {"category": "dining", "restaurant": "Time Out Market"}
            }
        ]
    }"#;

    let trip: Trip = serde_json::from_str(json).unwrap();

    assert_eq!(trip.currency, CurrencyCode::EUR);
    assert_eq!(trip.participants[0].user_id, ALICE);
    assert_eq!(trip.expenses[0].split, SplitSpec::equal_all());
    assert_eq!(trip.expenses[1].fx_rate, Some(dec!(1.17)));
    assert_eq!(trip.expenses[1].resolved_category(), ExpenseCategory::Food);

    let ledger = TripLedger::new(
        &trip.participants,
        trip.currency,
        &FuzzyNameMatcher,
        LedgerConfig::default(),
    )
    .unwrap();
    let summary = ledger.summarize(&trip.expenses).unwrap();
    assert_eq!(summary.currency, CurrencyCode::EUR);
    assert_eq!(summary.total_spent, Money::from_i64(8010));
    assert!(summary.warnings.is_empty());
}
