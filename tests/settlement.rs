use std::collections::BTreeMap;

use proptest::prelude::*;
use rust_decimal::Decimal;
use splitter_rs::{
    compute_balances, compute_owed_shares, enumerate_gross_transfers, gross_obligations,
    plan_transfers, Expense, Participant, SplitMethod,
};

#[derive(Clone, Debug)]
struct ExpenseSeed {
    method: u8,
    amount: i64,
    payer: usize,
    weights: Vec<u8>,
    target: Option<usize>,
}

fn expense_seed() -> impl Strategy<Value = ExpenseSeed> {
    (
        0u8..3,
        1i64..=100_000,
        0usize..6,
        prop::collection::vec(any::<u8>(), 6),
        prop::option::of(0usize..6),
    )
        .prop_map(|(method, amount, payer, weights, target)| ExpenseSeed {
            method,
            amount,
            payer,
            weights,
            target,
        })
}

fn make_participants(count: usize) -> Vec<Participant> {
    (0..count)
        .map(|i| Participant::new(&format!("p{i}"), &format!("Person {i}"), i as i64))
        .collect()
}

/// Split `total` proportionally to `weights`; the last weighted participant takes the
/// remainder, so the parts always add up to `total`.
fn proportional(total: i64, weights: &[i64]) -> Vec<i64> {
    let sum: i64 = weights.iter().sum();
    let mut parts: Vec<i64> = weights.iter().map(|w| total * w / sum).collect();
    let assigned: i64 = parts.iter().sum();
    if let Some(last) = weights.iter().rposition(|w| *w > 0) {
        parts[last] += total - assigned;
    }
    parts
}

fn make_expense(index: usize, seed: &ExpenseSeed, count: usize) -> Expense {
    let id = |i: usize| format!("p{}", i % count);
    let mut weights: Vec<i64> = seed.weights[..count].iter().map(|w| *w as i64).collect();
    if weights.iter().all(|w| *w == 0) {
        weights[0] = 1;
    }
    let payer = id(seed.payer);

    let mut expense = match seed.method {
        0 => {
            let mut expense =
                Expense::new(&format!("e{index}"), "", seed.amount, &payer, SplitMethod::Equally);
            expense.split_participants = (0..count).filter(|i| weights[*i] > 0).map(id).collect();
            expense
        }
        1 => {
            let mut expense =
                Expense::new(&format!("e{index}"), "", seed.amount, &payer, SplitMethod::Amount);
            expense.split_details = proportional(seed.amount, &weights)
                .into_iter()
                .enumerate()
                .map(|(i, part)| (id(i), Decimal::from(part)))
                .collect();
            expense
        }
        _ => {
            let mut expense = Expense::new(
                &format!("e{index}"),
                "",
                seed.amount,
                &payer,
                SplitMethod::Percentage,
            );
            expense.split_details = proportional(100, &weights)
                .into_iter()
                .enumerate()
                .map(|(i, part)| (id(i), Decimal::from(part)))
                .collect();
            expense
        }
    };
    expense.penny_rounding_target_id = seed.target.map(id);
    expense
}

fn make_expenses(seeds: &[ExpenseSeed], count: usize) -> Vec<Expense> {
    seeds
        .iter()
        .enumerate()
        .map(|(i, seed)| make_expense(i, seed, count))
        .collect()
}

proptest! {
    #[test]
    fn owed_shares_add_up_to_amount(
        member_count in 1usize..=6,
        seed in expense_seed(),
    ) {
        let participants = make_participants(member_count);
        let expense = make_expense(0, &seed, member_count);
        let shares = compute_owed_shares(&expense, &participants);

        let total: Decimal = shares.values().sum();
        prop_assert_eq!(total, Decimal::from(expense.amount));
    }

    #[test]
    fn rounding_target_absorbs_remainder(
        member_count in 1usize..=6,
        amount in 1i64..=1_000_000,
        target in 0usize..6,
    ) {
        let participants = make_participants(member_count);
        let target = format!("p{}", target % member_count);
        let expense = Expense::new("e0", "", amount, "p0", SplitMethod::Equally)
            .with_penny_rounding_target(&target);
        let shares = compute_owed_shares(&expense, &participants);

        let ideal = Decimal::from(amount) / Decimal::from(member_count);
        for (p, share) in &shares {
            if *p != target {
                prop_assert!(*share <= ideal);
                prop_assert_eq!(*share % Decimal::from(10), Decimal::ZERO);
            }
        }
        let total: Decimal = shares.values().sum();
        prop_assert_eq!(total, Decimal::from(amount));
    }

    #[test]
    fn percentage_remainder_goes_to_payer(
        amount in 1i64..=1_000_000,
        percentages in prop::collection::vec(0i64..=100, 3),
        payer in 0usize..3,
    ) {
        let participants = make_participants(3);
        let details = proportional(100, &percentages.iter().map(|p| p + 1).collect::<Vec<_>>());
        let mut expense =
            Expense::new("e0", "", amount, &format!("p{payer}"), SplitMethod::Percentage);
        expense.split_details = details
            .iter()
            .enumerate()
            .map(|(i, d)| (format!("p{i}"), Decimal::from(*d)))
            .collect();
        let shares = compute_owed_shares(&expense, &participants);

        for (i, d) in details.iter().enumerate() {
            let floor = amount * d / 100;
            let share = shares.get(&format!("p{i}")).copied().unwrap_or_default();
            if i == payer {
                prop_assert!(share >= Decimal::from(floor));
            } else {
                prop_assert_eq!(share, Decimal::from(floor));
            }
        }
        let total: Decimal = shares.values().sum();
        prop_assert_eq!(total, Decimal::from(amount));
    }

    #[test]
    fn balances_sum_to_zero(
        member_count in 1usize..=6,
        seeds in prop::collection::vec(expense_seed(), 0..=20),
    ) {
        let participants = make_participants(member_count);
        let expenses = make_expenses(&seeds, member_count);
        let balances = compute_balances(&participants, &expenses);

        prop_assert_eq!(balances.len(), member_count);
        let total: Decimal = balances.values().sum();
        prop_assert_eq!(total, Decimal::ZERO);
    }

    #[test]
    fn transfers_settle_integer_balances_exactly(
        amounts in prop::collection::vec(-50_000i64..=50_000, 1..=8),
    ) {
        // Make the balances add up to zero by giving the opposite of their sum to one more member.
        let mut values = amounts.clone();
        values.push(-amounts.iter().sum::<i64>());
        let balances: BTreeMap<String, Decimal> = values
            .iter()
            .enumerate()
            .map(|(i, v)| (format!("p{i}"), Decimal::from(*v)))
            .collect();
        let transfers = plan_transfers(&balances);

        let creditors = values.iter().filter(|v| **v > 0).count();
        let debtors = values.iter().filter(|v| **v < 0).count();
        if creditors > 0 && debtors > 0 {
            prop_assert!(transfers.len() < creditors + debtors);
        } else {
            prop_assert!(transfers.is_empty());
        }

        for (p, balance) in &balances {
            let received: i64 = transfers.iter().filter(|t| &t.to == p).map(|t| t.amount).sum();
            let sent: i64 = transfers.iter().filter(|t| &t.from == p).map(|t| t.amount).sum();
            prop_assert_eq!(Decimal::from(received - sent), *balance);
            prop_assert!(received == 0 || sent == 0);
        }
    }

    #[test]
    fn transfers_settle_project_balances(
        member_count in 1usize..=6,
        seeds in prop::collection::vec(expense_seed(), 0..=20),
    ) {
        let participants = make_participants(member_count);
        let expenses = make_expenses(&seeds, member_count);
        let balances = compute_balances(&participants, &expenses);
        let transfers = plan_transfers(&balances);

        let creditors = balances.values().filter(|b| **b > Decimal::ZERO).count();
        for (p, balance) in &balances {
            let received: i64 = transfers.iter().filter(|t| &t.to == p).map(|t| t.amount).sum();
            let sent: i64 = transfers.iter().filter(|t| &t.from == p).map(|t| t.amount).sum();
            if *balance > Decimal::ZERO {
                prop_assert!((Decimal::from(received) - *balance).abs() <= Decimal::ONE);
            } else {
                // A debtor pays each creditor at most once, each time off by less than one unit.
                prop_assert_eq!(received, 0);
                prop_assert!((Decimal::from(sent) + *balance).abs() <= Decimal::from(creditors + 1));
            }
        }
    }

    #[test]
    fn gross_obligations_reproduce_balances(
        member_count in 1usize..=6,
        seeds in prop::collection::vec(expense_seed(), 0..=20),
    ) {
        let participants = make_participants(member_count);
        let expenses = make_expenses(&seeds, member_count);
        let balances = compute_balances(&participants, &expenses);
        let obligations = gross_obligations(&participants, &expenses);

        for ((from, to), amount) in &obligations {
            prop_assert!(from != to);
            prop_assert!(*amount > Decimal::ZERO);
        }
        for (p, balance) in &balances {
            let received: Decimal = obligations
                .iter()
                .filter(|((_, to), _)| to == p)
                .map(|(_, amount)| *amount)
                .sum();
            let sent: Decimal = obligations
                .iter()
                .filter(|((from, _), _)| from == p)
                .map(|(_, amount)| *amount)
                .sum();
            prop_assert_eq!(received - sent, *balance);
        }
    }

    #[test]
    fn gross_transfers_pay_each_payer_in_full(
        member_count in 1usize..=6,
        seeds in prop::collection::vec(expense_seed(), 0..=20),
    ) {
        let participants = make_participants(member_count);
        let expenses = make_expenses(&seeds, member_count);
        let obligations = gross_obligations(&participants, &expenses);
        let transfers = enumerate_gross_transfers(&participants, &expenses);

        for t in &transfers {
            let exact = obligations[&(t.from.clone(), t.to.clone())];
            prop_assert!(t.amount > 0);
            prop_assert!((Decimal::from(t.amount) - exact).abs() < Decimal::ONE);
        }
        for p in participants.iter().map(|p| &p.id) {
            let owed: Decimal = obligations
                .iter()
                .filter(|((_, to), _)| to == p)
                .map(|(_, amount)| *amount)
                .sum();
            let received: i64 = transfers.iter().filter(|t| &t.to == p).map(|t| t.amount).sum();
            prop_assert!((Decimal::from(received) - owed).abs() <= Decimal::new(5, 1));
        }
    }
}
