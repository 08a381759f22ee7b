use chrono::NaiveDate;
use proptest::prelude::*;
use stock_pairing::{
    select_best_pair, select_best_pair_sorted, Category, PairSelection, Price, Product,
};

fn to_pool(category: Category, first_id: i64, cents: &[i64]) -> Vec<Product> {
    cents
        .iter()
        .enumerate()
        .map(|(i, &c)| Product {
            id: first_id + i as i64,
            price: Price::from_cents(c).unwrap(),
            load_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            category,
        })
        .collect()
}

/// Mostly small prices so ties are common, with the odd one near i64::MAX
fn price_cents() -> impl Strategy<Value = i64> {
    prop_oneof![
        9 => 0i64..=6_000,
        1 => (i64::MAX - 10_000)..=i64::MAX,
    ]
}

fn prices() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(price_cents(), 0..12)
}

/// Enumeration index of a pair, pool-A-major
fn position(pool_a: &[Product], pool_b: &[Product], first: &Product, second: &Product) -> usize {
    let i = pool_a.iter().position(|p| p.id == first.id).unwrap();
    let j = pool_b.iter().position(|p| p.id == second.id).unwrap();
    i * pool_b.len() + j
}

proptest! {
    #[test]
    fn found_pair_is_sound_and_optimal(a in prices(), b in prices(), budget in 1u32..=100) {
        let pool_a = to_pool(Category::ProdUno, 1, &a);
        let pool_b = to_pool(Category::ProdDos, 1_000, &b);
        let cap = Price::from_units(budget);

        if let PairSelection::Found { first, second, total } = select_best_pair(&pool_a, &pool_b, cap) {
            prop_assert!(pool_a.iter().any(|p| p.id == first.id));
            prop_assert!(pool_b.iter().any(|p| p.id == second.id));
            prop_assert_eq!(Some(total), first.price.checked_add(second.price));
            prop_assert!(total <= cap);

            for x in &pool_a {
                for y in &pool_b {
                    if let Some(sum) = x.price.checked_add(y.price) {
                        prop_assert!(sum > cap || sum <= total, "better pair exists: {} > {}", sum, total);
                    }
                }
            }
        }
    }

    #[test]
    fn ties_resolve_to_first_in_enumeration(a in prices(), b in prices(), budget in 1u32..=100) {
        let pool_a = to_pool(Category::ProdUno, 1, &a);
        let pool_b = to_pool(Category::ProdDos, 1_000, &b);
        let cap = Price::from_units(budget);

        if let PairSelection::Found { first, second, total } = select_best_pair(&pool_a, &pool_b, cap) {
            let chosen = position(&pool_a, &pool_b, first, second);
            for (i, x) in pool_a.iter().enumerate() {
                for (j, y) in pool_b.iter().enumerate() {
                    if x.price.checked_add(y.price) == Some(total) {
                        prop_assert!(chosen <= i * pool_b.len() + j);
                    }
                }
            }
        }
    }

    #[test]
    fn empty_pool_regardless_of_budget(b in prices(), budget in 1u32..=1_000_000) {
        let pool_b = to_pool(Category::ProdDos, 1_000, &b);
        let cap = Price::from_units(budget);

        prop_assert_eq!(select_best_pair(&[], &pool_b, cap), PairSelection::EmptyPool);
        prop_assert_eq!(select_best_pair(&pool_b, &[], cap), PairSelection::EmptyPool);
    }

    #[test]
    fn infeasible_when_cheapest_pair_overshoots(
        a in prop::collection::vec(price_cents(), 1..8),
        b in prop::collection::vec(price_cents(), 1..8),
        budget in 1u32..=100,
    ) {
        let pool_a = to_pool(Category::ProdUno, 1, &a);
        let pool_b = to_pool(Category::ProdDos, 1_000, &b);
        let cap = Price::from_units(budget);
        let cheapest = a.iter().min().unwrap().checked_add(*b.iter().min().unwrap());

        let result = select_best_pair(&pool_a, &pool_b, cap);
        if cheapest.map_or(true, |c| c > cap.cents()) {
            prop_assert_eq!(result, PairSelection::NoAffordableCombination);
        } else {
            prop_assert!(result.is_found());
        }
    }

    #[test]
    fn repeated_calls_agree(a in prices(), b in prices(), budget in 1u32..=100) {
        let pool_a = to_pool(Category::ProdUno, 1, &a);
        let pool_b = to_pool(Category::ProdDos, 1_000, &b);
        let cap = Price::from_units(budget);

        prop_assert_eq!(
            select_best_pair(&pool_a, &pool_b, cap),
            select_best_pair(&pool_a, &pool_b, cap)
        );
    }

    #[test]
    fn sorted_variant_matches_nested_loop(a in prices(), b in prices(), budget in 1u32..=100) {
        let pool_a = to_pool(Category::ProdUno, 1, &a);
        let pool_b = to_pool(Category::ProdDos, 1_000, &b);
        let cap = Price::from_units(budget);

        let nested = select_best_pair(&pool_a, &pool_b, cap);
        let sorted = select_best_pair_sorted(&pool_a, &pool_b, cap);

        prop_assert_eq!(nested.pair().map(|(x, y)| (x.id, y.id)), sorted.pair().map(|(x, y)| (x.id, y.id)));
        prop_assert_eq!(nested, sorted);
    }
}
