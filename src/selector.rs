// 🎯 Pair Selector - best affordable (PRODUNO, PRODDOS) pair
//
// Given two pools and a budget, pick one product from each pool so that the
// combined price is as large as possible without exceeding the budget.
//
// Tie-break: among pairs with the same maximal total, the first one in
// pool-A-major / pool-B-minor enumeration order wins, with each pool kept in
// the order the caller supplied. The pools are never reordered here.

use serde::Serialize;
use std::collections::HashMap;

use crate::product::{Price, Product};

pub const MSG_FOUND: &str = "Products found successfully.";
pub const MSG_EMPTY_POOL: &str = "No combination available across both categories within budget.";
pub const MSG_NO_AFFORDABLE: &str = "No combination found that does not exceed the budget.";

// ============================================================================
// SELECTION OUTCOME
// ============================================================================

/// Result of one selection call. Always both-or-neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairSelection<'a> {
    Found {
        first: &'a Product,
        second: &'a Product,
        total: Price,
    },

    /// At least one pool had nothing within budget
    EmptyPool,

    /// Both pools had items, but every pair overshoots the budget
    NoAffordableCombination,
}

/// Machine-readable tag for a selection outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionKind {
    Found,
    EmptyPool,
    NoAffordableCombination,
}

impl<'a> PairSelection<'a> {
    pub fn kind(&self) -> SelectionKind {
        match self {
            PairSelection::Found { .. } => SelectionKind::Found,
            PairSelection::EmptyPool => SelectionKind::EmptyPool,
            PairSelection::NoAffordableCombination => SelectionKind::NoAffordableCombination,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            PairSelection::Found { .. } => MSG_FOUND,
            PairSelection::EmptyPool => MSG_EMPTY_POOL,
            PairSelection::NoAffordableCombination => MSG_NO_AFFORDABLE,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, PairSelection::Found { .. })
    }

    pub fn total(&self) -> Option<Price> {
        match self {
            PairSelection::Found { total, .. } => Some(*total),
            _ => None,
        }
    }

    pub fn pair(&self) -> Option<(&'a Product, &'a Product)> {
        match *self {
            PairSelection::Found { first, second, .. } => Some((first, second)),
            _ => None,
        }
    }
}

impl SelectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionKind::Found => "found",
            SelectionKind::EmptyPool => "empty_pool",
            SelectionKind::NoAffordableCombination => "no_affordable_combination",
        }
    }
}

// ============================================================================
// REFERENCE ALGORITHM
// ============================================================================

/// Exhaustive O(|a| × |b|) search.
///
/// Pools are expected to be pre-filtered to `price <= budget`, but unfiltered
/// pools give the same answer.
pub fn select_best_pair<'a>(
    pool_a: &'a [Product],
    pool_b: &'a [Product],
    budget: Price,
) -> PairSelection<'a> {
    if pool_a.is_empty() || pool_b.is_empty() {
        return PairSelection::EmptyPool;
    }

    let mut best: Option<(&'a Product, &'a Product, Price)> = None;

    for first in pool_a {
        for second in pool_b {
            // A sum past i64::MAX cents is over any budget
            let total = match first.price.checked_add(second.price) {
                Some(total) if total <= budget => total,
                _ => continue,
            };

            // Strict improvement only: the earliest tie stays
            let improves = match best {
                Some((_, _, best_total)) => total > best_total,
                None => true,
            };
            if improves {
                best = Some((first, second, total));
            }
        }
    }

    match best {
        Some((first, second, total)) => PairSelection::Found {
            first,
            second,
            total,
        },
        None => PairSelection::NoAffordableCombination,
    }
}

// ============================================================================
// SORTED VARIANT
// ============================================================================

/// Sort + two-pointer search with the same answer as `select_best_pair`.
///
/// The two-pointer pass only finds the best total. The pair itself is then
/// recovered by walking pool A in supplied order and looking up the first
/// pool B index with the complementary price.
pub fn select_best_pair_sorted<'a>(
    pool_a: &'a [Product],
    pool_b: &'a [Product],
    budget: Price,
) -> PairSelection<'a> {
    if pool_a.is_empty() || pool_b.is_empty() {
        return PairSelection::EmptyPool;
    }

    let cap = budget.cents();

    let mut a_prices: Vec<i64> = pool_a.iter().map(|p| p.price.cents()).collect();
    let mut b_prices: Vec<i64> = pool_b.iter().map(|p| p.price.cents()).collect();
    a_prices.sort_unstable();
    b_prices.sort_unstable();

    let mut best_total: Option<i64> = None;
    let mut j = b_prices.len();

    let fits = |a: i64, b: i64| a.checked_add(b).filter(|&total| total <= cap);

    for &a in &a_prices {
        while j > 0 && fits(a, b_prices[j - 1]).is_none() {
            j -= 1;
        }
        let Some(total) = j.checked_sub(1).and_then(|k| fits(a, b_prices[k])) else {
            break;
        };
        best_total = Some(best_total.map_or(total, |best| best.max(total)));
    }

    let Some(target) = best_total else {
        return PairSelection::NoAffordableCombination;
    };

    let mut first_b_by_price: HashMap<i64, usize> = HashMap::with_capacity(pool_b.len());
    for (index, product) in pool_b.iter().enumerate() {
        first_b_by_price.entry(product.price.cents()).or_insert(index);
    }

    pool_a
        .iter()
        .find_map(|first| {
            // target and prices are non-negative, so the difference cannot overflow
            let index = *first_b_by_price.get(&(target - first.price.cents()))?;
            let second = &pool_b[index];
            first
                .price
                .checked_add(second.price)
                .map(|total| PairSelection::Found { first, second, total })
        })
        .unwrap_or(PairSelection::NoAffordableCombination)
}
