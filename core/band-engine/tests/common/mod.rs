//! FILENAME: core/band-engine/tests/common/mod.rs
//! PURPOSE: Shared fixtures for grouped-stream integration tests.

#![allow(dead_code)]

use std::cmp::Ordering;

use band_engine::{Aggregate, BandError, Binding, BindingKind, GroupingPolicy, LevelRollup};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sale {
    pub region: String,
    pub city: String,
    pub amount: i64,
}

pub fn sale(region: &str, city: &str, amount: i64) -> Sale {
    Sale {
        region: region.to_string(),
        city: city.to_string(),
        amount,
    }
}

/// Row count and amount sum. Group levels get rows directly; the grand total
/// only takes the totals of closed level-N groups.
#[derive(Debug, Default)]
pub struct Totals {
    pub rollup: LevelRollup,
    pub level: usize,
    pub level_count: usize,
    pub rows: u64,
    pub sum: i64,
}

impl Aggregate<Sale> for Totals {
    fn accumulate(&mut self, row: &Sale) -> Result<(), BandError> {
        self.rollup.ensure_open("accumulate")?;
        self.rows += 1;
        self.sum += row.amount;
        Ok(())
    }

    fn accumulate_level(&mut self, child: &Self, level: usize) -> Result<(), BandError> {
        self.rollup.accumulate_level(level)?;
        if self.level == self.level_count + 1 && level == self.level_count {
            self.rows += child.rows;
            self.sum += child.sum;
        }
        Ok(())
    }

    fn finish(&mut self) {
        self.rollup.finish();
    }

    fn is_finished(&self) -> bool {
        self.rollup.is_finished()
    }

    fn clear(&mut self) {
        self.rollup.clear();
        self.rows = 0;
        self.sum = 0;
    }
}

/// Level 2 = region, level 1 = city.
pub struct RegionCity;

impl GroupingPolicy for RegionCity {
    type Row = Sale;
    type Aggregate = Totals;

    fn level_count(&self) -> usize {
        2
    }

    fn compare_level(&self, a: &Sale, b: &Sale, level: usize) -> Result<Ordering, BandError> {
        match level {
            1 => Ok(a.city.cmp(&b.city)),
            2 => Ok(a.region.cmp(&b.region)),
            _ => Err(BandError::LevelOutOfRange { level, max: 2 }),
        }
    }

    fn new_aggregate(&self, level: usize) -> Result<Totals, BandError> {
        Ok(Totals {
            level,
            level_count: 2,
            ..Totals::default()
        })
    }
}

/// Compact text for one binding, taken at the moment it is received.
pub fn describe(binding: &Binding<Sale, Totals>) -> String {
    match binding.kind {
        BindingKind::Detail => {
            let row = binding.row().expect("detail carries a row");
            format!("D({},{},{})", row.region, row.city, row.amount)
        }
        kind => {
            let anchor = binding.anchor.as_ref().expect("group bindings carry an anchor");
            let label = match binding.level {
                1 => anchor.city.clone(),
                2 => anchor.region.clone(),
                _ => "grand".to_string(),
            };
            let agg = binding.aggregate().expect("group bindings carry an aggregate").borrow();
            match kind {
                BindingKind::Header => format!("H{}({})", binding.level, label),
                _ => format!("F{}({},sum={})", binding.level, label, agg.sum),
            }
        }
    }
}

/// Deterministic pseudo-random sales (linear congruential generator).
pub fn generated_sales(count: usize, seed: u64) -> Vec<Sale> {
    const REGIONS: [&str; 3] = ["EU", "US", "APAC"];
    const CITIES: [&str; 4] = ["North", "South", "East", "West"];

    let mut state = seed;
    let mut next = move || {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (state >> 33) as usize
    };
    (0..count)
        .map(|_| {
            let region = REGIONS[next() % REGIONS.len()];
            let city = CITIES[next() % CITIES.len()];
            sale(region, city, (next() % 100) as i64)
        })
        .collect()
}
