//! FILENAME: core/band-report/tests/common/mod.rs
//! PURPOSE: Shared fixtures for banded report tests.

#![allow(dead_code)]

use band_engine::Binding;
use band_report::{measure, AggregationType, Band, GroupDef, KeyedPolicy, Summary};

#[derive(Debug, Clone, PartialEq)]
pub struct Sale {
    pub region: String,
    pub city: String,
    pub amount: Option<f64>,
}

pub fn sale(region: &str, city: &str, amount: f64) -> Sale {
    Sale {
        region: region.to_string(),
        city: city.to_string(),
        amount: Some(amount),
    }
}

pub fn regional_sales() -> Vec<Sale> {
    vec![
        sale("US", "NY", 10.0),
        sale("US", "NY", 5.0),
        sale("US", "LA", 7.0),
        sale("EU", "Paris", 3.0),
    ]
}

pub type SalesPolicy = KeyedPolicy<Sale, Summary<Sale>>;

/// Region (outer) then City (inner), summing `amount`.
pub fn sales_policy() -> SalesPolicy {
    KeyedPolicy::new(Summary::factory(measure(|s: &Sale| s.amount)))
        .group(GroupDef::new("Region", |s: &Sale| s.region.clone()))
        .group(GroupDef::new("City", |s: &Sale| s.city.clone()))
}

/// Text for one binding: `H2(US)`, `D(US,NY,10)`, `F1(NY,sum=15)`.
pub fn describer(
    policy: SalesPolicy,
) -> impl Fn(Band, &Binding<Sale, Summary<Sale>>) -> String + 'static {
    move |band: Band, binding: &Binding<Sale, Summary<Sale>>| {
        if band == Band::Detail {
            let row = binding.row().expect("detail carries a row");
            let amount = row.amount.map_or("-".to_string(), |a| a.to_string());
            return format!("D({},{},{})", row.region, row.city, amount);
        }

        let label = match band.group_index() {
            Some(_) => {
                let anchor = binding.context_row().expect("group bindings carry an anchor");
                policy
                    .key_at(anchor, binding.level)
                    .expect("group level")
                    .to_string()
            }
            None => "grand".to_string(),
        };
        if band.is_header() {
            format!("H{}({})", binding.level, label)
        } else {
            let sum = binding
                .aggregate()
                .expect("group bindings carry an aggregate")
                .borrow()
                .value(AggregationType::Sum);
            format!("F{}({},sum={})", binding.level, label, sum)
        }
    }
}
