//! Claim data structures and dataset loading

mod record;
pub mod loader;
pub mod inflation;

pub use record::{
    ClaimRecord, Company, PremiumBasis, SAMPLE_COMPANIES,
    company_records, list_companies, earned_premium,
};
pub use loader::{load_claims, load_claims_from_reader, load_default_dataset};
pub use inflation::{
    InflationRates, flat_rates, load_inflation_rates, load_inflation_rates_from_reader,
};
