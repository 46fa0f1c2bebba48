pub mod comparison;
pub mod item;
pub mod policy;
pub mod quote;
pub mod request;

pub use comparison::{ComparisonInput, ComparisonResult, ComparisonRow, Diagnostic, DiagnosticKind};
pub use item::{Item, Vendor};
pub use policy::{
    AggregateOptions, GroupingBasis, MembershipTier, OptionsOverride, PolicyOverride, RateTable,
    TierPolicy,
};
pub use quote::Quote;
pub use request::{PurchaseRequest, RequestStatus};
