//! CloudFormation model types for AcctForm.
//!
//! Hand-written serde types for the template document and for the resource
//! properties AcctForm emits (IAM, SNS, CloudWatch, Budgets). CloudFormation
//! is plain JSON with `PascalCase` keys, so serde derives cover almost all of
//! it; intrinsic functions live in [`value`].
#![allow(missing_docs)]

pub mod budgets;
pub mod cloudwatch;
pub mod iam;
pub mod sns;
pub mod template;
pub mod value;

pub use iam::{Effect, PolicyDocument, PolicyStatement, Principal};
pub use template::{Output, Resource, Template};
pub use value::CfnValue;
