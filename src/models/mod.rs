//! Typed request and response schemas for the prior-authorization backend.

pub mod ai;
pub mod auth;
pub mod claim;
pub mod enums;
pub mod envelope;
pub mod insurance;
pub mod pending;
pub mod prior_auth;
pub mod profile;

pub use ai::{AutocompleteSuggestion, FormattedDescription, HealthBuddyReply};
pub use auth::{AuthUser, LoginCredentials, LoginResponse, PasswordChange, RegisterCredentials};
pub use claim::{Claim, ClaimSubmission};
pub use enums::{Decision, ParseEnumError, Role, Urgency};
pub use envelope::{Envelope, HealthStatus, Receipt, Validate};
pub use insurance::{InsurancePlan, InsuranceSubscription, SubscribeRequest};
pub use pending::{ApprovalSubmission, PendingRequest, PendingRequestSubmission};
pub use prior_auth::{
    AutoReviewResult, DecisionSubmission, PayerRequest, PriorAuthRecord, PriorAuthSubmission,
};
pub use profile::{
    DirectoryEntry, IdentityProfile, MemberProfile, PayerDashboard, ProviderProfile,
};
