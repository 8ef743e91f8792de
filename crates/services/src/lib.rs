//! critica/crates/services/src/lib.rs
//!
//! The use-case layer: pure policy plus the account, catalog, review and
//! comment flows, all speaking to storage and auth through the domain ports.

pub mod accounts;
pub mod catalog;
pub mod comments;
pub mod policy;
pub mod reviews;
pub mod validate;

pub use accounts::{AccountService, NewUser, SignupReceipt, SignupRequest, TokenRequest, UserPatch};
pub use catalog::{CatalogService, NewTitle, SlugInput, TitlePatch};
pub use comments::{CommentPatch, CommentService, NewComment};
pub use policy::Action;
pub use reviews::{NewReview, ReviewPatch, ReviewService, ScoreBounds};
