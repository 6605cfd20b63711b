/// Identity Gateway and the identity provider boundary
///
/// - `gateway`: session state publication and sign-in/sign-up/sign-out
/// - `provider`: provider traits and the static federated authority
/// - `memory`: in-process provider with Argon2id password hashes
/// - `messages`: failure code to user-facing message mapping
mod error;
mod gateway;
mod memory;
mod messages;
mod password;
mod provider;
mod validators;

pub use error::{AuthError, AuthErrorCode};
pub use gateway::{IdentityGateway, SessionWatch};
pub use memory::MemoryIdentityProvider;
pub use messages::{classify, handle_auth, AuthAction};
pub use provider::{
    FederatedAuthority, FederatedProfile, IdentityProvider, StaticFederatedAuthority,
};
pub use validators::{normalize_email, validate_email, MIN_PASSWORD_LEN};
