pub mod claims;
pub mod codec;
pub mod issuer;

pub use claims::{Role, TokenClaims};
pub use codec::{TokenCodec, TokenError};
pub use issuer::{IssuedToken, PrincipalSeed, TokenIssuer};
