pub mod claims;
pub mod cookies;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use claims::{Claims, RefreshClaims};
pub use jwt::JwtService;
pub use middleware::{AuthMiddleware, AuthenticatedUser};
