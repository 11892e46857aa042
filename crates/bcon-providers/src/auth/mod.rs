//! Authentication Provider Implementations
//!
//! | Provider | Description |
//! |----------|-------------|
//! | [`BasicAuthProvider`] | Users table from configuration, argon2 PHC or plain passwords |
//! | [`NoneAuthProvider`] | Login disabled, every caller is the anonymous admin |

pub mod basic;
pub mod none;

pub use basic::BasicAuthProvider;
pub use none::NoneAuthProvider;
