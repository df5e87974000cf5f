//! External collaborators of the home page.
//!
//! - [`lottie`] - Animation JSON fetched over HTTP and cached in memory
//! - [`logo`] - The logo image, embedded as a data URI

pub mod logo;
pub mod lottie;

pub use logo::load_logo;
pub use lottie::{LottieClient, LottieError};
