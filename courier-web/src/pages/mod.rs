mod error;
mod home;
mod thread;

pub use error::ErrorPage;
pub use home::HomePage;
pub use thread::ThreadPage;
