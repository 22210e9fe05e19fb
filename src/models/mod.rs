mod article;
mod category;
mod user;
mod variant;

pub use article::*;
pub use category::*;
pub use user::*;
pub use variant::*;
