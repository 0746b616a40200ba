mod method;
mod reconcile;
mod validator;

pub use method::PaymentMethod;
pub use reconcile::reconcile;
pub use validator::{change_due, validate_amount};
