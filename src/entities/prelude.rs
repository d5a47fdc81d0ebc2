pub use super::bills::Entity as Bills;
pub use super::classes::Entity as Classes;
pub use super::payments::Entity as Payments;
pub use super::students::Entity as Students;
pub use super::users::Entity as Users;
