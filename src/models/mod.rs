//! Request DTOs and response view models.

pub mod auth;
pub mod bill;
pub mod class;
pub mod payment;
pub mod period;
pub mod report;
pub mod student;

pub use auth::{LoginRequest, LoginResponse, UserInfo};
pub use bill::{BillConfirm, BillFilter, BillGenerate, BillPeriod, BillWithStudent};
pub use class::{ClassFilter, CreateClass, UpdateClass};
pub use payment::{CreatePayment, PaymentFilter, PaymentWithDetails};
pub use period::Bulan;
pub use report::{AnnualPoint, AnnualReport, DailyReport, DashboardStats, MonthlyPoint, MonthlyReport};
pub use student::{CreateStudent, StudentFilter, StudentSummary, UpdateStudent};
