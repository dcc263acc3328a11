pub mod check;
pub mod health;
pub mod serve;
