pub mod favourite;
pub mod helpers;
pub mod people;
pub mod planet;
pub mod user;
